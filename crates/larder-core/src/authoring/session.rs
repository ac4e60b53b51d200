//! Authoring session: one draft, one author, one flow.
//!
//! `AuthoringSession` composes the draft store, step sequencer, ingredient
//! assembler and instruction compiler, and is the only component that talks
//! to the persistence gateway. Persistence happens in exactly two places:
//! leaving BasicDetails (create, or update once an id exists) and `finish()`.
//!
//! Every async method takes `&mut self`, so a second save cannot start while
//! one is in flight. When a gateway call fails the draft, step and id are
//! exactly as they were before the call.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use larder_types::authoring::{AuthoringStep, Bucket};
use larder_types::catalog::{Catalog, CatalogItem};
use larder_types::error::{AuthoringError, GatewayOperation, PersistenceError, RepositoryError};
use larder_types::recipe::{ContainerId, DraftPatch, IngredientAddition, InstructionStep, RecipeDraft, RecipeId};

use crate::repository::gateway::RecipeGateway;
use crate::repository::media::MediaUploader;
use crate::repository::session_draft::SessionDraft;

use super::assembly::{IngredientAssembler, ItemSet, PendingPlacement};
use super::draft::{DraftStore, check_invariants};
use super::instruction::{InstructionCompiler, StepContext};
use super::sequencer::{StepSequencer, check_gate};

/// Current schema version for serialized session snapshots.
pub const SNAPSHOT_SCHEMA_VERSION: u32 = 1;

/// Everything needed to rebuild a session later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub step: AuthoringStep,
    pub draft: RecipeDraft,
    pub contexts: Vec<StepContext>,
    pub updated_at: DateTime<Utc>,
}

impl SessionSnapshot {
    /// Serialize for the local session draft store.
    pub fn to_session_draft(&self, created_at: DateTime<Utc>) -> Result<SessionDraft, RepositoryError> {
        let state_json = serde_json::to_string(self)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        Ok(SessionDraft {
            session_id: self.session_id,
            state_json,
            schema_version: SNAPSHOT_SCHEMA_VERSION,
            created_at,
            updated_at: self.updated_at,
        })
    }

    pub fn from_session_draft(saved: &SessionDraft) -> Result<Self, RepositoryError> {
        if saved.schema_version != SNAPSHOT_SCHEMA_VERSION {
            return Err(RepositoryError::Serialization(format!(
                "unsupported snapshot schema version {}",
                saved.schema_version
            )));
        }
        serde_json::from_str(&saved.state_json)
            .map_err(|e| RepositoryError::Serialization(e.to_string()))
    }
}

pub struct AuthoringSession<G> {
    session_id: Uuid,
    gateway: G,
    catalog: Catalog,
    store: DraftStore,
    sequencer: StepSequencer,
    assembler: IngredientAssembler,
    compiler: InstructionCompiler,
    complete: bool,
}

impl<G: RecipeGateway> AuthoringSession<G> {
    /// Begin authoring a new recipe from an empty draft.
    pub fn start(gateway: G, catalog: Catalog, default_unit: &str) -> Self {
        let session_id = Uuid::now_v7();
        tracing::info!(%session_id, "authoring session started");
        Self {
            session_id,
            gateway,
            catalog,
            store: DraftStore::new(),
            sequencer: StepSequencer::new(),
            assembler: IngredientAssembler::new(),
            compiler: InstructionCompiler::new(default_unit),
            complete: false,
        }
    }

    /// Load a persisted recipe for editing.
    ///
    /// The session starts at BasicDetails with the id already assigned, so
    /// leaving the first step updates the existing document instead of
    /// creating a second one.
    pub async fn resume(
        gateway: G,
        catalog: Catalog,
        default_unit: &str,
        id: &RecipeId,
    ) -> Result<Self, AuthoringError> {
        let mut draft = gateway.fetch_draft(id).await?;
        match &draft.draft_id {
            Some(returned) if returned != id => {
                return Err(PersistenceError::new(
                    GatewayOperation::FetchDraft,
                    format!("asked for '{id}' but received '{returned}'"),
                )
                .into());
            }
            Some(_) => {}
            None => draft.draft_id = Some(id.clone()),
        }

        let compiler = InstructionCompiler::seed_from_draft(&draft, default_unit);
        let store = DraftStore::from_draft(draft)?;
        let session_id = Uuid::now_v7();
        tracing::info!(%session_id, recipe_id = %id, "resumed recipe for editing");

        Ok(Self {
            session_id,
            gateway,
            catalog,
            store,
            sequencer: StepSequencer::new(),
            assembler: IngredientAssembler::new(),
            compiler,
            complete: false,
        })
    }

    /// Rebuild a session from a local autosave.
    pub fn from_snapshot(
        gateway: G,
        catalog: Catalog,
        default_unit: &str,
        snapshot: SessionSnapshot,
    ) -> Result<Self, AuthoringError> {
        let store = DraftStore::from_draft(snapshot.draft)?;
        tracing::info!(session_id = %snapshot.session_id, step = %snapshot.step, "session restored");
        Ok(Self {
            session_id: snapshot.session_id,
            gateway,
            catalog,
            store,
            sequencer: StepSequencer::at(snapshot.step),
            assembler: IngredientAssembler::new(),
            compiler: InstructionCompiler::with_contexts(snapshot.contexts, default_unit),
            complete: false,
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            session_id: self.session_id,
            step: self.sequencer.current(),
            draft: self.store.get().clone(),
            contexts: self.compiler.contexts().to_vec(),
            updated_at: Utc::now(),
        }
    }

    // -- accessors ----------------------------------------------------------

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn draft(&self) -> &RecipeDraft {
        self.store.get()
    }

    pub fn recipe_id(&self) -> Option<&RecipeId> {
        self.store.id()
    }

    pub fn step(&self) -> AuthoringStep {
        self.sequencer.current()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn pending(&self) -> Option<&PendingPlacement> {
        self.assembler.pending()
    }

    pub fn contexts(&self) -> &[StepContext] {
        self.compiler.contexts()
    }

    /// Unit used for ingredient instructions when the author gives none.
    pub fn default_unit(&self) -> &str {
        self.compiler.default_unit()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    // -- draft mutations ----------------------------------------------------

    /// Merge scalar or list fields into the draft.
    pub fn update(&mut self, patch: DraftPatch) -> Result<(), AuthoringError> {
        self.ensure_open()?;
        self.store.patch(patch)?;
        Ok(())
    }

    pub fn begin_placement(&mut self, item: CatalogItem, bucket: Bucket) -> Result<(), AuthoringError> {
        self.ensure_open()?;
        self.assembler.begin_placement(self.store.get(), item, bucket)
    }

    pub fn confirm_placement(
        &mut self,
        quantity: &str,
        units: Option<&str>,
    ) -> Result<IngredientAddition, AuthoringError> {
        self.ensure_open()?;
        self.assembler.confirm_placement(&mut self.store, quantity, units)
    }

    pub fn cancel_placement(&mut self) -> Option<PendingPlacement> {
        self.assembler.cancel_placement()
    }

    pub fn remove_addition(&mut self, bucket: Bucket, ingredient_id: &str) -> Result<bool, AuthoringError> {
        self.ensure_open()?;
        self.assembler.remove_addition(&mut self.store, bucket, ingredient_id)
    }

    pub fn move_addition(
        &mut self,
        ingredient_id: &str,
        from: ContainerId,
        to: ContainerId,
    ) -> Result<(), AuthoringError> {
        self.ensure_open()?;
        self.assembler.move_addition(&mut self.store, ingredient_id, from, to)
    }

    pub fn add_container(&mut self, name: &str) -> Result<ContainerId, AuthoringError> {
        self.ensure_open()?;
        self.assembler.add_container(&mut self.store, name)
    }

    pub fn rename_container(&mut self, id: ContainerId, name: &str) -> Result<(), AuthoringError> {
        self.ensure_open()?;
        self.assembler.rename_container(&mut self.store, id, name)
    }

    pub fn remove_container(&mut self, id: ContainerId) -> Result<bool, AuthoringError> {
        self.ensure_open()?;
        self.assembler.remove_container(&mut self.store, id)
    }

    pub fn add_preparation_item(&mut self, item: CatalogItem) -> Result<(), AuthoringError> {
        self.ensure_open()?;
        self.assembler.add_item(&mut self.store, ItemSet::PreparationItems, item)
    }

    pub fn remove_preparation_item(&mut self, id: &str) -> Result<bool, AuthoringError> {
        self.ensure_open()?;
        self.assembler.remove_item(&mut self.store, ItemSet::PreparationItems, id)
    }

    pub fn add_utensil(&mut self, item: CatalogItem) -> Result<(), AuthoringError> {
        self.ensure_open()?;
        self.assembler.add_item(&mut self.store, ItemSet::Utensils, item)
    }

    pub fn remove_utensil(&mut self, id: &str) -> Result<bool, AuthoringError> {
        self.ensure_open()?;
        self.assembler.remove_item(&mut self.store, ItemSet::Utensils, id)
    }

    // -- instructions -------------------------------------------------------

    pub fn add_context(&mut self) -> Result<usize, AuthoringError> {
        self.ensure_open()?;
        Ok(self.compiler.add_context())
    }

    pub fn remove_context(&mut self, index: usize) -> Result<StepContext, AuthoringError> {
        self.ensure_open()?;
        self.compiler.remove_context(index)
    }

    pub fn set_narrative(&mut self, index: usize, text: &str) -> Result<(), AuthoringError> {
        self.ensure_open()?;
        self.compiler.set_narrative(index, text)
    }

    pub fn append_catalog_instruction(
        &mut self,
        index: usize,
        instruction: &CatalogItem,
    ) -> Result<InstructionStep, AuthoringError> {
        self.ensure_open()?;
        self.compiler.append_from_catalog_instruction(index, instruction)
    }

    pub fn append_ingredient_instruction(
        &mut self,
        index: usize,
        ingredient: &CatalogItem,
        quantity: &str,
        units: Option<&str>,
    ) -> Result<InstructionStep, AuthoringError> {
        self.ensure_open()?;
        self.compiler.append_from_ingredient(index, ingredient, quantity, units)
    }

    pub fn remove_instruction(&mut self, index: usize, text: &str) -> Result<bool, AuthoringError> {
        self.ensure_open()?;
        self.compiler.remove_by_text(index, text)
    }

    // -- navigation and persistence ------------------------------------------

    /// Advance one step.
    ///
    /// Runs the current step's gate; leaving BasicDetails also persists the
    /// draft (create the first time, update afterwards). On any failure the
    /// step does not change.
    pub async fn next(&mut self) -> Result<AuthoringStep, AuthoringError> {
        self.ensure_open()?;
        let from = self.sequencer.current();
        let to = self.sequencer.check_advance(self.store.get())?;

        if StepSequencer::persists_on_advance(from) {
            let payload = self.assemble_payload();
            let id = self.persist(&payload).await?;
            self.store.assign_id(id)?;
        }

        self.sequencer.move_to(to);
        tracing::debug!(%from, %to, "advanced");
        Ok(to)
    }

    /// Go back one step. `None` on the first step: the caller should ask
    /// whether to leave the session.
    pub fn prev(&mut self) -> Result<Option<AuthoringStep>, AuthoringError> {
        self.ensure_open()?;
        Ok(self.sequencer.prev())
    }

    /// The full document as it would be persisted: the draft with the
    /// flattened instructions and the joined narrative. Does not mutate.
    pub fn assemble_payload(&self) -> RecipeDraft {
        let mut payload = self.store.get().clone();
        payload.instructions = self.compiler.flatten();
        payload.narrative = self.compiler.narrative();
        payload
    }

    /// Persist the assembled document and close the session. Only allowed
    /// from the last step. The store is updated only after the gateway
    /// accepted the payload.
    pub async fn finish(&mut self) -> Result<RecipeId, AuthoringError> {
        self.ensure_open()?;
        let step = self.sequencer.current();
        if !step.is_last() {
            return Err(AuthoringError::InvalidTransition {
                action: "finish",
                step,
            });
        }

        let mut payload = self.assemble_payload();
        check_gate(step, &payload)?;
        check_invariants(&payload)?;

        let id = self.persist(&payload).await?;
        payload.draft_id = Some(id.clone());
        self.store.commit(payload)?;
        self.complete = true;
        tracing::info!(session_id = %self.session_id, recipe_id = %id, "recipe finished");
        Ok(id)
    }

    /// Upload an image and store the returned URL on the draft.
    pub async fn attach_image<U: MediaUploader>(
        &mut self,
        uploader: &U,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<String, AuthoringError> {
        self.ensure_open()?;
        let url = uploader.upload_image(bytes, file_name).await?;
        self.store.patch(DraftPatch {
            image: Some(url.clone()),
            ..Default::default()
        })?;
        tracing::debug!(%url, "image attached");
        Ok(url)
    }

    async fn persist(&self, payload: &RecipeDraft) -> Result<RecipeId, AuthoringError> {
        match self.store.id() {
            Some(id) => {
                let returned = self.gateway.update_draft(id, payload).await.inspect_err(|e| {
                    tracing::warn!(recipe_id = %id, error = %e, "update failed");
                })?;
                if returned != *id {
                    return Err(PersistenceError::new(
                        GatewayOperation::UpdateDraft,
                        format!("store answered with id '{returned}' for '{id}'"),
                    )
                    .into());
                }
                tracing::info!(recipe_id = %id, "recipe updated");
                Ok(returned)
            }
            None => {
                let id = self.gateway.create_draft(payload).await.inspect_err(|e| {
                    tracing::warn!(error = %e, "create failed");
                })?;
                tracing::info!(recipe_id = %id, "recipe created");
                Ok(id)
            }
        }
    }

    fn ensure_open(&self) -> Result<(), AuthoringError> {
        if self.complete {
            Err(AuthoringError::SessionComplete)
        } else {
            Ok(())
        }
    }
}
