//! Local session draft persistence trait.
//!
//! Defines `SessionDraftStore` for saving and restoring authoring session
//! progress on the author's machine. When an authoring session is
//! interrupted (terminal closed, gateway unreachable), the session is
//! auto-saved and can be resumed later.
//!
//! This is independent of the remote persistence gateway: local drafts exist
//! before the gateway has assigned any recipe id.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use larder_types::error::RepositoryError;

// ---------------------------------------------------------------------------
// Domain types
// ---------------------------------------------------------------------------

/// A saved authoring session containing the full serialized state.
///
/// `state_json` holds the serialized `SessionSnapshot`. The `schema_version`
/// field lets a future release migrate older snapshots before deserializing.
#[derive(Debug, Clone)]
pub struct SessionDraft {
    pub session_id: Uuid,
    pub state_json: String,
    pub schema_version: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Lightweight summary of a saved session for listing.
#[derive(Debug, Clone)]
pub struct SessionDraftSummary {
    pub session_id: Uuid,
    /// Recipe name at the time of the last save (may be empty).
    pub recipe_name: String,
    /// Step the session was on, e.g. "ingredient_selection".
    pub step: String,
    pub updated_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Persistence interface for local session drafts.
pub trait SessionDraftStore: Send + Sync {
    /// Save or update a session draft (upsert on session_id).
    fn save_draft(
        &self,
        draft: SessionDraft,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;

    /// Load a session draft by session ID. `None` if nothing was saved.
    fn load_draft(
        &self,
        session_id: &Uuid,
    ) -> impl Future<Output = Result<Option<SessionDraft>, RepositoryError>> + Send;

    /// All saved drafts, most recently updated first.
    fn list_drafts(
        &self,
    ) -> impl Future<Output = Result<Vec<SessionDraftSummary>, RepositoryError>> + Send;

    /// Delete a session draft. No-op if it does not exist.
    fn delete_draft(
        &self,
        session_id: &Uuid,
    ) -> impl Future<Output = Result<(), RepositoryError>> + Send;
}
