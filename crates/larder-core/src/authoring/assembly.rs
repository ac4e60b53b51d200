//! Ingredient assembly engine.
//!
//! Mediates every container, seasoning, water/oil, preparation and utensil
//! mutation. Placements are two-phase: [`IngredientAssembler::begin_placement`]
//! records where a catalog item is headed, and nothing reaches the draft
//! until [`IngredientAssembler::confirm_placement`] supplies a valid quantity.
//! The same protocol serves a drag-and-drop UI and a prompt-driven CLI.
//!
//! Each mutation is computed on copies of the affected lists and written
//! with a single [`DraftStore::patch`], so a failure never leaves a half-done
//! change behind.

use larder_types::authoring::Bucket;
use larder_types::catalog::CatalogItem;
use larder_types::error::{AuthoringError, ValidationError};
use larder_types::quantity::Quantity;
use larder_types::recipe::{Container, ContainerId, DraftPatch, IngredientAddition, RecipeDraft};

use super::draft::DraftStore;

/// A catalog item on its way into a bucket, waiting for a quantity.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingPlacement {
    pub item: CatalogItem,
    pub bucket: Bucket,
}

/// The two preparation-step sets keyed by catalog id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemSet {
    PreparationItems,
    Utensils,
}

impl ItemSet {
    fn label(self) -> &'static str {
        match self {
            ItemSet::PreparationItems => "preparation items",
            ItemSet::Utensils => "utensils",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IngredientAssembler {
    pending: Option<PendingPlacement>,
}

impl IngredientAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<&PendingPlacement> {
        self.pending.as_ref()
    }

    /// Record a pending placement. Replaces any placement still pending.
    /// The draft is not touched.
    pub fn begin_placement(
        &mut self,
        draft: &RecipeDraft,
        item: CatalogItem,
        bucket: Bucket,
    ) -> Result<(), AuthoringError> {
        if let Bucket::Container(id) = bucket {
            if draft.container(id).is_none() {
                return Err(AuthoringError::ContainerNotFound(id));
            }
        }
        if let Some(previous) = &self.pending {
            tracing::debug!(item = %previous.item.id, "replacing unconfirmed placement");
        }
        tracing::debug!(item = %item.id, %bucket, "placement started");
        self.pending = Some(PendingPlacement { item, bucket });
        Ok(())
    }

    /// Complete the pending placement with an explicit quantity.
    ///
    /// An invalid quantity keeps the placement pending so the author can
    /// correct it. A duplicate ingredient discards the placement: there is
    /// nothing to correct. Either way the draft is unchanged on error.
    pub fn confirm_placement(
        &mut self,
        store: &mut DraftStore,
        quantity: &str,
        units: Option<&str>,
    ) -> Result<IngredientAddition, AuthoringError> {
        let pending = self.pending.as_ref().ok_or(AuthoringError::NoPendingPlacement)?;

        let quantity = Quantity::parse(quantity).map_err(|e| AuthoringError::InvalidQuantity {
            bucket: pending.bucket.to_string(),
            input: e.0,
        })?;
        let units = units
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string);
        let addition = IngredientAddition::from_catalog(&pending.item, quantity, units);
        let bucket = pending.bucket;

        self.pending = None;
        insert_addition(store, bucket, addition.clone())?;

        tracing::debug!(item = %addition.id, %bucket, quantity = %addition.quantity, "placement confirmed");
        Ok(addition)
    }

    /// Drop the pending placement without touching the draft.
    pub fn cancel_placement(&mut self) -> Option<PendingPlacement> {
        self.pending.take()
    }

    /// Remove an addition from a bucket. Returns whether anything was
    /// removed; an absent id is a no-op.
    pub fn remove_addition(
        &mut self,
        store: &mut DraftStore,
        bucket: Bucket,
        ingredient_id: &str,
    ) -> Result<bool, AuthoringError> {
        let draft = store.get();
        let patch = match bucket {
            Bucket::Container(id) => {
                let mut containers = draft.containers.clone();
                let container = find_container_mut(&mut containers, id)?;
                if !retain_without(&mut container.ingredients, ingredient_id) {
                    return Ok(false);
                }
                DraftPatch {
                    containers: Some(containers),
                    ..Default::default()
                }
            }
            Bucket::Seasonings => {
                let mut seasonings = draft.seasonings.clone();
                if !retain_without(&mut seasonings, ingredient_id) {
                    return Ok(false);
                }
                DraftPatch {
                    seasonings: Some(seasonings),
                    ..Default::default()
                }
            }
            Bucket::WaterOil => {
                let mut water_oil = draft.water_oil.clone();
                if !retain_without(&mut water_oil, ingredient_id) {
                    return Ok(false);
                }
                DraftPatch {
                    water_oil: Some(water_oil),
                    ..Default::default()
                }
            }
        };
        store.patch(patch)?;
        tracing::debug!(item = ingredient_id, %bucket, "addition removed");
        Ok(true)
    }

    /// Move an addition between containers in one patch.
    ///
    /// Either the addition ends up only in `to`, or (on any error) it stays
    /// only in `from`.
    pub fn move_addition(
        &mut self,
        store: &mut DraftStore,
        ingredient_id: &str,
        from: ContainerId,
        to: ContainerId,
    ) -> Result<(), AuthoringError> {
        let mut containers = store.get().containers.clone();

        let source = find_container_mut(&mut containers, from)?;
        let position = source
            .ingredients
            .iter()
            .position(|a| a.id == ingredient_id)
            .ok_or_else(|| AuthoringError::AdditionNotFound {
                bucket: Bucket::Container(from).to_string(),
                ingredient_id: ingredient_id.to_string(),
            })?;
        if from == to {
            return Ok(());
        }

        let destination = find_container_mut(&mut containers, to)?;
        if destination.contains(ingredient_id) {
            return Err(AuthoringError::DuplicateIngredient {
                bucket: Bucket::Container(to).to_string(),
                ingredient_id: ingredient_id.to_string(),
            });
        }

        let moved = find_container_mut(&mut containers, from)?
            .ingredients
            .remove(position);
        find_container_mut(&mut containers, to)?.ingredients.push(moved);

        store.patch(DraftPatch {
            containers: Some(containers),
            ..Default::default()
        })?;
        tracing::debug!(item = ingredient_id, %from, %to, "addition moved");
        Ok(())
    }

    /// Append a new empty container and return its id.
    pub fn add_container(
        &mut self,
        store: &mut DraftStore,
        name: &str,
    ) -> Result<ContainerId, AuthoringError> {
        let id = store.get().next_container_id().ok_or_else(|| {
            ValidationError::single("containers", "no container ids left to assign")
        })?;
        let mut containers = store.get().containers.clone();
        containers.push(Container {
            id,
            name: name.trim().to_string(),
            ingredients: Vec::new(),
        });
        store.patch(DraftPatch {
            containers: Some(containers),
            ..Default::default()
        })?;
        Ok(id)
    }

    pub fn rename_container(
        &mut self,
        store: &mut DraftStore,
        id: ContainerId,
        name: &str,
    ) -> Result<(), AuthoringError> {
        let mut containers = store.get().containers.clone();
        find_container_mut(&mut containers, id)?.name = name.trim().to_string();
        store.patch(DraftPatch {
            containers: Some(containers),
            ..Default::default()
        })?;
        Ok(())
    }

    /// Remove a container along with its additions. Unknown ids are a no-op.
    /// A pending placement aimed at the removed container is discarded.
    pub fn remove_container(
        &mut self,
        store: &mut DraftStore,
        id: ContainerId,
    ) -> Result<bool, AuthoringError> {
        let mut containers = store.get().containers.clone();
        let before = containers.len();
        containers.retain(|c| c.id != id);
        if containers.len() == before {
            return Ok(false);
        }
        store.patch(DraftPatch {
            containers: Some(containers),
            ..Default::default()
        })?;
        if matches!(&self.pending, Some(p) if p.bucket == Bucket::Container(id)) {
            self.pending = None;
        }
        Ok(true)
    }

    /// Add a catalog item to the preparation items or utensils set.
    pub fn add_item(
        &mut self,
        store: &mut DraftStore,
        set: ItemSet,
        item: CatalogItem,
    ) -> Result<(), AuthoringError> {
        let mut items = item_set(store.get(), set).to_vec();
        if items.iter().any(|existing| existing.id == item.id) {
            return Err(AuthoringError::DuplicateIngredient {
                bucket: set.label().to_string(),
                ingredient_id: item.id,
            });
        }
        items.push(item);
        store.patch(item_set_patch(set, items))?;
        Ok(())
    }

    /// Remove an item from a set. Absent ids are a no-op.
    pub fn remove_item(
        &mut self,
        store: &mut DraftStore,
        set: ItemSet,
        id: &str,
    ) -> Result<bool, AuthoringError> {
        let mut items = item_set(store.get(), set).to_vec();
        let before = items.len();
        items.retain(|item| item.id != id);
        if items.len() == before {
            return Ok(false);
        }
        store.patch(item_set_patch(set, items))?;
        Ok(true)
    }
}

fn insert_addition(
    store: &mut DraftStore,
    bucket: Bucket,
    addition: IngredientAddition,
) -> Result<(), AuthoringError> {
    let duplicate = || AuthoringError::DuplicateIngredient {
        bucket: bucket.to_string(),
        ingredient_id: addition.id.clone(),
    };
    let draft = store.get();
    let patch = match bucket {
        Bucket::Container(id) => {
            let mut containers = draft.containers.clone();
            let container = find_container_mut(&mut containers, id)?;
            if container.contains(&addition.id) {
                return Err(duplicate());
            }
            container.ingredients.push(addition.clone());
            DraftPatch {
                containers: Some(containers),
                ..Default::default()
            }
        }
        Bucket::Seasonings => {
            let mut seasonings = draft.seasonings.clone();
            if seasonings.iter().any(|a| a.id == addition.id) {
                return Err(duplicate());
            }
            seasonings.push(addition.clone());
            DraftPatch {
                seasonings: Some(seasonings),
                ..Default::default()
            }
        }
        Bucket::WaterOil => {
            let mut water_oil = draft.water_oil.clone();
            if water_oil.iter().any(|a| a.id == addition.id) {
                return Err(duplicate());
            }
            water_oil.push(addition.clone());
            DraftPatch {
                water_oil: Some(water_oil),
                ..Default::default()
            }
        }
    };
    store.patch(patch)?;
    Ok(())
}

fn find_container_mut(
    containers: &mut [Container],
    id: ContainerId,
) -> Result<&mut Container, AuthoringError> {
    containers
        .iter_mut()
        .find(|c| c.id == id)
        .ok_or(AuthoringError::ContainerNotFound(id))
}

/// Remove `id` from the list; report whether it was there.
fn retain_without(additions: &mut Vec<IngredientAddition>, id: &str) -> bool {
    let before = additions.len();
    additions.retain(|a| a.id != id);
    additions.len() != before
}

fn item_set(draft: &RecipeDraft, set: ItemSet) -> &[CatalogItem] {
    match set {
        ItemSet::PreparationItems => &draft.preparation_items,
        ItemSet::Utensils => &draft.utensils,
    }
}

fn item_set_patch(set: ItemSet, items: Vec<CatalogItem>) -> DraftPatch {
    match set {
        ItemSet::PreparationItems => DraftPatch {
            preparation_items: Some(items),
            ..Default::default()
        },
        ItemSet::Utensils => DraftPatch {
            utensils: Some(items),
            ..Default::default()
        },
    }
}
