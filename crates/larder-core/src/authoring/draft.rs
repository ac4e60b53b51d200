//! Draft store: the single owner of the in-progress `RecipeDraft`.
//!
//! Every mutation goes through [`DraftStore::patch`] (or the id assignment
//! that follows a successful gateway save). A patch is merged into a copy of
//! the draft, the copy is checked against the draft invariants, and only
//! then swapped in. A rejected patch leaves the store exactly as it was.

use std::collections::HashSet;

use larder_types::error::{ValidationError, Violation};
use larder_types::recipe::{DraftPatch, IngredientAddition, RecipeDraft, RecipeId};

/// Holds the draft for one authoring session. Not shared between threads;
/// the session that owns it serializes all access.
#[derive(Debug, Clone, Default)]
pub struct DraftStore {
    draft: RecipeDraft,
}

impl DraftStore {
    /// An empty draft with no id.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adopt an existing draft (e.g. fetched for editing) after checking it.
    pub fn from_draft(draft: RecipeDraft) -> Result<Self, ValidationError> {
        check_invariants(&draft)?;
        Ok(Self { draft })
    }

    /// Current snapshot.
    pub fn get(&self) -> &RecipeDraft {
        &self.draft
    }

    pub fn id(&self) -> Option<&RecipeId> {
        self.draft.draft_id.as_ref()
    }

    /// Merge a partial update. List-valued fields in the patch replace the
    /// existing list wholesale.
    pub fn patch(&mut self, patch: DraftPatch) -> Result<(), ValidationError> {
        let candidate = merge(&self.draft, patch);
        check_invariants(&candidate)?;
        self.draft = candidate;
        Ok(())
    }

    /// Record the id returned by the gateway. Once set, the id never changes.
    pub fn assign_id(&mut self, id: RecipeId) -> Result<(), ValidationError> {
        match &self.draft.draft_id {
            Some(existing) if *existing != id => Err(ValidationError::single(
                "draftId",
                format!("already assigned '{existing}', refusing '{id}'"),
            )),
            Some(_) => Ok(()),
            None => {
                self.draft.draft_id = Some(id);
                Ok(())
            }
        }
    }

    /// Replace the whole draft with one the gateway accepted. The id may not
    /// change and the replacement must satisfy every invariant.
    pub(crate) fn commit(&mut self, draft: RecipeDraft) -> Result<(), ValidationError> {
        if self.draft.draft_id.is_some() && draft.draft_id != self.draft.draft_id {
            return Err(ValidationError::single("draftId", "cannot change once assigned"));
        }
        check_invariants(&draft)?;
        self.draft = draft;
        Ok(())
    }
}

fn merge(current: &RecipeDraft, patch: DraftPatch) -> RecipeDraft {
    let mut next = current.clone();
    if let Some(v) = patch.name {
        next.name = v;
    }
    if let Some(v) = patch.author {
        next.author = Some(v);
    }
    if let Some(v) = patch.cuisine {
        next.cuisine = Some(v);
    }
    if let Some(v) = patch.category {
        next.category = Some(v);
    }
    if let Some(v) = patch.difficulty {
        next.difficulty = Some(v);
    }
    if let Some(v) = patch.price {
        next.price = Some(v);
    }
    if let Some(v) = patch.cooking_time {
        next.cooking_time = Some(v);
    }
    if let Some(v) = patch.serving_size {
        next.serving_size = Some(v);
    }
    if let Some(v) = patch.device_support {
        next.device_support = Some(v);
    }
    if let Some(v) = patch.preparation_required {
        next.preparation_required = Some(v);
    }
    if let Some(v) = patch.containers {
        next.containers = v;
    }
    if let Some(v) = patch.seasonings {
        next.seasonings = v;
    }
    if let Some(v) = patch.water_oil {
        next.water_oil = v;
    }
    if let Some(v) = patch.preparation_items {
        next.preparation_items = v;
    }
    if let Some(v) = patch.utensils {
        next.utensils = v;
    }
    if let Some(v) = patch.instructions {
        next.instructions = v;
    }
    if let Some(v) = patch.narrative {
        next.narrative = v;
    }
    if let Some(v) = patch.image {
        next.image = Some(v);
    }
    next
}

/// Check every structural invariant of a draft, collecting all violations.
pub fn check_invariants(draft: &RecipeDraft) -> Result<(), ValidationError> {
    let mut violations = Vec::new();

    let mut container_ids = HashSet::new();
    for container in &draft.containers {
        if container.id.0 == 0 {
            violations.push(Violation::new("containers", "container ids must be positive"));
        }
        if !container_ids.insert(container.id) {
            violations.push(Violation::new(
                "containers",
                format!("container #{} appears more than once", container.id),
            ));
        }
        if let Some(dup) = first_duplicate(&container.ingredients) {
            violations.push(Violation::new(
                format!("containers[{}].ingredients", container.id),
                format!("'{dup}' appears more than once"),
            ));
        }
    }

    for (field, additions) in [("seasonings", &draft.seasonings), ("waterOil", &draft.water_oil)] {
        if let Some(dup) = first_duplicate(additions) {
            violations.push(Violation::new(field, format!("'{dup}' appears more than once")));
        }
    }

    for (field, items) in [
        ("preparationItems", &draft.preparation_items),
        ("utensils", &draft.utensils),
    ] {
        let mut seen = HashSet::new();
        if let Some(dup) = items.iter().find(|item| !seen.insert(item.id.as_str())) {
            violations.push(Violation::new(field, format!("'{}' appears more than once", dup.id)));
        }
    }

    if let Some((expected, found)) = draft
        .instructions
        .iter()
        .enumerate()
        .map(|(i, step)| (i as u32 + 1, step.step))
        .find(|(expected, found)| expected != found)
    {
        violations.push(Violation::new(
            "instructions",
            format!("step numbers must run 1..N, expected {expected} but found {found}"),
        ));
    }

    if let Some(price) = draft.price {
        if !price.is_finite() || price < 0.0 {
            violations.push(Violation::new("price", "must be a non-negative number"));
        }
    }

    if matches!(&draft.image, Some(url) if url.trim().is_empty()) {
        violations.push(Violation::new("image", "must be an uploaded media URL"));
    }

    if violations.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { violations })
    }
}

fn first_duplicate(additions: &[IngredientAddition]) -> Option<&str> {
    let mut seen = HashSet::new();
    additions
        .iter()
        .find(|a| !seen.insert(a.id.as_str()))
        .map(|a| a.id.as_str())
}
