//! The recipe draft aggregate and its parts.
//!
//! `RecipeDraft` is the single canonical shape used by every authoring step,
//! by the local session autosave and by the persistence gateway payload.
//! Field names serialize in camelCase to match the recipe document store.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogItem;
use crate::quantity::Quantity;

/// Identifier assigned by the persistence gateway on the first save.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(pub String);

impl RecipeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Small positive integer identifying a container within one draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContainerId(pub u32);

impl fmt::Display for ContainerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A catalog ingredient placed into a bucket with a confirmed quantity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngredientAddition {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub quantity: Quantity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
}

impl IngredientAddition {
    pub fn from_catalog(item: &CatalogItem, quantity: Quantity, units: Option<String>) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
            image: item.image.clone(),
            quantity,
            units,
        }
    }
}

/// A named vessel holding an ordered list of ingredient additions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Container {
    pub id: ContainerId,
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<IngredientAddition>,
}

impl Container {
    pub fn contains(&self, ingredient_id: &str) -> bool {
        self.ingredients.iter().any(|a| a.id == ingredient_id)
    }
}

/// One structured cooking instruction.
///
/// `raw` is the template the step was produced from before quantities were
/// interpolated; `instruction` is the rendered text shown to the cook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstructionStep {
    pub step: u32,
    pub instruction: String,
    pub raw: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<Quantity>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// The in-progress recipe aggregate.
///
/// Every field has a default so documents fetched from the gateway with
/// missing optional fields still load (missing `containers` becomes an
/// empty list, and so on).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RecipeDraft {
    #[serde(rename = "id", alias = "_id", skip_serializing_if = "Option::is_none")]
    pub draft_id: Option<RecipeId>,
    pub name: String,
    pub author: Option<String>,
    pub cuisine: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub price: Option<f64>,
    /// Minutes.
    pub cooking_time: Option<u32>,
    pub serving_size: Option<u32>,
    pub device_support: Option<bool>,
    pub preparation_required: Option<bool>,
    pub containers: Vec<Container>,
    pub seasonings: Vec<IngredientAddition>,
    pub water_oil: Vec<IngredientAddition>,
    pub preparation_items: Vec<CatalogItem>,
    pub utensils: Vec<CatalogItem>,
    pub instructions: Vec<InstructionStep>,
    /// Human-readable instruction text, one line per entry.
    pub narrative: String,
    pub image: Option<String>,
}

impl RecipeDraft {
    pub fn container(&self, id: ContainerId) -> Option<&Container> {
        self.containers.iter().find(|c| c.id == id)
    }

    /// Next free container id: one past the largest in use, starting at 1.
    /// `None` once the largest id in use is `u32::MAX`.
    pub fn next_container_id(&self) -> Option<ContainerId> {
        let max = self.containers.iter().map(|c| c.id.0).max().unwrap_or(0);
        max.checked_add(1).map(ContainerId)
    }

    /// Total number of ingredient additions across every bucket.
    pub fn addition_count(&self) -> usize {
        self.containers
            .iter()
            .map(|c| c.ingredients.len())
            .sum::<usize>()
            + self.seasonings.len()
            + self.water_oil.len()
    }
}

/// A partial update to a draft.
///
/// Scalar fields are merged when `Some`; list fields, when `Some`, replace
/// the whole list. The draft id is deliberately absent: it is only ever set
/// from a gateway response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftPatch {
    pub name: Option<String>,
    pub author: Option<String>,
    pub cuisine: Option<String>,
    pub category: Option<String>,
    pub difficulty: Option<String>,
    pub price: Option<f64>,
    pub cooking_time: Option<u32>,
    pub serving_size: Option<u32>,
    pub device_support: Option<bool>,
    pub preparation_required: Option<bool>,
    pub containers: Option<Vec<Container>>,
    pub seasonings: Option<Vec<IngredientAddition>>,
    pub water_oil: Option<Vec<IngredientAddition>>,
    pub preparation_items: Option<Vec<CatalogItem>>,
    pub utensils: Option<Vec<CatalogItem>>,
    pub instructions: Option<Vec<InstructionStep>>,
    pub narrative: Option<String>,
    pub image: Option<String>,
}

impl DraftPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
