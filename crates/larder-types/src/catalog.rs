//! Read-only reference data offered to the author: ingredients, seasonings,
//! preparation actions, utensils and instruction templates.
//!
//! The catalog is loaded once per session and never mutated by the core.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single catalog entry. Every kind of catalog item shares this shape.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl CatalogItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            image: None,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Which list of the catalog an item belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CatalogKind {
    Ingredient,
    Seasoning,
    PreparationAction,
    Utensil,
    Instruction,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 5] = [
        CatalogKind::Ingredient,
        CatalogKind::Seasoning,
        CatalogKind::PreparationAction,
        CatalogKind::Utensil,
        CatalogKind::Instruction,
    ];
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogKind::Ingredient => write!(f, "ingredient"),
            CatalogKind::Seasoning => write!(f, "seasoning"),
            CatalogKind::PreparationAction => write!(f, "preparation_action"),
            CatalogKind::Utensil => write!(f, "utensil"),
            CatalogKind::Instruction => write!(f, "instruction"),
        }
    }
}

impl FromStr for CatalogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "ingredient" | "ingredients" => Ok(CatalogKind::Ingredient),
            "seasoning" | "seasonings" => Ok(CatalogKind::Seasoning),
            "preparation_action" | "preparation_actions" | "preparation" => {
                Ok(CatalogKind::PreparationAction)
            }
            "utensil" | "utensils" => Ok(CatalogKind::Utensil),
            "instruction" | "instructions" => Ok(CatalogKind::Instruction),
            other => Err(format!("unknown catalog kind: '{other}'")),
        }
    }
}

/// The full catalog offered during an authoring session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Catalog {
    pub ingredients: Vec<CatalogItem>,
    pub seasonings: Vec<CatalogItem>,
    pub preparation_actions: Vec<CatalogItem>,
    pub utensils: Vec<CatalogItem>,
    pub instructions: Vec<CatalogItem>,
}

impl Catalog {
    /// All items of the given kind, in catalog order.
    pub fn items(&self, kind: CatalogKind) -> &[CatalogItem] {
        match kind {
            CatalogKind::Ingredient => &self.ingredients,
            CatalogKind::Seasoning => &self.seasonings,
            CatalogKind::PreparationAction => &self.preparation_actions,
            CatalogKind::Utensil => &self.utensils,
            CatalogKind::Instruction => &self.instructions,
        }
    }

    /// Look up an item of the given kind by id.
    pub fn find(&self, kind: CatalogKind, id: &str) -> Option<&CatalogItem> {
        self.items(kind).iter().find(|item| item.id == id)
    }

    pub fn is_empty(&self) -> bool {
        CatalogKind::ALL.iter().all(|kind| self.items(*kind).is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Catalog {
        Catalog {
            ingredients: vec![CatalogItem::new("onion", "Onion").with_image("onion.png")],
            seasonings: vec![CatalogItem::new("salt", "Salt")],
            ..Default::default()
        }
    }

    #[test]
    fn test_find_by_kind_and_id() {
        let catalog = sample();
        let onion = catalog.find(CatalogKind::Ingredient, "onion").unwrap();
        assert_eq!(onion.name, "Onion");
        assert_eq!(onion.image.as_deref(), Some("onion.png"));
        assert!(catalog.find(CatalogKind::Seasoning, "onion").is_none());
    }

    #[test]
    fn test_deserialize_missing_lists_default_empty() {
        let catalog: Catalog =
            serde_json::from_str(r#"{"ingredients":[{"id":"a","name":"A"}]}"#).unwrap();
        assert_eq!(catalog.ingredients.len(), 1);
        assert!(catalog.utensils.is_empty());
        assert!(!catalog.is_empty());
        assert!(Catalog::default().is_empty());
    }

    #[test]
    fn test_catalog_kind_roundtrip() {
        for kind in CatalogKind::ALL {
            assert_eq!(kind.to_string().parse::<CatalogKind>().unwrap(), kind);
        }
        assert_eq!("utensils".parse::<CatalogKind>().unwrap(), CatalogKind::Utensil);
        assert!("spoons".parse::<CatalogKind>().is_err());
    }
}
