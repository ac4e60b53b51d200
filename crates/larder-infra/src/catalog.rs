//! Catalog loading.
//!
//! A built-in catalog covers the common pantry. `catalog.path` in the config
//! replaces it with a JSON or TOML file of the same shape (chosen by file
//! extension; anything that is not `.toml` is read as JSON).

use std::path::Path;

use thiserror::Error;

use larder_types::catalog::{Catalog, CatalogItem, CatalogKind};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse catalog {path}: {reason}")]
    Parse { path: String, reason: String },

    #[error("catalog {path} has duplicate {kind} id '{id}'")]
    DuplicateId {
        path: String,
        kind: CatalogKind,
        id: String,
    },
}

/// Load the catalog file at `path`, or the built-in catalog when `None`.
pub async fn load_catalog(path: Option<&Path>) -> Result<Catalog, CatalogError> {
    let Some(path) = path else {
        return Ok(builtin_catalog());
    };
    let path_label = path.display().to_string();

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CatalogError::Read {
            path: path_label.clone(),
            source,
        })?;

    let is_toml = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
    let catalog: Catalog = if is_toml {
        toml::from_str(&content).map_err(|e| CatalogError::Parse {
            path: path_label.clone(),
            reason: e.to_string(),
        })?
    } else {
        serde_json::from_str(&content).map_err(|e| CatalogError::Parse {
            path: path_label.clone(),
            reason: e.to_string(),
        })?
    };

    check_unique_ids(&catalog, &path_label)?;
    if catalog.is_empty() {
        tracing::warn!(path = %path.display(), "catalog file is empty");
    }
    Ok(catalog)
}

fn check_unique_ids(catalog: &Catalog, path: &str) -> Result<(), CatalogError> {
    for kind in CatalogKind::ALL {
        let mut seen = std::collections::HashSet::new();
        if let Some(dup) = catalog.items(kind).iter().find(|item| !seen.insert(&item.id)) {
            return Err(CatalogError::DuplicateId {
                path: path.to_string(),
                kind,
                id: dup.id.clone(),
            });
        }
    }
    Ok(())
}

fn items(entries: &[(&str, &str)]) -> Vec<CatalogItem> {
    entries
        .iter()
        .map(|(id, name)| CatalogItem::new(*id, *name))
        .collect()
}

/// The catalog used when no file is configured.
pub fn builtin_catalog() -> Catalog {
    Catalog {
        ingredients: items(&[
            ("onion", "Onion"),
            ("tomato", "Tomato"),
            ("garlic", "Garlic"),
            ("potato", "Potato"),
            ("carrot", "Carrot"),
            ("rice", "Rice"),
            ("lentils", "Lentils"),
            ("chicken", "Chicken"),
            ("paneer", "Paneer"),
            ("spinach", "Spinach"),
        ]),
        seasonings: items(&[
            ("salt", "Salt"),
            ("black-pepper", "Black pepper"),
            ("cumin", "Cumin"),
            ("turmeric", "Turmeric"),
            ("chili-powder", "Chili powder"),
            ("oregano", "Oregano"),
        ]),
        preparation_actions: items(&[
            ("chop", "Chop"),
            ("dice", "Dice"),
            ("mince", "Mince"),
            ("soak", "Soak"),
            ("marinate", "Marinate"),
        ]),
        utensils: items(&[
            ("pot", "Pot"),
            ("pan", "Pan"),
            ("knife", "Knife"),
            ("cutting-board", "Cutting board"),
            ("ladle", "Ladle"),
        ]),
        instructions: items(&[
            ("heat-oil", "Heat the oil"),
            ("boil", "Bring to a boil"),
            ("simmer", "Simmer for 10 minutes"),
            ("stir", "Stir well"),
            ("garnish", "Garnish and serve"),
        ]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_builtin_when_no_path() {
        let catalog = load_catalog(None).await.unwrap();
        assert_eq!(catalog, builtin_catalog());
        assert!(catalog.find(CatalogKind::Ingredient, "onion").is_some());
        check_unique_ids(&catalog, "builtin").unwrap();
    }

    #[tokio::test]
    async fn test_load_json_and_toml() {
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("catalog.json");
        tokio::fs::write(
            &json_path,
            r#"{"ingredients":[{"id":"okra","name":"Okra","image":"okra.png"}],"preparationActions":[{"id":"chop","name":"Chop"}]}"#,
        )
        .await
        .unwrap();
        let catalog = load_catalog(Some(&json_path)).await.unwrap();
        assert_eq!(catalog.ingredients[0].image.as_deref(), Some("okra.png"));
        assert_eq!(catalog.preparation_actions.len(), 1);
        assert!(catalog.utensils.is_empty());

        let toml_path = dir.path().join("catalog.toml");
        tokio::fs::write(
            &toml_path,
            r#"
[[seasonings]]
id = "salt"
name = "Salt"
"#,
        )
        .await
        .unwrap();
        let catalog = load_catalog(Some(&toml_path)).await.unwrap();
        assert_eq!(catalog.seasonings[0].name, "Salt");
    }

    #[tokio::test]
    async fn test_duplicate_ids_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dup.json");
        tokio::fs::write(
            &path,
            r#"{"utensils":[{"id":"pan","name":"Pan"},{"id":"pan","name":"Skillet"}]}"#,
        )
        .await
        .unwrap();
        let err = load_catalog(Some(&path)).await.unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateId { kind: CatalogKind::Utensil, .. }));
    }

    #[tokio::test]
    async fn test_empty_file_loads_as_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        tokio::fs::write(&path, "{}").await.unwrap();
        let catalog = load_catalog(Some(&path)).await.unwrap();
        assert!(catalog.is_empty());
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_catalog(Some(&dir.path().join("nope.json"))).await.unwrap_err();
        assert!(matches!(err, CatalogError::Read { .. }));
    }
}
