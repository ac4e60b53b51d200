//! Configuration types for Larder.
//!
//! `LarderConfig` represents `config.toml` in the data directory. Every
//! section and field has a default so an empty or missing file is valid.

use serde::{Deserialize, Serialize};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LarderConfig {
    pub gateway: GatewayConfig,
    pub media: MediaConfig,
    pub authoring: AuthoringConfig,
    pub catalog: CatalogConfig,
}

/// Where the recipe REST backend lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Name of the environment variable holding the bearer token, if any.
    pub token_env: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:5000".to_string(),
            timeout_secs: 30,
            token_env: "LARDER_API_TOKEN".to_string(),
        }
    }
}

/// Third-party media host used for recipe images.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MediaConfig {
    pub upload_url: Option<String>,
    pub upload_preset: Option<String>,
    pub token_env: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            upload_url: None,
            upload_preset: None,
            token_env: "LARDER_MEDIA_TOKEN".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthoringConfig {
    /// Unit code used for ingredient instructions when none is given.
    pub default_unit: String,
}

impl Default for AuthoringConfig {
    fn default() -> Self {
        Self {
            default_unit: "gm".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// JSON or TOML file replacing the built-in catalog.
    pub path: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default_values() {
        let config = LarderConfig::default();
        assert_eq!(config.gateway.base_url, "http://localhost:5000");
        assert_eq!(config.gateway.timeout_secs, 30);
        assert_eq!(config.authoring.default_unit, "gm");
        assert!(config.media.upload_url.is_none());
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn test_config_deserialize_empty() {
        let config: LarderConfig = toml::from_str("").unwrap();
        assert_eq!(config, LarderConfig::default());
    }

    #[test]
    fn test_config_deserialize_partial_sections() {
        let toml_str = r#"
[gateway]
base_url = "https://recipes.example.com"

[authoring]
default_unit = "ml"

[media]
upload_url = "https://media.example.com/upload"
upload_preset = "recipes"
"#;
        let config: LarderConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.gateway.base_url, "https://recipes.example.com");
        assert_eq!(config.gateway.timeout_secs, 30);
        assert_eq!(config.gateway.token_env, "LARDER_API_TOKEN");
        assert_eq!(config.authoring.default_unit, "ml");
        assert_eq!(config.media.upload_preset.as_deref(), Some("recipes"));
        assert_eq!(config.media.token_env, "LARDER_MEDIA_TOKEN");
    }
}
