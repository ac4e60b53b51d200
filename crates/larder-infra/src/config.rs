//! Configuration loader for Larder.
//!
//! Reads `config.toml` from the data directory (`~/.larder/` in production)
//! and deserializes it into [`LarderConfig`]. Falls back to defaults when the
//! file is missing or malformed.

use std::path::Path;

use larder_types::config::LarderConfig;

/// Load configuration from `{data_dir}/config.toml`.
///
/// - If the file does not exist, returns [`LarderConfig::default()`].
/// - If the file exists but fails to parse, logs a warning and returns the default.
/// - If the file exists and parses successfully, returns the parsed config.
pub async fn load_config(data_dir: &Path) -> LarderConfig {
    let config_path = data_dir.join("config.toml");

    let content = match tokio::fs::read_to_string(&config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config.toml found at {}, using defaults", config_path.display());
            return LarderConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return LarderConfig::default();
        }
    };

    match toml::from_str::<LarderConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            LarderConfig::default()
        }
    }
}

/// Apply a `--base-url` style override on top of the loaded file.
pub fn with_gateway_override(mut config: LarderConfig, base_url: Option<String>) -> LarderConfig {
    if let Some(url) = base_url {
        config.gateway.base_url = url.trim_end_matches('/').to_string();
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn load_config_missing_file_returns_default() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).await;
        assert_eq!(config, LarderConfig::default());
    }

    #[tokio::test]
    async fn load_config_valid_toml_returns_parsed() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(
            tmp.path().join("config.toml"),
            r#"
[gateway]
base_url = "https://recipes.example.com"
timeout_secs = 5

[catalog]
path = "/srv/catalog.json"
"#,
        )
        .await
        .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config.gateway.base_url, "https://recipes.example.com");
        assert_eq!(config.gateway.timeout_secs, 5);
        assert_eq!(config.catalog.path.as_deref(), Some("/srv/catalog.json"));
        assert_eq!(config.authoring.default_unit, "gm");
    }

    #[tokio::test]
    async fn load_config_invalid_toml_returns_default() {
        let tmp = TempDir::new().unwrap();
        tokio::fs::write(tmp.path().join("config.toml"), "this is not { valid toml !!!")
            .await
            .unwrap();

        let config = load_config(tmp.path()).await;
        assert_eq!(config, LarderConfig::default());
    }

    #[test]
    fn gateway_override_trims_trailing_slash() {
        let config = with_gateway_override(
            LarderConfig::default(),
            Some("http://127.0.0.1:8080/".to_string()),
        );
        assert_eq!(config.gateway.base_url, "http://127.0.0.1:8080");

        let untouched = with_gateway_override(LarderConfig::default(), None);
        assert_eq!(untouched.gateway.base_url, "http://localhost:5000");
    }
}
