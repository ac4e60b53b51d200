//! Application state wiring the adapters together.
//!
//! AppState holds the concrete adapter instances the CLI commands use: the
//! persistence gateway (remote or in-memory), the media uploader, the local
//! session autosave store and the catalog.

use std::path::Path;

use anyhow::Context;

use larder_infra::catalog::load_catalog;
use larder_infra::config::{load_config, with_gateway_override};
use larder_infra::filesystem::{database_url, ensure_data_dir, resolve_data_dir};
use larder_infra::gateway::AnyGateway;
use larder_infra::http::gateway::HttpRecipeGateway;
use larder_infra::http::media::HttpMediaUploader;
use larder_infra::memory::gateway::InMemoryRecipeGateway;
use larder_infra::secret::token_from_env;
use larder_infra::sqlite::pool::DatabasePool;
use larder_infra::sqlite::session_draft::SqliteSessionDraftStore;
use larder_types::catalog::Catalog;
use larder_types::config::LarderConfig;

/// Options from the command line that affect how state is built.
#[derive(Debug, Clone, Default)]
pub struct StateOptions {
    pub offline: bool,
    pub base_url: Option<String>,
}

pub struct AppState {
    pub config: LarderConfig,
    pub gateway: AnyGateway,
    pub uploader: HttpMediaUploader,
    pub session_store: SqliteSessionDraftStore,
    pub catalog: Catalog,
}

impl AppState {
    /// Load config, open the autosave database and build the adapters.
    pub async fn init(options: StateOptions) -> anyhow::Result<Self> {
        let data_dir = resolve_data_dir();
        ensure_data_dir(&data_dir)
            .await
            .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;

        let config = with_gateway_override(load_config(&data_dir).await, options.base_url);
        tracing::debug!(data_dir = %data_dir.display(), "configuration loaded");

        let db_pool = DatabasePool::new(&database_url(&data_dir))
            .await
            .context("Failed to open session database")?;

        let gateway = if options.offline {
            AnyGateway::Memory(InMemoryRecipeGateway::new())
        } else {
            let token = token_from_env(&config.gateway.token_env);
            AnyGateway::Http(
                HttpRecipeGateway::new(&config.gateway, token)
                    .context("Failed to build HTTP client")?,
            )
        };
        tracing::debug!(gateway = %gateway.describe(), "persistence gateway selected");

        let uploader = HttpMediaUploader::new(
            &config.media,
            config.gateway.timeout_secs,
            token_from_env(&config.media.token_env),
        )
        .context("Failed to build media upload client")?;

        let catalog_path = config.catalog.path.as_deref().map(Path::new);
        let catalog = load_catalog(catalog_path)
            .await
            .context("Failed to load catalog")?;

        Ok(Self {
            config,
            gateway,
            uploader,
            session_store: SqliteSessionDraftStore::new(db_pool),
            catalog,
        })
    }

    pub fn default_unit(&self) -> &str {
        &self.config.authoring.default_unit
    }
}
