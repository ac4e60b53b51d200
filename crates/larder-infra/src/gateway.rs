//! Runtime choice between the remote backend and the in-memory store.

use larder_core::repository::gateway::RecipeGateway;
use larder_types::error::PersistenceError;
use larder_types::recipe::{RecipeDraft, RecipeId};

use crate::http::gateway::HttpRecipeGateway;
use crate::memory::gateway::InMemoryRecipeGateway;

/// Either gateway behind one concrete type, selected by `--offline`.
pub enum AnyGateway {
    Http(HttpRecipeGateway),
    Memory(InMemoryRecipeGateway),
}

impl AnyGateway {
    /// Short label for status output.
    pub fn describe(&self) -> String {
        match self {
            AnyGateway::Http(gw) => gw.base_url().to_string(),
            AnyGateway::Memory(_) => "in-memory (offline)".to_string(),
        }
    }
}

impl RecipeGateway for AnyGateway {
    async fn create_draft(&self, payload: &RecipeDraft) -> Result<RecipeId, PersistenceError> {
        match self {
            AnyGateway::Http(gw) => gw.create_draft(payload).await,
            AnyGateway::Memory(gw) => gw.create_draft(payload).await,
        }
    }

    async fn update_draft(
        &self,
        id: &RecipeId,
        payload: &RecipeDraft,
    ) -> Result<RecipeId, PersistenceError> {
        match self {
            AnyGateway::Http(gw) => gw.update_draft(id, payload).await,
            AnyGateway::Memory(gw) => gw.update_draft(id, payload).await,
        }
    }

    async fn fetch_draft(&self, id: &RecipeId) -> Result<RecipeDraft, PersistenceError> {
        match self {
            AnyGateway::Http(gw) => gw.fetch_draft(id).await,
            AnyGateway::Memory(gw) => gw.fetch_draft(id).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_variant_delegates() {
        let gw = AnyGateway::Memory(InMemoryRecipeGateway::new());
        assert_eq!(gw.describe(), "in-memory (offline)");
        let id = gw.create_draft(&RecipeDraft::default()).await.unwrap();
        assert_eq!(id.as_str(), "r1");
        assert!(gw.fetch_draft(&id).await.is_ok());
    }
}
