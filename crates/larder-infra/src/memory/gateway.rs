//! In-memory [`RecipeGateway`].
//!
//! Assigns ids `r1`, `r2`, ... in creation order and keeps documents in a
//! `DashMap`. Documents are stored exactly as sent (with the id set), so a
//! fetch returns what the last create or update persisted.

use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use larder_core::repository::gateway::RecipeGateway;
use larder_types::error::{GatewayOperation, PersistenceError};
use larder_types::recipe::{RecipeDraft, RecipeId};

#[derive(Debug, Default)]
pub struct InMemoryRecipeGateway {
    documents: DashMap<RecipeId, RecipeDraft>,
    next_id: AtomicU64,
}

impl InMemoryRecipeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Stored document, if any.
    pub fn get(&self, id: &RecipeId) -> Option<RecipeDraft> {
        self.documents.get(id).map(|doc| doc.clone())
    }
}

impl RecipeGateway for InMemoryRecipeGateway {
    async fn create_draft(&self, payload: &RecipeDraft) -> Result<RecipeId, PersistenceError> {
        let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
        let id = RecipeId::new(format!("r{n}"));
        let mut document = payload.clone();
        document.draft_id = Some(id.clone());
        self.documents.insert(id.clone(), document);
        tracing::debug!(recipe_id = %id, "stored new recipe in memory");
        Ok(id)
    }

    async fn update_draft(
        &self,
        id: &RecipeId,
        payload: &RecipeDraft,
    ) -> Result<RecipeId, PersistenceError> {
        let mut entry = self.documents.get_mut(id).ok_or_else(|| {
            PersistenceError::new(GatewayOperation::UpdateDraft, format!("no recipe with id '{id}'"))
        })?;
        let mut document = payload.clone();
        document.draft_id = Some(id.clone());
        *entry = document;
        Ok(id.clone())
    }

    async fn fetch_draft(&self, id: &RecipeId) -> Result<RecipeDraft, PersistenceError> {
        self.get(id).ok_or_else(|| {
            PersistenceError::new(GatewayOperation::FetchDraft, format!("no recipe with id '{id}'"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> RecipeDraft {
        RecipeDraft {
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let gw = InMemoryRecipeGateway::new();
        assert_eq!(gw.create_draft(&named("a")).await.unwrap().as_str(), "r1");
        assert_eq!(gw.create_draft(&named("b")).await.unwrap().as_str(), "r2");
        assert_eq!(gw.len(), 2);
    }

    #[tokio::test]
    async fn test_update_then_fetch() {
        let gw = InMemoryRecipeGateway::new();
        let id = gw.create_draft(&named("Soup")).await.unwrap();
        gw.update_draft(&id, &named("Stew")).await.unwrap();

        let fetched = gw.fetch_draft(&id).await.unwrap();
        assert_eq!(fetched.name, "Stew");
        assert_eq!(fetched.draft_id, Some(id));
    }

    #[tokio::test]
    async fn test_unknown_ids_fail_with_operation() {
        let gw = InMemoryRecipeGateway::new();
        let id = RecipeId::new("r7");
        assert_eq!(
            gw.update_draft(&id, &named("x")).await.unwrap_err().operation,
            GatewayOperation::UpdateDraft
        );
        assert_eq!(
            gw.fetch_draft(&id).await.unwrap_err().operation,
            GatewayOperation::FetchDraft
        );
        assert!(gw.is_empty());
    }
}
