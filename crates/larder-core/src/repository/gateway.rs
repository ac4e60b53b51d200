//! Persistence gateway trait: the remote recipe document store.

use std::future::Future;

use larder_types::error::PersistenceError;
use larder_types::recipe::{RecipeDraft, RecipeId};

/// Remote store for recipe documents.
///
/// Implementations must map every transport failure, non-success status and
/// malformed body to a [`PersistenceError`] carrying the attempted operation.
/// No implementation retries on its own.
pub trait RecipeGateway: Send + Sync {
    /// Persist a new document and return the identifier the store assigned.
    fn create_draft(
        &self,
        payload: &RecipeDraft,
    ) -> impl Future<Output = Result<RecipeId, PersistenceError>> + Send;

    /// Overwrite the document stored under `id`.
    fn update_draft(
        &self,
        id: &RecipeId,
        payload: &RecipeDraft,
    ) -> impl Future<Output = Result<RecipeId, PersistenceError>> + Send;

    /// Load a stored document. The result has already been shape-checked.
    fn fetch_draft(
        &self,
        id: &RecipeId,
    ) -> impl Future<Output = Result<RecipeDraft, PersistenceError>> + Send;
}

impl<G: RecipeGateway> RecipeGateway for &G {
    fn create_draft(
        &self,
        payload: &RecipeDraft,
    ) -> impl Future<Output = Result<RecipeId, PersistenceError>> + Send {
        (**self).create_draft(payload)
    }

    fn update_draft(
        &self,
        id: &RecipeId,
        payload: &RecipeDraft,
    ) -> impl Future<Output = Result<RecipeId, PersistenceError>> + Send {
        (**self).update_draft(id, payload)
    }

    fn fetch_draft(
        &self,
        id: &RecipeId,
    ) -> impl Future<Output = Result<RecipeDraft, PersistenceError>> + Send {
        (**self).fetch_draft(id)
    }
}
