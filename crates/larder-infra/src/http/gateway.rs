//! HttpRecipeGateway -- [`RecipeGateway`] over the recipe REST backend.
//!
//! Endpoints, all JSON in camelCase:
//! - `POST {base}/api/recipes` creates a document, answers `{"id": ...}`
//! - `PUT {base}/api/recipes/{id}` overwrites it, answers `{"id": ...}`
//! - `GET {base}/api/recipes/{id}` returns the stored document
//!
//! The backend may spell the id `_id`. Fetched documents are shape-checked
//! against the draft invariants before they are handed to the core.

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use larder_core::authoring::draft::check_invariants;
use larder_core::repository::gateway::RecipeGateway;
use larder_types::config::GatewayConfig;
use larder_types::error::{GatewayOperation, PersistenceError};
use larder_types::recipe::{RecipeDraft, RecipeId};

use super::{build_client, check_status, transport_error};

#[derive(Debug, Deserialize)]
struct IdResponse {
    #[serde(alias = "_id")]
    id: RecipeId,
}

/// Recipe REST backend client.
///
/// Does not derive `Debug`: the bearer token must never end up in logs.
pub struct HttpRecipeGateway {
    client: reqwest::Client,
    base_url: String,
    token: Option<SecretString>,
}

impl HttpRecipeGateway {
    pub fn new(config: &GatewayConfig, token: Option<SecretString>) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_client(config.timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self) -> String {
        format!("{}/api/recipes", self.base_url)
    }

    fn document_url(&self, id: &RecipeId) -> String {
        format!("{}/api/recipes/{}", self.base_url, id)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    async fn send_for_id(
        &self,
        operation: GatewayOperation,
        request: reqwest::RequestBuilder,
    ) -> Result<RecipeId, PersistenceError> {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| transport_error(operation, e))?;
        let response = check_status(operation, response).await?;

        let body: IdResponse = response
            .json()
            .await
            .map_err(|e| PersistenceError::new(operation, format!("malformed response: {e}")))?;
        if body.id.as_str().trim().is_empty() {
            return Err(PersistenceError::new(operation, "response carried an empty id"));
        }
        Ok(body.id)
    }
}

impl RecipeGateway for HttpRecipeGateway {
    async fn create_draft(&self, payload: &RecipeDraft) -> Result<RecipeId, PersistenceError> {
        let url = self.collection_url();
        tracing::debug!(%url, "creating recipe");
        self.send_for_id(
            GatewayOperation::CreateDraft,
            self.client.post(&url).json(payload),
        )
        .await
    }

    async fn update_draft(
        &self,
        id: &RecipeId,
        payload: &RecipeDraft,
    ) -> Result<RecipeId, PersistenceError> {
        let url = self.document_url(id);
        tracing::debug!(%url, "updating recipe");
        self.send_for_id(
            GatewayOperation::UpdateDraft,
            self.client.put(&url).json(payload),
        )
        .await
    }

    async fn fetch_draft(&self, id: &RecipeId) -> Result<RecipeDraft, PersistenceError> {
        let operation = GatewayOperation::FetchDraft;
        let url = self.document_url(id);
        tracing::debug!(%url, "fetching recipe");

        let response = self
            .authorize(self.client.get(&url))
            .send()
            .await
            .map_err(|e| transport_error(operation, e))?;
        let response = check_status(operation, response).await?;

        let draft: RecipeDraft = response
            .json()
            .await
            .map_err(|e| PersistenceError::new(operation, format!("malformed document: {e}")))?;
        check_invariants(&draft)
            .map_err(|e| PersistenceError::new(operation, format!("malformed document: {e}")))?;
        Ok(draft)
    }
}
