//! Media upload trait for recipe images.

use std::future::Future;

use larder_types::error::PersistenceError;

/// Third-party image host. Accepts the raw bytes and returns a durable URL;
/// only the URL is ever stored on the draft.
pub trait MediaUploader: Send + Sync {
    fn upload_image(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> impl Future<Output = Result<String, PersistenceError>> + Send;
}
