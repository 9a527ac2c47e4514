//! Port traits: the hexagonal architecture boundary.
//!
//! These traits are defined here in `aihub-core` (pure Rust).
//! Implementations live in `aihub-platform` (browser adapters).
//! The core never imports platform code; it only depends on these traits.

use std::pin::Pin;
use async_trait::async_trait;
use futures::Stream;
use aihub_types::{
    Result,
    api::{Order, Product, RoleItem, UserProfile},
    message::CompletionRequest,
};

// ─── Completion Port ─────────────────────────────────────────

/// Raw body chunks of a streaming completion, in arrival order
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Vec<u8>>>>>;

#[async_trait(?Send)]
pub trait CompletionPort {
    /// Start a streaming completion.
    ///
    /// Resolves once the response status is known. A non-success status is
    /// `ChatError::RequestFailed` carrying the status and the body text.
    async fn stream_completion(&self, req: CompletionRequest, token: &str) -> Result<ByteStream>;
}

// ─── Backend Port ────────────────────────────────────────────

/// Image picked for upload as the new user avatar
#[derive(Debug, Clone)]
pub struct AvatarUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Envelope-style REST endpoints. Every method resolves to the envelope's
/// `data` on code `"0000"` and to `ChatError::Envelope` otherwise.
#[async_trait(?Send)]
pub trait BackendPort {
    /// Exchange an access code for a token
    async fn login(&self, code: &str) -> Result<String>;

    async fn fetch_roles(&self, token: Option<&str>) -> Result<Vec<RoleItem>>;

    /// Toggle the like flag of a persona prompt
    async fn like_role(&self, token: &str, prompt_id: i64) -> Result<()>;

    async fn report_visit(&self, token: &str, prompt_id: i64) -> Result<()>;

    async fn fetch_profile(&self, token: &str) -> Result<UserProfile>;

    async fn fetch_products(&self, token: &str) -> Result<Vec<Product>>;

    /// Returns the payment form HTML
    async fn create_order(&self, token: &str, product_id: i64) -> Result<String>;

    async fn fetch_orders(&self, token: &str) -> Result<Vec<Order>>;

    /// Returns the URL of the stored avatar
    async fn upload_avatar(&self, token: &str, upload: AvatarUpload) -> Result<String>;
}

// ─── Storage Port ────────────────────────────────────────────

#[async_trait(?Send)]
pub trait StoragePort {
    /// Get a value by key
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Set a value
    async fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    /// Delete a value
    async fn delete(&self, key: &str) -> Result<()>;

    /// List keys with a given prefix
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>>;

    /// Check if a key exists
    async fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    /// Name of this backend (for logging/debug)
    fn backend_name(&self) -> &str;
}
