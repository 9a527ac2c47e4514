use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    #[error("Not logged in")]
    Unauthenticated,

    #[error("Message is empty")]
    EmptyInput,

    #[error("Request failed with HTTP {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("Stream error: {0}")]
    Stream(String),

    #[error("Backend error {code}: {info}")]
    Envelope { code: String, info: String },

    #[error("Session expired, please log in again")]
    Unauthorized,

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("JS interop error: {0}")]
    JsInterop(String),
}

impl ChatError {
    /// Errors after which the stored token is no longer usable
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, ChatError::Unauthenticated | ChatError::Unauthorized)
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(e: serde_json::Error) -> Self {
        ChatError::Serialization(e.to_string())
    }
}
