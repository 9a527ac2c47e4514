use serde::{Deserialize, Serialize};

/// Client configuration, persisted under `aihub:config`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Scheme + host (+ port) of the backend, no trailing slash
    pub api_base: String,
    pub default_model: String,
    pub models: Vec<String>,
    /// Applies to the envelope endpoints only; the completion stream has no timeout
    pub request_timeout_ms: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: DEFAULT_API_BASE.to_string(),
            default_model: "gpt-3.5-turbo".to_string(),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            request_timeout_ms: 10_000,
        }
    }
}

impl ClientConfig {
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_base.trim_end_matches('/'), path)
    }

    /// Absolute URLs pass through; server-relative paths get the API base.
    /// Anything else (an emoji icon, say) is returned unchanged.
    pub fn resolve_asset_url(&self, reference: &str) -> String {
        if reference.starts_with('/') {
            self.endpoint(reference)
        } else {
            reference.to_string()
        }
    }
}

/// True when an icon/avatar reference points at an image rather than an emoji
pub fn is_image_reference(reference: &str) -> bool {
    reference.starts_with("http") || reference.starts_with('/')
}

const DEFAULT_API_BASE: &str = "http://124.221.174.50:80";

const DEFAULT_MODELS: &[&str] = &["gpt-3.5-turbo", "gpt-3.5-turbo-16k", "gpt-4", "gpt-4-32k"];
