use serde::{Deserialize, Serialize};

/// Login state, persisted under `aihub:auth`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthState {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub token: Option<String>,
    #[serde(default)]
    pub is_authenticated: bool,
}

impl AuthState {
    pub fn signed_in(token: impl Into<String>) -> Self {
        Self {
            token: Some(token.into()),
            is_authenticated: true,
        }
    }

    /// The token, but only while the session counts as authenticated
    pub fn token(&self) -> Option<&str> {
        if self.is_authenticated {
            self.token.as_deref().filter(|t| !t.is_empty())
        } else {
            None
        }
    }
}

/// Cached avatar and nickname, persisted under `aihub:user`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserCache {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub avatar_url: Option<String>,
    pub nickname: String,
}

impl Default for UserCache {
    fn default() -> Self {
        Self {
            avatar_url: None,
            nickname: DEFAULT_NICKNAME.to_string(),
        }
    }
}

pub const DEFAULT_NICKNAME: &str = "用户";
