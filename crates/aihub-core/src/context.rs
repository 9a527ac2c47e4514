//! Session context: login state plus the cached avatar/nickname.
//!
//! Loaded once at startup and passed to whoever needs it. Every setter
//! writes through to storage before returning.

use std::cell::RefCell;
use std::rc::Rc;

use aihub_types::{
    Result,
    api::UserProfile,
    config::ClientConfig,
    session::{AuthState, UserCache},
};
use crate::ports::StoragePort;

pub const AUTH_KEY: &str = "aihub:auth";
pub const USER_KEY: &str = "aihub:user";
pub const CONFIG_KEY: &str = "aihub:config";

pub struct SessionContext {
    storage: Rc<dyn StoragePort>,
    auth: RefCell<AuthState>,
    user: RefCell<UserCache>,
}

impl SessionContext {
    /// Read auth and user cache from storage; missing or corrupt values fall
    /// back to signed-out defaults.
    pub async fn load(storage: Rc<dyn StoragePort>) -> Self {
        let auth: AuthState = read_json(storage.as_ref(), AUTH_KEY).await.unwrap_or_default();
        let user: UserCache = read_json(storage.as_ref(), USER_KEY).await.unwrap_or_default();
        log::info!(
            "Session loaded (authenticated: {}, nickname: {})",
            auth.token().is_some(),
            user.nickname
        );
        Self {
            storage,
            auth: RefCell::new(auth),
            user: RefCell::new(user),
        }
    }

    /// Empty, signed-out context (no storage read)
    pub fn new(storage: Rc<dyn StoragePort>) -> Self {
        Self {
            storage,
            auth: RefCell::new(AuthState::default()),
            user: RefCell::new(UserCache::default()),
        }
    }

    pub fn auth(&self) -> AuthState {
        self.auth.borrow().clone()
    }

    pub fn token(&self) -> Option<String> {
        self.auth.borrow().token().map(str::to_string)
    }

    pub fn is_authenticated(&self) -> bool {
        self.auth.borrow().token().is_some()
    }

    pub fn user(&self) -> UserCache {
        self.user.borrow().clone()
    }

    pub async fn sign_in(&self, token: &str) -> Result<()> {
        *self.auth.borrow_mut() = AuthState::signed_in(token);
        self.save_auth().await
    }

    /// Forget the token. The avatar/nickname cache is kept.
    pub async fn sign_out(&self) -> Result<()> {
        *self.auth.borrow_mut() = AuthState::default();
        self.storage.delete(AUTH_KEY).await
    }

    pub async fn set_avatar_url(&self, url: &str) -> Result<()> {
        self.user.borrow_mut().avatar_url = Some(url.to_string());
        self.save_user().await
    }

    pub async fn set_nickname(&self, nickname: &str) -> Result<()> {
        self.user.borrow_mut().nickname = nickname.to_string();
        self.save_user().await
    }

    /// Refresh the cache from a freshly fetched profile
    pub async fn apply_profile(&self, profile: &UserProfile) -> Result<()> {
        {
            let mut user = self.user.borrow_mut();
            user.nickname = profile.user_name.clone();
            if !profile.avatar.is_empty() {
                user.avatar_url = Some(profile.avatar.clone());
            }
        }
        self.save_user().await
    }

    async fn save_auth(&self) -> Result<()> {
        let bytes = serde_json::to_vec(&*self.auth.borrow())?;
        self.storage.set(AUTH_KEY, &bytes).await
    }

    async fn save_user(&self) -> Result<()> {
        let bytes = serde_json::to_vec(&*self.user.borrow())?;
        self.storage.set(USER_KEY, &bytes).await
    }
}

// ─── Client config ───────────────────────────────────────────

pub async fn load_config(storage: &dyn StoragePort) -> ClientConfig {
    match read_json(storage, CONFIG_KEY).await {
        Some(config) => {
            log::info!("Config restored from storage");
            config
        }
        None => ClientConfig::default(),
    }
}

pub async fn save_config(storage: &dyn StoragePort, config: &ClientConfig) -> Result<()> {
    let bytes = serde_json::to_vec(config)?;
    storage.set(CONFIG_KEY, &bytes).await?;
    log::info!("Config saved to storage");
    Ok(())
}

async fn read_json<T: serde::de::DeserializeOwned>(storage: &dyn StoragePort, key: &str) -> Option<T> {
    match storage.get(key).await {
        Ok(Some(bytes)) => match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                log::warn!("Ignoring unreadable {}: {}", key, e);
                None
            }
        },
        Ok(None) => None,
        Err(e) => {
            log::warn!("Failed to read {}: {}", key, e);
            None
        }
    }
}
