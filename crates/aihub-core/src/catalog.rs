//! Login, personas, products, profile and orders over the `BackendPort`.
//!
//! These are thin: call the port, reshape the result for the UI, and turn
//! envelope errors into one-shot notices.

use aihub_types::{
    ChatError, Result,
    api::{Order, Product, RoleItem, UserProfile},
    config::ClientConfig,
    conversation::{ChatType, Conversation},
    event::AppEvent,
};
use crate::context::SessionContext;
use crate::ports::{AvatarUpload, BackendPort};
use crate::store::{ConversationRepository, SharedStore};

/// Largest avatar accepted for upload
pub const MAX_AVATAR_BYTES: usize = 2 * 1024 * 1024;

// ─── Login ───────────────────────────────────────────────────

pub async fn login(backend: &dyn BackendPort, session: &SessionContext, code: &str) -> Result<()> {
    let code = code.trim();
    if code.is_empty() {
        return Err(ChatError::Validation("Please enter an access code".to_string()));
    }
    let token = backend.login(code).await?;
    session.sign_in(&token).await?;
    log::info!("Logged in");
    Ok(())
}

// ─── Personas ────────────────────────────────────────────────

/// A persona as shown on the roles page
#[derive(Debug, Clone, PartialEq)]
pub struct RoleCard {
    pub id: i64,
    pub prompt_id: Option<i64>,
    pub name: String,
    /// Resolved image URL, or an emoji when the backend has none
    pub avatar: String,
    pub description: String,
    pub prompt: String,
    pub chat_type: ChatType,
    pub likes: i64,
    pub liked: bool,
}

pub const DEFAULT_ROLE_AVATAR: &str = "👤";

impl RoleCard {
    pub fn from_item(item: RoleItem, config: &ClientConfig) -> Self {
        let avatar = if item.mmu.avatar.is_empty() {
            DEFAULT_ROLE_AVATAR.to_string()
        } else {
            config.resolve_asset_url(&item.mmu.avatar)
        };
        Self {
            id: item.mmu.id,
            prompt_id: item.prompt.prompt_id,
            chat_type: ChatType::from_role_name(&item.mmu.role_name),
            name: item.mmu.role_name,
            avatar,
            description: item.mmu.description,
            prompt: item.prompt.content,
            likes: item.prompt.like,
            liked: item.prompt.is_like,
        }
    }

    pub fn matches(&self, query: &str) -> bool {
        let needle = query.trim().to_lowercase();
        needle.is_empty()
            || self.name.to_lowercase().contains(&needle)
            || self.description.to_lowercase().contains(&needle)
    }

    /// Optimistic like/unlike, applied before the backend answers
    pub fn toggle_like(&mut self) {
        if self.liked {
            self.likes = (self.likes - 1).max(0);
        } else {
            self.likes += 1;
        }
        self.liked = !self.liked;
    }

    /// New conversation with this persona's prompt as the system prompt
    pub fn new_conversation(&self) -> Conversation {
        Conversation::new(self.name.clone(), self.chat_type)
            .with_icon(self.avatar.clone())
            .with_system_prompt(self.prompt.clone())
            .with_preview(&self.description)
    }
}

pub fn filter_roles<'a>(roles: &'a [RoleCard], query: &str) -> Vec<&'a RoleCard> {
    roles.iter().filter(|r| r.matches(query)).collect()
}

pub async fn load_roles(
    backend: &dyn BackendPort,
    config: &ClientConfig,
    token: Option<&str>,
) -> Result<Vec<RoleCard>> {
    let items = backend.fetch_roles(token).await?;
    log::info!("Loaded {} roles", items.len());
    Ok(items.into_iter().map(|item| RoleCard::from_item(item, config)).collect())
}

/// Send the like toggle. On failure the caller reverts its optimistic toggle.
pub async fn like_role(backend: &dyn BackendPort, token: Option<&str>, card: &RoleCard) -> Result<()> {
    let token = token.ok_or(ChatError::Unauthenticated)?;
    let prompt_id = card
        .prompt_id
        .ok_or_else(|| ChatError::Validation(format!("{} has no prompt to like", card.name)))?;
    backend.like_role(token, prompt_id).await
}

/// Create, select and persist a conversation for `card`, then report the
/// visit. The visit report is best effort. Returns the new conversation id.
pub async fn start_chat_with_role(
    backend: &dyn BackendPort,
    store: &SharedStore,
    repository: &ConversationRepository,
    token: Option<&str>,
    card: &RoleCard,
) -> Result<String> {
    let id = store.borrow_mut().insert_front(card.new_conversation());
    repository.save(store).await?;

    if let (Some(token), Some(prompt_id)) = (token, card.prompt_id) {
        if let Err(e) = backend.report_visit(token, prompt_id).await {
            log::warn!("Visit report for prompt {} failed: {}", prompt_id, e);
        }
    }
    Ok(id)
}

// ─── Products / orders / profile ─────────────────────────────

pub async fn load_products(backend: &dyn BackendPort, token: Option<&str>) -> Result<Vec<Product>> {
    let token = token.ok_or(ChatError::Unauthenticated)?;
    backend.fetch_products(token).await
}

/// Returns the payment form HTML for the new order
pub async fn buy_product(backend: &dyn BackendPort, token: Option<&str>, product: &Product) -> Result<String> {
    let token = token.ok_or(ChatError::Unauthenticated)?;
    log::info!("Creating order for product {}", product.product_id);
    backend.create_order(token, product.product_id).await
}

pub async fn load_orders(backend: &dyn BackendPort, token: Option<&str>) -> Result<Vec<Order>> {
    let token = token.ok_or(ChatError::Unauthenticated)?;
    backend.fetch_orders(token).await
}

/// Fetch the profile and refresh the cached avatar/nickname from it
pub async fn refresh_profile(backend: &dyn BackendPort, session: &SessionContext) -> Result<UserProfile> {
    let token = session.token().ok_or(ChatError::Unauthenticated)?;
    let profile = backend.fetch_profile(&token).await?;
    session.apply_profile(&profile).await?;
    Ok(profile)
}

pub fn validate_avatar(mime_type: &str, size: usize) -> Result<()> {
    if !mime_type.starts_with("image/") {
        return Err(ChatError::Validation("Only image files can be uploaded".to_string()));
    }
    if size >= MAX_AVATAR_BYTES {
        return Err(ChatError::Validation("Image must be smaller than 2MB".to_string()));
    }
    Ok(())
}

pub async fn upload_avatar(
    backend: &dyn BackendPort,
    session: &SessionContext,
    upload: AvatarUpload,
) -> Result<String> {
    validate_avatar(&upload.mime_type, upload.bytes.len())?;
    let token = session.token().ok_or(ChatError::Unauthenticated)?;
    let url = backend.upload_avatar(&token, upload).await?;
    session.set_avatar_url(&url).await?;
    Ok(url)
}

/// Notice for a failed fetch. Envelope errors show the backend's own text.
pub fn failure_notice(what: &str, error: &ChatError) -> AppEvent {
    match error {
        ChatError::Envelope { info, .. } if !info.is_empty() => {
            AppEvent::error(format!("{} failed: {}", what, info))
        }
        ChatError::Validation(text) => AppEvent::warning(text.clone()),
        ChatError::Unauthenticated | ChatError::Unauthorized => {
            AppEvent::warning(format!("{}: please log in first", what))
        }
        _ => AppEvent::error(format!("{} failed, please try again later", what)),
    }
}
