//! UI-level state that drives rendering.
//!
//! Conversations themselves live in the core store and are read directly by
//! the chat panel. `UiState` only holds what the store does not: navigation,
//! input buffers, page data fetched from the backend, in-flight flags and
//! toasts. It is updated each frame from the EventBus and from results of
//! background tasks.

use std::collections::HashSet;

use aihub_core::catalog::{filter_roles, RoleCard};
use aihub_core::store::ConversationStore;
use aihub_types::{
    api::{Order, Product, UserProfile},
    event::{AppEvent, ConversationEvent, NoticeLevel},
};

/// How long a toast stays on screen, in seconds
pub const NOTICE_SECONDS: f64 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Chat,
    Roles,
    Products,
    Profile,
}

impl Tab {
    pub fn all() -> [Tab; 4] {
        [Tab::Chat, Tab::Roles, Tab::Products, Tab::Profile]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tab::Chat => "Chat",
            Tab::Roles => "Roles",
            Tab::Products => "Store",
            Tab::Profile => "Profile",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
    pub expires_at: f64,
}

/// Result of a background task, handed back to the UI thread
#[derive(Debug, Clone)]
pub enum Loaded {
    Roles(Vec<RoleCard>),
    Products(Vec<Product>),
    Orders(Vec<Order>),
    Profile(UserProfile),
    /// Like request failed; undo the optimistic toggle for this role id
    LikeReverted(i64),
    /// A fetch of the named page failed; its loading flag is cleared
    Failed(Page),
    LoginFinished { ok: bool, error: Option<String> },
    /// A file was picked and is being uploaded
    AvatarUploadStarted,
    /// Avatar upload settled, either way
    AvatarUploadFinished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Roles,
    Products,
    Orders,
    Profile,
}

pub struct UiState {
    pub tab: Tab,

    // Login
    pub login_code: String,
    pub login_error: Option<String>,
    pub logging_in: bool,

    // Chat
    pub chat_input: String,
    pub chat_search: String,
    pub model: String,
    /// Conversations with a reply still streaming
    pub streaming: HashSet<String>,

    // Roles
    pub roles: Vec<RoleCard>,
    pub role_search: String,
    pub selected_role: Option<i64>,
    pub roles_loading: bool,

    // Store / profile
    pub products: Vec<Product>,
    pub products_loading: bool,
    pub orders: Vec<Order>,
    pub orders_loading: bool,
    pub profile: Option<UserProfile>,
    pub profile_loading: bool,
    pub uploading_avatar: bool,
    /// Nickname being edited on the profile page
    pub nickname_edit: Option<String>,

    pub notices: Vec<Notice>,
    /// Session changed since the app last looked
    pub session_dirty: bool,
}

impl UiState {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            tab: Tab::default(),
            login_code: String::new(),
            login_error: None,
            logging_in: false,
            chat_input: String::new(),
            chat_search: String::new(),
            model: model.into(),
            streaming: HashSet::new(),
            roles: Vec::new(),
            role_search: String::new(),
            selected_role: None,
            roles_loading: false,
            products: Vec::new(),
            products_loading: false,
            orders: Vec::new(),
            orders_loading: false,
            profile: None,
            profile_loading: false,
            uploading_avatar: false,
            nickname_edit: None,
            notices: Vec::new(),
            session_dirty: false,
        }
    }

    /// Process events from the EventBus. `now` is the egui clock in seconds.
    pub fn process_events(&mut self, events: Vec<AppEvent>, now: f64) {
        for event in events {
            match event {
                AppEvent::Conversation { conversation_id, event } => match event {
                    ConversationEvent::UserMessageAppended { .. } => {
                        self.streaming.insert(conversation_id);
                    }
                    ConversationEvent::BotStreamCompleted { .. }
                    | ConversationEvent::BotStreamFailed { .. } => {
                        self.streaming.remove(&conversation_id);
                    }
                    ConversationEvent::BotChunkReceived { .. } => {}
                },
                AppEvent::Notice { level, text } => self.push_notice(level, text, now),
                AppEvent::SessionChanged => self.session_dirty = true,
            }
        }
        self.prune_notices(now);
    }

    pub fn apply_loaded(&mut self, loaded: Loaded) {
        match loaded {
            Loaded::Roles(roles) => {
                self.roles = roles;
                self.roles_loading = false;
            }
            Loaded::Products(products) => {
                self.products = products;
                self.products_loading = false;
            }
            Loaded::Orders(orders) => {
                self.orders = orders;
                self.orders_loading = false;
            }
            Loaded::Profile(profile) => {
                self.profile = Some(profile);
                self.profile_loading = false;
            }
            Loaded::LikeReverted(role_id) => {
                log::debug!("Reverting like on role {}", role_id);
                if let Some(card) = self.roles.iter_mut().find(|r| r.id == role_id) {
                    card.toggle_like();
                }
            }
            Loaded::Failed(page) => match page {
                Page::Roles => self.roles_loading = false,
                Page::Products => self.products_loading = false,
                Page::Orders => self.orders_loading = false,
                Page::Profile => self.profile_loading = false,
            },
            Loaded::AvatarUploadStarted => self.uploading_avatar = true,
            Loaded::AvatarUploadFinished => self.uploading_avatar = false,
            Loaded::LoginFinished { ok, error } => {
                self.logging_in = false;
                self.login_error = error;
                if ok {
                    self.login_code.clear();
                    self.tab = Tab::Chat;
                }
            }
        }
    }

    pub fn push_notice(&mut self, level: NoticeLevel, text: impl Into<String>, now: f64) {
        self.notices.push(Notice {
            level,
            text: text.into(),
            expires_at: now + NOTICE_SECONDS,
        });
    }

    pub fn prune_notices(&mut self, now: f64) {
        self.notices.retain(|n| n.expires_at > now);
    }

    pub fn is_streaming(&self, conversation_id: &str) -> bool {
        self.streaming.contains(conversation_id)
    }

    pub fn begin_nickname_edit(&mut self, current: &str) {
        self.nickname_edit = Some(current.to_string());
    }

    /// Close the editor. Returns the trimmed name unless it is blank.
    pub fn finish_nickname_edit(&mut self) -> Option<String> {
        let name = self.nickname_edit.take()?;
        let name = name.trim();
        (!name.is_empty()).then(|| name.to_string())
    }

    /// A deleted conversation never reports the end of its reply
    pub fn forget_conversation(&mut self, conversation_id: &str) {
        self.streaming.remove(conversation_id);
    }

    /// Drop streaming flags for conversations no longer in the store
    pub fn sync_streaming(&mut self, store: &ConversationStore) {
        self.streaming.retain(|id| store.contains(id));
    }

    /// Any background work the UI should keep repainting for
    pub fn is_busy(&self) -> bool {
        !self.streaming.is_empty()
            || self.logging_in
            || self.roles_loading
            || self.products_loading
            || self.orders_loading
            || self.profile_loading
            || self.uploading_avatar
    }

    pub fn visible_roles(&self) -> Vec<&RoleCard> {
        filter_roles(&self.roles, &self.role_search)
    }

    pub fn selected_role(&self) -> Option<&RoleCard> {
        let id = self.selected_role?;
        self.roles.iter().find(|r| r.id == id)
    }

    pub fn role_mut(&mut self, role_id: i64) -> Option<&mut RoleCard> {
        self.roles.iter_mut().find(|r| r.id == role_id)
    }

    /// Forget everything fetched for the previous user
    pub fn reset_after_logout(&mut self) {
        self.products.clear();
        self.orders.clear();
        self.profile = None;
        self.roles.clear();
        self.selected_role = None;
        self.nickname_edit = None;
        self.tab = Tab::Chat;
    }
}
