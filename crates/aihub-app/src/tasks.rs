//! Background work started from the UI.
//!
//! Each task runs on `spawn_local` with its own clone of `Tasks` (all Rc
//! handles). Results come back through the inbox or as events on the bus;
//! the frame loop picks both up on the next repaint.

use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;

use js_sys::Uint8Array;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::HtmlFormElement;

use aihub_core::catalog::{self, RoleCard};
use aihub_core::chat::StreamingChatSession;
use aihub_core::context::{save_config, SessionContext};
use aihub_core::event_bus::EventBus;
use aihub_core::ports::{AvatarUpload, BackendPort, CompletionPort, StoragePort};
use aihub_core::store::{ConversationRepository, SharedStore};
use aihub_types::{
    ChatError,
    api::Product,
    config::ClientConfig,
    event::AppEvent,
};
use aihub_ui::state::{Loaded, Page};

pub type Inbox = Rc<RefCell<Vec<Loaded>>>;

#[derive(Clone)]
pub struct Tasks {
    pub config: ClientConfig,
    pub storage: Rc<dyn StoragePort>,
    pub backend: Rc<dyn BackendPort>,
    pub completion: Rc<dyn CompletionPort>,
    pub session: Rc<SessionContext>,
    pub chat: Rc<StreamingChatSession>,
    pub store: SharedStore,
    pub repository: ConversationRepository,
    pub bus: EventBus,
    pub inbox: Inbox,
    pub ctx: egui::Context,
}

impl Tasks {
    /// Run `task` in the background with a fresh set of handles.
    pub fn spawn<F, Fut>(&self, task: F)
    where
        F: FnOnce(Tasks) -> Fut,
        Fut: Future<Output = ()> + 'static,
    {
        wasm_bindgen_futures::spawn_local(task(self.clone()));
    }

    fn deliver(&self, loaded: Loaded) {
        self.inbox.borrow_mut().push(loaded);
        self.ctx.request_repaint();
    }

    fn notify(&self, event: AppEvent) {
        self.bus.emit(event);
        self.ctx.request_repaint();
    }

    fn token(&self) -> Option<String> {
        self.session.token()
    }

    /// A rejected token ends the session; anything else becomes a toast.
    async fn report_failure(&self, what: &str, error: &ChatError) {
        if error.is_auth_failure() && self.session.is_authenticated() {
            log::warn!("{}: token rejected, signing out", what);
            if let Err(e) = self.session.sign_out().await {
                log::error!("Sign-out failed: {}", e);
            }
            self.notify(AppEvent::warning("Your session has expired, please log in again"));
            self.notify(AppEvent::SessionChanged);
        } else {
            self.notify(catalog::failure_notice(what, error));
        }
    }

    // ─── Chat ────────────────────────────────────────────────

    pub async fn send(self, conversation_id: String, text: String, model: String) {
        let token = self.token();
        let result = self
            .chat
            .send_message(self.completion.as_ref(), &conversation_id, &text, &model, token.as_deref())
            .await;
        match result {
            Ok(receipt) => log::debug!("Send finished: {:?}", receipt.status),
            Err(ChatError::Unauthenticated) => self.notify(AppEvent::warning("Please log in first")),
            Err(ChatError::EmptyInput) => {}
            Err(e) => log::warn!("Send to {} rejected: {}", conversation_id, e),
        }
        self.ctx.request_repaint();
    }

    pub async fn save_store(self) {
        if let Err(e) = self.repository.save(&self.store).await {
            log::error!("Failed to save conversations: {}", e);
            self.notify(AppEvent::error("Could not save conversations"));
        }
    }

    pub async fn save_config(self, config: ClientConfig) {
        if let Err(e) = save_config(self.storage.as_ref(), &config).await {
            log::warn!("Failed to save config: {}", e);
        }
    }

    // ─── Session ─────────────────────────────────────────────

    pub async fn login(self, code: String) {
        match catalog::login(self.backend.as_ref(), &self.session, &code).await {
            Ok(()) => {
                self.deliver(Loaded::LoginFinished { ok: true, error: None });
                self.notify(AppEvent::success("Logged in"));
                self.notify(AppEvent::SessionChanged);
                self.refresh_profile().await;
            }
            Err(e) => {
                let text = match &e {
                    ChatError::Envelope { info, .. } if !info.is_empty() => info.clone(),
                    ChatError::Validation(text) => text.clone(),
                    other => format!("Login failed: {}", other),
                };
                self.deliver(Loaded::LoginFinished { ok: false, error: Some(text) });
            }
        }
    }

    pub async fn logout(self) {
        if let Err(e) = self.session.sign_out().await {
            log::error!("Sign-out failed: {}", e);
        }
        self.notify(AppEvent::info("Logged out"));
        self.notify(AppEvent::SessionChanged);
    }

    /// Profile first (updates the cached nickname/avatar), then orders
    pub async fn refresh_profile(self) {
        match catalog::refresh_profile(self.backend.as_ref(), &self.session).await {
            Ok(profile) => {
                self.deliver(Loaded::Profile(profile));
                self.notify(AppEvent::SessionChanged);
            }
            Err(e) => {
                self.deliver(Loaded::Failed(Page::Profile));
                self.report_failure("Loading profile", &e).await;
                return;
            }
        }

        let token = self.token();
        match catalog::load_orders(self.backend.as_ref(), token.as_deref()).await {
            Ok(orders) => self.deliver(Loaded::Orders(orders)),
            Err(e) => {
                self.deliver(Loaded::Failed(Page::Orders));
                self.report_failure("Loading orders", &e).await;
            }
        }
    }

    /// Nickname is a local display name; the backend keeps its own user name
    pub async fn rename(self, nickname: String) {
        match self.session.set_nickname(&nickname).await {
            Ok(()) => {
                self.notify(AppEvent::success("Nickname updated"));
                self.notify(AppEvent::SessionChanged);
            }
            Err(e) => {
                log::error!("Failed to save nickname: {}", e);
                self.notify(AppEvent::error("Could not save nickname"));
            }
        }
    }

    pub async fn upload_avatar(self, file: web_sys::File) {
        self.deliver(Loaded::AvatarUploadStarted);
        match self.read_and_upload(&file).await {
            Ok(_) => {
                self.notify(AppEvent::success("Avatar updated"));
                self.notify(AppEvent::SessionChanged);
            }
            Err(e) => self.report_failure("Avatar upload", &e).await,
        }
        self.deliver(Loaded::AvatarUploadFinished);
    }

    async fn read_and_upload(&self, file: &web_sys::File) -> aihub_types::Result<String> {
        let mime_type = file.type_();
        // Check before reading the whole file into memory
        catalog::validate_avatar(&mime_type, file.size() as usize)?;

        let buffer = JsFuture::from(file.array_buffer())
            .await
            .map_err(|e| ChatError::JsInterop(format!("{:?}", e)))?;
        let upload = AvatarUpload {
            file_name: file.name(),
            mime_type,
            bytes: Uint8Array::new(&buffer).to_vec(),
        };
        catalog::upload_avatar(self.backend.as_ref(), &self.session, upload).await
    }

    // ─── Roles ───────────────────────────────────────────────

    pub async fn load_roles(self) {
        let token = self.token();
        match catalog::load_roles(self.backend.as_ref(), &self.config, token.as_deref()).await {
            Ok(roles) => self.deliver(Loaded::Roles(roles)),
            Err(e) => {
                self.deliver(Loaded::Failed(Page::Roles));
                self.report_failure("Loading roles", &e).await;
            }
        }
    }

    pub async fn toggle_like(self, card: RoleCard) {
        let token = self.token();
        if let Err(e) = catalog::like_role(self.backend.as_ref(), token.as_deref(), &card).await {
            self.deliver(Loaded::LikeReverted(card.id));
            self.report_failure("Like", &e).await;
        }
    }

    pub async fn start_chat(self, card: RoleCard) {
        let token = self.token();
        let result = catalog::start_chat_with_role(
            self.backend.as_ref(),
            &self.store,
            &self.repository,
            token.as_deref(),
            &card,
        )
        .await;
        match result {
            Ok(id) => log::info!("Started chat {} with {}", id, card.name),
            Err(e) => self.report_failure("Starting chat", &e).await,
        }
        self.ctx.request_repaint();
    }

    // ─── Store ───────────────────────────────────────────────

    pub async fn load_products(self) {
        let token = self.token();
        match catalog::load_products(self.backend.as_ref(), token.as_deref()).await {
            Ok(products) => self.deliver(Loaded::Products(products)),
            Err(e) => {
                self.deliver(Loaded::Failed(Page::Products));
                self.report_failure("Loading products", &e).await;
            }
        }
    }

    pub async fn buy(self, product: Product) {
        let token = self.token();
        match catalog::buy_product(self.backend.as_ref(), token.as_deref(), &product).await {
            Ok(form) => {
                if let Err(e) = submit_payment_form(&form) {
                    log::error!("Payment form could not be submitted: {:?}", e);
                    self.notify(AppEvent::error("Could not open the payment page"));
                }
            }
            Err(e) => self.report_failure("Creating order", &e).await,
        }
    }
}

/// The order endpoints return an auto-posting HTML form for the payment
/// provider. Mount it off-screen and submit it.
pub fn submit_payment_form(html: &str) -> Result<(), JsValue> {
    let container = gloo_utils::document().create_element("div")?;
    container.set_attribute("style", "display:none")?;
    container.set_inner_html(html);
    gloo_utils::body().append_child(&container)?;

    let form = container
        .query_selector("form")?
        .ok_or_else(|| JsValue::from_str("no <form> in payment response"))?
        .dyn_into::<HtmlFormElement>()
        .map_err(JsValue::from)?;
    form.submit()
}
