//! Main egui application: composes the panels and owns every adapter.

use std::cell::RefCell;
use std::rc::Rc;

use egui::{self, Align, Align2, CentralPanel, Layout, RichText, TopBottomPanel};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use aihub_core::chat::StreamingChatSession;
use aihub_core::context::{load_config, SessionContext};
use aihub_core::event_bus::EventBus;
use aihub_core::ports::StoragePort;
use aihub_core::store::{ConversationRepository, ConversationStore};
use aihub_platform::http::{HttpBackend, HttpCompletion};
use aihub_platform::storage::detect_storage;
use aihub_types::{
    config::ClientConfig,
    conversation::{ChatType, Conversation},
};
use aihub_ui::panels::chat::ChatAction;
use aihub_ui::panels::products::ProductsAction;
use aihub_ui::panels::profile::ProfileAction;
use aihub_ui::panels::roles::RolesAction;
use aihub_ui::panels::{chat, login, products, profile, roles};
use aihub_ui::state::{Tab, UiState};
use aihub_ui::theme;

use crate::tasks::{Inbox, Tasks};

const DEFAULT_BOT_ICON: &str = "🤖";
const FONT_URL: &str = "NotoSansSC-Regular.otf";

/// Everything read from storage before the first real frame
struct Boot {
    config: ClientConfig,
    store: ConversationStore,
    session: SessionContext,
}

/// The main application state
pub struct AihubApp {
    ui_state: UiState,
    tasks: Tasks,
    boot: Rc<RefCell<Option<Boot>>>,
    ready: bool,
    first_frame: bool,
    font_loaded: Rc<RefCell<bool>>,
}

impl AihubApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = ClientConfig::default();
        let storage = detect_storage();
        let event_bus = EventBus::new();
        let store = ConversationStore::new().into_shared();
        let repository = ConversationRepository::new(storage.clone());
        let chat = StreamingChatSession::new(store.clone(), repository.clone(), event_bus.clone());

        let tasks = Tasks {
            backend: Rc::new(HttpBackend::new(config.clone())),
            completion: Rc::new(HttpCompletion::new(&config)),
            session: Rc::new(SessionContext::new(storage.clone())),
            chat: Rc::new(chat),
            store,
            repository,
            bus: event_bus,
            inbox: Inbox::default(),
            ctx: cc.egui_ctx.clone(),
            storage: storage.clone(),
            config: config.clone(),
        };

        let boot = Rc::new(RefCell::new(None));
        Self::restore(storage, tasks.repository.clone(), boot.clone(), cc.egui_ctx.clone());

        Self {
            ui_state: UiState::new(config.default_model),
            tasks,
            boot,
            ready: false,
            first_frame: true,
            font_loaded: Rc::new(RefCell::new(false)),
        }
    }

    /// Load config, conversations and session from storage (async)
    fn restore(
        storage: Rc<dyn StoragePort>,
        repository: ConversationRepository,
        slot: Rc<RefCell<Option<Boot>>>,
        ctx: egui::Context,
    ) {
        wasm_bindgen_futures::spawn_local(async move {
            let config = load_config(storage.as_ref()).await;
            let store = repository.load().await;
            let session = SessionContext::load(storage).await;
            *slot.borrow_mut() = Some(Boot { config, store, session });
            ctx.request_repaint();
        });
    }

    /// Swap the restored state in. The store keeps its Rc so the chat
    /// session (which holds a clone) sees the same conversations.
    fn install(&mut self, boot: Boot) {
        let Boot { config, store, session } = boot;

        *self.tasks.store.borrow_mut() = store;
        self.tasks.session = Rc::new(session);
        self.rebuild_adapters(config);
        self.ui_state.model = self.tasks.config.default_model.clone();

        if self.tasks.store.borrow().is_empty() {
            self.new_chat();
        }
        if self.tasks.session.is_authenticated() {
            self.refresh_profile();
        }
        self.ready = true;
        log::info!(
            "Ready: {} conversations, backend {}",
            self.tasks.store.borrow().len(),
            self.tasks.config.api_base
        );
    }

    fn rebuild_adapters(&mut self, config: ClientConfig) {
        self.tasks.backend = Rc::new(HttpBackend::new(config.clone()));
        self.tasks.completion = Rc::new(HttpCompletion::new(&config));
        self.tasks.config = config;
    }

    /// Fetch a CJK font and install it into egui
    fn load_cjk_font(ctx: egui::Context, loaded_flag: Rc<RefCell<bool>>) {
        wasm_bindgen_futures::spawn_local(async move {
            let bytes = match gloo_net::http::Request::get(FONT_URL).send().await {
                Ok(resp) if resp.ok() => match resp.binary().await {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        log::warn!("Failed to read CJK font: {}", e);
                        return;
                    }
                },
                Ok(resp) => {
                    log::warn!("CJK font not served (HTTP {})", resp.status());
                    return;
                }
                Err(e) => {
                    log::warn!("Failed to fetch CJK font: {}", e);
                    return;
                }
            };

            let mut fonts = egui::FontDefinitions::default();
            fonts.font_data.insert(
                "noto_sans_sc".to_owned(),
                egui::FontData::from_owned(bytes).into(),
            );
            fonts
                .families
                .entry(egui::FontFamily::Proportional)
                .or_default()
                .push("noto_sans_sc".to_owned());
            ctx.set_fonts(fonts);
            *loaded_flag.borrow_mut() = true;
            ctx.request_repaint();
            log::info!("CJK font loaded");
        });
    }

    fn new_chat(&mut self) {
        let conversation = Conversation::new("New chat", ChatType::Normal).with_icon(DEFAULT_BOT_ICON);
        self.tasks.store.borrow_mut().insert_front(conversation);
        self.tasks.spawn(Tasks::save_store);
    }

    /// Open a hidden file input; the picked image is uploaded in the background
    fn pick_avatar(&self) {
        let input = match gloo_utils::document()
            .create_element("input")
            .and_then(|el| el.dyn_into::<web_sys::HtmlInputElement>().map_err(JsValue::from))
        {
            Ok(input) => input,
            Err(e) => {
                log::error!("Cannot create file input: {:?}", e);
                return;
            }
        };
        input.set_type("file");
        input.set_accept("image/*");

        let tasks = self.tasks.clone();
        let input_ref = input.clone();
        let onchange = Closure::once(move |_event: web_sys::Event| {
            if let Some(file) = input_ref.files().and_then(|files| files.get(0)) {
                tasks.spawn(move |t| t.upload_avatar(file));
            }
        });
        input.set_onchange(Some(onchange.as_ref().unchecked_ref()));
        onchange.forget();
        input.click();
    }

    fn drain(&mut self, ctx: &egui::Context) {
        let loaded: Vec<_> = self.tasks.inbox.borrow_mut().drain(..).collect();
        for item in loaded {
            self.ui_state.apply_loaded(item);
        }

        let events = self.tasks.bus.drain();
        if !events.is_empty() {
            let now = ctx.input(|i| i.time);
            self.ui_state.process_events(events, now);
            ctx.request_repaint();
        }
        if !self.ui_state.streaming.is_empty() {
            self.ui_state.sync_streaming(&self.tasks.store.borrow());
        }

        if self.ui_state.session_dirty {
            self.ui_state.session_dirty = false;
            if !self.tasks.session.is_authenticated() {
                self.ui_state.reset_after_logout();
            }
        }
    }
}

impl eframe::App for AihubApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx);
            if !*self.font_loaded.borrow() {
                Self::load_cjk_font(ctx.clone(), self.font_loaded.clone());
            }
            self.first_frame = false;
        }

        if !self.ready {
            let restored = self.boot.borrow_mut().take();
            if let Some(boot) = restored {
                self.install(boot);
            }
        }

        self.drain(ctx);
        let now = ctx.input(|i| i.time);
        self.ui_state.prune_notices(now);
        if self.ui_state.is_busy() || !self.ui_state.notices.is_empty() {
            ctx.request_repaint();
        }

        let signed_in = self.tasks.session.is_authenticated();

        // ── Top bar ──────────────────────────────────────────
        TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(RichText::new("AI Hub").strong().color(theme::ACCENT).size(16.0));
                ui.separator();
                if signed_in {
                    for tab in Tab::all() {
                        if ui.selectable_label(self.ui_state.tab == tab, tab.label()).clicked() {
                            self.select_tab(tab);
                        }
                    }
                }
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if signed_in {
                        let user = self.tasks.session.user();
                        ui.label(RichText::new(user.nickname).color(theme::TEXT_SECONDARY));
                    }
                });
            });
        });

        // ── Main content ─────────────────────────────────────
        CentralPanel::default().show(ctx, |ui| {
            if !self.ready {
                ui.centered_and_justified(|ui| ui.spinner());
                return;
            }
            if !signed_in {
                if let Some(code) = login::login_panel(ui, &mut self.ui_state) {
                    self.tasks.spawn(move |t| t.login(code));
                }
                return;
            }

            match self.ui_state.tab {
                Tab::Chat => self.show_chat(ui),
                Tab::Roles => self.show_roles(ui, signed_in),
                Tab::Products => self.show_products(ui, signed_in),
                Tab::Profile => self.show_profile(ui, signed_in),
            }
        });

        self.show_notices(ctx);
    }
}

impl AihubApp {
    /// Switch tabs, loading the page's data the first time it is opened
    fn select_tab(&mut self, tab: Tab) {
        self.ui_state.tab = tab;
        match tab {
            Tab::Roles if self.ui_state.roles.is_empty() && !self.ui_state.roles_loading => {
                self.ui_state.roles_loading = true;
                self.tasks.spawn(Tasks::load_roles);
            }
            Tab::Products if self.ui_state.products.is_empty() && !self.ui_state.products_loading => {
                self.ui_state.products_loading = true;
                self.tasks.spawn(Tasks::load_products);
            }
            Tab::Profile if self.ui_state.profile.is_none() && !self.ui_state.profile_loading => {
                self.refresh_profile();
            }
            _ => {}
        }
    }

    fn refresh_profile(&mut self) {
        self.ui_state.profile_loading = true;
        self.ui_state.orders_loading = true;
        self.tasks.spawn(Tasks::refresh_profile);
    }

    fn show_chat(&mut self, ui: &mut egui::Ui) {
        let user = self.tasks.session.user();
        let action = {
            let store = self.tasks.store.borrow();
            chat::chat_panel(ui, &mut self.ui_state, &store, &user, &self.tasks.config)
        };

        if self.ui_state.model != self.tasks.config.default_model {
            self.tasks.config.default_model = self.ui_state.model.clone();
            let config = self.tasks.config.clone();
            self.tasks.spawn(move |t| t.save_config(config));
        }

        match action {
            ChatAction::None => {}
            ChatAction::Send(text) => {
                let selected = self.tasks.store.borrow().selected_id().map(str::to_string);
                if let Some(id) = selected {
                    let model = self.ui_state.model.clone();
                    self.tasks.spawn(move |t| t.send(id, text, model));
                }
            }
            ChatAction::NewChat => self.new_chat(),
            ChatAction::Select(id) => {
                self.tasks.store.borrow_mut().select(&id);
            }
            ChatAction::Delete(id) => {
                let removed = self.tasks.store.borrow_mut().remove(&id);
                self.ui_state.forget_conversation(&id);
                if removed.is_some() {
                    self.tasks.spawn(Tasks::save_store);
                }
            }
            ChatAction::ClearContext(id) => {
                let cleared = self.tasks.store.borrow_mut().clear_context(&id);
                match cleared {
                    Ok(()) => self.tasks.spawn(Tasks::save_store),
                    Err(e) => log::warn!("Clear context failed: {}", e),
                }
            }
        }
    }

    fn show_roles(&mut self, ui: &mut egui::Ui, signed_in: bool) {
        match roles::roles_panel(ui, &mut self.ui_state, signed_in) {
            RolesAction::None => {}
            RolesAction::Refresh => {
                self.ui_state.roles_loading = true;
                self.tasks.spawn(Tasks::load_roles);
            }
            RolesAction::ToggleLike(id) => {
                if let Some(card) = self.ui_state.roles.iter().find(|r| r.id == id).cloned() {
                    self.tasks.spawn(move |t| t.toggle_like(card));
                }
            }
            RolesAction::StartChat(id) => {
                if let Some(card) = self.ui_state.roles.iter().find(|r| r.id == id).cloned() {
                    self.ui_state.tab = Tab::Chat;
                    self.tasks.spawn(move |t| t.start_chat(card));
                }
            }
        }
    }

    fn show_products(&mut self, ui: &mut egui::Ui, signed_in: bool) {
        match products::products_panel(ui, &self.ui_state, signed_in) {
            ProductsAction::None => {}
            ProductsAction::Refresh => {
                self.ui_state.products_loading = true;
                self.tasks.spawn(Tasks::load_products);
            }
            ProductsAction::Buy(product_id) => {
                let product = self
                    .ui_state
                    .products
                    .iter()
                    .find(|p| p.product_id == product_id)
                    .cloned();
                if let Some(product) = product {
                    self.tasks.spawn(move |t| t.buy(product));
                }
            }
        }
    }

    fn show_profile(&mut self, ui: &mut egui::Ui, signed_in: bool) {
        let user = self.tasks.session.user();
        let stats = self.tasks.store.borrow().stats();
        match profile::profile_panel(ui, &mut self.ui_state, &user, stats, signed_in) {
            ProfileAction::None => {}
            ProfileAction::Refresh => self.refresh_profile(),
            ProfileAction::PickAvatar => self.pick_avatar(),
            ProfileAction::Rename(nickname) => self.tasks.spawn(move |t| t.rename(nickname)),
            ProfileAction::Pay(order_id) => {
                let form = self
                    .ui_state
                    .orders
                    .iter()
                    .find(|o| o.order_id == order_id)
                    .and_then(|o| o.pay_url.clone());
                if let Some(form) = form {
                    if let Err(e) = crate::tasks::submit_payment_form(&form) {
                        log::error!("Payment form could not be submitted: {:?}", e);
                    }
                }
            }
            ProfileAction::Logout => {
                self.tasks.spawn(Tasks::logout);
            }
        }
    }

    /// Toasts stacked in the top-right corner
    fn show_notices(&self, ctx: &egui::Context) {
        if self.ui_state.notices.is_empty() {
            return;
        }
        egui::Area::new(egui::Id::new("notices"))
            .anchor(Align2::RIGHT_TOP, egui::vec2(-12.0, 40.0))
            .show(ctx, |ui| {
                for notice in &self.ui_state.notices {
                    egui::Frame::default()
                        .fill(theme::BG_SECONDARY)
                        .stroke(egui::Stroke::new(1.0, theme::notice_color(notice.level)))
                        .corner_radius(theme::PANEL_ROUNDING)
                        .inner_margin(theme::PANEL_PADDING)
                        .show(ui, |ui| {
                            ui.label(RichText::new(&notice.text).color(theme::TEXT_PRIMARY));
                        });
                    ui.add_space(4.0);
                }
            });
    }
}
