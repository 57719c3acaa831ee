//! Main egui application: composes the panels and dispatches user actions.

use std::rc::Rc;
use std::time::Duration;

use egui::{self, Align, CentralPanel, Layout, RichText, SidePanel, TopBottomPanel};

use chat_core::auth::{AuthGate, AuthStatus};
use chat_core::event_bus::EventBus;
use chat_core::store::ChatStore;
use chat_platform::auth::NhostAuth;
use chat_platform::backend::HasuraBackend;
use chat_platform::graphql::TokenProvider;
use chat_platform::spawn::{WasmSpawner, WasmTimer};
use chat_platform::storage::auto_detect_storage;
use chat_types::{config::ClientConfig, event::StoreEvent};
use chat_ui::panels::{auth, chat_list, message_view, new_chat};
use chat_ui::state::{UiAction, UiState};
use chat_ui::theme;

/// Async results land between frames; poll the bus at least this often.
const POLL_INTERVAL: Duration = Duration::from_millis(250);

/// The main application state
pub struct ChatApp {
    ui_state: UiState,
    event_bus: EventBus,
    auth: AuthGate,
    store: ChatStore,
    first_frame: bool,
}

impl ChatApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        let config = ClientConfig::from_build_env();
        log::info!(
            "GraphQL endpoint: {} (live: {}), auth: {}",
            config.graphql_url,
            config.graphql_ws_url,
            config.auth_url
        );

        let event_bus = EventBus::new();
        let storage = auto_detect_storage();
        let auth = AuthGate::new(
            Rc::new(NhostAuth::new(config.auth_url.clone())),
            storage,
            event_bus.clone(),
        )
        .with_auto_refresh(Rc::new(WasmSpawner), Rc::new(WasmTimer));

        let token: TokenProvider = {
            let gate = auth.clone();
            Rc::new(move || gate.access_token())
        };
        let store = ChatStore::new(
            Rc::new(HasuraBackend::new(&config, token)),
            Rc::new(WasmSpawner),
            event_bus.clone(),
        );

        Self::restore_session(auth.clone(), cc.egui_ctx.clone());

        Self {
            ui_state: UiState::new(),
            event_bus,
            auth,
            store,
            first_frame: true,
        }
    }

    /// Restore the persisted session (async)
    fn restore_session(auth: AuthGate, ctx: egui::Context) {
        wasm_bindgen_futures::spawn_local(async move {
            match auth.restore().await {
                Some(user) => log::info!("Welcome back, {}", user.email),
                None => log::info!("No stored session"),
            }
            ctx.request_repaint();
        });
    }

    /// Owner changes are applied before the UI sees the events.
    fn sync_owner(&self, events: &[StoreEvent]) {
        for event in events {
            if let StoreEvent::AuthChanged { user_id } = event {
                self.store.set_owner(user_id.clone());
                if user_id.is_some() {
                    self.store.refresh_chats();
                }
            }
        }
    }

    fn dispatch(&self, action: UiAction, ctx: &egui::Context) {
        log::debug!("Dispatching {:?}", action);
        let ctx = ctx.clone();
        // Outcomes reach the UI through the event bus
        match action {
            UiAction::SelectChat(chat) => self.store.select_chat(chat),
            UiAction::CreateChat { title } => {
                let store = self.store.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let _ = store.create_chat(&title).await;
                    ctx.request_repaint();
                });
            }
            UiAction::SendMessage { chat_id, content } => {
                let store = self.store.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let _ = store.send_message(&chat_id, &content).await;
                    ctx.request_repaint();
                });
            }
            UiAction::SignIn { email, password } => {
                let auth = self.auth.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let _ = auth.sign_in(&email, &password).await;
                    ctx.request_repaint();
                });
            }
            UiAction::SignUp { email, password } => {
                let auth = self.auth.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let _ = auth.sign_up(&email, &password).await;
                    ctx.request_repaint();
                });
            }
            UiAction::SignOut => {
                let auth = self.auth.clone();
                wasm_bindgen_futures::spawn_local(async move {
                    let _ = auth.sign_out().await;
                    ctx.request_repaint();
                });
            }
        }
    }

    fn top_bar(&self, ctx: &egui::Context) -> Option<UiAction> {
        let mut action = None;
        TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(
                    RichText::new("Textify Chatbot")
                        .strong()
                        .color(theme::ACCENT)
                        .size(16.0),
                );
                ui.separator();
                ui.label(
                    RichText::new(&self.ui_state.status_text)
                        .color(theme::TEXT_SECONDARY)
                        .small(),
                );
                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    if ui.button("Sign out").clicked() {
                        action = Some(UiAction::SignOut);
                    }
                    if let Some(user) = self.auth.current_user() {
                        ui.label(RichText::new(user.email).color(theme::TEXT_SECONDARY));
                    }
                });
            });
        });
        action
    }
}

impl eframe::App for ChatApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.first_frame {
            theme::apply_theme(ctx);
            self.first_frame = false;
        }

        let events = self.event_bus.drain();
        if !events.is_empty() {
            self.sync_owner(&events);
            self.ui_state.process_events(events);
            ctx.request_repaint();
        }
        ctx.request_repaint_after(POLL_INTERVAL);

        let mut actions: Vec<UiAction> = Vec::new();

        if !self.auth.is_authenticated() {
            let restoring = self.auth.status() == AuthStatus::Restoring;
            CentralPanel::default().show(ctx, |ui| {
                actions.extend(auth::auth_screen(ui, &mut self.ui_state, restoring));
            });
        } else {
            actions.extend(self.top_bar(ctx));

            let chats = self.store.chats();
            let current = self.store.current_chat();
            let current_id = current.as_ref().map(|c| c.id.as_str());

            SidePanel::left("chat_list")
                .min_width(220.0)
                .max_width(320.0)
                .show(ctx, |ui| {
                    actions.extend(chat_list::chat_list_panel(
                        ui,
                        &mut self.ui_state,
                        &chats,
                        current_id,
                        self.store.is_list_loading(),
                    ));
                });

            let messages = self.store.messages();
            CentralPanel::default().show(ctx, |ui| {
                actions.extend(message_view::message_view(
                    ui,
                    &mut self.ui_state,
                    current.as_ref(),
                    &messages,
                    self.store.is_awaiting_messages(),
                ));
            });

            actions.extend(new_chat::new_chat_modal(ctx, &mut self.ui_state));
        }

        for action in actions {
            self.dispatch(action, ctx);
        }
    }
}
