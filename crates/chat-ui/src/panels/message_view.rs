//! Message thread of the current chat plus the composer.

use egui::{self, Align, Layout, RichText, ScrollArea, Vec2};
use chat_types::chat::{Chat, Message};
use crate::state::{UiAction, UiState};
use crate::theme::*;

/// Render the thread. Returns `SendMessage` when the composer is submitted.
pub fn message_view(
    ui: &mut egui::Ui,
    state: &mut UiState,
    current: Option<&Chat>,
    messages: &[Message],
    awaiting: bool,
) -> Option<UiAction> {
    let Some(chat) = current else {
        welcome(ui);
        return None;
    };
    let mut action = None;

    egui::Frame::default()
        .fill(BG_PRIMARY)
        .inner_margin(PANEL_PADDING)
        .show(ui, |ui| {
            ui.heading(RichText::new(&chat.title).color(TEXT_PRIMARY).strong());
            ui.separator();

            if let Some(error) = &state.feed_error {
                ui.label(RichText::new(error).color(WARNING).small());
            }

            let available_height = ui.available_height() - 70.0;
            ScrollArea::vertical()
                .max_height(available_height)
                .auto_shrink([false, false])
                .stick_to_bottom(true)
                .show(ui, |ui| {
                    if awaiting && messages.is_empty() {
                        ui.horizontal(|ui| {
                            ui.spinner();
                            ui.label(RichText::new("Loading messages...").color(TEXT_SECONDARY));
                        });
                    } else if messages.is_empty() {
                        ui.vertical_centered(|ui| {
                            ui.add_space(24.0);
                            ui.label(
                                RichText::new("No messages yet. Start the conversation!")
                                    .color(TEXT_SECONDARY),
                            );
                        });
                    }
                    for message in messages {
                        render_message(ui, message);
                        ui.add_space(4.0);
                    }
                });

            ui.add_space(8.0);
            action = composer(ui, state, &chat.id);
        });

    action
}

fn composer(ui: &mut egui::Ui, state: &mut UiState, chat_id: &str) -> Option<UiAction> {
    let mut action = None;

    if let Some(error) = &state.composer.error {
        ui.label(RichText::new(error).color(ERROR).small());
    }

    ui.horizontal(|ui| {
        let input = egui::TextEdit::singleline(&mut state.composer.text)
            .hint_text("Type your message...")
            .desired_width(ui.available_width() - 80.0)
            .interactive(!state.composer.sending)
            .font(egui::FontId::proportional(14.0));
        let response = ui.add(input);

        let enabled = state.can_send();
        let label = if state.composer.sending { "Sending..." } else { "Send" };
        let send = ui.add_enabled(
            enabled,
            egui::Button::new(RichText::new(label).color(TEXT_PRIMARY))
                .fill(if enabled { ACCENT } else { BG_SURFACE })
                .corner_radius(PANEL_ROUNDING)
                .min_size(Vec2::new(70.0, 0.0)),
        );

        let entered = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if send.clicked() || entered {
            action = state.begin_send(chat_id);
            response.request_focus();
        }
    });

    action
}

fn render_message(ui: &mut egui::Ui, message: &Message) {
    let (layout, fill) = if message.is_assistant() {
        (Layout::left_to_right(Align::Min), ASSISTANT_BUBBLE)
    } else {
        (Layout::right_to_left(Align::Min), USER_BUBBLE)
    };
    let max_width = ui.available_width() * BUBBLE_MAX_WIDTH;

    ui.with_layout(layout, |ui| {
        egui::Frame::default()
            .fill(fill)
            .corner_radius(PANEL_ROUNDING)
            .inner_margin(8.0)
            .show(ui, |ui| {
                ui.set_max_width(max_width);
                ui.vertical(|ui| {
                    ui.label(
                        RichText::new(message.role.label())
                            .color(if message.is_assistant() { SUCCESS } else { TEXT_PRIMARY })
                            .strong()
                            .small(),
                    );
                    ui.label(RichText::new(&message.content).color(TEXT_PRIMARY));
                    ui.label(
                        RichText::new(message.created_at.format("%H:%M").to_string())
                            .color(TEXT_SECONDARY)
                            .small(),
                    );
                });
            });
    });
}

fn welcome(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.add_space(ui.available_height() * 0.3);
        ui.heading(RichText::new("Welcome to Textify Chatbot").color(TEXT_PRIMARY));
        ui.label(
            RichText::new("Select a chat or create a new one to get started.")
                .color(TEXT_SECONDARY),
        );
    });
}
