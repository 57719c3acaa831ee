//! "New Chat" modal.

use egui::{self, Align2, RichText};
use crate::state::{UiAction, UiState};
use crate::theme::*;

/// Render the modal while open. Returns `CreateChat` on submit.
pub fn new_chat_modal(ctx: &egui::Context, state: &mut UiState) -> Option<UiAction> {
    if !state.new_chat.open {
        return None;
    }
    let mut action = None;
    let mut cancelled = false;

    egui::Window::new("New Chat")
        .collapsible(false)
        .resizable(false)
        .anchor(Align2::CENTER_CENTER, [0.0, 0.0])
        .show(ctx, |ui| {
            let input = ui.add(
                egui::TextEdit::singleline(&mut state.new_chat.title)
                    .hint_text("Chat title")
                    .desired_width(280.0),
            );
            if let Some(error) = &state.new_chat.error {
                ui.label(RichText::new(error).color(ERROR).small());
            }

            ui.horizontal(|ui| {
                let enabled = state.can_create();
                let label = if state.new_chat.creating { "Creating..." } else { "Create" };
                let create = ui.add_enabled(
                    enabled,
                    egui::Button::new(RichText::new(label).color(TEXT_PRIMARY))
                        .fill(if enabled { ACCENT } else { BG_SURFACE })
                        .corner_radius(PANEL_ROUNDING),
                );
                let entered = input.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if create.clicked() || entered {
                    action = state.begin_create();
                }
                if ui
                    .add_enabled(!state.new_chat.creating, egui::Button::new("Cancel"))
                    .clicked()
                {
                    cancelled = true;
                }
            });
        });

    if cancelled {
        state.close_new_chat();
    }
    action
}
