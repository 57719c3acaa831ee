//! Chat list sidebar.

use egui::{self, Align, Layout, RichText, ScrollArea};
use chat_types::chat::Chat;
use crate::state::{UiAction, UiState};
use crate::theme::*;

/// Render the sidebar. Returns `SelectChat` when a row is clicked.
pub fn chat_list_panel(
    ui: &mut egui::Ui,
    state: &mut UiState,
    chats: &[Chat],
    current_id: Option<&str>,
    loading: bool,
) -> Option<UiAction> {
    let mut action = None;

    ui.horizontal(|ui| {
        ui.heading(RichText::new("Chats").color(TEXT_PRIMARY).strong());
        ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
            if ui
                .add(
                    egui::Button::new(RichText::new("+ New").color(TEXT_PRIMARY))
                        .fill(ACCENT)
                        .corner_radius(PANEL_ROUNDING),
                )
                .clicked()
            {
                state.open_new_chat();
            }
        });
    });
    ui.separator();

    if let Some(error) = &state.list_error {
        ui.label(RichText::new(error).color(ERROR).small());
    }

    if chats.is_empty() {
        let text = if loading { "Loading chats..." } else { "No chats yet" };
        ui.label(RichText::new(text).color(TEXT_SECONDARY));
        return action;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for chat in chats {
                let selected = current_id == Some(chat.id.as_str());
                let text = RichText::new(&chat.title).color(if selected { TEXT_PRIMARY } else { TEXT_SECONDARY });
                let response = ui.selectable_label(selected, text);
                ui.label(
                    RichText::new(chat.updated_at.format("%b %-d, %Y").to_string())
                        .color(TEXT_SECONDARY)
                        .small(),
                );
                if response.clicked() && !selected {
                    action = Some(UiAction::SelectChat(chat.clone()));
                }
                ui.add_space(2.0);
            }
        });

    action
}
