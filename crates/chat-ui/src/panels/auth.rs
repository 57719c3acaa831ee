//! Sign-in / sign-up screen shown while signed out.

use egui::{self, Align, Layout, RichText, Vec2};
use crate::state::{AuthMode, UiAction, UiState};
use crate::theme::*;

/// Render the auth screen. Returns an action when the form is submitted.
pub fn auth_screen(ui: &mut egui::Ui, state: &mut UiState, restoring: bool) -> Option<UiAction> {
    let mut action = None;

    ui.with_layout(Layout::top_down(Align::Center), |ui| {
        ui.add_space(ui.available_height() * 0.2);
        ui.heading(RichText::new("Textify Chatbot").color(TEXT_PRIMARY).strong());
        ui.add_space(12.0);

        if restoring {
            ui.spinner();
            ui.label(RichText::new("Restoring session...").color(TEXT_SECONDARY));
            return;
        }

        egui::Frame::default()
            .fill(BG_SECONDARY)
            .corner_radius(PANEL_ROUNDING)
            .inner_margin(16.0)
            .show(ui, |ui| {
                ui.set_max_width(320.0);
                let title = match state.auth.mode {
                    AuthMode::SignIn => "Sign in to your account",
                    AuthMode::SignUp => "Create an account",
                };
                ui.label(RichText::new(title).color(TEXT_PRIMARY).strong());
                ui.add_space(8.0);

                ui.add(
                    egui::TextEdit::singleline(&mut state.auth.email)
                        .hint_text("Email address")
                        .desired_width(f32::INFINITY),
                );
                let password = ui.add(
                    egui::TextEdit::singleline(&mut state.auth.password)
                        .hint_text("Password")
                        .password(true)
                        .desired_width(f32::INFINITY),
                );

                if let Some(error) = &state.auth.error {
                    ui.label(RichText::new(error).color(ERROR).small());
                }
                if let Some(notice) = &state.auth.notice {
                    ui.label(RichText::new(notice).color(SUCCESS).small());
                }

                ui.add_space(8.0);
                let label = match (state.auth.mode, state.auth.busy) {
                    (AuthMode::SignIn, false) => "Sign in",
                    (AuthMode::SignIn, true) => "Signing in...",
                    (AuthMode::SignUp, false) => "Sign up",
                    (AuthMode::SignUp, true) => "Signing up...",
                };
                let enabled = state.can_submit_auth();
                let submit = ui.add_enabled(
                    enabled,
                    egui::Button::new(RichText::new(label).color(TEXT_PRIMARY))
                        .fill(if enabled { ACCENT } else { BG_SURFACE })
                        .corner_radius(PANEL_ROUNDING)
                        .min_size(Vec2::new(ui.available_width(), 28.0)),
                );
                let entered = password.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
                if submit.clicked() || entered {
                    action = state.begin_auth();
                }

                ui.add_space(4.0);
                let toggle = match state.auth.mode {
                    AuthMode::SignIn => "Don't have an account? Sign up",
                    AuthMode::SignUp => "Already have an account? Sign in",
                };
                if ui
                    .add_enabled(!state.auth.busy, egui::Button::new(RichText::new(toggle).small()).frame(false))
                    .clicked()
                {
                    state.toggle_auth_mode();
                }
            });
    });

    action
}
