//! Colors and spacing for the chat client.

use egui::{Color32, CornerRadius, Margin, Stroke, Vec2};

// Surfaces, darkest first
pub const BG_PRIMARY: Color32 = Color32::from_rgb(17, 24, 39);
pub const BG_SECONDARY: Color32 = Color32::from_rgb(31, 41, 55);
pub const BG_SURFACE: Color32 = Color32::from_rgb(55, 65, 81);

pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(243, 244, 246);
pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(156, 163, 175);

pub const ACCENT: Color32 = Color32::from_rgb(20, 184, 166);
pub const SUCCESS: Color32 = Color32::from_rgb(74, 222, 128);
pub const ERROR: Color32 = Color32::from_rgb(248, 113, 113);
pub const WARNING: Color32 = Color32::from_rgb(251, 191, 36);

pub const USER_BUBBLE: Color32 = Color32::from_rgb(13, 148, 136);
pub const ASSISTANT_BUBBLE: Color32 = BG_SURFACE;

pub const PANEL_ROUNDING: CornerRadius = CornerRadius::same(10);
pub const PANEL_PADDING: Vec2 = Vec2::new(14.0, 10.0);
/// Share of the thread width a bubble may take
pub const BUBBLE_MAX_WIDTH: f32 = 0.7;

pub fn apply_theme(ctx: &egui::Context) {
    ctx.style_mut(|style| {
        let visuals = &mut style.visuals;
        visuals.dark_mode = true;
        visuals.panel_fill = BG_PRIMARY;
        visuals.window_fill = BG_SECONDARY;
        visuals.window_corner_radius = PANEL_ROUNDING;
        visuals.window_stroke = Stroke::new(1.0, BG_SURFACE);
        // text edits
        visuals.extreme_bg_color = BG_SECONDARY;
        visuals.hyperlink_color = ACCENT;
        visuals.error_fg_color = ERROR;
        visuals.warn_fg_color = WARNING;

        for widget in [
            &mut visuals.widgets.inactive,
            &mut visuals.widgets.hovered,
            &mut visuals.widgets.active,
        ] {
            widget.corner_radius = CornerRadius::same(6);
            widget.fg_stroke = Stroke::new(1.0, TEXT_PRIMARY);
        }
        visuals.widgets.inactive.weak_bg_fill = BG_SURFACE;
        visuals.widgets.hovered.weak_bg_fill = BG_SURFACE.gamma_multiply(1.2);
        visuals.widgets.active.weak_bg_fill = ACCENT;
        visuals.selection.bg_fill = ACCENT.gamma_multiply(0.35);
        visuals.selection.stroke = Stroke::new(1.0, ACCENT);

        style.spacing.item_spacing = Vec2::new(8.0, 8.0);
        style.spacing.window_margin = Margin::same(16);
    });
}
