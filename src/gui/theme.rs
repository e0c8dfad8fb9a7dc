//! Theme and color system for the GUI.
//!
//! A light theme with semantic colors for run outcomes.

use eframe::egui::{self, Color32, Rounding, Stroke, Style, Visuals};

use crate::runner::RunOutcome;

/// Spacing scale for consistent layout throughout the application.
pub mod spacing {
    /// Extra small spacing (4px) - tight spacing between related elements.
    pub const XS: f32 = 4.0;

    /// Small spacing (8px) - standard spacing between related elements.
    pub const SM: f32 = 8.0;

    /// Medium spacing (12px) - spacing between sections within a component.
    pub const MD: f32 = 12.0;

    /// Standard spacing (16px) - panel padding.
    pub const LG: f32 = 16.0;

    /// Large spacing (24px) - spacing between major sections.
    pub const XL: f32 = 24.0;
}

/// Corner rounding values.
pub mod rounding {
    /// Rounding for cards, rows and dialogs (8px).
    pub const CARD: f32 = 8.0;

    /// Rounding for buttons and inputs (4px).
    pub const BUTTON: f32 = 4.0;
}

pub mod shadow {
    use super::Color32;
    use eframe::egui::Shadow;

    /// Shadow for modals and popovers.
    pub fn elevated() -> Shadow {
        Shadow {
            offset: [0.0, 4.0].into(),
            blur: 16.0,
            spread: 0.0,
            color: Color32::from_black_alpha(20),
        }
    }
}

/// Semantic color palette.
pub mod colors {
    use super::Color32;

    pub const BACKGROUND: Color32 = Color32::from_rgb(246, 246, 248);
    pub const SURFACE: Color32 = Color32::from_rgb(255, 255, 255);
    pub const SURFACE_HOVER: Color32 = Color32::from_rgb(240, 240, 242);
    pub const SURFACE_SELECTED: Color32 = Color32::from_rgb(232, 232, 237);

    /// Background of the output log.
    pub const LOG_BACKGROUND: Color32 = Color32::from_rgb(250, 250, 251);

    pub const TEXT_PRIMARY: Color32 = Color32::from_rgb(28, 28, 30);
    pub const TEXT_SECONDARY: Color32 = Color32::from_rgb(99, 99, 102);
    pub const TEXT_MUTED: Color32 = Color32::from_rgb(142, 142, 147);

    pub const BORDER: Color32 = Color32::from_rgb(229, 229, 234);
    pub const BORDER_FOCUSED: Color32 = Color32::from_rgb(199, 199, 204);
    pub const SEPARATOR: Color32 = Color32::from_rgb(229, 229, 234);

    /// Primary action color (Run Tests).
    pub const ACCENT: Color32 = Color32::from_rgb(0, 122, 255);
    pub const ACCENT_SUBTLE: Color32 = Color32::from_rgb(230, 244, 255);

    /// Destructive action color (Stop).
    pub const DESTRUCTIVE: Color32 = Color32::from_rgb(255, 59, 48);

    pub const STATUS_RUNNING: Color32 = Color32::from_rgb(0, 149, 255);
    pub const STATUS_SUCCESS: Color32 = Color32::from_rgb(52, 199, 89);
    pub const STATUS_WARNING: Color32 = Color32::from_rgb(255, 149, 0);
    pub const STATUS_ERROR: Color32 = Color32::from_rgb(255, 59, 48);

    pub const STATUS_SUCCESS_BG: Color32 = Color32::from_rgb(232, 250, 238);
    pub const STATUS_WARNING_BG: Color32 = Color32::from_rgb(255, 244, 230);
    pub const STATUS_ERROR_BG: Color32 = Color32::from_rgb(255, 235, 234);
}

/// Foreground color for a history row.
pub fn outcome_color(outcome: RunOutcome) -> Color32 {
    match outcome {
        RunOutcome::Success => colors::STATUS_SUCCESS,
        RunOutcome::Failure(_) => colors::STATUS_ERROR,
        RunOutcome::ToolNotFound => colors::STATUS_WARNING,
    }
}

/// Background tint for a history row.
pub fn outcome_background(outcome: RunOutcome) -> Color32 {
    match outcome {
        RunOutcome::Success => colors::STATUS_SUCCESS_BG,
        RunOutcome::Failure(_) => colors::STATUS_ERROR_BG,
        RunOutcome::ToolNotFound => colors::STATUS_WARNING_BG,
    }
}

/// Configure egui Visuals for the light theme.
pub fn configure_visuals() -> Visuals {
    let mut visuals = Visuals::light();

    visuals.window_fill = colors::SURFACE;
    visuals.panel_fill = colors::BACKGROUND;
    visuals.faint_bg_color = colors::SURFACE_HOVER;
    visuals.extreme_bg_color = colors::LOG_BACKGROUND;

    visuals.selection.bg_fill = colors::ACCENT_SUBTLE;
    visuals.selection.stroke = Stroke::new(1.0, colors::ACCENT);
    visuals.hyperlink_color = colors::ACCENT;

    visuals.window_shadow = shadow::elevated();
    visuals.window_stroke = Stroke::new(1.0, colors::BORDER);
    visuals.window_rounding = Rounding::same(rounding::CARD);
    visuals.menu_rounding = Rounding::same(rounding::BUTTON);

    let widgets = &mut visuals.widgets;
    widgets.noninteractive.bg_stroke = Stroke::new(1.0, colors::BORDER);
    widgets.noninteractive.fg_stroke = Stroke::new(1.0, colors::TEXT_PRIMARY);

    widgets.inactive.weak_bg_fill = colors::SURFACE;
    widgets.inactive.bg_stroke = Stroke::new(1.0, colors::BORDER);
    widgets.inactive.fg_stroke = Stroke::new(1.0, colors::TEXT_PRIMARY);
    widgets.inactive.rounding = Rounding::same(rounding::BUTTON);

    widgets.hovered.weak_bg_fill = colors::SURFACE_HOVER;
    widgets.hovered.bg_stroke = Stroke::new(1.0, colors::BORDER_FOCUSED);
    widgets.hovered.rounding = Rounding::same(rounding::BUTTON);

    widgets.active.weak_bg_fill = colors::SURFACE_SELECTED;
    widgets.active.bg_stroke = Stroke::new(1.0, colors::ACCENT);
    widgets.active.rounding = Rounding::same(rounding::BUTTON);

    visuals
}

/// Configure the egui Style with the spacing scale.
pub fn configure_style() -> Style {
    let mut style = Style {
        visuals: configure_visuals(),
        ..Default::default()
    };
    style.spacing.item_spacing = egui::vec2(spacing::SM, spacing::XS);
    style.spacing.button_padding = egui::vec2(spacing::MD, 6.0);
    style.spacing.window_margin = egui::Margin::same(spacing::LG);
    style.interaction.selectable_labels = true;
    style.interaction.multi_widget_text_select = true;
    style
}

/// Apply the theme. Call once from the eframe creation callback.
pub fn init(ctx: &egui::Context) {
    ctx.set_style(configure_style());
}
