//! Modal dialog component for the GUI.
//!
//! A centered dialog over a semi-transparent backdrop with a title, a
//! message and a single dismiss button. Escape also dismisses it; clicks on
//! the backdrop are swallowed so the window behind stays inert.

use eframe::egui::{self, Color32, Key, Order, Pos2, RichText, Rounding, Sense, Stroke};

use crate::gui::theme::{colors, rounding, shadow, spacing};

/// Default width of the dialog.
const DIALOG_WIDTH: f32 = 420.0;

/// Padding inside the dialog.
const DIALOG_PADDING: f32 = spacing::XL;

/// Estimated dialog height, used for vertical centering.
const ESTIMATED_HEIGHT: f32 = 300.0;

const BUTTON_HEIGHT: f32 = 36.0;
const BUTTON_WIDTH: f32 = 140.0;

/// Backdrop opacity (0-255).
const BACKDROP_ALPHA: u8 = 128;

/// What the user did with the modal this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModalAction {
    /// Still open.
    None,
    /// Closed with the button or Escape.
    Dismissed,
}

impl ModalAction {
    pub fn is_dismissed(self) -> bool {
        matches!(self, ModalAction::Dismissed)
    }
}

#[derive(Debug, Clone)]
pub struct Modal {
    id: String,
    title: String,
    message: String,
    button_label: String,
    width: f32,
}

impl Modal {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: "modal".to_string(),
            title: title.into(),
            message: String::new(),
            button_label: "OK".to_string(),
            width: DIALOG_WIDTH,
        }
    }

    /// Set a unique ID, needed when more than one modal can be shown.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn button_label(mut self, label: impl Into<String>) -> Self {
        self.button_label = label.into();
        self
    }

    /// Render the modal and report whether it was dismissed.
    pub fn show(&self, ctx: &egui::Context) -> ModalAction {
        self.render_backdrop(ctx);
        let mut action = self.render_dialog(ctx);

        if ctx.input(|i| i.key_pressed(Key::Escape)) {
            action = ModalAction::Dismissed;
        }
        action
    }

    fn render_backdrop(&self, ctx: &egui::Context) {
        let screen_rect = ctx.screen_rect();

        egui::Area::new(egui::Id::new(format!("{}_backdrop", self.id)))
            .order(Order::Foreground)
            .fixed_pos(Pos2::ZERO)
            .show(ctx, |ui| {
                ui.painter().rect_filled(
                    screen_rect,
                    Rounding::ZERO,
                    Color32::from_rgba_unmultiplied(0, 0, 0, BACKDROP_ALPHA),
                );
                ui.allocate_exact_size(screen_rect.size(), Sense::click());
            });
    }

    fn render_dialog(&self, ctx: &egui::Context) -> ModalAction {
        let screen_rect = ctx.screen_rect();
        let pos = Pos2::new(
            ((screen_rect.width() - self.width) / 2.0).max(0.0),
            ((screen_rect.height() - ESTIMATED_HEIGHT) / 2.0).max(0.0),
        );
        let mut action = ModalAction::None;

        egui::Area::new(egui::Id::new(format!("{}_dialog", self.id)))
            .order(Order::Foreground)
            .fixed_pos(pos)
            .show(ctx, |ui| {
                egui::Frame::none()
                    .fill(colors::SURFACE)
                    .rounding(Rounding::same(rounding::CARD))
                    .shadow(shadow::elevated())
                    .stroke(Stroke::new(1.0, colors::BORDER))
                    .inner_margin(egui::Margin::same(DIALOG_PADDING))
                    .show(ui, |ui| {
                        let inner_width = self.width - 2.0 * DIALOG_PADDING;
                        ui.set_min_width(inner_width);
                        ui.set_max_width(inner_width);

                        ui.vertical_centered(|ui| {
                            ui.label(
                                RichText::new(&self.title)
                                    .size(20.0)
                                    .strong()
                                    .color(colors::TEXT_PRIMARY),
                            );
                            ui.add_space(spacing::MD);

                            if !self.message.is_empty() {
                                ui.label(
                                    RichText::new(&self.message).color(colors::TEXT_SECONDARY),
                                );
                            }
                            ui.add_space(spacing::XL);

                            let button = egui::Button::new(
                                RichText::new(&self.button_label).color(Color32::WHITE),
                            )
                            .fill(colors::ACCENT)
                            .rounding(Rounding::same(BUTTON_HEIGHT / 2.0));
                            if ui.add_sized([BUTTON_WIDTH, BUTTON_HEIGHT], button).clicked() {
                                action = ModalAction::Dismissed;
                            }
                        });
                    });
            });

        action
    }
}
