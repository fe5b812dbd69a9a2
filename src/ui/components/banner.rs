//! Dismissible error strip

use crate::i18n::{tr, Language, Text};
use crate::ui::theme::Theme;
use egui::RichText;

/// Shows `message`; returns true when dismissed
pub fn banner(ui: &mut egui::Ui, theme: &Theme, language: Language, message: &str) -> bool {
    let mut dismissed = false;
    egui::Frame::none()
        .fill(theme.error.gamma_multiply(0.12))
        .stroke(egui::Stroke::new(1.0, theme.error))
        .rounding(theme.button_rounding)
        .inner_margin(egui::Margin::same(theme.spacing_sm))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new(message).color(theme.error));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    dismissed = ui.small_button(tr(language, Text::Dismiss)).clicked();
                });
            });
        });
    dismissed
}
