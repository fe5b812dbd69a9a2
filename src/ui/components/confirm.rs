//! Confirmation dialog for revert and delete

use crate::api::MealId;
use crate::i18n::{tr, Language, Text};
use crate::ui::theme::Theme;
use crate::undo::UndoAction;
use egui::RichText;

/// Undo waiting for the user to confirm
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PendingUndo {
    pub meal_id: MealId,
    pub action: UndoAction,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfirmResult {
    Confirmed,
    Cancelled,
}

/// Show the modal window; `None` while the user has not decided
pub fn confirm_dialog(
    ctx: &egui::Context,
    theme: &Theme,
    language: Language,
    pending: PendingUndo,
) -> Option<ConfirmResult> {
    let (title, question, color) = match pending.action {
        UndoAction::Revert => (Text::Revert, Text::ConfirmRevert, theme.warning),
        UndoAction::Delete => (Text::Delete, Text::ConfirmDelete, theme.error),
    };
    let mut result = None;

    egui::Window::new(tr(language, title))
        .id(egui::Id::new(("confirm_undo", pending.meal_id)))
        .collapsible(false)
        .resizable(false)
        .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
        .show(ctx, |ui| {
            ui.label(tr(language, question));
            ui.add_space(theme.spacing_sm);
            ui.horizontal(|ui| {
                let confirm = ui.button(RichText::new(tr(language, Text::Confirm)).color(color));
                confirm.widget_info(|| {
                    egui::WidgetInfo::labeled(egui::WidgetType::Button, true, "Confirm")
                });
                if confirm.clicked() {
                    result = Some(ConfirmResult::Confirmed);
                }
                let cancel = ui.button(tr(language, Text::Cancel));
                cancel.widget_info(|| {
                    egui::WidgetInfo::labeled(egui::WidgetType::Button, true, "Cancel")
                });
                if cancel.clicked() {
                    result = Some(ConfirmResult::Cancelled);
                }
            });
        });

    if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
        result = result.or(Some(ConfirmResult::Cancelled));
    }
    result
}
