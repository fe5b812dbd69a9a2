//! Meal summary card with time-limited undo controls

use crate::api::{Meal, MealId};
use crate::i18n::{meal_type_label, tr, Language, Text};
use crate::ui::theme::Theme;
use crate::undo::{format_remaining, UndoAction, UndoView};
use egui::{RichText, Sense};

/// User intent on a meal
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MealAction {
    Open(MealId),
    /// Undo requested; still needs confirmation
    Request(MealId, UndoAction),
}

/// Accessibility label of a meal's undo button
pub fn undo_label(action: UndoAction, meal_id: MealId) -> String {
    match action {
        UndoAction::Revert => format!("Revert meal {}", meal_id),
        UndoAction::Delete => format!("Delete meal {}", meal_id),
    }
}

pub struct MealCard<'a> {
    meal: &'a Meal,
    undo: UndoView,
    theme: &'a Theme,
    language: Language,
}

impl<'a> MealCard<'a> {
    pub fn new(meal: &'a Meal, undo: UndoView, theme: &'a Theme, language: Language) -> Self {
        Self {
            meal,
            undo,
            theme,
            language,
        }
    }

    pub fn show(self, ui: &mut egui::Ui) -> Option<MealAction> {
        let mut action = None;
        let meal = self.meal;

        self.theme.card_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());

            ui.horizontal(|ui| {
                let local = meal.consumed_at.with_timezone(&chrono::Local);
                let title = ui
                    .add(
                        egui::Label::new(
                            RichText::new(meal_type_label(self.language, meal.meal_type))
                                .strong()
                                .color(self.theme.text_primary),
                        )
                        .sense(Sense::click()),
                    )
                    .on_hover_cursor(egui::CursorIcon::PointingHand);
                let open_label = format!("Meal {}", meal.id);
                title.widget_info(|| {
                    egui::WidgetInfo::labeled(egui::WidgetType::Button, true, &open_label)
                });
                if title.clicked() {
                    action = Some(MealAction::Open(meal.id));
                }
                ui.label(
                    RichText::new(local.format("%H:%M").to_string())
                        .color(self.theme.text_muted),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        RichText::new(format!("{:.0} kcal", meal.total_calories))
                            .strong()
                            .color(self.theme.calories),
                    );
                });
            });

            let names: Vec<&str> = meal.food_items.iter().map(|f| f.name.as_str()).collect();
            if !names.is_empty() {
                ui.label(RichText::new(names.join(", ")).color(self.theme.text_secondary));
            }

            ui.horizontal(|ui| {
                self.macro_chip(ui, Text::Protein, meal.total_protein, self.theme.protein);
                self.macro_chip(ui, Text::Carbs, meal.total_carbs, self.theme.carbs);
                self.macro_chip(ui, Text::Fat, meal.total_fat, self.theme.fat);
            });

            if self.undo.revert.is_some() || self.undo.delete.is_some() {
                ui.horizontal(|ui| {
                    for undo in [UndoAction::Revert, UndoAction::Delete] {
                        if let Some(requested) = self.undo_button(ui, undo) {
                            action = Some(requested);
                        }
                    }
                });
            }
        });

        action
    }

    fn macro_chip(&self, ui: &mut egui::Ui, text: Text, grams: f64, color: egui::Color32) {
        ui.label(
            RichText::new(format!("{} {:.0}g", tr(self.language, text), grams))
                .size(12.0)
                .color(color),
        );
    }

    fn undo_button(&self, ui: &mut egui::Ui, undo: UndoAction) -> Option<MealAction> {
        let remaining = self.undo.remaining(undo)?;
        let (text, color) = match undo {
            UndoAction::Revert => (Text::Revert, self.theme.warning),
            UndoAction::Delete => (Text::Delete, self.theme.error),
        };
        let caption = format!(
            "{} ({})",
            tr(self.language, text),
            format_remaining(remaining)
        );
        let response = ui.add(egui::Button::new(RichText::new(caption).size(12.0).color(color)).small());
        let label = undo_label(undo, self.meal.id);
        response.widget_info(|| egui::WidgetInfo::labeled(egui::WidgetType::Button, true, &label));
        response
            .clicked()
            .then_some(MealAction::Request(self.meal.id, undo))
    }
}
