//! Full breakdown of one meal

use super::charts::macro_split;
use super::meal_card::MealAction;
use crate::api::Meal;
use crate::i18n::{meal_type_label, tr, Language, Text};
use crate::ui::theme::Theme;
use crate::undo::{format_remaining, UndoAction, UndoView};
use egui::RichText;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DetailAction {
    Back,
    Meal(MealAction),
}

pub struct MealDetail<'a> {
    meal: &'a Meal,
    undo: UndoView,
    theme: &'a Theme,
    language: Language,
}

impl<'a> MealDetail<'a> {
    pub fn new(meal: &'a Meal, undo: UndoView, theme: &'a Theme, language: Language) -> Self {
        Self {
            meal,
            undo,
            theme,
            language,
        }
    }

    pub fn show(self, ui: &mut egui::Ui) -> Option<DetailAction> {
        let lang = self.language;
        let meal = self.meal;
        let mut action = None;

        if ui.button(format!("← {}", tr(lang, Text::Back))).clicked() {
            action = Some(DetailAction::Back);
        }

        let local = meal.consumed_at.with_timezone(&chrono::Local);
        ui.heading(meal_type_label(lang, meal.meal_type));
        let mut when = local.format("%Y-%m-%d %H:%M").to_string();
        if let Some(phrase) = &meal.time_reference {
            when.push_str(&format!(" · \"{}\"", phrase));
        }
        ui.label(RichText::new(when).color(self.theme.text_muted));

        ui.label(
            RichText::new(format!("{:.0} kcal", meal.total_calories))
                .size(24.0)
                .strong()
                .color(self.theme.calories),
        );
        macro_split(
            ui,
            self.theme,
            lang,
            meal.total_protein,
            meal.total_carbs,
            meal.total_fat,
        );

        ui.add_space(self.theme.spacing_sm);
        ui.label(RichText::new(tr(lang, Text::FoodItems)).strong());
        egui::Grid::new(("food_items", meal.id))
            .striped(true)
            .num_columns(6)
            .show(ui, |ui| {
                for item in &meal.food_items {
                    ui.vertical(|ui| {
                        ui.label(&item.name);
                        if let Some(en) = item.name_en.as_deref().filter(|en| *en != item.name) {
                            ui.label(RichText::new(en).size(11.0).color(self.theme.text_muted));
                        }
                    });
                    ui.label(item.portion());
                    ui.label(
                        RichText::new(format!("{:.0} kcal", item.calories))
                            .color(self.theme.calories),
                    );
                    ui.label(RichText::new(format!("P {:.0}g", item.protein)).color(self.theme.protein));
                    ui.label(RichText::new(format!("C {:.0}g", item.carbs)).color(self.theme.carbs));
                    ui.label(RichText::new(format!("F {:.0}g", item.fat)).color(self.theme.fat));
                    ui.end_row();
                }
            });

        if let Some(text) = meal.transcription() {
            ui.add_space(self.theme.spacing_sm);
            ui.label(RichText::new(tr(lang, Text::Transcription)).strong());
            self.theme.card_frame().show(ui, |ui| {
                ui.label(RichText::new(format!("\"{}\"", text)).italics());
            });
        }

        ui.add_space(self.theme.spacing_sm);
        ui.horizontal(|ui| {
            for undo in [UndoAction::Revert, UndoAction::Delete] {
                let Some(remaining) = self.undo.remaining(undo) else {
                    continue;
                };
                let text = match undo {
                    UndoAction::Revert => Text::Revert,
                    UndoAction::Delete => Text::Delete,
                };
                let caption = format!("{} ({})", tr(lang, text), format_remaining(remaining));
                if ui.button(caption).clicked() {
                    action = Some(DetailAction::Meal(MealAction::Request(meal.id, undo)));
                }
            }
        });

        action
    }
}
