//! Landing view: today, the last week, recent meals

use super::charts::{calorie_columns, macro_split};
use super::meal_card::{MealAction, MealCard};
use crate::api::MealId;
use crate::i18n::{tr, Language, Text};
use crate::state::StatsState;
use crate::ui::theme::Theme;
use crate::undo::UndoView;
use egui::RichText;

pub struct DashboardView<'a> {
    stats: &'a StatsState,
    theme: &'a Theme,
    language: Language,
}

impl<'a> DashboardView<'a> {
    pub fn new(stats: &'a StatsState, theme: &'a Theme, language: Language) -> Self {
        Self {
            stats,
            theme,
            language,
        }
    }

    /// `undo` gives the current undo view for a meal id
    pub fn show(
        self,
        ui: &mut egui::Ui,
        undo: impl Fn(MealId) -> UndoView,
    ) -> Option<MealAction> {
        let lang = self.language;
        let Some(dashboard) = &self.stats.dashboard else {
            if self.stats.loading {
                ui.spinner();
                ui.label(tr(lang, Text::Loading));
            } else if let Some(error) = &self.stats.error {
                ui.label(RichText::new(error).color(self.theme.error));
            }
            return None;
        };

        let mut action = None;

        self.theme.card_frame().show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.heading(tr(lang, Text::Today));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if dashboard.streak_days > 0 {
                        ui.label(
                            RichText::new(format!(
                                "{} {}",
                                dashboard.streak_days,
                                tr(lang, Text::StreakDays)
                            ))
                            .color(self.theme.success),
                        );
                    }
                });
            });

            let today = &dashboard.today;
            let calories = match dashboard.daily_calorie_goal {
                Some(goal) => format!("{:.0} / {:.0} kcal", today.total_calories, goal),
                None => format!("{:.0} kcal", today.total_calories),
            };
            ui.label(
                RichText::new(calories)
                    .size(28.0)
                    .strong()
                    .color(self.theme.calories),
            );
            ui.label(
                RichText::new(format!("{} {}", today.meal_count, tr(lang, Text::Meals)))
                    .color(self.theme.text_muted),
            );
            macro_split(
                ui,
                self.theme,
                lang,
                today.total_protein,
                today.total_carbs,
                today.total_fat,
            );
        });

        if !dashboard.last_7_days.is_empty() {
            ui.add_space(self.theme.spacing_sm);
            self.theme.card_frame().show(ui, |ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(tr(lang, Text::Last7Days)).strong());
                calorie_columns(
                    ui,
                    self.theme,
                    &dashboard.last_7_days,
                    dashboard.daily_calorie_goal,
                );
            });
        }

        ui.add_space(self.theme.spacing_sm);
        ui.label(RichText::new(tr(lang, Text::RecentMeals)).strong());
        if dashboard.recent_meals.is_empty() {
            ui.label(RichText::new(tr(lang, Text::NoMeals)).color(self.theme.text_muted));
        }
        for meal in &dashboard.recent_meals {
            if let Some(a) = MealCard::new(meal, undo(meal.id), self.theme, lang).show(ui) {
                action = Some(a);
            }
        }

        action
    }
}
