//! Meals by day, week or month

use super::charts::{calorie_columns, macro_split};
use super::meal_card::{MealAction, MealCard};
use crate::api::{Meal, MealFilter, MealId};
use crate::i18n::{tr, Language, Text};
use crate::state::{AppCommand, MealsState, StatsState};
use crate::ui::theme::Theme;
use crate::undo::UndoView;
use chrono::{Datelike, Duration, Local, Months, NaiveDate};
use egui::RichText;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Period {
    #[default]
    Day,
    Week,
    Month,
}

/// Which slice of history the timeline shows
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimelineView {
    pub period: Period,
    /// Any day inside the shown period
    pub anchor: NaiveDate,
}

impl Default for TimelineView {
    fn default() -> Self {
        Self::today(Period::Day)
    }
}

impl TimelineView {
    pub fn today(period: Period) -> Self {
        Self {
            period,
            anchor: Local::now().date_naive(),
        }
    }

    /// Monday of the anchor's week
    pub fn week_start(&self) -> NaiveDate {
        self.anchor - Duration::days(self.anchor.weekday().num_days_from_monday() as i64)
    }

    pub fn filter(&self) -> MealFilter {
        match self.period {
            Period::Day => MealFilter::Date(self.anchor),
            Period::Week => MealFilter::Week(self.week_start()),
            Period::Month => MealFilter::Month {
                year: self.anchor.year(),
                month: self.anchor.month(),
            },
        }
    }

    /// Stats request matching the period
    pub fn stats_command(&self) -> AppCommand {
        match self.period {
            Period::Day => AppCommand::LoadDailyStats(self.anchor),
            Period::Week => AppCommand::LoadWeeklyStats(self.week_start()),
            Period::Month => AppCommand::LoadMonthlyStats {
                year: self.anchor.year(),
                month: self.anchor.month(),
            },
        }
    }

    /// Move by whole periods, backwards for negative `steps`
    pub fn shift(&self, steps: i32) -> Self {
        let anchor = match self.period {
            Period::Day => self.anchor + Duration::days(steps as i64),
            Period::Week => self.anchor + Duration::weeks(steps as i64),
            Period::Month => {
                let months = Months::new(steps.unsigned_abs());
                let moved = if steps >= 0 {
                    self.anchor.checked_add_months(months)
                } else {
                    self.anchor.checked_sub_months(months)
                };
                moved.unwrap_or(self.anchor)
            }
        };
        Self { anchor, ..*self }
    }

    pub fn with_period(&self, period: Period) -> Self {
        Self { period, ..*self }
    }

    pub fn title(&self) -> String {
        match self.period {
            Period::Day => self.anchor.format("%Y-%m-%d (%a)").to_string(),
            Period::Week => {
                let start = self.week_start();
                let end = start + Duration::days(6);
                format!("{} – {}", start.format("%m/%d"), end.format("%m/%d"))
            }
            Period::Month => self.anchor.format("%Y-%m").to_string(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TimelineAction {
    Navigate(TimelineView),
    Meal(MealAction),
}

/// Group meals by local calendar day, newest day first
pub fn group_by_day<'m>(meals: &'m [Meal]) -> Vec<(NaiveDate, Vec<&'m Meal>)> {
    let mut groups: Vec<(NaiveDate, Vec<&Meal>)> = Vec::new();
    let mut sorted: Vec<&Meal> = meals.iter().collect();
    sorted.sort_by(|a, b| b.consumed_at.cmp(&a.consumed_at));

    for meal in sorted {
        let day = meal.consumed_at.with_timezone(&Local).date_naive();
        match groups.last_mut() {
            Some((current, list)) if *current == day => list.push(meal),
            _ => groups.push((day, vec![meal])),
        }
    }
    groups
}

pub struct Timeline<'a> {
    view: TimelineView,
    meals: &'a MealsState,
    stats: &'a StatsState,
    theme: &'a Theme,
    language: Language,
}

impl<'a> Timeline<'a> {
    pub fn new(
        view: TimelineView,
        meals: &'a MealsState,
        stats: &'a StatsState,
        theme: &'a Theme,
        language: Language,
    ) -> Self {
        Self {
            view,
            meals,
            stats,
            theme,
            language,
        }
    }

    pub fn show(
        self,
        ui: &mut egui::Ui,
        undo: impl Fn(MealId) -> UndoView,
    ) -> Option<TimelineAction> {
        let lang = self.language;
        let mut action = None;

        ui.horizontal(|ui| {
            for (period, text) in [
                (Period::Day, Text::Day),
                (Period::Week, Text::Week),
                (Period::Month, Text::Month),
            ] {
                if ui
                    .selectable_label(self.view.period == period, tr(lang, text))
                    .clicked()
                    && self.view.period != period
                {
                    action = Some(TimelineAction::Navigate(self.view.with_period(period)));
                }
            }
        });

        ui.horizontal(|ui| {
            if ui.button(tr(lang, Text::Previous)).clicked() {
                action = Some(TimelineAction::Navigate(self.view.shift(-1)));
            }
            ui.label(RichText::new(self.view.title()).strong());
            if ui.button(tr(lang, Text::Next)).clicked() {
                action = Some(TimelineAction::Navigate(self.view.shift(1)));
            }
        });

        self.summary(ui);
        ui.add_space(self.theme.spacing_sm);

        if self.meals.loading && self.meals.items.is_empty() {
            ui.spinner();
            return action;
        }
        if let Some(error) = &self.meals.error {
            ui.label(RichText::new(error).color(self.theme.error));
        }
        if self.meals.items.is_empty() {
            ui.label(RichText::new(tr(lang, Text::NoMeals)).color(self.theme.text_muted));
        }

        for (day, meals) in group_by_day(&self.meals.items) {
            if self.view.period != Period::Day {
                ui.label(
                    RichText::new(day.format("%a %m/%d").to_string())
                        .color(self.theme.text_muted),
                );
            }
            for meal in meals {
                if let Some(a) = MealCard::new(meal, undo(meal.id), self.theme, lang).show(ui) {
                    action = Some(TimelineAction::Meal(a));
                }
            }
        }

        action
    }

    fn summary(&self, ui: &mut egui::Ui) {
        let lang = self.language;
        match self.view.period {
            Period::Day => {
                let Some(daily) = self.stats.daily.as_ref().filter(|d| d.date == Some(self.view.anchor)) else {
                    return;
                };
                ui.label(
                    RichText::new(format!("{:.0} kcal", daily.total_calories))
                        .size(20.0)
                        .color(self.theme.calories),
                );
                macro_split(
                    ui,
                    self.theme,
                    lang,
                    daily.total_protein,
                    daily.total_carbs,
                    daily.total_fat,
                );
            }
            Period::Week => {
                let Some(weekly) = &self.stats.weekly else {
                    return;
                };
                ui.label(
                    RichText::new(format!(
                        "{:.0} kcal · ⌀ {:.0}",
                        weekly.total_calories, weekly.average_calories
                    ))
                    .color(self.theme.calories),
                );
                calorie_columns(ui, self.theme, &weekly.days, None);
            }
            Period::Month => {
                let Some(monthly) = &self.stats.monthly else {
                    return;
                };
                ui.label(
                    RichText::new(format!(
                        "{:.0} kcal · ⌀ {:.0}",
                        monthly.total_calories, monthly.average_calories
                    ))
                    .color(self.theme.calories),
                );
                calorie_columns(ui, self.theme, &monthly.days, None);
            }
        }
    }
}
