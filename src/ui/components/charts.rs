//! Painter-drawn nutrition charts

use crate::api::DaySummary;
use crate::i18n::{tr, Language, Text};
use crate::ui::theme::Theme;
use egui::{Rect, RichText, Sense, Vec2};

/// Horizontal bar split by macro calories (4/4/9 kcal per gram)
pub fn macro_split(
    ui: &mut egui::Ui,
    theme: &Theme,
    language: Language,
    protein: f64,
    carbs: f64,
    fat: f64,
) {
    let parts = [
        (Text::Protein, protein, protein * 4.0, theme.protein),
        (Text::Carbs, carbs, carbs * 4.0, theme.carbs),
        (Text::Fat, fat, fat * 9.0, theme.fat),
    ];
    let total: f64 = parts.iter().map(|p| p.2).sum();

    let width = ui.available_width().min(360.0);
    let (rect, _) = ui.allocate_exact_size(Vec2::new(width, 10.0), Sense::hover());
    let painter = ui.painter();
    painter.rect_filled(rect, 5.0, theme.bg_tertiary);

    if total > 0.0 {
        let mut x = rect.left();
        for (_, _, kcal, color) in parts {
            let w = (kcal / total) as f32 * rect.width();
            if w > 0.0 {
                painter.rect_filled(
                    Rect::from_min_size(egui::pos2(x, rect.top()), Vec2::new(w, rect.height())),
                    2.0,
                    color,
                );
            }
            x += w;
        }
    }

    ui.horizontal(|ui| {
        for (text, grams, _, color) in parts {
            ui.label(
                RichText::new(format!("● {} {:.0}g", tr(language, text), grams))
                    .size(12.0)
                    .color(color),
            );
        }
    });
}

/// Daily calorie columns, optionally with a goal line
pub fn calorie_columns(
    ui: &mut egui::Ui,
    theme: &Theme,
    days: &[DaySummary],
    goal: Option<f64>,
) {
    let height = 110.0;
    let width = ui.available_width().min(420.0);
    let (rect, _) = ui.allocate_exact_size(Vec2::new(width, height + 16.0), Sense::hover());
    let painter = ui.painter();

    if days.is_empty() {
        return;
    }

    let peak = days
        .iter()
        .map(|d| d.total_calories)
        .chain(goal)
        .fold(1.0, f64::max);
    let slot = rect.width() / days.len() as f32;
    let bar_width = (slot * 0.6).max(2.0);
    let base = rect.top() + height;

    for (i, day) in days.iter().enumerate() {
        let h = (day.total_calories / peak) as f32 * (height - 4.0);
        let cx = rect.left() + slot * (i as f32 + 0.5);
        let over = goal.is_some_and(|g| day.total_calories > g);
        let color = if over { theme.error } else { theme.calories };
        painter.rect_filled(
            Rect::from_min_max(
                egui::pos2(cx - bar_width / 2.0, base - h),
                egui::pos2(cx + bar_width / 2.0, base),
            ),
            2.0,
            color,
        );
        if days.len() <= 7 {
            if let Some(date) = day.date {
                painter.text(
                    egui::pos2(cx, base + 2.0),
                    egui::Align2::CENTER_TOP,
                    date.format("%a").to_string(),
                    egui::FontId::proportional(10.0),
                    theme.text_muted,
                );
            }
        }
    }

    if let Some(goal) = goal {
        let y = base - (goal / peak) as f32 * (height - 4.0);
        painter.hline(
            rect.left()..=rect.right(),
            y,
            egui::Stroke::new(1.0, theme.text_muted),
        );
    }
}
