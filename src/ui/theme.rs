//! Colors, fonts and spacing

use egui::{Color32, FontData, FontDefinitions, FontFamily, FontId, Rounding, Stroke, Vec2, Visuals};
use std::path::Path;
use tracing::{debug, info};

/// System fonts with Hangul coverage, tried in order
const CJK_FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/nanum/NanumGothic.ttf",
    "/System/Library/Fonts/AppleSDGothicNeo.ttc",
    "C:\\Windows\\Fonts\\malgun.ttf",
];

/// Application theme configuration
#[derive(Clone, Debug)]
pub struct Theme {
    /// Primary accent color
    pub primary: Color32,
    pub success: Color32,
    pub warning: Color32,
    pub error: Color32,

    /// Background colors
    pub bg_primary: Color32,
    pub bg_secondary: Color32,
    pub bg_tertiary: Color32,

    /// Text colors
    pub text_primary: Color32,
    pub text_secondary: Color32,
    pub text_muted: Color32,

    /// Recording indicator color
    pub recording: Color32,

    /// Nutrition colors, shared by charts and labels
    pub calories: Color32,
    pub protein: Color32,
    pub carbs: Color32,
    pub fat: Color32,

    pub button_rounding: Rounding,
    pub card_rounding: Rounding,

    pub spacing: f32,
    pub spacing_lg: f32,
    pub spacing_sm: f32,
}

impl Default for Theme {
    fn default() -> Self {
        Self::light()
    }
}

impl Theme {
    /// Warm light theme
    pub fn light() -> Self {
        Self {
            primary: Color32::from_rgb(234, 88, 12),  // Orange
            success: Color32::from_rgb(22, 163, 74),  // Green
            warning: Color32::from_rgb(202, 138, 4),  // Amber
            error: Color32::from_rgb(220, 38, 38),    // Red

            bg_primary: Color32::from_rgb(255, 251, 245),
            bg_secondary: Color32::from_rgb(255, 255, 255),
            bg_tertiary: Color32::from_rgb(245, 238, 228),

            text_primary: Color32::from_rgb(28, 25, 23),
            text_secondary: Color32::from_rgb(68, 64, 60),
            text_muted: Color32::from_rgb(120, 113, 108),

            recording: Color32::from_rgb(220, 38, 38),

            calories: Color32::from_rgb(234, 88, 12),
            protein: Color32::from_rgb(37, 99, 235),
            carbs: Color32::from_rgb(202, 138, 4),
            fat: Color32::from_rgb(190, 24, 93),

            button_rounding: Rounding::same(8.0),
            card_rounding: Rounding::same(12.0),

            spacing: 16.0,
            spacing_lg: 24.0,
            spacing_sm: 8.0,
        }
    }

    /// Apply this theme to egui
    pub fn apply(&self, ctx: &egui::Context) {
        let mut visuals = Visuals::light();

        visuals.panel_fill = self.bg_primary;
        visuals.window_fill = self.bg_secondary;
        visuals.extreme_bg_color = self.bg_secondary;
        visuals.faint_bg_color = self.bg_tertiary;

        visuals.widgets.noninteractive.bg_fill = self.bg_secondary;
        visuals.widgets.noninteractive.fg_stroke = Stroke::new(1.0, self.text_secondary);
        visuals.widgets.inactive.bg_fill = self.bg_tertiary;
        visuals.widgets.inactive.weak_bg_fill = self.bg_tertiary;
        visuals.widgets.inactive.fg_stroke = Stroke::new(1.0, self.text_primary);
        visuals.widgets.hovered.bg_fill = self.primary.gamma_multiply(0.8);
        visuals.widgets.hovered.weak_bg_fill = self.primary.gamma_multiply(0.25);
        visuals.widgets.active.bg_fill = self.primary;

        visuals.selection.bg_fill = self.primary.gamma_multiply(0.3);
        visuals.selection.stroke = Stroke::new(1.0, self.primary);
        visuals.hyperlink_color = self.primary;
        visuals.error_fg_color = self.error;
        visuals.warn_fg_color = self.warning;

        visuals.window_rounding = self.card_rounding;
        visuals.window_stroke = Stroke::new(1.0, self.bg_tertiary);

        ctx.set_visuals(visuals);
        ctx.set_fonts(fonts_with_cjk_fallback());

        let mut style = (*ctx.style()).clone();
        style.spacing.item_spacing = Vec2::splat(self.spacing_sm);
        style.spacing.window_margin = egui::Margin::same(self.spacing);
        style.spacing.button_padding = Vec2::new(self.spacing_sm * 1.5, self.spacing_sm * 0.75);

        style.text_styles.insert(
            egui::TextStyle::Heading,
            FontId::new(22.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Body,
            FontId::new(14.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Button,
            FontId::new(14.0, FontFamily::Proportional),
        );
        style.text_styles.insert(
            egui::TextStyle::Small,
            FontId::new(12.0, FontFamily::Proportional),
        );

        ctx.set_style(style);
    }

    /// Frame used for meal cards and stat tiles
    pub fn card_frame(&self) -> egui::Frame {
        egui::Frame::none()
            .fill(self.bg_secondary)
            .rounding(self.card_rounding)
            .stroke(Stroke::new(1.0, self.bg_tertiary))
            .inner_margin(egui::Margin::same(self.spacing_sm * 1.5))
    }
}

/// egui's bundled fonts plus the first system font with Hangul glyphs
///
/// The bundled fonts have no CJK coverage; without a fallback Korean text
/// renders as boxes.
fn fonts_with_cjk_fallback() -> FontDefinitions {
    let mut fonts = FontDefinitions::default();

    let found = CJK_FONT_CANDIDATES
        .iter()
        .map(Path::new)
        .find_map(|path| std::fs::read(path).ok().map(|bytes| (path, bytes)));

    match found {
        Some((path, bytes)) => {
            info!("Using {} for CJK glyphs", path.display());
            fonts
                .font_data
                .insert("cjk".to_owned(), FontData::from_owned(bytes).into());
            for family in [FontFamily::Proportional, FontFamily::Monospace] {
                fonts
                    .families
                    .entry(family)
                    .or_default()
                    .push("cjk".to_owned());
            }
        }
        None => debug!("No CJK system font found"),
    }

    fonts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply_sets_panel_colors_and_spacing() {
        let ctx = egui::Context::default();
        let theme = Theme::default();
        theme.apply(&ctx);

        let style = ctx.style();
        assert!(!style.visuals.dark_mode);
        assert_eq!(style.visuals.panel_fill, theme.bg_primary);
        assert_eq!(style.spacing.item_spacing, Vec2::splat(theme.spacing_sm));
    }
}
