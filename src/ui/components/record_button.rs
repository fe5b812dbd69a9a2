//! Record control with level meter and capture-mode switch

use crate::audio::CaptureMode;
use crate::i18n::{tr, Language, Text};
use crate::ui::theme::Theme;
use egui::{Color32, Event, Key, Rect, RichText, Sense, Vec2};
use std::time::Duration;

/// Gesture on the record control
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordInput {
    /// Pointer or Space went down
    Press,
    /// Pointer or Space went up
    Release,
    /// Completed click (or Space tap)
    Click,
    /// Right-click or Escape
    Cancel,
    ModeChanged(CaptureMode),
}

/// What the record control displays
#[derive(Clone, Debug, Default)]
pub struct RecordView {
    pub mode: CaptureMode,
    pub recording: bool,
    pub uploading: bool,
    pub elapsed: Duration,
    pub remaining: Duration,
    /// Recent RMS levels, oldest first
    pub levels: Vec<f32>,
    /// Capture or upload failure to show under the button
    pub error: Option<String>,
}

pub struct RecordButton<'a> {
    view: &'a RecordView,
    theme: &'a Theme,
    language: Language,
}

impl<'a> RecordButton<'a> {
    pub fn new(view: &'a RecordView, theme: &'a Theme, language: Language) -> Self {
        Self {
            view,
            theme,
            language,
        }
    }

    /// Show the control; returns the gestures of this frame in order
    pub fn show(self, ui: &mut egui::Ui) -> Vec<RecordInput> {
        let mut inputs = Vec::new();

        ui.vertical_centered(|ui| {
            if let Some(mode) = self.mode_switch(ui) {
                inputs.push(RecordInput::ModeChanged(mode));
            }
            ui.add_space(self.theme.spacing_sm);

            let size = Vec2::splat(72.0);
            let (rect, response) = ui.allocate_exact_size(size, Sense::click());
            let label = if self.view.recording {
                "Stop recording"
            } else {
                "Record meal"
            };
            let enabled = !self.view.uploading;
            response.widget_info(|| {
                egui::WidgetInfo::labeled(egui::WidgetType::Button, enabled, label)
            });

            if ui.is_rect_visible(rect) {
                self.paint_button(ui, rect, response.hovered());
            }

            if enabled {
                self.pointer_inputs(ui, &response, &mut inputs);
                self.keyboard_inputs(ui, &mut inputs);
            }

            ui.add_space(self.theme.spacing_sm);
            self.status(ui);
            if self.view.recording {
                self.level_meter(ui);
            }
            if let Some(error) = &self.view.error {
                ui.label(RichText::new(error).size(12.0).color(self.theme.error));
            }
        });

        inputs
    }

    fn mode_switch(&self, ui: &mut egui::Ui) -> Option<CaptureMode> {
        let mut selected = self.view.mode;
        ui.add_enabled_ui(!self.view.recording && !self.view.uploading, |ui| {
            ui.horizontal(|ui| {
                ui.selectable_value(
                    &mut selected,
                    CaptureMode::Hold,
                    tr(self.language, Text::ModeHold),
                );
                ui.selectable_value(
                    &mut selected,
                    CaptureMode::Toggle,
                    tr(self.language, Text::ModeToggle),
                );
            });
        });
        (selected != self.view.mode).then_some(selected)
    }

    fn pointer_inputs(&self, ui: &egui::Ui, response: &egui::Response, inputs: &mut Vec<RecordInput>) {
        let (pressed, released) =
            ui.input(|i| (i.pointer.primary_pressed(), i.pointer.primary_released()));

        if pressed && response.hovered() {
            inputs.push(RecordInput::Press);
        }
        // Releasing anywhere ends a hold, even after dragging off the button.
        if released && self.view.recording {
            inputs.push(RecordInput::Release);
        }
        if response.clicked() {
            inputs.push(RecordInput::Click);
        }
        if response.secondary_clicked() && self.view.recording {
            inputs.push(RecordInput::Cancel);
        }
    }

    fn keyboard_inputs(&self, ui: &egui::Ui, inputs: &mut Vec<RecordInput>) {
        // Text fields keep Space for themselves.
        if ui.memory(|m| m.focused().is_some()) {
            return;
        }

        ui.input(|i| {
            for event in &i.events {
                match event {
                    Event::Key {
                        key: Key::Space,
                        pressed: true,
                        repeat: false,
                        ..
                    } => {
                        inputs.push(RecordInput::Press);
                        inputs.push(RecordInput::Click);
                    }
                    Event::Key {
                        key: Key::Space,
                        pressed: false,
                        ..
                    } => inputs.push(RecordInput::Release),
                    Event::Key {
                        key: Key::Escape,
                        pressed: true,
                        ..
                    } if self.view.recording => inputs.push(RecordInput::Cancel),
                    _ => {}
                }
            }
        });
    }

    fn paint_button(&self, ui: &egui::Ui, rect: Rect, hovered: bool) {
        let painter = ui.painter();
        let center = rect.center();

        let fill = if self.view.recording {
            self.theme.recording
        } else if self.view.uploading {
            self.theme.warning
        } else if hovered {
            self.theme.primary.gamma_multiply(1.15)
        } else {
            self.theme.primary
        };
        painter.circle_filled(center, 32.0, fill);

        if self.view.recording {
            // Ring grows with the input level.
            let level = self.view.levels.last().copied().unwrap_or(0.0);
            let radius = 34.0 + (level * 60.0).min(10.0);
            painter.circle_stroke(
                center,
                radius,
                egui::Stroke::new(3.0, self.theme.recording.gamma_multiply(0.5)),
            );
            painter.rect_filled(
                Rect::from_center_size(center, Vec2::splat(18.0)),
                3.0,
                Color32::WHITE,
            );
        } else if self.view.uploading {
            let t = ui.ctx().input(|i| i.time);
            for n in 0..3 {
                let angle = t * 3.0 + n as f64 * std::f64::consts::TAU / 3.0;
                let dot = egui::pos2(
                    center.x + angle.cos() as f32 * 10.0,
                    center.y + angle.sin() as f32 * 10.0,
                );
                painter.circle_filled(dot, 3.5, Color32::WHITE);
            }
            ui.ctx().request_repaint();
        } else {
            let body = Rect::from_center_size(egui::pos2(center.x, center.y - 5.0), Vec2::new(12.0, 20.0));
            painter.rect_filled(body, 6.0, Color32::WHITE);
            let stroke = egui::Stroke::new(2.5, Color32::WHITE);
            painter.line_segment(
                [egui::pos2(center.x, center.y + 9.0), egui::pos2(center.x, center.y + 16.0)],
                stroke,
            );
            painter.line_segment(
                [egui::pos2(center.x - 7.0, center.y + 16.0), egui::pos2(center.x + 7.0, center.y + 16.0)],
                stroke,
            );
        }
    }

    fn status(&self, ui: &mut egui::Ui) {
        let (text, color) = if self.view.recording {
            (
                format!(
                    "{} {} / -{}",
                    tr(self.language, Text::Recording),
                    clock(self.view.elapsed),
                    clock(self.view.remaining)
                ),
                self.theme.recording,
            )
        } else if self.view.uploading {
            (tr(self.language, Text::Analyzing).to_string(), self.theme.warning)
        } else {
            let hint = match self.view.mode {
                CaptureMode::Hold => Text::HoldToRecord,
                CaptureMode::Toggle => Text::ClickToRecord,
            };
            (tr(self.language, hint).to_string(), self.theme.text_muted)
        };
        ui.label(RichText::new(text).size(13.0).color(color));
    }

    fn level_meter(&self, ui: &mut egui::Ui) {
        let bars = self.view.levels.len().max(1);
        let width = 180.0;
        let (rect, _) = ui.allocate_exact_size(Vec2::new(width, 24.0), Sense::hover());
        let painter = ui.painter();
        let bar_width = width / bars as f32;

        for (i, level) in self.view.levels.iter().enumerate() {
            // Speech sits around 0.02-0.2 RMS; scale so it fills the meter.
            let height = (level.sqrt() * 2.0).clamp(0.05, 1.0) * rect.height();
            let x = rect.left() + i as f32 * bar_width;
            let bar = Rect::from_min_max(
                egui::pos2(x + 1.0, rect.center().y - height / 2.0),
                egui::pos2(x + bar_width - 1.0, rect.center().y + height / 2.0),
            );
            painter.rect_filled(bar, 1.0, self.theme.recording.gamma_multiply(0.8));
        }
    }
}

/// "m:ss"
fn clock(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{}:{:02}", secs / 60, secs % 60)
}
