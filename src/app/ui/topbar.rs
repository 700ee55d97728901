use egui::{Align, Color32, RichText, Sense};

use crate::trial::TrialPhase;

impl crate::app::SpeechTaskApp {
    pub(in crate::app) fn ui_top_bar(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("top").show(ctx, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.menu_button("File", |ui| {
                    if ui.button("Session...").clicked() {
                        self.open_session_dialog();
                    }
                    ui.separator();
                    if ui.button("Quit").clicked() {
                        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                    }
                });
                ui.menu_button("Tools", |ui| {
                    if ui.button("Audio Settings...").clicked() {
                        self.open_audio_dialog();
                    }
                    if ui.button("Calibration...").clicked() {
                        self.show_calibration_dialog = true;
                    }
                });
                ui.separator();
                ui.label(RichText::new(format!("Subject: {}", self.pars.subject)).monospace());
                ui.label(RichText::new(format!("Condition: {}", self.pars.condition)).monospace());
                ui.label(RichText::new(format!("List(s): {}", self.pars.list_numbers)).monospace());
                let trial = if self.runner.total() == 0 {
                    "Trial: NA of NA".to_string()
                } else if self.runner.phase() == TrialPhase::Idle {
                    format!("Trial: NA of {}", self.runner.total())
                } else {
                    format!("Trial: {} of {}", self.runner.trial_number(), self.runner.total())
                };
                ui.label(RichText::new(trial).monospace());
                ui.with_layout(egui::Layout::right_to_left(Align::Center), |ui| {
                    let db = self.meter_db;
                    let bar_w = 160.0;
                    let bar_h = 14.0;
                    let (rect, painter) = ui.allocate_painter(egui::vec2(bar_w, bar_h), Sense::hover());
                    painter.rect_filled(rect.rect, 2.0, Color32::from_rgb(32, 32, 36));
                    let norm = ((db + 60.0) / 60.0).clamp(0.0, 1.0);
                    let fill = egui::Rect::from_min_size(rect.rect.min, egui::vec2(bar_w * norm, bar_h));
                    painter.rect_filled(fill, 0.0, Color32::from_rgb(100, 220, 120));
                    ui.label(RichText::new(format!("{db:.1} dBFS")).monospace());
                });
            });
        });
    }
}
