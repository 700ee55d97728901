use egui::{Color32, RichText};

use crate::trial::TrialPhase;

impl crate::app::SpeechTaskApp {
    pub(in crate::app) fn ui_main(&mut self, ctx: &egui::Context) {
        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(status) = self.status.clone() {
                ui.label(RichText::new(status).color(Color32::from_rgb(255, 120, 120)));
                ui.separator();
            }
            if let Some(stimuli) = &self.stimuli {
                for warning in &stimuli.warnings {
                    ui.label(RichText::new(warning).weak());
                }
            }

            match self.runner.phase() {
                TrialPhase::Idle => {
                    ui.label("Open File > Session... to configure and load a stimulus list.");
                }
                TrialPhase::AwaitingStart => {
                    ui.label(format!(
                        "{} trial(s) ready. Press Start to present the first sentence.",
                        self.runner.total()
                    ));
                    ui.add_space(8.0);
                    if ui.button(RichText::new("Start").heading()).clicked() {
                        self.start_trial();
                    }
                }
                TrialPhase::Playing => {
                    ui.horizontal(|ui| {
                        ui.spinner();
                        ui.label(format!(
                            "Presenting trial {} of {}...",
                            self.runner.trial_number(),
                            self.runner.total()
                        ));
                    });
                }
                TrialPhase::AwaitingResponse | TrialPhase::Scoring | TrialPhase::Adapting => {
                    self.ui_transcript(ui);
                }
                TrialPhase::Done => {
                    ui.label("Task complete. Open File > Session... to run another list.");
                }
            }
        });
    }

    /// Transcript with one checkbox per key word. Non-key words are plain
    /// labels; the operator checks the key words the listener repeated.
    fn ui_transcript(&mut self, ui: &mut egui::Ui) {
        ui.label(format!(
            "Trial {} of {}: check each key word the listener repeated correctly.",
            self.runner.trial_number(),
            self.runner.total()
        ));
        ui.add_space(8.0);
        let scoring_enabled = self.runner.phase() == TrialPhase::AwaitingResponse;
        ui.add_enabled_ui(scoring_enabled, |ui| {
            ui.horizontal_wrapped(|ui| {
                for i in 0..self.words.words.len() {
                    let key = self.words.words[i].key;
                    let text = self.words.words[i].text.clone();
                    if key {
                        ui.checkbox(&mut self.words.words[i].checked, RichText::new(text).strong());
                    } else {
                        ui.label(text);
                    }
                }
            });
            ui.add_space(8.0);
            if ui.button(RichText::new("Submit").heading()).clicked() {
                self.submit_response();
            }
        });
    }

    pub(in crate::app) fn ui_summary(&mut self, ctx: &egui::Context) {
        let Some(summary) = self.summary else {
            return;
        };
        let mut close = false;
        egui::Window::new("Done!")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.label(RichText::new("Summary").strong());
                ui.label(format!("SNR 50: {:.2} dB", summary.snr50));
                ui.label(format!("Percent Correct (Word): {:.2}%", summary.pc_word));
                ui.label(format!("Percent Correct (Custom): {:.2}%", summary.pc_custom));
                ui.add_space(6.0);
                if ui.button("OK").clicked() {
                    close = true;
                }
            });
        if close {
            self.summary = None;
        }
    }
}
