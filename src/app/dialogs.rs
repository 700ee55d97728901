use std::path::PathBuf;

use egui::{DragValue, RichText};

use crate::audio::AudioEngine;
use crate::tracker::{adjusted_level, slm_offset};
use crate::trial::{LoadedBuffer, TrialPhase};
use crate::wave;

use super::SpeechTaskApp;

impl SpeechTaskApp {
    /// File > Session... : subject/condition/level/lists and stimulus paths.
    pub(super) fn ui_session_dialog(&mut self, ctx: &egui::Context) {
        if !self.show_session_dialog {
            return;
        }
        let mut close = false;
        let mut submit = false;
        let mut cancel = false;
        egui::Window::new("Session")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                egui::Grid::new("session_grid")
                    .num_columns(2)
                    .spacing([8.0, 6.0])
                    .show(ui, |ui| {
                        ui.label("Subject:");
                        ui.text_edit_singleline(&mut self.pars.subject);
                        ui.end_row();

                        ui.label("Condition:");
                        ui.text_edit_singleline(&mut self.pars.condition);
                        ui.end_row();

                        ui.label("Presentation Level (dB):");
                        ui.add(DragValue::new(&mut self.pars.presentation_level).speed(0.5).fixed_decimals(1));
                        ui.end_row();

                        ui.label("List Number(s):");
                        ui.text_edit_singleline(&mut self.pars.list_numbers);
                        ui.end_row();

                        ui.label("Step Right (dB):");
                        ui.add(DragValue::new(&mut self.pars.step_right_db).speed(0.5).range(0.0..=20.0).fixed_decimals(1));
                        ui.end_row();

                        ui.label("Step Wrong (dB):");
                        ui.add(DragValue::new(&mut self.pars.step_wrong_db).speed(0.5).range(0.0..=20.0).fixed_decimals(1));
                        ui.end_row();

                        ui.label("Audio File Path:");
                        ui.horizontal(|ui| {
                            let shown = if self.pars.audio_files_path.is_empty() {
                                "Please select a path"
                            } else {
                                &self.pars.audio_files_path
                            };
                            ui.label(RichText::new(shown).monospace());
                            if ui.button("Browse").clicked() {
                                if let Some(dir) = self.pick_folder_dialog() {
                                    self.pars.audio_files_path = dir.display().to_string();
                                }
                            }
                        });
                        ui.end_row();

                        ui.label("Sentence File Path:");
                        ui.horizontal(|ui| {
                            let shown = if self.pars.sentence_file_path.is_empty() {
                                "Please select a path"
                            } else {
                                &self.pars.sentence_file_path
                            };
                            ui.label(RichText::new(shown).monospace());
                            if ui.button("Browse").clicked() {
                                if let Some(dir) = self.pick_folder_dialog() {
                                    self.pars.sentence_file_path = dir.display().to_string();
                                }
                            }
                        });
                        ui.end_row();
                    });
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Submit").clicked() {
                        submit = true;
                        close = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                        close = true;
                    }
                });
            });
        if submit {
            self.pars_snapshot = None;
            self.save_session();
        }
        if cancel {
            // The widgets edit self.pars in place; a cancelled dialog must
            // not leave those edits driving the running session.
            self.restore_stashed_pars();
        }
        if close {
            self.show_session_dialog = false;
        }
    }

    /// Tools > Audio Settings... : output device and speaker channel.
    pub(super) fn ui_audio_dialog(&mut self, ctx: &egui::Context) {
        if !self.show_audio_dialog {
            return;
        }
        let mut close = false;
        let mut submit = false;
        let mut cancel = false;
        egui::Window::new("Audio Settings")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                let selected = if self.pars.audio_device.is_empty() {
                    "(default)".to_string()
                } else {
                    self.pars.audio_device.clone()
                };
                egui::ComboBox::from_label("Output Device")
                    .selected_text(selected)
                    .show_ui(ui, |ui| {
                        ui.selectable_value(&mut self.pars.audio_device, String::new(), "(default)");
                        for name in self.device_names.clone() {
                            ui.selectable_value(&mut self.pars.audio_device, name.clone(), name.as_str());
                        }
                    });
                let max_ch = self.audio.shared.out_channels.max(1) as u16;
                ui.horizontal(|ui| {
                    ui.label("Speaker Number:");
                    ui.add(DragValue::new(&mut self.pars.speaker_number).range(1..=max_ch));
                });
                ui.label(
                    RichText::new(format!(
                        "{} channel(s) @ {} Hz",
                        self.audio.shared.out_channels, self.audio.shared.out_sample_rate
                    ))
                    .weak(),
                );
                ui.separator();
                ui.horizontal(|ui| {
                    if ui.button("Submit").clicked() {
                        submit = true;
                        close = true;
                    }
                    if ui.button("Cancel").clicked() {
                        cancel = true;
                        close = true;
                    }
                });
            });
        if submit {
            self.pars_snapshot = None;
            self.apply_audio_settings();
            self.save_session();
        }
        if cancel {
            self.restore_stashed_pars();
        }
        if close {
            self.show_audio_dialog = false;
        }
    }

    /// Tools > Calibration... : play the reference stimulus at the raw level,
    /// then record the sound-level-meter reading.
    pub(super) fn ui_calibration_dialog(&mut self, ctx: &egui::Context) {
        if !self.show_calibration_dialog {
            return;
        }
        let mut close = false;
        let mut submit = false;
        let mut play = false;
        egui::Window::new("Calibration")
            .collapsible(false)
            .resizable(false)
            .show(ctx, |ui| {
                ui.group(|ui| {
                    ui.label(RichText::new("Presentation Parameters").strong());
                    ui.horizontal(|ui| {
                        ui.label("Raw Level (dB FS):");
                        ui.add(DragValue::new(&mut self.pars.raw_level).speed(0.5).range(-80.0..=0.0).fixed_decimals(1));
                    });
                    ui.horizontal(|ui| {
                        ui.label("Calibration Stimulus:");
                        // Must not replace a trial stimulus mid-presentation.
                        let idle = self.runner.phase() != TrialPhase::Playing;
                        if ui.add_enabled(idle, egui::Button::new("Play")).clicked() {
                            play = true;
                        }
                        if ui.button("File...").clicked() {
                            if let Some(file) = self.pick_wav_dialog() {
                                self.pars.calibration_file = file.display().to_string();
                            }
                        }
                    });
                    if !self.pars.calibration_file.is_empty() {
                        ui.label(RichText::new(&self.pars.calibration_file).weak());
                    }
                });
                ui.group(|ui| {
                    ui.label(RichText::new("Save SLM Value").strong());
                    // The meter reading only makes sense after the stimulus
                    // has actually sounded.
                    ui.add_enabled_ui(self.cal_played, |ui| {
                        ui.horizontal(|ui| {
                            ui.label("SLM Reading (dB):");
                            ui.add(DragValue::new(&mut self.pars.slm_reading).speed(0.5).fixed_decimals(1));
                        });
                        if ui.button("Submit").clicked() {
                            submit = true;
                            close = true;
                        }
                    });
                });
            });
        if play {
            self.play_calibration();
        }
        if submit {
            self.submit_calibration();
        }
        if close {
            self.show_calibration_dialog = false;
            self.cal_played = false;
        }
    }

    pub(super) fn open_session_dialog(&mut self) {
        self.stash_pars();
        self.show_session_dialog = true;
    }

    pub(super) fn open_audio_dialog(&mut self) {
        self.stash_pars();
        self.device_names = AudioEngine::output_device_names();
        self.show_audio_dialog = true;
    }

    fn apply_audio_settings(&mut self) {
        let want = self.pars.audio_device.clone();
        let current = self.audio.device_name.clone().unwrap_or_default();
        if want != current {
            match AudioEngine::new(Some(want.as_str())) {
                Ok(engine) => self.audio = engine,
                Err(e) => {
                    self.status = Some(format!("{e:#}"));
                    return;
                }
            }
        }
        self.audio
            .set_route_channel(self.pars.speaker_number.saturating_sub(1) as usize);
    }

    fn play_calibration(&mut self) {
        if self.runner.phase() == TrialPhase::Playing {
            return;
        }
        let path = self.calibration_path();
        match wave::prepare_stimulus(&path, &self.audio, self.pars.raw_level) {
            Ok(()) => {
                self.audio
                    .set_route_channel(self.pars.speaker_number.saturating_sub(1) as usize);
                self.loaded = LoadedBuffer::Calibration;
                self.audio.play();
                self.cal_played = true;
                self.debug_log(format!(
                    "calibration stimulus {} at {:.1} dB FS",
                    path.display(),
                    self.pars.raw_level
                ));
            }
            Err(e) => self.status = Some(format!("{e:#}")),
        }
    }

    fn submit_calibration(&mut self) {
        let offset = slm_offset(self.pars.slm_reading, self.pars.raw_level);
        self.pars.adjusted_presentation_level =
            adjusted_level(self.pars.presentation_level, offset);
        self.debug_log(format!(
            "calibration: offset {offset:.1} dB, adjusted level {:.1} dB FS",
            self.pars.adjusted_presentation_level
        ));
        self.save_session();
    }

    /// The configured calibration file, or the bundled cal_stim.wav next to
    /// the executable, or the development assets copy.
    fn calibration_path(&self) -> PathBuf {
        if !self.pars.calibration_file.is_empty() {
            return PathBuf::from(&self.pars.calibration_file);
        }
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                let bundled = dir.join("cal_stim.wav");
                if bundled.exists() {
                    return bundled;
                }
            }
        }
        PathBuf::from("assets").join("cal_stim.wav")
    }

    fn pick_folder_dialog(&mut self) -> Option<PathBuf> {
        rfd::FileDialog::new().pick_folder()
    }

    fn pick_wav_dialog(&mut self) -> Option<PathBuf> {
        rfd::FileDialog::new().add_filter("WAV", &["wav"]).pick_file()
    }
}
