use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use egui::{Color32, FontId, TextStyle, Visuals};

use crate::audio::AudioEngine;
use crate::records::TrialLog;
use crate::scoring::TrialWords;
use crate::session::SessionPars;
use crate::stimulus::StimulusList;
use crate::tracker::LevelTracker;
use crate::trial::{LoadedBuffer, TrialPhase, TrialRunner};

mod dialogs;
mod trial_ops;
mod ui;

/// Command-line overrides applied before the first frame.
#[derive(Clone, Debug, Default)]
pub struct StartupConfig {
    pub settings_path: Option<PathBuf>,
    pub audio_dir: Option<PathBuf>,
    pub sentence_dir: Option<PathBuf>,
    pub lists: Option<String>,
    pub subject: Option<String>,
    pub condition: Option<String>,
    pub debug: bool,
    pub debug_log: Option<PathBuf>,
}

/// End-of-session descriptive stats shown in the Done dialog.
#[derive(Clone, Copy, Debug)]
pub struct SessionSummary {
    /// Mean of the levels presented across trials.
    pub snr50: f32,
    /// Percent of key words repeated correctly.
    pub pc_word: f32,
    /// Percent of trials scored right.
    pub pc_custom: f32,
}

pub struct SpeechTaskApp {
    pub audio: AudioEngine,
    pub pars: SessionPars,
    pub pars_path: PathBuf,
    pub stimuli: Option<StimulusList>,
    pub runner: TrialRunner,
    pub tracker: LevelTracker,
    pub words: TrialWords,
    pub log: Option<TrialLog>,
    /// Last error surfaced to the operator; set aside of the trial flow.
    pub status: Option<String>,
    pub summary: Option<SessionSummary>,
    /// What the engine was last armed with; end-of-playback only advances
    /// the runner when this is a trial stimulus.
    pub(crate) loaded: LoadedBuffer,
    // level held by the tracker when the current trial was presented
    pub(crate) presented_level_db: f32,
    pub(crate) levels_presented: Vec<f32>,
    pub(crate) total_key_words: usize,
    pub(crate) total_words_correct: usize,
    pub(crate) outcomes: Vec<u8>,
    /// Parameters as they were when a dialog opened, restored on Cancel.
    pub(crate) pars_snapshot: Option<SessionPars>,
    pub(crate) show_session_dialog: bool,
    pub(crate) show_audio_dialog: bool,
    pub(crate) show_calibration_dialog: bool,
    pub(crate) cal_played: bool,
    pub(crate) device_names: Vec<String>,
    pub(crate) meter_db: f32,
    startup: StartupConfig,
}

impl SpeechTaskApp {
    pub fn new(cc: &eframe::CreationContext<'_>, startup: StartupConfig) -> Result<Self> {
        let mut visuals = Visuals::dark();
        visuals.widgets.noninteractive.bg_fill = Color32::from_rgb(20, 20, 23);
        visuals.widgets.inactive.bg_fill = Color32::from_rgb(28, 28, 32);
        visuals.panel_fill = Color32::from_rgb(18, 18, 20);
        cc.egui_ctx.set_visuals(visuals);
        let mut style = (*cc.egui_ctx.style()).clone();
        style.text_styles.insert(TextStyle::Body, FontId::proportional(16.0));
        style.text_styles.insert(TextStyle::Heading, FontId::proportional(22.0));
        style
            .text_styles
            .insert(TextStyle::Monospace, FontId::monospace(14.0));
        cc.egui_ctx.set_style(style);

        let pars_path = startup
            .settings_path
            .clone()
            .unwrap_or_else(SessionPars::default_path);
        let mut pars = SessionPars::load(&pars_path)?;
        if let Some(dir) = &startup.audio_dir {
            pars.audio_files_path = dir.display().to_string();
        }
        if let Some(dir) = &startup.sentence_dir {
            pars.sentence_file_path = dir.display().to_string();
        }
        if let Some(lists) = &startup.lists {
            pars.list_numbers = lists.clone();
        }
        if let Some(subject) = &startup.subject {
            pars.subject = subject.clone();
        }
        if let Some(condition) = &startup.condition {
            pars.condition = condition.clone();
        }

        let audio = AudioEngine::new(Some(pars.audio_device.as_str()))?;
        audio.set_route_channel(pars.speaker_number.saturating_sub(1) as usize);

        let tracker = LevelTracker::new(
            pars.presentation_level,
            pars.step_right_db,
            pars.step_wrong_db,
        );
        let mut app = Self {
            audio,
            pars,
            pars_path,
            stimuli: None,
            runner: TrialRunner::empty(),
            tracker,
            words: TrialWords::default(),
            log: None,
            status: None,
            summary: None,
            loaded: LoadedBuffer::None,
            presented_level_db: 0.0,
            levels_presented: Vec::new(),
            total_key_words: 0,
            total_words_correct: 0,
            outcomes: Vec::new(),
            pars_snapshot: None,
            show_session_dialog: false,
            show_audio_dialog: false,
            show_calibration_dialog: false,
            cal_played: false,
            device_names: Vec::new(),
            meter_db: -80.0,
            startup,
        };
        // First run has no paths yet; leave the list unloaded instead of
        // greeting the operator with an error.
        if !app.pars.audio_files_path.is_empty() || !app.pars.sentence_file_path.is_empty() {
            app.reload_stimuli();
        }
        Ok(app)
    }

    /// App with default parameters and a stream-less engine, for tests that
    /// exercise dialog and session bookkeeping without a window.
    pub fn new_for_test() -> Self {
        let pars = SessionPars::default();
        let tracker = LevelTracker::new(
            pars.presentation_level,
            pars.step_right_db,
            pars.step_wrong_db,
        );
        Self {
            audio: AudioEngine::new_for_test(),
            pars,
            pars_path: SessionPars::default_path(),
            stimuli: None,
            runner: TrialRunner::empty(),
            tracker,
            words: TrialWords::default(),
            log: None,
            status: None,
            summary: None,
            loaded: LoadedBuffer::None,
            presented_level_db: 0.0,
            levels_presented: Vec::new(),
            total_key_words: 0,
            total_words_correct: 0,
            outcomes: Vec::new(),
            pars_snapshot: None,
            show_session_dialog: false,
            show_audio_dialog: false,
            show_calibration_dialog: false,
            cal_played: false,
            device_names: Vec::new(),
            meter_db: -80.0,
            startup: StartupConfig::default(),
        }
    }

    /// Remembers the parameters as they are when a dialog opens.
    pub fn stash_pars(&mut self) {
        self.pars_snapshot = Some(self.pars.clone());
    }

    /// Cancel path of a dialog: throws away in-place widget edits by putting
    /// the stashed parameters back. A no-op when nothing is stashed.
    pub fn restore_stashed_pars(&mut self) {
        if let Some(saved) = self.pars_snapshot.take() {
            self.pars = saved;
        }
    }

    pub(crate) fn debug_log(&self, msg: impl AsRef<str>) {
        let msg = msg.as_ref();
        if let Some(path) = &self.startup.debug_log {
            use std::io::Write;
            if let Ok(mut f) = std::fs::OpenOptions::new().create(true).append(true).open(path) {
                let stamp = chrono::Local::now().format("%H:%M:%S%.3f");
                let _ = writeln!(f, "[{stamp}] {msg}");
            }
        } else if self.startup.debug {
            eprintln!("speechtask: {msg}");
        }
    }
}

impl eframe::App for SpeechTaskApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if self.audio.take_finished() {
            let loaded = std::mem::take(&mut self.loaded);
            self.runner.playback_done_for(loaded);
            self.debug_log(format!("playback finished ({loaded:?})"));
        }

        let rms = self
            .audio
            .shared
            .meter_rms
            .load(std::sync::atomic::Ordering::Relaxed);
        self.meter_db = crate::wave::amp_to_db(rms);

        self.ui_top_bar(ctx);
        self.ui_main(ctx);
        self.ui_session_dialog(ctx);
        self.ui_audio_dialog(ctx);
        self.ui_calibration_dialog(ctx);
        self.ui_summary(ctx);

        // Keep polling while audio is in flight so the finished flag is seen
        // promptly even without input events.
        if self.runner.phase() == TrialPhase::Playing || self.audio.is_playing() {
            ctx.request_repaint_after(Duration::from_millis(50));
        }
    }
}
