use std::path::PathBuf;

use chrono::Local;

use crate::records::{TrialLog, TrialRecord};
use crate::scoring::TrialWords;
use crate::stimulus::StimulusList;
use crate::tracker::{adjusted_level, LevelTracker};
use crate::trial::{LoadedBuffer, SubmitStep, TrialRunner};
use crate::wave;

use super::{SessionSummary, SpeechTaskApp};

impl SpeechTaskApp {
    /// Rebuilds the stimulus list, tracker, and trial log from the current
    /// session parameters. Called at startup and after the session dialog.
    pub fn reload_stimuli(&mut self) {
        self.status = None;
        self.summary = None;
        self.words = TrialWords::default();
        self.levels_presented.clear();
        self.outcomes.clear();
        self.total_key_words = 0;
        self.total_words_correct = 0;
        self.tracker = LevelTracker::new(
            self.pars.presentation_level,
            self.pars.step_right_db,
            self.pars.step_wrong_db,
        );

        let lists = self.pars.lists();
        let audio_dir = PathBuf::from(&self.pars.audio_files_path);
        let sentence_dir = PathBuf::from(&self.pars.sentence_file_path);
        match StimulusList::load(&audio_dir, &sentence_dir, &lists) {
            Ok(list) => {
                self.debug_log(format!("loaded {} stimuli", list.len()));
                self.runner = TrialRunner::new(list.len());
                self.stimuli = Some(list);
                self.log = Some(TrialLog::new(
                    std::path::Path::new("."),
                    &self.pars.subject,
                    &self.pars.condition,
                    Local::now(),
                ));
            }
            Err(e) => {
                self.debug_log(format!("stimulus load failed: {e:#}"));
                self.stimuli = None;
                self.runner = TrialRunner::empty();
                self.log = None;
                self.status = Some(format!("{e:#}"));
            }
        }
    }

    /// Start button: present the first (or armed) trial.
    pub fn start_trial(&mut self) {
        if let Some(idx) = self.runner.start() {
            self.present_trial(idx);
        }
    }

    fn present_trial(&mut self, idx: usize) {
        let (path, sentence) = match self.stimuli.as_ref().and_then(|s| s.stimuli.get(idx)) {
            Some(stim) => (stim.path.clone(), stim.sentence.clone()),
            None => {
                self.status = Some(format!("stimulus {} out of range", idx + 1));
                self.runner.abort();
                self.loaded = LoadedBuffer::None;
                return;
            }
        };
        self.words = TrialWords::from_sentence(&sentence);
        self.presented_level_db = self.tracker.level_db;
        let adjusted = adjusted_level(self.presented_level_db, self.pars.slm_offset());
        self.pars.adjusted_presentation_level = adjusted;
        if let Err(e) = wave::prepare_stimulus(&path, &self.audio, adjusted) {
            self.status = Some(format!("{e:#}"));
            self.runner.abort();
            self.loaded = LoadedBuffer::None;
            return;
        }
        self.audio
            .set_route_channel(self.pars.speaker_number.saturating_sub(1) as usize);
        self.loaded = LoadedBuffer::Trial;
        self.audio.play();
        self.debug_log(format!(
            "trial {} of {}: {} at {:.1} dB (adjusted {:.1} dB FS)",
            self.runner.trial_number(),
            self.runner.total(),
            path.display(),
            self.presented_level_db,
            adjusted
        ));
    }

    /// Submit button: score the response, adapt the level, log the trial,
    /// and either present the next stimulus or finish the session.
    pub fn submit_response(&mut self) {
        if !self.runner.respond() {
            return;
        }
        let score = self.words.score();
        self.tracker.record(score.is_correct());
        self.levels_presented.push(self.presented_level_db);
        self.total_key_words += score.num_key;
        self.total_words_correct += score.num_correct;
        self.outcomes.push(score.outcome);

        let sentence_num = self
            .stimuli
            .as_ref()
            .and_then(|s| s.stimuli.get(self.runner.trial_index()))
            .map(|s| s.sentence_num)
            .unwrap_or(0);
        let record = TrialRecord {
            subject: self.pars.subject.clone(),
            condition: self.pars.condition.clone(),
            list_numbers: self.pars.list_numbers.clone(),
            trial: self.runner.trial_number(),
            sentence_num,
            presentation_level: self.presented_level_db,
            adjusted_presentation_level: self.pars.adjusted_presentation_level,
            raw_level: self.pars.raw_level,
            slm_reading: self.pars.slm_reading,
            step_right_db: self.pars.step_right_db,
            step_wrong_db: self.pars.step_wrong_db,
            words_correct: score.words_correct.clone(),
            words_incorrect: score.words_incorrect.clone(),
            num_words_correct: score.num_correct,
            outcome: score.outcome,
        };
        if let Some(log) = &self.log {
            if let Err(e) = log.append(&record) {
                self.status = Some(format!("{e:#}"));
            }
        }
        self.debug_log(format!(
            "trial {}: correct [{}] incorrect [{}] outcome {}",
            record.trial, record.words_correct, record.words_incorrect, record.outcome
        ));

        match self.runner.submit() {
            Some(SubmitStep::Adapt) => {
                if let Some(next) = self.runner.advance() {
                    self.present_trial(next);
                }
            }
            Some(SubmitStep::Done) => self.finish_session(),
            None => {}
        }
    }

    fn finish_session(&mut self) {
        let trials = self.outcomes.len().max(1);
        let snr50 = self.levels_presented.iter().sum::<f32>() / self.levels_presented.len().max(1) as f32;
        let pc_word = if self.total_key_words > 0 {
            self.total_words_correct as f32 / self.total_key_words as f32 * 100.0
        } else {
            0.0
        };
        let pc_custom =
            self.outcomes.iter().map(|&o| o as f32).sum::<f32>() / trials as f32 * 100.0;
        self.summary = Some(SessionSummary {
            snr50,
            pc_word,
            pc_custom,
        });
        self.debug_log(format!(
            "session done: snr50 {snr50:.2} dB, word {pc_word:.2}%, custom {pc_custom:.2}%"
        ));
    }

    /// Persists the session parameters and rebuilds the stimulus list, the
    /// same way the session dialog's Submit works.
    pub fn save_session(&mut self) {
        if let Err(e) = self.pars.save(&self.pars_path) {
            self.status = Some(format!("{e:#}"));
            return;
        }
        self.reload_stimuli();
    }
}
