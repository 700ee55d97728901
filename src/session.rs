//! Session parameter store persisted as JSON in the user's home directory.
//!
//! Loading merges the file over the defaults: `#[serde(default)]` keeps
//! missing keys at their default value and unknown keys are ignored, so a
//! settings file written by an older or newer build still loads.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

pub const SESSION_FILE_NAME: &str = "speech_task_pars.json";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionPars {
    pub subject: String,
    pub condition: String,
    /// Target presentation level in dB (SPL once calibrated).
    pub presentation_level: f32,
    /// 1-based output channel the stimulus is routed to.
    pub speaker_number: u16,
    pub audio_files_path: String,
    pub sentence_file_path: String,
    /// Whitespace-separated list numbers, e.g. "1 3 5".
    pub list_numbers: String,
    /// Output device name; empty selects the host default.
    pub audio_device: String,
    /// Raw digital level of the calibration stimulus, dB FS.
    pub raw_level: f32,
    /// Sound-level-meter measurement of the calibration stimulus, dB.
    pub slm_reading: f32,
    /// presentation_level minus the SLM offset; what actually gets played.
    pub adjusted_presentation_level: f32,
    /// Custom calibration WAV; empty uses the bundled cal_stim.wav.
    pub calibration_file: String,
    /// Level decrease after a right trial, dB.
    pub step_right_db: f32,
    /// Level increase after a wrong trial, dB.
    pub step_wrong_db: f32,
}

impl Default for SessionPars {
    fn default() -> Self {
        Self {
            subject: "999".into(),
            condition: "Quiet".into(),
            presentation_level: 65.0,
            speaker_number: 1,
            audio_files_path: String::new(),
            sentence_file_path: String::new(),
            list_numbers: "1".into(),
            audio_device: String::new(),
            raw_level: -50.0,
            slm_reading: 70.0,
            adjusted_presentation_level: -50.0,
            calibration_file: String::new(),
            step_right_db: 2.0,
            step_wrong_db: 4.0,
        }
    }
}

impl SessionPars {
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(SESSION_FILE_NAME)
    }

    /// Loads parameters from `path`, falling back to defaults when the file
    /// does not exist yet.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read session file {}", path.display()))?;
        let pars: Self = serde_json::from_str(&raw)
            .with_context(|| format!("parse session file {}", path.display()))?;
        Ok(pars)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("serialize session parameters")?;
        fs::write(path, json)
            .with_context(|| format!("write session file {}", path.display()))?;
        Ok(())
    }

    /// Selected list numbers; malformed entries are skipped.
    pub fn lists(&self) -> Vec<u32> {
        self.list_numbers
            .split_whitespace()
            .filter_map(|s| s.parse::<u32>().ok())
            .collect()
    }

    pub fn slm_offset(&self) -> f32 {
        crate::tracker::slm_offset(self.slm_reading, self.raw_level)
    }
}
