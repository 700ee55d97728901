//! Per-trial CSV log. One file per session, named from a timestamp fixed at
//! session start plus condition and subject; rows are appended and the header
//! is written only when the file is new.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
pub struct TrialRecord {
    pub subject: String,
    pub condition: String,
    pub list_numbers: String,
    pub trial: usize,
    pub sentence_num: u32,
    /// Target level the tracker held when this trial sounded.
    pub presentation_level: f32,
    /// Digital level actually sent to the device.
    pub adjusted_presentation_level: f32,
    pub raw_level: f32,
    pub slm_reading: f32,
    pub step_right_db: f32,
    pub step_wrong_db: f32,
    pub words_correct: String,
    pub words_incorrect: String,
    pub num_words_correct: usize,
    pub outcome: u8,
}

pub struct TrialLog {
    path: PathBuf,
}

impl TrialLog {
    pub fn new(dir: &Path, subject: &str, condition: &str, started: DateTime<Local>) -> Self {
        let stamp = started.format("%Y_%b_%d_%H%M");
        let name = format!("{stamp}_{condition}_{subject}.csv");
        Self {
            path: dir.join(name),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn append(&self, record: &TrialRecord) -> Result<()> {
        let new_file = !self.path.exists();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open trial log {}", self.path.display()))?;
        let mut writer = csv::WriterBuilder::new()
            .has_headers(new_file)
            .from_writer(file);
        writer
            .serialize(record)
            .with_context(|| format!("write trial log {}", self.path.display()))?;
        writer.flush().context("flush trial log")?;
        Ok(())
    }
}
