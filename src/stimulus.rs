//! Stimulus list loader: joins the WAV directory with the sentence table.
//!
//! Audio file stems are sentence numbers; the sentence table carries
//! `list_num,sentence_num,sentence` rows. Both sides are filtered by the
//! session's list numbers and joined on sentence number.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use walkdir::WalkDir;

#[derive(Debug, Deserialize)]
struct SentenceRow {
    list_num: u32,
    sentence_num: u32,
    sentence: String,
}

#[derive(Clone, Debug)]
pub struct Stimulus {
    pub sentence_num: u32,
    pub path: PathBuf,
    pub sentence: String,
}

#[derive(Debug, Default)]
pub struct StimulusList {
    /// Ordered by sentence number.
    pub stimuli: Vec<Stimulus>,
    /// Non-fatal oddities worth surfacing (extra tables, unmatched files).
    pub warnings: Vec<String>,
}

impl StimulusList {
    pub fn len(&self) -> usize {
        self.stimuli.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stimuli.is_empty()
    }

    pub fn load(audio_dir: &Path, sentence_dir: &Path, lists: &[u32]) -> Result<Self> {
        if !audio_dir.is_dir() {
            bail!("audio file directory not found: {}", audio_dir.display());
        }
        if !sentence_dir.is_dir() {
            bail!("sentence file directory not found: {}", sentence_dir.display());
        }
        if lists.is_empty() {
            bail!("no list numbers selected");
        }

        let mut warnings = Vec::new();
        let sentences = load_sentences(sentence_dir, lists, &mut warnings)?;
        if sentences.is_empty() {
            bail!(
                "no sentences for list(s) {:?} in {}",
                lists,
                sentence_dir.display()
            );
        }

        let mut audio: Vec<(u32, PathBuf)> = Vec::new();
        for entry in WalkDir::new(audio_dir).max_depth(1).follow_links(false) {
            let entry = match entry {
                Ok(e) => e,
                Err(_) => continue,
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let path = entry.into_path();
            let is_wav = path
                .extension()
                .and_then(|s| s.to_str())
                .map(|s| s.eq_ignore_ascii_case("wav"))
                .unwrap_or(false);
            if !is_wav {
                continue;
            }
            // The stem is the sentence number; anything else is not a stimulus.
            let Some(num) = path
                .file_stem()
                .and_then(|s| s.to_str())
                .and_then(|s| s.parse::<u32>().ok())
            else {
                continue;
            };
            audio.push((num, path));
        }
        audio.sort_by_key(|(num, _)| *num);

        let mut stimuli = Vec::new();
        for (num, path) in audio {
            if let Some(text) = sentences.get(&num) {
                stimuli.push(Stimulus {
                    sentence_num: num,
                    path,
                    sentence: text.clone(),
                });
            }
        }
        if stimuli.is_empty() {
            bail!(
                "no audio files in {} match the selected sentences",
                audio_dir.display()
            );
        }
        let missing = sentences.len() - stimuli.len();
        if missing > 0 {
            warnings.push(format!("{missing} sentence(s) have no matching audio file"));
        }

        Ok(Self { stimuli, warnings })
    }
}

fn load_sentences(
    dir: &Path,
    lists: &[u32],
    warnings: &mut Vec<String>,
) -> Result<BTreeMap<u32, String>> {
    let mut tables: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|s| s.to_str())
                .map(|s| s.eq_ignore_ascii_case("csv"))
                .unwrap_or(false)
        })
        .collect();
    tables.sort();
    if tables.is_empty() {
        bail!("no sentence table (*.csv) in {}", dir.display());
    }
    if tables.len() > 1 {
        warnings.push(format!(
            "multiple sentence tables found, using {}",
            tables[0].display()
        ));
    }

    let mut reader = csv::Reader::from_path(&tables[0])
        .with_context(|| format!("open sentence table {}", tables[0].display()))?;
    let mut sentences = BTreeMap::new();
    for row in reader.deserialize::<SentenceRow>() {
        let row = row.with_context(|| format!("parse sentence table {}", tables[0].display()))?;
        if lists.contains(&row.list_num) {
            sentences.insert(row.sentence_num, row.sentence);
        }
    }
    Ok(sentences)
}
