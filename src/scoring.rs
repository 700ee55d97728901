//! Per-word scoring of a trial transcript.
//!
//! Key words are the capitalized tokens of the sentence, except the literal
//! article "A", which is never scorable.

/// Strips leading/trailing punctuation so "Dog," and "(Dog" score as "Dog".
pub fn clean_token(raw: &str) -> &str {
    raw.trim_matches(|c: char| !c.is_alphanumeric())
}

pub fn is_key_word(raw: &str) -> bool {
    let token = clean_token(raw);
    if token == "A" {
        return false;
    }
    token.chars().next().map(|c| c.is_uppercase()).unwrap_or(false)
}

#[derive(Clone, Debug)]
pub struct Word {
    pub text: String,
    pub key: bool,
    pub checked: bool,
}

/// The current trial's transcript with one checkbox state per key word.
#[derive(Clone, Debug, Default)]
pub struct TrialWords {
    pub words: Vec<Word>,
}

impl TrialWords {
    pub fn from_sentence(sentence: &str) -> Self {
        let words = sentence
            .split_whitespace()
            .map(|w| Word {
                text: w.to_string(),
                key: is_key_word(w),
                checked: false,
            })
            .collect();
        Self { words }
    }

    pub fn key_count(&self) -> usize {
        self.words.iter().filter(|w| w.key).count()
    }

    pub fn clear_checks(&mut self) {
        for w in &mut self.words {
            w.checked = false;
        }
    }

    /// Partitions key words into correct (checked) and incorrect sets.
    pub fn score(&self) -> TrialScore {
        let mut correct = Vec::new();
        let mut incorrect = Vec::new();
        for w in self.words.iter().filter(|w| w.key) {
            let token = clean_token(&w.text).to_string();
            if w.checked {
                correct.push(token);
            } else {
                incorrect.push(token);
            }
        }
        let num_correct = correct.len();
        let num_key = num_correct + incorrect.len();
        TrialScore {
            words_correct: correct.join(" "),
            words_incorrect: incorrect.join(" "),
            num_correct,
            num_key,
            // All key words repeated back counts as a right trial. A sentence
            // with no key words has nothing to miss.
            outcome: u8::from(num_correct == num_key),
        }
    }
}

#[derive(Clone, Debug)]
pub struct TrialScore {
    pub words_correct: String,
    pub words_incorrect: String,
    pub num_correct: usize,
    pub num_key: usize,
    /// 1 = right, 0 = wrong; drives the level tracker.
    pub outcome: u8,
}

impl TrialScore {
    pub fn is_correct(&self) -> bool {
        self.outcome == 1
    }
}
