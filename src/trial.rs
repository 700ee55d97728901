//! Trial sequencing state machine.
//!
//! `Idle -> AwaitingStart -> Playing -> AwaitingResponse -> Scoring ->
//! (Adapting -> Playing) | Done`. `Done` is terminal: it is reached exactly
//! when the trial counter hits the stimulus-list length, and every transition
//! method is a no-op from then on.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrialPhase {
    Idle,
    AwaitingStart,
    Playing,
    AwaitingResponse,
    Scoring,
    Adapting,
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitStep {
    Adapt,
    Done,
}

/// What the audio engine is currently armed with. The engine holds one buffer
/// at a time, so end-of-playback has to be attributed to whatever was loaded
/// last; only a trial stimulus may move the runner forward.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LoadedBuffer {
    #[default]
    None,
    Trial,
    Calibration,
}

#[derive(Clone, Copy, Debug)]
pub struct TrialRunner {
    phase: TrialPhase,
    current: usize,
    total: usize,
}

impl TrialRunner {
    /// A runner with no stimulus list stays in `Idle` forever.
    pub fn empty() -> Self {
        Self {
            phase: TrialPhase::Idle,
            current: 0,
            total: 0,
        }
    }

    pub fn new(total: usize) -> Self {
        Self {
            phase: if total == 0 {
                TrialPhase::Idle
            } else {
                TrialPhase::AwaitingStart
            },
            current: 0,
            total,
        }
    }

    pub fn phase(&self) -> TrialPhase {
        self.phase
    }

    /// Zero-based index of the current stimulus.
    pub fn trial_index(&self) -> usize {
        self.current
    }

    /// One-based trial number for display and logging.
    pub fn trial_number(&self) -> usize {
        self.current + 1
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn is_done(&self) -> bool {
        self.phase == TrialPhase::Done
    }

    /// `AwaitingStart -> Playing`; returns the stimulus index to present.
    pub fn start(&mut self) -> Option<usize> {
        if self.phase != TrialPhase::AwaitingStart {
            return None;
        }
        self.phase = TrialPhase::Playing;
        Some(self.current)
    }

    /// `Playing -> AwaitingResponse` once the stimulus has finished sounding.
    pub fn playback_done(&mut self) {
        if self.phase == TrialPhase::Playing {
            self.phase = TrialPhase::AwaitingResponse;
        }
    }

    /// Like [`playback_done`](Self::playback_done), but ignores end-of-playback
    /// from anything other than the armed trial stimulus (e.g. the calibration
    /// tone played from the Tools dialog).
    pub fn playback_done_for(&mut self, loaded: LoadedBuffer) {
        if loaded == LoadedBuffer::Trial {
            self.playback_done();
        }
    }

    /// `AwaitingResponse -> Scoring`.
    pub fn respond(&mut self) -> bool {
        if self.phase != TrialPhase::AwaitingResponse {
            return false;
        }
        self.phase = TrialPhase::Scoring;
        true
    }

    /// `Scoring -> Adapting`, or `Done` when this was the last trial.
    pub fn submit(&mut self) -> Option<SubmitStep> {
        if self.phase != TrialPhase::Scoring {
            return None;
        }
        if self.current + 1 >= self.total {
            self.phase = TrialPhase::Done;
            Some(SubmitStep::Done)
        } else {
            self.phase = TrialPhase::Adapting;
            Some(SubmitStep::Adapt)
        }
    }

    /// `Adapting -> Playing`; advances to and returns the next stimulus index.
    pub fn advance(&mut self) -> Option<usize> {
        if self.phase != TrialPhase::Adapting {
            return None;
        }
        self.current += 1;
        self.phase = TrialPhase::Playing;
        Some(self.current)
    }

    /// Drops back to `Idle` after a presentation failure (missing file,
    /// device error). Controls stay disabled until the list is reloaded.
    pub fn abort(&mut self) {
        self.phase = TrialPhase::Idle;
    }
}
