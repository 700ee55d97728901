//! Calibration math and the adaptive presentation-level tracker.

/// Difference between the sound-level-meter measurement and the raw digital
/// level of the calibration stimulus. Converting a target dB-SPL level into a
/// digital full-scale level is a single subtraction once this is known.
pub fn slm_offset(slm_reading: f32, raw_level: f32) -> f32 {
    slm_reading - raw_level
}

/// Digital full-scale level that will sound at `target_db` through the
/// calibrated output chain.
pub fn adjusted_level(target_db: f32, offset_db: f32) -> f32 {
    target_db - offset_db
}

/// Fixed-step up/down level tracker.
///
/// A correct response lowers the target level by `step_right_db`; an incorrect
/// one raises it by `step_wrong_db`. Steps are independently configurable and
/// never reversed or reduced: there is no reversal detection and no
/// convergence criterion.
#[derive(Clone, Copy, Debug)]
pub struct LevelTracker {
    pub level_db: f32,
    pub step_right_db: f32,
    pub step_wrong_db: f32,
}

impl LevelTracker {
    pub fn new(start_db: f32, step_right_db: f32, step_wrong_db: f32) -> Self {
        Self {
            level_db: start_db,
            step_right_db: step_right_db.abs(),
            step_wrong_db: step_wrong_db.abs(),
        }
    }

    /// Applies one outcome and returns the new target level.
    pub fn record(&mut self, correct: bool) -> f32 {
        if correct {
            self.level_db -= self.step_right_db;
        } else {
            self.level_db += self.step_wrong_db;
        }
        self.level_db
    }
}
