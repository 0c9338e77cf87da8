use crate::foundation::error::{KeylineError, KeylineResult};

/// Animation time in seconds since scene activation. Never moves backwards.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Clock {
    now: f64,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    /// Check that the clock may move to `t` without changing it.
    pub fn check(&self, t: f64) -> KeylineResult<()> {
        if !t.is_finite() || t < 0.0 {
            return Err(KeylineError::evaluation(format!(
                "frame time must be finite and non-negative, got {t}"
            )));
        }
        if t < self.now {
            return Err(KeylineError::ClockRegression {
                now: self.now,
                requested: t,
            });
        }
        Ok(())
    }

    pub fn advance_to(&mut self, t: f64) -> KeylineResult<()> {
        self.check(t)?;
        self.now = t;
        Ok(())
    }

    pub fn reset(&mut self) {
        self.now = 0.0;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/clock.rs"]
mod tests;
