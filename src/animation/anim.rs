use crate::{
    animation::{
        ease::Easing,
        value::{AnimValue, ValueKind},
    },
    foundation::error::{KeylineError, KeylineResult},
};

/// How many times an animation's simple duration repeats.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Repeat {
    /// Play `n` simple durations (may be fractional), then hold the last keyframe.
    Count(f64),
    Indefinite,
}

impl Default for Repeat {
    fn default() -> Self {
        Self::Count(1.0)
    }
}

/// Where an animation is on its timeline at a given clock time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Start delay has not elapsed yet.
    Pending,
    Active,
    /// Finite repeat count exhausted; the last keyframe is held.
    Finished,
}

/// Timed interpolation over keyframe values, bound to one shape attribute.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Animation {
    pub keyframes: Vec<AnimValue>,
    /// Optional cycle fractions for each keyframe; evenly spaced when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_times: Option<Vec<f64>>,
    /// Simple duration in seconds.
    pub duration: f64,
    #[serde(default)]
    pub repeat: Repeat,
    /// Start delay in seconds from scene activation.
    #[serde(default)]
    pub begin: f64,
    #[serde(default)]
    pub easing: Easing,
}

impl Animation {
    /// A single linear play-through of `keyframes` over `duration` seconds.
    pub fn new(keyframes: Vec<AnimValue>, duration: f64) -> Self {
        Self {
            keyframes,
            key_times: None,
            duration,
            repeat: Repeat::default(),
            begin: 0.0,
            easing: Easing::Linear,
        }
    }

    pub fn with_repeat(mut self, repeat: Repeat) -> Self {
        self.repeat = repeat;
        self
    }

    pub fn with_begin(mut self, begin: f64) -> Self {
        self.begin = begin;
        self
    }

    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }

    pub fn with_key_times(mut self, key_times: Vec<f64>) -> Self {
        self.key_times = Some(key_times);
        self
    }

    /// Kind shared by all keyframes, if the sequence is non-empty.
    pub fn value_kind(&self) -> Option<ValueKind> {
        self.keyframes.first().map(AnimValue::kind)
    }

    pub fn first_value(&self) -> Option<&AnimValue> {
        self.keyframes.first()
    }

    pub fn last_value(&self) -> Option<&AnimValue> {
        self.keyframes.last()
    }

    /// Clock time at which a finite animation stops and holds; `None` when indefinite.
    pub fn active_end(&self) -> Option<f64> {
        match self.repeat {
            Repeat::Count(n) => Some(self.begin + n * self.duration),
            Repeat::Indefinite => None,
        }
    }

    pub fn phase_at(&self, t: f64) -> Phase {
        let local_t = t - self.begin;
        if local_t < 0.0 {
            return Phase::Pending;
        }
        match self.repeat {
            Repeat::Count(n) if local_t >= n * self.duration => Phase::Finished,
            _ => Phase::Active,
        }
    }

    pub fn validate(&self) -> KeylineResult<()> {
        let n = self.keyframes.len();
        if n < 2 {
            return Err(KeylineError::malformed(format!(
                "animation needs at least 2 keyframes, got {n}"
            )));
        }
        let kind = self.keyframes[0].kind();
        if let Some((i, v)) = self
            .keyframes
            .iter()
            .enumerate()
            .find(|(_, v)| v.kind() != kind)
        {
            return Err(KeylineError::malformed(format!(
                "keyframe {i} is a {} but the animation animates a {}",
                v.kind().as_str(),
                kind.as_str()
            )));
        }
        if !(self.duration.is_finite() && self.duration > 0.0) {
            return Err(KeylineError::malformed(format!(
                "animation duration must be > 0, got {}",
                self.duration
            )));
        }
        if !self.begin.is_finite() {
            return Err(KeylineError::malformed("animation begin must be finite"));
        }
        if let Repeat::Count(count) = self.repeat {
            if !(count.is_finite() && count > 0.0) {
                return Err(KeylineError::malformed(format!(
                    "repeat count must be > 0, got {count}"
                )));
            }
        }
        if let Some(key_times) = &self.key_times {
            validate_key_times(key_times, n, matches!(self.easing, Easing::Discrete))?;
        }
        self.easing.validate(n - 1)
    }
}

fn validate_key_times(key_times: &[f64], keyframes: usize, discrete: bool) -> KeylineResult<()> {
    if key_times.len() != keyframes {
        return Err(KeylineError::malformed(format!(
            "keyTimes has {} entries but there are {keyframes} keyframes",
            key_times.len()
        )));
    }
    if key_times.iter().any(|k| !(0.0..=1.0).contains(k)) {
        return Err(KeylineError::malformed("keyTimes must lie in [0, 1]"));
    }
    if !key_times.windows(2).all(|w| w[0] <= w[1]) {
        return Err(KeylineError::malformed("keyTimes must be non-decreasing"));
    }
    if key_times[0] != 0.0 {
        return Err(KeylineError::malformed("keyTimes must start at 0"));
    }
    if !discrete && key_times[keyframes - 1] != 1.0 {
        return Err(KeylineError::malformed(
            "keyTimes must end at 1 for interpolated animations",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/animation/anim.rs"]
mod tests;
