//! Time-to-value resolution for animations.
//!
//! Everything here is a pure function of `(Animation, t)`: sampling any past or future
//! time always yields the same value.

use crate::{
    animation::{
        anim::{Animation, Phase, Repeat},
        ease::Easing,
        value::AnimValue,
    },
    foundation::error::{KeylineError, KeylineResult},
};

/// Value of an animation at one clock time, with the phase it was computed in.
#[derive(Clone, Debug, PartialEq)]
pub struct Sampled {
    pub value: AnimValue,
    pub phase: Phase,
}

/// Interpolated value of `anim` at clock time `t` (seconds since scene activation).
///
/// Animations that fail [`Animation::validate`] are reported as
/// [`KeylineError::Evaluation`] instead of being sampled.
///
/// Repeating animations are periodic up to floating-point rounding: the cycle position
/// is `(t - begin) % duration`, so `t` and `t + k * duration` agree exactly only when both
/// are exactly representable (for example dyadic fractions of a second).
pub fn sample(anim: &Animation, t: f64) -> KeylineResult<Sampled> {
    anim.validate().map_err(|e| match e {
        KeylineError::MalformedDocument(msg) => {
            KeylineError::evaluation(format!("invalid animation: {msg}"))
        }
        other => other,
    })?;
    let (Some(first), Some(last)) = (anim.first_value(), anim.last_value()) else {
        return Err(KeylineError::evaluation("animation has no keyframes"));
    };
    if !t.is_finite() {
        return Err(KeylineError::evaluation(format!(
            "sample time must be finite, got {t}"
        )));
    }

    let local_t = t - anim.begin;
    if local_t < 0.0 {
        return Ok(Sampled {
            value: first.clone(),
            phase: Phase::Pending,
        });
    }

    if let Repeat::Count(n) = anim.repeat {
        if local_t >= n * anim.duration {
            return Ok(Sampled {
                value: last.clone(),
                phase: Phase::Finished,
            });
        }
    }

    let cycle_t = local_t % anim.duration;
    let p = (cycle_t / anim.duration).clamp(0.0, 1.0);
    let value = value_at_fraction(anim, p)?;
    Ok(Sampled {
        value,
        phase: Phase::Active,
    })
}

/// Resolve one attribute bound to several animations (document order).
///
/// The last animation whose start delay has elapsed wins. When none has started yet the
/// first animation supplies its pending value. Returns `None` for an empty slice.
pub fn resolve(anims: &[Animation], t: f64) -> KeylineResult<Option<Sampled>> {
    let Some(first) = anims.first() else {
        return Ok(None);
    };
    let winner = anims
        .iter()
        .rev()
        .find(|a| t - a.begin >= 0.0)
        .unwrap_or(first);
    sample(winner, t).map(Some)
}

/// Clock time after which every animation in `anims` holds its final value.
///
/// `None` when any of them repeats indefinitely (or the slice is empty).
pub fn settle_time(anims: &[Animation]) -> Option<f64> {
    anims
        .iter()
        .map(Animation::active_end)
        .try_fold(None::<f64>, |acc, end| {
            end.map(|e| Some(acc.map_or(e, |a| a.max(e))))
        })
        .flatten()
}

/// Value at cycle fraction `p` in `[0, 1)`.
fn value_at_fraction(anim: &Animation, p: f64) -> KeylineResult<AnimValue> {
    let keys = &anim.keyframes;
    let n = keys.len();

    // Cycle start is always the first keyframe, even when keyTimes repeat a leading 0.
    if p <= 0.0 {
        return Ok(keys[0].clone());
    }

    if matches!(anim.easing, Easing::Discrete) {
        let idx = match &anim.key_times {
            Some(kt) => kt.partition_point(|&k| k <= p).saturating_sub(1),
            None => (p * n as f64).floor() as usize,
        };
        return Ok(keys[idx.min(n - 1)].clone());
    }

    let (segment, frac) = locate_segment(anim.key_times.as_deref(), n, p);
    let a = &keys[segment];
    let b = &keys[segment + 1];
    if frac <= 0.0 {
        return Ok(a.clone());
    }
    let eased = anim.easing.apply(segment, frac);
    AnimValue::interpolate(a, b, eased)
}

/// Segment index `i` (keyframes `i`, `i + 1`) and the local fraction within it.
fn locate_segment(key_times: Option<&[f64]>, n: usize, p: f64) -> (usize, f64) {
    let last_segment = n - 2;
    match key_times {
        None => {
            let scaled = p * (n - 1) as f64;
            let idx = (scaled.floor() as usize).min(last_segment);
            (idx, (scaled - idx as f64).clamp(0.0, 1.0))
        }
        Some(kt) => {
            let idx = kt
                .partition_point(|&k| k <= p)
                .saturating_sub(1)
                .min(last_segment);
            let span = kt[idx + 1] - kt[idx];
            if span <= 0.0 {
                return (idx, 1.0);
            }
            (idx, ((p - kt[idx]) / span).clamp(0.0, 1.0))
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/eval/scheduler.rs"]
mod tests;
