use crate::foundation::error::{KeylineError, KeylineResult};

/// Convergence tolerance for solving the spline's x(u) = x.
const SOLVE_EPSILON: f64 = 1e-9;

/// Cubic Bezier timing curve through `(0,0) (x1,y1) (x2,y2) (1,1)`, as written in SMIL
/// `keySplines` or CSS `cubic-bezier()`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct KeySpline {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

impl KeySpline {
    /// Build a spline, rejecting control points outside `[0, 1]`.
    pub fn new(x1: f64, y1: f64, x2: f64, y2: f64) -> KeylineResult<Self> {
        let spline = Self { x1, y1, x2, y2 };
        spline.validate()?;
        Ok(spline)
    }

    pub fn validate(&self) -> KeylineResult<()> {
        for v in [self.x1, self.y1, self.x2, self.y2] {
            if !(0.0..=1.0).contains(&v) {
                return Err(KeylineError::malformed(format!(
                    "keySpline control values must lie in [0, 1], got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Map a linear fraction `x` in `[0, 1]` through the curve.
    pub fn apply(self, x: f64) -> f64 {
        if x <= 0.0 {
            return 0.0;
        }
        if x >= 1.0 {
            return 1.0;
        }
        let u = solve_curve_x(x, self.x1, self.x2);
        sample_curve(self.y1, self.y2, u)
    }
}

/// How the local fraction between two keyframes is shaped before interpolation.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Easing {
    #[default]
    Linear,
    /// Step from one keyframe to the next with no interpolation.
    Discrete,
    /// One spline per keyframe segment, or a single spline shared by all segments.
    Spline(Vec<KeySpline>),
}

impl Easing {
    /// Remap the fraction within segment `segment`.
    pub fn apply(&self, segment: usize, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::Discrete => 0.0,
            Self::Spline(splines) => match splines.as_slice() {
                [] => t,
                [only] => only.apply(t),
                many => many
                    .get(segment)
                    .or(many.last())
                    .map_or(t, |s| s.apply(t)),
            },
        }
    }

    pub fn validate(&self, segments: usize) -> KeylineResult<()> {
        let Self::Spline(splines) = self else {
            return Ok(());
        };
        if splines.is_empty() {
            return Err(KeylineError::malformed(
                "spline easing requires at least one keySpline",
            ));
        }
        if splines.len() != 1 && splines.len() != segments {
            return Err(KeylineError::malformed(format!(
                "expected {segments} keySplines (one per segment), got {}",
                splines.len()
            )));
        }
        for s in splines {
            s.validate()?;
        }
        Ok(())
    }
}

// Bernstein form with fixed endpoints 0 and 1: B(u) = 3(1-u)^2 u a1 + 3(1-u) u^2 a2 + u^3.
fn sample_curve(a1: f64, a2: f64, u: f64) -> f64 {
    let omu = 1.0 - u;
    3.0 * omu * omu * u * a1 + 3.0 * omu * u * u * a2 + u * u * u
}

fn sample_curve_derivative(a1: f64, a2: f64, u: f64) -> f64 {
    let omu = 1.0 - u;
    3.0 * omu * omu * a1 + 6.0 * omu * u * (a2 - a1) + 3.0 * u * u * (1.0 - a2)
}

// x(u) is monotonic on [0, 1] when x1, x2 are in [0, 1], so bisection always converges.
fn solve_curve_x(x: f64, x1: f64, x2: f64) -> f64 {
    let mut u = x;
    for _ in 0..8 {
        let err = sample_curve(x1, x2, u) - x;
        if err.abs() < SOLVE_EPSILON {
            return u;
        }
        let d = sample_curve_derivative(x1, x2, u);
        if d.abs() < 1e-7 {
            break;
        }
        u = (u - err / d).clamp(0.0, 1.0);
    }

    let mut lo = 0.0;
    let mut hi = 1.0;
    u = x;
    for _ in 0..64 {
        let x_u = sample_curve(x1, x2, u);
        if (x_u - x).abs() < SOLVE_EPSILON {
            break;
        }
        if x_u < x {
            lo = u;
        } else {
            hi = u;
        }
        u = 0.5 * (lo + hi);
    }
    u
}

#[cfg(test)]
#[path = "../../tests/unit/animation/ease.rs"]
mod tests;
