use crate::foundation::{
    core::{BezPath, Color, PathEl},
    error::{KeylineError, KeylineResult},
    math::lerp_f64,
};

/// Kind of an animated value. All keyframes of one animation share a kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    Number,
    Color,
    Path,
}

impl ValueKind {
    /// Kind an attribute expects for its animated values.
    ///
    /// Geometry (`d`, `points`) animates as paths, paint-like attributes as colors and
    /// everything else as plain numbers.
    pub fn for_attribute(name: &str) -> Self {
        match name {
            "d" | "points" => Self::Path,
            "fill" | "stroke" | "stop-color" | "flood-color" | "lighting-color" | "color" => {
                Self::Color
            }
            _ => Self::Number,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Color => "color",
            Self::Path => "path",
        }
    }
}

/// A single keyframe value.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AnimValue {
    Number(f64),
    Color(Color),
    Path(BezPath),
}

impl AnimValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            Self::Number(_) => ValueKind::Number,
            Self::Color(_) => ValueKind::Color,
            Self::Path(_) => ValueKind::Path,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            Self::Color(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&BezPath> {
        match self {
            Self::Path(p) => Some(p),
            _ => None,
        }
    }

    /// Interpolate between two values of the same kind at fraction `t`.
    pub fn interpolate(a: &Self, b: &Self, t: f64) -> KeylineResult<Self> {
        match (a, b) {
            (Self::Number(x), Self::Number(y)) => Ok(Self::Number(<f64 as Lerp>::lerp(x, y, t))),
            (Self::Color(x), Self::Color(y)) => Ok(Self::Color(<Color as Lerp>::lerp(x, y, t))),
            (Self::Path(x), Self::Path(y)) => lerp_path(x, y, t).map(Self::Path),
            _ => Err(KeylineError::evaluation(format!(
                "cannot interpolate {} keyframe into {} keyframe",
                a.kind().as_str(),
                b.kind().as_str()
            ))),
        }
    }
}

pub trait Lerp: Sized {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        lerp_f64(*a, *b, t)
    }
}

impl Lerp for Color {
    fn lerp(a: &Self, b: &Self, t: f64) -> Self {
        Self {
            r: lerp_f64(a.r, b.r, t),
            g: lerp_f64(a.g, b.g, t),
            b: lerp_f64(a.b, b.b, t),
            a: lerp_f64(a.a, b.a, t),
        }
    }
}

/// Pairwise control point interpolation; both paths must have the same element sequence.
fn lerp_path(a: &BezPath, b: &BezPath, t: f64) -> KeylineResult<BezPath> {
    let (ea, eb) = (a.elements(), b.elements());
    if ea.len() != eb.len() {
        return Err(KeylineError::incompatible_path(format!(
            "path keyframes have {} and {} elements",
            ea.len(),
            eb.len()
        )));
    }

    let mut out = Vec::with_capacity(ea.len());
    for (i, (x, y)) in ea.iter().zip(eb).enumerate() {
        let el = match (*x, *y) {
            (PathEl::MoveTo(p), PathEl::MoveTo(q)) => PathEl::MoveTo(p.lerp(q, t)),
            (PathEl::LineTo(p), PathEl::LineTo(q)) => PathEl::LineTo(p.lerp(q, t)),
            (PathEl::QuadTo(p1, p2), PathEl::QuadTo(q1, q2)) => {
                PathEl::QuadTo(p1.lerp(q1, t), p2.lerp(q2, t))
            }
            (PathEl::CurveTo(p1, p2, p3), PathEl::CurveTo(q1, q2, q3)) => {
                PathEl::CurveTo(p1.lerp(q1, t), p2.lerp(q2, t), p3.lerp(q3, t))
            }
            (PathEl::ClosePath, PathEl::ClosePath) => PathEl::ClosePath,
            _ => {
                return Err(KeylineError::incompatible_path(format!(
                    "path element {i} differs in command: {x:?} vs {y:?}"
                )));
            }
        };
        out.push(el);
    }
    Ok(BezPath::from_vec(out))
}

#[cfg(test)]
#[path = "../../tests/unit/animation/value.rs"]
mod tests;
