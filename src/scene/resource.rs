use crate::foundation::core::{Affine, Color};

/// Reusable paint or effect definition referenced by id from shapes.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Resource {
    Gradient(Gradient),
    Filter(Filter),
}

impl Resource {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Gradient(_) => "gradient",
            Self::Filter(_) => "filter",
        }
    }

    pub fn as_gradient(&self) -> Option<&Gradient> {
        match self {
            Self::Gradient(g) => Some(g),
            Self::Filter(_) => None,
        }
    }

    pub fn as_filter(&self) -> Option<&Filter> {
        match self {
            Self::Filter(f) => Some(f),
            Self::Gradient(_) => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Gradient {
    pub geometry: GradientGeometry,
    pub units: GradientUnits,
    #[serde(default = "identity")]
    pub transform: Affine,
    #[serde(default)]
    pub spread: SpreadMethod,
    /// Sorted by offset, offsets in `[0, 1]`.
    pub stops: Vec<GradientStop>,
}

fn identity() -> Affine {
    Affine::IDENTITY
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GradientGeometry {
    Linear {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
    },
    Radial {
        cx: f64,
        cy: f64,
        r: f64,
        fx: f64,
        fy: f64,
    },
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientUnits {
    #[default]
    ObjectBoundingBox,
    UserSpaceOnUse,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpreadMethod {
    #[default]
    Pad,
    Reflect,
    Repeat,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GradientStop {
    pub offset: f64,
    pub color: Color,
    pub opacity: f64,
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Filter {
    pub primitives: Vec<FilterPrimitive>,
}

/// One step of a filter chain. `input`/`result` name intermediate images as in SVG
/// (`SourceGraphic`, `SourceAlpha`, or a previous `result`).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FilterPrimitive {
    GaussianBlur {
        std_dev_x: f64,
        std_dev_y: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        input: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<String>,
    },
    Offset {
        dx: f64,
        dy: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        input: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<String>,
    },
    Flood {
        color: Color,
        opacity: f64,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<String>,
    },
    Merge {
        inputs: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        result: Option<String>,
    },
}

impl FilterPrimitive {
    pub fn result(&self) -> Option<&str> {
        match self {
            Self::GaussianBlur { result, .. }
            | Self::Offset { result, .. }
            | Self::Flood { result, .. }
            | Self::Merge { result, .. } => result.as_deref(),
        }
    }
}
