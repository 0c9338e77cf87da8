//! Keyline turns a declarative animated vector graphic into per-frame draw lists.
//!
//! The input is an SVG document whose shapes carry SMIL `<animate>` children: keyframe
//! values, durations, repeat counts, start delays, key times and spline easing. The output
//! for any clock time is a [`DrawList`]: every shape in paint order with its attributes
//! resolved and its gradients and filters copied in. Rasterizing that list is left to the
//! host.
//!
//! # Pipeline overview
//!
//! 1. **Load**: `SVG text -> Scene` ([`load`], [`load_with`], or [`load_json`] for a
//!    serialized scene). All structural problems surface here as
//!    [`KeylineError::MalformedDocument`].
//! 2. **Schedule**: `(Animation, t) -> value` ([`sample`], [`resolve`]), a pure function of
//!    its inputs.
//! 3. **Compose**: `(Scene, t) -> DrawList` ([`compose_frame`]).
//!
//! A [`Player`] owns the clock for interactive playback: [`Player::activate`],
//! [`Player::render_frame`], [`Player::deactivate`].
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Deterministic**: identical scenes and times give identical draw lists and
//!   [`DrawFingerprint`]s.
//! - **Immutable scenes**: playback never mutates a [`Scene`]; the only mutable state is
//!   the player's clock and finished-binding latches.
#![forbid(unsafe_code)]

mod animation;
mod compose;
mod document;
mod eval;
mod foundation;
mod playback;
mod scene;

pub use animation::anim::{Animation, Phase, Repeat};
pub use animation::ease::{Easing, KeySpline};
pub use animation::value::{AnimValue, Lerp, ValueKind};
pub use compose::compositor::compose_frame;
pub use compose::draw::{DrawItem, DrawList, ResolvedResource};
pub use compose::fingerprint::{DrawFingerprint, fingerprint_draw_list};
pub use document::json::{load_json, scene_to_json};
pub use document::options::{LoadOptions, UnknownElements};
pub use document::svg::{load, load_with};
pub use eval::scheduler::{Sampled, resolve, sample, settle_time};
pub use foundation::core::{Affine, BezPath, Canvas, Color, PathEl, Point, Rect, ShapeId};
pub use foundation::error::{KeylineError, KeylineResult};
pub use playback::clock::Clock;
pub use playback::player::Player;
pub use scene::model::{AttrValue, BindingKey, Paint, Scene, Shape, ShapeKind};
pub use scene::resource::{
    Filter, FilterPrimitive, Gradient, GradientGeometry, GradientStop, GradientUnits, Resource,
    SpreadMethod,
};
