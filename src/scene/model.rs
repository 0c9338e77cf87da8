use std::collections::BTreeMap;

use crate::{
    animation::{
        anim::Animation,
        value::{AnimValue, ValueKind},
    },
    foundation::{
        core::{Affine, BezPath, Canvas, Color, ShapeId},
        error::{KeylineError, KeylineResult},
    },
    scene::resource::Resource,
};

/// In-memory representation of a whole animated graphic.
///
/// Built once by the loader and read-only afterwards; per-frame values come from
/// resolving [`Scene::bindings`] against a clock time, never from mutating the scene.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scene {
    pub canvas: Canvas,
    /// Paint order: later shapes draw over earlier ones.
    pub shapes: Vec<Shape>,
    /// Resources keyed by document id.
    pub resources: BTreeMap<String, Resource>,
    /// Animations per (shape, attribute), in document order within each binding.
    #[serde(with = "binding_entries")]
    pub bindings: BTreeMap<BindingKey, Vec<Animation>>,
}

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize)]
pub struct BindingKey {
    pub shape: ShapeId,
    pub attribute: String,
}

impl BindingKey {
    pub fn new(shape: ShapeId, attribute: impl Into<String>) -> Self {
        Self {
            shape,
            attribute: attribute.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShapeKind {
    Circle,
    Ellipse,
    Rect,
    Line,
    Polyline,
    Polygon,
    Path,
    Text,
}

impl ShapeKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        Some(match tag {
            "circle" => Self::Circle,
            "ellipse" => Self::Ellipse,
            "rect" => Self::Rect,
            "line" => Self::Line,
            "polyline" => Self::Polyline,
            "polygon" => Self::Polygon,
            "path" => Self::Path,
            "text" => Self::Text,
            _ => return None,
        })
    }
}

/// A single drawable primitive.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    /// The document's `id` attribute, when present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub kind: ShapeKind,
    /// Static user-space transform, including enclosing groups.
    pub transform: Affine,
    /// Character data for text runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Base attribute values; geometry (`cx`, `r`, `d`, ...) lives here too.
    pub attributes: BTreeMap<String, AttrValue>,
}

impl Shape {
    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    /// Resource ids this shape references, with the attribute holding each reference.
    pub fn resource_refs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .filter_map(|(name, v)| v.resource_ref().map(|id| (name.as_str(), id)))
    }
}

/// Paint server value for `fill` and `stroke`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Paint {
    None,
    Color(Color),
    /// `url(#id)` reference to a gradient.
    Resource(String),
}

/// Base or resolved value of a shape attribute.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum AttrValue {
    Number(f64),
    Color(Color),
    Path(BezPath),
    Paint(Paint),
    /// `url(#id)` reference that is not a paint (e.g. `filter`).
    Reference(String),
    /// Anything else, kept verbatim (`font-family`, `text-anchor`, percentages, ...).
    Keyword(String),
}

impl AttrValue {
    pub fn resource_ref(&self) -> Option<&str> {
        match self {
            Self::Paint(Paint::Resource(id)) | Self::Reference(id) => Some(id),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Animated value as it should appear in place of `base`.
    ///
    /// Colors animating a paint attribute stay paints so consumers see one shape per
    /// attribute regardless of whether it is animated.
    pub fn from_animated(value: AnimValue, base: Option<&AttrValue>) -> Self {
        match (value, base) {
            (AnimValue::Color(c), Some(Self::Paint(_))) => Self::Paint(Paint::Color(c)),
            (AnimValue::Number(v), _) => Self::Number(v),
            (AnimValue::Color(c), _) => Self::Color(c),
            (AnimValue::Path(p), _) => Self::Path(p),
        }
    }

    /// Static value usable as the implicit start of a `to`/`by` animation.
    pub fn as_anim_value(&self) -> Option<AnimValue> {
        match self {
            Self::Number(v) => Some(AnimValue::Number(*v)),
            Self::Color(c) | Self::Paint(Paint::Color(c)) => Some(AnimValue::Color(*c)),
            Self::Path(p) => Some(AnimValue::Path(p.clone())),
            _ => None,
        }
    }
}

impl Scene {
    pub fn shape(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.get(id.0 as usize)
    }

    pub fn shape_by_name(&self, name: &str) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.name.as_deref() == Some(name))
    }

    pub fn resource(&self, id: &str) -> Option<&Resource> {
        self.resources.get(id)
    }

    pub fn animations(&self, shape: ShapeId, attribute: &str) -> &[Animation] {
        self.bindings
            .get(&BindingKey::new(shape, attribute))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Bindings of one shape, ordered by attribute name.
    pub fn bindings_for(
        &self,
        shape: ShapeId,
    ) -> impl Iterator<Item = (&BindingKey, &Vec<Animation>)> {
        self.bindings
            .range(BindingKey::new(shape, "")..)
            .take_while(move |(k, _)| k.shape == shape)
    }

    pub fn animation_count(&self) -> usize {
        self.bindings.values().map(Vec::len).sum()
    }

    /// Structural checks shared by every way of building a scene.
    pub fn validate(&self) -> KeylineResult<()> {
        for (index, shape) in self.shapes.iter().enumerate() {
            if shape.id.0 as usize != index {
                return Err(KeylineError::malformed(format!(
                    "shape at index {index} carries id {}",
                    shape.id.0
                )));
            }
            for (attr, id) in shape.resource_refs() {
                let Some(resource) = self.resources.get(id) else {
                    return Err(KeylineError::malformed(format!(
                        "{} references undefined resource '{id}' via {attr}",
                        describe(shape)
                    )));
                };
                if (attr == "filter") != matches!(resource, Resource::Filter(_)) {
                    return Err(KeylineError::malformed(format!(
                        "{} uses {} '{id}' as {attr}",
                        describe(shape),
                        resource.kind_name()
                    )));
                }
            }
        }

        for (key, anims) in &self.bindings {
            let shape = self.shape(key.shape).ok_or_else(|| {
                KeylineError::malformed(format!(
                    "animation of '{}' is bound to missing shape {}",
                    key.attribute, key.shape.0
                ))
            })?;
            let expected = ValueKind::for_attribute(&key.attribute);
            for anim in anims {
                anim.validate().map_err(|e| {
                    KeylineError::malformed(format!(
                        "{} attribute '{}': {}",
                        describe(shape),
                        key.attribute,
                        strip_prefix(&e)
                    ))
                })?;
                if anim.value_kind() != Some(expected) {
                    return Err(KeylineError::malformed(format!(
                        "{} attribute '{}' expects {} keyframes",
                        describe(shape),
                        key.attribute,
                        expected.as_str()
                    )));
                }
            }
        }
        Ok(())
    }
}

pub(crate) fn describe(shape: &Shape) -> String {
    match &shape.name {
        Some(name) => format!("shape '{name}'"),
        None => format!("shape #{}", shape.id.0),
    }
}

fn strip_prefix(err: &KeylineError) -> String {
    match err {
        KeylineError::MalformedDocument(msg) => msg.clone(),
        other => other.to_string(),
    }
}

// JSON object keys must be strings, so bindings travel as a list of entries.
mod binding_entries {
    use std::collections::BTreeMap;

    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::{Animation, BindingKey};
    use crate::foundation::core::ShapeId;

    #[derive(Serialize)]
    struct EntryRef<'a> {
        shape: ShapeId,
        attribute: &'a str,
        animations: &'a [Animation],
    }

    #[derive(Deserialize)]
    struct Entry {
        shape: ShapeId,
        attribute: String,
        animations: Vec<Animation>,
    }

    pub(super) fn serialize<S>(
        map: &BTreeMap<BindingKey, Vec<Animation>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_seq(map.iter().map(|(k, v)| EntryRef {
            shape: k.shape,
            attribute: &k.attribute,
            animations: v,
        }))
    }

    pub(super) fn deserialize<'de, D>(
        deserializer: D,
    ) -> Result<BTreeMap<BindingKey, Vec<Animation>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let entries = Vec::<Entry>::deserialize(deserializer)?;
        let mut out: BTreeMap<BindingKey, Vec<Animation>> = BTreeMap::new();
        for e in entries {
            out.entry(BindingKey::new(e.shape, e.attribute))
                .or_default()
                .extend(e.animations);
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
