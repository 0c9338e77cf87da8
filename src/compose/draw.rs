use std::collections::BTreeMap;

use crate::{
    foundation::core::{Affine, Canvas, ShapeId},
    scene::{
        model::{AttrValue, ShapeKind},
        resource::Resource,
    },
};

/// Ordered draw instructions for one frame. Later items paint over earlier ones.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DrawList {
    /// Clock time the frame was composed for, in seconds.
    pub time: f64,
    pub canvas: Canvas,
    pub items: Vec<DrawItem>,
}

impl DrawList {
    pub fn item(&self, shape: ShapeId) -> Option<&DrawItem> {
        self.items.iter().find(|i| i.shape == shape)
    }

    pub fn item_by_name(&self, name: &str) -> Option<&DrawItem> {
        self.items.iter().find(|i| i.name.as_deref() == Some(name))
    }
}

/// One shape with every attribute resolved at the frame's time.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DrawItem {
    pub shape: ShapeId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub kind: ShapeKind,
    pub transform: Affine,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    pub attributes: BTreeMap<String, AttrValue>,
    /// Copies of every resource the attributes reference, in attribute-name order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<ResolvedResource>,
}

impl DrawItem {
    pub fn attribute(&self, name: &str) -> Option<&AttrValue> {
        self.attributes.get(name)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.attribute(name).and_then(AttrValue::as_number)
    }

    pub fn resource_for(&self, attribute: &str) -> Option<&Resource> {
        self.resources
            .iter()
            .find(|r| r.attribute == attribute)
            .map(|r| &r.resource)
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResolvedResource {
    /// Attribute holding the reference (`fill`, `stroke`, `filter`, ...).
    pub attribute: String,
    pub id: String,
    pub resource: Resource,
}
