use std::collections::BTreeMap;

use crate::{
    animation::value::AnimValue,
    compose::draw::{DrawItem, DrawList, ResolvedResource},
    eval::scheduler::{resolve, settle_time},
    foundation::error::{KeylineError, KeylineResult},
    scene::model::{AttrValue, BindingKey, Scene, Shape, describe},
};

/// Held values of bindings whose animations have all finished.
///
/// An entry is only written for times at or past the binding's settle time, where
/// resolution is constant, so reading it back never changes a frame.
#[derive(Clone, Debug, Default)]
pub(crate) struct FrameCache {
    latched: BTreeMap<BindingKey, AnimValue>,
}

impl FrameCache {
    pub(crate) fn clear(&mut self) {
        self.latched.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.latched.len()
    }

    pub(crate) fn is_latched(&self, key: &BindingKey) -> bool {
        self.latched.contains_key(key)
    }
}

/// Resolve every shape of `scene` at clock time `t` into an ordered draw list.
///
/// Any failure aborts the whole frame; no partial list is returned.
#[tracing::instrument(skip(scene), fields(shapes = scene.shapes.len()))]
pub fn compose_frame(scene: &Scene, t: f64) -> KeylineResult<DrawList> {
    compose_frame_with_cache(scene, t, &mut FrameCache::default())
}

/// Like [`compose_frame`], reusing and extending `cache`. Latches found during this
/// frame are committed only when the frame succeeds.
pub(crate) fn compose_frame_with_cache(
    scene: &Scene,
    t: f64,
    cache: &mut FrameCache,
) -> KeylineResult<DrawList> {
    if !t.is_finite() {
        return Err(KeylineError::evaluation(format!(
            "frame time must be finite, got {t}"
        )));
    }

    let mut new_latches: Vec<(BindingKey, AnimValue)> = Vec::new();
    let mut items = Vec::with_capacity(scene.shapes.len());

    for shape in &scene.shapes {
        let mut attributes = shape.attributes.clone();
        for (key, anims) in scene.bindings_for(shape.id) {
            let value = match cache.latched.get(key) {
                Some(held) => held.clone(),
                None => {
                    let Some(sampled) =
                        resolve(anims, t).map_err(|e| in_binding(e, shape, &key.attribute))?
                    else {
                        continue;
                    };
                    if settle_time(anims).is_some_and(|end| t >= end) {
                        new_latches.push((key.clone(), sampled.value.clone()));
                    }
                    sampled.value
                }
            };
            let resolved = AttrValue::from_animated(value, shape.attributes.get(&key.attribute));
            attributes.insert(key.attribute.clone(), resolved);
        }

        let resources = resolve_resources(scene, shape, &attributes)?;
        items.push(DrawItem {
            shape: shape.id,
            name: shape.name.clone(),
            kind: shape.kind,
            transform: shape.transform,
            text: shape.text.clone(),
            attributes,
            resources,
        });
    }

    for (key, value) in new_latches {
        tracing::trace!(
            shape = key.shape.0,
            attribute = key.attribute.as_str(),
            t,
            "binding finished; value latched"
        );
        cache.latched.insert(key, value);
    }

    Ok(DrawList {
        time: t,
        canvas: scene.canvas,
        items,
    })
}

fn resolve_resources(
    scene: &Scene,
    shape: &Shape,
    attributes: &BTreeMap<String, AttrValue>,
) -> KeylineResult<Vec<ResolvedResource>> {
    attributes
        .iter()
        .filter_map(|(attr, v)| v.resource_ref().map(|id| (attr, id)))
        .map(|(attr, id)| {
            let resource = scene.resource(id).ok_or_else(|| {
                KeylineError::unresolved(format!(
                    "{} references '{id}' via {attr}",
                    describe(shape)
                ))
            })?;
            Ok(ResolvedResource {
                attribute: attr.clone(),
                id: id.to_string(),
                resource: resource.clone(),
            })
        })
        .collect()
}

/// Prefix scheduler errors with the binding they came from, keeping the variant.
fn in_binding(err: KeylineError, shape: &Shape, attribute: &str) -> KeylineError {
    let at = format!("{} attribute '{attribute}'", describe(shape));
    match err {
        KeylineError::IncompatiblePath(msg) => KeylineError::incompatible_path(format!("{at}: {msg}")),
        KeylineError::Evaluation(msg) => KeylineError::evaluation(format!("{at}: {msg}")),
        other => other,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/compositor.rs"]
mod tests;
