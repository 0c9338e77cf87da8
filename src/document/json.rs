use crate::{
    foundation::error::{KeylineError, KeylineResult},
    scene::model::Scene,
};

/// Deserialize a scene previously written by [`scene_to_json`], with the same structural
/// checks as the SVG loader.
#[tracing::instrument(skip(json), fields(bytes = json.len()))]
pub fn load_json(json: &str) -> KeylineResult<Scene> {
    let scene: Scene = serde_json::from_str(json)
        .map_err(|e| KeylineError::serde(format!("scene json: {e}")))?;
    scene.validate()?;
    tracing::debug!(
        shapes = scene.shapes.len(),
        animations = scene.animation_count(),
        "loaded scene json"
    );
    Ok(scene)
}

pub fn scene_to_json(scene: &Scene) -> KeylineResult<String> {
    serde_json::to_string_pretty(scene).map_err(|e| KeylineError::serde(format!("scene json: {e}")))
}

#[cfg(test)]
#[path = "../../tests/unit/document/json.rs"]
mod tests;
