use crate::{
    compose::{
        compositor::{FrameCache, compose_frame_with_cache},
        draw::DrawList,
    },
    foundation::error::{KeylineError, KeylineResult},
    playback::clock::Clock,
    scene::model::{BindingKey, Scene},
};

/// Drives one scene frame by frame: owns the clock and the finished-binding latches.
///
/// Frames are requested at non-decreasing times. A failed frame is skipped and leaves
/// the player exactly as it was, so the host can keep rendering later frames.
#[derive(Debug, Default)]
pub struct Player {
    scene: Option<Scene>,
    clock: Clock,
    cache: FrameCache,
}

impl Player {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `scene` the active scene, starting its clock at zero. Any previously active
    /// scene is dropped.
    pub fn activate(&mut self, scene: Scene) {
        tracing::debug!(
            shapes = scene.shapes.len(),
            animations = scene.animation_count(),
            "scene activated"
        );
        self.scene = Some(scene);
        self.clock.reset();
        self.cache.clear();
    }

    /// Stop playback and hand the scene back.
    pub fn deactivate(&mut self) -> Option<Scene> {
        self.clock.reset();
        self.cache.clear();
        let scene = self.scene.take();
        if scene.is_some() {
            tracing::debug!("scene deactivated");
        }
        scene
    }

    pub fn is_active(&self) -> bool {
        self.scene.is_some()
    }

    /// Current clock time in seconds.
    pub fn now(&self) -> f64 {
        self.clock.now()
    }

    pub fn scene(&self) -> Option<&Scene> {
        self.scene.as_ref()
    }

    /// Number of bindings whose final value is currently latched.
    pub fn latched_bindings(&self) -> usize {
        self.cache.len()
    }

    /// Whether `key` has finished and its final value is latched.
    pub fn is_latched(&self, key: &BindingKey) -> bool {
        self.cache.is_latched(key)
    }

    /// Advance the clock to `t` seconds and compose the frame for it.
    #[tracing::instrument(skip(self))]
    pub fn render_frame(&mut self, t: f64) -> KeylineResult<DrawList> {
        let Some(scene) = self.scene.as_ref() else {
            return Err(KeylineError::evaluation("no active scene"));
        };
        self.clock.check(t)?;

        let list = compose_frame_with_cache(scene, t, &mut self.cache).map_err(|e| {
            tracing::warn!(error = %e, "frame skipped");
            e
        })?;
        self.clock.advance_to(t)?;
        Ok(list)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/playback/player.rs"]
mod tests;
