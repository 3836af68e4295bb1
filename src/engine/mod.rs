//! The viewer facade: one scene, one camera, one render consumer.
//!
//! [`Viewer`] owns every subsystem and exposes the programmatic entry points
//! (zoom, rotation, camera moves, playback, primitives, render). Camera
//! state sits behind a [`SharedTransform`] so camera-move threads can edit
//! it under the same lock the render pass finalizes with.

mod animation;
mod camera;
pub mod command;
mod options;
mod scene_management;

use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

pub use command::ViewerCommand;

use crate::animation::{AnimationScheduler, RepaintManager, StatusListener};
use crate::camera::{lock_transform, MoveOutcome, SharedTransform, TransformManager};
use crate::error::ViewerError;
use crate::options::Options;
use crate::renderer::{
    ClipRect, Palette, Rasterizer, RenderContext, RenderDispatcher,
    RendererRegistry, RenderStats,
};
use crate::scene::Scene;
use crate::util::cancel::CancelToken;

/// A camera move running on its own thread.
struct CameraMoveThread {
    cancel: CancelToken,
    handle: JoinHandle<MoveOutcome>,
}

/// Interactive molecular viewer core.
///
/// # Frame loop
///
/// The host calls [`render`](Self::render) with a clip rectangle and a
/// [`Rasterizer`] whenever [`repaint_manager`](Self::repaint_manager)
/// reports a pending repaint. Each pass finalizes the transform exactly
/// once, so every projection in the pass agrees.
///
/// # Threads
///
/// Playback runs on the scheduler's worker; programmatic camera moves run
/// on a dedicated thread that waits for each repaint before stepping. Only
/// the host thread draws.
pub struct Viewer {
    options: Options,
    scene: Scene,
    transform: SharedTransform,
    dispatcher: RenderDispatcher,
    palette: Palette,
    repaint: Arc<RepaintManager>,
    scheduler: AnimationScheduler,
    camera_move: Option<CameraMoveThread>,
}

// =============================================================================
// Core
// =============================================================================

impl Default for Viewer {
    fn default() -> Self {
        Self::build(Options::default(), RendererRegistry::with_builtin())
    }
}

impl Viewer {
    /// Viewer with the built-in renderers.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidOption`] when `options` fail
    /// validation.
    pub fn new(options: Options) -> Result<Self, ViewerError> {
        Self::with_registry(options, RendererRegistry::with_builtin())
    }

    /// Viewer with a custom renderer table.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::InvalidOption`] when `options` fail
    /// validation.
    pub fn with_registry(
        options: Options,
        registry: RendererRegistry,
    ) -> Result<Self, ViewerError> {
        options
            .validate()
            .inspect_err(|e| log::error!("rejected viewer options: {e}"))?;
        Ok(Self::build(options, registry))
    }

    fn build(options: Options, registry: RendererRegistry) -> Self {
        let repaint = Arc::new(RepaintManager::new());
        let transform = Arc::new(Mutex::new(TransformManager::new(
            &options.camera,
            &options.display,
        )));
        let scheduler =
            AnimationScheduler::new(&options.animation, Arc::clone(&repaint));
        Self {
            options,
            scene: Scene::new(),
            transform,
            dispatcher: RenderDispatcher::new(registry),
            palette: Palette::new(),
            repaint,
            scheduler,
            camera_move: None,
        }
    }

    /// Run one render pass over `clip`.
    ///
    /// Finalizes the transform, draws every populated visible shape of the
    /// displayed frame, then reports the pass to the repaint manager.
    pub fn render(
        &mut self,
        clip: ClipRect,
        rasterizer: &mut dyn Rasterizer,
    ) -> RenderStats {
        let snapshot =
            lock_transform(&self.transform).finalize_transform_parameters();
        let frame = self.scene.frame(self.scheduler.current_frame());
        let mut ctx = RenderContext::new(
            &snapshot,
            &self.scene,
            frame,
            clip,
            &self.palette,
            &self.options.display,
            rasterizer,
        );
        let stats = self.dispatcher.render(&mut ctx);
        self.scene.mark_rendered();
        self.repaint.repaint_done();
        stats
    }

    /// Repaint coordination shared with the host loop.
    #[must_use]
    pub fn repaint_manager(&self) -> &Arc<RepaintManager> {
        &self.repaint
    }

    /// Whether anything changed since the last pass.
    #[must_use]
    pub fn needs_repaint(&self) -> bool {
        self.scene.is_dirty() || self.repaint.repaint_pending()
    }

    /// Transform engine shared with camera-move threads.
    #[must_use]
    pub fn transform(&self) -> &SharedTransform {
        &self.transform
    }

    /// Options in effect.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Color table.
    #[must_use]
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Mutable color table (interning new colors).
    pub fn palette_mut(&mut self) -> &mut Palette {
        &mut self.palette
    }

    /// Renderer dispatch state.
    #[must_use]
    pub fn dispatcher(&self) -> &RenderDispatcher {
        &self.dispatcher
    }

    /// Install a status listener for frame and playback notifications.
    pub fn set_status_listener(&mut self, listener: Arc<dyn StatusListener>) {
        self.scheduler.set_listener(listener);
    }

    /// Ask the host for a new pass.
    fn request_repaint(&self) {
        let _ = self.repaint.request_repaint();
    }
}

impl Drop for Viewer {
    fn drop(&mut self) {
        let _ = self.cancel_camera_move();
        self.scheduler.stop();
    }
}

impl std::fmt::Debug for Viewer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewer")
            .field("scene_generation", &self.scene.generation())
            .field("scheduler", &self.scheduler)
            .field("dispatcher", &self.dispatcher)
            .field("camera_move", &self.camera_move.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::renderer::{Colix, DrawCall, RecordingRasterizer};
    use crate::scene::{Atom, Frame, ShapeKind};

    pub(super) fn viewer_with_frames(n: usize) -> Viewer {
        let mut viewer = Viewer::default();
        let frames = (0..n)
            .map(|i| {
                Frame::new(
                    vec![Atom::new(
                        Vec3::new(i as f32, 0.0, 0.0),
                        1.0,
                        Colix::RED,
                    )],
                    Vec::new(),
                )
            })
            .collect();
        viewer.load_frames(frames);
        let _ = viewer.scene_mut().load_shape(ShapeKind::Balls);
        viewer
    }

    #[test]
    fn render_reports_the_pass() {
        let mut viewer = viewer_with_frames(1);
        assert!(viewer.needs_repaint());
        let mut rec = RecordingRasterizer::new();
        let stats = viewer.render(ClipRect::from_viewport((500, 500)), &mut rec);
        assert_eq!(stats.shapes_rendered, 1);
        assert_eq!(stats.draw_calls, 1);
        assert_eq!(stats.generation, 1);
        assert!(matches!(rec.calls()[0], DrawCall::Circle { .. }));
        assert_eq!(viewer.repaint_manager().completed_passes(), 1);
        assert!(!viewer.needs_repaint());
    }

    #[test]
    fn invalid_options_are_rejected() {
        let mut options = Options::default();
        options.animation.fps = 0.0;
        assert!(matches!(
            Viewer::new(options),
            Err(ViewerError::InvalidOption { .. })
        ));
    }
}
