//! Authoritative scene: model frames, shape slots, and ad hoc primitives.
//!
//! The external model layer loads [`Frame`]s (atoms, bonds, structure
//! segments with world coordinates) and populates shape slots; the render
//! pass walks the populated slots in [`ShapeKind`] priority order. A
//! generation counter tracks edits so the viewer knows when to repaint.

mod frame;
mod shape;

use std::sync::Arc;

pub use frame::{Atom, Bond, Frame};
use glam::Vec3;
pub use shape::{RenderLayer, Shape, ShapeKind};

use crate::primitive::{Bounds, PrimitiveCollection};

/// Scene owned by one viewer.
#[derive(Debug)]
pub struct Scene {
    frames: Vec<Frame>,
    /// One slot per kind; `None` until populated.
    shapes: [Option<Shape>; ShapeKind::COUNT],
    primitives: Arc<PrimitiveCollection>,
    /// World points the user clicked.
    click_markers: Vec<Vec3>,
    /// Monotonically increasing generation; bumped on any mutation.
    generation: u64,
    /// Generation that was last consumed by the renderer.
    rendered_generation: u64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    /// Empty scene: no frames, no populated shapes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: Vec::new(),
            shapes: [None; ShapeKind::COUNT],
            primitives: Arc::new(PrimitiveCollection::new()),
            click_markers: Vec::new(),
            generation: 0,
            rendered_generation: 0,
        }
    }

    // -- Mutation helpers --

    fn invalidate(&mut self) {
        self.generation += 1;
    }

    /// Whether scene data changed since last `mark_rendered()`.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.generation != self.rendered_generation
    }

    /// Force the scene dirty (e.g. after primitives were edited through a
    /// shared collection handle).
    pub fn force_dirty(&mut self) {
        self.invalidate();
    }

    /// Mark current generation as rendered.
    pub fn mark_rendered(&mut self) {
        self.rendered_generation = self.generation;
    }

    /// Current generation.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    // -- Frames --

    /// Replace all frames (model load).
    pub fn set_frames(&mut self, frames: Vec<Frame>) {
        self.frames = frames;
        self.invalidate();
    }

    /// Append one frame. Returns its index.
    pub fn push_frame(&mut self, frame: Frame) -> usize {
        self.frames.push(frame);
        self.invalidate();
        self.frames.len() - 1
    }

    /// Frame at `index`.
    #[must_use]
    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Write access to a frame (invalidates).
    pub fn frame_mut(&mut self, index: usize) -> Option<&mut Frame> {
        self.invalidate();
        self.frames.get_mut(index)
    }

    /// Number of frames.
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    // -- Shape slots --

    /// Populate the slot for `kind` (if empty) and return it.
    pub fn load_shape(&mut self, kind: ShapeKind) -> &mut Shape {
        self.invalidate();
        self.shapes[kind.index()].get_or_insert_with(|| Shape::new(kind))
    }

    /// Empty the slot for `kind`.
    pub fn remove_shape(&mut self, kind: ShapeKind) -> Option<Shape> {
        let removed = self.shapes[kind.index()].take();
        if removed.is_some() {
            self.invalidate();
        }
        removed
    }

    /// Slot for `kind`, if populated.
    #[must_use]
    pub fn shape(&self, kind: ShapeKind) -> Option<&Shape> {
        self.shapes[kind.index()].as_ref()
    }

    /// Toggle visibility of a populated slot.
    pub fn set_shape_visible(&mut self, kind: ShapeKind, visible: bool) {
        if let Some(shape) = self.shapes[kind.index()].as_mut() {
            if shape.visible != visible {
                shape.visible = visible;
                self.invalidate();
            }
        }
    }

    /// Toggle translucency of a populated slot.
    pub fn set_shape_translucent(&mut self, kind: ShapeKind, translucent: bool) {
        if let Some(shape) = self.shapes[kind.index()].as_mut() {
            if shape.translucent != translucent {
                shape.translucent = translucent;
                self.invalidate();
            }
        }
    }

    /// Populated slots in render priority order.
    pub fn populated_shapes(&self) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().flatten()
    }

    // -- Primitives and markers --

    /// Shared primitive collection; external tools may hold a clone.
    #[must_use]
    pub fn primitives(&self) -> &Arc<PrimitiveCollection> {
        &self.primitives
    }

    /// Add a click marker at a world point.
    pub fn add_click_marker(&mut self, position: Vec3) {
        self.click_markers.push(position);
        self.invalidate();
    }

    /// Remove all click markers.
    pub fn clear_click_markers(&mut self) {
        if !self.click_markers.is_empty() {
            self.click_markers.clear();
            self.invalidate();
        }
    }

    /// Click marker positions.
    #[must_use]
    pub fn click_markers(&self) -> &[Vec3] {
        &self.click_markers
    }

    // -- Extents --

    /// Extents of frame `index` plus all primitives.
    #[must_use]
    pub fn bounds(&self, index: usize) -> Bounds {
        let atoms = self.frame(index).map_or(Bounds::EMPTY, Frame::bounds);
        atoms.union(&self.primitives.bounds())
    }

    /// Max of the atom and primitive rotation radii about `center`.
    #[must_use]
    pub fn rotation_radius(&self, index: usize, center: Vec3) -> f32 {
        let atoms = self
            .frame(index)
            .map_or(0.0, |f| f.rotation_radius(center));
        atoms.max(self.primitives.rotation_radius(center))
    }

    /// Remove everything (scene reset).
    pub fn clear(&mut self) {
        self.frames.clear();
        self.shapes = [None; ShapeKind::COUNT];
        self.primitives.clear();
        self.click_markers.clear();
        self.invalidate();
    }
}
