use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use glam::{Vec2, Vec3};

use super::object3d::{Bounds, Primitive};
use super::pick::{pick_cylinder_face, FaceHit};
use crate::camera::TransformSnapshot;

/// Thread-safe set of primitives, ordered by insertion.
///
/// One collection-wide lock guards both mutation and iteration. Iteration
/// through [`for_each`](Self::for_each) holds the lock only for that one
/// walk, never for a whole render pass.
#[derive(Debug, Default)]
pub struct PrimitiveCollection {
    members: Mutex<Vec<Arc<Primitive>>>,
}

/// Closest face picked across a collection.
#[derive(Debug, Clone)]
pub struct PrimitivePick {
    /// The picked primitive.
    pub primitive: Arc<Primitive>,
    /// Index at the time of the pick.
    pub index: usize,
    /// Face and depth.
    pub hit: FaceHit,
}

impl PrimitiveCollection {
    /// Empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Arc<Primitive>>> {
        self.members.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a primitive. Adding the same `Arc` twice is a no-op; returns
    /// whether it was inserted.
    pub fn add(&self, primitive: Arc<Primitive>) -> bool {
        let mut members = self.lock();
        if members.iter().any(|p| Arc::ptr_eq(p, &primitive)) {
            return false;
        }
        members.push(primitive);
        true
    }

    /// Remove a primitive by identity. Returns whether it was present.
    pub fn remove(&self, primitive: &Arc<Primitive>) -> bool {
        let mut members = self.lock();
        match members.iter().position(|p| Arc::ptr_eq(p, primitive)) {
            Some(i) => {
                let _ = members.remove(i);
                true
            }
            None => false,
        }
    }

    /// Member at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<Arc<Primitive>> {
        self.lock().get(index).cloned()
    }

    /// Number of members.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether the collection has no members.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Remove every member.
    pub fn clear(&self) {
        self.lock().clear();
    }

    /// Visit every member under the collection lock.
    ///
    /// `f` must not call back into this collection.
    pub fn for_each(&self, mut f: impl FnMut(&Primitive)) {
        for p in self.lock().iter() {
            f(p);
        }
    }

    /// Min/max fold over member extents (`EMPTY` when empty).
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.lock()
            .iter()
            .fold(Bounds::EMPTY, |b, p| b.union(&p.shape.bounds()))
    }

    /// Max fold of member rotation radii about `center` (0 when empty).
    #[must_use]
    pub fn rotation_radius(&self, center: Vec3) -> f32 {
        self.lock()
            .iter()
            .map(|p| p.shape.rotation_radius(center))
            .fold(0.0, f32::max)
    }

    /// Nearest cylinder-like face under the screen point `point`.
    #[must_use]
    pub fn pick(
        &self,
        snapshot: &TransformSnapshot,
        point: Vec2,
        tolerance_px: f32,
    ) -> Option<PrimitivePick> {
        let members = self.lock();
        let mut best: Option<PrimitivePick> = None;
        for (index, primitive) in members.iter().enumerate() {
            if !primitive.visible {
                continue;
            }
            let Some(cylinder) = primitive.shape.as_cylinder() else {
                continue;
            };
            let Some(hit) =
                pick_cylinder_face(&cylinder, snapshot, point, tolerance_px)
            else {
                continue;
            };
            let closer = match &best {
                Some(b) => hit.depth < b.hit.depth,
                None => true,
            };
            if closer {
                best = Some(PrimitivePick {
                    primitive: Arc::clone(primitive),
                    index,
                    hit,
                });
            }
        }
        best
    }
}
