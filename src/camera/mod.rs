//! Coordinate transform engine for 3D scene viewing.
//!
//! Provides world ↔ screen projection (perspective or orthographic),
//! orbit and navigation cameras, slab/depth clipping, and smooth
//! programmatic camera moves.

/// Programmatic camera interpolation.
pub mod motion;
mod snapshot;
/// Live camera state and per-pass finalization.
pub mod transform;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use motion::{CameraMove, CameraTarget, MoveOutcome};
pub use snapshot::TransformSnapshot;
pub use transform::{CameraState, TransformManager};

/// Transform engine shared between the render thread and camera-move
/// threads. All access goes through [`lock_transform`].
pub type SharedTransform = Arc<Mutex<TransformManager>>;

/// Lock the shared transform, recovering the data from a poisoned lock.
pub fn lock_transform(shared: &SharedTransform) -> MutexGuard<'_, TransformManager> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}
