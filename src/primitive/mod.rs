//! Ad hoc decorative primitives independent of molecular topology.
//!
//! [`Object3D`] is the tagged geometry family (cylinder, cuboid, plane,
//! ellipse, triangle, bond pin). Every variant answers axis-aligned
//! [`Bounds`] and a rotation radius about an arbitrary center, which the
//! viewer folds together to size its auto-fit camera.
//! [`PrimitiveCollection`] is the thread-safe container external tools add
//! to and remove from while the render thread iterates it.

mod collection;
mod object3d;
pub mod pick;

pub use collection::{PrimitiveCollection, PrimitivePick};
pub use object3d::{
    Bounds, Cuboid, Cylinder, Ellipse, EndCaps, Object3D, Pin, Plane,
    PlaneDrawMode, Primitive, Triangle,
};
pub use pick::{pick_cylinder_face, CylinderFace, FaceHit};
