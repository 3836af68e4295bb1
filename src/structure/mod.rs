//! Secondary-structure segments and their straight-line axes.
//!
//! Cartoon rendering reduces each helix, sheet, or turn to one axis
//! segment. Helices use an iterative least-squares line fit through the
//! lead-atom midpoints; sheets use the chord between interior midpoints;
//! turns join their end midpoints.

mod fit;
mod segment;

pub use fit::{
    fit_axis_through_points, project_onto_axis, StructureAxis,
    CONVERGENCE_EPSILON, MAX_FIT_ITERATIONS,
};
pub use segment::{ProteinStructureSegment, StructureKind};
