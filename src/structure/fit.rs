//! Straight-line axis fitting through ordered backbone points.

use glam::Vec3;

/// Iteration cap for the helix line fit.
pub const MAX_FIT_ITERATIONS: u32 = 4;

/// Direction change below which the fit is considered converged.
pub const CONVERGENCE_EPSILON: f32 = 0.001;

/// Fitted axis of one structure segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StructureAxis {
    /// Axis start (first reference point projected onto the axis).
    pub start: Vec3,
    /// Axis end (last reference point projected onto the axis).
    pub end: Vec3,
    /// Unit direction from start toward end (zero for degenerate input).
    pub direction: Vec3,
    /// Refinement iterations run (0 when no iterative fit applies).
    /// Reaching [`MAX_FIT_ITERATIONS`] may mean the fit did not converge;
    /// the result is used as-is either way.
    pub iterations: u32,
}

impl StructureAxis {
    /// Axis straight from `start` to `end`.
    #[must_use]
    pub fn between(start: Vec3, end: Vec3) -> Self {
        Self {
            start,
            end,
            direction: (end - start).normalize_or_zero(),
            iterations: 0,
        }
    }

    /// Axis length.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }
}

/// Orthogonal projection of `point` onto the line through `origin` along
/// unit `direction`.
#[must_use]
pub fn project_onto_axis(point: Vec3, origin: Vec3, direction: Vec3) -> Vec3 {
    origin + direction * (point - origin).dot(direction)
}

/// Best straight axis through `points` by iterative total least squares.
///
/// Starts from the first→last chord through the centroid and applies up to
/// [`MAX_FIT_ITERATIONS`] corrective rotations, stopping early once the
/// direction moves less than [`CONVERGENCE_EPSILON`]. The end points are the
/// first and last points projected onto the result.
#[must_use]
pub fn fit_axis_through_points(points: &[Vec3]) -> StructureAxis {
    let (Some(&first), Some(&last)) = (points.first(), points.last()) else {
        return StructureAxis::between(Vec3::ZERO, Vec3::ZERO);
    };
    let mut direction = (last - first).normalize_or_zero();
    if direction == Vec3::ZERO {
        return StructureAxis::between(first, last);
    }
    let origin = points.iter().copied().sum::<Vec3>() / points.len() as f32;

    let mut iterations = 0;
    while iterations < MAX_FIT_ITERATIONS {
        iterations += 1;
        let (next, change) = refine_direction(points, origin, direction);
        direction = next;
        if change <= CONVERGENCE_EPSILON {
            break;
        }
    }

    StructureAxis {
        start: project_onto_axis(first, origin, direction),
        end: project_onto_axis(last, origin, direction),
        direction,
        iterations,
    }
}

/// One corrective step. Returns the new direction and how far it moved.
///
/// Each point contributes `proj × perp`, where `proj` is its offset along
/// the axis and `perp` its perpendicular offset; the sum normalized by
/// `Σ|proj|²` is the small rotation that best aligns the axis with the
/// points.
fn refine_direction(
    points: &[Vec3],
    origin: Vec3,
    direction: Vec3,
) -> (Vec3, f32) {
    let mut torque = Vec3::ZERO;
    let mut sum_sq = 0.0;
    for &p in points {
        let proj = direction * (p - origin).dot(direction);
        let perp = (p - origin) - proj;
        torque += proj.cross(perp);
        sum_sq += proj.length_squared();
    }
    if sum_sq <= f32::EPSILON {
        return (direction, 0.0);
    }
    let rotation = torque / sum_sq;
    let next = (direction + rotation.cross(direction)).normalize_or_zero();
    if next == Vec3::ZERO {
        return (direction, 0.0);
    }
    (next, next.distance(direction))
}
