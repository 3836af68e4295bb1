//! Screen-space cylinder face picking.
//!
//! Each candidate face is tested against its own implicit equation in the
//! screen plane: the projected cap ellipse for the two ends, a slab around
//! the projected axis for the lateral surface. When several faces qualify
//! the one whose representative point projects nearest the eye wins. This
//! is a depth-ordering approximation, not a ray intersection.

use glam::{Mat2, Vec2, Vec3};

use super::object3d::Cylinder;
use crate::camera::TransformSnapshot;

/// Below this projected axis length (pixels) the lateral surface is seen
/// end-on and only the caps are candidates.
const MIN_AXIS_PX: f32 = 1e-3;

/// Smallest determinant for a projected cap ellipse to be pickable.
const MIN_CAP_DET: f32 = 1e-6;

/// Face of a cylinder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CylinderFace {
    /// End cap at the base point.
    Base,
    /// End cap at the top point.
    Top,
    /// Lateral surface.
    Side,
}

/// A picked face and the screen depth it was ranked by.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceHit {
    /// Which face.
    pub face: CylinderFace,
    /// Screen z of the face's representative point.
    pub depth: f32,
}

/// Nearest face of `cylinder` under screen point `point`, widened by
/// `tolerance_px`.
#[must_use]
pub fn pick_cylinder_face(
    cylinder: &Cylinder,
    snapshot: &TransformSnapshot,
    point: Vec2,
    tolerance_px: f32,
) -> Option<FaceHit> {
    let base = snapshot.transform_point(cylinder.base);
    let top = snapshot.transform_point(cylinder.top());

    let mut candidates = [None; 3];
    if cylinder.caps.has_base() {
        let hit =
            cap_hit(cylinder, snapshot, cylinder.base, point, tolerance_px);
        candidates[0] = hit.then_some(FaceHit {
            face: CylinderFace::Base,
            depth: base.z,
        });
    }
    if cylinder.caps.has_top() {
        let hit =
            cap_hit(cylinder, snapshot, cylinder.top(), point, tolerance_px);
        candidates[1] = hit.then_some(FaceHit {
            face: CylinderFace::Top,
            depth: top.z,
        });
    }
    candidates[2] =
        side_hit(cylinder, snapshot, base, top, point, tolerance_px);

    candidates
        .into_iter()
        .flatten()
        .reduce(|best, hit| if hit.depth < best.depth { hit } else { best })
}

/// Whether `point` falls inside the projected cap ellipse centered at
/// `center` (world).
///
/// The cap rim is `center + a·cos t + b·sin t`; its projection is
/// approximated by the affine image through the projected semi-axes, and
/// `point` is inside when its coordinates `(s, t)` in that basis satisfy
/// `s² + t² ≤ 1`.
fn cap_hit(
    cylinder: &Cylinder,
    snapshot: &TransformSnapshot,
    center: Vec3,
    point: Vec2,
    tolerance_px: f32,
) -> bool {
    let c = snapshot.transform_point(center).truncate();
    let pa = snapshot
        .transform_point(center + cylinder.a_dir * cylinder.radius_a)
        .truncate()
        - c;
    let pb = snapshot
        .transform_point(center + cylinder.b_dir() * cylinder.radius_b)
        .truncate()
        - c;
    let basis = Mat2::from_cols(pa, pb);
    if basis.determinant().abs() < MIN_CAP_DET {
        // Edge-on cap: covered by the side test.
        return false;
    }
    let st = basis.inverse() * (point - c);
    let reach = 1.0 + tolerance_px / pa.length().min(pb.length()).max(1.0);
    st.length_squared() <= reach * reach
}

/// Slab test against the projected axis segment, returning the depth of
/// the nearest axis point.
fn side_hit(
    cylinder: &Cylinder,
    snapshot: &TransformSnapshot,
    base: Vec3,
    top: Vec3,
    point: Vec2,
    tolerance_px: f32,
) -> Option<FaceHit> {
    let p0 = base.truncate();
    let axis = top.truncate() - p0;
    let len2 = axis.length_squared();
    if len2 < MIN_AXIS_PX * MIN_AXIS_PX {
        return None;
    }
    let t = ((point - p0).dot(axis) / len2).clamp(0.0, 1.0);
    let depth = base.z + (top.z - base.z) * t;
    let half_width = snapshot.scale_to_screen(depth, cylinder.max_radius());
    let dist = (p0 + axis * t).distance(point);
    (dist <= half_width + tolerance_px).then_some(FaceHit {
        face: CylinderFace::Side,
        depth,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::TransformManager;
    use crate::primitive::object3d::EndCaps;

    fn snapshot() -> TransformSnapshot {
        TransformManager::default().finalize_transform_parameters()
    }

    fn screen(snap: &TransformSnapshot, p: Vec3) -> Vec2 {
        snap.transform_point(p).truncate()
    }

    #[test]
    fn end_on_cylinder_picks_front_cap() {
        let snap = snapshot();
        let c = Cylinder::between(Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 0.0, -2.0), 1.0);
        let hit = pick_cylinder_face(&c, &snap, screen(&snap, Vec3::ZERO), 0.0).unwrap();
        // Top sits at world z = -2, nearer the eye.
        assert_eq!(hit.face, CylinderFace::Top);
    }

    #[test]
    fn open_end_falls_through_to_far_cap() {
        let snap = snapshot();
        let c = Cylinder::between(Vec3::new(0.0, 0.0, 2.0), Vec3::new(0.0, 0.0, -2.0), 1.0)
            .with_caps(EndCaps::Base);
        let hit = pick_cylinder_face(&c, &snap, screen(&snap, Vec3::ZERO), 0.0).unwrap();
        assert_eq!(hit.face, CylinderFace::Base);
    }

    #[test]
    fn side_on_cylinder_picks_lateral_surface() {
        let snap = snapshot();
        let c = Cylinder::between(Vec3::new(-3.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0), 1.0);
        let at = screen(&snap, Vec3::new(1.0, 0.5, 0.0));
        let hit = pick_cylinder_face(&c, &snap, at, 0.0).unwrap();
        assert_eq!(hit.face, CylinderFace::Side);
    }

    #[test]
    fn miss_outside_silhouette() {
        let snap = snapshot();
        let c = Cylinder::between(Vec3::new(-3.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0), 1.0);
        assert!(pick_cylinder_face(&c, &snap, screen(&snap, Vec3::new(0.0, 3.0, 0.0)), 0.0)
            .is_none());
        assert!(pick_cylinder_face(&c, &snap, screen(&snap, Vec3::new(6.0, 0.0, 0.0)), 0.0)
            .is_none());
    }

    #[test]
    fn tolerance_widens_the_slab() {
        let snap = snapshot();
        let c = Cylinder::between(Vec3::new(-3.0, 0.0, 0.0), Vec3::new(3.0, 0.0, 0.0), 1.0);
        let at = screen(&snap, Vec3::new(0.0, 1.2, 0.0));
        assert!(pick_cylinder_face(&c, &snap, at, 0.0).is_none());
        assert!(pick_cylinder_face(&c, &snap, at, 10.0).is_some());
    }
}
