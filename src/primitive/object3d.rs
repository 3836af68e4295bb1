use glam::Vec3;

use crate::renderer::Colix;

/// Tolerance below which a direction is treated as degenerate.
const DEGENERATE_EPS: f32 = 1e-6;

/// Axis-aligned bounding extents.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    /// Per-axis minimum.
    pub min: Vec3,
    /// Per-axis maximum.
    pub max: Vec3,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Bounds {
    /// Identity for [`union`](Self::union): contains nothing.
    pub const EMPTY: Self = Self {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    /// Degenerate bounds around one point.
    #[must_use]
    pub fn from_point(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    /// Bounds of a point set (`EMPTY` for no points).
    #[must_use]
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        points
            .into_iter()
            .fold(Self::EMPTY, |b, p| b.union(&Self::from_point(p)))
    }

    /// Sphere bounds.
    #[must_use]
    pub fn from_sphere(center: Vec3, radius: f32) -> Self {
        let r = Vec3::splat(radius.abs());
        Self {
            min: center - r,
            max: center + r,
        }
    }

    /// Whether no point has been folded in.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    /// Smallest bounds containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Box center (meaningless when empty).
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths (zero when empty).
    #[must_use]
    pub fn size(&self) -> Vec3 {
        if self.is_empty() {
            Vec3::ZERO
        } else {
            self.max - self.min
        }
    }
}

// ---------------------------------------------------------------------------
// Cylinder
// ---------------------------------------------------------------------------

/// Which ends of a cylinder are closed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndCaps {
    /// Open tube.
    Open,
    /// Only the base end is closed.
    Base,
    /// Only the top end is closed.
    Top,
    /// Both ends closed.
    #[default]
    Both,
}

impl EndCaps {
    /// Whether the base end is closed.
    #[must_use]
    pub fn has_base(self) -> bool {
        matches!(self, Self::Base | Self::Both)
    }

    /// Whether the top end is closed.
    #[must_use]
    pub fn has_top(self) -> bool {
        matches!(self, Self::Top | Self::Both)
    }
}

/// Right cylinder with an elliptical cross-section.
///
/// The cross-section has semi-axis `radius_a` along `a_dir` and `radius_b`
/// along `axis × a_dir`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cylinder {
    /// Center of the base cap.
    pub base: Vec3,
    /// Unit axis from base to top.
    pub axis: Vec3,
    /// Distance from base to top along `axis`.
    pub height: f32,
    /// Semi-axis along `a_dir`.
    pub radius_a: f32,
    /// Semi-axis along `axis × a_dir`.
    pub radius_b: f32,
    /// Unit direction perpendicular to `axis`.
    pub a_dir: Vec3,
    /// Closed ends.
    pub caps: EndCaps,
}

impl Cylinder {
    /// Circular cylinder between two points.
    #[must_use]
    pub fn between(start: Vec3, end: Vec3, radius: f32) -> Self {
        let d = end - start;
        let height = d.length();
        let axis = if height > DEGENERATE_EPS {
            d / height
        } else {
            Vec3::Z
        };
        Self {
            base: start,
            axis,
            height,
            radius_a: radius,
            radius_b: radius,
            a_dir: axis.any_orthonormal_vector(),
            caps: EndCaps::Both,
        }
    }

    /// Elliptical cylinder. `axis` and `a_dir` are normalized, and `a_dir`
    /// is made perpendicular to `axis`.
    #[must_use]
    pub fn elliptical(
        base: Vec3,
        axis: Vec3,
        height: f32,
        radius_a: f32,
        radius_b: f32,
        a_dir: Vec3,
    ) -> Self {
        let axis = axis.try_normalize().unwrap_or(Vec3::Z);
        let a_dir = (a_dir - axis * a_dir.dot(axis))
            .try_normalize()
            .unwrap_or_else(|| axis.any_orthonormal_vector());
        Self {
            base,
            axis,
            height: height.abs(),
            radius_a: radius_a.abs(),
            radius_b: radius_b.abs(),
            a_dir,
            caps: EndCaps::Both,
        }
    }

    /// Replace the end-cap style.
    #[must_use]
    pub fn with_caps(mut self, caps: EndCaps) -> Self {
        self.caps = caps;
        self
    }

    /// Center of the top cap.
    #[must_use]
    pub fn top(&self) -> Vec3 {
        self.base + self.axis * self.height
    }

    /// Unit direction of the `radius_b` semi-axis.
    #[must_use]
    pub fn b_dir(&self) -> Vec3 {
        self.axis.cross(self.a_dir)
    }

    /// Larger cross-section semi-axis.
    #[must_use]
    pub fn max_radius(&self) -> f32 {
        self.radius_a.max(self.radius_b)
    }

    /// Midpoint of the axis.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        self.base + self.axis * (self.height * 0.5)
    }

    fn bounds(&self) -> Bounds {
        // Per-axis half-extent of an ellipse with semi-axes ra·a and rb·b.
        let a = self.a_dir * self.radius_a;
        let b = self.b_dir() * self.radius_b;
        let half = (a * a + b * b).powf(0.5);
        let cap = |c: Vec3| Bounds {
            min: c - half,
            max: c + half,
        };
        cap(self.base).union(&cap(self.top()))
    }

    fn rotation_radius(&self, center: Vec3) -> f32 {
        let r = self.max_radius();
        let rim = |c: Vec3| {
            let d = c - center;
            let along = d.dot(self.axis);
            let perp = (d - self.axis * along).length();
            ((perp + r).powi(2) + along * along).sqrt()
        };
        rim(self.base).max(rim(self.top()))
    }
}

// ---------------------------------------------------------------------------
// Cuboid, plane, ellipse, triangle, pin
// ---------------------------------------------------------------------------

/// Axis-aligned box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cuboid {
    /// Box center.
    pub center: Vec3,
    /// Half edge lengths (non-negative).
    pub half_extents: Vec3,
}

impl Cuboid {
    /// The eight corners.
    #[must_use]
    pub fn corners(&self) -> [Vec3; 8] {
        let h = self.half_extents;
        std::array::from_fn(|i| {
            let sign = Vec3::new(
                if i & 1 == 0 { -1.0 } else { 1.0 },
                if i & 2 == 0 { -1.0 } else { 1.0 },
                if i & 4 == 0 { -1.0 } else { 1.0 },
            );
            self.center + h * sign
        })
    }
}

/// How a plane quad is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaneDrawMode {
    /// Filled quad.
    #[default]
    Filled,
    /// Edges only.
    Outline,
    /// Filled quad with outlined edges.
    FilledOutline,
}

/// Quad given by four vertices in winding order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Corners in winding order.
    pub vertices: [Vec3; 4],
    /// Fill/outline style.
    pub mode: PlaneDrawMode,
}

/// Flat elliptical disk, drawn and picked as a short cylinder.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipse {
    /// Disk center.
    pub center: Vec3,
    /// Disk normal.
    pub normal: Vec3,
    /// Direction of the `radius_a` semi-axis.
    pub a_dir: Vec3,
    /// Semi-axis along `a_dir`.
    pub radius_a: f32,
    /// Semi-axis along `normal × a_dir`.
    pub radius_b: f32,
    /// Disk thickness along `normal`.
    pub thickness: f32,
}

impl Ellipse {
    /// The equivalent closed cylinder centered on the disk.
    #[must_use]
    pub fn as_cylinder(&self) -> Cylinder {
        let axis = self.normal.try_normalize().unwrap_or(Vec3::Z);
        let thickness = self.thickness.abs();
        Cylinder::elliptical(
            self.center - axis * (thickness * 0.5),
            axis,
            thickness,
            self.radius_a,
            self.radius_b,
            self.a_dir,
        )
    }
}

/// Single triangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// Corners in winding order.
    pub vertices: [Vec3; 3],
}

impl Triangle {
    /// Unit face normal (zero for degenerate triangles).
    #[must_use]
    pub fn normal(&self) -> Vec3 {
        let [a, b, c] = self.vertices;
        (b - a).cross(c - a).normalize_or_zero()
    }
}

/// Marker pin planted on a bond: a thin shaft along the bond ending in a
/// round head.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pin {
    /// Shaft foot.
    pub start: Vec3,
    /// Shaft tip, center of the head.
    pub end: Vec3,
    /// Shaft radius.
    pub radius: f32,
    /// Head radius.
    pub head_radius: f32,
}

impl Pin {
    /// Pin from the first bond atom to the bond midpoint, sized from the
    /// bond radius.
    #[must_use]
    pub fn from_bond(a: Vec3, b: Vec3, bond_radius: f32) -> Self {
        let r = bond_radius.abs();
        Self {
            start: a,
            end: a.lerp(b, 0.5),
            radius: r * 0.5,
            head_radius: r * 1.5,
        }
    }

    /// The shaft as an open cylinder.
    #[must_use]
    pub fn shaft(&self) -> Cylinder {
        Cylinder::between(self.start, self.end, self.radius)
            .with_caps(EndCaps::Open)
    }
}

// ---------------------------------------------------------------------------
// Object3D
// ---------------------------------------------------------------------------

/// Geometric primitive variants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Object3D {
    /// Elliptical cylinder.
    Cylinder(Cylinder),
    /// Axis-aligned box.
    Cuboid(Cuboid),
    /// Four-vertex quad.
    Plane(Plane),
    /// Flat disk.
    Ellipse(Ellipse),
    /// Triangle.
    Triangle(Triangle),
    /// Bond pin.
    Pin(Pin),
}

impl Object3D {
    /// Axis-aligned extents.
    #[must_use]
    pub fn bounds(&self) -> Bounds {
        match self {
            Self::Cylinder(c) => c.bounds(),
            Self::Cuboid(b) => Bounds {
                min: b.center - b.half_extents.abs(),
                max: b.center + b.half_extents.abs(),
            },
            Self::Plane(p) => Bounds::from_points(p.vertices),
            Self::Ellipse(e) => e.as_cylinder().bounds(),
            Self::Triangle(t) => Bounds::from_points(t.vertices),
            Self::Pin(p) => p
                .shaft()
                .bounds()
                .union(&Bounds::from_sphere(p.end, p.head_radius)),
        }
    }

    /// Distance from `center` to the farthest point of the shape.
    #[must_use]
    pub fn rotation_radius(&self, center: Vec3) -> f32 {
        let farthest = |points: &[Vec3]| {
            points
                .iter()
                .map(|p| p.distance(center))
                .fold(0.0_f32, f32::max)
        };
        match self {
            Self::Cylinder(c) => c.rotation_radius(center),
            Self::Cuboid(b) => farthest(&b.corners()),
            Self::Plane(p) => farthest(&p.vertices),
            Self::Ellipse(e) => e.as_cylinder().rotation_radius(center),
            Self::Triangle(t) => farthest(&t.vertices),
            Self::Pin(p) => p
                .shaft()
                .rotation_radius(center)
                .max(p.end.distance(center) + p.head_radius),
        }
    }

    /// Representative point used for depth ordering.
    #[must_use]
    pub fn center(&self) -> Vec3 {
        match self {
            Self::Cylinder(c) => c.center(),
            Self::Cuboid(b) => b.center,
            Self::Plane(p) => p.vertices.iter().copied().sum::<Vec3>() / 4.0,
            Self::Ellipse(e) => e.center,
            Self::Triangle(t) => t.vertices.iter().copied().sum::<Vec3>() / 3.0,
            Self::Pin(p) => p.end,
        }
    }

    /// Cylinder view of shapes that pick like one.
    #[must_use]
    pub fn as_cylinder(&self) -> Option<Cylinder> {
        match self {
            Self::Cylinder(c) => Some(*c),
            Self::Ellipse(e) => Some(e.as_cylinder()),
            _ => None,
        }
    }
}

/// A decorative primitive: shape plus display attributes.
///
/// Primitives are shared as `Arc<Primitive>` and identified by pointer, so
/// two equal shapes added separately are distinct members of a collection.
#[derive(Debug, Clone, PartialEq)]
pub struct Primitive {
    /// Geometry.
    pub shape: Object3D,
    /// Color handle.
    pub colix: Colix,
    /// Whether the primitive is drawn.
    pub visible: bool,
}

impl Primitive {
    /// Visible primitive.
    #[must_use]
    pub fn new(shape: Object3D, colix: Colix) -> Self {
        Self {
            shape,
            colix,
            visible: true,
        }
    }
}
