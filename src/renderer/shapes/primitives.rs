use glam::{IVec3, Vec3};

use super::ShapeRenderer;
use crate::primitive::{Cylinder, Object3D, PlaneDrawMode, Primitive};
use crate::renderer::context::{shape_colix, RenderContext};
use crate::renderer::Colix;
use crate::scene::{Shape, ShapeKind};

/// Corner indices of the six cuboid faces, in [`Cuboid::corners`] order.
///
/// [`Cuboid::corners`]: crate::primitive::Cuboid::corners
const CUBOID_FACES: [[usize; 4]; 6] = [
    [0, 1, 3, 2],
    [4, 5, 7, 6],
    [0, 1, 5, 4],
    [2, 3, 7, 6],
    [0, 2, 6, 4],
    [1, 3, 7, 5],
];

/// Ad hoc decorative primitives from the scene's shared collection.
///
/// The collection lock is held only while this renderer walks it.
#[derive(Debug, Default)]
pub struct PrimitivesRenderer;

impl PrimitivesRenderer {
    fn render_one(p: &Primitive, translucent: bool, ctx: &mut RenderContext<'_>) {
        let colix = shape_colix(p.colix, translucent);
        match &p.shape {
            Object3D::Cylinder(c) => Self::cylinder(c, colix, ctx),
            Object3D::Ellipse(e) => Self::cylinder(&e.as_cylinder(), colix, ctx),
            Object3D::Cuboid(b) => {
                let Some(corners) = project_all(ctx, b.corners()) else {
                    return;
                };
                for face in CUBOID_FACES {
                    ctx.draw().fill_quad(face.map(|i| corners[i]), colix);
                }
            }
            Object3D::Plane(plane) => {
                let Some(q) = project_all(ctx, plane.vertices) else {
                    return;
                };
                if plane.mode != PlaneDrawMode::Outline {
                    ctx.draw().fill_quad(q, colix);
                }
                if plane.mode != PlaneDrawMode::Filled {
                    let edge = colix.opaque();
                    for (i, &from) in q.iter().enumerate() {
                        ctx.draw().draw_line(from, q[(i + 1) % 4], edge);
                    }
                }
            }
            Object3D::Triangle(t) => {
                if let Some(v) = project_all(ctx, t.vertices) {
                    ctx.draw().fill_triangle(v, colix);
                }
            }
            Object3D::Pin(pin) => {
                Self::cylinder(&pin.shaft(), colix, ctx);
                if let Some(head) = ctx.project(pin.end) {
                    let d = ctx.diameter(head.z, pin.head_radius * 2.0);
                    ctx.draw().fill_circle(head, d, colix, false);
                }
            }
        }
    }

    fn cylinder(c: &Cylinder, colix: Colix, ctx: &mut RenderContext<'_>) {
        let (Some(a), Some(b)) = (ctx.project(c.base), ctx.project(c.top())) else {
            return;
        };
        let d = ctx.diameter((a.z + b.z) / 2, c.max_radius() * 2.0);
        if !ctx.on_screen(a, d) && !ctx.on_screen(b, d) {
            return;
        }
        if a.truncate() == b.truncate() {
            // End-on: the silhouette is the near end's disk.
            let near = if a.z <= b.z { a } else { b };
            ctx.draw().fill_circle(near, d, colix, false);
            return;
        }
        ctx.draw().fill_cylinder(a, b, d, colix, c.caps);
    }
}

/// Project every point, or `None` if any is slab-clipped.
fn project_all<const N: usize>(
    ctx: &RenderContext<'_>,
    points: [Vec3; N],
) -> Option<[IVec3; N]> {
    let mut out = [IVec3::ZERO; N];
    for (slot, p) in out.iter_mut().zip(points) {
        *slot = ctx.project(p)?;
    }
    Some(out)
}

impl ShapeRenderer for PrimitivesRenderer {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Primitives
    }

    fn render(&mut self, shape: &Shape, ctx: &mut RenderContext<'_>) {
        let scene = ctx.scene;
        scene.primitives().for_each(|p| {
            if p.visible {
                Self::render_one(p, shape.translucent, ctx);
            }
        });
    }
}
