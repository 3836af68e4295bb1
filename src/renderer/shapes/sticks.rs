use glam::IVec3;

use super::ShapeRenderer;
use crate::primitive::EndCaps;
use crate::renderer::context::{shape_colix, RenderContext};
use crate::scene::{Shape, ShapeKind};

/// Bond cylinders. A bond whose two atoms differ in color is split at its
/// midpoint, each half taking its atom's color.
#[derive(Debug, Default)]
pub struct SticksRenderer {
    /// Projected atom positions of the current frame, reused across passes.
    projected: Vec<Option<IVec3>>,
}

impl ShapeRenderer for SticksRenderer {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Sticks
    }

    fn render(&mut self, shape: &Shape, ctx: &mut RenderContext<'_>) {
        let Some(frame) = ctx.frame else {
            return;
        };
        self.projected.clear();
        self.projected
            .extend(frame.atoms.iter().map(|a| ctx.project(a.position)));

        for bond in frame.valid_bonds() {
            let (Some(a), Some(b)) = (self.projected[bond.a], self.projected[bond.b])
            else {
                continue;
            };
            let mid_z = (a.z + b.z) / 2;
            let diameter = ctx.diameter(mid_z, bond.radius * 2.0);
            if !ctx.on_screen(a, diameter) && !ctx.on_screen(b, diameter) {
                continue;
            }
            let colix_a = bond.colix.unwrap_or(frame.atoms[bond.a].colix);
            let colix_b = bond.colix.unwrap_or(frame.atoms[bond.b].colix);
            let colix_a = shape_colix(colix_a, shape.translucent);
            let colix_b = shape_colix(colix_b, shape.translucent);
            if colix_a == colix_b {
                ctx.draw()
                    .fill_cylinder(a, b, diameter, colix_a, EndCaps::Both);
            } else {
                let mid = (a + b) / 2;
                ctx.draw()
                    .fill_cylinder(a, mid, diameter, colix_a, EndCaps::Base);
                ctx.draw()
                    .fill_cylinder(b, mid, diameter, colix_b, EndCaps::Base);
            }
        }
    }
}
