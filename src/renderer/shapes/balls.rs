use super::ShapeRenderer;
use crate::renderer::context::{shape_colix, RenderContext};
use crate::scene::{Shape, ShapeKind};

/// Atom spheres as filled circles sized by perspective.
#[derive(Debug, Default)]
pub struct BallsRenderer;

impl ShapeRenderer for BallsRenderer {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Balls
    }

    fn render(&mut self, shape: &Shape, ctx: &mut RenderContext<'_>) {
        let Some(frame) = ctx.frame else {
            return;
        };
        for atom in &frame.atoms {
            let Some(p) = ctx.project(atom.position) else {
                continue;
            };
            let diameter = ctx.diameter(p.z, atom.radius * 2.0);
            if !ctx.on_screen(p, diameter / 2 + 1) {
                continue;
            }
            let colix = shape_colix(atom.colix, shape.translucent);
            ctx.draw().fill_circle(p, diameter, colix, false);
        }
    }
}
