use glam::IVec3;

use super::ShapeRenderer;
use crate::renderer::context::{shape_colix, RenderContext};
use crate::renderer::Colix;
use crate::scene::{Shape, ShapeKind};

/// Pre-formatted atom labels, offset from the atom center.
#[derive(Debug, Default)]
pub struct LabelsRenderer;

impl ShapeRenderer for LabelsRenderer {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Labels
    }

    fn render(&mut self, shape: &Shape, ctx: &mut RenderContext<'_>) {
        let Some(frame) = ctx.frame else {
            return;
        };
        let [dx, dy] = ctx.display.label_offset_px;
        let colix = shape_colix(Colix::WHITE, shape.translucent);
        for atom in &frame.atoms {
            let Some(text) = atom.label.as_deref().filter(|t| !t.is_empty())
            else {
                continue;
            };
            let Some(p) = ctx.project(atom.position) else {
                continue;
            };
            // Labels sit just in front of their atom.
            let at = IVec3::new(p.x + dx, p.y - dy, (p.z - 1).max(0));
            if ctx.on_screen(at, 0) {
                ctx.draw().draw_text(at, text, colix);
            }
        }
    }
}
