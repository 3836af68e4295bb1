use glam::Vec3;

use super::ShapeRenderer;
use crate::primitive::EndCaps;
use crate::renderer::context::{shape_colix, RenderContext};
use crate::scene::{Shape, ShapeKind};
use crate::structure::{ProteinStructureSegment, StructureKind};

/// Helix cylinder radius (Å).
const HELIX_RADIUS: f32 = 1.6;
/// Sheet shaft radius (Å).
const SHEET_RADIUS: f32 = 0.8;
/// Sheet arrowhead length along the axis (Å).
const ARROW_LENGTH: f32 = 1.8;
/// Sheet arrowhead base radius (Å).
const ARROW_RADIUS: f32 = 1.4;
/// Turn tube radius (Å).
const TURN_RADIUS: f32 = 0.3;

/// Secondary-structure cartoon drawn from the fitted segment axes: helices
/// as rockets, sheets as arrows, turns as thin tubes.
#[derive(Debug, Default)]
pub struct CartoonRenderer;

impl CartoonRenderer {
    fn render_segment(
        segment: &ProteinStructureSegment,
        translucent: bool,
        ctx: &mut RenderContext<'_>,
    ) {
        let axis = segment.axis();
        let colix =
            shape_colix(ctx.palette.structure_colix(segment.kind()), translucent);
        let (Some(start), Some(end)) = (ctx.project(axis.start), ctx.project(axis.end))
        else {
            return;
        };
        let mid_z = (start.z + end.z) / 2;

        match segment.kind() {
            StructureKind::Helix => {
                let d = ctx.diameter(mid_z, HELIX_RADIUS * 2.0);
                ctx.draw().fill_cylinder(start, end, d, colix, EndCaps::Both);
            }
            StructureKind::Sheet => {
                let head_len = ARROW_LENGTH.min(axis.length());
                let head_base: Vec3 = axis.end - axis.direction * head_len;
                let Some(base) = ctx.project(head_base) else {
                    return;
                };
                let shaft = ctx.diameter(mid_z, SHEET_RADIUS * 2.0);
                if base != start {
                    ctx.draw()
                        .fill_cylinder(start, base, shaft, colix, EndCaps::Base);
                }
                let head = ctx.diameter(base.z, ARROW_RADIUS * 2.0);
                ctx.draw().fill_cone(base, end, head, colix);
            }
            StructureKind::Turn => {
                let d = ctx.diameter(mid_z, TURN_RADIUS * 2.0);
                if d <= 1 {
                    ctx.draw().draw_line(start, end, colix);
                } else {
                    ctx.draw().fill_cylinder(start, end, d, colix, EndCaps::Open);
                }
            }
        }
    }
}

impl ShapeRenderer for CartoonRenderer {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Cartoon
    }

    fn render(&mut self, shape: &Shape, ctx: &mut RenderContext<'_>) {
        let Some(frame) = ctx.frame else {
            return;
        };
        for segment in &frame.structures {
            if segment.residue_count() == 0 {
                continue;
            }
            Self::render_segment(segment, shape.translucent, ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::render_once;
    use super::*;
    use crate::renderer::{Colix, DrawCall};
    use crate::scene::{Frame, Scene};

    fn straight_leads(n: usize) -> Vec<Vec3> {
        (0..n).map(|i| Vec3::new(i as f32 * 1.5 - 4.0, 0.0, 0.0)).collect()
    }

    #[test]
    fn helix_is_one_cylinder_and_axis_is_cached() {
        let frame = Frame::default().with_structures(vec![
            ProteinStructureSegment::new(StructureKind::Helix, straight_leads(6)),
        ]);
        let calls = render_once(
            &mut CartoonRenderer,
            &Shape::new(ShapeKind::Cartoon),
            &Scene::new(),
            Some(&frame),
        );
        assert_eq!(calls.len(), 1);
        assert!(matches!(
            calls[0],
            DrawCall::Cylinder {
                colix: Colix::MAGENTA,
                caps: EndCaps::Both,
                ..
            }
        ));
        assert!(frame.structures[0].has_cached_axis());
    }

    #[test]
    fn sheet_ends_in_an_arrowhead() {
        let frame = Frame::default().with_structures(vec![
            ProteinStructureSegment::new(StructureKind::Sheet, straight_leads(6)),
        ]);
        let calls = render_once(
            &mut CartoonRenderer,
            &Shape::new(ShapeKind::Cartoon),
            &Scene::new(),
            Some(&frame),
        );
        assert_eq!(calls.len(), 2);
        assert!(matches!(calls[0], DrawCall::Cylinder { .. }));
        let DrawCall::Cone { base, tip, colix, .. } = &calls[1] else {
            panic!("expected the arrowhead last, got {:?}", calls[1]);
        };
        assert_eq!(*colix, Colix::YELLOW);
        assert!(tip.x > base.x, "arrow points along the chain");
    }

    #[test]
    fn turn_is_a_thin_open_tube() {
        let frame = Frame::default().with_structures(vec![
            ProteinStructureSegment::new(StructureKind::Turn, straight_leads(3)),
        ]);
        let calls = render_once(
            &mut CartoonRenderer,
            &Shape::new(ShapeKind::Cartoon),
            &Scene::new(),
            Some(&frame),
        );
        assert_eq!(calls.len(), 1);
        assert!(matches!(
            calls[0],
            DrawCall::Cylinder {
                colix: Colix::PINK,
                caps: EndCaps::Open,
                ..
            }
        ));
    }
}
