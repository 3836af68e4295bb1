//! Screened overlays drawn after all solid geometry.

use super::ShapeRenderer;
use crate::renderer::context::{shape_colix, RenderContext};
use crate::scene::{Shape, ShapeKind};

/// Screened halos around selected atoms.
#[derive(Debug, Default)]
pub struct HalosRenderer;

impl ShapeRenderer for HalosRenderer {
    fn kind(&self) -> ShapeKind {
        ShapeKind::Halos
    }

    fn render(&mut self, shape: &Shape, ctx: &mut RenderContext<'_>) {
        let Some(frame) = ctx.frame else {
            return;
        };
        let colix = shape_colix(
            ctx.palette.overlay_colix(ShapeKind::Halos),
            shape.translucent,
        );
        let scale = ctx.display.halo_scale;
        for atom in frame.atoms.iter().filter(|a| a.selected) {
            let Some(p) = ctx.project(atom.position) else {
                continue;
            };
            let d = ctx.diameter(p.z, atom.radius * 2.0 * scale);
            if ctx.on_screen(p, d / 2 + 1) {
                ctx.draw().fill_circle(p, d, colix, true);
            }
        }
    }
}

/// Fixed-size screened markers at clicked world points.
#[derive(Debug, Default)]
pub struct ClickMarkersRenderer;

impl ShapeRenderer for ClickMarkersRenderer {
    fn kind(&self) -> ShapeKind {
        ShapeKind::ClickMarkers
    }

    fn render(&mut self, shape: &Shape, ctx: &mut RenderContext<'_>) {
        let colix = shape_colix(
            ctx.palette.overlay_colix(ShapeKind::ClickMarkers),
            shape.translucent,
        );
        let d = ctx.display.marker_diameter_px.max(1);
        let scene = ctx.scene;
        for &point in scene.click_markers() {
            if let Some(p) = ctx.project(point) {
                if ctx.on_screen(p, d) {
                    ctx.draw().fill_circle(p, d, colix, true);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::super::test_support::render_once;
    use super::*;
    use crate::renderer::{Colix, DrawCall};
    use crate::scene::{Atom, Frame, Scene};

    #[test]
    fn halos_only_for_selected_atoms_and_larger_than_the_atom() {
        let frame = Frame::new(
            vec![
                Atom::new(Vec3::ZERO, 1.0, Colix::RED).selected(true),
                Atom::new(Vec3::X * 3.0, 1.0, Colix::RED),
            ],
            Vec::new(),
        );
        let calls = render_once(
            &mut HalosRenderer,
            &Shape::new(ShapeKind::Halos),
            &Scene::new(),
            Some(&frame),
        );
        assert_eq!(calls.len(), 1);
        let DrawCall::Circle {
            diameter,
            colix,
            screened,
            ..
        } = calls[0]
        else {
            panic!("expected a circle");
        };
        assert!(screened);
        assert_eq!(colix, Colix::GOLD);
        // 2 Å * 1.6 at ~20.8 px/Å.
        assert_eq!(diameter, 67);
    }

    #[test]
    fn click_markers_are_fixed_size() {
        let mut scene = Scene::new();
        scene.add_click_marker(Vec3::ZERO);
        scene.add_click_marker(Vec3::new(0.0, 0.0, 8.0));
        let calls = render_once(
            &mut ClickMarkersRenderer,
            &Shape::new(ShapeKind::ClickMarkers),
            &scene,
            None,
        );
        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|c| matches!(
            c,
            DrawCall::Circle {
                diameter: 8,
                screened: true,
                colix: Colix::CYAN,
                ..
            }
        )));
    }
}
