//! Headless demo: builds a small helix trajectory, renders it through a
//! recording rasterizer while a camera move and playback run, and logs what
//! each pass drew.
//!
//! Usage: `molscope [options.toml]` with `RUST_LOG=info` (or `debug`).

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use glam::{Vec2, Vec3};
use molscope::camera::CameraTarget;
use molscope::options::Options;
use molscope::primitive::{Cylinder, Object3D, Primitive};
use molscope::renderer::{ClipRect, Colix, RecordingRasterizer};
use molscope::scene::{Atom, Bond, Frame, ShapeKind};
use molscope::structure::{ProteinStructureSegment, StructureKind};
use molscope::{Viewer, ViewerError};

const RESIDUES: usize = 18;
const FRAMES: usize = 12;
const VIEWPORT: (u32, u32) = (640, 480);

/// Alpha-helix CA trace (3.6 residues per turn, 1.5 Å rise), slightly
/// breathing with `phase`.
fn helix_frame(phase: f32) -> Frame {
    let radius = 2.3 + 0.1 * phase.sin();
    let leads: Vec<Vec3> = (0..RESIDUES)
        .map(|i| {
            let t = i as f32 * 100f32.to_radians();
            Vec3::new(radius * t.cos(), radius * t.sin(), 1.5 * i as f32 - 13.0)
        })
        .collect();
    let atoms = leads
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            let atom = Atom::new(p, 0.8, Colix::GREEN);
            if i == 0 {
                atom.with_label("N-term").selected(true)
            } else {
                atom
            }
        })
        .collect();
    let bonds = (1..RESIDUES).map(|i| Bond::new(i - 1, i, 0.25)).collect();
    Frame::new(atoms, bonds).with_structures(vec![ProteinStructureSegment::new(
        StructureKind::Helix,
        leads,
    )])
}

fn load_options() -> Result<Options, ViewerError> {
    std::env::args()
        .nth(1)
        .map_or_else(|| Ok(Options::default()), |p| Options::load(Path::new(&p)))
}

/// Render whenever a repaint is pending, until `passes` passes ran.
fn pump(viewer: &mut Viewer, rec: &mut RecordingRasterizer, passes: usize) {
    let clip = ClipRect::from_viewport(VIEWPORT);
    let repaint = Arc::clone(viewer.repaint_manager());
    let mut rendered = 0;
    while rendered < passes {
        if !repaint.wait_for_request(Duration::from_millis(250)) {
            break;
        }
        let stats = viewer.render(clip, rec);
        log::info!(
            "pass gen {} frame {}: {} shapes, {} draw calls",
            stats.generation,
            viewer.current_frame(),
            stats.shapes_rendered,
            stats.draw_calls
        );
        rec.clear();
        rendered += 1;
    }
}

fn run() -> Result<(), ViewerError> {
    let mut viewer = Viewer::new(load_options()?)?;
    viewer.set_screen_size(VIEWPORT.0, VIEWPORT.1);
    viewer.load_frames(
        (0..FRAMES)
            .map(|f| helix_frame(f as f32 / FRAMES as f32 * std::f32::consts::TAU))
            .collect(),
    );
    for kind in ShapeKind::ALL {
        let _ = viewer.scene_mut().load_shape(kind);
    }
    let _ = viewer.add_primitive(Arc::new(Primitive::new(
        Object3D::Cylinder(Cylinder::between(
            Vec3::new(-6.0, 0.0, -14.0),
            Vec3::new(-6.0, 0.0, 14.0),
            0.4,
        )),
        Colix::ORANGE,
    )));
    viewer.add_click_marker(Vec3::new(4.0, 0.0, 0.0));
    let _ = viewer.fit_to_scene();

    let mut rec = RecordingRasterizer::new();
    pump(&mut viewer, &mut rec, 1);

    viewer.move_to(
        CameraTarget::from_axis_angle(Vec3::Y, 60.0, 140.0, Vec2::ZERO),
        0.5,
    )?;
    pump(&mut viewer, &mut rec, usize::MAX);
    log::info!("camera move ended: {:?}", viewer.wait_camera_move());

    if viewer.play()? {
        pump(&mut viewer, &mut rec, FRAMES);
        viewer.stop();
    }

    if let Ok(pick) = viewer.pick_primitive(Vec2::new(320.0, 240.0), 4.0) {
        log::info!("pick at viewport center: {pick:?}");
    }
    Ok(())
}

fn main() {
    env_logger::init();
    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}
