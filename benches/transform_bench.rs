#![allow(missing_docs)]

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use glam::{Vec2, Vec3};
use molscope::camera::{CameraMove, CameraTarget, TransformManager};
use molscope::renderer::{ClipRect, Colix, RecordingRasterizer};
use molscope::scene::{Atom, Bond, Frame, ShapeKind};
use molscope::structure::fit_axis_through_points;
use molscope::Viewer;

fn helix_points(n: usize) -> Vec<Vec3> {
    (0..n)
        .map(|i| {
            let t = i as f32 * 100f32.to_radians();
            Vec3::new(2.3 * t.cos(), 2.3 * t.sin(), 1.5 * i as f32)
        })
        .collect()
}

fn projection_benchmark(c: &mut Criterion) {
    let mut tm = TransformManager::default();
    tm.rotate_xy_by(30.0, 15.0);
    let snapshot = tm.finalize_transform_parameters();
    let points = helix_points(1000);

    c.bench_function("project_1000_points", |b| {
        b.iter(|| {
            for &p in &points {
                let _ = black_box(snapshot.transform_point(black_box(p)));
            }
        });
    });
}

fn axis_fit_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("helix_axis_fit");
    for n in [8, 32, 128] {
        let points = helix_points(n);
        group.bench_function(format!("{n}_residues"), |b| {
            b.iter(|| black_box(fit_axis_through_points(black_box(&points))));
        });
    }
    group.finish();
}

fn camera_step_benchmark(c: &mut Criterion) {
    let target =
        CameraTarget::from_axis_angle(Vec3::Y, 120.0, 180.0, Vec2::new(5.0, 5.0));
    c.bench_function("camera_move_20_steps", |b| {
        b.iter(|| {
            let mut tm = TransformManager::default();
            let mut planned =
                CameraMove::new(&tm, target, 1.0, 20.0);
            while planned.step(&mut tm) {}
            black_box(tm.state())
        });
    });
}

fn render_pass_benchmark(c: &mut Criterion) {
    let points = helix_points(500);
    let atoms = points
        .iter()
        .map(|&p| Atom::new(p, 0.8, Colix::GREEN))
        .collect();
    let bonds = (1..points.len()).map(|i| Bond::new(i - 1, i, 0.25)).collect();
    let mut viewer = Viewer::default();
    viewer.load_frames(vec![Frame::new(atoms, bonds)]);
    for kind in [ShapeKind::Balls, ShapeKind::Sticks] {
        let _ = viewer.scene_mut().load_shape(kind);
    }
    let _ = viewer.fit_to_scene();
    let clip = ClipRect::from_viewport((500, 500));
    let mut rec = RecordingRasterizer::new();

    c.bench_function("render_500_atoms", |b| {
        b.iter(|| {
            rec.clear();
            black_box(viewer.render(clip, &mut rec))
        });
    });
}

criterion_group!(
    benches,
    projection_benchmark,
    axis_fit_benchmark,
    camera_step_benchmark,
    render_pass_benchmark
);
criterion_main!(benches);
