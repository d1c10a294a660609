//! Demo: attach a preview panel to a scene camera and capture frames.
//!
//! Builds a small point scene, registers a camera, attaches a preview panel,
//! captures one 4K still, and records a short sequence into `./demo_out/`.
//! Runs fully headless; it needs a GPU adapter (or software fallback).

use std::f32::consts::TAU;
use std::time::{Duration, Instant};

use camview::{self, CameraParameters, Vec3};

fn main() {
    camview::init().expect("camview init failed");
    camview::set_export_dir("demo_out");

    // A ring of points around the origin plus a few accents above it.
    let mut points = Vec::new();
    for i in 0..64 {
        let angle = TAU * (i as f32) / 64.0;
        points.push(Vec3::new(angle.cos(), 0.0, angle.sin()));
    }
    points.push(Vec3::new(0.0, 0.6, 0.0));
    points.push(Vec3::new(0.0, 1.0, 0.0));
    camview::add_point_set("ring", points, Vec3::new(0.9, 0.5, 0.1), 0.04);

    // Simulate the host flow: the user asks for a preview, then a camera is
    // added to the scene shortly after. The watcher picks it up.
    let t0 = Instant::now();
    camview::trigger_camera_watch(t0);

    let cam = camview::add_camera(
        Some("Orbit Camera"),
        CameraParameters::look_at(
            Vec3::new(2.5, 1.5, 2.5),
            Vec3::ZERO,
            Vec3::Y,
            60.0,
            16.0 / 9.0,
        ),
    );

    camview::frame_tick(t0 + Duration::from_millis(16));
    assert!(camview::is_attached(cam), "watcher should have attached");
    println!(
        "panel attached: {}",
        camview::panel_title(cam).unwrap_or_default()
    );

    // Single 4K still.
    camview::capture_frame(cam);
    println!("capture status: {:?}", camview::panel_status(cam));

    // Record a handful of frames and export them.
    camview::set_recording(cam, true);
    let r0 = Instant::now();
    for i in 0..5 {
        camview::frame_tick(r0 + Duration::from_millis(33 * i));
    }
    camview::set_recording(cam, false);
    println!("recorded {} frames", camview::recorded_frame_count(cam));

    camview::download_recording(cam);
    println!("download status: {:?}", camview::panel_status(cam));

    camview::close_preview(cam);
    camview::shutdown();
}
