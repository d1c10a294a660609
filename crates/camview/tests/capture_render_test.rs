//! Capture and export integration tests.
//!
//! These tests need a GPU adapter (real or software fallback). When none is
//! available the subsystem reports "No export renderer" on the first capture
//! and the test skips the GPU-dependent assertions.
//!
//! As with the other integration tests, everything runs in one test function
//! because the global context can only be initialized once per process.

use std::time::{Duration, Instant};

use camview::*;

fn files_with(dir: &std::path::Path, infix: &str, extension: &str) -> Vec<std::path::PathBuf> {
    let mut files: Vec<_> = std::fs::read_dir(dir)
        .expect("read export dir")
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| {
            p.extension().and_then(|e| e.to_str()) == Some(extension)
                && p.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.contains(infix))
        })
        .collect();
    files.sort();
    files
}

#[test]
fn capture_and_export() {
    init().expect("init failed");

    let export_dir = tempfile::tempdir().expect("tempdir failed");
    set_export_dir(export_dir.path());

    add_point_set(
        "cube corners",
        vec![
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(1.0, 1.0, 1.0),
        ],
        Vec3::new(0.9, 0.4, 0.2),
        0.05,
    );

    let cam = add_camera(
        Some("Test Cam"),
        CameraParameters::look_at(
            Vec3::new(3.0, 2.0, 3.0),
            Vec3::new(0.5, 0.5, 0.5),
            Vec3::Y,
            60.0,
            16.0 / 9.0,
        ),
    );
    attach_camera_preview(cam, None).expect("attach failed");

    // --- Test 1: Single 4K capture ---
    let capture_at = Instant::now();
    capture_frame(cam);
    match panel_status(cam).as_deref() {
        Some("Saved") => {}
        Some("No export renderer") => {
            eprintln!("Skipping capture tests: no GPU adapter available");
            return;
        }
        other => panic!("unexpected capture status: {other:?}"),
    }
    let singles = files_with(export_dir.path(), "Test_Cam_", "png");
    assert_eq!(singles.len(), 1, "expected one exported frame");
    let bytes = std::fs::read(&singles[0]).expect("read exported png");
    assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G'], "not a PNG file");

    // "Saved" uses the regular 2 s lifetime, not the short 1.5 s one
    frame_tick(capture_at + Duration::from_millis(1600));
    assert_eq!(panel_status(cam).as_deref(), Some("Saved"));
    frame_tick(capture_at + Duration::from_secs(3));
    assert_eq!(panel_status(cam), None);

    // --- Test 2: Recording captures one frame per tick and downloads ---
    {
        set_recording(cam, true);
        let t0 = Instant::now();
        frame_tick(t0);
        frame_tick(t0 + Duration::from_millis(16));
        frame_tick(t0 + Duration::from_millis(33));
        assert_eq!(recorded_frame_count(cam), 3);

        set_recording(cam, false);
        assert_eq!(panel_status(cam).as_deref(), Some("Recorded 3 frames"));

        download_recording(cam);
        assert_eq!(recorded_frame_count(cam), 0, "download should drain");

        #[cfg(feature = "archive")]
        {
            assert_eq!(panel_status(cam).as_deref(), Some("Downloaded zip"));
            let archives = files_with(export_dir.path(), "_recording_", "zip");
            assert_eq!(archives.len(), 1);

            let file = std::fs::File::open(&archives[0]).expect("open archive");
            let archive = zip::ZipArchive::new(file).expect("parse archive");
            assert_eq!(archive.len(), 3, "archive should hold all frames");
        }

        #[cfg(not(feature = "archive"))]
        {
            assert_eq!(panel_status(cam).as_deref(), Some("Downloaded frames"));
            let frames = files_with(export_dir.path(), "Test_Cam_00", "png");
            assert_eq!(frames.len(), 3);
        }
    }

    // --- Test 3: Sequence capture produces exactly N frames ---
    {
        capture_sequence(cam, 3, 30.0);
        let t0 = Instant::now();
        // One frame per due tick at ~33 ms spacing; extra ticks are no-ops.
        for i in 0..6 {
            frame_tick(t0 + Duration::from_millis(40 * i));
        }

        #[cfg(feature = "archive")]
        {
            assert_eq!(panel_status(cam).as_deref(), Some("Sequence ZIP ready"));
            let archives = files_with(export_dir.path(), "_sequence_", "zip");
            assert_eq!(archives.len(), 1);

            let file = std::fs::File::open(&archives[0]).expect("open archive");
            let mut archive = zip::ZipArchive::new(file).expect("parse archive");
            assert_eq!(archive.len(), 3);
            let names: Vec<String> = (0..archive.len())
                .map(|i| archive.by_index(i).expect("entry").name().to_string())
                .collect();
            assert!(names.contains(&"Test_Cam_0000.png".to_string()));
            assert!(names.contains(&"Test_Cam_0002.png".to_string()));
        }

        #[cfg(not(feature = "archive"))]
        {
            assert_eq!(panel_status(cam).as_deref(), Some("Sequence done"));
        }
    }

    // --- Test 4: A failed recording capture skips the frame but keeps the
    // session recording ---
    {
        set_recording(cam, true);
        let t0 = Instant::now();
        frame_tick(t0);
        assert_eq!(recorded_frame_count(cam), 1);

        // Removing the camera makes every subsequent capture fail.
        camview_core::with_context_mut(|ctx| {
            ctx.scene.remove(cam);
        });
        frame_tick(t0 + Duration::from_millis(16));
        frame_tick(t0 + Duration::from_millis(33));
        assert!(is_recording(cam), "failed captures must not stop recording");
        assert_eq!(recorded_frame_count(cam), 1);

        set_recording(cam, false);
        assert_eq!(panel_status(cam).as_deref(), Some("Recorded 1 frames"));
    }

    shutdown();
}
