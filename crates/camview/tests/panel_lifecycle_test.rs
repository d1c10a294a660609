//! Panel lifecycle integration tests: detection, attachment, projector
//! exclusion, close/reattach, and recording state.
//!
//! Note: Due to camview using global state that can only be initialized once
//! per process (OnceLock), all tests are combined into a single test
//! function. Nothing here touches the GPU.

use std::time::{Duration, Instant};

use camview::*;

#[test]
fn panel_lifecycle() {
    init().expect("init failed");
    assert!(is_initialized());

    // Test 1: Manual attach uses the camera name as title
    let main_cam = add_camera(Some("Main Camera"), CameraParameters::default());
    {
        attach_camera_preview(main_cam, None).expect("attach failed");
        assert!(is_attached(main_cam));
        assert_eq!(panel_count(), 1);
        assert_eq!(panel_title(main_cam).as_deref(), Some("Main Camera"));

        // Double attach is a no-op
        attach_camera_preview(main_cam, None).expect("re-attach should be a no-op");
        assert_eq!(panel_count(), 1);
    }

    // Test 2: Explicit label wins over the camera name
    {
        let cam = add_camera(Some("Ignored Name"), CameraParameters::default());
        attach_camera_preview(cam, Some("Hero Shot")).expect("attach failed");
        assert_eq!(panel_title(cam).as_deref(), Some("Hero Shot"));
        close_preview(cam);
    }

    // Test 3: Fallback title for unnamed cameras
    {
        let cam = add_camera(None, CameraParameters::default());
        attach_camera_preview(cam, None).expect("attach failed");
        let title = panel_title(cam).expect("panel should exist");
        let idx = title
            .strip_prefix("Camera_")
            .expect("fallback title should start with Camera_")
            .parse::<u32>()
            .expect("fallback suffix should be numeric");
        assert!(idx < 10_000);
        close_preview(cam);
    }

    // Test 4: Projector-owned cameras never attach, under either
    // reference field
    {
        let primary = add_camera(Some("Projector A"), CameraParameters::default());
        let legacy = add_camera(Some("Projector B"), CameraParameters::default());
        register_projector(Projector::new("front wall", primary));
        register_projector(Projector::with_render_camera("back wall", legacy));

        assert!(attach_camera_preview(primary, None).is_err());
        assert!(attach_camera_preview(legacy, None).is_err());
        assert!(!is_attached(primary));
        assert!(!is_attached(legacy));
    }

    // Test 5: Triggered detection attaches a panel for a camera inserted
    // within the window
    {
        let t0 = Instant::now();
        trigger_camera_watch(t0);
        let cam = add_camera(Some("Detected"), CameraParameters::default());
        frame_tick(t0 + Duration::from_millis(50));
        assert!(is_attached(cam));
        assert_eq!(panel_title(cam).as_deref(), Some("Detected"));
    }

    // Test 6: Several cameras inserted in one window all attach. The
    // subscription is consumed by the first insertion; the rest are picked
    // up by the polling fallback on the first tick past the poll interval.
    {
        let before = panel_count();
        let t0 = Instant::now();
        trigger_camera_watch(t0);
        let first = add_camera(Some("Dolly"), CameraParameters::default());
        let second = add_camera(Some("Crane"), CameraParameters::default());
        // Past the 200 ms poll interval, still inside the window
        frame_tick(t0 + Duration::from_millis(250));
        assert!(is_attached(first));
        assert!(is_attached(second));
        assert_eq!(panel_count(), before + 2);
    }

    // Test 7: Detection skips projector cameras
    {
        let t0 = Instant::now();
        trigger_camera_watch(t0);
        let cam = add_camera(Some("Wall Projector"), CameraParameters::default());
        register_projector(Projector::new("wall", cam));
        frame_tick(t0 + Duration::from_millis(50));
        assert!(!is_attached(cam));
    }

    // Test 8: The window expires silently; cameras inserted after expiry
    // are not attached
    {
        let before = panel_count();
        let t0 = Instant::now();
        trigger_camera_watch(t0);
        // Past the 5 s window with nothing inserted
        frame_tick(t0 + Duration::from_secs(6));
        assert_eq!(panel_count(), before);

        let late = add_camera(Some("Too Late"), CameraParameters::default());
        frame_tick(t0 + Duration::from_secs(7));
        assert!(!is_attached(late));
    }

    // Test 9: Close clears the attachment so the camera can reattach
    {
        assert!(close_preview(main_cam));
        assert!(!is_attached(main_cam));
        assert!(!close_preview(main_cam));

        attach_camera_preview(main_cam, None).expect("reattach failed");
        assert!(is_attached(main_cam));
    }

    // Test 10: Recording toggles and reports its frame count; downloading an
    // empty buffer reports "No frames recorded" (no GPU involved here)
    {
        assert!(!is_recording(main_cam));
        set_recording(main_cam, true);
        assert!(is_recording(main_cam));
        assert_eq!(recorded_frame_count(main_cam), 0);

        set_recording(main_cam, false);
        assert!(!is_recording(main_cam));
        assert_eq!(
            panel_status(main_cam).as_deref(),
            Some("Recorded 0 frames")
        );

        download_recording(main_cam);
        assert_eq!(
            panel_status(main_cam).as_deref(),
            Some("No frames recorded")
        );
    }

    // Test 11: Statuses expire on their own
    {
        // The "No frames recorded" status clears after 1.5 s
        frame_tick(Instant::now() + Duration::from_secs(2));
        assert_eq!(panel_status(main_cam), None);
    }

    shutdown();
    assert!(!is_initialized());
}
