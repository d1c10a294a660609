//! Configuration options for camview.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Global configuration options for camview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Options {
    /// Directory exports (PNGs, archives) are written to.
    pub export_dir: PathBuf,

    /// Preview width in pixels.
    pub preview_width: u32,

    /// Maximum preview height in pixels; the actual height follows the
    /// camera aspect ratio up to this cap.
    pub preview_max_height: u32,

    /// Export width in pixels.
    pub export_width: u32,

    /// Export height in pixels.
    pub export_height: u32,

    /// How long camera detection stays armed after a trigger, in ms.
    pub detection_window_ms: u64,

    /// Polling fallback interval for camera detection, in ms.
    pub poll_interval_ms: u64,

    /// How long short status messages stay visible, in ms.
    pub status_clear_short_ms: u64,

    /// How long regular status messages stay visible, in ms.
    pub status_clear_ms: u64,

    /// Pause between sequential individual-file downloads, in ms.
    pub download_gap_ms: u64,

    /// Optional cap on recording capture rate. `None` captures one
    /// full-resolution frame per UI frame, matching the legacy behavior.
    pub record_max_fps: Option<f32>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            export_dir: PathBuf::from("."),
            preview_width: 280,
            preview_max_height: 200,
            export_width: 3840,
            export_height: 2160,
            detection_window_ms: 5000,
            poll_interval_ms: 200,
            status_clear_short_ms: 1500,
            status_clear_ms: 2000,
            download_gap_ms: 200,
            record_max_fps: None,
        }
    }
}

impl Options {
    /// Detection window as a [`Duration`].
    #[must_use]
    pub fn detection_window(&self) -> Duration {
        Duration::from_millis(self.detection_window_ms)
    }

    /// Polling interval as a [`Duration`].
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Short status lifetime as a [`Duration`].
    #[must_use]
    pub fn status_clear_short(&self) -> Duration {
        Duration::from_millis(self.status_clear_short_ms)
    }

    /// Regular status lifetime as a [`Duration`].
    #[must_use]
    pub fn status_clear(&self) -> Duration {
        Duration::from_millis(self.status_clear_ms)
    }

    /// Download gap as a [`Duration`].
    #[must_use]
    pub fn download_gap(&self) -> Duration {
        Duration::from_millis(self.download_gap_ms)
    }

    /// Interval between sequence captures for the given rate. The rate is
    /// clamped to at least one frame per second.
    #[must_use]
    pub fn sequence_interval(fps: f32) -> Duration {
        let fps = f64::from(fps.max(1.0));
        Duration::from_secs_f64(1.0 / fps)
    }

    /// Minimum interval between recorded frames, or `None` when recording
    /// captures every UI frame.
    #[must_use]
    pub fn record_min_interval(&self) -> Option<Duration> {
        self.record_max_fps
            .map(|fps| Duration::from_secs_f64(1.0 / f64::from(fps.max(1.0))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_interval_clamps_low_rates() {
        // Computed in f64 so common rates land on whole milliseconds.
        assert_eq!(Options::sequence_interval(10.0), Duration::from_millis(100));
        assert_eq!(Options::sequence_interval(25.0), Duration::from_millis(40));
        // Rates below 1 fps clamp to one frame per second.
        assert_eq!(Options::sequence_interval(0.25), Duration::from_secs(1));
        assert_eq!(Options::sequence_interval(0.0), Duration::from_secs(1));
    }

    #[test]
    fn record_interval_default_unlimited() {
        let opts = Options::default();
        assert!(opts.record_min_interval().is_none());

        let capped = Options {
            record_max_fps: Some(30.0),
            ..Options::default()
        };
        let interval = capped.record_min_interval().unwrap();
        assert!((interval.as_secs_f32() - 1.0 / 30.0).abs() < 1e-6);
    }

    proptest::proptest! {
        #[test]
        fn sequence_interval_never_exceeds_one_second(fps in 0.0f32..1000.0) {
            let interval = Options::sequence_interval(fps);
            proptest::prop_assert!(interval <= Duration::from_secs(1));
            proptest::prop_assert!(interval > Duration::ZERO);
        }
    }
}
