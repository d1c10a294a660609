//! Preview panel state and the per-camera panel side table.

use std::time::{Duration, Instant};

use camview_core::{EncodedFrame, FrameBuffer, ObjectId};
use camview_render::OffscreenTarget;

/// Default frame count for sequence capture.
pub const DEFAULT_SEQUENCE_FRAMES: u32 = 60;

/// Default frame rate for sequence capture.
pub const DEFAULT_SEQUENCE_FPS: f32 = 30.0;

/// A transient status line with an expiry instant.
#[derive(Debug, Clone)]
pub struct StatusLine {
    /// Status text shown in the panel.
    pub text: String,
    /// When the text disappears.
    pub clear_at: Instant,
}

/// An in-flight sequence capture.
pub struct SequenceJob {
    /// Total frames requested.
    pub total: u32,
    /// Frames captured so far.
    pub captured: Vec<EncodedFrame>,
    /// Spacing between captures.
    pub interval: Duration,
    /// When the next frame is due.
    pub next_due: Instant,
}

/// Panel state for one camera.
pub struct PreviewPanel {
    /// The camera this panel is attached to.
    pub camera: ObjectId,
    /// Panel title, also the base name for exports.
    pub title: String,
    /// Camera aspect ratio (width / height) at attach time.
    pub aspect_ratio: f32,
    /// Whether the egui window is open.
    pub open: bool,

    /// Frame count input for sequence capture.
    pub frames_input: u32,
    /// Frame rate input for sequence capture.
    pub fps_input: f32,

    /// Whether continuous recording is active.
    pub recording: bool,
    /// Recorded frames for the current session.
    pub buffer: FrameBuffer,
    /// Last recorded capture instant, for the optional rate limit.
    pub last_record_capture: Option<Instant>,

    /// In-flight sequence capture, if any.
    pub sequence: Option<SequenceJob>,

    status: Option<StatusLine>,

    /// Live preview target (lazily created).
    pub preview_target: Option<OffscreenTarget>,
    /// Full-resolution export target (lazily created).
    pub export_target: Option<OffscreenTarget>,
    /// Latest preview pixels, uploaded as an egui texture during UI build.
    pub preview_pixels: Option<(Vec<u8>, u32, u32)>,
    /// egui texture for the preview image.
    pub preview_texture: Option<egui::TextureHandle>,
}

impl PreviewPanel {
    /// Creates a panel for a camera.
    #[must_use]
    pub fn new(camera: ObjectId, title: String, aspect_ratio: f32) -> Self {
        Self {
            camera,
            title,
            aspect_ratio,
            open: true,
            frames_input: DEFAULT_SEQUENCE_FRAMES,
            fps_input: DEFAULT_SEQUENCE_FPS,
            recording: false,
            buffer: FrameBuffer::new(),
            last_record_capture: None,
            sequence: None,
            status: None,
            preview_target: None,
            export_target: None,
            preview_pixels: None,
            preview_texture: None,
        }
    }

    /// Sets the status line, visible until `now + lifetime`.
    pub fn set_status(&mut self, text: impl Into<String>, now: Instant, lifetime: Duration) {
        self.status = Some(StatusLine {
            text: text.into(),
            clear_at: now + lifetime,
        });
    }

    /// The current status text, if not expired.
    #[must_use]
    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().map(|s| s.text.as_str())
    }

    /// Clears the status line once its lifetime has passed.
    pub fn expire_status(&mut self, now: Instant) {
        if let Some(status) = &self.status {
            if now >= status.clear_at {
                self.status = None;
            }
        }
    }

    /// Drops GPU targets and the preview texture.
    pub fn release_gpu_resources(&mut self) {
        self.preview_target = None;
        self.export_target = None;
        self.preview_pixels = None;
        self.preview_texture = None;
    }
}

/// Preview size for a camera aspect ratio: fixed width, height capped.
#[must_use]
pub fn preview_size(width: u32, max_height: u32, aspect_ratio: f32) -> (u32, u32) {
    let raw_height = if aspect_ratio > 0.0 {
        (width as f32 / aspect_ratio).round() as u32
    } else {
        max_height
    };
    (width, raw_height.clamp(1, max_height))
}

/// Side table of attached panels, keyed by camera identity.
///
/// Attachment bookkeeping lives here rather than on the scene objects, so
/// closing a panel is a plain removal and a later detection can reattach.
#[derive(Default)]
pub struct PanelRegistry {
    panels: Vec<PreviewPanel>,
}

impl PanelRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the camera already has a panel.
    #[must_use]
    pub fn is_attached(&self, camera: ObjectId) -> bool {
        self.panels.iter().any(|p| p.camera == camera)
    }

    /// Inserts a panel. The caller must have checked `is_attached` first.
    pub fn insert(&mut self, panel: PreviewPanel) {
        debug_assert!(!self.is_attached(panel.camera));
        self.panels.push(panel);
    }

    /// Gets the panel for a camera.
    #[must_use]
    pub fn get(&self, camera: ObjectId) -> Option<&PreviewPanel> {
        self.panels.iter().find(|p| p.camera == camera)
    }

    /// Gets the panel for a camera, mutably.
    pub fn get_mut(&mut self, camera: ObjectId) -> Option<&mut PreviewPanel> {
        self.panels.iter_mut().find(|p| p.camera == camera)
    }

    /// Removes and returns the panel for a camera.
    pub fn remove(&mut self, camera: ObjectId) -> Option<PreviewPanel> {
        let idx = self.panels.iter().position(|p| p.camera == camera)?;
        Some(self.panels.remove(idx))
    }

    /// Number of attached panels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.panels.len()
    }

    /// Returns true if no panels are attached.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.panels.is_empty()
    }

    /// Iterates over panels in attach order.
    pub fn iter(&self) -> impl Iterator<Item = &PreviewPanel> {
        self.panels.iter()
    }

    /// Iterates over panels mutably.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PreviewPanel> {
        self.panels.iter_mut()
    }

    /// Camera ids with attached panels, in attach order.
    #[must_use]
    pub fn camera_ids(&self) -> Vec<ObjectId> {
        self.panels.iter().map(|p| p.camera).collect()
    }

    /// Removes all panels.
    pub fn clear(&mut self) {
        self.panels.clear();
    }
}
