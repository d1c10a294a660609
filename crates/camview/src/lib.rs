//! camview — camera preview and export panels for a wgpu scene viewer.
//!
//! Attach a floating preview panel to a camera registered in the scene:
//! live low-resolution preview, single 4K PNG capture, multi-frame sequence
//! capture, and continuous recording with zip or individual-file export.
//!
//! The host editor owns the window, event loop, and egui paint backend; it
//! integrates this subsystem through three calls:
//!
//! - [`trigger_camera_watch`] when the user requests a camera preview
//!   (detection window for the next inserted camera),
//! - [`frame_tick`] once per display frame (drives detection, previews,
//!   sequence capture, and recording),
//! - [`draw_panels`] inside its egui pass (builds panel windows and applies
//!   the actions they request).
//!
//! # Example
//! ```no_run
//! use camview::*;
//! use std::time::Instant;
//!
//! init().unwrap();
//! add_point_set("pts", vec![Vec3::ZERO, Vec3::X, Vec3::Y], Vec3::ONE, 0.05);
//! let cam = add_camera(Some("Main Camera"), CameraParameters::default());
//! attach_camera_preview(cam, None).unwrap();
//! frame_tick(Instant::now());
//! ```

pub mod capture;
pub mod export;
pub mod panel;
pub mod panel_ui;
pub mod watcher;

use std::sync::{Mutex, OnceLock};
use std::time::Instant;

use camview_core::{
    is_projector_camera, with_context, with_context_mut, CamviewError, PointSet, Result,
    SceneCamera, SceneObject,
};
use rand::Rng;

pub use camview_core::{
    CameraExtrinsics, CameraIntrinsics, CameraParameters, Mat4, ObjectId, Options, Projector,
    Vec3,
};
pub use export::ExportSink;
pub use panel::{PanelRegistry, PreviewPanel};
pub use panel_ui::PanelAction;
pub use watcher::CameraWatcher;

/// Identity of a scene camera (cameras are scene objects).
pub type CameraId = ObjectId;

/// Everything the panel subsystem owns besides the core context: the
/// watcher, the panel side table, the lazy GPU engine, and the export sink.
pub(crate) struct Subsystem {
    pub(crate) watcher: CameraWatcher,
    pub(crate) panels: PanelRegistry,
    pub(crate) engine: Option<camview_render::RenderEngine>,
    pub(crate) engine_failed: bool,
    pub(crate) export: ExportSink,
}

impl Subsystem {
    fn new() -> Self {
        Self {
            watcher: CameraWatcher::new(),
            panels: PanelRegistry::new(),
            engine: None,
            engine_failed: false,
            export: ExportSink::default(),
        }
    }
}

static SUBSYSTEM: OnceLock<Mutex<Subsystem>> = OnceLock::new();

pub(crate) fn with_subsystem<F, R>(f: F) -> R
where
    F: FnOnce(&mut Subsystem) -> R,
{
    let lock = SUBSYSTEM.get_or_init(|| Mutex::new(Subsystem::new()));
    let mut guard = lock.lock().expect("subsystem lock poisoned");
    f(&mut guard)
}

/// Initializes camview.
///
/// Must be called once before any other function.
pub fn init() -> Result<()> {
    let _ = env_logger::try_init();
    camview_core::init_context()?;
    let export_dir = with_context(|ctx| ctx.options.export_dir.clone());
    with_subsystem(|sys| sys.export.set_dir(export_dir));
    log::info!("camview initialized");
    Ok(())
}

/// Returns whether camview has been initialized.
#[must_use]
pub fn is_initialized() -> bool {
    camview_core::is_initialized()
}

/// Shuts down camview: closes all panels and clears the scene.
///
/// Due to `OnceLock` semantics the context cannot be re-initialized in the
/// same process.
pub fn shutdown() {
    with_subsystem(|sys| {
        sys.watcher.disarm();
        sys.panels.clear();
        sys.engine = None;
        sys.engine_failed = false;
    });
    camview_core::shutdown_context();
}

/// Sets the directory exports are written to.
pub fn set_export_dir(dir: impl Into<std::path::PathBuf>) {
    let dir = dir.into();
    with_context_mut(|ctx| ctx.options.export_dir = dir.clone());
    with_subsystem(|sys| sys.export.set_dir(dir));
}

/// Registers a camera in the scene.
pub fn add_camera(name: Option<&str>, params: CameraParameters) -> CameraId {
    with_context_mut(|ctx| {
        ctx.scene.insert(SceneObject::Camera(SceneCamera {
            name: name.map(str::to_string),
            params,
        }))
    })
}

/// Registers a point set in the scene.
pub fn add_point_set(name: &str, points: Vec<Vec3>, color: Vec3, radius: f32) -> ObjectId {
    with_context_mut(|ctx| {
        ctx.scene.insert(SceneObject::Points(PointSet {
            name: name.to_string(),
            points,
            color,
            radius,
        }))
    })
}

/// Registers a projector. Cameras it references are excluded from preview.
pub fn register_projector(projector: Projector) {
    with_context_mut(|ctx| ctx.projectors.push(projector));
}

/// Number of children in the scene.
#[must_use]
pub fn scene_children_len() -> usize {
    with_context(|ctx| ctx.scene.children_len())
}

/// Opens a camera detection window starting at `now`.
///
/// For roughly the next 5 seconds (configurable) the subsystem watches for a
/// newly inserted camera and attaches a preview panel to the first
/// non-projector camera that appears. No camera within the window is a
/// silent no-op.
pub fn trigger_camera_watch(now: Instant) {
    with_subsystem(|sys| sys.watcher.trigger(now));
}

/// Attaches a preview panel to a camera.
///
/// The panel title comes from `label`, then the camera's name, then a
/// generated `Camera_<idx>` fallback. Attaching to an already-attached
/// camera is a no-op; projector-owned cameras are rejected.
pub fn attach_camera_preview(camera: CameraId, label: Option<&str>) -> Result<()> {
    let (name, aspect) = with_context(|ctx| {
        if is_projector_camera(&ctx.projectors, camera) {
            return Err(CamviewError::ProjectorCamera(camera));
        }
        match ctx.scene.get(camera) {
            Some(SceneObject::Camera(cam)) => {
                Ok((cam.name.clone(), cam.params.aspect_ratio()))
            }
            Some(_) => Err(CamviewError::NotACamera(camera)),
            None => Err(CamviewError::ObjectNotFound(camera)),
        }
    })?;

    with_subsystem(|sys| {
        if sys.panels.is_attached(camera) {
            log::debug!("camera {camera:?} already has a preview panel");
            return;
        }
        let title = label
            .map(str::to_string)
            .or(name)
            .unwrap_or_else(|| format!("Camera_{}", rand::thread_rng().gen_range(0..10_000)));
        log::info!("attaching preview panel '{title}' to camera {camera:?}");
        sys.panels.insert(PreviewPanel::new(camera, title, aspect));
    });
    Ok(())
}

/// Closes a camera's preview panel, releasing its GPU targets.
///
/// Returns true if a panel was attached. The camera may be re-detected and
/// reattached afterwards.
pub fn close_preview(camera: CameraId) -> bool {
    with_subsystem(|sys| {
        if let Some(mut panel) = sys.panels.remove(camera) {
            panel.release_gpu_resources();
            log::info!("closed preview panel '{}'", panel.title);
            true
        } else {
            false
        }
    })
}

/// Advances the subsystem by one display frame.
///
/// Drives camera detection, attaches panels for detected cameras, renders
/// live previews, advances sequence captures and recording, and expires
/// transient statuses.
pub fn frame_tick(now: Instant) {
    let detected = with_subsystem(|sys| sys.watcher.tick(now));
    for camera in detected {
        match attach_camera_preview(camera, None) {
            Ok(()) => {}
            Err(CamviewError::ProjectorCamera(_)) => {
                log::debug!("skipping projector-owned camera {camera:?}");
            }
            Err(e) => {
                log::warn!("could not attach detected camera {camera:?}: {e}");
            }
        }
    }

    with_subsystem(|sys| sys.tick_panels(now));
}

/// Builds all panel windows and applies the actions they request.
///
/// Call inside the host's egui pass.
pub fn draw_panels(ctx: &egui::Context) {
    let now = Instant::now();
    let actions: Vec<(CameraId, Vec<PanelAction>)> = with_subsystem(|sys| {
        sys.panels
            .iter_mut()
            .map(|panel| (panel.camera, panel_ui::panel_window(ctx, panel)))
            .collect()
    });

    for (camera, panel_actions) in actions {
        for action in panel_actions {
            apply_action(camera, action, now);
        }
    }
}

fn apply_action(camera: CameraId, action: PanelAction, now: Instant) {
    match action {
        PanelAction::CaptureFrame => {
            with_subsystem(|sys| sys.capture_frame_for(camera, now));
        }
        PanelAction::CaptureSequence { frames, fps } => {
            with_subsystem(|sys| sys.start_sequence_for(camera, frames, fps, now));
        }
        PanelAction::ToggleRecording => {
            let on = with_subsystem(|sys| {
                sys.panels.get(camera).map(|p| p.recording).unwrap_or(false)
            });
            with_subsystem(|sys| sys.set_recording_for(camera, !on, now));
        }
        PanelAction::DownloadRecording => {
            with_subsystem(|sys| sys.download_recording_for(camera, now));
        }
        PanelAction::Close => {
            close_preview(camera);
        }
    }
}

/// Captures a single full-resolution frame for a camera's panel.
pub fn capture_frame(camera: CameraId) {
    let now = Instant::now();
    with_subsystem(|sys| sys.capture_frame_for(camera, now));
}

/// Starts a sequence capture for a camera's panel.
pub fn capture_sequence(camera: CameraId, frames: u32, fps: f32) {
    let now = Instant::now();
    with_subsystem(|sys| sys.start_sequence_for(camera, frames, fps, now));
}

/// Starts or stops continuous recording for a camera's panel.
pub fn set_recording(camera: CameraId, on: bool) {
    let now = Instant::now();
    with_subsystem(|sys| sys.set_recording_for(camera, on, now));
}

/// Exports a camera's recorded frames.
pub fn download_recording(camera: CameraId) {
    let now = Instant::now();
    with_subsystem(|sys| sys.download_recording_for(camera, now));
}

/// Returns true if the camera has a preview panel attached.
#[must_use]
pub fn is_attached(camera: CameraId) -> bool {
    with_subsystem(|sys| sys.panels.is_attached(camera))
}

/// Number of attached preview panels.
#[must_use]
pub fn panel_count() -> usize {
    with_subsystem(|sys| sys.panels.len())
}

/// The title of a camera's panel, if attached.
#[must_use]
pub fn panel_title(camera: CameraId) -> Option<String> {
    with_subsystem(|sys| sys.panels.get(camera).map(|p| p.title.clone()))
}

/// The panel's current transient status text, if any.
#[must_use]
pub fn panel_status(camera: CameraId) -> Option<String> {
    with_subsystem(|sys| {
        sys.panels
            .get(camera)
            .and_then(|p| p.status_text().map(str::to_string))
    })
}

/// Number of frames in a camera's recording buffer.
#[must_use]
pub fn recorded_frame_count(camera: CameraId) -> usize {
    with_subsystem(|sys| sys.panels.get(camera).map_or(0, |p| p.buffer.len()))
}

/// Returns true if the camera's panel is currently recording.
#[must_use]
pub fn is_recording(camera: CameraId) -> bool {
    with_subsystem(|sys| sys.panels.get(camera).is_some_and(|p| p.recording))
}
