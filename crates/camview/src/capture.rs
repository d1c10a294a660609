//! Capture and record engine.
//!
//! Single captures, sequence captures, continuous recording, and recording
//! downloads. Every failure is caught here: logged, surfaced as a transient
//! panel status, and never propagated to the host.

use std::time::Instant;

use camview_core::{with_context, CameraParameters, EncodedFrame, ObjectId, Options};
use camview_render::{encode_png, OffscreenTarget, RenderEngine, ToneSettings};
use pollster::FutureExt;

use crate::export::{self, numbered_frame_name, single_frame_name};
#[cfg(feature = "archive")]
use crate::export::{recording_archive_name, sequence_archive_name};
use crate::panel::{preview_size, PreviewPanel, SequenceJob};
use crate::Subsystem;

fn camera_params(camera: ObjectId) -> Option<CameraParameters> {
    with_context(|ctx| ctx.scene.camera(camera).map(|c| c.params))
}

fn options_snapshot() -> Options {
    with_context(|ctx| ctx.options.clone())
}

/// Renders one full-resolution frame for the panel's camera and encodes it.
fn render_export_frame(
    engine: &mut RenderEngine,
    panel: &mut PreviewPanel,
    opts: &Options,
) -> camview_core::Result<EncodedFrame> {
    let params = camera_params(panel.camera)
        .ok_or(camview_core::CamviewError::ObjectNotFound(panel.camera))?;

    if panel.export_target.is_none() {
        let target = OffscreenTarget::new(&engine.device, opts.export_width, opts.export_height)
            .map_err(|e| camview_core::CamviewError::RenderError(e.to_string()))?;
        panel.export_target = Some(target);
    }
    let target = panel
        .export_target
        .as_ref()
        .ok_or_else(|| camview_core::CamviewError::RenderError("no export target".into()))?;

    with_context(|ctx| engine.sync_scene(&ctx.scene));
    let pixels = engine
        .render_and_read(target, &params)
        .map_err(|e| camview_core::CamviewError::RenderError(e.to_string()))?;
    let png = encode_png(&pixels, target.width, target.height)
        .map_err(|e| camview_core::CamviewError::ExportError(e.to_string()))?;
    Ok(EncodedFrame::new(png))
}

impl Subsystem {
    /// Captures a single full-resolution frame and exports it as
    /// `<title>_<timestamp>.png`.
    pub(crate) fn capture_frame_for(&mut self, camera: ObjectId, now: Instant) {
        let opts = options_snapshot();
        let Subsystem {
            engine,
            engine_failed,
            panels,
            export,
            ..
        } = self;
        let Some(panel) = panels.get_mut(camera) else {
            return;
        };

        panel.set_status("Rendering 4K...", now, opts.status_clear());

        let engine = match ensure_engine_split(engine, engine_failed) {
            Some(engine) => engine,
            None => {
                panel.set_status("No export renderer", now, opts.status_clear());
                return;
            }
        };

        match render_export_frame(engine, panel, &opts) {
            Ok(frame) => {
                let name = single_frame_name(&panel.title, export::timestamp_ms());
                match export.write_file(&name, &frame.bytes) {
                    Ok(_) => panel.set_status("Saved", now, opts.status_clear()),
                    Err(e) => {
                        log::error!("failed to export frame: {e}");
                        panel.set_status("Error", now, opts.status_clear());
                    }
                }
            }
            Err(e) => {
                log::error!("failed to capture frame: {e}");
                panel.set_status("Error", now, opts.status_clear());
            }
        }
    }

    /// Starts a sequence capture of `frames` frames at `fps`.
    ///
    /// Frames are captured one per tick as they come due; completion exports
    /// them as an archive or as individual numbered files.
    pub(crate) fn start_sequence_for(&mut self, camera: ObjectId, frames: u32, fps: f32, now: Instant) {
        let opts = options_snapshot();
        let Some(panel) = self.panels.get_mut(camera) else {
            return;
        };
        if panel.sequence.is_some() {
            return; // one job at a time
        }

        let frames = frames.max(1);
        panel.set_status(format!("Rendering {frames} frames..."), now, opts.status_clear());
        panel.sequence = Some(SequenceJob {
            total: frames,
            captured: Vec::with_capacity(frames as usize),
            interval: Options::sequence_interval(fps),
            next_due: now,
        });
    }

    /// Starts or stops continuous recording for a camera.
    pub(crate) fn set_recording_for(&mut self, camera: ObjectId, on: bool, now: Instant) {
        let opts = options_snapshot();
        let Some(panel) = self.panels.get_mut(camera) else {
            return;
        };
        if panel.recording == on {
            return;
        }

        if on {
            panel.buffer.clear();
            panel.last_record_capture = None;
            panel.recording = true;
            panel.set_status("Recording...", now, opts.status_clear());
            log::info!("recording started for '{}'", panel.title);
        } else {
            panel.recording = false;
            let count = panel.buffer.len();
            panel.set_status(format!("Recorded {count} frames"), now, opts.status_clear());
            log::info!("recording stopped for '{}' ({count} frames)", panel.title);
        }
    }

    /// Exports the recorded frames, draining the buffer on success.
    pub(crate) fn download_recording_for(&mut self, camera: ObjectId, now: Instant) {
        let opts = options_snapshot();
        let Subsystem { panels, export, .. } = self;
        let Some(panel) = panels.get_mut(camera) else {
            return;
        };

        if panel.buffer.is_empty() {
            panel.set_status("No frames recorded", now, opts.status_clear_short());
            return;
        }

        panel.set_status("Preparing download...", now, opts.status_clear());
        let frames = panel.buffer.drain();
        let entries: Vec<(String, Vec<u8>)> = frames
            .into_iter()
            .enumerate()
            .map(|(i, f)| (numbered_frame_name(&panel.title, i), f.bytes))
            .collect();

        #[cfg(feature = "archive")]
        {
            let name = recording_archive_name(&panel.title, export::timestamp_ms());
            match export.write_zip(&name, &entries) {
                Ok(_) => panel.set_status("Downloaded zip", now, opts.status_clear()),
                Err(e) => {
                    log::error!("failed to export recording archive: {e}");
                    // Frames are already drained; put them back so the user
                    // can retry the download.
                    for (_, bytes) in entries {
                        panel.buffer.push(EncodedFrame::new(bytes));
                    }
                    panel.set_status("Error", now, opts.status_clear());
                }
            }
        }

        #[cfg(not(feature = "archive"))]
        {
            match export.write_files_sequential(&entries, opts.download_gap()) {
                Ok(_) => panel.set_status("Downloaded frames", now, opts.status_clear()),
                Err(e) => {
                    log::error!("failed to export recording frames: {e}");
                    for (_, bytes) in entries {
                        panel.buffer.push(EncodedFrame::new(bytes));
                    }
                    panel.set_status("Error", now, opts.status_clear());
                }
            }
        }
    }

    /// Advances per-panel work for one frame: preview render, sequence
    /// capture, recording capture, and status expiry.
    pub(crate) fn tick_panels(&mut self, now: Instant) {
        let opts = options_snapshot();
        let Subsystem {
            engine,
            engine_failed,
            panels,
            export,
            ..
        } = self;

        for panel in panels.iter_mut() {
            panel.expire_status(now);

            let Some(engine) = ensure_engine_split(engine, engine_failed) else {
                continue;
            };

            tick_preview(engine, panel, &opts);
            tick_sequence(engine, panel, export, &opts, now);
            tick_recording(engine, panel, &opts, now);
        }
    }
}

/// `ensure_engine` usable while other `Subsystem` fields are borrowed.
fn ensure_engine_split<'a>(
    engine: &'a mut Option<RenderEngine>,
    engine_failed: &mut bool,
) -> Option<&'a mut RenderEngine> {
    if engine.is_none() && !*engine_failed {
        match RenderEngine::new_headless(ToneSettings::default()).block_on() {
            Ok(e) => *engine = Some(e),
            Err(e) => {
                log::error!("failed to create render engine: {e}");
                *engine_failed = true;
            }
        }
    }
    engine.as_mut()
}

fn tick_preview(engine: &mut RenderEngine, panel: &mut PreviewPanel, opts: &Options) {
    let Some(params) = camera_params(panel.camera) else {
        return;
    };

    if panel.preview_target.is_none() {
        let (w, h) = preview_size(opts.preview_width, opts.preview_max_height, panel.aspect_ratio);
        match OffscreenTarget::new(&engine.device, w, h) {
            Ok(target) => panel.preview_target = Some(target),
            Err(e) => {
                log::error!("failed to create preview target: {e}");
                return;
            }
        }
    }
    let Some(target) = panel.preview_target.as_ref() else {
        return;
    };

    with_context(|ctx| engine.sync_scene(&ctx.scene));
    match engine.render_and_read(target, &params) {
        Ok(pixels) => {
            panel.preview_pixels = Some((pixels, target.width, target.height));
        }
        Err(e) => {
            log::error!("preview render failed: {e}");
        }
    }
}

fn tick_sequence(
    engine: &mut RenderEngine,
    panel: &mut PreviewPanel,
    export: &crate::export::ExportSink,
    opts: &Options,
    now: Instant,
) {
    let Some(job) = &panel.sequence else {
        return;
    };
    if now < job.next_due {
        return;
    }
    let total = job.total;

    match render_export_frame(engine, panel, opts) {
        Ok(frame) => {
            // render_export_frame borrowed the panel, re-borrow the job
            if let Some(job) = &mut panel.sequence {
                job.captured.push(frame);
                job.next_due = now + job.interval;
            }
        }
        Err(e) => {
            log::error!("sequence capture failed: {e}");
            panel.sequence = None;
            panel.set_status("Error", now, opts.status_clear());
            return;
        }
    }

    let done = panel
        .sequence
        .as_ref()
        .is_some_and(|job| job.captured.len() as u32 >= job.total);

    if done {
        let Some(job) = panel.sequence.take() else {
            return;
        };
        let entries: Vec<(String, Vec<u8>)> = job
            .captured
            .into_iter()
            .enumerate()
            .map(|(i, f)| (numbered_frame_name(&panel.title, i), f.bytes))
            .collect();

        #[cfg(feature = "archive")]
        {
            let name = sequence_archive_name(&panel.title, export::timestamp_ms());
            match export.write_zip(&name, &entries) {
                Ok(_) => panel.set_status("Sequence ZIP ready", now, opts.status_clear()),
                Err(e) => {
                    log::error!("failed to export sequence archive: {e}");
                    panel.set_status("Error", now, opts.status_clear());
                }
            }
        }

        #[cfg(not(feature = "archive"))]
        {
            match export.write_files_sequential(&entries, opts.download_gap()) {
                Ok(_) => panel.set_status("Sequence done", now, opts.status_clear()),
                Err(e) => {
                    log::error!("failed to export sequence frames: {e}");
                    panel.set_status("Error", now, opts.status_clear());
                }
            }
        }
    } else {
        panel.set_status(format!("Rendering {total} frames..."), now, opts.status_clear());
    }
}

fn tick_recording(
    engine: &mut RenderEngine,
    panel: &mut PreviewPanel,
    opts: &Options,
    now: Instant,
) {
    if !panel.recording {
        return;
    }

    if let (Some(min_interval), Some(last)) = (opts.record_min_interval(), panel.last_record_capture)
    {
        if now.duration_since(last) < min_interval {
            return;
        }
    }

    match render_export_frame(engine, panel, opts) {
        Ok(frame) => {
            panel.buffer.push(frame);
            panel.last_record_capture = Some(now);
            let count = panel.buffer.len();
            panel.set_status(format!("Recording {count} frames"), now, opts.status_clear());
        }
        Err(e) => {
            // Skip the frame; the recording session stays on.
            log::warn!("recording capture failed: {e}");
        }
    }
}
