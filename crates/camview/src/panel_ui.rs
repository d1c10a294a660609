//! egui UI for preview panels.
//!
//! Building the window only collects [`PanelAction`]s; the capture engine
//! applies them afterwards so UI code never touches GPU or export state.

use crate::panel::PreviewPanel;

/// An action requested through a panel's UI this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum PanelAction {
    /// Capture a single full-resolution frame.
    CaptureFrame,
    /// Capture a frame sequence.
    CaptureSequence {
        /// Number of frames.
        frames: u32,
        /// Capture rate.
        fps: f32,
    },
    /// Start or stop continuous recording.
    ToggleRecording,
    /// Export the recorded frames.
    DownloadRecording,
    /// Close the panel.
    Close,
}

/// Builds the floating window for one panel and returns requested actions.
pub fn panel_window(ctx: &egui::Context, panel: &mut PreviewPanel) -> Vec<PanelAction> {
    let mut actions = Vec::new();

    // Upload the latest preview readback before building the window.
    if let Some((pixels, width, height)) = panel.preview_pixels.take() {
        let size = [width as usize, height as usize];
        let image = egui::ColorImage::from_rgba_unmultiplied(size, &pixels);
        match &mut panel.preview_texture {
            Some(texture) => texture.set(image, egui::TextureOptions::LINEAR),
            None => {
                panel.preview_texture = Some(ctx.load_texture(
                    format!("preview:{}", panel.title),
                    image,
                    egui::TextureOptions::LINEAR,
                ));
            }
        }
    }

    let mut open = panel.open;
    let title = panel.title.clone();
    egui::Window::new(title)
        .id(egui::Id::new(("camera-preview", panel.camera)))
        .open(&mut open)
        .resizable(false)
        .show(ctx, |ui| {
            if let Some(texture) = &panel.preview_texture {
                ui.image(texture);
            } else {
                ui.label("(no preview)");
            }
            ui.label(format!("Aspect {:.2}", panel.aspect_ratio));

            ui.separator();

            if ui.button("Capture 4K PNG").clicked() {
                actions.push(PanelAction::CaptureFrame);
            }

            ui.horizontal(|ui| {
                if ui.button("Capture frames").clicked() {
                    actions.push(PanelAction::CaptureSequence {
                        frames: panel.frames_input,
                        fps: panel.fps_input,
                    });
                }
                ui.add(
                    egui::DragValue::new(&mut panel.frames_input)
                        .range(1..=10_000)
                        .prefix("frames: "),
                );
                ui.add(
                    egui::DragValue::new(&mut panel.fps_input)
                        .range(1.0..=240.0)
                        .prefix("fps: "),
                );
            });

            ui.horizontal(|ui| {
                let record_label = if panel.recording {
                    "Stop Record"
                } else {
                    "Start Record"
                };
                if ui.button(record_label).clicked() {
                    actions.push(PanelAction::ToggleRecording);
                }
                if ui.button("Download Recording").clicked() {
                    actions.push(PanelAction::DownloadRecording);
                }
            });

            if let Some(status) = panel.status_text() {
                ui.separator();
                ui.label(status);
            }
        });

    if !open {
        actions.push(PanelAction::Close);
    }
    panel.open = open;

    actions
}
