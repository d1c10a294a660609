//! Rendering backend for camview-rs.
//!
//! This crate provides the headless wgpu-based rendering engine used by the
//! preview panels:
//! - device/queue creation without a surface
//! - offscreen color+depth targets with aligned CPU readback
//! - a point billboard pipeline (WGSL)
//! - PNG encoding of captured pixels

pub mod capture;
pub mod engine;
pub mod error;
pub mod point_render;
pub mod target;

pub use capture::{encode_png, save_image, CaptureError};
pub use engine::{RenderEngine, SceneUniforms, ToneSettings};
pub use error::{RenderError, RenderResult};
pub use point_render::{PointRenderData, PointUniforms};
pub use target::{aligned_bytes_per_row, OffscreenTarget};
