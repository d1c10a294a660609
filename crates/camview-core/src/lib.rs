//! Core abstractions for camview-rs.
//!
//! This crate holds everything the preview/export subsystem shares that does
//! not touch the GPU:
//! - the scene registry (ordered child list with insertion subscriptions)
//! - the projector table (cameras excluded from preview attachment)
//! - camera parameters (intrinsics/extrinsics)
//! - per-camera recording buffers
//! - global options and the context singleton

pub mod camera;
pub mod error;
pub mod options;
pub mod projector;
pub mod recording;
pub mod scene;
pub mod state;

pub use camera::{CameraExtrinsics, CameraIntrinsics, CameraParameters};
pub use error::{CamviewError, Result};
pub use options::Options;
pub use projector::{is_projector_camera, Projector};
pub use recording::{EncodedFrame, FrameBuffer};
pub use scene::{
    ObjectId, PointSet, Scene, SceneCamera, SceneObject, SubscriptionId, SubscriptionPoll,
};
pub use state::{
    init_context, is_initialized, shutdown_context, try_with_context, try_with_context_mut,
    with_context, with_context_mut, Context,
};

// Re-export common math types so downstream crates agree on versions.
pub use glam::{Mat4, Vec3};
