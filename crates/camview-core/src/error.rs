//! Error types for camview-rs.

use thiserror::Error;

use crate::scene::ObjectId;

/// The main error type for camview-rs operations.
#[derive(Error, Debug)]
pub enum CamviewError {
    /// Camview has not been initialized.
    #[error("camview not initialized - call camview::init() first")]
    NotInitialized,

    /// Camview has already been initialized.
    #[error("camview already initialized")]
    AlreadyInitialized,

    /// No scene object with the given id exists.
    #[error("scene object {0:?} not found")]
    ObjectNotFound(ObjectId),

    /// The scene object exists but is not a camera.
    #[error("scene object {0:?} is not a camera")]
    NotACamera(ObjectId),

    /// The camera is already owned by a projector and cannot get a panel.
    #[error("camera {0:?} belongs to a projector")]
    ProjectorCamera(ObjectId),

    /// A preview panel is already attached to the camera.
    #[error("camera {0:?} already has a preview panel")]
    PanelExists(ObjectId),

    /// Rendering error.
    #[error("render error: {0}")]
    RenderError(String),

    /// Export (file/archive) error.
    #[error("export error: {0}")]
    ExportError(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// A specialized Result type for camview-rs operations.
pub type Result<T> = std::result::Result<T, CamviewError>;
