//! Projector table: cameras owned by projectors are excluded from preview.
//!
//! Projector ownership lives in this side table keyed by camera id, never as
//! flags on the camera objects themselves.

use serde::{Deserialize, Serialize};

use crate::scene::ObjectId;

/// A projector registered with the subsystem.
///
/// Historically projectors referenced their camera under one of two fields
/// depending on the projector revision; both are checked when deciding
/// ownership.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projector {
    /// User-facing name.
    pub name: String,
    /// Primary camera reference.
    pub camera: Option<ObjectId>,
    /// Legacy camera reference kept by older projector revisions.
    pub render_camera: Option<ObjectId>,
}

impl Projector {
    /// Creates a projector owning the given camera via the primary field.
    #[must_use]
    pub fn new(name: impl Into<String>, camera: ObjectId) -> Self {
        Self {
            name: name.into(),
            camera: Some(camera),
            render_camera: None,
        }
    }

    /// Creates a projector owning the given camera via the legacy field.
    #[must_use]
    pub fn with_render_camera(name: impl Into<String>, camera: ObjectId) -> Self {
        Self {
            name: name.into(),
            camera: None,
            render_camera: Some(camera),
        }
    }

    /// Returns true if this projector owns the camera under either field.
    #[must_use]
    pub fn owns(&self, id: ObjectId) -> bool {
        self.camera == Some(id) || self.render_camera == Some(id)
    }
}

/// Returns true if any projector in the slice owns the camera.
#[must_use]
pub fn is_projector_camera(projectors: &[Projector], id: ObjectId) -> bool {
    projectors.iter().any(|p| p.owns(id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owns_checks_both_fields() {
        let a = ObjectId(1);
        let b = ObjectId(2);
        let primary = Projector::new("front", a);
        let legacy = Projector::with_render_camera("back", b);

        assert!(primary.owns(a));
        assert!(!primary.owns(b));
        assert!(legacy.owns(b));
        assert!(!legacy.owns(a));

        let projectors = vec![primary, legacy];
        assert!(is_projector_camera(&projectors, a));
        assert!(is_projector_camera(&projectors, b));
        assert!(!is_projector_camera(&projectors, ObjectId(3)));
    }

    #[test]
    fn serializes_camera_references() {
        let projector = Projector::new("front", ObjectId(7));
        let json = serde_json::to_string(&projector).unwrap();
        let back: Projector = serde_json::from_str(&json).unwrap();
        assert_eq!(back.camera, Some(ObjectId(7)));
        assert_eq!(back.render_camera, None);
    }
}
