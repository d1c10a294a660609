//! Scene registry: an ordered child list with insertion subscriptions.
//!
//! The host editor owns the real scene graph; this registry mirrors the part
//! of it the preview subsystem needs — an ordered list of children that
//! cameras get inserted into, with two ways to observe insertions:
//!
//! - a one-shot, deadline-bound subscription that fires on the next camera
//!   insertion (the explicit replacement for wrapping the insertion call), and
//! - plain child-count sampling for the polling fallback.

use std::time::Instant;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::camera::CameraParameters;

/// Identity of a scene child, assigned on insertion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ObjectId(pub u64);

/// Identity of an insertion subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A camera registered in the scene.
#[derive(Debug, Clone)]
pub struct SceneCamera {
    /// Optional user-facing name; panels fall back to a generated title.
    pub name: Option<String>,
    /// Camera intrinsics and extrinsics.
    pub params: CameraParameters,
}

/// A renderable set of points registered in the scene.
#[derive(Debug, Clone)]
pub struct PointSet {
    /// User-facing name.
    pub name: String,
    /// Point positions in world space.
    pub points: Vec<Vec3>,
    /// Uniform point color.
    pub color: Vec3,
    /// Point radius in world units.
    pub radius: f32,
}

/// A child of the scene.
#[derive(Debug, Clone)]
pub enum SceneObject {
    /// A camera (candidate for preview attachment).
    Camera(SceneCamera),
    /// Renderable point geometry.
    Points(PointSet),
}

impl SceneObject {
    /// Returns true if this object is a camera.
    #[must_use]
    pub fn is_camera(&self) -> bool {
        matches!(self, SceneObject::Camera(_))
    }
}

/// Result of polling an insertion subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubscriptionPoll {
    /// No camera inserted yet; subscription still live.
    Pending,
    /// A camera was inserted; subscription consumed.
    Fired(ObjectId),
    /// Deadline passed without a camera insertion; subscription removed.
    Expired,
}

#[derive(Debug)]
struct Subscription {
    id: SubscriptionId,
    deadline: Instant,
    fired: Option<ObjectId>,
}

/// The scene registry.
#[derive(Debug, Default)]
pub struct Scene {
    children: Vec<(ObjectId, SceneObject)>,
    next_id: u64,
    next_subscription: u64,
    subscriptions: Vec<Subscription>,
}

impl Scene {
    /// Creates an empty scene.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a child into the scene and returns its id.
    ///
    /// If the child is a camera, every live subscription that has not fired
    /// yet records it.
    pub fn insert(&mut self, object: SceneObject) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;

        if object.is_camera() {
            let mut notified = 0usize;
            for sub in &mut self.subscriptions {
                if sub.fired.is_none() {
                    sub.fired = Some(id);
                    notified += 1;
                }
            }
            if notified > 0 {
                log::debug!("camera {id:?} inserted, notified {notified} subscription(s)");
            }
        }

        self.children.push((id, object));
        id
    }

    /// Number of children currently in the scene.
    #[must_use]
    pub fn children_len(&self) -> usize {
        self.children.len()
    }

    /// Ids of children at positions `from..`, in insertion order.
    #[must_use]
    pub fn child_ids_from(&self, from: usize) -> Vec<ObjectId> {
        self.children.iter().skip(from).map(|(id, _)| *id).collect()
    }

    /// Gets a child by id.
    #[must_use]
    pub fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        self.children
            .iter()
            .find(|(cid, _)| *cid == id)
            .map(|(_, obj)| obj)
    }

    /// Gets a mutable child by id.
    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        self.children
            .iter_mut()
            .find(|(cid, _)| *cid == id)
            .map(|(_, obj)| obj)
    }

    /// Gets a camera by id, or `None` if the id is missing or not a camera.
    #[must_use]
    pub fn camera(&self, id: ObjectId) -> Option<&SceneCamera> {
        match self.get(id) {
            Some(SceneObject::Camera(cam)) => Some(cam),
            _ => None,
        }
    }

    /// Returns true if the id names a camera child.
    #[must_use]
    pub fn is_camera(&self, id: ObjectId) -> bool {
        self.camera(id).is_some()
    }

    /// Iterates over all point sets with their ids.
    pub fn point_sets(&self) -> impl Iterator<Item = (ObjectId, &PointSet)> {
        self.children.iter().filter_map(|(id, obj)| match obj {
            SceneObject::Points(ps) => Some((*id, ps)),
            SceneObject::Camera(_) => None,
        })
    }

    /// Removes a child by id.
    pub fn remove(&mut self, id: ObjectId) -> Option<SceneObject> {
        let idx = self.children.iter().position(|(cid, _)| *cid == id)?;
        Some(self.children.remove(idx).1)
    }

    /// Removes all children and subscriptions.
    pub fn clear(&mut self) {
        self.children.clear();
        self.subscriptions.clear();
    }

    /// Subscribes to the next camera insertion, valid until `deadline`.
    pub fn subscribe_next_camera(&mut self, deadline: Instant) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscriptions.push(Subscription {
            id,
            deadline,
            fired: None,
        });
        id
    }

    /// Polls a subscription; `Fired` and `Expired` both consume it.
    pub fn poll_subscription(&mut self, id: SubscriptionId, now: Instant) -> SubscriptionPoll {
        let Some(idx) = self.subscriptions.iter().position(|s| s.id == id) else {
            return SubscriptionPoll::Expired;
        };

        if let Some(camera_id) = self.subscriptions[idx].fired {
            self.subscriptions.remove(idx);
            return SubscriptionPoll::Fired(camera_id);
        }

        if now >= self.subscriptions[idx].deadline {
            self.subscriptions.remove(idx);
            return SubscriptionPoll::Expired;
        }

        SubscriptionPoll::Pending
    }

    /// Number of live subscriptions (for diagnostics).
    #[must_use]
    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn camera(name: &str) -> SceneObject {
        SceneObject::Camera(SceneCamera {
            name: Some(name.to_string()),
            params: CameraParameters::default(),
        })
    }

    fn points(name: &str) -> SceneObject {
        SceneObject::Points(PointSet {
            name: name.to_string(),
            points: vec![Vec3::ZERO],
            color: Vec3::ONE,
            radius: 0.05,
        })
    }

    #[test]
    fn insert_assigns_distinct_ids() {
        let mut scene = Scene::new();
        let a = scene.insert(camera("a"));
        let b = scene.insert(points("b"));
        assert_ne!(a, b);
        assert_eq!(scene.children_len(), 2);
        assert!(scene.is_camera(a));
        assert!(!scene.is_camera(b));
    }

    #[test]
    fn subscription_fires_on_camera_only() {
        let mut scene = Scene::new();
        let now = Instant::now();
        let sub = scene.subscribe_next_camera(now + Duration::from_secs(5));

        scene.insert(points("geometry"));
        assert_eq!(scene.poll_subscription(sub, now), SubscriptionPoll::Pending);

        let cam = scene.insert(camera("cam"));
        assert_eq!(
            scene.poll_subscription(sub, now),
            SubscriptionPoll::Fired(cam)
        );
        // Consumed: a second poll reports expired.
        assert_eq!(scene.poll_subscription(sub, now), SubscriptionPoll::Expired);
    }

    #[test]
    fn subscription_expires_at_deadline() {
        let mut scene = Scene::new();
        let now = Instant::now();
        let sub = scene.subscribe_next_camera(now + Duration::from_millis(100));
        assert_eq!(scene.poll_subscription(sub, now), SubscriptionPoll::Pending);
        assert_eq!(
            scene.poll_subscription(sub, now + Duration::from_millis(100)),
            SubscriptionPoll::Expired
        );
        assert_eq!(scene.subscription_count(), 0);
    }

    #[test]
    fn fired_subscription_survives_past_deadline() {
        // A camera inserted inside the window is still delivered even if the
        // poll happens after the deadline passed.
        let mut scene = Scene::new();
        let now = Instant::now();
        let sub = scene.subscribe_next_camera(now + Duration::from_millis(100));
        let cam = scene.insert(camera("late poll"));
        assert_eq!(
            scene.poll_subscription(sub, now + Duration::from_secs(10)),
            SubscriptionPoll::Fired(cam)
        );
    }

    #[test]
    fn child_ids_from_diffs_growth() {
        let mut scene = Scene::new();
        scene.insert(points("a"));
        let prev = scene.children_len();
        let cam = scene.insert(camera("b"));
        let new_ids = scene.child_ids_from(prev);
        assert_eq!(new_ids, vec![cam]);
    }
}
