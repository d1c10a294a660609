//! Camera detection watcher.
//!
//! A trigger opens a bounded detection window during which two mechanisms run
//! side by side:
//!
//! - a one-shot subscription on the scene's next camera insertion, and
//! - periodic polling of the child count, testing newly-appended children for
//!   camera type (catches cameras added through paths that bypass insertion
//!   notification).
//!
//! The window closes silently when the deadline passes. Detected cameras are
//! returned to the caller for attachment; projector filtering happens there.

use std::time::Instant;

use camview_core::{with_context_mut, ObjectId, SubscriptionId, SubscriptionPoll};

struct WatchWindow {
    deadline: Instant,
    subscription: Option<SubscriptionId>,
    last_child_count: usize,
    next_poll: Instant,
}

/// Watches the scene for newly inserted cameras after a trigger.
#[derive(Default)]
pub struct CameraWatcher {
    window: Option<WatchWindow>,
}

impl CameraWatcher {
    /// Creates an idle watcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if a detection window is currently open.
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.window.is_some()
    }

    /// Opens a detection window starting at `now`.
    ///
    /// A trigger while a window is already open restarts it: the old
    /// subscription is abandoned (it expires on its own) and a fresh one is
    /// registered with a fresh deadline.
    pub fn trigger(&mut self, now: Instant) {
        let (deadline, subscription, child_count, poll_interval) = with_context_mut(|ctx| {
            let deadline = now + ctx.options.detection_window();
            let subscription = ctx.scene.subscribe_next_camera(deadline);
            (
                deadline,
                subscription,
                ctx.scene.children_len(),
                ctx.options.poll_interval(),
            )
        });

        log::debug!("camera detection armed for {:?}", deadline - now);
        self.window = Some(WatchWindow {
            deadline,
            subscription: Some(subscription),
            last_child_count: child_count,
            next_poll: now + poll_interval,
        });
    }

    /// Advances the watcher, returning cameras detected since the last tick.
    ///
    /// Both mechanisms can report the same camera in one tick; duplicates are
    /// removed before returning.
    pub fn tick(&mut self, now: Instant) -> Vec<ObjectId> {
        let Some(window) = &mut self.window else {
            return Vec::new();
        };

        let mut detected: Vec<ObjectId> = Vec::new();

        if let Some(sub) = window.subscription {
            let poll = with_context_mut(|ctx| ctx.scene.poll_subscription(sub, now));
            match poll {
                SubscriptionPoll::Fired(id) => {
                    detected.push(id);
                    window.subscription = None;
                }
                SubscriptionPoll::Expired => {
                    window.subscription = None;
                }
                SubscriptionPoll::Pending => {}
            }
        }

        if now >= window.next_poll {
            let (new_cameras, child_count, poll_interval) = with_context_mut(|ctx| {
                let ids = ctx.scene.child_ids_from(window.last_child_count);
                let cameras: Vec<ObjectId> = ids
                    .into_iter()
                    .filter(|id| ctx.scene.is_camera(*id))
                    .collect();
                (cameras, ctx.scene.children_len(), ctx.options.poll_interval())
            });
            window.last_child_count = child_count;
            window.next_poll = now + poll_interval;
            detected.extend(new_cameras);
        }

        if now >= window.deadline {
            log::debug!("camera detection window expired");
            self.window = None;
        }

        detected.sort_unstable();
        detected.dedup();
        detected
    }

    /// Closes any open detection window.
    pub fn disarm(&mut self) {
        self.window = None;
    }
}
