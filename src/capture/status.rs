//! Capture-status source contract
//!
//! Whether the surface's output is currently recorded or mirrored comes from
//! the host. It is read once synchronously and then pushed on change.

use serde::{Deserialize, Serialize};

/// Payload delivered with a capture-status change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "source")]
pub enum CaptureNotification {
    /// A display's capture state changed.
    #[serde(rename_all = "camelCase")]
    Display { display_id: u32, captured: bool },
    /// The notification did not come from a recognizable capture source.
    Unrecognized { payload: String },
}

impl CaptureNotification {
    /// The new capture state, if the payload identifies a capture source.
    pub fn captured(&self) -> Option<bool> {
        match self {
            CaptureNotification::Display { captured, .. } => Some(*captured),
            CaptureNotification::Unrecognized { .. } => None,
        }
    }
}

/// Callback invoked with each status-change notification.
pub type StatusCallback = Box<dyn FnMut(&CaptureNotification)>;

/// Host-provided capture/mirroring status.
pub trait CaptureStatusSource {
    /// Current capture state, queried synchronously.
    fn current_status(&self) -> bool;

    /// Register for change notifications until the returned handle is dropped.
    fn subscribe(&self, on_change: StatusCallback) -> Subscription;
}

/// Live registration with a [`CaptureStatusSource`].
///
/// Released exactly once: on [`Subscription::cancel`] or when dropped,
/// whichever happens first.
#[must_use = "dropping a subscription cancels it"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// A subscription with nothing to release.
    pub fn empty() -> Self {
        Self { release: None }
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    pub fn cancel(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
