//! Auto-enable policy
//!
//! Derives the "show indicators" flag from whether the surface is being
//! recorded or mirrored, so callers don't have to track capture state.

use crate::capture::status::{CaptureNotification, CaptureStatusSource, Subscription};
use std::cell::Cell;
use std::rc::{Rc, Weak};

/// How the policy derives its flag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyMode {
    /// Always enabled, never subscribes. For simulators, where capture state
    /// says nothing about what an end user would see.
    Simulated,
    /// Follows the capture-status source while the surface is on screen.
    Observed,
}

/// Owner of the capture status used as the visualization enable flag.
pub struct AutoEnablePolicy {
    mode: PolicyMode,
    source: Rc<dyn CaptureStatusSource>,
    captured: Rc<Cell<bool>>,
    subscription: Option<Subscription>,
}

impl AutoEnablePolicy {
    pub fn new(mode: PolicyMode, source: Rc<dyn CaptureStatusSource>) -> Self {
        Self {
            mode,
            source,
            captured: Rc::new(Cell::new(mode == PolicyMode::Simulated)),
            subscription: None,
        }
    }

    pub fn mode(&self) -> PolicyMode {
        self.mode
    }

    pub fn is_enabled(&self) -> bool {
        match self.mode {
            PolicyMode::Simulated => true,
            PolicyMode::Observed => self.captured.get(),
        }
    }

    pub fn is_observing(&self) -> bool {
        self.subscription.is_some()
    }

    /// Read the current status and start following changes.
    ///
    /// Calling again while observing replaces the subscription.
    pub fn surface_appeared(&mut self) {
        if self.mode == PolicyMode::Simulated {
            return;
        }

        // Release first so there is never more than one live registration.
        drop(self.subscription.take());

        self.captured.set(self.source.current_status());

        let flag: Weak<Cell<bool>> = Rc::downgrade(&self.captured);
        let subscription = self.source.subscribe(Box::new(move |notification: &CaptureNotification| {
            let Some(flag) = flag.upgrade() else {
                return;
            };
            match notification.captured() {
                Some(captured) => {
                    tracing::debug!("capture status changed: captured={}", captured);
                    flag.set(captured);
                }
                None => tracing::debug!("ignoring unrecognized capture notification: {:?}", notification),
            }
        }));
        self.subscription = Some(subscription);

        tracing::info!(
            "capture observation started (captured={})",
            self.captured.get()
        );
    }

    /// Stop following changes. The flag keeps its last value.
    pub fn surface_disappeared(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
            tracing::info!(
                "capture observation stopped (captured={})",
                self.captured.get()
            );
        }
    }
}

impl std::fmt::Debug for AutoEnablePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AutoEnablePolicy")
            .field("mode", &self.mode)
            .field("enabled", &self.is_enabled())
            .field("observing", &self.is_observing())
            .finish()
    }
}
