//! In-process capture-status source
//!
//! The host (or a trace replay) posts notifications here from the UI thread
//! and every live subscriber is called in registration order.

use crate::capture::status::{CaptureNotification, CaptureStatusSource, StatusCallback, Subscription};
use std::cell::RefCell;
use std::collections::{HashSet, VecDeque};
use std::rc::{Rc, Weak};

#[derive(Default)]
struct HubInner {
    captured: bool,
    next_id: u64,
    subscribers: Vec<(u64, StatusCallback)>,
    dispatching: bool,
    cancelled_during_dispatch: HashSet<u64>,
    // Posts made from inside a callback, delivered once the current round ends.
    pending: VecDeque<CaptureNotification>,
}

impl HubInner {
    fn unsubscribe(&mut self, id: u64) {
        if self.dispatching {
            self.cancelled_during_dispatch.insert(id);
        }
        self.subscribers.retain(|(sid, _)| *sid != id);
    }
}

/// Single-threaded capture-status broadcaster. Clones share state.
#[derive(Clone, Default)]
pub struct CaptureStatusHub {
    inner: Rc<RefCell<HubInner>>,
}

impl CaptureStatusHub {
    pub fn new(captured: bool) -> Self {
        let hub = Self::default();
        hub.inner.borrow_mut().captured = captured;
        hub
    }

    /// Record a display's new capture state and notify subscribers.
    pub fn set_captured(&self, display_id: u32, captured: bool) {
        self.post(CaptureNotification::Display {
            display_id,
            captured,
        });
    }

    /// Deliver a notification to all subscribers.
    ///
    /// Display payloads also update the value returned by `current_status`.
    /// A post made from inside a callback is queued and delivered to every
    /// subscriber still registered after the current round finishes.
    pub fn post(&self, notification: CaptureNotification) {
        {
            let mut inner = self.inner.borrow_mut();
            if let Some(captured) = notification.captured() {
                inner.captured = captured;
            }
            if inner.dispatching {
                tracing::trace!("queueing nested post {:?}", notification);
                inner.pending.push_back(notification);
                return;
            }
            inner.dispatching = true;
        }

        let mut next = Some(notification);
        while let Some(notification) = next {
            self.dispatch(&notification);
            next = self.inner.borrow_mut().pending.pop_front();
        }

        self.inner.borrow_mut().dispatching = false;
    }

    fn dispatch(&self, notification: &CaptureNotification) {
        let mut subscribers = std::mem::take(&mut self.inner.borrow_mut().subscribers);

        tracing::trace!(
            "posting {:?} to {} subscriber(s)",
            notification,
            subscribers.len()
        );

        // Callbacks run without the hub borrowed so they may subscribe or cancel.
        for (id, callback) in subscribers.iter_mut() {
            let id = *id;
            if self.inner.borrow().cancelled_during_dispatch.contains(&id) {
                continue;
            }
            callback(notification);
        }

        let mut inner = self.inner.borrow_mut();
        let cancelled = std::mem::take(&mut inner.cancelled_during_dispatch);
        subscribers.retain(|(id, _)| !cancelled.contains(id));
        subscribers.append(&mut inner.subscribers);
        inner.subscribers = subscribers;
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().subscribers.len()
    }
}

impl CaptureStatusSource for CaptureStatusHub {
    fn current_status(&self) -> bool {
        self.inner.borrow().captured
    }

    fn subscribe(&self, on_change: StatusCallback) -> Subscription {
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push((id, on_change));
            id
        };

        let weak: Weak<RefCell<HubInner>> = Rc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = weak.upgrade() {
                inner.borrow_mut().unsubscribe(id);
            }
        })
    }
}

impl std::fmt::Debug for CaptureStatusHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("CaptureStatusHub")
            .field("captured", &inner.captured)
            .field("subscribers", &inner.subscribers.len())
            .finish()
    }
}
