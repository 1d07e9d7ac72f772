//! Contact tracking
//!
//! Turns the serial stream of raw begin/move/end/cancel events for one surface
//! into the set of contacts currently down, keyed by a small per-contact id.

use crate::capture::input::types::{Point, RawTouch, TouchEvent, TouchId, TouchPhase};
use crate::overlay::surface::CoordinateSpace;
use serde::{Deserialize, Serialize};

/// Identity of an active contact.
///
/// The smallest number not held by another active contact at the time the
/// touch began. Released when the contact lifts, so it is only unique among
/// contacts that are down together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub u32);

impl std::fmt::Display for ContactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "id{}", self.0)
    }
}

/// One finger currently on the surface, in surface-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub id: ContactId,
    pub position: Point,
}

impl Contact {
    pub fn new(id: u32, x: f64, y: f64) -> Self {
        Self {
            id: ContactId(id),
            position: Point::new(x, y),
        }
    }
}

/// What the tracker reports after processing an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrackerSignal {
    /// The event carried no touches; nothing changed.
    Idle,
    /// At least one contact may be down; the active set was recomputed.
    Active,
    /// The last contact lifted.
    Ended,
    /// The host cancelled the last contact.
    Cancelled,
}

impl TrackerSignal {
    /// True for `Ended` and `Cancelled`, which both leave the active set empty.
    pub fn is_terminal(self) -> bool {
        matches!(self, TrackerSignal::Ended | TrackerSignal::Cancelled)
    }
}

impl std::fmt::Display for TrackerSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrackerSignal::Idle => write!(f, "idle"),
            TrackerSignal::Active => write!(f, "active"),
            TrackerSignal::Ended => write!(f, "ended"),
            TrackerSignal::Cancelled => write!(f, "cancelled"),
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    touch: TouchId,
    id: ContactId,
    global: Point,
    local: Option<Point>,
}

/// Per-surface contact state machine.
///
/// The live counter mirrors the host's begin/end balance, but is kept between
/// the number of tracked contacts and the raw balance. An unbalanced end can't
/// push it below the contacts still down, and releasing the last tracked
/// contact always ends the gesture even after a duplicate begin.
#[derive(Debug, Clone)]
pub struct ContactTracker {
    live: usize,
    // Ordered by contact id.
    slots: Vec<Slot>,
    active: Vec<Contact>,
    unresolved: usize,
    last_signal: TrackerSignal,
}

impl Default for ContactTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl ContactTracker {
    pub fn new() -> Self {
        Self {
            live: 0,
            slots: Vec::new(),
            active: Vec::new(),
            unresolved: 0,
            last_signal: TrackerSignal::Idle,
        }
    }

    /// Dispatch an event to the handler for its phase.
    pub fn handle(&mut self, event: &TouchEvent, space: &impl CoordinateSpace) -> TrackerSignal {
        match event.phase {
            TouchPhase::Began => self.on_begin(&event.touches, space),
            TouchPhase::Moved => self.on_move(&event.touches, space),
            TouchPhase::Ended => self.on_end(&event.touches, space),
            TouchPhase::Cancelled => self.on_cancel(&event.touches, space),
        }
    }

    pub fn on_begin(&mut self, touches: &[RawTouch], space: &impl CoordinateSpace) -> TrackerSignal {
        if touches.is_empty() {
            return TrackerSignal::Idle;
        }

        self.live = self.live.saturating_add(touches.len());

        for touch in touches {
            if let Some(slot) = self.slots.iter_mut().find(|s| s.touch == touch.id) {
                // Host reported the same touch beginning twice
                slot.global = touch.location;
                continue;
            }

            let id = self.next_free_id();
            let index = self.slots.partition_point(|s| s.id < id);
            self.slots.insert(
                index,
                Slot {
                    touch: touch.id,
                    id,
                    global: touch.location,
                    local: None,
                },
            );
            tracing::trace!("contact {} began for touch {:?}", id, touch.id);
        }

        self.signal_active(space)
    }

    /// Refresh positions. Never changes membership.
    pub fn on_move(&mut self, touches: &[RawTouch], space: &impl CoordinateSpace) -> TrackerSignal {
        if touches.is_empty() {
            return TrackerSignal::Idle;
        }

        for touch in touches {
            match self.slots.iter_mut().find(|s| s.touch == touch.id) {
                Some(slot) => slot.global = touch.location,
                None => tracing::trace!("move for untracked touch {:?}", touch.id),
            }
        }

        self.signal_active(space)
    }

    pub fn on_end(&mut self, touches: &[RawTouch], space: &impl CoordinateSpace) -> TrackerSignal {
        self.release(touches, space, TrackerSignal::Ended)
    }

    /// Same bookkeeping as [`Self::on_end`]; only the terminal signal differs.
    pub fn on_cancel(&mut self, touches: &[RawTouch], space: &impl CoordinateSpace) -> TrackerSignal {
        self.release(touches, space, TrackerSignal::Cancelled)
    }

    /// Contacts currently down with a known local position, ordered by id.
    pub fn active_set(&self) -> &[Contact] {
        &self.active
    }

    pub fn is_active(&self) -> bool {
        self.live > 0
    }

    pub fn live_count(&self) -> usize {
        self.live
    }

    pub fn last_signal(&self) -> TrackerSignal {
        self.last_signal
    }

    /// Contacts whose position could not be converted on the last recomputation.
    pub fn unresolved_count(&self) -> usize {
        self.unresolved
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    fn release(
        &mut self,
        touches: &[RawTouch],
        space: &impl CoordinateSpace,
        terminal: TrackerSignal,
    ) -> TrackerSignal {
        if touches.is_empty() {
            return TrackerSignal::Idle;
        }

        if touches.len() > self.live {
            tracing::debug!(
                "unbalanced {} of {} touches with {} live, clamping at zero",
                terminal,
                touches.len(),
                self.live
            );
        }
        for touch in touches {
            if !self.slots.iter().any(|s| s.touch == touch.id) {
                tracing::debug!("{} for untracked touch {:?}", terminal, touch.id);
            }
            self.slots.retain(|s| s.touch != touch.id);
        }

        self.live = self.live.saturating_sub(touches.len()).max(self.slots.len());
        if self.slots.is_empty() {
            self.live = 0;
        }

        if self.live == 0 {
            self.slots.clear();
            self.active.clear();
            self.unresolved = 0;
            self.last_signal = terminal;
            tracing::debug!("all contacts cleared ({})", terminal);
            return terminal;
        }

        self.signal_active(space)
    }

    fn signal_active(&mut self, space: &impl CoordinateSpace) -> TrackerSignal {
        self.recompute(space);
        self.last_signal = TrackerSignal::Active;
        TrackerSignal::Active
    }

    /// A contact that has never been converted stays out of the active set
    /// until its first successful conversion.
    fn recompute(&mut self, space: &impl CoordinateSpace) {
        self.active.clear();
        self.unresolved = 0;

        for slot in self.slots.iter_mut() {
            match space.to_local(slot.global) {
                Some(local) => slot.local = Some(local),
                None => self.unresolved += 1,
            }
            if let Some(position) = slot.local {
                self.active.push(Contact { id: slot.id, position });
            }
        }
    }

    fn next_free_id(&self) -> ContactId {
        let mut candidate = 0u32;
        for slot in &self.slots {
            if slot.id.0 != candidate {
                break;
            }
            candidate += 1;
        }
        ContactId(candidate)
    }
}
