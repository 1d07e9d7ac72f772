//! Touch input capture
//!
//! Raw multi-touch lifecycle events, the per-surface contact tracker that
//! folds them into the set of fingers currently down, and the recorded trace
//! format used to replay them.

pub mod trace;
pub mod tracker;
pub mod types;

pub use trace::{TouchTrace, TraceEntry};
pub use tracker::{Contact, ContactId, ContactTracker, TrackerSignal};
pub use types::{Point, RawTouch, TouchEvent, TouchId, TouchPhase};
