//! Capture-side inputs
//!
//! Touch tracking on the instrumented surface, plus the capture/mirroring
//! status that decides whether indicators are shown automatically.

pub mod hub;
pub mod input;
pub mod policy;
pub mod status;

pub use hub::CaptureStatusHub;
pub use input::{Contact, ContactId, ContactTracker, TrackerSignal};
pub use policy::{AutoEnablePolicy, PolicyMode};
pub use status::{CaptureNotification, CaptureStatusSource, StatusCallback, Subscription};
