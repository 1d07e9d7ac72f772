//! Touch Overlay - show where fingers touch the screen.
//!
//! Screen recordings and mirrored displays only show pixels, not the touches
//! that produced them. This crate tracks every contact on an instrumented
//! surface and tells a rendering layer where to draw a marker under each
//! finger, either always, on request, or automatically while the surface is
//! being captured.

pub mod capture;
pub mod commands;
pub mod overlay;
pub mod processing;

pub use capture::{
    AutoEnablePolicy, CaptureNotification, CaptureStatusHub, CaptureStatusSource, Contact, ContactId,
    ContactTracker, PolicyMode, Subscription, TrackerSignal,
};
pub use capture::input::{Point, RawTouch, TouchEvent, TouchId, TouchPhase, TouchTrace, TraceEntry};
pub use overlay::{
    AffineSurface, Compatibility, CoordinateSpace, EnableMode, Environment, OverlayConfig, OverlayError,
    OverlayResult, TouchOverlay,
};
pub use processing::{render_set, Frame, Indicator, IndicatorStyle, VisualizationGate};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the default log subscriber for binaries built on this crate.
///
/// Honors `RUST_LOG`; otherwise logs this crate at debug level.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "touch_overlay=debug,touch_replay=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
