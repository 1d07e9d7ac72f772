//! Touch overlay attached to an instrumented surface
//!
//! Wires the pipeline: raw touch events go to the contact tracker, the
//! tracked contacts pass through the visualization gate, and the survivors
//! are laid out as indicators. The enable flag is either set by the caller
//! (manual mode) or derived from capture status (automatic mode).

pub mod config;
pub mod error;
pub mod surface;

pub use config::{Compatibility, Environment, OverlayConfig};
pub use error::{OverlayError, OverlayResult};
pub use surface::{AffineSurface, CoordinateSpace};

use crate::capture::input::tracker::{Contact, ContactTracker, TrackerSignal};
use crate::capture::input::types::TouchEvent;
use crate::capture::policy::{AutoEnablePolicy, PolicyMode};
use crate::capture::status::CaptureStatusSource;
use crate::processing::gate::VisualizationGate;
use crate::processing::indicator::Frame;
use std::rc::Rc;

/// Source of the enable flag
#[derive(Debug)]
pub enum EnableMode {
    Manual(bool),
    Automatic(AutoEnablePolicy),
}

impl EnableMode {
    pub fn is_enabled(&self) -> bool {
        match self {
            EnableMode::Manual(enabled) => *enabled,
            EnableMode::Automatic(policy) => policy.is_enabled(),
        }
    }
}

/// Tracking and indicator rendering for one surface.
///
/// All methods run on the thread that delivers the surface's input events.
#[derive(Debug)]
pub struct TouchOverlay<S> {
    surface: S,
    config: OverlayConfig,
    tracker: ContactTracker,
    gate: VisualizationGate,
    enable: EnableMode,
    attached: bool,
}

impl<S> TouchOverlay<S> {
    /// Attach with a caller-controlled enable flag.
    pub fn attach(surface: S, enabled: bool, config: OverlayConfig) -> Self {
        tracing::info!(
            "touch overlay attached (manual, enabled={}, compatibility={:?})",
            enabled,
            config.compatibility
        );
        Self::with_mode(surface, EnableMode::Manual(enabled), config)
    }

    /// Attach with the flag following capture status.
    ///
    /// In a simulator environment indicators are always shown.
    pub fn attach_auto(surface: S, source: Rc<dyn CaptureStatusSource>, config: OverlayConfig) -> Self {
        let mode = match config.environment {
            Environment::Simulator => PolicyMode::Simulated,
            Environment::Device => PolicyMode::Observed,
        };
        let mut policy = AutoEnablePolicy::new(mode, source);
        policy.surface_appeared();

        tracing::info!(
            "touch overlay attached (automatic, mode={:?}, enabled={}, compatibility={:?})",
            mode,
            policy.is_enabled(),
            config.compatibility
        );
        Self::with_mode(surface, EnableMode::Automatic(policy), config)
    }

    fn with_mode(surface: S, enable: EnableMode, config: OverlayConfig) -> Self {
        let visible = enable.is_enabled();
        Self {
            surface,
            config,
            tracker: ContactTracker::new(),
            gate: VisualizationGate::new(visible),
            enable,
            attached: true,
        }
    }

    pub fn is_automatic(&self) -> bool {
        matches!(self.enable, EnableMode::Automatic(_))
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn is_enabled(&self) -> bool {
        self.enable.is_enabled()
    }

    /// Change the manual enable flag. Returns false in automatic mode, where
    /// the flag belongs to the policy.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        match &mut self.enable {
            EnableMode::Manual(current) => {
                *current = enabled;
                true
            }
            EnableMode::Automatic(_) => {
                tracing::debug!("ignoring manual enable flag in automatic mode");
                false
            }
        }
    }

    /// The surface (re)entered the rendering tree.
    pub fn appear(&mut self) {
        self.attached = true;
        if let EnableMode::Automatic(policy) = &mut self.enable {
            policy.surface_appeared();
        }
    }

    /// The surface left the rendering tree. Capture observation stops and
    /// nothing is rendered until [`Self::appear`].
    pub fn detach(&mut self) {
        if !self.attached {
            return;
        }
        self.attached = false;
        if let EnableMode::Automatic(policy) = &mut self.enable {
            policy.surface_disappeared();
        }
        tracing::info!("touch overlay detached");
    }

    pub fn active_set(&self) -> &[Contact] {
        self.tracker.active_set()
    }

    pub fn tracker(&self) -> &ContactTracker {
        &self.tracker
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access for hosts that move or rescale the surface.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}

impl<S: CoordinateSpace> TouchOverlay<S> {
    /// Feed one raw touch event. Tracking runs whether or not indicators are
    /// enabled; the event is observed, never consumed.
    pub fn handle_event(&mut self, event: &TouchEvent) -> TrackerSignal {
        let signal = self.tracker.handle(event, &self.surface);
        tracing::debug!(
            "{} x{} -> {} ({} active)",
            event.phase,
            event.touches.len(),
            signal,
            self.tracker.active_set().len()
        );
        signal
    }

    /// Recompute what should be drawn right now.
    pub fn frame(&mut self) -> Frame {
        self.gate.set_visible(self.attached && self.enable.is_enabled());

        let active = self.tracker.active_set();
        let mut visible = self.gate.filter(active);

        if self.config.compatibility == Compatibility::Shim
            && self.tracker.unresolved_count() > 0
            && !visible.is_empty()
        {
            tracing::debug!(
                "{} contact(s) could not be placed, rendering nothing",
                self.tracker.unresolved_count()
            );
            visible.clear();
        }

        Frame::layout(
            self.tracker.last_signal(),
            self.gate.is_visible(),
            active.len(),
            &visible,
            &self.config.indicator,
        )
    }
}

impl<S> Drop for TouchOverlay<S> {
    fn drop(&mut self) {
        self.detach();
    }
}
