//! Visualization gate
//!
//! Applies the enable flag as a hard filter over the tracked contacts. The
//! gate never sees touch events, so turning it off cannot disturb tracking and
//! turning it back on mid-gesture shows the in-progress contacts immediately.

use crate::capture::input::tracker::Contact;

/// Contacts to draw: all of `active` when enabled, none otherwise.
pub fn render_set(active: &[Contact], enabled: bool) -> Vec<Contact> {
    if enabled {
        active.to_vec()
    } else {
        Vec::new()
    }
}

/// Owner of the "indicators should render" state.
#[derive(Debug, Clone, Default)]
pub struct VisualizationGate {
    visible: bool,
}

impl VisualizationGate {
    pub fn new(visible: bool) -> Self {
        Self { visible }
    }

    /// Returns true if the state changed.
    pub fn set_visible(&mut self, visible: bool) -> bool {
        let changed = self.visible != visible;
        if changed {
            tracing::debug!("indicator visibility {}", if visible { "on" } else { "off" });
        }
        self.visible = visible;
        changed
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn filter(&self, active: &[Contact]) -> Vec<Contact> {
        render_set(active, self.visible)
    }
}
