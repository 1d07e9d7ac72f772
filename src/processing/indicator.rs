//! Indicator layout
//!
//! One circular, fixed-size marker per visible contact, centered on the
//! contact. Markers are decoration only: they never take part in hit-testing
//! and are hidden from accessibility.

use crate::capture::input::tracker::{Contact, ContactId, TrackerSignal};
use crate::capture::input::types::Point;
use serde::{Deserialize, Serialize};

/// Default marker diameter in surface points
pub const DEFAULT_INDICATOR_DIAMETER: f64 = 40.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IndicatorStyle {
    pub diameter: f64,
}

impl Default for IndicatorStyle {
    fn default() -> Self {
        Self {
            diameter: DEFAULT_INDICATOR_DIAMETER,
        }
    }
}

/// Axis-aligned rectangle in surface-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Indicator {
    pub contact: ContactId,
    pub center: Point,
    pub diameter: f64,
}

impl Indicator {
    pub fn for_contact(contact: &Contact, style: &IndicatorStyle) -> Self {
        Self {
            contact: contact.id,
            center: contact.position,
            diameter: style.diameter,
        }
    }

    pub fn bounds(&self) -> Rect {
        let radius = self.diameter / 2.0;
        Rect {
            x: self.center.x - radius,
            y: self.center.y - radius,
            width: self.diameter,
            height: self.diameter,
        }
    }

    /// Always false, so the marker can never become a touch target.
    pub fn hit_testable(&self) -> bool {
        false
    }

    /// Always false; markers are not part of the accessibility tree.
    pub fn accessibility_element(&self) -> bool {
        false
    }
}

/// Everything the renderer needs after one update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Frame {
    pub signal: TrackerSignal,
    pub visible: bool,
    pub active_count: usize,
    pub indicators: Vec<Indicator>,
}

impl Frame {
    pub fn layout(
        signal: TrackerSignal,
        visible: bool,
        active_count: usize,
        contacts: &[Contact],
        style: &IndicatorStyle,
    ) -> Self {
        Self {
            signal,
            visible,
            active_count,
            indicators: contacts
                .iter()
                .map(|c| Indicator::for_contact(c, style))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indicator_is_centered_on_contact() {
        let indicator = Indicator::for_contact(&Contact::new(2, 100.0, 50.0), &IndicatorStyle::default());
        assert_eq!(indicator.contact, ContactId(2));
        assert_eq!(
            indicator.bounds(),
            Rect {
                x: 80.0,
                y: 30.0,
                width: 40.0,
                height: 40.0
            }
        );
        assert!(!indicator.hit_testable());
        assert!(!indicator.accessibility_element());
    }

    #[test]
    fn test_layout_uses_style() {
        let style = IndicatorStyle { diameter: 24.0 };
        let frame = Frame::layout(
            TrackerSignal::Active,
            true,
            2,
            &[Contact::new(0, 1.0, 1.0), Contact::new(1, 2.0, 2.0)],
            &style,
        );
        assert_eq!(frame.indicators.len(), 2);
        assert!(frame.indicators.iter().all(|i| i.diameter == 24.0));
    }
}
