//! Recorded touch traces
//!
//! A trace is a JSON log of everything that reaches an instrumented surface:
//! touch events, capture-status notifications and lifecycle changes.

use crate::capture::input::types::{RawTouch, TouchEvent, TouchPhase};
use crate::capture::status::CaptureNotification;
use crate::overlay::error::{OverlayError, OverlayResult};
use crate::overlay::surface::AffineSurface;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Latest timestamp a trace may carry: one week.
pub const MAX_TRACE_TIME_MS: f64 = 7.0 * 24.0 * 60.0 * 60.0 * 1000.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchTrace {
    /// Placement of the instrumented surface in global space.
    #[serde(default)]
    pub surface: AffineSurface,
    pub entries: Vec<TraceEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum TraceEntry {
    #[serde(rename_all = "camelCase")]
    Touch {
        time_ms: f64,
        phase: TouchPhase,
        touches: Vec<RawTouch>,
    },
    #[serde(rename_all = "camelCase")]
    Capture {
        time_ms: f64,
        display_id: u32,
        captured: bool,
    },
    #[serde(rename_all = "camelCase")]
    Unrecognized { time_ms: f64, payload: String },
    /// Manual enable flag change. Ignored in automatic mode.
    #[serde(rename_all = "camelCase")]
    Visibility { time_ms: f64, enabled: bool },
    #[serde(rename_all = "camelCase")]
    Appear { time_ms: f64 },
    #[serde(rename_all = "camelCase")]
    Disappear { time_ms: f64 },
}

impl TraceEntry {
    pub fn time_ms(&self) -> f64 {
        match self {
            TraceEntry::Touch { time_ms, .. }
            | TraceEntry::Capture { time_ms, .. }
            | TraceEntry::Unrecognized { time_ms, .. }
            | TraceEntry::Visibility { time_ms, .. }
            | TraceEntry::Appear { time_ms }
            | TraceEntry::Disappear { time_ms } => *time_ms,
        }
    }

    pub fn touch_event(&self) -> Option<TouchEvent> {
        match self {
            TraceEntry::Touch { phase, touches, .. } => Some(TouchEvent::new(*phase, touches.clone())),
            _ => None,
        }
    }

    pub fn capture_notification(&self) -> Option<CaptureNotification> {
        match self {
            TraceEntry::Capture {
                display_id,
                captured,
                ..
            } => Some(CaptureNotification::Display {
                display_id: *display_id,
                captured: *captured,
            }),
            TraceEntry::Unrecognized { payload, .. } => Some(CaptureNotification::Unrecognized {
                payload: payload.clone(),
            }),
            _ => None,
        }
    }
}

impl TouchTrace {
    pub fn from_json_str(json: &str) -> OverlayResult<Self> {
        let trace: TouchTrace = serde_json::from_str(json)?;
        trace.validate()?;
        Ok(trace)
    }

    pub fn load(path: &Path) -> OverlayResult<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn save(&self, path: &Path) -> OverlayResult<()> {
        let data = serde_json::to_vec_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }

    /// Timestamps must be finite, within `MAX_TRACE_TIME_MS` and non-decreasing.
    pub fn validate(&self) -> OverlayResult<()> {
        let mut previous = 0.0f64;
        for (index, entry) in self.entries.iter().enumerate() {
            let time_ms = entry.time_ms();
            if !(0.0..=MAX_TRACE_TIME_MS).contains(&time_ms) {
                return Err(OverlayError::Trace(format!(
                    "entry {} has invalid timestamp {}",
                    index, time_ms
                )));
            }
            if time_ms < previous {
                return Err(OverlayError::Trace(format!(
                    "entry {} at {}ms is earlier than the previous entry at {}ms",
                    index, time_ms, previous
                )));
            }
            previous = time_ms;
        }
        Ok(())
    }

    pub fn duration_ms(&self) -> f64 {
        self.entries.last().map(|e| e.time_ms()).unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "surface": { "offsetX": 10.0, "offsetY": 20.0, "scale": 1.0 },
        "entries": [
            { "kind": "appear", "timeMs": 0 },
            { "kind": "touch", "timeMs": 5, "phase": "began", "touches": [{ "id": 4, "x": 30.0, "y": 40.0 }] },
            { "kind": "capture", "timeMs": 6, "displayId": 1, "captured": true },
            { "kind": "unrecognized", "timeMs": 7, "payload": "keyboardDidShow" },
            { "kind": "touch", "timeMs": 9, "phase": "ended", "touches": [{ "id": 4, "x": 30.0, "y": 40.0 }] }
        ]
    }"#;

    #[test]
    fn test_parse_sample_trace() {
        let trace = TouchTrace::from_json_str(SAMPLE).unwrap();
        assert_eq!(trace.surface, AffineSurface::new(10.0, 20.0, 1.0));
        assert_eq!(trace.entries.len(), 5);
        assert_eq!(trace.duration_ms(), 9.0);

        let event = trace.entries[1].touch_event().unwrap();
        assert_eq!(event, TouchEvent::began(vec![RawTouch::new(4, 30.0, 40.0)]));

        assert_eq!(
            trace.entries[2].capture_notification(),
            Some(CaptureNotification::Display {
                display_id: 1,
                captured: true
            })
        );
        assert!(trace.entries[0].capture_notification().is_none());
    }

    #[test]
    fn test_surface_defaults_to_identity() {
        let trace = TouchTrace::from_json_str(r#"{ "entries": [] }"#).unwrap();
        assert_eq!(trace.surface, AffineSurface::identity());
    }

    #[test]
    fn test_out_of_order_timestamps_are_rejected() {
        let json = r#"{ "entries": [
            { "kind": "appear", "timeMs": 10 },
            { "kind": "disappear", "timeMs": 5 }
        ] }"#;
        let err = TouchTrace::from_json_str(json).unwrap_err();
        assert!(matches!(err, OverlayError::Trace(_)));
    }

    #[test]
    fn test_out_of_range_timestamps_are_rejected() {
        for time_ms in ["1e300", "-1", "604800001"] {
            let json = format!(r#"{{ "entries": [{{ "kind": "appear", "timeMs": {} }}] }}"#, time_ms);
            let err = TouchTrace::from_json_str(&json).unwrap_err();
            assert!(matches!(err, OverlayError::Trace(_)), "{} accepted", time_ms);
        }

        let json = r#"{ "entries": [{ "kind": "appear", "timeMs": 604800000 }] }"#;
        assert!(TouchTrace::from_json_str(json).is_ok());
    }

    #[test]
    fn test_unknown_kind_is_a_json_error() {
        let json = r#"{ "entries": [{ "kind": "pressure", "timeMs": 1 }] }"#;
        let err = TouchTrace::from_json_str(json).unwrap_err();
        assert!(matches!(err, OverlayError::Json(_)));
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("trace.json");
        let trace = TouchTrace::from_json_str(SAMPLE).unwrap();

        trace.save(&path).unwrap();
        assert_eq!(TouchTrace::load(&path).unwrap(), trace);
    }
}
