//! Trace replay
//!
//! Drives a recorded trace through a freshly attached overlay and records
//! what would have been drawn after every entry.

use crate::capture::hub::CaptureStatusHub;
use crate::capture::input::trace::{TouchTrace, TraceEntry};
use crate::capture::input::types::TouchPhase;
use crate::overlay::error::{OverlayError, OverlayResult};
use crate::overlay::surface::AffineSurface;
use crate::overlay::{OverlayConfig, TouchOverlay};
use crate::processing::indicator::Frame;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::rc::Rc;
use std::time::Duration;

/// How the enable flag is driven during replay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplayMode {
    /// Caller-controlled flag, changed by `visibility` entries.
    Manual { enabled: bool },
    /// Flag follows `capture` entries, starting from `captured`.
    Automatic { captured: bool },
}

impl Default for ReplayMode {
    fn default() -> Self {
        ReplayMode::Manual { enabled: true }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReplayOptions {
    pub mode: ReplayMode,
    pub config: OverlayConfig,
    /// Wait between entries according to their timestamps.
    pub realtime: bool,
}

/// Rendered state right after one trace entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameRecord {
    pub time_ms: f64,
    pub entry: String,
    #[serde(flatten)]
    pub frame: Frame,
}

/// Aggregate numbers for a replay, used for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplaySummary {
    pub frames: usize,
    pub frames_with_indicators: usize,
    pub max_active: usize,
}

impl ReplaySummary {
    pub fn from_records(records: &[FrameRecord]) -> Self {
        Self {
            frames: records.len(),
            frames_with_indicators: records.iter().filter(|r| !r.frame.is_empty()).count(),
            max_active: records.iter().map(|r| r.frame.active_count).max().unwrap_or(0),
        }
    }
}

struct Replayer {
    overlay: TouchOverlay<AffineSurface>,
    hub: CaptureStatusHub,
}

impl Replayer {
    fn new(surface: AffineSurface, options: &ReplayOptions) -> Self {
        let config = options.config.clone();
        match options.mode {
            ReplayMode::Manual { enabled } => Self {
                overlay: TouchOverlay::attach(surface, enabled, config),
                hub: CaptureStatusHub::new(false),
            },
            ReplayMode::Automatic { captured } => {
                let hub = CaptureStatusHub::new(captured);
                let overlay = TouchOverlay::attach_auto(surface, Rc::new(hub.clone()), config);
                Self { overlay, hub }
            }
        }
    }

    fn step(&mut self, entry: &TraceEntry) -> FrameRecord {
        match entry {
            TraceEntry::Touch { .. } => {
                if let Some(event) = entry.touch_event() {
                    self.overlay.handle_event(&event);
                }
            }
            TraceEntry::Capture { .. } | TraceEntry::Unrecognized { .. } => {
                if let Some(notification) = entry.capture_notification() {
                    self.hub.post(notification);
                }
            }
            TraceEntry::Visibility { enabled, .. } => {
                self.overlay.set_enabled(*enabled);
            }
            TraceEntry::Appear { .. } => self.overlay.appear(),
            TraceEntry::Disappear { .. } => self.overlay.detach(),
        }

        FrameRecord {
            time_ms: entry.time_ms(),
            entry: entry_label(entry).to_string(),
            frame: self.overlay.frame(),
        }
    }
}

fn entry_label(entry: &TraceEntry) -> &'static str {
    match entry {
        TraceEntry::Touch { phase, .. } => match phase {
            TouchPhase::Began => "touch:began",
            TouchPhase::Moved => "touch:moved",
            TouchPhase::Ended => "touch:ended",
            TouchPhase::Cancelled => "touch:cancelled",
        },
        TraceEntry::Capture { .. } => "capture",
        TraceEntry::Unrecognized { .. } => "unrecognized",
        TraceEntry::Visibility { .. } => "visibility",
        TraceEntry::Appear { .. } => "appear",
        TraceEntry::Disappear { .. } => "disappear",
    }
}

/// Replay every entry as fast as possible.
pub fn replay_trace(trace: &TouchTrace, options: &ReplayOptions) -> Vec<FrameRecord> {
    let mut replayer = Replayer::new(trace.surface, options);
    trace.entries.iter().map(|entry| replayer.step(entry)).collect()
}

/// Replay honoring entry timestamps when `options.realtime` is set.
///
/// Fails before replaying anything if a timestamp cannot be scheduled.
pub async fn replay_trace_paced(
    trace: &TouchTrace,
    options: &ReplayOptions,
) -> OverlayResult<Vec<FrameRecord>> {
    if !options.realtime {
        return Ok(replay_trace(trace, options));
    }

    let mut replayer = Replayer::new(trace.surface, options);
    let mut records = Vec::with_capacity(trace.entries.len());
    let start = tokio::time::Instant::now();
    let deadlines = trace
        .entries
        .iter()
        .map(|entry| deadline(start, entry.time_ms()))
        .collect::<OverlayResult<Vec<_>>>()?;

    for (entry, at) in trace.entries.iter().zip(deadlines) {
        tokio::time::sleep_until(at).await;
        records.push(replayer.step(entry));
    }

    Ok(records)
}

fn deadline(start: tokio::time::Instant, offset_ms: f64) -> OverlayResult<tokio::time::Instant> {
    Duration::try_from_secs_f64(offset_ms / 1000.0)
        .ok()
        .and_then(|offset| start.checked_add(offset))
        .ok_or_else(|| OverlayError::Trace(format!("timestamp {}ms cannot be scheduled", offset_ms)))
}

/// Load a trace file and replay it.
pub async fn replay_file(input: &Path, options: &ReplayOptions) -> OverlayResult<Vec<FrameRecord>> {
    let trace = TouchTrace::load(input)?;

    tracing::info!(
        "Replaying {} entries ({}ms) from {} (mode={:?}, realtime={})",
        trace.entries.len(),
        trace.duration_ms(),
        input.display(),
        options.mode,
        options.realtime
    );

    let records = replay_trace_paced(&trace, options).await?;
    let summary = ReplaySummary::from_records(&records);

    tracing::info!(
        "Replayed {} frames ({} with indicators, max {} active)",
        summary.frames,
        summary.frames_with_indicators,
        summary.max_active
    );

    Ok(records)
}

/// Write frame records as pretty JSON.
pub fn write_records(path: &Path, records: &[FrameRecord]) -> OverlayResult<()> {
    let data = serde_json::to_vec_pretty(records)?;
    std::fs::write(path, data)?;
    tracing::info!("Wrote {} frame records to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capture::input::tracker::TrackerSignal;
    use crate::capture::input::types::{Point, RawTouch};

    fn touch(time_ms: f64, phase: TouchPhase, touches: Vec<RawTouch>) -> TraceEntry {
        TraceEntry::Touch {
            time_ms,
            phase,
            touches,
        }
    }

    fn tap_trace() -> TouchTrace {
        TouchTrace {
            surface: AffineSurface::new(0.0, 100.0, 1.0),
            entries: vec![
                touch(0.0, TouchPhase::Began, vec![RawTouch::new(1, 10.0, 110.0)]),
                TraceEntry::Visibility {
                    time_ms: 1.0,
                    enabled: false,
                },
                touch(2.0, TouchPhase::Moved, vec![RawTouch::new(1, 12.0, 110.0)]),
                TraceEntry::Visibility {
                    time_ms: 3.0,
                    enabled: true,
                },
                touch(4.0, TouchPhase::Ended, vec![RawTouch::new(1, 12.0, 110.0)]),
            ],
        }
    }

    #[test]
    fn test_manual_replay() {
        let records = replay_trace(&tap_trace(), &ReplayOptions::default());
        assert_eq!(records.len(), 5);

        assert_eq!(records[0].entry, "touch:began");
        assert_eq!(records[0].frame.indicators[0].center, Point::new(10.0, 10.0));
        assert!(records[1].frame.is_empty());
        assert!(records[2].frame.is_empty());
        assert_eq!(records[2].frame.active_count, 1);
        assert_eq!(records[3].frame.indicators[0].center, Point::new(12.0, 10.0));
        assert_eq!(records[4].frame.signal, TrackerSignal::Ended);
        assert!(records[4].frame.is_empty());

        let summary = ReplaySummary::from_records(&records);
        assert_eq!(
            summary,
            ReplaySummary {
                frames: 5,
                frames_with_indicators: 2,
                max_active: 1
            }
        );
    }

    #[test]
    fn test_automatic_replay_ignores_visibility_entries() {
        let trace = TouchTrace {
            surface: AffineSurface::identity(),
            entries: vec![
                touch(0.0, TouchPhase::Began, vec![RawTouch::new(1, 1.0, 1.0)]),
                TraceEntry::Visibility {
                    time_ms: 1.0,
                    enabled: true,
                },
                TraceEntry::Capture {
                    time_ms: 2.0,
                    display_id: 1,
                    captured: true,
                },
                TraceEntry::Unrecognized {
                    time_ms: 3.0,
                    payload: "orientation".to_string(),
                },
                TraceEntry::Disappear { time_ms: 4.0 },
                TraceEntry::Capture {
                    time_ms: 5.0,
                    display_id: 1,
                    captured: false,
                },
                TraceEntry::Appear { time_ms: 6.0 },
            ],
        };
        let options = ReplayOptions {
            mode: ReplayMode::Automatic { captured: false },
            ..ReplayOptions::default()
        };

        let records = replay_trace(&trace, &options);
        let shown: Vec<bool> = records.iter().map(|r| !r.frame.is_empty()).collect();
        assert_eq!(shown, vec![false, false, true, true, false, false, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_realtime_replay_matches_immediate() {
        let trace = tap_trace();
        let options = ReplayOptions {
            realtime: true,
            ..ReplayOptions::default()
        };
        let paced = replay_trace_paced(&trace, &options).await.unwrap();
        assert_eq!(paced, replay_trace(&trace, &ReplayOptions::default()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_realtime_replay_rejects_unschedulable_timestamps() {
        let options = ReplayOptions {
            realtime: true,
            ..ReplayOptions::default()
        };
        for time_ms in [1e300, f64::NAN, -1.0] {
            let mut trace = tap_trace();
            trace.entries.push(TraceEntry::Appear { time_ms });

            let err = replay_trace_paced(&trace, &options).await.unwrap_err();
            assert!(matches!(err, OverlayError::Trace(_)), "{} scheduled", time_ms);
        }
    }

    #[tokio::test]
    async fn test_replay_file_rejects_huge_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("trace.json");
        std::fs::write(
            &input,
            r#"{ "entries": [{ "kind": "appear", "timeMs": 1e300 }] }"#,
        )
        .unwrap();

        let options = ReplayOptions {
            realtime: true,
            ..ReplayOptions::default()
        };
        let err = replay_file(&input, &options).await.unwrap_err();
        assert!(matches!(err, OverlayError::Trace(_)));
    }

    #[tokio::test]
    async fn test_replay_file_and_write_records() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("trace.json");
        let output = dir.path().join("frames.json");
        tap_trace().save(&input).unwrap();

        let records = replay_file(&input, &ReplayOptions::default()).await.unwrap();
        write_records(&output, &records).unwrap();

        let written: Vec<FrameRecord> =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(written, records);
    }
}
