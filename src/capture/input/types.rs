use serde::{Deserialize, Serialize};

/// A 2D location. Global or surface-local depending on where it came from.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Opaque identifier the host input system assigns to a physical touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TouchId(pub u64);

/// Lifecycle phase of a raw touch event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TouchPhase {
    Began,
    Moved,
    Ended,
    Cancelled,
}

impl std::fmt::Display for TouchPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TouchPhase::Began => write!(f, "began"),
            TouchPhase::Moved => write!(f, "moved"),
            TouchPhase::Ended => write!(f, "ended"),
            TouchPhase::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// One physical touch as reported by the host, in global coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawTouch {
    pub id: TouchId,
    #[serde(flatten)]
    pub location: Point,
}

impl RawTouch {
    pub fn new(id: u64, x: f64, y: f64) -> Self {
        Self {
            id: TouchId(id),
            location: Point::new(x, y),
        }
    }
}

/// A raw touch lifecycle event: the touches that changed, all in one phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TouchEvent {
    pub phase: TouchPhase,
    pub touches: Vec<RawTouch>,
}

impl TouchEvent {
    pub fn new(phase: TouchPhase, touches: Vec<RawTouch>) -> Self {
        Self { phase, touches }
    }

    pub fn began(touches: Vec<RawTouch>) -> Self {
        Self::new(TouchPhase::Began, touches)
    }

    pub fn moved(touches: Vec<RawTouch>) -> Self {
        Self::new(TouchPhase::Moved, touches)
    }

    pub fn ended(touches: Vec<RawTouch>) -> Self {
        Self::new(TouchPhase::Ended, touches)
    }

    pub fn cancelled(touches: Vec<RawTouch>) -> Self {
        Self::new(TouchPhase::Cancelled, touches)
    }
}
