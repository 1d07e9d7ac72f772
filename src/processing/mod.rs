//! Processing between tracking and rendering
//!
//! The visualization gate filters tracked contacts by the enable flag, and
//! the indicator layout turns the survivors into markers to draw.

pub mod gate;
pub mod indicator;

pub use gate::{render_set, VisualizationGate};
pub use indicator::{Frame, Indicator, IndicatorStyle, Rect};
