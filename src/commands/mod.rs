//! Command handlers
//!
//! Entry points used by the `touch-replay` binary.

pub mod replay;

pub use replay::{replay_file, replay_trace, write_records, FrameRecord, ReplayMode, ReplayOptions};
