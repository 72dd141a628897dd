mod engine;
mod format;
mod preset;

pub use engine::{Snapshot, TimerEngine, TimerSession, TimerState};
pub use format::{format_mmss, parse_mmss};
pub use preset::{custom_duration, Preset, PICKER_MAX};
