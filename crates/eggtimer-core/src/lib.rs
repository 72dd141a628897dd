//! # Eggtimer Core Library
//!
//! This library provides the countdown logic behind the `eggtimer` CLI.
//! Presentation (rendering, sound, input) lives in the binary; everything
//! that decides *when* a countdown ends lives here.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A clock-based state machine that requires the caller
//!   to periodically invoke `tick()`. Remaining time is recomputed from an
//!   absolute end instant, so delayed or coalesced ticks never stretch it.
//! - **Service**: A tokio-driven poller around the engine with snapshot,
//!   event and completion channels.
//! - **Alert**: Cancellable, jittered alert pulses fired off the single
//!   completion event.
//! - **Storage**: TOML-based configuration.
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`TimerService`]: Background polling and notification
//! - [`Config`]: Application configuration management
//! - [`AlertSink`]: Trait for alert output devices

pub mod alert;
pub mod clock;
pub mod error;
pub mod events;
pub mod service;
pub mod storage;
pub mod timer;

pub use alert::{schedule_alert, AlertHandle, AlertPlan, AlertSink};
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{AlertError, ConfigError, CoreError, ValidationError};
pub use events::{CompletionEvent, Event};
pub use service::{TimerService, DEFAULT_TICK_INTERVAL};
pub use storage::Config;
pub use timer::{format_mmss, parse_mmss, Preset, Snapshot, TimerEngine, TimerState};
