//! Timer engine implementation.
//!
//! The timer engine is a clock-based state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()` periodically.
//!
//! Remaining time is always recomputed from an absolute end instant, never by
//! decrementing per tick, so late or coalesced ticks cannot stretch the
//! countdown.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused -> Running)* -> Completed
//!   ^________________ reset _________________|
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new();
//! engine.start(Duration::from_secs(360))?;
//! // In a loop:
//! engine.tick(); // Returns Some(Event::TimerCompleted(..)) exactly once
//! ```

use std::time::{Duration, Instant};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace};

use super::format::format_mmss;
use super::preset::{custom_duration, Preset};
use crate::clock::{Clock, SystemClock};
use crate::error::ValidationError;
use crate::events::{CompletionEvent, Event};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    Completed,
}

impl TimerState {
    /// Whether a session in this state still needs polling.
    pub fn is_polling(self) -> bool {
        matches!(self, TimerState::Running | TimerState::Paused)
    }
}

/// A single countdown run.
#[derive(Debug, Clone)]
pub struct TimerSession {
    total: Duration,
    /// Instant at which the countdown reaches zero while running.
    end: Instant,
    /// Time consumed before the most recent pause.
    paused_elapsed: Duration,
    /// Last observed remaining time. Frozen while paused.
    remaining: Duration,
}

impl TimerSession {
    pub fn total(&self) -> Duration {
        self.total
    }

    pub fn paused_elapsed(&self) -> Duration {
        self.paused_elapsed
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }
}

/// Read-only view of the engine handed to renderers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub state: TimerState,
    pub remaining_ms: u64,
    /// Whole seconds left, rounded down.
    pub remaining_seconds: u64,
    pub total_ms: u64,
    /// 0.0 .. 1.0
    pub progress: f64,
    pub generation: u64,
}

impl Snapshot {
    pub fn idle() -> Self {
        Self {
            state: TimerState::Idle,
            remaining_ms: 0,
            remaining_seconds: 0,
            total_ms: 0,
            progress: 0.0,
            generation: 0,
        }
    }

    pub fn display(&self) -> String {
        format_mmss(self.remaining_seconds)
    }
}

/// Core countdown engine.
///
/// Operates on clock deltas -- no internal thread.
/// The caller is responsible for calling `tick()` periodically.
#[derive(Debug)]
pub struct TimerEngine<C: Clock = SystemClock> {
    clock: C,
    state: TimerState,
    session: Option<TimerSession>,
    /// Bumped whenever a session is created or discarded.
    generation: u64,
}

impl TimerEngine<SystemClock> {
    /// Create an idle engine on the system clock.
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for TimerEngine<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TimerEngine<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            clock,
            state: TimerState::Idle,
            session: None,
            generation: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn session(&self) -> Option<&TimerSession> {
        self.session.as_ref()
    }

    pub fn remaining(&self) -> Duration {
        self.session
            .as_ref()
            .map(|s| s.remaining)
            .unwrap_or_default()
    }

    pub fn remaining_seconds(&self) -> u64 {
        self.remaining().as_secs()
    }

    pub fn total(&self) -> Duration {
        self.session.as_ref().map(|s| s.total).unwrap_or_default()
    }

    /// 0.0 .. 1.0 progress within the current session.
    pub fn progress(&self) -> f64 {
        let total = self.total();
        if total.is_zero() {
            return 0.0;
        }
        (1.0 - self.remaining().as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0)
    }

    pub fn snapshot(&self) -> Snapshot {
        let remaining = self.remaining();
        Snapshot {
            state: self.state,
            remaining_ms: remaining.as_millis() as u64,
            remaining_seconds: remaining.as_secs(),
            total_ms: self.total().as_millis() as u64,
            progress: self.progress(),
            generation: self.generation,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin a new countdown, discarding whatever session was active.
    pub fn start(&mut self, duration: Duration) -> Result<Event, ValidationError> {
        if duration.is_zero() {
            return Err(ValidationError::InvalidDuration { duration });
        }
        let now = self.clock.now();
        let end = now
            .checked_add(duration)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "duration".into(),
                message: format!("{duration:?} is too long to schedule"),
            })?;

        if self.state != TimerState::Idle {
            debug!(
                generation = self.generation,
                state = ?self.state,
                "superseding active session"
            );
        }

        self.generation += 1;
        self.state = TimerState::Running;
        self.session = Some(TimerSession {
            total: duration,
            end,
            paused_elapsed: Duration::ZERO,
            remaining: duration,
        });

        info!(
            generation = self.generation,
            secs = duration.as_secs(),
            "countdown started"
        );
        Ok(Event::TimerStarted {
            generation: self.generation,
            duration_ms: duration.as_millis() as u64,
            at: Utc::now(),
        })
    }

    /// Start one of the built-in presets by name (case-insensitive).
    pub fn start_named(&mut self, name: &str) -> Result<Event, ValidationError> {
        let preset: Preset = name.parse()?;
        self.start(preset.duration())
    }

    /// Start from a `(minutes, seconds)` picker selection.
    pub fn start_custom(&mut self, minutes: u32, seconds: u32) -> Result<Event, ValidationError> {
        let duration = custom_duration(minutes, seconds)?;
        self.start(duration)
    }

    /// Freeze the countdown. No-op unless running.
    ///
    /// If the session has already run out by the time the pause lands, it
    /// completes instead and the completion event is returned.
    pub fn pause(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        if let Some(done) = self.tick() {
            return Some(done);
        }

        let session = self.session.as_mut()?;
        session.paused_elapsed = session.total.saturating_sub(session.remaining);
        self.state = TimerState::Paused;

        info!(
            generation = self.generation,
            remaining_ms = session.remaining.as_millis() as u64,
            "countdown paused"
        );
        Some(Event::TimerPaused {
            remaining_ms: session.remaining.as_millis() as u64,
            at: Utc::now(),
        })
    }

    /// Continue a paused countdown. No-op unless paused.
    pub fn resume(&mut self) -> Option<Event> {
        if self.state != TimerState::Paused {
            return None;
        }
        let now = self.clock.now();
        let session = self.session.as_mut()?;
        // Equivalent to now - paused_elapsed + total.
        session.end = now + session.remaining;
        self.state = TimerState::Running;

        info!(
            generation = self.generation,
            remaining_ms = session.remaining.as_millis() as u64,
            "countdown resumed"
        );
        Some(Event::TimerResumed {
            remaining_ms: session.remaining.as_millis() as u64,
            at: Utc::now(),
        })
    }

    /// Drop the current session and return to idle.
    ///
    /// Returns `None` when there was nothing to discard.
    pub fn reset(&mut self) -> Option<Event> {
        self.state = TimerState::Idle;
        self.session.take()?;
        self.generation += 1;
        info!(generation = self.generation, "timer reset");
        Some(Event::TimerReset { at: Utc::now() })
    }

    /// Call periodically. Returns `Some(Event::TimerCompleted)` exactly once
    /// per session, on the first tick at or after the end instant.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != TimerState::Running {
            return None;
        }
        let now = self.clock.now();
        let session = self.session.as_mut()?;
        session.remaining = session.end.saturating_duration_since(now);

        if !session.remaining.is_zero() {
            trace!(remaining_ms = session.remaining.as_millis() as u64, "tick");
            return None;
        }

        self.state = TimerState::Completed;
        info!(generation = self.generation, "countdown completed");
        Some(Event::TimerCompleted(CompletionEvent {
            generation: self.generation,
            total_secs: session.total.as_secs(),
            at: Utc::now(),
        }))
    }
}
