use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One-shot signal emitted when a session's countdown reaches zero.
///
/// Exactly one is produced per session; repeated alerting is the
/// subscriber's business.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionEvent {
    /// Session generation that completed.
    pub generation: u64,
    pub total_secs: u64,
    pub at: DateTime<Utc>,
}

/// Every state change of the engine produces an Event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        generation: u64,
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_ms: u64,
        at: DateTime<Utc>,
    },
    TimerCompleted(CompletionEvent),
    TimerReset {
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn completion(&self) -> Option<&CompletionEvent> {
        match self {
            Event::TimerCompleted(done) => Some(done),
            _ => None,
        }
    }
}
