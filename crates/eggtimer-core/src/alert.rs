//! Completion alerting.
//!
//! The engine emits a single completion event. Everything after that
//! (a sound, a burst of haptic-style pulses) happens here as independent
//! delayed callbacks that can be cancelled without touching the engine.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::AlertError;

/// Output device for alerts.
pub trait AlertSink: Send + Sync + 'static {
    /// Play the primary alert sound.
    fn play_sound(&self) -> Result<(), AlertError>;

    /// Used when `play_sound` fails. Must not fail itself.
    fn fallback(&self);

    /// One repeated pulse (vibration, bell, flash).
    fn pulse(&self, index: u32);
}

/// How many pulses to fire and how to spread them out.
#[derive(Debug, Clone, PartialEq)]
pub struct AlertPlan {
    pub pulses: u32,
    pub spacing: Duration,
    /// Upper bound of the random delay added to each pulse.
    pub jitter: Duration,
}

impl Default for AlertPlan {
    fn default() -> Self {
        Self {
            pulses: 3,
            spacing: Duration::from_millis(600),
            jitter: Duration::from_millis(250),
        }
    }
}

impl AlertPlan {
    /// Delay of each pulse relative to the completion.
    pub fn delays<R: Rng>(&self, rng: &mut R) -> Vec<Duration> {
        let jitter_ms = self.jitter.as_millis() as u64;
        (0..self.pulses)
            .map(|i| {
                let jitter = if jitter_ms == 0 {
                    0
                } else {
                    rng.gen_range(0..=jitter_ms)
                };
                self.spacing * i + Duration::from_millis(jitter)
            })
            .collect()
    }
}

/// Pending pulses of one alert.
///
/// Dropping the handle leaves the pulses running; call [`cancel`](Self::cancel)
/// to stop them.
#[derive(Debug)]
pub struct AlertHandle {
    pulses: Vec<JoinHandle<()>>,
}

impl AlertHandle {
    /// Abort every pulse that has not fired yet.
    pub fn cancel(&self) {
        for pulse in &self.pulses {
            pulse.abort();
        }
    }

    pub fn pending(&self) -> usize {
        self.pulses.iter().filter(|p| !p.is_finished()).count()
    }

    /// Wait until every pulse has fired or been cancelled.
    pub async fn finished(self) {
        for pulse in self.pulses {
            let _ = pulse.await;
        }
    }
}

/// Play the sound now and schedule the plan's pulses.
///
/// A failing sound degrades to [`AlertSink::fallback`]; the error is logged
/// and goes no further. Must be called from within a tokio runtime.
pub fn schedule_alert(plan: &AlertPlan, sink: Arc<dyn AlertSink>) -> AlertHandle {
    if let Err(e) = sink.play_sound() {
        warn!("alert sound failed, using fallback: {}", e);
        sink.fallback();
    }

    let delays = plan.delays(&mut rand::thread_rng());
    debug!(?delays, "scheduling alert pulses");

    let pulses = delays
        .into_iter()
        .zip(0u32..)
        .map(|(delay, index)| {
            let sink = Arc::clone(&sink);
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                sink.pulse(index);
            })
        })
        .collect();

    AlertHandle { pulses }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        fail_sound: bool,
        sounds: Mutex<u32>,
        fallbacks: Mutex<u32>,
        pulses: Mutex<Vec<u32>>,
    }

    impl AlertSink for Recorder {
        fn play_sound(&self) -> Result<(), AlertError> {
            if self.fail_sound {
                return Err(AlertError::SoundUnavailable("no device".into()));
            }
            *self.sounds.lock().unwrap() += 1;
            Ok(())
        }

        fn fallback(&self) {
            *self.fallbacks.lock().unwrap() += 1;
        }

        fn pulse(&self, index: u32) {
            self.pulses.lock().unwrap().push(index);
        }
    }

    fn plan(pulses: u32, spacing_ms: u64) -> AlertPlan {
        AlertPlan {
            pulses,
            spacing: Duration::from_millis(spacing_ms),
            jitter: Duration::ZERO,
        }
    }

    #[test]
    fn delays_stay_within_jitter() {
        let plan = AlertPlan {
            pulses: 4,
            spacing: Duration::from_secs(1),
            jitter: Duration::from_millis(300),
        };
        let delays = plan.delays(&mut rand::thread_rng());
        assert_eq!(delays.len(), 4);
        for (i, d) in delays.iter().enumerate() {
            let base = Duration::from_secs(i as u64);
            assert!(*d >= base && *d <= base + Duration::from_millis(300));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fires_sound_then_every_pulse() {
        let sink = Arc::new(Recorder::default());
        let handle = schedule_alert(&plan(3, 1_000), sink.clone());
        assert_eq!(*sink.sounds.lock().unwrap(), 1);

        handle.finished().await;
        assert_eq!(*sink.pulses.lock().unwrap(), vec![0, 1, 2]);
        assert_eq!(*sink.fallbacks.lock().unwrap(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn failed_sound_uses_fallback() {
        let sink = Arc::new(Recorder {
            fail_sound: true,
            ..Default::default()
        });
        schedule_alert(&plan(1, 0), sink.clone()).finished().await;
        assert_eq!(*sink.fallbacks.lock().unwrap(), 1);
        assert_eq!(*sink.pulses.lock().unwrap(), vec![0]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_stops_pending_pulses() {
        let sink = Arc::new(Recorder::default());
        let handle = schedule_alert(&plan(3, 10_000), sink.clone());

        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(*sink.pulses.lock().unwrap(), vec![0]);
        assert_eq!(handle.pending(), 2);

        handle.cancel();
        tokio::time::sleep(Duration::from_secs(60)).await;
        assert_eq!(*sink.pulses.lock().unwrap(), vec![0]);
    }
}
