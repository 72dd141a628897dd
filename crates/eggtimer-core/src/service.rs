//! Background polling for a [`TimerEngine`].
//!
//! [`TimerService`] owns the engine behind a mutex so control calls may come
//! from any thread, and drives `tick()` from a tokio interval. Each poller
//! remembers the session generation it was spawned for and stops as soon as
//! the engine moves on to another session.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info};

use crate::clock::{Clock, SystemClock};
use crate::error::{Result, ValidationError};
use crate::events::{CompletionEvent, Event};
use crate::storage::{Config, MAX_TICK_INTERVAL_MS, MIN_TICK_INTERVAL_MS};
use crate::timer::{Snapshot, TimerEngine, TimerState};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Channels shared between the service and its poller.
#[derive(Debug, Clone)]
struct Outlets {
    snapshot_tx: watch::Sender<Snapshot>,
    completion_tx: broadcast::Sender<CompletionEvent>,
    events_tx: broadcast::Sender<Event>,
}

impl Outlets {
    /// Publish an engine event together with the snapshot it produced.
    /// Called with the engine lock held so observers see a total order.
    fn publish(&self, event: Option<Event>, snapshot: Snapshot) {
        self.snapshot_tx.send_replace(snapshot);
        let Some(event) = event else {
            return;
        };
        if let Some(done) = event.completion() {
            // No subscribers is fine.
            let _ = self.completion_tx.send(done.clone());
        }
        let _ = self.events_tx.send(event);
    }
}

/// Async driver around a single [`TimerEngine`].
///
/// Dropping the service stops its poller.
#[derive(Debug)]
pub struct TimerService<C: Clock = SystemClock> {
    engine: Arc<Mutex<TimerEngine<C>>>,
    tick_interval: Duration,
    poller: Mutex<Option<JoinHandle<()>>>,
    outlets: Outlets,
}

impl TimerService<SystemClock> {
    pub fn new() -> Self {
        Self::build(SystemClock, DEFAULT_TICK_INTERVAL)
    }

    /// Build a service from a config, validating it first since its fields
    /// are public and may not have gone through [`Config::load`].
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::with_clock(SystemClock, config.tick_interval())?)
    }
}

impl Default for TimerService<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TimerService<C> {
    /// # Errors
    ///
    /// Returns `InvalidValue` if `tick_interval` is outside
    /// `MIN_TICK_INTERVAL_MS..=MAX_TICK_INTERVAL_MS`.
    pub fn with_clock(clock: C, tick_interval: Duration) -> Result<Self, ValidationError> {
        check_tick_interval(tick_interval)?;
        Ok(Self::build(clock, tick_interval))
    }

    fn build(clock: C, tick_interval: Duration) -> Self {
        let (snapshot_tx, _) = watch::channel(Snapshot::idle());
        let (completion_tx, _) = broadcast::channel(16);
        let (events_tx, _) = broadcast::channel(64);
        Self {
            engine: Arc::new(Mutex::new(TimerEngine::with_clock(clock))),
            tick_interval,
            poller: Mutex::new(None),
            outlets: Outlets {
                snapshot_tx,
                completion_tx,
                events_tx,
            },
        }
    }

    // ── Observers ────────────────────────────────────────────────────

    pub fn snapshot(&self) -> Snapshot {
        self.engine().snapshot()
    }

    pub fn state(&self) -> TimerState {
        self.engine().state()
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    pub fn subscribe_snapshots(&self) -> watch::Receiver<Snapshot> {
        self.outlets.snapshot_tx.subscribe()
    }

    pub fn subscribe_completion(&self) -> broadcast::Receiver<CompletionEvent> {
        self.outlets.completion_tx.subscribe()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.outlets.events_tx.subscribe()
    }

    /// Whether a poller task is still alive.
    pub fn is_polling(&self) -> bool {
        self.poller_slot()
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start a countdown, replacing any active session.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self, duration: Duration) -> Result<(), ValidationError> {
        self.start_with(|engine| engine.start(duration))
    }

    pub fn start_named(&self, name: &str) -> Result<(), ValidationError> {
        self.start_with(|engine| engine.start_named(name))
    }

    pub fn start_custom(&self, minutes: u32, seconds: u32) -> Result<(), ValidationError> {
        self.start_with(|engine| engine.start_custom(minutes, seconds))
    }

    pub fn pause(&self) {
        let mut engine = self.engine();
        let event = engine.pause();
        if event.is_some() {
            self.outlets.publish(event, engine.snapshot());
        }
    }

    pub fn resume(&self) {
        let mut engine = self.engine();
        let event = engine.resume();
        if event.is_some() {
            self.outlets.publish(event, engine.snapshot());
        }
    }

    /// Return to idle and stop polling. Always succeeds.
    pub fn reset(&self) {
        let mut engine = self.engine();
        let event = engine.reset();
        self.stop_poller();
        if event.is_some() {
            self.outlets.publish(event, engine.snapshot());
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn start_with<F>(&self, start: F) -> Result<(), ValidationError>
    where
        F: FnOnce(&mut TimerEngine<C>) -> Result<Event, ValidationError>,
    {
        let mut engine = self.engine();
        let event = start(&mut *engine)?;
        let generation = engine.generation();

        self.stop_poller();
        let task = tokio::spawn(poll_session(
            Arc::clone(&self.engine),
            generation,
            self.tick_interval,
            self.outlets.clone(),
        ));
        *self.poller_slot() = Some(task);

        self.outlets.publish(Some(event), engine.snapshot());
        Ok(())
    }

    fn stop_poller(&self) {
        if let Some(task) = self.poller_slot().take() {
            task.abort();
        }
    }

    fn engine(&self) -> MutexGuard<'_, TimerEngine<C>> {
        lock(&self.engine)
    }

    fn poller_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.poller.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl<C: Clock> Drop for TimerService<C> {
    fn drop(&mut self) {
        self.stop_poller();
    }
}

fn check_tick_interval(period: Duration) -> Result<(), ValidationError> {
    let min = Duration::from_millis(MIN_TICK_INTERVAL_MS);
    let max = Duration::from_millis(MAX_TICK_INTERVAL_MS);
    if (min..=max).contains(&period) {
        return Ok(());
    }
    Err(ValidationError::InvalidValue {
        field: "tick_interval".into(),
        message: format!(
            "{period:?} is outside {MIN_TICK_INTERVAL_MS}..={MAX_TICK_INTERVAL_MS} ms"
        ),
    })
}

fn lock<C: Clock>(engine: &Mutex<TimerEngine<C>>) -> MutexGuard<'_, TimerEngine<C>> {
    engine.lock().unwrap_or_else(|e| e.into_inner())
}

/// Tick one session until it completes or is superseded.
async fn poll_session<C: Clock>(
    engine: Arc<Mutex<TimerEngine<C>>>,
    generation: u64,
    period: Duration,
    outlets: Outlets,
) {
    debug!(generation, ?period, "poller started");
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        let mut timer = lock(&engine);
        if timer.generation() != generation {
            debug!(generation, "stale poller exiting");
            return;
        }
        if timer.state() == TimerState::Paused {
            continue;
        }

        let event = timer.tick();
        let state = timer.state();
        outlets.publish(event, timer.snapshot());

        if !state.is_polling() {
            info!(generation, ?state, "poller finished");
            return;
        }
    }
}
