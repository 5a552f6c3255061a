//! The battle observer pipeline.
//!
//! One invocation per external tick walks the pipeline: tick gate ->
//! readiness guard -> lifecycle -> encoder -> sink. All mutable observer
//! state sits behind a single mutex, so lifecycle transitions can never
//! interleave even when the event source and the driver run on different
//! threads.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, warn};

use crate::observer::gate::TickGate;
use crate::observer::lifecycle::ViewLifecycle;
use crate::observer::readiness::{DisplayProbe, DisplayState};
use crate::protocol::{encode_setup, encode_turn, EncodeError, FrameMessage};
use crate::sink::DataSink;
use crate::snapshot::{BattleEvent, BattleEventDispatcher, FieldDimensions, TurnSnapshot};

/// Why a tick produced no message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Observer has been disposed.
    Disposed,
    /// No snapshot has arrived since the last delivery.
    NoSnapshot,
    /// A snapshot is pending but the gate interval has not elapsed.
    NotDue,
    /// The display surface is unusable this tick.
    NotReady,
}

/// Result of one pipeline invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderOutcome {
    /// The one-time setup message was published.
    SetupPublished,
    /// A turn message was published.
    TurnPublished {
        /// Turn number of the published message.
        turn: u32,
    },
    /// Nothing was published this tick.
    Skipped(SkipReason),
}

struct ObserverInner {
    gate: TickGate,
    lifecycle: ViewLifecycle,
}

/// Throttled subscriber that encodes battle snapshots into sink frames.
pub struct BattleObserver {
    field: FieldDimensions,
    sink: Arc<DataSink>,
    tick_interval: Duration,
    inner: Mutex<ObserverInner>,
}

impl BattleObserver {
    /// Create an observer for the given battlefield, publishing to `sink`
    /// at most `tick_rate` times per second.
    pub fn new(field: FieldDimensions, sink: Arc<DataSink>, tick_rate: u32) -> Self {
        let gate = TickGate::new(tick_rate);
        let tick_interval = gate.interval();
        Self {
            field,
            sink,
            tick_interval,
            inner: Mutex::new(ObserverInner {
                gate,
                lifecycle: ViewLifecycle::new(),
            }),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ObserverInner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Offer the latest snapshot. Newest-wins; disposed observers ignore it.
    pub fn offer(&self, snapshot: Arc<TurnSnapshot>) {
        let mut inner = self.lock();
        if inner.lifecycle.is_disposed() {
            return;
        }
        inner.gate.offer(snapshot);
    }

    /// Run one pipeline invocation.
    ///
    /// Throttling and readiness conditions resolve locally as
    /// [`RenderOutcome::Skipped`]; the only error is a malformed snapshot,
    /// which is rejected whole without publishing anything.
    pub fn render_tick(
        &self,
        display: &DisplayState,
        now: Instant,
    ) -> Result<RenderOutcome, EncodeError> {
        let mut inner = self.lock();

        if inner.lifecycle.is_disposed() {
            return Ok(RenderOutcome::Skipped(SkipReason::Disposed));
        }
        if !inner.gate.has_pending() {
            return Ok(RenderOutcome::Skipped(SkipReason::NoSnapshot));
        }
        if !display.is_ready() {
            // Pending snapshot stays in the gate; the previously published
            // frame stays in the sink.
            return Ok(RenderOutcome::Skipped(SkipReason::NotReady));
        }
        let Some(snapshot) = inner.gate.take_due(now) else {
            return Ok(RenderOutcome::Skipped(SkipReason::NotDue));
        };

        if inner.lifecycle.needs_setup() {
            let setup = encode_setup(self.field, &snapshot);
            self.sink.publish(FrameMessage::Setup(setup));
            inner.lifecycle.activate();
            debug!(turn = snapshot.turn, "published battle setup");
            // Turn encoding starts with the next delivered tick so a
            // polling consumer always sees setup first.
            return Ok(RenderOutcome::SetupPublished);
        }

        let message = encode_turn(&snapshot)?;
        let turn = message.turn;
        self.sink.publish(FrameMessage::Turn(message));
        Ok(RenderOutcome::TurnPublished { turn })
    }

    /// Force the next delivered tick to re-run one-time setup.
    pub fn mark_uninitialized(&self) {
        self.lock().lifecycle.reset();
    }

    /// Tear down. Idempotent; no message is published afterwards.
    pub fn dispose(&self) {
        let mut inner = self.lock();
        inner.lifecycle.dispose();
        inner.gate.clear();
    }

    /// Whether this observer has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.lock().lifecycle.is_disposed()
    }

    /// The external tick interval.
    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }
}

/// Handle to an attached observer and its driver task.
pub struct ObserverHandle {
    observer: Arc<BattleObserver>,
    task: JoinHandle<()>,
}

impl ObserverHandle {
    /// The observer behind this handle.
    pub fn observer(&self) -> &Arc<BattleObserver> {
        &self.observer
    }

    /// Dispose the observer and stop its driver task. Idempotent.
    pub fn dispose(&self) {
        self.observer.dispose();
        self.task.abort();
    }
}

impl Drop for ObserverHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Subscribe an observer to a battle and drive it at a fixed tick rate.
///
/// The spawned task forwards `TurnEnded` snapshots into the gate and runs
/// the pipeline once per interval tick, sampling the display probe each
/// time. With `replay_old_events` the dispatcher's most recent snapshot is
/// offered immediately, so an observer attached mid-battle initializes
/// without waiting for the next turn.
pub fn attach(
    dispatcher: &BattleEventDispatcher,
    probe: Arc<dyn DisplayProbe>,
    sink: Arc<DataSink>,
    field: FieldDimensions,
    tick_rate: u32,
    replay_old_events: bool,
) -> ObserverHandle {
    let observer = Arc::new(BattleObserver::new(field, sink, tick_rate));

    if replay_old_events {
        if let Some(snapshot) = dispatcher.latest_snapshot() {
            observer.offer(snapshot);
        }
    }

    let mut events = dispatcher.subscribe();
    let task = tokio::spawn({
        let observer = Arc::clone(&observer);
        async move {
            let mut ticker = interval(observer.tick_interval());
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    event = events.recv() => match event {
                        Ok(BattleEvent::TurnEnded(snapshot)) => observer.offer(snapshot),
                        Ok(BattleEvent::BattleStarted) | Ok(BattleEvent::BattleFinished) => {}
                        Err(broadcast::error::RecvError::Lagged(skipped)) => {
                            debug!(skipped, "observer lagged; dropping to newest snapshot");
                        }
                        Err(broadcast::error::RecvError::Closed) => break,
                    },
                    _ = ticker.tick() => {
                        if observer.is_disposed() {
                            break;
                        }
                        let display = probe.display_state();
                        match observer.render_tick(&display, Instant::now()) {
                            Ok(_) => {}
                            Err(e) => warn!(error = %e, "rejected malformed snapshot"),
                        }
                    }
                }
            }
        }
    });

    ObserverHandle { observer, task }
}
