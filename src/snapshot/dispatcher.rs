//! Battle event dispatch.
//!
//! The simulation publishes lifecycle and per-turn events here; observers
//! subscribe through a broadcast channel. The dispatcher also remembers the
//! most recent snapshot so a late subscriber can be seeded with it
//! (`replay_old_events` on attach).

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use tokio::sync::broadcast;

use crate::snapshot::TurnSnapshot;

/// Events emitted by the battle simulation.
#[derive(Debug, Clone)]
pub enum BattleEvent {
    /// A battle has started.
    BattleStarted,
    /// A simulation turn completed; carries the snapshot for that turn.
    TurnEnded(Arc<TurnSnapshot>),
    /// The battle finished; no further turns will be published.
    BattleFinished,
}

/// Fan-out point between the simulation and its observers.
///
/// Subscribers that lag behind the broadcast simply lose intermediate
/// events; the pipeline is newest-wins end to end, so that is not an error.
pub struct BattleEventDispatcher {
    events: broadcast::Sender<BattleEvent>,
    latest: Mutex<Option<Arc<TurnSnapshot>>>,
    running: AtomicBool,
}

impl BattleEventDispatcher {
    /// Channel depth for slow subscribers before they start lagging.
    const CHANNEL_CAPACITY: usize = 256;

    /// Create a dispatcher with no battle running.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(Self::CHANNEL_CAPACITY);
        Self {
            events,
            latest: Mutex::new(None),
            running: AtomicBool::new(false),
        }
    }

    /// Subscribe to battle events.
    pub fn subscribe(&self) -> broadcast::Receiver<BattleEvent> {
        self.events.subscribe()
    }

    /// Whether a battle is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Most recent snapshot, if any turn has completed yet.
    pub fn latest_snapshot(&self) -> Option<Arc<TurnSnapshot>> {
        self.latest
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Announce the start of a battle and clear the previous snapshot.
    pub fn battle_started(&self) {
        {
            let mut latest = self
                .latest
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *latest = None;
        }
        self.running.store(true, Ordering::Release);
        let _ = self.events.send(BattleEvent::BattleStarted);
    }

    /// Publish the snapshot for a completed turn.
    ///
    /// Send errors mean no subscriber is attached, which is fine; the
    /// snapshot is still remembered for replay.
    pub fn turn_ended(&self, snapshot: Arc<TurnSnapshot>) {
        {
            let mut latest = self
                .latest
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            *latest = Some(Arc::clone(&snapshot));
        }
        let _ = self.events.send(BattleEvent::TurnEnded(snapshot));
    }

    /// Announce the end of the battle.
    pub fn battle_finished(&self) {
        self.running.store(false, Ordering::Release);
        let _ = self.events.send(BattleEvent::BattleFinished);
    }
}

impl Default for BattleEventDispatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(turn: u32) -> Arc<TurnSnapshot> {
        Arc::new(TurnSnapshot::new(turn, Vec::new(), Vec::new()))
    }

    #[tokio::test]
    async fn test_turn_events_reach_subscriber() {
        let dispatcher = BattleEventDispatcher::new();
        let mut rx = dispatcher.subscribe();

        dispatcher.turn_ended(snapshot(1));

        match rx.recv().await.unwrap() {
            BattleEvent::TurnEnded(s) => assert_eq!(s.turn, 1),
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_latest_snapshot_remembered_without_subscribers() {
        let dispatcher = BattleEventDispatcher::new();
        assert!(dispatcher.latest_snapshot().is_none());

        dispatcher.turn_ended(snapshot(4));
        dispatcher.turn_ended(snapshot(5));

        assert_eq!(dispatcher.latest_snapshot().unwrap().turn, 5);
    }

    #[tokio::test]
    async fn test_running_flag_follows_battle_lifecycle() {
        let dispatcher = BattleEventDispatcher::new();
        assert!(!dispatcher.is_running());

        dispatcher.battle_started();
        assert!(dispatcher.is_running());

        dispatcher.battle_finished();
        assert!(!dispatcher.is_running());
    }

    #[tokio::test]
    async fn test_battle_started_clears_previous_snapshot() {
        let dispatcher = BattleEventDispatcher::new();
        dispatcher.turn_ended(snapshot(30));

        dispatcher.battle_started();
        assert!(dispatcher.latest_snapshot().is_none());
    }
}
