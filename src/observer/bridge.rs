//! Relay control surface.
//!
//! Owns the currently attached observer and rebinds it when a new battle
//! field arrives. The sink is shared across rebinds so the consumer keeps a
//! stable read point.

use std::sync::Arc;

use tracing::info;

use crate::observer::observer::{attach, BattleObserver, ObserverHandle};
use crate::observer::readiness::DisplayProbe;
use crate::sink::DataSink;
use crate::snapshot::{BattleEventDispatcher, FieldDimensions};

/// Bridges one battle simulation to one external consumer.
pub struct BattleRelay {
    probe: Arc<dyn DisplayProbe>,
    sink: Arc<DataSink>,
    tick_rate: u32,
    handle: Option<ObserverHandle>,
}

impl BattleRelay {
    /// Create a relay with no observer attached yet.
    pub fn new(probe: Arc<dyn DisplayProbe>, tick_rate: u32) -> Self {
        Self {
            probe,
            sink: Arc::new(DataSink::new()),
            tick_rate,
            handle: None,
        }
    }

    /// Bind to a new battle: disposes any existing observer and attaches a
    /// fresh one for the given field.
    pub fn setup(&mut self, field: FieldDimensions, dispatcher: &BattleEventDispatcher) {
        if let Some(handle) = self.handle.take() {
            handle.dispose();
        }

        info!(
            width = field.width,
            height = field.height,
            tick_rate = self.tick_rate,
            "attaching battle observer"
        );
        self.handle = Some(attach(
            dispatcher,
            Arc::clone(&self.probe),
            Arc::clone(&self.sink),
            field,
            self.tick_rate,
            false,
        ));
    }

    /// Force the next delivered tick to re-run one-time setup.
    pub fn mark_uninitialized(&self) {
        if let Some(handle) = &self.handle {
            handle.observer().mark_uninitialized();
        }
    }

    /// Dispose the current observer, if any. Idempotent.
    pub fn dispose(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.dispose();
        }
    }

    /// The sink the external consumer reads from.
    pub fn sink(&self) -> &Arc<DataSink> {
        &self.sink
    }

    /// The currently attached observer, if any.
    pub fn observer(&self) -> Option<&Arc<BattleObserver>> {
        self.handle.as_ref().map(ObserverHandle::observer)
    }
}

impl Drop for BattleRelay {
    fn drop(&mut self) {
        self.dispose();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observer::readiness::{DisplayState, FixedDisplay};
    use crate::protocol::FrameMessage;
    use crate::snapshot::TurnSnapshot;
    use std::time::Duration;
    use tokio::time::sleep;

    fn relay() -> BattleRelay {
        let probe = Arc::new(FixedDisplay(DisplayState::visible(800, 600)));
        BattleRelay::new(probe, 100)
    }

    fn snapshot(turn: u32) -> Arc<TurnSnapshot> {
        Arc::new(TurnSnapshot::new(turn, Vec::new(), Vec::new()))
    }

    #[tokio::test]
    async fn test_setup_replaces_previous_observer() {
        let mut relay = relay();
        let first = BattleEventDispatcher::new();
        let second = BattleEventDispatcher::new();

        relay.setup(FieldDimensions::new(800, 600), &first);
        let old = Arc::clone(relay.observer().unwrap());

        relay.setup(FieldDimensions::new(1000, 1000), &second);
        assert!(old.is_disposed());
        assert!(!relay.observer().unwrap().is_disposed());

        // Events from the old battle no longer reach the sink.
        first.turn_ended(snapshot(9));
        sleep(Duration::from_millis(60)).await;
        assert!(relay.sink().read().is_none());

        // The new battle does.
        second.turn_ended(snapshot(1));
        sleep(Duration::from_millis(60)).await;
        assert!(matches!(relay.sink().read(), Some(FrameMessage::Setup(_))));
    }

    #[tokio::test]
    async fn test_mark_uninitialized_without_observer_is_harmless() {
        let relay = relay();
        relay.mark_uninitialized();
    }

    #[tokio::test]
    async fn test_dispose_is_idempotent() {
        let mut relay = relay();
        let dispatcher = BattleEventDispatcher::new();
        relay.setup(FieldDimensions::new(800, 600), &dispatcher);

        relay.dispose();
        relay.dispose();
        assert!(relay.observer().is_none());
    }
}
