//! Fixed-rate tick gate.
//!
//! Converts an arbitrary-rate stream of snapshots into at most one delivery
//! per external tick interval. Newest-wins: a burst of snapshots inside one
//! interval keeps only the last, earlier ones are discarded, nothing is
//! queued and nothing pushes back on the simulation.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::snapshot::TurnSnapshot;

/// Throttle between the simulation event stream and the encoder.
#[derive(Debug)]
pub struct TickGate {
    interval: Duration,
    pending: Option<Arc<TurnSnapshot>>,
    last_delivery: Option<Instant>,
}

impl TickGate {
    /// Create a gate delivering at most `ticks_per_second` snapshots.
    ///
    /// A rate of zero is clamped to one tick per second.
    pub fn new(ticks_per_second: u32) -> Self {
        let rate = ticks_per_second.max(1);
        Self {
            interval: Duration::from_secs(1) / rate,
            pending: None,
            last_delivery: None,
        }
    }

    /// Offer a snapshot; replaces any pending undelivered one.
    pub fn offer(&mut self, snapshot: Arc<TurnSnapshot>) {
        self.pending = Some(snapshot);
    }

    /// Take the pending snapshot if a full interval has elapsed since the
    /// last delivery.
    ///
    /// Returns `None` when nothing is pending or the interval has not
    /// elapsed yet; in the latter case the pending snapshot is retained, so
    /// a driver polling faster than the gate rate loses nothing. The first
    /// delivery is immediate.
    pub fn take_due(&mut self, now: Instant) -> Option<Arc<TurnSnapshot>> {
        self.pending.as_ref()?;

        if let Some(last) = self.last_delivery {
            if now.saturating_duration_since(last) < self.interval {
                return None;
            }
        }

        self.last_delivery = Some(now);
        self.pending.take()
    }

    /// Drop the pending snapshot and the delivery timing state.
    pub fn clear(&mut self) {
        self.pending = None;
        self.last_delivery = None;
    }

    /// Whether a snapshot is waiting for the next due tick.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// The configured delivery interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}
