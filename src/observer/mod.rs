//! The snapshot observer pipeline.
//!
//! TickGate throttles the simulation event stream, the readiness guard
//! skips unusable display ticks, the lifecycle gates one-time setup, and
//! the observer stitches them together in front of the encoder and sink.

pub mod bridge;
pub mod gate;
pub mod lifecycle;
pub mod observer;
pub mod readiness;

pub use bridge::BattleRelay;
pub use gate::TickGate;
pub use lifecycle::ViewLifecycle;
pub use observer::{attach, BattleObserver, ObserverHandle, RenderOutcome, SkipReason};
pub use readiness::{DisplayProbe, DisplayState, FixedDisplay};
