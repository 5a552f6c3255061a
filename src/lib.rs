//! # Battle Relay
//!
//! Snapshot observer and turn-encoding relay between a turn-based battle
//! simulation and an external consumer (renderer, recorder, visualizer).
//! The simulation tick rate and the consumer refresh rate stay decoupled:
//! turns are throttled to a fixed external rate, encoded into structured
//! messages, and handed to a single-slot sink the consumer polls.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                       BATTLE RELAY                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  snapshot/        - Immutable per-turn state                 │
//! │  ├── turn.rs      - TurnSnapshot, robot/bullet life states   │
//! │  └── dispatcher.rs- Battle event broadcast + latest memory   │
//! │                                                              │
//! │  observer/        - The throttled pipeline                   │
//! │  ├── gate.rs      - Fixed-rate newest-wins tick gate         │
//! │  ├── readiness.rs - Display surface readiness guard          │
//! │  ├── lifecycle.rs - Uninitialized -> Active -> Disposed      │
//! │  ├── observer.rs  - Pipeline + tokio driver task             │
//! │  └── bridge.rs    - setup() / mark_uninitialized() surface   │
//! │                                                              │
//! │  protocol/        - Consumer message contract                │
//! │  ├── messages.rs  - SetupMessage / TurnMessage schemas       │
//! │  └── encoder.rs   - Snapshot -> message projection           │
//! │                                                              │
//! │  sink.rs          - Single-slot last-write-wins handoff      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Delivery guarantees
//!
//! Newest-wins everywhere: a burst of simulation turns inside one external
//! tick delivers only the last one, and the sink keeps only the most recent
//! message. Turn numbers in delivered messages never go backwards; gaps are
//! expected. Exactly one setup message precedes the turn messages of each
//! battle.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

pub mod observer;
pub mod protocol;
pub mod sink;
pub mod snapshot;

// Re-export commonly used types
pub use observer::{attach, BattleObserver, BattleRelay, DisplayProbe, DisplayState};
pub use protocol::{FrameMessage, SetupMessage, TurnMessage};
pub use sink::DataSink;
pub use snapshot::{BattleEventDispatcher, FieldDimensions, TurnSnapshot};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// External display tick rate (Hz) used when none is configured.
pub const DISPLAY_TICK_RATE: u32 = 50;
