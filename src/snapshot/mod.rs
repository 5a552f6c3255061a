//! Immutable battle snapshots and the event dispatcher that delivers them.
//!
//! The simulation produces one [`TurnSnapshot`] per turn and never mutates it
//! afterwards, so snapshots are shared across threads as plain `Arc` values.

pub mod dispatcher;
pub mod turn;

pub use dispatcher::{BattleEvent, BattleEventDispatcher};
pub use turn::{
    BulletLifeState, BulletSnapshot, FieldDimensions, Rgb, RobotLifeState, RobotSnapshot,
    TurnSnapshot,
};
