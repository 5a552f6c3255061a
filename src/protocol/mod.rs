//! Message schemas and the snapshot-to-message encoder.
//!
//! The on-wire syntax is the consumer's choice; these types define the
//! contract and ship JSON/bincode helpers for convenience.

pub mod encoder;
pub mod messages;

pub use encoder::{encode_setup, encode_turn, EncodeError};
pub use messages::{
    BulletRecord, FrameMessage, RobotIdentity, RobotRecord, SetupMessage, TurnMessage,
};
