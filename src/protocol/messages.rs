//! Relay Messages
//!
//! Message schemas handed to the data sink for the external consumer.
//! Serialized as JSON for debugging ease, with optional binary (bincode)
//! for the flat message structs.

use serde::{Deserialize, Serialize};

use crate::snapshot::Rgb;

// =============================================================================
// SETUP MESSAGE
// =============================================================================

/// One-time battle setup, published before any turn message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetupMessage {
    /// Arena width.
    pub field_width: u32,
    /// Arena height.
    pub field_height: u32,
    /// Static identity of every robot present at battle start.
    pub robots: Vec<RobotIdentity>,
}

/// Static per-robot identity and colors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RobotIdentity {
    /// Short display name.
    pub name: String,
    /// Body color.
    pub body_color: Rgb,
    /// Gun color.
    pub gun_color: Rgb,
    /// Radar color.
    pub radar_color: Rgb,
    /// Scan arc color.
    pub scan_color: Rgb,
}

// =============================================================================
// TURN MESSAGE
// =============================================================================

/// Encoded state of one delivered turn.
///
/// Records appear in snapshot order. Dead robots and resolved bullets are
/// absent; absence is the removal signal, there is no tombstone record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnMessage {
    /// Turn number.
    pub turn: u32,
    /// Alive robots this turn.
    pub robots: Vec<RobotRecord>,
    /// In-flight bullets this turn.
    pub bullets: Vec<BulletRecord>,
}

/// Kinematic and status fields of one alive robot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotRecord {
    /// Short display name.
    pub name: String,
    /// X position.
    pub x: f64,
    /// Y position.
    pub y: f64,
    /// Body heading in radians.
    pub body_heading: f64,
    /// Remaining energy.
    pub energy: f64,
    /// Gun heading in radians.
    pub gun_heading: f64,
    /// Radar heading in radians.
    pub radar_heading: f64,
}

/// One in-flight bullet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletRecord {
    /// Bullet id.
    pub id: i32,
    /// X position.
    pub x: f64,
    /// Y position.
    pub y: f64,
    /// Firepower.
    pub power: f64,
}

// =============================================================================
// SINK FRAME
// =============================================================================

/// The value held by the data sink slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FrameMessage {
    /// Battle setup; exactly one per battle lifecycle, before any turn.
    Setup(SetupMessage),
    /// Encoded turn.
    Turn(TurnMessage),
}

impl FrameMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }
}

// =============================================================================
// SERIALIZATION HELPERS
// =============================================================================

// Note: bincode does not support internally tagged enums, so binary helpers
// live on the flat message structs and FrameMessage is JSON-only.

impl SetupMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Serialize to binary.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize from binary.
    pub fn from_bytes(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }
}

impl TurnMessage {
    /// Serialize to JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize from JSON string.
    pub fn from_json(s: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(s)
    }

    /// Serialize to binary.
    pub fn to_bytes(&self) -> Result<Vec<u8>, bincode::Error> {
        bincode::serialize(self)
    }

    /// Deserialize from binary.
    pub fn from_bytes(data: &[u8]) -> Result<Self, bincode::Error> {
        bincode::deserialize(data)
    }
}
