//! Per-turn battle state as produced by the simulation.
//!
//! Everything here is a read-only value: the simulation builds a fresh
//! [`TurnSnapshot`] each turn and supersedes the previous one, it never
//! mutates a published snapshot.

use serde::{Deserialize, Serialize};

/// Arena dimensions, fixed for the lifetime of a battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDimensions {
    /// Arena width in simulation units.
    pub width: u32,
    /// Arena height in simulation units.
    pub height: u32,
}

impl FieldDimensions {
    /// Create new field dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// RGB color tuple used for robot identity colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Create a color from its channels.
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Life state of a robot, as reported by the simulation.
///
/// The variant set belongs to the simulation; the relay only cares about
/// the alive/dead distinction and must not assume anything about the
/// transient collision states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotLifeState {
    /// Robot is operating normally.
    Active,
    /// Robot collided with a wall this turn.
    HitWall,
    /// Robot collided with another robot this turn.
    HitRobot,
    /// Robot has been destroyed.
    Dead,
}

impl RobotLifeState {
    /// Whether the robot is still in the battle.
    ///
    /// Collision states count as alive; only `Dead` robots are dropped
    /// from encoded turns.
    pub fn is_alive(&self) -> bool {
        !matches!(self, Self::Dead)
    }
}

/// Life state of a bullet, as reported by the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulletLifeState {
    /// Just fired this turn.
    Fired,
    /// In flight.
    Moving,
    /// Hit a robot.
    HitVictim,
    /// Collided with another bullet.
    HitBullet,
    /// Left the arena.
    HitWall,
    /// Explosion animation state.
    Exploded,
    /// Fully resolved, about to be removed.
    Inactive,
}

impl BulletLifeState {
    /// Whether the bullet is still in flight.
    ///
    /// Only `Fired` and `Moving` bullets are observable; every other state
    /// means the bullet has resolved and is omitted from encoded turns.
    pub fn in_flight(&self) -> bool {
        matches!(self, Self::Fired | Self::Moving)
    }
}

/// State of one robot at the end of a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RobotSnapshot {
    /// Short display name, unique within a battle.
    pub name: String,
    /// X position in simulation units.
    pub x: f64,
    /// Y position in simulation units.
    pub y: f64,
    /// Body heading in radians.
    pub body_heading: f64,
    /// Gun heading in radians.
    pub gun_heading: f64,
    /// Radar heading in radians.
    pub radar_heading: f64,
    /// Remaining energy.
    pub energy: f64,
    /// Body color.
    pub body_color: Rgb,
    /// Gun color.
    pub gun_color: Rgb,
    /// Radar color.
    pub radar_color: Rgb,
    /// Scan arc color.
    pub scan_color: Rgb,
    /// Life state this turn.
    pub state: RobotLifeState,
}

/// State of one bullet at the end of a turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulletSnapshot {
    /// Numeric bullet id, unique within a battle.
    pub id: i32,
    /// X position in simulation units.
    pub x: f64,
    /// Y position in simulation units.
    pub y: f64,
    /// Firepower.
    pub power: f64,
    /// Life state this turn.
    pub state: BulletLifeState,
}

/// Immutable snapshot of the whole battle at the end of one turn.
///
/// Entity order is the simulation's order and is preserved through
/// encoding; consumers may rely on it being stable across turns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TurnSnapshot {
    /// Turn number, monotonic, starting at 1.
    pub turn: u32,
    /// All robots, in simulation order.
    pub robots: Vec<RobotSnapshot>,
    /// All bullets, in simulation order.
    pub bullets: Vec<BulletSnapshot>,
}

impl TurnSnapshot {
    /// Create a snapshot for the given turn.
    pub fn new(turn: u32, robots: Vec<RobotSnapshot>, bullets: Vec<BulletSnapshot>) -> Self {
        Self {
            turn,
            robots,
            bullets,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_robot_alive_states() {
        assert!(RobotLifeState::Active.is_alive());
        assert!(RobotLifeState::HitWall.is_alive());
        assert!(RobotLifeState::HitRobot.is_alive());
        assert!(!RobotLifeState::Dead.is_alive());
    }

    #[test]
    fn test_bullet_in_flight_states() {
        assert!(BulletLifeState::Fired.in_flight());
        assert!(BulletLifeState::Moving.in_flight());
        assert!(!BulletLifeState::HitVictim.in_flight());
        assert!(!BulletLifeState::HitBullet.in_flight());
        assert!(!BulletLifeState::HitWall.in_flight());
        assert!(!BulletLifeState::Exploded.in_flight());
        assert!(!BulletLifeState::Inactive.in_flight());
    }

    #[test]
    fn test_snapshot_serialization_roundtrip() {
        let snapshot = TurnSnapshot::new(
            7,
            vec![RobotSnapshot {
                name: "Walls".to_string(),
                x: 120.5,
                y: 64.0,
                body_heading: 1.5,
                gun_heading: 0.25,
                radar_heading: 3.0,
                energy: 87.3,
                body_color: Rgb::new(0, 0x40, 0),
                gun_color: Rgb::default(),
                radar_color: Rgb::default(),
                scan_color: Rgb::new(255, 255, 255),
                state: RobotLifeState::Active,
            }],
            vec![BulletSnapshot {
                id: 3,
                x: 130.0,
                y: 66.0,
                power: 2.0,
                state: BulletLifeState::Moving,
            }],
        );

        let json = serde_json::to_string(&snapshot).unwrap();
        let parsed: TurnSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, snapshot);
        assert!(json.contains("\"state\":\"moving\""));
    }
}
