//! Turn encoding.
//!
//! Projects an immutable snapshot onto the message schemas. Filtering is
//! driven by the simulation's own life-state enums: dead robots and
//! resolved bullets are omitted for that turn, order is the snapshot's
//! order and is never re-sorted.
//!
//! A malformed snapshot (missing name, non-finite number) is a collaborator
//! contract violation: the whole snapshot is rejected and nothing partial
//! is ever handed to the sink.

use crate::protocol::messages::{
    BulletRecord, RobotIdentity, RobotRecord, SetupMessage, TurnMessage,
};
use crate::snapshot::{BulletSnapshot, FieldDimensions, RobotSnapshot, TurnSnapshot};

/// Snapshot fields the encoder refuses to pass through.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// A robot record has an empty name.
    #[error("robot at index {index} has an empty name")]
    MissingRobotName {
        /// Index of the robot in snapshot order.
        index: usize,
    },

    /// A robot field is NaN or infinite.
    #[error("robot '{name}' has a non-finite {field}")]
    NonFiniteRobotField {
        /// Robot name.
        name: String,
        /// Offending field name.
        field: &'static str,
    },

    /// A bullet field is NaN or infinite.
    #[error("bullet {id} has a non-finite {field}")]
    NonFiniteBulletField {
        /// Bullet id.
        id: i32,
        /// Offending field name.
        field: &'static str,
    },
}

/// Build the one-time setup message from the battle field and the robots
/// present at battle start.
pub fn encode_setup(field: FieldDimensions, snapshot: &TurnSnapshot) -> SetupMessage {
    let robots = snapshot
        .robots
        .iter()
        .map(|r| RobotIdentity {
            name: r.name.clone(),
            body_color: r.body_color,
            gun_color: r.gun_color,
            radar_color: r.radar_color,
            scan_color: r.scan_color,
        })
        .collect();

    SetupMessage {
        field_width: field.width,
        field_height: field.height,
        robots,
    }
}

/// Encode one turn.
///
/// Empty robot or bullet lists are valid and produce empty record lists.
pub fn encode_turn(snapshot: &TurnSnapshot) -> Result<TurnMessage, EncodeError> {
    let mut robots = Vec::new();
    for (index, robot) in snapshot.robots.iter().enumerate() {
        if !robot.state.is_alive() {
            continue;
        }
        robots.push(encode_robot(index, robot)?);
    }

    let mut bullets = Vec::new();
    for bullet in &snapshot.bullets {
        if !bullet.state.in_flight() {
            continue;
        }
        bullets.push(encode_bullet(bullet)?);
    }

    Ok(TurnMessage {
        turn: snapshot.turn,
        robots,
        bullets,
    })
}

fn encode_robot(index: usize, robot: &RobotSnapshot) -> Result<RobotRecord, EncodeError> {
    if robot.name.is_empty() {
        return Err(EncodeError::MissingRobotName { index });
    }

    let fields = [
        ("x", robot.x),
        ("y", robot.y),
        ("body_heading", robot.body_heading),
        ("energy", robot.energy),
        ("gun_heading", robot.gun_heading),
        ("radar_heading", robot.radar_heading),
    ];
    for (field, value) in fields {
        if !value.is_finite() {
            return Err(EncodeError::NonFiniteRobotField {
                name: robot.name.clone(),
                field,
            });
        }
    }

    Ok(RobotRecord {
        name: robot.name.clone(),
        x: robot.x,
        y: robot.y,
        body_heading: robot.body_heading,
        energy: robot.energy,
        gun_heading: robot.gun_heading,
        radar_heading: robot.radar_heading,
    })
}

fn encode_bullet(bullet: &BulletSnapshot) -> Result<BulletRecord, EncodeError> {
    let fields = [("x", bullet.x), ("y", bullet.y), ("power", bullet.power)];
    for (field, value) in fields {
        if !value.is_finite() {
            return Err(EncodeError::NonFiniteBulletField {
                id: bullet.id,
                field,
            });
        }
    }

    Ok(BulletRecord {
        id: bullet.id,
        x: bullet.x,
        y: bullet.y,
        power: bullet.power,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::{BulletLifeState, Rgb, RobotLifeState};
    use proptest::prelude::*;

    fn robot(name: &str, state: RobotLifeState) -> RobotSnapshot {
        RobotSnapshot {
            name: name.to_string(),
            x: 100.0,
            y: 200.0,
            body_heading: 0.5,
            gun_heading: 1.0,
            radar_heading: 1.5,
            energy: 80.0,
            body_color: Rgb::new(10, 20, 30),
            gun_color: Rgb::default(),
            radar_color: Rgb::default(),
            scan_color: Rgb::new(255, 0, 0),
            state,
        }
    }

    fn bullet(id: i32, state: BulletLifeState) -> BulletSnapshot {
        BulletSnapshot {
            id,
            x: 50.0,
            y: 60.0,
            power: 1.0,
            state,
        }
    }

    #[test]
    fn test_dead_robots_are_omitted() {
        let snapshot = TurnSnapshot::new(
            3,
            vec![
                robot("A", RobotLifeState::Active),
                robot("B", RobotLifeState::Dead),
            ],
            Vec::new(),
        );

        let msg = encode_turn(&snapshot).unwrap();
        assert_eq!(msg.robots.len(), 1);
        assert_eq!(msg.robots[0].name, "A");
    }

    #[test]
    fn test_collision_states_still_encode() {
        let snapshot = TurnSnapshot::new(
            3,
            vec![
                robot("A", RobotLifeState::HitWall),
                robot("B", RobotLifeState::HitRobot),
            ],
            Vec::new(),
        );

        let msg = encode_turn(&snapshot).unwrap();
        assert_eq!(msg.robots.len(), 2);
    }

    #[test]
    fn test_only_in_flight_bullets_encode() {
        // The first two states are in flight, everything after has resolved.
        let snapshot = TurnSnapshot::new(
            3,
            Vec::new(),
            vec![
                bullet(0, BulletLifeState::Fired),
                bullet(1, BulletLifeState::Moving),
                bullet(2, BulletLifeState::HitVictim),
                bullet(3, BulletLifeState::HitBullet),
                bullet(4, BulletLifeState::HitWall),
                bullet(5, BulletLifeState::Exploded),
                bullet(6, BulletLifeState::Inactive),
            ],
        );

        let msg = encode_turn(&snapshot).unwrap();
        let ids: Vec<i32> = msg.bullets.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn test_empty_snapshot_is_valid() {
        let snapshot = TurnSnapshot::new(1, Vec::new(), Vec::new());
        let msg = encode_turn(&snapshot).unwrap();
        assert_eq!(msg.turn, 1);
        assert!(msg.robots.is_empty());
        assert!(msg.bullets.is_empty());
    }

    #[test]
    fn test_setup_keeps_snapshot_order_and_colors() {
        let snapshot = TurnSnapshot::new(
            1,
            vec![
                robot("First", RobotLifeState::Active),
                robot("Second", RobotLifeState::Dead),
            ],
            Vec::new(),
        );

        let setup = encode_setup(FieldDimensions::new(800, 600), &snapshot);
        assert_eq!(setup.field_width, 800);
        assert_eq!(setup.field_height, 600);
        // Setup lists every robot present at battle start, dead or not.
        assert_eq!(setup.robots.len(), 2);
        assert_eq!(setup.robots[0].name, "First");
        assert_eq!(setup.robots[1].name, "Second");
        assert_eq!(setup.robots[0].body_color, Rgb::new(10, 20, 30));
    }

    #[test]
    fn test_empty_name_rejects_snapshot() {
        let snapshot = TurnSnapshot::new(
            2,
            vec![
                robot("A", RobotLifeState::Active),
                robot("", RobotLifeState::Active),
            ],
            Vec::new(),
        );

        let err = encode_turn(&snapshot).unwrap_err();
        assert_eq!(err, EncodeError::MissingRobotName { index: 1 });
    }

    #[test]
    fn test_non_finite_robot_field_rejects_snapshot() {
        let mut broken = robot("A", RobotLifeState::Active);
        broken.energy = f64::NAN;
        let snapshot = TurnSnapshot::new(2, vec![broken], Vec::new());

        let err = encode_turn(&snapshot).unwrap_err();
        assert_eq!(
            err,
            EncodeError::NonFiniteRobotField {
                name: "A".to_string(),
                field: "energy",
            }
        );
    }

    #[test]
    fn test_non_finite_bullet_field_rejects_snapshot() {
        let mut broken = bullet(7, BulletLifeState::Moving);
        broken.x = f64::INFINITY;
        let snapshot = TurnSnapshot::new(2, Vec::new(), vec![broken]);

        let err = encode_turn(&snapshot).unwrap_err();
        assert_eq!(
            err,
            EncodeError::NonFiniteBulletField { id: 7, field: "x" }
        );
    }

    #[test]
    fn test_malformed_dead_robot_is_ignored() {
        // Dead robots are filtered before validation; a corrupt field on a
        // dead robot does not reject the turn.
        let mut dead = robot("B", RobotLifeState::Dead);
        dead.x = f64::NAN;
        let snapshot = TurnSnapshot::new(
            2,
            vec![robot("A", RobotLifeState::Active), dead],
            Vec::new(),
        );

        let msg = encode_turn(&snapshot).unwrap();
        assert_eq!(msg.robots.len(), 1);
    }

    #[test]
    fn test_end_to_end_scenario() {
        let snapshot = TurnSnapshot::new(
            5,
            vec![RobotSnapshot {
                name: "SittingDuck".to_string(),
                x: 400.0,
                y: 300.0,
                body_heading: 0.0,
                gun_heading: 0.0,
                radar_heading: 0.0,
                energy: 100.0,
                body_color: Rgb::default(),
                gun_color: Rgb::default(),
                radar_color: Rgb::default(),
                scan_color: Rgb::default(),
                state: RobotLifeState::Active,
            }],
            vec![BulletSnapshot {
                id: 1,
                x: 410.0,
                y: 300.0,
                power: 3.0,
                state: BulletLifeState::Fired,
            }],
        );

        let msg = encode_turn(&snapshot).unwrap();
        assert_eq!(msg.turn, 5);
        assert_eq!(msg.robots.len(), 1);
        let r = &msg.robots[0];
        assert_eq!(r.name, "SittingDuck");
        assert_eq!(r.x, 400.0);
        assert_eq!(r.y, 300.0);
        assert_eq!(r.body_heading, 0.0);
        assert_eq!(r.energy, 100.0);
        assert_eq!(msg.bullets.len(), 1);
        let b = &msg.bullets[0];
        assert_eq!(b.id, 1);
        assert_eq!(b.x, 410.0);
        assert_eq!(b.y, 300.0);
        assert_eq!(b.power, 3.0);
    }

    fn arb_robot_state() -> impl Strategy<Value = RobotLifeState> {
        prop_oneof![
            Just(RobotLifeState::Active),
            Just(RobotLifeState::HitWall),
            Just(RobotLifeState::HitRobot),
            Just(RobotLifeState::Dead),
        ]
    }

    proptest! {
        #[test]
        fn prop_encoded_robots_are_exactly_the_alive_ones_in_order(
            states in prop::collection::vec(arb_robot_state(), 0..24)
        ) {
            let robots: Vec<RobotSnapshot> = states
                .iter()
                .enumerate()
                .map(|(i, s)| robot(&format!("R{i}"), *s))
                .collect();
            let snapshot = TurnSnapshot::new(1, robots, Vec::new());

            let msg = encode_turn(&snapshot).unwrap();

            let expected: Vec<String> = states
                .iter()
                .enumerate()
                .filter(|(_, s)| s.is_alive())
                .map(|(i, _)| format!("R{i}"))
                .collect();
            let got: Vec<String> = msg.robots.iter().map(|r| r.name.clone()).collect();
            prop_assert_eq!(got, expected);
        }
    }
}
