//! Battle Relay Demo
//!
//! Runs a scripted battle through the full observer pipeline: a simulation
//! task publishes snapshots faster than the display rate, the relay
//! throttles and encodes them, and a consumer loop polls the sink.

use std::f64::consts::TAU;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use battle_relay::snapshot::{
    BulletLifeState, BulletSnapshot, Rgb, RobotLifeState, RobotSnapshot,
};
use battle_relay::{
    BattleEventDispatcher, BattleRelay, DisplayState, FieldDimensions, FrameMessage, TurnSnapshot,
    DISPLAY_TICK_RATE, VERSION,
};
use battle_relay::observer::FixedDisplay;

/// Simulation turns in the scripted battle.
const BATTLE_TURNS: u32 = 400;

/// Simulation turn period; 4x faster than the display rate, so the gate
/// visibly drops turns.
const TURN_PERIOD: Duration = Duration::from_millis(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    info!("Battle Relay v{}", VERSION);
    info!("Display Tick Rate: {} Hz", DISPLAY_TICK_RATE);

    demo_battle().await;
    Ok(())
}

/// Scripted two-robot battle observed through the relay.
async fn demo_battle() {
    info!("=== Starting Demo Battle ===");

    let field = FieldDimensions::new(800, 600);
    let dispatcher = Arc::new(BattleEventDispatcher::new());

    let probe = Arc::new(FixedDisplay(DisplayState::visible(
        field.width as i32,
        field.height as i32,
    )));
    let mut relay = BattleRelay::new(probe, DISPLAY_TICK_RATE);
    relay.setup(field, &dispatcher);

    // Simulation task: publishes a snapshot per turn, faster than the
    // display rate.
    let sim = tokio::spawn({
        let dispatcher = Arc::clone(&dispatcher);
        async move {
            dispatcher.battle_started();
            for turn in 1..=BATTLE_TURNS {
                dispatcher.turn_ended(Arc::new(scripted_snapshot(turn)));
                tokio::time::sleep(TURN_PERIOD).await;
            }
            dispatcher.battle_finished();
        }
    });

    // Consumer loop: poll the sink at the display rate and report what the
    // renderer would see.
    let sink = Arc::clone(relay.sink());
    let mut last_turn = 0;
    let mut frames_seen = 0;
    let mut poll = tokio::time::interval(Duration::from_millis(20));
    for _ in 0..(BATTLE_TURNS as u64 * TURN_PERIOD.as_millis() as u64 / 20 + 10) {
        poll.tick().await;
        match sink.read() {
            Some(FrameMessage::Setup(setup)) => {
                if frames_seen == 0 {
                    info!(
                        "setup: {}x{} with {} robots",
                        setup.field_width,
                        setup.field_height,
                        setup.robots.len()
                    );
                    frames_seen += 1;
                }
            }
            Some(FrameMessage::Turn(msg)) if msg.turn != last_turn => {
                last_turn = msg.turn;
                frames_seen += 1;
                if msg.turn % 50 == 0 {
                    info!(
                        "turn {}: {} robots, {} bullets",
                        msg.turn,
                        msg.robots.len(),
                        msg.bullets.len()
                    );
                }
            }
            _ => {}
        }
    }

    sim.await.ok();
    relay.dispose();

    info!("=== Battle Finished ===");
    info!(
        "Observed {} distinct frames of {} simulation turns (rest dropped by the gate)",
        frames_seen, BATTLE_TURNS
    );
}

/// Build the snapshot for one scripted turn: two robots circling the field
/// center, one bullet in flight on every fourth turn.
fn scripted_snapshot(turn: u32) -> TurnSnapshot {
    let phase = f64::from(turn) / f64::from(BATTLE_TURNS) * TAU;

    let spinner = RobotSnapshot {
        name: "SpinBot".to_string(),
        x: 400.0 + 150.0 * phase.cos(),
        y: 300.0 + 150.0 * phase.sin(),
        body_heading: phase,
        gun_heading: phase / 2.0,
        radar_heading: phase * 2.0 % TAU,
        energy: 100.0 - f64::from(turn) * 0.1,
        body_color: Rgb::new(0, 64, 0),
        gun_color: Rgb::new(128, 128, 128),
        radar_color: Rgb::new(0, 0, 128),
        scan_color: Rgb::new(0, 255, 0),
        // Scripted destruction near the end of the battle.
        state: if turn > BATTLE_TURNS - 20 {
            RobotLifeState::Dead
        } else {
            RobotLifeState::Active
        },
    };

    let tracker = RobotSnapshot {
        name: "Tracker".to_string(),
        x: 400.0 - 100.0 * phase.cos(),
        y: 300.0 - 100.0 * phase.sin(),
        body_heading: (phase + TAU / 2.0) % TAU,
        gun_heading: phase,
        radar_heading: phase,
        energy: 100.0,
        body_color: Rgb::new(64, 0, 0),
        gun_color: Rgb::new(128, 128, 128),
        radar_color: Rgb::new(128, 0, 0),
        scan_color: Rgb::new(255, 0, 0),
        state: RobotLifeState::Active,
    };

    let bullets = if turn % 4 == 0 {
        vec![BulletSnapshot {
            id: (turn / 4) as i32,
            x: tracker.x + 20.0 * phase.cos(),
            y: tracker.y + 20.0 * phase.sin(),
            power: 3.0,
            state: BulletLifeState::Moving,
        }]
    } else {
        Vec::new()
    };

    TurnSnapshot::new(turn, vec![spinner, tracker], bullets)
}
