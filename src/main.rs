//! Blob Arena headless runner
//!
//! Runs the simulation at its fixed tick rate against a simulated frame
//! clock, steering the controlled blob with a scripted intent and
//! respawning it after death.
//!
//! Usage: `blob-arena [settings.json] [seconds]`

use blob_arena::observer::{HandleTable, LogObserver, SimObserver};
use blob_arena::{FixedClock, InteractionMode, Settings, Simulation};

/// Simulated display refresh rate driving the clock
const FRAME_HZ: f32 = 60.0;

fn main() {
    env_logger::init();
    log::info!("Blob Arena (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => match Settings::load(&path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("{}", e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };
    let seconds: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(30.0);

    let mut sim = match Simulation::new(settings) {
        Ok(sim) => sim,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };
    let mut clock = FixedClock::new(sim.settings().tick_rate_hz);
    let mut handles = HandleTable::new(|id| id);
    let mut stats = LogObserver::default();

    sim.spawn_controlled();

    let frames = (seconds * FRAME_HZ) as u32;
    for frame in 0..frames {
        let t = frame as f32 / FRAME_HZ;

        // Circle around the arena, switching fields every ten seconds
        let phase = (t * 0.5) as u32 % 4;
        sim.set_direction_intent(phase == 0, phase == 2, phase == 3, phase == 1);
        let mode = match (t / 10.0) as u32 % 3 {
            0 => InteractionMode::None,
            1 => InteractionMode::Attract,
            _ => InteractionMode::Repel,
        };
        sim.set_interaction_mode(mode);

        clock.drive(&mut sim, 1.0 / FRAME_HZ);

        for event in sim.drain_events() {
            handles.on_event(&event);
            stats.on_event(&event);
        }
        handles.take_released();

        if sim.controlled().is_none() && frame % (FRAME_HZ as u32 * 3) == 0 {
            sim.recenter();
            sim.spawn_controlled();
        }
    }

    let radius = sim.controlled().map(|b| b.radius());
    println!(
        "ticks: {}  blobs: {}  handles: {}  spawns: {}  merges: {}  deaths: {}  player radius: {:?}",
        sim.time_ticks(),
        sim.population(),
        handles.len(),
        stats.spawns,
        stats.merges,
        stats.deaths,
        radius
    );
}
