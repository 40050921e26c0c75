//! Blob Arena - a 2D arena of merging, gravitating blobs
//!
//! Core modules:
//! - `sim`: Simulation engine (integration, pairwise forces, merging, population)
//! - `settings`: Field parameters and tuning constants
//! - `clock`: Fixed-rate tick scheduling
//! - `observer`: Presentation-side reaction to simulation events

pub mod clock;
pub mod observer;
pub mod settings;
pub mod sim;

pub use clock::FixedClock;
pub use settings::{BoundaryMode, InteractionMode, Settings, SettingsError};
pub use sim::{Blob, DirectionIntent, SimEvent, Simulation};

use glam::Vec2;

/// Simulation configuration constants
pub mod consts {
    /// Default simulation tick rate (ticks per second)
    pub const SIM_HZ: f32 = 50.0;
    /// Maximum ticks run per clock advance to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Largest wall-clock step the clock will accept in one advance (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Default arena extent
    pub const ARENA_WIDTH: f32 = 800.0;
    pub const ARENA_HEIGHT: f32 = 600.0;

    /// Component magnitude of a normalized diagonal direction
    pub const DIAGONAL: f32 = std::f32::consts::FRAC_1_SQRT_2;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Unit direction from `to` toward `from` and the distance between them.
///
/// Coincident points have no defined direction; they report the fixed `+X`
/// axis and a zero distance so callers never divide by a NaN length.
#[inline]
pub fn separation(from: Vec2, to: Vec2) -> (Vec2, f32) {
    let delta = from - to;
    let distance = delta.length();
    if distance > f32::EPSILON {
        (delta / distance, distance)
    } else {
        (Vec2::X, 0.0)
    }
}
