//! Simulation engine
//!
//! All physics lives here. This module must stay free of presentation:
//! - One fixed step per tick
//! - Seeded RNG only
//! - Merges and deaths surface as `SimEvent`s, never as side effects

pub mod blob;
pub mod events;
pub mod interaction;
pub mod population;
pub mod state;
pub mod tick;

pub use blob::{Blob, Bounds, DirectionIntent};
pub use events::SimEvent;
pub use interaction::apply_pairwise_force;
pub use population::{border_position, creation_radius, starting_velocity, visibility};
pub use state::Simulation;
