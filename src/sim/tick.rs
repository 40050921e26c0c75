//! Fixed timestep simulation tick
//!
//! Sequence: spawn, controlled blob, interaction sweep (wander, integrate,
//! merge, pairwise forces), compaction, visibility. A tick runs to
//! completion before anything outside the simulation sees the state.

use super::state::Simulation;

impl Simulation {
    /// Advance the simulation by one fixed step
    pub fn tick(&mut self) {
        self.time_ticks += 1;

        self.try_spawn();

        if let Some(player) = self.controlled.as_mut() {
            player.update_controlled_force(self.intent);
            player.advance(&self.settings, self.bounds);
        }

        self.resolve_interactions();
        self.update_visibility();
    }
}
