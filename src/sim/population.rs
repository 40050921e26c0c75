//! Population management: spawning, visibility fade and recentering

use glam::Vec2;
use rand::Rng;

use super::blob::{Blob, Bounds};
use super::events::SimEvent;
use super::state::Simulation;
use crate::settings::Settings;

/// Spawn radius skewed toward small blobs.
///
/// `min_factor * initial_radius * max_factor^(u²)`: the smallest spawn is
/// just under the controlled blob's starting size, and squaring `u` makes
/// the rare large spawns (up to `max_factor` times that) a long tail.
pub fn creation_radius<R: Rng>(rng: &mut R, settings: &Settings) -> f32 {
    let u: f32 = rng.random();
    settings.spawn_radius_min_factor
        * settings.initial_radius
        * settings.spawn_radius_max_factor.powf(u * u)
}

/// Uniform point on the arena perimeter (edge chosen uniformly, then position along it)
pub fn border_position<R: Rng>(rng: &mut R, bounds: Bounds) -> Vec2 {
    let x: f32 = rng.random_range(0.0..4.0);
    let t = x.fract();
    match x as u32 {
        0 => Vec2::new(0.0, bounds.height * t),
        1 => Vec2::new(bounds.width * t, 0.0),
        2 => Vec2::new(bounds.width, bounds.height * t),
        _ => Vec2::new(bounds.width * t, bounds.height),
    }
}

/// Small random starting velocity
pub fn starting_velocity<R: Rng>(rng: &mut R, speed: f32) -> Vec2 {
    if speed <= 0.0 {
        return Vec2::ZERO;
    }
    Vec2::new(
        rng.random_range(-speed..speed),
        rng.random_range(-speed..speed),
    )
}

/// Opacity of `peer` as seen by the controlled blob.
///
/// Smaller peers only show up closer in: the distance ratio is scaled by
/// `sqrt(peer_radius / reference_radius)`.
pub fn visibility(peer: &Blob, controlled: &Blob, settings: &Settings) -> f32 {
    let view = settings.view_distance(controlled.radius());
    let reach = view * (peer.radius() / settings.initial_radius).sqrt();
    if reach <= 0.0 {
        return 0.0;
    }
    let distance = controlled.surface_distance(peer);
    (1.0 - distance / reach).clamp(0.0, 1.0)
}

impl Simulation {
    /// Autonomous blob count
    pub fn population(&self) -> usize {
        self.blobs.len()
    }

    /// Maybe spawn one blob on the perimeter, never exceeding the cap
    pub fn try_spawn(&mut self) -> Option<u32> {
        if self.blobs.len() >= self.settings.max_population {
            return None;
        }
        if !self.rng.random_bool(self.settings.spawn_chance) {
            return None;
        }
        self.add_blob()
    }

    /// Spawn one random blob on the perimeter now, if under the cap
    pub fn add_blob(&mut self) -> Option<u32> {
        if self.blobs.len() >= self.settings.max_population {
            return None;
        }
        let radius = creation_radius(&mut self.rng, &self.settings);
        let pos = border_position(&mut self.rng, self.bounds);
        let vel = starting_velocity(&mut self.rng, self.settings.spawn_speed);

        let id = self.next_entity_id();
        let mut blob = Blob::new(id, radius, pos, vel, false);
        if let Some(player) = &self.controlled {
            blob.alpha = visibility(&blob, player, &self.settings);
        }
        log::debug!("Spawned blob {} (r={:.2}) at {:?}", id, radius, pos);
        self.blobs.push(blob);
        self.events.push(SimEvent::Spawned {
            id,
            controlled: false,
        });
        Some(id)
    }

    /// Refresh every blob's opacity.
    ///
    /// With a controlled blob alive, opacity follows distance. Without one,
    /// everything fades toward fully visible by at most `reveal_rate` per tick.
    pub(crate) fn update_visibility(&mut self) {
        match &mut self.controlled {
            Some(player) => {
                player.alpha = 1.0;
                for blob in &mut self.blobs {
                    blob.alpha = visibility(blob, player, &self.settings);
                }
            }
            None => {
                let step = self.settings.reveal_rate;
                for blob in &mut self.blobs {
                    blob.alpha = (blob.alpha + step).min(1.0);
                }
            }
        }
    }

    /// Zero total momentum and move the centre of mass to the arena centre.
    ///
    /// A pure change of reference frame: every blob gets the same velocity
    /// and position shift, so relative motion is untouched.
    pub fn recenter(&mut self) {
        let mut total_mass = 0.0;
        let mut momentum = Vec2::ZERO;
        let mut weighted_pos = Vec2::ZERO;
        for blob in self.all_blobs() {
            total_mass += blob.mass();
            momentum += blob.momentum();
            weighted_pos += blob.pos * blob.mass();
        }
        if total_mass <= 0.0 {
            return;
        }

        let vel_shift = -momentum / total_mass;
        let pos_shift = self.bounds.center() - weighted_pos / total_mass;
        for blob in self.blobs.iter_mut().chain(self.controlled.iter_mut()) {
            blob.vel += vel_shift;
            blob.pos += pos_shift;
        }
        log::debug!("Recentered by {:?}, velocity shift {:?}", pos_shift, vel_shift);
    }
}
