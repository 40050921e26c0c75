//! Simulation session state
//!
//! One `Simulation` owns every blob. All mutation goes through its methods;
//! configuration changes made between ticks take effect on the next tick.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::blob::{Blob, Bounds, DirectionIntent};
use super::events::SimEvent;
use super::population::visibility;
use crate::settings::{BoundaryMode, InteractionMode, Settings, SettingsError, validate_arena};

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct Simulation {
    /// Field parameters and tuning
    pub(crate) settings: Settings,
    /// Current arena extent
    pub(crate) bounds: Bounds,
    /// Latest movement intent for the controlled blob
    pub(crate) intent: DirectionIntent,
    /// Autonomous blobs
    pub(crate) blobs: Vec<Blob>,
    /// The controlled blob, if alive
    pub(crate) controlled: Option<Blob>,
    /// Simulation tick counter
    pub(crate) time_ticks: u64,
    pub(crate) rng: Pcg32,
    /// Events emitted since the last drain. Hosts drain after every tick.
    pub(crate) events: Vec<SimEvent>,
    /// Next entity ID
    next_id: u32,
}

impl Simulation {
    /// Create an empty arena. Settings are validated here, never mid-tick.
    pub fn new(settings: Settings) -> Result<Self, SettingsError> {
        if let Err(err) = settings.validate() {
            log::warn!("Rejected settings: {}", err);
            return Err(err);
        }
        Ok(Self {
            bounds: Bounds::new(settings.width, settings.height),
            rng: Pcg32::seed_from_u64(settings.seed),
            settings,
            intent: DirectionIntent::default(),
            blobs: Vec::new(),
            controlled: None,
            time_ticks: 0,
            events: Vec::new(),
            next_id: 1,
        })
    }

    /// Allocate a new entity ID
    pub(crate) fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }

    pub fn controlled(&self) -> Option<&Blob> {
        self.controlled.as_ref()
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    /// Every live blob, controlled one last
    pub fn all_blobs(&self) -> impl Iterator<Item = &Blob> {
        self.blobs.iter().chain(self.controlled.iter())
    }

    /// Sum of all live mass
    pub fn total_mass(&self) -> f32 {
        self.all_blobs().map(Blob::mass).sum()
    }

    /// Resize the arena (e.g. on viewport resize)
    pub fn set_bounds(&mut self, width: f32, height: f32) -> Result<(), SettingsError> {
        validate_arena(width, height)?;
        self.bounds = Bounds::new(width, height);
        self.settings.width = width;
        self.settings.height = height;
        Ok(())
    }

    pub fn set_direction_intent(&mut self, up: bool, down: bool, left: bool, right: bool) {
        self.intent = DirectionIntent::new(up, down, left, right);
    }

    pub fn set_interaction_mode(&mut self, mode: InteractionMode) {
        if self.settings.interaction != mode {
            log::info!("Interaction mode: {}", mode.as_str());
        }
        self.settings.interaction = mode;
    }

    pub fn set_drag_enabled(&mut self, enabled: bool) {
        self.settings.drag_enabled = enabled;
    }

    pub fn set_boundary_mode(&mut self, mode: BoundaryMode) {
        if self.settings.boundary != mode {
            log::info!("Boundary mode: {}", mode.as_str());
        }
        self.settings.boundary = mode;
    }

    /// Spawn the controlled blob at the arena centre.
    ///
    /// Returns the new id, or `None` if a controlled blob is already alive.
    pub fn spawn_controlled(&mut self) -> Option<u32> {
        if self.controlled.is_some() {
            return None;
        }
        let id = self.next_entity_id();
        let blob = Blob::new(
            id,
            self.settings.initial_radius,
            self.bounds.center(),
            glam::Vec2::ZERO,
            true,
        );
        self.controlled = Some(blob);
        self.events.push(SimEvent::Spawned { id, controlled: true });
        log::info!("Controlled blob {} spawned", id);
        Some(id)
    }

    /// Take every event emitted since the last drain, in emission order.
    ///
    /// Events buffer until drained, so call this (or `dispatch_events`)
    /// after every tick or batch of ticks.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Place a blob directly, bypassing the spawner
    pub fn insert_blob(&mut self, radius: f32, pos: glam::Vec2, vel: glam::Vec2) -> u32 {
        let id = self.next_entity_id();
        let mut blob = Blob::new(id, radius, pos, vel, false);
        if let Some(player) = &self.controlled {
            blob.alpha = visibility(&blob, player, &self.settings);
        }
        self.blobs.push(blob);
        self.events.push(SimEvent::Spawned { id, controlled: false });
        id
    }

    /// Place the controlled blob directly.
    ///
    /// Returns `None` if a controlled blob is already alive.
    pub fn insert_controlled(
        &mut self,
        radius: f32,
        pos: glam::Vec2,
        vel: glam::Vec2,
    ) -> Option<u32> {
        if self.controlled.is_some() {
            return None;
        }
        let id = self.next_entity_id();
        self.controlled = Some(Blob::new(id, radius, pos, vel, true));
        self.events.push(SimEvent::Spawned { id, controlled: true });
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_invalid_settings() {
        let settings = Settings {
            height: -1.0,
            ..Default::default()
        };
        assert!(Simulation::new(settings).is_err());
    }

    #[test]
    fn test_spawn_controlled_once() {
        let mut sim = Simulation::new(Settings::default()).unwrap();
        let id = sim.spawn_controlled().unwrap();
        assert_eq!(sim.spawn_controlled(), None);

        let player = sim.controlled().unwrap();
        assert_eq!(player.id, id);
        assert!(player.controlled);
        assert_eq!(player.pos, sim.bounds().center());
        assert_eq!(player.radius(), 10.0);
        assert_eq!(
            sim.drain_events(),
            vec![SimEvent::Spawned { id, controlled: true }]
        );
        assert!(sim.drain_events().is_empty());
    }

    #[test]
    fn test_set_bounds_validates() {
        let mut sim = Simulation::new(Settings::default()).unwrap();
        assert!(sim.set_bounds(0.0, 100.0).is_err());
        assert_eq!(sim.bounds(), Bounds::new(800.0, 600.0));
        sim.set_bounds(1024.0, 768.0).unwrap();
        assert_eq!(sim.bounds().center(), glam::Vec2::new(512.0, 384.0));
    }

    #[test]
    fn test_insert_controlled_keeps_live_blob() {
        let mut sim = Simulation::new(Settings::default()).unwrap();
        let id = sim.spawn_controlled().unwrap();
        assert_eq!(
            sim.insert_controlled(5.0, glam::Vec2::ZERO, glam::Vec2::ZERO),
            None
        );
        assert_eq!(sim.controlled().unwrap().id, id);
        assert_eq!(sim.drain_events().len(), 1);
    }

    #[test]
    fn test_ids_are_unique() {
        let mut sim = Simulation::new(Settings::default()).unwrap();
        let a = sim.insert_blob(5.0, glam::Vec2::ZERO, glam::Vec2::ZERO);
        let b = sim.insert_blob(5.0, glam::Vec2::ZERO, glam::Vec2::ZERO);
        let c = sim.spawn_controlled().unwrap();
        assert!(a != b && b != c && a != c);
        assert_eq!(sim.all_blobs().count(), 3);
        assert!((sim.total_mass() - 1250.0).abs() < 1e-3);
    }
}
