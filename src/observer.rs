//! Presentation-side reaction to simulation events
//!
//! The simulation never renders or plays sounds. Observers receive its
//! events after each tick and keep their own per-blob resources in step.

use std::collections::HashMap;

use crate::sim::{SimEvent, Simulation};

/// Receives simulation events in emission order
pub trait SimObserver {
    fn on_event(&mut self, event: &SimEvent);
}

impl Simulation {
    /// Drain pending events into `observer`, returning how many were delivered
    pub fn dispatch_events<O: SimObserver + ?Sized>(&mut self, observer: &mut O) -> usize {
        let events = self.drain_events();
        for event in &events {
            observer.on_event(event);
        }
        events.len()
    }
}

/// Logs every event and keeps simple tallies
#[derive(Debug, Default)]
pub struct LogObserver {
    pub spawns: u64,
    pub merges: u64,
    pub deaths: u64,
}

impl SimObserver for LogObserver {
    fn on_event(&mut self, event: &SimEvent) {
        match event {
            SimEvent::Spawned { id, controlled } => {
                self.spawns += 1;
                log::debug!("spawned {} (controlled: {})", id, controlled);
            }
            SimEvent::Merged {
                survivor, absorbed, ..
            } => {
                self.merges += 1;
                log::debug!("merged {:?} into {}", absorbed, survivor);
            }
            SimEvent::ControlledDied { eaten_by } => {
                self.deaths += 1;
                log::info!("controlled blob eaten by {}", eaten_by);
            }
        }
    }
}

/// Opaque per-blob presentation handles.
///
/// A handle is created for every id that enters the arena and released for
/// every id that leaves it, so the table always mirrors the live blob set.
pub struct HandleTable<H> {
    handles: HashMap<u32, H>,
    create: Box<dyn FnMut(u32) -> H>,
    released: Vec<H>,
}

impl<H> HandleTable<H> {
    pub fn new(create: impl FnMut(u32) -> H + 'static) -> Self {
        Self {
            handles: HashMap::new(),
            create: Box::new(create),
            released: Vec::new(),
        }
    }

    pub fn get(&self, id: u32) -> Option<&H> {
        self.handles.get(&id)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Ids that currently hold a handle, sorted
    pub fn ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.handles.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Take handles released since the last call so the owner can free them
    pub fn take_released(&mut self) -> Vec<H> {
        std::mem::take(&mut self.released)
    }
}

impl<H> SimObserver for HandleTable<H> {
    fn on_event(&mut self, event: &SimEvent) {
        for id in event.released_ids() {
            match self.handles.remove(id) {
                Some(handle) => self.released.push(handle),
                None => log::warn!("release for unknown blob {}", id),
            }
        }
        if let Some(id) = event.created_id() {
            let handle = (self.create)(id);
            self.handles.insert(id, handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{InteractionMode, Settings};
    use glam::Vec2;

    fn live_ids(sim: &Simulation) -> Vec<u32> {
        let mut ids: Vec<u32> = sim.all_blobs().map(|b| b.id).collect();
        ids.sort_unstable();
        ids
    }

    #[test]
    fn test_handles_follow_merges() {
        let mut sim = Simulation::new(Settings {
            spawn_chance: 0.0,
            ..Default::default()
        })
        .unwrap();
        let mut table = HandleTable::new(|id| format!("blob-{id}"));

        let a = sim.insert_blob(3.0, Vec2::new(400.0, 300.0), Vec2::ZERO);
        let b = sim.insert_blob(4.0, Vec2::new(405.0, 300.0), Vec2::ZERO);
        assert_eq!(sim.dispatch_events(&mut table), 2);
        assert_eq!(table.ids(), vec![a, b]);

        sim.tick();
        sim.dispatch_events(&mut table);

        assert_eq!(table.ids(), live_ids(&sim));
        let mut released = table.take_released();
        released.sort();
        assert_eq!(released, vec![format!("blob-{a}"), format!("blob-{b}")]);
        assert!(table.take_released().is_empty());
    }

    #[test]
    fn test_handles_mirror_live_set_over_long_run() {
        let mut sim = Simulation::new(Settings {
            seed: 42,
            spawn_chance: 0.3,
            max_population: 12,
            interaction: InteractionMode::Attract,
            ..Default::default()
        })
        .unwrap();
        let mut table = HandleTable::new(|id| id);
        let mut log = LogObserver::default();
        sim.spawn_controlled();

        for t in 0..1500 {
            if t % 300 == 0 {
                sim.spawn_controlled();
            }
            sim.set_direction_intent(t % 100 < 50, t % 100 >= 50, t % 70 < 35, t % 70 >= 35);
            sim.tick();
            for event in sim.drain_events() {
                table.on_event(&event);
                log.on_event(&event);
            }
            assert_eq!(table.ids(), live_ids(&sim));
        }
        assert!(log.spawns > 0);
        assert!(log.merges > 0);
    }

    #[test]
    fn test_log_observer_counts_deaths() {
        let mut log = LogObserver::default();
        log.on_event(&SimEvent::ControlledDied { eaten_by: 3 });
        assert_eq!(log.deaths, 1);
    }
}
