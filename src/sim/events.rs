//! Typed events emitted by the simulation for the presentation layer
//!
//! Events are buffered during a tick and drained afterwards, so observers
//! only ever see whole-tick state.

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimEvent {
    /// A blob entered the arena (by spawn, not by merge)
    Spawned { id: u32, controlled: bool },
    /// Two blobs merged into a new blob; both absorbed ids are gone
    Merged {
        survivor: u32,
        absorbed: [u32; 2],
        controlled: bool,
    },
    /// The controlled blob was eaten by `eaten_by`
    ControlledDied { eaten_by: u32 },
}

impl SimEvent {
    /// Ids whose presentation resources must be released
    pub fn released_ids(&self) -> &[u32] {
        match self {
            SimEvent::Merged { absorbed, .. } => absorbed,
            _ => &[],
        }
    }

    /// Id that needs a new presentation resource, if any
    pub fn created_id(&self) -> Option<u32> {
        match *self {
            SimEvent::Spawned { id, .. } => Some(id),
            SimEvent::Merged { survivor, .. } => Some(survivor),
            SimEvent::ControlledDied { .. } => None,
        }
    }
}
