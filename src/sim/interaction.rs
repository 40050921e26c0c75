//! Pairwise interaction pass
//!
//! One O(n²/2) sweep per tick resolves every pair exactly once: overlapping
//! pairs merge, separated pairs exchange inverse-square forces.
//!
//! Merges resolve sequentially within the sweep. When slot `i` absorbs slot
//! `j`, the merged blob stays in slot `i` and keeps testing against later
//! slots with its new radius and position, so a three-way pile-up resolves
//! as a chain whose outcome depends on slot order. There is no second pass
//! to reach a fixed point within the tick.

use super::blob::Blob;
use super::events::SimEvent;
use super::state::Simulation;
use crate::separation;

/// Accumulate the inverse-square force between `a` and `b`.
///
/// Positive `strength` pulls the pair together, negative pushes them apart.
/// Coincident centres are treated as touching along the `+X` axis.
pub fn apply_pairwise_force(a: &mut Blob, b: &mut Blob, strength: f32) {
    if strength == 0.0 {
        return;
    }
    let (dir, mut distance) = separation(a.pos, b.pos);
    if distance <= f32::EPSILON {
        distance = (a.radius() + b.radius()).max(1.0);
    }
    let magnitude = strength * a.mass() * b.mass() / (distance * distance);
    let force = dir * magnitude;
    a.pairwise_force -= force;
    b.pairwise_force += force;
}

/// Mutable references to two distinct slots
fn pair_mut(blobs: &mut [Blob], i: usize, j: usize) -> (&mut Blob, &mut Blob) {
    debug_assert!(i < j);
    let (head, tail) = blobs.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}

impl Simulation {
    /// Advance every autonomous blob and resolve all pairs, then compact.
    pub(crate) fn resolve_interactions(&mut self) {
        let strength = self.settings.pairwise_strength();
        let n = self.blobs.len();
        let mut removed = vec![false; n];

        for i in 0..n {
            if removed[i] {
                continue;
            }

            self.blobs[i].wander(&mut self.rng, &self.settings);
            self.blobs[i].advance(&self.settings, self.bounds);

            if self.resolve_against_controlled(i, strength) {
                removed[i] = true;
                continue;
            }

            for j in (i + 1)..n {
                if removed[j] {
                    continue;
                }
                if self.blobs[i].surface_distance(&self.blobs[j]) < 0.0 {
                    let id = self.next_entity_id();
                    let (a, b) = (&self.blobs[i], &self.blobs[j]);
                    let (eater, eaten) = if a.bigger_than(b) { (a, b) } else { (b, a) };
                    let merged = eater.consume(eaten, id, false);
                    log::debug!("Blob {} absorbed {} into {}", eater.id, eaten.id, id);
                    self.events.push(SimEvent::Merged {
                        survivor: id,
                        absorbed: [eater.id, eaten.id],
                        controlled: false,
                    });
                    self.blobs[i] = merged;
                    removed[j] = true;
                } else {
                    let (a, b) = pair_mut(&mut self.blobs, i, j);
                    apply_pairwise_force(a, b, strength);
                }
            }
        }

        self.compact(&removed);
    }

    /// Test slot `i` against the controlled blob.
    ///
    /// Returns true when the controlled blob absorbed slot `i`. If slot `i`
    /// absorbs the controlled blob instead, the merged blob takes slot `i`
    /// and the controlled blob is gone.
    fn resolve_against_controlled(&mut self, i: usize, strength: f32) -> bool {
        let Some(player) = self.controlled.as_mut() else {
            return false;
        };
        let other = &mut self.blobs[i];

        if player.surface_distance(other) >= 0.0 {
            apply_pairwise_force(player, other, strength);
            return false;
        }

        let player_wins = player.bigger_than(other);
        let id = self.next_entity_id();
        let Some(player) = self.controlled.take() else {
            return false;
        };
        let other = &self.blobs[i];

        if player_wins {
            let mut merged = player.consume(other, id, true);
            merged.force = player.force;
            self.events.push(SimEvent::Merged {
                survivor: id,
                absorbed: [player.id, other.id],
                controlled: true,
            });
            log::debug!("Controlled blob grew to radius {:.2}", merged.radius());
            self.controlled = Some(merged);
            true
        } else {
            let merged = other.consume(&player, id, false);
            self.events.push(SimEvent::Merged {
                survivor: id,
                absorbed: [other.id, player.id],
                controlled: false,
            });
            self.events.push(SimEvent::ControlledDied { eaten_by: id });
            log::info!("Controlled blob {} eaten by blob {}", player.id, id);
            self.blobs[i] = merged;
            false
        }
    }

    /// Drop absorbed slots, keeping survivors in order
    fn compact(&mut self, removed: &[bool]) {
        let blobs = std::mem::take(&mut self.blobs);
        self.blobs = blobs
            .into_iter()
            .zip(removed)
            .filter_map(|(blob, &gone)| (!gone).then_some(blob))
            .collect();
    }
}
