//! Blob entity: physical state and per-tick transitions
//!
//! Mass is always `radius³`. Merging conserves mass, momentum and the
//! centre of mass; nothing else in the engine creates or destroys mass
//! except the optional hunger shrink.

use glam::Vec2;
use rand::Rng;

use crate::consts::DIAGONAL;
use crate::polar_to_cartesian;
use crate::settings::{BoundaryMode, Settings};

/// Movement intent of the controlled blob, last write wins
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionIntent {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl DirectionIntent {
    pub fn new(up: bool, down: bool, left: bool, right: bool) -> Self {
        Self {
            up,
            down,
            left,
            right,
        }
    }

    /// Unit force for the held directions.
    ///
    /// Up wins over down and right over left when both are held. Diagonals
    /// are normalized so moving diagonally is no faster than along an axis.
    pub fn to_force(self) -> Vec2 {
        let y = if self.up {
            1.0
        } else if self.down {
            -1.0
        } else {
            0.0
        };
        let x = if self.right {
            1.0
        } else if self.left {
            -1.0
        } else {
            0.0
        };
        if x != 0.0 && y != 0.0 {
            Vec2::new(x * DIAGONAL, y * DIAGONAL)
        } else {
            Vec2::new(x, y)
        }
    }
}

/// Arena extent, origin at the bottom-left corner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

/// A blob entity
#[derive(Debug, Clone)]
pub struct Blob {
    pub id: u32,
    radius: f32,
    mass: f32,
    pub pos: Vec2,
    pub vel: Vec2,
    /// Self-propulsion intent (|force| <= 1)
    pub force: Vec2,
    /// Accumulated inverse-square forces, consumed by the next `advance`
    pub pairwise_force: Vec2,
    pub controlled: bool,
    /// Presentation opacity in [0, 1]
    pub alpha: f32,
    /// Autonomous blobs only: whether wander may change direction
    pub wandering: bool,
}

impl Blob {
    pub fn new(id: u32, radius: f32, pos: Vec2, vel: Vec2, controlled: bool) -> Self {
        assert!(
            radius.is_finite() && radius >= 0.0,
            "blob radius must be finite and non-negative, got {radius}"
        );
        Self {
            id,
            radius,
            mass: radius.powi(3),
            pos,
            vel,
            force: Vec2::ZERO,
            pairwise_force: Vec2::ZERO,
            controlled,
            alpha: 1.0,
            wandering: false,
        }
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    pub fn momentum(&self) -> Vec2 {
        self.vel * self.mass
    }

    /// Advance one tick: translate, drag, shrink, accelerate, boundary, reset pairwise force
    pub fn advance(&mut self, settings: &Settings, bounds: Bounds) {
        self.pos += self.vel;

        if settings.drag_enabled {
            self.apply_drag(settings.drag_coefficient);
        }
        if settings.hunger_enabled {
            self.hunger(settings.appetite, settings.min_radius);
        }

        // Self-propulsion only works against a medium
        if settings.drag_enabled {
            self.vel += settings.speed_up * self.force;
        }
        if settings.interaction.is_active() && self.mass > 0.0 {
            self.vel += self.pairwise_force / self.mass;
        }

        match settings.boundary {
            BoundaryMode::Bounce => self.border_bounce(settings.border_elasticity, bounds),
            BoundaryMode::Wrap => self.wrap(bounds),
        }

        self.pairwise_force = Vec2::ZERO;
    }

    /// Nonlinear viscous drag, stronger for bigger and faster blobs
    fn apply_drag(&mut self, coefficient: f32) {
        let k = coefficient * self.radius.sqrt();
        self.vel.x *= 1.0 - k * self.vel.x.abs();
        self.vel.y *= 1.0 - k * self.vel.y.abs();
    }

    /// Shrink slowly while above the floor radius
    fn hunger(&mut self, appetite: f32, min_radius: f32) {
        if self.radius > min_radius {
            self.set_radius((self.radius * (1.0 - appetite)).max(min_radius));
        }
    }

    fn set_radius(&mut self, radius: f32) {
        debug_assert!(radius >= 0.0);
        self.radius = radius;
        self.mass = radius.powi(3);
    }

    /// Spring the blob back once it has fully left the arena
    fn border_bounce(&mut self, elasticity: f32, bounds: Bounds) {
        let r = self.radius;
        if self.pos.x < -r {
            self.vel.x -= elasticity * (self.pos.x + r);
        } else if self.pos.x > bounds.width + r {
            self.vel.x -= elasticity * (self.pos.x - r - bounds.width);
        }

        if self.pos.y < -r {
            self.vel.y -= elasticity * (self.pos.y + r);
        } else if self.pos.y > bounds.height + r {
            self.vel.y -= elasticity * (self.pos.y - r - bounds.height);
        }
    }

    fn wrap(&mut self, bounds: Bounds) {
        self.pos = self.pos.rem_euclid(bounds.size());
    }

    /// Set the controlled blob's force from held directions
    pub fn update_controlled_force(&mut self, intent: DirectionIntent) {
        self.force = intent.to_force();
    }

    /// Random autonomous movement: occasionally turn while wandering,
    /// more rarely start or stop wandering. A blob that is not wandering
    /// keeps its last force.
    pub fn wander<R: Rng>(&mut self, rng: &mut R, settings: &Settings) {
        if self.wandering && rng.random_bool(settings.wander_turn_chance) {
            let angle = rng.random::<f32>() * std::f32::consts::TAU;
            let power = rng.random::<f32>();
            self.force = polar_to_cartesian(power, angle);
        }
        if rng.random_bool(settings.wander_toggle_chance) {
            self.wandering = !self.wandering;
        }
    }

    /// Ties go to `self`
    pub fn bigger_than(&self, other: &Blob) -> bool {
        self.radius >= other.radius
    }

    /// Centre distance minus both radii; negative means the blobs overlap
    pub fn surface_distance(&self, other: &Blob) -> f32 {
        self.pos.distance(other.pos) - (self.radius + other.radius)
    }

    /// Merge two blobs into a new one with a fresh id.
    ///
    /// Mass, momentum and centre of mass are conserved. Whether the result
    /// is the controlled blob is decided by the caller.
    pub fn consume(&self, other: &Blob, id: u32, controlled: bool) -> Blob {
        let total = self.mass + other.mass;
        // Two massless blobs meet halfway
        let weight = if total > 0.0 { other.mass / total } else { 0.5 };

        let pos = self.pos + (other.pos - self.pos) * weight;
        let vel = self.vel + (other.vel - self.vel) * weight;
        let radius = total.cbrt();

        let mut merged = Blob::new(id, radius, pos, vel, controlled);
        // Opacity never jumps on merge; visibility updates move it from here
        merged.alpha = self.alpha.max(other.alpha);
        debug_assert!(
            (merged.mass - total).abs() <= total * 1e-4,
            "merge lost mass: {} vs {}",
            merged.mass,
            total
        );
        merged
    }
}
