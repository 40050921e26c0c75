//! Field parameters and tuning constants
//!
//! Loaded from JSON on native builds, validated once at the boundary so a
//! tick never has to second-guess its inputs.

use std::{error::Error, fmt, path::Path};

use serde::{Deserialize, Serialize};

use crate::consts::{ARENA_HEIGHT, ARENA_WIDTH, SIM_HZ};

/// Pairwise inverse-square field between blobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum InteractionMode {
    #[default]
    None,
    /// Blobs pull on each other (gravity)
    Attract,
    /// Blobs push each other apart
    Repel,
}

impl InteractionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InteractionMode::None => "None",
            InteractionMode::Attract => "Attract",
            InteractionMode::Repel => "Repel",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "none" | "off" => Some(InteractionMode::None),
            "attract" | "gravity" => Some(InteractionMode::Attract),
            "repel" | "repulsion" => Some(InteractionMode::Repel),
            _ => None,
        }
    }

    pub fn is_active(&self) -> bool {
        *self != InteractionMode::None
    }
}

/// What happens when a blob leaves the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryMode {
    /// Soft spring pulls the blob back in
    #[default]
    Bounce,
    /// Blob reappears on the opposite edge
    Wrap,
}

impl BoundaryMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BoundaryMode::Bounce => "Bounce",
            BoundaryMode::Wrap => "Wrap",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bounce" => Some(BoundaryMode::Bounce),
            "wrap" | "teleport" => Some(BoundaryMode::Wrap),
            _ => None,
        }
    }
}

/// Reasons a configuration is refused
#[derive(Debug)]
pub enum SettingsError {
    Io(std::io::Error),
    Parse(serde_json::Error),
    InvalidArena { width: f32, height: f32 },
    InvalidTickRate(f32),
    InvalidRadius { name: &'static str, value: f32 },
    InvalidProbability { name: &'static str, value: f64 },
    InvalidCoefficient { name: &'static str, value: f32 },
    InvalidSpawnFactors { min: f32, max: f32 },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(e) => write!(f, "failed to read settings: {e}"),
            SettingsError::Parse(e) => write!(f, "failed to parse settings: {e}"),
            SettingsError::InvalidArena { width, height } => {
                write!(f, "arena must be positive and finite, got {width}x{height}")
            }
            SettingsError::InvalidTickRate(hz) => {
                write!(f, "tick_rate_hz must be positive and finite, got {hz}")
            }
            SettingsError::InvalidRadius { name, value } => {
                write!(f, "{name} must be positive and finite, got {value}")
            }
            SettingsError::InvalidProbability { name, value } => {
                write!(f, "{name} must be within [0,1], got {value}")
            }
            SettingsError::InvalidCoefficient { name, value } => {
                write!(f, "{name} must be finite and non-negative, got {value}")
            }
            SettingsError::InvalidSpawnFactors { min, max } => write!(
                f,
                "spawn radius factors must be positive and ordered, got min {min} max {max}"
            ),
        }
    }
}

impl Error for SettingsError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SettingsError::Io(e) => Some(e),
            SettingsError::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for SettingsError {
    fn from(err: std::io::Error) -> Self {
        SettingsError::Io(err)
    }
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Parse(err)
    }
}

/// Simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// RNG seed for the run
    pub seed: u64,
    /// Ticks per second
    pub tick_rate_hz: f32,

    // === Arena ===
    pub width: f32,
    pub height: f32,
    /// Active boundary response
    pub boundary: BoundaryMode,
    /// Spring constant pulling escaped blobs back
    pub border_elasticity: f32,

    // === Field ===
    pub interaction: InteractionMode,
    /// Strength constant used in Attract mode
    pub gravity_strength: f32,
    /// Strength constant used in Repel mode
    pub repulsion_strength: f32,
    /// Viscous drag (also gates self-propulsion)
    pub drag_enabled: bool,
    pub drag_coefficient: f32,
    /// Velocity gained per tick per unit of applied force
    pub speed_up: f32,

    // === Blobs ===
    /// Controlled blob spawn radius, also the reference scale for spawns and visibility
    pub initial_radius: f32,
    /// Per-tick chance a wandering blob picks a new direction
    pub wander_turn_chance: f64,
    /// Per-tick chance a blob starts or stops wandering
    pub wander_toggle_chance: f64,
    /// Slow shrinking of blobs above `min_radius`
    pub hunger_enabled: bool,
    pub appetite: f32,
    pub min_radius: f32,

    // === Population ===
    /// Maximum number of autonomous blobs
    pub max_population: usize,
    /// Per-tick chance of spawning one blob while under the cap
    pub spawn_chance: f64,
    /// Spawn velocity components are drawn from [-spawn_speed, spawn_speed)
    pub spawn_speed: f32,
    /// Smallest spawn radius as a multiple of `initial_radius`
    pub spawn_radius_min_factor: f32,
    /// Growth factor reached by the rarest (largest) spawns
    pub spawn_radius_max_factor: f32,

    // === Visibility ===
    /// View distance per unit of `initial_radius`
    pub view_base_factor: f32,
    /// Additional view distance per unit of controlled radius
    pub view_growth_factor: f32,
    /// Per-tick alpha increase while revealing after death
    pub reveal_rate: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: 0,
            tick_rate_hz: SIM_HZ,

            width: ARENA_WIDTH,
            height: ARENA_HEIGHT,
            boundary: BoundaryMode::Bounce,
            border_elasticity: 0.005,

            interaction: InteractionMode::None,
            gravity_strength: 0.5,
            repulsion_strength: 0.5,
            drag_enabled: true,
            drag_coefficient: 0.004,
            speed_up: 0.5,

            initial_radius: 10.0,
            wander_turn_chance: 0.05,
            wander_toggle_chance: 0.007,
            hunger_enabled: false,
            appetite: 0.0005,
            min_radius: 10.0,

            max_population: 10,
            spawn_chance: 0.01,
            spawn_speed: 2.0,
            spawn_radius_min_factor: 0.8,
            spawn_radius_max_factor: 5.0,

            view_base_factor: 10.0,
            view_growth_factor: 5.0,
            reveal_rate: 0.02,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON. Missing fields take defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.as_ref().display());
        Ok(settings)
    }

    /// Signed strength constant of the active pairwise field.
    ///
    /// Positive pulls blobs together, negative pushes them apart.
    pub fn pairwise_strength(&self) -> f32 {
        match self.interaction {
            InteractionMode::None => 0.0,
            InteractionMode::Attract => self.gravity_strength,
            InteractionMode::Repel => -self.repulsion_strength,
        }
    }

    /// How far the controlled blob can see at the given radius
    pub fn view_distance(&self, controlled_radius: f32) -> f32 {
        self.initial_radius * self.view_base_factor + controlled_radius * self.view_growth_factor
    }

    pub fn validate(&self) -> Result<(), SettingsError> {
        validate_arena(self.width, self.height)?;
        if !(self.tick_rate_hz.is_finite() && self.tick_rate_hz > 0.0) {
            return Err(SettingsError::InvalidTickRate(self.tick_rate_hz));
        }
        for (name, value) in [
            ("initial_radius", self.initial_radius),
            ("min_radius", self.min_radius),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(SettingsError::InvalidRadius { name, value });
            }
        }
        for (name, value) in [
            ("spawn_chance", self.spawn_chance),
            ("wander_turn_chance", self.wander_turn_chance),
            ("wander_toggle_chance", self.wander_toggle_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(SettingsError::InvalidProbability { name, value });
            }
        }
        for (name, value) in [
            ("border_elasticity", self.border_elasticity),
            ("gravity_strength", self.gravity_strength),
            ("repulsion_strength", self.repulsion_strength),
            ("drag_coefficient", self.drag_coefficient),
            ("speed_up", self.speed_up),
            ("spawn_speed", self.spawn_speed),
            ("view_base_factor", self.view_base_factor),
            ("view_growth_factor", self.view_growth_factor),
            ("reveal_rate", self.reveal_rate),
        ] {
            if !(value.is_finite() && value >= 0.0) {
                return Err(SettingsError::InvalidCoefficient { name, value });
            }
        }
        // Appetite at or above 1 would shrink a blob to nothing in one tick
        if !(self.appetite.is_finite() && (0.0..1.0).contains(&self.appetite)) {
            return Err(SettingsError::InvalidCoefficient {
                name: "appetite",
                value: self.appetite,
            });
        }
        let (min, max) = (self.spawn_radius_min_factor, self.spawn_radius_max_factor);
        if !(min.is_finite() && max.is_finite() && min > 0.0 && max >= 1.0) {
            return Err(SettingsError::InvalidSpawnFactors { min, max });
        }
        Ok(())
    }
}

/// Arena dimensions must be positive and finite
pub fn validate_arena(width: f32, height: f32) -> Result<(), SettingsError> {
    if width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0 {
        Ok(())
    } else {
        Err(SettingsError::InvalidArena { width, height })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!(InteractionMode::from_str("Gravity"), Some(InteractionMode::Attract));
        assert_eq!(InteractionMode::from_str("repel"), Some(InteractionMode::Repel));
        assert_eq!(InteractionMode::from_str("sideways"), None);
        assert_eq!(BoundaryMode::from_str("TELEPORT"), Some(BoundaryMode::Wrap));
        assert_eq!(BoundaryMode::Bounce.as_str(), "Bounce");
    }

    #[test]
    fn test_pairwise_strength_sign() {
        let mut settings = Settings::default();
        assert_eq!(settings.pairwise_strength(), 0.0);
        settings.interaction = InteractionMode::Attract;
        assert!(settings.pairwise_strength() > 0.0);
        settings.interaction = InteractionMode::Repel;
        assert!(settings.pairwise_strength() < 0.0);
    }

    #[test]
    fn test_view_distance_grows_with_radius() {
        let settings = Settings::default();
        assert_eq!(settings.view_distance(10.0), 150.0);
        assert!(settings.view_distance(20.0) > settings.view_distance(10.0));
    }

    #[test]
    fn test_from_json_partial_uses_defaults() {
        let settings =
            Settings::from_json(r#"{ "max_population": 4, "interaction": "repel" }"#).unwrap();
        assert_eq!(settings.max_population, 4);
        assert_eq!(settings.interaction, InteractionMode::Repel);
        assert_eq!(settings.boundary, BoundaryMode::Bounce);
        assert_eq!(settings.initial_radius, 10.0);
    }

    #[test]
    fn test_from_json_rejects_zero_arena() {
        let err = Settings::from_json(r#"{ "width": 0.0 }"#).unwrap_err();
        assert!(matches!(err, SettingsError::InvalidArena { .. }));
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        let err = Settings::from_json("not json").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let mut settings = Settings::default();
        settings.spawn_chance = 1.5;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidProbability { name: "spawn_chance", .. })
        ));

        let mut settings = Settings::default();
        settings.drag_coefficient = -0.1;
        assert!(matches!(
            settings.validate(),
            Err(SettingsError::InvalidCoefficient { name: "drag_coefficient", .. })
        ));

        let mut settings = Settings::default();
        settings.initial_radius = 0.0;
        assert!(settings.validate().is_err());

        let mut settings = Settings::default();
        settings.tick_rate_hz = f32::NAN;
        assert!(matches!(settings.validate(), Err(SettingsError::InvalidTickRate(_))));
    }
}
