//! Session configuration, validation, and error types.

use loam_core::{FlowerCatalog, GridError, ParseError, PollutionBounds};
use loam_grid::{GridLayout, RandomLayout, DEFAULT_POLLUTION};
use std::error::Error;
use std::fmt;

/// How the grid and agents are created at each reset.
#[derive(Clone, Debug, PartialEq)]
pub enum GridInit {
    /// Seeded random generation.
    Random(RandomLayout),
    /// Explicit declarative layout.
    Layout(GridLayout),
    /// Textual grid description, parsed strictly.
    Text(String),
}

/// What an agent receives, seed-wise, for harvesting a flower.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SeedReturnPolicy {
    /// A fixed number of seeds of the harvested type.
    Fixed(u32),
    /// No seeds are ever returned.
    Disabled,
    /// Uniform draw in `1..=4` from the session RNG at each harvest.
    RandomPerHarvest,
}

impl Default for SeedReturnPolicy {
    fn default() -> Self {
        Self::Fixed(1)
    }
}

/// Input for constructing a [`GardenSession`](crate::GardenSession).
///
/// Validated once at construction; an invalid configuration never
/// produces a session.
#[derive(Clone, Debug, PartialEq)]
pub struct SessionConfig {
    /// Grid initialization strategy.
    pub init: GridInit,
    /// Pollution floor, ceiling, and per-step increment.
    pub bounds: PollutionBounds,
    /// Flower-type catalog. Ignored by [`GridInit::Text`], which carries
    /// its own catalog in the file trailer.
    pub catalog: FlowerCatalog,
    /// Whether occupancy collisions are enforced. When `true` (the
    /// default), agents cannot share a cell and a move into an occupied
    /// cell fails silently; when `false`, cells may be shared.
    pub collisions: bool,
    /// Seeds granted on harvest.
    pub seed_return: SeedReturnPolicy,
    /// RNG seed used until the first explicit `reset(seed)`.
    pub seed: u64,
}

impl SessionConfig {
    /// A config with the given init strategy and default everything else.
    pub fn new(init: GridInit) -> Self {
        Self {
            init,
            bounds: PollutionBounds::default(),
            catalog: FlowerCatalog::default(),
            collisions: true,
            seed_return: SeedReturnPolicy::default(),
            seed: 0,
        }
    }

    /// Check structural invariants.
    ///
    /// # Errors
    ///
    /// [`ConfigError`] describing the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let b = &self.bounds;
        if !b.min.is_finite() || !b.max.is_finite() || !b.increment.is_finite() {
            return Err(ConfigError::InvalidBounds {
                reason: "pollution bounds must be finite".into(),
            });
        }
        if b.min >= b.max {
            return Err(ConfigError::InvalidBounds {
                reason: format!("min_pollution {} must be below max_pollution {}", b.min, b.max),
            });
        }
        if b.increment < 0.0 {
            return Err(ConfigError::InvalidBounds {
                reason: format!("pollution_increment must be >= 0, got {}", b.increment),
            });
        }

        match &self.init {
            GridInit::Random(params) => {
                for (name, value) in [
                    ("obstacle_ratio", params.obstacle_ratio),
                    ("water_ratio", params.water_ratio),
                ] {
                    if !(0.0..=1.0).contains(&value) || !value.is_finite() {
                        return Err(ConfigError::InvalidRatio { name, value });
                    }
                }
                if params.obstacle_ratio + params.water_ratio > 1.0 {
                    return Err(ConfigError::InvalidRatio {
                        name: "obstacle_ratio + water_ratio",
                        value: params.obstacle_ratio + params.water_ratio,
                    });
                }
                if !b.contains(DEFAULT_POLLUTION) {
                    return Err(ConfigError::InvalidBounds {
                        reason: format!(
                            "default pollution {DEFAULT_POLLUTION} outside [{}, {}]",
                            b.min, b.max
                        ),
                    });
                }
            }
            GridInit::Layout(layout) => {
                if !b.contains(layout.default_pollution) {
                    return Err(ConfigError::InvalidBounds {
                        reason: format!(
                            "default pollution {} outside [{}, {}]",
                            layout.default_pollution, b.min, b.max
                        ),
                    });
                }
            }
            GridInit::Text(_) => {
                if !b.contains(DEFAULT_POLLUTION) {
                    return Err(ConfigError::InvalidBounds {
                        reason: format!(
                            "default pollution {DEFAULT_POLLUTION} outside [{}, {}]",
                            b.min, b.max
                        ),
                    });
                }
            }
        }

        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(GridInit::Random(RandomLayout::default()))
    }
}

/// Errors detected while constructing or resetting a session.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Pollution bounds are inconsistent.
    InvalidBounds {
        /// Description of the inconsistency.
        reason: String,
    },
    /// A generation ratio is outside `[0, 1]` (or the ratios overlap).
    InvalidRatio {
        /// Which ratio.
        name: &'static str,
        /// The offending value.
        value: f32,
    },
    /// Random initialization failed (insufficient space, zero cells).
    Grid(GridError),
    /// Textual or declarative initialization failed.
    Parse(ParseError),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidBounds { reason } => write!(f, "invalid pollution bounds: {reason}"),
            Self::InvalidRatio { name, value } => {
                write!(f, "{name} must be within [0, 1], got {value}")
            }
            Self::Grid(e) => write!(f, "grid initialization: {e}"),
            Self::Parse(e) => write!(f, "grid description: {e}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Grid(e) => Some(e),
            Self::Parse(e) => Some(e),
            _ => None,
        }
    }
}

impl From<GridError> for ConfigError {
    fn from(e: GridError) -> Self {
        Self::Grid(e)
    }
}

impl From<ParseError> for ConfigError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn inverted_bounds_rejected() {
        let mut config = SessionConfig::default();
        config.bounds.min = 100.0;
        config.bounds.max = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBounds { .. })
        ));
    }

    #[test]
    fn ratio_above_one_rejected() {
        let mut config = SessionConfig::default();
        if let GridInit::Random(params) = &mut config.init {
            params.obstacle_ratio = 1.5;
        }
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRatio {
                name: "obstacle_ratio",
                ..
            })
        ));
    }

    #[test]
    fn overlapping_ratios_rejected() {
        let mut config = SessionConfig::default();
        if let GridInit::Random(params) = &mut config.init {
            params.obstacle_ratio = 0.6;
            params.water_ratio = 0.6;
        }
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRatio { .. })
        ));
    }

    #[test]
    fn bounds_excluding_default_pollution_rejected() {
        let mut config = SessionConfig::default();
        config.bounds.max = 10.0; // default pollution 50 no longer fits
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBounds { .. })
        ));
    }
}
