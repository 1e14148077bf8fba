use serde::{Deserialize, Serialize};
use std::{error::Error, fmt};

/// Relaxation rule applied to every cell by `LatticeField::step`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelaxationPolicy {
    /// Exponential decay toward zero: `v *= 1 - damping * dt`.
    #[default]
    Damping,
    /// Blend each cell's direction toward its six-neighbor average, keeping magnitude.
    NeighborDiffusion,
}

/// How a world-space position is turned into a cell index.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellMapping {
    /// Each axis must lie in `[0, world_size)`; anything else is outside the field.
    #[default]
    PerAxis,
    /// Truncate each axis toward zero, combine, and only check the linear index range.
    /// Slightly negative coordinates land on cell 0 and overflowing x/y alias into the
    /// next row/plane.
    Legacy,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Cells per axis (N). Total cells = N³.
    pub resolution: usize,
    /// Side of the cubical world volume.
    pub world_size: f32,
    /// Amplitude of the randomized initial vectors.
    pub field_scale: f32,
    /// Per-`couple` blend factor of particle color toward cell color.
    pub color_drift_rate: f32,
    /// Per-channel floor of the cell display colors.
    pub color_min: f32,
    pub damping: f32,
    /// Share of magnitude redirected along the neighbor average (diffusion policy).
    pub diffusion_blend: f32,
    pub relaxation: RelaxationPolicy,
    pub cell_mapping: CellMapping,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            resolution: 10,
            world_size: 10.0,
            field_scale: 0.0005,
            color_drift_rate: 0.001,
            color_min: 0.2,
            damping: 0.5,
            diffusion_blend: 0.01,
            relaxation: RelaxationPolicy::Damping,
            cell_mapping: CellMapping::PerAxis,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldConfigError {
    InvalidResolution { max: usize, actual: usize },
    InvalidWorldSize,
    InvalidFieldScale,
    InvalidColorDriftRate,
    InvalidColorMin,
    InvalidDamping,
    InvalidDiffusionBlend,
}

impl fmt::Display for FieldConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldConfigError::InvalidResolution { max, actual } => {
                write!(f, "resolution ({actual}) must be in 1..={max}")
            }
            FieldConfigError::InvalidWorldSize => write!(
                f,
                "world_size must be finite, positive and <= {}",
                FieldConfig::MAX_WORLD_SIZE
            ),
            FieldConfigError::InvalidFieldScale => {
                write!(f, "field_scale must be finite and non-negative")
            }
            FieldConfigError::InvalidColorDriftRate => {
                write!(f, "color_drift_rate must be in [0, 1]")
            }
            FieldConfigError::InvalidColorMin => write!(f, "color_min must be in [0, 1)"),
            FieldConfigError::InvalidDamping => {
                write!(f, "damping must be finite and non-negative")
            }
            FieldConfigError::InvalidDiffusionBlend => {
                write!(f, "diffusion_blend must be in [0, 1]")
            }
        }
    }
}

impl Error for FieldConfigError {}

impl FieldConfig {
    pub const MAX_RESOLUTION: usize = 128;
    pub const MAX_WORLD_SIZE: f32 = 1.0e6;

    pub fn validate(&self) -> Result<(), FieldConfigError> {
        if self.resolution == 0 || self.resolution > Self::MAX_RESOLUTION {
            return Err(FieldConfigError::InvalidResolution {
                max: Self::MAX_RESOLUTION,
                actual: self.resolution,
            });
        }
        if !(self.world_size.is_finite()
            && self.world_size > 0.0
            && self.world_size <= Self::MAX_WORLD_SIZE)
        {
            return Err(FieldConfigError::InvalidWorldSize);
        }
        if !(self.field_scale.is_finite() && self.field_scale >= 0.0) {
            return Err(FieldConfigError::InvalidFieldScale);
        }
        if !(0.0..=1.0).contains(&self.color_drift_rate) {
            return Err(FieldConfigError::InvalidColorDriftRate);
        }
        if !(0.0..1.0).contains(&self.color_min) {
            return Err(FieldConfigError::InvalidColorMin);
        }
        if !(self.damping.is_finite() && self.damping >= 0.0) {
            return Err(FieldConfigError::InvalidDamping);
        }
        if !(0.0..=1.0).contains(&self.diffusion_blend) {
            return Err(FieldConfigError::InvalidDiffusionBlend);
        }
        Ok(())
    }

    pub fn cell_count(&self) -> usize {
        self.resolution * self.resolution * self.resolution
    }
}

/// Configuration for the particle cloud that drives the field.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub field: FieldConfig,
    pub num_particles: usize,
    pub dt: f32,
    pub coupling_strength: f32,
    /// Per-second velocity decay applied to particles after integration.
    pub particle_damping: f32,
    /// Fraction of velocity kept (and reversed) when a particle hits a wall.
    pub wall_bounce: f32,
    pub initial_speed: f32,
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            field: FieldConfig::default(),
            num_particles: 1000,
            dt: 1.0 / 60.0,
            coupling_strength: 0.1,
            particle_damping: 0.1,
            wall_bounce: 0.5,
            initial_speed: 0.5,
            seed: 42,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SimConfigError {
    Field(FieldConfigError),
    Parse(String),
    TooManyParticles { max: usize, actual: usize },
    InvalidDt,
    InvalidCouplingStrength,
    InvalidParticleDamping,
    InvalidWallBounce,
    InvalidInitialSpeed,
}

impl fmt::Display for SimConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimConfigError::Field(e) => write!(f, "{}", e),
            SimConfigError::Parse(msg) => write!(f, "invalid config JSON: {msg}"),
            SimConfigError::TooManyParticles { max, actual } => write!(
                f,
                "num_particles ({actual}) exceeds supported maximum ({max})"
            ),
            SimConfigError::InvalidDt => write!(f, "dt must be finite and non-negative"),
            SimConfigError::InvalidCouplingStrength => {
                write!(f, "coupling_strength must be finite")
            }
            SimConfigError::InvalidParticleDamping => {
                write!(f, "particle_damping must be finite and non-negative")
            }
            SimConfigError::InvalidWallBounce => write!(f, "wall_bounce must be in [0, 1]"),
            SimConfigError::InvalidInitialSpeed => {
                write!(f, "initial_speed must be finite and non-negative")
            }
        }
    }
}

impl From<FieldConfigError> for SimConfigError {
    fn from(err: FieldConfigError) -> Self {
        SimConfigError::Field(err)
    }
}

impl From<serde_json::Error> for SimConfigError {
    fn from(err: serde_json::Error) -> Self {
        SimConfigError::Parse(err.to_string())
    }
}

impl Error for SimConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SimConfigError::Field(e) => Some(e),
            _ => None,
        }
    }
}

impl SimConfig {
    pub const MAX_PARTICLES: usize = 1_000_000;

    /// Parse a (possibly partial) JSON config; missing keys take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SimConfigError> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<(), SimConfigError> {
        self.field.validate()?;
        if self.num_particles > Self::MAX_PARTICLES {
            return Err(SimConfigError::TooManyParticles {
                max: Self::MAX_PARTICLES,
                actual: self.num_particles,
            });
        }
        if !(self.dt.is_finite() && self.dt >= 0.0) {
            return Err(SimConfigError::InvalidDt);
        }
        if !self.coupling_strength.is_finite() {
            return Err(SimConfigError::InvalidCouplingStrength);
        }
        if !(self.particle_damping.is_finite() && self.particle_damping >= 0.0) {
            return Err(SimConfigError::InvalidParticleDamping);
        }
        if !(0.0..=1.0).contains(&self.wall_bounce) {
            return Err(SimConfigError::InvalidWallBounce);
        }
        if !(self.initial_speed.is_finite() && self.initial_speed >= 0.0) {
            return Err(SimConfigError::InvalidInitialSpeed);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(FieldConfig::default().validate(), Ok(()));
        assert_eq!(SimConfig::default().validate(), Ok(()));
        assert_eq!(FieldConfig::default().cell_count(), 1000);
    }

    #[test]
    fn rejects_out_of_range_resolution() {
        let config = FieldConfig {
            resolution: 0,
            ..FieldConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(FieldConfigError::InvalidResolution {
                max: FieldConfig::MAX_RESOLUTION,
                actual: 0
            })
        );
        let config = FieldConfig {
            resolution: FieldConfig::MAX_RESOLUTION + 1,
            ..FieldConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_non_finite_world_size_and_bad_color_floor() {
        let config = FieldConfig {
            world_size: f32::NAN,
            ..FieldConfig::default()
        };
        assert_eq!(config.validate(), Err(FieldConfigError::InvalidWorldSize));
        let config = FieldConfig {
            color_min: 1.0,
            ..FieldConfig::default()
        };
        assert_eq!(config.validate(), Err(FieldConfigError::InvalidColorMin));
    }

    #[test]
    fn sim_config_wraps_field_errors() {
        let config = SimConfig {
            field: FieldConfig {
                damping: -1.0,
                ..FieldConfig::default()
            },
            ..SimConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert_eq!(err, SimConfigError::Field(FieldConfigError::InvalidDamping));
        assert!(err.source().is_some());
    }

    #[test]
    fn partial_json_fills_defaults() {
        let config = SimConfig::from_json(
            r#"{"num_particles": 3, "field": {"relaxation": "neighbor_diffusion"}}"#,
        )
        .unwrap();
        assert_eq!(config.num_particles, 3);
        assert_eq!(config.field.relaxation, RelaxationPolicy::NeighborDiffusion);
        assert_eq!(config.field.resolution, 10);
        assert_eq!(config.seed, SimConfig::default().seed);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = SimConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SimConfigError::Parse(_)));
    }

    #[test]
    fn json_round_trip_preserves_config() {
        let config = SimConfig {
            seed: 7,
            field: FieldConfig {
                cell_mapping: CellMapping::Legacy,
                ..FieldConfig::default()
            },
            ..SimConfig::default()
        };
        let json = config.to_json().unwrap();
        assert!(!json.is_empty());
        assert_eq!(SimConfig::from_json(&json).unwrap(), config);
    }
}
