pub mod lifecycle;
pub mod metrics;
#[cfg(test)]
mod tests;

pub use metrics::*;

use crate::config::{SimConfig, SimConfigError};
use crate::lattice::LatticeField;
use crate::particle::Particle;
use glam::Vec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use std::{error::Error, fmt};

/// A particle cloud coupled to one lattice field.
pub struct World {
    pub particles: Vec<Particle>,
    pub(crate) field: LatticeField,
    pub(crate) config: SimConfig,
    pub(crate) rng: ChaCha12Rng,
    pub(crate) step_index: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum WorldInitError {
    Config(SimConfigError),
    ParticleOutsideField { index: usize },
    FieldConfigMismatch,
}

impl fmt::Display for WorldInitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorldInitError::Config(e) => write!(f, "{}", e),
            WorldInitError::ParticleOutsideField { index } => {
                write!(f, "particle {index} starts outside the field volume")
            }
            WorldInitError::FieldConfigMismatch => {
                write!(f, "field was built with a different config than config.field")
            }
        }
    }
}

impl From<SimConfigError> for WorldInitError {
    fn from(err: SimConfigError) -> Self {
        WorldInitError::Config(err)
    }
}

impl Error for WorldInitError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            WorldInitError::Config(e) => Some(e),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExperimentError {
    InvalidSampleEvery,
    TooManySteps { max: usize, actual: usize },
    TooManySamples { max: usize, actual: usize },
}

impl fmt::Display for ExperimentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperimentError::InvalidSampleEvery => write!(f, "sample_every must be positive"),
            ExperimentError::TooManySteps { max, actual } => {
                write!(f, "steps ({actual}) exceed supported maximum ({max})")
            }
            ExperimentError::TooManySamples { max, actual } => {
                write!(
                    f,
                    "sample count ({actual}) exceeds supported maximum ({max})"
                )
            }
        }
    }
}

impl Error for ExperimentError {}

impl World {
    pub const MAX_EXPERIMENT_STEPS: usize = 1_000_000;
    pub const MAX_EXPERIMENT_SAMPLES: usize = 50_000;

    pub fn new(config: SimConfig) -> Self {
        Self::try_new(config).unwrap_or_else(|e| panic!("{e}"))
    }

    /// Seed the rng, randomize the field, then scatter `num_particles` particles uniformly
    /// through the cube.
    pub fn try_new(config: SimConfig) -> Result<Self, WorldInitError> {
        config.validate()?;
        let mut rng = ChaCha12Rng::seed_from_u64(config.seed);
        let mut field = LatticeField::try_new(config.field.clone())
            .map_err(|e| WorldInitError::Config(e.into()))?;
        field.initialize(&mut rng);

        let world_size = config.field.world_size;
        let speed = config.initial_speed;
        let particles = (0..config.num_particles)
            .map(|_| {
                let position = Vec3::new(
                    rng.random::<f32>() * world_size,
                    rng.random::<f32>() * world_size,
                    rng.random::<f32>() * world_size,
                );
                let velocity = Vec3::new(
                    rng.random_range(-1.0f32..=1.0),
                    rng.random_range(-1.0f32..=1.0),
                    rng.random_range(-1.0f32..=1.0),
                ) * speed;
                Particle::new(position, velocity)
            })
            .collect();

        log::debug!(
            "world created: {} particles, {} cells, policy {:?}, seed {}",
            config.num_particles,
            field.len(),
            field.policy(),
            config.seed
        );
        Ok(Self {
            particles,
            field,
            config,
            rng,
            step_index: 0,
        })
    }

    /// Build a world around caller-supplied particles and an already initialized field.
    pub fn with_parts(
        field: LatticeField,
        particles: Vec<Particle>,
        config: SimConfig,
    ) -> Result<Self, WorldInitError> {
        config.validate()?;
        if field.config() != &config.field {
            return Err(WorldInitError::FieldConfigMismatch);
        }
        if let Some(index) = particles
            .iter()
            .position(|p| field.cell_index(p.position).is_none())
        {
            return Err(WorldInitError::ParticleOutsideField { index });
        }
        let rng = ChaCha12Rng::seed_from_u64(config.seed);
        Ok(Self {
            particles,
            field,
            config,
            rng,
            step_index: 0,
        })
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn field(&self) -> &LatticeField {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut LatticeField {
        &mut self.field
    }

    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// Re-randomize the field from the world's rng. Colors come back identical.
    pub fn reset_field(&mut self) {
        self.field.initialize(&mut self.rng);
    }

    /// Step `steps` frames without sampling metrics.
    pub fn try_advance(&mut self, steps: usize) -> Result<(), ExperimentError> {
        if steps > Self::MAX_EXPERIMENT_STEPS {
            return Err(ExperimentError::TooManySteps {
                max: Self::MAX_EXPERIMENT_STEPS,
                actual: steps,
            });
        }
        for _ in 0..steps {
            self.step();
        }
        Ok(())
    }

    pub fn run_experiment(&mut self, steps: usize, sample_every: usize) -> RunSummary {
        self.try_run_experiment(steps, sample_every)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_run_experiment(
        &mut self,
        steps: usize,
        sample_every: usize,
    ) -> Result<RunSummary, ExperimentError> {
        if sample_every == 0 {
            return Err(ExperimentError::InvalidSampleEvery);
        }
        if steps > Self::MAX_EXPERIMENT_STEPS {
            return Err(ExperimentError::TooManySteps {
                max: Self::MAX_EXPERIMENT_STEPS,
                actual: steps,
            });
        }
        let estimated_samples = if steps == 0 {
            0
        } else {
            ((steps - 1) / sample_every) + 1
        };
        if estimated_samples > Self::MAX_EXPERIMENT_SAMPLES {
            return Err(ExperimentError::TooManySamples {
                max: Self::MAX_EXPERIMENT_SAMPLES,
                actual: estimated_samples,
            });
        }

        log::debug!("running experiment: {steps} steps, sampling every {sample_every}");
        let mut samples = Vec::with_capacity(estimated_samples);
        for step in 1..=steps {
            self.step();
            if step % sample_every == 0 || step == steps {
                samples.push(self.collect_step_metrics(step));
            }
        }
        let final_field_energy = self.field.energy();
        log::debug!("experiment finished: final field energy {final_field_energy:.6e}");
        Ok(RunSummary {
            schema_version: 1,
            steps,
            sample_every,
            samples,
            final_field_energy,
        })
    }
}
