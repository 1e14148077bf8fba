//! A vector field over a fixed 3D lattice, with two-way particle coupling.
//!
//! [`LatticeField`] owns the grid and exposes `sample`, `accumulate`, `couple` and `step`.
//! [`World`] drives a particle cloud through a field one frame at a time.

pub mod config;
pub mod lattice;
pub mod particle;
pub mod relaxation;
pub mod render;
pub mod spatial;
pub mod world;

pub use config::{
    CellMapping, FieldConfig, FieldConfigError, RelaxationPolicy, SimConfig, SimConfigError,
};
pub use glam::Vec3;
pub use lattice::{Cell, LatticeField};
pub use particle::Particle;
pub use render::{FieldGlyph, DEFAULT_VIEW_SCALE};
pub use world::{ExperimentError, RunSummary, StepMetrics, World, WorldInitError};
