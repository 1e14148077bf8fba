use crate::config::{FieldConfig, FieldConfigError, RelaxationPolicy};
use crate::relaxation::{self, RelaxationParams};
use crate::spatial::LatticeGeometry;
use glam::Vec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha12Rng;
use serde::{Deserialize, Serialize};

/// One lattice site. `color` is fixed at initialization; only `vector` evolves.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub vector: Vec3,
    pub color: Vec3,
}

/// A vector-valued field over a fixed N×N×N lattice covering a cubical world volume.
#[derive(Clone, Debug)]
pub struct LatticeField {
    cells: Vec<Cell>,
    geometry: LatticeGeometry,
    config: FieldConfig,
}

impl LatticeField {
    /// Build a zeroed lattice with its display colors assigned. Panics on invalid config.
    pub fn new(config: FieldConfig) -> Self {
        Self::try_new(config).unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_new(config: FieldConfig) -> Result<Self, FieldConfigError> {
        config.validate()?;
        let geometry =
            LatticeGeometry::new(config.resolution, config.world_size, config.cell_mapping);
        let cells = (0..geometry.cell_count())
            .map(|index| Cell {
                vector: Vec3::ZERO,
                color: cell_color(index, config.resolution, config.color_min),
            })
            .collect();
        Ok(Self {
            cells,
            geometry,
            config,
        })
    }

    /// Build and randomize a lattice from a seed.
    pub fn seeded(config: FieldConfig, seed: u64) -> Result<Self, FieldConfigError> {
        let mut field = Self::try_new(config)?;
        field.initialize(&mut ChaCha12Rng::seed_from_u64(seed));
        Ok(field)
    }

    /// Reset every cell: vectors to `(u - 0.5) * field_scale` per component with `u` uniform
    /// in `[0, 1)`, colors to their coordinate-derived values.
    pub fn initialize<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let scale = self.config.field_scale;
        let n = self.config.resolution;
        let color_min = self.config.color_min;
        for (index, cell) in self.cells.iter_mut().enumerate() {
            cell.vector = Vec3::new(
                (rng.random::<f32>() - 0.5) * scale,
                (rng.random::<f32>() - 0.5) * scale,
                (rng.random::<f32>() - 0.5) * scale,
            );
            cell.color = cell_color(index, n, color_min);
        }
        log::debug!(
            "initialized lattice field: {} cells, scale {}",
            self.cells.len(),
            scale
        );
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn geometry(&self) -> &LatticeGeometry {
        &self.geometry
    }

    pub fn policy(&self) -> RelaxationPolicy {
        self.config.relaxation
    }

    pub fn set_policy(&mut self, policy: RelaxationPolicy) {
        self.config.relaxation = policy;
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Read-only view of every cell in linear-index order.
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Cells paired with their `(i, j, k)` lattice coordinates.
    pub fn iter(&self) -> impl Iterator<Item = ([usize; 3], &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(|(index, cell)| (self.geometry.coords(index), cell))
    }

    pub fn cell(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    pub fn cell_index(&self, pos: Vec3) -> Option<usize> {
        self.geometry.cell_index(pos)
    }

    /// Field vector at `pos`, or `None` when `pos` lies outside the lattice.
    pub fn sample(&self, pos: Vec3) -> Option<Vec3> {
        self.cell_index(pos).map(|index| self.cells[index].vector)
    }

    /// Add `delta` to the cell at `pos`. No-op outside the lattice.
    pub fn accumulate(&mut self, pos: Vec3, delta: Vec3) {
        if let Some(index) = self.cell_index(pos) {
            self.cells[index].vector += delta;
        }
    }

    /// Two-way exchange between a particle and the cell at `pos`.
    ///
    /// The particle is accelerated by the cell, then the cell receives
    /// `velocity' * dt * coupling_strength` computed from the accelerated velocity.
    /// The color drift is applied once per call and is not scaled by `dt`.
    /// Outside the lattice the inputs are returned unchanged.
    pub fn couple(
        &mut self,
        dt: f32,
        pos: Vec3,
        velocity: Vec3,
        color: Vec3,
        coupling_strength: f32,
    ) -> (Vec3, Vec3) {
        let Some(index) = self.cell_index(pos) else {
            return (velocity, color);
        };
        let drift = self.config.color_drift_rate;
        let cell = &mut self.cells[index];
        let velocity = velocity + cell.vector * dt;
        cell.vector += velocity * dt * coupling_strength;
        let color = color * (1.0 - drift) + cell.color * drift;
        (velocity, color)
    }

    /// Mean of the six axis-adjacent cells, wrapping on every axis.
    /// `None` when `index` does not identify a cell.
    pub fn neighbors_average(&self, index: usize) -> Option<Vec3> {
        self.cells.get(index)?;
        Some(relaxation::neighbor_average(
            &self.geometry,
            index,
            |n| self.cells[n].vector,
        ))
    }

    /// Advance the lattice one tick under the configured relaxation policy.
    pub fn step(&mut self, dt: f32) {
        let params = RelaxationParams {
            damping: self.config.damping,
            diffusion_blend: self.config.diffusion_blend,
        };
        relaxation::apply(
            self.config.relaxation,
            &mut self.cells,
            &self.geometry,
            params,
            dt,
        );
    }

    /// Σ|v|² over all cells.
    pub fn energy(&self) -> f64 {
        self.cells
            .iter()
            .map(|c| c.vector.length_squared() as f64)
            .sum()
    }
}

/// Display color of cell `index` in an `n`-lattice, each channel in `[color_min, 1)`.
pub fn cell_color(index: usize, n: usize, color_min: f32) -> Vec3 {
    let span = 1.0 - color_min;
    let n2 = n * n;
    let n3 = n2 * n;
    Vec3::new(
        (index % n) as f32 * (span / n as f32) + color_min,
        (index % n2) as f32 * (span / n2 as f32) + color_min,
        index as f32 * (span / n3 as f32) + color_min,
    )
}
