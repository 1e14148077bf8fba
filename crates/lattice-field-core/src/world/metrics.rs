use super::World;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug)]
pub struct StepTimings {
    pub coupling_us: u64,
    pub motion_us: u64,
    pub relaxation_us: u64,
    pub total_us: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct StepMetrics {
    pub step: usize,
    /// Σ|v|² over all cells.
    pub field_energy: f64,
    pub field_mean_magnitude: f32,
    pub field_max_magnitude: f32,
    pub particle_mean_speed: f32,
    pub particle_mean_color: [f32; 3],
    pub particles_in_bounds: usize,
}

fn default_schema_version() -> u32 {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RunSummary {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub steps: usize,
    pub sample_every: usize,
    pub samples: Vec<StepMetrics>,
    #[serde(default)]
    pub final_field_energy: f64,
}

impl World {
    pub fn collect_step_metrics(&self, step: usize) -> StepMetrics {
        let cells = self.field.cells();
        let mut magnitude_sum = 0.0f32;
        let mut field_max_magnitude = 0.0f32;
        for cell in cells {
            let m = cell.vector.length();
            magnitude_sum += m;
            field_max_magnitude = field_max_magnitude.max(m);
        }

        let denom = self.particles.len().max(1) as f32;
        let mut speed_sum = 0.0f32;
        let mut color_sum = [0.0f32; 3];
        let mut particles_in_bounds = 0;
        for p in &self.particles {
            speed_sum += p.velocity.length();
            for (s, c) in color_sum.iter_mut().zip(p.color.to_array()) {
                *s += c;
            }
            if self.field.cell_index(p.position).is_some() {
                particles_in_bounds += 1;
            }
        }

        StepMetrics {
            step,
            field_energy: self.field.energy(),
            field_mean_magnitude: magnitude_sum / cells.len().max(1) as f32,
            field_max_magnitude,
            particle_mean_speed: speed_sum / denom,
            particle_mean_color: color_sum.map(|s| s / denom),
            particles_in_bounds,
        }
    }
}
