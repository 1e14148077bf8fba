//! Per-step relaxation kernels for the lattice.
//!
//! `Damping` is applied in place. `NeighborDiffusion` reads a frozen copy of the
//! vectors taken at the start of the step (Jacobi update), so the result does not depend on
//! cell visiting order and the per-cell work can run on the rayon pool.

use crate::config::RelaxationPolicy;
use crate::lattice::Cell;
use crate::spatial::LatticeGeometry;
use glam::Vec3;
use rayon::prelude::*;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RelaxationParams {
    pub damping: f32,
    pub diffusion_blend: f32,
}

/// Mean of the six wrapped axis neighbors of `index`.
pub fn neighbor_average(
    geometry: &LatticeGeometry,
    index: usize,
    vector_at: impl Fn(usize) -> Vec3,
) -> Vec3 {
    let sum = geometry
        .wrapped_neighbors(index)
        .iter()
        .fold(Vec3::ZERO, |acc, &n| acc + vector_at(n));
    sum / 6.0
}

/// Keep the magnitude of `vector`, steering `blend` of it along `toward`.
/// Zero-length inputs contribute nothing instead of NaN.
pub fn redirect(vector: Vec3, toward: Vec3, blend: f32) -> Vec3 {
    let size = vector.length();
    vector.normalize_or_zero() * size * (1.0 - blend) + toward.normalize_or_zero() * size * blend
}

pub(crate) fn apply(
    policy: RelaxationPolicy,
    cells: &mut [Cell],
    geometry: &LatticeGeometry,
    params: RelaxationParams,
    dt: f32,
) {
    match policy {
        RelaxationPolicy::Damping => {
            let factor = 1.0 - params.damping * dt;
            for cell in cells.iter_mut() {
                cell.vector *= factor;
            }
        }
        RelaxationPolicy::NeighborDiffusion => {
            let snapshot: Vec<Vec3> = cells.iter().map(|c| c.vector).collect();
            cells.par_iter_mut().enumerate().for_each(|(index, cell)| {
                let average = neighbor_average(geometry, index, |n| snapshot[n]);
                cell.vector = redirect(snapshot[index], average, params.diffusion_blend);
            });
        }
    }
}
