use crate::config::CellMapping;
use glam::Vec3;

/// Index arithmetic for an N×N×N lattice over a cube of side `world_size`.
///
/// Linear index = `i + j*N + k*N²`. Sampling, accumulation, neighbor lookup and the
/// visualization iteration all rely on this ordering.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LatticeGeometry {
    pub resolution: usize,
    pub world_size: f32,
    pub mapping: CellMapping,
}

impl LatticeGeometry {
    pub fn new(resolution: usize, world_size: f32, mapping: CellMapping) -> Self {
        debug_assert!(resolution > 0, "resolution must be positive");
        Self {
            resolution,
            world_size,
            mapping,
        }
    }

    pub fn cell_count(&self) -> usize {
        self.resolution * self.resolution * self.resolution
    }

    pub fn cell_size(&self) -> f32 {
        self.world_size / self.resolution as f32
    }

    pub fn linear_index(&self, i: usize, j: usize, k: usize) -> usize {
        let n = self.resolution;
        i + j * n + k * n * n
    }

    pub fn coords(&self, index: usize) -> [usize; 3] {
        let n = self.resolution;
        [index % n, (index % (n * n)) / n, index / (n * n)]
    }

    /// Map a world-space position to the cell containing it, or `None` outside the field.
    pub fn cell_index(&self, pos: Vec3) -> Option<usize> {
        match self.mapping {
            CellMapping::PerAxis => self.per_axis_index(pos),
            CellMapping::Legacy => self.legacy_index(pos),
        }
    }

    fn per_axis_index(&self, pos: Vec3) -> Option<usize> {
        let n = self.resolution;
        let mut cell = [0usize; 3];
        for (c, p) in cell.iter_mut().zip(pos.to_array()) {
            // Also rejects NaN.
            if !(p >= 0.0 && p < self.world_size) {
                return None;
            }
            // p / world_size * n can round up to n just below the far wall.
            *c = ((p / self.world_size * n as f32) as usize).min(n - 1);
        }
        Some(self.linear_index(cell[0], cell[1], cell[2]))
    }

    fn legacy_index(&self, pos: Vec3) -> Option<usize> {
        let n = self.resolution as i64;
        // `as` truncates toward zero, so (-cell_size, 0) collapses onto cell 0.
        let axis = |p: f32| (p / self.world_size * n as f32) as i64;
        let index = axis(pos.x)
            .saturating_add(axis(pos.y).saturating_mul(n))
            .saturating_add(axis(pos.z).saturating_mul(n * n));
        (0..self.cell_count() as i64)
            .contains(&index)
            .then_some(index as usize)
    }

    /// The six axis-adjacent cells of `index`, wrapping each axis independently.
    ///
    /// Order: +x, -x, +y, -y, +z, -z. Panics if `index` is not a cell of this lattice.
    pub fn wrapped_neighbors(&self, index: usize) -> [usize; 6] {
        assert!(
            index < self.cell_count(),
            "cell index {index} out of range for {} cells",
            self.cell_count()
        );
        let n = self.resolution as isize;
        let [x, y, z] = self.coords(index).map(|c| c as isize);
        let wrap = |c: isize| c.rem_euclid(n) as usize;
        let at = |i: isize, j: isize, k: isize| self.linear_index(wrap(i), wrap(j), wrap(k));
        [
            at(x + 1, y, z),
            at(x - 1, y, z),
            at(x, y + 1, z),
            at(x, y - 1, z),
            at(x, y, z + 1),
            at(x, y, z - 1),
        ]
    }
}
