use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A point particle moving through the field.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    pub color: Vec3,
}

impl Particle {
    pub fn new(position: Vec3, velocity: Vec3) -> Self {
        Self {
            position,
            velocity,
            color: Vec3::ONE,
        }
    }

    /// Keep the particle inside `[0, world_size)` on every axis, reversing and scaling
    /// the velocity component of any wall it crossed.
    pub fn bounce(&mut self, world_size: f32, restitution: f32) {
        // Largest representable coordinate strictly inside the cube.
        let inner = f32::from_bits(world_size.to_bits() - 1);
        for axis in 0..3 {
            let p = self.position[axis];
            if p < 0.0 {
                self.position[axis] = 0.0;
                self.velocity[axis] = self.velocity[axis].abs() * restitution;
            } else if p >= world_size {
                self.position[axis] = inner;
                self.velocity[axis] = -self.velocity[axis].abs() * restitution;
            }
        }
    }
}
