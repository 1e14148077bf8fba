use super::metrics::StepTimings;
use super::World;
use std::time::Instant;

impl World {
    /// Exchange momentum and color between every particle and its cell, in index order.
    /// Particles sharing a cell see each other's contributions within the same frame.
    fn step_coupling_phase(&mut self) {
        let dt = self.config.dt;
        let k = self.config.coupling_strength;
        for particle in &mut self.particles {
            let (velocity, color) =
                self.field
                    .couple(dt, particle.position, particle.velocity, particle.color, k);
            particle.velocity = velocity;
            particle.color = color;
        }
    }

    /// Integrate positions, damp velocities and keep particles inside the cube.
    fn step_motion_phase(&mut self) {
        let dt = self.config.dt;
        let damping = 1.0 - self.config.particle_damping * dt;
        let world_size = self.field.geometry().world_size;
        let bounce = self.config.wall_bounce;
        for particle in &mut self.particles {
            particle.position += particle.velocity * dt;
            particle.velocity *= damping;
            particle.bounce(world_size, bounce);
        }
    }

    pub fn step(&mut self) -> StepTimings {
        let total_start = Instant::now();
        self.step_index = self.step_index.saturating_add(1);

        let t0 = Instant::now();
        self.step_coupling_phase();
        let coupling_us = t0.elapsed().as_micros() as u64;

        let t1 = Instant::now();
        self.step_motion_phase();
        let motion_us = t1.elapsed().as_micros() as u64;

        let t2 = Instant::now();
        self.field.step(self.config.dt);
        let relaxation_us = t2.elapsed().as_micros() as u64;

        let timings = StepTimings {
            coupling_us,
            motion_us,
            relaxation_us,
            total_us: total_start.elapsed().as_micros() as u64,
        };
        log::trace!("step {}: {:?}", self.step_index, timings);
        timings
    }
}
