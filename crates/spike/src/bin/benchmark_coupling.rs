use lattice_field_core::{FieldConfig, RelaxationPolicy, SimConfig, World};
use std::time::Instant;

fn main() {
    env_logger::init();
    let num_particles = 100_000;
    let resolution = 64;
    println!(
        "Benchmarking with {} particles on a {}^3 lattice",
        num_particles, resolution
    );

    for policy in [RelaxationPolicy::Damping, RelaxationPolicy::NeighborDiffusion] {
        let config = SimConfig {
            num_particles,
            field: FieldConfig {
                resolution,
                world_size: 64.0,
                relaxation: policy,
                ..FieldConfig::default()
            },
            seed: 42,
            ..SimConfig::default()
        };
        let mut world1 = World::new(config.clone());
        let mut world2 = World::new(config);

        let steps = 10;

        let start = Instant::now();
        let mut coupling_us = 0;
        let mut relaxation_us = 0;
        for _ in 0..steps {
            let timings = world1.step();
            coupling_us += timings.coupling_us;
            relaxation_us += timings.relaxation_us;
        }
        let duration_no_metrics = start.elapsed();
        println!("[{:?}] {} steps WITHOUT metrics: {:?}", policy, steps, duration_no_metrics);
        println!(
            "[{:?}] avg coupling {}us, avg relaxation {}us",
            policy,
            coupling_us / steps as u64,
            relaxation_us / steps as u64
        );

        let start = Instant::now();
        world2.run_experiment(steps, 1);
        let duration_metrics = start.elapsed();
        println!("[{:?}] {} steps WITH metrics: {:?}", policy, steps, duration_metrics);

        let diff = duration_metrics.saturating_sub(duration_no_metrics);
        println!("[{:?}] avg metrics overhead per step: {:?}", policy, diff / steps as u32);
    }
}
