use super::*;
use crate::config::{FieldConfig, RelaxationPolicy};

fn small_config(num_particles: usize) -> SimConfig {
    SimConfig {
        num_particles,
        seed: 7,
        ..SimConfig::default()
    }
}

#[test]
fn new_world_keeps_particles_inside_field() {
    let world = World::new(small_config(200));
    assert_eq!(world.particles.len(), 200);
    assert!(world
        .particles
        .iter()
        .all(|p| world.field().cell_index(p.position).is_some()));
    assert!(world.field().energy() > 0.0);
}

#[test]
fn same_seed_gives_identical_runs() {
    let mut a = World::new(small_config(50));
    let mut b = World::new(small_config(50));
    for _ in 0..30 {
        a.step();
        b.step();
    }
    assert_eq!(a.particles, b.particles);
    assert_eq!(a.field().cells(), b.field().cells());
}

#[test]
fn different_seeds_diverge() {
    let a = World::new(small_config(10));
    let b = World::new(SimConfig {
        seed: 8,
        ..small_config(10)
    });
    assert_ne!(a.particles, b.particles);
}

#[test]
fn invalid_config_is_rejected() {
    let config = SimConfig {
        field: FieldConfig {
            resolution: 0,
            ..FieldConfig::default()
        },
        ..SimConfig::default()
    };
    assert!(matches!(
        World::try_new(config),
        Err(WorldInitError::Config(SimConfigError::Field(_)))
    ));
}

#[test]
fn with_parts_rejects_particles_outside_the_field() {
    let field = LatticeField::new(FieldConfig::default());
    let particles = vec![
        Particle::new(Vec3::splat(1.0), Vec3::ZERO),
        Particle::new(Vec3::new(-1.0, 1.0, 1.0), Vec3::ZERO),
    ];
    let result = World::with_parts(field, particles, small_config(2));
    assert_eq!(
        result.err(),
        Some(WorldInitError::ParticleOutsideField { index: 1 })
    );
}

#[test]
fn with_parts_rejects_field_built_from_other_config() {
    let field = LatticeField::new(FieldConfig {
        world_size: 20.0,
        ..FieldConfig::default()
    });
    let particles = vec![Particle::new(Vec3::splat(15.0), Vec3::ZERO)];
    let result = World::with_parts(field, particles, small_config(1));
    assert_eq!(result.err(), Some(WorldInitError::FieldConfigMismatch));
}

#[test]
fn with_parts_particle_at_rest_stays_put() {
    let field_config = FieldConfig {
        world_size: 20.0,
        ..FieldConfig::default()
    };
    let config = SimConfig {
        field: field_config.clone(),
        coupling_strength: 0.0,
        ..small_config(1)
    };
    let field = LatticeField::new(field_config);
    let particles = vec![Particle::new(Vec3::splat(15.0), Vec3::ZERO)];
    let mut world = World::with_parts(field, particles, config).unwrap();
    world.step();
    assert_eq!(world.particles[0].position, Vec3::splat(15.0));
}

#[test]
fn advance_caps_step_count() {
    let mut world = World::new(small_config(1));
    assert!(matches!(
        world.try_advance(World::MAX_EXPERIMENT_STEPS + 1),
        Err(ExperimentError::TooManySteps { .. })
    ));
    assert_eq!(world.step_index(), 0);
    world.try_advance(3).unwrap();
    assert_eq!(world.step_index(), 3);
}

#[test]
fn particles_stay_in_bounds_over_long_run() {
    let mut world = World::new(SimConfig {
        initial_speed: 20.0,
        ..small_config(100)
    });
    for _ in 0..300 {
        world.step();
    }
    let metrics = world.collect_step_metrics(world.step_index());
    assert_eq!(metrics.particles_in_bounds, 100);
    assert_eq!(world.step_index(), 300);
}

#[test]
fn particle_colors_drift_toward_field_colors() {
    let mut world = World::new(small_config(20));
    for _ in 0..100 {
        world.step();
    }
    // Particles start white; every cell color is strictly below 1 on at least one channel.
    assert!(world.particles.iter().all(|p| p.color.min_element() < 1.0));
    assert!(world
        .particles
        .iter()
        .all(|p| p.color.min_element() >= FieldConfig::default().color_min));
}

#[test]
fn reset_field_keeps_colors_and_changes_vectors() {
    let mut world = World::new(small_config(0));
    let before = world.field().cells().to_vec();
    world.reset_field();
    let after = world.field().cells();
    assert!(before.iter().zip(after).all(|(a, b)| a.color == b.color));
    assert!(before.iter().zip(after).any(|(a, b)| a.vector != b.vector));
}

#[test]
fn experiment_samples_on_schedule_and_final_step() {
    let mut world = World::new(small_config(10));
    let summary = world.run_experiment(25, 10);
    let steps: Vec<usize> = summary.samples.iter().map(|s| s.step).collect();
    assert_eq!(steps, vec![10, 20, 25]);
    assert_eq!(summary.schema_version, 1);
    assert_eq!(summary.steps, 25);
}

#[test]
fn experiment_rejects_bad_arguments() {
    let mut world = World::new(small_config(1));
    assert_eq!(
        world.try_run_experiment(10, 0).err(),
        Some(ExperimentError::InvalidSampleEvery)
    );
    assert!(matches!(
        world.try_run_experiment(World::MAX_EXPERIMENT_STEPS + 1, 1),
        Err(ExperimentError::TooManySteps { .. })
    ));
    assert!(matches!(
        world.try_run_experiment(World::MAX_EXPERIMENT_SAMPLES + 1, 1),
        Err(ExperimentError::TooManySamples { .. })
    ));
    assert_eq!(world.step_index(), 0);
}

#[test]
fn run_summary_serializes_to_json() {
    let mut world = World::new(small_config(5));
    let summary = world.run_experiment(4, 2);
    let json = serde_json::to_string(&summary).unwrap();
    let parsed: RunSummary = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.samples.len(), 2);
    assert_eq!(parsed.samples[1].step, 4);
    assert!((parsed.final_field_energy - summary.final_field_energy).abs() < 1e-12);
}

#[test]
fn damping_without_particles_decays_field_energy() {
    let mut world = World::new(small_config(0));
    let start = world.field().energy();
    world.run_experiment(60, 60);
    let expected = start * (1.0 - 0.5 / 60.0f64).powi(120);
    let end = world.field().energy();
    assert!(end < start);
    assert!((end - expected).abs() / expected < 1e-3, "{end} vs {expected}");
}

#[test]
fn diffusion_world_stays_finite() {
    let mut world = World::new(SimConfig {
        field: FieldConfig {
            relaxation: RelaxationPolicy::NeighborDiffusion,
            ..FieldConfig::default()
        },
        ..small_config(100)
    });
    let summary = world.run_experiment(120, 30);
    assert!(summary
        .samples
        .iter()
        .all(|s| s.field_energy.is_finite() && s.field_max_magnitude.is_finite()));
    assert!(world.field().cells().iter().all(|c| c.vector.is_finite()));
}

/// One particle parked at the center cell, coupling every frame for ten seconds at 60 Hz.
/// The center cell can grow by at most the sum of what each frame fed back into it.
#[test]
fn center_particle_coupling_is_bounded() {
    let mut field = LatticeField::seeded(FieldConfig::default(), 42).unwrap();
    let dt = 1.0f32 / 60.0;
    let k = 0.1f32;
    let center = Vec3::splat(5.0);
    let mut velocity = Vec3::new(0.5, -0.25, 0.125);
    let mut color = Vec3::ONE;

    let start = field.sample(center).unwrap().length();
    let mut increment_bound = 0.0f32;
    for _ in 0..600 {
        let (v, c) = field.couple(dt, center, velocity, color, k);
        increment_bound += v.length() * dt * k;
        velocity = v;
        color = c;
        field.step(dt);
    }

    let end = field.sample(center).unwrap();
    assert!(end.is_finite() && velocity.is_finite() && color.is_finite());
    assert!(
        end.length() <= start + increment_bound + 1e-5,
        "{} > {} + {}",
        end.length(),
        start,
        increment_bound
    );
    assert!(field.cells().iter().all(|c| c.vector.is_finite()));
}
