use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lattice_field_core::{RelaxationPolicy, SimConfig, World};
use std::fs;
use std::path::PathBuf;

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Policy {
    Damping,
    NeighborDiffusion,
}

impl From<Policy> for RelaxationPolicy {
    fn from(policy: Policy) -> Self {
        match policy {
            Policy::Damping => RelaxationPolicy::Damping,
            Policy::NeighborDiffusion => RelaxationPolicy::NeighborDiffusion,
        }
    }
}

/// Run a particle cloud through a lattice vector field and print the run summary as JSON.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// JSON config file; missing keys take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value_t = 600)]
    steps: usize,

    #[arg(long, default_value_t = 60)]
    sample_every: usize,

    #[arg(long)]
    particles: Option<usize>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum)]
    policy: Option<Policy>,

    /// Write the summary here instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn load_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => {
            let json = fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            SimConfig::from_json(&json)
                .with_context(|| format!("parsing config {}", path.display()))?
        }
        None => SimConfig::default(),
    };
    if let Some(particles) = args.particles {
        config.num_particles = particles;
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(policy) = args.policy {
        config.field.relaxation = policy.into();
    }
    Ok(config)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let config = load_config(&args)?;

    log::info!(
        "{} particles, {}^3 lattice, {:?}, {} steps",
        config.num_particles,
        config.field.resolution,
        config.field.relaxation,
        args.steps
    );
    let mut world = World::try_new(config).context("building world")?;
    let summary = world
        .try_run_experiment(args.steps, args.sample_every)
        .context("running experiment")?;
    let json = serde_json::to_string_pretty(&summary)?;

    match &args.output {
        Some(path) => {
            fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
            log::info!("summary written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}
