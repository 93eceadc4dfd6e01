mod scenario;
mod trace;

use anyhow::Result;
use clap::Parser;
use peel_common::{Force, Time, init_tracer};
use peel_detection::SaveToFileFilter;
use rand::{SeedableRng, rngs::StdRng};
use scenario::Scenario;
use std::{io::stdout, path::PathBuf};
use trace::TraceParameters;
use tracing::{info, level_filters::LevelFilter};

#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    /// JSON scenario describing the trace, the built in scenario is used if omitted
    #[clap(long)]
    scenario: Option<PathBuf>,

    /// File to write the 'time,force' trace to, stdout if omitted
    #[clap(long)]
    output: Option<PathBuf>,

    /// Seed for the random number generator, drawn from the OS if omitted
    #[clap(long)]
    seed: Option<u64>,

    /// Milliseconds between samples
    #[clap(long, default_value = "10")]
    sample_period_ms: Time,

    /// Standard deviation of the gaussian noise added to every sample
    #[clap(long, default_value = "0.05")]
    noise_sd: Force,
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let tracer = init_tracer!(LevelFilter::INFO);

    let scenario = match &args.scenario {
        Some(path) => {
            info!("Loading scenario from {}", path.display());
            Scenario::load(path)?
        }
        None => Scenario::default(),
    };

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let parameters = TraceParameters {
        sample_period: args.sample_period_ms,
        noise_sd: args.noise_sd,
    };
    let trace = trace::generate(&scenario, &parameters, &mut rng)?;

    let count = match &args.output {
        Some(path) => {
            let count = trace.into_iter().save_to_file(path)?;
            info!("Wrote {count} samples to {}", path.display());
            count
        }
        None => trace.into_iter().save_to_writer(&mut stdout().lock())?,
    };
    info!("{} simulated {count} samples", tracer.service_name());
    Ok(())
}
