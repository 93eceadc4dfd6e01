mod loader;
mod metrics;
mod parameters;
mod processing;
mod stream;

use anyhow::Result;
use clap::{Parser, Subcommand};
use ::metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use parameters::DetectorParameters;
use peel_common::{
    init_tracer,
    metrics::{
        component_info_metric,
        failures::{self, FailureKind},
        names::FAILURES,
    },
};
use peel_detection::{PeelDetector, SaveToFileFilter};
use processing::Processor;
use std::{net::SocketAddr, path::PathBuf, time::Instant};
use tokio::io::BufReader;
use tracing::{error, info, level_filters::LevelFilter, warn};

#[derive(Debug, Parser)]
#[clap(author, version, about)]
struct Cli {
    #[command(flatten)]
    detector: DetectorParameters,

    /// If set, committed peels are written to this CSV file once input ends
    #[clap(long)]
    save_file: Option<PathBuf>,

    /// If set, Prometheus metrics are served on this address
    #[clap(long, env)]
    observability_address: Option<SocketAddr>,

    #[command(subcommand)]
    mode: Mode,
}

#[derive(Debug, Subcommand)]
enum Mode {
    #[clap(about = "Processes a recorded trace of 'time,force' lines.")]
    Replay(ReplayParameters),
    #[clap(
        about = "Processes 'time,force' or bare 'force' lines from stdin as they arrive, until EOF or Ctrl-C. Bare readings are timed on arrival."
    )]
    Stream(StreamParameters),
}

#[derive(Debug, Parser)]
struct ReplayParameters {
    /// Trace file to replay
    #[clap(long)]
    file: PathBuf,
}

#[derive(Debug, Parser)]
struct StreamParameters {
    /// Stop once this many peels have been detected
    #[clap(long)]
    max_peels: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    let tracer = init_tracer!(LevelFilter::INFO);

    if let Some(observability_address) = args.observability_address {
        PrometheusBuilder::new()
            .with_http_listener(observability_address)
            .install()?;
        info!("Serving metrics on {observability_address}");
    }
    metrics::describe();
    component_info_metric(tracer.service_name());

    let config = args.detector.to_config()?;
    if let Err(e) = config.check() {
        warn!("Degenerate detector configuration: {e}");
    }
    info!(
        "Detector configured: {config:?}, initial reference force: {0}",
        args.detector.reference_force
    );

    let mut processor = Processor::new(PeelDetector::new(config, args.detector.reference_force));

    match &args.mode {
        Mode::Replay(replay) => replay_trace(&mut processor, replay)?,
        Mode::Stream(parameters) => {
            stream::process_lines(
                &mut processor,
                BufReader::new(tokio::io::stdin()),
                parameters.max_peels,
                tokio::signal::ctrl_c(),
            )
            .await;
        }
    }

    info!("{}", processor.summary());

    if let Some(save_file) = &args.save_file {
        match processor.events().iter().cloned().save_to_file(save_file) {
            Ok(count) => info!("Saved {count} peels to {}", save_file.display()),
            Err(e) => {
                error!("Failed to save peels to {}: {e}", save_file.display());
                counter!(FAILURES, &[failures::get_label(FailureKind::FileWriteFailed)])
                    .increment(1);
                return Err(e.into());
            }
        }
    }
    Ok(())
}

fn replay_trace(processor: &mut Processor, replay: &ReplayParameters) -> Result<()> {
    let trace = loader::load_trace_file(&replay.file)?;
    info!(
        "Replaying {0} samples from {1}",
        trace.len(),
        replay.file.display()
    );
    let start = Instant::now();
    for (time, force) in trace {
        processor.process(time, force);
    }
    info!("Replay took {}us", start.elapsed().as_micros());
    Ok(())
}
