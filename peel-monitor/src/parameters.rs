use clap::{Args, ValueEnum};
use peel_common::{DEFAULT_HISTORY_CAPACITY, Force, Time};
use peel_detection::{DetectorConfig, ReleasePolicy};
use std::{fs::File, io::BufReader, path::PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ConfigFileError {
    #[error("IO Error: {0}")]
    IO(#[from] std::io::Error),
    #[error("Invalid Detector Config: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Default, Debug, Clone, Copy, PartialEq, ValueEnum)]
pub(crate) enum ReleaseKind {
    /// Release as soon as the force falls to the end threshold
    Immediate,
    /// Judge release only once the confirmation window has passed since the last peak
    #[default]
    Debounced,
}

#[derive(Debug, Clone, Args)]
pub(crate) struct DetectorParameters {
    /// Absolute force above which a peel candidate begins
    #[clap(long, env = "PEEL_START_THRESHOLD", default_value = "1.0")]
    pub(crate) start_threshold: Force,

    /// Percentage of the reference force at or below which a peel has released
    #[clap(long, env = "PEEL_END_THRESHOLD_PERCENT", default_value = "10.0")]
    pub(crate) end_threshold_percent: Force,

    #[clap(long, value_enum, env = "PEEL_RELEASE_POLICY", default_value_t)]
    pub(crate) release_policy: ReleaseKind,

    /// Time in milliseconds which must pass after the last peak before release is judged
    #[clap(long, env = "PEEL_CONFIRMATION_WINDOW_MS", default_value = "500")]
    pub(crate) confirmation_window_ms: Time,

    /// Number of recent peaks averaged into the reference force
    #[clap(long, env = "PEEL_HISTORY_CAPACITY", default_value_t = DEFAULT_HISTORY_CAPACITY)]
    pub(crate) history_capacity: usize,

    /// Reference force used until the first peel is committed
    #[clap(long, env = "PEEL_REFERENCE_FORCE", default_value = "20.0")]
    pub(crate) reference_force: Force,

    /// JSON detector configuration, which replaces the threshold, policy and capacity options above
    #[clap(long, env = "PEEL_CONFIG_FILE")]
    pub(crate) config_file: Option<PathBuf>,
}

impl DetectorParameters {
    pub(crate) fn release(&self) -> ReleasePolicy {
        match self.release_policy {
            ReleaseKind::Immediate => ReleasePolicy::Immediate,
            ReleaseKind::Debounced => ReleasePolicy::Debounced {
                confirmation_window: self.confirmation_window_ms,
            },
        }
    }

    pub(crate) fn to_config(&self) -> Result<DetectorConfig, ConfigFileError> {
        match &self.config_file {
            Some(path) => Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?),
            None => Ok(DetectorConfig {
                start_threshold: self.start_threshold,
                end_threshold_percent: self.end_threshold_percent,
                release: self.release(),
                history_capacity: self.history_capacity,
            }),
        }
    }
}
