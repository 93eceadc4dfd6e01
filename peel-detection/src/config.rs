use peel_common::{DEFAULT_HISTORY_CAPACITY, Force, Time};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Decides when a tracked episode is allowed to end.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "policy")]
pub enum ReleasePolicy {
    /// Release fires on the first sample at or below the end threshold.
    Immediate,
    /// Release is only evaluated once `confirmation_window` milliseconds have
    /// passed since the last new peak. Episodes still above the end threshold
    /// at that point are discarded.
    Debounced {
        #[serde(rename = "confirmation-window-ms")]
        confirmation_window: Time,
    },
}

impl Default for ReleasePolicy {
    fn default() -> Self {
        Self::Debounced {
            confirmation_window: 500,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct DetectorConfig {
    /// Absolute force above which a peel candidate begins.
    pub start_threshold: Force,
    /// Percentage of the reference force at or below which an episode counts as released.
    pub end_threshold_percent: Force,
    pub release: ReleasePolicy,
    pub history_capacity: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            start_threshold: 1.0,
            end_threshold_percent: 10.0,
            release: ReleasePolicy::default(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum DegenerateConfig {
    #[error("End threshold of {0}% is not below the reference force, episodes release on any sample")]
    EndThresholdTooHigh(Force),
    #[error("Start threshold {0} is not positive, any valid sample begins an episode")]
    NonPositiveStartThreshold(Force),
    #[error("History capacity is zero, a single peak will be kept")]
    EmptyHistory,
    #[error("Confirmation window is zero, episodes are judged on the sample after they start")]
    ZeroConfirmationWindow,
}

impl DetectorConfig {
    /// The force at or below which an episode is considered released.
    pub fn end_threshold(&self, reference_force: Force) -> Force {
        reference_force * self.end_threshold_percent / 100.0
    }

    /// Reports the first setting which makes the detector behave degenerately.
    /// This is advisory only, the detector accepts such configurations as given.
    pub fn check(&self) -> Result<(), DegenerateConfig> {
        if self.end_threshold_percent >= 100.0 {
            return Err(DegenerateConfig::EndThresholdTooHigh(
                self.end_threshold_percent,
            ));
        }
        if self.start_threshold <= 0.0 {
            return Err(DegenerateConfig::NonPositiveStartThreshold(
                self.start_threshold,
            ));
        }
        if self.history_capacity == 0 {
            return Err(DegenerateConfig::EmptyHistory);
        }
        if self.release
            == (ReleasePolicy::Debounced {
                confirmation_window: 0,
            })
        {
            return Err(DegenerateConfig::ZeroConfirmationWindow);
        }
        Ok(())
    }

    pub fn with_start_threshold(self, start_threshold: Force) -> Self {
        Self {
            start_threshold,
            ..self
        }
    }

    pub fn with_end_threshold_percent(self, end_threshold_percent: Force) -> Self {
        Self {
            end_threshold_percent,
            ..self
        }
    }

    pub fn with_release(self, release: ReleasePolicy) -> Self {
        Self { release, ..self }
    }

    pub fn with_history_capacity(self, history_capacity: usize) -> Self {
        Self {
            history_capacity,
            ..self
        }
    }
}
