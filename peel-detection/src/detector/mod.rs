mod episode;
mod transition;

pub use episode::{Episode, EpisodeState};
pub use transition::{DetectorStats, DiscardedEpisode, PeelEvent, SampleResult, Transition};

use crate::{DetectorConfig, PeakHistory, ReleasePolicy};
use peel_common::{Force, Time};

/// Samples which are not finite, or are negative, never start, extend or end an episode.
fn is_valid(force: Force) -> bool {
    force.is_finite() && force >= 0.0
}

/// Classifies a stream of force readings into peel episodes.
///
/// An episode begins when the force exceeds the configured start threshold,
/// tracks the highest force seen, and ends once the force falls to a
/// percentage of the reference force. The reference force is the mean of the
/// most recent committed peaks, so every committed peel feeds back into the
/// threshold used to judge the next one.
#[derive(Debug, Clone)]
pub struct PeelDetector {
    config: DetectorConfig,
    reference_force: Force,
    history: PeakHistory,
    episode: Option<Episode>,
    stats: DetectorStats,
}

impl PeelDetector {
    /// Creates an idle detector with an empty history.
    /// # Arguments
    /// * `config` - thresholds and release policy.
    /// * `reference_force` - the baseline used until the first peel is committed,
    ///   typically supplied by the device's calibration.
    pub fn new(config: DetectorConfig, reference_force: Force) -> Self {
        Self {
            history: PeakHistory::with_capacity(config.history_capacity),
            config,
            reference_force,
            episode: None,
            stats: DetectorStats::default(),
        }
    }

    /// Advances the state machine by one reading.
    /// # Arguments
    /// * `force` - the instantaneous reading.
    /// * `now` - a monotonically non-decreasing timestamp in milliseconds.
    /// # Returns
    /// The state after this sample, and the transition it caused, if any.
    pub fn process_sample(&mut self, force: Force, now: Time) -> SampleResult {
        self.stats.samples += 1;
        if !is_valid(force) {
            self.stats.invalid_samples += 1;
            return SampleResult::unchanged(self.state());
        }

        let Some(episode) = self.episode.as_mut() else {
            if force > self.config.start_threshold {
                self.episode = Some(Episode::begin(now, force));
                return SampleResult {
                    state: EpisodeState::Tracking,
                    transition: Some(Transition::Started { time: now, force }),
                };
            }
            return SampleResult::unchanged(EpisodeState::Idle);
        };

        episode.rise_to(now, force);
        let since_last_rise = episode.since_last_rise(now);
        let released = force <= self.config.end_threshold(self.reference_force);

        match self.config.release {
            ReleasePolicy::Immediate if released => self.commit(now),
            ReleasePolicy::Immediate => SampleResult::unchanged(EpisodeState::Tracking),
            ReleasePolicy::Debounced {
                confirmation_window,
            } => {
                if since_last_rise < confirmation_window {
                    SampleResult::unchanged(EpisodeState::Tracking)
                } else if released {
                    self.commit(now)
                } else {
                    self.discard(now)
                }
            }
        }
    }

    fn commit(&mut self, now: Time) -> SampleResult {
        let Some(episode) = self.episode.take() else {
            return SampleResult::unchanged(EpisodeState::Idle);
        };
        // The peak must enter the history before the mean is taken
        self.history.push(episode.running_peak);
        if let Some(mean) = self.history.mean() {
            self.reference_force = mean;
        }
        self.stats.peels += 1;
        SampleResult {
            state: EpisodeState::Idle,
            transition: Some(Transition::Committed(PeelEvent {
                peak: episode.running_peak,
                started_at: episode.started_at,
                peaked_at: episode.last_rise_at,
                ended_at: now,
                reference_force: self.reference_force,
            })),
        }
    }

    fn discard(&mut self, now: Time) -> SampleResult {
        let Some(episode) = self.episode.take() else {
            return SampleResult::unchanged(EpisodeState::Idle);
        };
        self.stats.discarded += 1;
        SampleResult {
            state: EpisodeState::Idle,
            transition: Some(Transition::Discarded(DiscardedEpisode {
                peak: episode.running_peak,
                started_at: episode.started_at,
                discarded_at: now,
            })),
        }
    }

    /// Returns to idle with an empty history and the given reference force.
    pub fn reset(&mut self, reference_force: Force) {
        self.reference_force = reference_force;
        self.history.clear();
        self.episode = None;
        self.stats = DetectorStats::default();
    }

    /// Replaces the configuration. Any episode in progress carries on under
    /// the new thresholds. If the history capacity changes, the most recent
    /// peaks are kept and the reference force is left as it was.
    pub fn reconfigure(&mut self, config: DetectorConfig) {
        if config.history_capacity.max(1) != self.history.capacity() {
            let mut history = PeakHistory::with_capacity(config.history_capacity);
            for peak in self.history.iter() {
                history.push(peak);
            }
            self.history = history;
        }
        self.config = config;
    }

    pub fn state(&self) -> EpisodeState {
        if self.episode.is_some() {
            EpisodeState::Tracking
        } else {
            EpisodeState::Idle
        }
    }

    pub fn reference_force(&self) -> Force {
        self.reference_force
    }

    /// The force at or below which the current episode would be released.
    pub fn end_threshold(&self) -> Force {
        self.config.end_threshold(self.reference_force)
    }

    pub fn peak_history(&self) -> &PeakHistory {
        &self.history
    }

    pub fn episode(&self) -> Option<&Episode> {
        self.episode.as_ref()
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    pub fn stats(&self) -> DetectorStats {
        self.stats
    }
}
