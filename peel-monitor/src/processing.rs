use metrics::{counter, gauge};
use peel_common::{
    Force, Time,
    metrics::{
        episodes::{self, EpisodeOutcome},
        failures::{self, FailureKind},
        names::{EPISODES, FAILURES, LAST_PEEL_PEAK, REFERENCE_FORCE, SAMPLES_PROCESSED},
    },
};
use peel_detection::{DetectorStats, PeelDetector, PeelEvent, SampleResult, Transition};
use std::fmt::Display;
use tracing::{debug, info, trace, warn};

/// Drives a detector, reporting every transition through tracing and metrics,
/// and keeps the committed peels for saving.
pub(crate) struct Processor {
    detector: PeelDetector,
    events: Vec<PeelEvent>,
}

impl Processor {
    pub(crate) fn new(detector: PeelDetector) -> Self {
        gauge!(REFERENCE_FORCE).set(detector.reference_force());
        Self {
            detector,
            events: Vec::default(),
        }
    }

    pub(crate) fn process(&mut self, time: Time, force: Force) -> SampleResult {
        let invalid_before = self.detector.stats().invalid_samples;
        let result = self.detector.process_sample(force, time);
        counter!(SAMPLES_PROCESSED).increment(1);

        if self.detector.stats().invalid_samples > invalid_before {
            warn!("Ignoring invalid force {force} at {time}ms");
            counter!(FAILURES, &[failures::get_label(FailureKind::InvalidSample)]).increment(1);
        }

        match &result.transition {
            Some(Transition::Started { time, force }) => {
                debug!("Episode started at {time}ms with force {force}");
                counter!(EPISODES, &[episodes::get_label(EpisodeOutcome::Started)]).increment(1);
            }
            Some(Transition::Committed(event)) => {
                info!(
                    peak = event.peak,
                    started_at = event.started_at,
                    ended_at = event.ended_at,
                    reference_force = event.reference_force,
                    "PEEL DETECTED"
                );
                counter!(EPISODES, &[episodes::get_label(EpisodeOutcome::Committed)])
                    .increment(1);
                if let Some(peak) = self.detector.peak_history().latest() {
                    gauge!(LAST_PEEL_PEAK).set(peak);
                }
                gauge!(REFERENCE_FORCE).set(event.reference_force);
                self.events.push(event.clone());
            }
            Some(Transition::Discarded(discarded)) => {
                debug!(
                    "Episode discarded at {0}ms, force stayed above {1} after peaking at {2}",
                    discarded.discarded_at,
                    self.detector.end_threshold(),
                    discarded.peak
                );
                counter!(EPISODES, &[episodes::get_label(EpisodeOutcome::Discarded)])
                    .increment(1);
            }
            None => trace!("{time}ms: {force} ({0})", result.state),
        }
        result
    }

    pub(crate) fn stats(&self) -> DetectorStats {
        self.detector.stats()
    }

    pub(crate) fn events(&self) -> &[PeelEvent] {
        &self.events
    }

    pub(crate) fn summary(&self) -> Summary {
        Summary {
            stats: self.detector.stats(),
            reference_force: self.detector.reference_force(),
            last_peak: self.detector.peak_history().latest(),
            history: self.detector.peak_history().to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Summary {
    pub(crate) stats: DetectorStats,
    pub(crate) reference_force: Force,
    pub(crate) last_peak: Option<Force>,
    pub(crate) history: Vec<Force>,
}

impl Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let history = self
            .history
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        let last_peak = self
            .last_peak
            .map_or_else(|| "none".to_owned(), |peak| peak.to_string());
        write!(
            f,
            "Samples: {0} ({1} invalid), Peels: {2}, Discarded: {3}, Reference Force: {4}, Last Peak: {last_peak}, History: [{history}]",
            self.stats.samples,
            self.stats.invalid_samples,
            self.stats.peels,
            self.stats.discarded,
            self.reference_force,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use peel_detection::DetectorConfig;

    fn processor() -> Processor {
        Processor::new(PeelDetector::new(DetectorConfig::default(), 20.0))
    }

    #[test]
    fn collects_committed_peels() {
        let mut processor = processor();
        let trace = [
            (0, 0.5),
            (10, 2.0),
            (20, 5.0),
            (600, 0.4),
            (700, 3.0),
            (800, 9.0),
            (1400, 0.1),
        ];
        let detected: Vec<_> = trace
            .into_iter()
            .map(|(time, force)| processor.process(time, force).peel_detected())
            .collect();
        assert_eq!(
            detected,
            vec![false, false, false, true, false, false, true]
        );
        let peaks: Vec<_> = processor.events().iter().map(|e| e.peak).collect();
        assert_eq!(peaks, vec![5.0, 9.0]);

        let summary = processor.summary();
        assert_eq!(summary.stats.peels, 2);
        assert_eq!(summary.history, vec![5.0, 9.0]);
        assert_eq!(summary.last_peak, Some(9.0));
        assert_approx_eq!(summary.reference_force, 7.0);
    }

    #[test]
    fn counts_invalid_and_discarded() {
        let mut processor = processor();
        processor.process(0, Force::NAN);
        processor.process(10, 5.0);
        processor.process(20, -1.0);
        processor.process(510, 4.0);

        let stats = processor.stats();
        assert_eq!(stats.samples, 4);
        assert_eq!(stats.invalid_samples, 2);
        assert_eq!(stats.discarded, 1);
        assert!(processor.events().is_empty());
        assert_eq!(processor.summary().last_peak, None);
    }

    #[test]
    fn summary_display() {
        let summary = Summary {
            stats: DetectorStats {
                samples: 100,
                invalid_samples: 1,
                peels: 2,
                discarded: 3,
            },
            reference_force: 7.5,
            last_peak: Some(10.0),
            history: vec![5.0, 10.0],
        };
        assert_eq!(
            summary.to_string(),
            "Samples: 100 (1 invalid), Peels: 2, Discarded: 3, Reference Force: 7.5, Last Peak: 10, History: [5, 10]"
        );
    }
}
