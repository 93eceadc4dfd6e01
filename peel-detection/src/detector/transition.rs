use super::EpisodeState;
use peel_common::{Force, Time};
use std::fmt::Display;

/// A confirmed peel, emitted on the sample which concluded it.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct PeelEvent {
    pub peak: Force,
    pub started_at: Time,
    pub peaked_at: Time,
    pub ended_at: Time,
    /// The reference force after this peak entered the history.
    pub reference_force: Force,
}

impl Display for PeelEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{0},{1},{2},{3},{4}",
            self.started_at, self.peaked_at, self.ended_at, self.peak, self.reference_force
        )
    }
}

/// An episode which never fell back below the end threshold within the
/// confirmation window, and so was dropped without entering the history.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct DiscardedEpisode {
    pub peak: Force,
    pub started_at: Time,
    pub discarded_at: Time,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Transition {
    Started { time: Time, force: Force },
    Committed(PeelEvent),
    Discarded(DiscardedEpisode),
}

#[derive(Debug, Clone, PartialEq)]
pub struct SampleResult {
    /// The state after the sample was processed.
    pub state: EpisodeState,
    pub transition: Option<Transition>,
}

impl SampleResult {
    pub(crate) fn unchanged(state: EpisodeState) -> Self {
        Self {
            state,
            transition: None,
        }
    }

    pub fn peel(&self) -> Option<&PeelEvent> {
        match &self.transition {
            Some(Transition::Committed(event)) => Some(event),
            _ => None,
        }
    }

    pub fn peel_detected(&self) -> bool {
        self.peel().is_some()
    }

    pub fn into_peel(self) -> Option<PeelEvent> {
        match self.transition {
            Some(Transition::Committed(event)) => Some(event),
            _ => None,
        }
    }
}

/// Running totals kept by a detector since construction or the last reset.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectorStats {
    pub samples: u64,
    pub invalid_samples: u64,
    pub peels: u64,
    pub discarded: u64,
}
