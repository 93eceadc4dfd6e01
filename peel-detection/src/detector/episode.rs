use peel_common::{Force, Time};
use strum::Display;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum EpisodeState {
    /// No candidate peel in progress.
    #[default]
    Idle,
    /// Force has exceeded the start threshold and its peak is being tracked.
    Tracking,
}

/// A candidate peel, alive only while the detector is tracking.
#[derive(Debug, Clone, PartialEq)]
pub struct Episode {
    pub(crate) running_peak: Force,
    pub(crate) started_at: Time,
    pub(crate) last_rise_at: Time,
}

impl Episode {
    pub(crate) fn begin(time: Time, force: Force) -> Self {
        Self {
            running_peak: force,
            started_at: time,
            last_rise_at: time,
        }
    }

    /// Raises the running peak if `force` exceeds it, returning true if it did.
    pub(crate) fn rise_to(&mut self, time: Time, force: Force) -> bool {
        if force > self.running_peak {
            self.running_peak = force;
            self.last_rise_at = time;
            true
        } else {
            false
        }
    }

    /// Milliseconds since the most recent new peak. A clock which has
    /// run backwards yields zero.
    pub(crate) fn since_last_rise(&self, time: Time) -> Time {
        time.saturating_sub(self.last_rise_at)
    }

    pub fn running_peak(&self) -> Force {
        self.running_peak
    }

    pub fn started_at(&self) -> Time {
        self.started_at
    }

    pub fn last_rise_at(&self) -> Time {
        self.last_rise_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rising_resets_clock() {
        let mut episode = Episode::begin(10, 2.0);
        assert!(episode.rise_to(20, 5.0));
        assert_eq!(episode.running_peak(), 5.0);
        assert_eq!(episode.last_rise_at(), 20);
        assert_eq!(episode.started_at(), 10);

        assert!(!episode.rise_to(30, 5.0));
        assert!(!episode.rise_to(40, 3.0));
        assert_eq!(episode.last_rise_at(), 20);
        assert_eq!(episode.since_last_rise(600), 580);
    }

    #[test]
    fn backwards_clock_saturates() {
        let episode = Episode::begin(100, 2.0);
        assert_eq!(episode.since_last_rise(50), 0);
    }

    #[test]
    fn state_names() {
        assert_eq!(EpisodeState::Idle.to_string(), "idle");
        assert_eq!(EpisodeState::Tracking.to_string(), "tracking");
    }
}
