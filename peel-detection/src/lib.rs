//! This crate provides a state machine for recognising peel events in a
//! stream of force readings: episodes where the applied force rises above a
//! start threshold, reaches a peak, and falls back to a fraction of an
//! adaptive reference force.
//!
//! Typical usage feeds one reading at a time:
//! ```rust
//! use peel_detection::{DetectorConfig, PeelDetector};
//!
//! let mut detector = PeelDetector::new(DetectorConfig::default(), 20.0);
//! detector.process_sample(2.0, 10);
//! detector.process_sample(5.0, 20);
//! let result = detector.process_sample(0.4, 600);
//! assert_eq!(result.peel().map(|event| event.peak), Some(5.0));
//! assert_eq!(detector.reference_force(), 5.0);
//! ```
//! or adapts a recorded trace of `(time, force)` pairs:
//! ```rust
//! use peel_detection::{DetectorConfig, PeelDetector, PeelFilter};
//!
//! let trace: [(u64, f64); 4] = [(0, 0.5), (10, 2.0), (20, 5.0), (600, 0.4)];
//! let peaks: Vec<_> = trace
//!     .into_iter()
//!     .peels(PeelDetector::new(DetectorConfig::default(), 20.0))
//!     .map(|event| event.peak)
//!     .collect();
//! assert_eq!(peaks, vec![5.0]);
//! ```

pub mod config;
pub mod detector;
pub mod history;
pub mod iterators;

pub use config::{DegenerateConfig, DetectorConfig, ReleasePolicy};
pub use detector::{
    DetectorStats, DiscardedEpisode, Episode, EpisodeState, PeelDetector, PeelEvent, SampleResult,
    Transition,
};
pub use history::PeakHistory;
pub use iterators::{PeelFilter, SavablePoint, SaveToFileFilter};
