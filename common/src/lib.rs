pub mod metrics;
pub mod tracer;

/// Instantaneous force as reported by the load cell, in the sensor's own units.
pub type Force = f64;

/// Milliseconds on a monotonic clock.
pub type Time = u64;

/// The number of entries kept in a detector's peak history unless configured otherwise.
pub const DEFAULT_HISTORY_CAPACITY: usize = 10;
