use metrics::{Unit, describe_counter, describe_gauge};
use peel_common::metrics::names::{
    EPISODES, FAILURES, LAST_PEEL_PEAK, REFERENCE_FORCE, SAMPLES_PROCESSED,
};

pub(crate) fn describe() {
    describe_counter!(
        SAMPLES_PROCESSED,
        Unit::Count,
        "Number of force samples passed to the detector"
    );
    describe_counter!(
        EPISODES,
        Unit::Count,
        "Number of episodes started, committed as peels, or discarded"
    );
    describe_counter!(
        FAILURES,
        Unit::Count,
        "Number of invalid samples, malformed lines, read failures and failed writes"
    );
    describe_gauge!(
        REFERENCE_FORCE,
        "Current reference force, the mean of the recent peak history"
    );
    describe_gauge!(LAST_PEEL_PEAK, "Peak force of the most recent peel");
}
