use const_format::concatcp;
use metrics::{describe_gauge, gauge};

pub fn component_info_metric(name: &str) {
    static NAME: &str = concatcp!(names::METRIC_NAME_PREFIX, "component_info");

    describe_gauge!(NAME, "Basic information about the component");

    let git_rev = option_env!("GIT_VERSION").unwrap_or("unknown");
    gauge!(NAME, "component" => name.to_owned(), "git_version" => git_rev).set(1);
}

pub mod names {
    use const_format::concatcp;

    pub const METRIC_NAME_PREFIX: &str = "peel_detection_";

    pub const SAMPLES_PROCESSED: &str = concatcp!(METRIC_NAME_PREFIX, "samples_processed");
    pub const EPISODES: &str = concatcp!(METRIC_NAME_PREFIX, "episodes");
    pub const REFERENCE_FORCE: &str = concatcp!(METRIC_NAME_PREFIX, "reference_force");
    pub const LAST_PEEL_PEAK: &str = concatcp!(METRIC_NAME_PREFIX, "last_peel_peak");
    pub const FAILURES: &str = concatcp!(METRIC_NAME_PREFIX, "failures");
}

pub mod episodes {
    #[derive(Debug, Clone, Eq, Hash, PartialEq)]
    pub enum EpisodeOutcome {
        Started,
        Committed,
        Discarded,
    }

    // Label building function
    pub fn get_label(outcome: EpisodeOutcome) -> (&'static str, &'static str) {
        (
            "outcome",
            match outcome {
                EpisodeOutcome::Started => "started",
                EpisodeOutcome::Committed => "committed",
                EpisodeOutcome::Discarded => "discarded",
            },
        )
    }
}

pub mod failures {
    #[derive(Debug, Clone, Eq, Hash, PartialEq)]
    pub enum FailureKind {
        FileWriteFailed,
        InputReadFailed,
        InvalidSample,
        MalformedLine,
    }

    // Label building function
    pub fn get_label(failure_kind: FailureKind) -> (&'static str, &'static str) {
        (
            "failure_kind",
            match failure_kind {
                FailureKind::FileWriteFailed => "file_write_failed",
                FailureKind::InputReadFailed => "input_read_failed",
                FailureKind::InvalidSample => "invalid_sample",
                FailureKind::MalformedLine => "malformed_line",
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn metric_names() {
        assert_eq!(names::EPISODES, "peel_detection_episodes");
        assert_eq!(names::FAILURES, "peel_detection_failures");
    }

    #[test]
    fn labels() {
        assert_eq!(
            episodes::get_label(episodes::EpisodeOutcome::Discarded),
            ("outcome", "discarded")
        );
        assert_eq!(
            failures::get_label(failures::FailureKind::MalformedLine),
            ("failure_kind", "malformed_line")
        );
    }
}
