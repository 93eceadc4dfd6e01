use crate::scenario::{self, Scenario, ScenarioError, Segment};
use peel_common::{Force, Time};
use rand::Rng;
use rand_distr::Distribution;

pub(crate) struct TraceParameters {
    pub(crate) sample_period: Time,
    pub(crate) noise_sd: Force,
}

/// A segment with its random parameters drawn.
#[derive(Debug, Clone, PartialEq)]
enum Shape {
    Rest { duration: Time },
    Peel { peak: Force, rise: Time, fall: Time },
    Hold { level: Force, duration: Time },
}

fn to_duration(millis: f64) -> Time {
    // Negative or zero draws still occupy one millisecond
    millis.round().max(1.0) as Time
}

impl Shape {
    fn draw<R: Rng>(segment: &Segment, rng: &mut R) -> Result<Self, ScenarioError> {
        Ok(match segment {
            Segment::Rest { duration } => Shape::Rest {
                duration: to_duration(duration.sample(rng)?),
            },
            Segment::Peel { peak, rise, fall } => Shape::Peel {
                peak: peak.sample(rng)?,
                rise: to_duration(rise.sample(rng)?),
                fall: to_duration(fall.sample(rng)?),
            },
            Segment::Hold { level, duration } => Shape::Hold {
                level: level.sample(rng)?,
                duration: to_duration(duration.sample(rng)?),
            },
        })
    }

    fn duration(&self) -> Time {
        match *self {
            Shape::Rest { duration } | Shape::Hold { duration, .. } => duration,
            Shape::Peel { rise, fall, .. } => rise + fall,
        }
    }

    /// The noiseless force `offset` milliseconds into the segment.
    fn force_at(&self, offset: Time) -> Force {
        match *self {
            Shape::Rest { .. } => 0.0,
            Shape::Hold { level, .. } => level,
            Shape::Peel { peak, rise, fall } => {
                if offset < rise {
                    peak * offset as Force / rise as Force
                } else {
                    peak * (1.0 - (offset - rise) as Force / fall as Force)
                }
            }
        }
    }
}

/// Samples the scenario every `sample_period` milliseconds, adding gaussian
/// noise. Readings are clamped at zero as a load cell in tension never reports
/// a negative force.
pub(crate) fn generate<R: Rng>(
    scenario: &Scenario,
    parameters: &TraceParameters,
    rng: &mut R,
) -> Result<Vec<(Time, Force)>, ScenarioError> {
    let noise = scenario::normal(0.0, parameters.noise_sd)?;
    let sample_period = parameters.sample_period.max(1);

    let mut trace = Vec::new();
    let mut time: Time = 0;
    let mut segment_start: Time = 0;
    for segment in scenario.segments() {
        let shape = Shape::draw(segment, rng)?;
        let segment_end = segment_start + shape.duration();
        while time < segment_end {
            let force = shape.force_at(time - segment_start) + noise.sample(rng);
            trace.push((time, force.max(0.0)));
            time += sample_period;
        }
        segment_start = segment_end;
    }
    Ok(trace)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::RandomDistribution;
    use assert_approx_eq::assert_approx_eq;
    use peel_detection::{DetectorConfig, PeelDetector, PeelFilter};
    use rand::{SeedableRng, rngs::StdRng};

    fn constant(value: f64) -> RandomDistribution {
        RandomDistribution::Constant { value }
    }

    fn quiet(sample_period: Time) -> TraceParameters {
        TraceParameters {
            sample_period,
            noise_sd: 0.0,
        }
    }

    #[test]
    fn peel_shape() {
        let shape = Shape::Peel {
            peak: 10.0,
            rise: 100,
            fall: 200,
        };
        assert_eq!(shape.duration(), 300);
        assert_approx_eq!(shape.force_at(0), 0.0);
        assert_approx_eq!(shape.force_at(50), 5.0);
        assert_approx_eq!(shape.force_at(100), 10.0);
        assert_approx_eq!(shape.force_at(200), 5.0);
        assert_approx_eq!(shape.force_at(299), 0.05);
    }

    #[test]
    fn noiseless_trace() {
        let scenario = Scenario {
            repeat: 1,
            segments: vec![
                Segment::Rest {
                    duration: constant(100.0),
                },
                Segment::Peel {
                    peak: constant(8.0),
                    rise: constant(100.0),
                    fall: constant(100.0),
                },
            ],
        };
        let trace = generate(&scenario, &quiet(50), &mut StdRng::seed_from_u64(0)).unwrap();
        assert_eq!(
            trace,
            vec![
                (0, 0.0),
                (50, 0.0),
                (100, 0.0),
                (150, 4.0),
                (200, 8.0),
                (250, 4.0)
            ]
        );
    }

    #[test]
    fn negative_noise_is_rejected() {
        let parameters = TraceParameters {
            sample_period: 10,
            noise_sd: -1.0,
        };
        let result = generate(
            &Scenario::default(),
            &parameters,
            &mut StdRng::seed_from_u64(0),
        );
        assert!(matches!(result, Err(ScenarioError::InvalidDeviation(_))));
    }

    #[test]
    fn seeded_traces_repeat() {
        let scenario = Scenario::default();
        let parameters = TraceParameters {
            sample_period: 10,
            noise_sd: 0.2,
        };
        let first = generate(&scenario, &parameters, &mut StdRng::seed_from_u64(42)).unwrap();
        let second = generate(&scenario, &parameters, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(first, second);
        assert!(first.iter().all(|&(_, force)| force >= 0.0));
        assert!(first.windows(2).all(|pair| match pair {
            [(earlier, _), (later, _)] => earlier < later,
            _ => false,
        }));
    }

    #[test]
    fn detector_finds_simulated_peels() {
        let rest = Segment::Rest {
            duration: constant(1000.0),
        };
        let scenario = Scenario {
            repeat: 4,
            segments: vec![
                rest.clone(),
                Segment::Peel {
                    peak: constant(12.0),
                    rise: constant(200.0),
                    fall: constant(100.0),
                },
                rest,
            ],
        };
        let trace = generate(&scenario, &quiet(10), &mut StdRng::seed_from_u64(7)).unwrap();
        let mut peels = trace
            .into_iter()
            .peels(PeelDetector::new(DetectorConfig::default(), 20.0));
        let peaks: Vec<_> = peels.by_ref().map(|event| event.peak).collect();
        assert_eq!(peaks, vec![12.0; 4]);
        assert_approx_eq!(peels.detector().reference_force(), 12.0);
    }

    #[test]
    fn plateaus_are_discarded() {
        let scenario = Scenario {
            repeat: 1,
            segments: vec![Segment::Hold {
                level: constant(4.0),
                duration: constant(1500.0),
            }],
        };
        let trace = generate(&scenario, &quiet(10), &mut StdRng::seed_from_u64(7)).unwrap();
        let mut peels = trace
            .into_iter()
            .peels(PeelDetector::new(DetectorConfig::default(), 20.0));
        assert_eq!(peels.by_ref().count(), 0);

        let stats = peels.into_detector().stats();
        assert_eq!(stats.discarded, 2);
        assert_eq!(stats.peels, 0);
    }
}
