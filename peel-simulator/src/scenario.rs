use rand::Rng;
use rand_distr::{Distribution, Normal, NormalError};
use serde::Deserialize;
use std::{fs::File, io::BufReader, path::Path};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum ScenarioError {
    #[error("IO Error: {0}")]
    IO(#[from] std::io::Error),
    #[error("Invalid Scenario: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid Normal Distribution: {0}")]
    Normal(#[from] NormalError),
    #[error("Standard Deviation {0} is not Non-negative")]
    InvalidDeviation(f64),
    #[error("Uniform Distribution Range {min}..{max} is Empty")]
    EmptyRange { min: f64, max: f64 },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "random-type")]
pub(crate) enum RandomDistribution {
    Constant { value: f64 },
    Uniform { min: f64, max: f64 },
    Normal { mean: f64, sd: f64 },
}

impl RandomDistribution {
    pub(crate) fn sample<R: Rng>(&self, rng: &mut R) -> Result<f64, ScenarioError> {
        match *self {
            Self::Constant { value } => Ok(value),
            Self::Uniform { min, max } if min == max => Ok(min),
            Self::Uniform { min, max } if min < max => Ok(rng.random_range(min..max)),
            Self::Uniform { min, max } => Err(ScenarioError::EmptyRange { min, max }),
            Self::Normal { mean, sd } => Ok(normal(mean, sd)?.sample(rng)),
        }
    }
}

/// Builds a normal distribution, rejecting a negative or NaN deviation
/// which `Normal::new` would otherwise accept.
pub(crate) fn normal(mean: f64, sd: f64) -> Result<Normal<f64>, ScenarioError> {
    if sd.is_nan() || sd < 0.0 {
        return Err(ScenarioError::InvalidDeviation(sd));
    }
    Ok(Normal::new(mean, sd)?)
}

/// One stretch of a simulated trace. Durations are in milliseconds.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", tag = "segment-type")]
pub(crate) enum Segment {
    /// No load applied.
    Rest { duration: RandomDistribution },
    /// A linear rise to `peak` over `rise`, then a linear fall back to zero over `fall`.
    Peel {
        peak: RandomDistribution,
        rise: RandomDistribution,
        fall: RandomDistribution,
    },
    /// A constant load which is never released within the segment.
    Hold {
        level: RandomDistribution,
        duration: RandomDistribution,
    },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) struct Scenario {
    #[serde(default = "Scenario::default_repeat")]
    pub(crate) repeat: usize,
    pub(crate) segments: Vec<Segment>,
}

impl Scenario {
    fn default_repeat() -> usize {
        1
    }

    pub(crate) fn load(path: &Path) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_reader(BufReader::new(File::open(path)?))?)
    }

    pub(crate) fn segments(&self) -> impl Iterator<Item = &Segment> {
        (0..self.repeat).flat_map(|_| self.segments.iter())
    }
}

impl Default for Scenario {
    /// Five cycles of a peel of around 15 units followed by a sustained load.
    fn default() -> Self {
        let rest = Segment::Rest {
            duration: RandomDistribution::Uniform {
                min: 800.0,
                max: 1200.0,
            },
        };
        Self {
            repeat: 5,
            segments: vec![
                rest.clone(),
                Segment::Peel {
                    peak: RandomDistribution::Normal {
                        mean: 15.0,
                        sd: 3.0,
                    },
                    rise: RandomDistribution::Uniform {
                        min: 100.0,
                        max: 300.0,
                    },
                    fall: RandomDistribution::Uniform {
                        min: 50.0,
                        max: 150.0,
                    },
                },
                rest,
                Segment::Hold {
                    level: RandomDistribution::Constant { value: 4.0 },
                    duration: RandomDistribution::Constant { value: 1500.0 },
                },
            ],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{SeedableRng, rngs::StdRng};

    #[test]
    fn deserialise_scenario() {
        let scenario: Scenario = serde_json::from_str(
            r#"{
                "repeat": 3,
                "segments": [
                    { "segment-type": "rest", "duration": { "random-type": "constant", "value": 500 } },
                    {
                        "segment-type": "peel",
                        "peak": { "random-type": "normal", "mean": 12.0, "sd": 1.5 },
                        "rise": { "random-type": "uniform", "min": 100, "max": 200 },
                        "fall": { "random-type": "constant", "value": 80 }
                    },
                    {
                        "segment-type": "hold",
                        "level": { "random-type": "constant", "value": 3.0 },
                        "duration": { "random-type": "constant", "value": 1000 }
                    }
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(scenario.repeat, 3);
        assert_eq!(scenario.segments.len(), 3);
        assert_eq!(scenario.segments().count(), 9);
        assert_eq!(
            scenario.segments.first(),
            Some(&Segment::Rest {
                duration: RandomDistribution::Constant { value: 500.0 }
            })
        );
    }

    #[test]
    fn repeat_defaults_to_one() {
        let scenario: Scenario = serde_json::from_str(r#"{ "segments": [] }"#).unwrap();
        assert_eq!(scenario.repeat, 1);
    }

    #[test]
    fn sample_distributions() {
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(
            RandomDistribution::Constant { value: 2.5 }
                .sample(&mut rng)
                .unwrap(),
            2.5
        );
        for _ in 0..100 {
            let value = RandomDistribution::Uniform { min: 1.0, max: 2.0 }
                .sample(&mut rng)
                .unwrap();
            assert!((1.0..2.0).contains(&value));
        }
        assert_eq!(
            RandomDistribution::Uniform { min: 3.0, max: 3.0 }
                .sample(&mut rng)
                .unwrap(),
            3.0
        );
        assert_eq!(
            RandomDistribution::Normal { mean: 7.0, sd: 0.0 }
                .sample(&mut rng)
                .unwrap(),
            7.0
        );
    }

    #[test]
    fn invalid_distributions() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            RandomDistribution::Uniform { min: 2.0, max: 1.0 }.sample(&mut rng),
            Err(ScenarioError::EmptyRange { .. })
        ));
        assert!(matches!(
            RandomDistribution::Normal {
                mean: 0.0,
                sd: -1.0
            }
            .sample(&mut rng),
            Err(ScenarioError::InvalidDeviation(sd)) if sd == -1.0
        ));
        assert!(matches!(
            RandomDistribution::Normal {
                mean: 0.0,
                sd: f64::NAN
            }
            .sample(&mut rng),
            Err(ScenarioError::InvalidDeviation(_))
        ));
        assert!(matches!(
            RandomDistribution::Normal {
                mean: 0.0,
                sd: f64::INFINITY
            }
            .sample(&mut rng),
            Err(ScenarioError::Normal(_))
        ));
    }
}
