use peel_common::{Force, Time};
use std::{
    fs::File,
    io::{BufRead, BufReader},
    num::{ParseFloatError, ParseIntError},
    path::Path,
    str::FromStr,
};
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub(crate) enum SampleParseError {
    #[error("Invalid Time: {0}")]
    Time(#[from] ParseIntError),
    #[error("Invalid Force: {0}")]
    Force(#[from] ParseFloatError),
    #[error("Invalid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("Incorrect number of fields, expected pattern 'time,force' or 'force', got '{0}'")]
    Pattern(String),
}

#[derive(Debug, Error)]
pub(crate) enum TraceLoadError {
    #[error("IO Error: {0}")]
    IO(#[from] std::io::Error),
    #[error("Line {line}: {source}")]
    Line {
        line: usize,
        source: SampleParseError,
    },
    #[error("Line {0}: Missing timestamp, recorded traces require 'time,force'")]
    MissingTime(usize),
}

/// A single reading. The timestamp is optional so that live input can
/// consist of bare force values, timed on arrival.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Sample {
    pub(crate) time: Option<Time>,
    pub(crate) force: Force,
}

impl FromStr for Sample {
    type Err = SampleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let vals: Vec<_> = s.split(',').map(str::trim).collect();
        match vals.as_slice() {
            [force] => Ok(Sample {
                time: None,
                force: Force::from_str(force)?,
            }),
            [time, force] => Ok(Sample {
                time: Some(Time::from_str(time)?),
                force: Force::from_str(force)?,
            }),
            _ => Err(SampleParseError::Pattern(s.to_owned())),
        }
    }
}

/// Parses one line of a trace. Blank lines, `#` comments and the
/// `time,force` header yield None.
pub(crate) fn parse_line(line: &str) -> Result<Option<Sample>, SampleParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') || is_header(line) {
        Ok(None)
    } else {
        line.parse().map(Some)
    }
}

/// As [parse_line], for a line read as raw bytes.
pub(crate) fn parse_bytes(line: &[u8]) -> Result<Option<Sample>, SampleParseError> {
    parse_line(std::str::from_utf8(line)?)
}

fn is_header(line: &str) -> bool {
    line.replace(' ', "").eq_ignore_ascii_case("time,force")
}

pub(crate) fn read_trace<R: BufRead>(reader: R) -> Result<Vec<(Time, Force)>, TraceLoadError> {
    let mut trace = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line_number = index + 1;
        let sample = parse_line(&line?).map_err(|source| TraceLoadError::Line {
            line: line_number,
            source,
        })?;
        if let Some(Sample { time, force }) = sample {
            let time = time.ok_or(TraceLoadError::MissingTime(line_number))?;
            trace.push((time, force));
        }
    }
    Ok(trace)
}

pub(crate) fn load_trace_file(path: &Path) -> Result<Vec<(Time, Force)>, TraceLoadError> {
    read_trace(BufReader::new(File::open(path)?))
}
