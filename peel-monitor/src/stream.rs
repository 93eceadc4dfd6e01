use crate::{loader, processing::Processor};
use metrics::counter;
use peel_common::{
    Time,
    metrics::{
        failures::{self, FailureKind},
        names::FAILURES,
    },
};
use std::{future::Future, io};
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt},
    time::Instant,
};
use tracing::{error, info, warn};

/// Feeds lines from `reader` to the processor until EOF, `shutdown`
/// completes, or `max_peels` peels have been detected. Lines which cannot be
/// parsed are skipped, a read error ends the input. Returns the number of
/// lines read.
pub(crate) async fn process_lines<R, S>(
    processor: &mut Processor,
    reader: R,
    max_peels: Option<u64>,
    shutdown: S,
) -> usize
where
    R: AsyncBufRead + Unpin,
    S: Future<Output = io::Result<()>>,
{
    let start = Instant::now();
    let mut lines = reader.split(b'\n');
    let mut line_number = 0usize;

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            line = lines.next_segment() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => {
                        info!("End of input after {line_number} lines");
                        break;
                    }
                    Err(e) => {
                        error!("Failed to read input after line {line_number}: {e}");
                        counter!(FAILURES, &[failures::get_label(FailureKind::InputReadFailed)])
                            .increment(1);
                        break;
                    }
                };
                line_number += 1;
                match loader::parse_bytes(&line) {
                    Ok(Some(sample)) => {
                        let time = sample.time.unwrap_or_else(|| {
                            Time::try_from(start.elapsed().as_millis()).unwrap_or(Time::MAX)
                        });
                        processor.process(time, sample.force);
                        if max_peels.is_some_and(|max_peels| processor.stats().peels >= max_peels) {
                            info!("Reached {} peels", processor.stats().peels);
                            break;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        warn!("Line {line_number}: {e}");
                        counter!(FAILURES, &[failures::get_label(FailureKind::MalformedLine)])
                            .increment(1);
                    }
                }
            }
            _ = &mut shutdown => {
                info!("Interrupted");
                break;
            }
        }
    }
    line_number
}
