mod tracer_engine;

pub use tracer_engine::{TracerEngine, TracerOptions};

/// Should be called at the start of each binary, before anything is logged.
/// # Arguments
/// - level: tracing::level_filters::LevelFilter used when `RUST_LOG` is unset or invalid.
///
/// # Returns
/// A TracerEngine which should be held for the lifetime of the program.
#[macro_export]
macro_rules! init_tracer {
    ($level:expr) => {{
        $crate::tracer::TracerEngine::new(
            $crate::tracer::TracerOptions::new($level),
            env!("CARGO_BIN_NAME"),
            module_path!(),
        )
    }};
}
