use tracing::{debug, level_filters::LevelFilter};
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt};

pub struct TracerOptions {
    pub(crate) default_level: LevelFilter,
}

impl TracerOptions {
    pub fn new(default_level: LevelFilter) -> Self {
        Self { default_level }
    }
}

/// This object initialises the stderr tracer, given a TracerOptions struct.
/// Stdout is left free for data written by the binaries.
pub struct TracerEngine {
    service_name: String,
}

impl TracerEngine {
    /// Initialises the stderr tracer for the crate
    /// #Arguments
    /// * `options` - The caller-specified instance of TracerOptions.
    /// * `service_name` - The name of the binary, recorded in the first log line.
    /// * `module_name` - The name of the current module.
    /// #Returns
    /// An instance of TracerEngine
    pub fn new(options: TracerOptions, service_name: &str, module_name: &str) -> Self {
        let stderr_tracer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

        // `RUST_LOG` takes precedence over the default level
        let log_filter = EnvFilter::builder()
            .with_default_directive(options.default_level.into())
            .from_env_lossy();

        let subscriber =
            tracing_subscriber::Registry::default().with(stderr_tracer.with_filter(log_filter));

        //  This is only called once, so will never panic
        tracing::subscriber::set_global_default(subscriber)
            .expect("tracing::subscriber::set_global_default should only be called once");

        debug!("Tracer initialised for {service_name} in {module_name}");

        Self {
            service_name: service_name.to_owned(),
        }
    }

    pub fn service_name(&self) -> &str {
        &self.service_name
    }
}
