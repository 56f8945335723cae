use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

use crate::config::{LogFormat, LoggingConfig};

type OutputLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Install the global subscriber. `RUST_LOG` overrides the configured level.
///
/// Logs go to stderr; stdout carries answers.
pub fn init_logging(config: &LoggingConfig) {
    tracing_subscriber::registry()
        .with(output_layer(&config.format))
        .with(level_filter(&config.level))
        .init();

    tracing::debug!(level = %config.level, format = ?config.format, "Logging initialized");
}

fn output_layer(format: &LogFormat) -> OutputLayer {
    let layer = fmt::layer().with_writer(std::io::stderr);

    match format {
        LogFormat::Json => layer.json().with_current_span(false).boxed(),
        LogFormat::Pretty => layer.pretty().with_target(true).boxed(),
    }
}

fn level_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}
