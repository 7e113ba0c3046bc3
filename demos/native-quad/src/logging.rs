use color_eyre::{Report, eyre::eyre};
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Configuration for console logging
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Default log level; `RUST_LOG` directives take precedence
    pub level: Level,
    /// Whether to print module paths with each event
    pub with_target: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { level: Level::INFO, with_target: false }
    }
}

impl LoggingConfig {
    /// Create logging configuration from environment variables
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(level) = std::env::var("BINDERY_LOG_LEVEL") {
            if let Ok(parsed_level) = level.parse::<Level>() {
                config.level = parsed_level;
            }
        }

        if std::env::var("BINDERY_LOG_TARGETS").is_ok() {
            config.with_target = true;
        }

        config
    }
}

/// Initialize the logging system with the given configuration
pub fn init_logging(config: &LoggingConfig) -> Result<(), Report> {
    let filter = EnvFilter::builder()
        .with_default_directive(config.level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(config.with_target))
        .try_init()
        .map_err(|e| eyre!("failed to install tracing subscriber: {e}"))
}
