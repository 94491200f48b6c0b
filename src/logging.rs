//! Structured logging for the milestone CLI.
//!
//! Logs always go to stderr so the generated SQL on stdout can be piped.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "milestone=info";

/// Log format configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable format for development
    Pretty,
    /// JSON format (structured logging)
    Json,
    /// Compact single-line format
    Compact,
}

impl LogFormat {
    /// Parse from `MILESTONE_LOG_FORMAT`; compact when unset.
    pub fn from_env() -> Self {
        Self::parse(std::env::var("MILESTONE_LOG_FORMAT").ok().as_deref())
    }

    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("json") => LogFormat::Json,
            Some("pretty") => LogFormat::Pretty,
            _ => LogFormat::Compact,
        }
    }
}

/// Initialize logging.
///
/// Environment variables:
/// - `RUST_LOG`: filter directives (default `milestone=info`)
/// - `MILESTONE_LOG_FORMAT`: `pretty`, `json` or `compact`
///
/// `verbose` raises the default to `milestone=debug` when `RUST_LOG` is unset.
pub fn init(verbose: bool) {
    let format = LogFormat::from_env();
    let default = if verbose { "milestone=debug" } else { DEFAULT_FILTER };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let registry = tracing_subscriber::registry().with(env_filter);
    let result = match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
        LogFormat::Compact => registry
            .with(fmt::layer().compact().with_writer(std::io::stderr))
            .try_init(),
    };
    if result.is_ok() {
        tracing::debug!(format = ?format, "logging initialized");
    }
}
