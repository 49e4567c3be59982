//! Tracing setup for machscope.
//!
//! Log records always go to stderr so that reports written to stdout stay
//! machine readable. `RUST_LOG` overrides the level chosen by the caller.

use std::sync::Once;
use tracing::debug;
use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

static INIT: Once = Once::new();

/// Filter used when neither `RUST_LOG` nor a verbosity is given.
pub const DEFAULT_FILTER: &str = "warn";

/// Output format of log records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Map a `-v` count to a filter directive.
pub fn verbosity_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => DEFAULT_FILTER,
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

/// Install the global subscriber once; later calls do nothing.
///
/// Fails silently when another subscriber is already installed, as happens
/// under test harnesses.
pub fn init(format: LogFormat, filter: &str) {
    INIT.call_once(|| {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
        let registry = tracing_subscriber::registry().with(env_filter);

        let installed = match format {
            LogFormat::Text => registry
                .with(
                    fmt::layer()
                        .with_writer(std::io::stderr)
                        .with_span_events(FmtSpan::CLOSE)
                        .with_target(true),
                )
                .try_init(),
            LogFormat::Json => registry
                .with(
                    fmt::layer()
                        .json()
                        .with_writer(std::io::stderr)
                        .with_span_events(FmtSpan::CLOSE)
                        .with_file(true)
                        .with_line_number(true)
                        .with_current_span(true),
                )
                .try_init(),
        };

        if installed.is_ok() {
            debug!(?format, filter, "machscope tracing initialized");
        }
    });
}

/// Text output at the default level
pub fn init_tracing() {
    init(LogFormat::Text, DEFAULT_FILTER);
}

/// JSON output at the default level
pub fn init_tracing_json() {
    init(LogFormat::Json, DEFAULT_FILTER);
}

/// Log an error and hand it back, for use inside `map_err`
#[macro_export]
macro_rules! log_error {
    ($err:expr) => {{
        let e = $err;
        tracing::error!(error = %e, "Operation failed");
        e
    }};
    ($err:expr, $msg:expr) => {{
        let e = $err;
        tracing::error!(error = %e, message = $msg, "Operation failed");
        e
    }};
}
