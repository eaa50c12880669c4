//! Logging setup for the Kibitz binaries.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber with the specified default log level.
///
/// `RUST_LOG` takes precedence. Without it, the library crate of the binary
/// and the binary itself log at `default_log_level`.
///
/// # Arguments
///
/// * `crate_name` - The library crate whose events should be shown (e.g., "kibitz_server")
/// * `binary_name` - The name of the binary (e.g., "kibitz-server")
/// * `default_log_level` - The default log level (e.g., "debug", "info")
///
/// # Examples
///
/// ```no_run
/// use kibitz_shared::logger::setup_logger;
///
/// setup_logger("kibitz_server", env!("CARGO_PKG_NAME"), "debug");
/// ```
pub fn setup_logger(crate_name: &str, binary_name: &str, default_log_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_directives(crate_name, binary_name, default_log_level).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Build the fallback filter directives used when `RUST_LOG` is not set.
fn default_directives(crate_name: &str, binary_name: &str, default_log_level: &str) -> String {
    format!(
        "{}={},{}={},tower_http={}",
        crate_name.replace('-', "_"),
        default_log_level,
        binary_name.replace('-', "_"),
        default_log_level,
        default_log_level
    )
}
