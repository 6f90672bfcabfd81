//! Diagnostic logging for the `sqi` binary.
//!
//! Logs go to stderr so they never mix with JSON results on stdout.

use tracing_subscriber::EnvFilter;

/// Environment variable consulted when `--log-level` is not given.
pub const LOG_ENV: &str = "SQI_LOG";

const DEFAULT_LEVEL: &str = "warn";

/// Picks the filter directive.
///
/// Precedence (highest to lowest):
///
/// 1. `--log-level`
/// 2. `SQI_LOG`
/// 3. `warn`
fn filter_directive(cli_level: Option<&str>, env_level: Option<&str>) -> String {
    cli_level
        .or(env_level)
        .map(str::trim)
        .filter(|level| !level.is_empty())
        .unwrap_or(DEFAULT_LEVEL)
        .to_string()
}

/// Installs the global subscriber.
///
/// A subscriber that is already installed (tests, embedding tools) is kept.
pub fn init_logging(cli_level: Option<&str>) {
    let env_level = std::env::var(LOG_ENV).ok();
    let filter = EnvFilter::new(filter_directive(cli_level, env_level.as_deref()));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
