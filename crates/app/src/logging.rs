//! Logging setup for the terminal shell.
//!
//! Logs go to stderr so they never interleave with the rendered quiz on
//! stdout. `RUST_LOG` overrides the verbosity flag.

use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Map `-v` repetitions onto a level; quiet by default.
#[must_use]
pub fn level_from_verbosity(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Crate name of this binary as it appears in event targets.
const BIN_TARGET: &str = env!("CARGO_CRATE_NAME");

fn default_directives(level: Level) -> String {
    let level = level.as_str().to_lowercase();
    format!("warn,{BIN_TARGET}={level},quiz_core={level},quiz_services={level}")
}

fn build_env_filter(level: Level) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directives(level)))
}

/// # Errors
///
/// Returns an error if a global subscriber is already installed.
pub fn init_logging(verbosity: u8) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(level_from_verbosity(verbosity)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
}
