//! Logging setup for the command-line tool
//!
//! Logs go to stderr so that stdout only carries command output. `RUST_LOG`
//! takes precedence over the default filter.

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "warn";
const VERBOSE_FILTER: &str = "warn,scenekit=debug,scenekit_core=debug,scenekit_editor=debug,scenekit_analyzer=debug";

/// Initialize the global subscriber
pub fn init(verbose: bool) -> anyhow::Result<()> {
    let default_filter = if verbose { VERBOSE_FILTER } else { DEFAULT_FILTER };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    let console_layer = fmt::layer()
        .with_target(verbose)
        .with_file(verbose)
        .with_line_number(verbose)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .try_init()?;

    Ok(())
}
