//! Tracing subscriber setup for the binary
//!
//! Logs go to stderr so command output on stdout stays parseable. `RUST_LOG`
//! takes precedence over the verbosity flag.

use tracing_subscriber::EnvFilter;

/// Install the global subscriber; later calls are ignored
pub fn init(verbose: bool) {
    let default = if verbose { "agentdock=debug" } else { "agentdock=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
