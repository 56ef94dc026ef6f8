//! Tracing subscriber setup

use tracing_subscriber::EnvFilter;

const DEFAULT_DIRECTIVES: &str = "warn";
const DEBUG_DIRECTIVES: &str = "warn,footprint_core=debug,pf_footprint=debug";

/// Filter directives: `--debug` wins over `RUST_LOG`, which wins over the default
pub fn filter(debug: bool) -> EnvFilter {
    if debug {
        return EnvFilter::new(DEBUG_DIRECTIVES);
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVES))
}

/// Install the stderr subscriber; stdout is reserved for the report
pub fn init(debug: bool) {
    // Fails only when a global subscriber is already set, e.g. under tests
    tracing_subscriber::fmt()
        .with_env_filter(filter(debug))
        .with_writer(std::io::stderr)
        .with_target(debug)
        .try_init()
        .ok();
}
