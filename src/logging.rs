// src/logging.rs
// =============================================================================
// Installs the tracing subscriber for the CLI.
//
// Logs go to stderr so `--json` output on stdout stays machine-readable.
// RUST_LOG overrides the defaults, e.g. RUST_LOG=link_warden=trace
// =============================================================================

use anyhow::Result;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

pub fn init_logging(verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { "info" };
    let env_filter = EnvFilter::from_default_env()
        .add_directive(format!("link_warden={}", level).parse()?)
        .add_directive("warn".parse()?);

    let fmt_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()?;

    Ok(())
}
