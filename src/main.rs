//! buildstamp entry point.
//!
//! Renders build metadata definitions for a surrounding build tool and
//! writes them to stdout or to `BUILDSTAMP_OUTPUT`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use buildstamp::config::StampConfig;
use buildstamp::error::Result;
use buildstamp::stamp::run;

fn main() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    // stdout carries the rendered definitions, so logs go to stderr.
    // RUST_LOG=debug shows why a value fell back to a placeholder.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    tracing::debug!(
        version = env!("CARGO_PKG_VERSION"),
        git_hash = env!("BUILDSTAMP_GIT_HASH"),
        built = env!("BUILDSTAMP_BUILD_TIMESTAMP"),
        "buildstamp starting"
    );

    let config = StampConfig::from_env().inspect_err(|e| e.log_with_operation("load_config"))?;
    tracing::debug!(
        variant = %config.variant,
        timestamp = %config.timestamp_style,
        format = %config.format,
        "Configuration loaded"
    );

    run(&config, &mut std::io::stdout().lock())
        .map(|_| ())
        .inspect_err(|e| e.log_with_operation("render"))
}
