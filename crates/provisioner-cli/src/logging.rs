//! Tracing setup
//!
//! Logs go to stderr so stdout carries only the JSON result record.
//! `RUST_LOG` overrides the default filter.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let default_filter =
        format!("provisioner={level},provisioner_core={level},provisioner_gdrive={level}");

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();
}
