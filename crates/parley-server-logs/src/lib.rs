// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tracing setup for Parley servers.
//!
//! Every line written to stdout passes through a [`RedactingMakeWriter`], so an
//! OAuth access token that reaches a log statement by accident is replaced
//! with `[REDACTED:<rule-id>]` before it leaves the process.
//!
//! # Usage
//!
//! ```ignore
//! let config = parley_server_config::load_config()?;
//! parley_server_logs::init_tracing(&config.logging)?;
//! ```

mod redact;
mod redacting_writer;

pub use redact::redact;
pub use redacting_writer::{RedactingMakeWriter, RedactingWriter};

use parley_server_config::LoggingConfig;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::EnvFilter;

/// Filter from `RUST_LOG`, falling back to the configured level.
pub fn env_filter(config: &LoggingConfig) -> EnvFilter {
	EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level))
}

/// Install the global subscriber: env filter plus a redacting stdout fmt layer.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), TryInitError> {
	tracing_subscriber::registry()
		.with(env_filter(config))
		.with(tracing_subscriber::fmt::layer().with_writer(RedactingMakeWriter::new(std::io::stdout)))
		.try_init()
}
