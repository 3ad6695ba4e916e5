// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared HTTP client construction for Parley.
//!
//! Every outbound call to an identity provider goes through a client built here
//! so the User-Agent and timeout are applied consistently. No retry layer is
//! installed: a failed provider call is reported to the caller immediately.

use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Timeout applied when the caller does not configure one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Returns the standard Parley User-Agent string.
///
/// Format: `parley/{version}`
pub fn user_agent() -> String {
	format!("parley/{}", env!("CARGO_PKG_VERSION"))
}

/// Client builder with the standard Parley User-Agent header.
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Client builder with a custom User-Agent header.
///
/// GitHub Enterprise deployments sometimes filter on the agent string, so the
/// login strategy allows overriding it.
pub fn builder_with_user_agent(user_agent: impl Into<String>) -> ClientBuilder {
	Client::builder().user_agent(user_agent.into())
}

/// Build a client with an optional User-Agent override and a request timeout.
pub fn build_client(
	user_agent_override: Option<&str>,
	timeout: Duration,
) -> Result<Client, reqwest::Error> {
	let builder = match user_agent_override {
		Some(agent) => {
			tracing::debug!(user_agent = agent, "using custom User-Agent");
			builder_with_user_agent(agent)
		}
		None => builder(),
	};

	builder.timeout(timeout).build()
}
