// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

/// Errors that can occur during OAuth operations.
#[derive(Debug, thiserror::Error)]
pub enum OAuthError {
	/// The HTTP request to GitHub failed (network error, timeout, etc.).
	#[error("HTTP request failed: {0}")]
	HttpRequest(#[from] reqwest::Error),

	/// A configured endpoint is not a valid URL.
	#[error("invalid endpoint URL: {0}")]
	InvalidUrl(#[from] url::ParseError),

	/// The response from GitHub could not be parsed as expected.
	#[error("failed to parse response: {0}")]
	ParseError(String),

	/// GitHub returned an error response (invalid code, expired token, etc.).
	#[error("GitHub API error: {0}")]
	GitHubError(String),
}
