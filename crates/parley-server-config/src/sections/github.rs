// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! GitHub OAuth application configuration, including GitHub Enterprise overrides.

use std::time::Duration;

use parley_common_secret::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const GITHUB_AUTHORIZE_URL: &str = "https://github.com/login/oauth/authorize";
pub const GITHUB_TOKEN_URL: &str = "https://github.com/login/oauth/access_token";
pub const GITHUB_API_BASE_URL: &str = "https://api.github.com";

const DEFAULT_CALLBACK_PATH: &str = "/oauth/github/callback";
const DEFAULT_TIMEOUT_SECS: u64 = 10;

fn default_scopes() -> Vec<String> {
	vec!["user:email".to_string(), "read:org".to_string()]
}

/// Configuration layer for GitHub OAuth (all fields optional for layering).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GitHubConfigLayer {
	pub client_id: Option<String>,
	#[serde(skip_serializing)]
	pub client_secret: Option<SecretString>,
	/// Public origin of the server, e.g. `https://chat.example.com`.
	pub domain: Option<String>,
	/// Path appended to `domain` to form the OAuth callback URL.
	pub callback_path: Option<String>,
	pub scopes: Option<Vec<String>>,
	/// Root of a GitHub Enterprise Server install, e.g. `https://ghe.example.com`.
	pub enterprise_base_url: Option<String>,
	/// User-Agent to send to the enterprise install. Ignored without a base URL.
	pub enterprise_user_agent: Option<String>,
	pub timeout_secs: Option<u64>,
}

impl GitHubConfigLayer {
	pub fn merge(&mut self, other: GitHubConfigLayer) {
		if other.client_id.is_some() {
			self.client_id = other.client_id;
		}
		if other.client_secret.is_some() {
			self.client_secret = other.client_secret;
		}
		if other.domain.is_some() {
			self.domain = other.domain;
		}
		if other.callback_path.is_some() {
			self.callback_path = other.callback_path;
		}
		if other.scopes.is_some() {
			self.scopes = other.scopes;
		}
		if other.enterprise_base_url.is_some() {
			self.enterprise_base_url = other.enterprise_base_url;
		}
		if other.enterprise_user_agent.is_some() {
			self.enterprise_user_agent = other.enterprise_user_agent;
		}
		if other.timeout_secs.is_some() {
			self.timeout_secs = other.timeout_secs;
		}
	}

	/// Build the final config, returning `None` if no client id is set.
	pub fn build(self) -> Result<Option<GitHubConfig>, ConfigError> {
		let Some(client_id) = self.client_id.filter(|s| !s.is_empty()) else {
			return Ok(None);
		};

		let client_secret = self.client_secret.ok_or_else(|| {
			ConfigError::Validation(
				"GitHub OAuth client_secret is required when client_id is set".to_string(),
			)
		})?;
		if client_secret.is_blank() {
			return Err(ConfigError::Validation(
				"GitHub OAuth client_secret cannot be empty".to_string(),
			));
		}

		let domain = self.domain.filter(|s| !s.is_empty()).ok_or_else(|| {
			ConfigError::Validation("GitHub OAuth domain is required when client_id is set".to_string())
		})?;
		let callback_path = self
			.callback_path
			.filter(|s| !s.is_empty())
			.unwrap_or_else(|| DEFAULT_CALLBACK_PATH.to_string());

		let enterprise_base_url = self
			.enterprise_base_url
			.map(|url| url.trim().trim_end_matches('/').to_string())
			.filter(|url| !url.is_empty());

		let (endpoints, user_agent) = match enterprise_base_url {
			Some(base) => (
				GitHubEndpoints::enterprise(&base),
				self.enterprise_user_agent.filter(|s| !s.is_empty()),
			),
			None => (GitHubEndpoints::default(), None),
		};

		let timeout_secs = self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS);
		if timeout_secs == 0 {
			return Err(ConfigError::Validation(
				"GitHub request timeout must be at least one second".to_string(),
			));
		}

		Ok(Some(GitHubConfig {
			client_id,
			client_secret,
			callback_url: format!("{}{}", domain.trim_end_matches('/'), callback_path),
			scopes: self.scopes.unwrap_or_else(default_scopes),
			endpoints,
			user_agent,
			timeout: Duration::from_secs(timeout_secs),
		}))
	}
}

/// URLs the login flow talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubEndpoints {
	pub authorize_url: String,
	pub token_url: String,
	/// Base for REST calls (`/user`, `/user/emails`, `/user/orgs`).
	pub api_base_url: String,
}

impl Default for GitHubEndpoints {
	fn default() -> Self {
		Self {
			authorize_url: GITHUB_AUTHORIZE_URL.to_string(),
			token_url: GITHUB_TOKEN_URL.to_string(),
			api_base_url: GITHUB_API_BASE_URL.to_string(),
		}
	}
}

impl GitHubEndpoints {
	/// GitHub Enterprise Server layout: web flow under the root, REST under `/api/v3`.
	pub fn enterprise(base_url: &str) -> Self {
		let base = base_url.trim_end_matches('/');
		Self {
			authorize_url: format!("{base}/login/oauth/authorize"),
			token_url: format!("{base}/login/oauth/access_token"),
			api_base_url: format!("{base}/api/v3"),
		}
	}

	pub fn user_url(&self) -> String {
		format!("{}/user", self.api_base_url)
	}

	pub fn emails_url(&self) -> String {
		format!("{}/user/emails", self.api_base_url)
	}

	pub fn orgs_url(&self) -> String {
		format!("{}/user/orgs", self.api_base_url)
	}
}

/// Validated GitHub OAuth configuration.
#[derive(Debug, Clone)]
pub struct GitHubConfig {
	pub client_id: String,
	pub client_secret: SecretString,
	pub callback_url: String,
	pub scopes: Vec<String>,
	pub endpoints: GitHubEndpoints,
	/// Custom User-Agent; `None` uses the standard Parley agent.
	pub user_agent: Option<String>,
	pub timeout: Duration,
}

impl GitHubConfig {
	/// Join scopes into a space-separated string.
	pub fn scopes_string(&self) -> String {
		self.scopes.join(" ")
	}

	/// Parse a scope string (space or comma separated) into individual scopes.
	pub fn parse_scopes(scope_str: &str) -> Vec<String> {
		scope_str
			.split([' ', ','])
			.map(|s| s.trim().to_string())
			.filter(|s| !s.is_empty())
			.collect()
	}
}
