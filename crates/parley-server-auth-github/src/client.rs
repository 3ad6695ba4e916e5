// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! GitHub OAuth client.
//!
//! Talks to github.com or to a GitHub Enterprise Server install, depending on
//! the [`GitHubEndpoints`] in the configuration. Access tokens travel as
//! [`SecretString`] and every traced call skips them.

use parley_common_secret::SecretString;
use parley_server_config::{GitHubConfig, GitHubEndpoints};
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::OAuthError;

const GITHUB_API_VERSION: &str = "2022-11-28";
const GITHUB_JSON: &str = "application/vnd.github+json";

/// Response from GitHub's token endpoint after exchanging an authorization code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubTokenResponse {
	#[serde(deserialize_with = "deserialize_secret_string")]
	pub access_token: SecretString,
	/// Only issued by GitHub Apps with expiring user tokens.
	#[serde(default, deserialize_with = "deserialize_optional_secret_string")]
	pub refresh_token: Option<SecretString>,
	pub token_type: String,
	/// Granted OAuth scopes (comma separated). May be narrower than requested.
	pub scope: String,
}

fn deserialize_secret_string<'de, D>(deserializer: D) -> Result<SecretString, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let s = String::deserialize(deserializer)?;
	Ok(SecretString::new(s))
}

fn deserialize_optional_secret_string<'de, D>(
	deserializer: D,
) -> Result<Option<SecretString>, D::Error>
where
	D: serde::Deserializer<'de>,
{
	let s = Option::<String>::deserialize(deserializer)?;
	Ok(s.map(SecretString::new))
}

/// User profile from `GET /user`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubUser {
	/// Stable across username changes.
	pub id: i64,
	pub login: String,
	pub name: Option<String>,
	/// Public email only; see [`GitHubOAuthClient::get_emails`].
	pub email: Option<String>,
	pub avatar_url: Option<String>,
}

/// One entry of `GET /user/emails`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubEmail {
	pub email: String,
	pub primary: bool,
	pub verified: bool,
}

/// One entry of `GET /user/orgs`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubOrg {
	pub id: i64,
	/// Organization name as used in the allowlist.
	pub login: String,
}

#[derive(Debug, Deserialize)]
struct GitHubErrorResponse {
	error: String,
	error_description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct GitHubOAuthClient {
	config: GitHubConfig,
	http_client: reqwest::Client,
}

impl GitHubOAuthClient {
	/// Builds the HTTP client with the configured timeout and, for Enterprise
	/// installs, the configured User-Agent.
	#[tracing::instrument(skip_all, name = "GitHubOAuthClient::new")]
	pub fn new(config: GitHubConfig) -> Result<Self, OAuthError> {
		let http_client =
			parley_common_http::build_client(config.user_agent.as_deref(), config.timeout)?;

		Ok(Self {
			config,
			http_client,
		})
	}

	pub fn endpoints(&self) -> &GitHubEndpoints {
		&self.config.endpoints
	}

	/// URL to redirect the browser to. `state` must be verified on callback.
	#[tracing::instrument(skip(self), fields(client_id = %self.config.client_id))]
	pub fn authorization_url(&self, state: &str) -> Result<String, OAuthError> {
		let mut url = Url::parse(&self.config.endpoints.authorize_url)?;

		url
			.query_pairs_mut()
			.append_pair("client_id", &self.config.client_id)
			.append_pair("redirect_uri", &self.config.callback_url)
			.append_pair("scope", &self.config.scopes_string())
			.append_pair("state", state);

		Ok(url.to_string())
	}

	#[tracing::instrument(skip(self, code), name = "GitHubOAuthClient::exchange_code")]
	pub async fn exchange_code(&self, code: &str) -> Result<GitHubTokenResponse, OAuthError> {
		tracing::debug!("exchanging authorization code for access token");

		let response = self
			.http_client
			.post(&self.config.endpoints.token_url)
			.header("Accept", "application/json")
			.form(&[
				("client_id", self.config.client_id.as_str()),
				("client_secret", self.config.client_secret.expose().as_str()),
				("code", code),
				("redirect_uri", self.config.callback_url.as_str()),
			])
			.send()
			.await?;

		let body = response.text().await?;

		// GitHub reports bad codes with 200 and an `error` field.
		if let Ok(error_response) = serde_json::from_str::<GitHubErrorResponse>(&body) {
			if !error_response.error.is_empty() {
				let message = error_response
					.error_description
					.unwrap_or(error_response.error);
				return Err(OAuthError::GitHubError(message));
			}
		}

		serde_json::from_str(&body)
			.map_err(|e| OAuthError::ParseError(format!("failed to parse token response: {e}")))
	}

	#[tracing::instrument(skip(self, access_token), name = "GitHubOAuthClient::get_user")]
	pub async fn get_user(&self, access_token: &SecretString) -> Result<GitHubUser, OAuthError> {
		tracing::debug!("fetching GitHub user info");
		self
			.get_json(&self.config.endpoints.user_url(), access_token, "user")
			.await
	}

	/// All addresses on the account, including private ones.
	#[tracing::instrument(skip(self, access_token), name = "GitHubOAuthClient::get_emails")]
	pub async fn get_emails(
		&self,
		access_token: &SecretString,
	) -> Result<Vec<GitHubEmail>, OAuthError> {
		tracing::debug!("fetching GitHub user emails");
		self
			.get_json(&self.config.endpoints.emails_url(), access_token, "emails")
			.await
	}

	/// Organizations the token's owner belongs to. Needs the `read:org` scope
	/// to include private memberships.
	#[tracing::instrument(skip(self, access_token), name = "GitHubOAuthClient::list_orgs")]
	pub async fn list_orgs(&self, access_token: &SecretString) -> Result<Vec<GitHubOrg>, OAuthError> {
		tracing::debug!("fetching GitHub user organizations");
		self
			.get_json(&self.config.endpoints.orgs_url(), access_token, "organizations")
			.await
	}

	async fn get_json<T>(
		&self,
		url: &str,
		access_token: &SecretString,
		what: &str,
	) -> Result<T, OAuthError>
	where
		T: serde::de::DeserializeOwned,
	{
		let response = self
			.http_client
			.get(url)
			.header("Accept", GITHUB_JSON)
			.bearer_auth(access_token.expose())
			.header("X-GitHub-Api-Version", GITHUB_API_VERSION)
			.send()
			.await?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			return Err(OAuthError::GitHubError(format!(
				"failed to get {what}: HTTP {status}: {body}"
			)));
		}

		response
			.json()
			.await
			.map_err(|e| OAuthError::ParseError(format!("failed to parse {what} response: {e}")))
	}
}


#[cfg(test)]
mod proptests {
	use super::tests::config_for;
	use super::*;
	use proptest::prelude::*;

	proptest! {
		#[test]
		fn authorization_url_always_has_required_params(
			state in "[a-zA-Z0-9]{1,64}",
			base in "https://[a-z]{1,20}\\.[a-z]{2,5}",
		) {
			let client = GitHubOAuthClient::new(config_for(GitHubEndpoints::enterprise(&base))).unwrap();
			let url = client.authorization_url(&state).unwrap();

			let expected = format!("{base}/login/oauth/authorize");
			prop_assert!(url.starts_with(&expected));
			prop_assert!(url.contains("client_id="));
			prop_assert!(url.contains("redirect_uri="));
			prop_assert!(url.contains("scope="));
			let state_param = format!("state={}", state);
			prop_assert!(url.contains(&state_param));
		}

		#[test]
		fn access_token_never_in_debug(token in "gho_[a-zA-Z0-9]{10,40}") {
			let json = format!(
				r#"{{"access_token": "{token}", "token_type": "bearer", "scope": "read:org"}}"#
			);
			let response: GitHubTokenResponse = serde_json::from_str(&json).unwrap();
			let debug = format!("{response:?}");
			prop_assert!(!debug.contains(&token));
		}
	}
}
