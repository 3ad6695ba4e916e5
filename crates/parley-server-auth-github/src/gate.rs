// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! GitHub organization lookup for the login gate.

use std::sync::Arc;

use async_trait::async_trait;
use parley_common_secret::SecretString;
use parley_server_auth::{AllowlistOrgGate, GateError, OrganizationLookup, Provider};
use parley_server_config::LoginPolicySource;

use crate::client::GitHubOAuthClient;

#[async_trait]
impl OrganizationLookup for GitHubOAuthClient {
	async fn list_organizations(&self, access_token: &SecretString) -> Result<Vec<String>, GateError> {
		let orgs = self
			.list_orgs(access_token)
			.await
			.map_err(|e| GateError::new(e.to_string()))?;
		Ok(orgs.into_iter().map(|org| org.login).collect())
	}
}

/// Gate that checks `GET {api}/user/orgs` against the live allowlist.
pub fn github_org_gate(
	client: Arc<GitHubOAuthClient>,
	policy: Arc<dyn LoginPolicySource>,
) -> AllowlistOrgGate {
	AllowlistOrgGate::new(Provider::GitHub, client, policy)
}

#[cfg(test)]
mod tests {
	use super::*;
	use parley_server_auth::{AuthorizationOutcome, DenialReason, OrganizationGate};
	use parley_server_config::{
		FixedLoginPolicySource, GitHubConfig, GitHubEndpoints, LoginConfig, OrgAllowlist,
	};
	use std::time::Duration;
	use wiremock::matchers::{header, method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn client(server: &MockServer) -> Arc<GitHubOAuthClient> {
		let config = GitHubConfig {
			client_id: "Iv1.test".to_string(),
			client_secret: SecretString::from("test_secret"),
			callback_url: "https://chat.example.com/oauth/github/callback".to_string(),
			scopes: vec!["user:email".to_string(), "read:org".to_string()],
			endpoints: GitHubEndpoints {
				authorize_url: format!("{}/login/oauth/authorize", server.uri()),
				token_url: format!("{}/login/oauth/access_token", server.uri()),
				api_base_url: server.uri(),
			},
			user_agent: None,
			timeout: Duration::from_secs(5),
		};
		Arc::new(GitHubOAuthClient::new(config).unwrap())
	}

	fn policy(allowed_orgs: &str) -> Arc<dyn LoginPolicySource> {
		Arc::new(FixedLoginPolicySource::new(LoginConfig {
			allowed_orgs: OrgAllowlist::parse(allowed_orgs),
			allow_social_registration: true,
		}))
	}

	async fn mount_orgs(server: &MockServer, status: u16, body: serde_json::Value, calls: u64) {
		Mock::given(method("GET"))
			.and(path("/user/orgs"))
			.and(header("authorization", "Bearer gho_member"))
			.respond_with(ResponseTemplate::new(status).set_body_json(body))
			.expect(calls)
			.mount(server)
			.await;
	}

	fn token() -> SecretString {
		SecretString::from("gho_member")
	}

	#[tokio::test]
	async fn member_is_allowed_after_one_request() {
		let server = MockServer::start().await;
		mount_orgs(&server, 200, serde_json::json!([{ "id": 1, "login": "acme" }]), 1).await;

		let gate = github_org_gate(client(&server), policy("widgets, acme"));
		let outcome = gate.authorize(&token(), Some("octocat"), "o@example.com").await;
		assert_eq!(outcome, AuthorizationOutcome::Allowed);
	}

	#[tokio::test]
	async fn non_member_is_denied() {
		let server = MockServer::start().await;
		mount_orgs(&server, 200, serde_json::json!([{ "id": 9, "login": "elsewhere" }]), 1).await;

		let gate = github_org_gate(client(&server), policy("acme"));
		let outcome = gate.authorize(&token(), Some("octocat"), "o@example.com").await;
		assert_eq!(
			outcome,
			AuthorizationOutcome::Denied(DenialReason::NotOrganizationMember)
		);
	}

	#[tokio::test]
	async fn all_orgs_makes_no_request() {
		let server = MockServer::start().await;
		mount_orgs(&server, 200, serde_json::json!([]), 0).await;

		let gate = github_org_gate(client(&server), policy("all-orgs"));
		let outcome = gate.authorize(&token(), Some("octocat"), "o@example.com").await;
		assert_eq!(outcome, AuthorizationOutcome::Allowed);
	}

	#[tokio::test]
	async fn empty_allowlist_makes_no_request() {
		let server = MockServer::start().await;
		mount_orgs(&server, 200, serde_json::json!([{ "id": 1, "login": "acme" }]), 0).await;

		let gate = github_org_gate(client(&server), policy(""));
		let outcome = gate.authorize(&token(), Some("octocat"), "o@example.com").await;
		assert_eq!(
			outcome,
			AuthorizationOutcome::Denied(DenialReason::OrganizationLoginRestricted)
		);
	}

	#[tokio::test]
	async fn rate_limited_lookup_is_errored() {
		let server = MockServer::start().await;
		mount_orgs(
			&server,
			403,
			serde_json::json!({ "message": "API rate limit exceeded" }),
			1,
		)
		.await;

		let gate = github_org_gate(client(&server), policy("acme"));
		let outcome = gate.authorize(&token(), Some("octocat"), "o@example.com").await;
		let AuthorizationOutcome::Errored(e) = outcome else {
			panic!("expected Errored");
		};
		assert!(e.message.contains("403"));
		assert!(!e.message.contains("gho_member"));
	}
}
