// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! GitHub login wiring: client, organization gate and the shared strategy.

use std::sync::Arc;

use parley_server_auth::{
	IdentityReconciler, LoginError, LoginOutcome, LoginStrategy, OAuthTokens, Provider,
	StandardProfileExtractor, UserStore,
};
use parley_server_config::{GitHubConfig, LoginPolicySource};
use tracing::info;

use crate::client::GitHubOAuthClient;
use crate::error::OAuthError;
use crate::gate::github_org_gate;

/// Strategy for GitHub: standard extraction, organization gate, shared reconciler.
pub fn github_strategy(
	client: Arc<GitHubOAuthClient>,
	store: Arc<dyn UserStore>,
	policy: Arc<dyn LoginPolicySource>,
) -> LoginStrategy {
	LoginStrategy::new(
		Provider::GitHub,
		Arc::new(StandardProfileExtractor),
		IdentityReconciler::new(store, policy.clone()),
	)
	.with_gate(Arc::new(github_org_gate(client, policy)))
}

/// The server side of "Sign in with GitHub".
pub struct GitHubLogin {
	client: Arc<GitHubOAuthClient>,
	strategy: LoginStrategy,
}

impl GitHubLogin {
	pub fn new(
		config: GitHubConfig,
		store: Arc<dyn UserStore>,
		policy: Arc<dyn LoginPolicySource>,
	) -> Result<Self, OAuthError> {
		info!(
			scopes = %config.scopes_string(),
			callback_url = %config.callback_url,
			authorize_url = %config.endpoints.authorize_url,
			"configuring GitHub login"
		);
		let client = Arc::new(GitHubOAuthClient::new(config)?);
		let strategy = github_strategy(client.clone(), store, policy);
		Ok(Self { client, strategy })
	}

	pub fn authorization_url(&self, state: &str) -> Result<String, OAuthError> {
		self.client.authorization_url(state)
	}

	pub fn strategy(&self) -> &LoginStrategy {
		&self.strategy
	}

	/// Finish the callback: exchange `code`, fetch the profile and run the
	/// strategy. The caller is responsible for having verified `state`.
	#[tracing::instrument(skip_all, name = "GitHubLogin::complete")]
	pub async fn complete(&self, code: &str) -> LoginOutcome {
		let token = match self.client.exchange_code(code).await {
			Ok(token) => token,
			Err(e) => return provider_failure(e),
		};

		let profile = match self.client.fetch_profile(&token.access_token).await {
			Ok(profile) => profile,
			Err(e) => return provider_failure(e),
		};

		let tokens = OAuthTokens {
			access_token: token.access_token,
			refresh_token: token.refresh_token,
			id_token: None,
		};
		self.strategy.authenticate(&tokens, &profile).await
	}
}

fn provider_failure(e: OAuthError) -> LoginOutcome {
	tracing::error!(error = %e, "GitHub OAuth request failed");
	LoginOutcome::Failed(LoginError::Provider(Box::new(e)))
}
