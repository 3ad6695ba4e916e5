// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The social login entry point.
//!
//! A [`LoginStrategy`] runs one attempt through
//! extract -> organization gate (if the provider has one) -> reconcile and
//! reports exactly one [`LoginOutcome`]. Denied and errored gate outcomes stop
//! the attempt before the user store is touched.

use std::sync::Arc;

use parley_common_secret::SecretString;
use tracing::{error, info, warn, Instrument};

use crate::error::LoginError;
use crate::gate::{AuthorizationOutcome, OrganizationGate};
use crate::profile::{ProfileExtractor, RawProfile};
use crate::reconcile::{IdentityReconciler, Reconciliation, REGISTRATION_DISABLED_MESSAGE};
use crate::types::Provider;
use crate::user::LocalUser;

/// Tokens handed over by the OAuth handshake.
#[derive(Debug, Clone)]
pub struct OAuthTokens {
	pub access_token: SecretString,
	pub refresh_token: Option<SecretString>,
	pub id_token: Option<SecretString>,
}

impl OAuthTokens {
	pub fn new(access_token: impl Into<SecretString>) -> Self {
		Self {
			access_token: access_token.into(),
			refresh_token: None,
			id_token: None,
		}
	}
}

/// Result of one login attempt.
///
/// Maps onto the usual `(error, user, info)` completion contract:
/// `Authenticated` is `(None, user)`, `Denied` is `(None, false, { message })`
/// and `Failed` is `(error)`.
#[derive(Debug)]
pub enum LoginOutcome {
	Authenticated { user: LocalUser, created: bool },
	Denied { message: String },
	Failed(LoginError),
}

impl LoginOutcome {
	pub fn user(&self) -> Option<&LocalUser> {
		match self {
			LoginOutcome::Authenticated { user, .. } => Some(user),
			_ => None,
		}
	}

	pub fn is_authenticated(&self) -> bool {
		matches!(self, LoginOutcome::Authenticated { .. })
	}

	/// Message to render to the end user; `None` on success.
	pub fn user_message(&self) -> Option<&str> {
		match self {
			LoginOutcome::Authenticated { .. } => None,
			LoginOutcome::Denied { message } => Some(message.as_str()),
			LoginOutcome::Failed(e) => Some(e.user_message()),
		}
	}

	fn denied(message: &str) -> Self {
		LoginOutcome::Denied {
			message: message.to_string(),
		}
	}
}

pub struct LoginStrategy {
	provider: Provider,
	extractor: Arc<dyn ProfileExtractor>,
	gate: Option<Arc<dyn OrganizationGate>>,
	reconciler: IdentityReconciler,
}

impl LoginStrategy {
	pub fn new(
		provider: Provider,
		extractor: Arc<dyn ProfileExtractor>,
		reconciler: IdentityReconciler,
	) -> Self {
		Self {
			provider,
			extractor,
			gate: None,
			reconciler,
		}
	}

	/// Require the gate to allow an attempt before reconciling.
	pub fn with_gate(mut self, gate: Arc<dyn OrganizationGate>) -> Self {
		self.gate = Some(gate);
		self
	}

	pub fn provider(&self) -> Provider {
		self.provider
	}

	pub async fn authenticate(&self, tokens: &OAuthTokens, profile: &RawProfile) -> LoginOutcome {
		let span = tracing::info_span!("social_login", provider = %self.provider);
		async {
			let outcome = self.run(tokens, profile).await;
			if let LoginOutcome::Failed(e) = &outcome {
				error!(error = %e, "login failed");
			}
			outcome
		}
		.instrument(span)
		.await
	}

	async fn run(&self, tokens: &OAuthTokens, raw: &RawProfile) -> LoginOutcome {
		let id_token = tokens.id_token.as_ref().map(|t| t.expose().as_str());
		let profile = match self.extractor.extract(raw, id_token) {
			Ok(profile) => profile,
			Err(e) => return LoginOutcome::Failed(e.into()),
		};

		if let Some(gate) = &self.gate {
			match gate
				.authorize(&tokens.access_token, profile.username.as_deref(), &profile.email)
				.await
			{
				AuthorizationOutcome::Allowed => {}
				AuthorizationOutcome::Denied(reason) => {
					warn!(%reason, "organization gate denied login");
					return LoginOutcome::denied(reason.message());
				}
				AuthorizationOutcome::Errored(e) => return LoginOutcome::Failed(e.into()),
			}
		}

		match self.reconciler.reconcile(&profile, self.provider).await {
			Ok(Reconciliation::Found(user)) => LoginOutcome::Authenticated {
				user,
				created: false,
			},
			Ok(Reconciliation::Created(user)) => LoginOutcome::Authenticated {
				user,
				created: true,
			},
			Ok(Reconciliation::RegistrationDisabled) => {
				info!("login denied: registration disabled");
				LoginOutcome::denied(REGISTRATION_DISABLED_MESSAGE)
			}
			Err(e) => LoginOutcome::Failed(e),
		}
	}
}
