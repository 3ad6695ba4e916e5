// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Find-or-create of the local account behind a social login.

use std::sync::Arc;

use parley_server_config::LoginPolicySource;
use tracing::{info, Instrument};

use crate::error::LoginError;
use crate::profile::NormalizedProfile;
use crate::store::UserStore;
use crate::types::Provider;
use crate::user::{LocalUser, NewSocialUser, UserUpdate};

pub const REGISTRATION_DISABLED_MESSAGE: &str =
	"Access denied: registration of new accounts is disabled. Contact your system administrator.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reconciliation {
	/// Existing account; avatar refreshed.
	Found(LocalUser),
	Created(LocalUser),
	/// No account and self-registration is off. Nothing was written.
	RegistrationDisabled,
}

pub struct IdentityReconciler {
	store: Arc<dyn UserStore>,
	policy: Arc<dyn LoginPolicySource>,
}

impl IdentityReconciler {
	pub fn new(store: Arc<dyn UserStore>, policy: Arc<dyn LoginPolicySource>) -> Self {
		Self { store, policy }
	}

	/// Performs at most one write: an avatar update or a create.
	pub async fn reconcile(
		&self,
		profile: &NormalizedProfile,
		provider: Provider,
	) -> Result<Reconciliation, LoginError> {
		let span = tracing::info_span!("identity_reconcile", %provider);
		self.reconcile_inner(profile, provider).instrument(span).await
	}

	async fn reconcile_inner(
		&self,
		profile: &NormalizedProfile,
		provider: Provider,
	) -> Result<Reconciliation, LoginError> {
		let email = profile.email.trim();

		if let Some(existing) = self.store.find_user_by_email(email).await? {
			let update = UserUpdate {
				avatar_url: profile.avatar_url.clone(),
			};
			let user = self.store.update_user(&existing.id, update).await?;
			info!(user_id = %user.id, "existing user signed in");
			return Ok(Reconciliation::Found(user));
		}

		if !self.policy.current().allow_social_registration {
			info!(email, "no account and social registration is disabled");
			return Ok(Reconciliation::RegistrationDisabled);
		}

		let new_user = NewSocialUser {
			email: email.to_string(),
			avatar_url: profile.avatar_url.clone(),
			provider,
			provider_key: provider.provider_key(),
			provider_id: profile.external_id.clone(),
			username: profile.username.clone(),
			display_name: profile.display_name.clone(),
			email_verified: profile.email_verified,
		};
		let user = self.store.create_user(new_user).await?;
		info!(user_id = %user.id, "created user from social login");
		Ok(Reconciliation::Created(user))
	}
}
