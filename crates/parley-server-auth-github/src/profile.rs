// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Mapping of GitHub API responses onto the provider-agnostic profile shape.

use parley_common_secret::SecretString;
use parley_server_auth::{ProfileEmail, ProfilePhoto, RawProfile};

use crate::client::{GitHubEmail, GitHubOAuthClient, GitHubUser};
use crate::error::OAuthError;

/// Build a [`RawProfile`] with the primary address first, then verified ones.
///
/// When `/user/emails` returned nothing the public profile email is used,
/// marked unverified.
pub fn raw_profile(user: &GitHubUser, emails: &[GitHubEmail]) -> RawProfile {
	let mut ordered: Vec<&GitHubEmail> = emails.iter().collect();
	ordered.sort_by_key(|e| (!e.primary, !e.verified));

	let mut profile_emails: Vec<ProfileEmail> = ordered
		.into_iter()
		.map(|e| ProfileEmail {
			value: e.email.clone(),
			verified: e.verified,
		})
		.collect();

	if profile_emails.is_empty() {
		if let Some(email) = user.email.as_ref().filter(|e| !e.trim().is_empty()) {
			profile_emails.push(ProfileEmail {
				value: email.clone(),
				verified: false,
			});
		}
	}

	RawProfile {
		id: user.id.to_string(),
		username: Some(user.login.clone()),
		display_name: user.name.clone(),
		emails: profile_emails,
		photos: user
			.avatar_url
			.iter()
			.map(|url| ProfilePhoto { value: url.clone() })
			.collect(),
	}
}

impl GitHubOAuthClient {
	/// `GET /user` followed by `GET /user/emails`.
	#[tracing::instrument(skip_all, name = "GitHubOAuthClient::fetch_profile")]
	pub async fn fetch_profile(&self, access_token: &SecretString) -> Result<RawProfile, OAuthError> {
		let user = self.get_user(access_token).await?;
		let emails = self.get_emails(access_token).await?;
		Ok(raw_profile(&user, &emails))
	}
}
