// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Local user records as seen by the login pipeline.
//!
//! - [`LocalUser`] - a persisted account, keyed by email
//! - [`NewSocialUser`] - what the pipeline asks the store to create
//! - [`UserUpdate`] - the mutable fields refreshed on every social login

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{Provider, UserId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalUser {
	pub id: UserId,
	pub email: String,
	pub username: Option<String>,
	pub display_name: Option<String>,
	pub avatar_url: Option<String>,
	pub email_verified: bool,
	/// Provider the account was created through.
	pub provider: Provider,
	/// External ids keyed by provider key, e.g. `githubId -> "583231"`.
	pub provider_ids: BTreeMap<String, String>,
	pub created_at: DateTime<Utc>,
	pub updated_at: DateTime<Utc>,
}

impl LocalUser {
	pub fn provider_id(&self, provider: Provider) -> Option<&str> {
		self.provider_ids
			.get(&provider.provider_key())
			.map(String::as_str)
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSocialUser {
	pub email: String,
	pub avatar_url: Option<String>,
	pub provider: Provider,
	/// `{provider}Id`.
	pub provider_key: String,
	pub provider_id: String,
	pub username: Option<String>,
	pub display_name: Option<String>,
	pub email_verified: bool,
}

impl NewSocialUser {
	/// Materialize the record a store would persist.
	pub fn into_local_user(self, id: UserId, now: DateTime<Utc>) -> LocalUser {
		let mut provider_ids = BTreeMap::new();
		provider_ids.insert(self.provider_key, self.provider_id);
		LocalUser {
			id,
			email: self.email,
			username: self.username,
			display_name: self.display_name,
			avatar_url: self.avatar_url,
			email_verified: self.email_verified,
			provider: self.provider,
			provider_ids,
			created_at: now,
			updated_at: now,
		}
	}
}

/// Fields refreshed for an existing user. `None` leaves the stored value alone.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserUpdate {
	pub avatar_url: Option<String>,
}

impl UserUpdate {
	pub fn apply(self, user: &mut LocalUser, now: DateTime<Utc>) {
		if let Some(avatar_url) = self.avatar_url {
			user.avatar_url = Some(avatar_url);
		}
		user.updated_at = now;
	}
}
