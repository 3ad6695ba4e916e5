// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Provider profile normalization.
//!
//! OAuth providers hand back profiles in the common `emails[]` / `photos[]`
//! shape ([`RawProfile`]). A [`ProfileExtractor`] turns one into the
//! provider-agnostic [`NormalizedProfile`] the rest of the pipeline works with.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileEmail {
	pub value: String,
	#[serde(default)]
	pub verified: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfilePhoto {
	pub value: String,
}

/// Profile as delivered by the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawProfile {
	pub id: String,
	#[serde(default)]
	pub username: Option<String>,
	#[serde(default)]
	pub display_name: Option<String>,
	#[serde(default)]
	pub emails: Vec<ProfileEmail>,
	#[serde(default)]
	pub photos: Vec<ProfilePhoto>,
}

/// Identity extracted for one login attempt. Never persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedProfile {
	/// Trimmed, non-empty.
	pub email: String,
	pub external_id: String,
	pub avatar_url: Option<String>,
	pub username: Option<String>,
	pub display_name: Option<String>,
	pub email_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProfileError {
	#[error("provider profile has no email address")]
	MissingEmail,

	#[error("provider profile has no id")]
	MissingId,
}

pub trait ProfileExtractor: Send + Sync {
	fn extract(
		&self,
		raw: &RawProfile,
		id_token: Option<&str>,
	) -> Result<NormalizedProfile, ProfileError>;
}

/// Reads the first email and first photo of the profile.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardProfileExtractor;

impl ProfileExtractor for StandardProfileExtractor {
	fn extract(
		&self,
		raw: &RawProfile,
		_id_token: Option<&str>,
	) -> Result<NormalizedProfile, ProfileError> {
		let first_email = raw.emails.first().ok_or(ProfileError::MissingEmail)?;
		let email = first_email.value.trim();
		if email.is_empty() {
			return Err(ProfileError::MissingEmail);
		}

		let external_id = raw.id.trim();
		if external_id.is_empty() {
			return Err(ProfileError::MissingId);
		}

		let username = non_blank(raw.username.as_deref());
		let display_name = non_blank(raw.display_name.as_deref()).or_else(|| username.clone());

		Ok(NormalizedProfile {
			email: email.to_string(),
			external_id: external_id.to_string(),
			avatar_url: raw
				.photos
				.first()
				.and_then(|photo| non_blank(Some(photo.value.as_str()))),
			username,
			display_name,
			email_verified: first_email.verified,
		})
	}
}

fn non_blank(value: Option<&str>) -> Option<String> {
	value
		.map(str::trim)
		.filter(|v| !v.is_empty())
		.map(str::to_string)
}
