// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use crate::gate::GateError;
use crate::profile::ProfileError;
use crate::store::StoreError;

pub const ORG_CHECK_FAILED_MESSAGE: &str =
	"Unable to verify GitHub organization membership. Contact your system administrator.";
pub const LOGIN_FAILED_MESSAGE: &str =
	"Unable to complete sign in. Contact your system administrator.";

/// Hard failure of a login attempt, as opposed to a denial.
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
	#[error("invalid provider profile: {0}")]
	Profile(#[from] ProfileError),

	#[error(transparent)]
	OrganizationCheck(#[from] GateError),

	#[error("user store error: {0}")]
	Store(#[from] StoreError),

	/// Token exchange or profile fetch against the provider failed.
	#[error("provider request failed: {0}")]
	Provider(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl LoginError {
	/// Text safe to show the end user. Upstream detail stays in the logs.
	pub fn user_message(&self) -> &'static str {
		match self {
			LoginError::OrganizationCheck(_) => ORG_CHECK_FAILED_MESSAGE,
			LoginError::Profile(_) | LoginError::Store(_) | LoginError::Provider(_) => {
				LOGIN_FAILED_MESSAGE
			}
		}
	}
}
