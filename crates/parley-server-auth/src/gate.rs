// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Organization membership gate.
//!
//! Providers that can restrict logins to organization members plug an
//! [`OrganizationLookup`] into an [`AllowlistOrgGate`]. The allowlist is taken
//! from the live [`LoginPolicySource`] on every call:
//!
//! - empty: deny without asking the provider
//! - `all-orgs`: allow without asking the provider
//! - a list: one lookup of the caller's organizations, allow on any overlap
//!
//! A failed lookup is an [`AuthorizationOutcome::Errored`], never a denial.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use parley_common_secret::SecretString;
use parley_server_config::{LoginPolicySource, OrgAllowlist};
use tracing::{debug, error, info, Instrument};

use crate::types::Provider;

pub const ORG_LOGIN_RESTRICTED_MESSAGE: &str =
	"Access denied: organization login is restricted. Contact your system administrator.";
pub const NOT_ORG_MEMBER_MESSAGE: &str =
	"Access denied: You must be a member of an approved GitHub organization to access this application.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
	/// No allowlist configured.
	OrganizationLoginRestricted,
	/// The caller belongs to none of the allowed organizations.
	NotOrganizationMember,
}

impl DenialReason {
	pub fn message(&self) -> &'static str {
		match self {
			DenialReason::OrganizationLoginRestricted => ORG_LOGIN_RESTRICTED_MESSAGE,
			DenialReason::NotOrganizationMember => NOT_ORG_MEMBER_MESSAGE,
		}
	}
}

impl fmt::Display for DenialReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DenialReason::OrganizationLoginRestricted => write!(f, "organization_login_restricted"),
			DenialReason::NotOrganizationMember => write!(f, "not_organization_member"),
		}
	}
}

/// Upstream failure while listing organizations. The message is for logs only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("organization lookup failed: {message}")]
pub struct GateError {
	pub message: String,
}

impl GateError {
	pub fn new(message: impl Into<String>) -> Self {
		Self {
			message: message.into(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthorizationOutcome {
	Allowed,
	Denied(DenialReason),
	Errored(GateError),
}

#[async_trait]
pub trait OrganizationGate: Send + Sync {
	async fn authorize(
		&self,
		access_token: &SecretString,
		username: Option<&str>,
		email: &str,
	) -> AuthorizationOutcome;
}

/// Lists the organizations the bearer of `access_token` belongs to.
#[async_trait]
pub trait OrganizationLookup: Send + Sync {
	async fn list_organizations(&self, access_token: &SecretString) -> Result<Vec<String>, GateError>;
}

pub struct AllowlistOrgGate {
	provider: Provider,
	lookup: Arc<dyn OrganizationLookup>,
	policy: Arc<dyn LoginPolicySource>,
}

impl AllowlistOrgGate {
	pub fn new(
		provider: Provider,
		lookup: Arc<dyn OrganizationLookup>,
		policy: Arc<dyn LoginPolicySource>,
	) -> Self {
		Self {
			provider,
			lookup,
			policy,
		}
	}

	async fn check(&self, access_token: &SecretString, username: &str, email: &str) -> AuthorizationOutcome {
		let allowlist = self.policy.current().allowed_orgs;

		match &allowlist {
			OrgAllowlist::DenyAll => {
				info!(username, email, "denied: organization allowlist is empty");
				return AuthorizationOutcome::Denied(DenialReason::OrganizationLoginRestricted);
			}
			OrgAllowlist::AllowAll => {
				info!(username, email, "allowing any organization (all-orgs mode)");
				return AuthorizationOutcome::Allowed;
			}
			OrgAllowlist::Orgs(_) => {}
		}

		info!(username, email, "checking organization membership");
		debug!(allowed_orgs = %allowlist, "allowed organizations");

		let member_of = match self.lookup.list_organizations(access_token).await {
			Ok(orgs) => orgs,
			Err(e) => {
				error!(error = %e, "failed to fetch user organizations");
				return AuthorizationOutcome::Errored(e);
			}
		};
		debug!(username, orgs = ?member_of, "user organizations");

		if allowlist.permits_any(member_of.iter().map(String::as_str)) {
			info!(username, email, "user is a member of at least one allowed organization");
			AuthorizationOutcome::Allowed
		} else {
			info!(username, email, "denied: not a member of any allowed organization");
			AuthorizationOutcome::Denied(DenialReason::NotOrganizationMember)
		}
	}
}

#[async_trait]
impl OrganizationGate for AllowlistOrgGate {
	async fn authorize(
		&self,
		access_token: &SecretString,
		username: Option<&str>,
		email: &str,
	) -> AuthorizationOutcome {
		let span = tracing::info_span!("org_check", provider = %self.provider);
		self
			.check(access_token, username.unwrap_or_default(), email)
			.instrument(span)
			.await
	}
}
