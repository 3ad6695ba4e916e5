// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Live login policy.
//!
//! The organization allowlist and the self-registration toggle are read once
//! per login attempt through a [`LoginPolicySource`], never cached between
//! attempts, so an operator can tighten access without a restart.

use tracing::trace;

use crate::sections::{LoginConfig, LoginConfigLayer};
use crate::sources::load_login_from_env;

pub trait LoginPolicySource: Send + Sync {
	/// Snapshot of the policy for the attempt in progress.
	fn current(&self) -> LoginConfig;
}

/// Re-reads `PARLEY_SERVER_GITHUB_ALLOWED_ORGS` and
/// `PARLEY_SERVER_ALLOW_SOCIAL_REGISTRATION` on every call, falling back to
/// the file/default layer for anything unset.
#[derive(Debug, Clone, Default)]
pub struct EnvLoginPolicySource {
	base: LoginConfigLayer,
}

impl EnvLoginPolicySource {
	pub fn new(base: LoginConfigLayer) -> Self {
		Self { base }
	}
}

impl LoginPolicySource for EnvLoginPolicySource {
	fn current(&self) -> LoginConfig {
		let mut layer = self.base.clone();
		layer.merge(load_login_from_env());
		let config = layer.finalize();
		trace!(
			allowed_orgs = %config.allowed_orgs,
			allow_social_registration = config.allow_social_registration,
			"resolved login policy"
		);
		config
	}
}

/// A policy that never changes. Used in tests and for embedders that manage
/// reloads themselves.
#[derive(Debug, Clone, Default)]
pub struct FixedLoginPolicySource {
	config: LoginConfig,
}

impl FixedLoginPolicySource {
	pub fn new(config: LoginConfig) -> Self {
		Self { config }
	}
}

impl LoginPolicySource for FixedLoginPolicySource {
	fn current(&self) -> LoginConfig {
		self.config.clone()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::allowlist::OrgAllowlist;
	use crate::sources::{ENV_ALLOW_SOCIAL_REGISTRATION, ENV_GITHUB_ALLOWED_ORGS};
	use serial_test::serial;

	#[test]
	#[serial]
	fn env_policy_is_read_on_every_call() {
		let source = EnvLoginPolicySource::default();

		std::env::remove_var(ENV_GITHUB_ALLOWED_ORGS);
		assert_eq!(source.current().allowed_orgs, OrgAllowlist::DenyAll);

		std::env::set_var(ENV_GITHUB_ALLOWED_ORGS, "all-orgs");
		assert_eq!(source.current().allowed_orgs, OrgAllowlist::AllowAll);

		std::env::set_var(ENV_GITHUB_ALLOWED_ORGS, "acme");
		assert!(source.current().allowed_orgs.permits_any(["acme"]));

		std::env::remove_var(ENV_GITHUB_ALLOWED_ORGS);
	}

	#[test]
	#[serial]
	fn env_overrides_file_layer() {
		let source = EnvLoginPolicySource::new(LoginConfigLayer {
			allowed_orgs: Some("from-file".to_string()),
			allow_social_registration: Some(false),
		});

		std::env::remove_var(ENV_GITHUB_ALLOWED_ORGS);
		std::env::set_var(ENV_ALLOW_SOCIAL_REGISTRATION, "true");

		let config = source.current();
		assert!(config.allowed_orgs.permits_any(["from-file"]));
		assert!(config.allow_social_registration);

		std::env::remove_var(ENV_ALLOW_SOCIAL_REGISTRATION);
		assert!(!source.current().allow_social_registration);
	}

	#[test]
	fn fixed_policy_returns_configured_value() {
		let source = FixedLoginPolicySource::new(LoginConfig {
			allowed_orgs: OrgAllowlist::AllowAll,
			allow_social_registration: true,
		});
		assert_eq!(source.current().allowed_orgs, OrgAllowlist::AllowAll);
		assert!(source.current().allow_social_registration);
	}
}
