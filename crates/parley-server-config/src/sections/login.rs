// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Login policy section: organization allowlist and self-registration.

use serde::{Deserialize, Serialize};

use crate::allowlist::OrgAllowlist;

/// Login policy (runtime, fully resolved).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoginConfig {
	pub allowed_orgs: OrgAllowlist,
	pub allow_social_registration: bool,
}

/// Login policy layer (partial, for merging).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginConfigLayer {
	#[serde(default)]
	pub allowed_orgs: Option<String>,
	#[serde(default)]
	pub allow_social_registration: Option<bool>,
}

impl LoginConfigLayer {
	pub fn merge(&mut self, other: LoginConfigLayer) {
		if other.allowed_orgs.is_some() {
			self.allowed_orgs = other.allowed_orgs;
		}
		if other.allow_social_registration.is_some() {
			self.allow_social_registration = other.allow_social_registration;
		}
	}

	pub fn finalize(self) -> LoginConfig {
		LoginConfig {
			allowed_orgs: OrgAllowlist::parse(self.allowed_orgs.as_deref().unwrap_or_default()),
			allow_social_registration: self.allow_social_registration.unwrap_or(false),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults_are_closed() {
		let config = LoginConfigLayer::default().finalize();
		assert_eq!(config.allowed_orgs, OrgAllowlist::DenyAll);
		assert!(!config.allow_social_registration);
	}

	#[test]
	fn deserializes_from_toml() {
		let layer: LoginConfigLayer = toml::from_str(
			r#"
allowed_orgs = "acme, widgets"
allow_social_registration = true
"#,
		)
		.unwrap();
		let config = layer.finalize();
		assert!(config.allowed_orgs.permits_any(["widgets"]));
		assert!(config.allow_social_registration);
	}

	#[test]
	fn merge_overrides_only_set_fields() {
		let mut base = LoginConfigLayer {
			allowed_orgs: Some("acme".to_string()),
			allow_social_registration: Some(true),
		};
		base.merge(LoginConfigLayer {
			allowed_orgs: Some("all-orgs".to_string()),
			allow_social_registration: None,
		});
		let config = base.finalize();
		assert_eq!(config.allowed_orgs, OrgAllowlist::AllowAll);
		assert!(config.allow_social_registration);
	}
}
