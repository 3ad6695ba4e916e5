// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration for Parley social login.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - The GitHub OAuth application settings, including Enterprise overrides
//! - A live [`LoginPolicySource`] for the organization allowlist and self-registration
//!
//! # Usage
//!
//! ```ignore
//! use parley_server_config::load_config;
//!
//! let config = load_config()?;
//! if let Some(github) = &config.github {
//!     println!("GitHub callback: {}", github.callback_url);
//! }
//! ```

pub mod allowlist;
pub mod env;
pub mod error;
pub mod layer;
pub mod policy;
pub mod sections;
pub mod sources;

pub use allowlist::{OrgAllowlist, ALL_ORGS};
pub use env::{load_secret_env, SecretEnvError};
pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use policy::{EnvLoginPolicySource, FixedLoginPolicySource, LoginPolicySource};
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	/// `None` when no GitHub OAuth application is configured.
	pub github: Option<GitHubConfig>,
	/// Login policy as resolved at startup. Request handling should go through
	/// [`ServerConfig::login_policy_source`] instead so changes are picked up.
	pub login: LoginConfig,
	pub logging: LoggingConfig,
	login_layer: LoginConfigLayer,
}

impl ServerConfig {
	/// A policy source that layers the live environment over whatever the
	/// config file supplied.
	pub fn login_policy_source(&self) -> EnvLoginPolicySource {
		EnvLoginPolicySource::new(self.login_layer.clone())
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`PARLEY_SERVER_*`)
/// 2. Config file (`/etc/parley/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	let mut merged = ServerConfigLayer::default();
	merged.merge(EnvSource.load()?);
	finalize(merged, None)
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	// Login settings below the environment; the live policy re-reads env itself.
	let mut login_base = LoginConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		if source.precedence() < Precedence::Environment {
			if let Some(login) = layer.login.clone() {
				login_base.merge(login);
			}
		}
		merged.merge(layer);
	}

	finalize(merged, Some(login_base))
}

/// Finalize configuration layer into resolved config.
fn finalize(
	layer: ServerConfigLayer,
	login_base: Option<LoginConfigLayer>,
) -> Result<ServerConfig, ConfigError> {
	let github = layer.github.unwrap_or_default().build()?;
	let login = layer.login.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	info!(
		github_configured = github.is_some(),
		github_enterprise = github
			.as_ref()
			.is_some_and(|g| g.endpoints != GitHubEndpoints::default()),
		allowed_orgs = %login.allowed_orgs,
		allow_social_registration = login.allow_social_registration,
		log_level = %logging.level,
		"configuration loaded"
	);

	Ok(ServerConfig {
		github,
		login,
		logging,
		login_layer: login_base.unwrap_or_default(),
	})
}
