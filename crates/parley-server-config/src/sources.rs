// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use tracing::{debug, trace};

use crate::env::{env_bool, env_var, load_secret_env};
use crate::error::ConfigError;
use crate::layer::ServerConfigLayer;
use crate::sections::{GitHubConfigLayer, LoggingConfigLayer, LoginConfigLayer};

pub const ENV_GITHUB_CLIENT_ID: &str = "PARLEY_SERVER_GITHUB_CLIENT_ID";
pub const ENV_GITHUB_CLIENT_SECRET: &str = "PARLEY_SERVER_GITHUB_CLIENT_SECRET";
pub const ENV_DOMAIN: &str = "PARLEY_SERVER_DOMAIN";
pub const ENV_GITHUB_CALLBACK_PATH: &str = "PARLEY_SERVER_GITHUB_CALLBACK_PATH";
pub const ENV_GITHUB_SCOPES: &str = "PARLEY_SERVER_GITHUB_SCOPES";
pub const ENV_GITHUB_ENTERPRISE_BASE_URL: &str = "PARLEY_SERVER_GITHUB_ENTERPRISE_BASE_URL";
pub const ENV_GITHUB_ENTERPRISE_USER_AGENT: &str = "PARLEY_SERVER_GITHUB_ENTERPRISE_USER_AGENT";
pub const ENV_GITHUB_TIMEOUT_SECS: &str = "PARLEY_SERVER_GITHUB_TIMEOUT_SECS";
pub const ENV_GITHUB_ALLOWED_ORGS: &str = "PARLEY_SERVER_GITHUB_ALLOWED_ORGS";
pub const ENV_ALLOW_SOCIAL_REGISTRATION: &str = "PARLEY_SERVER_ALLOW_SOCIAL_REGISTRATION";
pub const ENV_LOG_LEVEL: &str = "PARLEY_SERVER_LOG_LEVEL";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<ServerConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(ServerConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/parley/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(ServerConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: ServerConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: PARLEY_SERVER_<SECTION>_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<ServerConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(ServerConfigLayer {
			github: Some(load_github_from_env()?),
			login: Some(load_login_from_env()),
			logging: Some(LoggingConfigLayer {
				level: env_var(ENV_LOG_LEVEL),
			}),
		})
	}
}

fn env_u64(name: &str) -> Result<Option<u64>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid u64 value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn load_github_from_env() -> Result<GitHubConfigLayer, ConfigError> {
	Ok(GitHubConfigLayer {
		client_id: env_var(ENV_GITHUB_CLIENT_ID),
		client_secret: load_secret_env(ENV_GITHUB_CLIENT_SECRET)?,
		domain: env_var(ENV_DOMAIN),
		callback_path: env_var(ENV_GITHUB_CALLBACK_PATH),
		scopes: env_var(ENV_GITHUB_SCOPES)
			.map(|s| crate::sections::GitHubConfig::parse_scopes(&s)),
		enterprise_base_url: env_var(ENV_GITHUB_ENTERPRISE_BASE_URL),
		enterprise_user_agent: env_var(ENV_GITHUB_ENTERPRISE_USER_AGENT),
		timeout_secs: env_u64(ENV_GITHUB_TIMEOUT_SECS)?,
	})
}

pub(crate) fn load_login_from_env() -> LoginConfigLayer {
	LoginConfigLayer {
		allowed_orgs: env_var(ENV_GITHUB_ALLOWED_ORGS),
		allow_social_registration: env_bool(ENV_ALLOW_SOCIAL_REGISTRATION),
	}
}
