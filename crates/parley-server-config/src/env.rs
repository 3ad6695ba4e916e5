// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Environment helpers.
//!
//! Secrets support the `VAR` / `VAR_FILE` convention so the GitHub client
//! secret can be mounted from a Docker or Kubernetes secret file.

use std::path::PathBuf;
use std::{env, fs};

use parley_common_secret::SecretString;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecretEnvError {
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("secret file path in {var} is empty")]
	EmptyPath { var: String },
}

/// Load a secret from `{var}_FILE` if set, otherwise from `{var}`.
///
/// A single trailing newline is stripped from file contents.
pub fn load_secret_env(var: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path_str) = env::var(&file_var) {
		if path_str.is_empty() {
			return Err(SecretEnvError::EmptyPath { var: file_var });
		}

		let path = PathBuf::from(&path_str);
		let content = fs::read_to_string(&path).map_err(|e| SecretEnvError::Io {
			path: path.clone(),
			source: e,
		})?;

		let secret = content.strip_suffix('\n').unwrap_or(&content).to_string();
		return Ok(Some(SecretString::new(secret)));
	}

	Ok(env::var(var).ok().map(SecretString::new))
}

/// Read a non-empty environment variable.
pub(crate) fn env_var(name: &str) -> Option<String> {
	env::var(name).ok().filter(|s| !s.is_empty())
}

/// Read a boolean toggle; `true` (any case) and `1` enable it.
pub(crate) fn env_bool(name: &str) -> Option<bool> {
	env_var(name).map(|v| parse_bool(&v))
}

pub(crate) fn parse_bool(value: &str) -> bool {
	let value = value.trim();
	value.eq_ignore_ascii_case("true") || value == "1"
}
