// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! GitHub OAuth login for Parley.
//!
//! # OAuth Flow
//!
//! 1. **Authorization URL**: [`GitHubLogin::authorization_url`] with a CSRF state.
//! 2. **User Authorization**: GitHub redirects back to the callback URL with
//!    `code` and `state`.
//! 3. **Completion**: [`GitHubLogin::complete`] exchanges the code, fetches the
//!    profile and emails, checks organization membership against the live
//!    allowlist and finds or creates the local user.
//!
//! Setting `enterprise_base_url` points every step, including the
//! organization lookup, at a GitHub Enterprise Server install.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use parley_server_auth::InMemoryUserStore;
//! use parley_server_auth_github::GitHubLogin;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = parley_server_config::load_config()?;
//! let github = config.github.clone().ok_or("GitHub login is not configured")?;
//! let policy = Arc::new(config.login_policy_source());
//! let login = GitHubLogin::new(github, Arc::new(InMemoryUserStore::new()), policy)?;
//!
//! let redirect_to = login.authorization_url("csrf-state")?;
//! // ... user authorizes, GitHub calls back with ?code=...
//! let outcome = login.complete("code-from-callback").await;
//! if let Some(message) = outcome.user_message() {
//!     println!("{message}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Security Considerations
//!
//! - The client secret and access tokens are [`SecretString`](parley_common_secret::SecretString)s.
//! - All tracing instrumentation skips codes and tokens.

mod client;
mod error;
mod gate;
mod login;
mod profile;

pub use client::{GitHubEmail, GitHubOAuthClient, GitHubOrg, GitHubTokenResponse, GitHubUser};
pub use error::OAuthError;
pub use gate::github_org_gate;
pub use login::{github_strategy, GitHubLogin};
pub use profile::raw_profile;
