// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

pub mod github;
pub mod logging;
pub mod login;

pub use github::{GitHubConfig, GitHubConfigLayer, GitHubEndpoints};
pub use logging::{LoggingConfig, LoggingConfigLayer};
pub use login::{LoginConfig, LoginConfigLayer};
