// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Persistence seam for the login pipeline.

use async_trait::async_trait;

use crate::types::UserId;
use crate::user::{LocalUser, NewSocialUser, UserUpdate};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
	#[error("Not found: {0}")]
	NotFound(String),

	#[error("Conflict: {0}")]
	Conflict(String),

	#[error("Internal: {0}")]
	Internal(String),
}

/// User persistence as required by the login pipeline. Concurrency control
/// (e.g. a unique index on email) belongs to the implementation.
#[async_trait]
pub trait UserStore: Send + Sync {
	/// Exact match on the stored email.
	async fn find_user_by_email(&self, email: &str) -> Result<Option<LocalUser>, StoreError>;
	async fn create_user(&self, user: NewSocialUser) -> Result<LocalUser, StoreError>;
	async fn update_user(&self, id: &UserId, update: UserUpdate) -> Result<LocalUser, StoreError>;
}
