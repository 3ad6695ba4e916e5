// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-process [`UserStore`], for tests and single-node embedding.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::store::{StoreError, UserStore};
use crate::types::UserId;
use crate::user::{LocalUser, NewSocialUser, UserUpdate};

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
	users: RwLock<HashMap<UserId, LocalUser>>,
}

impl InMemoryUserStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Seed the store with an existing record.
	pub async fn insert(&self, user: LocalUser) {
		self.users.write().await.insert(user.id, user);
	}

	pub async fn len(&self) -> usize {
		self.users.read().await.len()
	}

	pub async fn is_empty(&self) -> bool {
		self.users.read().await.is_empty()
	}
}

#[async_trait]
impl UserStore for InMemoryUserStore {
	async fn find_user_by_email(&self, email: &str) -> Result<Option<LocalUser>, StoreError> {
		let users = self.users.read().await;
		Ok(users.values().find(|u| u.email == email).cloned())
	}

	async fn create_user(&self, user: NewSocialUser) -> Result<LocalUser, StoreError> {
		let mut users = self.users.write().await;
		if users.values().any(|u| u.email == user.email) {
			return Err(StoreError::Conflict(format!(
				"user with email {} already exists",
				user.email
			)));
		}

		let record = user.into_local_user(UserId::generate(), Utc::now());
		users.insert(record.id, record.clone());
		Ok(record)
	}

	async fn update_user(&self, id: &UserId, update: UserUpdate) -> Result<LocalUser, StoreError> {
		let mut users = self.users.write().await;
		let user = users
			.get_mut(id)
			.ok_or_else(|| StoreError::NotFound(format!("user {id}")))?;
		update.apply(user, Utc::now());
		Ok(user.clone())
	}
}
