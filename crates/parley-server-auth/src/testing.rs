// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Test doubles shared by the pipeline tests.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parley_server_config::{FixedLoginPolicySource, LoginConfig, LoginPolicySource, OrgAllowlist};

use crate::memory::InMemoryUserStore;
use crate::store::{StoreError, UserStore};
use crate::types::UserId;
use crate::user::{LocalUser, NewSocialUser, UserUpdate};

/// Wraps [`InMemoryUserStore`] and counts calls per operation.
#[derive(Default)]
pub struct CountingStore {
	pub inner: InMemoryUserStore,
	pub finds: AtomicUsize,
	pub creates: AtomicUsize,
	pub updates: AtomicUsize,
	pub fail_lookups: AtomicBool,
}

impl CountingStore {
	pub fn new() -> Arc<Self> {
		Arc::new(Self::default())
	}

	pub fn finds(&self) -> usize {
		self.finds.load(Ordering::SeqCst)
	}

	pub fn creates(&self) -> usize {
		self.creates.load(Ordering::SeqCst)
	}

	pub fn updates(&self) -> usize {
		self.updates.load(Ordering::SeqCst)
	}

	pub fn writes(&self) -> usize {
		self.creates() + self.updates()
	}
}

#[async_trait]
impl UserStore for CountingStore {
	async fn find_user_by_email(&self, email: &str) -> Result<Option<LocalUser>, StoreError> {
		self.finds.fetch_add(1, Ordering::SeqCst);
		if self.fail_lookups.load(Ordering::SeqCst) {
			return Err(StoreError::Internal("store unavailable".to_string()));
		}
		self.inner.find_user_by_email(email).await
	}

	async fn create_user(&self, user: NewSocialUser) -> Result<LocalUser, StoreError> {
		self.creates.fetch_add(1, Ordering::SeqCst);
		self.inner.create_user(user).await
	}

	async fn update_user(&self, id: &UserId, update: UserUpdate) -> Result<LocalUser, StoreError> {
		self.updates.fetch_add(1, Ordering::SeqCst);
		self.inner.update_user(id, update).await
	}
}

pub fn policy(allowed_orgs: &str, allow_social_registration: bool) -> Arc<dyn LoginPolicySource> {
	Arc::new(FixedLoginPolicySource::new(LoginConfig {
		allowed_orgs: OrgAllowlist::parse(allowed_orgs),
		allow_social_registration,
	}))
}
