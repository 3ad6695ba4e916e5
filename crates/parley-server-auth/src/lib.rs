// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Social login for Parley.
//!
//! This crate provides:
//! - [`ProfileExtractor`] - normalizes a provider profile into a [`NormalizedProfile`]
//! - [`OrganizationGate`] - optional per-provider membership check ([`AllowlistOrgGate`])
//! - [`IdentityReconciler`] - find-or-create of the local account
//! - [`LoginStrategy`] - composes the above into one [`LoginOutcome`] per attempt
//!
//! Persistence is reached only through the [`UserStore`] trait.

pub mod error;
pub mod gate;
pub mod memory;
pub mod profile;
pub mod reconcile;
pub mod store;
pub mod strategy;
pub mod types;
pub mod user;

#[cfg(test)]
mod testing;

pub use error::LoginError;
pub use gate::{
	AllowlistOrgGate, AuthorizationOutcome, DenialReason, GateError, OrganizationGate,
	OrganizationLookup,
};
pub use memory::InMemoryUserStore;
pub use profile::{
	NormalizedProfile, ProfileEmail, ProfileError, ProfileExtractor, ProfilePhoto, RawProfile,
	StandardProfileExtractor,
};
pub use reconcile::{IdentityReconciler, Reconciliation};
pub use store::{StoreError, UserStore};
pub use strategy::{LoginOutcome, LoginStrategy, OAuthTokens};
pub use types::{Provider, UserId};
pub use user::{LocalUser, NewSocialUser, UserUpdate};
