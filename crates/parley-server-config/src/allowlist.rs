// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! GitHub organization allowlist.
//!
//! The allowlist is a single configuration string with three shapes:
//!
//! | value              | meaning                                   |
//! |--------------------|-------------------------------------------|
//! | empty / whitespace | nobody may log in ([`OrgAllowlist::DenyAll`]) |
//! | `all-orgs`         | any GitHub account ([`OrgAllowlist::AllowAll`]) |
//! | `org-a, org-b`     | members of at least one listed organization |
//!
//! An unset value denies. A value made only of commas is a list with no
//! entries, so the lookup still runs and nobody matches. Organization names are
//! compared exactly as written.

use std::collections::BTreeSet;
use std::fmt;

/// Sentinel that disables the membership check.
pub const ALL_ORGS: &str = "all-orgs";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum OrgAllowlist {
	#[default]
	DenyAll,
	AllowAll,
	Orgs(BTreeSet<String>),
}

impl OrgAllowlist {
	pub fn parse(raw: &str) -> Self {
		let value = raw.trim();
		if value.is_empty() {
			return OrgAllowlist::DenyAll;
		}
		if value == ALL_ORGS {
			return OrgAllowlist::AllowAll;
		}

		// A set value is always a membership list, even when it holds only
		// separators; such a list matches nobody.
		OrgAllowlist::Orgs(
			value
				.split(',')
				.map(str::trim)
				.filter(|org| !org.is_empty())
				.map(str::to_string)
				.collect(),
		)
	}

	/// True when any of `member_of` is on the list.
	pub fn permits_any<'a, I>(&self, member_of: I) -> bool
	where
		I: IntoIterator<Item = &'a str>,
	{
		match self {
			OrgAllowlist::DenyAll => false,
			OrgAllowlist::AllowAll => true,
			OrgAllowlist::Orgs(allowed) => member_of.into_iter().any(|org| allowed.contains(org)),
		}
	}
}

impl fmt::Display for OrgAllowlist {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			OrgAllowlist::DenyAll => Ok(()),
			OrgAllowlist::AllowAll => f.write_str(ALL_ORGS),
			OrgAllowlist::Orgs(orgs) if orgs.is_empty() => f.write_str(","),
			OrgAllowlist::Orgs(orgs) => {
				let joined: Vec<&str> = orgs.iter().map(String::as_str).collect();
				f.write_str(&joined.join(","))
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn orgs(names: &[&str]) -> OrgAllowlist {
		OrgAllowlist::Orgs(names.iter().map(|s| s.to_string()).collect())
	}

	#[test]
	fn empty_and_whitespace_deny() {
		assert_eq!(OrgAllowlist::parse(""), OrgAllowlist::DenyAll);
		assert_eq!(OrgAllowlist::parse("   \t"), OrgAllowlist::DenyAll);
	}

	#[test]
	fn separators_only_is_a_list_that_matches_nobody() {
		let list = OrgAllowlist::parse(" , ,");
		assert_eq!(list, OrgAllowlist::Orgs(BTreeSet::new()));
		assert!(!list.permits_any(["acme"]));
		assert_eq!(OrgAllowlist::parse(&list.to_string()), list);
	}

	#[test]
	fn sentinel_allows_all() {
		assert_eq!(OrgAllowlist::parse("all-orgs"), OrgAllowlist::AllowAll);
		assert_eq!(OrgAllowlist::parse("  all-orgs  "), OrgAllowlist::AllowAll);
	}

	#[test]
	fn sentinel_is_case_sensitive() {
		assert_eq!(OrgAllowlist::parse("ALL-ORGS"), orgs(&["ALL-ORGS"]));
	}

	#[test]
	fn list_is_trimmed_and_deduplicated() {
		assert_eq!(
			OrgAllowlist::parse(" org-a , org-b,,org-a "),
			orgs(&["org-a", "org-b"])
		);
	}

	#[test]
	fn org_names_keep_their_case() {
		let list = OrgAllowlist::parse("Acme");
		assert!(list.permits_any(["Acme"]));
		assert!(!list.permits_any(["acme"]));
	}

	#[test]
	fn intersection_decides_membership() {
		let list = OrgAllowlist::parse("org-a,org-b");
		assert!(list.permits_any(["org-b", "org-c"]));
		assert!(!list.permits_any(["org-x"]));
		assert!(!list.permits_any(std::iter::empty()));
	}

	#[test]
	fn display_round_trips_through_parse() {
		let list = OrgAllowlist::parse("b, a");
		assert_eq!(list.to_string(), "a,b");
		assert_eq!(OrgAllowlist::parse(&list.to_string()), list);
		assert_eq!(OrgAllowlist::AllowAll.to_string(), ALL_ORGS);
	}

	proptest! {
		#[test]
		fn whitespace_only_always_denies(ws in "[ \t\n]{0,10}") {
			prop_assert_eq!(OrgAllowlist::parse(&ws), OrgAllowlist::DenyAll);
		}

		#[test]
		fn deny_all_never_permits(members in proptest::collection::vec("[a-z-]{1,12}", 0..6)) {
			let refs: Vec<&str> = members.iter().map(String::as_str).collect();
			prop_assert!(!OrgAllowlist::DenyAll.permits_any(refs));
		}

		#[test]
		fn listed_org_is_always_permitted(
			allowed in proptest::collection::vec("[a-z][a-z0-9-]{0,12}", 1..6),
			pick in any::<proptest::sample::Index>(),
		) {
			let raw = allowed.join(" , ");
			let list = OrgAllowlist::parse(&raw);
			let chosen = pick.get(&allowed).as_str();
			prop_assert!(list.permits_any([chosen]));
		}
	}
}
