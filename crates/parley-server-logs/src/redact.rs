// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Credential detection for log lines.
//!
//! Matches are replaced with `[REDACTED:<rule-id>]`.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;

struct Rule {
	id: &'static str,
	regex: Regex,
	/// Capture group holding the secret; 0 redacts the whole match.
	secret_group: usize,
}

static RULES: Lazy<Vec<Rule>> = Lazy::new(|| {
	[
		("github-fine-grained-pat", r"\bgithub_pat_[A-Za-z0-9_]{22,}", 0),
		("github-token", r"\bgh[opusr]_[A-Za-z0-9]{20,}", 0),
		(
			"bearer-token",
			r"(?i)\bbearer\s+([A-Za-z0-9\-._~+/]+=*)",
			1,
		),
	]
	.into_iter()
	.filter_map(|(id, pattern, secret_group)| {
		Regex::new(pattern).ok().map(|regex| Rule {
			id,
			regex,
			secret_group,
		})
	})
	.collect()
});

struct SecretMatch {
	start: usize,
	end: usize,
	rule_id: &'static str,
}

fn find_matches(input: &str) -> Vec<SecretMatch> {
	let mut matches = Vec::new();

	for rule in RULES.iter() {
		for cap in rule.regex.captures_iter(input) {
			let Some(m) = cap.get(rule.secret_group) else {
				continue;
			};
			matches.push(SecretMatch {
				start: m.start(),
				end: m.end(),
				rule_id: rule.id,
			});
		}
	}

	matches.sort_by_key(|m| m.start);

	let mut deduped: Vec<SecretMatch> = Vec::new();
	for m in matches {
		if let Some(last) = deduped.last() {
			if m.start < last.end {
				continue;
			}
		}
		deduped.push(m);
	}

	deduped
}

/// Replace every detected credential in `input`.
pub fn redact(input: &str) -> Cow<'_, str> {
	let matches = find_matches(input);

	if matches.is_empty() {
		return Cow::Borrowed(input);
	}

	let mut result = String::with_capacity(input.len());
	let mut last_end = 0;

	for m in matches {
		result.push_str(&input[last_end..m.start]);
		result.push_str("[REDACTED:");
		result.push_str(m.rule_id);
		result.push(']');
		last_end = m.end;
	}
	result.push_str(&input[last_end..]);

	Cow::Owned(result)
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn oauth_token() -> String {
		format!("gho_{}", "16C7e42F292c6912E7710c838347Ae178B4a")
	}

	#[test]
	fn clean_input_is_borrowed() {
		let out = redact("github org check passed for octocat");
		assert!(matches!(out, Cow::Borrowed(_)));
	}

	#[test]
	fn github_oauth_token_is_redacted() {
		let token = oauth_token();
		let line = format!("exchanged code, got {token} back");
		let out = redact(&line);
		assert!(!out.contains(&token));
		assert!(out.contains("[REDACTED:github-token]"));
	}

	#[test]
	fn fine_grained_pat_is_redacted() {
		let pat = format!("github_pat_{}", "11ABCDEFG0123456789_abcdefghijklmnopqrstuv");
		let line = format!("token={pat}");
		let out = redact(&line);
		assert_eq!(out, "token=[REDACTED:github-fine-grained-pat]");
	}

	#[test]
	fn bearer_header_keeps_scheme() {
		let out = redact("authorization: Bearer abc.def-ghi_123");
		assert_eq!(out, "authorization: Bearer [REDACTED:bearer-token]");
	}

	#[test]
	fn bearer_wrapping_github_token_is_redacted_once() {
		let token = oauth_token();
		let line = format!("Authorization: Bearer {token}");
		let out = redact(&line);
		assert!(!out.contains(&token));
		assert_eq!(out.matches("[REDACTED:").count(), 1);
	}

	proptest! {
		#[test]
		fn redacted_output_never_contains_token(
			prefix in "[a-z =:]{0,20}",
			kind in prop::sample::select(vec!["gho", "ghp", "ghu", "ghs", "ghr"]),
			body in "[A-Za-z0-9]{36}",
		) {
			let token = format!("{kind}_{body}");
			let line = format!("{prefix} {token}\n");
			let out = redact(&line);
			prop_assert!(!out.contains(&token));
		}

		#[test]
		fn text_without_credentials_is_unchanged(s in "[a-z ]{0,64}") {
			prop_assume!(!s.contains("bearer"));
			prop_assert_eq!(redact(&s), Cow::Borrowed(s.as_str()));
		}
	}
}
