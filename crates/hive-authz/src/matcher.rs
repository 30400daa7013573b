// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Wildcard-aware matching of actions and resource paths.
//!
//! Neither matcher is a general glob:
//!
//! - actions support `*` and a trailing `scope:*`
//! - resource paths support a single `*` as the final segment

use crate::hrn::WILDCARD;

/// Checks whether an action pattern (possibly containing a wildcard) matches an action.
pub fn action_matches(pattern: &str, action: &str) -> bool {
	if pattern == WILDCARD || pattern == action {
		return true;
	}

	let action_scope = action.split(':').next();
	let mut pattern_parts = pattern.split(':');

	pattern_parts.next() == action_scope && pattern_parts.next() == Some(WILDCARD)
}

/// Checks whether a resource path pattern matches a concrete resource path.
///
/// A `*` in the last pattern segment matches the rest of the path, including
/// nothing at all. Otherwise both paths must have the same segments.
pub fn resource_path_matches(pattern: &str, resource_path: &str) -> bool {
	let mut pattern_parts = pattern.split('/').peekable();
	let mut path_parts = resource_path.split('/');

	loop {
		match (pattern_parts.next(), path_parts.next()) {
			(Some(WILDCARD), _) if pattern_parts.peek().is_none() => return true,
			(Some(expected), Some(actual)) if expected == actual => continue,
			(None, None) => return true,
			_ => return false,
		}
	}
}
