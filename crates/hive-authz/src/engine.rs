// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Policy statement evaluation.
//!
//! [`evaluate`] decides a single request against a set of already-loaded
//! statements:
//!
//! 1. A statement applies when one of its resources covers the request's
//!    organization and its path matches one of the derived resource ids
//! 2. Within an applicable statement, every matching action pattern counts:
//!    a deny fails the request immediately, an allow marks it allowed
//! 3. The request succeeds only if something allowed it and nothing denied it
//!
//! Deny always wins regardless of statement order or specificity. Evaluation is
//! a pure function over its inputs.

use tracing::{debug, instrument};

use crate::action::Action;
use crate::error::{AuthzError, Result};
use crate::matcher::resource_path_matches;
use crate::statement::{Effect, PolicyStatement};
use crate::types::OrgId;

/// Outcome of a successful evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
	/// Index of the first statement that allowed the request.
	pub allowed_by: usize,
}

/// Evaluates whether `statements` allow `action` on any of `resource_ids`.
///
/// Returns [`AuthzError::AccessDenied`] when no statement allows the action or a
/// deny statement matches, and [`AuthzError::InvalidResourceIdentifier`] when a
/// statement that is read carries a malformed resource.
#[instrument(
	level = "debug",
	skip(statements, resource_ids),
	fields(
		organization_id = %organization_id,
		action = %action,
		statement_count = statements.len(),
	)
)]
pub fn evaluate(
	statements: &[PolicyStatement],
	action: Action,
	organization_id: OrgId,
	resource_ids: &[String],
) -> Result<Decision> {
	let mut allowed_by = None;

	for (index, statement) in statements.iter().enumerate() {
		if !statement_applies(statement, organization_id, resource_ids)? {
			continue;
		}

		for pattern in statement.actions() {
			if !pattern.matches(action) {
				continue;
			}

			match statement.effect {
				Effect::Deny => {
					debug!(statement = index, pattern = %pattern, "denied by statement");
					return Err(AuthzError::AccessDenied { action });
				}
				Effect::Allow => {
					allowed_by.get_or_insert(index);
				}
			}
		}
	}

	match allowed_by {
		Some(allowed_by) => {
			debug!(statement = allowed_by, "allowed");
			Ok(Decision { allowed_by })
		}
		None => {
			debug!("no statement allows the action");
			Err(AuthzError::AccessDenied { action })
		}
	}
}

/// Returns true if a resource of the statement covers the organization and one of the resource ids.
fn statement_applies(
	statement: &PolicyStatement,
	organization_id: OrgId,
	resource_ids: &[String],
) -> Result<bool> {
	let resources = statement.parsed_resources()?;

	Ok(resources.iter().any(|resource| {
		resource.organization.matches(organization_id)
			&& resource_ids
				.iter()
				.any(|resource_id| resource_path_matches(&resource.resource_path, resource_id))
	}))
}
