// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Sources of policy statements.
//!
//! Sessions fetch statements through [`PolicyStatementLoader`]. Persistence
//! lives outside this crate; [`InMemoryPolicyStore`] serves fixed documents for
//! tests and static deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use tracing::{debug, instrument};

use crate::error::{AuthzError, Result};
use crate::statement::PolicyStatement;
use crate::types::{OrgId, Viewer};

/// Fetches the statements that apply to a viewer within an organization.
#[async_trait]
pub trait PolicyStatementLoader: Send + Sync {
	async fn load_policy_statements(
		&self,
		organization_id: OrgId,
		viewer: &Viewer,
	) -> Result<Vec<PolicyStatement>>;
}

/// Statements held in memory, keyed by organization.
///
/// Every viewer of an organization receives the same statements.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPolicyStore {
	statements: HashMap<OrgId, Vec<PolicyStatement>>,
}

impl InMemoryPolicyStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Builder: add statements for an organization.
	pub fn with_statements(
		mut self,
		organization_id: OrgId,
		statements: impl IntoIterator<Item = PolicyStatement>,
	) -> Self {
		self.insert(organization_id, statements);
		self
	}

	pub fn insert(
		&mut self,
		organization_id: OrgId,
		statements: impl IntoIterator<Item = PolicyStatement>,
	) {
		self
			.statements
			.entry(organization_id)
			.or_default()
			.extend(statements);
	}

	/// Loads a `{ "<organization id>": [statement, ...] }` document.
	///
	/// Every statement is validated, so malformed resources are rejected here
	/// rather than at check time.
	pub fn from_json(document: &str) -> Result<Self> {
		let statements: HashMap<OrgId, Vec<PolicyStatement>> =
			serde_json::from_str(document).map_err(|e| AuthzError::Loader(e.to_string()))?;

		for statement in statements.values().flatten() {
			statement.validate()?;
		}

		Ok(Self { statements })
	}

	pub fn organization_count(&self) -> usize {
		self.statements.len()
	}
}

#[async_trait]
impl PolicyStatementLoader for InMemoryPolicyStore {
	#[instrument(level = "trace", skip(self, viewer), fields(organization_id = %organization_id))]
	async fn load_policy_statements(
		&self,
		organization_id: OrgId,
		viewer: &Viewer,
	) -> Result<Vec<PolicyStatement>> {
		let statements = self
			.statements
			.get(&organization_id)
			.cloned()
			.unwrap_or_default();
		debug!(
			user_id = %viewer.id,
			count = statements.len(),
			"loaded statements from memory"
		);
		Ok(statements)
	}
}
