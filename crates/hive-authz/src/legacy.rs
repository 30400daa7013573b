// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Compatibility with legacy access scopes.
//!
//! Access tokens issued before policy statements existed carry coarse
//! organization, project and target scopes. [`transform_legacy_policies`]
//! turns those scopes into equivalent allow statements so the tokens keep
//! working against [`crate::Session::assert_perform_action`].

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::action::Action;
use crate::error::{AuthzError, Result};
use crate::hrn::ResourceIdentifier;
use crate::statement::PolicyStatement;
use crate::types::OrgId;

// =============================================================================
// Legacy scopes
// =============================================================================

/// Legacy organization-level scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrganizationAccessScope {
	#[serde(rename = "organization:read")]
	Read,
	#[serde(rename = "organization:delete")]
	Delete,
	#[serde(rename = "organization:settings")]
	Settings,
	#[serde(rename = "organization:integrations")]
	Integrations,
	#[serde(rename = "organization:members")]
	Members,
}

/// Legacy project-level scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProjectAccessScope {
	#[serde(rename = "project:read")]
	Read,
	#[serde(rename = "project:delete")]
	Delete,
	#[serde(rename = "project:settings")]
	Settings,
	#[serde(rename = "project:alerts")]
	Alerts,
	#[serde(rename = "project:operations-store:read")]
	OperationsStoreRead,
	#[serde(rename = "project:operations-store:write")]
	OperationsStoreWrite,
}

/// Legacy target-level scopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TargetAccessScope {
	#[serde(rename = "target:read")]
	Read,
	#[serde(rename = "target:delete")]
	Delete,
	#[serde(rename = "target:settings")]
	Settings,
	#[serde(rename = "target:registry:read")]
	RegistryRead,
	#[serde(rename = "target:registry:write")]
	RegistryWrite,
	#[serde(rename = "target:tokens:read")]
	TokensRead,
	#[serde(rename = "target:tokens:write")]
	TokensWrite,
}

/// Any legacy scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LegacyScope {
	Organization(OrganizationAccessScope),
	Project(ProjectAccessScope),
	Target(TargetAccessScope),
}

impl LegacyScope {
	/// Returns every legacy scope.
	pub fn all() -> Vec<LegacyScope> {
		use OrganizationAccessScope as O;
		use ProjectAccessScope as P;
		use TargetAccessScope as T;

		[O::Read, O::Delete, O::Settings, O::Integrations, O::Members]
			.into_iter()
			.map(LegacyScope::Organization)
			.chain(
				[
					P::Read,
					P::Delete,
					P::Settings,
					P::Alerts,
					P::OperationsStoreRead,
					P::OperationsStoreWrite,
				]
				.into_iter()
				.map(LegacyScope::Project),
			)
			.chain(
				[
					T::Read,
					T::Delete,
					T::Settings,
					T::RegistryRead,
					T::RegistryWrite,
					T::TokensRead,
					T::TokensWrite,
				]
				.into_iter()
				.map(LegacyScope::Target),
			)
			.collect()
	}

	/// The wire name, e.g. `target:registry:write`.
	pub fn as_str(&self) -> &'static str {
		match self {
			LegacyScope::Organization(scope) => match scope {
				OrganizationAccessScope::Read => "organization:read",
				OrganizationAccessScope::Delete => "organization:delete",
				OrganizationAccessScope::Settings => "organization:settings",
				OrganizationAccessScope::Integrations => "organization:integrations",
				OrganizationAccessScope::Members => "organization:members",
			},
			LegacyScope::Project(scope) => match scope {
				ProjectAccessScope::Read => "project:read",
				ProjectAccessScope::Delete => "project:delete",
				ProjectAccessScope::Settings => "project:settings",
				ProjectAccessScope::Alerts => "project:alerts",
				ProjectAccessScope::OperationsStoreRead => "project:operations-store:read",
				ProjectAccessScope::OperationsStoreWrite => "project:operations-store:write",
			},
			LegacyScope::Target(scope) => match scope {
				TargetAccessScope::Read => "target:read",
				TargetAccessScope::Delete => "target:delete",
				TargetAccessScope::Settings => "target:settings",
				TargetAccessScope::RegistryRead => "target:registry:read",
				TargetAccessScope::RegistryWrite => "target:registry:write",
				TargetAccessScope::TokensRead => "target:tokens:read",
				TargetAccessScope::TokensWrite => "target:tokens:write",
			},
		}
	}

	/// Actions granted by this scope.
	pub fn granted_actions(&self) -> &'static [Action] {
		use Action::*;

		match self {
			LegacyScope::Organization(scope) => match scope {
				OrganizationAccessScope::Read => &[
					SupportManageTickets,
					OrganizationDescribe,
					MemberDescribe,
					ProjectCreate,
				],
				OrganizationAccessScope::Delete => &[OrganizationDelete],
				OrganizationAccessScope::Settings => &[
					OrganizationUpdateSlug,
					BillingDescribe,
					BillingUpdate,
					PolicyDescribe,
					PolicyModify,
					SchemaLintingManageOrganization,
				],
				OrganizationAccessScope::Integrations => &[
					OidcModify,
					GitHubIntegrationModify,
					SlackIntegrationModify,
				],
				OrganizationAccessScope::Members => &[
					MemberDescribe,
					MemberAssignRole,
					MemberModifyRole,
					MemberRemoveMember,
					MemberManageInvites,
				],
			},
			LegacyScope::Project(scope) => match scope {
				ProjectAccessScope::Read => &[ProjectDescribe],
				ProjectAccessScope::Delete => &[ProjectDelete],
				ProjectAccessScope::Settings => {
					&[ProjectUpdateSlug, SchemaLintingManageProject, TargetCreate]
				}
				ProjectAccessScope::Alerts => &[AlertModify, AlertDescribe],
				ProjectAccessScope::OperationsStoreRead => &[LaboratoryDescribe],
				ProjectAccessScope::OperationsStoreWrite => &[LaboratoryDescribe, LaboratoryModify],
			},
			LegacyScope::Target(scope) => match scope {
				TargetAccessScope::Read => &[LaboratoryDescribe, SchemaContractDescribe],
				TargetAccessScope::Delete => &[TargetDelete],
				TargetAccessScope::Settings => &[
					SchemaContractCreate,
					SchemaContractDisable,
					SchemaContractDescribe,
				],
				TargetAccessScope::RegistryRead => &[AppDeploymentDescribe, SchemaCheckCreate],
				TargetAccessScope::RegistryWrite => &[
					AppDeploymentCreate,
					AppDeploymentPublish,
					AppDeploymentRetire,
					SchemaCheckApprove,
					SchemaVersionPublish,
				],
				TargetAccessScope::TokensRead => &[AccessTokenDescribe],
				TargetAccessScope::TokensWrite => &[AccessTokenCreate, AccessTokenDelete],
			},
		}
	}
}

impl From<OrganizationAccessScope> for LegacyScope {
	fn from(scope: OrganizationAccessScope) -> Self {
		LegacyScope::Organization(scope)
	}
}

impl From<ProjectAccessScope> for LegacyScope {
	fn from(scope: ProjectAccessScope) -> Self {
		LegacyScope::Project(scope)
	}
}

impl From<TargetAccessScope> for LegacyScope {
	fn from(scope: TargetAccessScope) -> Self {
		LegacyScope::Target(scope)
	}
}

impl fmt::Display for LegacyScope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for LegacyScope {
	type Err = AuthzError;

	fn from_str(s: &str) -> Result<Self> {
		LegacyScope::all()
			.into_iter()
			.find(|scope| scope.as_str() == s)
			.ok_or_else(|| AuthzError::UnknownLegacyScope(s.to_string()))
	}
}

// =============================================================================
// Selector and translation
// =============================================================================

/// The organization, project and target a legacy access token was issued for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySelector {
	pub organization_id: OrgId,
	pub project_id: String,
	pub target_id: String,
}

impl LegacySelector {
	pub fn new(
		organization_id: OrgId,
		project_id: impl Into<String>,
		target_id: impl Into<String>,
	) -> Self {
		Self {
			organization_id,
			project_id: project_id.into(),
			target_id: target_id.into(),
		}
	}
}

/// Translates legacy scopes into allow statements.
///
/// Every scope yields one statement on the selector's organization resource.
/// Since every derived resource-id list starts with the organization entry,
/// the grant applies to everything inside the organization, matching what the
/// legacy scopes allowed.
pub fn transform_legacy_policies(
	selector: &LegacySelector,
	scopes: &[LegacyScope],
) -> Vec<PolicyStatement> {
	let resource = ResourceIdentifier::organization(selector.organization_id).to_string();

	scopes
		.iter()
		.map(|scope| PolicyStatement::allow(scope.granted_actions(), vec![resource.clone()]))
		.collect()
}
