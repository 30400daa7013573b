// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The action registry.
//!
//! Every action a session can be asked to perform is a variant of [`Action`].
//! Each action is bound to exactly one [`ResourceLevel`], which decides how the
//! resource ids to check are derived from [`ActionParams`]. Adding a permission
//! means adding a variant; the compiler then points at every `match` that needs
//! an arm.
//!
//! Resource ids are built bottom-up, most specific last:
//!
//! ```text
//! organization/<org>
//! project/<project>
//! target/<target>
//! target/<target>/appDeployment/<name>   (app deployment actions, name given)
//! target/<target>/service/<name>         (schema check/publish actions, name given)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AuthzError, Result};
use crate::types::OrgId;

/// How the resource ids of an action are derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceLevel {
	Organization,
	Project,
	Target,
	AppDeployment,
	Service,
}

/// Actions that can be checked against policy statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Action {
	#[serde(rename = "organization:describe")]
	OrganizationDescribe,
	#[serde(rename = "organization:updateSlug")]
	OrganizationUpdateSlug,
	#[serde(rename = "organization:delete")]
	OrganizationDelete,
	#[serde(rename = "gitHubIntegration:modify")]
	GitHubIntegrationModify,
	#[serde(rename = "slackIntegration:modify")]
	SlackIntegrationModify,
	#[serde(rename = "oidc:modify")]
	OidcModify,
	#[serde(rename = "support:manageTickets")]
	SupportManageTickets,
	#[serde(rename = "billing:describe")]
	BillingDescribe,
	#[serde(rename = "billing:update")]
	BillingUpdate,
	#[serde(rename = "policy:describe")]
	PolicyDescribe,
	#[serde(rename = "policy:modify")]
	PolicyModify,
	#[serde(rename = "accessToken:describe")]
	AccessTokenDescribe,
	#[serde(rename = "accessToken:create")]
	AccessTokenCreate,
	#[serde(rename = "accessToken:delete")]
	AccessTokenDelete,
	#[serde(rename = "member:describe")]
	MemberDescribe,
	#[serde(rename = "member:assignRole")]
	MemberAssignRole,
	#[serde(rename = "member:modifyRole")]
	MemberModifyRole,
	#[serde(rename = "member:removeMember")]
	MemberRemoveMember,
	#[serde(rename = "member:manageInvites")]
	MemberManageInvites,
	#[serde(rename = "project:create")]
	ProjectCreate,
	#[serde(rename = "project:describe")]
	ProjectDescribe,
	#[serde(rename = "project:delete")]
	ProjectDelete,
	#[serde(rename = "project:updateSlug")]
	ProjectUpdateSlug,
	#[serde(rename = "alert:describe")]
	AlertDescribe,
	#[serde(rename = "alert:modify")]
	AlertModify,
	#[serde(rename = "schemaLinting:manageOrganization")]
	SchemaLintingManageOrganization,
	#[serde(rename = "schemaLinting:manageProject")]
	SchemaLintingManageProject,
	#[serde(rename = "target:create")]
	TargetCreate,
	#[serde(rename = "target:delete")]
	TargetDelete,
	#[serde(rename = "schemaCheck:create")]
	SchemaCheckCreate,
	#[serde(rename = "schemaCheck:approve")]
	SchemaCheckApprove,
	#[serde(rename = "schemaVersion:publish")]
	SchemaVersionPublish,
	#[serde(rename = "appDeployment:describe")]
	AppDeploymentDescribe,
	#[serde(rename = "appDeployment:create")]
	AppDeploymentCreate,
	#[serde(rename = "appDeployment:publish")]
	AppDeploymentPublish,
	#[serde(rename = "appDeployment:retire")]
	AppDeploymentRetire,
	#[serde(rename = "laboratory:describe")]
	LaboratoryDescribe,
	#[serde(rename = "laboratory:modify")]
	LaboratoryModify,
	#[serde(rename = "schemaContract:describe")]
	SchemaContractDescribe,
	#[serde(rename = "schemaContract:create")]
	SchemaContractCreate,
	#[serde(rename = "schemaContract:disable")]
	SchemaContractDisable,
}

impl Action {
	/// Returns all registered actions.
	pub fn all() -> &'static [Action] {
		use Action::*;
		&[
			OrganizationDescribe,
			OrganizationUpdateSlug,
			OrganizationDelete,
			GitHubIntegrationModify,
			SlackIntegrationModify,
			OidcModify,
			SupportManageTickets,
			BillingDescribe,
			BillingUpdate,
			PolicyDescribe,
			PolicyModify,
			AccessTokenDescribe,
			AccessTokenCreate,
			AccessTokenDelete,
			MemberDescribe,
			MemberAssignRole,
			MemberModifyRole,
			MemberRemoveMember,
			MemberManageInvites,
			ProjectCreate,
			ProjectDescribe,
			ProjectDelete,
			ProjectUpdateSlug,
			AlertDescribe,
			AlertModify,
			SchemaLintingManageOrganization,
			SchemaLintingManageProject,
			TargetCreate,
			TargetDelete,
			SchemaCheckCreate,
			SchemaCheckApprove,
			SchemaVersionPublish,
			AppDeploymentDescribe,
			AppDeploymentCreate,
			AppDeploymentPublish,
			AppDeploymentRetire,
			LaboratoryDescribe,
			LaboratoryModify,
			SchemaContractDescribe,
			SchemaContractCreate,
			SchemaContractDisable,
		]
	}

	/// The `<scope>:<verb>` name of the action.
	pub fn as_str(&self) -> &'static str {
		match self {
			Action::OrganizationDescribe => "organization:describe",
			Action::OrganizationUpdateSlug => "organization:updateSlug",
			Action::OrganizationDelete => "organization:delete",
			Action::GitHubIntegrationModify => "gitHubIntegration:modify",
			Action::SlackIntegrationModify => "slackIntegration:modify",
			Action::OidcModify => "oidc:modify",
			Action::SupportManageTickets => "support:manageTickets",
			Action::BillingDescribe => "billing:describe",
			Action::BillingUpdate => "billing:update",
			Action::PolicyDescribe => "policy:describe",
			Action::PolicyModify => "policy:modify",
			Action::AccessTokenDescribe => "accessToken:describe",
			Action::AccessTokenCreate => "accessToken:create",
			Action::AccessTokenDelete => "accessToken:delete",
			Action::MemberDescribe => "member:describe",
			Action::MemberAssignRole => "member:assignRole",
			Action::MemberModifyRole => "member:modifyRole",
			Action::MemberRemoveMember => "member:removeMember",
			Action::MemberManageInvites => "member:manageInvites",
			Action::ProjectCreate => "project:create",
			Action::ProjectDescribe => "project:describe",
			Action::ProjectDelete => "project:delete",
			Action::ProjectUpdateSlug => "project:updateSlug",
			Action::AlertDescribe => "alert:describe",
			Action::AlertModify => "alert:modify",
			Action::SchemaLintingManageOrganization => "schemaLinting:manageOrganization",
			Action::SchemaLintingManageProject => "schemaLinting:manageProject",
			Action::TargetCreate => "target:create",
			Action::TargetDelete => "target:delete",
			Action::SchemaCheckCreate => "schemaCheck:create",
			Action::SchemaCheckApprove => "schemaCheck:approve",
			Action::SchemaVersionPublish => "schemaVersion:publish",
			Action::AppDeploymentDescribe => "appDeployment:describe",
			Action::AppDeploymentCreate => "appDeployment:create",
			Action::AppDeploymentPublish => "appDeployment:publish",
			Action::AppDeploymentRetire => "appDeployment:retire",
			Action::LaboratoryDescribe => "laboratory:describe",
			Action::LaboratoryModify => "laboratory:modify",
			Action::SchemaContractDescribe => "schemaContract:describe",
			Action::SchemaContractCreate => "schemaContract:create",
			Action::SchemaContractDisable => "schemaContract:disable",
		}
	}

	/// The part of the name before the first `:`.
	pub fn scope(&self) -> &'static str {
		let name = self.as_str();
		name.split_once(':').map_or(name, |(scope, _)| scope)
	}

	/// The derivation used to build resource ids for this action.
	pub fn resource_level(&self) -> ResourceLevel {
		match self {
			Action::OrganizationDescribe
			| Action::OrganizationUpdateSlug
			| Action::OrganizationDelete
			| Action::GitHubIntegrationModify
			| Action::SlackIntegrationModify
			| Action::OidcModify
			| Action::SupportManageTickets
			| Action::BillingDescribe
			| Action::BillingUpdate
			| Action::PolicyDescribe
			| Action::PolicyModify
			| Action::AccessTokenDescribe
			| Action::AccessTokenCreate
			| Action::AccessTokenDelete
			| Action::MemberDescribe
			| Action::MemberAssignRole
			| Action::MemberModifyRole
			| Action::MemberRemoveMember
			| Action::MemberManageInvites => ResourceLevel::Organization,

			Action::ProjectCreate
			| Action::ProjectDescribe
			| Action::ProjectDelete
			| Action::ProjectUpdateSlug
			| Action::AlertDescribe
			| Action::AlertModify
			| Action::SchemaLintingManageOrganization
			| Action::SchemaLintingManageProject
			| Action::TargetCreate => ResourceLevel::Project,

			Action::TargetDelete
			| Action::AppDeploymentDescribe
			| Action::LaboratoryDescribe
			| Action::LaboratoryModify
			| Action::SchemaContractDescribe
			| Action::SchemaContractCreate
			| Action::SchemaContractDisable => ResourceLevel::Target,

			Action::AppDeploymentCreate | Action::AppDeploymentPublish | Action::AppDeploymentRetire => {
				ResourceLevel::AppDeployment
			}

			Action::SchemaCheckCreate | Action::SchemaCheckApprove | Action::SchemaVersionPublish => {
				ResourceLevel::Service
			}
		}
	}

	/// Returns true if some action uses the given scope.
	pub fn is_known_scope(scope: &str) -> bool {
		Action::all().iter().any(|action| action.scope() == scope)
	}

	/// Derives the resource ids to check for this action, least specific first.
	pub fn resource_ids(&self, params: &ActionParams) -> Result<Vec<String>> {
		let mut ids = vec![format!("organization/{}", params.organization_id)];
		let level = self.resource_level();
		if level == ResourceLevel::Organization {
			return Ok(ids);
		}

		let project_id = self.require(params.project_id.as_deref(), "projectId")?;
		ids.push(format!("project/{project_id}"));
		if level == ResourceLevel::Project {
			return Ok(ids);
		}

		let target_id = self.require(params.target_id.as_deref(), "targetId")?;
		ids.push(format!("target/{target_id}"));

		match level {
			ResourceLevel::AppDeployment => {
				if let Some(name) = &params.app_deployment_name {
					ids.push(format!("target/{target_id}/appDeployment/{name}"));
				}
			}
			ResourceLevel::Service => {
				if let Some(name) = &params.service_name {
					ids.push(format!("target/{target_id}/service/{name}"));
				}
			}
			ResourceLevel::Organization | ResourceLevel::Project | ResourceLevel::Target => {}
		}

		Ok(ids)
	}

	fn require<'a>(&self, value: Option<&'a str>, parameter: &'static str) -> Result<&'a str> {
		value.ok_or(AuthzError::MissingParameter {
			action: *self,
			parameter,
		})
	}
}

impl fmt::Display for Action {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for Action {
	type Err = AuthzError;

	fn from_str(s: &str) -> Result<Self> {
		Action::all()
			.iter()
			.copied()
			.find(|action| action.as_str() == s)
			.ok_or_else(|| AuthzError::UnknownAction(s.to_string()))
	}
}

/// Hierarchical parameters for an authorization check.
///
/// `app_deployment_name` and `service_name` set to `None` mean the check is
/// about the target itself rather than one of its sub-resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionParams {
	pub organization_id: OrgId,
	#[serde(default)]
	pub project_id: Option<String>,
	#[serde(default)]
	pub target_id: Option<String>,
	#[serde(default)]
	pub app_deployment_name: Option<String>,
	#[serde(default)]
	pub service_name: Option<String>,
}

impl ActionParams {
	/// Parameters for an organization-level check.
	pub fn organization(organization_id: OrgId) -> Self {
		Self {
			organization_id,
			project_id: None,
			target_id: None,
			app_deployment_name: None,
			service_name: None,
		}
	}

	/// Parameters for a project-level check.
	pub fn project(organization_id: OrgId, project_id: impl Into<String>) -> Self {
		Self::organization(organization_id).with_project(project_id)
	}

	/// Parameters for a target-level check.
	pub fn target(
		organization_id: OrgId,
		project_id: impl Into<String>,
		target_id: impl Into<String>,
	) -> Self {
		Self::project(organization_id, project_id).with_target(target_id)
	}

	/// Builder: set project_id.
	pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
		self.project_id = Some(project_id.into());
		self
	}

	/// Builder: set target_id.
	pub fn with_target(mut self, target_id: impl Into<String>) -> Self {
		self.target_id = Some(target_id.into());
		self
	}

	/// Builder: set app_deployment_name.
	pub fn with_app_deployment(mut self, name: Option<String>) -> Self {
		self.app_deployment_name = name;
		self
	}

	/// Builder: set service_name.
	pub fn with_service(mut self, name: Option<String>) -> Self {
		self.service_name = name;
		self
	}
}

/// An action together with the parameters it is checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
	pub action: Action,
	pub params: ActionParams,
}

impl ActionRequest {
	pub fn new(action: Action, params: ActionParams) -> Self {
		Self { action, params }
	}

	/// The organization the check runs in.
	pub fn organization_id(&self) -> OrgId {
		self.params.organization_id
	}

	pub fn resource_ids(&self) -> Result<Vec<String>> {
		self.action.resource_ids(&self.params)
	}
}
