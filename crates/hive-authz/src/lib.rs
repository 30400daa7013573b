// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Statement-based authorization for Hive.
//!
//! This crate provides:
//! - [`ResourceIdentifier`]: the `hrn:<organization>:<resource-path>` codec
//! - [`Action`]: the closed registry of authorizable actions and the resource
//!   ids each one is checked against
//! - [`engine::evaluate`]: deny-overrides evaluation of [`PolicyStatement`]s
//! - [`transform_legacy_policies`]: translation of legacy access token scopes
//! - [`Session`] and [`AuthN`]: per-request sessions and the strategy chain
//!   that produces them
//!
//! # Usage
//!
//! ```ignore
//! use hive_authz::{Action, ActionParams, ActionRequest, AuthN};
//!
//! let session = authn.authenticate(&headers).await?;
//! session
//! 	.assert_perform_action(&ActionRequest::new(
//! 		Action::ProjectDescribe,
//! 		ActionParams::project(organization_id, project_id),
//! 	))
//! 	.await?;
//! ```

pub mod action;
pub mod authn;
pub mod config;
pub mod engine;
pub mod error;
pub mod hrn;
pub mod legacy;
pub mod loader;
pub mod logging;
pub mod matcher;
pub mod session;
pub mod statement;
pub mod types;

pub use action::{Action, ActionParams, ActionRequest, ResourceLevel};
pub use authn::{
	extract_bearer_token, extract_session_cookie_with_name, hash_token, AuthN, AuthNStrategy,
	BearerToken, LegacyTokenRecord, LegacyTokenStore, LegacyTokenStrategy, SessionCookieStrategy,
	UserSessionResolver,
};
pub use config::{load_config, load_config_from_env, load_config_with_file, AuthzConfig, HiveAuthzConfig};
pub use engine::{evaluate, Decision};
pub use error::{AuthzError, ConfigError, InvalidResourceIdentifier, Result};
pub use hrn::{OrganizationScope, ResourceIdentifier};
pub use legacy::{
	transform_legacy_policies, LegacyScope, LegacySelector, OrganizationAccessScope,
	ProjectAccessScope, TargetAccessScope,
};
pub use loader::{InMemoryPolicyStore, PolicyStatementLoader};
pub use logging::init_tracing;
pub use session::{LegacyTokenSession, Session, UnauthenticatedSession, UserSession};
pub use statement::{ActionPattern, Effect, OneOrMany, PolicyStatement};
pub use types::{OrgId, UserId, Viewer};
