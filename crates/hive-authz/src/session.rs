// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-request sessions.
//!
//! A [`Session`] is the result of authenticating a request. Every session can
//! answer [`Session::assert_perform_action`]; the variants differ in where
//! their policy statements come from:
//!
//! - [`UnauthenticatedSession`]: no statements, so every check is denied
//! - [`UserSession`]: statements fetched through a [`PolicyStatementLoader`]
//! - [`LegacyTokenSession`]: statements translated from legacy token scopes

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::OnceCell;
use tracing::{debug, instrument, warn};

use crate::action::ActionRequest;
use crate::config::AuthzConfig;
use crate::engine::evaluate;
use crate::error::{AuthzError, Result};
use crate::legacy::{transform_legacy_policies, LegacyScope, LegacySelector};
use crate::loader::PolicyStatementLoader;
use crate::statement::PolicyStatement;
use crate::types::{OrgId, Viewer};

/// Default bound on a single statement load.
pub const DEFAULT_STATEMENT_LOAD_TIMEOUT: Duration = Duration::from_secs(5);

/// Authentication result for a single request.
#[async_trait]
pub trait Session: Send + Sync {
	/// Short label used in logs.
	fn kind(&self) -> &'static str;

	/// Policy statements that apply to this session within an organization.
	async fn load_policy_statements_for_organization(
		&self,
		organization_id: OrgId,
	) -> Result<Arc<[PolicyStatement]>>;

	/// The user behind the session.
	fn viewer(&self) -> Result<&Viewer> {
		Err(AuthzError::Unauthenticated)
	}

	/// The selector of the legacy access token behind the session.
	fn legacy_selector(&self) -> Result<&LegacySelector> {
		Err(AuthzError::UnsupportedContext(format!(
			"{} session has no legacy access token",
			self.kind()
		)))
	}

	/// Fails with [`AuthzError::AccessDenied`] unless the session's statements
	/// allow the request.
	#[instrument(
		level = "debug",
		skip(self, request),
		fields(
			action = %request.action,
			organization_id = %request.organization_id(),
		)
	)]
	async fn assert_perform_action(&self, request: &ActionRequest) -> Result<()> {
		debug!(session = self.kind(), "checking permission");
		let statements = self
			.load_policy_statements_for_organization(request.organization_id())
			.await?;
		let resource_ids = request.resource_ids()?;

		evaluate(
			&statements,
			request.action,
			request.organization_id(),
			&resource_ids,
		)
		.map(|_| ())
	}
}

// =============================================================================
// Unauthenticated
// =============================================================================

/// Session for requests that carried no recognised credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnauthenticatedSession;

#[async_trait]
impl Session for UnauthenticatedSession {
	fn kind(&self) -> &'static str {
		"unauthenticated"
	}

	async fn load_policy_statements_for_organization(
		&self,
		_organization_id: OrgId,
	) -> Result<Arc<[PolicyStatement]>> {
		Ok(Arc::from(Vec::new()))
	}
}

// =============================================================================
// User
// =============================================================================

type StatementCell = Arc<OnceCell<Arc<[PolicyStatement]>>>;

/// Session of a signed-in user.
///
/// Loads are bounded by a timeout. With caching enabled each organization is
/// loaded at most once per session; a failed load is not cached.
pub struct UserSession {
	viewer: Viewer,
	loader: Arc<dyn PolicyStatementLoader>,
	load_timeout: Duration,
	cache: Option<Mutex<HashMap<OrgId, StatementCell>>>,
}

impl UserSession {
	pub fn new(viewer: Viewer, loader: Arc<dyn PolicyStatementLoader>) -> Self {
		Self {
			viewer,
			loader,
			load_timeout: DEFAULT_STATEMENT_LOAD_TIMEOUT,
			cache: Some(Mutex::new(HashMap::new())),
		}
	}

	pub fn from_config(
		viewer: Viewer,
		loader: Arc<dyn PolicyStatementLoader>,
		config: &AuthzConfig,
	) -> Self {
		Self::new(viewer, loader)
			.with_load_timeout(config.statement_load_timeout)
			.with_statement_cache(config.cache_statements)
	}

	/// Builder: set load_timeout.
	pub fn with_load_timeout(mut self, load_timeout: Duration) -> Self {
		self.load_timeout = load_timeout;
		self
	}

	/// Builder: enable or disable the per-organization statement cache.
	pub fn with_statement_cache(mut self, enabled: bool) -> Self {
		self.cache = enabled.then(|| Mutex::new(HashMap::new()));
		self
	}

	fn cache_cell(&self, organization_id: OrgId) -> Option<StatementCell> {
		let cache = self.cache.as_ref()?;
		let mut cells = cache.lock().unwrap_or_else(|e| e.into_inner());
		Some(Arc::clone(cells.entry(organization_id).or_default()))
	}

	async fn load(&self, organization_id: OrgId) -> Result<Arc<[PolicyStatement]>> {
		let load = self
			.loader
			.load_policy_statements(organization_id, &self.viewer);

		match tokio::time::timeout(self.load_timeout, load).await {
			Ok(result) => {
				let statements = result?;
				debug!(
					organization_id = %organization_id,
					count = statements.len(),
					"loaded policy statements"
				);
				Ok(Arc::from(statements))
			}
			Err(_) => {
				warn!(
					organization_id = %organization_id,
					timeout_ms = self.load_timeout.as_millis() as u64,
					"policy statement load timed out"
				);
				Err(AuthzError::LoadTimeout { organization_id })
			}
		}
	}
}

impl fmt::Debug for UserSession {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("UserSession")
			.field("viewer", &self.viewer)
			.field("load_timeout", &self.load_timeout)
			.field("cache_statements", &self.cache.is_some())
			.finish_non_exhaustive()
	}
}

#[async_trait]
impl Session for UserSession {
	fn kind(&self) -> &'static str {
		"user"
	}

	async fn load_policy_statements_for_organization(
		&self,
		organization_id: OrgId,
	) -> Result<Arc<[PolicyStatement]>> {
		match self.cache_cell(organization_id) {
			Some(cell) => cell
				.get_or_try_init(|| self.load(organization_id))
				.await
				.map(Arc::clone),
			None => self.load(organization_id).await,
		}
	}

	fn viewer(&self) -> Result<&Viewer> {
		Ok(&self.viewer)
	}
}

// =============================================================================
// Legacy access token
// =============================================================================

/// Session backed by a legacy access token.
///
/// Statements are translated from the token's scopes once, at construction.
#[derive(Debug, Clone)]
pub struct LegacyTokenSession {
	selector: LegacySelector,
	scopes: Vec<LegacyScope>,
	statements: Arc<[PolicyStatement]>,
}

impl LegacyTokenSession {
	pub fn new(selector: LegacySelector, scopes: Vec<LegacyScope>) -> Self {
		let statements = Arc::from(transform_legacy_policies(&selector, &scopes));
		Self {
			selector,
			scopes,
			statements,
		}
	}

	pub fn scopes(&self) -> &[LegacyScope] {
		&self.scopes
	}
}

#[async_trait]
impl Session for LegacyTokenSession {
	fn kind(&self) -> &'static str {
		"legacy_token"
	}

	async fn load_policy_statements_for_organization(
		&self,
		_organization_id: OrgId,
	) -> Result<Arc<[PolicyStatement]>> {
		Ok(Arc::clone(&self.statements))
	}

	fn legacy_selector(&self) -> Result<&LegacySelector> {
		Ok(&self.selector)
	}
}
