// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request authentication.
//!
//! [`AuthN`] runs an ordered chain of [`AuthNStrategy`] implementations over the
//! request headers and returns the first session produced:
//!
//! ```text
//! Request headers → strategy 1 → strategy 2 → ... → UnauthenticatedSession
//!                       │             │
//!                       └── Some(session) returns immediately, Err aborts
//! ```
//!
//! Two strategies are provided:
//!
//! - [`SessionCookieStrategy`]: user sessions from the session cookie
//! - [`LegacyTokenStrategy`]: legacy access tokens from the `Authorization` header
//!
//! # Security Notes
//!
//! - Token values are never logged; bearer tokens are held in [`BearerToken`]
//! - Legacy tokens are looked up by their SHA-256 hash, never by value

use async_trait::async_trait;
use http::header::{AUTHORIZATION, COOKIE};
use http::HeaderMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};
use zeroize::Zeroize;

use crate::config::AuthzConfig;
use crate::error::{AuthzError, Result};
use crate::legacy::{LegacyScope, LegacySelector};
use crate::loader::PolicyStatementLoader;
use crate::session::{LegacyTokenSession, Session, UnauthenticatedSession, UserSession};
use crate::types::Viewer;

/// Default name for the session cookie.
pub const DEFAULT_SESSION_COOKIE_NAME: &str = "hive_session";

// =============================================================================
// Header helpers
// =============================================================================

/// A bearer token taken from a request.
///
/// The value is zeroized on drop and redacted from `Debug` output.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct BearerToken(String);

impl BearerToken {
	pub fn new(token: impl Into<String>) -> Self {
		Self(token.into())
	}

	/// Explicitly access the token value.
	pub fn expose(&self) -> &str {
		&self.0
	}

	/// SHA-256 hash of the token, hex encoded.
	pub fn hash(&self) -> String {
		hash_token(&self.0)
	}
}

impl fmt::Debug for BearerToken {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str("BearerToken([REDACTED])")
	}
}

/// Hash a token for storage lookup.
pub fn hash_token(token: &str) -> String {
	hex::encode(Sha256::digest(token.as_bytes()))
}

/// Extract a cookie value from the Cookie header.
///
/// Returns `None` if the header is missing, not valid UTF-8, or does not
/// carry the named cookie.
pub fn extract_session_cookie_with_name(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
	headers
		.get(COOKIE)?
		.to_str()
		.ok()?
		.split(';')
		.find_map(|cookie| {
			let (name, value) = cookie.trim().split_once('=')?;
			(name == cookie_name).then(|| value.to_string())
		})
}

/// Extract a bearer token from the Authorization header.
///
/// Expects the format `Authorization: Bearer <token>`.
pub fn extract_bearer_token(headers: &HeaderMap) -> Option<BearerToken> {
	headers
		.get(AUTHORIZATION)?
		.to_str()
		.ok()?
		.strip_prefix("Bearer ")
		.filter(|token| !token.is_empty())
		.map(BearerToken::new)
}

// =============================================================================
// Strategy chain
// =============================================================================

/// One way of turning request headers into a session.
#[async_trait]
pub trait AuthNStrategy: Send + Sync {
	/// Short label used in logs.
	fn name(&self) -> &'static str;

	/// Returns `Ok(None)` when the request does not carry this strategy's
	/// credentials, and an error when it does but they are not valid.
	async fn parse(&self, headers: &HeaderMap) -> Result<Option<Arc<dyn Session>>>;
}

/// Ordered chain of authentication strategies.
#[derive(Clone, Default)]
pub struct AuthN {
	strategies: Vec<Arc<dyn AuthNStrategy>>,
}

impl AuthN {
	pub fn new(strategies: Vec<Arc<dyn AuthNStrategy>>) -> Self {
		Self { strategies }
	}

	/// Builder: append a strategy to the chain.
	pub fn with_strategy(mut self, strategy: Arc<dyn AuthNStrategy>) -> Self {
		self.strategies.push(strategy);
		self
	}

	pub fn strategy_names(&self) -> Vec<&'static str> {
		self.strategies.iter().map(|strategy| strategy.name()).collect()
	}

	/// Returns the session of the first strategy that recognises the request.
	///
	/// A strategy error ends the chain. Requests no strategy recognises get an
	/// [`UnauthenticatedSession`].
	#[instrument(level = "debug", skip(self, headers), fields(strategies = self.strategies.len()))]
	pub async fn authenticate(&self, headers: &HeaderMap) -> Result<Arc<dyn Session>> {
		for strategy in &self.strategies {
			match strategy.parse(headers).await {
				Ok(Some(session)) => {
					debug!(
						strategy = strategy.name(),
						session = session.kind(),
						"request authenticated"
					);
					return Ok(session);
				}
				Ok(None) => continue,
				Err(e) => {
					debug!(strategy = strategy.name(), error = %e, "authentication failed");
					return Err(e);
				}
			}
		}

		debug!("no strategy matched, using unauthenticated session");
		Ok(Arc::new(UnauthenticatedSession))
	}
}

impl fmt::Debug for AuthN {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AuthN")
			.field("strategies", &self.strategy_names())
			.finish()
	}
}

// =============================================================================
// Session cookie
// =============================================================================

/// Looks up the user behind a session cookie.
#[async_trait]
pub trait UserSessionResolver: Send + Sync {
	/// Returns `None` if the session is unknown or expired.
	async fn resolve(&self, session_token: &str) -> Result<Option<Viewer>>;
}

/// Authenticates users by their session cookie.
pub struct SessionCookieStrategy {
	resolver: Arc<dyn UserSessionResolver>,
	loader: Arc<dyn PolicyStatementLoader>,
	config: AuthzConfig,
}

impl SessionCookieStrategy {
	pub fn new(
		resolver: Arc<dyn UserSessionResolver>,
		loader: Arc<dyn PolicyStatementLoader>,
		config: AuthzConfig,
	) -> Self {
		Self {
			resolver,
			loader,
			config,
		}
	}
}

#[async_trait]
impl AuthNStrategy for SessionCookieStrategy {
	fn name(&self) -> &'static str {
		"session_cookie"
	}

	async fn parse(&self, headers: &HeaderMap) -> Result<Option<Arc<dyn Session>>> {
		let Some(mut session_token) =
			extract_session_cookie_with_name(headers, &self.config.session_cookie_name)
		else {
			return Ok(None);
		};

		let viewer = self.resolver.resolve(&session_token).await;
		session_token.zeroize();

		match viewer? {
			Some(viewer) => {
				debug!(user_id = %viewer.id, "resolved user session");
				Ok(Some(Arc::new(UserSession::from_config(
					viewer,
					Arc::clone(&self.loader),
					&self.config,
				))))
			}
			None => {
				debug!("session cookie did not resolve to a user");
				Err(AuthzError::Unauthenticated)
			}
		}
	}
}

// =============================================================================
// Legacy access token
// =============================================================================

/// A stored legacy access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyTokenRecord {
	pub selector: LegacySelector,
	pub scopes: Vec<LegacyScope>,
}

/// Looks up legacy access tokens by hash.
#[async_trait]
pub trait LegacyTokenStore: Send + Sync {
	async fn find_by_hash(&self, token_hash: &str) -> Result<Option<LegacyTokenRecord>>;
}

/// Authenticates legacy access tokens sent as bearer tokens.
pub struct LegacyTokenStrategy {
	store: Arc<dyn LegacyTokenStore>,
}

impl LegacyTokenStrategy {
	pub fn new(store: Arc<dyn LegacyTokenStore>) -> Self {
		Self { store }
	}
}

#[async_trait]
impl AuthNStrategy for LegacyTokenStrategy {
	fn name(&self) -> &'static str {
		"legacy_token"
	}

	async fn parse(&self, headers: &HeaderMap) -> Result<Option<Arc<dyn Session>>> {
		let Some(token) = extract_bearer_token(headers) else {
			return Ok(None);
		};

		match self.store.find_by_hash(&token.hash()).await? {
			Some(record) => {
				debug!(
					organization_id = %record.selector.organization_id,
					scopes = record.scopes.len(),
					"resolved legacy access token"
				);
				Ok(Some(Arc::new(LegacyTokenSession::new(
					record.selector,
					record.scopes,
				))))
			}
			None => {
				debug!("unknown legacy access token");
				Err(AuthzError::Unauthenticated)
			}
		}
	}
}
