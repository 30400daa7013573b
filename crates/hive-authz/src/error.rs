// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for authorization and authentication.

use std::path::PathBuf;

use thiserror::Error;

use crate::action::Action;
use crate::types::OrgId;

/// Result type alias for authorization operations.
pub type Result<T> = std::result::Result<T, AuthzError>;

/// Top-level error type for authorization checks and session handling.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthzError {
	/// A policy statement carries a malformed resource identifier.
	#[error(transparent)]
	InvalidResourceIdentifier(#[from] InvalidResourceIdentifier),

	/// No applicable allow, or an explicit deny matched.
	#[error("Missing permission for performing '{action}' on resource")]
	AccessDenied { action: Action },

	/// A viewer was requested but no session was established.
	#[error("Authorization token is missing")]
	Unauthenticated,

	/// The session cannot serve the requested context.
	#[error("unsupported context: {0}")]
	UnsupportedContext(String),

	#[error("unknown action: {0}")]
	UnknownAction(String),

	#[error("invalid action pattern: {0}")]
	InvalidActionPattern(String),

	#[error("unknown legacy scope: {0}")]
	UnknownLegacyScope(String),

	/// The action needs a parameter the caller did not provide.
	#[error("action '{action}' requires parameter '{parameter}'")]
	MissingParameter {
		action: Action,
		parameter: &'static str,
	},

	#[error("loading policy statements for organization {organization_id} timed out")]
	LoadTimeout { organization_id: OrgId },

	#[error("policy statement loader failed: {0}")]
	Loader(String),
}

impl AuthzError {
	/// Stable machine-readable code for transport layers.
	pub fn code(&self) -> &'static str {
		match self {
			AuthzError::AccessDenied { .. } => "FORBIDDEN",
			AuthzError::Unauthenticated => "UNAUTHENTICATED",
			AuthzError::UnsupportedContext(_) => "UNSUPPORTED_CONTEXT",
			AuthzError::InvalidResourceIdentifier(_)
			| AuthzError::UnknownAction(_)
			| AuthzError::InvalidActionPattern(_)
			| AuthzError::UnknownLegacyScope(_) => "INVALID_POLICY",
			AuthzError::MissingParameter { .. } => "BAD_REQUEST",
			AuthzError::LoadTimeout { .. } | AuthzError::Loader(_) => "INTERNAL_SERVER_ERROR",
		}
	}

	/// Returns true if this error is the outcome of a failed permission check.
	pub fn is_access_denied(&self) -> bool {
		matches!(self, AuthzError::AccessDenied { .. })
	}
}

/// Reasons a resource identifier string failed to parse.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidResourceIdentifier {
	#[error("Invalid resource identifier '{0}' (1)")]
	MissingParts(String),

	#[error("Invalid resource identifier '{0}'. Expected string to start with hrn: (2)")]
	InvalidPrefix(String),

	#[error("Invalid resource identifier '{0}'. Expected UUID or * (3)")]
	InvalidOrganization(String),

	#[error("Invalid resource identifier '{0}'. Expected type or * (4)")]
	MissingResourcePath(String),
}

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	#[error("failed to read config file {path}: {source}")]
	FileRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to parse config file {path}: {source}")]
	TomlParse {
		path: PathBuf,
		#[source]
		source: toml::de::Error,
	},

	#[error("invalid value for {key}: {message}")]
	InvalidValue { key: String, message: String },

	#[error("configuration validation failed: {0}")]
	Validation(String),

	#[error("failed to initialize tracing: {0}")]
	Tracing(String),
}
