// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections: authorization behaviour and logging.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::authn::DEFAULT_SESSION_COOKIE_NAME;
use crate::session::DEFAULT_STATEMENT_LOAD_TIMEOUT;

// =============================================================================
// Authorization
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AuthzConfigLayer {
	pub statement_load_timeout_ms: Option<u64>,
	pub cache_statements: Option<bool>,
	pub session_cookie_name: Option<String>,
}

impl AuthzConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.statement_load_timeout_ms.is_some() {
			self.statement_load_timeout_ms = other.statement_load_timeout_ms;
		}
		if other.cache_statements.is_some() {
			self.cache_statements = other.cache_statements;
		}
		if other.session_cookie_name.is_some() {
			self.session_cookie_name = other.session_cookie_name;
		}
	}

	pub fn finalize(self) -> AuthzConfig {
		let defaults = AuthzConfig::default();
		AuthzConfig {
			statement_load_timeout: self
				.statement_load_timeout_ms
				.map(Duration::from_millis)
				.unwrap_or(defaults.statement_load_timeout),
			cache_statements: self.cache_statements.unwrap_or(defaults.cache_statements),
			session_cookie_name: self
				.session_cookie_name
				.unwrap_or(defaults.session_cookie_name),
		}
	}
}

/// Settings for sessions and authentication strategies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthzConfig {
	/// Upper bound on a single policy statement load.
	pub statement_load_timeout: Duration,
	/// Whether user sessions cache statements per organization.
	pub cache_statements: bool,
	pub session_cookie_name: String,
}

impl Default for AuthzConfig {
	fn default() -> Self {
		Self {
			statement_load_timeout: DEFAULT_STATEMENT_LOAD_TIMEOUT,
			cache_statements: true,
			session_cookie_name: DEFAULT_SESSION_COOKIE_NAME.to_string(),
		}
	}
}

// =============================================================================
// Logging
// =============================================================================

fn default_level() -> String {
	"info".to_string()
}

/// Output format of the log layer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
	#[default]
	Text,
	Json,
}

impl FromStr for LogFormat {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.to_ascii_lowercase().as_str() {
			"text" => Ok(LogFormat::Text),
			"json" => Ok(LogFormat::Json),
			other => Err(format!("unknown log format '{other}', expected text or json")),
		}
	}
}

impl fmt::Display for LogFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			LogFormat::Text => f.write_str("text"),
			LogFormat::Json => f.write_str("json"),
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfigLayer {
	pub level: Option<String>,
	pub format: Option<LogFormat>,
}

impl LoggingConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.level.is_some() {
			self.level = other.level;
		}
		if other.format.is_some() {
			self.format = other.format;
		}
	}

	pub fn finalize(self) -> LoggingConfig {
		LoggingConfig {
			level: self.level.unwrap_or_else(default_level),
			format: self.format.unwrap_or_default(),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
	pub level: String,
	pub format: LogFormat,
}

impl Default for LoggingConfig {
	fn default() -> Self {
		Self {
			level: default_level(),
			format: LogFormat::default(),
		}
	}
}
