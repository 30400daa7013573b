// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: environment variables and TOML files.

use std::path::PathBuf;

use tracing::{debug, trace};

use super::sections::{AuthzConfigLayer, LogFormat, LoggingConfigLayer};
use super::HiveAuthzConfigLayer;
use crate::error::ConfigError;

/// Default location of the config file.
pub const SYSTEM_CONFIG_PATH: &str = "/etc/hive/authz.toml";

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<HiveAuthzConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<HiveAuthzConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(HiveAuthzConfigLayer::default())
	}
}

/// TOML file configuration source.
///
/// A missing file is treated as empty.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new(SYSTEM_CONFIG_PATH)
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<HiveAuthzConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(HiveAuthzConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: HiveAuthzConfigLayer =
			toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
				path: self.path.clone(),
				source: e,
			})?;

		trace!("parsed config layer from TOML");
		Ok(layer)
	}
}

/// Environment variable source.
///
/// Convention: HIVE_AUTHZ_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<HiveAuthzConfigLayer, ConfigError> {
		debug!("loading environment variables");
		Ok(HiveAuthzConfigLayer {
			authz: Some(load_authz_from_env()?),
			logging: Some(load_logging_from_env()?),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn env_bool(name: &str) -> Result<Option<bool>, ConfigError> {
	match env_var(name) {
		Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => Ok(Some(true)),
		Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => Ok(Some(false)),
		Some(v) => Err(ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid boolean value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn env_u64(name: &str) -> Result<Option<u64>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|_| ConfigError::InvalidValue {
			key: name.to_string(),
			message: format!("invalid u64 value '{v}'"),
		}),
		None => Ok(None),
	}
}

fn env_log_format(name: &str) -> Result<Option<LogFormat>, ConfigError> {
	match env_var(name) {
		Some(v) => v.parse().map(Some).map_err(|message| ConfigError::InvalidValue {
			key: name.to_string(),
			message,
		}),
		None => Ok(None),
	}
}

fn load_authz_from_env() -> Result<AuthzConfigLayer, ConfigError> {
	Ok(AuthzConfigLayer {
		statement_load_timeout_ms: env_u64("HIVE_AUTHZ_STATEMENT_LOAD_TIMEOUT_MS")?,
		cache_statements: env_bool("HIVE_AUTHZ_CACHE_STATEMENTS")?,
		session_cookie_name: env_var("HIVE_AUTHZ_SESSION_COOKIE_NAME"),
	})
}

fn load_logging_from_env() -> Result<LoggingConfigLayer, ConfigError> {
	Ok(LoggingConfigLayer {
		level: env_var("HIVE_AUTHZ_LOG_LEVEL"),
		format: env_log_format("HIVE_AUTHZ_LOG_FORMAT")?,
	})
}
