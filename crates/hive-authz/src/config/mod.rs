// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Layered configuration.
//!
//! Values are merged from defaults, a TOML file, and `HIVE_AUTHZ_*`
//! environment variables, with later sources overriding earlier ones.
//!
//! ```toml
//! [authz]
//! statement_load_timeout_ms = 5000
//! cache_statements = true
//! session_cookie_name = "hive_session"
//!
//! [logging]
//! level = "info"
//! format = "text"
//! ```

pub mod sections;
pub mod sources;

pub use sections::{AuthzConfig, AuthzConfigLayer, LogFormat, LoggingConfig, LoggingConfigLayer};
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource, SYSTEM_CONFIG_PATH};

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{debug, info};

use crate::error::ConfigError;

/// Partial configuration as read from a single source.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct HiveAuthzConfigLayer {
	pub authz: Option<AuthzConfigLayer>,
	pub logging: Option<LoggingConfigLayer>,
}

impl HiveAuthzConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if let Some(other) = other.authz {
			self.authz.get_or_insert_with(Default::default).merge(other);
		}
		if let Some(other) = other.logging {
			self.logging.get_or_insert_with(Default::default).merge(other);
		}
	}
}

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HiveAuthzConfig {
	pub authz: AuthzConfig,
	pub logging: LoggingConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`HIVE_AUTHZ_*`)
/// 2. Config file (`/etc/hive/authz.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<HiveAuthzConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<PathBuf>,
) -> Result<HiveAuthzConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only.
pub fn load_config_from_env() -> Result<HiveAuthzConfig, ConfigError> {
	load_from_sources(vec![Box::new(DefaultsSource), Box::new(EnvSource)])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<HiveAuthzConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = HiveAuthzConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
fn finalize(layer: HiveAuthzConfigLayer) -> Result<HiveAuthzConfig, ConfigError> {
	let authz = layer.authz.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_config(&authz)?;

	info!(
		statement_load_timeout_ms = authz.statement_load_timeout.as_millis() as u64,
		cache_statements = authz.cache_statements,
		session_cookie_name = %authz.session_cookie_name,
		log_level = %logging.level,
		log_format = %logging.format,
		"Authorization configuration loaded"
	);

	Ok(HiveAuthzConfig { authz, logging })
}

fn validate_config(authz: &AuthzConfig) -> Result<(), ConfigError> {
	if authz.statement_load_timeout.is_zero() {
		return Err(ConfigError::Validation(
			"statement_load_timeout_ms must be greater than zero".to_string(),
		));
	}

	let cookie_name = &authz.session_cookie_name;
	if cookie_name.is_empty()
		|| cookie_name
			.chars()
			.any(|c| c.is_whitespace() || matches!(c, ';' | '=' | ','))
	{
		return Err(ConfigError::Validation(format!(
			"invalid session cookie name '{cookie_name}'"
		)));
	}

	Ok(())
}
