// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tracing subscriber setup for binaries embedding the engine.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::{LogFormat, LoggingConfig};
use crate::error::ConfigError;

/// Installs the global tracing subscriber.
///
/// `RUST_LOG` takes priority over the configured level. Fails if a global
/// subscriber is already set.
pub fn init_tracing(config: &LoggingConfig) -> Result<(), ConfigError> {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| config.level.clone().into());
	let registry = tracing_subscriber::registry().with(filter);

	let result = match config.format {
		LogFormat::Text => registry.with(fmt::layer()).try_init(),
		LogFormat::Json => registry.with(fmt::layer().json()).try_init(),
	};

	result.map_err(|e| ConfigError::Tracing(e.to_string()))
}
