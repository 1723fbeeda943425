// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration management for vigil.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file,
//!   environment, command line)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`VIGIL_*`)
//!
//! # Usage
//!
//! ```ignore
//! use vigil_config::load_config;
//!
//! let config = load_config()?;
//! println!("policies in {}", config.paths.policy_dir.display());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::VigilConfigLayer;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, OverrideSource, Precedence, TomlSource};

use std::path::PathBuf;

use tracing::{debug, info};

/// Fully resolved vigil configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VigilConfig {
	pub paths: PathsConfig,
	pub engine: EngineConfig,
	pub logging: LoggingConfig,
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`VIGIL_*`)
/// 2. Config file (`/etc/vigil/vigil.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<VigilConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with an optional config file path and command-line
/// overrides on top of the environment.
pub fn load_config_with(
	config_path: Option<PathBuf>,
	overrides: VigilConfigLayer,
) -> Result<VigilConfig, ConfigError> {
	let file = match config_path {
		Some(path) => TomlSource::new(path),
		None => TomlSource::system(),
	};

	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(file),
		Box::new(EnvSource),
		Box::new(OverrideSource::new(overrides)),
	])
}

/// Merge the given sources in precedence order and finalize the result.
pub fn load_from_sources(
	mut sources: Vec<Box<dyn ConfigSource>>,
) -> Result<VigilConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = VigilConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: VigilConfigLayer) -> Result<VigilConfig, ConfigError> {
	let paths = layer.paths.unwrap_or_default().finalize();
	let engine = layer.engine.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_config(&engine)?;

	info!(
		policy_dir = %paths.policy_dir.display(),
		query_dir = %paths.query_dir.display(),
		query_marker = %engine.query_marker,
		subject_selection = %engine.subject_selection,
		log_format = %logging.format,
		"vigil configuration loaded"
	);

	Ok(VigilConfig {
		paths,
		engine,
		logging,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(engine: &EngineConfig) -> Result<(), ConfigError> {
	if engine.query_marker.is_empty() {
		return Err(ConfigError::Validation(
			"engine.query_marker must not be empty".to_string(),
		));
	}

	if engine.policy_extension.is_empty() {
		return Err(ConfigError::Validation(
			"engine.policy_extension must not be empty".to_string(),
		));
	}

	if engine.artifact_suffix.contains(['/', '\\']) {
		return Err(ConfigError::Validation(format!(
			"engine.artifact_suffix '{}' must not contain a path separator",
			engine.artifact_suffix
		)));
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_defaults_finalize() {
		let config = finalize(VigilConfigLayer::default()).unwrap();
		assert_eq!(config, VigilConfig::default());
	}

	#[test]
	fn test_empty_query_marker_is_rejected() {
		let engine = EngineConfig {
			query_marker: String::new(),
			..Default::default()
		};
		assert!(matches!(
			validate_config(&engine),
			Err(ConfigError::Validation(_))
		));
	}

	#[test]
	fn test_suffix_with_separator_is_rejected() {
		let engine = EngineConfig {
			artifact_suffix: "/../x".to_string(),
			..Default::default()
		};
		assert!(validate_config(&engine).is_err());
	}

	#[test]
	fn test_sources_merge_in_precedence_order() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("vigil.toml");
		std::fs::write(
			&path,
			"[paths]\npolicy_dir = \"/from/file\"\nquery_dir = \"/file/data\"\n",
		)
		.unwrap();

		let overrides = VigilConfigLayer {
			paths: Some(PathsConfigLayer {
				policy_dir: Some(PathBuf::from("/from/cli")),
				query_dir: None,
			}),
			..Default::default()
		};

		// Listed out of order on purpose; precedence decides.
		let config = load_from_sources(vec![
			Box::new(OverrideSource::new(overrides)),
			Box::new(TomlSource::new(&path)),
			Box::new(DefaultsSource),
		])
		.unwrap();

		assert_eq!(config.paths.policy_dir, PathBuf::from("/from/cli"));
		assert_eq!(config.paths.query_dir, PathBuf::from("/file/data"));
		assert_eq!(config.engine, EngineConfig::default());
	}
}
