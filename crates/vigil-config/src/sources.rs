// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: defaults, TOML files, environment, command line.

use std::path::PathBuf;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::error::ConfigError;
use crate::layer::VigilConfigLayer;
use crate::sections::{EngineConfigLayer, LoggingConfigLayer, PathsConfigLayer};

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
	CommandLine = 80,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<VigilConfigLayer, ConfigError>;
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

	fn load(&self) -> Result<VigilConfigLayer, ConfigError> {
		debug!("loading defaults");
		Ok(VigilConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/vigil/vigil.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<VigilConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(VigilConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		let layer: VigilConfigLayer =
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
/// Convention: VIGIL_<FIELD>, e.g. `VIGIL_POLICY_DIR`, `VIGIL_LOG_FORMAT`.
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<VigilConfigLayer, ConfigError> {
		debug!("loading environment variables");
		load_from_env(|name| std::env::var(name).ok())
	}
}

/// Explicit overrides, typically from command-line flags.
#[derive(Debug, Clone, Default)]
pub struct OverrideSource {
	layer: VigilConfigLayer,
}

impl OverrideSource {
	pub fn new(layer: VigilConfigLayer) -> Self {
		Self { layer }
	}
}

impl ConfigSource for OverrideSource {
	fn name(&self) -> &'static str {
		"command-line"
	}

	fn precedence(&self) -> Precedence {
		Precedence::CommandLine
	}

	fn load(&self) -> Result<VigilConfigLayer, ConfigError> {
		debug!("applying command-line overrides");
		Ok(self.layer.clone())
	}
}

fn load_from_env<F>(lookup: F) -> Result<VigilConfigLayer, ConfigError>
where
	F: Fn(&str) -> Option<String>,
{
	let var = |name: &str| lookup(name).filter(|s| !s.is_empty());

	Ok(VigilConfigLayer {
		paths: Some(PathsConfigLayer {
			policy_dir: var("VIGIL_POLICY_DIR").map(PathBuf::from),
			query_dir: var("VIGIL_QUERY_DIR").map(PathBuf::from),
		}),
		engine: Some(EngineConfigLayer {
			query_marker: var("VIGIL_QUERY_MARKER"),
			artifact_suffix: var("VIGIL_ARTIFACT_SUFFIX"),
			policy_extension: var("VIGIL_POLICY_EXTENSION"),
			subject_selection: parse_var("VIGIL_SUBJECT_SELECTION", var("VIGIL_SUBJECT_SELECTION"))?,
		}),
		logging: Some(LoggingConfigLayer {
			level: var("VIGIL_LOG_LEVEL"),
			format: parse_var("VIGIL_LOG_FORMAT", var("VIGIL_LOG_FORMAT"))?,
		}),
	})
}

fn parse_var<T>(name: &str, value: Option<String>) -> Result<Option<T>, ConfigError>
where
	T: FromStr<Err = String>,
{
	match value {
		Some(v) => v.parse().map(Some).map_err(|message| ConfigError::InvalidValue {
			key: name.to_string(),
			message,
		}),
		None => Ok(None),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::sections::{LogFormat, SubjectSelection};
	use std::collections::HashMap;

	fn env(pairs: &[(&str, &str)]) -> Result<VigilConfigLayer, ConfigError> {
		let vars: HashMap<String, String> = pairs
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();
		load_from_env(|name| vars.get(name).cloned())
	}

	#[test]
	fn test_precedence_ordering() {
		assert!(Precedence::Defaults < Precedence::ConfigFile);
		assert!(Precedence::ConfigFile < Precedence::Environment);
		assert!(Precedence::Environment < Precedence::CommandLine);
	}

	#[test]
	fn test_toml_source_missing_file_is_skipped() {
		let layer = TomlSource::new("/nonexistent/vigil.toml").load().unwrap();
		assert_eq!(layer, VigilConfigLayer::default());
	}

	#[test]
	fn test_toml_source_reads_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("vigil.toml");
		std::fs::write(&path, "[engine]\nsubject_selection = \"first\"\n").unwrap();

		let layer = TomlSource::new(&path).load().unwrap();
		assert_eq!(
			layer.engine.and_then(|e| e.subject_selection),
			Some(SubjectSelection::First)
		);
	}

	#[test]
	fn test_toml_source_invalid_file() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("vigil.toml");
		std::fs::write(&path, "[engine\nbroken").unwrap();

		assert!(matches!(
			TomlSource::new(&path).load(),
			Err(ConfigError::TomlParse { .. })
		));
	}

	#[test]
	fn test_env_reads_every_variable() {
		let layer = env(&[
			("VIGIL_POLICY_DIR", "/srv/policies"),
			("VIGIL_QUERY_DIR", "/srv/data"),
			("VIGIL_QUERY_MARKER", "/queries/"),
			("VIGIL_ARTIFACT_SUFFIX", ".rq"),
			("VIGIL_POLICY_EXTENSION", "turtle"),
			("VIGIL_SUBJECT_SELECTION", "first"),
			("VIGIL_LOG_LEVEL", "debug"),
			("VIGIL_LOG_FORMAT", "json"),
		])
		.unwrap();

		let paths = layer.paths.unwrap();
		assert_eq!(paths.policy_dir, Some(PathBuf::from("/srv/policies")));
		assert_eq!(paths.query_dir, Some(PathBuf::from("/srv/data")));

		let engine = layer.engine.unwrap();
		assert_eq!(engine.query_marker.as_deref(), Some("/queries/"));
		assert_eq!(engine.artifact_suffix.as_deref(), Some(".rq"));
		assert_eq!(engine.policy_extension.as_deref(), Some("turtle"));
		assert_eq!(engine.subject_selection, Some(SubjectSelection::First));

		let logging = layer.logging.unwrap();
		assert_eq!(logging.level.as_deref(), Some("debug"));
		assert_eq!(logging.format, Some(LogFormat::Json));
	}

	#[test]
	fn test_env_empty_values_are_ignored() {
		let layer = env(&[("VIGIL_POLICY_DIR", "")]).unwrap();
		assert_eq!(layer.paths.unwrap().policy_dir, None);
	}

	#[test]
	fn test_env_invalid_enum_is_reported() {
		match env(&[("VIGIL_LOG_FORMAT", "yaml")]) {
			Err(ConfigError::InvalidValue { key, .. }) => assert_eq!(key, "VIGIL_LOG_FORMAT"),
			other => panic!("expected InvalidValue, got {other:?}"),
		}
	}

	#[test]
	fn test_override_source_returns_layer() {
		let layer = VigilConfigLayer {
			paths: Some(PathsConfigLayer {
				policy_dir: Some(PathBuf::from("cli")),
				query_dir: None,
			}),
			..Default::default()
		};
		let source = OverrideSource::new(layer.clone());
		assert_eq!(source.precedence(), Precedence::CommandLine);
		assert_eq!(source.load().unwrap(), layer);
	}
}
