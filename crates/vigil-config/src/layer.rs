// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration layer for merging from multiple sources.

use serde::Deserialize;

use crate::sections::{EngineConfigLayer, LoggingConfigLayer, PathsConfigLayer};

/// Vigil configuration layer - all fields are Option for merging.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct VigilConfigLayer {
	#[serde(default)]
	pub paths: Option<PathsConfigLayer>,
	#[serde(default)]
	pub engine: Option<EngineConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

impl VigilConfigLayer {
	/// Merge another layer into this one. Other layer takes precedence.
	pub fn merge(&mut self, other: VigilConfigLayer) {
		merge_option(&mut self.paths, other.paths, PathsConfigLayer::merge);
		merge_option(&mut self.engine, other.engine, EngineConfigLayer::merge);
		merge_option(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}

fn merge_option<T, F>(target: &mut Option<T>, source: Option<T>, merge_fn: F)
where
	F: FnOnce(&mut T, T),
{
	match (target.as_mut(), source) {
		(Some(t), Some(s)) => merge_fn(t, s),
		(None, Some(s)) => *target = Some(s),
		_ => {}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use std::path::PathBuf;

	#[test]
	fn test_merge_empty_layers() {
		let mut base = VigilConfigLayer::default();
		base.merge(VigilConfigLayer::default());
		assert_eq!(base, VigilConfigLayer::default());
	}

	#[test]
	fn test_merge_adds_missing_sections() {
		let mut base = VigilConfigLayer::default();
		base.merge(VigilConfigLayer {
			logging: Some(LoggingConfigLayer {
				level: Some("debug".to_string()),
				..Default::default()
			}),
			..Default::default()
		});
		assert_eq!(
			base.logging.and_then(|l| l.level),
			Some("debug".to_string())
		);
	}

	#[test]
	fn test_deserialize_full_file() {
		let layer: VigilConfigLayer = toml::from_str(
			r#"
[paths]
policy_dir = "/etc/vigil/policies"

[engine]
query_marker = "/queries/"

[logging]
format = "json"
"#,
		)
		.unwrap();
		assert_eq!(
			layer.paths.and_then(|p| p.policy_dir),
			Some(PathBuf::from("/etc/vigil/policies"))
		);
		assert_eq!(
			layer.engine.and_then(|e| e.query_marker),
			Some("/queries/".to_string())
		);
		assert!(layer.logging.is_some());
	}

	proptest! {
		#[test]
		fn later_layer_wins_for_set_fields(
			base_dir in proptest::option::of("[a-z/]{1,12}"),
			over_dir in proptest::option::of("[a-z/]{1,12}"),
		) {
			let layer = |dir: Option<String>| VigilConfigLayer {
				paths: Some(PathsConfigLayer {
					policy_dir: dir.map(PathBuf::from),
					query_dir: None,
				}),
				..Default::default()
			};
			let mut merged = layer(base_dir.clone());
			merged.merge(layer(over_dir.clone()));

			let expected = over_dir.or(base_dir).map(PathBuf::from);
			prop_assert_eq!(merged.paths.and_then(|p| p.policy_dir), expected);
		}
	}
}
