// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Policy and query directory configuration section.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_policy_dir() -> PathBuf {
	PathBuf::from("./policies")
}

fn default_query_dir() -> PathBuf {
	PathBuf::from("./data")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PathsConfigLayer {
	pub policy_dir: Option<PathBuf>,
	pub query_dir: Option<PathBuf>,
}

impl PathsConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.policy_dir.is_some() {
			self.policy_dir = other.policy_dir;
		}
		if other.query_dir.is_some() {
			self.query_dir = other.query_dir;
		}
	}

	pub fn finalize(self) -> PathsConfig {
		PathsConfig {
			policy_dir: self.policy_dir.unwrap_or_else(default_policy_dir),
			query_dir: self.query_dir.unwrap_or_else(default_query_dir),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PathsConfig {
	pub policy_dir: PathBuf,
	pub query_dir: PathBuf,
}

impl Default for PathsConfig {
	fn default() -> Self {
		Self {
			policy_dir: default_policy_dir(),
			query_dir: default_query_dir(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_values() {
		let config = PathsConfig::default();
		assert_eq!(config.policy_dir, PathBuf::from("./policies"));
		assert_eq!(config.query_dir, PathBuf::from("./data"));
	}

	#[test]
	fn test_layer_finalize_defaults() {
		assert_eq!(PathsConfigLayer::default().finalize(), PathsConfig::default());
	}

	#[test]
	fn test_merge_overwrites() {
		let mut base = PathsConfigLayer {
			policy_dir: Some(PathBuf::from("/old/policies")),
			query_dir: Some(PathBuf::from("/old/data")),
		};
		base.merge(PathsConfigLayer {
			policy_dir: Some(PathBuf::from("/new/policies")),
			query_dir: None,
		});
		assert_eq!(base.policy_dir, Some(PathBuf::from("/new/policies")));
		assert_eq!(base.query_dir, Some(PathBuf::from("/old/data")));
	}

	#[test]
	fn test_deserialize_layer_partial() {
		let layer: PathsConfigLayer = toml::from_str(r#"query_dir = "/srv/queries""#).unwrap();
		assert!(layer.policy_dir.is_none());
		assert_eq!(layer.finalize().query_dir, PathBuf::from("/srv/queries"));
	}
}
