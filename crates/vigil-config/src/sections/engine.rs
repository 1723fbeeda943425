// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Evaluation engine configuration section.

use serde::{Deserialize, Serialize};
pub use vigil_odrl_core::SubjectSelection;

fn default_query_marker() -> String {
	"/sparql/".to_string()
}

fn default_artifact_suffix() -> String {
	".txt".to_string()
}

fn default_policy_extension() -> String {
	"ttl".to_string()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EngineConfigLayer {
	pub query_marker: Option<String>,
	pub artifact_suffix: Option<String>,
	pub policy_extension: Option<String>,
	pub subject_selection: Option<SubjectSelection>,
}

impl EngineConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.query_marker.is_some() {
			self.query_marker = other.query_marker;
		}
		if other.artifact_suffix.is_some() {
			self.artifact_suffix = other.artifact_suffix;
		}
		if other.policy_extension.is_some() {
			self.policy_extension = other.policy_extension;
		}
		if other.subject_selection.is_some() {
			self.subject_selection = other.subject_selection;
		}
	}

	pub fn finalize(self) -> EngineConfig {
		EngineConfig {
			query_marker: self.query_marker.unwrap_or_else(default_query_marker),
			artifact_suffix: self.artifact_suffix.unwrap_or_else(default_artifact_suffix),
			policy_extension: self
				.policy_extension
				.unwrap_or_else(default_policy_extension),
			subject_selection: self.subject_selection.unwrap_or_default(),
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EngineConfig {
	pub query_marker: String,
	pub artifact_suffix: String,
	pub policy_extension: String,
	pub subject_selection: SubjectSelection,
}

impl Default for EngineConfig {
	fn default() -> Self {
		EngineConfigLayer::default().finalize()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_default_values() {
		let config = EngineConfig::default();
		assert_eq!(config.query_marker, "/sparql/");
		assert_eq!(config.artifact_suffix, ".txt");
		assert_eq!(config.policy_extension, "ttl");
		assert_eq!(config.subject_selection, SubjectSelection::Reject);
	}

	#[test]
	fn test_merge_overwrites() {
		let mut base = EngineConfigLayer {
			query_marker: Some("/q/".to_string()),
			subject_selection: Some(SubjectSelection::First),
			..Default::default()
		};
		base.merge(EngineConfigLayer {
			query_marker: Some("/queries/".to_string()),
			..Default::default()
		});
		assert_eq!(base.query_marker.as_deref(), Some("/queries/"));
		assert_eq!(base.subject_selection, Some(SubjectSelection::First));
	}

	#[test]
	fn test_deserialize_subject_selection() {
		let layer: EngineConfigLayer = toml::from_str(r#"subject_selection = "first""#).unwrap();
		assert_eq!(layer.subject_selection, Some(SubjectSelection::First));
		assert!(toml::from_str::<EngineConfigLayer>(r#"subject_selection = "any""#).is_err());
	}
}
