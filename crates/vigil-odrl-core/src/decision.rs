// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Evaluation outcomes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::EvaluationFault;

/// File name of a stored query artifact, e.g. `extract_l_data.txt`.
///
/// Construction rejects names that could leave the query directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtifactName(String);

impl ArtifactName {
	pub fn new(name: impl Into<String>) -> Result<Self, EvaluationFault> {
		let name = name.into();
		let escapes = name.contains('/') || name.contains('\\') || name == "." || name == "..";
		if name.is_empty() || escapes {
			return Err(EvaluationFault::InvalidArtifactName { name });
		}
		Ok(Self(name))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for ArtifactName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

/// The result of evaluating one request against one policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "detail", rename_all = "snake_case")]
pub enum Decision {
	Granted(ArtifactName),
	Denied(DenyReason),
}

impl Decision {
	pub fn is_granted(&self) -> bool {
		matches!(self, Decision::Granted(_))
	}
}

/// Why a request was refused. A refusal is a normal outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum DenyReason {
	/// No policy file is associated with the requested target.
	NoCandidatePolicies,
	/// No permission matched assignee, action and target.
	NoMatchingPermission,
	/// Request constraint keys differ from the offer vocabulary.
	VocabularyMismatch {
		missing: Vec<String>,
		extra: Vec<String>,
	},
	/// The request has no constraints but the offer has prohibitions.
	UnconstrainedWithProhibitions,
	/// A requested value is forbidden by a prohibition.
	Prohibited { key: String, value: String },
}

impl fmt::Display for DenyReason {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			DenyReason::NoCandidatePolicies => write!(f, "no policy is associated with the target"),
			DenyReason::NoMatchingPermission => write!(f, "no permission matches the request"),
			DenyReason::VocabularyMismatch { missing, extra } => {
				write!(f, "constraint keys differ from policy vocabulary")?;
				if !missing.is_empty() {
					write!(f, "; missing: {}", missing.join(", "))?;
				}
				if !extra.is_empty() {
					write!(f, "; unexpected: {}", extra.join(", "))?;
				}
				Ok(())
			}
			DenyReason::UnconstrainedWithProhibitions => {
				write!(f, "unconstrained request against an offer with prohibitions")
			}
			DenyReason::Prohibited { key, value } => {
				write!(f, "value '{value}' for '{key}' is prohibited")
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn artifact_name_rejects_escapes() {
		for bad in ["", ".", "..", "../x.txt", "a/b.txt", "a\\b.txt"] {
			assert!(ArtifactName::new(bad).is_err(), "{bad:?} should be rejected");
		}
		assert_eq!(ArtifactName::new("q.txt").unwrap().as_str(), "q.txt");
	}

	#[test]
	fn deny_reason_display() {
		let reason = DenyReason::VocabularyMismatch {
			missing: vec!["purpose".to_string()],
			extra: vec!["region".to_string()],
		};
		assert_eq!(
			reason.to_string(),
			"constraint keys differ from policy vocabulary; missing: purpose; unexpected: region"
		);
	}

	#[test]
	fn deny_reason_serializes_with_tag() {
		let json = serde_json::to_value(DenyReason::Prohibited {
			key: "purpose".to_string(),
			value: "marketing".to_string(),
		})
		.unwrap();
		assert_eq!(json["reason"], "prohibited");
		assert_eq!(json["value"], "marketing");
	}
}
