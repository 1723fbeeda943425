// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use thiserror::Error;

/// A matched permission that cannot be resolved to an artifact.
///
/// These are policy authoring faults, reported separately from denials.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationFault {
	#[error("no target of the matched permission contains the query marker '{marker}'")]
	MissingQueryMarker { marker: String },

	#[error("artifact name '{name}' is empty or escapes the query directory")]
	InvalidArtifactName { name: String },
}
