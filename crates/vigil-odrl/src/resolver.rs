// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Loads the stored query behind a granted artifact name.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, instrument, warn};
use vigil_odrl_core::ArtifactName;

use crate::error::EngineError;

#[derive(Debug, Clone)]
pub struct ResourceResolver {
	query_dir: PathBuf,
}

impl ResourceResolver {
	pub fn new(query_dir: impl Into<PathBuf>) -> Self {
		Self {
			query_dir: query_dir.into(),
		}
	}

	pub fn query_dir(&self) -> &Path {
		&self.query_dir
	}

	/// Reads the artifact's query text. A missing file is
	/// [`EngineError::ResourceNotFound`], never a denial.
	#[instrument(level = "debug", skip(self, artifact), fields(artifact = %artifact))]
	pub fn resolve(&self, artifact: &ArtifactName) -> Result<String, EngineError> {
		let path = self.query_dir.join(artifact.as_str());
		match std::fs::read_to_string(&path) {
			Ok(query) => {
				debug!(path = %path.display(), bytes = query.len(), "resolved query artifact");
				Ok(query)
			}
			Err(source) if source.kind() == ErrorKind::NotFound => {
				warn!(path = %path.display(), "granted query artifact is missing");
				Err(EngineError::ResourceNotFound {
					artifact: artifact.to_string(),
					path,
				})
			}
			Err(source) => Err(EngineError::ArtifactRead { path, source }),
		}
	}
}
