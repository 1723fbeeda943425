// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Per-candidate diagnostics for one authorization run.

use std::path::PathBuf;

use serde::Serialize;
use vigil_odrl_core::{ArtifactName, DenyReason};

/// Every policy file considered for a request, in evaluation order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EvaluationReport {
	pub target: String,
	pub candidates: Vec<CandidateReport>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateReport {
	pub policy: PathBuf,
	pub outcome: CandidateOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CandidateOutcome {
	Granted { artifact: ArtifactName },
	Denied { reason: DenyReason },
	Fault { message: String },
}

impl EvaluationReport {
	pub fn new(target: impl Into<String>) -> Self {
		Self {
			target: target.into(),
			candidates: Vec::new(),
		}
	}

	pub(crate) fn record(&mut self, policy: PathBuf, outcome: CandidateOutcome) {
		self.candidates.push(CandidateReport { policy, outcome });
	}

	pub fn faults(&self) -> impl Iterator<Item = &CandidateReport> {
		self
			.candidates
			.iter()
			.filter(|c| matches!(c.outcome, CandidateOutcome::Fault { .. }))
	}
}
