// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for request parsing, policy loading and the engine.

use std::fmt;
use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use vigil_turtle::TurtleError;

/// A request document that cannot be turned into a [`vigil_odrl_core::Request`].
#[derive(Debug, Error)]
pub enum RequestError {
	#[error("request document is not valid Turtle: {0}")]
	Syntax(#[from] TurtleError),

	#[error("request document has no odrl:Request subject")]
	NoRequestSubject,

	#[error("request document has {0} odrl:Request subjects, expected exactly one")]
	MultipleRequestSubjects(usize),

	#[error("request has no odrl:permission block")]
	NoPermission,

	#[error("request has {0} odrl:permission blocks, expected exactly one")]
	MultiplePermissions(usize),

	#[error("request permission is missing odrl:{0}")]
	MissingField(&'static str),

	#[error("request permission has more than one odrl:{0}")]
	AmbiguousField(&'static str),

	#[error("failed to read request document {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

/// A policy document that cannot be turned into a [`vigil_odrl_core::Policy`].
#[derive(Debug, Error)]
pub enum PolicyError {
	#[error("policy document is not valid Turtle: {0}")]
	Syntax(#[source] TurtleError),

	#[error("policy document has a malformed right-operand list: {0}")]
	Collection(#[source] TurtleError),

	#[error("failed to read policy document {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

/// One policy file that contributed a fault instead of a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PolicyFault {
	pub policy: PathBuf,
	pub message: String,
}

impl fmt::Display for PolicyFault {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}: {}", self.policy.display(), self.message)
	}
}

/// Terminal failures of an authorization run.
///
/// A refusal is not an error; it is reported as a denied verdict.
#[derive(Debug, Error)]
pub enum EngineError {
	#[error("malformed request: {0}")]
	MalformedRequest(#[from] RequestError),

	#[error("malformed policy: {}", join_faults(.faults))]
	MalformedPolicy { faults: Vec<PolicyFault> },

	#[error("failed to read policy document {path}: {source}")]
	PolicyRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("access granted but query artifact '{artifact}' is missing at {path}")]
	ResourceNotFound { artifact: String, path: PathBuf },

	#[error("failed to list policy directory {path}: {source}")]
	PolicyDirectory {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to read query artifact {path}: {source}")]
	ArtifactRead {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},
}

fn join_faults(faults: &[PolicyFault]) -> String {
	faults
		.iter()
		.map(ToString::to_string)
		.collect::<Vec<_>>()
		.join("; ")
}
