// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Process exit statuses.

use std::process::ExitCode;

use vigil_config::ConfigError;
use vigil_odrl::{EngineError, PolicyError, RequestError};

/// How a `vigil` invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
	/// Access granted, or a non-evaluating command completed.
	Success = 0,
	Denied = 1,
	MalformedRequest = 2,
	MalformedPolicy = 3,
	ResourceNotFound = 4,
	/// Configuration or I/O failure.
	Failure = 5,
}

impl From<Status> for ExitCode {
	fn from(status: Status) -> Self {
		ExitCode::from(status as u8)
	}
}

/// Classifies a top-level error by the first vigil error in its chain.
pub fn status_for(err: &anyhow::Error) -> Status {
	for cause in err.chain() {
		if let Some(engine) = cause.downcast_ref::<EngineError>() {
			return match engine {
				EngineError::MalformedRequest(request) => request_status(request),
				EngineError::MalformedPolicy { .. } => Status::MalformedPolicy,
				EngineError::ResourceNotFound { .. } => Status::ResourceNotFound,
				EngineError::PolicyDirectory { .. }
				| EngineError::PolicyRead { .. }
				| EngineError::ArtifactRead { .. } => Status::Failure,
			};
		}
		if let Some(request) = cause.downcast_ref::<RequestError>() {
			return request_status(request);
		}
		if let Some(policy) = cause.downcast_ref::<PolicyError>() {
			return match policy {
				PolicyError::Io { .. } => Status::Failure,
				_ => Status::MalformedPolicy,
			};
		}
		if cause.downcast_ref::<ConfigError>().is_some() {
			return Status::Failure;
		}
	}
	Status::Failure
}

fn request_status(err: &RequestError) -> Status {
	match err {
		RequestError::Io { .. } => Status::Failure,
		_ => Status::MalformedRequest,
	}
}
