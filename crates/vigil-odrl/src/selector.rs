// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Finds the policy files associated with a target and evaluates them in
//! order until one grants.

use std::path::{Path, PathBuf};

use tracing::{debug, info, instrument, warn};
use vigil_odrl_core::{evaluate, Decision, DenyReason, Request, ResourceNaming};

use crate::error::{EngineError, PolicyError, PolicyFault};
use crate::policy_loader::load_policy;
use crate::report::{CandidateOutcome, EvaluationReport};

/// The outcome of scanning every candidate policy for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
	pub decision: Decision,
	pub report: EvaluationReport,
}

/// Associates policy files with targets by file-name prefix.
#[derive(Debug, Clone)]
pub struct PolicySelector {
	policy_dir: PathBuf,
	extension: String,
}

impl PolicySelector {
	pub fn new(policy_dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
		Self {
			policy_dir: policy_dir.into(),
			extension: extension.into(),
		}
	}

	pub fn policy_dir(&self) -> &Path {
		&self.policy_dir
	}

	/// Policy files whose name starts with `target_name` and ends with the
	/// policy extension, sorted by file name.
	pub fn candidates(&self, target_name: &str) -> Result<Vec<PathBuf>, EngineError> {
		let directory_error = |source| EngineError::PolicyDirectory {
			path: self.policy_dir.clone(),
			source,
		};
		let suffix = format!(".{}", self.extension);

		let mut names = Vec::new();
		for entry in std::fs::read_dir(&self.policy_dir).map_err(directory_error)? {
			let entry = entry.map_err(directory_error)?;
			let Ok(name) = entry.file_name().into_string() else {
				continue;
			};
			if name.starts_with(target_name) && name.ends_with(&suffix) {
				names.push(name);
			}
		}
		names.sort();

		Ok(names
			.into_iter()
			.map(|name| self.policy_dir.join(name))
			.collect())
	}

	/// Evaluates every candidate for `request` in order; the first grant
	/// wins.
	///
	/// Without a grant, an unreadable candidate ends the run with
	/// [`EngineError::PolicyRead`] and any other fault with
	/// [`EngineError::MalformedPolicy`]. Otherwise the first concrete
	/// refusal reason is returned.
	#[instrument(level = "debug", skip(self, request, naming), fields(target = %request.target))]
	pub fn select(
		&self,
		request: &Request,
		naming: &ResourceNaming,
	) -> Result<Selection, EngineError> {
		let candidates = self.candidates(request.target_name())?;
		let mut report = EvaluationReport::new(request.target.clone());

		if candidates.is_empty() {
			debug!("no candidate policies for target");
			return Ok(Selection {
				decision: Decision::Denied(DenyReason::NoCandidatePolicies),
				report,
			});
		}

		let mut first_reason: Option<DenyReason> = None;
		let mut faults = Vec::new();
		let mut unreadable: Option<EngineError> = None;

		for path in candidates {
			let evaluated = match load_policy(&path) {
				Ok(policy) => evaluate(request, &policy, naming).map_err(|e| e.to_string()),
				Err(PolicyError::Io { source, .. }) => {
					let message = format!("failed to read policy document: {source}");
					warn!(policy = %path.display(), %message, "policy could not be read");
					report.record(path.clone(), CandidateOutcome::Fault { message });
					if unreadable.is_none() {
						unreadable = Some(EngineError::PolicyRead { path, source });
					}
					continue;
				}
				Err(err) => Err(err.to_string()),
			};

			match evaluated {
				Ok(Decision::Granted(artifact)) => {
					info!(policy = %path.display(), %artifact, "access granted");
					report.record(path, CandidateOutcome::Granted {
						artifact: artifact.clone(),
					});
					return Ok(Selection {
						decision: Decision::Granted(artifact),
						report,
					});
				}
				Ok(Decision::Denied(reason)) => {
					debug!(policy = %path.display(), %reason, "access denied");
					if first_reason.is_none() && reason != DenyReason::NoMatchingPermission {
						first_reason = Some(reason.clone());
					}
					report.record(path, CandidateOutcome::Denied { reason });
				}
				Err(message) => {
					warn!(policy = %path.display(), %message, "policy contributes no decision");
					faults.push(PolicyFault {
						policy: path.clone(),
						message: message.clone(),
					});
					report.record(path, CandidateOutcome::Fault { message });
				}
			}
		}

		// A read failure may be transient, so it outranks malformed documents.
		if let Some(err) = unreadable {
			return Err(err);
		}
		if !faults.is_empty() {
			return Err(EngineError::MalformedPolicy { faults });
		}

		Ok(Selection {
			decision: Decision::Denied(first_reason.unwrap_or(DenyReason::NoMatchingPermission)),
			report,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	const HEADER: &str = "@prefix odrl: <http://www.w3.org/ns/odrl/2/> .\n@prefix ex: <http://example.org/> .\n";

	fn offer(assignee: &str, query: &str) -> String {
		format!(
			"{HEADER}ex:p a odrl:Offer ; odrl:permission [ odrl:assignee ex:{assignee} ; odrl:action odrl:read ;
			odrl:target ex:ds, <http://example.org/sparql/{query}> ] ."
		)
	}

	fn request(assignee: &str) -> Request {
		Request::new(
			format!("http://example.org/{assignee}"),
			"http://www.w3.org/ns/odrl/2/read",
			"http://example.org/ds",
		)
	}

	fn selector(files: &[(&str, String)]) -> (tempfile::TempDir, PolicySelector) {
		let dir = tempfile::tempdir().unwrap();
		for (name, body) in files {
			fs::write(dir.path().join(name), body).unwrap();
		}
		let selector = PolicySelector::new(dir.path(), "ttl");
		(dir, selector)
	}

	fn names(paths: &[PathBuf]) -> Vec<String> {
		paths
			.iter()
			.map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
			.collect()
	}

	mod candidates {
		use super::*;

		#[test]
		fn filters_by_prefix_and_extension_sorted() {
			let (_dir, selector) = selector(&[
				("ds_b.ttl", String::new()),
				("ds_a.ttl", String::new()),
				("ds.txt", String::new()),
				("other.ttl", String::new()),
				("DS_upper.ttl", String::new()),
			]);
			let found = selector.candidates("ds").unwrap();
			assert_eq!(names(&found), vec!["ds_a.ttl", "ds_b.ttl"]);
		}

		#[test]
		fn missing_directory_is_an_error() {
			let selector = PolicySelector::new("/definitely/not/here", "ttl");
			assert!(matches!(
				selector.candidates("ds"),
				Err(EngineError::PolicyDirectory { .. })
			));
		}
	}

	mod select {
		use super::*;

		#[test]
		fn no_candidates_denies() {
			let (_dir, selector) = selector(&[("other.ttl", offer("alice", "q"))]);
			let selection = selector.select(&request("alice"), &ResourceNaming::default()).unwrap();
			assert_eq!(
				selection.decision,
				Decision::Denied(DenyReason::NoCandidatePolicies)
			);
			assert!(selection.report.candidates.is_empty());
		}

		#[test]
		fn first_grant_in_name_order_wins() {
			let (_dir, selector) = selector(&[
				("ds_2.ttl", offer("alice", "second")),
				("ds_1.ttl", offer("alice", "first")),
			]);
			let selection = selector.select(&request("alice"), &ResourceNaming::default()).unwrap();
			match selection.decision {
				Decision::Granted(artifact) => assert_eq!(artifact.as_str(), "first.txt"),
				other => panic!("expected grant, got {other:?}"),
			}
			assert_eq!(selection.report.candidates.len(), 1);
		}

		#[test]
		fn later_candidate_can_grant() {
			let (_dir, selector) = selector(&[
				("ds_1.ttl", offer("bob", "first")),
				("ds_2.ttl", offer("alice", "second")),
			]);
			let selection = selector.select(&request("alice"), &ResourceNaming::default()).unwrap();
			assert!(selection.decision.is_granted());
			assert_eq!(selection.report.candidates.len(), 2);
		}

		#[test]
		fn no_grant_denies_with_no_matching_permission() {
			let (_dir, selector) = selector(&[("ds.ttl", offer("bob", "q"))]);
			let selection = selector.select(&request("alice"), &ResourceNaming::default()).unwrap();
			assert_eq!(
				selection.decision,
				Decision::Denied(DenyReason::NoMatchingPermission)
			);
		}

		#[test]
		fn unparseable_candidate_is_reported_as_fault() {
			let (_dir, selector) = selector(&[
				("ds_1.ttl", "this is not turtle".to_string()),
				("ds_2.ttl", offer("bob", "q")),
			]);
			let err = selector
				.select(&request("alice"), &ResourceNaming::default())
				.unwrap_err();
			match err {
				EngineError::MalformedPolicy { faults } => {
					assert_eq!(faults.len(), 1);
					assert!(faults[0].policy.ends_with("ds_1.ttl"));
				}
				other => panic!("expected malformed policy, got {other:?}"),
			}
		}

		#[test]
		fn unreadable_candidate_is_a_read_failure() {
			let (dir, selector) = selector(&[("ds_2.ttl", "broken".to_string())]);
			fs::create_dir(dir.path().join("ds_1.ttl")).unwrap();

			let err = selector
				.select(&request("alice"), &ResourceNaming::default())
				.unwrap_err();
			match err {
				EngineError::PolicyRead { path, .. } => assert!(path.ends_with("ds_1.ttl")),
				other => panic!("expected policy read failure, got {other:?}"),
			}
		}

		#[test]
		fn unreadable_candidate_does_not_block_a_grant() {
			let (dir, selector) = selector(&[("ds_2.ttl", offer("alice", "q"))]);
			fs::create_dir(dir.path().join("ds_1.ttl")).unwrap();

			let selection = selector.select(&request("alice"), &ResourceNaming::default()).unwrap();
			assert!(selection.decision.is_granted());
			assert_eq!(selection.report.faults().count(), 1);
		}

		#[test]
		fn grant_after_fault_still_wins() {
			let (_dir, selector) = selector(&[
				("ds_1.ttl", "broken".to_string()),
				("ds_2.ttl", offer("alice", "q")),
			]);
			let selection = selector.select(&request("alice"), &ResourceNaming::default()).unwrap();
			assert!(selection.decision.is_granted());
			assert_eq!(selection.report.faults().count(), 1);
		}
	}
}
