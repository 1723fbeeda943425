// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Pure evaluation of one request against one policy document.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::decision::{ArtifactName, Decision, DenyReason};
use crate::error::EvaluationFault;
use crate::policy::{Offer, Permission, Policy};
use crate::request::Request;

pub const DEFAULT_QUERY_MARKER: &str = "/sparql/";
pub const DEFAULT_ARTIFACT_SUFFIX: &str = ".txt";

/// How permission targets map onto stored query artifacts.
///
/// A target such as `http://example.org/sparql/extract_l_data` carries the
/// marker `/sparql/`; the text after the marker plus the suffix names the
/// artifact (`extract_l_data.txt`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceNaming {
	pub query_marker: String,
	pub artifact_suffix: String,
}

impl Default for ResourceNaming {
	fn default() -> Self {
		Self {
			query_marker: DEFAULT_QUERY_MARKER.to_string(),
			artifact_suffix: DEFAULT_ARTIFACT_SUFFIX.to_string(),
		}
	}
}

impl ResourceNaming {
	/// Resolves the artifact for a permission's targets.
	///
	/// When several targets carry the marker the last one in document order
	/// is used, and the name is the text after the last marker occurrence.
	pub fn artifact_for(&self, targets: &[String]) -> Result<ArtifactName, EvaluationFault> {
		let marked = targets
			.iter()
			.rev()
			.find_map(|target| target.rsplit_once(self.query_marker.as_str()));

		match marked {
			Some((_, "")) => Err(EvaluationFault::InvalidArtifactName {
				name: self.artifact_suffix.clone(),
			}),
			Some((_, stem)) => ArtifactName::new(format!("{stem}{}", self.artifact_suffix)),
			None => Err(EvaluationFault::MissingQueryMarker {
				marker: self.query_marker.clone(),
			}),
		}
	}
}

/// Decides `request` against `policy`.
///
/// The first permission, in document order across all offers, whose
/// assignee, action and target match the request decides the result. Later
/// permissions are never consulted. A policy with no matching permission
/// denies with [`DenyReason::NoMatchingPermission`].
///
/// # Errors
///
/// Returns an [`EvaluationFault`] when the deciding permission cannot be
/// resolved to an artifact name.
#[instrument(
	level = "debug",
	skip(request, policy, naming),
	fields(
		assignee = %request.assignee,
		action = %request.action,
		target = %request.target,
	)
)]
pub fn evaluate(
	request: &Request,
	policy: &Policy,
	naming: &ResourceNaming,
) -> Result<Decision, EvaluationFault> {
	let matched = policy.offers.iter().find_map(|offer| {
		offer
			.permissions
			.iter()
			.find(|permission| permission.matches(request))
			.map(|permission| (offer, permission))
	});

	let Some((offer, permission)) = matched else {
		debug!("no permission matches the request");
		return Ok(Decision::Denied(DenyReason::NoMatchingPermission));
	};

	let decision = evaluate_permission(request, offer, permission, naming)?;
	debug!(?decision, "permission evaluated");
	Ok(decision)
}

fn evaluate_permission(
	request: &Request,
	offer: &Offer,
	permission: &Permission,
	naming: &ResourceNaming,
) -> Result<Decision, EvaluationFault> {
	let artifact = naming.artifact_for(&permission.targets)?;

	if let Some(reason) = check_vocabulary(request, offer, permission) {
		return Ok(Decision::Denied(reason));
	}

	if request.is_unconstrained() && offer.has_prohibitions() {
		return Ok(Decision::Denied(DenyReason::UnconstrainedWithProhibitions));
	}

	let hit = offer
		.prohibitions
		.iter()
		.filter(|prohibition| prohibition.applies_to(&request.action))
		.find_map(|prohibition| prohibition.forbidden_value(request));
	if let Some((key, value)) = hit {
		return Ok(Decision::Denied(DenyReason::Prohibited {
			key: key.to_string(),
			value: value.to_string(),
		}));
	}

	Ok(Decision::Granted(artifact))
}

fn check_vocabulary(request: &Request, offer: &Offer, permission: &Permission) -> Option<DenyReason> {
	let allowed = offer.constraint_vocabulary(permission);
	let requested = request.constraint_keys();

	let missing: Vec<String> = allowed.difference(&requested).map(|k| k.to_string()).collect();
	let extra: Vec<String> = requested.difference(&allowed).map(|k| k.to_string()).collect();

	if missing.is_empty() && extra.is_empty() {
		None
	} else {
		Some(DenyReason::VocabularyMismatch { missing, extra })
	}
}
