// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core ODRL access-control types and evaluation.
//!
//! This crate holds the typed request and policy models and the pure
//! [`evaluate`] function that decides a single request against a single
//! policy document. It performs no I/O; parsing and file handling live in
//! `vigil-odrl`.
//!
//! # Evaluation order
//!
//! Offers and permissions are scanned in document order. The first
//! permission whose assignee, action and target all match the request
//! decides the outcome:
//!
//! 1. Resolve the backing artifact from the permission's targets
//! 2. Require the request's constraint keys to equal the offer vocabulary
//! 3. Refuse unconstrained requests when the offer has prohibitions
//! 4. Refuse when any requested value is forbidden by a prohibition
//! 5. Otherwise grant

pub mod decision;
pub mod error;
pub mod evaluator;
pub mod policy;
pub mod request;
pub mod selection;

pub use decision::{ArtifactName, Decision, DenyReason};
pub use error::EvaluationFault;
pub use evaluator::{evaluate, ResourceNaming};
pub use policy::{Constraint, Offer, Permission, Policy, Prohibition};
pub use request::Request;
pub use selection::SubjectSelection;

/// Returns the local name of an identifier: the text after its last `/`.
///
/// Identifiers without a `/` are returned unchanged.
pub fn local_name(identifier: &str) -> &str {
	identifier
		.rsplit_once('/')
		.map(|(_, name)| name)
		.unwrap_or(identifier)
}
