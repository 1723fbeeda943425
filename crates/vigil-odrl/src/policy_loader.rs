// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Turns a policy document into a typed [`Policy`].

use std::path::Path;

use tracing::{debug, instrument};
use vigil_odrl_core::{Constraint, Offer, Permission, Policy, Prohibition};
use vigil_turtle::{Graph, Term};

use crate::document::read_constraint;
use crate::error::PolicyError;
use crate::vocab::{ACTION, ASSIGNEE, CONSTRAINT, OFFER, PERMISSION, PROHIBITION, TARGET, UID};

/// Parses a policy document. A document without offers is an empty policy.
pub fn parse_policy(text: &str) -> Result<Policy, PolicyError> {
	let graph = Graph::parse(text).map_err(PolicyError::Syntax)?;

	let offers = graph
		.subjects_of_type(OFFER)
		.into_iter()
		.map(|offer| read_offer(&graph, offer))
		.collect::<Result<Vec<_>, _>>()?;

	Ok(Policy { offers })
}

/// Reads and parses the policy document at `path`. The file handle is
/// released before parsing starts.
#[instrument(level = "debug", skip(path), fields(policy = %path.display()))]
pub fn load_policy(path: &Path) -> Result<Policy, PolicyError> {
	let text = std::fs::read_to_string(path).map_err(|source| PolicyError::Io {
		path: path.to_path_buf(),
		source,
	})?;
	let policy = parse_policy(&text)?;
	debug!(offers = policy.offers.len(), "loaded policy");
	Ok(policy)
}

fn read_offer(graph: &Graph, offer: &Term) -> Result<Offer, PolicyError> {
	let uid = graph
		.value(offer, UID)
		.or_else(|| matches!(offer, Term::Iri { .. }).then_some(offer))
		.map(|term| term.lexical().to_string());

	let permissions = graph
		.objects(offer, PERMISSION)
		.map(|node| read_permission(graph, node))
		.collect::<Result<Vec<_>, _>>()?;

	let prohibitions = graph
		.objects(offer, PROHIBITION)
		.map(|node| read_prohibition(graph, node))
		.collect::<Result<Vec<_>, _>>()?;

	Ok(Offer {
		uid,
		permissions,
		prohibitions,
	})
}

fn read_permission(graph: &Graph, node: &Term) -> Result<Permission, PolicyError> {
	Ok(Permission {
		assignee: lexical(graph, node, ASSIGNEE),
		action: lexical(graph, node, ACTION),
		targets: graph
			.objects(node, TARGET)
			.map(|term| term.lexical().to_string())
			.collect(),
		constraints: read_constraints(graph, node)?,
	})
}

fn read_prohibition(graph: &Graph, node: &Term) -> Result<Prohibition, PolicyError> {
	Ok(Prohibition {
		action: lexical(graph, node, ACTION),
		constraints: read_constraints(graph, node)?,
	})
}

fn read_constraints(graph: &Graph, rule: &Term) -> Result<Vec<Constraint>, PolicyError> {
	let mut constraints = Vec::new();
	for node in graph.objects(rule, CONSTRAINT) {
		if let Some(raw) = read_constraint(graph, node).map_err(PolicyError::Collection)? {
			constraints.push(Constraint {
				left_operand: raw.left_operand,
				operator: raw.operator,
				right_operand: raw.values,
			});
		}
	}
	Ok(constraints)
}

fn lexical(graph: &Graph, node: &Term, predicate: &str) -> Option<String> {
	graph
		.value(node, predicate)
		.map(|term| term.lexical().to_string())
}
