// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Graph helpers shared by the request parser and the policy loader.

use tracing::warn;
use vigil_turtle::{Graph, Term, TurtleError};

use crate::vocab::{LEFT_OPERAND, OPERATOR, RIGHT_OPERAND};

/// A constraint node read out of a graph, before it is shaped into a
/// request entry or a policy constraint.
pub(crate) struct RawConstraint {
	pub left_operand: String,
	pub operator: Option<String>,
	pub values: Vec<String>,
}

/// Reads the constraint at `node`. Constraints without a left operand are
/// skipped with a warning.
pub(crate) fn read_constraint(
	graph: &Graph,
	node: &Term,
) -> Result<Option<RawConstraint>, TurtleError> {
	let Some(left) = graph.value(node, LEFT_OPERAND) else {
		warn!(constraint = %node, "constraint has no odrl:leftOperand, ignoring it");
		return Ok(None);
	};

	let values = match graph.value(node, RIGHT_OPERAND) {
		Some(right) => operand_values(graph, right)?,
		None => Vec::new(),
	};

	Ok(Some(RawConstraint {
		left_operand: left.lexical().to_string(),
		operator: graph
			.value(node, OPERATOR)
			.map(|term| term.lexical().to_string()),
		values,
	}))
}

/// Values of a right operand: the items of an RDF list, or the single term
/// itself.
pub(crate) fn operand_values(graph: &Graph, right: &Term) -> Result<Vec<String>, TurtleError> {
	if graph.is_collection(right) {
		let items = graph.collection(right)?;
		return Ok(items
			.into_iter()
			.map(|term| term.lexical().to_string())
			.collect());
	}
	Ok(vec![right.lexical().to_string()])
}
