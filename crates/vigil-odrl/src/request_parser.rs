// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Turns a request document into a typed [`Request`].

use std::path::Path;

use tracing::{debug, instrument, warn};
pub use vigil_odrl_core::SubjectSelection;
use vigil_odrl_core::{local_name, Request};
use vigil_turtle::{Graph, Term};

use crate::document::read_constraint;
use crate::error::RequestError;
use crate::vocab::{ACTION, ASSIGNEE, CONSTRAINT, PERMISSION, REQUEST, TARGET};

/// Parses `odrl:Request` documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestParser {
	selection: SubjectSelection,
}

impl RequestParser {
	pub fn new(selection: SubjectSelection) -> Self {
		Self { selection }
	}

	#[instrument(level = "debug", skip(self, text), fields(selection = %self.selection))]
	pub fn parse(&self, text: &str) -> Result<Request, RequestError> {
		let graph = Graph::parse(text)?;
		let permission = self.select_permission(&graph)?;

		let assignee = required_value(&graph, permission, ASSIGNEE, "assignee")?;
		let action = required_value(&graph, permission, ACTION, "action")?;
		let target = required_value(&graph, permission, TARGET, "target")?;

		let mut request = Request::new(assignee, action, target);
		for node in graph.objects(permission, CONSTRAINT) {
			let Some(constraint) = read_constraint(&graph, node)? else {
				continue;
			};
			let key = local_name(&constraint.left_operand).to_string();
			if constraint.values.is_empty() {
				debug!(%key, "constraint has no values, treating it as absent");
				continue;
			}
			if request.constraints.insert(key.clone(), constraint.values).is_some() {
				warn!(%key, "constraint key repeated, keeping the last occurrence");
			}
		}

		debug!(
			assignee = %request.assignee,
			action = %request.action,
			target = %request.target,
			constraints = request.constraints.len(),
			"parsed request"
		);
		Ok(request)
	}

	pub fn parse_file(&self, path: &Path) -> Result<Request, RequestError> {
		let text = std::fs::read_to_string(path).map_err(|source| RequestError::Io {
			path: path.to_path_buf(),
			source,
		})?;
		self.parse(&text)
	}

	fn select_permission<'g>(&self, graph: &'g Graph) -> Result<&'g Term, RequestError> {
		let subjects = graph.subjects_of_type(REQUEST);
		if subjects.is_empty() {
			return Err(RequestError::NoRequestSubject);
		}

		match self.selection {
			SubjectSelection::Reject => {
				if subjects.len() > 1 {
					return Err(RequestError::MultipleRequestSubjects(subjects.len()));
				}
				let permissions: Vec<&Term> = graph.objects(subjects[0], PERMISSION).collect();
				match permissions.as_slice() {
					[] => Err(RequestError::NoPermission),
					[permission] => Ok(*permission),
					many => Err(RequestError::MultiplePermissions(many.len())),
				}
			}
			SubjectSelection::First => subjects
				.into_iter()
				.find_map(|subject| graph.value(subject, PERMISSION))
				.ok_or(RequestError::NoPermission),
		}
	}
}

fn required_value(
	graph: &Graph,
	node: &Term,
	predicate: &str,
	field: &'static str,
) -> Result<String, RequestError> {
	let mut values = graph.objects(node, predicate);
	let first = values.next().ok_or(RequestError::MissingField(field))?;
	if values.next().is_some() {
		return Err(RequestError::AmbiguousField(field));
	}
	Ok(first.lexical().to_string())
}
