// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The typed access request.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::local_name;

/// A single access request: who wants to do what, on which resource, under
/// which constraints.
///
/// Constraint keys are left-operand local names (`purpose`, `region`) and
/// every key maps to a non-empty value list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Request {
	pub assignee: String,
	pub action: String,
	pub target: String,
	#[serde(default)]
	pub constraints: BTreeMap<String, Vec<String>>,
}

impl Request {
	/// Creates an unconstrained request.
	pub fn new(
		assignee: impl Into<String>,
		action: impl Into<String>,
		target: impl Into<String>,
	) -> Self {
		Self {
			assignee: assignee.into(),
			action: action.into(),
			target: target.into(),
			constraints: BTreeMap::new(),
		}
	}

	/// Adds a constraint. An empty value list leaves the constraint absent.
	pub fn with_constraint<I, S>(mut self, key: impl Into<String>, values: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		let values: Vec<String> = values.into_iter().map(Into::into).collect();
		if !values.is_empty() {
			self.constraints.insert(key.into(), values);
		}
		self
	}

	pub fn constraint_keys(&self) -> BTreeSet<&str> {
		self.constraints.keys().map(String::as_str).collect()
	}

	pub fn is_unconstrained(&self) -> bool {
		self.constraints.is_empty()
	}

	/// The local name of the target: the text after its last `/`.
	pub fn target_name(&self) -> &str {
		local_name(&self.target)
	}
}
