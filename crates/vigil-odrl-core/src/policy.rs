// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The typed policy document: offers, permissions, prohibitions.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::local_name;
use crate::request::Request;

/// One policy document. An empty offer list is valid and grants nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
	pub offers: Vec<Offer>,
}

/// An `odrl:Offer` with its rules in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offer {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub uid: Option<String>,
	pub permissions: Vec<Permission>,
	pub prohibitions: Vec<Prohibition>,
}

impl Offer {
	/// Constraint keys a requester must mention when matched through
	/// `permission`: the permission's own keys plus the keys of every
	/// prohibition in this offer, whatever its action.
	pub fn constraint_vocabulary<'a>(&'a self, permission: &'a Permission) -> BTreeSet<&'a str> {
		permission
			.constraints
			.iter()
			.chain(self.prohibitions.iter().flat_map(|p| p.constraints.iter()))
			.map(Constraint::key)
			.collect()
	}

	pub fn has_prohibitions(&self) -> bool {
		!self.prohibitions.is_empty()
	}
}

/// A permission rule. Missing assignee or action never match a request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub assignee: Option<String>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub action: Option<String>,
	pub targets: Vec<String>,
	pub constraints: Vec<Constraint>,
}

impl Permission {
	/// Exact match on assignee, action and target membership.
	pub fn matches(&self, request: &Request) -> bool {
		self.assignee.as_deref() == Some(request.assignee.as_str())
			&& self.action.as_deref() == Some(request.action.as_str())
			&& self.targets.iter().any(|t| *t == request.target)
	}
}

/// A prohibition rule. Not scoped by assignee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prohibition {
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub action: Option<String>,
	pub constraints: Vec<Constraint>,
}

impl Prohibition {
	pub fn applies_to(&self, action: &str) -> bool {
		self.action.as_deref() == Some(action)
	}

	/// The first requested value this prohibition forbids, compared
	/// case-insensitively, as `(key, value)`.
	pub fn forbidden_value<'r>(&self, request: &'r Request) -> Option<(&'r str, &'r str)> {
		self.constraints.iter().find_map(|constraint| {
			let (key, requested) = request.constraints.get_key_value(constraint.key())?;
			requested
				.iter()
				.find(|value| constraint.contains_ignore_case(value))
				.map(|value| (key.as_str(), value.as_str()))
		})
	}
}

/// A constraint: left operand, optional operator, right-operand values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Constraint {
	pub left_operand: String,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub operator: Option<String>,
	pub right_operand: Vec<String>,
}

impl Constraint {
	pub fn new<I, S>(left_operand: impl Into<String>, right_operand: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			left_operand: left_operand.into(),
			operator: None,
			right_operand: right_operand.into_iter().map(Into::into).collect(),
		}
	}

	/// The constraint key: the local name of the left operand.
	pub fn key(&self) -> &str {
		local_name(&self.left_operand)
	}

	fn contains_ignore_case(&self, value: &str) -> bool {
		let value = value.to_lowercase();
		self
			.right_operand
			.iter()
			.any(|candidate| candidate.to_lowercase() == value)
	}
}
