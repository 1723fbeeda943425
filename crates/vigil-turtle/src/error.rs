// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for Turtle parsing and graph traversal.

use thiserror::Error;

/// Result type for Turtle operations.
pub type Result<T> = std::result::Result<T, TurtleError>;

/// Errors raised while reading a Turtle document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TurtleError {
	/// The text is not valid Turtle at the given byte offset.
	#[error("syntax error at byte {offset}: {message}")]
	Syntax { offset: usize, message: String },

	/// A prefixed name uses a prefix that was never declared.
	#[error("undefined prefix '{prefix}:' at byte {offset}")]
	UndefinedPrefix { prefix: String, offset: usize },

	/// An RDF list is missing `rdf:first`/`rdf:rest` links or loops back on itself.
	#[error("malformed collection: {0}")]
	MalformedCollection(String),
}

impl TurtleError {
	pub(crate) fn syntax(offset: usize, message: impl Into<String>) -> Self {
		Self::Syntax {
			offset,
			message: message.into(),
		}
	}
}
