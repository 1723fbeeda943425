// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! RDF terms and triples.

use std::fmt;

use serde::Serialize;

/// A node in an RDF graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Term {
	/// An absolute (or base-resolved) IRI.
	Iri { value: String },
	/// A blank node, labelled uniquely within its document.
	BlankNode { label: String },
	/// A literal value with optional datatype or language tag.
	Literal {
		lexical: String,
		#[serde(skip_serializing_if = "Option::is_none")]
		datatype: Option<String>,
		#[serde(skip_serializing_if = "Option::is_none")]
		language: Option<String>,
	},
}

impl Term {
	pub fn iri(value: impl Into<String>) -> Self {
		Self::Iri {
			value: value.into(),
		}
	}

	pub fn blank(label: impl Into<String>) -> Self {
		Self::BlankNode {
			label: label.into(),
		}
	}

	/// A simple string literal with no datatype or language.
	pub fn literal(lexical: impl Into<String>) -> Self {
		Self::Literal {
			lexical: lexical.into(),
			datatype: None,
			language: None,
		}
	}

	pub fn typed_literal(lexical: impl Into<String>, datatype: impl Into<String>) -> Self {
		Self::Literal {
			lexical: lexical.into(),
			datatype: Some(datatype.into()),
			language: None,
		}
	}

	/// The textual content of the term: the IRI, the blank node label, or the
	/// literal's lexical form.
	pub fn lexical(&self) -> &str {
		match self {
			Term::Iri { value } => value,
			Term::BlankNode { label } => label,
			Term::Literal { lexical, .. } => lexical,
		}
	}

	pub fn is_iri(&self, iri: &str) -> bool {
		matches!(self, Term::Iri { value } if value == iri)
	}

	pub fn is_blank(&self) -> bool {
		matches!(self, Term::BlankNode { .. })
	}

	pub fn is_literal(&self) -> bool {
		matches!(self, Term::Literal { .. })
	}
}

impl fmt::Display for Term {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Term::Iri { value } => write!(f, "<{value}>"),
			Term::BlankNode { label } => write!(f, "_:{label}"),
			Term::Literal {
				lexical,
				datatype,
				language,
			} => {
				write!(f, "{lexical:?}")?;
				if let Some(language) = language {
					write!(f, "@{language}")?;
				} else if let Some(datatype) = datatype {
					write!(f, "^^<{datatype}>")?;
				}
				Ok(())
			}
		}
	}
}

/// A single statement. Predicates are always IRIs.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Triple {
	pub subject: Term,
	pub predicate: String,
	pub object: Term,
}

impl fmt::Display for Triple {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} <{}> {} .", self.subject, self.predicate, self.object)
	}
}
