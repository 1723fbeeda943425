// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! In-memory triple store with the lookups the ODRL reader needs.

use std::collections::{HashMap, HashSet};

use tracing::trace;

use crate::error::{Result, TurtleError};
use crate::lexer;
use crate::parser::TripleParser;
use crate::term::{Term, Triple};
use crate::vocab::{RDF_FIRST, RDF_NIL, RDF_REST, RDF_TYPE};

/// A parsed Turtle document.
///
/// Triples keep their document order, and every lookup returns results in
/// that order.
#[derive(Debug, Clone, Default)]
pub struct Graph {
	triples: Vec<Triple>,
	by_subject: HashMap<Term, Vec<usize>>,
}

impl Graph {
	/// Parses Turtle text into a graph.
	pub fn parse(source: &str) -> Result<Self> {
		let tokens = lexer::tokenize(source)?;
		let triples = TripleParser::new(&tokens, source.len()).parse()?;
		trace!(
			tokens = tokens.len(),
			triples = triples.len(),
			"parsed turtle document"
		);
		Ok(Self::from_triples(triples))
	}

	pub fn from_triples(triples: Vec<Triple>) -> Self {
		let mut by_subject: HashMap<Term, Vec<usize>> = HashMap::new();
		for (index, triple) in triples.iter().enumerate() {
			by_subject
				.entry(triple.subject.clone())
				.or_default()
				.push(index);
		}
		Self {
			triples,
			by_subject,
		}
	}

	pub fn len(&self) -> usize {
		self.triples.len()
	}

	pub fn is_empty(&self) -> bool {
		self.triples.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &Triple> {
		self.triples.iter()
	}

	/// All objects of `subject predicate ?o`.
	pub fn objects<'g>(
		&'g self,
		subject: &Term,
		predicate: &'g str,
	) -> impl Iterator<Item = &'g Term> + 'g {
		self
			.by_subject
			.get(subject)
			.map(Vec::as_slice)
			.unwrap_or_default()
			.iter()
			.map(|&index| &self.triples[index])
			.filter(move |triple| triple.predicate == predicate)
			.map(|triple| &triple.object)
	}

	/// The first object of `subject predicate ?o`, if any.
	pub fn value(&self, subject: &Term, predicate: &str) -> Option<&Term> {
		self
			.by_subject
			.get(subject)?
			.iter()
			.map(|&index| &self.triples[index])
			.find(|triple| triple.predicate == predicate)
			.map(|triple| &triple.object)
	}

	/// Subjects declared with `rdf:type <class>`, deduplicated.
	pub fn subjects_of_type(&self, class: &str) -> Vec<&Term> {
		let mut seen = HashSet::new();
		self
			.triples
			.iter()
			.filter(|triple| triple.predicate == RDF_TYPE && triple.object.is_iri(class))
			.map(|triple| &triple.subject)
			.filter(|subject| seen.insert(*subject))
			.collect()
	}

	/// Whether `term` is the head of an RDF list.
	pub fn is_collection(&self, term: &Term) -> bool {
		term.is_iri(RDF_NIL) || (term.is_blank() && self.value(term, RDF_FIRST).is_some())
	}

	/// Items of the RDF list starting at `head`.
	pub fn collection<'g>(&'g self, head: &'g Term) -> Result<Vec<&'g Term>> {
		let mut items = Vec::new();
		let mut visited = HashSet::new();
		let mut cursor = head;

		while !cursor.is_iri(RDF_NIL) {
			if !visited.insert(cursor) {
				return Err(TurtleError::MalformedCollection(format!(
					"list loops back to {cursor}"
				)));
			}
			let first = self.value(cursor, RDF_FIRST).ok_or_else(|| {
				TurtleError::MalformedCollection(format!("{cursor} has no rdf:first"))
			})?;
			let rest = self.value(cursor, RDF_REST).ok_or_else(|| {
				TurtleError::MalformedCollection(format!("{cursor} has no rdf:rest"))
			})?;
			items.push(first);
			cursor = rest;
		}

		Ok(items)
	}
}
