// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Recursive-descent parser from Turtle tokens to triples.

use std::collections::HashMap;

use url::Url;

use crate::error::TurtleError;
use crate::lexer::{NumberKind, Spanned, Token};
use crate::term::{Term, Triple};
use crate::vocab::{
	RDF_FIRST, RDF_NIL, RDF_REST, RDF_TYPE, XSD_BOOLEAN, XSD_DECIMAL, XSD_DOUBLE, XSD_INTEGER,
};

pub(crate) struct TripleParser<'t> {
	tokens: &'t [Spanned],
	pos: usize,
	end_offset: usize,
	prefixes: HashMap<String, String>,
	base: Option<String>,
	next_blank: usize,
	triples: Vec<Triple>,
}

impl<'t> TripleParser<'t> {
	pub(crate) fn new(tokens: &'t [Spanned], source_len: usize) -> Self {
		Self {
			tokens,
			pos: 0,
			end_offset: source_len,
			prefixes: HashMap::new(),
			base: None,
			next_blank: 0,
			triples: Vec::new(),
		}
	}

	pub(crate) fn parse(mut self) -> Result<Vec<Triple>, TurtleError> {
		while self.peek().is_some() {
			self.statement()?;
		}
		Ok(self.triples)
	}

	fn statement(&mut self) -> Result<(), TurtleError> {
		match self.peek() {
			Some(Token::PrefixDirective) => {
				self.advance();
				self.prefix_declaration()?;
				self.expect(&Token::Dot, "'.' after @prefix")
			}
			Some(Token::BaseDirective) => {
				self.advance();
				self.base_declaration()?;
				self.expect(&Token::Dot, "'.' after @base")
			}
			Some(Token::SparqlPrefix) => {
				self.advance();
				self.prefix_declaration()
			}
			Some(Token::SparqlBase) => {
				self.advance();
				self.base_declaration()
			}
			_ => {
				self.triples_statement()?;
				self.expect(&Token::Dot, "'.' at end of statement")
			}
		}
	}

	fn prefix_declaration(&mut self) -> Result<(), TurtleError> {
		let offset = self.offset();
		let prefix = match self.advance() {
			Some(Token::PrefixedName { prefix, local }) if local.is_empty() => prefix.clone(),
			_ => return Err(TurtleError::syntax(offset, "expected a prefix name like 'ex:'")),
		};
		let iri = self.iri_ref("namespace IRI")?;
		self.prefixes.insert(prefix, iri);
		Ok(())
	}

	fn base_declaration(&mut self) -> Result<(), TurtleError> {
		let iri = self.iri_ref("base IRI")?;
		self.base = Some(iri);
		Ok(())
	}

	fn triples_statement(&mut self) -> Result<(), TurtleError> {
		if self.peek() == Some(&Token::OpenBracket) {
			let subject = self.blank_node_property_list()?;
			// `[ ... ] .` on its own is a complete statement.
			if self.peek() != Some(&Token::Dot) {
				self.predicate_object_list(&subject)?;
			}
			return Ok(());
		}

		let subject = self.subject()?;
		self.predicate_object_list(&subject)
	}

	fn subject(&mut self) -> Result<Term, TurtleError> {
		let offset = self.offset();
		match self.peek() {
			Some(Token::IriRef(_)) | Some(Token::PrefixedName { .. }) => self.iri().map(Term::iri),
			Some(Token::BlankNodeLabel(label)) => {
				let term = Term::blank(format!("b_{label}"));
				self.advance();
				Ok(term)
			}
			Some(Token::OpenParen) => self.collection(),
			_ => Err(TurtleError::syntax(offset, "expected a subject")),
		}
	}

	fn predicate_object_list(&mut self, subject: &Term) -> Result<(), TurtleError> {
		loop {
			let predicate = self.verb()?;
			self.object_list(subject, &predicate)?;

			if self.peek() != Some(&Token::Semicolon) {
				return Ok(());
			}
			while self.peek() == Some(&Token::Semicolon) {
				self.advance();
			}
			// A trailing ';' may close the list.
			if matches!(
				self.peek(),
				Some(Token::Dot) | Some(Token::CloseBracket) | None
			) {
				return Ok(());
			}
		}
	}

	fn verb(&mut self) -> Result<String, TurtleError> {
		if self.peek() == Some(&Token::A) {
			self.advance();
			return Ok(RDF_TYPE.to_string());
		}
		let offset = self.offset();
		match self.peek() {
			Some(Token::IriRef(_)) | Some(Token::PrefixedName { .. }) => self.iri(),
			_ => Err(TurtleError::syntax(offset, "expected a predicate")),
		}
	}

	fn object_list(&mut self, subject: &Term, predicate: &str) -> Result<(), TurtleError> {
		loop {
			let object = self.object()?;
			self.emit(subject.clone(), predicate, object);
			if self.peek() != Some(&Token::Comma) {
				return Ok(());
			}
			self.advance();
		}
	}

	fn object(&mut self) -> Result<Term, TurtleError> {
		let offset = self.offset();
		match self.peek() {
			Some(Token::IriRef(_)) | Some(Token::PrefixedName { .. }) => self.iri().map(Term::iri),
			Some(Token::BlankNodeLabel(label)) => {
				let term = Term::blank(format!("b_{label}"));
				self.advance();
				Ok(term)
			}
			Some(Token::OpenBracket) => self.blank_node_property_list(),
			Some(Token::OpenParen) => self.collection(),
			Some(Token::String(_)) => self.string_literal(),
			Some(Token::Number { lexical, kind }) => {
				let datatype = match kind {
					NumberKind::Integer => XSD_INTEGER,
					NumberKind::Decimal => XSD_DECIMAL,
					NumberKind::Double => XSD_DOUBLE,
				};
				let term = Term::typed_literal(lexical.clone(), datatype);
				self.advance();
				Ok(term)
			}
			Some(Token::Boolean(value)) => {
				let term = Term::typed_literal(value.to_string(), XSD_BOOLEAN);
				self.advance();
				Ok(term)
			}
			_ => Err(TurtleError::syntax(offset, "expected an object")),
		}
	}

	fn string_literal(&mut self) -> Result<Term, TurtleError> {
		let lexical = match self.advance() {
			Some(Token::String(value)) => value.clone(),
			_ => return Err(TurtleError::syntax(self.offset(), "expected a string")),
		};

		match self.peek() {
			Some(Token::LangTag(tag)) => {
				let language = tag.to_ascii_lowercase();
				self.advance();
				Ok(Term::Literal {
					lexical,
					datatype: None,
					language: Some(language),
				})
			}
			Some(Token::DoubleCaret) => {
				self.advance();
				let datatype = self.iri()?;
				Ok(Term::typed_literal(lexical, datatype))
			}
			_ => Ok(Term::literal(lexical)),
		}
	}

	fn blank_node_property_list(&mut self) -> Result<Term, TurtleError> {
		self.expect(&Token::OpenBracket, "'['")?;
		let node = self.fresh_blank();
		if self.peek() != Some(&Token::CloseBracket) {
			self.predicate_object_list(&node)?;
		}
		self.expect(&Token::CloseBracket, "']'")?;
		Ok(node)
	}

	fn collection(&mut self) -> Result<Term, TurtleError> {
		self.expect(&Token::OpenParen, "'('")?;

		let mut items = Vec::new();
		while self.peek() != Some(&Token::CloseParen) {
			if self.peek().is_none() {
				return Err(TurtleError::syntax(self.end_offset, "unterminated collection"));
			}
			items.push(self.object()?);
		}
		self.advance();

		if items.is_empty() {
			return Ok(Term::iri(RDF_NIL));
		}

		let cells: Vec<Term> = items.iter().map(|_| self.fresh_blank()).collect();
		for (index, item) in items.into_iter().enumerate() {
			let cell = cells[index].clone();
			self.emit(cell.clone(), RDF_FIRST, item);
			let rest = cells
				.get(index + 1)
				.cloned()
				.unwrap_or_else(|| Term::iri(RDF_NIL));
			self.emit(cell, RDF_REST, rest);
		}
		Ok(cells[0].clone())
	}

	fn iri(&mut self) -> Result<String, TurtleError> {
		let offset = self.offset();
		match self.advance() {
			Some(Token::IriRef(iri)) => {
				let iri = iri.clone();
				self.resolve(&iri, offset)
			}
			Some(Token::PrefixedName { prefix, local }) => {
				let namespace =
					self
						.prefixes
						.get(prefix)
						.ok_or_else(|| TurtleError::UndefinedPrefix {
							prefix: prefix.clone(),
							offset,
						})?;
				Ok(format!("{namespace}{local}"))
			}
			_ => Err(TurtleError::syntax(offset, "expected an IRI")),
		}
	}

	fn iri_ref(&mut self, what: &str) -> Result<String, TurtleError> {
		let offset = self.offset();
		match self.advance() {
			Some(Token::IriRef(iri)) => {
				let iri = iri.clone();
				self.resolve(&iri, offset)
			}
			_ => Err(TurtleError::syntax(offset, format!("expected {what}"))),
		}
	}

	/// Resolves a relative reference against the current base (RFC 3986).
	fn resolve(&self, iri: &str, offset: usize) -> Result<String, TurtleError> {
		match &self.base {
			Some(base) if !has_scheme(iri) => Url::parse(base)
				.and_then(|base| base.join(iri))
				.map(String::from)
				.map_err(|e| {
					TurtleError::syntax(
						offset,
						format!("cannot resolve <{iri}> against base <{base}>: {e}"),
					)
				}),
			_ => Ok(iri.to_string()),
		}
	}

	// Labelled nodes carry a `b_` prefix, so `anon` labels never collide.
	fn fresh_blank(&mut self) -> Term {
		let label = format!("anon{}", self.next_blank);
		self.next_blank += 1;
		Term::blank(label)
	}

	fn emit(&mut self, subject: Term, predicate: &str, object: Term) {
		self.triples.push(Triple {
			subject,
			predicate: predicate.to_string(),
			object,
		});
	}

	fn expect(&mut self, token: &Token, what: &str) -> Result<(), TurtleError> {
		let offset = self.offset();
		match self.advance() {
			Some(found) if found == token => Ok(()),
			Some(_) => Err(TurtleError::syntax(offset, format!("expected {what}"))),
			None => Err(TurtleError::syntax(
				offset,
				format!("expected {what}, found end of input"),
			)),
		}
	}

	fn peek(&self) -> Option<&'t Token> {
		self.tokens.get(self.pos).map(|s| &s.token)
	}

	fn advance(&mut self) -> Option<&'t Token> {
		let token = self.tokens.get(self.pos).map(|s| &s.token);
		if token.is_some() {
			self.pos += 1;
		}
		token
	}

	fn offset(&self) -> usize {
		self
			.tokens
			.get(self.pos)
			.map(|s| s.offset)
			.unwrap_or(self.end_offset)
	}
}

fn has_scheme(iri: &str) -> bool {
	match iri.split_once(':') {
		Some((scheme, _)) => {
			!scheme.is_empty()
				&& scheme.starts_with(|c: char| c.is_ascii_alphabetic())
				&& scheme
					.chars()
					.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
		}
		None => false,
	}
}
