// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Turtle reader for vigil policy documents.
//!
//! Request and policy documents arrive as RDF graphs serialized in Turtle.
//! This crate turns that text into a [`Graph`]: an ordered list of
//! [`Triple`]s with the handful of lookups the policy layer needs
//! (typed subjects, objects of a predicate, RDF collections).
//!
//! Triples keep document order, so every lookup is deterministic for a
//! given input text.
//!
//! # Example
//!
//! ```
//! use vigil_turtle::{Graph, Term};
//!
//! let graph = Graph::parse(
//!     r#"@prefix ex: <http://example.org/> .
//!        ex:alice ex:likes ( "tea" "cake" ) ."#,
//! )
//! .unwrap();
//!
//! let alice = Term::iri("http://example.org/alice");
//! let list = graph.value(&alice, "http://example.org/likes").unwrap();
//! let items: Vec<&str> = graph
//!     .collection(list)
//!     .unwrap()
//!     .into_iter()
//!     .map(Term::lexical)
//!     .collect();
//! assert_eq!(items, vec!["tea", "cake"]);
//! ```

pub mod error;
pub mod graph;
mod lexer;
mod parser;
pub mod term;
pub mod vocab;

pub use error::TurtleError;
pub use graph::Graph;
pub use term::{Term, Triple};
