// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! ODRL document handling and the vigil authorization engine.
//!
//! - [`RequestParser`] reads an `odrl:Request` document
//! - [`parse_policy`] / [`load_policy`] read `odrl:Offer` documents
//! - [`PolicySelector`] finds and evaluates the policies for a target
//! - [`ResourceResolver`] loads the query behind a grant
//! - [`Engine`] ties them together
//!
//! Refusals are [`Verdict::Denied`]; malformed inputs and missing artifacts
//! are [`EngineError`]s so callers can tell the two apart.

mod document;
pub mod engine;
pub mod error;
pub mod policy_loader;
pub mod report;
pub mod request_parser;
pub mod resolver;
pub mod selector;
pub mod vocab;

pub use engine::{Authorization, Engine, EngineSettings, Verdict, DEFAULT_POLICY_EXTENSION};
pub use error::{EngineError, PolicyError, PolicyFault, RequestError};
pub use policy_loader::{load_policy, parse_policy};
pub use report::{CandidateOutcome, CandidateReport, EvaluationReport};
pub use request_parser::{RequestParser, SubjectSelection};
pub use resolver::ResourceResolver;
pub use selector::{PolicySelector, Selection};

pub use vigil_odrl_core::{
	ArtifactName, Decision, DenyReason, EvaluationFault, Policy, Request, ResourceNaming,
};
