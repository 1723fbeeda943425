// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! End-to-end authorization: request text in, query text or refusal out.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, instrument};
use vigil_odrl_core::{local_name, ArtifactName, Decision, DenyReason, Request, ResourceNaming};

use crate::error::{EngineError, RequestError};
use crate::report::EvaluationReport;
use crate::request_parser::{RequestParser, SubjectSelection};
use crate::resolver::ResourceResolver;
use crate::selector::PolicySelector;

pub const DEFAULT_POLICY_EXTENSION: &str = "ttl";

/// Everything an [`Engine`] needs to locate policies and queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineSettings {
	pub policy_dir: PathBuf,
	pub query_dir: PathBuf,
	pub naming: ResourceNaming,
	pub policy_extension: String,
	pub subject_selection: SubjectSelection,
}

impl Default for EngineSettings {
	fn default() -> Self {
		Self {
			policy_dir: PathBuf::from("./policies"),
			query_dir: PathBuf::from("./data"),
			naming: ResourceNaming::default(),
			policy_extension: DEFAULT_POLICY_EXTENSION.to_string(),
			subject_selection: SubjectSelection::default(),
		}
	}
}

/// The final answer for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Verdict {
	Granted {
		artifact: ArtifactName,
		#[serde(skip)]
		query: String,
	},
	Denied { reason: DenyReason },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Authorization {
	#[serde(flatten)]
	pub verdict: Verdict,
	pub report: EvaluationReport,
}

impl Authorization {
	pub fn is_granted(&self) -> bool {
		matches!(self.verdict, Verdict::Granted { .. })
	}

	/// The resolved query text, when granted.
	pub fn query(&self) -> Option<&str> {
		match &self.verdict {
			Verdict::Granted { query, .. } => Some(query),
			Verdict::Denied { .. } => None,
		}
	}
}

/// Stateless authorization engine. Policies and queries are read fresh on
/// every call, so one engine can serve concurrent callers.
#[derive(Debug, Clone)]
pub struct Engine {
	parser: RequestParser,
	selector: PolicySelector,
	resolver: ResourceResolver,
	naming: ResourceNaming,
}

impl Engine {
	pub fn new(settings: EngineSettings) -> Self {
		Self {
			parser: RequestParser::new(settings.subject_selection),
			selector: PolicySelector::new(settings.policy_dir, settings.policy_extension),
			resolver: ResourceResolver::new(settings.query_dir),
			naming: settings.naming,
		}
	}

	pub fn policy_dir(&self) -> &Path {
		self.selector.policy_dir()
	}

	pub fn query_dir(&self) -> &Path {
		self.resolver.query_dir()
	}

	pub fn parse_request(&self, text: &str) -> Result<Request, RequestError> {
		self.parser.parse(text)
	}

	/// Candidate policy files for a target identifier, in evaluation order.
	pub fn candidates(&self, target: &str) -> Result<Vec<PathBuf>, EngineError> {
		self.selector.candidates(local_name(target))
	}

	/// Selects a policy for `request` and, on a grant, loads its query.
	#[instrument(
		level = "debug",
		skip(self, request),
		fields(assignee = %request.assignee, target = %request.target)
	)]
	pub fn authorize(&self, request: &Request) -> Result<Authorization, EngineError> {
		let selection = self.selector.select(request, &self.naming)?;

		let verdict = match selection.decision {
			Decision::Granted(artifact) => {
				let query = self.resolver.resolve(&artifact)?;
				info!(%artifact, "request authorized");
				Verdict::Granted { artifact, query }
			}
			Decision::Denied(reason) => Verdict::Denied { reason },
		};

		Ok(Authorization {
			verdict,
			report: selection.report,
		})
	}

	/// Parses a request document, then authorizes it.
	pub fn process(&self, request_text: &str) -> Result<Authorization, EngineError> {
		let request = self.parse_request(request_text)?;
		self.authorize(&request)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	const REQUEST: &str = r#"
@prefix odrl: <http://www.w3.org/ns/odrl/2/> .
@prefix ex: <http://example.org/> .
ex:req a odrl:Request ;
	odrl:permission [ odrl:assignee ex:alice ; odrl:action odrl:read ; odrl:target ex:ds ] .
"#;

	const POLICY: &str = r#"
@prefix odrl: <http://www.w3.org/ns/odrl/2/> .
@prefix ex: <http://example.org/> .
ex:p a odrl:Offer ;
	odrl:permission [ odrl:assignee ex:alice ; odrl:action odrl:read ;
		odrl:target ex:ds, <http://example.org/sparql/ds_query> ] .
"#;

	struct Fixture {
		_dir: tempfile::TempDir,
		engine: Engine,
	}

	fn fixture(with_query: bool) -> Fixture {
		let dir = tempfile::tempdir().unwrap();
		let policies = dir.path().join("policies");
		let data = dir.path().join("data");
		fs::create_dir_all(&policies).unwrap();
		fs::create_dir_all(&data).unwrap();
		fs::write(policies.join("ds.ttl"), POLICY).unwrap();
		if with_query {
			fs::write(data.join("ds_query.txt"), "SELECT ?s WHERE { ?s ?p ?o }").unwrap();
		}

		let engine = Engine::new(EngineSettings {
			policy_dir: policies,
			query_dir: data,
			..EngineSettings::default()
		});
		Fixture { _dir: dir, engine }
	}

	#[test]
	fn process_grants_and_loads_query() {
		let f = fixture(true);
		let auth = f.engine.process(REQUEST).unwrap();
		assert!(auth.is_granted());
		assert_eq!(auth.query(), Some("SELECT ?s WHERE { ?s ?p ?o }"));
	}

	#[test]
	fn missing_query_is_not_a_denial() {
		let f = fixture(false);
		assert!(matches!(
			f.engine.process(REQUEST),
			Err(EngineError::ResourceNotFound { .. })
		));
	}

	#[test]
	fn malformed_request_is_an_error() {
		let f = fixture(true);
		assert!(matches!(
			f.engine.process("@prefix ex: <http://example.org/> .\nex:a ex:b ex:c ."),
			Err(EngineError::MalformedRequest(RequestError::NoRequestSubject))
		));
	}

	#[test]
	fn candidates_accept_full_identifiers() {
		let f = fixture(true);
		let found = f.engine.candidates("http://example.org/ds").unwrap();
		assert_eq!(found, vec![f.engine.policy_dir().join("ds.ttl")]);
	}

	#[test]
	fn authorization_serializes_without_query_text() {
		let f = fixture(true);
		let auth = f.engine.process(REQUEST).unwrap();
		let json = serde_json::to_value(&auth).unwrap();
		assert_eq!(json["verdict"], "granted");
		assert_eq!(json["artifact"], "ds_query.txt");
		assert!(json.get("query").is_none());
		assert_eq!(json["report"]["candidates"][0]["outcome"]["outcome"], "granted");
	}

	#[test]
	fn concurrent_callers_agree() {
		let f = fixture(true);
		let request = f.engine.parse_request(REQUEST).unwrap();
		let results: Vec<bool> = std::thread::scope(|scope| {
			let handles: Vec<_> = (0..4)
				.map(|_| scope.spawn(|| f.engine.authorize(&request).map(|a| a.is_granted())))
				.collect();
			handles
				.into_iter()
				.map(|h| h.join().unwrap().unwrap())
				.collect()
		});
		assert_eq!(results, vec![true; 4]);
	}
}
