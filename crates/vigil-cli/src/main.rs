// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Vigil CLI - ODRL access gate for stored research queries
//!
//! Reads an `odrl:Request` document, evaluates it against the policies
//! governing its target and, when access is granted, prints the query the
//! permission points at. Logs go to stderr so stdout carries only the query.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::{debug, info};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use vigil_config::{
	load_config_with, LogFormat, LoggingConfig, LoggingConfigLayer, PathsConfigLayer,
	VigilConfig, VigilConfigLayer,
};
use vigil_odrl::{load_policy, Engine, EngineSettings, ResourceNaming, Verdict};

mod status;
mod version;

use status::{status_for, Status};

/// Vigil - policy-gated access to research queries
#[derive(Parser, Debug)]
#[command(name = "vigil", version, about, long_about = None)]
struct Args {
	/// Path to custom configuration file
	#[arg(short, long, global = true)]
	config: Option<PathBuf>,

	/// Directory holding the policy documents (overrides config)
	#[arg(long, global = true)]
	policy_dir: Option<PathBuf>,

	/// Directory holding the query artifacts (overrides config)
	#[arg(long, global = true)]
	query_dir: Option<PathBuf>,

	/// Log level or filter directives (overrides config)
	#[arg(short, long, global = true)]
	log_level: Option<String>,

	/// Log output format: pretty, compact or json (overrides config)
	#[arg(long, global = true)]
	log_format: Option<LogFormat>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Evaluate a request document and print the granted query
	Evaluate {
		/// Request document, or `-` for stdin
		#[arg(short, long, default_value = "-")]
		request: PathBuf,

		/// Print the per-policy evaluation report as JSON to stderr
		#[arg(long)]
		report: bool,
	},
	/// Load a policy document and print its structure as JSON
	InspectPolicy {
		/// Policy document to load
		file: PathBuf,
	},
	/// Parse a request document and print it as JSON
	InspectRequest {
		/// Request document to parse
		file: PathBuf,
	},
	/// List the policy files consulted for a target, in evaluation order
	Candidates {
		/// Target identifier or name
		target: String,
	},
	/// Show version information
	Version,
}

impl From<&Args> for VigilConfigLayer {
	fn from(args: &Args) -> Self {
		let paths = (args.policy_dir.is_some() || args.query_dir.is_some()).then(|| {
			PathsConfigLayer {
				policy_dir: args.policy_dir.clone(),
				query_dir: args.query_dir.clone(),
			}
		});
		let logging = (args.log_level.is_some() || args.log_format.is_some()).then(|| {
			LoggingConfigLayer {
				level: args.log_level.clone(),
				format: args.log_format,
			}
		});

		VigilConfigLayer {
			paths,
			engine: None,
			logging,
		}
	}
}

fn init_tracing(logging: &LoggingConfig) {
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level));

	match logging.format {
		LogFormat::Json => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().json().with_writer(io::stderr))
				.init();
		}
		LogFormat::Compact => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().compact().with_writer(io::stderr))
				.init();
		}
		LogFormat::Pretty => {
			tracing_subscriber::registry()
				.with(filter)
				.with(fmt::layer().with_writer(io::stderr))
				.init();
		}
	}
}

fn engine_settings(config: &VigilConfig) -> EngineSettings {
	EngineSettings {
		policy_dir: config.paths.policy_dir.clone(),
		query_dir: config.paths.query_dir.clone(),
		naming: ResourceNaming {
			query_marker: config.engine.query_marker.clone(),
			artifact_suffix: config.engine.artifact_suffix.clone(),
		},
		policy_extension: config.engine.policy_extension.clone(),
		subject_selection: config.engine.subject_selection,
	}
}

fn read_request(source: &Path) -> Result<String> {
	if source == Path::new("-") {
		io::read_to_string(io::stdin()).context("failed to read request from stdin")
	} else {
		std::fs::read_to_string(source)
			.with_context(|| format!("failed to read request {}", source.display()))
	}
}

/// Authorizes one request document. The query goes to `out`, refusals and
/// the optional report go to `err`.
fn evaluate(
	engine: &Engine,
	request_text: &str,
	report: bool,
	out: &mut impl Write,
	err: &mut impl Write,
) -> Result<Status> {
	let authorization = engine.process(request_text)?;

	if report {
		let json = serde_json::to_string_pretty(&authorization.report)
			.context("failed to serialize evaluation report")?;
		writeln!(err, "{json}")?;
	}

	match &authorization.verdict {
		Verdict::Granted { artifact, query } => {
			debug!(%artifact, bytes = query.len(), "writing query");
			out.write_all(query.as_bytes())?;
			if !query.ends_with('\n') {
				writeln!(out)?;
			}
			Ok(Status::Success)
		}
		Verdict::Denied { reason } => {
			writeln!(err, "no decision: access refused by policy ({reason})")?;
			Ok(Status::Denied)
		}
	}
}

fn print_json<T: Serialize>(value: &T, out: &mut impl Write) -> Result<()> {
	let json = serde_json::to_string_pretty(value).context("failed to serialize output")?;
	writeln!(out, "{json}")?;
	Ok(())
}

fn list_candidates(engine: &Engine, target: &str, out: &mut impl Write) -> Result<()> {
	for path in engine.candidates(target)? {
		writeln!(out, "{}", path.display())?;
	}
	Ok(())
}

fn run(args: Args) -> Result<Status> {
	if let Command::Version = args.command {
		println!("{}", version::format_version_info());
		return Ok(Status::Success);
	}

	let overrides = VigilConfigLayer::from(&args);
	let config =
		load_config_with(args.config.clone(), overrides).context("failed to load configuration")?;

	init_tracing(&config.logging);

	info!(
		policy_dir = %config.paths.policy_dir.display(),
		query_dir = %config.paths.query_dir.display(),
		"starting vigil"
	);

	let engine = Engine::new(engine_settings(&config));
	let mut stdout = io::stdout().lock();

	match &args.command {
		Command::Evaluate { request, report } => {
			let text = read_request(request)?;
			let mut stderr = io::stderr().lock();
			evaluate(&engine, &text, *report, &mut stdout, &mut stderr)
		}
		Command::InspectPolicy { file } => {
			let policy = load_policy(file)
				.with_context(|| format!("failed to inspect policy {}", file.display()))?;
			print_json(&policy, &mut stdout)?;
			Ok(Status::Success)
		}
		Command::InspectRequest { file } => {
			let text = std::fs::read_to_string(file)
				.with_context(|| format!("failed to read request {}", file.display()))?;
			let request = engine
				.parse_request(&text)
				.with_context(|| format!("failed to inspect request {}", file.display()))?;
			print_json(&request, &mut stdout)?;
			Ok(Status::Success)
		}
		Command::Candidates { target } => {
			list_candidates(&engine, target, &mut stdout)?;
			Ok(Status::Success)
		}
		Command::Version => Ok(Status::Success),
	}
}

fn main() -> ExitCode {
	let args = Args::parse();

	match run(args) {
		Ok(status) => status.into(),
		Err(err) => {
			let status = status_for(&err);
			eprintln!("error: {err:#}");
			status.into()
		}
	}
}
