// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request document subject selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// What to do when a document holds more than one request subject or
/// permission block.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectSelection {
	/// Refuse the document.
	#[default]
	Reject,
	/// Honour the first one in document order.
	First,
}

impl FromStr for SubjectSelection {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s.trim().to_ascii_lowercase().as_str() {
			"reject" => Ok(Self::Reject),
			"first" => Ok(Self::First),
			other => Err(format!(
				"unknown subject selection '{other}', expected 'reject' or 'first'"
			)),
		}
	}
}

impl fmt::Display for SubjectSelection {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Reject => f.write_str("reject"),
			Self::First => f.write_str("first"),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_case_and_whitespace_insensitively() {
		assert_eq!("reject".parse(), Ok(SubjectSelection::Reject));
		assert_eq!("REJECT".parse(), Ok(SubjectSelection::Reject));
		assert_eq!(" FIRST ".parse(), Ok(SubjectSelection::First));
	}

	#[test]
	fn unknown_value_names_the_choices() {
		let err = "maybe".parse::<SubjectSelection>().unwrap_err();
		assert!(err.contains("'maybe'"));
		assert!(err.contains("'reject' or 'first'"));
	}

	#[test]
	fn display_round_trips() {
		for selection in [SubjectSelection::Reject, SubjectSelection::First] {
			assert_eq!(selection.to_string().parse(), Ok(selection));
		}
	}

	#[test]
	fn serde_uses_lowercase_names() {
		assert_eq!(serde_json::to_string(&SubjectSelection::First).unwrap(), r#""first""#);
		assert_eq!(
			serde_json::from_str::<SubjectSelection>(r#""reject""#).unwrap(),
			SubjectSelection::Reject
		);
	}
}
