// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tokenizer for Turtle text.

use winnow::ascii::{digit0, digit1, multispace0};
use winnow::combinator::{alt, opt, repeat};
use winnow::error::ContextError;
use winnow::prelude::*;
use winnow::token::{any, one_of, take, take_till, take_while};

use crate::error::TurtleError;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
	IriRef(String),
	PrefixedName { prefix: String, local: String },
	BlankNodeLabel(String),
	String(String),
	LangTag(String),
	Number { lexical: String, kind: NumberKind },
	Boolean(bool),
	PrefixDirective,
	BaseDirective,
	SparqlPrefix,
	SparqlBase,
	A,
	Dot,
	Semicolon,
	Comma,
	OpenBracket,
	CloseBracket,
	OpenParen,
	CloseParen,
	DoubleCaret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NumberKind {
	Integer,
	Decimal,
	Double,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned {
	pub token: Token,
	pub offset: usize,
}

pub(crate) fn tokenize(source: &str) -> Result<Vec<Spanned>, TurtleError> {
	let mut rest = source;
	let mut tokens = Vec::new();

	loop {
		skip_trivia(&mut rest);
		if rest.is_empty() {
			break;
		}
		let offset = source.len() - rest.len();
		let token = next_token(&mut rest, offset)?;
		tokens.push(Spanned { token, offset });
	}

	Ok(tokens)
}

fn skip_trivia(input: &mut &str) {
	let _: Result<(), ContextError> = trivia(input);
}

fn trivia(input: &mut &str) -> Result<(), ContextError> {
	loop {
		let _: &str = multispace0.parse_next(input)?;
		if !input.starts_with('#') {
			return Ok(());
		}
		let _: &str = take_till(0.., ['\n', '\r']).parse_next(input)?;
	}
}

fn next_token(input: &mut &str, offset: usize) -> Result<Token, TurtleError> {
	let Some(first) = input.chars().next() else {
		return Err(TurtleError::syntax(offset, "unexpected end of input"));
	};
	let second = input.chars().nth(1);

	let punctuation = match first {
		'.' if !second.is_some_and(|c| c.is_ascii_digit()) => Some(Token::Dot),
		';' => Some(Token::Semicolon),
		',' => Some(Token::Comma),
		'[' => Some(Token::OpenBracket),
		']' => Some(Token::CloseBracket),
		'(' => Some(Token::OpenParen),
		')' => Some(Token::CloseParen),
		_ => None,
	};
	if let Some(token) = punctuation {
		*input = &input[first.len_utf8()..];
		return Ok(token);
	}

	match first {
		'<' => iri_ref
			.map(Token::IriRef)
			.parse_next(input)
			.map_err(|_| TurtleError::syntax(offset, "unterminated or invalid IRI reference")),
		'"' | '\'' => string_literal
			.map(Token::String)
			.parse_next(input)
			.map_err(|_| TurtleError::syntax(offset, "unterminated or invalid string literal")),
		'@' => at_keyword(input)
			.map_err(|_| TurtleError::syntax(offset, "invalid directive or language tag")),
		'^' => match input.strip_prefix("^^") {
			Some(rest) => {
				*input = rest;
				Ok(Token::DoubleCaret)
			}
			None => Err(TurtleError::syntax(offset, "expected '^^'")),
		},
		'_' if second == Some(':') => blank_node(input, offset),
		c if c.is_ascii_digit() || c == '+' || c == '-' || c == '.' => numeric(input)
			.map_err(|_| TurtleError::syntax(offset, "invalid numeric literal")),
		c if is_name_start(c) || c == ':' => name(input, offset),
		other => Err(TurtleError::syntax(
			offset,
			format!("unexpected character '{other}'"),
		)),
	}
}

fn iri_ref(input: &mut &str) -> Result<String, ContextError> {
	let _ = '<'.parse_next(input)?;
	let body: &str =
		take_while(0.., |c: char| c != '>' && c != '<' && c != '"' && !c.is_whitespace())
			.parse_next(input)?;
	let _ = '>'.parse_next(input)?;
	Ok(body.to_string())
}

fn string_literal(input: &mut &str) -> Result<String, ContextError> {
	let quote: char = one_of(['"', '\'']).parse_next(input)?;
	let triple: String = std::iter::repeat(quote).take(3).collect();
	let long = input.starts_with(&triple[..2]);
	if long {
		let _: &str = take(2usize).parse_next(input)?;
	}

	let mut value = String::new();
	loop {
		if long && input.starts_with(triple.as_str()) {
			let _: &str = take(3usize).parse_next(input)?;
			return Ok(value);
		}
		let c: char = any.parse_next(input)?;
		match c {
			c if c == quote && !long => return Ok(value),
			'\\' => value.push(escape(input)?),
			'\n' | '\r' if !long => return Err(ContextError::new()),
			c => value.push(c),
		}
	}
}

fn escape(input: &mut &str) -> Result<char, ContextError> {
	let c: char = any.parse_next(input)?;
	let escaped = match c {
		't' => '\t',
		'b' => '\u{8}',
		'n' => '\n',
		'r' => '\r',
		'f' => '\u{c}',
		'"' => '"',
		'\'' => '\'',
		'\\' => '\\',
		'u' => unicode_escape(input, 4)?,
		'U' => unicode_escape(input, 8)?,
		_ => return Err(ContextError::new()),
	};
	Ok(escaped)
}

fn unicode_escape(input: &mut &str, digits: usize) -> Result<char, ContextError> {
	let hex: &str = take_while(digits..=digits, |c: char| c.is_ascii_hexdigit()).parse_next(input)?;
	u32::from_str_radix(hex, 16)
		.ok()
		.and_then(char::from_u32)
		.ok_or_else(ContextError::new)
}

fn at_keyword(input: &mut &str) -> Result<Token, ContextError> {
	let _ = '@'.parse_next(input)?;
	let word: &str = take_while(1.., |c: char| c.is_ascii_alphanumeric() || c == '-').parse_next(input)?;
	match word {
		"prefix" => Ok(Token::PrefixDirective),
		"base" => Ok(Token::BaseDirective),
		tag if tag.starts_with(|c: char| c.is_ascii_alphabetic()) => Ok(Token::LangTag(tag.to_string())),
		_ => Err(ContextError::new()),
	}
}

fn blank_node(input: &mut &str, offset: usize) -> Result<Token, TurtleError> {
	let start = *input;
	let label = blank_node_label(input)
		.map_err(|_| TurtleError::syntax(offset, "invalid blank node label"))?;

	let label = label.trim_end_matches('.');
	if label.is_empty() {
		return Err(TurtleError::syntax(offset, "empty blank node label"));
	}
	*input = &start[2 + label.len()..];
	Ok(Token::BlankNodeLabel(label.to_string()))
}

fn blank_node_label<'i>(input: &mut &'i str) -> Result<&'i str, ContextError> {
	let _ = "_:".parse_next(input)?;
	take_while(1.., is_name_char).parse_next(input)
}

fn numeric(input: &mut &str) -> Result<Token, ContextError> {
	let start = *input;
	let _ = opt(one_of(['+', '-'])).parse_next(input)?;
	let integer: &str = digit0.parse_next(input)?;

	let mut kind = NumberKind::Integer;
	let fraction_follows = input.starts_with('.')
		&& input[1..].starts_with(|c: char| c.is_ascii_digit());
	if fraction_follows {
		let _ = '.'.parse_next(input)?;
		let _: &str = digit1.parse_next(input)?;
		kind = NumberKind::Decimal;
	} else if integer.is_empty() {
		return Err(ContextError::new());
	}

	if input.starts_with(['e', 'E']) {
		let _ = one_of(['e', 'E']).parse_next(input)?;
		let _ = opt(one_of(['+', '-'])).parse_next(input)?;
		let _: &str = digit1.parse_next(input)?;
		kind = NumberKind::Double;
	}

	let lexical = &start[..start.len() - input.len()];
	Ok(Token::Number {
		lexical: lexical.to_string(),
		kind,
	})
}

fn name(input: &mut &str, offset: usize) -> Result<Token, TurtleError> {
	let start = *input;
	let mut word = name_word(input).map_err(|_| TurtleError::syntax(offset, "expected a name"))?;

	// A trailing '.' terminates the statement rather than belonging to the name,
	// unless it is escaped.
	while word.ends_with('.') && !word.ends_with("\\.") {
		word = &word[..word.len() - 1];
	}
	*input = &start[word.len()..];

	if let Some((prefix, local)) = word.split_once(':') {
		if prefix.contains(['%', '\\']) {
			return Err(TurtleError::syntax(
				offset,
				format!("escape in prefix '{prefix}'"),
			));
		}
		return Ok(Token::PrefixedName {
			prefix: prefix.to_string(),
			local: unescape_local(local),
		});
	}

	match word {
		"a" => Ok(Token::A),
		"true" => Ok(Token::Boolean(true)),
		"false" => Ok(Token::Boolean(false)),
		w if w.eq_ignore_ascii_case("prefix") => Ok(Token::SparqlPrefix),
		w if w.eq_ignore_ascii_case("base") => Ok(Token::SparqlBase),
		other => Err(TurtleError::syntax(
			offset,
			format!("unexpected bare word '{other}'"),
		)),
	}
}

/// Raw name text, including percent and backslash escapes.
fn name_word<'i>(input: &mut &'i str) -> Result<&'i str, ContextError> {
	repeat::<_, _, (), _, _>(
		1..,
		alt((
			take_while(1.., |c: char| is_name_char(c) || c == ':').void(),
			('%', take_while(2, |c: char| c.is_ascii_hexdigit())).void(),
			('\\', one_of(is_local_escape)).void(),
		)),
	)
	.take()
	.parse_next(input)
}

// Percent escapes stay encoded in the IRI; backslash escapes do not.
fn unescape_local(local: &str) -> String {
	let mut out = String::with_capacity(local.len());
	let mut chars = local.chars();
	while let Some(c) = chars.next() {
		match c {
			'\\' => out.extend(chars.next()),
			c => out.push(c),
		}
	}
	out
}

fn is_local_escape(c: char) -> bool {
	"_~.-!$&'()*+,;=/?#@%".contains(c)
}

fn is_name_start(c: char) -> bool {
	c.is_alphabetic() || c == '_'
}

fn is_name_char(c: char) -> bool {
	c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '\u{b7}')
}

#[cfg(test)]
mod tests {
	use super::*;

	fn kinds(source: &str) -> Vec<Token> {
		tokenize(source)
			.unwrap()
			.into_iter()
			.map(|s| s.token)
			.collect()
	}

	#[test]
	fn prefix_directive() {
		assert_eq!(
			kinds("@prefix ex: <http://example.org/> ."),
			vec![
				Token::PrefixDirective,
				Token::PrefixedName {
					prefix: "ex".to_string(),
					local: String::new(),
				},
				Token::IriRef("http://example.org/".to_string()),
				Token::Dot,
			]
		);
	}

	#[test]
	fn trailing_dot_is_not_part_of_name() {
		assert_eq!(
			kinds("ex:a ex:b ex:c."),
			vec![
				Token::PrefixedName {
					prefix: "ex".to_string(),
					local: "a".to_string(),
				},
				Token::PrefixedName {
					prefix: "ex".to_string(),
					local: "b".to_string(),
				},
				Token::PrefixedName {
					prefix: "ex".to_string(),
					local: "c".to_string(),
				},
				Token::Dot,
			]
		);
	}

	#[test]
	fn comments_are_skipped() {
		assert_eq!(kinds("# a comment\n  ; # another\n ,"), vec![Token::Semicolon, Token::Comma]);
	}

	#[test]
	fn string_escapes() {
		assert_eq!(
			kinds(r#""a\"b\nA""#),
			vec![Token::String("a\"b\nA".to_string())]
		);
	}

	#[test]
	fn empty_string() {
		assert_eq!(kinds(r#""" ."#), vec![Token::String(String::new()), Token::Dot]);
	}

	#[test]
	fn long_string_spans_lines() {
		assert_eq!(
			kinds("\"\"\"line one\nline \"two\" end\"\"\""),
			vec![Token::String("line one\nline \"two\" end".to_string())]
		);
	}

	#[test]
	fn single_quoted_string() {
		assert_eq!(kinds("'eu'"), vec![Token::String("eu".to_string())]);
	}

	#[test]
	fn language_tag_and_datatype() {
		assert_eq!(
			kinds(r#""hi"@en-GB "1"^^xsd:integer"#),
			vec![
				Token::String("hi".to_string()),
				Token::LangTag("en-GB".to_string()),
				Token::String("1".to_string()),
				Token::DoubleCaret,
				Token::PrefixedName {
					prefix: "xsd".to_string(),
					local: "integer".to_string(),
				},
			]
		);
	}

	#[test]
	fn numbers() {
		assert_eq!(
			kinds("42 -3.5 1e10 42."),
			vec![
				Token::Number {
					lexical: "42".to_string(),
					kind: NumberKind::Integer,
				},
				Token::Number {
					lexical: "-3.5".to_string(),
					kind: NumberKind::Decimal,
				},
				Token::Number {
					lexical: "1e10".to_string(),
					kind: NumberKind::Double,
				},
				Token::Number {
					lexical: "42".to_string(),
					kind: NumberKind::Integer,
				},
				Token::Dot,
			]
		);
	}

	#[test]
	fn keywords() {
		assert_eq!(
			kinds("a true false PREFIX base"),
			vec![
				Token::A,
				Token::Boolean(true),
				Token::Boolean(false),
				Token::SparqlPrefix,
				Token::SparqlBase,
			]
		);
	}

	#[test]
	fn blank_node_label_token() {
		assert_eq!(
			kinds("_:b0 ."),
			vec![Token::BlankNodeLabel("b0".to_string()), Token::Dot]
		);
	}

	#[test]
	fn blank_node_label_before_statement_end() {
		assert_eq!(
			kinds("_:b0."),
			vec![Token::BlankNodeLabel("b0".to_string()), Token::Dot]
		);
	}

	#[test]
	fn unterminated_iri_reports_offset() {
		let err = tokenize("ex:a <http://broken").unwrap_err();
		assert!(matches!(err, TurtleError::Syntax { offset: 5, .. }));
	}

	#[test]
	fn unterminated_string_is_error() {
		assert!(tokenize("\"open").is_err());
		assert!(tokenize("\"line\nbreak\"").is_err());
	}

	#[test]
	fn unexpected_character() {
		let err = tokenize("ex:a ! ex:b").unwrap_err();
		assert!(matches!(err, TurtleError::Syntax { offset: 5, .. }));
	}

	#[test]
	fn local_names_keep_percent_escapes() {
		assert_eq!(
			kinds("ex:extract%20data ."),
			vec![
				Token::PrefixedName {
					prefix: "ex".to_string(),
					local: "extract%20data".to_string(),
				},
				Token::Dot,
			]
		);
	}

	#[test]
	fn local_names_unescape_reserved_characters() {
		assert_eq!(
			kinds(r"ex:a\,b ex:q\?x\=1 ex:end\.."),
			vec![
				Token::PrefixedName {
					prefix: "ex".to_string(),
					local: "a,b".to_string(),
				},
				Token::PrefixedName {
					prefix: "ex".to_string(),
					local: "q?x=1".to_string(),
				},
				Token::PrefixedName {
					prefix: "ex".to_string(),
					local: "end.".to_string(),
				},
				Token::Dot,
			]
		);
	}

	#[test]
	fn malformed_name_escapes_are_errors() {
		assert!(tokenize("ex:bad%2z .").is_err());
		assert!(tokenize(r"ex:bad\x .").is_err());
		assert!(tokenize(r"e\-x:a .").is_err());
	}
}
