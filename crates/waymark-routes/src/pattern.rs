//! Path template compilation.
//!
//! Templates use the colon-parameter dialect common to SPA routers:
//!
//! - `/blog` - literal text, matched case-insensitively
//! - `/:slug` - a named parameter matching one path segment
//! - `/:section(a|b|c)` - a named parameter with a custom pattern
//! - `/(.*)` - an unnamed parameter, keyed `0`, `1`, ... in order
//! - `/:id?`, `/:rest*`, `/:rest+` - optional, zero-or-more, one-or-more
//! - `\:` - an escaped character taken literally
//!
//! A `/` or `.` written directly before a parameter is that parameter's
//! prefix: it is only matched (and only generated) together with the value,
//! so `/users/:id?` matches both `/users` and `/users/7`.

use crate::error::RouteError;
use crate::route::RouteParams;
use regex::{Regex, RegexBuilder};
use std::fmt;

/// Maximum allowed length for a path template in bytes.
const MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed number of path segments in a path template.
const MAX_PATH_SEGMENTS: usize = 32;

/// Maximum allowed size for a compiled template regex (in bytes).
const MAX_REGEX_SIZE: usize = 1 << 20; // 1 MiB

/// Pattern used for parameters that do not declare one.
pub const DEFAULT_SEGMENT_PATTERN: &str = "[^/#?]+?";

/// Characters accepted once after a full match.
const TRAILING_DELIMITER: &str = "[/#?]?";

/// Repetition of a parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Modifier {
	/// Exactly once.
	#[default]
	None,
	/// `?`
	Optional,
	/// `*`
	ZeroOrMore,
	/// `+`
	OneOrMore,
}

impl Modifier {
	fn from_char(c: char) -> Option<Self> {
		match c {
			'?' => Some(Self::Optional),
			'*' => Some(Self::ZeroOrMore),
			'+' => Some(Self::OneOrMore),
			_ => None,
		}
	}

	fn as_str(self) -> &'static str {
		match self {
			Self::None => "",
			Self::Optional => "?",
			Self::ZeroOrMore => "*",
			Self::OneOrMore => "+",
		}
	}

	/// Returns whether the parameter may be absent.
	pub fn is_optional(self) -> bool {
		matches!(self, Self::Optional | Self::ZeroOrMore)
	}

	/// Returns whether the parameter may span several segments.
	pub fn is_repeated(self) -> bool {
		matches!(self, Self::ZeroOrMore | Self::OneOrMore)
	}
}

/// A parameter declared by a path template.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
	/// Parameter name; unnamed parameters are numbered from `0`.
	pub name: String,
	/// `/`, `.` or empty.
	pub prefix: String,
	/// Regex source the value must match.
	pub pattern: String,
	pub modifier: Modifier,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Token {
	Literal(String),
	Param(Key),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Lexeme {
	Char(char),
	Escaped(char),
	Name(String),
	Pattern(String),
	Modifier(Modifier),
}

/// A compiled path template: an anchored matcher plus a generator.
///
/// # Examples
///
/// ```
/// use waymark_routes::{ParamValue, PathPattern, RouteParams};
///
/// let pattern = PathPattern::new("/blog/:slug").unwrap();
/// assert_eq!(pattern.captures("/blog/wow"), Some(vec![Some("wow".to_string())]));
///
/// let mut params = RouteParams::new();
/// params.insert("slug".to_string(), ParamValue::from("wow"));
/// assert_eq!(pattern.generate(&params).unwrap(), "/blog/wow");
/// ```
#[derive(Debug, Clone)]
pub struct PathPattern {
	template: String,
	tokens: Vec<Token>,
	keys: Vec<Key>,
	regex: Regex,
	/// One anchored validator per key, in key order.
	validators: Vec<Regex>,
}

impl PathPattern {
	/// Compiles a path template.
	///
	/// # Errors
	///
	/// Returns [`RouteError::InvalidPattern`] if:
	/// - the template exceeds the maximum length (1024 bytes)
	/// - the template has too many path segments (>32)
	/// - a parameter name or pattern is missing
	/// - a parameter pattern is unbalanced or contains a capturing group
	/// - a modifier does not follow a parameter
	/// - the resulting regex is invalid or too large
	pub fn new(template: &str) -> Result<Self, RouteError> {
		Self::compile(template).map_err(|reason| RouteError::InvalidPattern {
			pattern: template.to_string(),
			reason,
		})
	}

	fn compile(template: &str) -> Result<Self, String> {
		if template.len() > MAX_PATTERN_LENGTH {
			return Err(format!(
				"Pattern length {} exceeds maximum allowed length of {} bytes",
				template.len(),
				MAX_PATTERN_LENGTH
			));
		}

		let segment_count = template.split('/').count();
		if segment_count > MAX_PATH_SEGMENTS {
			return Err(format!(
				"Pattern has {} path segments, exceeding maximum of {}",
				segment_count, MAX_PATH_SEGMENTS
			));
		}

		let tokens = parse(&lex(template)?)?;
		let keys: Vec<Key> = tokens
			.iter()
			.filter_map(|token| match token {
				Token::Param(key) => Some(key.clone()),
				Token::Literal(_) => None,
			})
			.collect();

		let regex = build_regex(&to_regex_source(&tokens))?;
		let validators = keys
			.iter()
			.map(|key| build_regex(&format!("^(?:{})$", key.pattern)))
			.collect::<Result<Vec<_>, _>>()?;

		Ok(Self {
			template: template.to_string(),
			tokens,
			keys,
			regex,
			validators,
		})
	}

	/// Returns the original template string.
	pub fn template(&self) -> &str {
		&self.template
	}

	/// Returns the declared parameters in order.
	pub fn keys(&self) -> &[Key] {
		&self.keys
	}

	/// Returns whether the template declares no parameters.
	pub fn is_exact(&self) -> bool {
		self.keys.is_empty()
	}

	/// Source of the compiled matcher.
	pub fn regex_source(&self) -> &str {
		self.regex.as_str()
	}

	/// Checks if this pattern would match the given pathname.
	pub fn is_match(&self, pathname: &str) -> bool {
		self.regex.is_match(pathname)
	}

	/// Matches `pathname` and returns one entry per key, in key order.
	///
	/// An entry is `None` when an optional parameter is absent.
	pub fn captures(&self, pathname: &str) -> Option<Vec<Option<String>>> {
		let caps = self.regex.captures(pathname)?;
		Some(
			(1..=self.keys.len())
				.map(|group| caps.get(group).map(|m| m.as_str().to_string()))
				.collect(),
		)
	}

	/// Substitutes `params` into the template.
	///
	/// Values are inserted verbatim after being checked against their key's
	/// pattern.
	///
	/// # Errors
	///
	/// Returns [`RouteError::IllegalParams`] when a required parameter is
	/// missing or a value does not match its pattern.
	pub fn generate(&self, params: &RouteParams) -> Result<String, RouteError> {
		let mut path = String::new();
		let mut validators = self.validators.iter();

		for token in &self.tokens {
			let key = match token {
				Token::Literal(text) => {
					path.push_str(text);
					continue;
				}
				Token::Param(key) => key,
			};
			let Some(validator) = validators.next() else {
				break;
			};

			match params.get(&key.name) {
				Some(value) => {
					let segment = value.to_string();
					let valid = if key.modifier.is_repeated() && !key.prefix.is_empty() {
						segment
							.split(key.prefix.as_str())
							.all(|part| validator.is_match(part))
					} else {
						validator.is_match(&segment)
					};
					if !valid {
						return Err(RouteError::IllegalParams(format!(
							"Expected \"{}\" to match \"{}\", but got \"{}\"",
							key.name, key.pattern, segment
						)));
					}
					path.push_str(&key.prefix);
					path.push_str(&segment);
				}
				None if key.modifier.is_optional() => {}
				None => {
					let expected = if key.modifier.is_repeated() {
						"an array"
					} else {
						"a string"
					};
					return Err(RouteError::IllegalParams(format!(
						"Expected \"{}\" to be {}",
						key.name, expected
					)));
				}
			}
		}

		Ok(path)
	}
}

fn build_regex(source: &str) -> Result<Regex, String> {
	RegexBuilder::new(source)
		.case_insensitive(true)
		.size_limit(MAX_REGEX_SIZE)
		.build()
		.map_err(|e| format!("Failed to compile pattern regex: {}", e))
}

fn is_name_char(c: char) -> bool {
	c.is_ascii_alphanumeric() || c == '_'
}

fn lex(template: &str) -> Result<Vec<(usize, Lexeme)>, String> {
	let chars: Vec<char> = template.chars().collect();
	let mut lexemes = Vec::new();
	let mut i = 0;

	while i < chars.len() {
		let c = chars[i];

		if let Some(modifier) = Modifier::from_char(c) {
			lexemes.push((i, Lexeme::Modifier(modifier)));
			i += 1;
			continue;
		}

		match c {
			'\\' => {
				let escaped = chars
					.get(i + 1)
					.copied()
					.ok_or_else(|| format!("Dangling escape at {}", i))?;
				lexemes.push((i, Lexeme::Escaped(escaped)));
				i += 2;
			}
			'{' | '}' => {
				return Err(format!("Unexpected \"{}\" at {}", c, i));
			}
			':' => {
				let mut name = String::new();
				let mut j = i + 1;
				while let Some(&next) = chars.get(j) {
					if !is_name_char(next) {
						break;
					}
					name.push(next);
					j += 1;
				}
				if name.is_empty() {
					return Err(format!("Missing parameter name at {}", i));
				}
				lexemes.push((i, Lexeme::Name(name)));
				i = j;
			}
			'(' => {
				let (pattern, end) = lex_pattern(&chars, i)?;
				lexemes.push((i, Lexeme::Pattern(pattern)));
				i = end;
			}
			_ => {
				lexemes.push((i, Lexeme::Char(c)));
				i += 1;
			}
		}
	}

	Ok(lexemes)
}

/// Reads a parenthesised pattern starting at `start`; returns the pattern and
/// the index just past its closing parenthesis.
fn lex_pattern(chars: &[char], start: usize) -> Result<(String, usize), String> {
	let mut depth = 1;
	let mut pattern = String::new();
	let mut j = start + 1;

	if chars.get(j) == Some(&'?') {
		return Err(format!("Pattern cannot start with \"?\" at {}", j));
	}

	while j < chars.len() {
		let c = chars[j];

		if c == '\\' {
			pattern.push(c);
			if let Some(&escaped) = chars.get(j + 1) {
				pattern.push(escaped);
			}
			j += 2;
			continue;
		}

		if c == ')' {
			depth -= 1;
			if depth == 0 {
				j += 1;
				break;
			}
		} else if c == '(' {
			depth += 1;
			if chars.get(j + 1) != Some(&'?') {
				return Err(format!("Capturing groups are not allowed at {}", j));
			}
		}

		pattern.push(c);
		j += 1;
	}

	if depth > 0 {
		return Err(format!("Unbalanced pattern at {}", start));
	}
	if pattern.is_empty() {
		return Err(format!("Missing pattern at {}", start));
	}

	Ok((pattern, j))
}

fn parse(lexemes: &[(usize, Lexeme)]) -> Result<Vec<Token>, String> {
	let mut tokens = Vec::new();
	let mut literal = String::new();
	let mut unnamed = 0usize;
	let mut i = 0;

	while i < lexemes.len() {
		let preceding = match &lexemes[i].1 {
			Lexeme::Char(c) => {
				i += 1;
				Some(*c)
			}
			_ => None,
		};
		let name = match lexemes.get(i) {
			Some((_, Lexeme::Name(name))) => {
				i += 1;
				Some(name.clone())
			}
			_ => None,
		};
		let pattern = match lexemes.get(i) {
			Some((_, Lexeme::Pattern(pattern))) => {
				i += 1;
				Some(pattern.clone())
			}
			_ => None,
		};

		if name.is_some() || pattern.is_some() {
			let prefix = match preceding {
				Some(c @ ('/' | '.')) => c.to_string(),
				Some(c) => {
					literal.push(c);
					String::new()
				}
				None => String::new(),
			};
			if !literal.is_empty() {
				tokens.push(Token::Literal(std::mem::take(&mut literal)));
			}

			let name = name.unwrap_or_else(|| {
				let name = unnamed.to_string();
				unnamed += 1;
				name
			});
			let modifier = match lexemes.get(i) {
				Some((_, Lexeme::Modifier(modifier))) => {
					i += 1;
					*modifier
				}
				_ => Modifier::None,
			};

			tokens.push(Token::Param(Key {
				name,
				prefix,
				pattern: pattern.unwrap_or_else(|| DEFAULT_SEGMENT_PATTERN.to_string()),
				modifier,
			}));
			continue;
		}

		if let Some(c) = preceding {
			literal.push(c);
			continue;
		}
		if let Some((_, Lexeme::Escaped(c))) = lexemes.get(i) {
			literal.push(*c);
			i += 1;
			continue;
		}

		let (position, _) = &lexemes[i];
		return Err(format!("Unexpected MODIFIER at {}, expected END", position));
	}

	if !literal.is_empty() {
		tokens.push(Token::Literal(literal));
	}

	Ok(tokens)
}

fn to_regex_source(tokens: &[Token]) -> String {
	let mut source = String::from("^");

	for token in tokens {
		let key = match token {
			Token::Literal(text) => {
				source.push_str(&regex::escape(text));
				continue;
			}
			Token::Param(key) => key,
		};

		let prefix = regex::escape(&key.prefix);
		let pattern = &key.pattern;
		let modifier = key.modifier;

		let fragment = match (prefix.is_empty(), modifier.is_repeated()) {
			(false, true) => {
				let optional = if modifier == Modifier::ZeroOrMore { "?" } else { "" };
				format!(
					"(?:{prefix}((?:{pattern})(?:{prefix}(?:{pattern}))*)){optional}"
				)
			}
			(false, false) => format!("(?:{prefix}({pattern})){}", modifier.as_str()),
			(true, true) => format!("((?:{pattern}){})", modifier.as_str()),
			(true, false) => format!("({pattern}){}", modifier.as_str()),
		};
		source.push_str(&fragment);
	}

	source.push_str(TRAILING_DELIMITER);
	source.push('$');
	source
}

impl PartialEq for PathPattern {
	fn eq(&self, other: &Self) -> bool {
		self.template == other.template
	}
}

impl Eq for PathPattern {}

impl fmt::Display for PathPattern {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.template)
	}
}
