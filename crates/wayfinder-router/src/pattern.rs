//! Route pattern compilation and matching.
//!
//! Patterns are written the way the route table spells them:
//!
//! - `/country` - literal segment, matched exactly (case-sensitive)
//! - `/country/:name` - captures one non-empty segment (no `/`)
//! - `/regions/:region?` - optional segment capture
//! - `/files/:path*` - rest capture; matches the remainder of the path,
//!   including `/`, and must be the last segment
//!
//! Each pattern compiles to an anchored regex. Trailing slashes are
//! stripped from patterns exactly as they are from requested paths.

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};

use crate::error::PatternError;
use crate::location::normalize_path;

/// Maximum allowed length for a route pattern string in bytes.
const MAX_PATTERN_LENGTH: usize = 1024;

/// Maximum allowed number of path segments in a route pattern.
const MAX_PATH_SEGMENTS: usize = 32;

/// Maximum allowed size for a compiled pattern regex (in bytes).
const MAX_REGEX_SIZE: usize = 1 << 20;

/// A single compiled pattern segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Segment {
	Static(String),
	Param(String),
	Optional(String),
	Rest(String),
}

impl Segment {
	fn parse(raw: &str, position: usize) -> Result<Self, PatternError> {
		if raw.is_empty() {
			return Err(PatternError::EmptySegment(position));
		}

		let Some(capture) = raw.strip_prefix(':') else {
			if raw.contains(':') {
				return Err(PatternError::MixedSegment(raw.to_string()));
			}
			return Ok(Self::Static(raw.to_string()));
		};

		if capture.contains(':') {
			return Err(PatternError::MultipleCaptures(raw.to_string()));
		}

		let (name, segment): (&str, fn(String) -> Self) = if let Some(name) = capture.strip_suffix('?') {
			(name, Self::Optional)
		} else if let Some(name) = capture.strip_suffix('*') {
			(name, Self::Rest)
		} else {
			(capture, Self::Param)
		};

		if !is_valid_param_name(name) {
			return Err(PatternError::InvalidParamName(name.to_string()));
		}

		Ok(segment(name.to_string()))
	}

	fn param_name(&self) -> Option<&str> {
		match self {
			Self::Static(_) => None,
			Self::Param(name) | Self::Optional(name) | Self::Rest(name) => Some(name),
		}
	}

	/// Whether some concrete segment could satisfy both.
	fn can_share(&self, other: &Segment) -> bool {
		match (self, other) {
			(Self::Static(a), Self::Static(b)) => a == b,
			_ => true,
		}
	}
}

fn is_valid_param_name(name: &str) -> bool {
	let mut chars = name.chars();
	match chars.next() {
		Some(first) if first.is_ascii_alphabetic() || first == '_' => {
			chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
		}
		_ => false,
	}
}

/// A compiled route pattern.
#[derive(Debug, Clone)]
pub struct RoutePattern {
	/// The pattern as written in the route table.
	pattern: String,
	segments: Vec<Segment>,
	regex: Regex,
	/// Parameter names in the order they appear.
	param_names: Vec<String>,
}

impl RoutePattern {
	/// Compiles a pattern string.
	///
	/// # Errors
	///
	/// Returns a [`PatternError`] if the pattern is not rooted, too long,
	/// has too many segments, contains an empty segment, captures more than
	/// one parameter in a segment, reuses a parameter name, or places a
	/// rest capture anywhere but last.
	pub fn new(pattern: &str) -> Result<Self, PatternError> {
		if pattern.len() > MAX_PATTERN_LENGTH {
			return Err(PatternError::TooLong {
				length: pattern.len(),
				max: MAX_PATTERN_LENGTH,
			});
		}
		if !pattern.starts_with('/') {
			return Err(PatternError::NotRooted);
		}

		let normalized = normalize_path(pattern);
		let raw_segments: Vec<&str> = if normalized == "/" {
			Vec::new()
		} else {
			normalized[1..].split('/').collect()
		};

		if raw_segments.len() > MAX_PATH_SEGMENTS {
			return Err(PatternError::TooManySegments {
				count: raw_segments.len(),
				max: MAX_PATH_SEGMENTS,
			});
		}

		let mut segments = Vec::with_capacity(raw_segments.len());
		let mut param_names: Vec<String> = Vec::new();
		for (position, raw) in raw_segments.iter().enumerate() {
			let segment = Segment::parse(raw, position)?;
			if let Some(name) = segment.param_name() {
				if param_names.iter().any(|existing| existing == name) {
					return Err(PatternError::DuplicateParam(name.to_string()));
				}
				if matches!(segment, Segment::Rest(_)) && position + 1 != raw_segments.len() {
					return Err(PatternError::RestNotLast(name.to_string()));
				}
				param_names.push(name.to_string());
			}
			segments.push(segment);
		}

		let regex = RegexBuilder::new(&Self::compile(&segments))
			.size_limit(MAX_REGEX_SIZE)
			.build()
			.map_err(|e| PatternError::Regex(e.to_string()))?;

		Ok(Self {
			pattern: pattern.to_string(),
			segments,
			regex,
			param_names,
		})
	}

	fn compile(segments: &[Segment]) -> String {
		let mut regex_str = String::from("^");
		for segment in segments {
			match segment {
				Segment::Static(text) => {
					regex_str.push('/');
					regex_str.push_str(&regex::escape(text));
				}
				Segment::Param(name) => {
					regex_str.push_str(&format!("/(?P<{}>[^/]+)", name));
				}
				Segment::Optional(name) => {
					regex_str.push_str(&format!("(?:/(?P<{}>[^/]+))?", name));
				}
				Segment::Rest(name) => {
					regex_str.push_str(&format!("(?:/(?P<{}>.*))?", name));
				}
			}
		}
		regex_str.push('$');
		regex_str
	}

	/// Returns the original pattern string.
	pub fn pattern(&self) -> &str {
		&self.pattern
	}

	/// Returns the parameter names in pattern order.
	pub fn param_names(&self) -> &[String] {
		&self.param_names
	}

	/// Returns whether this pattern has no captures.
	pub fn is_static(&self) -> bool {
		self.param_names.is_empty()
	}

	/// Attempts to match a normalized path (root given as `""`).
	///
	/// Returns the named parameters and the values in pattern order.
	/// Values are percent-decoded; a value that does not decode to UTF-8
	/// is kept raw. Optional and rest captures that did not participate
	/// are absent.
	pub(crate) fn matches(&self, target: &str) -> Option<(HashMap<String, String>, Vec<String>)> {
		let caps = self.regex.captures(target)?;

		let mut params = HashMap::with_capacity(self.param_names.len());
		let mut values = Vec::with_capacity(self.param_names.len());
		for name in &self.param_names {
			if let Some(raw) = caps.name(name) {
				let raw = raw.as_str();
				let value = urlencoding::decode(raw)
					.map(|decoded| decoded.into_owned())
					.unwrap_or_else(|_| raw.to_string());
				params.insert(name.clone(), value.clone());
				values.push(value);
			}
		}

		Some((params, values))
	}

	/// Generates a path from this pattern, percent-encoding the values.
	///
	/// Returns the name of the first required parameter that is missing
	/// or empty.
	///
	/// A rest value keeps its `/` separators, empty parts included, so it
	/// matches back to the same value. A trailing `/` is the exception:
	/// path normalization strips it before matching.
	pub fn reverse(&self, params: &HashMap<String, String>) -> Result<String, String> {
		let mut path = String::new();

		for segment in &self.segments {
			match segment {
				Segment::Static(text) => {
					path.push('/');
					path.push_str(text);
				}
				Segment::Param(name) => {
					let value = params
						.get(name)
						.filter(|v| !v.is_empty())
						.ok_or_else(|| name.clone())?;
					path.push('/');
					path.push_str(&urlencoding::encode(value));
				}
				Segment::Optional(name) => {
					if let Some(value) = params.get(name).filter(|v| !v.is_empty()) {
						path.push('/');
						path.push_str(&urlencoding::encode(value));
					}
				}
				Segment::Rest(name) => {
					if let Some(value) = params.get(name).filter(|v| !v.is_empty()) {
						let encoded: Vec<_> = value.split('/').map(urlencoding::encode).collect();
						path.push('/');
						path.push_str(&encoded.join("/"));
					}
				}
			}
		}

		if path.is_empty() {
			path.push('/');
		}
		Ok(path)
	}

	/// Returns whether some path could be matched by both patterns.
	pub fn overlaps(&self, other: &RoutePattern) -> bool {
		segments_overlap(&self.segments, &other.segments)
	}
}

fn segments_overlap(a: &[Segment], b: &[Segment]) -> bool {
	if let Some(Segment::Optional(_)) = a.first() {
		if segments_overlap(&a[1..], b) {
			return true;
		}
	}
	if let Some(Segment::Optional(_)) = b.first() {
		if segments_overlap(a, &b[1..]) {
			return true;
		}
	}

	match (a.split_first(), b.split_first()) {
		(None, None) => true,
		(Some((Segment::Rest(_), _)), _) | (_, Some((Segment::Rest(_), _))) => true,
		(Some((x, a_tail)), Some((y, b_tail))) => x.can_share(y) && segments_overlap(a_tail, b_tail),
		_ => false,
	}
}

impl PartialEq for RoutePattern {
	fn eq(&self, other: &Self) -> bool {
		self.pattern == other.pattern
	}
}

impl Eq for RoutePattern {}

impl std::fmt::Display for RoutePattern {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.pattern)
	}
}
