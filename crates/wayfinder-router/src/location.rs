//! Parsed navigation targets.
//!
//! A [`Location`] splits a requested URL into its path, query string and
//! fragment. The path is normalized once here so that every consumer
//! (matching, history, state) sees the same value:
//!
//! - a missing leading `/` is added
//! - trailing slashes are stripped (`/country/Japan/` becomes `/country/Japan`)
//! - the root stays `/`
//! - case is preserved; matching is case-sensitive

use serde::{Deserialize, Serialize};

/// A requested URL split into path, query pairs and fragment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
	path: String,
	query: Vec<(String, String)>,
	fragment: Option<String>,
}

impl Location {
	/// Parses a raw target such as `/country/Japan?tab=map#borders`.
	pub fn parse(raw: &str) -> Self {
		let (rest, fragment) = match raw.split_once('#') {
			Some((rest, fragment)) if !fragment.is_empty() => (rest, Some(fragment.to_string())),
			Some((rest, _)) => (rest, None),
			None => (raw, None),
		};

		let (path, query) = match rest.split_once('?') {
			Some((path, query)) => (path, parse_query(query)),
			None => (rest, Vec::new()),
		};

		Self {
			path: normalize_path(path),
			query,
			fragment,
		}
	}

	/// Returns the normalized path.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Returns the query pairs in their original order.
	pub fn query(&self) -> &[(String, String)] {
		&self.query
	}

	/// Returns the first value of a query key.
	pub fn query_value(&self, key: &str) -> Option<&str> {
		self.query
			.iter()
			.find(|(k, _)| k == key)
			.map(|(_, v)| v.as_str())
	}

	/// Returns the fragment without the leading `#`.
	pub fn fragment(&self) -> Option<&str> {
		self.fragment.as_deref()
	}

	/// Reassembles the location into a URL relative to the application base.
	pub fn to_url(&self) -> String {
		let mut url = self.path.clone();

		if !self.query.is_empty() {
			match serde_urlencoded::to_string(&self.query) {
				Ok(encoded) => {
					url.push('?');
					url.push_str(&encoded);
				}
				Err(err) => {
					tracing::debug!(error = %err, path = %self.path, "dropping unencodable query");
				}
			}
		}

		if let Some(fragment) = &self.fragment {
			url.push('#');
			url.push_str(fragment);
		}

		url
	}

	/// The string patterns are matched against: the root becomes empty so
	/// that optional and rest captures can match it.
	pub(crate) fn match_target(&self) -> &str {
		if self.path == "/" { "" } else { &self.path }
	}
}

impl std::fmt::Display for Location {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.to_url())
	}
}

impl From<&str> for Location {
	fn from(raw: &str) -> Self {
		Self::parse(raw)
	}
}

/// Normalizes a path according to the module-level policy.
pub fn normalize_path(path: &str) -> String {
	let trimmed = path.trim_end_matches('/');
	if trimmed.is_empty() {
		return "/".to_string();
	}
	if trimmed.starts_with('/') {
		trimmed.to_string()
	} else {
		format!("/{}", trimmed)
	}
}

fn parse_query(query: &str) -> Vec<(String, String)> {
	if query.is_empty() {
		return Vec::new();
	}
	serde_urlencoded::from_str(query).unwrap_or_else(|err| {
		tracing::debug!(error = %err, query, "ignoring malformed query string");
		Vec::new()
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("/", "/")]
	#[case("", "/")]
	#[case("//", "/")]
	#[case("/country/Japan/", "/country/Japan")]
	#[case("country/Japan", "/country/Japan")]
	#[case("/Country/JAPAN", "/Country/JAPAN")]
	fn test_normalize_path(#[case] input: &str, #[case] expected: &str) {
		assert_eq!(normalize_path(input), expected);
	}

	#[rstest]
	fn test_parse_splits_query_and_fragment() {
		let location = Location::parse("/country/Japan/?tab=map&lang=en#borders");

		assert_eq!(location.path(), "/country/Japan");
		assert_eq!(location.query_value("tab"), Some("map"));
		assert_eq!(location.query_value("lang"), Some("en"));
		assert_eq!(location.fragment(), Some("borders"));
	}

	#[rstest]
	fn test_parse_decodes_query_values() {
		let location = Location::parse("/search?q=C%C3%B4te+d%27Ivoire");
		assert_eq!(location.query_value("q"), Some("Côte d'Ivoire"));
	}

	#[rstest]
	fn test_empty_fragment_is_dropped() {
		let location = Location::parse("/#");
		assert_eq!(location.path(), "/");
		assert_eq!(location.fragment(), None);
	}

	#[rstest]
	fn test_to_url_round_trips_components() {
		let location = Location::parse("/country/Peru?tab=map#top");
		assert_eq!(location.to_url(), "/country/Peru?tab=map#top");
	}

	#[rstest]
	fn test_match_target_for_root() {
		assert_eq!(Location::parse("/").match_target(), "");
		assert_eq!(Location::parse("/about").match_target(), "/about");
	}
}
