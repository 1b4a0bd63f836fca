//! Error types for route registration, navigation and parameter extraction.

use thiserror::Error;

use crate::history::HistoryError;

/// Reason a route pattern was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
	/// The pattern does not start at the root.
	#[error("pattern must start with '/'")]
	NotRooted,
	/// The pattern exceeds the maximum length.
	#[error("pattern length {length} exceeds maximum allowed length of {max} bytes")]
	TooLong {
		/// Actual length in bytes.
		length: usize,
		/// Allowed length in bytes.
		max: usize,
	},
	/// The pattern has too many segments.
	#[error("pattern has {count} path segments, exceeding maximum of {max}")]
	TooManySegments {
		/// Actual segment count.
		count: usize,
		/// Allowed segment count.
		max: usize,
	},
	/// Two consecutive slashes produced an empty segment.
	#[error("empty segment at position {0}")]
	EmptySegment(usize),
	/// A parameter name is not a valid identifier.
	#[error("invalid parameter name '{0}'")]
	InvalidParamName(String),
	/// The same parameter name is captured twice.
	#[error("parameter '{0}' appears more than once")]
	DuplicateParam(String),
	/// A segment tries to capture more than one parameter.
	#[error("segment '{0}' contains more than one parameter capture")]
	MultipleCaptures(String),
	/// A segment mixes literal text with a capture.
	#[error("segment '{0}' mixes literal text and a parameter capture")]
	MixedSegment(String),
	/// A rest capture is followed by further segments.
	#[error("rest parameter '{0}' must be the last segment")]
	RestNotLast(String),
	/// The generated regex could not be compiled.
	#[error("failed to compile pattern regex: {0}")]
	Regex(String),
}

/// Fatal error raised while building the route registry.
///
/// A registry that fails with this error cannot be used; the application
/// must not start.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
	/// Two definitions share a name.
	#[error("Duplicate route name: {0}")]
	DuplicateName(String),
	/// A definition has a malformed path pattern.
	#[error("Invalid route pattern '{path}': {reason}")]
	InvalidPattern {
		/// The offending pattern.
		path: String,
		/// Why it was rejected.
		reason: PatternError,
	},
	/// A definition has an empty name.
	#[error("Route '{0}' has an empty name")]
	EmptyName(String),
	/// A definition has an empty view reference.
	#[error("Route '{0}' has an empty view reference")]
	EmptyView(String),
}

/// Error returned by navigation operations.
///
/// An unmatched path is not an error: it is reported through
/// [`Resolution::NotFound`](crate::Resolution::NotFound) and the host's
/// not-found notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavigationError {
	/// The history backend rejected the operation.
	#[error(transparent)]
	History(#[from] HistoryError),
	/// No route is registered under this name.
	#[error("Invalid route name: {0}")]
	UnknownRoute(String),
	/// A reverse lookup lacked a required parameter.
	#[error("Missing parameter '{param}' for route '{route}'")]
	MissingParameter {
		/// Route being reversed.
		route: String,
		/// Parameter that was not supplied.
		param: String,
	},
}

/// Error raised while assembling a resolver.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouterError {
	/// The route table is invalid.
	#[error(transparent)]
	Configuration(#[from] ConfigurationError),
	/// The history backend could not be wired.
	#[error(transparent)]
	History(#[from] HistoryError),
}

/// Error type for typed path parameter extraction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
	/// Failed to parse a parameter value.
	#[error("Failed to parse parameter '{raw_value}' as {param_type}: {reason}")]
	ParseError {
		/// Index or name of the parameter that failed to parse.
		param: String,
		/// Expected type name.
		param_type: &'static str,
		/// Raw string value that failed to parse.
		raw_value: String,
		/// Error message from parsing.
		reason: String,
	},
	/// Parameter count mismatch.
	#[error("Parameter count mismatch: expected {expected}, got {actual}")]
	CountMismatch {
		/// Expected number of parameters.
		expected: usize,
		/// Actual number of parameters.
		actual: usize,
	},
	/// A named parameter is absent from the match.
	#[error("Missing path parameter: {0}")]
	Missing(String),
}
