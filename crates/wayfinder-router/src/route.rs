//! Route definitions and resolution results.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::PathError;
use crate::location::Location;
use crate::params::{FromPath, ParamContext};

/// Opaque reference to a renderable view.
///
/// The router never renders anything itself; the host maps this key to a
/// component when it receives a route-changed notification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewRef(String);

impl ViewRef {
	/// Creates a view reference.
	pub fn new(key: impl Into<String>) -> Self {
		Self(key.into())
	}

	/// Returns the view key.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl From<&str> for ViewRef {
	fn from(key: &str) -> Self {
		Self::new(key)
	}
}

impl From<String> for ViewRef {
	fn from(key: String) -> Self {
		Self(key)
	}
}

impl std::fmt::Display for ViewRef {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.write_str(&self.0)
	}
}

/// A single entry of the route table.
///
/// Definitions are plain values built once at startup; the registry
/// validates and compiles them.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RouteDefinition {
	path: String,
	name: String,
	view: ViewRef,
}

impl RouteDefinition {
	/// Creates a route definition.
	pub fn new(path: impl Into<String>, name: impl Into<String>, view: impl Into<ViewRef>) -> Self {
		Self {
			path: path.into(),
			name: name.into(),
			view: view.into(),
		}
	}

	/// Returns the path pattern.
	pub fn path(&self) -> &str {
		&self.path
	}

	/// Returns the unique route name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns the view bound to this route.
	pub fn view(&self) -> &ViewRef {
		&self.view
	}
}

/// A matched route with extracted parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
	/// The matched route.
	pub route: Arc<RouteDefinition>,
	/// Extracted path parameters.
	pub params: HashMap<String, String>,
	/// The location that was resolved.
	pub location: Location,
	/// Parameter values in the order they appear in the pattern.
	pub(crate) param_values: Vec<String>,
}

impl MatchResult {
	/// Returns the matched route name.
	pub fn name(&self) -> &str {
		self.route.name()
	}

	/// Returns the view to mount.
	pub fn view(&self) -> &ViewRef {
		self.route.view()
	}

	/// Returns a single parameter value.
	pub fn param(&self, name: &str) -> Option<&str> {
		self.params.get(name).map(String::as_str)
	}

	/// Parses a named parameter.
	///
	/// # Errors
	///
	/// Returns [`PathError::Missing`] if the parameter was not captured and
	/// [`PathError::ParseError`] if it does not parse as `T`.
	pub fn param_as<T>(&self, name: &str) -> Result<T, PathError>
	where
		T: std::str::FromStr,
		T::Err: std::fmt::Display,
	{
		let raw = self
			.params
			.get(name)
			.ok_or_else(|| PathError::Missing(name.to_string()))?;
		raw.parse::<T>().map_err(|e| PathError::ParseError {
			param: name.to_string(),
			param_type: std::any::type_name::<T>(),
			raw_value: raw.clone(),
			reason: e.to_string(),
		})
	}

	/// Extracts typed parameters in pattern order.
	///
	/// ```ignore
	/// let Path(name): Path<String> = matched.extract()?;
	/// let (region, code): (String, u32) = matched.extract()?;
	/// ```
	pub fn extract<T: FromPath>(&self) -> Result<T, PathError> {
		T::from_path(&ParamContext::new(&self.params, &self.param_values))
	}
}

/// Outcome of resolving a path against the registry.
///
/// `NotFound` is an ordinary value: the caller decides how to render it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
	/// A route matched.
	Matched(MatchResult),
	/// No route matched.
	NotFound(Location),
}

impl Resolution {
	/// Returns whether a route matched.
	pub fn is_matched(&self) -> bool {
		matches!(self, Self::Matched(_))
	}

	/// Returns the match, if any.
	pub fn matched(&self) -> Option<&MatchResult> {
		match self {
			Self::Matched(m) => Some(m),
			Self::NotFound(_) => None,
		}
	}

	/// Consumes the resolution, returning the match, if any.
	pub fn into_matched(self) -> Option<MatchResult> {
		match self {
			Self::Matched(m) => Some(m),
			Self::NotFound(_) => None,
		}
	}

	/// Returns the resolved location.
	pub fn location(&self) -> &Location {
		match self {
			Self::Matched(m) => &m.location,
			Self::NotFound(location) => location,
		}
	}
}
