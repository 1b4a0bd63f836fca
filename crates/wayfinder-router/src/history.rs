//! History capability.
//!
//! The resolver never touches browser history directly. It writes entries
//! through the [`History`] trait and learns about back/forward movement
//! through listeners registered with [`History::on_history_change`].
//!
//! Two backends are provided:
//!
//! - [`MemoryHistory`]: an in-process stack for tests, server-side
//!   rendering and embedded hosts
//! - `WebHistory` (`wasm32` only): the browser `History` API plus the
//!   `popstate` event

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::location::{Location, normalize_path};

mod memory;
#[cfg(target_arch = "wasm32")]
mod web;

pub use memory::MemoryHistory;
#[cfg(target_arch = "wasm32")]
pub use web::WebHistory;

/// Errors raised by a history backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HistoryError {
	/// The backend is not available in this environment.
	#[error("History API unavailable: {0}")]
	Unavailable(String),
	/// The backend rejected an operation.
	#[error("History operation failed: {0}")]
	Operation(String),
	/// A `go` call would leave the history stack.
	#[error("Cannot move {delta} entries from position {index} of {len}")]
	OutOfRange {
		/// Requested movement.
		delta: isize,
		/// Current position.
		index: usize,
		/// Number of entries.
		len: usize,
	},
}

/// State stored with each history entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
	/// The location, relative to the application base.
	pub location: Location,
	/// Name of the route that matched, if any.
	pub route_name: Option<String>,
	/// Parameters extracted for that route.
	pub params: HashMap<String, String>,
}

impl HistoryEntry {
	/// Creates an entry for a location with no route information.
	pub fn new(location: Location) -> Self {
		Self {
			location,
			route_name: None,
			params: HashMap::new(),
		}
	}

	/// Sets the matched route name.
	pub fn with_route_name(mut self, name: impl Into<String>) -> Self {
		self.route_name = Some(name.into());
		self
	}

	/// Sets the extracted parameters.
	pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
		self.params = params;
		self
	}
}

/// Callback invoked when the history moves on its own (back, forward, go).
pub type HistoryListener = Box<dyn FnMut(&HistoryEntry)>;

/// Minimal history capability used by the resolver.
pub trait History {
	/// Returns the current location, relative to the application base.
	fn location(&self) -> Location;

	/// Appends a new entry, discarding any forward entries.
	fn push_entry(&mut self, entry: &HistoryEntry) -> Result<(), HistoryError>;

	/// Overwrites the current entry.
	fn replace_entry(&mut self, entry: &HistoryEntry) -> Result<(), HistoryError>;

	/// Subscribes to history movement that the resolver did not initiate.
	fn on_history_change(&mut self, listener: HistoryListener) -> Result<(), HistoryError>;

	/// Moves `delta` entries through the stack.
	fn go(&mut self, delta: isize) -> Result<(), HistoryError>;

	/// Moves one entry back.
	fn back(&mut self) -> Result<(), HistoryError> {
		self.go(-1)
	}

	/// Moves one entry forward.
	fn forward(&mut self) -> Result<(), HistoryError> {
		self.go(1)
	}
}

/// The prefix under which the application is served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasePath(String);

impl BasePath {
	/// Creates a base path; `""` and `"/"` mean the site root.
	pub fn new(base: &str) -> Self {
		let normalized = normalize_path(base);
		if normalized == "/" {
			Self(String::new())
		} else {
			Self(normalized)
		}
	}

	/// Returns the base without a trailing slash (`""` for the root).
	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Removes the base from a full URL path.
	///
	/// URLs outside the base are returned unchanged.
	pub fn strip<'a>(&self, url: &'a str) -> &'a str {
		if self.0.is_empty() {
			return url;
		}
		match url.strip_prefix(self.0.as_str()) {
			Some(rest) if rest.is_empty() => "/",
			Some(rest) if rest.starts_with(['/', '?', '#']) => rest,
			_ => url,
		}
	}

	/// Prepends the base to an application URL.
	pub fn join(&self, url: &str) -> String {
		if self.0.is_empty() {
			return url.to_string();
		}
		if url == "/" {
			return format!("{}/", self.0);
		}
		format!("{}{}", self.0, url)
	}
}

impl Default for BasePath {
	fn default() -> Self {
		Self::new("/")
	}
}
