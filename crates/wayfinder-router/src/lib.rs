//! Client-side route resolution for single-page applications.
//!
//! This crate maps URL paths to views and keeps track of where the
//! application currently is. It does not render anything: a host receives
//! route-changed and route-not-found notifications and mounts views.
//!
//! ## Architecture
//!
//! - [`RouteRegistry`]: the immutable, ordered route table
//! - [`RouteResolver`]: drives navigations, owns the [`NavigationState`]
//! - [`History`]: the history capability ([`MemoryHistory`], and
//!   `WebHistory` on `wasm32`)
//! - [`RouteHost`]: the view-rendering side
//!
//! ## Route patterns
//!
//! - `/` and `/country` - literal segments (case-sensitive)
//! - `/country/:name` - one path parameter
//! - `/countries/:region?` - optional parameter
//! - `/:path*` - catch-all (rest of the path)
//!
//! ## Example
//!
//! ```ignore
//! use wayfinder_router::{MemoryHistory, RecordingHost, RouteDefinition, RouteResolver};
//!
//! let host = RecordingHost::new();
//! let mut resolver = RouteResolver::register(
//!     [
//!         RouteDefinition::new("/", "Home", "HomeView"),
//!         RouteDefinition::new("/country/:name", "CountryDetail", "CountryDetailView"),
//!     ],
//!     MemoryHistory::new("/"),
//!     host.clone(),
//! )?;
//!
//! resolver.start();
//! resolver.push("/country/Japan")?;
//!
//! let state = resolver.state();
//! assert_eq!(state.active_route_name(), Some("CountryDetail"));
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod error;
pub mod history;
pub mod host;
pub mod location;
pub mod navigation;
pub mod params;
pub mod pattern;
pub mod registry;
pub mod resolver;
pub mod route;

pub use error::{ConfigurationError, NavigationError, PathError, PatternError, RouterError};
#[cfg(target_arch = "wasm32")]
#[cfg_attr(docsrs, doc(cfg(target_arch = "wasm32")))]
pub use history::WebHistory;
pub use history::{BasePath, History, HistoryEntry, HistoryError, HistoryListener, MemoryHistory};
pub use host::{HostEvent, MountStatus, RecordingHost, RouteChange, RouteHost, RouteMiss};
pub use location::Location;
pub use navigation::{
	AckOutcome, NavigationId, NavigationMode, NavigationOutcome, NavigationQueue, NavigationRequest,
	NavigationState, NavigationStatus, ResolverPhase,
};
pub use params::{FromPath, ParamContext, Path};
pub use pattern::RoutePattern;
pub use registry::{AmbiguousPathWarning, RouteRegistry};
pub use resolver::RouteResolver;
pub use route::{MatchResult, Resolution, RouteDefinition, ViewRef};

/// Re-exports for `use wayfinder_router::prelude::*`.
pub mod prelude {
	pub use crate::{
		History, MatchResult, MemoryHistory, NavigationMode, Path, Resolution, RouteDefinition,
		RouteHost, RouteRegistry, RouteResolver, ViewRef,
	};
}
