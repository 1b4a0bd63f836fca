//! # Wayfinder
//!
//! A client-side route resolver for single-page applications: it maps URL
//! paths to views, extracts path parameters, and keeps the browser history
//! and the rendered view in step.
//!
//! ## Crates
//!
//! - [`router`]: route registry, resolver, history capability and host
//!   notifications (`wayfinder-router`)
//! - [`conf`]: route table loading from TOML or JSON (`wayfinder-conf`,
//!   feature `conf`, enabled by default)
//!
//! ## Example
//!
//! ```rust,ignore
//! use wayfinder::prelude::*;
//! use wayfinder::routes::{COUNTRY_DETAIL, create_router};
//!
//! let host = RecordingHost::new();
//! let mut router = create_router(MemoryHistory::new("/"), host.clone())?;
//!
//! router.start();
//! router.push("/country/Japan")?;
//! assert_eq!(router.state().active_route_name(), Some(COUNTRY_DETAIL));
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod routes;

pub use wayfinder_router as router;

#[cfg(feature = "conf")]
#[cfg_attr(docsrs, doc(cfg(feature = "conf")))]
pub use wayfinder_conf as conf;

pub use wayfinder_router::{
	ConfigurationError, MatchResult, NavigationError, Resolution, RouteDefinition, RouteRegistry,
	RouteResolver, RouterError,
};

/// Re-exports for `use wayfinder::prelude::*`.
pub mod prelude {
	pub use wayfinder_router::prelude::*;
	pub use wayfinder_router::{
		AckOutcome, HostEvent, MountStatus, NavigationOutcome, NavigationStatus, RecordingHost,
		RouteChange, RouteMiss,
	};

	#[cfg(feature = "conf")]
	pub use wayfinder_conf::RouterConfig;
}
