//! Route table configuration for wayfinder.
//!
//! Loads the ordered `{path, name, view}` route table and router options
//! from TOML or JSON and turns them into a registry or a ready resolver.
//!
//! ## Example
//!
//! ```ignore
//! use wayfinder_conf::RouterConfig;
//! use wayfinder_router::RecordingHost;
//!
//! let config = RouterConfig::from_path("config/routes.toml")?.with_env_overrides();
//! let mut resolver = config.build_resolver("/", RecordingHost::new())?;
//! resolver.start();
//! ```

pub mod error;
pub mod settings;

pub use error::ConfError;
pub use settings::{ENV_BASE, ENV_FALLBACK_VIEW, RouteEntry, RouterConfig, RouterSettings};
