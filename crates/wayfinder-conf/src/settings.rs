//! Router settings: the route table plus history and fallback options.
//!
//! ```toml
//! [router]
//! base = "/"
//! fallback_view = "NotFoundView"
//!
//! [[routes]]
//! path = "/"
//! name = "Home"
//! view = "HomeView"
//!
//! [[routes]]
//! path = "/country/:name"
//! name = "CountryDetail"
//! view = "CountryDetailView"
//! ```
//!
//! The same structure is accepted as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};
use wayfinder_router::{MemoryHistory, RouteDefinition, RouteHost, RouteRegistry, RouteResolver};

use crate::error::ConfError;

/// Environment variable overriding [`RouterSettings::base`].
pub const ENV_BASE: &str = "WAYFINDER_BASE";

/// Environment variable overriding [`RouterSettings::fallback_view`].
pub const ENV_FALLBACK_VIEW: &str = "WAYFINDER_FALLBACK_VIEW";

/// The `[router]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RouterSettings {
	/// Prefix under which the application is served.
	pub base: String,
	/// View reported with not-found notifications.
	pub fallback_view: Option<String>,
}

impl Default for RouterSettings {
	fn default() -> Self {
		Self {
			base: "/".to_string(),
			fallback_view: None,
		}
	}
}

/// One `[[routes]]` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEntry {
	/// Path pattern.
	pub path: String,
	/// Unique route name.
	pub name: String,
	/// View key.
	pub view: String,
}

impl From<&RouteEntry> for RouteDefinition {
	fn from(entry: &RouteEntry) -> Self {
		RouteDefinition::new(entry.path.clone(), entry.name.clone(), entry.view.clone())
	}
}

/// A complete router configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouterConfig {
	/// History and fallback options.
	#[serde(default)]
	pub router: RouterSettings,
	/// Route table in match order.
	#[serde(default)]
	pub routes: Vec<RouteEntry>,
}

impl RouterConfig {
	/// Parses a TOML document.
	pub fn from_toml_str(contents: &str) -> Result<Self, ConfError> {
		Ok(toml::from_str(contents)?)
	}

	/// Parses a JSON document.
	pub fn from_json_str(contents: &str) -> Result<Self, ConfError> {
		Ok(serde_json::from_str(contents)?)
	}

	/// Loads a configuration file, choosing the format from its extension.
	pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfError> {
		let path = path.as_ref();
		let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();

		let contents = match ext {
			"toml" | "json" => std::fs::read_to_string(path).map_err(|source| ConfError::Io {
				path: path.to_path_buf(),
				source,
			})?,
			other => return Err(ConfError::UnsupportedFormat(other.to_string())),
		};

		let config = if ext == "toml" {
			Self::from_toml_str(&contents)?
		} else {
			Self::from_json_str(&contents)?
		};

		tracing::info!(
			path = %path.display(),
			routes = config.routes.len(),
			"loaded router configuration"
		);
		Ok(config)
	}

	/// Applies `WAYFINDER_BASE` and `WAYFINDER_FALLBACK_VIEW` overrides.
	pub fn with_env_overrides(self) -> Self {
		self.with_overrides(|key| std::env::var(key).ok())
	}

	fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
		if let Some(base) = lookup(ENV_BASE) {
			tracing::debug!(base = %base, "base overridden from environment");
			self.router.base = base;
		}
		if let Some(view) = lookup(ENV_FALLBACK_VIEW) {
			self.router.fallback_view = if view.is_empty() { None } else { Some(view) };
		}
		self
	}

	/// Checks the settings that the route registry does not cover.
	pub fn validate(&self) -> Result<(), ConfError> {
		if !self.router.base.is_empty() && !self.router.base.starts_with('/') {
			return Err(ConfError::InvalidSetting {
				key: "router.base",
				reason: format!("'{}' must start with '/'", self.router.base),
			});
		}
		if self.router.base.contains(['?', '#']) {
			return Err(ConfError::InvalidSetting {
				key: "router.base",
				reason: format!("'{}' must not contain a query or fragment", self.router.base),
			});
		}
		if self
			.router
			.fallback_view
			.as_deref()
			.is_some_and(|view| view.trim().is_empty())
		{
			return Err(ConfError::InvalidSetting {
				key: "router.fallback_view",
				reason: "must not be blank".to_string(),
			});
		}
		Ok(())
	}

	/// Returns the route definitions in table order.
	pub fn definitions(&self) -> Vec<RouteDefinition> {
		self.routes.iter().map(RouteDefinition::from).collect()
	}

	/// Validates the settings and builds the route registry.
	pub fn build_registry(&self) -> Result<RouteRegistry, ConfError> {
		self.validate()?;
		Ok(RouteRegistry::register(self.definitions())?)
	}

	/// Creates an in-memory history under the configured base.
	pub fn memory_history(&self, initial: &str) -> MemoryHistory {
		MemoryHistory::with_base(&self.router.base, initial)
	}

	/// Builds a resolver over an in-memory history starting at `initial`
	/// (a full URL, base included).
	pub fn build_resolver(
		&self,
		initial: &str,
		host: impl RouteHost + 'static,
	) -> Result<RouteResolver<MemoryHistory>, ConfError> {
		let registry = self.build_registry()?;
		let resolver = RouteResolver::new(registry, self.memory_history(initial), host)?;
		Ok(match &self.router.fallback_view {
			Some(view) => resolver.with_fallback(view.as_str()),
			None => resolver,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use wayfinder_router::{ConfigurationError, RecordingHost};

	const COUNTRY_TOML: &str = r#"
[router]
base = "/atlas"
fallback_view = "NotFoundView"

[[routes]]
path = "/"
name = "Home"
view = "HomeView"

[[routes]]
path = "/country/:name"
name = "CountryDetail"
view = "CountryDetailView"
"#;

	#[rstest]
	fn test_parse_toml() {
		let config = RouterConfig::from_toml_str(COUNTRY_TOML).unwrap();
		assert_eq!(config.router.base, "/atlas");
		assert_eq!(config.router.fallback_view.as_deref(), Some("NotFoundView"));
		assert_eq!(config.routes.len(), 2);
		assert_eq!(config.routes[1].name, "CountryDetail");
	}

	#[rstest]
	fn test_router_table_is_optional() {
		let config = RouterConfig::from_toml_str(
			"[[routes]]\npath = \"/\"\nname = \"Home\"\nview = \"HomeView\"\n",
		)
		.unwrap();
		assert_eq!(config.router, RouterSettings::default());
	}

	#[rstest]
	fn test_parse_json() {
		let config = RouterConfig::from_json_str(
			r#"{"routes": [{"path": "/", "name": "Home", "view": "HomeView"}]}"#,
		)
		.unwrap();
		assert_eq!(config.routes[0].path, "/");
		assert_eq!(config.router.base, "/");
	}

	#[rstest]
	fn test_malformed_toml() {
		assert!(matches!(
			RouterConfig::from_toml_str("[[routes]]\npath = 1"),
			Err(ConfError::Toml(_))
		));
	}

	#[rstest]
	#[case("atlas", "router.base")]
	#[case("/atlas?x=1", "router.base")]
	fn test_invalid_base(#[case] base: &str, #[case] expected_key: &str) {
		let mut config = RouterConfig::default();
		config.router.base = base.to_string();
		match config.validate() {
			Err(ConfError::InvalidSetting { key, .. }) => assert_eq!(key, expected_key),
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[rstest]
	fn test_blank_fallback_rejected() {
		let mut config = RouterConfig::default();
		config.router.fallback_view = Some("  ".to_string());
		assert!(matches!(
			config.validate(),
			Err(ConfError::InvalidSetting {
				key: "router.fallback_view",
				..
			})
		));
	}

	#[rstest]
	fn test_overrides() {
		let config = RouterConfig::default().with_overrides(|key| match key {
			ENV_BASE => Some("/app".to_string()),
			ENV_FALLBACK_VIEW => Some(String::new()),
			_ => None,
		});
		assert_eq!(config.router.base, "/app");
		assert_eq!(config.router.fallback_view, None);
	}

	#[rstest]
	fn test_build_registry_reports_duplicates() {
		let mut config = RouterConfig::from_toml_str(COUNTRY_TOML).unwrap();
		config.routes.push(RouteEntry {
			path: "/home".to_string(),
			name: "Home".to_string(),
			view: "HomeView".to_string(),
		});
		assert!(matches!(
			config.build_registry(),
			Err(ConfError::Configuration(ConfigurationError::DuplicateName(name))) if name == "Home"
		));
	}

	#[rstest]
	fn test_build_resolver_applies_base_and_fallback() {
		let config = RouterConfig::from_toml_str(COUNTRY_TOML).unwrap();
		let host = RecordingHost::new();
		let mut resolver = config.build_resolver("/atlas/country/Japan", host).unwrap();

		resolver.start();
		assert_eq!(resolver.state().active_route_name(), Some("CountryDetail"));
		assert_eq!(resolver.fallback().map(|v| v.as_str()), Some("NotFoundView"));
	}
}
