//! The immutable route table.

use std::collections::HashMap;
use std::sync::Arc;

use thiserror::Error;

use crate::error::{ConfigurationError, NavigationError};
use crate::location::Location;
use crate::pattern::RoutePattern;
use crate::route::{MatchResult, Resolution, RouteDefinition};

/// Two registered patterns that can match the same path.
///
/// Registration still succeeds; the earlier route always wins.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("route '{later}' ({later_path}) is shadowed by '{earlier}' ({earlier_path}) for some paths")]
pub struct AmbiguousPathWarning {
	/// Name of the route registered first.
	pub earlier: String,
	/// Its pattern.
	pub earlier_path: String,
	/// Name of the route registered later.
	pub later: String,
	/// Its pattern.
	pub later_path: String,
}

#[derive(Debug)]
struct Compiled {
	route: Arc<RouteDefinition>,
	pattern: RoutePattern,
}

#[derive(Debug)]
struct Inner {
	routes: Vec<Compiled>,
	named: HashMap<String, usize>,
	overlaps: Vec<AmbiguousPathWarning>,
}

/// Validated, compiled and ordered route definitions.
///
/// Built once with [`RouteRegistry::register`] and never mutated; clones
/// share the same table.
#[derive(Debug, Clone)]
pub struct RouteRegistry {
	inner: Arc<Inner>,
}

impl RouteRegistry {
	/// Validates and compiles a route table.
	///
	/// Order is significant: when several patterns match a path, the one
	/// registered first wins. Overlapping patterns are recorded as
	/// [`AmbiguousPathWarning`]s and logged.
	///
	/// # Errors
	///
	/// Returns a [`ConfigurationError`] for an empty name or view, a
	/// duplicate name or a malformed pattern. No registry is produced.
	pub fn register<I>(routes: I) -> Result<Self, ConfigurationError>
	where
		I: IntoIterator<Item = RouteDefinition>,
	{
		let mut compiled: Vec<Compiled> = Vec::new();
		let mut named = HashMap::new();

		for route in routes {
			if route.name().is_empty() {
				return Err(ConfigurationError::EmptyName(route.path().to_string()));
			}
			if route.view().as_str().is_empty() {
				return Err(ConfigurationError::EmptyView(route.name().to_string()));
			}
			if named.contains_key(route.name()) {
				return Err(ConfigurationError::DuplicateName(route.name().to_string()));
			}

			let pattern =
				RoutePattern::new(route.path()).map_err(|reason| ConfigurationError::InvalidPattern {
					path: route.path().to_string(),
					reason,
				})?;

			named.insert(route.name().to_string(), compiled.len());
			compiled.push(Compiled {
				route: Arc::new(route),
				pattern,
			});
		}

		let overlaps = find_overlaps(&compiled);
		for warning in &overlaps {
			tracing::warn!(
				earlier = %warning.earlier,
				later = %warning.later,
				"{}",
				warning
			);
		}

		if compiled.is_empty() {
			tracing::warn!("route registry is empty; every path resolves to not found");
		} else {
			tracing::info!(routes = compiled.len(), "route registry built");
		}

		Ok(Self {
			inner: Arc::new(Inner {
				routes: compiled,
				named,
				overlaps,
			}),
		})
	}

	/// Resolves a raw target (`path?query#fragment`).
	///
	/// Pure and deterministic: the same input always yields the same
	/// resolution.
	pub fn resolve(&self, target: &str) -> Resolution {
		self.resolve_location(Location::parse(target))
	}

	/// Resolves an already parsed location.
	pub fn resolve_location(&self, location: Location) -> Resolution {
		let target = location.match_target();

		for compiled in &self.inner.routes {
			if let Some((params, param_values)) = compiled.pattern.matches(target) {
				tracing::debug!(
					path = %location.path(),
					route = %compiled.route.name(),
					"route matched"
				);
				return Resolution::Matched(MatchResult {
					route: Arc::clone(&compiled.route),
					params,
					location,
					param_values,
				});
			}
		}

		tracing::debug!(path = %location.path(), "no route matched");
		Resolution::NotFound(location)
	}

	/// Generates a path for a named route.
	///
	/// # Errors
	///
	/// Returns [`NavigationError::UnknownRoute`] if no route has this name
	/// and [`NavigationError::MissingParameter`] if a required parameter is
	/// missing or empty.
	pub fn reverse(&self, name: &str, params: &[(&str, &str)]) -> Result<String, NavigationError> {
		let index = self
			.inner
			.named
			.get(name)
			.ok_or_else(|| NavigationError::UnknownRoute(name.to_string()))?;

		let params_map: HashMap<String, String> = params
			.iter()
			.map(|(k, v)| (k.to_string(), v.to_string()))
			.collect();

		self.inner.routes[*index]
			.pattern
			.reverse(&params_map)
			.map_err(|param| NavigationError::MissingParameter {
				route: name.to_string(),
				param,
			})
	}

	/// Returns the definition registered under `name`.
	pub fn get(&self, name: &str) -> Option<&RouteDefinition> {
		self.inner
			.named
			.get(name)
			.map(|index| self.inner.routes[*index].route.as_ref())
	}

	/// Checks if a route name exists.
	pub fn has_route(&self, name: &str) -> bool {
		self.inner.named.contains_key(name)
	}

	/// Returns the number of registered routes.
	pub fn len(&self) -> usize {
		self.inner.routes.len()
	}

	/// Returns whether no routes are registered.
	pub fn is_empty(&self) -> bool {
		self.inner.routes.is_empty()
	}

	/// Iterates over the definitions in registration order.
	pub fn iter(&self) -> impl Iterator<Item = &RouteDefinition> {
		self.inner.routes.iter().map(|c| c.route.as_ref())
	}

	/// Returns the overlapping pattern pairs found at registration.
	pub fn overlaps(&self) -> &[AmbiguousPathWarning] {
		&self.inner.overlaps
	}
}

fn find_overlaps(routes: &[Compiled]) -> Vec<AmbiguousPathWarning> {
	let mut warnings = Vec::new();
	for (i, earlier) in routes.iter().enumerate() {
		for later in &routes[i + 1..] {
			if earlier.pattern.overlaps(&later.pattern) {
				warnings.push(AmbiguousPathWarning {
					earlier: earlier.route.name().to_string(),
					earlier_path: earlier.route.path().to_string(),
					later: later.route.name().to_string(),
					later_path: later.route.path().to_string(),
				});
			}
		}
	}
	warnings
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::error::PatternError;
	use rstest::{fixture, rstest};

	#[fixture]
	fn registry() -> RouteRegistry {
		RouteRegistry::register([
			RouteDefinition::new("/", "Home", "HomeView"),
			RouteDefinition::new("/country/:name", "CountryDetail", "CountryDetailView"),
		])
		.unwrap()
	}

	#[rstest]
	fn test_resolve_home(registry: RouteRegistry) {
		let matched = registry.resolve("/").into_matched().unwrap();
		assert_eq!(matched.name(), "Home");
		assert!(matched.params.is_empty());
	}

	#[rstest]
	fn test_resolve_country(registry: RouteRegistry) {
		let matched = registry.resolve("/country/France").into_matched().unwrap();
		assert_eq!(matched.name(), "CountryDetail");
		assert_eq!(matched.view().as_str(), "CountryDetailView");
		assert_eq!(matched.param("name"), Some("France"));
	}

	#[rstest]
	#[case("/country/Japan/")]
	#[case("/country/Japan?tab=map")]
	#[case("/country/Japan#borders")]
	#[case("country/Japan")]
	fn test_resolve_normalizes(registry: RouteRegistry, #[case] target: &str) {
		let matched = registry.resolve(target).into_matched().unwrap();
		assert_eq!(matched.param("name"), Some("Japan"));
	}

	#[rstest]
	#[case("/unknown")]
	#[case("/country")]
	#[case("/Country/Japan")]
	#[case("/country/Japan/cities")]
	fn test_resolve_not_found(registry: RouteRegistry, #[case] target: &str) {
		assert!(matches!(registry.resolve(target), Resolution::NotFound(_)));
	}

	#[rstest]
	fn test_first_match_wins() {
		let registry = RouteRegistry::register([
			RouteDefinition::new("/country/:name", "CountryDetail", "Detail"),
			RouteDefinition::new("/country/new", "NewCountry", "New"),
		])
		.unwrap();

		let matched = registry.resolve("/country/new").into_matched().unwrap();
		assert_eq!(matched.name(), "CountryDetail");
		assert_eq!(registry.overlaps().len(), 1);
		assert_eq!(registry.overlaps()[0].earlier, "CountryDetail");
		assert_eq!(registry.overlaps()[0].later, "NewCountry");
	}

	#[rstest]
	fn test_no_overlap_for_distinct_routes(registry: RouteRegistry) {
		assert!(registry.overlaps().is_empty());
	}

	#[rstest]
	fn test_duplicate_name_rejected() {
		let result = RouteRegistry::register([
			RouteDefinition::new("/", "Home", "HomeView"),
			RouteDefinition::new("/home", "Home", "HomeView"),
		]);
		assert_eq!(
			result.unwrap_err(),
			ConfigurationError::DuplicateName("Home".to_string())
		);
	}

	#[rstest]
	fn test_invalid_pattern_rejected() {
		let result = RouteRegistry::register([RouteDefinition::new("country/:name", "Country", "View")]);
		assert_eq!(
			result.unwrap_err(),
			ConfigurationError::InvalidPattern {
				path: "country/:name".to_string(),
				reason: PatternError::NotRooted,
			}
		);
	}

	#[rstest]
	#[case(RouteDefinition::new("/", "", "HomeView"), ConfigurationError::EmptyName("/".to_string()))]
	#[case(RouteDefinition::new("/", "Home", ""), ConfigurationError::EmptyView("Home".to_string()))]
	fn test_empty_fields_rejected(#[case] route: RouteDefinition, #[case] expected: ConfigurationError) {
		assert_eq!(RouteRegistry::register([route]).unwrap_err(), expected);
	}

	#[rstest]
	fn test_empty_registry_resolves_nothing() {
		let registry = RouteRegistry::register(Vec::<RouteDefinition>::new()).unwrap();
		assert!(registry.is_empty());
		assert!(!registry.resolve("/").is_matched());
	}

	#[rstest]
	fn test_reverse(registry: RouteRegistry) {
		assert_eq!(registry.reverse("Home", &[]).unwrap(), "/");
		assert_eq!(
			registry.reverse("CountryDetail", &[("name", "Japan")]).unwrap(),
			"/country/Japan"
		);
		assert_eq!(
			registry.reverse("Missing", &[]).unwrap_err(),
			NavigationError::UnknownRoute("Missing".to_string())
		);
		assert_eq!(
			registry.reverse("CountryDetail", &[]).unwrap_err(),
			NavigationError::MissingParameter {
				route: "CountryDetail".to_string(),
				param: "name".to_string(),
			}
		);
	}

	#[rstest]
	fn test_lookup_helpers(registry: RouteRegistry) {
		assert_eq!(registry.len(), 2);
		assert!(registry.has_route("CountryDetail"));
		assert!(!registry.has_route("About"));
		assert_eq!(registry.get("Home").map(RouteDefinition::path), Some("/"));

		let names: Vec<&str> = registry.iter().map(RouteDefinition::name).collect();
		assert_eq!(names, vec!["Home", "CountryDetail"]);
	}

	#[rstest]
	fn test_clones_share_table(registry: RouteRegistry) {
		let clone = registry.clone();
		assert!(Arc::ptr_eq(&registry.inner, &clone.inner));
	}
}
