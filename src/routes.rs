//! The country browser's route table.
//!
//! Two routes: the country list at `/` and a detail page per country at
//! `/country/:name`. The view keys are the component names the host
//! mounts.

use wayfinder_router::{
	History, MemoryHistory, RouteDefinition, RouteHost, RouteRegistry, RouteResolver, RouterError,
};

/// Name of the home route.
pub const HOME: &str = "Home";

/// Name of the country detail route.
pub const COUNTRY_DETAIL: &str = "CountryDetail";

/// Returns the route table in match order.
pub fn country_routes() -> Vec<RouteDefinition> {
	vec![
		RouteDefinition::new("/", HOME, "Home"),
		RouteDefinition::new("/country/:name", COUNTRY_DETAIL, "CountryDetail"),
	]
}

/// Builds the route registry.
pub fn country_registry() -> Result<RouteRegistry, RouterError> {
	Ok(RouteRegistry::register(country_routes())?)
}

/// Builds the router over any history backend.
pub fn create_router<H: History>(
	history: H,
	host: impl RouteHost + 'static,
) -> Result<RouteResolver<H>, RouterError> {
	let router = RouteResolver::new(country_registry()?, history, host)?;
	tracing::debug!(routes = router.registry().len(), "country router created");
	Ok(router)
}

/// Builds the router over an in-memory history starting at `initial`.
pub fn create_memory_router(
	initial: &str,
	host: impl RouteHost + 'static,
) -> Result<RouteResolver<MemoryHistory>, RouterError> {
	create_router(MemoryHistory::new(initial), host)
}

/// Builds the router over the browser history, served from the site root.
#[cfg(target_arch = "wasm32")]
pub fn create_web_router(
	host: impl RouteHost + 'static,
) -> Result<RouteResolver<wayfinder_router::WebHistory>, RouterError> {
	create_router(wayfinder_router::WebHistory::new("/")?, host)
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use wayfinder_router::{HostEvent, RecordingHost};

	#[rstest]
	fn test_country_registry() {
		let registry = country_registry().unwrap();
		assert_eq!(registry.len(), 2);
		assert!(registry.overlaps().is_empty());
		assert_eq!(
			registry.reverse(COUNTRY_DETAIL, &[("name", "Japan")]).unwrap(),
			"/country/Japan"
		);
	}

	#[rstest]
	fn test_memory_router_starts_at_deep_link() {
		let host = RecordingHost::new();
		let mut router = create_memory_router("/country/Brazil", host.clone()).unwrap();

		router.start();

		match host.last() {
			Some(HostEvent::Changed(change)) => {
				assert_eq!(change.matched.name(), COUNTRY_DETAIL);
				assert_eq!(change.matched.view().as_str(), "CountryDetail");
				assert_eq!(change.matched.param("name"), Some("Brazil"));
			}
			other => panic!("unexpected event: {:?}", other),
		}
	}
}
