//! End-to-end tests for the country browser's router.

use rstest::{fixture, rstest};
use wayfinder::prelude::*;
use wayfinder::routes::{COUNTRY_DETAIL, HOME, country_routes, create_memory_router};

#[fixture]
fn host() -> RecordingHost {
	RecordingHost::new()
}

#[rstest]
fn test_navigation_scenario(host: RecordingHost) {
	let mut router = create_memory_router("/", host.clone()).unwrap();

	// Arrange
	router.start();
	assert_eq!(router.state().active_route_name(), Some(HOME));

	// Act
	router.push("/country/Japan").unwrap();
	let japan = router.state().active().cloned().unwrap();
	let outcome = router.push("/unknown").unwrap();

	// Assert
	assert_eq!(japan.name(), COUNTRY_DETAIL);
	assert_eq!(japan.param("name"), Some("Japan"));
	assert!(!outcome.is_matched());
	assert_eq!(router.state().status(), NavigationStatus::NotFound);
	assert_eq!(router.state().active(), Some(&japan));
	assert!(matches!(host.last(), Some(HostEvent::NotFound(_))));
}

#[rstest]
#[case("/", HOME, None)]
#[case("/country/France", COUNTRY_DETAIL, Some("France"))]
#[case("/country/United%20States", COUNTRY_DETAIL, Some("United States"))]
#[case("/country/Japan/", COUNTRY_DETAIL, Some("Japan"))]
fn test_resolve_table(#[case] path: &str, #[case] route: &str, #[case] name: Option<&str>) {
	let registry = RouteRegistry::register(country_routes()).unwrap();

	let matched = registry.resolve(path).into_matched().unwrap();

	assert_eq!(matched.name(), route);
	assert_eq!(matched.param("name"), name);
}

#[rstest]
fn test_typed_parameter_extraction(host: RecordingHost) {
	let mut router = create_memory_router("/", host).unwrap();
	router.push("/country/Peru").unwrap();

	let Path(name): Path<String> = router.state().active().unwrap().extract().unwrap();

	assert_eq!(name, "Peru");
}

#[cfg(feature = "conf")]
#[rstest]
fn test_shipped_config_matches_code_table() {
	let config = RouterConfig::from_path(concat!(env!("CARGO_MANIFEST_DIR"), "/config/routes.toml"))
		.unwrap();

	assert_eq!(config.definitions(), country_routes());
}
