//! Resolution by name and by href through the router facade.

use rstest::rstest;
use waymark::prelude::*;
use waymark::{RouteTree, parse_href};
use waymark_integration_tests::{blog_routes, router, section_routes};

#[rstest]
#[case::strict_unknown(true)]
#[case::lenient_unknown(false)]
fn test_unknown_route_name(#[case] strict: bool) {
	let router = router(&blog_routes());
	let options = FindOptions {
		strict,
		..FindOptions::new()
	};

	let result = router.find_route("blog.missing", &options);

	if strict {
		let err = result.unwrap_err();
		assert!(matches!(err, RouteError::UnknownRoute(ref name) if name == "blog.missing"));
		assert_eq!(err.to_string(), "Route \"blog.missing\" does not exist");
	} else {
		assert_eq!(result.unwrap(), None);
	}
}

#[rstest]
fn test_missing_required_param_is_illegal_in_strict_mode() {
	let router = router(&blog_routes());

	let strict = router.find_route("blog.article", &FindOptions::strict());
	let lenient = router.find_route("blog.article", &FindOptions::new());

	assert_eq!(
		strict.unwrap_err(),
		RouteError::IllegalParams("Expected \"slug\" to be a string".to_string())
	);
	assert_eq!(lenient.unwrap(), None);
}

#[rstest]
fn test_constraint_violation_is_illegal() {
	let router = router(&section_routes());

	let err = router
		.find_route(
			"some",
			&FindOptions::strict()
				.with_param("section", "g")
				.with_param("tag", "bb"),
		)
		.unwrap_err();

	assert_eq!(
		err.to_string(),
		"Expected \"section\" to match \"a|b|c\", but got \"g\""
	);
}

#[rstest]
#[tokio::test]
async fn test_navigate_to_unknown_name_rejects_before_pipeline() {
	let router = router(&blog_routes());

	let err = router
		.navigate_to_route("nope", NavigateOptions::new(), TransitionOptions::push())
		.await
		.unwrap_err();

	assert!(matches!(err, NavigationError::Route(RouteError::UnknownRoute(_))));
	assert_eq!(router.navigation_token(), 0);
	assert!(router.is_empty());
}

#[rstest]
fn test_find_route_round_trips_through_href() {
	// Arrange
	let router = router(&blog_routes());
	let found = router
		.find_route(
			"blog.article",
			&FindOptions::strict()
				.with_param("slug", "hello")
				.with_query(Query::from([("page".to_string(), "2".to_string())])),
		)
		.unwrap()
		.unwrap();

	// Act
	let href = found.href();
	let matched = router.match_path(&href).unwrap();

	// Assert
	assert_eq!(href, "/blog/hello?page=2");
	assert_eq!(matched, found);
}

#[rstest]
fn test_literal_path_override() {
	let router = router(&section_routes());

	let found = router
		.find_route("404", &FindOptions::strict().with_path("/lost/page"))
		.unwrap()
		.unwrap();

	assert_eq!(found.path(), "/lost/page");
}

#[rstest]
fn test_parent_route_of_child() {
	let router = router(&blog_routes());
	let article = router.match_path("/blog/wow").unwrap();
	let home = router.match_path("/").unwrap();

	let parent = router.get_parent_route(&article).unwrap();

	assert_eq!(parent.name(), "blog");
	assert!(router.get_parent_route(&home).is_none());
}

#[rstest]
fn test_custom_delimiter() {
	let tree = RouteTree::compile(&blog_routes(), "/").unwrap();

	assert!(tree.has_route("blog/article"));
	assert!(!tree.has_route("blog.article"));
	assert_eq!(
		tree.match_path("/blog/wow").map(|route| route.name().to_string()),
		Some("blog/article".to_string())
	);
}

#[rstest]
#[case("/blog/wow?a=1&b=two%20words", "/blog/wow", &[("a", "1"), ("b", "two words")])]
#[case("/blog?a=1&a=2", "/blog", &[("a", "2")])]
#[case("/", "/", &[])]
fn test_parse_href(#[case] href: &str, #[case] path: &str, #[case] pairs: &[(&str, &str)]) {
	let (pathname, query) = parse_href(href).unwrap();

	let expected: Query = pairs
		.iter()
		.map(|(key, value)| (key.to_string(), value.to_string()))
		.collect();
	assert_eq!(pathname, path);
	assert_eq!(query, expected);
}

#[rstest]
fn test_invalid_template_is_rejected_at_construction() {
	let result = Router::new(
		&[RouteDefinition::new("broken", "/:id(\\d+")],
		NavigatorConfig::default(),
	);

	assert!(matches!(result, Err(RouteError::InvalidPattern { .. })));
}
