//! Recoverable routing errors and the follow-up navigations they drive.

use async_trait::async_trait;
use rstest::rstest;
use serde_json::Value;
use waymark::prelude::*;
use waymark::{RoutingErrorKind, Unsubscribe};
use waymark_integration_tests::{RedirectOn, blog_routes, record_events, router, section_routes};

/// Raises a not-found error carrying a literal path for `/missing`.
struct NotFoundOn(&'static str);

#[async_trait]
impl Middleware<Transition, (), NavigationError> for NotFoundOn {
	async fn handle(&self, transition: &Transition, next: Next<'_>) -> Result<(), NavigationError> {
		if transition.to().name() == self.0 {
			return next.abort(
				RoutingError::not_found("nothing here")
					.with_path("/missing")
					.into(),
			);
		}
		next.run().await
	}
}

/// Forbids without naming a destination.
struct ForbidAll;

#[async_trait]
impl Middleware<Transition, (), NavigationError> for ForbidAll {
	async fn handle(&self, _transition: &Transition, next: Next<'_>) -> Result<(), NavigationError> {
		next.abort(RoutingError::forbidden("members only").into())
	}
}

#[rstest]
#[tokio::test]
async fn test_redirect_lands_with_single_replace() {
	// Arrange
	let router = router(&blog_routes());
	router.use_middleware(|_| RedirectOn::new("home", "blog"));
	let (events, _subscriptions): (_, Vec<Unsubscribe>) = record_events(&router);

	// Act
	let current = router.navigate_to_path("/", PathOptions::new()).await.unwrap();

	// Assert
	assert_eq!(current.name(), "blog");
	assert_eq!(current.path(), "/blog");
	assert_eq!(current.error(), Some(&RoutingError::redirect("moved", "blog")));
	assert_eq!(router.len(), 1);
	assert_eq!(router.navigation_token(), 2);

	let finished: Vec<String> = events
		.lock()
		.iter()
		.filter(|(event, _)| *event == RouteEvent::Finish)
		.map(|(_, name)| name.clone())
		.collect();
	assert_eq!(finished, ["home", "blog"]);
}

#[rstest]
#[tokio::test]
async fn test_not_found_with_path_lands_on_code_route() {
	// Arrange
	let router = router(&section_routes());
	router.navigate_to_path("/a/tag", PathOptions::new()).await.unwrap();
	router.use_middleware(|_| NotFoundOn("some"));

	// Act
	let current = router
		.navigate_to_path("/b/other", PathOptions::new())
		.await
		.unwrap();

	// Assert
	assert_eq!(current.name(), "404");
	assert_eq!(current.path(), "/missing");
	assert_eq!(current.state(), Some(&Value::String("nothing here".to_string())));
	assert_eq!(current.error().map(RoutingError::kind), Some(RoutingErrorKind::NotFound));
	assert_eq!(router.len(), 2);
	assert_eq!(router.previous_route().unwrap().param("tag"), Some(&ParamValue::from("tag")));
}

#[rstest]
#[tokio::test]
async fn test_error_without_target_only_decorates() {
	let router = router(&blog_routes());
	router.use_middleware(|_| ForbidAll);

	let current = router.navigate_to_path("/blog", PathOptions::new()).await.unwrap();

	assert_eq!(current.name(), "blog");
	assert_eq!(current.error().map(RoutingError::code), Some(403));
	assert_eq!(router.navigation_token(), 1);
	assert_eq!(router.len(), 1);
}

#[rstest]
#[tokio::test]
async fn test_redirect_loop_hits_configured_limit() {
	// Arrange
	let router = Router::new(&blog_routes(), NavigatorConfig::default().with_max_follow_ups(4)).unwrap();
	router
		.use_middleware(|_| RedirectOn::new("home", "blog"))
		.use_middleware(|_| RedirectOn::new("blog", "home"));

	// Act
	let err = router
		.navigate_to_path("/", PathOptions::new())
		.await
		.unwrap_err();

	// Assert
	assert!(matches!(err, NavigationError::FollowUpLimit { limit: 4 }));
	assert_eq!(router.len(), 1);
	assert!(router.current_route().unwrap().error().is_some());
}

#[rstest]
#[tokio::test]
async fn test_redirect_to_unknown_route_rejects() {
	let router = router(&blog_routes());
	router.use_middleware(|_| RedirectOn::new("home", "nowhere"));

	let err = router.navigate_to_path("/", PathOptions::new()).await.unwrap_err();

	assert!(matches!(err, NavigationError::Route(RouteError::UnknownRoute(_))));
	// the redirecting attempt itself was committed before the follow-up failed
	assert_eq!(router.current_route().unwrap().name(), "home");
}

#[rstest]
#[tokio::test]
async fn test_pop_into_redirect_does_not_follow_up() {
	// Arrange
	let router = router(&blog_routes());
	router.navigate_to_path("/", PathOptions::new()).await.unwrap();
	router.navigate_to_path("/blog/wow", PathOptions::new()).await.unwrap();
	router.use_middleware(|_| RedirectOn::new("blog", "blog.article"));
	let (events, _subscriptions): (_, Vec<Unsubscribe>) = record_events(&router);

	// Act
	let current = router
		.navigate_to_route("blog", NavigateOptions::new(), TransitionOptions::pop())
		.await
		.unwrap();

	// Assert
	assert_eq!(current.name(), "home");
	assert_eq!(router.len(), 1);
	let finished = events
		.lock()
		.iter()
		.filter(|(event, _)| *event == RouteEvent::Finish)
		.count();
	assert_eq!(finished, 1);
}
