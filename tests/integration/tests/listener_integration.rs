//! Lifecycle events as seen by listeners across navigations.

use parking_lot::Mutex;
use rstest::rstest;
use std::sync::Arc;
use waymark::prelude::*;
use waymark_integration_tests::{Hits, Reject, blog_routes, record_events, router};

#[rstest]
#[tokio::test]
async fn test_event_sequence_per_navigation() {
	// Arrange
	let router = router(&blog_routes());
	router.use_middleware(|_| Hits::new());
	let (events, _subscriptions) = record_events(&router);

	// Act
	router.navigate_to_path("/", PathOptions::new()).await.unwrap();
	router.navigate_to_path("/blog", PathOptions::new()).await.unwrap();

	// Assert
	let expected = [
		(RouteEvent::Start, "home"),
		(RouteEvent::Progress, "home"),
		(RouteEvent::Finish, "home"),
		(RouteEvent::Start, "blog"),
		(RouteEvent::Progress, "blog"),
		(RouteEvent::Finish, "blog"),
	]
	.map(|(event, name)| (event, name.to_string()));
	assert_eq!(*events.lock(), expected);
}

#[rstest]
#[tokio::test]
async fn test_rejected_navigation_emits_start_only() {
	let router = router(&blog_routes());
	router.use_middleware(|_| Reject::new("guard rejected"));
	let (events, _subscriptions) = record_events(&router);

	let result = router.navigate_to_path("/", PathOptions::new()).await;

	assert!(result.is_err());
	assert_eq!(*events.lock(), [(RouteEvent::Start, "home".to_string())]);
}

#[rstest]
#[tokio::test]
async fn test_unsubscribed_listener_stops_receiving() {
	// Arrange
	let router = router(&blog_routes());
	let calls = Arc::new(Mutex::new(0usize));
	let counter = Arc::clone(&calls);
	let subscription = router.listen(RouteEvent::Finish, move |_| {
		*counter.lock() += 1;
	});
	router.navigate_to_path("/", PathOptions::new()).await.unwrap();

	// Act
	subscription.unsubscribe();
	router.navigate_to_path("/blog", PathOptions::new()).await.unwrap();

	// Assert
	assert_eq!(*calls.lock(), 1);
}

#[rstest]
#[tokio::test]
async fn test_listener_sees_committed_transition() {
	let router = router(&blog_routes());
	let tokens = Arc::new(Mutex::new(Vec::new()));
	let sink = Arc::clone(&tokens);
	let _subscription = router.listen(RouteEvent::Finish, move |transition| {
		sink.lock().push((transition.token(), transition.kind()));
	});

	router.navigate_to_path("/", PathOptions::new()).await.unwrap();
	router
		.navigate_to_path("/blog", PathOptions::new().with_kind(NavigationType::Replace))
		.await
		.unwrap();

	assert_eq!(
		*tokens.lock(),
		[(1, NavigationType::Push), (2, NavigationType::Replace)]
	);
	assert_eq!(router.navigation_token(), 2);
}

#[rstest]
#[tokio::test]
async fn test_dispose_clears_listeners_and_history() {
	let router = router(&blog_routes());
	let (events, _subscriptions) = record_events(&router);
	router.navigate_to_path("/", PathOptions::new()).await.unwrap();
	events.lock().clear();

	router.dispose();
	router.navigate_to_path("/blog", PathOptions::new()).await.unwrap();

	assert!(events.lock().is_empty());
	assert_eq!(router.len(), 1);
	assert_eq!(router.middleware_count(), 0);
}
