//! Onion ordering and abort behavior of navigation middleware.

use rstest::rstest;
use waymark::prelude::*;
use waymark::RoutingErrorKind;
use waymark_integration_tests::{
	DoubleNext, Hits, RecordAt, Recorder, RedirectOn, Reject, Tape, blog_routes, router,
};

#[rstest]
#[case::declaration_order(RecordAt::BeforeNext, vec![("h1".to_string(), 0), ("h2".to_string(), 1)])]
#[case::outer_records_on_unwind(RecordAt::AfterNext, vec![("h2".to_string(), 0), ("h1".to_string(), 1)])]
#[tokio::test]
async fn test_onion_order(#[case] outer: RecordAt, #[case] expected: Vec<(String, usize)>) {
	// Arrange
	let router = router(&blog_routes());
	let tape = Tape::new();
	let (h1, h2) = (tape.clone(), tape.clone());
	router
		.use_middleware(move |_| Recorder::new("h1", outer, &h1))
		.use_middleware(move |_| Recorder::new("h2", RecordAt::BeforeNext, &h2));

	// Act
	router.navigate_to_path("/", PathOptions::new()).await.unwrap();

	// Assert
	assert_eq!(tape.entries(), expected);
}

#[rstest]
#[tokio::test]
async fn test_double_next_fails_navigation() {
	// Arrange
	let router = router(&blog_routes());
	let downstream = Hits::new();
	let counted = downstream.clone();
	router
		.use_middleware(|_| DoubleNext)
		.use_middleware(move |_| counted);

	// Act
	let err = router
		.navigate_to_path("/blog", PathOptions::new())
		.await
		.unwrap_err();

	// Assert
	assert!(matches!(err, NavigationError::Protocol(_)));
	assert_eq!(err.to_string(), "next() called multiple times");
	assert_eq!(downstream.count(), 1);
	assert!(router.is_empty());
	assert!(!router.is_started());
}

#[rstest]
#[tokio::test]
async fn test_abort_skips_later_handlers() {
	// Arrange
	let router = router(&blog_routes());
	let tape = Tape::new();
	let (outer, inner) = (tape.clone(), tape.clone());
	router
		.use_middleware(move |_| Recorder::new("outer", RecordAt::BeforeNext, &outer))
		.use_middleware(|_| Reject::new("guard rejected"))
		.use_middleware(move |_| Recorder::new("inner", RecordAt::BeforeNext, &inner));

	// Act
	let result = router.navigate_to_path("/", PathOptions::new()).await;

	// Assert
	assert!(result.is_err());
	assert_eq!(tape.labels(), ["outer"]);
}

#[rstest]
#[tokio::test]
async fn test_routing_error_abort_commits_decorated_route() {
	// Arrange
	let router = router(&blog_routes());
	let tape = Tape::new();
	let inner = tape.clone();
	router
		.use_middleware(|_| RedirectOn::new("home", "blog"))
		.use_middleware(move |_| Recorder::new("inner", RecordAt::BeforeNext, &inner));

	// Act
	let current = router.navigate_to_path("/", PathOptions::new()).await.unwrap();

	// Assert
	assert_eq!(current.name(), "blog");
	assert_eq!(current.error().map(RoutingError::kind), Some(RoutingErrorKind::Redirect));
	// the home attempt never reached the inner recorder, the follow-up did
	assert_eq!(tape.labels(), ["inner"]);
}

#[rstest]
#[tokio::test]
async fn test_middleware_sees_transition() {
	use async_trait::async_trait;
	use parking_lot::Mutex;
	use std::sync::Arc;

	struct Inspect(Arc<Mutex<Vec<String>>>);

	#[async_trait]
	impl Middleware<Transition, (), NavigationError> for Inspect {
		async fn handle(&self, transition: &Transition, next: Next<'_>) -> Result<(), NavigationError> {
			let from = transition.from().map(|route| route.name().to_string());
			self.0.lock().push(format!(
				"{} -> {} ({})",
				from.as_deref().unwrap_or("-"),
				transition.to().name(),
				transition.kind()
			));
			next.run().await
		}
	}

	// Arrange
	let router = router(&blog_routes());
	let seen = Arc::new(Mutex::new(Vec::new()));
	let sink = Arc::clone(&seen);
	router.use_middleware(move |_| Inspect(sink));

	// Act
	router.navigate_to_path("/", PathOptions::new()).await.unwrap();
	router
		.navigate_to_path(
			"/blog",
			PathOptions::new().with_kind(NavigationType::Replace),
		)
		.await
		.unwrap();

	// Assert
	assert_eq!(
		*seen.lock(),
		["- -> home (push)".to_string(), "home -> blog (replace)".to_string()]
	);
}
