//! Ordering and intent properties of the dispatcher

mod harness;

use harness::{EngineBuilder, ScriptedProvider};
use smartroute_routing::{RouteError, RouteIntent, RoutingRequest, Tier};

fn tier_request(tier: Tier) -> RoutingRequest {
    RoutingRequest::new("Hello", RouteIntent::ByTier(tier))
}

#[tokio::test]
async fn explicit_order_is_attempted_verbatim() {
    let a = ScriptedProvider::broken("a");
    let b = ScriptedProvider::broken("b");
    let c = ScriptedProvider::healthy("c");

    let engine = EngineBuilder::new()
        .provider(a.clone())
        .provider(b.clone())
        .provider(c.clone())
        .build();

    let request = RoutingRequest::new(
        "Hello",
        RouteIntent::Explicit(vec!["b".into(), "a".into(), "c".into()]),
    );
    let success = engine.route(&request).await.unwrap();

    assert_eq!(success.provider.as_str(), "c");
    assert_eq!(b.calls(), 1);
    assert_eq!(a.calls(), 1);
    assert_eq!(c.calls(), 1);
}

#[tokio::test]
async fn duplicate_explicit_entries_are_attempted_once() {
    let a = ScriptedProvider::broken("a");
    let b = ScriptedProvider::healthy("b");

    let engine = EngineBuilder::new().provider(a.clone()).provider(b.clone()).build();

    let request = RoutingRequest::new(
        "Hello",
        RouteIntent::Explicit(vec!["a".into(), "a".into(), "b".into(), "a".into()]),
    );
    let success = engine.route(&request).await.unwrap();

    assert_eq!(success.provider.as_str(), "b");
    assert_eq!(a.calls(), 1);
}

#[tokio::test]
async fn tier_order_matches_configuration() {
    let first = ScriptedProvider::healthy("first");
    let second = ScriptedProvider::healthy("second");

    let engine = EngineBuilder::new()
        .provider(second.clone())
        .provider(first.clone())
        .tier(Tier::Mid, &["first", "second"])
        .build();

    let success = engine.route(&tier_request(Tier::Mid)).await.unwrap();

    // Registration order does not matter; tier configuration order does
    assert_eq!(success.provider.as_str(), "first");
    assert_eq!(first.calls(), 1);
    assert_eq!(second.calls(), 0);
}

#[tokio::test]
async fn unknown_explicit_provider_fails_before_any_invocation() {
    let a = ScriptedProvider::healthy("a");

    let engine = EngineBuilder::new().provider(a.clone()).build();

    let request = RoutingRequest::new(
        "Hello",
        RouteIntent::Explicit(vec!["a".into(), "ghost".into()]),
    );
    let err = engine.route(&request).await.unwrap_err();

    assert!(matches!(err, RouteError::UnknownProvider { .. }));
    assert!(err.is_client_error());
    assert_eq!(a.calls(), 0);
}

#[tokio::test]
async fn both_intent_fields_are_rejected_before_dispatch() {
    let a = ScriptedProvider::healthy("a");
    let engine = EngineBuilder::new()
        .provider(a.clone())
        .tier(Tier::Fast, &["a"])
        .build();

    let err = RouteIntent::from_parts(Some(vec!["a".into()]), Some(Tier::Fast)).unwrap_err();
    assert!(matches!(err, RouteError::InvalidIntent(_)));

    // The invalid intent never reached the engine
    drop(engine);
    assert_eq!(a.calls(), 0);
}

#[tokio::test]
async fn neither_intent_field_is_rejected_before_dispatch() {
    let a = ScriptedProvider::healthy("a");
    let engine = EngineBuilder::new()
        .provider(a.clone())
        .tier(Tier::Fast, &["a"])
        .build();

    let err = RouteIntent::from_parts(None, None).unwrap_err();
    assert!(matches!(err, RouteError::InvalidIntent(_)));

    drop(engine);
    assert_eq!(a.calls(), 0);
}

#[tokio::test]
async fn transient_chain_settles_on_the_first_healthy_candidate() {
    let a = ScriptedProvider::failing("a", 1);
    let b = ScriptedProvider::failing("b", 1);
    let c = ScriptedProvider::healthy("c");

    let engine = EngineBuilder::new()
        .provider(a.clone())
        .provider(b.clone())
        .provider(c.clone())
        .tier(Tier::Fast, &["a", "b", "c"])
        .build();

    let success = engine.route(&tier_request(Tier::Fast)).await.unwrap();

    assert_eq!(success.provider.as_str(), "c");
    assert_eq!(success.response.output, "answer from c");
    assert_eq!(engine.breakers().consecutive_failures(&"a".into()), 1);
    assert_eq!(engine.breakers().consecutive_failures(&"b".into()), 1);
    assert_eq!(engine.breakers().consecutive_failures(&"c".into()), 0);
}

#[tokio::test]
async fn rejection_moves_on_and_still_counts_against_the_breaker() {
    let a = ScriptedProvider::rejecting("a");
    let b = ScriptedProvider::healthy("b");

    let engine = EngineBuilder::new()
        .provider(a.clone())
        .provider(b.clone())
        .tier(Tier::Fast, &["a", "b"])
        .build();

    let success = engine.route(&tier_request(Tier::Fast)).await.unwrap();

    assert_eq!(success.provider.as_str(), "b");
    // Rejected is not retried locally
    assert_eq!(a.calls(), 1);
    // A provider that rejects well-formed requests is unhealthy
    assert_eq!(engine.breakers().consecutive_failures(&"a".into()), 1);
}

#[tokio::test]
async fn attachments_ride_along_unchanged() {
    use smartroute_routing::AttachmentRef;

    let a = ScriptedProvider::healthy("a");
    let engine = EngineBuilder::new()
        .provider(a.clone())
        .tier(Tier::Fast, &["a"])
        .build();

    let request = tier_request(Tier::Fast).with_attachments(vec![AttachmentRef {
        id: "upload-1".to_owned(),
        media_type: "image/png".to_owned(),
    }]);
    let success = engine.route(&request).await.unwrap();
    assert_eq!(success.provider.as_str(), "a");
}
