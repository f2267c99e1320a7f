use super::{Route, RouteOptions, Router};
use crate::params;
use std::collections::HashMap;

#[test]
fn test_matcher_source_default_segments() {
    let source = Route::matcher_source(":controller/:action", &HashMap::new());
    assert_eq!(source, "^(?P<s0>[a-zA-Z0-9_,]+)/(?P<s1>[a-zA-Z0-9_,]+)$");
}

#[test]
fn test_matcher_source_with_condition() {
    let mut conditions = HashMap::new();
    conditions.insert(":id".to_string(), "[0-9]+".to_string());
    let source = Route::matcher_source("videos/:id/edit", &conditions);
    assert_eq!(source, "^videos/(?P<s0>[0-9]+)/edit$");
}

#[test]
fn test_prefix_segment_names_do_not_clash() {
    let route = Route::new(":identifier/:id", RouteOptions::default()).unwrap();
    assert_eq!(route.segment_names(), vec!["identifier", "id"]);
    let params = route.matches_for("abc/7").unwrap();
    assert_eq!(params["identifier"], "abc");
    assert_eq!(params["id"], "7");

    let url = route.url_for(&params! { "identifier" => "abc", "id" => 7 });
    assert_eq!(url.as_deref(), Some("abc/7"));
}

#[test]
fn test_condition_groups_do_not_shift_later_segments() {
    let route = Route::new(
        ":kind/:id",
        RouteOptions::new().condition("kind", "(a|b)x"),
    )
    .unwrap();
    assert_eq!(
        route.matches_for("ax/42").unwrap(),
        params! { "kind" => "ax", "id" => "42" }
    );
    assert!(route.matches_for("cx/42").is_none());
}

#[test]
fn test_empty_pattern_only_matches_empty_url() {
    let route = Route::new("", RouteOptions::new().with("controller", "home")).unwrap();
    assert!(route.recognises(""));
    assert!(!route.recognises("home"));
}

#[test]
fn test_lone_colon_is_literal() {
    let route = Route::new("a:/b", RouteOptions::default()).unwrap();
    assert!(route.segment_names().is_empty());
    assert!(route.recognises("a:/b"));
}

#[test]
fn test_invalid_condition_is_reported() {
    let err = Route::new("x/:id", RouteOptions::new().condition("id", "[0-9")).unwrap_err();
    assert!(err.to_string().contains("x/:id"));
}

#[test]
fn test_root_defaults_action_to_index() {
    let mut router = Router::new();
    router
        .root(RouteOptions::new().with("controller", "dashboard"))
        .unwrap();
    let params = router.recognise("").unwrap();
    assert_eq!(params["controller"], "dashboard");
    assert_eq!(params["action"], "index");
}

#[test]
fn test_root_keeps_explicit_action() {
    let mut router = Router::new();
    router
        .root(RouteOptions::new().with("controller", "dashboard").with("action", "welcome"))
        .unwrap();
    assert_eq!(router.recognise("").unwrap()["action"], "welcome");
}

#[test]
fn test_name_of_finds_registered_name() {
    let mut router = Router::new();
    let plain = router.connect("a", RouteOptions::default()).unwrap();
    let named = router.name("b_path", "b", RouteOptions::default()).unwrap();
    assert_eq!(router.name_of(&named), Some("b_path"));
    assert_eq!(router.name_of(&plain), None);
}
