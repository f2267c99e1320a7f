use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use switchyard::controller::ControllerManager;
use switchyard::dispatcher::{
    DefaultMatcher, DispatchConfig, DispatchError, DispatchMatcher, Dispatcher, ObjectMatcher,
};
use switchyard::{ActionOptions, Controller, Signal};

mod common;
use common::fixtures::{users_controller, CallLog};

fn manager_with_users(log: &CallLog) -> ControllerManager {
    let manager = ControllerManager::new();
    manager.register(users_controller(log));
    manager
}

#[test]
fn test_both_call_shapes_normalize_identically() {
    let dispatcher = Dispatcher::new();
    let expected = DispatchConfig::new("users", "index", vec![]);

    let (matcher, positional) = dispatcher
        .resolve(&[json!("users"), json!("index"), json!([])])
        .unwrap();
    assert_eq!(matcher.name(), "default");
    assert_eq!(positional, expected);

    let (matcher, object) = dispatcher
        .resolve(&[json!({ "controller": "users", "action": "index", "arguments": [] })])
        .unwrap();
    assert_eq!(matcher.name(), "object");
    assert_eq!(object, expected);
}

#[test]
fn test_argument_list_is_optional() {
    assert!(DefaultMatcher.matches(&[json!("users"), json!("index")]));
    assert!(!DefaultMatcher.matches(&[json!("users"), json!("index"), json!("x")]));
    assert!(!DefaultMatcher.matches(&[json!("users")]));

    let config = ObjectMatcher
        .dispatch_config(&[json!({ "controller": "users", "action": "index" })])
        .unwrap();
    assert!(config.arguments.is_empty());
}

#[test]
fn test_object_with_bad_arguments_is_malformed() {
    let dispatcher = Dispatcher::new();
    let err = dispatcher
        .resolve(&[json!({ "controller": "users", "action": "index", "arguments": 5 })])
        .unwrap_err();
    match err {
        DispatchError::MalformedRequest { matcher, .. } => assert_eq!(matcher, "object"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_dispatch_invokes_action_with_arguments() {
    let log = CallLog::default();
    let manager = manager_with_users(&log);
    let dispatcher = Dispatcher::new();

    let result = dispatcher
        .dispatch(&manager, &[json!("users"), json!("edit"), json!([1, "two"])])
        .unwrap();
    assert_eq!(result, Some(json!([1, "two"])));
    assert_eq!(log.entries(), vec!["edit"]);
}

#[test]
fn test_strict_dispatch_skips_filters() {
    let log = CallLog::default();
    let manager = ControllerManager::new();
    let controller = manager.register(users_controller(&log));
    controller.before("index", |_| Signal::Cancel).unwrap();

    let result = Dispatcher::new()
        .dispatch(&manager, &[json!("users"), json!("index")])
        .unwrap();
    assert_eq!(result, Some(json!("index")));
}

#[test]
fn test_strict_dispatch_matches_direct_invoke() {
    let manager = ControllerManager::new();
    let controller = Controller::new("reports");
    controller.register_action(
        "summary",
        |call| {
            Ok(json!({
                "controller": call.controller.name(),
                "action": call.action,
                "scoped": call.scope.is_some(),
                "args": call.args,
            }))
        },
        ActionOptions::default(),
    );
    let after_calls = Arc::new(Mutex::new(0usize));
    let after_clone = Arc::clone(&after_calls);
    let controller = manager.register(controller);
    controller
        .after("summary", move |_| {
            *after_clone.lock().unwrap() += 1;
        })
        .unwrap();

    let dispatched = Dispatcher::new()
        .dispatch(&manager, &[json!("reports"), json!("summary"), json!([7])])
        .unwrap();
    let direct = controller.invoke("summary", None, &[json!(7)]).unwrap();

    assert_eq!(dispatched, Some(direct));
    assert_eq!(
        dispatched,
        Some(json!({ "controller": "reports", "action": "summary", "scoped": false, "args": [7] }))
    );
    assert_eq!(*after_calls.lock().unwrap(), 0);
}

#[test]
fn test_no_matching_format_carries_args() {
    let manager = ControllerManager::new();
    let args = [json!(1), json!(2)];
    let err = Dispatcher::new().dispatch(&manager, &args).unwrap_err();
    match &err {
        DispatchError::NoMatchingDispatchFormat { args: raw } => assert_eq!(raw, &args.to_vec()),
        other => panic!("unexpected error: {other}"),
    }
    assert_eq!(err.to_string(), "no dispatch matcher accepts arguments [1,2]");
}

#[test]
fn test_controller_not_found() {
    let manager = ControllerManager::new();
    let err = Dispatcher::new()
        .dispatch(&manager, &[json!("ghosts"), json!("index")])
        .unwrap_err();
    assert!(matches!(
        err,
        DispatchError::ControllerNotFound { ref controller } if controller == "ghosts"
    ));
    assert!(err.to_string().contains("ghosts"));
}

#[test]
fn test_action_not_found_names_both() {
    let log = CallLog::default();
    let manager = manager_with_users(&log);
    let err = Dispatcher::new()
        .dispatch(&manager, &[json!("users"), json!("destroy")])
        .unwrap_err();
    match &err {
        DispatchError::ActionNotFound { controller, action } => {
            assert_eq!(controller, "users");
            assert_eq!(action, "destroy");
        }
        other => panic!("unexpected error: {other}"),
    }
    let message = err.to_string();
    assert!(message.contains("users") && message.contains("destroy"));
    assert!(log.entries().is_empty());
}

#[test]
fn test_action_failure_is_wrapped() {
    let manager = ControllerManager::new();
    let controller = Controller::new("jobs");
    controller.register_action(
        "run",
        |_| Err(anyhow::anyhow!("disk full")),
        ActionOptions::default(),
    );
    manager.register(controller);

    let err = Dispatcher::new()
        .dispatch(&manager, &[json!("jobs"), json!("run")])
        .unwrap_err();
    assert!(matches!(err, DispatchError::Action { .. }));
    let source = std::error::Error::source(&err).unwrap();
    assert_eq!(source.to_string(), "disk full");
}

#[test]
fn test_before_dispatch_cancels_silently() {
    let log = CallLog::default();
    let manager = manager_with_users(&log);
    let dispatcher = Dispatcher::new();

    let seen: Arc<Mutex<Vec<(String, DispatchConfig)>>> = Arc::default();
    let seen_clone = Arc::clone(&seen);
    dispatcher.before_dispatch().on(move |event| {
        seen_clone
            .lock()
            .unwrap()
            .push((event.matcher.clone(), event.config.clone()));
        assert_eq!(event.raw_args.len(), 1);
        Signal::Cancel
    });

    let result = dispatcher
        .dispatch(&manager, &[json!({ "controller": "users", "action": "index" })])
        .unwrap();
    assert_eq!(result, None);
    assert!(log.entries().is_empty());

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].0, "object");
    assert_eq!(seen[0].1, DispatchConfig::new("users", "index", vec![]));
}

#[test]
fn test_before_dispatch_cancel_precedes_controller_lookup() {
    let manager = ControllerManager::new();
    let dispatcher = Dispatcher::new();
    dispatcher.before_dispatch().on(|_| Signal::Cancel);

    let result = dispatcher.dispatch(&manager, &[json!("ghosts"), json!("index")]);
    assert!(matches!(result, Ok(None)));
}

/// Accepts a single `"controller#action"` string.
struct HashShorthand;

impl DispatchMatcher for HashShorthand {
    fn name(&self) -> &str {
        "shorthand"
    }

    fn matches(&self, args: &[Value]) -> bool {
        matches!(args, [Value::String(s)] if s.contains('#'))
    }

    fn dispatch_config(&self, args: &[Value]) -> Result<DispatchConfig, DispatchError> {
        let text = args.first().and_then(Value::as_str).unwrap_or_default();
        let (controller, action) = text.split_once('#').unwrap_or((text, "index"));
        Ok(DispatchConfig::new(controller, action, vec![]))
    }
}

#[test]
fn test_custom_matchers_in_registration_order() {
    let mut dispatcher = Dispatcher::without_matchers();
    assert!(matches!(
        dispatcher.resolve(&[json!("users"), json!("index")]),
        Err(DispatchError::NoMatchingDispatchFormat { .. })
    ));

    dispatcher.register_matcher(Arc::new(HashShorthand));
    dispatcher.register_matcher(Arc::new(DefaultMatcher));
    assert_eq!(dispatcher.matcher_names(), vec!["shorthand", "default"]);

    let log = CallLog::default();
    let manager = manager_with_users(&log);
    let result = dispatcher.dispatch(&manager, &[json!("users#edit")]).unwrap();
    assert_eq!(result, Some(json!([])));
}

#[test]
fn test_dispatch_config_serde_shape() {
    let config: DispatchConfig =
        serde_json::from_value(json!({ "controller": "a", "action": "b" })).unwrap();
    assert_eq!(config, DispatchConfig::new("a", "b", vec![]));
    assert_eq!(
        serde_json::to_value(&config).unwrap(),
        json!({ "controller": "a", "action": "b", "arguments": [] })
    );
}
