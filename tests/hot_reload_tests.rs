use arc_swap::ArcSwap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use switchyard::config::load_routes;
use switchyard::hot_reload::{reload_routes, watch_routes};

mod common;
use common::temp_files;

const ROUTES_V1: &str = "routes:\n  - pattern: \"one/:id\"\n    options: { controller: first }\n";
const ROUTES_V2: &str = "routes:\n  - pattern: \"two/:id\"\n    options: { controller: second }\n  - pattern: \"three\"\n";

#[test]
fn test_reload_routes_swaps_table() {
    let file = temp_files::create_temp_yaml(ROUTES_V1);
    let router = ArcSwap::from_pointee(load_routes(file.path()).unwrap());
    let snapshot = router.load_full();

    std::fs::write(file.path(), ROUTES_V2).unwrap();
    assert_eq!(reload_routes(file.path(), &router).unwrap(), 2);

    assert_eq!(router.load().recognise("two/5").unwrap()["controller"], "second");
    assert!(router.load().recognise("one/5").is_none());
    assert_eq!(snapshot.recognise("one/5").unwrap()["controller"], "first");
}

#[test]
fn test_invalid_file_keeps_previous_table() {
    let file = temp_files::create_temp_yaml(ROUTES_V1);
    let router = ArcSwap::from_pointee(load_routes(file.path()).unwrap());

    std::fs::write(file.path(), "routes: [ { pattern: \"x/:id\", conditions: { id: \"(\" } } ]\n").unwrap();
    assert!(reload_routes(file.path(), &router).is_err());
    assert!(router.load().recognise("one/5").is_some());

    std::fs::write(file.path(), "routes: {{{ not yaml").unwrap();
    assert!(reload_routes(file.path(), &router).is_err());
    assert!(router.load().recognise("one/5").is_some());
}

#[test]
fn test_watch_routes_reloads_on_change() {
    let file = temp_files::create_temp_yaml(ROUTES_V1);
    let router = Arc::new(ArcSwap::from_pointee(load_routes(file.path()).unwrap()));

    let reloads: Arc<Mutex<Vec<usize>>> = Arc::default();
    let reloads_clone = Arc::clone(&reloads);
    let watcher = watch_routes(file.path(), Arc::clone(&router), move |r| {
        reloads_clone.lock().unwrap().push(r.len());
    })
    .unwrap();

    // allow watcher thread to start
    std::thread::sleep(Duration::from_millis(100));

    std::fs::write(file.path(), ROUTES_V2).unwrap();

    for _ in 0..40 {
        if reloads.lock().unwrap().contains(&2) {
            break;
        }
        std::thread::sleep(Duration::from_millis(50));
    }

    assert!(reloads.lock().unwrap().contains(&2));
    assert!(router.load().recognise("two/1").is_some());
    drop(watcher);
}
