//! # Hot Reload Module
//!
//! Watches a route table file and swaps a freshly built [`Router`] into a
//! shared [`ArcSwap`] whenever the file changes. Readers holding the previous
//! router keep using it until they load again.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use arc_swap::ArcSwap;
//! use std::sync::Arc;
//! use switchyard::config::load_routes;
//! use switchyard::hot_reload::watch_routes;
//!
//! # fn main() -> anyhow::Result<()> {
//! let router = Arc::new(ArcSwap::from_pointee(load_routes("routes.yaml")?));
//! let _watcher = watch_routes("routes.yaml", router.clone(), |r| {
//!     println!("Reloaded {} routes", r.len());
//! })?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! A file that fails to parse or compile is logged and ignored: the previous
//! router stays active. Fix the file and save again.
//!
//! Hot reload is meant for development.

use arc_swap::ArcSwap;
use notify::{Config, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info};

use crate::config::load_routes;
use crate::router::Router;

/// Rebuild the router from `path` and swap it in.
///
/// Returns the number of routes in the new table.
///
/// # Errors
///
/// Read, parse or compile failures. `router` is left untouched.
pub fn reload_routes(path: &Path, router: &ArcSwap<Router>) -> anyhow::Result<usize> {
    let new_router = load_routes(path)?;
    let count = new_router.len();
    router.store(Arc::new(new_router));
    info!(path = %path.display(), routes_count = count, "hot-reload: routing table swapped");
    Ok(count)
}

/// Watch a route table file and rebuild the [`Router`] when it changes.
///
/// `on_reload` receives each successfully installed router. The returned
/// watcher must be kept alive for as long as reloading should continue.
///
/// # Errors
///
/// Failure to create the watcher or to watch `routes_path`.
pub fn watch_routes<P, F>(
    routes_path: P,
    router: Arc<ArcSwap<Router>>,
    mut on_reload: F,
) -> notify::Result<RecommendedWatcher>
where
    P: AsRef<Path>,
    F: FnMut(&Router) + Send + 'static,
{
    let path: PathBuf = routes_path.as_ref().to_path_buf();
    let watch_path = path.clone();

    let mut watcher = RecommendedWatcher::new(
        move |res: Result<notify::Event, notify::Error>| match res {
            Ok(event) => {
                if matches!(event.kind, EventKind::Modify(_) | EventKind::Create(_)) {
                    match reload_routes(&watch_path, &router) {
                        Ok(_) => on_reload(&router.load_full()),
                        Err(e) => error!(
                            path = %watch_path.display(),
                            error = %format!("{e:#}"),
                            "hot-reload: keeping previous routing table"
                        ),
                    }
                }
            }
            Err(e) => error!(error = ?e, "hot-reload: watch error"),
        },
        Config::default(),
    )?;

    watcher.watch(&path, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}
