//! # Application Module
//!
//! The application context: one router, one controller registry, one strict
//! dispatcher and one history, built together at startup and passed around
//! explicitly.
//!
//! ## Dispatch levels
//!
//! - [`Application::dispatch`] is lenient. It records the parameters, looks
//!   the controller up and fires the action through its filters; a missing
//!   or unknown controller is logged and ignored so a stale link cannot take
//!   the UI down.
//! - [`Application::dispatch_strict`] goes through the [`Dispatcher`] and
//!   reports unknown call shapes, controllers and actions as errors.
//!
//! ## History
//!
//! A history token is a URL without its leading `#`. The application
//! recognises it and dispatches the match with a single `{"url": token}`
//! argument. [`Application::bind_history`] wires a [`MemoryHistory`] so that
//! every added token is dispatched synchronously.
//!
//! ## Hot reload
//!
//! With `SWITCHYARD_HOT_RELOAD` and a route file configured, the built
//! application owns a watcher that swaps in a fresh router on every change.

use anyhow::Context;
use arc_swap::ArcSwap;
use notify::RecommendedWatcher;
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock, Weak};
use tracing::{debug, error, info, warn};

use crate::config::load_routes;
use crate::controller::{ControllerManager, ControllerRegistry, FireOutcome};
use crate::dispatcher::{DispatchError, Dispatcher};
use crate::events::EventChannel;
use crate::history::{History, MemoryHistory};
use crate::hot_reload::watch_routes;
use crate::router::{Params, Router, UrlTarget};
use crate::runtime_config::RuntimeConfig;

/// Action used when dispatch parameters carry none.
pub const DEFAULT_ACTION: &str = "index";

/// Name of the channel raised once lenient dispatch has found its controller.
pub const DISPATCH_EVENT: &str = "dispatch";

/// Builder for [`Application`].
pub struct ApplicationBuilder {
    router: Option<Router>,
    controllers: Option<Arc<dyn ControllerRegistry>>,
    dispatcher: Option<Dispatcher>,
    history: Option<Arc<dyn History>>,
    default_action: String,
    watch_path: Option<PathBuf>,
}

impl Default for ApplicationBuilder {
    fn default() -> Self {
        Self {
            router: None,
            controllers: None,
            dispatcher: None,
            history: None,
            default_action: DEFAULT_ACTION.to_string(),
            watch_path: None,
        }
    }
}

impl ApplicationBuilder {
    #[must_use]
    pub fn router(mut self, router: Router) -> Self {
        self.router = Some(router);
        self
    }

    #[must_use]
    pub fn controllers(mut self, controllers: Arc<dyn ControllerRegistry>) -> Self {
        self.controllers = Some(controllers);
        self
    }

    #[must_use]
    pub fn dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    #[must_use]
    pub fn history(mut self, history: Arc<dyn History>) -> Self {
        self.history = Some(history);
        self
    }

    #[must_use]
    pub fn default_action(mut self, action: impl Into<String>) -> Self {
        self.default_action = action.into();
        self
    }

    /// Reload the routing table from `path` whenever the file changes, for
    /// the lifetime of the built application.
    #[must_use]
    pub fn watch_routes_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.watch_path = Some(path.into());
        self
    }

    /// Apply environment-driven settings: the default action, the route
    /// table file when one is configured, and hot reload of that file.
    ///
    /// # Errors
    ///
    /// The configured route table file cannot be loaded.
    pub fn runtime_config(mut self, config: &RuntimeConfig) -> anyhow::Result<Self> {
        self.default_action = config.default_action.clone();
        if let Some(path) = &config.routes_path {
            let router = load_routes(path)
                .with_context(|| format!("SWITCHYARD_ROUTES={}", path.display()))?;
            self.router = Some(router);
            if config.hot_reload {
                self.watch_path = Some(path.clone());
            }
        } else if config.hot_reload {
            warn!("SWITCHYARD_HOT_RELOAD set without SWITCHYARD_ROUTES; nothing to watch");
        }
        Ok(self)
    }

    /// Build the application. Anything not supplied gets its stock
    /// implementation; a missing router becomes one with the default routes.
    ///
    /// A watched route file whose watcher cannot be created is logged and
    /// the application runs without reloading.
    #[must_use]
    pub fn build(self) -> Application {
        let router = self.router.unwrap_or_default();
        info!(
            routes_count = router.len(),
            default_action = %self.default_action,
            hot_reload = self.watch_path.is_some(),
            "Application initialised"
        );
        let mut app = Application {
            router: Arc::new(ArcSwap::from_pointee(router)),
            controllers: self
                .controllers
                .unwrap_or_else(|| Arc::new(ControllerManager::new())),
            dispatcher: self.dispatcher.unwrap_or_default(),
            history: self
                .history
                .unwrap_or_else(|| Arc::new(MemoryHistory::new())),
            current_params: RwLock::new(None),
            default_action: self.default_action,
            dispatched: EventChannel::new(DISPATCH_EVENT),
            watcher: Mutex::new(None),
        };

        if let Some(path) = self.watch_path {
            match app.watch_routes(&path) {
                Ok(watcher) => {
                    info!(path = %path.display(), "Hot reload enabled");
                    if let Ok(slot) = app.watcher.get_mut() {
                        *slot = Some(watcher);
                    }
                }
                Err(e) => error!(
                    path = %path.display(),
                    error = %e,
                    "Hot reload watcher failed; continuing without it"
                ),
            }
        }
        app
    }
}

/// Application context tying routing to controllers.
pub struct Application {
    router: Arc<ArcSwap<Router>>,
    controllers: Arc<dyn ControllerRegistry>,
    dispatcher: Dispatcher,
    history: Arc<dyn History>,
    current_params: RwLock<Option<Params>>,
    default_action: String,
    dispatched: EventChannel<Params>,
    watcher: Mutex<Option<RecommendedWatcher>>,
}

impl Application {
    #[must_use]
    pub fn builder() -> ApplicationBuilder {
        ApplicationBuilder::default()
    }

    /// Snapshot of the current router.
    #[must_use]
    pub fn router(&self) -> Arc<Router> {
        self.router.load_full()
    }

    /// Shared handle for swapping the router (hot reload).
    #[must_use]
    pub fn router_handle(&self) -> Arc<ArcSwap<Router>> {
        Arc::clone(&self.router)
    }

    /// Replace the routing table; in-flight readers keep their snapshot.
    pub fn replace_router(&self, router: Router) {
        info!(routes_count = router.len(), "Router replaced");
        self.router.store(Arc::new(router));
    }

    /// Reload the routing table from `path` whenever the file changes.
    ///
    /// Keep the returned watcher alive for as long as reloading should run.
    ///
    /// # Errors
    ///
    /// The file cannot be watched.
    pub fn watch_routes(&self, path: impl AsRef<Path>) -> notify::Result<RecommendedWatcher> {
        watch_routes(path, self.router_handle(), |router| {
            debug!(routes_count = router.len(), "Application router reloaded");
        })
    }

    /// True while the application owns a route file watcher.
    #[must_use]
    pub fn is_hot_reloading(&self) -> bool {
        self.watcher.lock().map(|w| w.is_some()).unwrap_or(false)
    }

    #[must_use]
    pub fn controllers(&self) -> &Arc<dyn ControllerRegistry> {
        &self.controllers
    }

    #[must_use]
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    #[must_use]
    pub fn history(&self) -> &Arc<dyn History> {
        &self.history
    }

    /// Channel raised with the parameters of each lenient dispatch whose
    /// controller was found.
    #[must_use]
    pub fn dispatched(&self) -> &EventChannel<Params> {
        &self.dispatched
    }

    /// Parameters of the most recent lenient dispatch.
    #[must_use]
    pub fn current_params(&self) -> Option<Params> {
        self.current_params.read().ok().and_then(|p| p.clone())
    }

    /// Lenient dispatch.
    ///
    /// `action` defaults to the application's default action. The parameters
    /// are recorded as the current ones before the controller is looked up.
    /// Returns `Ok(None)` when there is no such controller.
    ///
    /// # Errors
    ///
    /// Only the action handler's own failure.
    pub fn dispatch(
        &self,
        mut params: Params,
        scope: Option<&Value>,
        args: &[Value],
    ) -> anyhow::Result<Option<FireOutcome>> {
        params
            .entry("action".to_string())
            .or_insert_with(|| self.default_action.clone());

        if let Ok(mut current) = self.current_params.write() {
            *current = Some(params.clone());
        }

        let Some(controller_name) = params.get("controller") else {
            warn!(params = ?params, "Dispatch without controller ignored");
            return Ok(None);
        };
        let Some(controller) = self.controllers.get_controller(controller_name) else {
            warn!(controller = %controller_name, params = ?params, "Dispatch to unknown controller ignored");
            return Ok(None);
        };

        let action = params.get("action").cloned().unwrap_or_default();
        debug!(controller = %controller_name, action = %action, "Dispatching");
        self.dispatched.fire(&params);

        controller.fire_action(&action, scope, args).map(Some)
    }

    /// Strict dispatch through the [`Dispatcher`].
    ///
    /// # Errors
    ///
    /// See [`DispatchError`].
    pub fn dispatch_strict(&self, args: &[Value]) -> Result<Option<Value>, DispatchError> {
        self.dispatcher.dispatch(self.controllers.as_ref(), args)
    }

    /// Recognise a history token and dispatch it.
    ///
    /// One leading `#` is stripped. An unrecognised token does nothing.
    ///
    /// # Errors
    ///
    /// Only the action handler's own failure.
    pub fn handle_history_token(&self, token: &str) -> anyhow::Result<Option<FireOutcome>> {
        let token = token.strip_prefix('#').unwrap_or(token);
        match self.router().recognise(token) {
            Some(params) => self.dispatch(params, None, &[json!({ "url": token })]),
            None => {
                debug!(token = %token, "History token not recognised");
                Ok(None)
            }
        }
    }

    /// Dispatch every token subsequently added to `history`.
    pub fn bind_history(self: &Arc<Self>, history: &MemoryHistory) {
        let app: Weak<Self> = Arc::downgrade(self);
        history.change().observe(move |token| {
            let Some(app) = app.upgrade() else {
                return;
            };
            if let Err(e) = app.handle_history_token(token) {
                warn!(token = %token, error = %e, "History dispatch failed");
            }
        });
    }

    /// URL for `target` from the current router.
    #[must_use]
    pub fn url_for(&self, target: &UrlTarget) -> Option<String> {
        self.router().url_for_target(target)
    }

    /// URL relative to the current dispatch: `controller` and `action` come
    /// from the current parameters unless `overrides` sets them.
    #[must_use]
    pub fn url_for_current(&self, overrides: Params) -> Option<String> {
        let mut options = Params::new();
        if let Some(current) = self.current_params() {
            for key in ["controller", "action"] {
                if let Some(value) = current.get(key) {
                    options.insert(key.to_string(), value.clone());
                }
            }
        }
        options.extend(overrides);
        self.router().url_for(&options)
    }

    /// Generate a URL for `target` and add it to history.
    pub fn redirect_to(&self, target: &UrlTarget) -> bool {
        self.router().redirect_to(target, self.history.as_ref())
    }
}
