//! # switchyard
//!
//! **switchyard** is the routing and dispatch core of a client-side MVC
//! application: pattern routes recognise hash-fragment URLs into parameter
//! sets, the same routes generate URLs back from parameters, and recognised
//! parameters are dispatched to named controller actions wrapped in
//! cancellable before/after filters.
//!
//! ## Architecture
//!
//! - **[`router`]** - Pattern compilation, URL recognition and reverse URL generation
//! - **[`controller`]** - Controllers, their actions and filter events, and the controller registry
//! - **[`dispatcher`]** - Strict dispatch of raw call shapes through pluggable matchers
//! - **[`app`]** - The application context: lenient dispatch and history integration
//! - **[`events`]** - Typed, cancellable event channels
//! - **[`history`]** - Browser history abstraction with an in-memory implementation
//! - **[`view`]** - View lookup used by the default action
//! - **[`config`]** - Route tables declared in YAML, TOML or JSON
//! - **[`hot_reload`]** - Live reloading of route table files
//! - **[`runtime_config`]** / **[`logging`]** - Environment-driven settings and tracing setup
//!
//! ### Navigation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant History
//!     participant App as Application
//!     participant Router
//!     participant Registry as ControllerRegistry
//!     participant Controller
//!
//!     History->>App: token "videos/42/edit"
//!     App->>Router: recognise(token)
//!     Router-->>App: {controller: videos, action: edit, id: 42}
//!     App->>Registry: get_controller("videos")
//!     Registry-->>App: Arc<Controller>
//!     App->>Controller: fire_action("edit", scope, [{url}])
//!     Controller->>Controller: before_edit listeners (may cancel)
//!     Controller->>Controller: handler
//!     Controller->>Controller: after_edit listeners
//!     Controller-->>App: FireOutcome
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use serde_json::json;
//! use std::sync::Arc;
//! use switchyard::{ActionOptions, Application, Controller, ControllerManager, FireOutcome, Router};
//!
//! # fn main() -> anyhow::Result<()> {
//! let manager = Arc::new(ControllerManager::new());
//! let videos = Controller::new("videos");
//! videos.register_action(
//!     "show",
//!     |call| Ok(json!({ "args": call.args.len() })),
//!     ActionOptions::default(),
//! );
//! manager.register(videos);
//!
//! let app = Application::builder()
//!     .router(Router::with_default_routes())
//!     .controllers(manager)
//!     .build();
//!
//! match app.handle_history_token("#videos/show/42")? {
//!     Some(FireOutcome::Completed(value)) => assert_eq!(value, json!({ "args": 1 })),
//!     other => panic!("unexpected outcome: {other:?}"),
//! }
//! assert_eq!(app.current_params().and_then(|p| p.get("id").cloned()).as_deref(), Some("42"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Binary
//!
//! The `switchyard` binary loads a route table file and prints the table,
//! recognises URLs, or generates them; see [`cli`].

pub mod app;
pub mod cli;
pub mod config;
pub mod controller;
pub mod dispatcher;
pub mod events;
pub mod history;
pub mod hot_reload;
pub mod ids;
pub mod logging;
pub mod router;
pub mod runtime_config;
pub mod view;

pub use app::{Application, ApplicationBuilder};
pub use controller::{
    ActionCall, ActionOptions, Controller, ControllerError, ControllerManager, ControllerRegistry,
    FireOutcome,
};
pub use dispatcher::{DispatchConfig, DispatchError, Dispatcher};
pub use events::{EventChannel, Signal};
pub use history::{History, MemoryHistory};
pub use router::{NamedParams, Params, Route, RouteError, RouteOptions, Router, UrlTarget};
