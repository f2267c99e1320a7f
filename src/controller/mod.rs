//! # Controller Module
//!
//! Controllers own a table of named actions. Each action may declare a
//! cancellable `before_<action>` channel and an `after_<action>` channel.
//! [`Controller::fire_action`] runs an action through its filters, or falls
//! back to showing a view of the same name when no handler is registered.
//!
//! ## Example
//!
//! ```rust
//! use serde_json::json;
//! use switchyard::controller::{ActionOptions, Controller, FireOutcome};
//!
//! let users = Controller::new("users");
//! users.register_action("index", |_call| Ok(json!(["ada", "grace"])), ActionOptions::default());
//!
//! let outcome = users.fire_action("index", None, &[]).unwrap_or(FireOutcome::NoView);
//! assert_eq!(outcome, FireOutcome::Completed(json!(["ada", "grace"])));
//! ```
//!
//! Controllers are looked up by name through a [`ControllerRegistry`];
//! [`ControllerManager`] is the stock implementation.

mod core;
mod registry;

pub use core::{
    ActionCall, ActionEvent, ActionHandler, ActionOptions, ActionResult, Controller,
    ControllerError, DefaultActionEvent, FireOutcome, BEFORE_DEFAULT_ACTION,
};
pub use registry::{ControllerManager, ControllerRegistry};
