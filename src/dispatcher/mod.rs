//! # Dispatcher Module
//!
//! Turns a dispatch call into a controller action invocation.
//!
//! ## Overview
//!
//! A dispatch call can arrive in more than one shape. Each accepted shape is
//! a [`DispatchMatcher`]; the first matcher that recognises the arguments
//! normalizes them into a [`DispatchConfig`] (`controller`, `action`,
//! `arguments`). Two shapes are built in:
//!
//! - positional: `["users", "index", [..]]` ([`DefaultMatcher`])
//! - object: `[{"controller": "users", "action": "index", "arguments": [..]}]`
//!   ([`ObjectMatcher`])
//!
//! ## Request Flow
//!
//! 1. First matching matcher → `DispatchConfig`
//! 2. `beforedispatch` raised; any listener may cancel (silent stop)
//! 3. Controller looked up in the [`ControllerRegistry`](crate::controller::ControllerRegistry)
//! 4. Action looked up on the controller
//! 5. Action called with the normalized arguments, result returned
//!
//! ## Error Handling
//!
//! This is the strict path: an unknown call shape, controller or action is a
//! [`DispatchError`]. The application-level dispatch is lenient and quietly
//! ignores an unknown controller; both levels exist on purpose.

mod core;
mod error;
mod matchers;

pub use core::{BeforeDispatch, Dispatcher, BEFORE_DISPATCH};
pub use error::DispatchError;
pub use matchers::{DefaultMatcher, DispatchConfig, DispatchMatcher, ObjectMatcher};
