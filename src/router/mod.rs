//! # Router Module
//!
//! Pattern routing for the application: recognising a URL (or history token)
//! as a parameter set, and generating a URL back from parameters.
//!
//! ## Overview
//!
//! The router is responsible for:
//! - Compiling `:segment` patterns into anchored regex matchers
//! - Matching URLs against the table in registration order (first match wins)
//! - Generating URLs from parameter sets and named routes
//! - Registering REST-style resource route sets
//!
//! ## Pattern language
//!
//! - A segment is `:` followed by one or more of `[A-Za-z0-9_]`.
//! - A segment matches `[a-zA-Z0-9_,]+` unless a condition is given for it
//!   (`RouteOptions::condition(":id", "[0-9]+")`).
//! - The whole URL must match; there is no prefix matching and no trailing
//!   slash normalization.
//!
//! ## Example
//!
//! ```rust
//! use switchyard::params;
//! use switchyard::router::{RouteOptions, Router};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut router = Router::new();
//! router.connect(":controller/:action/:id", RouteOptions::default())?;
//!
//! let params = router.recognise("users/edit/42").unwrap_or_default();
//! assert_eq!(params["controller"], "users");
//! assert_eq!(params["id"], "42");
//!
//! let url = router.url_for(&params! { "controller" => "users", "action" => "edit", "id" => 42 });
//! assert_eq!(url.as_deref(), Some("users/edit/42"));
//! # Ok(())
//! # }
//! ```

mod core;
mod inflect;
mod params;
mod route;
#[cfg(test)]
mod tests;

pub use core::{RouteError, Router, UrlTarget};
pub use inflect::{EnglishInflector, Inflector};
pub use params::{Identifiable, NamedParams, Params};
pub(crate) use params::scalar_to_string;
pub use route::{Route, RouteOptions, SegmentVec, DEFAULT_SEGMENT_PATTERN, MAX_INLINE_SEGMENTS};
