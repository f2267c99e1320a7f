//! # Route Table Configuration
//!
//! Route tables can be declared in a file instead of code. YAML (`.yaml`,
//! `.yml`), TOML (`.toml`) and JSON (anything else) are accepted:
//!
//! ```yaml
//! default_routes: true
//! root: { controller: dashboard }
//! resources: [videos, users]
//! routes:
//!   - pattern: "reports/:year"
//!     name: yearly_report
//!     options: { controller: reports, action: year }
//!     conditions: { ":year": "[0-9]{4}" }
//! ```
//!
//! Registration order is `root`, `resources`, `routes`, then the default
//! routes, and recognition is first-match-wins, so put specific routes
//! before general ones.

mod load;
mod types;

pub use load::{load_routes, load_routes_file, parse_routes_file, RoutesFormat};
pub use types::{RouteEntry, RoutesFile};
