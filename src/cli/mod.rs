//! # CLI Module
//!
//! Command-line tooling for inspecting a route table file without writing
//! an application around it.
//!
//! ## Commands
//!
//! ### `routes`
//!
//! Print the table in registration order:
//!
//! ```bash
//! switchyard routes --config routes.yaml
//! ```
//!
//! ### `recognise`
//!
//! Print the parameters recognised for a URL as JSON:
//!
//! ```bash
//! switchyard recognise --config routes.yaml videos/42/edit
//! ```
//!
//! ### `url-for`
//!
//! Generate a URL from parameters, optionally through a named route:
//!
//! ```bash
//! switchyard url-for --config routes.yaml controller=videos action=list
//! switchyard url-for --config routes.yaml --name video_path id=42
//! ```
//!
//! `recognise` and `url-for` exit non-zero when nothing matches.
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use switchyard::cli::{Cli, run_cli};
//! use clap::Parser;
//!
//! run_cli(Cli::parse())?;
//! ```

mod commands;


pub use commands::{
    format_route_table, generate_url, parse_key_value, recognise_json, run_cli, Cli, Commands,
};
