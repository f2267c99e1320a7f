use anyhow::{anyhow, Context};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use crate::config::load_routes;
use crate::router::{Params, Router};

/// Command-line interface for switchyard route tables
#[derive(Parser, Debug)]
#[command(name = "switchyard")]
#[command(about = "Inspect and exercise switchyard route tables", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the route table in registration order
    Routes {
        /// Route table file (YAML, TOML or JSON)
        #[arg(short, long, env = "SWITCHYARD_ROUTES")]
        config: PathBuf,
    },
    /// Recognise a URL and print its parameters as JSON
    Recognise {
        /// Route table file (YAML, TOML or JSON)
        #[arg(short, long, env = "SWITCHYARD_ROUTES")]
        config: PathBuf,

        /// URL to recognise, without a leading `#`
        url: String,
    },
    /// Generate a URL from `key=value` parameters
    UrlFor {
        /// Route table file (YAML, TOML or JSON)
        #[arg(short, long, env = "SWITCHYARD_ROUTES")]
        config: PathBuf,

        /// Generate through this named route
        #[arg(short, long)]
        name: Option<String>,

        /// Parameters as `key=value`
        #[arg(value_parser = parse_key_value)]
        params: Vec<(String, String)>,
    },
}

/// Parse a `key=value` argument. The value may itself contain `=`.
///
/// # Errors
///
/// Missing `=` or an empty key.
pub fn parse_key_value(arg: &str) -> Result<(String, String), String> {
    match arg.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("expected key=value, got '{arg}'")),
    }
}

/// One line per route: index, name, pattern, static options.
#[must_use]
pub fn format_route_table(router: &Router) -> String {
    let mut out = String::new();
    for (idx, route) in router.routes().iter().enumerate() {
        let statics = route
            .static_options()
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&format!(
            "{:>3}  {:<24} {:<32} {}\n",
            idx,
            router.name_of(route).unwrap_or("-"),
            route.pattern(),
            statics
        ));
    }
    out
}

/// Recognise `url` (a leading `#` is ignored) and render the params as JSON.
///
/// # Errors
///
/// No route recognises the URL.
pub fn recognise_json(router: &Router, url: &str) -> anyhow::Result<String> {
    let url = url.strip_prefix('#').unwrap_or(url);
    let params = router
        .recognise(url)
        .ok_or_else(|| anyhow!("no route recognises '{url}'"))?;
    Ok(serde_json::to_string_pretty(&params)?)
}

/// Generate a URL, through `name` when given.
///
/// # Errors
///
/// Unknown route name, or no route accepts the parameters.
pub fn generate_url(
    router: &Router,
    name: Option<&str>,
    params: &[(String, String)],
) -> anyhow::Result<String> {
    let params: Params = params.iter().cloned().collect();
    let url = match name {
        Some(name) => {
            if router.named_route(name).is_none() {
                return Err(anyhow!("unknown named route '{name}'"));
            }
            router.url_for_named(name, params.clone())
        }
        None => router.url_for(&params),
    };
    url.ok_or_else(|| anyhow!("no route generates a URL for {:?}", params))
}

/// Execute the CLI command provided by the user
///
/// # Errors
///
/// Returns an error if:
/// - The route table file cannot be loaded or compiled
/// - `recognise` finds no matching route
/// - `url-for` cannot build a URL
pub fn run_cli(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Routes { config } => {
            let router = load(config)?;
            print!("{}", format_route_table(&router));
            Ok(())
        }
        Commands::Recognise { config, url } => {
            let router = load(config)?;
            println!("{}", recognise_json(&router, url)?);
            Ok(())
        }
        Commands::UrlFor {
            config,
            name,
            params,
        } => {
            let router = load(config)?;
            println!("{}", generate_url(&router, name.as_deref(), params)?);
            Ok(())
        }
    }
}

fn load(config: &Path) -> anyhow::Result<Router> {
    load_routes(config).with_context(|| format!("Failed to load routes from {}", config.display()))
}
