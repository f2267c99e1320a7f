use anyhow::Context;
use std::path::Path;

use super::types::RoutesFile;
use crate::router::Router;

/// Serialization format of a route table file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutesFormat {
    Yaml,
    Toml,
    Json,
}

impl RoutesFormat {
    /// Pick the format from the file extension; anything unknown is JSON.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => RoutesFormat::Yaml,
            Some("toml") => RoutesFormat::Toml,
            _ => RoutesFormat::Json,
        }
    }
}

/// Parse a route table from text.
///
/// # Errors
///
/// Syntax errors and fields the file format does not know.
pub fn parse_routes_file(content: &str, format: RoutesFormat) -> anyhow::Result<RoutesFile> {
    let file = match format {
        RoutesFormat::Yaml => serde_yaml::from_str(content)?,
        RoutesFormat::Toml => toml::from_str(content)?,
        RoutesFormat::Json => serde_json::from_str(content)?,
    };
    Ok(file)
}

/// Read and parse a route table file.
///
/// # Errors
///
/// Unreadable files and parse failures, with the path attached.
pub fn load_routes_file(path: &Path) -> anyhow::Result<RoutesFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read routes file: {}", path.display()))?;
    parse_routes_file(&content, RoutesFormat::from_path(path))
        .with_context(|| format!("Failed to parse routes file: {}", path.display()))
}

/// Load a route table file straight into a [`Router`].
///
/// # Errors
///
/// See [`load_routes_file`] and [`RoutesFile::into_router`].
pub fn load_routes(path: impl AsRef<Path>) -> anyhow::Result<Router> {
    let path = path.as_ref();
    load_routes_file(path)?
        .into_router()
        .with_context(|| format!("Invalid routes file: {}", path.display()))
}
