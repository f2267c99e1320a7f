use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use tracing::info;

use crate::router::{scalar_to_string, RouteOptions, Router};

/// One entry of the `routes` list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteEntry {
    pub pattern: String,
    /// Registers the route as a named route.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Static options; scalar values only.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, Value>,
    /// Segment conditions (`":id": "[0-9]+"`); the colon is optional.
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub conditions: HashMap<String, String>,
}

/// Route table file.
///
/// Registration order is `root`, `resources`, `routes`, then the default
/// routes when `default_routes` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoutesFile {
    #[serde(default)]
    pub default_routes: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<BTreeMap<String, Value>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub resources: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routes: Vec<RouteEntry>,
}

impl RouteEntry {
    /// Convert to router options.
    ///
    /// # Errors
    ///
    /// An option value that is an array, object or null.
    pub fn route_options(&self) -> anyhow::Result<RouteOptions> {
        let mut options = static_options(&self.options)
            .with_context(|| format!("Invalid options for route '{}'", self.pattern))?;
        for (segment, condition) in &self.conditions {
            options = options.condition(segment, condition.clone());
        }
        Ok(options)
    }
}

impl RoutesFile {
    /// Build a router from this table.
    ///
    /// # Errors
    ///
    /// Non-scalar option values and patterns or conditions that do not compile.
    pub fn into_router(self) -> anyhow::Result<Router> {
        let mut router = Router::new();

        if let Some(root) = &self.root {
            let options = static_options(root).context("Invalid root options")?;
            router.root(options)?;
        }

        if !self.resources.is_empty() {
            let names: Vec<&str> = self.resources.iter().map(String::as_str).collect();
            router.resources(&names, RouteOptions::default())?;
        }

        for entry in &self.routes {
            let options = entry.route_options()?;
            let registered = match &entry.name {
                Some(name) => router.name(name.as_str(), entry.pattern.as_str(), options),
                None => router.connect(entry.pattern.as_str(), options),
            };
            registered.with_context(|| format!("Failed to register route '{}'", entry.pattern))?;
        }

        if self.default_routes {
            router.connect_default_routes();
        }

        info!(
            routes_count = router.len(),
            resources = ?self.resources,
            default_routes = self.default_routes,
            "Routing table loaded"
        );
        Ok(router)
    }
}

fn static_options(values: &BTreeMap<String, Value>) -> anyhow::Result<RouteOptions> {
    let mut options = RouteOptions::new();
    for (key, value) in values {
        let value = scalar_to_string(value)
            .ok_or_else(|| anyhow!("option '{}' must be a string, number or boolean", key))?;
        options = options.with(key.as_str(), value);
    }
    Ok(options)
}
