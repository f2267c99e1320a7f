//! Router core: the ordered route table.
//!
//! Recognition and URL generation both walk the table in registration order
//! and the first route that produces a result wins. Neither treats "no match"
//! as an error; callers get `None` and move on.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::inflect::{EnglishInflector, Inflector};
use super::params::{NamedParams, Params};
use super::route::{Route, RouteOptions};
use crate::history::History;

/// Routing table construction and strict link building failures.
#[derive(Debug)]
pub enum RouteError {
    /// A pattern or one of its conditions did not compile.
    InvalidPattern {
        pattern: String,
        source: regex::Error,
    },
    /// [`Router::link_to`] could not build a URL for the target.
    Unroutable { target: String },
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::InvalidPattern { pattern, source } => {
                write!(f, "invalid route pattern '{}': {}", pattern, source)
            }
            RouteError::Unroutable { target } => {
                write!(f, "no route can generate a URL for {}", target)
            }
        }
    }
}

impl std::error::Error for RouteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RouteError::InvalidPattern { source, .. } => Some(source),
            RouteError::Unroutable { .. } => None,
        }
    }
}

/// What to build a URL for: a plain parameter set, or a named route plus its
/// (normalized) parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UrlTarget {
    Params(Params),
    Named { name: String, params: NamedParams },
}

impl UrlTarget {
    /// Named-route target.
    #[must_use]
    pub fn named(name: impl Into<String>, params: impl Into<NamedParams>) -> Self {
        UrlTarget::Named {
            name: name.into(),
            params: params.into(),
        }
    }
}

impl From<Params> for UrlTarget {
    fn from(params: Params) -> Self {
        UrlTarget::Params(params)
    }
}

impl fmt::Display for UrlTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlTarget::Params(p) => write!(f, "{:?}", p),
            UrlTarget::Named { name, params } => write!(f, "'{}' {:?}", name, params.0),
        }
    }
}

/// Ordered collection of [`Route`]s with named-route lookup.
///
/// One router per application; it is filled during startup and read during
/// normal operation.
#[derive(Clone)]
pub struct Router {
    routes: Vec<Arc<Route>>,
    named_routes: HashMap<String, Arc<Route>>,
    inflector: Arc<dyn Inflector>,
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("routes", &self.routes)
            .field("named_routes", &self.named_routes.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Default for Router {
    /// A router carrying the two default routes.
    fn default() -> Self {
        Self::with_default_routes()
    }
}

impl Router {
    /// Pattern of the first default route.
    pub const DEFAULT_ROUTE: &'static str = ":controller/:action";
    /// Pattern of the second default route.
    pub const DEFAULT_ROUTE_WITH_ID: &'static str = ":controller/:action/:id";

    /// An empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: Vec::new(),
            named_routes: HashMap::new(),
            inflector: Arc::new(EnglishInflector),
        }
    }

    /// A router recognising `:controller/:action` and `:controller/:action/:id`.
    #[must_use]
    pub fn with_default_routes() -> Self {
        let mut router = Self::new();
        router.connect_default_routes();
        router
    }

    /// Replace the text-transform collaborator used by [`resources`](Self::resources).
    #[must_use]
    pub fn with_inflector(mut self, inflector: Arc<dyn Inflector>) -> Self {
        self.inflector = inflector;
        self
    }

    /// Append the two default routes.
    pub fn connect_default_routes(&mut self) {
        for pattern in [Self::DEFAULT_ROUTE, Self::DEFAULT_ROUTE_WITH_ID] {
            // Default patterns carry no conditions and always compile.
            if let Ok(route) = Route::new(pattern, RouteOptions::default()) {
                self.routes.push(Arc::new(route));
            }
        }
    }

    /// Compile and append a route.
    ///
    /// # Errors
    ///
    /// [`RouteError::InvalidPattern`] if the pattern does not compile.
    pub fn connect(
        &mut self,
        pattern: impl Into<String>,
        options: RouteOptions,
    ) -> Result<Arc<Route>, RouteError> {
        let route = Arc::new(Route::new(pattern, options)?);
        self.routes.push(Arc::clone(&route));
        Ok(route)
    }

    /// [`connect`](Self::connect) and register the route under `route_name`.
    ///
    /// A later registration under the same name replaces the earlier lookup
    /// entry; both routes stay in the recognition table.
    ///
    /// # Errors
    ///
    /// [`RouteError::InvalidPattern`] if the pattern does not compile.
    pub fn name(
        &mut self,
        route_name: impl Into<String>,
        pattern: impl Into<String>,
        options: RouteOptions,
    ) -> Result<Arc<Route>, RouteError> {
        let route_name = route_name.into();
        let route = self.connect(pattern, options)?;
        if self
            .named_routes
            .insert(route_name.clone(), Arc::clone(&route))
            .is_some()
        {
            warn!(route_name = %route_name, "Named route replaced");
        }
        Ok(route)
    }

    /// Route for the empty URL; `action` defaults to `index`.
    ///
    /// # Errors
    ///
    /// [`RouteError::InvalidPattern`] if a condition does not compile.
    pub fn root(&mut self, options: RouteOptions) -> Result<Arc<Route>, RouteError> {
        let mut options = options;
        options
            .statics
            .entry("action".to_string())
            .or_insert_with(|| "index".to_string());
        self.connect("", options)
    }

    /// Register the four REST-style named routes for each resource name.
    ///
    /// For `videos`: `videos_path` (`videos`, index), `new_video_path`
    /// (`videos/new`, new), `video_path` (`videos/:id`, show) and
    /// `edit_video_path` (`videos/:id/edit`, edit). `:id` only matches digits.
    /// `options` is merged into all of them.
    ///
    /// # Errors
    ///
    /// [`RouteError::InvalidPattern`] if a supplied condition does not compile.
    pub fn resources(
        &mut self,
        resource_names: &[&str],
        options: RouteOptions,
    ) -> Result<(), RouteError> {
        for resource in resource_names {
            let singular = self.inflector.singularize(resource);
            let plural = self.inflector.pluralize(&singular);
            let base = RouteOptions::new().with("controller", *resource);

            let index = base.clone().with("action", "index").merged(&options);
            let new = base.clone().with("action", "new").merged(&options);
            let show = base
                .clone()
                .with("action", "show")
                .condition(":id", "[0-9]+")
                .merged(&options);
            let edit = base
                .with("action", "edit")
                .condition(":id", "[0-9]+")
                .merged(&options);

            self.name(format!("{plural}_path"), *resource, index)?;
            self.name(format!("new_{singular}_path"), format!("{resource}/new"), new)?;
            self.name(format!("{singular}_path"), format!("{resource}/:id"), show)?;
            self.name(
                format!("edit_{singular}_path"),
                format!("{resource}/:id/edit"),
                edit,
            )?;

            debug!(resource = %resource, plural = %plural, singular = %singular, "Resource routes registered");
        }
        Ok(())
    }

    /// Parameters of the first route recognising `url`.
    #[must_use]
    pub fn recognise(&self, url: &str) -> Option<Params> {
        let found = self
            .routes
            .iter()
            .enumerate()
            .find_map(|(idx, route)| route.matches_for(url).map(|p| (idx, route, p)));

        match found {
            Some((idx, route, params)) => {
                info!(
                    url = %url,
                    route_index = idx,
                    route_pattern = %route.pattern(),
                    params = ?params,
                    "Route matched"
                );
                Some(params)
            }
            None => {
                debug!(url = %url, routes_count = self.routes.len(), "No route matched");
                None
            }
        }
    }

    /// URL from the first route whose key set is exactly `options`' keys.
    #[must_use]
    pub fn url_for(&self, options: &Params) -> Option<String> {
        let url = self.routes.iter().find_map(|route| route.url_for(options));
        if url.is_none() {
            debug!(options = ?options, "No route generates a URL for options");
        }
        url
    }

    /// URL from the route registered as `route_name`.
    ///
    /// Static options of the named route may be omitted from `params`.
    #[must_use]
    pub fn url_for_named(&self, route_name: &str, params: impl Into<NamedParams>) -> Option<String> {
        let Some(route) = self.named_routes.get(route_name) else {
            debug!(route_name = %route_name, "Unknown named route");
            return None;
        };
        let params = params.into().into_params();
        let url = route.url_for_named(&params);
        if url.is_none() {
            debug!(route_name = %route_name, params = ?params, "Named route rejected params");
        }
        url
    }

    /// URL for either target shape.
    #[must_use]
    pub fn url_for_target(&self, target: &UrlTarget) -> Option<String> {
        match target {
            UrlTarget::Params(params) => self.url_for(params),
            UrlTarget::Named { name, params } => self.url_for_named(name, params.clone()),
        }
    }

    /// Strict URL builder for links that must exist.
    ///
    /// # Errors
    ///
    /// [`RouteError::Unroutable`] when no route can build the URL.
    pub fn link_to(&self, target: &UrlTarget) -> Result<String, RouteError> {
        self.url_for_target(target)
            .ok_or_else(|| RouteError::Unroutable {
                target: target.to_string(),
            })
    }

    /// Generate a URL and hand it to `history`. `false` if no URL was built.
    pub fn redirect_to(&self, target: &UrlTarget, history: &dyn History) -> bool {
        match self.url_for_target(target) {
            Some(url) => {
                info!(url = %url, "Redirecting");
                history.add(&url);
                true
            }
            None => false,
        }
    }

    /// Routes in registration order.
    #[must_use]
    pub fn routes(&self) -> &[Arc<Route>] {
        &self.routes
    }

    /// Route registered under `route_name`.
    #[must_use]
    pub fn named_route(&self, route_name: &str) -> Option<&Arc<Route>> {
        self.named_routes.get(route_name)
    }

    /// Name under which `route` is registered, if any.
    #[must_use]
    pub fn name_of(&self, route: &Arc<Route>) -> Option<&str> {
        self.named_routes
            .iter()
            .find(|(_, r)| Arc::ptr_eq(r, route))
            .map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Log the routing table at info level.
    pub fn dump_routes(&self) {
        info!(
            routes_count = self.routes.len(),
            named_count = self.named_routes.len(),
            "Routing table"
        );
        for (idx, route) in self.routes.iter().enumerate() {
            info!(
                route_index = idx,
                route_name = self.name_of(route).unwrap_or("-"),
                pattern = %route.pattern(),
                statics = ?route.static_options(),
                "Route"
            );
        }
    }
}
