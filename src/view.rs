//! View collaborator seam.
//!
//! The router/dispatch core never draws anything. When a controller has no
//! handler for an action it asks a [`ViewRenderer`] for a view of the same
//! name and, if one comes back, shows it.

use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Something that can be displayed.
pub trait View: Send {
    fn show(&self);
}

/// Resolves a view by controller and view name.
pub trait ViewRenderer: Send + Sync {
    /// Build the named view, or `None` if this renderer does not know it.
    fn render(&self, controller: &str, view_name: &str, args: &[Value]) -> Option<Box<dyn View>>;
}

type ViewFactory = Arc<dyn Fn(&[Value]) -> Box<dyn View> + Send + Sync>;

/// In-memory renderer keyed by `(controller, view name)`.
#[derive(Default)]
pub struct ViewRegistry {
    factories: RwLock<HashMap<(String, String), ViewFactory>>,
}

impl ViewRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a view factory for `controller` / `view_name`.
    pub fn register<F>(&self, controller: &str, view_name: &str, factory: F)
    where
        F: Fn(&[Value]) -> Box<dyn View> + Send + Sync + 'static,
    {
        if let Ok(mut factories) = self.factories.write() {
            factories.insert(
                (controller.to_string(), view_name.to_string()),
                Arc::new(factory),
            );
        }
    }
}

impl ViewRenderer for ViewRegistry {
    fn render(&self, controller: &str, view_name: &str, args: &[Value]) -> Option<Box<dyn View>> {
        let factory = {
            let factories = self.factories.read().ok()?;
            Arc::clone(factories.get(&(controller.to_string(), view_name.to_string()))?)
        };
        Some(factory(args))
    }
}
