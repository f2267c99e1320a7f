use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

use super::core::Controller;

/// Looks up live controller instances by name.
pub trait ControllerRegistry: Send + Sync {
    fn get_controller(&self, name: &str) -> Option<Arc<Controller>>;
}

type ControllerFactory = Arc<dyn Fn() -> Controller + Send + Sync>;

/// Controller registry with eager instances and lazily built ones.
///
/// A factory runs the first time its controller is requested; the instance
/// is cached, so every later lookup returns the same controller.
#[derive(Default)]
pub struct ControllerManager {
    instances: DashMap<String, Arc<Controller>>,
    factories: RwLock<HashMap<String, ControllerFactory>>,
}

impl ControllerManager {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a ready-made controller under its own name.
    ///
    /// Replaces a previous instance of the same name.
    pub fn register(&self, controller: Controller) -> Arc<Controller> {
        let controller = Arc::new(controller);
        let name = controller.name().to_string();
        if self
            .instances
            .insert(name.clone(), Arc::clone(&controller))
            .is_some()
        {
            warn!(controller = %name, "Replaced existing controller instance");
        }
        info!(controller = %name, actions = ?controller.action_names(), "Controller registered");
        controller
    }

    /// Register a factory to build `name` on first use.
    pub fn register_factory<F>(&self, name: &str, factory: F)
    where
        F: Fn() -> Controller + Send + Sync + 'static,
    {
        if let Ok(mut factories) = self.factories.write() {
            factories.insert(name.to_string(), Arc::new(factory));
        }
        debug!(controller = %name, "Controller factory registered");
    }

    /// Names of every controller known to the manager, built or not.
    #[must_use]
    pub fn controller_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.instances.iter().map(|e| e.key().clone()).collect();
        if let Ok(factories) = self.factories.read() {
            names.extend(factories.keys().cloned());
        }
        names.sort();
        names.dedup();
        names
    }

    /// Whether `name` has been instantiated yet.
    #[must_use]
    pub fn is_instantiated(&self, name: &str) -> bool {
        self.instances.contains_key(name)
    }
}

impl ControllerRegistry for ControllerManager {
    fn get_controller(&self, name: &str) -> Option<Arc<Controller>> {
        if let Some(existing) = self.instances.get(name) {
            return Some(Arc::clone(existing.value()));
        }

        let factory = {
            let factories = self.factories.read().ok()?;
            Arc::clone(factories.get(name)?)
        };

        // Build outside the map so a factory may look up other controllers.
        let built = Arc::new(factory());
        let controller = self.instances.entry(name.to_string()).or_insert_with(|| {
            info!(controller = %name, "Controller instantiated");
            built
        });
        Some(Arc::clone(controller.value()))
    }
}
