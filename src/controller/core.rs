//! Controller action registry and the `fire_action` state machine.

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};
use tracing::{debug, info, warn};

use crate::events::{EventChannel, Signal};
use crate::view::ViewRenderer;

/// Result returned by an action handler.
pub type ActionResult = anyhow::Result<Value>;

/// Shared, callable action handler.
pub type ActionHandler = Arc<dyn Fn(&ActionCall<'_>) -> ActionResult + Send + Sync>;

/// Name of the cancellable channel raised before an unhandled action falls
/// back to a view.
pub const BEFORE_DEFAULT_ACTION: &str = "beforedefaultaction";

/// Everything a handler sees when it runs.
#[derive(Clone, Copy)]
pub struct ActionCall<'a> {
    /// Controller the action belongs to.
    pub controller: &'a Controller,
    pub action: &'a str,
    /// Caller-supplied scope value; `None` means "the controller itself".
    pub scope: Option<&'a Value>,
    pub args: &'a [Value],
}

/// Flags for [`Controller::register_action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionOptions {
    /// Declare a cancellable `before_<action>` channel.
    pub before_filter: bool,
    /// Declare an `after_<action>` channel.
    pub after_filter: bool,
    /// Replace an already registered handler of the same name.
    pub overwrite: bool,
}

impl Default for ActionOptions {
    fn default() -> Self {
        Self {
            before_filter: true,
            after_filter: true,
            overwrite: true,
        }
    }
}

impl ActionOptions {
    /// Keep an existing handler rather than replacing it.
    #[must_use]
    pub fn keep_existing() -> Self {
        Self {
            overwrite: false,
            ..Self::default()
        }
    }

    /// No before/after channels.
    #[must_use]
    pub fn without_filters() -> Self {
        Self {
            before_filter: false,
            after_filter: false,
            overwrite: true,
        }
    }
}

/// Payload of `before_<action>` and `after_<action>`.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionEvent {
    pub controller: String,
    pub action: String,
    pub args: Vec<Value>,
}

/// Payload of `beforedefaultaction`.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultActionEvent {
    pub controller: String,
    pub action: String,
    pub scope: Option<Value>,
    pub args: Vec<Value>,
}

/// How a `fire_action` call ended.
#[derive(Debug, Clone, PartialEq)]
pub enum FireOutcome {
    /// The registered handler ran and returned this value.
    Completed(Value),
    /// A before-filter (or `beforedefaultaction`) listener cancelled.
    Cancelled,
    /// No handler; a view of the same name was found and shown.
    Rendered(String),
    /// No handler and no view. Not an error.
    NoView,
}

/// Controller-level failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerError {
    /// An explicit render asked for a view the renderer does not know.
    ViewNotFound { controller: String, view: String },
    /// A listener was attached to a channel that was never declared.
    UnknownEvent { controller: String, event: String },
    /// Direct invocation of an action that is not registered.
    ActionNotFound { controller: String, action: String },
}

impl fmt::Display for ControllerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControllerError::ViewNotFound { controller, view } => {
                write!(f, "view '{}' not found for controller '{}'", view, controller)
            }
            ControllerError::UnknownEvent { controller, event } => {
                write!(f, "controller '{}' has no event '{}'", controller, event)
            }
            ControllerError::ActionNotFound { controller, action } => {
                write!(f, "action '{}' not found on controller '{}'", action, controller)
            }
        }
    }
}

impl std::error::Error for ControllerError {}

/// A named controller: its actions, their filter channels and an optional
/// view renderer for the fallback branch.
pub struct Controller {
    name: String,
    actions: RwLock<HashMap<String, ActionHandler>>,
    events: RwLock<HashMap<String, Arc<EventChannel<ActionEvent>>>>,
    before_default_action: EventChannel<DefaultActionEvent>,
    views: Option<Arc<dyn ViewRenderer>>,
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("name", &self.name)
            .field("actions", &self.action_names())
            .field("has_views", &self.views.is_some())
            .finish()
    }
}

impl Controller {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            actions: RwLock::new(HashMap::new()),
            events: RwLock::new(HashMap::new()),
            before_default_action: EventChannel::new(BEFORE_DEFAULT_ACTION),
            views: None,
        }
    }

    /// Attach the renderer used by the fallback branch and [`render`](Self::render).
    #[must_use]
    pub fn with_views(mut self, views: Arc<dyn ViewRenderer>) -> Self {
        self.views = Some(views);
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register `handler` under `action`.
    ///
    /// Returns `false` (and changes nothing) when the action already exists
    /// and `options.overwrite` is off. Filter channels that already exist are
    /// kept along with their listeners.
    pub fn register_action<F>(&self, action: &str, handler: F, options: ActionOptions) -> bool
    where
        F: Fn(&ActionCall<'_>) -> ActionResult + Send + Sync + 'static,
    {
        let Ok(mut actions) = self.actions.write() else {
            return false;
        };
        if !options.overwrite && actions.contains_key(action) {
            debug!(controller = %self.name, action = %action, "Action already registered - kept existing");
            return false;
        }
        if actions.insert(action.to_string(), Arc::new(handler)).is_some() {
            debug!(controller = %self.name, action = %action, "Action handler replaced");
        }
        drop(actions);

        if let Ok(mut events) = self.events.write() {
            if options.before_filter {
                let name = before_event(action);
                events
                    .entry(name.clone())
                    .or_insert_with(|| Arc::new(EventChannel::new(name)));
            }
            if options.after_filter {
                let name = after_event(action);
                events
                    .entry(name.clone())
                    .or_insert_with(|| Arc::new(EventChannel::new(name)));
            }
        }
        true
    }

    #[must_use]
    pub fn has_action(&self, action: &str) -> bool {
        self.actions
            .read()
            .map(|a| a.contains_key(action))
            .unwrap_or(false)
    }

    /// Registered action names, sorted.
    #[must_use]
    pub fn action_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .actions
            .read()
            .map(|a| a.keys().cloned().collect())
            .unwrap_or_default();
        names.sort();
        names
    }

    /// Handler registered for `action`.
    #[must_use]
    pub fn handler(&self, action: &str) -> Option<ActionHandler> {
        self.actions.read().ok()?.get(action).map(Arc::clone)
    }

    /// Declared action channel (`before_<action>` / `after_<action>`).
    #[must_use]
    pub fn event(&self, event: &str) -> Option<Arc<EventChannel<ActionEvent>>> {
        self.events.read().ok()?.get(event).map(Arc::clone)
    }

    /// Subscribe to a declared action channel.
    ///
    /// # Errors
    ///
    /// [`ControllerError::UnknownEvent`] if the channel was never declared.
    pub fn on<F>(&self, event: &str, listener: F) -> Result<(), ControllerError>
    where
        F: Fn(&ActionEvent) -> Signal + Send + Sync + 'static,
    {
        match self.event(event) {
            Some(channel) => {
                channel.on(listener);
                Ok(())
            }
            None => Err(ControllerError::UnknownEvent {
                controller: self.name.clone(),
                event: event.to_string(),
            }),
        }
    }

    /// Subscribe to `before_<action>`.
    ///
    /// # Errors
    ///
    /// [`ControllerError::UnknownEvent`] if the action has no before filter.
    pub fn before<F>(&self, action: &str, listener: F) -> Result<(), ControllerError>
    where
        F: Fn(&ActionEvent) -> Signal + Send + Sync + 'static,
    {
        self.on(&before_event(action), listener)
    }

    /// Subscribe to `after_<action>`.
    ///
    /// # Errors
    ///
    /// [`ControllerError::UnknownEvent`] if the action has no after filter.
    pub fn after<F>(&self, action: &str, listener: F) -> Result<(), ControllerError>
    where
        F: Fn(&ActionEvent) + Send + Sync + 'static,
    {
        self.on(&after_event(action), move |event| {
            listener(event);
            Signal::Continue
        })
    }

    /// The `beforedefaultaction` channel.
    #[must_use]
    pub fn before_default_action(&self) -> &EventChannel<DefaultActionEvent> {
        &self.before_default_action
    }

    /// Run `action`.
    ///
    /// With a registered handler: raise `before_<action>` (cancellable), run
    /// the handler, raise `after_<action>`. Without one: raise
    /// `beforedefaultaction` (cancellable) and show a view named after the
    /// action if the renderer has one. A missing view is not an error.
    ///
    /// # Errors
    ///
    /// Whatever the handler returns as an error. The after filter does not
    /// fire for a failed handler.
    pub fn fire_action(
        &self,
        action: &str,
        scope: Option<&Value>,
        args: &[Value],
    ) -> anyhow::Result<FireOutcome> {
        let Some(handler) = self.handler(action) else {
            return Ok(self.fire_default_action(action, scope, args));
        };

        let event = ActionEvent {
            controller: self.name.clone(),
            action: action.to_string(),
            args: args.to_vec(),
        };

        if let Some(before) = self.event(&before_event(action)) {
            if !before.fire(&event) {
                info!(controller = %self.name, action = %action, "Action cancelled by before filter");
                return Ok(FireOutcome::Cancelled);
            }
        }

        debug!(controller = %self.name, action = %action, args_count = args.len(), "Action start");
        let value = handler(&ActionCall {
            controller: self,
            action,
            scope,
            args,
        })?;
        debug!(controller = %self.name, action = %action, "Action complete");

        if let Some(after) = self.event(&after_event(action)) {
            after.fire(&event);
        }

        Ok(FireOutcome::Completed(value))
    }

    fn fire_default_action(&self, action: &str, scope: Option<&Value>, args: &[Value]) -> FireOutcome {
        let event = DefaultActionEvent {
            controller: self.name.clone(),
            action: action.to_string(),
            scope: scope.cloned(),
            args: args.to_vec(),
        };
        if !self.before_default_action.fire(&event) {
            info!(controller = %self.name, action = %action, "Default action cancelled");
            return FireOutcome::Cancelled;
        }

        let view = self
            .views
            .as_ref()
            .and_then(|views| views.render(&self.name, action, args));
        match view {
            Some(view) => {
                view.show();
                debug!(controller = %self.name, view = %action, "Fallback view shown");
                FireOutcome::Rendered(action.to_string())
            }
            None => {
                debug!(controller = %self.name, action = %action, "No handler and no view - nothing to do");
                FireOutcome::NoView
            }
        }
    }

    /// Call a handler directly, with no filters.
    ///
    /// # Errors
    ///
    /// [`ControllerError::ActionNotFound`] for an unknown action, otherwise the
    /// handler's own error.
    pub fn invoke(&self, action: &str, scope: Option<&Value>, args: &[Value]) -> ActionResult {
        let handler = self.handler(action).ok_or_else(|| ControllerError::ActionNotFound {
            controller: self.name.clone(),
            action: action.to_string(),
        })?;
        handler(&ActionCall {
            controller: self,
            action,
            scope,
            args,
        })
    }

    /// Explicitly render and show a view.
    ///
    /// # Errors
    ///
    /// [`ControllerError::ViewNotFound`] when there is no renderer or it has
    /// no such view.
    pub fn render(&self, view_name: &str, args: &[Value]) -> Result<(), ControllerError> {
        let view = self
            .views
            .as_ref()
            .and_then(|views| views.render(&self.name, view_name, args));
        match view {
            Some(view) => {
                view.show();
                Ok(())
            }
            None => {
                warn!(controller = %self.name, view = %view_name, "View not found");
                Err(ControllerError::ViewNotFound {
                    controller: self.name.clone(),
                    view: view_name.to_string(),
                })
            }
        }
    }
}

fn before_event(action: &str) -> String {
    format!("before_{action}")
}

fn after_event(action: &str) -> String {
    format!("after_{action}")
}
