//! Dispatcher core: call-shape normalization and strict controller/action
//! resolution.

use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

use super::error::DispatchError;
use super::matchers::{DefaultMatcher, DispatchConfig, DispatchMatcher, ObjectMatcher};
use crate::controller::ControllerRegistry;
use crate::events::EventChannel;
use crate::ids::DispatchId;

/// Name of the cancellable channel raised before a dispatch runs.
pub const BEFORE_DISPATCH: &str = "beforedispatch";

/// Payload of `beforedispatch`.
#[derive(Debug, Clone, PartialEq)]
pub struct BeforeDispatch {
    pub dispatch_id: DispatchId,
    /// Arguments exactly as passed to `dispatch`.
    pub raw_args: Vec<Value>,
    /// Name of the matcher that accepted them.
    pub matcher: String,
    pub config: DispatchConfig,
}

/// Strict dispatcher.
///
/// Tries matchers in registration order, raises `beforedispatch`, then
/// resolves the controller and action and invokes the action without its
/// filters. An unknown controller or action is an error here, unlike the lenient
/// [`Application::dispatch`](crate::app::Application::dispatch).
pub struct Dispatcher {
    matchers: Vec<Arc<dyn DispatchMatcher>>,
    before_dispatch: EventChannel<BeforeDispatch>,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("matchers", &self.matcher_names())
            .field("before_dispatch", &self.before_dispatch)
            .finish()
    }
}

impl Dispatcher {
    /// Dispatcher accepting the positional and the object call shapes.
    #[must_use]
    pub fn new() -> Self {
        let mut dispatcher = Self::without_matchers();
        dispatcher.register_matcher(Arc::new(DefaultMatcher));
        dispatcher.register_matcher(Arc::new(ObjectMatcher));
        dispatcher
    }

    /// Dispatcher with no matchers; every call fails until one is registered.
    #[must_use]
    pub fn without_matchers() -> Self {
        Self {
            matchers: Vec::new(),
            before_dispatch: EventChannel::new(BEFORE_DISPATCH),
        }
    }

    /// Append a matcher. Earlier matchers take precedence.
    pub fn register_matcher(&mut self, matcher: Arc<dyn DispatchMatcher>) {
        debug!(matcher = %matcher.name(), position = self.matchers.len(), "Dispatch matcher registered");
        self.matchers.push(matcher);
    }

    #[must_use]
    pub fn matcher_names(&self) -> Vec<&str> {
        self.matchers.iter().map(|m| m.name()).collect()
    }

    /// The `beforedispatch` channel.
    #[must_use]
    pub fn before_dispatch(&self) -> &EventChannel<BeforeDispatch> {
        &self.before_dispatch
    }

    /// Normalize `args` with the first matcher that accepts them.
    ///
    /// # Errors
    ///
    /// [`DispatchError::NoMatchingDispatchFormat`] when no matcher accepts the
    /// shape, or the matcher's own [`DispatchError::MalformedRequest`].
    pub fn resolve(
        &self,
        args: &[Value],
    ) -> Result<(Arc<dyn DispatchMatcher>, DispatchConfig), DispatchError> {
        let Some(matcher) = self.matchers.iter().find(|m| m.matches(args)) else {
            warn!(args = ?args, matchers = ?self.matcher_names(), "No dispatch matcher accepts arguments");
            return Err(DispatchError::NoMatchingDispatchFormat {
                args: args.to_vec(),
            });
        };
        let config = matcher.dispatch_config(args)?;
        Ok((Arc::clone(matcher), config))
    }

    /// Resolve and run a dispatch.
    ///
    /// Returns `Ok(None)` when a `beforedispatch` listener cancelled, and
    /// `Ok(Some(value))` with the action's return value otherwise.
    ///
    /// # Errors
    ///
    /// See [`DispatchError`]: unknown call shape, unknown controller, unknown
    /// action, or the action's own failure.
    pub fn dispatch(
        &self,
        controllers: &dyn ControllerRegistry,
        args: &[Value],
    ) -> Result<Option<Value>, DispatchError> {
        let dispatch_id = DispatchId::new();
        let (matcher, config) = self.resolve(args)?;

        debug!(
            dispatch_id = %dispatch_id,
            matcher = %matcher.name(),
            controller = %config.controller,
            action = %config.action,
            "Dispatch resolved"
        );

        let event = BeforeDispatch {
            dispatch_id,
            raw_args: args.to_vec(),
            matcher: matcher.name().to_string(),
            config,
        };
        if !self.before_dispatch.fire(&event) {
            info!(dispatch_id = %dispatch_id, controller = %event.config.controller, action = %event.config.action, "Dispatch cancelled");
            return Ok(None);
        }
        let config = event.config;

        let Some(controller) = controllers.get_controller(&config.controller) else {
            error!(dispatch_id = %dispatch_id, controller = %config.controller, "Controller not found");
            return Err(DispatchError::ControllerNotFound {
                controller: config.controller,
            });
        };

        if controller.handler(&config.action).is_none() {
            error!(
                dispatch_id = %dispatch_id,
                controller = %config.controller,
                action = %config.action,
                available_actions = ?controller.action_names(),
                "Action not found"
            );
            return Err(DispatchError::ActionNotFound {
                controller: config.controller,
                action: config.action,
            });
        }

        let start = Instant::now();
        let result = controller.invoke(&config.action, None, &config.arguments);
        let elapsed_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);

        match result {
            Ok(value) => {
                info!(
                    dispatch_id = %dispatch_id,
                    controller = %config.controller,
                    action = %config.action,
                    elapsed_us = elapsed_us,
                    "Dispatch complete"
                );
                Ok(Some(value))
            }
            Err(source) => {
                error!(
                    dispatch_id = %dispatch_id,
                    controller = %config.controller,
                    action = %config.action,
                    error = %source,
                    "Action failed"
                );
                Err(DispatchError::Action {
                    controller: config.controller,
                    action: config.action,
                    source,
                })
            }
        }
    }
}
