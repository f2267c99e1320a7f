//! Call-shape recognisers for [`Dispatcher::dispatch`](super::Dispatcher::dispatch).

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::DispatchError;

/// Normalized dispatch request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchConfig {
    pub controller: String,
    pub action: String,
    #[serde(default)]
    pub arguments: Vec<Value>,
}

impl DispatchConfig {
    #[must_use]
    pub fn new(controller: impl Into<String>, action: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            controller: controller.into(),
            action: action.into(),
            arguments,
        }
    }
}

/// One accepted shape of dispatch arguments.
pub trait DispatchMatcher: Send + Sync {
    /// Short name used in logs and error messages.
    fn name(&self) -> &str;

    /// Whether this matcher understands `args`.
    fn matches(&self, args: &[Value]) -> bool;

    /// Normalize `args`; only called when [`matches`](Self::matches) was true.
    ///
    /// # Errors
    ///
    /// [`DispatchError::MalformedRequest`] if the shape looked right but the
    /// contents cannot be read.
    fn dispatch_config(&self, args: &[Value]) -> Result<DispatchConfig, DispatchError>;
}

impl std::fmt::Debug for dyn DispatchMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchMatcher").field("name", &self.name()).finish()
    }
}

/// Positional shape: `("users", "index", [arg, ...])`; the argument list is optional.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMatcher;

impl DispatchMatcher for DefaultMatcher {
    fn name(&self) -> &str {
        "default"
    }

    fn matches(&self, args: &[Value]) -> bool {
        match args {
            [Value::String(_), Value::String(_)] => true,
            [Value::String(_), Value::String(_), Value::Array(_)] => true,
            _ => false,
        }
    }

    fn dispatch_config(&self, args: &[Value]) -> Result<DispatchConfig, DispatchError> {
        match args {
            [Value::String(controller), Value::String(action), rest @ ..] => {
                let arguments = match rest.first() {
                    Some(Value::Array(items)) => items.clone(),
                    _ => Vec::new(),
                };
                Ok(DispatchConfig::new(controller.as_str(), action.as_str(), arguments))
            }
            _ => Err(DispatchError::MalformedRequest {
                matcher: self.name().to_string(),
                reason: "expected (controller, action, [arguments])".to_string(),
            }),
        }
    }
}

/// Object shape: `({"controller": .., "action": .., "arguments": [..]})`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectMatcher;

impl DispatchMatcher for ObjectMatcher {
    fn name(&self) -> &str {
        "object"
    }

    fn matches(&self, args: &[Value]) -> bool {
        match args {
            [Value::Object(map)] => {
                map.get("controller").is_some_and(Value::is_string)
                    && map.get("action").is_some_and(Value::is_string)
            }
            _ => false,
        }
    }

    fn dispatch_config(&self, args: &[Value]) -> Result<DispatchConfig, DispatchError> {
        let malformed = |reason: String| DispatchError::MalformedRequest {
            matcher: self.name().to_string(),
            reason,
        };
        match args {
            [object @ Value::Object(_)] => {
                serde_json::from_value(object.clone()).map_err(|e| malformed(e.to_string()))
            }
            _ => Err(malformed("expected a single dispatch object".to_string())),
        }
    }
}
