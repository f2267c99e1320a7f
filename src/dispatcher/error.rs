use serde_json::Value;
use std::fmt;

/// Failures of the strict dispatch path.
///
/// All of these point at application wiring (a bad call shape, a controller
/// or action that does not exist) rather than at user navigation.
#[derive(Debug)]
pub enum DispatchError {
    /// No registered matcher accepts this call shape.
    NoMatchingDispatchFormat { args: Vec<Value> },
    /// A matcher accepted the call shape but could not normalize it.
    MalformedRequest { matcher: String, reason: String },
    /// The controller registry has no controller of this name.
    ControllerNotFound { controller: String },
    /// The controller exists but has no such action.
    ActionNotFound { controller: String, action: String },
    /// The action ran and returned an error.
    Action {
        controller: String,
        action: String,
        source: anyhow::Error,
    },
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::NoMatchingDispatchFormat { args } => {
                let rendered = serde_json::to_string(args).unwrap_or_else(|_| format!("{:?}", args));
                write!(f, "no dispatch matcher accepts arguments {}", rendered)
            }
            DispatchError::MalformedRequest { matcher, reason } => {
                write!(f, "dispatch matcher '{}' could not read request: {}", matcher, reason)
            }
            DispatchError::ControllerNotFound { controller } => {
                write!(f, "controller '{}' not found", controller)
            }
            DispatchError::ActionNotFound { controller, action } => {
                write!(f, "action '{}' not found on controller '{}'", action, controller)
            }
            DispatchError::Action {
                controller,
                action,
                source,
            } => {
                write!(f, "action '{}#{}' failed: {}", controller, action, source)
            }
        }
    }
}

impl std::error::Error for DispatchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DispatchError::Action { source, .. } => Some(&**source),
            _ => None,
        }
    }
}
