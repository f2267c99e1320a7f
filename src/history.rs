//! History / navigation collaborator.

use std::sync::RwLock;

use crate::events::EventChannel;

/// Where generated URLs go when the application navigates.
pub trait History: Send + Sync {
    /// Push a token onto the navigation history.
    fn add(&self, token: &str);

    /// Most recent token, if any.
    fn current(&self) -> Option<String>;
}

/// History kept in memory; raises `change` synchronously on every addition.
///
/// Useful headless (tests, CLI) and as the reference for what a browser-hash
/// adapter has to provide.
#[derive(Debug)]
pub struct MemoryHistory {
    tokens: RwLock<Vec<String>>,
    change: EventChannel<str>,
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHistory {
    #[must_use]
    pub fn new() -> Self {
        Self {
            tokens: RwLock::new(Vec::new()),
            change: EventChannel::new("change"),
        }
    }

    /// Channel receiving each raw token as it is added.
    #[must_use]
    pub fn change(&self) -> &EventChannel<str> {
        &self.change
    }

    /// All tokens, oldest first.
    #[must_use]
    pub fn tokens(&self) -> Vec<String> {
        self.tokens.read().map(|t| t.clone()).unwrap_or_default()
    }
}

impl History for MemoryHistory {
    fn add(&self, token: &str) {
        if let Ok(mut tokens) = self.tokens.write() {
            tokens.push(token.to_string());
        }
        self.change.fire(token);
    }

    fn current(&self) -> Option<String> {
        self.tokens.read().ok().and_then(|t| t.last().cloned())
    }
}
