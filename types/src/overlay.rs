//! Overlay (modal / video player) state machine.
//!
//! The site shows one promotional video overlay that can be open, minimized
//! to a corner player, or closed. State transitions are driven by explicit
//! events, and persistence goes through an injected [`KeyValueStore`] so the
//! state survives page navigation without reaching for a global.

use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlayState {
    #[default]
    Closed,
    Open,
    Minimized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayEvent {
    Open,
    Close,
    Minimize,
    Restore,
}

impl OverlayState {
    /// Next state for `event`, or `None` when the event does not apply.
    #[must_use]
    pub fn apply(self, event: OverlayEvent) -> Option<OverlayState> {
        match (self, event) {
            (OverlayState::Closed, OverlayEvent::Open) => Some(OverlayState::Open),
            (OverlayState::Open, OverlayEvent::Minimize) => Some(OverlayState::Minimized),
            (OverlayState::Minimized, OverlayEvent::Restore | OverlayEvent::Open) => {
                Some(OverlayState::Open)
            }
            (OverlayState::Open | OverlayState::Minimized, OverlayEvent::Close) => {
                Some(OverlayState::Closed)
            }
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            OverlayState::Closed => "closed",
            OverlayState::Open => "open",
            OverlayState::Minimized => "minimized",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "closed" => Some(OverlayState::Closed),
            "open" => Some(OverlayState::Open),
            "minimized" => Some(OverlayState::Minimized),
            _ => None,
        }
    }
}

/// Minimal string key-value persistence (session storage in the browser).
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
    fn remove(&mut self, key: &str);
}

/// In-process [`KeyValueStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&mut self, key: &str) {
        self.entries.remove(key);
    }
}

/// Owns one overlay's state and keeps the store in sync with it.
#[derive(Debug)]
pub struct OverlayController<S: KeyValueStore> {
    key: String,
    state: OverlayState,
    store: S,
}

impl<S: KeyValueStore> OverlayController<S> {
    /// Restore state from `store`; missing or unreadable values start closed.
    pub fn new(key: impl Into<String>, store: S) -> Self {
        let key = key.into();
        let state = store
            .get(&key)
            .as_deref()
            .and_then(OverlayState::parse)
            .unwrap_or_default();
        Self { key, state, store }
    }

    #[must_use]
    pub fn state(&self) -> OverlayState {
        self.state
    }

    /// Apply `event`. Returns `false` and leaves state untouched if it does not apply.
    pub fn handle(&mut self, event: OverlayEvent) -> bool {
        let Some(next) = self.state.apply(event) else {
            return false;
        };
        self.state = next;
        match next {
            OverlayState::Closed => self.store.remove(&self.key),
            other => self.store.set(&self.key, other.as_str()),
        }
        true
    }

    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }
}
