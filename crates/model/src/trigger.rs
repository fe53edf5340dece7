//! Derived trigger text for a flow's definition document.
//!
//! The definition arrives as an opaque serialized document that may be
//! absent or syntactically invalid; a broken definition only degrades this
//! one derived field, never the flow fetch itself.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Outcome of reading the trigger out of a flow definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerText {
    /// The first trigger declared by the definition.
    Named(String),
    /// The definition parsed but declares no triggers.
    NoTrigger,
    /// The definition is absent or not parseable.
    Unreadable,
}

impl std::fmt::Display for TriggerText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Named(name) => write!(f, "{name}"),
            Self::NoTrigger => write!(f, "No trigger"),
            Self::Unreadable => write!(f, "Unable to read definition"),
        }
    }
}

/// Memoization state for [`crate::Flow`]'s derived trigger text.
///
/// Kept as an explicit tagged state rather than a lazily-initialized cell:
/// once computed, the value holds for the instance's lifetime even if the
/// definition is later reassigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerState {
    Uncomputed,
    Computed(TriggerText),
}

/// Pure recompute: parse the definition and pick its first declared trigger.
///
/// A nested `properties.definition.triggers` map takes precedence over a
/// top-level `triggers` map. An empty or missing map is [`TriggerText::NoTrigger`];
/// anything that fails to parse is [`TriggerText::Unreadable`].
pub fn derive_trigger(definition: Option<&str>) -> TriggerText {
    let raw = match definition {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return TriggerText::Unreadable,
    };

    let doc: Value = match serde_json::from_str(raw) {
        Ok(doc) => doc,
        Err(_) => return TriggerText::Unreadable,
    };

    let triggers = doc
        .pointer("/properties/definition/triggers")
        .or_else(|| doc.get("triggers"));

    match triggers.and_then(Value::as_object) {
        Some(map) => match map.keys().next() {
            Some(first) => TriggerText::Named(first.clone()),
            None => TriggerText::NoTrigger,
        },
        None => TriggerText::NoTrigger,
    }
}
