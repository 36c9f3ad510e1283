//! Actions
//!
//! An action is plain data describing an intended state change. Every action
//! carries a type tag (conventionally `SCREAMING_SNAKE_CASE`) that reducers,
//! middleware and the mode guard use as discriminator.
//!
//! Typed applications model each action family as a closed enum and derive
//! the tag, e.g. with `strum::IntoStaticStr`:
//!
//! ```ignore
//! #[derive(Debug, Clone, strum::IntoStaticStr)]
//! #[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
//! enum CounterAction {
//!     Increment,
//!     Decrement,
//! }
//!
//! impl Action for CounterAction {
//!     fn action_type(&self) -> &str {
//!         let tag: &'static str = self.into();
//!         tag
//!     }
//! }
//! ```
//!
//! JSON-shaped callers use [`DynAction`] instead.

use crate::error::{Result, StoreError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Debug;

/// Something that can be dispatched to a store
pub trait Action: Debug + Send + Sync + 'static {
    /// The discriminator of this action
    fn action_type(&self) -> &str;
}

/// Check that an action carries a usable type tag
pub fn validate<A: Action + ?Sized>(action: &A) -> Result<()> {
    if action.action_type().trim().is_empty() {
        return Err(StoreError::invalid_action(format!(
            "action has no type: {:?}",
            action
        )));
    }
    Ok(())
}

/// Untyped action with an optional JSON payload
///
/// A missing `type` key deserializes to an empty tag, which the store rejects
/// with [`StoreError::InvalidAction`] at dispatch time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynAction {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    payload: Option<Value>,
}

impl DynAction {
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: impl Into<Value>) -> Self {
        self.payload = Some(payload.into());
        self
    }

    pub fn payload(&self) -> Option<&Value> {
        self.payload.as_ref()
    }

    /// Deserialize the payload into a concrete type
    ///
    /// Returns `None` when there is no payload or it has a different shape.
    pub fn payload_as<T: DeserializeOwned>(&self) -> Option<T> {
        self.payload
            .as_ref()
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }
}

impl Action for DynAction {
    fn action_type(&self) -> &str {
        &self.kind
    }
}

/// Build an action creator for a fixed type tag
///
/// ```ignore
/// let set_a = action_creator("SET_A");
/// store.dispatch(set_a(json!(5)))?;
/// ```
pub fn action_creator(kind: impl Into<String>) -> impl Fn(Value) -> DynAction + Send + Sync {
    let kind = kind.into();
    move |payload| DynAction::new(kind.clone()).with_payload(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug, strum::IntoStaticStr)]
    #[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
    enum TodoAction {
        AddTodo,
        ToggleTodo,
    }

    impl Action for TodoAction {
        fn action_type(&self) -> &str {
            let tag: &'static str = self.into();
            tag
        }
    }

    #[test]
    fn test_enum_action_type_tags() {
        assert_eq!(TodoAction::AddTodo.action_type(), "ADD_TODO");
        assert_eq!(TodoAction::ToggleTodo.action_type(), "TOGGLE_TODO");
        assert!(validate(&TodoAction::AddTodo).is_ok());
    }

    #[test]
    fn test_dyn_action_without_type_is_invalid() {
        let action: DynAction = serde_json::from_value(json!({ "payload": 5 })).unwrap();
        assert_eq!(action.action_type(), "");
        assert!(matches!(
            validate(&action),
            Err(StoreError::InvalidAction { .. })
        ));
    }

    #[test]
    fn test_blank_type_is_invalid() {
        assert!(validate(&DynAction::new("   ")).is_err());
    }

    #[test]
    fn test_action_creator() {
        let set_a = action_creator("SET_A");
        let action = set_a(json!(5));
        assert_eq!(action.action_type(), "SET_A");
        assert_eq!(action.payload_as::<i64>(), Some(5));
        assert_eq!(action.payload_as::<String>(), None);
    }

    #[test]
    fn test_dyn_action_serializes_type_key() {
        let value = serde_json::to_value(DynAction::new("RESET")).unwrap();
        assert_eq!(value, json!({ "type": "RESET" }));
    }
}
