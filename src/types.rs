//! Core types - Values and bridge contracts.
//!
//! Everything that crosses the bridge is a [`Value`]: the store side computes
//! them, shadow cells hold them, installed properties hand them to the host.
//! The function aliases here are the two collaborator contracts:
//! - [`Getter`]/[`Setter`] - a binding's accessors, evaluated with the host
//!   instance as context
//! - [`SubscribeFn`] - the external store's subscription primitive

use std::rc::Rc;

use crate::instance::ComponentInstance;

// =============================================================================
// Value
// =============================================================================

/// A dynamic value mirrored across the bridge.
///
/// Shadow cells hold exactly one `Value`; equality (`PartialEq`) is what the
/// tracking system uses to decide whether a write should re-trigger
/// dependents. Cells start as [`Value::Null`] until the first subscription
/// emission arrives.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Value {
    /// Absent / not yet emitted.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
}

impl Value {
    /// Whether this is [`Value::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// The boolean payload, if any.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer payload, if any.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// The float payload, if any.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// The string payload, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// The list payload, if any.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(value as i64)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Str(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Str(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::List(items)
    }
}

// =============================================================================
// Binding Accessors
// =============================================================================

/// A binding's getter, evaluated with the host instance as context.
///
/// The getter is expected to read from the external store (so the store's
/// subscription primitive can track it); it may also read the instance's own
/// bound properties through the context parameter.
pub type Getter = Rc<dyn Fn(&ComponentInstance) -> Value>;

/// A binding's setter, invoked with the host instance as context.
///
/// Expected to mutate the external store. The shadow cell is never written
/// here; it only updates when the store notifies the subscription.
pub type Setter = Rc<dyn Fn(&ComponentInstance, Value)>;

// =============================================================================
// Subscription Contract
// =============================================================================

/// The computation a subscription tracks.
pub type Compute = Box<dyn Fn() -> Value>;

/// The emission callback invoked with each recomputed value.
pub type OnEmit = Box<dyn Fn(Value)>;

/// Teardown handle for one subscription. Consumed exactly once.
pub type Disposer = Box<dyn FnOnce()>;

/// The external store's subscription primitive:
/// `subscribe(compute, on_emit, fire_immediately) -> disposer`.
///
/// When `fire_immediately` is true the first computed value must be delivered
/// before the call returns; afterwards `on_emit` runs on every change to any
/// value the computation transitively read.
pub type SubscribeFn = Rc<dyn Fn(Compute, OnEmit, bool) -> Disposer>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_null() {
        assert_eq!(Value::default(), Value::Null);
        assert!(Value::default().is_null());
        assert!(!Value::Int(0).is_null());
    }

    #[test]
    fn test_from_impls() {
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from(3i64), Value::Int(3));
        assert_eq!(Value::from(3i32), Value::Int(3));
        assert_eq!(Value::from(1.5f64), Value::Float(1.5));
        assert_eq!(Value::from("hi"), Value::Str("hi".to_string()));
        assert_eq!(Value::from("hi".to_string()), Value::Str("hi".to_string()));
        assert_eq!(
            Value::from(vec![Value::Int(1)]),
            Value::List(vec![Value::Int(1)])
        );
    }

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(7).as_int(), Some(7));
        assert_eq!(Value::Float(0.5).as_float(), Some(0.5));
        assert_eq!(Value::Str("s".into()).as_str(), Some("s"));
        assert_eq!(
            Value::List(vec![Value::Null]).as_list(),
            Some(&[Value::Null][..])
        );

        // Mismatched shapes read as None
        assert_eq!(Value::Null.as_int(), None);
        assert_eq!(Value::Int(1).as_str(), None);
        assert_eq!(Value::Str("1".into()).as_int(), None);
    }

    #[test]
    fn test_equality_gates_on_payload() {
        assert_eq!(Value::Int(2), Value::Int(2));
        assert_ne!(Value::Int(2), Value::Int(3));
        assert_ne!(Value::Int(2), Value::Float(2.0));
    }
}
