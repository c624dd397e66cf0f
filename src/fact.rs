//! Typed fact values.
//!
//! A fact is a named piece of world knowledge. Names live in the
//! [`WorldState`](crate::WorldState) map; this module only defines the value
//! side, a small tagged variant so that facts of different kinds can share
//! one map without falling back to untyped objects.

use std::fmt;

/// The value of a single fact.
///
/// Two values are equal only when both the variant and the payload match,
/// so `Bool(true)` never equals `Int(1)`.
///
/// # Examples
///
/// ```
/// use goap_agent::FactValue;
///
/// assert_eq!(FactValue::from(true), FactValue::Bool(true));
/// assert_eq!(FactValue::from(3), FactValue::Int(3));
/// assert_eq!(FactValue::from("galley"), FactValue::Ident("galley".to_string()));
/// assert_ne!(FactValue::from(true), FactValue::from(1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FactValue {
    Bool(bool),
    Int(i64),
    /// Symbolic value such as a location or item name
    Ident(String),
}

impl FactValue {
    /// The value if this is a `Bool`.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FactValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The value if this is an `Int`.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            FactValue::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// The identifier if this is an `Ident`.
    pub fn as_ident(&self) -> Option<&str> {
        match self {
            FactValue::Ident(s) => Some(s),
            _ => None,
        }
    }
}

impl From<bool> for FactValue {
    fn from(value: bool) -> Self {
        FactValue::Bool(value)
    }
}

impl From<i64> for FactValue {
    fn from(value: i64) -> Self {
        FactValue::Int(value)
    }
}

impl From<i32> for FactValue {
    fn from(value: i32) -> Self {
        FactValue::Int(i64::from(value))
    }
}

impl From<&str> for FactValue {
    fn from(value: &str) -> Self {
        FactValue::Ident(value.to_string())
    }
}

impl From<String> for FactValue {
    fn from(value: String) -> Self {
        FactValue::Ident(value)
    }
}

impl fmt::Display for FactValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FactValue::Bool(b) => write!(f, "{}", b),
            FactValue::Int(i) => write!(f, "{}", i),
            FactValue::Ident(s) => write!(f, "{}", s),
        }
    }
}
