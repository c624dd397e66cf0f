//! # World State
//!
//! A [`WorldState`] is a set of named facts. The same structure plays four
//! roles in planning:
//!
//! - **World state**: what the agent currently believes about the world
//! - **Goal**: the facts the agent wants to be true
//! - **Preconditions**: facts that must hold before an action applies
//! - **Effects**: facts an action writes when it completes
//!
//! Keys are unique. Writing an existing key replaces its value, and two
//! states are equal when they hold the same key/value pairs.
//!
//! ```
//! use goap_agent::WorldState;
//!
//! let mut current = WorldState::new();
//! current.set("hungry", true);
//! current.set("location", "quarters");
//!
//! let mut goal = WorldState::new();
//! goal.set("hungry", false);
//! assert!(!current.satisfies(&goal));
//!
//! let mut eat = WorldState::new();
//! eat.set("hungry", false);
//! current.apply_effects(&eat);
//!
//! assert!(current.satisfies(&goal));
//! assert_eq!(current.get_bool("hungry"), Some(false));
//! ```

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use crate::FactValue;

/// A mapping from fact name to [`FactValue`].
///
/// Backed by an ordered map so iteration and [`fmt::Display`] output are
/// deterministic across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorldState {
    facts: BTreeMap<String, FactValue>,
}

impl WorldState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self {
            facts: BTreeMap::new(),
        }
    }

    /// Sets a fact, replacing any previous value under the same key.
    ///
    /// ```
    /// use goap_agent::{FactValue, WorldState};
    ///
    /// let mut state = WorldState::new();
    /// state.set("food", 3);
    /// state.set("food", 2);
    /// assert_eq!(state.get("food"), Some(&FactValue::Int(2)));
    /// assert_eq!(state.len(), 1);
    /// ```
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FactValue>) {
        self.facts.insert(key.into(), value.into());
    }

    /// Builder form of [`WorldState::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FactValue>) -> Self {
        self.set(key, value);
        self
    }

    /// Value stored under `key`, if any.
    pub fn get(&self, key: &str) -> Option<&FactValue> {
        self.facts.get(key)
    }

    /// Returns the fact as a bool, or `None` if it is missing or not a bool.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.facts.get(key).and_then(FactValue::as_bool)
    }

    /// Removes a fact, returning its previous value.
    pub fn remove(&mut self, key: &str) -> Option<FactValue> {
        self.facts.remove(key)
    }

    /// Whether a fact named `key` is present, whatever its value.
    pub fn contains_key(&self, key: &str) -> bool {
        self.facts.contains_key(key)
    }

    /// Checks whether every fact in `required` is present here with an
    /// equal value. Extra facts in `self` are ignored, and an empty
    /// `required` is always satisfied.
    ///
    /// ```
    /// use goap_agent::WorldState;
    ///
    /// let state = WorldState::new().with("tired", true).with("hungry", false);
    ///
    /// assert!(state.satisfies(&WorldState::new().with("tired", true)));
    /// assert!(!state.satisfies(&WorldState::new().with("tired", false)));
    /// assert!(!state.satisfies(&WorldState::new().with("bored", true)));
    /// ```
    pub fn satisfies(&self, required: &WorldState) -> bool {
        required
            .facts
            .iter()
            .all(|(key, value)| self.facts.get(key) == Some(value))
    }

    /// Writes every fact of `effects` into this state, inserting new keys
    /// and overwriting existing ones.
    pub fn apply_effects(&mut self, effects: &WorldState) {
        for (key, value) in &effects.facts {
            self.facts.insert(key.clone(), value.clone());
        }
    }

    /// Returns a copy of this state with `effects` applied, leaving `self`
    /// untouched.
    pub fn with_effects(&self, effects: &WorldState) -> WorldState {
        let mut next = self.clone();
        next.apply_effects(effects);
        next
    }

    /// Iterates over the facts in key order.
    pub fn iter(&self) -> btree_map::Iter<'_, String, FactValue> {
        self.facts.iter()
    }

    /// Number of facts.
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Whether there are no facts.
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for WorldState
where
    K: Into<String>,
    V: Into<FactValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut state = WorldState::new();
        for (key, value) in iter {
            state.set(key, value);
        }
        state
    }
}

impl<'a> IntoIterator for &'a WorldState {
    type Item = (&'a String, &'a FactValue);
    type IntoIter = btree_map::Iter<'a, String, FactValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.facts.iter()
    }
}

/// Formats as `key:value, key:value` in key order.
impl fmt::Display for WorldState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in &self.facts {
            if !first {
                write!(f, ", ")?;
            }
            write!(f, "{}:{}", key, value)?;
            first = false;
        }
        Ok(())
    }
}
