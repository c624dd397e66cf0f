//! Per-agent action registry.
//!
//! Actions are kept in insertion order. The planner enumerates them in that
//! order, which decides which plan wins when two plans cost the same, so the
//! order must be reproducible.

use crate::{Action, ActionId, GoapError, Result};

/// Insertion-ordered set of the actions one agent can perform.
pub struct ActionRegistry<C: ?Sized> {
    actions: Vec<Box<dyn Action<C>>>,
}

impl<C: ?Sized> ActionRegistry<C> {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            actions: Vec::new(),
        }
    }

    /// Appends an action and returns its id.
    pub fn add(&mut self, action: Box<dyn Action<C>>) -> ActionId {
        self.actions.push(action);
        ActionId(self.actions.len() - 1)
    }

    /// Looks an action up by id. `None` if the id is out of range.
    pub fn get(&self, id: ActionId) -> Option<&dyn Action<C>> {
        self.actions.get(id.0).map(|a| a.as_ref())
    }

    /// Mutable counterpart of [`ActionRegistry::get`].
    pub fn get_mut(&mut self, id: ActionId) -> Option<&mut (dyn Action<C> + 'static)> {
        self.actions.get_mut(id.0).map(|a| a.as_mut())
    }

    /// Finds the first action registered under `name`.
    pub fn find(&self, name: &str) -> Option<ActionId> {
        self.actions
            .iter()
            .position(|a| a.name() == name)
            .map(ActionId)
    }

    /// Removes the first action registered under `name`.
    ///
    /// Ids of actions registered after the removed one shift down by one, so
    /// ids held from before the call must not be reused.
    pub fn remove(&mut self, name: &str) -> Result<Box<dyn Action<C>>> {
        let id = self
            .find(name)
            .ok_or_else(|| GoapError::UnknownAction(name.to_string()))?;
        Ok(self.actions.remove(id.0))
    }

    /// Action names in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.actions.iter().map(|a| a.name()).collect()
    }

    /// Ids of every registered action, in registration order.
    pub fn ids(&self) -> impl Iterator<Item = ActionId> {
        (0..self.actions.len()).map(ActionId)
    }

    /// Iterates over `(id, action)` pairs in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (ActionId, &dyn Action<C>)> {
        self.actions
            .iter()
            .enumerate()
            .map(|(i, a)| (ActionId(i), a.as_ref()))
    }

    pub(crate) fn iter_mut(
        &mut self,
    ) -> impl Iterator<Item = (ActionId, &mut (dyn Action<C> + 'static))> {
        self.actions
            .iter_mut()
            .enumerate()
            .map(|(i, a)| (ActionId(i), a.as_mut()))
    }

    /// Number of registered actions.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether no action is registered.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl<C: ?Sized> Default for ActionRegistry<C> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ActionBase;

    struct Noop(ActionBase);

    impl Action<()> for Noop {
        fn base(&self) -> &ActionBase {
            &self.0
        }

        fn base_mut(&mut self) -> &mut ActionBase {
            &mut self.0
        }

        fn is_done(&self) -> bool {
            true
        }

        fn check_procedural_precondition(&mut self, _agent: &()) -> bool {
            true
        }

        fn perform(&mut self, _agent: &mut ()) -> bool {
            true
        }
    }

    fn noop(name: &str) -> Box<dyn Action<()>> {
        Box::new(Noop(ActionBase::new(name, 1.0).unwrap()))
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut registry = ActionRegistry::new();
        let a = registry.add(noop("a"));
        let b = registry.add(noop("b"));
        let c = registry.add(noop("c"));

        assert_eq!(registry.names(), ["a", "b", "c"]);
        assert_eq!((a.index(), b.index(), c.index()), (0, 1, 2));
        assert_eq!(registry.get(b).map(|x| x.name()), Some("b"));
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.ids().collect::<Vec<_>>(), [a, b, c]);
    }

    #[test]
    fn test_find_and_remove() {
        let mut registry = ActionRegistry::new();
        registry.add(noop("eat"));
        registry.add(noop("rest"));

        assert_eq!(registry.find("rest"), Some(ActionId(1)));
        assert_eq!(registry.find("sleep"), None);

        let removed = registry.remove("eat").unwrap();
        assert_eq!(removed.name(), "eat");
        assert_eq!(registry.find("rest"), Some(ActionId(0)));
        assert!(matches!(
            registry.remove("eat"),
            Err(GoapError::UnknownAction(name)) if name == "eat"
        ));
    }

    #[test]
    fn test_get_out_of_range() {
        let registry: ActionRegistry<()> = ActionRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.get(ActionId(0)).is_none());
    }
}
