//! # Actions
//!
//! An action is something an agent can do: it has static preconditions and
//! effects used by the planner, a cost, and behaviour that runs tick by tick
//! once the action is part of a plan.
//!
//! The static part lives in [`ActionBase`]. Behaviour is supplied by
//! implementing the [`Action`] trait for a concrete type that embeds an
//! `ActionBase`. The trait is generic over the agent context `C` that the
//! action inspects while planning and mutates while performing.
//!
//! ```
//! use goap_agent::{Action, ActionBase, EntityId, Result};
//!
//! struct Ship {
//!     galley: Option<EntityId>,
//!     hunger: u32,
//! }
//!
//! struct Eat {
//!     base: ActionBase,
//!     done: bool,
//! }
//!
//! impl Eat {
//!     fn new() -> Result<Self> {
//!         let mut base = ActionBase::new("eat", 2.0)?.with_range_required(true);
//!         base.preconditions.set("hungry", true);
//!         base.effects.set("hungry", false);
//!         Ok(Self { base, done: false })
//!     }
//! }
//!
//! impl Action<Ship> for Eat {
//!     fn base(&self) -> &ActionBase {
//!         &self.base
//!     }
//!
//!     fn base_mut(&mut self) -> &mut ActionBase {
//!         &mut self.base
//!     }
//!
//!     fn reset(&mut self) {
//!         self.done = false;
//!     }
//!
//!     fn is_done(&self) -> bool {
//!         self.done
//!     }
//!
//!     fn check_procedural_precondition(&mut self, ship: &Ship) -> bool {
//!         match ship.galley {
//!             Some(galley) => {
//!                 self.base.set_target(galley);
//!                 true
//!             }
//!             None => false,
//!         }
//!     }
//!
//!     fn perform(&mut self, ship: &mut Ship) -> bool {
//!         ship.hunger = 0;
//!         self.done = true;
//!         true
//!     }
//! }
//!
//! let ship = Ship { galley: Some(EntityId(7)), hunger: 80 };
//! let mut eat = Eat::new().unwrap();
//! assert!(eat.check_procedural_precondition(&ship));
//! assert_eq!(eat.target(), Some(EntityId(7)));
//!
//! eat.do_reset();
//! assert_eq!(eat.target(), None);
//! ```

use std::fmt;

use crate::{FactValue, GoapError, Result, WorldState};

/// Identifier of an external entity an action acts upon, such as a vending
/// machine or a resting booth. The crate never interprets it; resolving it to
/// a position is the data provider's job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Position of an action inside an [`ActionRegistry`](crate::ActionRegistry).
///
/// Plans refer to actions by id and never own them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ActionId(pub(crate) usize);

impl ActionId {
    /// Position in the registry the id was issued by.
    pub fn index(self) -> usize {
        self.0
    }
}

/// Static data and runtime binding shared by every action.
///
/// `preconditions` and `effects` are public so they can be filled in right
/// after construction, in the same way the planner reads them. The cost is
/// validated and therefore only reachable through accessors.
#[derive(Debug, Clone)]
pub struct ActionBase {
    /// Name used for lookups and diagnostics
    pub name: String,
    /// Facts that must hold for the action to be planned
    pub preconditions: WorldState,
    /// Facts written by the action
    pub effects: WorldState,
    cost: f32,
    range_required: bool,
    target: Option<EntityId>,
    in_range: bool,
}

impl ActionBase {
    /// Creates a base with the given name and cost and no conditions.
    ///
    /// # Errors
    ///
    /// Returns [`GoapError::InvalidActionCost`] if `cost` is negative or NaN.
    ///
    /// ```
    /// use goap_agent::ActionBase;
    ///
    /// let rest = ActionBase::new("rest", 3.0).unwrap();
    /// assert_eq!(rest.cost(), 3.0);
    /// assert!(ActionBase::new("free", 0.0).is_ok());
    /// assert!(ActionBase::new("broken", -1.0).is_err());
    /// ```
    pub fn new(name: impl Into<String>, cost: f32) -> Result<Self> {
        validate_cost(cost)?;
        Ok(Self {
            name: name.into(),
            preconditions: WorldState::new(),
            effects: WorldState::new(),
            cost,
            range_required: false,
            target: None,
            in_range: false,
        })
    }

    /// Marks whether the agent has to reach the target before performing.
    pub fn with_range_required(mut self, required: bool) -> Self {
        self.range_required = required;
        self
    }

    /// Adds a precondition, replacing any previous value for `key`.
    pub fn with_precondition(
        mut self,
        key: impl Into<String>,
        value: impl Into<FactValue>,
    ) -> Self {
        self.preconditions.set(key, value);
        self
    }

    /// Adds an effect, replacing any previous value for `key`.
    pub fn with_effect(mut self, key: impl Into<String>, value: impl Into<FactValue>) -> Self {
        self.effects.set(key, value);
        self
    }

    /// Planning cost of the action.
    pub fn cost(&self) -> f32 {
        self.cost
    }

    /// Changes the cost.
    ///
    /// # Errors
    ///
    /// Returns [`GoapError::InvalidActionCost`] if `cost` is negative or NaN.
    pub fn set_cost(&mut self, cost: f32) -> Result<()> {
        validate_cost(cost)?;
        self.cost = cost;
        Ok(())
    }

    /// Whether `MoveTo` has to run before the action is performed.
    pub fn requires_in_range(&self) -> bool {
        self.range_required
    }

    /// Entity bound by the last procedural precondition check, if any.
    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    /// Binds the entity the action acts upon.
    pub fn set_target(&mut self, target: EntityId) {
        self.target = Some(target);
    }

    /// Unbinds the target and leaves the in-range flag alone.
    pub fn clear_target(&mut self) {
        self.target = None;
    }

    /// Whether the agent has reached the target since the last reset.
    pub fn is_in_range(&self) -> bool {
        self.in_range
    }

    /// Records that the agent has reached the target. Usually called by the
    /// data provider from `move_agent`.
    pub fn set_in_range(&mut self) {
        self.in_range = true;
    }

    /// Clears the target and the in-range flag.
    pub fn clear_binding(&mut self) {
        self.target = None;
        self.in_range = false;
    }

    /// Whether the preconditions hold in `state`.
    pub fn can_perform(&self, state: &WorldState) -> bool {
        state.satisfies(&self.preconditions)
    }

    /// Writes the effects into `state`.
    pub fn apply_effects(&self, state: &mut WorldState) {
        state.apply_effects(&self.effects);
    }
}

fn validate_cost(cost: f32) -> Result<()> {
    if cost.is_nan() || cost < 0.0 {
        return Err(GoapError::InvalidActionCost);
    }
    Ok(())
}

/// Behaviour of a concrete action, generic over the agent context `C`.
///
/// Implementors provide access to their [`ActionBase`] and the four
/// behaviour hooks. Everything else has a default that reads or writes the
/// base.
pub trait Action<C: ?Sized> {
    fn base(&self) -> &ActionBase;

    fn base_mut(&mut self) -> &mut ActionBase;

    /// Clears variant-specific progress. Called by [`Action::do_reset`]
    /// before every planning pass.
    fn reset(&mut self) {}

    fn is_done(&self) -> bool;

    /// Runtime check evaluated once per planning pass. May bind the target
    /// through [`ActionBase::set_target`].
    fn check_procedural_precondition(&mut self, agent: &C) -> bool;

    /// Runs one tick of the action. Returning `false` is a hard failure and
    /// aborts the current plan.
    fn perform(&mut self, agent: &mut C) -> bool;

    fn name(&self) -> &str {
        &self.base().name
    }

    fn cost(&self) -> f32 {
        self.base().cost()
    }

    fn preconditions(&self) -> &WorldState {
        &self.base().preconditions
    }

    fn effects(&self) -> &WorldState {
        &self.base().effects
    }

    fn requires_in_range(&self) -> bool {
        self.base().requires_in_range()
    }

    fn is_in_range(&self) -> bool {
        self.base().is_in_range()
    }

    fn set_in_range(&mut self) {
        self.base_mut().set_in_range();
    }

    fn target(&self) -> Option<EntityId> {
        self.base().target()
    }

    /// Returns the action to its pre-planning state: binding cleared, then
    /// [`Action::reset`].
    fn do_reset(&mut self) {
        self.base_mut().clear_binding();
        self.reset();
    }
}
