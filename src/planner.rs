//! # Planner
//!
//! The planner turns an agent's action registry, a snapshot of the world and
//! a goal into the cheapest ordered list of actions that reaches the goal.
//!
//! A planning pass runs in three steps:
//!
//! 1. every registered action is reset, clearing targets and progress left
//!    over from the previous plan
//! 2. each action's procedural precondition is evaluated against the agent;
//!    the ones that pass (and may have bound a target) are *usable*
//! 3. the usable actions are handed to the [`SearchAlgorithm`], by default
//!    [`ExhaustiveSearch`]
//!
//! The planner keeps nothing between calls.
//!
//! ```
//! use goap_agent::{Action, ActionBase, ActionRegistry, Planner, WorldState};
//!
//! struct Step(ActionBase);
//!
//! impl Action<()> for Step {
//!     fn base(&self) -> &ActionBase { &self.0 }
//!     fn base_mut(&mut self) -> &mut ActionBase { &mut self.0 }
//!     fn is_done(&self) -> bool { true }
//!     fn check_procedural_precondition(&mut self, _: &()) -> bool { true }
//!     fn perform(&mut self, _: &mut ()) -> bool { true }
//! }
//!
//! let mut registry: ActionRegistry<()> = ActionRegistry::new();
//! registry.add(Box::new(Step(
//!     ActionBase::new("gather_ingredients", 5.0)
//!         .unwrap()
//!         .with_precondition("hasIngredients", false)
//!         .with_effect("hasIngredients", true),
//! )));
//! registry.add(Box::new(Step(
//!     ActionBase::new("refill_pilon", 5.0)
//!         .unwrap()
//!         .with_precondition("hasIngredients", true)
//!         .with_effect("makeFood", true),
//! )));
//!
//! let world = WorldState::new().with("hasIngredients", false);
//! let goal = WorldState::new().with("makeFood", true);
//!
//! let plan = Planner::new().plan(&(), &mut registry, &world, &goal).unwrap();
//! assert_eq!(plan.describe(&registry), "gather_ingredients -> refill_pilon -> GOAL");
//! assert_eq!(plan.cost(), 10.0);
//! ```

use std::collections::VecDeque;

use crate::search::{ExhaustiveSearch, SearchAlgorithm};
use crate::{ActionBase, ActionId, ActionRegistry, Result, WorldState};

/// An ordered list of actions, referenced by id into the registry that
/// produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Plan {
    actions: Vec<ActionId>,
    cost: f32,
}

impl Plan {
    /// Builds a plan from ids already ordered head first.
    pub fn new(actions: Vec<ActionId>, cost: f32) -> Self {
        Self { actions, cost }
    }

    /// Ids of the steps, first step first.
    pub fn actions(&self) -> &[ActionId] {
        &self.actions
    }

    /// Sum of the costs of all steps.
    pub fn cost(&self) -> f32 {
        self.cost
    }

    /// Number of steps.
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// Whether the plan has no steps. Plans returned by [`Planner::plan`]
    /// never are.
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Action names joined with arrows and terminated by `GOAL`.
    pub fn describe<C: ?Sized>(&self, registry: &ActionRegistry<C>) -> String {
        describe_actions(
            self.actions
                .iter()
                .filter_map(|&id| registry.get(id).map(|a| a.name())),
        )
    }

    /// Turns the plan into the execution queue an agent pops from.
    ///
    /// ```
    /// use goap_agent::Plan;
    ///
    /// let queue = Plan::new(Vec::new(), 0.0).into_queue();
    /// assert!(queue.is_empty());
    /// ```
    pub fn into_queue(self) -> VecDeque<ActionId> {
        self.actions.into()
    }
}

pub(crate) fn describe_actions<'a>(names: impl Iterator<Item = &'a str>) -> String {
    let mut s = String::new();
    for name in names {
        s.push_str(name);
        s.push_str(" -> ");
    }
    s.push_str("GOAL");
    s
}

/// Stateless planner wrapping a [`SearchAlgorithm`].
pub struct Planner {
    search_algorithm: Box<dyn SearchAlgorithm>,
}

impl Planner {
    /// Creates a planner using [`ExhaustiveSearch`].
    pub fn new() -> Self {
        Self {
            search_algorithm: Box::new(ExhaustiveSearch),
        }
    }

    /// Creates a planner that delegates the search to `search_algorithm`.
    pub fn with_search_algorithm(search_algorithm: Box<dyn SearchAlgorithm>) -> Self {
        Self { search_algorithm }
    }

    /// Finds the cheapest plan from `world_state` to `goal` using the
    /// actions in `registry` whose procedural preconditions pass for `agent`.
    ///
    /// Every action in the registry is reset first, so targets bound by an
    /// earlier plan are gone afterwards unless the action binds them again.
    ///
    /// # Errors
    ///
    /// Returns [`GoapError::NoPlanFound`](crate::GoapError::NoPlanFound) if
    /// no usable action sequence reaches the goal.
    pub fn plan<C: ?Sized>(
        &self,
        agent: &C,
        registry: &mut ActionRegistry<C>,
        world_state: &WorldState,
        goal: &WorldState,
    ) -> Result<Plan> {
        for (_, action) in registry.iter_mut() {
            action.do_reset();
        }

        let mut usable = Vec::new();
        for (id, action) in registry.iter_mut() {
            if action.check_procedural_precondition(agent) {
                usable.push(id);
            }
        }
        log::debug!(
            "{} of {} actions usable for goal [{}]",
            usable.len(),
            registry.len(),
            goal
        );

        // usable is ascending, so this keeps bases[i] aligned with usable[i]
        let bases: Vec<&ActionBase> = registry
            .iter()
            .filter(|(id, _)| usable.binary_search(id).is_ok())
            .map(|(_, action)| action.base())
            .collect();

        let solution = self.search_algorithm.search(&bases, world_state, goal)?;
        let actions = solution.steps.iter().map(|&step| usable[step]).collect();

        Ok(Plan::new(actions, solution.cost))
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Action, EntityId, GoapError};
    use std::cell::Cell;

    struct Agent {
        target: Option<EntityId>,
        checks: Cell<u32>,
    }

    struct Step {
        base: ActionBase,
        usable: bool,
        progress: u32,
    }

    impl Action<Agent> for Step {
        fn base(&self) -> &ActionBase {
            &self.base
        }

        fn base_mut(&mut self) -> &mut ActionBase {
            &mut self.base
        }

        fn reset(&mut self) {
            self.progress = 0;
        }

        fn is_done(&self) -> bool {
            self.progress > 0
        }

        fn check_procedural_precondition(&mut self, agent: &Agent) -> bool {
            agent.checks.set(agent.checks.get() + 1);
            if let Some(target) = agent.target {
                self.base.set_target(target);
            }
            self.usable
        }

        fn perform(&mut self, _agent: &mut Agent) -> bool {
            self.progress += 1;
            true
        }
    }

    fn step(
        name: &str,
        cost: f32,
        pre: Vec<(&str, bool)>,
        eff: Vec<(&str, bool)>,
    ) -> Box<dyn Action<Agent>> {
        let mut base = ActionBase::new(name, cost).unwrap();
        for (k, v) in pre {
            base.preconditions.set(k, v);
        }
        for (k, v) in eff {
            base.effects.set(k, v);
        }
        Box::new(Step {
            base,
            usable: true,
            progress: 0,
        })
    }

    fn agent() -> Agent {
        Agent {
            target: None,
            checks: Cell::new(0),
        }
    }

    fn names(plan: &Plan, registry: &ActionRegistry<Agent>) -> Vec<String> {
        plan.actions()
            .iter()
            .map(|&id| registry.get(id).unwrap().name().to_string())
            .collect()
    }

    #[test]
    fn test_simple_plan() {
        // a -> b -> c
        let mut registry: ActionRegistry<Agent> = ActionRegistry::new();
        registry.add(step("c", 1.0, vec![("end", true)], vec![("goal", true)]));
        registry.add(step("a", 1.0, vec![("start", true)], vec![("mid", true)]));
        registry.add(step("b", 1.0, vec![("mid", true)], vec![("end", true)]));

        let initial = WorldState::new()
            .with("start", true)
            .with("mid", false)
            .with("end", false)
            .with("goal", false);
        let goal = WorldState::new().with("goal", true);

        let plan = Planner::new()
            .plan(&agent(), &mut registry, &initial, &goal)
            .unwrap();
        assert_eq!(names(&plan, &registry), ["a", "b", "c"]);
        assert_eq!(plan.cost(), 3.0);
    }

    #[test]
    fn test_unusable_actions_are_skipped() {
        let mut registry: ActionRegistry<Agent> = ActionRegistry::new();
        registry.add(Box::new(Step {
            base: ActionBase::new("cheap", 1.0)
                .unwrap()
                .with_effect("goal", true),
            usable: false,
            progress: 0,
        }));
        registry.add(step("pricey", 9.0, vec![], vec![("goal", true)]));

        let agent = agent();
        let goal = WorldState::new().with("goal", true);
        let plan = Planner::new()
            .plan(&agent, &mut registry, &WorldState::new(), &goal)
            .unwrap();

        assert_eq!(names(&plan, &registry), ["pricey"]);
        assert_eq!(agent.checks.get(), 2);
    }

    #[test]
    fn test_no_plan_found() {
        let mut registry: ActionRegistry<Agent> = ActionRegistry::new();
        registry.add(step("a", 1.0, vec![("foo", true)], vec![("bar", true)]));

        let initial = WorldState::new().with("foo", false);
        let goal = WorldState::new().with("bar", true);
        let result = Planner::new().plan(&agent(), &mut registry, &initial, &goal);
        assert!(matches!(result, Err(GoapError::NoPlanFound)));
    }

    #[test]
    fn test_plan_resets_and_rebinds_actions() {
        let mut registry: ActionRegistry<Agent> = ActionRegistry::new();
        let id = registry.add(step("a", 1.0, vec![], vec![("goal", true)]));
        let goal = WorldState::new().with("goal", true);

        {
            let action = registry.get_mut(id).unwrap();
            action.set_in_range();
            action.perform(&mut agent());
            assert!(action.is_done());
        }

        let mut agent = agent();
        agent.target = Some(EntityId(42));
        Planner::new()
            .plan(&agent, &mut registry, &WorldState::new(), &goal)
            .unwrap();

        let action = registry.get(id).unwrap();
        assert!(!action.is_done());
        assert!(!action.is_in_range());
        assert_eq!(action.target(), Some(EntityId(42)));
    }

    #[test]
    fn test_custom_search_algorithm() {
        struct Nothing;

        impl SearchAlgorithm for Nothing {
            fn search(
                &self,
                _actions: &[&ActionBase],
                _start: &WorldState,
                _goal: &WorldState,
            ) -> Result<crate::Solution> {
                Err(GoapError::NoPlanFound)
            }
        }

        let mut registry: ActionRegistry<Agent> = ActionRegistry::new();
        registry.add(step("a", 1.0, vec![], vec![("goal", true)]));
        let goal = WorldState::new().with("goal", true);

        let planner = Planner::with_search_algorithm(Box::new(Nothing));
        assert!(planner
            .plan(&agent(), &mut registry, &WorldState::new(), &goal)
            .is_err());
    }

    #[test]
    fn test_describe() {
        let mut registry: ActionRegistry<Agent> = ActionRegistry::new();
        let a = registry.add(step("gather", 5.0, vec![], vec![]));
        let b = registry.add(step("refill", 5.0, vec![], vec![]));

        assert_eq!(
            Plan::new(vec![a, b], 10.0).describe(&registry),
            "gather -> refill -> GOAL"
        );
        assert_eq!(Plan::new(vec![], 0.0).describe(&registry), "GOAL");
    }
}
