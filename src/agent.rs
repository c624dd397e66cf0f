//! # Agent
//!
//! [`GoapAgent`] drives one agent's plan tick by tick. Each call to
//! [`GoapAgent::tick`] runs the handler of the active [`AgentState`]:
//!
//! - **Idle** fetches the world state and goal from the [`DataProvider`] and
//!   plans. On success the plan is queued and `PerformAction` replaces
//!   `Idle`; on failure `Idle` stays active and plans again next tick.
//! - **PerformAction** drops the head action once it reports done, then
//!   performs the new head. An action that needs to be in range of its
//!   target and is not pushes `MoveTo` on top. A hard failure aborts the
//!   plan and returns to `Idle`.
//! - **MoveTo** asks the provider to move the agent. When the provider
//!   reports arrival, `MoveTo` pops itself and `PerformAction` resumes on
//!   the next tick.
//!
//! Failures never escape `tick`. They are logged, reported through the
//! provider callbacks and kept in [`GoapAgent::last_error`].

use std::collections::VecDeque;

use crate::fsm::{AgentState, StateMachine};
use crate::planner::describe_actions;
use crate::{Action, ActionId, ActionRegistry, GoapError, Planner, Result, WorldState};

/// World knowledge and feedback sink for one kind of agent.
///
/// The provider is also the context handed to every action's procedural
/// precondition check and `perform`.
pub trait DataProvider {
    /// Snapshot of the facts the agent believes right now.
    fn world_state(&self) -> WorldState;

    /// The goal to plan for on this pass.
    fn create_goal_state(&self) -> WorldState;

    fn plan_found(&mut self, _goal: &WorldState, _actions: &[&dyn Action<Self>]) {}

    fn plan_failed(&mut self, _failed_goal: &WorldState) {}

    /// `aborter` is the action whose `perform` returned `false`.
    fn plan_aborted(&mut self, _aborter: &dyn Action<Self>) {}

    fn actions_finished(&mut self) {}

    /// Moves the agent one step towards `next_action`'s target.
    ///
    /// Return `true` once the agent has arrived. Implementations should also
    /// call [`Action::set_in_range`] on arrival, otherwise `PerformAction`
    /// will push `MoveTo` again.
    fn move_agent(&mut self, next_action: &mut dyn Action<Self>) -> bool;
}

/// Plan executor for a single agent.
pub struct GoapAgent<P> {
    machine: StateMachine,
    registry: ActionRegistry<P>,
    current_actions: VecDeque<ActionId>,
    planner: Planner,
    last_error: Option<GoapError>,
}

impl<P: DataProvider> GoapAgent<P> {
    /// Creates an `Idle` agent with no actions and the default planner.
    pub fn new() -> Self {
        Self::with_planner(Planner::new())
    }

    /// Creates an `Idle` agent that plans with `planner`.
    pub fn with_planner(planner: Planner) -> Self {
        Self {
            machine: StateMachine::new(),
            registry: ActionRegistry::new(),
            current_actions: VecDeque::new(),
            planner,
            last_error: None,
        }
    }

    /// Registers an action. Registration order breaks ties between plans of
    /// equal cost.
    pub fn add_action<A: Action<P> + 'static>(&mut self, action: A) -> ActionId {
        let id = self.registry.add(Box::new(action));
        if let Some(action) = self.registry.get(id) {
            log::debug!("registered action {} as {:?}", action.name(), id);
        }
        id
    }

    /// Looks up a registered action by id.
    pub fn action(&self, id: ActionId) -> Option<&dyn Action<P>> {
        self.registry.get(id)
    }

    /// Id of the first action registered under `name`.
    pub fn find_action(&self, name: &str) -> Option<ActionId> {
        self.registry.find(name)
    }

    /// Unregisters an action. The current plan is discarded and the agent
    /// returns to `Idle`, because queued ids may no longer be valid.
    pub fn remove_action(&mut self, name: &str) -> Result<Box<dyn Action<P>>> {
        let removed = self.registry.remove(name)?;
        self.current_actions.clear();
        self.machine.reset();
        Ok(removed)
    }

    /// Every action the agent can plan with.
    pub fn registry(&self) -> &ActionRegistry<P> {
        &self.registry
    }

    /// The active state.
    pub fn state(&self) -> AgentState {
        self.machine.current()
    }

    /// The full state stack, for inspection.
    pub fn state_machine(&self) -> &StateMachine {
        &self.machine
    }

    /// Whether actions are still queued.
    pub fn has_action_plan(&self) -> bool {
        !self.current_actions.is_empty()
    }

    /// Ids of the actions still queued, head first.
    pub fn current_actions(&self) -> impl Iterator<Item = ActionId> + '_ {
        self.current_actions.iter().copied()
    }

    /// The most recent planning or execution failure.
    pub fn last_error(&self) -> Option<&GoapError> {
        self.last_error.as_ref()
    }

    /// Runs the active state's handler once.
    pub fn tick(&mut self, provider: &mut P) {
        match self.machine.current() {
            AgentState::Idle => self.idle(provider),
            AgentState::MoveTo => self.move_to(provider),
            AgentState::PerformAction => self.perform_action(provider),
        }
    }

    fn idle(&mut self, provider: &mut P) {
        let world_state = provider.world_state();
        let goal = provider.create_goal_state();

        match self
            .planner
            .plan(&*provider, &mut self.registry, &world_state, &goal)
        {
            Ok(plan) => {
                log::info!("plan found: {}", plan.describe(&self.registry));
                self.current_actions = plan.into_queue();

                let actions: Vec<&dyn Action<P>> = self
                    .current_actions
                    .iter()
                    .filter_map(|&id| self.registry.get(id))
                    .collect();
                provider.plan_found(&goal, &actions);

                self.machine.replace(AgentState::PerformAction);
            }
            Err(err) => {
                log::warn!("failed plan: {}", goal);
                provider.plan_failed(&goal);
                self.last_error = Some(err);
                self.machine.replace(AgentState::Idle);
            }
        }
    }

    fn perform_action(&mut self, provider: &mut P) {
        let Some(&head) = self.current_actions.front() else {
            self.finish_plan(provider);
            return;
        };

        if self.registry.get(head).map_or(true, |action| action.is_done()) {
            self.current_actions.pop_front();
        }

        let Some(&head) = self.current_actions.front() else {
            self.finish_plan(provider);
            return;
        };
        let Some(action) = self.registry.get_mut(head) else {
            self.abort_inconsistent(format!("queued action {:?} is not registered", head));
            return;
        };

        let in_range = if action.requires_in_range() {
            action.is_in_range()
        } else {
            true
        };

        if !in_range {
            self.machine.push(AgentState::MoveTo);
            return;
        }

        if !action.perform(provider) {
            log::warn!("plan aborted by {}", action.name());
            provider.plan_aborted(&*action);
            self.last_error = Some(GoapError::ActionExecutionFailed(action.name().to_string()));
            self.current_actions.clear();
            self.machine.replace(AgentState::Idle);
        }
    }

    fn move_to(&mut self, provider: &mut P) {
        let Some(action) = self
            .current_actions
            .front()
            .and_then(|&id| self.registry.get_mut(id))
        else {
            self.abort_inconsistent("no queued action to move towards".to_string());
            return;
        };

        if action.requires_in_range() && action.target().is_none() {
            let reason = format!(
                "{} requires a target but has none; bind it in check_procedural_precondition",
                action.name()
            );
            self.abort_inconsistent(reason);
            return;
        }

        if provider.move_agent(action) {
            self.machine.pop();
        }
    }

    fn finish_plan(&mut self, provider: &mut P) {
        log::info!("actions finished");
        self.machine.replace(AgentState::Idle);
        provider.actions_finished();
    }

    /// Drops `MoveTo` and `PerformAction` and replans from `Idle`.
    fn abort_inconsistent(&mut self, reason: String) {
        let err = GoapError::PlanInconsistency(reason);
        log::error!("{}", err);
        self.last_error = Some(err);
        self.current_actions.clear();
        self.machine.pop();
        self.machine.pop();
        self.machine.push(AgentState::Idle);
    }

    /// Formats the queued actions the same way plans are logged.
    pub fn describe_plan(&self) -> String {
        describe_actions(
            self.current_actions
                .iter()
                .filter_map(|&id| self.registry.get(id).map(|a| a.name())),
        )
    }
}

impl<P: DataProvider> Default for GoapAgent<P> {
    fn default() -> Self {
        Self::new()
    }
}
