//! Stack of agent states.
//!
//! The top of the stack is the active state. Transitions are expressed as
//! pushes and pops so that a temporary state (moving to a target) can sit on
//! top of the state it interrupts and hand control back by popping itself.

use std::fmt;

/// States an agent cycles through during its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AgentState {
    /// Asks the data provider for a goal and plans for it
    Idle,
    /// Moves towards the target of the head action
    MoveTo,
    /// Performs the head action of the current plan
    PerformAction,
}

impl fmt::Display for AgentState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AgentState::Idle => "Idle",
            AgentState::MoveTo => "MoveTo",
            AgentState::PerformAction => "PerformAction",
        };
        write!(f, "{}", name)
    }
}

/// Stack-based state machine. Starts with [`AgentState::Idle`] on the stack.
#[derive(Debug, Clone)]
pub struct StateMachine {
    states: Vec<AgentState>,
}

impl StateMachine {
    /// Creates a machine with `Idle` as its only state.
    pub fn new() -> Self {
        Self {
            states: vec![AgentState::Idle],
        }
    }

    /// The active state. An empty stack reads as `Idle`.
    pub fn current(&self) -> AgentState {
        self.states.last().copied().unwrap_or(AgentState::Idle)
    }

    /// Makes `state` the active state, keeping the previous one below it.
    pub fn push(&mut self, state: AgentState) {
        log::debug!("push {} onto {:?}", state, self.states);
        self.states.push(state);
    }

    /// Removes the active state and returns it. The state below becomes
    /// active again.
    pub fn pop(&mut self) -> Option<AgentState> {
        let popped = self.states.pop();
        log::debug!("pop {:?}, stack now {:?}", popped, self.states);
        popped
    }

    /// Pops the active state and pushes `state` in its place.
    pub fn replace(&mut self, state: AgentState) {
        self.pop();
        self.push(state);
    }

    /// Drops every state and restarts from `Idle`.
    pub fn reset(&mut self) {
        self.states.clear();
        self.states.push(AgentState::Idle);
    }

    /// Number of states on the stack.
    pub fn depth(&self) -> usize {
        self.states.len()
    }

    /// The whole stack, bottom first.
    pub fn states(&self) -> &[AgentState] {
        &self.states
    }
}

impl Default for StateMachine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_idle() {
        let fsm = StateMachine::new();
        assert_eq!(fsm.current(), AgentState::Idle);
        assert_eq!(fsm.depth(), 1);
    }

    #[test]
    fn test_move_to_sits_on_top_of_perform() {
        let mut fsm = StateMachine::new();
        fsm.replace(AgentState::PerformAction);
        fsm.push(AgentState::MoveTo);
        assert_eq!(fsm.states(), [AgentState::PerformAction, AgentState::MoveTo]);

        assert_eq!(fsm.pop(), Some(AgentState::MoveTo));
        assert_eq!(fsm.current(), AgentState::PerformAction);
    }

    #[test]
    fn test_replace_idle_with_idle_keeps_depth() {
        let mut fsm = StateMachine::new();
        fsm.replace(AgentState::Idle);
        assert_eq!(fsm.states(), [AgentState::Idle]);
    }

    #[test]
    fn test_empty_stack_reads_idle() {
        let mut fsm = StateMachine::new();
        fsm.pop();
        assert_eq!(fsm.depth(), 0);
        assert_eq!(fsm.current(), AgentState::Idle);
        fsm.reset();
        assert_eq!(fsm.states(), [AgentState::Idle]);
    }

    #[test]
    fn test_display() {
        assert_eq!(AgentState::PerformAction.to_string(), "PerformAction");
    }
}
