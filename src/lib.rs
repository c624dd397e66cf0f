mod action;
mod agent;
mod error;
mod fact;
mod fsm;
mod planner;
mod registry;
mod search;
mod state;
mod visualizer;

pub use action::{Action, ActionBase, ActionId, EntityId};
pub use agent::{DataProvider, GoapAgent};
pub use error::{GoapError, Result};
pub use fact::FactValue;
pub use fsm::{AgentState, StateMachine};
pub use planner::{Plan, Planner};
pub use registry::ActionRegistry;
pub use search::{ExhaustiveSearch, SearchAlgorithm, Solution};
pub use state::WorldState;
pub use visualizer::GoapVisualizer;
