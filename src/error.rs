use thiserror::Error;

/// Errors produced while planning or executing a plan.
///
/// Execution-time failures are never returned from
/// [`crate::GoapAgent::tick`]. They are recovered inside the agent's state
/// machine and surface through the data provider callbacks and
/// [`crate::GoapAgent::last_error`].
#[derive(Error, Debug)]
pub enum GoapError {
    /// No enumerated action sequence reaches the goal
    #[error("No valid plan found to achieve the goal")]
    NoPlanFound,

    /// An action reported a hard failure while being performed
    #[error("Action execution failed: {0}")]
    ActionExecutionFailed(String),

    /// A queued plan cannot be executed as planned
    #[error("Plan inconsistency: {0}")]
    PlanInconsistency(String),

    /// Action cost was negative or NaN
    #[error("Action cost must be non-negative")]
    InvalidActionCost,

    /// No action with the given name is registered
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, GoapError>;
