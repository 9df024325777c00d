use arena_core::AgentId;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("agent {0} may not be relocated: it is in bounds and the match has started")]
    RelocationForbidden(AgentId),

    #[error("agent {0} not found")]
    UnknownAgent(AgentId),
}

pub type AgentResult<T> = Result<T, AgentError>;
