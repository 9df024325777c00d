use arena_agent::AgentError;
use arena_core::{AgentId, CoreError};
use arena_sandbox::SandboxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("match configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("a match needs at least one team")]
    NoTeams,

    #[error("too many teams: {0}")]
    TooManyTeams(usize),

    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("worker thread for {0} panicked")]
    WorkerPanicked(AgentId),

    #[error("sandbox error: {0}")]
    Sandbox(#[from] SandboxError),

    #[error("agent error: {0}")]
    Agent(#[from] AgentError),
}

pub type EngineResult<T> = Result<T, EngineError>;
