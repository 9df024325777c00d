use thiserror::Error;

#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("failed to spawn sandbox thread: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type SandboxResult<T> = Result<T, SandboxError>;
