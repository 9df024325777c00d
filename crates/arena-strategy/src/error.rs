use thiserror::Error;

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("team name is blank")]
    BlankName,

    #[error("invalid color: {0}")]
    InvalidColor(String),
}

pub type StrategyResult<T> = Result<T, StrategyError>;
