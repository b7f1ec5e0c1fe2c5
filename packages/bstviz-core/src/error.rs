use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("unknown operation: {0}")]
    UnknownOperation(String),
    #[error("unknown traversal type: {0}")]
    UnknownTraversal(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("invalid config: {0}")]
    InvalidConfig(String),
    #[error("inconsistent state: {0}")]
    InconsistentState(String),
}
