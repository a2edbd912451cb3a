use thiserror::Error;

/// Failure taxonomy shared by the core engine and its collaborators.
///
/// `NotFound`, `Parse` and `Validation` are the externally distinguishable
/// kinds; everything recoverable is absorbed where it occurs and never
/// surfaces here.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid request: {0}")]
    Validation(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
