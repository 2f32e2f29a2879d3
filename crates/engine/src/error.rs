use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("Pipeline already finalized: cannot {0}")]
    Finalized(&'static str),
}

// Convenience type alias
pub type Result<T> = std::result::Result<T, EngineError>;
