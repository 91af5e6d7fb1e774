//! engine errors

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("satisfiability check was interrupted")]
    Interrupted,
    #[error("solver failure: {0}")]
    Solver(String),
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}
