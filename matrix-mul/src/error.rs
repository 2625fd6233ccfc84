//! Error types for benchmark runs.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("matrix engine error: {0}")]
    Engine(#[from] linked_matrix::Error),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("products disagree for test #{test} at size {size}")]
    Disagreement { size: usize, test: usize },
}
