//! Error types for linked-matrix operations.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("shape mismatch: left is {}x{}, right is {}x{}", .left.0, .left.1, .right.0, .right.1)]
    ShapeMismatch {
        left: (usize, usize),
        right: (usize, usize),
    },

    #[error("{width}x{height} matrix is not square")]
    NotSquare { width: usize, height: usize },

    #[error("width {width} cannot reach the 2x2 base case")]
    InvalidBaseCase { width: usize },

    #[error("malformed grid: {0}")]
    MalformedGrid(String),

    #[error("cannot split a {width}x{height} grid")]
    Unsplittable { width: usize, height: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
