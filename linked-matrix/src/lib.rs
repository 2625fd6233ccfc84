//! Strassen matrix multiplication over a four-way linked node lattice.
//!
//! `linked-matrix` stores a matrix as a lattice of cells, each linked to its
//! north, east, south and west neighbors. Multiplication follows Strassen's
//! seven-product recursion down to a 2x2 base case: operands are split into
//! quadrants by severing links at their midpoints and the result quadrants are
//! stitched back together by relinking, so nodes are only allocated where the
//! algorithm needs fresh values.
//!
//! # Layout
//!
//! - [`Lattice`] owns every node; [`LinkedGrid`] is a move-only handle to a
//!   rectangular region of it.
//! - [`Strassen`] is the recursion, generic over a [`Backend`]. Both the
//!   lattice and the array-backed [`Dense`] backend implement it, and a cutoff
//!   hands small sub-problems to a standard row-by-column product.
//! - Arithmetic wraps on overflow, so every backend agrees bit for bit with
//!   [`DenseMatrix::standard`].
//!
//! # Example
//!
//! ```
//! use linked_matrix::{Lattice, Strassen};
//!
//! let mut lattice = Lattice::new();
//! let x = lattice.build(&[[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1, 0], [0, 0, 0, 1]])?;
//! let y = lattice.build(&[[1, 2, 3, 4], [5, 6, 7, 8], [9, 10, 11, 12], [13, 14, 15, 16]])?;
//!
//! let product = Strassen::with_cutoff(2).multiply(&mut lattice, x, y)?;
//! assert_eq!(lattice.to_rows(&product)?[3], vec![13, 14, 15, 16]);
//! # Ok::<(), linked_matrix::Error>(())
//! ```

mod alu;
mod compose;
mod dense;
mod error;
mod grid;
mod lattice;
mod node;
mod split;
mod strassen;

pub use dense::{Dense, DenseMatrix};
pub use error::{Error, Result};
pub use grid::{GridDisplay, LinkedGrid};
pub use lattice::Lattice;
pub use node::{Direction, Node, NodeId};
pub use strassen::{Backend, Quadrants, Strassen};
