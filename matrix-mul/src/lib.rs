//! Benchmark harness for linked-grid Strassen multiplication.
//!
//! `matrix-mul` generates random square matrices and times three multipliers
//! on each pair:
//!
//! - **Standard**: the row-by-column product over a flat array
//! - **Hybrid**: array-backed Strassen that switches to the standard product
//!   below a cutoff width
//! - **Strassen**: the linked-lattice engine, recursing to 2x2
//!
//! Sizes double from `start_size` to `max_size`; within one size the hybrid
//! cutoff doubles from test to test.
//!
//! # Example
//!
//! ```
//! use matrix_mul::{Bench, BenchConfig};
//!
//! let config = BenchConfig {
//!     start_size: 4,
//!     max_size: 8,
//!     tests_per_size: 2,
//!     seed: Some(7),
//!     verify: true,
//!     ..BenchConfig::default()
//! };
//!
//! let reports = Bench::new(config)?.run(|_| {})?;
//! assert_eq!(reports.len(), 4);
//! assert!(reports.iter().all(|r| r.verified));
//! # Ok::<(), matrix_mul::Error>(())
//! ```

mod bench;
mod error;

pub use bench::{Bench, BenchConfig, CaseReport, random_matrix};
pub use error::Error;
