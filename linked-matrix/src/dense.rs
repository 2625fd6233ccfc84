//! Array-backed reference matrices.

use std::fmt;

use crate::error::{Error, Result};
use crate::strassen::{Backend, Quadrants};

/// Square matrix stored as one row-major buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DenseMatrix {
    size: usize,
    cells: Vec<i32>,
}

impl DenseMatrix {
    pub fn zeros(size: usize) -> Self {
        Self {
            size,
            cells: vec![0; size * size],
        }
    }

    /// Copies square row-major input.
    pub fn from_rows<R: AsRef<[i32]>>(rows: &[R]) -> Result<Self> {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for (index, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != size {
                return Err(if index == 0 {
                    Error::NotSquare {
                        width: row.len(),
                        height: size,
                    }
                } else {
                    Error::MalformedGrid(format!(
                        "row {index} has {} cells, expected {size}",
                        row.len()
                    ))
                });
            }
            cells.extend_from_slice(row);
        }
        Ok(Self { size, cells })
    }

    pub fn to_rows(&self) -> Vec<Vec<i32>> {
        if self.size == 0 {
            return Vec::new();
        }
        self.cells.chunks(self.size).map(<[i32]>::to_vec).collect()
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn get(&self, row: usize, col: usize) -> Option<i32> {
        (row < self.size && col < self.size).then(|| self.cells[row * self.size + col])
    }

    fn at(&self, row: usize, col: usize) -> i32 {
        self.cells[row * self.size + col]
    }

    /// Row-by-column product in wrapping arithmetic.
    pub fn standard(&self, other: &DenseMatrix) -> Result<DenseMatrix> {
        self.ensure_same_size(other)?;
        let n = self.size;
        let mut product = DenseMatrix::zeros(n);
        for i in 0..n {
            for j in 0..n {
                product.cells[i * n + j] = (0..n).fold(0i32, |sum, k| {
                    sum.wrapping_add(self.at(i, k).wrapping_mul(other.at(k, j)))
                });
            }
        }
        Ok(product)
    }

    /// Copies the `n`x`n` block whose top-left cell is (`top`, `left`).
    pub fn submatrix(&self, top: usize, left: usize, n: usize) -> Result<DenseMatrix> {
        let fits = |start: usize| start.checked_add(n).is_some_and(|end| end <= self.size);
        if !fits(top) || !fits(left) {
            return Err(Error::ShapeMismatch {
                left: (self.size, self.size),
                right: (left.saturating_add(n), top.saturating_add(n)),
            });
        }
        let mut block = DenseMatrix::zeros(n);
        for row in 0..n {
            let from = (top + row) * self.size + left;
            block.cells[row * n..(row + 1) * n].copy_from_slice(&self.cells[from..from + n]);
        }
        Ok(block)
    }

    fn ensure_same_size(&self, other: &DenseMatrix) -> Result<()> {
        if self.size != other.size {
            return Err(Error::ShapeMismatch {
                left: (self.size, self.size),
                right: (other.size, other.size),
            });
        }
        Ok(())
    }

    fn zip_with(&self, other: &DenseMatrix, op: fn(i32, i32) -> i32) -> Result<DenseMatrix> {
        self.ensure_same_size(other)?;
        Ok(DenseMatrix {
            size: self.size,
            cells: self
                .cells
                .iter()
                .zip(&other.cells)
                .map(|(&a, &b)| op(a, b))
                .collect(),
        })
    }
}

impl fmt::Display for DenseMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.to_rows() {
            write!(f, "{{")?;
            for value in row {
                write!(f, " [{value}] ")?;
            }
            writeln!(f, "}}")?;
        }
        Ok(())
    }
}

/// [`Backend`] over [`DenseMatrix`]: splitting and composing copy blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct Dense;

impl Backend for Dense {
    type Matrix = DenseMatrix;

    fn shape(&self, matrix: &DenseMatrix) -> (usize, usize) {
        (matrix.size, matrix.size)
    }

    fn corners(&self, matrix: &DenseMatrix) -> Result<[i32; 4]> {
        if matrix.size != 2 {
            return Err(Error::InvalidBaseCase { width: matrix.size });
        }
        Ok([matrix.at(0, 0), matrix.at(0, 1), matrix.at(1, 0), matrix.at(1, 1)])
    }

    fn from_corners(&mut self, corners: [i32; 4]) -> Result<DenseMatrix> {
        Ok(DenseMatrix {
            size: 2,
            cells: corners.to_vec(),
        })
    }

    fn quarter(&mut self, matrix: DenseMatrix) -> Result<Quadrants<DenseMatrix>> {
        let n = matrix.size / 2;
        if n == 0 || matrix.size % 2 != 0 {
            return Err(Error::Unsplittable {
                width: matrix.size,
                height: matrix.size,
            });
        }
        Ok(Quadrants {
            top_left: matrix.submatrix(0, 0, n)?,
            top_right: matrix.submatrix(0, n, n)?,
            bottom_left: matrix.submatrix(n, 0, n)?,
            bottom_right: matrix.submatrix(n, n, n)?,
        })
    }

    fn add(&mut self, a: &DenseMatrix, b: &DenseMatrix) -> Result<DenseMatrix> {
        a.zip_with(b, i32::wrapping_add)
    }

    fn subtract(&mut self, a: &DenseMatrix, b: &DenseMatrix) -> Result<DenseMatrix> {
        a.zip_with(b, i32::wrapping_sub)
    }

    fn compose(&mut self, quadrants: Quadrants<DenseMatrix>) -> Result<DenseMatrix> {
        let n = quadrants.top_left.size;
        for part in [
            &quadrants.top_right,
            &quadrants.bottom_left,
            &quadrants.bottom_right,
        ] {
            quadrants.top_left.ensure_same_size(part)?;
        }

        let size = n * 2;
        let mut whole = DenseMatrix::zeros(size);
        let placed = [
            (&quadrants.top_left, 0, 0),
            (&quadrants.top_right, 0, n),
            (&quadrants.bottom_left, n, 0),
            (&quadrants.bottom_right, n, n),
        ];
        for (part, top, left) in placed {
            for row in 0..n {
                let to = (top + row) * size + left;
                whole.cells[to..to + n].copy_from_slice(&part.cells[row * n..(row + 1) * n]);
            }
        }
        Ok(whole)
    }

    fn standard(&mut self, a: &DenseMatrix, b: &DenseMatrix) -> Result<DenseMatrix> {
        a.standard(b)
    }
}
