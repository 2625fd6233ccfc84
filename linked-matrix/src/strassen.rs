//! Strassen's recursion, written once over a pluggable storage backend.

use std::num::Wrapping;

use tracing::{debug, trace};

use crate::dense::DenseMatrix;
use crate::error::{Error, Result};
use crate::grid::LinkedGrid;
use crate::lattice::Lattice;
use crate::node::Direction;

/// The four equal parts of a matrix split at its midpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quadrants<M> {
    pub top_left: M,
    pub top_right: M,
    pub bottom_left: M,
    pub bottom_right: M,
}

/// Storage a [`Strassen`] engine can recurse over.
///
/// Operations that take a matrix by value consume it; the engine never reads
/// a matrix after handing it over.
pub trait Backend {
    type Matrix;

    /// `(width, height)`
    fn shape(&self, matrix: &Self::Matrix) -> (usize, usize);

    /// Values of a 2x2 matrix in row-major order.
    fn corners(&self, matrix: &Self::Matrix) -> Result<[i32; 4]>;

    fn from_corners(&mut self, corners: [i32; 4]) -> Result<Self::Matrix>;

    fn quarter(&mut self, matrix: Self::Matrix) -> Result<Quadrants<Self::Matrix>>;

    fn add(&mut self, a: &Self::Matrix, b: &Self::Matrix) -> Result<Self::Matrix>;

    fn subtract(&mut self, a: &Self::Matrix, b: &Self::Matrix) -> Result<Self::Matrix>;

    fn compose(&mut self, quadrants: Quadrants<Self::Matrix>) -> Result<Self::Matrix>;

    /// Row-by-column product, used below the engine's cutoff.
    fn standard(&mut self, a: &Self::Matrix, b: &Self::Matrix) -> Result<Self::Matrix>;

    /// Gives back storage held by a matrix that is no longer needed.
    fn release(&mut self, _matrix: Self::Matrix) -> Result<()> {
        Ok(())
    }

    /// Checks that a matrix handed in from outside is usable by this backend.
    fn verify(&self, _matrix: &Self::Matrix) -> Result<()> {
        Ok(())
    }
}

/// Strassen multiplication engine.
///
/// With a cutoff of zero the recursion runs down to the 2x2 base case.
/// Otherwise sub-problems narrower than the cutoff use the backend's standard
/// product.
///
/// # Example
///
/// ```
/// use linked_matrix::{Dense, DenseMatrix, Strassen};
///
/// let x = DenseMatrix::from_rows(&[[1, 2], [3, 4]]).unwrap();
/// let y = DenseMatrix::from_rows(&[[5, 6], [7, 8]]).unwrap();
///
/// let product = Strassen::new().multiply(&mut Dense, x, y).unwrap();
/// assert_eq!(product.to_rows(), vec![vec![19, 22], vec![43, 50]]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Strassen {
    cutoff: usize,
}

#[derive(Clone, Copy)]
enum Op {
    Add,
    Sub,
}

impl Strassen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cutoff(cutoff: usize) -> Self {
        Self { cutoff }
    }

    pub fn cutoff(&self) -> usize {
        self.cutoff
    }

    /// Multiplies two square, equally sized matrices whose width is a power of
    /// two of at least 2. Both operands are consumed, and released if they are
    /// rejected.
    pub fn multiply<B: Backend>(
        &self,
        backend: &mut B,
        x: B::Matrix,
        y: B::Matrix,
    ) -> Result<B::Matrix> {
        let width = match admit(backend, &x, &y) {
            Ok(width) => width,
            Err(err) => {
                // A foreign operand has nothing to give back here.
                let _ = backend.release(x);
                let _ = backend.release(y);
                return Err(err);
            }
        };

        debug!(width, cutoff = self.cutoff, "strassen multiply");
        self.recurse(backend, x, y)
    }

    fn recurse<B: Backend>(
        &self,
        backend: &mut B,
        x: B::Matrix,
        y: B::Matrix,
    ) -> Result<B::Matrix> {
        let width = backend.shape(&x).0;

        if width < self.cutoff {
            trace!(width, "below cutoff, using standard product");
            let product = backend.standard(&x, &y)?;
            backend.release(x)?;
            backend.release(y)?;
            return Ok(product);
        }
        if width == 2 {
            let product = base_case(backend.corners(&x)?, backend.corners(&y)?);
            backend.release(x)?;
            backend.release(y)?;
            return backend.from_corners(product);
        }
        if width < 2 || width % 2 != 0 {
            return Err(Error::InvalidBaseCase { width });
        }

        let Quadrants {
            top_left: a,
            top_right: b,
            bottom_left: c,
            bottom_right: d,
        } = backend.quarter(x)?;
        let Quadrants {
            top_left: e,
            top_right: f,
            bottom_left: g,
            bottom_right: h,
        } = backend.quarter(y)?;

        // Every sum is formed before any product runs: a, d, e and h are each
        // taken apart by exactly one product below.
        let f_h = backend.subtract(&f, &h)?;
        let a_b = backend.add(&a, &b)?;
        let c_d = backend.add(&c, &d)?;
        let g_e = backend.subtract(&g, &e)?;
        let a_d = backend.add(&a, &d)?;
        let e_h = backend.add(&e, &h)?;
        let b_d = backend.subtract(&b, &d)?;
        let g_h = backend.add(&g, &h)?;
        let a_c = backend.subtract(&a, &c)?;
        let e_f = backend.add(&e, &f)?;
        for spent in [b, c, f, g] {
            backend.release(spent)?;
        }

        let p1 = self.recurse(backend, a, f_h)?;
        let p2 = self.recurse(backend, a_b, h)?;
        let p3 = self.recurse(backend, c_d, e)?;
        let p4 = self.recurse(backend, d, g_e)?;
        let p5 = self.recurse(backend, a_d, e_h)?;
        let p6 = self.recurse(backend, b_d, g_h)?;
        let p7 = self.recurse(backend, a_c, e_f)?;

        let quadrants = Quadrants {
            top_left: combine(
                backend,
                &p5,
                (Op::Add, &p4),
                &[(Op::Sub, &p2), (Op::Add, &p6)],
            )?,
            top_right: combine(backend, &p1, (Op::Add, &p2), &[])?,
            bottom_left: combine(backend, &p3, (Op::Add, &p4), &[])?,
            bottom_right: combine(
                backend,
                &p5,
                (Op::Add, &p1),
                &[(Op::Sub, &p3), (Op::Sub, &p7)],
            )?,
        };
        for spent in [p1, p2, p3, p4, p5, p6, p7] {
            backend.release(spent)?;
        }

        backend.compose(quadrants)
    }
}

/// Width of a valid pair of operands.
fn admit<B: Backend>(backend: &B, x: &B::Matrix, y: &B::Matrix) -> Result<usize> {
    backend.verify(x)?;
    backend.verify(y)?;
    let left = backend.shape(x);
    let right = backend.shape(y);
    if left != right {
        return Err(Error::ShapeMismatch { left, right });
    }
    let (width, height) = left;
    if width != height {
        return Err(Error::NotSquare { width, height });
    }
    if width < 2 || !width.is_power_of_two() {
        return Err(Error::InvalidBaseCase { width });
    }
    Ok(width)
}

/// Folds `first` with each term in turn, releasing the intermediate results.
fn combine<B: Backend>(
    backend: &mut B,
    first: &B::Matrix,
    (op, second): (Op, &B::Matrix),
    rest: &[(Op, &B::Matrix)],
) -> Result<B::Matrix> {
    let mut acc = op.apply(backend, first, second)?;
    for &(op, term) in rest {
        let next = op.apply(backend, &acc, term)?;
        backend.release(std::mem::replace(&mut acc, next))?;
    }
    Ok(acc)
}

impl Op {
    fn apply<B: Backend>(
        self,
        backend: &mut B,
        a: &B::Matrix,
        b: &B::Matrix,
    ) -> Result<B::Matrix> {
        match self {
            Op::Add => backend.add(a, b),
            Op::Sub => backend.subtract(a, b),
        }
    }
}

/// The seven-product formulas on scalars, in `i32` wrapping arithmetic.
fn base_case(x: [i32; 4], y: [i32; 4]) -> [i32; 4] {
    let [a, b, c, d] = x.map(Wrapping);
    let [e, f, g, h] = y.map(Wrapping);

    let p1 = a * (f - h);
    let p2 = (a + b) * h;
    let p3 = (c + d) * e;
    let p4 = d * (g - e);
    let p5 = (a + d) * (e + h);
    let p6 = (b - d) * (g + h);
    let p7 = (a - c) * (e + f);

    [p5 + p4 - p2 + p6, p1 + p2, p3 + p4, p5 + p1 - p3 - p7].map(|Wrapping(v)| v)
}

impl Backend for Lattice {
    type Matrix = LinkedGrid;

    fn shape(&self, grid: &LinkedGrid) -> (usize, usize) {
        grid.shape()
    }

    fn corners(&self, grid: &LinkedGrid) -> Result<[i32; 4]> {
        self.ensure_owned(grid)?;
        let root = grid
            .root()
            .ok_or_else(|| Error::MalformedGrid("grid has no root".to_string()))?;
        let east = self.walk(root, Direction::East, 1)?;
        let south = self.walk(root, Direction::South, 1)?;
        let south_east = self.walk(south, Direction::East, 1)?;
        Ok([root, east, south, south_east].map(|id| self.value(id)))
    }

    fn from_corners(&mut self, [r, s, t, u]: [i32; 4]) -> Result<LinkedGrid> {
        self.build(&[[r, s], [t, u]])
    }

    fn quarter(&mut self, grid: LinkedGrid) -> Result<Quadrants<LinkedGrid>> {
        Lattice::quarter(self, grid)
    }

    fn add(&mut self, a: &LinkedGrid, b: &LinkedGrid) -> Result<LinkedGrid> {
        Lattice::add(self, a, b)
    }

    fn subtract(&mut self, a: &LinkedGrid, b: &LinkedGrid) -> Result<LinkedGrid> {
        Lattice::subtract(self, a, b)
    }

    fn compose(&mut self, quadrants: Quadrants<LinkedGrid>) -> Result<LinkedGrid> {
        Lattice::compose(self, quadrants)
    }

    fn standard(&mut self, a: &LinkedGrid, b: &LinkedGrid) -> Result<LinkedGrid> {
        let a = DenseMatrix::from_rows(&self.to_rows(a)?)?;
        let b = DenseMatrix::from_rows(&self.to_rows(b)?)?;
        let product = a.standard(&b)?;
        self.build(&product.to_rows())
    }

    fn release(&mut self, grid: LinkedGrid) -> Result<()> {
        Lattice::release(self, grid)
    }

    fn verify(&self, grid: &LinkedGrid) -> Result<()> {
        self.validate(grid)
    }
}

impl Lattice {
    /// Pure Strassen product of two grids from this lattice, consuming both.
    pub fn multiply(&mut self, x: LinkedGrid, y: LinkedGrid) -> Result<LinkedGrid> {
        Strassen::new().multiply(self, x, y)
    }
}
