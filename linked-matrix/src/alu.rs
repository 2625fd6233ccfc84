//! Element-wise addition and subtraction of linked grids.

use crate::error::{Error, Result};
use crate::grid::LinkedGrid;
use crate::lattice::Lattice;
use crate::node::Direction;

impl Lattice {
    /// Returns a new grid holding `a + b`, wrapping on overflow.
    pub fn add(&mut self, a: &LinkedGrid, b: &LinkedGrid) -> Result<LinkedGrid> {
        self.alu(a, b, i32::wrapping_add)
    }

    /// Returns a new grid holding `a - b`, wrapping on overflow.
    pub fn subtract(&mut self, a: &LinkedGrid, b: &LinkedGrid) -> Result<LinkedGrid> {
        self.alu(a, b, i32::wrapping_sub)
    }

    fn alu(
        &mut self,
        a: &LinkedGrid,
        b: &LinkedGrid,
        op: fn(i32, i32) -> i32,
    ) -> Result<LinkedGrid> {
        self.ensure_owned(a)?;
        self.ensure_owned(b)?;
        if a.shape() != b.shape() {
            return Err(Error::ShapeMismatch {
                left: a.shape(),
                right: b.shape(),
            });
        }

        let rows: Vec<Vec<i32>> = self
            .chain(a.root(), Direction::South)
            .zip(self.chain(b.root(), Direction::South))
            .map(|(x, y)| {
                self.chain(Some(x), Direction::East)
                    .zip(self.chain(Some(y), Direction::East))
                    .map(|(x, y)| op(self.value(x), self.value(y)))
                    .collect()
            })
            .collect();

        self.build(&rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add() {
        let mut lattice = Lattice::new();
        let a = lattice.build(&[[1, 2], [3, 4]]).unwrap();
        let b = lattice.build(&[[10, 20], [30, 40]]).unwrap();

        let sum = lattice.add(&a, &b).unwrap();

        assert_eq!(lattice.to_rows(&sum).unwrap(), vec![vec![11, 22], vec![33, 44]]);
        lattice.validate(&sum).unwrap();
    }

    #[test]
    fn test_subtract_leaves_operands_alone() {
        let mut lattice = Lattice::new();
        let a = lattice.build(&[[1, 2], [3, 4]]).unwrap();
        let b = lattice.build(&[[4, 3], [2, 1]]).unwrap();

        let diff = lattice.subtract(&a, &b).unwrap();

        assert_eq!(lattice.to_rows(&diff).unwrap(), vec![vec![-3, -1], vec![1, 3]]);
        assert_eq!(lattice.to_rows(&a).unwrap(), vec![vec![1, 2], vec![3, 4]]);
        assert_eq!(lattice.to_rows(&b).unwrap(), vec![vec![4, 3], vec![2, 1]]);
        assert_eq!(lattice.live_nodes(), 12);
    }

    #[test]
    fn test_arithmetic_wraps() {
        let mut lattice = Lattice::new();
        let a = lattice.build(&[[i32::MAX, i32::MIN]]).unwrap();
        let b = lattice.build(&[[1, 1]]).unwrap();

        let sum = lattice.add(&a, &b).unwrap();
        let diff = lattice.subtract(&a, &b).unwrap();

        assert_eq!(lattice.to_rows(&sum).unwrap(), vec![vec![i32::MIN, i32::MIN + 1]]);
        assert_eq!(lattice.to_rows(&diff).unwrap(), vec![vec![i32::MAX - 1, i32::MAX]]);
    }

    #[test]
    fn test_shape_mismatch() {
        let mut lattice = Lattice::new();
        let a = lattice.build(&[[1, 2], [3, 4]]).unwrap();
        let b = lattice.build(&[[1, 2, 3], [4, 5, 6]]).unwrap();

        assert_eq!(
            lattice.add(&a, &b),
            Err(Error::ShapeMismatch {
                left: (2, 2),
                right: (3, 2)
            })
        );
        assert!(matches!(
            lattice.subtract(&b, &a),
            Err(Error::ShapeMismatch { .. })
        ));
    }
}
