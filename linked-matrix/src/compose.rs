//! Stitching four quadrants back into one grid.

use tracing::trace;

use crate::error::{Error, Result};
use crate::grid::LinkedGrid;
use crate::lattice::Lattice;
use crate::node::{Direction, NodeId};
use crate::strassen::Quadrants;

impl Lattice {
    /// Links `top_right` east of `top_left`, `bottom_right` east of
    /// `bottom_left`, then the upper pair north of the lower pair.
    ///
    /// No node is copied; the result is rooted at `top_left`'s root. If the
    /// quadrants cannot be joined, all four are released.
    pub fn compose(&mut self, quadrants: Quadrants<LinkedGrid>) -> Result<LinkedGrid> {
        let [r, s, t, u] = match self.corners_of(&quadrants) {
            Ok(roots) => roots,
            Err(err) => {
                let Quadrants {
                    top_left,
                    top_right,
                    bottom_left,
                    bottom_right,
                } = quadrants;
                return self.reject([top_left, top_right, bottom_left, bottom_right], err);
            }
        };
        let (width, height) = quadrants.top_left.shape();

        // East seams, one row at a time.
        let r_edge = self.walk(r, Direction::East, width - 1)?;
        let t_edge = self.walk(t, Direction::East, width - 1)?;
        self.stitch(r_edge, s, Direction::East, Direction::South);
        self.stitch(t_edge, u, Direction::East, Direction::South);

        // South seam across the already joined halves.
        let r_bottom = self.walk(r, Direction::South, height - 1)?;
        self.stitch(r_bottom, t, Direction::South, Direction::East);

        let grid = self.grid_from_root(Some(r))?;
        trace!(shape = ?grid.shape(), "composed");
        Ok(grid)
    }

    /// Roots of four owned, equally shaped, non-empty quadrants.
    fn corners_of(&self, quadrants: &Quadrants<LinkedGrid>) -> Result<[NodeId; 4]> {
        let top_left = &quadrants.top_left;
        let parts = [
            top_left,
            &quadrants.top_right,
            &quadrants.bottom_left,
            &quadrants.bottom_right,
        ];
        for part in parts {
            self.ensure_owned(part)?;
            if part.shape() != top_left.shape() {
                return Err(Error::ShapeMismatch {
                    left: top_left.shape(),
                    right: part.shape(),
                });
            }
        }
        match parts.map(LinkedGrid::root) {
            [Some(r), Some(s), Some(t), Some(u)] => Ok([r, s, t, u]),
            _ => Err(Error::MalformedGrid("cannot compose empty quadrants".to_string())),
        }
    }

    /// Links `upper` to `lower` in direction `link`, advancing both along
    /// `along` until either runs out.
    fn stitch(&mut self, upper: NodeId, lower: NodeId, link: Direction, along: Direction) {
        let (mut a, mut b) = (Some(upper), Some(lower));
        while let (Some(x), Some(y)) = (a, b) {
            self.wire(x, link, y);
            a = self.step(x, along);
            b = self.step(y, along);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_two_by_two_quadrants() {
        let mut lattice = Lattice::new();
        let quadrants = Quadrants {
            top_left: lattice.build(&[[1, 2], [5, 6]]).unwrap(),
            top_right: lattice.build(&[[3, 4], [7, 8]]).unwrap(),
            bottom_left: lattice.build(&[[9, 10], [13, 14]]).unwrap(),
            bottom_right: lattice.build(&[[11, 12], [15, 16]]).unwrap(),
        };

        let grid = lattice.compose(quadrants).unwrap();

        assert_eq!(grid.shape(), (4, 4));
        assert_eq!(
            lattice.to_rows(&grid).unwrap(),
            vec![
                vec![1, 2, 3, 4],
                vec![5, 6, 7, 8],
                vec![9, 10, 11, 12],
                vec![13, 14, 15, 16],
            ]
        );
        lattice.validate(&grid).unwrap();
    }

    #[test]
    fn test_compose_single_cells() {
        let mut lattice = Lattice::new();
        let quadrants = Quadrants {
            top_left: lattice.build(&[[1]]).unwrap(),
            top_right: lattice.build(&[[2]]).unwrap(),
            bottom_left: lattice.build(&[[3]]).unwrap(),
            bottom_right: lattice.build(&[[4]]).unwrap(),
        };

        let grid = lattice.compose(quadrants).unwrap();

        assert_eq!(lattice.to_rows(&grid).unwrap(), vec![vec![1, 2], vec![3, 4]]);
        lattice.validate(&grid).unwrap();
    }

    #[test]
    fn test_quarter_then_compose_restores_grid() {
        let mut lattice = Lattice::new();
        let rows: Vec<Vec<i32>> = (0..6)
            .map(|r| (0..6).map(|c| r * 10 + c).collect())
            .collect();
        let grid = lattice.build(&rows).unwrap();

        let quadrants = lattice.quarter(grid).unwrap();
        let grid = lattice.compose(quadrants).unwrap();

        assert_eq!(lattice.to_rows(&grid).unwrap(), rows);
        lattice.validate(&grid).unwrap();
    }

    #[test]
    fn test_compose_shape_mismatch() {
        let mut lattice = Lattice::new();
        let quadrants = Quadrants {
            top_left: lattice.build(&[[1, 2], [3, 4]]).unwrap(),
            top_right: lattice.build(&[[1, 2], [3, 4]]).unwrap(),
            bottom_left: lattice.build(&[[1, 2, 3]]).unwrap(),
            bottom_right: lattice.build(&[[1, 2], [3, 4]]).unwrap(),
        };

        assert_eq!(
            lattice.compose(quadrants),
            Err(Error::ShapeMismatch {
                left: (2, 2),
                right: (3, 1)
            })
        );
        assert_eq!(lattice.live_nodes(), 0);
    }

    #[test]
    fn test_compose_rejects_foreign_quadrant() {
        let mut other = Lattice::new();
        let mut lattice = Lattice::new();
        let quadrants = Quadrants {
            top_left: lattice.build(&[[1]]).unwrap(),
            top_right: lattice.build(&[[2]]).unwrap(),
            bottom_left: other.build(&[[3]]).unwrap(),
            bottom_right: lattice.build(&[[4]]).unwrap(),
        };

        assert!(matches!(
            lattice.compose(quadrants),
            Err(Error::MalformedGrid(_))
        ));
        assert_eq!(lattice.live_nodes(), 0);
        assert_eq!(other.live_nodes(), 1);
    }

    #[test]
    fn test_compose_empty_quadrants() {
        let mut lattice = Lattice::new();
        let quadrants = Quadrants {
            top_left: lattice.empty_grid(),
            top_right: lattice.empty_grid(),
            bottom_left: lattice.empty_grid(),
            bottom_right: lattice.empty_grid(),
        };

        assert!(matches!(
            lattice.compose(quadrants),
            Err(Error::MalformedGrid(_))
        ));
    }
}
