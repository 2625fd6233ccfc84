//! Destructive splitting by severing links at the midpoint.

use tracing::trace;

use crate::error::{Error, Result};
use crate::grid::LinkedGrid;
use crate::lattice::Lattice;
use crate::node::{Direction, NodeId};
use crate::strassen::Quadrants;

impl Lattice {
    /// Cuts `grid` between columns `width / 2 - 1` and `width / 2`.
    ///
    /// Returns `(left, right)`; the left half keeps the original root. A
    /// grid that cannot be split is released.
    pub fn split_vertical(&mut self, grid: LinkedGrid) -> Result<(LinkedGrid, LinkedGrid)> {
        let root = match self.splittable(&grid, grid.width()) {
            Ok(root) => root,
            Err(err) => return self.reject([grid], err),
        };
        let new_root = self.walk(root, Direction::East, grid.width() / 2)?;
        self.cut(new_root, Direction::West, Direction::South)?;

        let left = self.grid_from_root(Some(root))?;
        let right = self.grid_from_root(Some(new_root))?;
        trace!(left = ?left.shape(), right = ?right.shape(), "split vertical");
        Ok((left, right))
    }

    /// Cuts `grid` between rows `height / 2 - 1` and `height / 2`.
    ///
    /// Returns `(top, bottom)`; the top half keeps the original root. A
    /// grid that cannot be split is released.
    pub fn split_horizontal(&mut self, grid: LinkedGrid) -> Result<(LinkedGrid, LinkedGrid)> {
        let root = match self.splittable(&grid, grid.height()) {
            Ok(root) => root,
            Err(err) => return self.reject([grid], err),
        };
        let new_root = self.walk(root, Direction::South, grid.height() / 2)?;
        self.cut(new_root, Direction::North, Direction::East)?;

        let top = self.grid_from_root(Some(root))?;
        let bottom = self.grid_from_root(Some(new_root))?;
        trace!(top = ?top.shape(), bottom = ?bottom.shape(), "split horizontal");
        Ok((top, bottom))
    }

    /// Splits into quadrants: vertical first, then each half horizontally.
    pub fn quarter(&mut self, grid: LinkedGrid) -> Result<Quadrants<LinkedGrid>> {
        let (left, right) = self.split_vertical(grid)?;
        let (top_left, bottom_left) = match self.split_horizontal(left) {
            Ok(halves) => halves,
            Err(err) => return self.reject([right], err),
        };
        let (top_right, bottom_right) = self.split_horizontal(right)?;
        Ok(Quadrants {
            top_left,
            top_right,
            bottom_left,
            bottom_right,
        })
    }

    /// Severs the `side` link of every node from `start` along `along`.
    fn cut(&mut self, start: NodeId, side: Direction, along: Direction) -> Result<()> {
        let mut cursor = Some(start);
        while let Some(id) = cursor {
            if self.unlink(id, side).is_none() {
                return Err(Error::MalformedGrid(format!(
                    "missing {side} link along the split seam"
                )));
            }
            cursor = self.step(id, along);
        }
        Ok(())
    }

    fn splittable(&self, grid: &LinkedGrid, extent: usize) -> Result<NodeId> {
        self.ensure_owned(grid)?;
        match grid.root() {
            Some(root) if extent >= 2 => Ok(root),
            _ => Err(Error::Unsplittable {
                width: grid.width(),
                height: grid.height(),
            }),
        }
    }
}
