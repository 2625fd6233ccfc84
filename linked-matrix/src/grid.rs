//! Linked grids: construction, read-back and structural checks.

use std::fmt;
use std::num::NonZeroU64;

use crate::error::{Error, Result};
use crate::lattice::Lattice;
use crate::node::{Direction, NodeId};

/// A rectangular region of a [`Lattice`], identified by its top-left node.
///
/// The grid owns every node reachable from `root` by east and south steps.
/// It is a move-only handle: splitting, composing and multiplying consume it,
/// so a grid that has been taken apart cannot be read as a whole again.
#[derive(Debug, PartialEq, Eq)]
pub struct LinkedGrid {
    lattice: NonZeroU64,
    root: Option<NodeId>,
    width: usize,
    height: usize,
}

impl LinkedGrid {
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`
    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn lattice_id(&self) -> NonZeroU64 {
        self.lattice
    }
}

impl Lattice {
    /// The null grid: no root, zero width and height.
    pub fn empty_grid(&self) -> LinkedGrid {
        LinkedGrid {
            lattice: self.id(),
            root: None,
            width: 0,
            height: 0,
        }
    }

    /// Wraps an already wired rectangle, measuring it from `root`.
    ///
    /// `root` must be a live node of this lattice with no north or west
    /// neighbor.
    pub fn grid_from_root(&self, root: Option<NodeId>) -> Result<LinkedGrid> {
        let Some(root) = root else {
            return Ok(self.empty_grid());
        };
        self.resolve(root)?;
        if self.step(root, Direction::North).is_some() || self.step(root, Direction::West).is_some()
        {
            return Err(Error::MalformedGrid("root is not a top-left corner".to_string()));
        }
        Ok(LinkedGrid {
            lattice: self.id(),
            root: Some(root),
            width: self.chain(Some(root), Direction::East).count(),
            height: self.chain(Some(root), Direction::South).count(),
        })
    }

    /// Builds a grid from row-major values.
    ///
    /// Every row must have the length of the first one. An input without
    /// rows, or whose rows are empty, yields the null grid.
    pub fn build<R: AsRef<[i32]>>(&mut self, rows: &[R]) -> Result<LinkedGrid> {
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        if let Some((index, row)) = rows
            .iter()
            .enumerate()
            .find(|(_, row)| row.as_ref().len() != width)
        {
            return Err(Error::MalformedGrid(format!(
                "row {index} has {} cells, expected {width}",
                row.as_ref().len()
            )));
        }
        if width == 0 {
            return Ok(self.empty_grid());
        }

        let mut root = None;
        // Leading node of the row above, anchoring the north/south links.
        let mut above: Option<NodeId> = None;

        for row in rows {
            let mut top = above;
            let mut west: Option<NodeId> = None;
            let mut leading = None;

            for &value in row.as_ref() {
                let id = self.alloc(value);
                match west {
                    Some(west) => self.wire(west, Direction::East, id),
                    None => leading = Some(id),
                }
                if let Some(north) = top {
                    self.wire(north, Direction::South, id);
                    top = self.step(north, Direction::East);
                }
                west = Some(id);
            }

            if root.is_none() {
                root = leading;
            }
            above = leading;
        }

        Ok(LinkedGrid {
            lattice: self.id(),
            root,
            width,
            height: rows.len(),
        })
    }

    /// Reads the grid back into row-major values.
    pub fn to_rows(&self, grid: &LinkedGrid) -> Result<Vec<Vec<i32>>> {
        self.ensure_owned(grid)?;
        Ok(self
            .chain(grid.root, Direction::South)
            .map(|start| {
                self.chain(Some(start), Direction::East)
                    .map(|id| self.value(id))
                    .collect()
            })
            .collect())
    }

    /// Walks the whole grid and checks that it is a rectangular lattice of the
    /// cached size with symmetric links and no links leaving its border.
    pub fn validate(&self, grid: &LinkedGrid) -> Result<()> {
        self.ensure_owned(grid)?;
        let Some(root) = grid.root else {
            if grid.width != 0 || grid.height != 0 {
                return Err(Error::MalformedGrid(format!(
                    "rootless grid claims {}x{}",
                    grid.width, grid.height
                )));
            }
            return Ok(());
        };

        let mut previous: Vec<NodeId> = Vec::with_capacity(grid.width);
        let mut start = Some(root);

        for row in 0..grid.height {
            let Some(leading) = start else {
                return Err(Error::MalformedGrid(format!(
                    "column 0 ends after {row} of {} rows",
                    grid.height
                )));
            };

            let current: Vec<NodeId> = self.chain(Some(leading), Direction::East).collect();
            if current.len() != grid.width {
                return Err(Error::MalformedGrid(format!(
                    "row {row} has {} cells, expected {}",
                    current.len(),
                    grid.width
                )));
            }

            for (col, &id) in current.iter().enumerate() {
                let node = self.get(id);

                let west = col.checked_sub(1).map(|c| current[c]);
                if node.west() != west {
                    return Err(asymmetric(row, col, Direction::West));
                }
                let east = current.get(col + 1).copied();
                if let Some(east) = east {
                    if self.get(east).west() != Some(id) {
                        return Err(asymmetric(row, col, Direction::East));
                    }
                }

                let north = previous.get(col).copied();
                if node.north() != north {
                    return Err(asymmetric(row, col, Direction::North));
                }
                if let Some(north) = north {
                    if self.get(north).south() != Some(id) {
                        return Err(asymmetric(row, col, Direction::North));
                    }
                }

                if row + 1 == grid.height && node.south().is_some() {
                    return Err(asymmetric(row, col, Direction::South));
                }
            }

            start = self.step(leading, Direction::South);
            previous = current;
        }

        Ok(())
    }

    /// Adapter printing the grid's size and cells.
    pub fn display<'a>(&'a self, grid: &'a LinkedGrid) -> GridDisplay<'a> {
        GridDisplay {
            lattice: self,
            grid,
        }
    }
}

fn asymmetric(row: usize, col: usize, direction: Direction) -> Error {
    Error::MalformedGrid(format!(
        "{direction} link of cell ({row}, {col}) is not mirrored"
    ))
}

pub struct GridDisplay<'a> {
    lattice: &'a Lattice,
    grid: &'a LinkedGrid,
}

impl fmt::Display for GridDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(rows) = self.lattice.to_rows(self.grid) else {
            return writeln!(f, "<grid from another lattice>");
        };

        writeln!(f, "LinkedGrid {}x{}", self.grid.width, self.grid.height)?;
        for row in rows {
            for value in row {
                write!(f, " [{value}] ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_round_trip() {
        let mut lattice = Lattice::new();
        let rows = vec![vec![1, 2, 3], vec![4, 5, 6]];
        let grid = lattice.build(&rows).unwrap();

        assert_eq!(grid.shape(), (3, 2));
        assert_eq!(lattice.to_rows(&grid).unwrap(), rows);
        lattice.validate(&grid).unwrap();
    }

    #[test]
    fn test_build_single_cell() {
        let mut lattice = Lattice::new();
        let grid = lattice.build(&[[9]]).unwrap();

        assert_eq!(grid.shape(), (1, 1));
        assert_eq!(lattice.to_rows(&grid).unwrap(), vec![vec![9]]);
        lattice.validate(&grid).unwrap();
    }

    #[test]
    fn test_build_column() {
        let mut lattice = Lattice::new();
        let grid = lattice.build(&[[1], [2], [3]]).unwrap();

        assert_eq!(grid.shape(), (1, 3));
        lattice.validate(&grid).unwrap();
    }

    #[test]
    fn test_empty_input_is_null_grid() {
        let mut lattice = Lattice::new();
        let none: [[i32; 0]; 0] = [];
        let grid = lattice.build(&none).unwrap();

        assert!(grid.is_empty());
        assert_eq!(grid.shape(), (0, 0));
        assert!(lattice.to_rows(&grid).unwrap().is_empty());
        lattice.validate(&grid).unwrap();

        let blank: Vec<Vec<i32>> = vec![vec![], vec![]];
        assert!(lattice.build(&blank).unwrap().is_empty());
    }

    #[test]
    fn test_ragged_input_is_rejected() {
        let mut lattice = Lattice::new();
        let rows = vec![vec![1, 2], vec![3]];

        let err = lattice.build(&rows).unwrap_err();
        assert_eq!(
            err,
            Error::MalformedGrid("row 1 has 1 cells, expected 2".to_string())
        );
        assert_eq!(lattice.live_nodes(), 0);
    }

    #[test]
    fn test_grid_from_root_measures_size() {
        let mut lattice = Lattice::new();
        let grid = lattice.build(&[[1, 2, 3, 4], [5, 6, 7, 8]]).unwrap();

        let again = lattice.grid_from_root(grid.root()).unwrap();
        assert_eq!(again, grid);

        let null = lattice.grid_from_root(None).unwrap();
        assert!(null.is_empty());
        assert_eq!(null.shape(), (0, 0));
    }

    #[test]
    fn test_grid_from_root_rejects_interior_node() {
        let mut lattice = Lattice::new();
        let grid = lattice.build(&[[1, 2], [3, 4]]).unwrap();
        let east = lattice.walk(grid.root().unwrap(), Direction::East, 1).unwrap();
        let south = lattice.walk(grid.root().unwrap(), Direction::South, 1).unwrap();

        assert!(matches!(
            lattice.grid_from_root(Some(east)),
            Err(Error::MalformedGrid(_))
        ));
        assert!(lattice.grid_from_root(Some(south)).is_err());
    }

    #[test]
    fn test_grid_from_root_rejects_released_root() {
        let mut lattice = Lattice::new();
        let grid = lattice.build(&[[1, 2], [3, 4]]).unwrap();
        let root = grid.root();
        lattice.release(grid).unwrap();

        assert!(matches!(
            lattice.grid_from_root(root),
            Err(Error::MalformedGrid(_))
        ));
    }

    #[test]
    fn test_validate_detects_one_sided_link() {
        let mut lattice = Lattice::new();
        let grid = lattice.build(&[[1, 2], [3, 4]]).unwrap();
        let root = grid.root().unwrap();
        let east = lattice.step(root, Direction::East).unwrap();

        lattice
            .node_mut(east)
            .unwrap()
            .set_neighbor(Direction::West, None);

        assert!(matches!(
            lattice.validate(&grid),
            Err(Error::MalformedGrid(_))
        ));
    }

    #[test]
    fn test_validate_detects_stray_border_link() {
        let mut lattice = Lattice::new();
        let grid = lattice.build(&[[1, 2], [3, 4]]).unwrap();
        let stray = lattice.alloc(0);
        let corner = lattice.walk(grid.root().unwrap(), Direction::South, 1).unwrap();

        lattice.node_mut(corner).unwrap().set_neighbor(Direction::South, Some(stray));

        assert!(lattice.validate(&grid).is_err());
    }

    #[test]
    fn test_display() {
        let mut lattice = Lattice::new();
        let grid = lattice.build(&[[1, -2], [3, 4]]).unwrap();

        assert_eq!(
            lattice.display(&grid).to_string(),
            "LinkedGrid 2x2\n [1]  [-2] \n [3]  [4] \n"
        );
    }
}
