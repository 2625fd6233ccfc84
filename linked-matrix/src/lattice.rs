//! Arena holding every node of every grid built from it.

use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use slotmap::SlotMap;

use crate::error::{Error, Result};
use crate::grid::LinkedGrid;
use crate::node::{Direction, Node, NodeId, NodeKey};

static NEXT_LATTICE_ID: AtomicU64 = AtomicU64::new(1);

/// Node storage shared by the grids it creates.
///
/// Grids are handles into a lattice: splitting and composing only rewrite
/// neighbor links here, while arithmetic and the 2x2 base case allocate
/// fresh nodes. Released slots are reused by later allocations under a new
/// generation, so handles into released nodes go stale instead of aliasing
/// their successors.
///
/// # Example
///
/// ```
/// use linked_matrix::Lattice;
///
/// let mut lattice = Lattice::new();
/// let x = lattice.build(&[[1, 2], [3, 4]]).unwrap();
/// let y = lattice.build(&[[5, 6], [7, 8]]).unwrap();
///
/// let product = lattice.multiply(x, y).unwrap();
/// assert_eq!(lattice.to_rows(&product).unwrap(), vec![vec![19, 22], vec![43, 50]]);
/// ```
#[derive(Debug)]
pub struct Lattice {
    id: NonZeroU64,
    nodes: SlotMap<NodeKey, Node>,
}

impl Lattice {
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let raw = NEXT_LATTICE_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            id: NonZeroU64::new(raw).unwrap_or(NonZeroU64::MIN),
            nodes: SlotMap::with_capacity_and_key(capacity),
        }
    }

    pub(crate) fn id(&self) -> NonZeroU64 {
        self.id
    }

    /// Number of nodes currently owned by some grid.
    pub fn live_nodes(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.resolve(id).ok().map(|key| &self.nodes[key])
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let key = self.resolve(id).ok()?;
        self.nodes.get_mut(key)
    }

    /// Allocates an unlinked node.
    pub fn alloc(&mut self, value: i32) -> NodeId {
        NodeId::new(self.id, self.nodes.insert(Node::new(value)))
    }

    /// Checks that `id` names a live node of this lattice.
    pub(crate) fn resolve(&self, id: NodeId) -> Result<NodeKey> {
        if id.lattice() != self.id {
            return Err(Error::MalformedGrid(format!(
                "node belongs to lattice {}, not {}",
                id.lattice(),
                self.id
            )));
        }
        if !self.nodes.contains_key(id.key()) {
            return Err(Error::MalformedGrid("node has been released".to_string()));
        }
        Ok(id.key())
    }

    fn contains(&self, id: NodeId) -> bool {
        self.resolve(id).is_ok()
    }

    /// Node behind an id obtained from a traversal of this lattice.
    pub(crate) fn get(&self, id: NodeId) -> &Node {
        &self.nodes[id.key()]
    }

    pub(crate) fn value(&self, id: NodeId) -> i32 {
        self.get(id).value()
    }

    /// Neighbor of a live node, if that neighbor is live too.
    pub(crate) fn step(&self, id: NodeId, direction: Direction) -> Option<NodeId> {
        self.nodes
            .get(id.key())?
            .neighbor(direction)
            .filter(|&next| self.contains(next))
    }

    /// Makes `to` the `direction` neighbor of `from` and `from` the opposite
    /// neighbor of `to`.
    pub fn link(&mut self, from: NodeId, direction: Direction, to: NodeId) -> Result<()> {
        self.resolve(from)?;
        self.resolve(to)?;
        self.wire(from, direction, to);
        Ok(())
    }

    pub(crate) fn wire(&mut self, from: NodeId, direction: Direction, to: NodeId) {
        self.nodes[from.key()].set_neighbor(direction, Some(to));
        self.nodes[to.key()].set_neighbor(direction.opposite(), Some(from));
    }

    /// Cuts the `direction` link of `from` on both sides. Returns the node
    /// that was on the other end.
    pub fn sever(&mut self, from: NodeId, direction: Direction) -> Result<Option<NodeId>> {
        self.resolve(from)?;
        Ok(self.unlink(from, direction))
    }

    pub(crate) fn unlink(&mut self, from: NodeId, direction: Direction) -> Option<NodeId> {
        let to = self.step(from, direction)?;
        self.nodes[from.key()].set_neighbor(direction, None);
        self.nodes[to.key()].set_neighbor(direction.opposite(), None);
        Some(to)
    }

    /// Follows `direction` exactly `steps` times.
    pub fn walk(&self, from: NodeId, direction: Direction, steps: usize) -> Result<NodeId> {
        self.resolve(from)?;
        let mut current = from;
        for taken in 0..steps {
            current = self.step(current, direction).ok_or_else(|| {
                Error::MalformedGrid(format!(
                    "{direction} chain ends after {taken} of {steps} steps"
                ))
            })?;
        }
        Ok(current)
    }

    /// Iterates `from` and every live node reachable by repeatedly going
    /// `direction`.
    pub(crate) fn chain(&self, from: Option<NodeId>, direction: Direction) -> Chain<'_> {
        Chain {
            lattice: self,
            next: from.filter(|&id| self.contains(id)),
            direction,
        }
    }

    /// Fails unless `grid` was made by this lattice and has not been released.
    pub(crate) fn ensure_owned(&self, grid: &LinkedGrid) -> Result<()> {
        if grid.lattice_id() != self.id {
            return Err(Error::MalformedGrid(format!(
                "grid belongs to lattice {}, not {}",
                grid.lattice_id(),
                self.id
            )));
        }
        if let Some(root) = grid.root() {
            if !self.contains(root) {
                return Err(Error::MalformedGrid("grid has been released".to_string()));
            }
        }
        Ok(())
    }

    /// Frees every node of `grid`.
    pub fn release(&mut self, grid: LinkedGrid) -> Result<()> {
        self.ensure_owned(&grid)?;
        let keys: Vec<NodeKey> = self
            .chain(grid.root(), Direction::South)
            .flat_map(|start| self.chain(Some(start), Direction::East))
            .map(NodeId::key)
            .collect();
        for key in keys {
            self.nodes.remove(key);
        }
        Ok(())
    }

    /// Frees the grids an operation consumed before failing with `err`.
    pub(crate) fn reject<T>(
        &mut self,
        grids: impl IntoIterator<Item = LinkedGrid>,
        err: Error,
    ) -> Result<T> {
        for grid in grids {
            // Foreign or already released grids hold nothing here.
            let _ = self.release(grid);
        }
        Err(err)
    }
}

impl Default for Lattice {
    fn default() -> Self {
        Self::new()
    }
}

pub(crate) struct Chain<'a> {
    lattice: &'a Lattice,
    next: Option<NodeId>,
    direction: Direction,
}

impl Iterator for Chain<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.lattice.step(current, self.direction);
        Some(current)
    }
}
