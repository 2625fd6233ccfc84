//! Matrix cells and the four-way neighbor relation between them.

use std::fmt;
use std::num::NonZeroU64;

use slotmap::new_key_type;

new_key_type! {
    /// Generational slot of a node; stale once the node is released.
    pub(crate) struct NodeKey;
}

/// Handle of a [`Node`] inside a [`Lattice`](crate::Lattice).
///
/// Handles carry no ownership. A node belongs to whichever grid can reach it
/// from its root by walking east and south. A handle names its lattice and
/// the generation of its slot, so it never resolves to a node of another
/// lattice or to a later occupant of a released slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    lattice: NonZeroU64,
    key: NodeKey,
}

impl NodeId {
    pub(crate) fn new(lattice: NonZeroU64, key: NodeKey) -> Self {
        Self { lattice, key }
    }

    pub(crate) fn lattice(self) -> NonZeroU64 {
        self.lattice
    }

    pub(crate) fn key(self) -> NodeKey {
        self.key
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn opposite(self) -> Self {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        };
        f.write_str(name)
    }
}

/// A single matrix cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    value: i32,
    north: Option<NodeId>,
    east: Option<NodeId>,
    south: Option<NodeId>,
    west: Option<NodeId>,
}

impl Node {
    pub fn new(value: i32) -> Self {
        Self {
            value,
            north: None,
            east: None,
            south: None,
            west: None,
        }
    }

    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn set_value(&mut self, value: i32) {
        self.value = value;
    }

    pub fn neighbor(&self, direction: Direction) -> Option<NodeId> {
        match direction {
            Direction::North => self.north,
            Direction::East => self.east,
            Direction::South => self.south,
            Direction::West => self.west,
        }
    }

    pub fn north(&self) -> Option<NodeId> {
        self.north
    }

    pub fn east(&self) -> Option<NodeId> {
        self.east
    }

    pub fn south(&self) -> Option<NodeId> {
        self.south
    }

    pub fn west(&self) -> Option<NodeId> {
        self.west
    }

    /// Overwrites one side of a relation. The lattice keeps the mirror side in
    /// step; nothing outside it should call this.
    pub(crate) fn set_neighbor(&mut self, direction: Direction, id: Option<NodeId>) {
        match direction {
            Direction::North => self.north = id,
            Direction::East => self.east = id,
            Direction::South => self.south = id,
            Direction::West => self.west = id,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node: {}", self.value)
    }
}
