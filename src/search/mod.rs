//! State-augmented search over the grid.
//!
//! A search node is a cell plus the `ResourceState` the agent would have
//! on arriving there. Both strategies share the transition rules in
//! `domain::rules`; they differ only in expansion order and termination.

pub mod chain;
pub mod frontier;
pub mod informed;

use crate::domain::entity::{Cell, Heading};
use crate::domain::rules::ResourceState;

pub type Path = Vec<Cell>;

/// A found path together with the resource state at its last cell.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Route {
    pub path: Path,
    pub terminal: ResourceState,
}

impl Route {
    pub fn goal(&self) -> Cell {
        // Every route holds at least its start cell.
        self.path[self.path.len() - 1]
    }
}

/// Anything that can route a single leg from one cell to another.
pub trait LegSearch {
    fn route(&self, start: Cell, goal: Cell, initial: &ResourceState) -> Option<Route>;
}

/// Expansion order from a node: keep going straight, then turn left,
/// then right, and only then double back. With no arrival heading the
/// compass order is used.
pub(crate) fn candidate_headings(arrived_by: Option<Heading>) -> [Heading; 4] {
    match arrived_by {
        Some(h) => [h, h.left(), h.right(), h.reverse()],
        None => Heading::ALL,
    }
}

pub(crate) struct Node {
    pub cell: Cell,
    pub state: ResourceState,
    pub parent: Option<usize>,
}

/// Append-only node store; parents are indices into it.
#[derive(Default)]
pub(crate) struct Arena {
    nodes: Vec<Node>,
}

impl Arena {
    pub fn push(&mut self, cell: Cell, state: ResourceState, parent: Option<usize>) -> usize {
        self.nodes.push(Node { cell, state, parent });
        self.nodes.len() - 1
    }

    pub fn get(&self, idx: usize) -> &Node {
        &self.nodes[idx]
    }

    pub fn get_mut(&mut self, idx: usize) -> &mut Node {
        &mut self.nodes[idx]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Heading of the last step into `idx`, if it has a parent.
    pub fn arrived_by(&self, idx: usize) -> Option<Heading> {
        let node = &self.nodes[idx];
        let parent = &self.nodes[node.parent?];
        parent.cell.heading_to(node.cell)
    }

    /// Cells from the root to `idx`, inclusive.
    pub fn path_to(&self, idx: usize) -> Path {
        let mut path = vec![];
        let mut cursor = Some(idx);
        while let Some(i) = cursor {
            path.push(self.nodes[i].cell);
            cursor = self.nodes[i].parent;
        }
        path.reverse();
        path
    }
}
