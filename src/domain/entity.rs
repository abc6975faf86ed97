/// Entities: Cell, Heading, ActionStep, and the Player record.
/// World coordinates use screen orientation: x grows east, y grows south.

use std::fmt;

/// A grid position. Signed and unbounded; the search never assumes an origin.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub const fn new(x: i32, y: i32) -> Self {
        Cell { x, y }
    }

    pub fn offset(self, dx: i32, dy: i32) -> Cell {
        Cell { x: self.x + dx, y: self.y + dy }
    }

    pub fn step(self, heading: Heading) -> Cell {
        let (dx, dy) = heading.delta();
        self.offset(dx, dy)
    }

    pub fn manhattan(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Heading that leads from `self` to an orthogonal neighbour.
    pub fn heading_to(self, next: Cell) -> Option<Heading> {
        Heading::from_delta(next.x - self.x, next.y - self.y)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Compass heading, listed clockwise starting at north.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Heading {
    North,
    East,
    South,
    West,
}

impl Heading {
    pub const ALL: [Heading; 4] = [Heading::North, Heading::East, Heading::South, Heading::West];

    pub fn delta(self) -> (i32, i32) {
        match self {
            Heading::North => (0, -1),
            Heading::East => (1, 0),
            Heading::South => (0, 1),
            Heading::West => (-1, 0),
        }
    }

    pub fn from_delta(dx: i32, dy: i32) -> Option<Heading> {
        Heading::ALL.into_iter().find(|h| h.delta() == (dx, dy))
    }

    fn index(self) -> i8 {
        match self {
            Heading::North => 0,
            Heading::East => 1,
            Heading::South => 2,
            Heading::West => 3,
        }
    }

    fn from_index(i: i8) -> Heading {
        Heading::ALL[i.rem_euclid(4) as usize]
    }

    pub fn right(self) -> Heading {
        Heading::from_index(self.index() + 1)
    }

    pub fn left(self) -> Heading {
        Heading::from_index(self.index() - 1)
    }

    pub fn reverse(self) -> Heading {
        Heading::from_index(self.index() + 2)
    }

    /// Quarter turns needed to face `target`: positive = right, negative = left.
    /// A half turn is always expressed as two right turns.
    pub fn quarter_turns_to(self, target: Heading) -> i8 {
        match (target.index() - self.index()).rem_euclid(4) {
            0 => 0,
            1 => 1,
            2 => 2,
            _ => -1,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tool {
    Axe,
    Key,
}

/// One primitive command for the world server.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ActionStep {
    TurnLeft,
    TurnRight,
    UseTool(Tool),
    Forward,
}

impl ActionStep {
    /// Single-byte wire command.
    pub fn command(self) -> u8 {
        match self {
            ActionStep::TurnLeft => b'l',
            ActionStep::TurnRight => b'r',
            ActionStep::UseTool(Tool::Axe) => b'c',
            ActionStep::UseTool(Tool::Key) => b'u',
            ActionStep::Forward => b'f',
        }
    }
}

/// What the agent is actually carrying (authoritative, updated per action).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Inventory {
    pub has_axe: bool,
    pub has_key: bool,
    pub has_treasure: bool,
    pub has_raft: bool,
    pub on_raft: bool,
    pub stones_held: u32,
}

/// Start location is arbitrary; biased so coordinates stay positive on
/// any island the server can produce.
pub const START_CELL: Cell = Cell::new(100, 100);

#[derive(Clone, Debug)]
pub struct Player {
    pub pos: Cell,
    pub start: Cell,
    pub facing: Heading,
    pub inventory: Inventory,
}

impl Player {
    pub fn new() -> Self {
        Player::at(START_CELL, Heading::South)
    }

    pub fn at(pos: Cell, facing: Heading) -> Self {
        Player {
            pos,
            start: pos,
            facing,
            inventory: Inventory::default(),
        }
    }

    pub fn ahead(&self) -> Cell {
        self.pos.step(self.facing)
    }
}
