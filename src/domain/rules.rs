/// Transition rules: resource-gated movement between adjacent cells.
///
/// Pure functions over (terrain, resource state). A move either yields a
/// fresh successor state or is denied; the input state is never touched.
///
/// ## Effective terrain
///
/// A cell listed in `placed_stones` reads as a placed stone (floor) no
/// matter what the map says. A cell listed in `cleared` (item taken, tree
/// felled, door opened earlier in the same search) reads as floor.
/// "Water" below always means effective water.
///
/// ## Movement Truth Table (first matching row wins)
/// ┌───┬─────────────────────────────┬───────────────────────────────────────┐
/// │ # │ Condition                   │ Outcome                               │
/// ├───┼─────────────────────────────┼───────────────────────────────────────┤
/// │ 1 │ water → water, on_raft      │ ALLOW, no change                      │
/// │ 2 │ water → land                │ DENY unless cross_divide; else clear  │
/// │   │                             │ on_raft and judge the land tile below │
/// │ 3 │ land → water                │ DENY unless cross_divide; spend a     │
/// │   │                             │ stone (placed) or else the raft       │
/// │   │                             │ (now afloat); DENY if neither         │
/// │ 4 │ dest is an item             │ ALLOW, collect it                     │
/// │ 5 │ dest is a tree              │ needs axe; grants a raft unless one   │
/// │   │                             │ is held or we arrived afloat; with a  │
/// │   │                             │ raft, only if allow_waste_trees       │
/// │ 6 │ dest is a locked door       │ needs key                             │
/// │ 7 │ dest is floor / placed stone│ ALLOW                                 │
/// │ 8 │ anything else               │ DENY                                  │
/// └───┴─────────────────────────────┴───────────────────────────────────────┘
///
/// Row 2 is a gate rather than a terminal rule: leaving the water onto a
/// wall or a locked door is still judged by rows 4-8.

use std::collections::BTreeSet;

use super::entity::{Cell, Inventory};
use super::terrain::TerrainOracle;
use super::tile::Tile;

/// Escalation flags the caller raises only after cheaper plans fail.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Policy {
    pub cross_divide: bool,
    pub allow_waste_trees: bool,
}

impl Policy {
    pub const CAUTIOUS: Policy = Policy { cross_divide: false, allow_waste_trees: false };
    pub const CROSS_DIVIDE: Policy = Policy { cross_divide: true, allow_waste_trees: false };
    pub const RECKLESS: Policy = Policy { cross_divide: true, allow_waste_trees: true };
}

/// Inventory plus terrain changes as imagined along one search branch.
///
/// Part of the search key: two arrivals at the same cell with different
/// resource states are different nodes.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct ResourceState {
    pub has_axe: bool,
    pub has_key: bool,
    pub has_treasure: bool,
    pub stones_held: u32,
    pub has_raft: bool,
    pub on_raft: bool,
    /// Water cells a stone was dropped into. Permanently floor.
    pub placed_stones: BTreeSet<Cell>,
    /// Land cells whose item, tree or door has been consumed.
    pub cleared: BTreeSet<Cell>,
    pub cross_divide: bool,
    pub allow_waste_trees: bool,
}

impl ResourceState {
    /// Fresh state from what the player really carries.
    pub fn from_inventory(inv: &Inventory, policy: Policy) -> Self {
        ResourceState {
            has_axe: inv.has_axe,
            has_key: inv.has_key,
            has_treasure: inv.has_treasure,
            stones_held: inv.stones_held,
            has_raft: inv.has_raft,
            on_raft: inv.on_raft,
            placed_stones: BTreeSet::new(),
            cleared: BTreeSet::new(),
            cross_divide: policy.cross_divide,
            allow_waste_trees: policy.allow_waste_trees,
        }
    }

    pub fn policy(&self) -> Policy {
        Policy {
            cross_divide: self.cross_divide,
            allow_waste_trees: self.allow_waste_trees,
        }
    }

    /// Tile at `cell` with this branch's own terrain changes applied.
    pub fn effective_tile(&self, terrain: &impl TerrainOracle, cell: Cell) -> Tile {
        if self.placed_stones.contains(&cell) {
            return Tile::PlacedStone;
        }
        if self.cleared.contains(&cell) {
            return Tile::Floor;
        }
        terrain.tile_at(cell)
    }
}

/// Try to move from `from` to the adjacent cell `to`.
///
/// Returns the successor state if the move is legal. See truth table above.
pub fn attempt_move(
    terrain: &impl TerrainOracle,
    from: Cell,
    to: Cell,
    state: &ResourceState,
) -> Option<ResourceState> {
    let here = state.effective_tile(terrain, from);
    let there = state.effective_tile(terrain, to);
    let arrived_afloat = state.on_raft;

    // Row 1
    if here.is_water() && there.is_water() {
        return state.on_raft.then(|| state.clone());
    }

    let mut next = state.clone();

    // Row 2
    if here.is_water() {
        if !state.cross_divide {
            return None;
        }
        next.on_raft = false;
    }

    // Row 3
    if there.is_water() {
        if !state.cross_divide {
            return None;
        }
        if next.stones_held > 0 {
            next.stones_held -= 1;
            next.placed_stones.insert(to);
        } else if next.has_raft {
            next.has_raft = false;
            next.on_raft = true;
        } else {
            return None;
        }
        return Some(next);
    }

    match there {
        // Row 4
        Tile::Axe => next.has_axe = true,
        Tile::Key => next.has_key = true,
        Tile::Treasure => next.has_treasure = true,
        Tile::StonePile => next.stones_held += 1,
        // Row 5
        Tile::Tree => {
            if !next.has_axe {
                return None;
            }
            if !next.has_raft && !arrived_afloat {
                next.has_raft = true;
            } else if !next.allow_waste_trees {
                return None;
            }
        }
        // Row 6
        Tile::Door => {
            if !next.has_key {
                return None;
            }
        }
        // Row 7
        t if t.is_open() => return Some(next),
        // Row 8
        _ => return None,
    }

    next.cleared.insert(to);
    Some(next)
}
