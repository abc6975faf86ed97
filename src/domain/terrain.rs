/// Read-only terrain queries used by the search layer.
///
/// The search never owns the map: it is handed something that can answer
/// "what is at this cell" and "where are the interesting things". `WorldMap`
/// is the live implementation; tests use small string-diagram grids.

use super::entity::Cell;
use super::tile::Tile;

/// Kinds of point of interest the map keeps track of.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum PoiKind {
    Treasure,
    Axe,
    Key,
    Door,
    StonePile,
    Tree,
}

pub trait TerrainOracle {
    fn tile_at(&self, cell: Cell) -> Tile;

    /// Every known, not-yet-consumed point of interest.
    fn points_of_interest(&self) -> Vec<(PoiKind, Cell)>;

    fn is_unexplored(&self, cell: Cell) -> bool {
        self.tile_at(cell) == Tile::Unknown
    }

    /// Any unexplored cell in the (2r+1)x(2r+1) square centred on `cell`.
    fn any_unexplored_nearby(&self, cell: Cell, radius: u32) -> bool {
        let r = radius as i32;
        (-r..=r).any(|dy| (-r..=r).any(|dx| self.is_unexplored(cell.offset(dx, dy))))
    }
}
