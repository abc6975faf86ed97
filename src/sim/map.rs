/// The agent's running picture of the island.
///
/// Built up one 5x5 view at a time. Cells never seen read as `Unknown`.
/// Points of interest are indexed by kind so the planner doesn't have to
/// scan the whole map each tick.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::domain::entity::{Cell, Heading};
use crate::domain::terrain::{PoiKind, TerrainOracle};
use crate::domain::tile::Tile;

/// Bytes per view: a 5x5 square without the centre.
pub const VIEW_LEN: usize = 24;
const VIEW_SIDE: i32 = 5;
const VIEW_HALF: i32 = VIEW_SIDE / 2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bounds {
    pub min: Cell,
    pub max: Cell,
}

#[derive(Default)]
pub struct WorldMap {
    tiles: HashMap<Cell, Tile>,
    bounds: Option<Bounds>,
    pois: BTreeMap<PoiKind, BTreeSet<Cell>>,
    /// Some cell's symbol changed during the latest view update.
    pub map_updated: bool,
}

fn poi_kind(tile: Tile) -> Option<PoiKind> {
    match tile {
        Tile::Treasure => Some(PoiKind::Treasure),
        Tile::Axe => Some(PoiKind::Axe),
        Tile::Key => Some(PoiKind::Key),
        Tile::Door => Some(PoiKind::Door),
        Tile::StonePile => Some(PoiKind::StonePile),
        Tile::Tree => Some(PoiKind::Tree),
        _ => None,
    }
}

impl WorldMap {
    pub fn new() -> Self {
        WorldMap::default()
    }

    /// Merge a view received while standing at `pos` facing `facing`.
    ///
    /// The view is row-major and player-relative: row 0 is furthest ahead,
    /// column 0 is leftmost. The centre (the agent itself) is not sent.
    pub fn update_from_view(&mut self, view: &[u8; VIEW_LEN], pos: Cell, facing: Heading) {
        self.map_updated = false;

        let (fx, fy) = facing.delta();
        let (rx, ry) = facing.right().delta();
        let mut bytes = view.iter();
        for i in 0..VIEW_SIDE {
            for j in 0..VIEW_SIDE {
                if i == VIEW_HALF && j == VIEW_HALF {
                    continue;
                }
                let Some(&symbol) = bytes.next() else { return };
                let ahead = VIEW_HALF - i;
                let right = j - VIEW_HALF;
                let cell = pos.offset(fx * ahead + rx * right, fy * ahead + ry * right);
                let tile = Tile::from_symbol(symbol);
                if self.tile_at(cell) != tile {
                    self.map_updated = true;
                }
                self.set_tile(cell, tile);
            }
        }

        if self.tile_at(pos) == Tile::Unknown {
            self.set_tile(pos, Tile::Floor);
        }
    }

    /// Overwrite one cell, keeping bounds and POI index in step.
    /// Does not raise `map_updated`: local changes are expected ones.
    pub fn set_tile(&mut self, cell: Cell, tile: Tile) {
        if let Some(old) = self.tiles.insert(cell, tile).and_then(poi_kind) {
            if let Some(cells) = self.pois.get_mut(&old) {
                cells.remove(&cell);
            }
        }
        if let Some(kind) = poi_kind(tile) {
            self.pois.entry(kind).or_default().insert(cell);
        }
        self.grow_bounds(cell);
    }

    fn grow_bounds(&mut self, cell: Cell) {
        self.bounds = Some(match self.bounds {
            None => Bounds { min: cell, max: cell },
            Some(b) => Bounds {
                min: Cell::new(b.min.x.min(cell.x), b.min.y.min(cell.y)),
                max: Cell::new(b.max.x.max(cell.x), b.max.y.max(cell.y)),
            },
        });
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn treasure(&self) -> Option<Cell> {
        self.pois_of(PoiKind::Treasure).next()
    }

    pub fn pois_of(&self, kind: PoiKind) -> impl Iterator<Item = Cell> + '_ {
        self.pois.get(&kind).into_iter().flatten().copied()
    }
}

impl TerrainOracle for WorldMap {
    fn tile_at(&self, cell: Cell) -> Tile {
        self.tiles.get(&cell).copied().unwrap_or(Tile::Unknown)
    }

    fn points_of_interest(&self) -> Vec<(PoiKind, Cell)> {
        self.pois
            .iter()
            .flat_map(|(&kind, cells)| cells.iter().map(move |&cell| (kind, cell)))
            .collect()
    }
}
