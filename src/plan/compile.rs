/// Step compiler: geometric path → primitive commands.
///
/// For each step: turn to face the next cell, use a tool if the cell
/// needs one (door → key, tree → axe), then move forward. Tools picked up
/// earlier on the same path count. Compilation stops at the first cell
/// that cannot be entered with what the agent will be carrying; the rest
/// of the path is dropped and re-planned later.

use std::collections::HashSet;

use tracing::debug;

use crate::domain::entity::{ActionStep, Cell, Heading, Inventory, Tool};
use crate::domain::terrain::TerrainOracle;
use crate::domain::tile::Tile;

pub fn compile(
    terrain: &impl TerrainOracle,
    path: &[Cell],
    facing: Heading,
    inventory: &Inventory,
) -> Vec<ActionStep> {
    let mut steps = vec![];
    let mut facing = facing;
    let mut has_axe = inventory.has_axe;
    let mut has_key = inventory.has_key;
    let mut cleared: HashSet<Cell> = HashSet::new();

    for pair in path.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        let Some(heading) = from.heading_to(to) else {
            debug!(%from, %to, "path is not contiguous, truncating plan");
            break;
        };

        let turns = facing.quarter_turns_to(heading);
        let turn = if turns < 0 { ActionStep::TurnLeft } else { ActionStep::TurnRight };
        steps.extend(std::iter::repeat(turn).take(turns.unsigned_abs() as usize));
        facing = heading;

        let tile = if cleared.contains(&to) { Tile::Floor } else { terrain.tile_at(to) };
        match tile {
            Tile::Door if has_key => steps.push(ActionStep::UseTool(Tool::Key)),
            Tile::Tree if has_axe => steps.push(ActionStep::UseTool(Tool::Axe)),
            Tile::Door | Tile::Tree => {
                debug!(cell = %to, ?tile, "missing tool, truncating plan");
                break;
            }
            Tile::Axe => has_axe = true,
            Tile::Key => has_key = true,
            t if t.is_blocking() => {
                debug!(cell = %to, ?tile, "impassable tile, truncating plan");
                break;
            }
            _ => {}
        }
        if matches!(tile, Tile::Door | Tile::Tree) || tile.is_item() {
            cleared.insert(to);
        }
        steps.push(ActionStep::Forward);
    }

    steps
}
