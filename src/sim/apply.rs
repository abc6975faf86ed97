/// Authoritative update of the player and map for one issued command.
///
/// Mirrors what the server will do with the command, so the agent's own
/// bookkeeping (inventory, consumed tiles, position) stays in step with
/// the world between views. Searches never call this; they work on
/// `ResourceState` copies instead.

use tracing::{debug, info};

use super::event::WorldEvent;
use super::map::WorldMap;
use crate::domain::entity::{ActionStep, Player, Tool};
use crate::domain::terrain::TerrainOracle;
use crate::domain::tile::Tile;

pub fn apply_action(map: &mut WorldMap, player: &mut Player, action: ActionStep) -> Vec<WorldEvent> {
    let mut events = vec![];
    let ahead = player.ahead();
    let tile = map.tile_at(ahead);
    let inv = &mut player.inventory;

    match action {
        ActionStep::TurnLeft => player.facing = player.facing.left(),
        ActionStep::TurnRight => player.facing = player.facing.right(),

        ActionStep::UseTool(Tool::Axe) if tile == Tile::Tree && inv.has_axe => {
            // No raft is built while standing on one.
            let raft = !inv.on_raft;
            if raft {
                inv.has_raft = true;
            }
            map.set_tile(ahead, Tile::Floor);
            events.push(WorldEvent::TreeFelled { cell: ahead, raft });
        }
        ActionStep::UseTool(Tool::Key) if tile == Tile::Door && inv.has_key => {
            map.set_tile(ahead, Tile::Floor);
            events.push(WorldEvent::DoorOpened { cell: ahead });
        }
        ActionStep::UseTool(_) => events.push(WorldEvent::Blocked { cell: ahead, tile }),

        ActionStep::Forward => {
            if tile.is_water() {
                if inv.on_raft {
                    // paddling on
                } else if inv.stones_held > 0 {
                    inv.stones_held -= 1;
                    map.set_tile(ahead, Tile::PlacedStone);
                    events.push(WorldEvent::StonePlaced { cell: ahead });
                } else if inv.has_raft {
                    inv.has_raft = false;
                    inv.on_raft = true;
                    events.push(WorldEvent::RaftLaunched { cell: ahead });
                } else {
                    events.push(WorldEvent::Blocked { cell: ahead, tile });
                    return events;
                }
            } else {
                match tile {
                    Tile::Axe => inv.has_axe = true,
                    Tile::Key => inv.has_key = true,
                    Tile::Treasure => inv.has_treasure = true,
                    Tile::StonePile => inv.stones_held += 1,
                    Tile::Floor | Tile::PlacedStone => {}
                    _ => {
                        events.push(WorldEvent::Blocked { cell: ahead, tile });
                        return events;
                    }
                }
                if tile.is_item() {
                    map.set_tile(ahead, Tile::Floor);
                    events.push(WorldEvent::ItemCollected { tile, cell: ahead });
                }
                if inv.on_raft {
                    // The raft is left behind at the shore.
                    inv.on_raft = false;
                    events.push(WorldEvent::Landed { cell: ahead });
                }
            }
            player.pos = ahead;
        }
    }

    for event in &events {
        match event {
            WorldEvent::Blocked { .. } => debug!(?action, ?event, "command had no effect"),
            _ => info!(?event, "world changed"),
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::{Cell, Heading};

    /// Lay a single row of symbols out along y = 0 and stand on x = 0 facing east.
    fn strip(symbols: &str) -> (WorldMap, Player) {
        let mut map = WorldMap::new();
        for (x, b) in symbols.bytes().enumerate() {
            map.set_tile(Cell::new(x as i32, 0), Tile::from_symbol(b));
        }
        (map, Player::at(Cell::new(0, 0), Heading::East))
    }

    #[test]
    fn turning_only_changes_heading() {
        let (mut map, mut p) = strip("  ");
        assert!(apply_action(&mut map, &mut p, ActionStep::TurnLeft).is_empty());
        assert_eq!(p.facing, Heading::North);
        apply_action(&mut map, &mut p, ActionStep::TurnRight);
        apply_action(&mut map, &mut p, ActionStep::TurnRight);
        assert_eq!(p.facing, Heading::South);
        assert_eq!(p.pos, Cell::new(0, 0));
    }

    #[test]
    fn walking_collects_items() {
        let (mut map, mut p) = strip(" ako$");
        for _ in 0..4 {
            apply_action(&mut map, &mut p, ActionStep::Forward);
        }
        let inv = &p.inventory;
        assert!(inv.has_axe && inv.has_key && inv.has_treasure);
        assert_eq!(inv.stones_held, 1);
        assert_eq!(p.pos, Cell::new(4, 0));
        assert_eq!(map.tile_at(Cell::new(1, 0)), Tile::Floor);
        assert!(map.points_of_interest().is_empty());
    }

    #[test]
    fn walls_and_shut_doors_block() {
        let (mut map, mut p) = strip(" -");
        let events = apply_action(&mut map, &mut p, ActionStep::Forward);
        assert_eq!(events, vec![WorldEvent::Blocked { cell: Cell::new(1, 0), tile: Tile::Door }]);
        assert_eq!(p.pos, Cell::new(0, 0));

        let events = apply_action(&mut map, &mut p, ActionStep::UseTool(Tool::Key));
        assert!(matches!(events[0], WorldEvent::Blocked { .. }));
        assert_eq!(map.tile_at(Cell::new(1, 0)), Tile::Door);
    }

    #[test]
    fn key_opens_door() {
        let (mut map, mut p) = strip(" - ");
        p.inventory.has_key = true;
        let events = apply_action(&mut map, &mut p, ActionStep::UseTool(Tool::Key));
        assert_eq!(events, vec![WorldEvent::DoorOpened { cell: Cell::new(1, 0) }]);
        apply_action(&mut map, &mut p, ActionStep::Forward);
        assert_eq!(p.pos, Cell::new(1, 0));
    }

    #[test]
    fn chopping_on_land_builds_a_raft() {
        let (mut map, mut p) = strip(" T");
        p.inventory.has_axe = true;
        let events = apply_action(&mut map, &mut p, ActionStep::UseTool(Tool::Axe));
        assert_eq!(events, vec![WorldEvent::TreeFelled { cell: Cell::new(1, 0), raft: true }]);
        assert!(p.inventory.has_raft);
        assert_eq!(map.tile_at(Cell::new(1, 0)), Tile::Floor);
    }

    #[test]
    fn chopping_afloat_builds_nothing() {
        let (mut map, mut p) = strip("~T");
        p.inventory.has_axe = true;
        p.inventory.on_raft = true;
        let events = apply_action(&mut map, &mut p, ActionStep::UseTool(Tool::Axe));
        assert_eq!(events, vec![WorldEvent::TreeFelled { cell: Cell::new(1, 0), raft: false }]);
        assert!(!p.inventory.has_raft);
    }

    #[test]
    fn stone_fills_water_before_raft_is_used() {
        let (mut map, mut p) = strip(" ~ ");
        p.inventory.stones_held = 1;
        p.inventory.has_raft = true;
        let events = apply_action(&mut map, &mut p, ActionStep::Forward);
        assert_eq!(events, vec![WorldEvent::StonePlaced { cell: Cell::new(1, 0) }]);
        assert_eq!(map.tile_at(Cell::new(1, 0)), Tile::PlacedStone);
        assert!(p.inventory.has_raft && !p.inventory.on_raft);
        assert!(apply_action(&mut map, &mut p, ActionStep::Forward).is_empty());
    }

    #[test]
    fn raft_crossing_launches_and_lands() {
        let (mut map, mut p) = strip(" ~~ ");
        p.inventory.has_raft = true;
        let launch = apply_action(&mut map, &mut p, ActionStep::Forward);
        assert_eq!(launch, vec![WorldEvent::RaftLaunched { cell: Cell::new(1, 0) }]);
        assert!(p.inventory.on_raft && !p.inventory.has_raft);

        assert!(apply_action(&mut map, &mut p, ActionStep::Forward).is_empty());
        let landing = apply_action(&mut map, &mut p, ActionStep::Forward);
        assert_eq!(landing, vec![WorldEvent::Landed { cell: Cell::new(3, 0) }]);
        assert!(!p.inventory.on_raft && !p.inventory.has_raft);
        assert_eq!(map.tile_at(Cell::new(1, 0)), Tile::Water);
    }

    #[test]
    fn water_without_means_is_refused() {
        let (mut map, mut p) = strip(" ~");
        let events = apply_action(&mut map, &mut p, ActionStep::Forward);
        assert!(matches!(events[0], WorldEvent::Blocked { tile: Tile::Water, .. }));
        assert_eq!(p.pos, Cell::new(0, 0));
    }
}
