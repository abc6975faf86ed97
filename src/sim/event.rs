/// Events emitted when an action is applied to the world.
/// The main loop logs them; tests assert on them.

use crate::domain::entity::Cell;
use crate::domain::tile::Tile;

#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(dead_code)] // fields are read through Debug in logs
pub enum WorldEvent {
    ItemCollected { tile: Tile, cell: Cell },
    TreeFelled { cell: Cell, raft: bool },
    DoorOpened { cell: Cell },
    StonePlaced { cell: Cell },
    RaftLaunched { cell: Cell },
    Landed { cell: Cell },
    /// Command had no effect: walked into something or used the wrong tool.
    Blocked { cell: Cell, tile: Tile },
}
