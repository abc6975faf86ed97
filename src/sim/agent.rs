/// One agent's full state and its per-view tick.

use tracing::debug;

use super::apply::apply_action;
use super::event::WorldEvent;
use super::goals::Goals;
use super::map::{WorldMap, VIEW_LEN};
use crate::config::SearchConfig;
use crate::domain::entity::{ActionStep, Player};
use crate::plan::planner::Planner;

/// Sent when no plan can be made, so the server keeps ticking and the
/// next view shows a different side.
pub const IDLE_ACTION: ActionStep = ActionStep::TurnLeft;

pub struct Agent {
    pub map: WorldMap,
    pub player: Player,
    pub planner: Planner,
    pub goals: Goals,
}

impl Agent {
    pub fn new(search: SearchConfig) -> Self {
        Agent {
            map: WorldMap::new(),
            player: Player::new(),
            planner: Planner::new(search),
            goals: Goals::new(),
        }
    }

    /// Absorb a view, pick a command and apply it locally.
    /// Returns the command to send and what it changed.
    pub fn tick(&mut self, view: &[u8; VIEW_LEN]) -> (ActionStep, Vec<WorldEvent>) {
        self.map.update_from_view(view, self.player.pos, self.player.facing);

        let action = self
            .goals
            .decide(&mut self.planner, &self.map, &self.player)
            .unwrap_or_else(|| {
                debug!("nothing to plan, idling");
                IDLE_ACTION
            });
        let events = apply_action(&mut self.map, &mut self.player, action);
        (action, events)
    }
}
