/// Goal policy: decides what the planner should be working toward.
///
/// Priority order each tick:
///   1. Drop a stale plan if the map changed (unless it is the winning plan)
///   2. Keep following a plan that still has steps
///   3. Treasure seen and not held → fetch it and go home
///   4. Treasure held → go home
///   5. Nearest useful point of interest
///   6. Explore
///
/// When nothing is found the caller escalates: first allow crossing
/// water, then allow felling trees for no new raft. A successful
/// exploration drops both escalations again.

use tracing::info;

use crate::domain::entity::{ActionStep, Player};
use crate::domain::rules::Policy;
use crate::plan::planner::Planner;
use crate::sim::map::WorldMap;

#[derive(Default, Debug)]
pub struct Goals {
    pub cross_divide: bool,
    pub waste_trees: bool,
    /// The plan being followed reaches the treasure and/or home.
    pub winning_path: bool,
}

impl Goals {
    pub fn new() -> Self {
        Goals::default()
    }

    fn policy(&self) -> Policy {
        Policy {
            cross_divide: self.cross_divide,
            allow_waste_trees: self.waste_trees,
        }
    }

    pub fn find_next_goal(
        &mut self,
        planner: &mut Planner,
        map: &WorldMap,
        player: &Player,
    ) -> Option<ActionStep> {
        if map.map_updated && !self.winning_path {
            planner.clear_plan();
        }
        if planner.has_steps() {
            return planner.next_action();
        }
        self.winning_path = false;

        if let Some(treasure) = map.treasure() {
            if !player.inventory.has_treasure && planner.plan_to_goals(map, player, &[treasure, player.start]) {
                info!(%treasure, len = planner.path().len(), "found a way to the treasure and back");
                self.winning_path = true;
                return planner.next_action();
            }
        }
        if player.inventory.has_treasure && planner.plan_to_goals(map, player, &[player.start]) {
            info!("heading home with the treasure");
            self.winning_path = true;
            return planner.next_action();
        }

        // Points of interest never justify wasting a tree.
        let poi_policy = Policy { allow_waste_trees: false, ..self.policy() };
        if planner.plan_to_nearest_poi(map, player, poi_policy) {
            return planner.next_action();
        }
        if planner.plan_to_unexplored(map, player, self.policy()) {
            self.cross_divide = false;
            self.waste_trees = false;
            return planner.next_action();
        }
        None
    }

    pub fn allow_cross_divide(
        &mut self,
        planner: &mut Planner,
        map: &WorldMap,
        player: &Player,
    ) -> Option<ActionStep> {
        self.cross_divide = true;
        self.find_next_goal(planner, map, player)
    }

    pub fn allow_waste_trees(
        &mut self,
        planner: &mut Planner,
        map: &WorldMap,
        player: &Player,
    ) -> Option<ActionStep> {
        self.cross_divide = true;
        self.waste_trees = true;
        self.find_next_goal(planner, map, player)
    }

    /// Next command with escalation; `None` only if every level fails.
    pub fn decide(&mut self, planner: &mut Planner, map: &WorldMap, player: &Player) -> Option<ActionStep> {
        self.find_next_goal(planner, map, player)
            .or_else(|| self.allow_cross_divide(planner, map, player))
            .or_else(|| self.allow_waste_trees(planner, map, player))
    }
}
