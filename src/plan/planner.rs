/// Planner: turns intent ("go to these goals", "fetch something useful",
/// "see more of the island") into a queue of primitive commands.
///
/// Searches read the map and a snapshot of the player's inventory; they
/// never touch the authoritative state. The queue is consumed one step per
/// tick by the caller, who applies each step to the world.

use std::collections::{BTreeSet, VecDeque};

use tracing::{debug, info};

use super::compile::compile;
use crate::config::SearchConfig;
use crate::domain::entity::{ActionStep, Cell, Inventory, Player};
use crate::domain::rules::{Policy, ResourceState};
use crate::domain::terrain::{PoiKind, TerrainOracle};
use crate::search::chain::chain;
use crate::search::frontier::{FrontierGoal, FrontierSearch};
use crate::search::informed::InformedSearch;
use crate::search::Path;

pub struct Planner {
    settings: SearchConfig,
    path: Path,
    steps: VecDeque<ActionStep>,
}

impl Planner {
    pub fn new(settings: SearchConfig) -> Self {
        Planner {
            settings,
            path: vec![],
            steps: VecDeque::new(),
        }
    }

    /// Route through `goals` in order, threading resources between legs.
    ///
    /// The most permissive policy is tried first to learn whether the goals
    /// are reachable at all; then less destructive policies are retried so a
    /// plan doesn't fell trees or spend stones just to save a few steps.
    pub fn plan_to_goals(
        &mut self,
        terrain: &impl TerrainOracle,
        player: &Player,
        goals: &[Cell],
    ) -> bool {
        let search = InformedSearch::new(terrain).with_step_limit(self.settings.informed_step_limit);
        let attempt = |policy: Policy| {
            let initial = ResourceState::from_inventory(&player.inventory, policy);
            chain(&search, player.pos, goals, &initial)
        };

        let Some(mut best) = attempt(Policy::RECKLESS) else {
            debug!(?goals, "goals unreachable under any policy");
            return false;
        };
        for policy in [Policy::CROSS_DIVIDE, Policy::CAUTIOUS] {
            match attempt(policy) {
                Some(route) => best = route,
                None => break,
            }
        }

        info!(?goals, len = best.path.len(), policy = ?best.terminal.policy(), "planned route to goals");
        self.adopt(terrain, player, best.path)
    }

    /// Head for the nearest known point of interest worth collecting.
    pub fn plan_to_nearest_poi(
        &mut self,
        terrain: &impl TerrainOracle,
        player: &Player,
        policy: Policy,
    ) -> bool {
        let search = FrontierSearch::new(terrain).with_node_limit(self.settings.frontier_node_limit);
        let initial = ResourceState::from_inventory(&player.inventory, policy);

        for poi in ranked_pois(terrain, &player.inventory, player.pos) {
            let goal = BTreeSet::from([poi]);
            if let Some(route) = search.search(player.pos, FrontierGoal::Cells(&goal), &initial) {
                info!(%poi, len = route.path.len(), "planned route to point of interest");
                return self.adopt(terrain, player, route.path);
            }
        }
        false
    }

    /// Walk toward unexplored terrain, widening the acceptable distance to
    /// it one ring at a time.
    pub fn plan_to_unexplored(
        &mut self,
        terrain: &impl TerrainOracle,
        player: &Player,
        policy: Policy,
    ) -> bool {
        let search = FrontierSearch::new(terrain).with_node_limit(self.settings.frontier_node_limit);
        let initial = ResourceState::from_inventory(&player.inventory, policy);

        for radius in 0..=self.settings.max_explore_radius {
            let goal = FrontierGoal::Unexplored { radius };
            if let Some(route) = search.search(player.pos, goal, &initial) {
                debug!(radius, target = %route.goal(), "planned exploration");
                if self.adopt(terrain, player, route.path) {
                    return true;
                }
            }
        }
        false
    }

    pub fn next_action(&mut self) -> Option<ActionStep> {
        self.steps.pop_front()
    }

    pub fn has_steps(&self) -> bool {
        !self.steps.is_empty()
    }

    /// Cells of the plan currently being followed, start inclusive.
    pub fn path(&self) -> &[Cell] {
        &self.path
    }

    pub fn clear_plan(&mut self) {
        self.path.clear();
        self.steps.clear();
    }

    fn adopt(&mut self, terrain: &impl TerrainOracle, player: &Player, path: Path) -> bool {
        let steps = compile(terrain, &path, player.facing, &player.inventory);
        if steps.is_empty() {
            return false;
        }
        self.path = path;
        self.steps = steps.into();
        true
    }
}

/// Points of interest worth a detour given what the agent already carries,
/// nearest first (ties broken by position).
pub fn ranked_pois(terrain: &impl TerrainOracle, inv: &Inventory, from: Cell) -> Vec<Cell> {
    let mut pois: Vec<Cell> = terrain
        .points_of_interest()
        .into_iter()
        .filter(|&(kind, _)| match kind {
            PoiKind::Axe => !inv.has_axe,
            PoiKind::Key => !inv.has_key,
            PoiKind::Door => inv.has_key,
            PoiKind::StonePile => true,
            PoiKind::Tree => inv.has_axe && !inv.has_raft && !inv.on_raft,
            PoiKind::Treasure => false,
        })
        .map(|(_, cell)| cell)
        .collect();
    pois.sort_by_key(|&cell| (from.manhattan(cell), cell));
    pois.dedup();
    pois
}
