/// Informed search: A* over (cell, resource state) with a Manhattan heuristic.
///
/// Used when the agent commits to a single goal. A cheaper arrival with
/// fewer resources does not dominate a dearer one with more, so every
/// distinct (cell, state) pair is its own node.
///
/// Ties on f-cost go to the node that was pushed first, which keeps the
/// result deterministic for identical inputs.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use tracing::debug;

use super::{candidate_headings, Arena, LegSearch, Route};
use crate::domain::entity::Cell;
use crate::domain::rules::{attempt_move, ResourceState};
use crate::domain::terrain::TerrainOracle;

/// Expansions allowed before an unreachable goal is given up on.
pub const DEFAULT_STEP_LIMIT: usize = 10_000;

/// Heap entry: (f-cost, push order, g-cost at push, node index).
type OpenEntry = Reverse<(u32, u64, u32, usize)>;

pub struct InformedSearch<'a, T: TerrainOracle> {
    terrain: &'a T,
    step_limit: usize,
}

impl<'a, T: TerrainOracle> InformedSearch<'a, T> {
    pub fn new(terrain: &'a T) -> Self {
        InformedSearch { terrain, step_limit: DEFAULT_STEP_LIMIT }
    }

    pub fn with_step_limit(mut self, step_limit: usize) -> Self {
        self.step_limit = step_limit;
        self
    }

    pub fn search(&self, start: Cell, goal: Cell, initial: &ResourceState) -> Option<Route> {
        let mut arena = Arena::default();
        let mut g_cost: Vec<u32> = vec![];
        let mut closed: Vec<bool> = vec![];
        let mut index: HashMap<(Cell, ResourceState), usize> = HashMap::new();
        let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
        let mut pushes: u64 = 0;

        let root = arena.push(start, initial.clone(), None);
        g_cost.push(0);
        closed.push(false);
        index.insert((start, initial.clone()), root);
        open.push(Reverse((start.manhattan(goal), pushes, 0, root)));

        let mut steps = 0;
        while let Some(Reverse((_, _, g, idx))) = open.pop() {
            // Stale entry: the node was improved or closed after this push.
            if closed[idx] || g != g_cost[idx] {
                continue;
            }
            steps += 1;
            if steps > self.step_limit {
                debug!(steps, %goal, "informed search hit step limit");
                return None;
            }

            let here = arena.get(idx).cell;
            if here == goal {
                debug!(steps, nodes = arena.len(), %goal, "informed search reached goal");
                return Some(Route {
                    path: arena.path_to(idx),
                    terminal: arena.get(idx).state.clone(),
                });
            }
            closed[idx] = true;

            for heading in candidate_headings(arena.arrived_by(idx)) {
                let next = here.step(heading);
                let Some(state) = attempt_move(self.terrain, here, next, &arena.get(idx).state)
                else {
                    continue;
                };
                let tentative = g + 1;
                let key = (next, state);

                let child = match index.get(&key) {
                    Some(&j) => {
                        if closed[j] || tentative >= g_cost[j] {
                            continue;
                        }
                        g_cost[j] = tentative;
                        arena.get_mut(j).parent = Some(idx);
                        j
                    }
                    None => {
                        let j = arena.push(next, key.1.clone(), Some(idx));
                        g_cost.push(tentative);
                        closed.push(false);
                        index.insert(key, j);
                        j
                    }
                };

                pushes += 1;
                open.push(Reverse((tentative + next.manhattan(goal), pushes, tentative, child)));
            }
        }

        debug!(steps, %goal, "informed search exhausted");
        None
    }
}

impl<T: TerrainOracle> LegSearch for InformedSearch<'_, T> {
    fn route(&self, start: Cell, goal: Cell, initial: &ResourceState) -> Option<Route> {
        self.search(start, goal, initial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Inventory;
    use crate::domain::rules::Policy;
    use crate::domain::terrain::grid::Grid;

    fn fresh(policy: Policy) -> ResourceState {
        ResourceState::from_inventory(&Inventory::default(), policy)
    }

    #[test]
    fn start_is_goal() {
        let g = Grid::from_rows(&["@"]);
        let s = fresh(Policy::CAUTIOUS);
        let route = InformedSearch::new(&g).search(Cell::new(0, 0), Cell::new(0, 0), &s).unwrap();
        assert_eq!(route.path, vec![Cell::new(0, 0)]);
        assert_eq!(route.terminal, s);
    }

    #[test]
    fn finds_shortest_path_around_wall() {
        let rows = [
            "*******",
            "*@ *  *",
            "*  *  *",
            "*     *",
            "*******",
        ];
        let g = Grid::from_rows(&rows);
        let route = InformedSearch::new(&g)
            .search(Grid::marker(&rows), Cell::new(5, 1), &fresh(Policy::CAUTIOUS))
            .unwrap();
        // (1,1) → down to row 3, across to x=4/5, up to row 1
        assert_eq!(route.path.len(), 9);
        assert_eq!(route.goal(), Cell::new(5, 1));
    }

    #[test]
    fn crosses_water_on_a_stone() {
        let rows = [
            "*****",
            "*@~ *",
            "*****",
        ];
        let g = Grid::from_rows(&rows);
        let mut s = fresh(Policy::CROSS_DIVIDE);
        s.stones_held = 1;
        let route = InformedSearch::new(&g)
            .search(Grid::marker(&rows), Cell::new(3, 1), &s)
            .unwrap();
        assert_eq!(route.terminal.stones_held, 0);
        assert!(route.terminal.placed_stones.contains(&Cell::new(2, 1)));
        assert_eq!(route.path.len(), 3);
    }

    #[test]
    fn water_without_policy_is_unreachable() {
        let rows = ["*****", "*@~ *", "*****"];
        let g = Grid::from_rows(&rows);
        let mut s = fresh(Policy::CAUTIOUS);
        s.stones_held = 1;
        assert!(InformedSearch::new(&g).search(Grid::marker(&rows), Cell::new(3, 1), &s).is_none());
    }

    #[test]
    fn fells_tree_with_axe_and_gains_raft() {
        let rows = ["*******", "*@ T  *", "*******"];
        let g = Grid::from_rows(&rows);
        let mut s = fresh(Policy::CAUTIOUS);
        s.has_axe = true;
        let route = InformedSearch::new(&g)
            .search(Grid::marker(&rows), Cell::new(5, 1), &s)
            .unwrap();
        assert!(route.terminal.has_raft);
        assert_eq!(route.path.len(), 5);
    }

    #[test]
    fn detours_for_a_resource() {
        // Water straight ahead, stone pile behind: the cheaper-looking
        // stone-less arrival must not shadow the one holding a stone.
        let rows = [
            "*******",
            "*o@~ $*",
            "*******",
        ];
        let g = Grid::from_rows(&rows);
        let route = InformedSearch::new(&g)
            .search(Grid::marker(&rows), Cell::new(5, 1), &fresh(Policy::CROSS_DIVIDE))
            .unwrap();
        assert_eq!(route.path[1], Cell::new(1, 1));
        assert!(route.terminal.has_treasure);
        assert_eq!(route.terminal.stones_held, 0);
    }

    #[test]
    fn step_limit_is_no_path() {
        let rows = ["*********", "*@      *", "*********"];
        let g = Grid::from_rows(&rows);
        let s = fresh(Policy::CAUTIOUS);
        let search = InformedSearch::new(&g).with_step_limit(3);
        assert!(search.search(Grid::marker(&rows), Cell::new(7, 1), &s).is_none());
        let search = InformedSearch::new(&g).with_step_limit(7);
        assert!(search.search(Grid::marker(&rows), Cell::new(7, 1), &s).is_some());
    }

    #[test]
    fn identical_inputs_identical_routes() {
        let rows = [
            "*******",
            "*@    *",
            "*     *",
            "*     *",
            "*******",
        ];
        let g = Grid::from_rows(&rows);
        let s = fresh(Policy::CAUTIOUS);
        let a = InformedSearch::new(&g).search(Grid::marker(&rows), Cell::new(5, 3), &s);
        let b = InformedSearch::new(&g).search(Grid::marker(&rows), Cell::new(5, 3), &s);
        assert_eq!(a, b);
        assert_eq!(a.unwrap().path.len(), 7);
    }
}
