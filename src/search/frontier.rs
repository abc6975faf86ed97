/// Frontier search: modified breadth-first search.
///
/// Two modes:
///   1. **Goal set**: stop at the first legal step onto any goal cell.
///      Nodes are keyed by (cell, resource state).
///   2. **Unexplored**: stop at the first cell within `radius` of
///      unexplored terrain. Nodes are keyed by cell alone, so every cell
///      is expanded at most once.
///
/// The search halts on the first terminal candidate it generates, not the
/// first one it dequeues. That trades strict shortest paths for latency.

use std::collections::{BTreeSet, HashSet, VecDeque};

use tracing::debug;

use super::{candidate_headings, Arena, LegSearch, Route};
use crate::domain::entity::Cell;
use crate::domain::rules::{attempt_move, ResourceState};
use crate::domain::terrain::TerrainOracle;

pub const DEFAULT_NODE_LIMIT: usize = 20_000;

#[derive(Clone, Copy, Debug)]
pub enum FrontierGoal<'a> {
    Cells(&'a BTreeSet<Cell>),
    Unexplored { radius: u32 },
}

#[derive(Clone, PartialEq, Eq, Hash)]
enum VisitKey {
    Cell(Cell),
    Node(Cell, ResourceState),
}

pub struct FrontierSearch<'a, T: TerrainOracle> {
    terrain: &'a T,
    node_limit: usize,
}

impl<'a, T: TerrainOracle> FrontierSearch<'a, T> {
    pub fn new(terrain: &'a T) -> Self {
        FrontierSearch { terrain, node_limit: DEFAULT_NODE_LIMIT }
    }

    pub fn with_node_limit(mut self, node_limit: usize) -> Self {
        self.node_limit = node_limit;
        self
    }

    pub fn search(&self, start: Cell, goal: FrontierGoal, initial: &ResourceState) -> Option<Route> {
        let key = |cell: Cell, state: &ResourceState| match goal {
            FrontierGoal::Cells(_) => VisitKey::Node(cell, state.clone()),
            FrontierGoal::Unexplored { .. } => VisitKey::Cell(cell),
        };

        let mut arena = Arena::default();
        let mut visited: HashSet<VisitKey> = HashSet::new();
        let mut queue: VecDeque<usize> = VecDeque::with_capacity(256);

        let root = arena.push(start, initial.clone(), None);
        visited.insert(key(start, initial));
        queue.push_back(root);

        let mut expanded = 0;
        while let Some(idx) = queue.pop_front() {
            expanded += 1;
            if expanded > self.node_limit {
                debug!(expanded, "frontier search hit node limit");
                return None;
            }

            let here = arena.get(idx).cell;
            for heading in candidate_headings(arena.arrived_by(idx)) {
                let next = here.step(heading);
                let moved = attempt_move(self.terrain, here, next, &arena.get(idx).state);

                match goal {
                    FrontierGoal::Cells(goals) if goals.contains(&next) => {
                        if let Some(state) = &moved {
                            let mut path = arena.path_to(idx);
                            path.push(next);
                            debug!(expanded, len = path.len(), "frontier search reached goal");
                            return Some(Route { path, terminal: state.clone() });
                        }
                    }
                    // Cells already reached were judged when first generated.
                    FrontierGoal::Unexplored { radius }
                        if !visited.contains(&VisitKey::Cell(next))
                            && self.terrain.any_unexplored_nearby(next, radius) =>
                    {
                        match &moved {
                            Some(state) => {
                                let mut path = arena.path_to(idx);
                                path.push(next);
                                debug!(expanded, radius, "frontier search reached frontier");
                                return Some(Route { path, terminal: state.clone() });
                            }
                            // Unknown itself: stop beside it. The start cell
                            // doesn't count, there is nothing to walk.
                            None if idx != root && self.terrain.is_unexplored(next) => {
                                debug!(expanded, radius, "frontier search stopped beside frontier");
                                return Some(Route {
                                    path: arena.path_to(idx),
                                    terminal: arena.get(idx).state.clone(),
                                });
                            }
                            None => {}
                        }
                    }
                    _ => {}
                }

                let Some(state) = moved else { continue };
                if visited.insert(key(next, &state)) {
                    let child = arena.push(next, state, Some(idx));
                    queue.push_back(child);
                }
            }
        }

        debug!(expanded, "frontier search exhausted");
        None
    }
}

impl<T: TerrainOracle> LegSearch for FrontierSearch<'_, T> {
    fn route(&self, start: Cell, goal: Cell, initial: &ResourceState) -> Option<Route> {
        if start == goal {
            return Some(Route { path: vec![start], terminal: initial.clone() });
        }
        let goals = BTreeSet::from([goal]);
        self.search(start, FrontierGoal::Cells(&goals), initial)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::Inventory;
    use crate::domain::rules::Policy;
    use crate::domain::terrain::grid::Grid;

    fn goals(cells: &[(i32, i32)]) -> BTreeSet<Cell> {
        cells.iter().map(|&(x, y)| Cell::new(x, y)).collect()
    }

    fn fresh(policy: Policy) -> ResourceState {
        ResourceState::from_inventory(&Inventory::default(), policy)
    }

    #[test]
    fn reaches_goal_in_corridor() {
        let rows = ["*****", "*@  *", "*****"];
        let g = Grid::from_rows(&rows);
        let start = Grid::marker(&rows);
        let goal = goals(&[(3, 1)]);
        let route = FrontierSearch::new(&g)
            .search(start, FrontierGoal::Cells(&goal), &fresh(Policy::CAUTIOUS))
            .unwrap();
        assert_eq!(route.path, vec![Cell::new(1, 1), Cell::new(2, 1), Cell::new(3, 1)]);
    }

    #[test]
    fn tree_without_axe_blocks_only_route() {
        let rows = [
            "*******",
            "*@ T  *",
            "*******",
        ];
        let g = Grid::from_rows(&rows);
        let goal = goals(&[(5, 1)]);
        let route = FrontierSearch::new(&g).search(
            Grid::marker(&rows),
            FrontierGoal::Cells(&goal),
            &fresh(Policy::RECKLESS),
        );
        assert!(route.is_none());
    }

    #[test]
    fn illegal_goal_is_not_accepted() {
        let rows = ["*****", "*@ -*", "*****"];
        let g = Grid::from_rows(&rows);
        let goal = goals(&[(3, 1)]);
        let s = fresh(Policy::CAUTIOUS);
        assert!(FrontierSearch::new(&g)
            .search(Grid::marker(&rows), FrontierGoal::Cells(&goal), &s)
            .is_none());
    }

    #[test]
    fn state_keyed_search_revisits_cell_with_new_resources() {
        // The key is east; the door is west of the start. A cell-keyed
        // search would never walk back over the start after fetching it.
        let rows = [
            "*******",
            "* -@ k*",
            "*******",
        ];
        let g = Grid::from_rows(&rows);
        let goal = goals(&[(1, 1)]);
        let route = FrontierSearch::new(&g)
            .search(Grid::marker(&rows), FrontierGoal::Cells(&goal), &fresh(Policy::CAUTIOUS))
            .unwrap();
        assert!(route.terminal.has_key);
        assert_eq!(route.path.first(), Some(&Cell::new(3, 1)));
        assert_eq!(route.path.last(), Some(&Cell::new(1, 1)));
        assert_eq!(route.path.len(), 7);
    }

    #[test]
    fn explores_to_the_nearest_frontier() {
        let rows = [
            "*****",
            "*@  ?",
            "*****",
        ];
        let g = Grid::from_rows(&rows);
        let route = FrontierSearch::new(&g)
            .search(Grid::marker(&rows), FrontierGoal::Unexplored { radius: 0 }, &fresh(Policy::CAUTIOUS))
            .unwrap();
        // stops beside the unknown cell
        assert_eq!(route.path, vec![Cell::new(1, 1), Cell::new(2, 1), Cell::new(3, 1)]);
    }

    #[test]
    fn wider_radius_finds_frontier_sooner() {
        let rows = [
            "*******",
            "*******",
            "*@    ?",
            "*******",
            "*******",
        ];
        let g = Grid::from_rows(&rows);
        let route = FrontierSearch::new(&g)
            .search(Grid::marker(&rows), FrontierGoal::Unexplored { radius: 2 }, &fresh(Policy::CAUTIOUS))
            .unwrap();
        assert_eq!(route.goal(), Cell::new(4, 2));
    }

    #[test]
    fn unexplored_mode_never_steps_back() {
        // Unknown at the top-left corner touches only the start; walking
        // back onto it must not count as reaching the frontier.
        let rows = [
            "?*******",
            "*@     *",
            "*******?",
        ];
        let g = Grid::from_rows(&rows);
        let start = Grid::marker(&rows);
        let route = FrontierSearch::new(&g)
            .search(start, FrontierGoal::Unexplored { radius: 1 }, &fresh(Policy::CAUTIOUS))
            .unwrap();
        assert_ne!(route.goal(), start);
        assert_eq!(route.goal(), Cell::new(6, 1));
        let distinct: HashSet<Cell> = route.path.iter().copied().collect();
        assert_eq!(distinct.len(), route.path.len());
    }

    #[test]
    fn enclosed_start_beside_unknown_is_not_a_frontier() {
        let rows = ["?****", "*@  *", "*****"];
        let g = Grid::from_rows(&rows);
        let s = fresh(Policy::CAUTIOUS);
        let search = FrontierSearch::new(&g);
        for radius in 0..=1 {
            let start = Grid::marker(&rows);
            assert!(search.search(start, FrontierGoal::Unexplored { radius }, &s).is_none());
        }
    }

    #[test]
    fn fully_explored_returns_none() {
        let rows = ["*****", "*@  *", "*****"];
        let g = Grid::from_rows(&rows);
        let route = FrontierSearch::new(&g).search(
            Grid::marker(&rows),
            FrontierGoal::Unexplored { radius: 0 },
            &fresh(Policy::CAUTIOUS),
        );
        assert!(route.is_none());
    }

    #[test]
    fn prefers_straight_runs() {
        // Open room: both L-shaped routes are shortest; the one that keeps
        // its heading longest is produced.
        let rows = [
            "******",
            "*@   *",
            "*    *",
            "*    *",
            "******",
        ];
        let g = Grid::from_rows(&rows);
        let goal = goals(&[(4, 3)]);
        let route = FrontierSearch::new(&g)
            .search(Grid::marker(&rows), FrontierGoal::Cells(&goal), &fresh(Policy::CAUTIOUS))
            .unwrap();
        let turns = route
            .path
            .windows(3)
            .filter(|w| w[0].heading_to(w[1]) != w[1].heading_to(w[2]))
            .count();
        assert_eq!(turns, 1);
        assert_eq!(route.path.len(), 6);
    }

    #[test]
    fn node_limit_gives_up() {
        let rows = ["*********", "*@      *", "*********"];
        let g = Grid::from_rows(&rows);
        let goal = goals(&[(7, 1)]);
        let route = FrontierSearch::new(&g)
            .with_node_limit(2)
            .search(Grid::marker(&rows), FrontierGoal::Cells(&goal), &fresh(Policy::CAUTIOUS));
        assert!(route.is_none());
    }
}
