/// Goal chaining: route through several goals in order, one leg at a time.
///
/// Each leg starts where the previous one ended, holding the resources the
/// previous leg finished with. "Reach the treasure, then come home" is a
/// two-leg chain sharing one resource thread.

use tracing::debug;

use super::{LegSearch, Route};
use crate::domain::entity::Cell;
use crate::domain::rules::ResourceState;

/// Route `start → goals[0] → goals[1] → …`. `None` as soon as any leg fails.
pub fn chain(
    search: &impl LegSearch,
    start: Cell,
    goals: &[Cell],
    initial: &ResourceState,
) -> Option<Route> {
    let mut route = Route { path: vec![start], terminal: initial.clone() };

    for (leg, &goal) in goals.iter().enumerate() {
        let Some(next) = search.route(route.goal(), goal, &route.terminal) else {
            debug!(leg, %goal, "goal chain leg failed");
            return None;
        };
        // The junction cell is already the last cell of the route.
        route.path.extend_from_slice(&next.path[1..]);
        route.terminal = next.terminal;
    }

    Some(route)
}
