//! A* routing over the connectivity graph, grounded on
//! `graphics/eda/algorithms/vsrtl_astar.h`'s generic `AStar<T>` (open/closed
//! sets, gScore/fScore maps, cameFrom reconstruction) plus
//! `eda/vsrtl_placeroute.cpp`'s route-registration pass.

use std::collections::{HashMap, HashSet};

use crate::connectivity::{RegionMap, RouteId, RoutingRegionIdx, RoutingRegions};
use crate::geometry::{Direction, Edge, Point};

/// One source-port-to-sink-port connection to be routed.
#[derive(Debug, Clone, Copy)]
pub struct Route {
    pub start: RoutingRegionIdx,
    pub end: RoutingRegionIdx,
}

/// Manhattan distance between two regions' centers — the default heuristic
/// and default edge cost, per the router's "Manhattan center distance" rule.
pub fn manhattan_region_cost(regions: &RoutingRegions, a: RoutingRegionIdx, b: RoutingRegionIdx) -> i64 {
    regions[a].rect.center().manhattan_distance(&regions[b].rect.center())
}

/// A* shortest path from `start` to `goal` over `regions`' 4-neighbor
/// adjacency. `valid` rejects a neighbor a route may not cross into (e.g. a
/// region with no remaining capacity in the direction being traveled).
/// Returns an empty vector if no path exists, per the router's defined
/// unreachable-case behavior.
pub fn astar(
    regions: &RoutingRegions,
    start: RoutingRegionIdx,
    goal: RoutingRegionIdx,
    valid: impl Fn(RoutingRegionIdx, RoutingRegionIdx) -> bool,
    cost: impl Fn(RoutingRegionIdx, RoutingRegionIdx) -> i64,
) -> Vec<RoutingRegionIdx> {
    let mut open_set: HashSet<RoutingRegionIdx> = HashSet::new();
    open_set.insert(start);
    let mut closed_set: HashSet<RoutingRegionIdx> = HashSet::new();
    let mut came_from: HashMap<RoutingRegionIdx, RoutingRegionIdx> = HashMap::new();
    let mut g_score: HashMap<RoutingRegionIdx, i64> = HashMap::new();
    let mut f_score: HashMap<RoutingRegionIdx, i64> = HashMap::new();

    g_score.insert(start, 0);
    f_score.insert(start, manhattan_region_cost(regions, start, goal));

    while !open_set.is_empty() {
        let current = *open_set
            .iter()
            .min_by_key(|&&n| f_score.get(&n).copied().unwrap_or(i64::MAX))
            .expect("open_set checked non-empty above");

        if current == goal {
            return reconstruct_path(&came_from, current);
        }

        open_set.remove(&current);
        closed_set.insert(current);

        for neighbor in regions[current].adjacent_regions().into_iter().flatten() {
            if !valid(current, neighbor) || closed_set.contains(&neighbor) {
                continue;
            }

            let tentative_g = g_score.get(&current).copied().unwrap_or(i64::MAX).saturating_add(cost(current, neighbor));

            if !open_set.contains(&neighbor) {
                open_set.insert(neighbor);
            } else if tentative_g >= g_score.get(&neighbor).copied().unwrap_or(i64::MAX) {
                continue;
            }

            came_from.insert(neighbor, current);
            g_score.insert(neighbor, tentative_g);
            f_score.insert(neighbor, tentative_g.saturating_add(manhattan_region_cost(regions, neighbor, goal)));
        }
    }

    Vec::new()
}

fn reconstruct_path(came_from: &HashMap<RoutingRegionIdx, RoutingRegionIdx>, mut current: RoutingRegionIdx) -> Vec<RoutingRegionIdx> {
    let mut path = vec![current];
    while let Some(&from) = came_from.get(&current) {
        current = from;
        path.insert(0, current);
    }
    path
}

/// Routes every `Route` in `routes` with [`astar`] against the default
/// Manhattan-distance cost, rejecting neighbors with no remaining capacity
/// in the direction that edge would be traveled, then registers each
/// traversed region under that route under the appropriate direction.
pub fn route_all(regions: &mut RoutingRegions, routes: &[(RouteId, Route)]) -> Vec<Vec<RoutingRegionIdx>> {
    let mut paths = Vec::with_capacity(routes.len());
    for &(route_id, route) in routes {
        let path = {
            let regions_ref: &RoutingRegions = regions;
            astar(
                regions_ref,
                route.start,
                route.end,
                |current, neighbor| direction_between(regions_ref, current, neighbor)
                    .map(|d| match d {
                        Direction::Horizontal => regions_ref[neighbor].has_horizontal_capacity(),
                        Direction::Vertical => regions_ref[neighbor].has_vertical_capacity(),
                    })
                    .unwrap_or(false),
                |a, b| manhattan_region_cost(regions_ref, a, b),
            )
        };

        for window in path.windows(2) {
            let (a, b) = (window[0], window[1]);
            if let Some(direction) = direction_between(regions, a, b) {
                regions[a].register_route(direction, route_id);
                regions[b].register_route(direction, route_id);
            }
        }

        paths.push(path);
    }
    paths
}

/// Whether `a` and `b` are adjacent via a left/right link (a horizontal
/// traversal) or a top/bottom link (vertical), per the direction the
/// traversing route gets registered under.
fn direction_between(regions: &RoutingRegions, a: RoutingRegionIdx, b: RoutingRegionIdx) -> Option<Direction> {
    let region = &regions[a];
    for (edge, neighbor) in [
        (Edge::Top, region.top),
        (Edge::Bottom, region.bottom),
        (Edge::Left, region.left),
        (Edge::Right, region.right),
    ] {
        if neighbor == Some(b) {
            return Some(match edge {
                Edge::Left | Edge::Right => Direction::Horizontal,
                Edge::Top | Edge::Bottom => Direction::Vertical,
            });
        }
    }
    None
}

/// Looks up the routing region bordering a port at grid position `port_pos`
/// on the given side of its owning component, using the default
/// `Left`/`Top` tie-break (a position exactly on a shared boundary resolves
/// to the region on that side).
pub fn region_at_port(region_map: &RegionMap, port_pos: Point, side: Edge) -> Option<RoutingRegionIdx> {
    let (tie_break_vt, tie_break_hz) = match side {
        Edge::Left => (Edge::Left, Edge::Top),
        Edge::Right => (Edge::Right, Edge::Top),
        Edge::Top => (Edge::Left, Edge::Top),
        Edge::Bottom => (Edge::Left, Edge::Bottom),
    };
    region_map.lookup(port_pos, tie_break_vt, tie_break_hz)
}
