//! Lane assignment: once every route has registered with the regions it
//! traverses (`router::route_all`), distribute each region's routes evenly
//! across its capacity. Grounded on `eda/vsrtl_placeroute.cpp`'s `assignRoutes`
//! pass over the finished connectivity graph.

use std::collections::HashMap;

use crate::connectivity::{RouteId, RoutingRegions};
use crate::geometry::Direction;

/// A route's lane assignment within one region it passes through: the
/// direction it was registered under, and its offset from that region's
/// origin edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneAssignment {
    pub direction: Direction,
    pub offset: i64,
}

/// Computes every region's lane assignments. A route that traverses several
/// regions gets one entry per region it was registered in.
pub fn assign_lanes(regions: &RoutingRegions) -> HashMap<RouteId, Vec<LaneAssignment>> {
    let mut assignments: HashMap<RouteId, Vec<LaneAssignment>> = HashMap::new();
    for (_, region) in regions.iter() {
        let hz_diff = region.h_cap() / (region.horizontal_routes.len() as i64 + 1);
        for (i, &route) in region.horizontal_routes.iter().enumerate() {
            assignments.entry(route).or_default().push(LaneAssignment {
                direction: Direction::Horizontal,
                offset: hz_diff * (i as i64 + 1),
            });
        }
        let vt_diff = region.v_cap() / (region.vertical_routes.len() as i64 + 1);
        for (i, &route) in region.vertical_routes.iter().enumerate() {
            assignments.entry(route).or_default().push(LaneAssignment {
                direction: Direction::Vertical,
                offset: vt_diff * (i as i64 + 1),
            });
        }
    }
    assignments
}
