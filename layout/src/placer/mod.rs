//! Placement: arranging [`GridComponent`](crate::grid::GridComponent)s onto
//! non-overlapping grid positions. Two strategies, both grounded on
//! `eda/vsrtl_placeroute.cpp`: a one-row topological placer for flat,
//! acyclic component sets, and a min-cut placer (Kernighan-Lin bisection
//! over a recursively split partition tree) for everything else.

pub mod mincut;
pub mod topological;

use crate::geometry::Rect;
use crate::grid::GridComponentIdx;

/// The placed chip: its overall bounding rectangle and the per-component
/// rectangles within it. Mirrors the source's `Placement` struct (`routing.h`),
/// minus the `RoutingComponent` wrapper, which this crate reconstructs from
/// `GridLayout` directly when connectivity-graph-building needs it.
#[derive(Debug, Clone)]
pub struct Placement {
    pub chip_rect: Rect,
    pub positions: Vec<(GridComponentIdx, Rect)>,
}
