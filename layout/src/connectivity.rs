//! Connectivity-graph builder: turns a placed chip into a planar graph of
//! rectangular routing regions with populated 4-neighbor adjacency, grounded
//! on `eda/vsrtl_placeroute.cpp`'s `createConnectivityGraph`/`RegionGroup`
//! and `eda/routing.h`'s `RoutingRegion`.

use std::collections::{BTreeMap, HashMap};

use vsrtl_idx::impl_index;
use vsrtl_idx::maps::IndexedMap;

use crate::geometry::{Corner, Edge, IntersectKind, Line, Point, Rect};
use crate::grid::GridComponentIdx;
use crate::placer::Placement;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoutingRegionIdx(u32);
impl_index!(RoutingRegionIdx);

/// An opaque handle a router hands back to a region when it registers a
/// route through it; lane assignment later walks these in registration
/// order.
pub type RouteId = usize;

/// A rectangle of free chip area wires may cross, with up to four neighbors
/// and a running count of routes registered in each direction.
pub struct RoutingRegion {
    pub rect: Rect,
    pub top: Option<RoutingRegionIdx>,
    pub bottom: Option<RoutingRegionIdx>,
    pub left: Option<RoutingRegionIdx>,
    pub right: Option<RoutingRegionIdx>,
    pub horizontal_routes: Vec<RouteId>,
    pub vertical_routes: Vec<RouteId>,
}

impl RoutingRegion {
    fn new(rect: Rect) -> Self {
        Self { rect, top: None, bottom: None, left: None, right: None, horizontal_routes: Vec::new(), vertical_routes: Vec::new() }
    }

    /// Horizontal capacity: the number of distinct horizontal lanes the
    /// region's height can hold.
    pub fn h_cap(&self) -> i64 { self.rect.width }
    /// Vertical capacity: the number of distinct vertical lanes the
    /// region's width can hold.
    pub fn v_cap(&self) -> i64 { self.rect.height }

    pub fn has_horizontal_capacity(&self) -> bool { (self.horizontal_routes.len() as i64) < self.h_cap() }
    pub fn has_vertical_capacity(&self) -> bool { (self.vertical_routes.len() as i64) < self.v_cap() }

    pub fn adjacent_regions(&self) -> [Option<RoutingRegionIdx>; 4] {
        [self.top, self.bottom, self.left, self.right]
    }

    pub fn set_neighbor(&mut self, edge: Edge, region: Option<RoutingRegionIdx>) {
        match edge {
            Edge::Top => self.top = region,
            Edge::Bottom => self.bottom = region,
            Edge::Left => self.left = region,
            Edge::Right => self.right = region,
        }
    }

    pub fn register_route(&mut self, direction: crate::geometry::Direction, route: RouteId) {
        match direction {
            crate::geometry::Direction::Horizontal => self.horizontal_routes.push(route),
            crate::geometry::Direction::Vertical => self.vertical_routes.push(route),
        }
    }

    /// Distributes each registered route's lane offset evenly across the
    /// region, per the lane-assignment rule: `diff = cap / (n + 1)`, first
    /// route at `diff`, second at `2 * diff`, etc.
    pub fn assign_routes(&self) -> Vec<(RouteId, i64)> {
        let mut out = Vec::with_capacity(self.horizontal_routes.len() + self.vertical_routes.len());
        let hz_diff = self.h_cap() / (self.horizontal_routes.len() as i64 + 1);
        for (i, &route) in self.horizontal_routes.iter().enumerate() {
            out.push((route, hz_diff * (i as i64 + 1)));
        }
        let vt_diff = self.v_cap() / (self.vertical_routes.len() as i64 + 1);
        for (i, &route) in self.vertical_routes.iter().enumerate() {
            out.push((route, vt_diff * (i as i64 + 1)));
        }
        out
    }
}

pub type RoutingRegions = IndexedMap<RoutingRegionIdx, RoutingRegion>;

/// The four regions bordering a placed component, one per edge.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComponentRegions {
    pub top: Option<RoutingRegionIdx>,
    pub bottom: Option<RoutingRegionIdx>,
    pub left: Option<RoutingRegionIdx>,
    pub right: Option<RoutingRegionIdx>,
}

/// Corner bookkeeping around one grid intersection point: up to four regions
/// meet there, one per corner of the point. Mirrors `RegionGroup`.
#[derive(Debug, Clone, Copy, Default)]
struct RegionGroup {
    top_left: Option<RoutingRegionIdx>,
    top_right: Option<RoutingRegionIdx>,
    bottom_left: Option<RoutingRegionIdx>,
    bottom_right: Option<RoutingRegionIdx>,
}

impl RegionGroup {
    fn set_region(&mut self, corner: Corner, region: RoutingRegionIdx) {
        match corner {
            Corner::TopLeft => self.top_left = Some(region),
            Corner::TopRight => self.top_right = Some(region),
            Corner::BottomLeft => self.bottom_left = Some(region),
            Corner::BottomRight => self.bottom_right = Some(region),
        }
    }

    /// Wires each region meeting at this point to the two regions sharing
    /// an edge with it through the point.
    fn connect_regions(&self, regions: &mut RoutingRegions) {
        if let Some(idx) = self.top_left {
            regions[idx].set_neighbor(Edge::Bottom, self.bottom_left);
            regions[idx].set_neighbor(Edge::Right, self.top_right);
        }
        if let Some(idx) = self.top_right {
            regions[idx].set_neighbor(Edge::Left, self.top_left);
            regions[idx].set_neighbor(Edge::Bottom, self.bottom_right);
        }
        if let Some(idx) = self.bottom_left {
            regions[idx].set_neighbor(Edge::Top, self.top_left);
            regions[idx].set_neighbor(Edge::Right, self.bottom_right);
        }
        if let Some(idx) = self.bottom_right {
            regions[idx].set_neighbor(Edge::Left, self.bottom_left);
            regions[idx].set_neighbor(Edge::Top, self.top_right);
        }
    }
}

/// Stretches `line`'s spanning edge to the full chip extent, then contracts
/// each endpoint in until it first meets a line in `boundaries` (an
/// orthogonal-orientation edge of some other component), keeping whichever
/// resulting point lies closer to the original segment.
fn extrude(line: Line, full_span: Line, boundaries: &[Line]) -> Line {
    let mut p1 = full_span.p1();
    let mut p2 = full_span.p2();
    for boundary in boundaries {
        let stretched = Line::new(p1, p2);
        if let Some(hit) = stretched.intersect(boundary, IntersectKind::Cross) {
            let d1 = hit.manhattan_distance(&line.p1());
            let d2 = hit.manhattan_distance(&line.p2());
            if d1 < d2 {
                p1 = hit;
            } else {
                p2 = hit;
            }
        }
    }
    Line::new(p1, p2)
}

fn dedup_lines(lines: Vec<Line>) -> Vec<Line> {
    let mut out: Vec<Line> = Vec::new();
    for line in lines {
        let normalized = line.normalized();
        if !out.iter().any(|l| l.p1() == normalized.p1() && l.p2() == normalized.p2()) {
            out.push(normalized);
        }
    }
    out
}

/// Builds the connectivity graph for a placed chip: every rectangle of free
/// area between `placement`'s components, linked to its up-to-four
/// neighbors, plus each component's four bordering regions.
///
/// Requires every component in `placement.positions` to lie within
/// `placement.chip_rect`, and its top-left to be at the origin.
pub fn build_connectivity_graph(placement: &Placement) -> (RoutingRegions, HashMap<GridComponentIdx, ComponentRegions>) {
    let chip_rect = placement.chip_rect;
    debug_assert_eq!(chip_rect.x, 0);
    debug_assert_eq!(chip_rect.y, 0);

    let component_rects: Vec<Rect> = placement.positions.iter().map(|(_, r)| *r).collect();

    let mut hz_bounding: Vec<Line> = Vec::new();
    let mut vt_bounding: Vec<Line> = Vec::new();
    for r in &component_rects {
        hz_bounding.push(r.edge_line(Edge::Top));
        hz_bounding.push(r.edge_line(Edge::Bottom));
        vt_bounding.push(r.edge_line(Edge::Left));
        vt_bounding.push(r.edge_line(Edge::Right));
    }

    let mut hz_region_lines: Vec<Line> = Vec::new();
    for h in &hz_bounding {
        let y = h.p1().y;
        let full_span = Line::new(Point::new(chip_rect.left(), y), Point::new(chip_rect.right(), y));
        hz_region_lines.push(extrude(*h, full_span, &vt_bounding));
    }
    hz_region_lines = dedup_lines(hz_region_lines);

    let mut vt_region_lines: Vec<Line> = Vec::new();
    for v in &vt_bounding {
        let x = v.p1().x;
        let full_span = Line::new(Point::new(x, chip_rect.top()), Point::new(x, chip_rect.bottom()));
        vt_region_lines.push(extrude(*v, full_span, &hz_bounding));
    }
    vt_region_lines = dedup_lines(vt_region_lines);

    hz_region_lines.push(chip_rect.edge_line(Edge::Top));
    hz_region_lines.push(chip_rect.edge_line(Edge::Bottom));
    vt_region_lines.push(chip_rect.edge_line(Edge::Left));
    vt_region_lines.push(chip_rect.edge_line(Edge::Right));

    hz_region_lines.sort_by_key(|l| l.p1().y);
    vt_region_lines.sort_by_key(|l| l.p1().x);

    let mut regions: RoutingRegions = IndexedMap::new();
    let mut region_groups: HashMap<Point, RegionGroup> = HashMap::new();

    for hi in 1..hz_region_lines.len() {
        for vi in 1..vt_region_lines.len() {
            let hz_line = hz_region_lines[hi];
            let vt_line = vt_region_lines[vi];
            let Some(region_bottom) = hz_line.intersect(&vt_line, IntersectKind::OnEdge) else { continue };

            let mut region_top = None;
            let mut top_hz_line = None;
            for hi_rev in (0..hi).rev() {
                let candidate = hz_region_lines[hi_rev];
                if let Some(p) = candidate.intersect(&vt_line, IntersectKind::OnEdge) {
                    region_top = Some(p);
                    top_hz_line = Some(candidate);
                    break;
                }
            }
            let Some(region_top) = region_top else { continue };
            let top_hz_line = top_hz_line.unwrap();

            let (region_bottom_left, region_bottom_right);
            if vt_line.p1().x == hz_line.p1().x {
                // bottom-left corner
                region_bottom_left = region_bottom;
                let mut found = None;
                for vi_rev in (vi + 1)..vt_region_lines.len() {
                    if let Some(p) = hz_line.intersect(&vt_region_lines[vi_rev], IntersectKind::OnEdge) {
                        found = Some(p);
                        break;
                    }
                }
                let Some(br) = found else { continue };
                region_bottom_right = br;
            } else {
                // bottom-right corner; skip if it would poke into a component
                if top_hz_line.p1().x == region_bottom.x {
                    continue;
                }
                region_bottom_right = region_bottom;
                let mut found = None;
                for vi_rev in (0..vi).rev() {
                    if let Some(p) = hz_line.intersect(&vt_region_lines[vi_rev], IntersectKind::OnEdge) {
                        found = Some(p);
                        break;
                    }
                }
                let Some(bl) = found else { continue };
                region_bottom_left = bl;
            }

            let region_top_left = Point::new(region_bottom_left.x, region_top.y);
            let new_rect = Rect::from_corners(region_top_left, region_bottom_right);

            if component_rects.iter().any(|r| *r == new_rect) {
                continue;
            }

            let existing = regions.iter().find(|(_, r)| r.rect == new_rect).map(|(idx, _)| idx);
            let region_idx = existing.unwrap_or_else(|| regions.push(RoutingRegion::new(new_rect)));

            region_groups.entry(new_rect.top_left()).or_default().set_region(Corner::BottomRight, region_idx);
            region_groups.entry(new_rect.bottom_left()).or_default().set_region(Corner::TopRight, region_idx);
            region_groups.entry(new_rect.top_right()).or_default().set_region(Corner::BottomLeft, region_idx);
            region_groups.entry(new_rect.bottom_right()).or_default().set_region(Corner::TopLeft, region_idx);
        }
    }

    for group in region_groups.values() {
        group.connect_regions(&mut regions);
    }

    let mut component_regions = HashMap::with_capacity(placement.positions.len());
    for (grid_idx, rect) in &placement.positions {
        let top_left_group = region_groups.get(&rect.top_left());
        let top_right_group = region_groups.get(&rect.top_right());
        let bottom_left_group = region_groups.get(&rect.bottom_left());
        debug_assert!(top_left_group.is_some() && top_right_group.is_some() && bottom_left_group.is_some() && region_groups.contains_key(&rect.bottom_right()));

        component_regions.insert(
            *grid_idx,
            ComponentRegions {
                top: top_left_group.and_then(|g| g.top_right),
                left: top_left_group.and_then(|g| g.bottom_left),
                right: top_right_group.and_then(|g| g.bottom_right),
                bottom: bottom_left_group.and_then(|g| g.bottom_right),
            },
        );
    }

    (regions, component_regions)
}

/// Indexes regions by their bottom-right corner for position→region
/// lookups (used when a router needs the region bordering some port).
///
/// `lookup`'s tie-break parameters resolve which of two regions meeting at
/// a shared corner point "owns" that point, mirroring the source's
/// `RegionMap::lookup`: `tie_break_vt` (`Edge::Left`/`Edge::Right`) nudges
/// the x-coordinate search by zero or one before taking `lower_bound`, and
/// `tie_break_hz` (`Edge::Top`/`Edge::Bottom`) does the same for y. A point
/// exactly on a region's right/bottom edge resolves to that region under
/// the default `Left`/`Top` tie-break; passing `Right`/`Bottom` instead
/// walks past it to the next one.
pub struct RegionMap {
    by_corner: BTreeMap<i64, BTreeMap<i64, RoutingRegionIdx>>,
}

impl RegionMap {
    pub fn build(regions: &RoutingRegions) -> Self {
        let mut by_corner: BTreeMap<i64, BTreeMap<i64, RoutingRegionIdx>> = BTreeMap::new();
        for (idx, region) in regions.iter() {
            let br = region.rect.bottom_right();
            by_corner.entry(br.x).or_default().insert(br.y, idx);
        }
        Self { by_corner }
    }

    pub fn lookup(&self, point: Point, tie_break_vt: Edge, tie_break_hz: Edge) -> Option<RoutingRegionIdx> {
        debug_assert!(matches!(tie_break_vt, Edge::Left | Edge::Right));
        debug_assert!(matches!(tie_break_hz, Edge::Top | Edge::Bottom));

        let x_key = point.x + if matches!(tie_break_vt, Edge::Left) { 0 } else { 1 };
        let (_, column) = self.by_corner.range(x_key..).next()?;
        let y_key = point.y + if matches!(tie_break_hz, Edge::Top) { 0 } else { 1 };
        column.range(y_key..).next().map(|(_, &idx)| idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridComponentIdx;

    /// The figure 5.18 layout from *VLSI Physical Design: From Graph
    /// Partitioning to Timing Closure* that `original_source/test/
    /// tst_routingregion.cpp` checks connectivity-graph construction
    /// against: a 10x12 chip with three placed components, which tiles
    /// into exactly 21 routing regions.
    fn figure_5_18_placement() -> Placement {
        let chip_rect = Rect::new(0, 0, 10, 12);
        let c_a = Rect::new(2, 3, 3, 4);
        let c_b = Rect::new(2, 10, 7, 1);
        let c_c = Rect::new(6, 1, 3, 6);
        let positions = vec![
            (GridComponentIdx::from(0u32), c_a),
            (GridComponentIdx::from(1u32), c_b),
            (GridComponentIdx::from(2u32), c_c),
        ];
        Placement { chip_rect, positions }
    }

    #[test]
    fn connectivity_graph_tiles_figure_5_18_into_21_regions() {
        let placement = figure_5_18_placement();
        let (regions, _) = build_connectivity_graph(&placement);

        let mut expected = vec![
            Rect::new(0, 0, 2, 1),
            Rect::new(0, 1, 2, 2),
            Rect::new(0, 3, 2, 4),
            Rect::new(0, 7, 2, 3),
            Rect::new(0, 10, 2, 1),
            Rect::new(0, 11, 2, 1),
            Rect::new(2, 0, 3, 1),
            Rect::new(2, 1, 3, 2),
            Rect::new(2, 7, 3, 3),
            Rect::new(2, 11, 7, 1),
            Rect::new(5, 0, 1, 1),
            Rect::new(5, 1, 1, 2),
            Rect::new(5, 3, 1, 4),
            Rect::new(5, 7, 1, 3),
            Rect::new(6, 0, 3, 1),
            Rect::new(6, 7, 3, 3),
            Rect::new(9, 0, 1, 1),
            Rect::new(9, 1, 1, 6),
            Rect::new(9, 7, 1, 3),
            Rect::new(9, 10, 1, 1),
            Rect::new(9, 11, 1, 1),
        ];

        assert_eq!(regions.len(), expected.len());
        for (_, region) in regions.iter() {
            let pos = expected.iter().position(|r| *r == region.rect);
            assert!(pos.is_some(), "unexpected region rect {:?}", region.rect);
            expected.remove(pos.unwrap());
        }
        assert!(expected.is_empty(), "missing expected regions: {:?}", expected);
    }

    #[test]
    fn adjacency_is_symmetric() {
        let placement = figure_5_18_placement();
        let (regions, _) = build_connectivity_graph(&placement);

        for (idx, region) in regions.iter() {
            if let Some(right) = region.right {
                assert_eq!(regions[right].left, Some(idx));
            }
            if let Some(bottom) = region.bottom {
                assert_eq!(regions[bottom].top, Some(idx));
            }
        }
    }

    #[test]
    fn region_lookup_resolves_tie_break() {
        let placement = figure_5_18_placement();
        let (regions, _) = build_connectivity_graph(&placement);
        let map = RegionMap::build(&regions);

        // (2, 0) sits on the shared corner between the region to its left
        // ((0,0)-(2,1)) and the region to its right ((2,0)-(5,1)).
        let left_of = map.lookup(Point::new(2, 0), Edge::Left, Edge::Top).unwrap();
        let right_of = map.lookup(Point::new(2, 0), Edge::Right, Edge::Top).unwrap();
        assert_eq!(regions[left_of].rect, Rect::new(0, 0, 2, 1));
        assert_eq!(regions[right_of].rect, Rect::new(2, 0, 3, 1));
    }
}
