//! One-row topological placement (`eda/vsrtl_placeroute.cpp`'s
//! `topologicalSortPlacement`).

use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;

use vsrtl::Design;

use crate::geometry::Rect;
use crate::grid::{wire_count, GridComponentIdx, GridLayout, CHIP_MARGIN, PLACEMENT_GAP};
use crate::logging::{discard_logger, warn, Logger};
use crate::placer::Placement;

/// Places `components` left-to-right in a single row, in topological order
/// of the directed wire graph between them (edges from a component's outputs
/// to whatever they feed). Registers don't constrain the order — their
/// outputs are sources and their inputs are sinks within one settle round —
/// so edges touching a register are dropped before sorting, per the
/// "registers are edge breakers" design note.
pub fn place_topological(design: &Design, layout: &mut GridLayout, components: &[GridComponentIdx]) -> Placement {
    place_topological_with_logger(design, layout, components, discard_logger())
}

pub fn place_topological_with_logger(
    design: &Design,
    layout: &mut GridLayout,
    components: &[GridComponentIdx],
    logger: Logger,
) -> Placement {
    let mut graph: DiGraphMap<GridComponentIdx, ()> = DiGraphMap::new();
    for &c in components {
        graph.add_node(c);
    }
    for (i, &a) in components.iter().enumerate() {
        let a_is_register = design.is_register(layout.get(a).logical);
        for &b in &components[i + 1..] {
            let b_is_register = design.is_register(layout.get(b).logical);
            if a_is_register || b_is_register {
                continue;
            }
            let a_logical = layout.get(a).logical;
            let b_logical = layout.get(b).logical;
            if wire_count(design, a_logical, b_logical) == 0 {
                continue;
            }
            // Orientation: an edge a->b if any of b's inputs is fed by a.
            if design
                .input_ports(b_logical)
                .iter()
                .any(|&p| design.port_upstream(p).is_some_and(|u| design.port_parent(u) == a_logical))
            {
                graph.add_edge(a, b, ());
            } else {
                graph.add_edge(b, a, ());
            }
        }
    }

    let order: Vec<GridComponentIdx> = match toposort(&graph, None) {
        Ok(order) => order,
        Err(cycle) => {
            warn!(logger, "topological placement found a cycle outside registers, falling back to insertion order"; "node" => format!("{:?}", cycle.node_id()));
            components.to_vec()
        }
    };

    let mut cursor = CHIP_MARGIN;
    let mut max_bottom = 0i64;
    let mut positions = Vec::with_capacity(order.len());
    for idx in order {
        let min_width = layout.get(idx).adjusted().width;
        let min_height = layout.get(idx).adjusted().height;
        layout.move_to(idx, cursor, CHIP_MARGIN);
        let rect = Rect::new(cursor, CHIP_MARGIN, min_width, min_height);
        max_bottom = max_bottom.max(rect.bottom());
        cursor += min_width + PLACEMENT_GAP;
        positions.push((idx, rect));
    }

    let chip_rect = Rect::new(0, 0, cursor + CHIP_MARGIN, max_bottom + CHIP_MARGIN);
    Placement { chip_rect, positions }
}
