//! The grid model: logical components mirrored onto an integer 2-D grid with
//! edge-anchored ports, plus the graphics collaborator's two tiny interfaces
//! (a one-shot back-pointer slot and a shape registry) — rendering itself is
//! someone else's problem, this crate only keeps the bookkeeping the source's
//! `GridComponent`/`componentshape.h` expose to it.

use std::any::Any;
use std::collections::HashMap;

use vsrtl::ComponentIdx as LogicalComponentIdx;
use vsrtl_idx::impl_index;
use vsrtl_idx::maps::IndexedMap;

use crate::errors::{LayoutError, LayoutResult};
use crate::geometry::{Edge, Rect};

/// Width, in grid units, reserved for a single port stub jutting out of a
/// component's edge (mirrors the source's `GridPort::width()` constant).
pub const PORT_WIDTH: i64 = 2;

/// Horizontal gap the topological placer advances between components.
pub const PLACEMENT_GAP: i64 = 4;

/// Margin from the chip edge the topological placer starts at.
pub const CHIP_MARGIN: i64 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GridComponentIdx(u32);
impl_index!(GridComponentIdx);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridPort {
    pub name: String,
    pub is_input: bool,
    pub edge: Edge,
    /// Offset along `edge`, measured from that edge's first corner.
    pub offset: u32,
}

pub struct GridComponent {
    pub logical: LogicalComponentIdx,
    pub name: String,
    pub rect: Rect,
    /// Minimum size hint below which the rectangle may not shrink — looked
    /// up per component kind in the real implementation's shape registry;
    /// here supplied directly at construction time.
    pub min_rect: Rect,
    pub ports: Vec<GridPort>,
    pub parent: Option<GridComponentIdx>,
    pub subcomponents: Vec<GridComponentIdx>,
}

impl GridComponent {
    /// The rectangle grown by one port-stub-width on every edge that has at
    /// least one port attached, matching the source's `adjusted()`.
    pub fn adjusted(&self) -> Rect {
        let mut r = self.rect;
        let mut grown = [false; 4];
        for port in &self.ports {
            let i = match port.edge { Edge::Top => 0, Edge::Bottom => 1, Edge::Left => 2, Edge::Right => 3 };
            if !grown[i] {
                r = r.grow(port.edge, PORT_WIDTH);
                grown[i] = true;
            }
        }
        r
    }

    fn edge_length(&self, edge: Edge) -> u32 {
        match edge {
            Edge::Top | Edge::Bottom => self.rect.width as u32,
            Edge::Left | Edge::Right => self.rect.height as u32,
        }
    }
}

/// A single back-pointer slot plus a type-tagged shape registry, the two
/// pieces the graphics collaborator interface needs from this crate.
#[derive(Default)]
pub struct GraphicsRegistry {
    graphics: HashMap<GridComponentIdx, Box<dyn Any>>,
    shapes: HashMap<String, Box<dyn Fn(Rect) -> Vec<crate::geometry::Point>>>,
}

impl GraphicsRegistry {
    pub fn new() -> Self { Self::default() }

    pub fn register_graphic(&mut self, component: GridComponentIdx, graphic: Box<dyn Any>) -> LayoutResult<()> {
        if self.graphics.contains_key(&component) {
            return Err(LayoutError::DoubleGraphicRegister(component));
        }
        self.graphics.insert(component, graphic);
        Ok(())
    }

    pub fn graphic(&self, component: GridComponentIdx) -> Option<&dyn Any> {
        self.graphics.get(&component).map(|b| b.as_ref())
    }

    pub fn set_component_shape(&mut self, type_tag: impl Into<String>, shape: impl Fn(Rect) -> Vec<crate::geometry::Point> + 'static) {
        self.shapes.insert(type_tag.into(), Box::new(shape));
    }

    pub fn component_shape(&self, type_tag: &str, transform: Rect) -> Option<Vec<crate::geometry::Point>> {
        self.shapes.get(type_tag).map(|f| f(transform))
    }
}

/// The arena of [`GridComponent`]s for one circuit, plus the graphics
/// collaborator's bookkeeping.
pub struct GridLayout {
    components: IndexedMap<GridComponentIdx, GridComponent>,
    pub graphics: GraphicsRegistry,
}

impl GridLayout {
    pub fn new() -> Self {
        Self { components: IndexedMap::new(), graphics: GraphicsRegistry::new() }
    }

    pub fn add_component(
        &mut self,
        logical: LogicalComponentIdx,
        name: impl Into<String>,
        min_rect: Rect,
        parent: Option<GridComponentIdx>,
    ) -> GridComponentIdx {
        let idx = self.components.push(GridComponent {
            logical,
            name: name.into(),
            rect: min_rect,
            min_rect,
            ports: Vec::new(),
            parent,
            subcomponents: Vec::new(),
        });
        if let Some(p) = parent {
            self.components[p].subcomponents.push(idx);
        }
        idx
    }

    pub fn add_port(&mut self, component: GridComponentIdx, name: impl Into<String>, is_input: bool, edge: Edge, offset: u32) -> LayoutResult<()> {
        let edge_length = self.components[component].edge_length(edge);
        if offset > edge_length {
            return Err(LayoutError::PortOffsetOutOfBounds { component, offset, edge_length });
        }
        self.components[component].ports.push(GridPort { name: name.into(), is_input, edge, offset });
        Ok(())
    }

    /// Moves a component's top-left corner, snapping to the even-coordinate
    /// grid required by the data model's GridComponent invariant.
    pub fn move_to(&mut self, component: GridComponentIdx, x: i64, y: i64) {
        let c = &mut self.components[component];
        c.rect.x = x - x.rem_euclid(2);
        c.rect.y = y - y.rem_euclid(2);
    }

    pub fn get(&self, idx: GridComponentIdx) -> &GridComponent { &self.components[idx] }
    pub fn get_mut(&mut self, idx: GridComponentIdx) -> &mut GridComponent { &mut self.components[idx] }
    pub fn len(&self) -> usize { self.components.len() }
    pub fn is_empty(&self) -> bool { self.components.is_empty() }
    pub fn iter(&self) -> impl Iterator<Item = (GridComponentIdx, &GridComponent)> { self.components.iter() }
    pub fn keys(&self) -> impl Iterator<Item = GridComponentIdx> + '_ { self.components.keys() }
}

impl Default for GridLayout {
    fn default() -> Self { Self::new() }
}

/// The absolute grid coordinate of a port, derived from its owning
/// component's top-left corner plus edge+offset.
pub fn port_position(layout: &GridLayout, component: GridComponentIdx, port: &GridPort) -> crate::geometry::Point {
    let rect = layout.get(component).rect;
    match port.edge {
        Edge::Left => crate::geometry::Point::new(rect.left(), rect.top() + port.offset as i64),
        Edge::Top => crate::geometry::Point::new(rect.left() + port.offset as i64, rect.top()),
        Edge::Bottom => crate::geometry::Point::new(rect.left() + port.offset as i64, rect.bottom()),
        Edge::Right => crate::geometry::Point::new(rect.right(), rect.top() + port.offset as i64),
    }
}

/// Number of wires directly connecting two grid components at the same
/// hierarchy level — the edge weight Kernighan-Lin bisects on and the
/// topological placer's DAG edges. Counts both directions: `a`'s inputs fed
/// from `b`'s outputs, and vice versa.
pub fn wire_count(design: &vsrtl::Design, a: LogicalComponentIdx, b: LogicalComponentIdx) -> u32 {
    let mut count = 0u32;
    for &in_port in design.input_ports(b) {
        if let Some(upstream) = design.port_upstream(in_port) {
            if design.port_parent(upstream) == a {
                count += 1;
            }
        }
    }
    for &in_port in design.input_ports(a) {
        if let Some(upstream) = design.port_upstream(in_port) {
            if design.port_parent(upstream) == b {
                count += 1;
            }
        }
    }
    count
}
