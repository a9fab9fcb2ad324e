//! Error types for placement and routing.

use thiserror::Error;

use crate::grid::GridComponentIdx;

pub type LayoutResult<T> = Result<T, LayoutError>;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Kernighan-Lin bisection requires at least 2 nodes, got {given}")]
    PartitionArityError { given: usize },
    #[error("graphic already registered for component {0:?}")]
    DoubleGraphicRegister(GridComponentIdx),
    #[error("port offset {offset} exceeds edge length {edge_length} on component {component:?}")]
    PortOffsetOutOfBounds { component: GridComponentIdx, offset: u32, edge_length: u32 },
}

/// A* found no path between a net's source and sink regions. Not fatal: per
/// the routing design, the placer may retry with a larger chip rectangle or
/// report the net as unrouted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingNoPath {
    pub net_index: usize,
    pub route_index: usize,
}
