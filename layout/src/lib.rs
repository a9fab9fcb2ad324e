//! `vsrtl-layout`: grid placement, min-cut partitioning, connectivity-graph
//! construction and A* routing for circuits built with the [`vsrtl`] crate.
//!
//! A circuit's logical [`vsrtl::Design`] is mirrored onto a [`grid::GridLayout`]
//! of [`grid::GridComponent`]s; a [`placer`] strategy (topological or
//! min-cut) assigns each one a non-overlapping rectangle; [`connectivity`]
//! derives the planar graph of free-space [`connectivity::RoutingRegion`]s
//! between them; [`router`] finds an A* path per net across that graph; and
//! [`lanes`] spreads each region's crossing routes across its width/height so
//! none overlap. Rendering, dialogs and the graphics scene itself are left
//! entirely to the embedder — this crate only keeps the bookkeeping
//! (`grid::GraphicsRegistry`) a graphics layer needs to hang its own state
//! off of these structures.

pub mod connectivity;
pub mod errors;
pub mod geometry;
pub mod grid;
pub mod lanes;
pub mod logging;
pub mod placer;
pub mod router;

pub use crate::connectivity::{build_connectivity_graph, ComponentRegions, RegionMap, RoutingRegion, RoutingRegionIdx, RoutingRegions};
pub use crate::errors::{LayoutError, LayoutResult, RoutingNoPath};
pub use crate::grid::{GridComponent, GridComponentIdx, GridLayout, GridPort};
pub use crate::placer::Placement;
