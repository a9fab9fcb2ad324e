//! The simulation core: arena indices, ports, components and the `Design`
//! driver that ties them together.

pub mod component;
pub mod design;
pub mod ids;
pub mod port;

pub use component::{ComponentData, ComponentKind, RegisterState};
pub use design::Design;
pub use ids::{ComponentIdx, PortIdx};
pub use port::{Port, PortSource, PropagationFn};
