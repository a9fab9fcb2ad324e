//! Arena indices for the circuit graph.
//!
//! Components reference each other through ports, and registers close those
//! references into cycles. Rather than model that with `Rc<RefCell<_>>` and
//! fight the borrow checker over a graph that is cyclic by construction, every
//! [`crate::core::port::Port`] and [`crate::core::component::ComponentData`]
//! lives in a flat [`vsrtl_idx::maps::IndexedMap`] owned by
//! [`crate::core::design::Design`], and is referred to everywhere else by one
//! of these small `Copy` indices.

use vsrtl_idx::impl_index;

/// Index of a [`crate::core::port::Port`] in `Design::ports`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PortIdx(u32);
impl_index!(PortIdx);

/// Index of a [`crate::core::component::ComponentData`] in `Design::components`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ComponentIdx(u32);
impl_index!(ComponentIdx);
