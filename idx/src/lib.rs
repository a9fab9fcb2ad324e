//! Dense, generation-free arena indices.
//!
//! The simulation core and the layout engine both need to refer to graph
//! nodes (ports, components, routing regions) without paying for `Rc`/`RefCell`
//! bookkeeping or fighting the borrow checker over a cyclic object graph.
//! Instead every such node lives in a flat [`maps::IndexedMap`] and is referred
//! to by a small `Copy` index type. [`impl_index`] turns a one-field tuple
//! struct into such an index type.

mod index_trait;
pub mod maps;
mod macros;

pub use index_trait::{
    ConcatenatedIndexRanges, IndexRange, IndexRangeIterator, IndexRef,
    OwnedIndexRangeIterator, SplitIndexRange,
};
