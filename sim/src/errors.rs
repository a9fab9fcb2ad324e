//! Error types for the simulation core.
//!
//! A single tier: [`VsrtlError`] covers everything discovered while
//! *building* or *verifying* a design (bad connections, a circuit that
//! cannot settle) and while driving it afterwards (an exhausted reverse
//! stack). Propagation functions themselves return a plain `BitVecValue`
//! rather than a `Result` (see [`crate::core::port::PropagationFn`]), so a
//! primitive like division by zero resolves to a defined value instead of a
//! fault — the same convention RISC-V's `div`/`rem` use, see
//! `sim/src/primitives/muldiv.rs`.

use thiserror::Error;

use crate::core::ids::{ComponentIdx, PortIdx};

pub type VsrtlResult<T> = Result<T, VsrtlError>;

/// Construction- and verification-time failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum VsrtlError {
    /// `verify()`: an input port has no upstream link and no propagation
    /// function to derive a value from.
    #[error("unconnected input port \"{port_name}\" on component \"{component_name}\"")]
    UnconnectedInput {
        port_name: String,
        component_name: String,
        port: PortIdx,
    },

    /// `verify()`: a port was constructed with width 0.
    #[error("port \"{port_name}\" on component \"{component_name}\" has zero width")]
    ZeroWidthPort {
        port_name: String,
        component_name: String,
        port: PortIdx,
    },

    /// `connect()`: the destination port already has an upstream link.
    #[error("port \"{port_name}\" on component \"{component_name}\" is already connected")]
    DuplicateConnection {
        port_name: String,
        component_name: String,
        port: PortIdx,
    },

    /// `connect()`: source and destination widths differ and no narrowing/
    /// widening policy was requested.
    #[error(
        "width mismatch connecting port {src:?} (width {src_width}) to port {dst:?} (width {dst_width})"
    )]
    WidthMismatch {
        src: PortIdx,
        src_width: u32,
        dst: PortIdx,
        dst_width: u32,
    },

    /// A derived output port has neither an upstream link nor a propagation
    /// function attached; it is structurally unable to ever produce a value.
    #[error("port \"{port_name}\" on component \"{component_name}\" has no propagation function")]
    UninitializedSignal {
        port_name: String,
        component_name: String,
        port: PortIdx,
    },

    /// `Design::settle`: a round of propagation made no progress. Indicates a
    /// combinational loop with no register to break it.
    #[error("circuit cannot settle: combinational loop with no register break (component \"{component_name}\")")]
    UnpropagatableCircuit {
        component_name: String,
        component: ComponentIdx,
    },

    /// `Design::reverse`: called when some register's history is empty.
    #[error("reverse() called with an exhausted reverse stack on register \"{component_name}\"")]
    ReverseExhausted {
        component_name: String,
        component: ComponentIdx,
    },
}
