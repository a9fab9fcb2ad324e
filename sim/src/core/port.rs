//! Ports: the typed, fixed-width wires that carry values between components.

use baa::BitVecValue;

use crate::core::ids::{ComponentIdx, PortIdx};
use crate::errors::VsrtlError;

/// How a port obtains its value during a settle round.
pub enum PortSource {
    /// A fixed value, set once at construction and never recomputed.
    Constant(BitVecValue),
    /// An input port: its value mirrors whatever is attached to `upstream`.
    /// Populated by [`connect`](crate::core::design::Design::connect).
    Input,
    /// An output port computed from sibling ports on the same component.
    /// `None` until [`Design::drive`](crate::core::design::Design::drive)
    /// attaches a function; a port left in this state fails verification
    /// with [`VsrtlError::UninitializedSignal`].
    Derived(Option<PropagationFn>),
    /// A register's output: published directly by the save phase of
    /// [`Design::clock`](crate::core::design::Design::clock), bypassing the
    /// normal function-call dispatch (see the propagation step below).
    RegisterOutput,
}

/// A pure function computing an output port's value from the rest of the
/// design. Boxed rather than generic so that [`crate::core::component::ComponentData`]
/// can hold a homogeneous collection of them.
pub type PropagationFn =
    Box<dyn Fn(&crate::core::design::Design) -> BitVecValue>;

/// A fixed-width wire owned by a [`crate::core::component::ComponentData`].
///
/// Invariant: a non-constant port has exactly one upstream source, either an
/// `upstream` link (for [`PortSource::Input`]) or a propagation function over
/// sibling ports (for [`PortSource::Derived`]).
pub struct Port {
    pub name: String,
    pub width: u32,
    pub parent: ComponentIdx,
    pub source: PortSource,
    /// The port feeding this one, if this is an [`PortSource::Input`] that has
    /// been [`connect`](crate::core::design::Design::connect)ed.
    pub upstream: Option<PortIdx>,
    /// Ports fed by this one. Purely bookkeeping for fan-out; not consulted
    /// by propagation itself, which schedules at component granularity.
    pub downstream: Vec<PortIdx>,
    /// Cleared at the start of every settle round.
    pub propagated: bool,
    /// The value produced by the most recently completed settle round.
    pub value: BitVecValue,
}

impl Port {
    pub fn new_input(name: impl Into<String>, width: u32, parent: ComponentIdx) -> Self {
        Self {
            name: name.into(),
            width,
            parent,
            source: PortSource::Input,
            upstream: None,
            downstream: Vec::new(),
            propagated: false,
            value: BitVecValue::zero(width.max(1)),
        }
    }

    pub fn new_output(name: impl Into<String>, width: u32, parent: ComponentIdx) -> Self {
        Self {
            name: name.into(),
            width,
            parent,
            source: PortSource::Derived(None),
            upstream: None,
            downstream: Vec::new(),
            propagated: false,
            value: BitVecValue::zero(width.max(1)),
        }
    }

    pub fn new_constant(
        name: impl Into<String>,
        width: u32,
        parent: ComponentIdx,
        value: BitVecValue,
    ) -> Self {
        Self {
            name: name.into(),
            width,
            parent,
            value: value.clone(),
            source: PortSource::Constant(value),
            upstream: None,
            downstream: Vec::new(),
            propagated: false,
        }
    }

    pub fn new_register_output(name: impl Into<String>, width: u32, parent: ComponentIdx) -> Self {
        Self {
            name: name.into(),
            width,
            parent,
            source: PortSource::RegisterOutput,
            upstream: None,
            downstream: Vec::new(),
            propagated: false,
            value: BitVecValue::zero(width.max(1)),
        }
    }

    /// The raw `width`-bit pattern.
    pub fn value_unsigned(&self) -> u64 {
        self.value.to_u64().unwrap_or(0)
    }

    /// The same bit pattern read as two's-complement at `width`.
    pub fn value_signed(&self) -> i64 {
        self.value.to_i64().unwrap_or(0)
    }

    pub fn reset_propagation(&mut self) {
        self.propagated = false;
    }

    pub fn is_constant(&self) -> bool {
        matches!(self.source, PortSource::Constant(_))
    }

    pub fn is_register_output(&self) -> bool {
        matches!(self.source, PortSource::RegisterOutput)
    }

    pub fn has_no_inputs(&self) -> bool {
        matches!(self.source, PortSource::Constant(_) | PortSource::RegisterOutput)
    }

    /// Verification predicate used by [`Design::verify_and_initialize`]. An
    /// input must be connected; a derived output must have a function.
    pub fn is_driven(&self) -> bool {
        match &self.source {
            PortSource::Constant(_) | PortSource::RegisterOutput => true,
            PortSource::Input => self.upstream.is_some(),
            PortSource::Derived(f) => f.is_some(),
        }
    }

    pub fn verify_error(&self, component_name: &str, port_idx: PortIdx) -> Option<VsrtlError> {
        if self.width == 0 {
            return Some(VsrtlError::ZeroWidthPort {
                port_name: self.name.clone(),
                component_name: component_name.to_string(),
                port: port_idx,
            });
        }
        match &self.source {
            PortSource::Input if self.upstream.is_none() => {
                Some(VsrtlError::UnconnectedInput {
                    port_name: self.name.clone(),
                    component_name: component_name.to_string(),
                    port: port_idx,
                })
            }
            PortSource::Derived(None) => Some(VsrtlError::UninitializedSignal {
                port_name: self.name.clone(),
                component_name: component_name.to_string(),
                port: port_idx,
            }),
            _ => None,
        }
    }
}
