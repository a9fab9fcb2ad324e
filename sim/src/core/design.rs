//! The circuit root: arenas of ports and components, the combinational
//! propagation engine, and the clock/reset/reverse driver operations.
//!
//! `Design` plays the role the source splits across `Component`, `Register`
//! and `Design` subclasses: here it is simply the root [`ComponentIdx`] plus
//! the two arenas (`ports`, `components`) that every other handle in the
//! crate indexes into. Hierarchy (`sub_components`) exists purely for naming
//! and for the grid/placement layer; port connections may and do cross tree
//! levels freely, so propagation schedules directly over the flat component
//! arena rather than recursing through the tree.

use baa::BitVecValue;
use num_bigint::BigInt;
use vsrtl_idx::maps::IndexedMap;

use crate::core::component::{ComponentData, ComponentKind, RegisterState, ReverseStack};
use crate::core::ids::{ComponentIdx, PortIdx};
use crate::core::port::{Port, PortSource, PropagationFn};
use crate::errors::{VsrtlError, VsrtlResult};
use crate::logging::{discard_logger, trace, Logger};

/// Default depth of a newly created register's reverse stack.
pub const DEFAULT_REVERSE_DEPTH: usize = 32;

pub struct Design {
    ports: IndexedMap<PortIdx, Port>,
    components: IndexedMap<ComponentIdx, ComponentData>,
    /// Cache of every register's `ComponentIdx`, so clock/reset/reverse don't
    /// need to scan the whole arena each call.
    registers: Vec<ComponentIdx>,
    root: ComponentIdx,
    reverse_depth: usize,
    cycle_count: u64,
    initialized: bool,
    logger: Logger,
    /// Subscribers to the `changed` event, fired after every settle. Plain
    /// `Fn` (not `FnMut`) because callbacks run on the driver thread and must
    /// not mutate the circuit (single-threaded, no reentrancy).
    listeners: Vec<Box<dyn Fn(&Design)>>,
}

impl Design {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_logger(name, discard_logger())
    }

    pub fn with_logger(name: impl Into<String>, logger: Logger) -> Self {
        let mut components = IndexedMap::new();
        let root = components.push(ComponentData::new(name, None, ComponentKind::Design));
        Self {
            ports: IndexedMap::new(),
            components,
            registers: Vec::new(),
            root,
            reverse_depth: DEFAULT_REVERSE_DEPTH,
            cycle_count: 0,
            initialized: false,
            logger,
            listeners: Vec::new(),
        }
    }

    pub fn root(&self) -> ComponentIdx {
        self.root
    }

    pub fn cycle_count(&self) -> u64 {
        self.cycle_count
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn reverse_depth(&self) -> usize {
        self.reverse_depth
    }

    pub fn component_name(&self, idx: ComponentIdx) -> &str {
        &self.components[idx].name
    }

    pub fn port_name(&self, idx: PortIdx) -> &str {
        &self.ports[idx].name
    }

    pub fn port_width(&self, idx: PortIdx) -> u32 {
        self.ports[idx].width
    }

    pub fn port_parent(&self, idx: PortIdx) -> ComponentIdx {
        self.ports[idx].parent
    }

    pub fn port_upstream(&self, idx: PortIdx) -> Option<PortIdx> {
        self.ports[idx].upstream
    }

    pub fn is_register(&self, idx: ComponentIdx) -> bool {
        self.components[idx].is_register()
    }

    /// The `(in, out)` port pair of a register component, for primitives
    /// (e.g. `register_file`) that wire other ports directly to a register's
    /// boundary rather than going through `Design::connect` alone.
    pub fn register_ports(&self, idx: ComponentIdx) -> (PortIdx, PortIdx) {
        let state = self.components[idx]
            .register_state()
            .expect("register_ports called on a non-register component");
        (state.input, state.output)
    }

    pub fn registers(&self) -> &[ComponentIdx] {
        &self.registers
    }

    pub fn input_ports(&self, component: ComponentIdx) -> &[PortIdx] {
        &self.components[component].input_ports
    }

    pub fn output_ports(&self, component: ComponentIdx) -> &[PortIdx] {
        &self.components[component].output_ports
    }

    // --- value accessors, used both by tests and by primitive propagation
    // closures, which only ever get a `&Design` ---

    pub fn raw_value(&self, port: PortIdx) -> &BitVecValue {
        &self.ports[port].value
    }

    pub fn unsigned(&self, port: PortIdx) -> u64 {
        self.ports[port].value_unsigned()
    }

    pub fn signed(&self, port: PortIdx) -> i64 {
        self.ports[port].value_signed()
    }

    // --- circuit construction ---

    pub fn add_component(&mut self, parent: ComponentIdx, name: impl Into<String>) -> ComponentIdx {
        let idx = self
            .components
            .push(ComponentData::new(name, Some(parent), ComponentKind::Plain));
        self.components[parent].sub_components.push(idx);
        idx
    }

    /// Creates a register with the `in -> [reg] -> out` port pair and an
    /// initial (reset) value. The reverse stack starts empty at
    /// [`Design::reverse_depth`].
    pub fn add_register(
        &mut self,
        parent: ComponentIdx,
        name: impl Into<String>,
        width: u32,
        initial: u64,
    ) -> ComponentIdx {
        let idx = self.components.peek_next_idx();
        let input = self.ports.push(Port::new_input("in", width, idx));
        let output = self.ports.push(Port::new_register_output("out", width, idx));
        let initial_value = BitVecValue::from_u64(initial, width);
        let state = RegisterState {
            width,
            saved: initial_value.clone(),
            initial: initial_value,
            reverse_stack: ReverseStack::new(self.reverse_depth),
            input,
            output,
        };
        let comp = ComponentData {
            name: name.into(),
            parent: Some(parent),
            input_ports: vec![input],
            output_ports: vec![output],
            sub_components: Vec::new(),
            propagated: false,
            kind: ComponentKind::Register(state),
            graphic_type: None,
        };
        let pushed = self.components.push(comp);
        debug_assert_eq!(pushed, idx);
        self.components[parent].sub_components.push(idx);
        self.registers.push(idx);
        idx
    }

    pub fn add_input_port(&mut self, component: ComponentIdx, name: impl Into<String>, width: u32) -> PortIdx {
        let idx = self.ports.push(Port::new_input(name, width, component));
        self.components[component].input_ports.push(idx);
        idx
    }

    pub fn add_output_port(&mut self, component: ComponentIdx, name: impl Into<String>, width: u32) -> PortIdx {
        let idx = self.ports.push(Port::new_output(name, width, component));
        self.components[component].output_ports.push(idx);
        idx
    }

    pub fn add_constant_output(
        &mut self,
        component: ComponentIdx,
        name: impl Into<String>,
        width: u32,
        value: u64,
    ) -> PortIdx {
        let v = BitVecValue::from_u64(value, width);
        let idx = self.ports.push(Port::new_constant(name, width, component, v));
        self.components[component].output_ports.push(idx);
        idx
    }

    /// Sets a tag consumed by the graphics collaborator to pick a shape for
    /// this component (opaque to the simulation core). The simulation core never reads it back.
    pub fn set_graphic_type(&mut self, component: ComponentIdx, tag: impl Into<String>) {
        self.components[component].graphic_type = Some(tag.into());
    }

    /// Binds `dst`'s upstream link to `src`. Fails if `dst` is already
    /// connected or the widths disagree (construction-time invariants).
    ///
    /// Unlike the source's `src >> dst` operator, this takes plain indices:
    /// an arena of ports can't support two live `&mut` handles the way two
    /// in-memory `Port&` references can, so construction goes through
    /// `Design` instead of the ports themselves. See DESIGN.md.
    pub fn connect(&mut self, src: PortIdx, dst: PortIdx) -> VsrtlResult<()> {
        if self.ports[dst].upstream.is_some() {
            return Err(VsrtlError::DuplicateConnection {
                port_name: self.ports[dst].name.clone(),
                component_name: self.components[self.ports[dst].parent].name.clone(),
                port: dst,
            });
        }
        let (src_width, dst_width) = (self.ports[src].width, self.ports[dst].width);
        if src_width != dst_width {
            return Err(VsrtlError::WidthMismatch {
                src,
                src_width,
                dst,
                dst_width,
            });
        }
        self.ports[dst].upstream = Some(src);
        self.ports[src].downstream.push(dst);
        Ok(())
    }

    /// `literal >> dst`: attaches a fixed value directly to `dst`, bypassing
    /// whatever source kind it was created with.
    pub fn connect_literal(&mut self, dst: PortIdx, value: u64) -> VsrtlResult<()> {
        if self.ports[dst].upstream.is_some() {
            return Err(VsrtlError::DuplicateConnection {
                port_name: self.ports[dst].name.clone(),
                component_name: self.components[self.ports[dst].parent].name.clone(),
                port: dst,
            });
        }
        let width = self.ports[dst].width;
        self.ports[dst].source = PortSource::Constant(BitVecValue::from_u64(value, width));
        Ok(())
    }

    /// `port << λ`: attaches a propagation function to a derived output port.
    pub fn drive<F>(&mut self, port: PortIdx, f: F)
    where
        F: Fn(&Design) -> BitVecValue + 'static,
    {
        self.ports[port].source = PortSource::Derived(Some(Box::new(f) as PropagationFn));
    }

    pub fn on_changed<F>(&mut self, f: F)
    where
        F: Fn(&Design) + 'static,
    {
        self.listeners.push(Box::new(f));
    }

    fn notify_changed(&mut self) {
        // Listeners take `&Design`, so they can't be invoked while they're
        // still borrowed out of `self`; swap them out for the call instead.
        let listeners = std::mem::take(&mut self.listeners);
        for listener in &listeners {
            listener(self);
        }
        self.listeners = listeners;
    }

    // --- verification ---

    /// Walks every port checking it is connected and nonzero-width, then
    /// runs an initial settle. Must be called before the first `clock()`.
    pub fn verify_and_initialize(&mut self) -> VsrtlResult<()> {
        for (idx, port) in self.ports.iter() {
            let component_name = self.components[port.parent].name.clone();
            if let Some(err) = port.verify_error(&component_name, idx) {
                return Err(err);
            }
        }
        self.settle()?;
        self.initialized = true;
        Ok(())
    }

    // --- the combinational propagation engine ---

    fn component_ready(&self, idx: ComponentIdx) -> bool {
        self.components[idx].input_ports.iter().all(|&port| {
            match &self.ports[port].source {
                PortSource::Input => self.ports[port]
                    .upstream
                    .map(|up| self.ports[up].propagated)
                    .unwrap_or(false),
                // a port declared as an input but overridden with a
                // literal (connect_literal) is trivially ready
                _ => true,
            }
        })
    }

    fn propagate_port(&mut self, idx: PortIdx) {
        if self.ports[idx].propagated {
            return;
        }
        let value = match &self.ports[idx].source {
            PortSource::Constant(v) => v.clone(),
            PortSource::RegisterOutput => self.ports[idx].value.clone(),
            PortSource::Input => {
                let up = self.ports[idx]
                    .upstream
                    .expect("verify_and_initialize guarantees a connected input");
                self.ports[up].value.clone()
            }
            PortSource::Derived(_) => {
                // The closure takes `&Design`, so it can't be called while
                // still borrowed out of `self.ports[idx]`. Swap it out for
                // the duration of the call instead of aliasing it.
                let source = std::mem::replace(&mut self.ports[idx].source, PortSource::Derived(None));
                let value = match &source {
                    PortSource::Derived(Some(f)) => f(self),
                    _ => unreachable!("verify_and_initialize rejects undriven derived ports"),
                };
                self.ports[idx].source = source;
                value
            }
        };
        self.ports[idx].value = value;
        self.ports[idx].propagated = true;
    }

    fn propagate_component(&mut self, idx: ComponentIdx) {
        let inputs = self.components[idx].input_ports.clone();
        for p in inputs {
            self.propagate_port(p);
        }
        let outputs = self.components[idx].output_ports.clone();
        for p in outputs {
            self.propagate_port(p);
        }
        self.components[idx].propagated = true;
    }

    /// One pass of the combinational propagation engine: resets every port
    /// and component, publishes constants and register outputs as sources,
    /// then repeatedly advances every component whose inputs have all
    /// become available until nothing changes. A settle round that leaves
    /// any component unpropagated is a combinational loop with no register
    /// to break it.
    pub fn settle(&mut self) -> VsrtlResult<()> {
        for (_, port) in self.ports.iter_mut() {
            port.propagated = port.is_constant();
        }
        for (_, comp) in self.components.iter_mut() {
            comp.propagated = false;
        }

        for idx in 0..self.registers.len() {
            let reg_idx = self.registers[idx];
            let (output, value) = {
                let state = self.components[reg_idx]
                    .register_state()
                    .expect("registers cache only holds register components");
                (state.output, state.saved.clone())
            };
            self.ports[output].value = value;
            self.ports[output].propagated = true;
        }

        let all: Vec<ComponentIdx> = self.components.keys().collect();
        loop {
            let mut progressed = false;
            for &idx in &all {
                if self.components[idx].propagated {
                    continue;
                }
                if self.component_ready(idx) {
                    self.propagate_component(idx);
                    progressed = true;
                }
            }
            if !progressed {
                break;
            }
        }

        if let Some((idx, comp)) = self.components.iter().find(|(_, c)| !c.propagated) {
            return Err(VsrtlError::UnpropagatableCircuit {
                component_name: comp.name.clone(),
                component: idx,
            });
        }
        trace!(self.logger, "settle round complete"; "cycle" => self.cycle_count);
        Ok(())
    }

    // --- driver operations ---

    /// Save phase then settle phase, in that order: every register pushes
    /// its current value and adopts its input, then the whole circuit
    /// settles against the new register outputs.
    pub fn clock(&mut self) -> VsrtlResult<()> {
        for idx in 0..self.registers.len() {
            let reg_idx = self.registers[idx];
            let input = self.components[reg_idx].register_state().unwrap().input;
            let next = self.ports[input].value.clone();
            let state = self.components[reg_idx].register_state_mut().unwrap();
            state.reverse_stack.push(state.saved.clone());
            state.saved = next;
        }
        self.settle()?;
        self.cycle_count += 1;
        self.notify_changed();
        Ok(())
    }

    /// Pops every register's reverse stack and re-settles. Fails atomically
    /// (no register is popped) if any stack is already empty.
    pub fn reverse(&mut self) -> VsrtlResult<()> {
        for &reg_idx in &self.registers {
            if self.components[reg_idx]
                .register_state()
                .unwrap()
                .reverse_stack
                .is_empty()
            {
                return Err(VsrtlError::ReverseExhausted {
                    component_name: self.components[reg_idx].name.clone(),
                    component: reg_idx,
                });
            }
        }
        for idx in 0..self.registers.len() {
            let reg_idx = self.registers[idx];
            let state = self.components[reg_idx].register_state_mut().unwrap();
            state.saved = state.reverse_stack.pop().expect("checked non-empty above");
        }
        self.settle()?;
        self.cycle_count = self.cycle_count.saturating_sub(1);
        self.notify_changed();
        Ok(())
    }

    /// Clears every register's history, restores its initial value, settles,
    /// and resets the cycle counter to 0.
    pub fn reset(&mut self) -> VsrtlResult<()> {
        for &reg_idx in &self.registers {
            let state = self.components[reg_idx].register_state_mut().unwrap();
            state.reverse_stack.clear();
            state.saved = state.initial.clone();
        }
        self.settle()?;
        self.cycle_count = 0;
        self.notify_changed();
        Ok(())
    }

    /// Trims every register's reverse stack to at most `n` entries, dropping
    /// the oldest first, and applies `n` to registers created afterwards.
    pub fn set_reverse_stack_size(&mut self, n: usize) {
        self.reverse_depth = n;
        for &reg_idx in &self.registers {
            self.components[reg_idx]
                .register_state_mut()
                .unwrap()
                .reverse_stack
                .set_depth(n);
        }
    }

    /// Overrides a register's saved value directly, without pushing onto its
    /// reverse stack — an override is a user-driven modification, not a
    /// natural transition, so a subsequent `reverse()` skips over it. Kept
    /// as an explicit, deliberate exception to reverse-stack recording.
    pub fn force_value(&mut self, register: ComponentIdx, value: i64) -> VsrtlResult<()> {
        let width = self.components[register].register_state().unwrap().width;
        let masked = BitVecValue::from_big_int(&BigInt::from(value), width);
        self.components[register]
            .register_state_mut()
            .unwrap()
            .saved = masked;
        self.settle()?;
        self.notify_changed();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::arith::add_adder;

    /// `r <= r.out + 1`, width 32, initial 0.
    fn counter() -> (Design, ComponentIdx) {
        let mut design = Design::new("counter");
        let root = design.root();
        let reg = design.add_register(root, "r", 32, 0);
        let (_, reg_out) = design.register_ports(reg);
        let (_, op1, op2, sum_out) = add_adder(&mut design, root, "incr", 32);
        design.connect(reg_out, op1).unwrap();
        design.connect_literal(op2, 1).unwrap();
        let (reg_in, _) = design.register_ports(reg);
        design.connect(sum_out, reg_in).unwrap();
        design.verify_and_initialize().unwrap();
        (design, reg)
    }

    #[test]
    fn counter_clocks_reverses_and_resets() {
        let (mut design, reg) = counter();
        let (_, out) = design.register_ports(reg);

        for _ in 0..10 {
            design.clock().unwrap();
        }
        assert_eq!(design.unsigned(out), 10);
        assert_eq!(design.cycle_count(), 10);

        for _ in 0..5 {
            design.reverse().unwrap();
        }
        assert_eq!(design.unsigned(out), 5);
        assert_eq!(design.cycle_count(), 5);

        design.reset().unwrap();
        assert_eq!(design.unsigned(out), 0);
        assert_eq!(design.cycle_count(), 0);
    }

    #[test]
    fn two_clocks_from_same_state_match_clock_twice() {
        let (mut design_a, reg_a) = counter();
        let (mut design_b, reg_b) = counter();

        design_a.clock().unwrap();
        design_a.clock().unwrap();

        design_b.clock().unwrap();
        design_b.clock().unwrap();

        let (_, out_a) = design_a.register_ports(reg_a);
        let (_, out_b) = design_b.register_ports(reg_b);
        assert_eq!(design_a.unsigned(out_a), design_b.unsigned(out_b));
    }

    #[test]
    fn reverse_past_empty_stack_fails_without_mutating() {
        let (mut design, reg) = counter();
        design.clock().unwrap();
        design.reverse().unwrap();
        let (_, out) = design.register_ports(reg);
        let before = design.unsigned(out);
        let before_cycles = design.cycle_count();

        let result = design.reverse();
        assert!(result.is_err());
        assert_eq!(design.unsigned(out), before);
        assert_eq!(design.cycle_count(), before_cycles);
    }

    #[test]
    fn force_value_is_bit_identical_and_excluded_from_reverse() {
        let (mut design, reg) = counter();
        design.clock().unwrap();
        design.clock().unwrap();
        let (_, out) = design.register_ports(reg);
        assert_eq!(design.unsigned(out), 2);

        design.force_value(reg, -1).unwrap();
        assert_eq!(design.unsigned(out), 0xFFFF_FFFF);

        // force_value does not push to the reverse stack: reversing now
        // undoes the *second* clock, not the forced override.
        design.reverse().unwrap();
        assert_eq!(design.unsigned(out), 1);
    }

    #[test]
    fn verify_fails_on_unconnected_input() {
        let mut design = Design::new("broken");
        let root = design.root();
        let comp = design.add_component(root, "dangling");
        design.add_input_port(comp, "in", 4);
        let result = design.verify_and_initialize();
        assert!(matches!(result, Err(VsrtlError::UnconnectedInput { .. })));
    }

    #[test]
    fn connect_rejects_width_mismatch() {
        let mut design = Design::new("mismatch");
        let root = design.root();
        let comp = design.add_component(root, "c");
        let a = design.add_output_port(comp, "a", 4);
        let b = design.add_input_port(comp, "b", 8);
        let result = design.connect(a, b);
        assert!(matches!(result, Err(VsrtlError::WidthMismatch { .. })));
    }

    #[test]
    fn set_reverse_stack_size_trims_existing_history() {
        let (mut design, reg) = counter();
        for _ in 0..5 {
            design.clock().unwrap();
        }
        design.set_reverse_stack_size(2);
        for _ in 0..2 {
            design.reverse().unwrap();
        }
        assert!(design.reverse().is_err());
        let (_, out) = design.register_ports(reg);
        assert_eq!(design.unsigned(out), 3);
    }
}
