//! N-way multiplexer.

use crate::core::design::Design;
use crate::core::ids::{ComponentIdx, PortIdx};

/// `ceil(log2(n))`, at least 1 bit wide (a single-input mux still has a
/// select port, per the source).
fn select_width_for(n: usize) -> u32 {
    if n <= 1 {
        1
    } else {
        (usize::BITS - (n - 1).leading_zeros()).max(1)
    }
}

/// Creates an `n`-input multiplexer: `select` (`ceil(log2(n))` bits) picks
/// which of `inputs[i]` (each `width` bits) reaches `out`. A `select` value
/// at or beyond `n` wraps modulo `n` rather than panicking, since the select
/// port's own width may admit values the caller never intended to route.
pub fn add_mux(
    design: &mut Design,
    parent: ComponentIdx,
    name: &str,
    width: u32,
    n: usize,
) -> (ComponentIdx, PortIdx, Vec<PortIdx>, PortIdx) {
    assert!(n > 0, "mux needs at least one input");
    let comp = design.add_component(parent, name);
    let select = design.add_input_port(comp, "select", select_width_for(n));
    let inputs: Vec<PortIdx> = (0..n)
        .map(|i| design.add_input_port(comp, format!("in{i}"), width))
        .collect();
    let out = design.add_output_port(comp, "out", width);
    let inputs_for_closure = inputs.clone();
    design.drive(out, move |d| {
        let idx = (d.unsigned(select) as usize) % n;
        d.raw_value(inputs_for_closure[idx]).clone()
    });
    (comp, select, inputs, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::design::Design;

    #[test]
    fn mux_selects_input() {
        let mut design = Design::new("test");
        let root = design.root();
        let (_, select, inputs, out) = add_mux(&mut design, root, "mux", 8, 4);
        design.connect_literal(select, 2).unwrap();
        design.connect_literal(inputs[0], 10).unwrap();
        design.connect_literal(inputs[1], 20).unwrap();
        design.connect_literal(inputs[2], 30).unwrap();
        design.connect_literal(inputs[3], 40).unwrap();
        design.verify_and_initialize().unwrap();
        assert_eq!(design.unsigned(out), 30);
    }

    #[test]
    fn mux_select_wraps_modulo_input_count() {
        let mut design = Design::new("test");
        let root = design.root();
        let (_, select, inputs, out) = add_mux(&mut design, root, "mux", 8, 3);
        // select's width (ceil(log2(3)) = 2 bits) admits 3, which wraps to 0
        design.connect_literal(select, 3).unwrap();
        design.connect_literal(inputs[0], 99).unwrap();
        design.connect_literal(inputs[1], 1).unwrap();
        design.connect_literal(inputs[2], 2).unwrap();
        design.verify_and_initialize().unwrap();
        assert_eq!(design.unsigned(out), 99);
    }
}
