//! `Collator`/`Decollator`: concatenate `width` single-bit ports
//! into one `width`-bit port, or split a `width`-bit port back into `width`
//! single-bit ports — the glue for assembling/splitting flag vectors.

use baa::BitVecValue;
use num_bigint::BigUint;

use crate::core::design::Design;
use crate::core::ids::{ComponentIdx, PortIdx};

/// Concatenates `width` one-bit input ports into one `width`-bit output,
/// `in0` occupying the least-significant bit.
pub fn add_collator(
    design: &mut Design,
    parent: ComponentIdx,
    name: &str,
    width: u32,
) -> (ComponentIdx, Vec<PortIdx>, PortIdx) {
    assert!(width > 0, "collator needs at least one input");
    let comp = design.add_component(parent, name);
    let inputs: Vec<PortIdx> = (0..width)
        .map(|i| design.add_input_port(comp, format!("in{i}"), 1))
        .collect();
    let out = design.add_output_port(comp, "out", width);
    let inputs_for_closure = inputs.clone();
    design.drive(out, move |d| {
        let mut acc = BigUint::from(0u8);
        for &port in inputs_for_closure.iter().rev() {
            acc = (acc << 1u32) | d.raw_value(port).to_big_uint();
        }
        BitVecValue::from_big_uint(&acc, width)
    });
    (comp, inputs, out)
}

/// Splits a `width`-bit input port into `width` one-bit output ports, `out0`
/// taking the least-significant bit — the inverse of [`add_collator`].
pub fn add_decollator(
    design: &mut Design,
    parent: ComponentIdx,
    name: &str,
    width: u32,
) -> (ComponentIdx, PortIdx, Vec<PortIdx>) {
    assert!(width > 0, "decollator needs at least one output");
    let comp = design.add_component(parent, name);
    let input = design.add_input_port(comp, "in", width);
    let outputs: Vec<PortIdx> = (0..width)
        .map(|i| {
            let out = design.add_output_port(comp, format!("out{i}"), 1);
            design.drive(out, move |d| d.raw_value(input).slice(i, i));
            out
        })
        .collect();
    (comp, input, outputs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::design::Design;

    #[test]
    fn collator_packs_in0_as_lsb() {
        let mut design = Design::new("test");
        let root = design.root();
        let (_, inputs, out) = add_collator(&mut design, root, "collate", 4);
        design.connect_literal(inputs[0], 1).unwrap();
        design.connect_literal(inputs[1], 0).unwrap();
        design.connect_literal(inputs[2], 1).unwrap();
        design.connect_literal(inputs[3], 1).unwrap();
        design.verify_and_initialize().unwrap();
        assert_eq!(design.unsigned(out), 0b1101);
    }

    #[test]
    fn decollator_splits_out0_as_lsb() {
        let mut design = Design::new("test");
        let root = design.root();
        let (_, input, outputs) = add_decollator(&mut design, root, "decollate", 4);
        design.connect_literal(input, 0b1101).unwrap();
        design.verify_and_initialize().unwrap();
        assert_eq!(design.unsigned(outputs[0]), 1);
        assert_eq!(design.unsigned(outputs[1]), 0);
        assert_eq!(design.unsigned(outputs[2]), 1);
        assert_eq!(design.unsigned(outputs[3]), 1);
    }
}
