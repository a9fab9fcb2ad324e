//! Arithmetic and bitwise primitives.
//!
//! Widths that can grow (subtraction, negation) are computed by
//! round-tripping through [`num_bigint`], the same pattern used for the
//! divide/multiply primitives (see `sim/src/primitives/muldiv.rs`):
//! read both operands as a `BigUint`/`BigInt`, do the arithmetic at full
//! precision, then truncate back down into a [`BitVecValue`] at the result
//! width. This sidesteps needing the exact arithmetic trait surface `baa`
//! exposes for mismatched widths.

use baa::BitVecValue;
use num_bigint::BigUint;

use crate::core::design::Design;
use crate::core::ids::{ComponentIdx, PortIdx};

fn unsigned_of(design: &Design, port: PortIdx) -> BigUint {
    design.raw_value(port).to_big_uint()
}

fn signed_of(design: &Design, port: PortIdx) -> num_bigint::BigInt {
    design.raw_value(port).to_big_int()
}

/// The interpretation an operand contributes to an arithmetic op: its
/// numeric value is extension-invariant, so this is enough on its own for
/// `Adder`/`Sub` (the full-precision result gets truncated to the output
/// width afterwards regardless of either operand's original width).
fn operand_value(design: &Design, port: PortIdx, signed: bool) -> num_bigint::BigInt {
    if signed {
        signed_of(design, port)
    } else {
        unsigned_of(design, port).into()
    }
}

/// The operand's *bit pattern*, sign- or zero-extended to `target_width`.
/// Unlike [`operand_value`], a bitwise op combines raw bits rather than
/// numeric values, so mismatched-width operands must first be extended to a
/// common width the same way the narrower operand would be wired into a
/// wider bus — `signed` picks sign-extension over zero-extension, and the
/// two give different bits whenever the operand widths differ.
fn operand_bits(design: &Design, port: PortIdx, target_width: u32, signed: bool) -> BigUint {
    if signed {
        BitVecValue::from_big_int(&signed_of(design, port), target_width).to_big_uint()
    } else {
        BitVecValue::from_big_uint(&unsigned_of(design, port), target_width).to_big_uint()
    }
}

/// A two-input, one-output bitwise gate whose operands may have different
/// widths; the result keeps `max(w1, w2)` (`And`/`Or`/`Xor`). `signed`
/// selects sign- versus zero-extension of the narrower operand before the
/// bitwise op, per the primitive table's "(signed/unsigned)" tag.
fn add_binary_gate(
    design: &mut Design,
    parent: ComponentIdx,
    name: &str,
    width1: u32,
    width2: u32,
    signed: bool,
    op: fn(&BigUint, &BigUint) -> BigUint,
) -> (ComponentIdx, PortIdx, PortIdx, PortIdx) {
    let comp = design.add_component(parent, name);
    let op1 = design.add_input_port(comp, "op1", width1);
    let op2 = design.add_input_port(comp, "op2", width2);
    let out_width = width1.max(width2);
    let out = design.add_output_port(comp, "out", out_width);
    design.drive(out, move |d| {
        let value = op(&operand_bits(d, op1, out_width, signed), &operand_bits(d, op2, out_width, signed));
        BitVecValue::from_big_uint(&value, out_width)
    });
    (comp, op1, op2, out)
}

pub fn add_and(design: &mut Design, parent: ComponentIdx, name: &str, width1: u32, width2: u32, signed: bool) -> (ComponentIdx, PortIdx, PortIdx, PortIdx) {
    add_binary_gate(design, parent, name, width1, width2, signed, |a, b| a & b)
}

pub fn add_or(design: &mut Design, parent: ComponentIdx, name: &str, width1: u32, width2: u32, signed: bool) -> (ComponentIdx, PortIdx, PortIdx, PortIdx) {
    add_binary_gate(design, parent, name, width1, width2, signed, |a, b| a | b)
}

pub fn add_xor(design: &mut Design, parent: ComponentIdx, name: &str, width1: u32, width2: u32, signed: bool) -> (ComponentIdx, PortIdx, PortIdx, PortIdx) {
    add_binary_gate(design, parent, name, width1, width2, signed, |a, b| a ^ b)
}

/// Unary bitwise complement. Implemented as `(2^width - 1) - x` rather than
/// reaching for a `!` on the bigint, since `BigUint` has no fixed width to
/// complement against.
pub fn add_not(design: &mut Design, parent: ComponentIdx, name: &str, width: u32) -> (ComponentIdx, PortIdx, PortIdx) {
    let comp = design.add_component(parent, name);
    let op1 = design.add_input_port(comp, "op1", width);
    let out = design.add_output_port(comp, "out", width);
    design.drive(out, move |d| {
        let mask = (BigUint::from(1u8) << width) - BigUint::from(1u8);
        let value = &mask ^ unsigned_of(d, op1);
        BitVecValue::from_big_uint(&value, width)
    });
    (comp, op1, out)
}

/// Two's-complement negation. Grows by one bit so negating the most
/// negative `width`-bit value is representable (this resolves the
/// source's `DYNP_OUT_INIT(in, w+1)` naming oddity as "out has width w+1").
pub fn add_neg(design: &mut Design, parent: ComponentIdx, name: &str, width: u32) -> (ComponentIdx, PortIdx, PortIdx) {
    let comp = design.add_component(parent, name);
    let op1 = design.add_input_port(comp, "op1", width);
    let out_width = width + 1;
    let out = design.add_output_port(comp, "out", out_width);
    design.drive(out, move |d| {
        let value = -signed_of(d, op1);
        BitVecValue::from_big_int(&value, out_width)
    });
    (comp, op1, out)
}

/// Adder. Both operands and the result are `width` bits wide; `op1 + op2` is
/// computed signed and truncated back to `width` (wraparound on overflow,
/// same as the source's fixed-width adder).
pub fn add_adder(
    design: &mut Design,
    parent: ComponentIdx,
    name: &str,
    width: u32,
) -> (ComponentIdx, PortIdx, PortIdx, PortIdx) {
    let comp = design.add_component(parent, name);
    let op1 = design.add_input_port(comp, "op1", width);
    let op2 = design.add_input_port(comp, "op2", width);
    let out = design.add_output_port(comp, "out", width);
    design.drive(out, move |d| {
        let value = signed_of(d, op1) + signed_of(d, op2);
        BitVecValue::from_big_int(&value, width)
    });
    (comp, op1, op2, out)
}

/// Subtractor (`op1 - op2`), two's-complement. Output width is
/// `max(w1, w2) + 1` so the result never truncates. `signed` selects whether
/// each operand's raw bits are read as a two's-complement or a plain
/// unsigned integer before the subtraction.
pub fn add_sub(
    design: &mut Design,
    parent: ComponentIdx,
    name: &str,
    width1: u32,
    width2: u32,
    signed: bool,
) -> (ComponentIdx, PortIdx, PortIdx, PortIdx) {
    let comp = design.add_component(parent, name);
    let op1 = design.add_input_port(comp, "op1", width1);
    let op2 = design.add_input_port(comp, "op2", width2);
    let out_width = width1.max(width2) + 1;
    let out = design.add_output_port(comp, "out", out_width);
    design.drive(out, move |d| {
        let value = operand_value(d, op1, signed) - operand_value(d, op2, signed);
        BitVecValue::from_big_int(&value, out_width)
    });
    (comp, op1, op2, out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adder_wraps_on_overflow() {
        let mut design = Design::new("test");
        let root = design.root();
        let (_, op1, op2, out) = add_adder(&mut design, root, "add", 4);
        design.connect_literal(op1, 15).unwrap();
        design.connect_literal(op2, 1).unwrap();
        design.verify_and_initialize().unwrap();
        assert_eq!(design.unsigned(out), 0);
    }

    #[test]
    fn and_or_xor_match_truth_table() {
        let mut design = Design::new("test");
        let root = design.root();
        let (_, a_op1, a_op2, a_out) = add_and(&mut design, root, "and", 4, 4, false);
        let (_, o_op1, o_op2, o_out) = add_or(&mut design, root, "or", 4, 4, false);
        let (_, x_op1, x_op2, x_out) = add_xor(&mut design, root, "xor", 4, 4, false);
        design.connect_literal(a_op1, 0b1100).unwrap();
        design.connect_literal(a_op2, 0b1010).unwrap();
        design.connect_literal(o_op1, 0b1100).unwrap();
        design.connect_literal(o_op2, 0b1010).unwrap();
        design.connect_literal(x_op1, 0b1100).unwrap();
        design.connect_literal(x_op2, 0b1010).unwrap();
        design.verify_and_initialize().unwrap();
        assert_eq!(design.unsigned(a_out), 0b1000);
        assert_eq!(design.unsigned(o_out), 0b1110);
        assert_eq!(design.unsigned(x_out), 0b0110);
    }

    #[test]
    fn not_complements_within_width() {
        let mut design = Design::new("test");
        let root = design.root();
        let (_, op1, out) = add_not(&mut design, root, "not", 4);
        design.connect_literal(op1, 0b0110).unwrap();
        design.verify_and_initialize().unwrap();
        assert_eq!(design.unsigned(out), 0b1001);
    }

    #[test]
    fn neg_widens_by_one_bit_and_negates() {
        let mut design = Design::new("test");
        let root = design.root();
        let (_, op1, out) = add_neg(&mut design, root, "neg", 4);
        // most negative 4-bit value: -8, representable only with the extra bit
        design.connect_literal(op1, 0b1000).unwrap();
        design.verify_and_initialize().unwrap();
        assert_eq!(design.port_width(out), 5);
        assert_eq!(design.signed(out), 8);
    }

    #[test]
    fn adder_computes_sum() {
        let mut design = Design::new("test");
        let root = design.root();
        let (_, op1, op2, out) = add_adder(&mut design, root, "add", 8);
        design.connect_literal(op1, 40).unwrap();
        design.connect_literal(op2, 2).unwrap();
        design.verify_and_initialize().unwrap();
        assert_eq!(design.unsigned(out), 42);
    }

    #[test]
    fn sub_widens_and_allows_negative_result() {
        let mut design = Design::new("test");
        let root = design.root();
        let (_, op1, op2, out) = add_sub(&mut design, root, "sub", 4, 4, true);
        design.connect_literal(op1, 2).unwrap();
        design.connect_literal(op2, 5).unwrap();
        design.verify_and_initialize().unwrap();
        assert_eq!(design.port_width(out), 5);
        assert_eq!(design.signed(out), -3);
    }

    #[test]
    fn and_signed_vs_unsigned_extension_differ_on_mismatched_widths() {
        // 1-bit operand 0b1 against a 2-bit 0b10: signed sign-extends the
        // 1-bit operand to 0b11 before ANDing, unsigned zero-extends it to
        // 0b01 — the two must disagree here.
        let mut design = Design::new("test");
        let root = design.root();
        let (_, s_op1, s_op2, s_out) = add_and(&mut design, root, "and_s", 1, 2, true);
        let (_, u_op1, u_op2, u_out) = add_and(&mut design, root, "and_u", 1, 2, false);
        design.connect_literal(s_op1, 0b1).unwrap();
        design.connect_literal(s_op2, 0b10).unwrap();
        design.connect_literal(u_op1, 0b1).unwrap();
        design.connect_literal(u_op2, 0b10).unwrap();
        design.verify_and_initialize().unwrap();
        assert_eq!(design.unsigned(s_out), 0b10);
        assert_eq!(design.unsigned(u_out), 0b00);
    }

    proptest::proptest! {
        #[test]
        fn adder_matches_wrapping_sum(a in 0u64..256, b in 0u64..256) {
            let mut design = Design::new("test");
            let root = design.root();
            let (_, op1, op2, out) = add_adder(&mut design, root, "add", 8);
            design.connect_literal(op1, a).unwrap();
            design.connect_literal(op2, b).unwrap();
            design.verify_and_initialize().unwrap();
            prop_assert_eq!(design.unsigned(out), (a + b) % 256);
        }

        #[test]
        fn and_matches_bitwise_and(a in 0u64..256, b in 0u64..256) {
            let mut design = Design::new("test");
            let root = design.root();
            let (_, op1, op2, out) = add_and(&mut design, root, "and", 8, 8, false);
            design.connect_literal(op1, a).unwrap();
            design.connect_literal(op2, b).unwrap();
            design.verify_and_initialize().unwrap();
            prop_assert_eq!(design.unsigned(out), a & b);
        }
    }
}
