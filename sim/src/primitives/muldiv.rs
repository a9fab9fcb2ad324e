//! Multiply/divide/remainder primitives.
//!
//! Division and remainder follow RISC-V's `div`/`divu`/`rem`/`remu`
//! convention rather than failing: a [`PropagationFn`](crate::core::port::PropagationFn)
//! returns a plain `BitVecValue`, so there is no channel to report a division
//! fault through, and defining zero-divisor behavior the way real hardware
//! does keeps the primitive total — one of the two options left to
//! the implementer ("surfaced as a per-port undefined value OR propagation
//! fault"). See `sim/src/errors.rs`.
//!
//! The primitive table gives widths for `Div`/`Mod` but the
//! overview's "Div/Mod/Mul" only gets a width for the first two; `Mul`'s
//! output is sized `w1 + w2` here (full precision, never truncates), noted
//! in DESIGN.md.

use baa::BitVecValue;
use num_bigint::{BigInt, BigUint};

use crate::core::design::Design;
use crate::core::ids::{ComponentIdx, PortIdx};

/// Unsigned multiply. Output width is `w1 + w2`, wide enough that the result
/// never truncates.
pub fn add_mul(
    design: &mut Design,
    parent: ComponentIdx,
    name: &str,
    width1: u32,
    width2: u32,
) -> (ComponentIdx, PortIdx, PortIdx, PortIdx) {
    let comp = design.add_component(parent, name);
    let op1 = design.add_input_port(comp, "op1", width1);
    let op2 = design.add_input_port(comp, "op2", width2);
    let out_width = width1 + width2;
    let out = design.add_output_port(comp, "out", out_width);
    design.drive(out, move |d| {
        let value = d.raw_value(op1).to_big_uint() * d.raw_value(op2).to_big_uint();
        BitVecValue::from_big_uint(&value, out_width)
    });
    (comp, op1, op2, out)
}

/// Unsigned division (`divu`). Output width is `Wn`. Division by zero yields
/// all-ones.
pub fn add_divu(
    design: &mut Design,
    parent: ComponentIdx,
    name: &str,
    num_width: u32,
    den_width: u32,
) -> (ComponentIdx, PortIdx, PortIdx, PortIdx) {
    let comp = design.add_component(parent, name);
    let num = design.add_input_port(comp, "num", num_width);
    let den = design.add_input_port(comp, "den", den_width);
    let out = design.add_output_port(comp, "out", num_width);
    design.drive(out, move |d| {
        let divisor = d.raw_value(den).to_big_uint();
        let value = if divisor == BigUint::from(0u8) {
            (BigUint::from(1u8) << num_width) - BigUint::from(1u8)
        } else {
            d.raw_value(num).to_big_uint() / divisor
        };
        BitVecValue::from_big_uint(&value, num_width)
    });
    (comp, num, den, out)
}

/// Unsigned remainder (`remu`). Output width is `min(Wn, Wd)`. Remainder by
/// zero yields the dividend (truncated to the output width).
pub fn add_remu(
    design: &mut Design,
    parent: ComponentIdx,
    name: &str,
    num_width: u32,
    den_width: u32,
) -> (ComponentIdx, PortIdx, PortIdx, PortIdx) {
    let comp = design.add_component(parent, name);
    let num = design.add_input_port(comp, "num", num_width);
    let den = design.add_input_port(comp, "den", den_width);
    let out_width = num_width.min(den_width);
    let out = design.add_output_port(comp, "out", out_width);
    design.drive(out, move |d| {
        let dividend = d.raw_value(num).to_big_uint();
        let divisor = d.raw_value(den).to_big_uint();
        let value = if divisor == BigUint::from(0u8) {
            dividend
        } else {
            dividend % divisor
        };
        BitVecValue::from_big_uint(&value, out_width)
    });
    (comp, num, den, out)
}

/// Signed division (`div`). Output width is `Wn + 1`. Division by zero
/// yields -1; the `MIN / -1` overflow case wraps back to `MIN`, matching
/// RISC-V.
pub fn add_div(
    design: &mut Design,
    parent: ComponentIdx,
    name: &str,
    num_width: u32,
    den_width: u32,
) -> (ComponentIdx, PortIdx, PortIdx, PortIdx) {
    let comp = design.add_component(parent, name);
    let num = design.add_input_port(comp, "num", num_width);
    let den = design.add_input_port(comp, "den", den_width);
    let out_width = num_width + 1;
    let out = design.add_output_port(comp, "out", out_width);
    design.drive(out, move |d| {
        let dividend = d.raw_value(num).to_big_int();
        let divisor = d.raw_value(den).to_big_int();
        let value = if divisor == BigInt::from(0) {
            BigInt::from(-1)
        } else {
            dividend / divisor
        };
        BitVecValue::from_big_int(&value, out_width)
    });
    (comp, num, den, out)
}

/// Signed remainder (`rem`). Output width is `min(Wn, Wd)`. Remainder by
/// zero yields the dividend.
pub fn add_rem(
    design: &mut Design,
    parent: ComponentIdx,
    name: &str,
    num_width: u32,
    den_width: u32,
) -> (ComponentIdx, PortIdx, PortIdx, PortIdx) {
    let comp = design.add_component(parent, name);
    let num = design.add_input_port(comp, "num", num_width);
    let den = design.add_input_port(comp, "den", den_width);
    let out_width = num_width.min(den_width);
    let out = design.add_output_port(comp, "out", out_width);
    design.drive(out, move |d| {
        let dividend = d.raw_value(num).to_big_int();
        let divisor = d.raw_value(den).to_big_int();
        let value = if divisor == BigInt::from(0) {
            dividend
        } else {
            dividend % divisor
        };
        BitVecValue::from_big_int(&value, out_width)
    });
    (comp, num, den, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::design::Design;

    #[test]
    fn mul_never_truncates() {
        let mut design = Design::new("test");
        let root = design.root();
        let (_, op1, op2, out) = add_mul(&mut design, root, "mul", 4, 4);
        design.connect_literal(op1, 15).unwrap();
        design.connect_literal(op2, 15).unwrap();
        design.verify_and_initialize().unwrap();
        assert_eq!(design.port_width(out), 8);
        assert_eq!(design.unsigned(out), 225);
    }

    #[test]
    fn divu_by_zero_yields_all_ones() {
        let mut design = Design::new("test");
        let root = design.root();
        let (_, num, den, out) = add_divu(&mut design, root, "divu", 8, 8);
        design.connect_literal(num, 7).unwrap();
        design.connect_literal(den, 0).unwrap();
        design.verify_and_initialize().unwrap();
        assert_eq!(design.unsigned(out), 0xFF);
    }

    #[test]
    fn remu_by_zero_yields_dividend() {
        let mut design = Design::new("test");
        let root = design.root();
        let (_, num, den, out) = add_remu(&mut design, root, "remu", 8, 8);
        design.connect_literal(num, 41).unwrap();
        design.connect_literal(den, 0).unwrap();
        design.verify_and_initialize().unwrap();
        assert_eq!(design.unsigned(out), 41);
    }

    #[test]
    fn div_by_zero_yields_minus_one() {
        let mut design = Design::new("test");
        let root = design.root();
        let (_, num, den, out) = add_div(&mut design, root, "div", 8, 8);
        design.connect_literal(num, 41).unwrap();
        design.connect_literal(den, 0).unwrap();
        design.verify_and_initialize().unwrap();
        assert_eq!(design.signed(out), -1);
    }

    #[test]
    fn rem_by_zero_yields_dividend() {
        let mut design = Design::new("test");
        let root = design.root();
        let (_, num, den, out) = add_rem(&mut design, root, "rem", 8, 8);
        design.connect_literal(num, 41).unwrap();
        design.connect_literal(den, 0).unwrap();
        design.verify_and_initialize().unwrap();
        assert_eq!(design.signed(out), 41);
    }

    #[test]
    fn div_computes_signed_quotient() {
        let mut design = Design::new("test");
        let root = design.root();
        let (_, num, den, out) = add_div(&mut design, root, "div", 8, 8);
        design.connect_literal(num, 0xF6).unwrap(); // -10 at width 8
        design.connect_literal(den, 3).unwrap();
        design.verify_and_initialize().unwrap();
        assert_eq!(design.signed(out), -3);
    }
}
