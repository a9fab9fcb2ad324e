//! Shift primitives: the fixed-amount `Shl`/`Shr` pair and the
//! dynamic `Dshl`/`Dshr` pair whose shift amount comes from a second port.

use baa::BitVecValue;

use crate::core::design::Design;
use crate::core::ids::{ComponentIdx, PortIdx};

/// Static left shift by a compile-time-fixed amount `n`. Grows the width to
/// `width + n` so no bits are lost off the top.
pub fn add_shl(
    design: &mut Design,
    parent: ComponentIdx,
    name: &str,
    width: u32,
    n: u32,
) -> (ComponentIdx, PortIdx, PortIdx) {
    let comp = design.add_component(parent, name);
    let op1 = design.add_input_port(comp, "op1", width);
    let out_width = width + n;
    let out = design.add_output_port(comp, "out", out_width);
    design.drive(out, move |d| {
        let value = d.raw_value(op1).to_big_uint() << n;
        BitVecValue::from_big_uint(&value, out_width)
    });
    (comp, op1, out)
}

/// Static right shift by a compile-time-fixed amount `n`. Shrinks the width
/// to `max(width - n, 1)`. `signed` selects arithmetic (sign-filling) versus
/// logical (zero-filling) shift.
pub fn add_shr(
    design: &mut Design,
    parent: ComponentIdx,
    name: &str,
    width: u32,
    n: u32,
    signed: bool,
) -> (ComponentIdx, PortIdx, PortIdx) {
    let comp = design.add_component(parent, name);
    let op1 = design.add_input_port(comp, "op1", width);
    let out_width = width.saturating_sub(n).max(1);
    let out = design.add_output_port(comp, "out", out_width);
    design.drive(out, move |d| {
        if signed {
            let value = d.raw_value(op1).to_big_int() >> n;
            BitVecValue::from_big_int(&value, out_width)
        } else {
            let value = d.raw_value(op1).to_big_uint() >> n;
            BitVecValue::from_big_uint(&value, out_width)
        }
    });
    (comp, op1, out)
}

/// Dynamic left shift: `op1 << op2`. The shift amount can be as large as
/// `2^w2 - 1`, so the output is widened to `w1 + 2^w2 - 1` to never lose
/// bits, per the primitive table. Keep `w2` small in practice (this grows
/// exponentially in `w2`).
pub fn add_dshl(
    design: &mut Design,
    parent: ComponentIdx,
    name: &str,
    width1: u32,
    width2: u32,
) -> (ComponentIdx, PortIdx, PortIdx, PortIdx) {
    let comp = design.add_component(parent, name);
    let op1 = design.add_input_port(comp, "op1", width1);
    let op2 = design.add_input_port(comp, "op2", width2);
    let max_shift = (1u64 << width2) - 1;
    let out_width = width1 + u32::try_from(max_shift).expect("width2 too large for a dynamic shift");
    let out = design.add_output_port(comp, "out", out_width);
    design.drive(out, move |d| {
        let amount = d.unsigned(op2);
        let value = d.raw_value(op1).to_big_uint() << amount;
        BitVecValue::from_big_uint(&value, out_width)
    });
    (comp, op1, op2, out)
}

/// Dynamic right shift: `op1 >> op2`, width unchanged at `w1`. `signed`
/// selects arithmetic (sign-filling) versus logical (zero-filling) shift.
///
/// `original_source/core/ops/op_dshr.h` shifts `op2` by `op2` in its
/// unsigned branch instead of `op1` by `op2` (its signed branch gets this
/// right); both branches here do the evidently intended `op1 >> op2`.
pub fn add_dshr(
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
    let out = design.add_output_port(comp, "out", width1);
    design.drive(out, move |d| {
        let amount = d.unsigned(op2);
        if signed {
            let amount = amount.min(width1.saturating_sub(1) as u64);
            let value = d.raw_value(op1).to_big_int() >> amount;
            BitVecValue::from_big_int(&value, width1)
        } else {
            if amount >= width1 as u64 {
                return BitVecValue::zero(width1);
            }
            let value = d.raw_value(op1).to_big_uint() >> amount;
            BitVecValue::from_big_uint(&value, width1)
        }
    });
    (comp, op1, op2, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::design::Design;

    #[test]
    fn shl_grows_width_and_shifts() {
        let mut design = Design::new("test");
        let root = design.root();
        let (_, op1, out) = add_shl(&mut design, root, "shl", 4, 3);
        design.connect_literal(op1, 0b0101).unwrap();
        design.verify_and_initialize().unwrap();
        assert_eq!(design.port_width(out), 7);
        assert_eq!(design.unsigned(out), 0b0101 << 3);
    }

    #[test]
    fn shr_logical_zero_fills() {
        let mut design = Design::new("test");
        let root = design.root();
        let (_, op1, out) = add_shr(&mut design, root, "shr", 8, 2, false);
        design.connect_literal(op1, 0b1000_0000).unwrap();
        design.verify_and_initialize().unwrap();
        assert_eq!(design.unsigned(out), 0b0010_0000);
    }

    #[test]
    fn shr_arithmetic_sign_fills() {
        let mut design = Design::new("test");
        let root = design.root();
        let (_, op1, out) = add_shr(&mut design, root, "shr", 8, 2, true);
        // -128 as an 8-bit pattern
        design.connect_literal(op1, 0b1000_0000).unwrap();
        design.verify_and_initialize().unwrap();
        assert_eq!(design.signed(out), -32);
    }

    #[test]
    fn dshl_shifts_by_dynamic_amount() {
        let mut design = Design::new("test");
        let root = design.root();
        let (_, op1, op2, out) = add_dshl(&mut design, root, "dshl", 4, 2);
        design.connect_literal(op1, 0b0001).unwrap();
        design.connect_literal(op2, 3).unwrap();
        design.verify_and_initialize().unwrap();
        assert_eq!(design.unsigned(out), 0b1000);
    }

    #[test]
    fn dshr_unsigned_saturates_past_width() {
        let mut design = Design::new("test");
        let root = design.root();
        let (_, op1, op2, out) = add_dshr(&mut design, root, "dshr", 4, 4, false);
        design.connect_literal(op1, 0b1111).unwrap();
        design.connect_literal(op2, 9).unwrap();
        design.verify_and_initialize().unwrap();
        assert_eq!(design.unsigned(out), 0);
    }

    #[test]
    fn dshr_signed_shifts_op1_by_op2() {
        let mut design = Design::new("test");
        let root = design.root();
        let (_, op1, op2, out) = add_dshr(&mut design, root, "dshr", 8, 4, true);
        design.connect_literal(op1, 0b1000_0000).unwrap();
        design.connect_literal(op2, 2).unwrap();
        design.verify_and_initialize().unwrap();
        assert_eq!(design.signed(out), -32);
    }
}
