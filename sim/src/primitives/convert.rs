//! Width- and interpretation-changing primitives: `Pad`,
//! `Cvt`, and `BitExtr`.

use baa::BitVecValue;

use crate::core::design::Design;
use crate::core::ids::{ComponentIdx, PortIdx};

/// Extends `width` bits up to `max(width, target)`. `signed` selects
/// sign-extension versus zero-extension; a `target <= width` makes this the
/// identity (Pad never narrows).
pub fn add_pad(
    design: &mut Design,
    parent: ComponentIdx,
    name: &str,
    width: u32,
    target: u32,
    signed: bool,
) -> (ComponentIdx, PortIdx, PortIdx) {
    let comp = design.add_component(parent, name);
    let op1 = design.add_input_port(comp, "op1", width);
    let out_width = width.max(target);
    let out = design.add_output_port(comp, "out", out_width);
    design.drive(out, move |d| {
        if signed {
            BitVecValue::from_big_int(&d.raw_value(op1).to_big_int(), out_width)
        } else {
            BitVecValue::from_big_uint(&d.raw_value(op1).to_big_uint(), out_width)
        }
    });
    (comp, op1, out)
}

/// Reinterprets a `width`-bit unsigned value as signed by zero-extending one
/// guard bit, so the top bit of the original pattern can never be mistaken
/// for a sign bit.
pub fn add_cvt_unsigned_to_signed(
    design: &mut Design,
    parent: ComponentIdx,
    name: &str,
    width: u32,
) -> (ComponentIdx, PortIdx, PortIdx) {
    add_pad(design, parent, name, width, width + 1, false)
}

/// Reinterprets a `width`-bit signed value as signed at the same width — a
/// pass-through kept as its own component for parity with the source's
/// `Cvt`, which always materializes a node even when the bit pattern is
/// unchanged.
pub fn add_cvt_signed(
    design: &mut Design,
    parent: ComponentIdx,
    name: &str,
    width: u32,
) -> (ComponentIdx, PortIdx, PortIdx) {
    let comp = design.add_component(parent, name);
    let op1 = design.add_input_port(comp, "op1", width);
    let out = design.add_output_port(comp, "out", width);
    design.drive(out, move |d| d.raw_value(op1).clone());
    (comp, op1, out)
}

/// Extracts the inclusive bit range `[lo:hi]`, producing a `hi - lo + 1`-bit
/// result — the decoder-table workhorse (opcode/funct3/funct7 fields,
/// register-index fields, immediate fragments).
pub fn add_bit_extract(
    design: &mut Design,
    parent: ComponentIdx,
    name: &str,
    width: u32,
    lo: u32,
    hi: u32,
) -> (ComponentIdx, PortIdx, PortIdx) {
    assert!(hi < width && lo <= hi, "bit range out of bounds");
    let comp = design.add_component(parent, name);
    let op1 = design.add_input_port(comp, "op1", width);
    let out_width = hi - lo + 1;
    let out = design.add_output_port(comp, "out", out_width);
    design.drive(out, move |d| d.raw_value(op1).slice(hi, lo));
    (comp, op1, out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::design::Design;

    #[test]
    fn pad_zero_extends() {
        let mut design = Design::new("test");
        let root = design.root();
        let (_, op1, out) = add_pad(&mut design, root, "pad", 4, 8, false);
        design.connect_literal(op1, 0b1111).unwrap();
        design.verify_and_initialize().unwrap();
        assert_eq!(design.unsigned(out), 0b0000_1111);
    }

    #[test]
    fn pad_sign_extends() {
        let mut design = Design::new("test");
        let root = design.root();
        let (_, op1, out) = add_pad(&mut design, root, "pad", 4, 8, true);
        design.connect_literal(op1, 0b1111).unwrap(); // -1 at width 4
        design.verify_and_initialize().unwrap();
        assert_eq!(design.unsigned(out), 0xFF);
    }

    #[test]
    fn pad_is_identity_when_target_not_larger() {
        let mut design = Design::new("test");
        let root = design.root();
        let (_, op1, out) = add_pad(&mut design, root, "pad", 8, 4, false);
        design.connect_literal(op1, 0xAB).unwrap();
        design.verify_and_initialize().unwrap();
        assert_eq!(design.port_width(out), 8);
        assert_eq!(design.unsigned(out), 0xAB);
    }

    #[test]
    fn bit_extract_slices_inclusive_range() {
        let mut design = Design::new("test");
        let root = design.root();
        let (_, op1, out) = add_bit_extract(&mut design, root, "extr", 8, 2, 5);
        design.connect_literal(op1, 0b1011_0100).unwrap();
        design.verify_and_initialize().unwrap();
        assert_eq!(design.port_width(out), 4);
        assert_eq!(design.unsigned(out), 0b1101);
    }
}
