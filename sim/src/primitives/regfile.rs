//! Register file: `num_regs` registers behind one write port
//! and several read ports, whose read indices are decoded directly from
//! bit-fields of an `instruction` word rather than taken as separate address
//! ports, with optional same-cycle write-before-read forwarding.
//!
//! `field_widths` is the full LSB→MSB decomposition of `instruction` (see
//! `original_source/core/RISC-V/riscv_registerfile.h`'s
//! `generateBitFieldDecoder`, e.g. RISC-V's `{opcode:7, rd:5, funct3:3,
//! rs1:5, rs2:5, funct7:7}`), and `read_field_indices` picks, per read port,
//! which of those fields holds that port's register number — `rs1` is field
//! index 3 there, `rs2` is field index 4.
//!
//! Built entirely out of [`crate::core::design::Design::add_register`] plus
//! ordinary derived ports rather than a new [`crate::core::component::ComponentKind`]
//! variant: each register's `in` port is wired to a small "next value" port
//! computing the usual load-or-hold logic, and each read port is a derived
//! output that slices its field out of `instruction` and, if
//! `write_before_read` is set, bypasses to `write_data` when that field
//! matches an in-flight write. Because register outputs are published
//! unconditionally in step 2 of [`Design::settle`](crate::core::design::Design::settle),
//! these derived ports can read them without any special scheduling.
//!
//! The original commits a write the moment an operand's propagation
//! function runs, by mutating its register array directly as a side effect
//! mid-settle — which sidesteps `Register`'s reverse stack entirely, so a
//! register file's contents can't be undone by `reverse()`. This
//! implementation instead models every internal register as a real
//! [`crate::core::component::ComponentKind::Register`], so `reverse()`
//! restores register-file contents exactly like any other register (see
//! DESIGN.md); the externally visible write-before-read read behavior is
//! unchanged.

use crate::core::design::Design;
use crate::core::ids::{ComponentIdx, PortIdx};

pub struct RegisterFile {
    pub component: ComponentIdx,
    pub instruction: PortIdx,
    pub write_reg: PortIdx,
    pub write_enable: PortIdx,
    pub write_data: PortIdx,
    pub registers: Vec<ComponentIdx>,
    /// One decoded read-index field (sliced from `instruction`) per read port.
    pub read_index_fields: Vec<PortIdx>,
    pub read_data: Vec<PortIdx>,
}

/// `field_widths` is the complete LSB→MSB bit-field decomposition of
/// `instruction`; `read_field_indices` has one entry per read port, naming
/// which field (an index into `field_widths`) that port reads its register
/// number from.
pub fn add_register_file(
    design: &mut Design,
    parent: ComponentIdx,
    name: &str,
    data_width: u32,
    write_reg_width: u32,
    num_regs: usize,
    field_widths: &[u32],
    read_field_indices: &[usize],
    write_before_read: bool,
) -> RegisterFile {
    assert!(num_regs > 0, "register file needs at least one register");
    assert!(!read_field_indices.is_empty(), "register file needs at least one read port");

    let instruction_width: u32 = field_widths.iter().sum();
    let field_offsets: Vec<u32> = field_widths
        .iter()
        .scan(0u32, |lsb, &w| {
            let this_lsb = *lsb;
            *lsb += w;
            Some(this_lsb)
        })
        .collect();

    let comp = design.add_component(parent, name);
    let instruction = design.add_input_port(comp, "instruction", instruction_width);
    let write_reg = design.add_input_port(comp, "write_reg", write_reg_width);
    let write_enable = design.add_input_port(comp, "write_enable", 1);
    let write_data = design.add_input_port(comp, "write_data", data_width);

    let registers: Vec<ComponentIdx> = (0..num_regs)
        .map(|i| design.add_register(comp, format!("r{i}"), data_width, 0))
        .collect();
    let register_outputs: Vec<PortIdx> = registers
        .iter()
        .map(|&r| design.register_ports(r).1)
        .collect();

    for (i, &reg) in registers.iter().enumerate() {
        let (reg_input, _) = design.register_ports(reg);
        let next = design.add_output_port(comp, format!("next{i}"), data_width);
        let hold = register_outputs[i];
        design.drive(next, move |d| {
            if d.unsigned(write_enable) != 0 && d.unsigned(write_reg) as usize == i {
                d.raw_value(write_data).clone()
            } else {
                d.raw_value(hold).clone()
            }
        });
        design
            .connect(next, reg_input)
            .expect("freshly created ports cannot already be connected or width-mismatched");
    }

    let mut read_index_fields = Vec::with_capacity(read_field_indices.len());
    let mut read_data = Vec::with_capacity(read_field_indices.len());
    for (r, &field_idx) in read_field_indices.iter().enumerate() {
        let field_width = field_widths[field_idx];
        let lsb = field_offsets[field_idx];
        let hi = lsb + field_width - 1;
        let field = design.add_output_port(comp, format!("read_index{r}"), field_width);
        design.drive(field, move |d| d.raw_value(instruction).slice(hi, lsb));

        let data = design.add_output_port(comp, format!("read_data{r}"), data_width);
        let outputs = register_outputs.clone();
        design.drive(data, move |d| {
            let idx = (d.unsigned(field) as usize) % num_regs;
            if write_before_read && d.unsigned(write_enable) != 0 && d.unsigned(write_reg) as usize == idx {
                d.raw_value(write_data).clone()
            } else {
                d.raw_value(outputs[idx]).clone()
            }
        });

        read_index_fields.push(field);
        read_data.push(data);
    }

    RegisterFile {
        component: comp,
        instruction,
        write_reg,
        write_enable,
        write_data,
        registers,
        read_index_fields,
        read_data,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::design::Design;

    // RISC-V-style field layout: {opcode:7, rd:5, funct3:3, rs1:5, rs2:5, funct7:7},
    // rs1 at field index 3, rs2 at field index 4.
    const FIELD_WIDTHS: [u32; 6] = [7, 5, 3, 5, 5, 7];
    const READ_FIELDS: [usize; 2] = [3, 4];

    fn instruction_word(rs1: u32, rs2: u32) -> u64 {
        // lsb-first: opcode(7) rd(5) funct3(3) rs1(5) rs2(5) funct7(7)
        let mut value: u64 = 0;
        let mut shift = 0u32;
        for (field_idx, &w) in FIELD_WIDTHS.iter().enumerate() {
            let field_value = match field_idx {
                3 => rs1 as u64,
                4 => rs2 as u64,
                _ => 0,
            };
            value |= field_value << shift;
            shift += w;
        }
        value
    }

    #[test]
    fn write_before_read_forwards_same_cycle_write() {
        let mut design = Design::new("test");
        let root = design.root();
        let rf = add_register_file(&mut design, root, "rf", 32, 5, 32, &FIELD_WIDTHS, &READ_FIELDS, true);
        design.connect_literal(rf.instruction, instruction_word(5, 6)).unwrap();
        design.connect_literal(rf.write_reg, 5).unwrap();
        design.connect_literal(rf.write_enable, 1).unwrap();
        design.connect_literal(rf.write_data, 0xDEAD).unwrap();
        design.verify_and_initialize().unwrap();

        assert_eq!(design.unsigned(rf.read_data[0]), 0xDEAD);
        assert_eq!(design.unsigned(rf.read_data[1]), 0);
    }

    #[test]
    fn without_write_before_read_same_cycle_write_not_visible() {
        let mut design = Design::new("test");
        let root = design.root();
        let rf = add_register_file(&mut design, root, "rf", 32, 5, 32, &FIELD_WIDTHS, &READ_FIELDS, false);
        design.connect_literal(rf.instruction, instruction_word(5, 6)).unwrap();
        design.connect_literal(rf.write_reg, 5).unwrap();
        design.connect_literal(rf.write_enable, 1).unwrap();
        design.connect_literal(rf.write_data, 0xDEAD).unwrap();
        design.verify_and_initialize().unwrap();

        assert_eq!(design.unsigned(rf.read_data[0]), 0);
    }

    #[test]
    fn write_commits_on_clock_and_is_undone_by_reverse() {
        let mut design = Design::new("test");
        let root = design.root();
        let rf = add_register_file(&mut design, root, "rf", 32, 5, 32, &FIELD_WIDTHS, &READ_FIELDS, false);
        design.connect_literal(rf.instruction, instruction_word(5, 6)).unwrap();
        design.connect_literal(rf.write_reg, 5).unwrap();
        design.connect_literal(rf.write_enable, 1).unwrap();
        design.connect_literal(rf.write_data, 0xBEEF).unwrap();
        design.verify_and_initialize().unwrap();
        assert_eq!(design.unsigned(rf.read_data[0]), 0);

        design.clock().unwrap();
        assert_eq!(design.unsigned(rf.read_data[0]), 0xBEEF);

        design.reverse().unwrap();
        assert_eq!(design.unsigned(rf.read_data[0]), 0);
    }
}
