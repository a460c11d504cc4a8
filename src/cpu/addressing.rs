/*!
Addressing-mode resolver: computes an instruction's effective operand
address from the register file, the addressing mode, and the instruction
stream.

Rules reproduced from the hardware:
- Zero-page indexing wraps within $00-$FF; the carry never escapes into
  page 1.
- `(zp,X)` and `(zp),Y` read their 16-bit pointer from the zero page with
  that same wraparound rule, not plain 16-bit semantics.
- Indirect JMP fetches its high pointer byte from the start of the same
  page when the low byte is $FF (a real, frequently relied-upon bug).
- Implied and accumulator modes still perform a bus read of the byte at
  PC, discarded; side-effecting peripherals can observe it.

The resolver only reports whether a page was crossed; whether that costs
a cycle is the opcode descriptor's call (`page_cross`), applied by the
stepper. For relative mode the crossing is measured against the address
of the instruction following the branch, which is what the branch
penalty is defined in terms of.
*/

use crate::cpu::opcode::AddrMode;
use crate::cpu::regs::Registers;
use crate::memory::Memory;

/// A resolved operand location.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Operand {
    /// Effective address. Meaningless for implied/accumulator modes; for
    /// immediate mode it points at the operand byte inside the
    /// instruction stream; for relative mode it is the branch target.
    pub addr: u16,
    /// True if computing `addr` carried across a 256-byte page.
    pub crossed: bool,
}

#[inline]
fn same_page(a: u16, b: u16) -> bool {
    (a & 0xFF00) == (b & 0xFF00)
}

#[inline]
fn fixed(addr: u16) -> Operand {
    Operand { addr, crossed: false }
}

/// Resolve the operand for `mode`, consuming operand bytes from the
/// instruction stream (PC advances past them).
pub(crate) fn resolve(mode: AddrMode, reg: &mut Registers, mem: &mut dyn Memory) -> Operand {
    match mode {
        AddrMode::Implied | AddrMode::Accumulator => {
            // Dummy read of the next instruction byte, PC not consumed.
            let _ = mem.read(reg.pc);
            fixed(0)
        }
        AddrMode::Immediate => {
            let addr = reg.pc;
            reg.pc = reg.pc.wrapping_add(1);
            fixed(addr)
        }
        AddrMode::ZeroPage => fixed(reg.fetch(mem) as u16),
        AddrMode::ZeroPageX => {
            let zp = reg.fetch(mem).wrapping_add(reg.x);
            fixed(zp as u16)
        }
        AddrMode::ZeroPageY => {
            let zp = reg.fetch(mem).wrapping_add(reg.y);
            fixed(zp as u16)
        }
        AddrMode::Relative => {
            let offset = reg.fetch(mem) as i8;
            let target = reg.pc.wrapping_add_signed(offset as i16);
            Operand { addr: target, crossed: !same_page(target, reg.pc) }
        }
        AddrMode::Absolute => fixed(reg.fetch16(mem)),
        AddrMode::AbsoluteX => {
            let base = reg.fetch16(mem);
            let addr = base.wrapping_add(reg.x as u16);
            Operand { addr, crossed: !same_page(base, addr) }
        }
        AddrMode::AbsoluteY => {
            let base = reg.fetch16(mem);
            let addr = base.wrapping_add(reg.y as u16);
            Operand { addr, crossed: !same_page(base, addr) }
        }
        AddrMode::Indirect => {
            // Only JMP uses this; the pointer's high byte never crosses
            // out of the pointer's page.
            let ptr = reg.fetch16(mem);
            fixed(mem.read16_pagewrap(ptr))
        }
        AddrMode::XIndirect => {
            let zp = reg.fetch(mem).wrapping_add(reg.x);
            fixed(mem.read16_pagewrap(zp as u16))
        }
        AddrMode::IndirectY => {
            let zp = reg.fetch(mem);
            let base = mem.read16_pagewrap(zp as u16);
            let addr = base.wrapping_add(reg.y as u16);
            Operand { addr, crossed: !same_page(base, addr) }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{BusOp, FlatMemory, RecordingMemory};

    fn setup(program: &[u8]) -> (Registers, FlatMemory) {
        let mut reg = Registers::power_up();
        let mut mem = FlatMemory::new();
        mem.load(0x8000, program);
        reg.pc = 0x8000;
        (reg, mem)
    }

    #[test]
    fn zero_page_x_wraps_within_page_zero() {
        let (mut reg, mut mem) = setup(&[0xF5]);
        reg.x = 0x10;
        let opr = resolve(AddrMode::ZeroPageX, &mut reg, &mut mem);
        // 0xF5 + 0x10 = 0x105 wraps to 0x05, never touching page 1.
        assert_eq!(opr.addr, 0x0005);
        assert!(!opr.crossed);
    }

    #[test]
    fn zero_page_y_wraps_within_page_zero() {
        let (mut reg, mut mem) = setup(&[0xFF]);
        reg.y = 0x01;
        let opr = resolve(AddrMode::ZeroPageY, &mut reg, &mut mem);
        assert_eq!(opr.addr, 0x0000);
    }

    #[test]
    fn absolute_x_reports_page_cross() {
        let (mut reg, mut mem) = setup(&[0xF5, 0x80]);
        reg.x = 0x10;
        let opr = resolve(AddrMode::AbsoluteX, &mut reg, &mut mem);
        assert_eq!(opr.addr, 0x8105);
        assert!(opr.crossed);
    }

    #[test]
    fn absolute_y_same_page_no_cross() {
        let (mut reg, mut mem) = setup(&[0x10, 0x80]);
        reg.y = 0x20;
        let opr = resolve(AddrMode::AbsoluteY, &mut reg, &mut mem);
        assert_eq!(opr.addr, 0x8030);
        assert!(!opr.crossed);
    }

    #[test]
    fn indirect_jmp_pointer_wraps_in_page() {
        let (mut reg, mut mem) = setup(&[0xFF, 0x10]);
        mem.write(0x10FF, 0x34);
        mem.write(0x1000, 0x12);
        mem.write(0x1100, 0xEE); // the "correct" byte the bug skips
        let opr = resolve(AddrMode::Indirect, &mut reg, &mut mem);
        assert_eq!(opr.addr, 0x1234);
    }

    #[test]
    fn x_indirect_pointer_read_wraps_in_zero_page() {
        let (mut reg, mut mem) = setup(&[0xFE]);
        reg.x = 0x01; // pointer at 0xFF, high byte from 0x00
        mem.write(0x00FF, 0xCD);
        mem.write(0x0000, 0xAB);
        mem.write(0x0100, 0xEE);
        let opr = resolve(AddrMode::XIndirect, &mut reg, &mut mem);
        assert_eq!(opr.addr, 0xABCD);
    }

    #[test]
    fn indirect_y_adds_after_pointer_fetch() {
        let (mut reg, mut mem) = setup(&[0x40]);
        reg.y = 0x05;
        mem.write(0x0040, 0xFE);
        mem.write(0x0041, 0x20);
        let opr = resolve(AddrMode::IndirectY, &mut reg, &mut mem);
        assert_eq!(opr.addr, 0x2103);
        assert!(opr.crossed);
    }

    #[test]
    fn relative_resolves_against_following_instruction() {
        let (mut reg, mut mem) = setup(&[0x10]); // +16
        let opr = resolve(AddrMode::Relative, &mut reg, &mut mem);
        assert_eq!(opr.addr, 0x8011);
        assert!(!opr.crossed);

        // Backward branch off the start of the page crosses.
        let (mut reg, mut mem) = setup(&[0x80]); // -128
        let opr = resolve(AddrMode::Relative, &mut reg, &mut mem);
        assert_eq!(opr.addr, 0x7F81);
        assert!(opr.crossed);
    }

    #[test]
    fn implied_mode_performs_dummy_read() {
        let mut reg = Registers::power_up();
        reg.pc = 0x8000;
        let mut mem = RecordingMemory::new();
        let pc_before = reg.pc;
        let _ = resolve(AddrMode::Implied, &mut reg, &mut mem);
        assert_eq!(reg.pc, pc_before);
        assert_eq!(mem.ops(), &[BusOp::Read(0x8000)]);
    }

    #[test]
    fn immediate_consumes_operand_byte() {
        let (mut reg, mut mem) = setup(&[0x42]);
        let opr = resolve(AddrMode::Immediate, &mut reg, &mut mem);
        assert_eq!(opr.addr, 0x8000);
        assert_eq!(reg.pc, 0x8001);
        assert_eq!(mem.peek(opr.addr), 0x42);
    }
}
