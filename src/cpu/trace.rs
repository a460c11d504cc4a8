/*!
Execution-log line formatter, byte-compatible with the well-known
`nestest.log` golden trace.

One line describes the instruction about to execute: PC, raw bytes,
mnemonic, a mode-specific operand description (with the effective address
and the value currently at it), and the register state before the
instruction runs. The whole formatter goes through [`Memory::peek`] only,
so tracing never perturbs read-sensitive hardware registers.

The trailing `CYC` column is a PPU X coordinate, not a cycle count: the
pixel clock runs at 3x the CPU clock and a scanline is 341 dots, hence
`(cycles - 7) * 3 % 341` (the -7 discounts the reset sequence, which the
golden log starts after).
*/

use std::fmt::Write as _;

use crate::cpu::opcode::{self, AddrMode, Instruction, Opcode};
use crate::cpu::regs::{BREAK, Registers};
use crate::memory::Memory;

/// Format one log line for the instruction at `reg.pc`.
pub fn line(reg: &Registers, mem: &dyn Memory, cycles: u64) -> String {
    let pc = reg.pc;
    let raw = mem.peek(pc);
    let desc = opcode::decode(raw);
    let arg8 = mem.peek(pc.wrapping_add(1));
    let arg8_2 = mem.peek(pc.wrapping_add(2));
    let arg16 = u16::from_le_bytes([arg8, arg8_2]);

    let mut out = String::with_capacity(96);
    let _ = write!(out, "{pc:04X}  {raw:02X} ");
    match desc.mode.operand_len() {
        2 => {
            let _ = write!(out, "{arg8:02X} {arg8_2:02X}");
        }
        1 => {
            let _ = write!(out, "{arg8:02X}   ");
        }
        _ => out.push_str("     "),
    }
    let _ = write!(out, "  {} ", desc.instr.mnemonic());

    let operand = describe(reg, mem, desc, pc, arg8, arg16);
    let _ = write!(out, "{operand:<28}");

    // P is printed with the break bit masked off; the golden log was
    // captured from pushed copies where B is clear.
    let _ = write!(
        out,
        "A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{:3}",
        reg.a,
        reg.x,
        reg.y,
        reg.p & !BREAK,
        reg.s,
        cycles.saturating_sub(7) * 3 % 341,
    );
    out
}

/// The operand column: syntax of the operand plus, for memory operands,
/// the resolved address chain and the byte currently there.
fn describe(
    reg: &Registers,
    mem: &dyn Memory,
    desc: &Opcode,
    pc: u16,
    arg8: u8,
    arg16: u16,
) -> String {
    use AddrMode::*;

    // JMP/JSR show a bare target; peeking "the value at" a jump target
    // would be nonsense.
    if matches!(desc.instr, Instruction::Jmp | Instruction::Jsr) && desc.mode == Absolute {
        return format!("${arg16:04X}");
    }

    match desc.mode {
        Implied => " ".to_string(),
        Accumulator => "A".to_string(),
        Immediate => format!("#${arg8:02X}"),
        ZeroPage => format!("${arg8:02X} = {:02X}", mem.peek(arg8 as u16)),
        ZeroPageX => {
            let eff = arg8.wrapping_add(reg.x);
            format!("${arg8:02X},X @ {eff:02X} = {:02X}", mem.peek(eff as u16))
        }
        ZeroPageY => {
            let eff = arg8.wrapping_add(reg.y);
            format!("${arg8:02X},Y @ {eff:02X} = {:02X}", mem.peek(eff as u16))
        }
        Absolute => format!("${arg16:04X} = {:02X}", mem.peek(arg16)),
        AbsoluteX => {
            let eff = arg16.wrapping_add(reg.x as u16);
            format!("${arg16:04X},X @ {eff:04X} = {:02X}", mem.peek(eff))
        }
        AbsoluteY => {
            let eff = arg16.wrapping_add(reg.y as u16);
            format!("${arg16:04X},Y @ {eff:04X} = {:02X}", mem.peek(eff))
        }
        Indirect => format!("(${arg16:04X}) = {:04X}", mem.peek16_pagewrap(arg16)),
        XIndirect => {
            let ptr = arg8.wrapping_add(reg.x);
            let base = mem.peek16_pagewrap(ptr as u16);
            format!(
                "(${arg8:02X},X) @ {ptr:02X} = {base:04X} = {:02X}",
                mem.peek(base)
            )
        }
        IndirectY => {
            let base = mem.peek16_pagewrap(arg8 as u16);
            let eff = base.wrapping_add(reg.y as u16);
            format!(
                "(${arg8:02X}),Y = {base:04X} @ {eff:04X} = {:02X}",
                mem.peek(eff)
            )
        }
        Relative => {
            let target = pc.wrapping_add(2).wrapping_add_signed(arg8 as i8 as i16);
            format!("${target:04X}")
        }
    }
}
