/*!
Instruction semantics: the dispatch from a decoded [`Instruction`] to its
effect on the register file and the bus.

Semantics worth calling out:
- ADC computes the overflow flag with the sign trick
  `~(a ^ operand) & (a ^ result) & 0x80`; SBC is ADC of the operand's
  ones-complement, which also makes its carry the borrow-clear flag.
- Read-modify-write memory instructions (ASL/LSR/ROL/ROR/INC/DEC on a
  memory operand) write the unmodified value back before the real write.
  That double write is observable hardware behavior some cartridges use,
  so it goes through the bus like any other cycle.
- Branches return their conditional cost from here: +1 when taken, +1
  more when the target sits on a different page than the instruction
  after the branch.
- Decimal mode is set/cleared by SED/CLD and pushed/pulled with P, but
  ADC/SBC ignore it entirely (disabled in this CPU variant's silicon).
*/

use crate::cpu::addressing::Operand;
use crate::cpu::opcode::{AddrMode, Instruction, Opcode};
use crate::cpu::regs::{
    BREAK, CARRY, DECIMAL, IRQ_DISABLE, NEGATIVE, OVERFLOW, Registers, UNUSED, ZERO,
};
use crate::cpu::IRQ_VECTOR;
use crate::memory::Memory;

/// Execute one decoded instruction. Operand bytes have already been
/// consumed; `opr` is the resolver's output. Returns the extra cycles the
/// instruction charged beyond its base cost (branch penalties only).
pub(crate) fn execute(
    reg: &mut Registers,
    mem: &mut dyn Memory,
    op: &Opcode,
    opr: Operand,
) -> u32 {
    use Instruction::*;

    match op.instr {
        // ----- Arithmetic -----
        Adc => {
            let v = mem.read(opr.addr);
            adc(reg, v);
        }
        Sbc => {
            let v = mem.read(opr.addr);
            adc(reg, !v);
        }

        // ----- Logical -----
        And => {
            let v = mem.read(opr.addr);
            reg.a &= v;
            reg.update_zn(reg.a);
        }
        Ora => {
            let v = mem.read(opr.addr);
            reg.a |= v;
            reg.update_zn(reg.a);
        }
        Eor => {
            let v = mem.read(opr.addr);
            reg.a ^= v;
            reg.update_zn(reg.a);
        }
        Bit => {
            let v = mem.read(opr.addr);
            reg.set_flag(ZERO, (reg.a & v) == 0);
            reg.set_flag(NEGATIVE, (v & 0x80) != 0);
            reg.set_flag(OVERFLOW, (v & 0x40) != 0);
        }

        // ----- Shifts / rotates -----
        Asl => shift(reg, mem, op.mode, opr, asl),
        Lsr => shift(reg, mem, op.mode, opr, lsr),
        Rol => shift(reg, mem, op.mode, opr, rol),
        Ror => shift(reg, mem, op.mode, opr, ror),

        // ----- Branches -----
        Bcc => return branch(reg, !reg.flag(CARRY), opr),
        Bcs => return branch(reg, reg.flag(CARRY), opr),
        Bne => return branch(reg, !reg.flag(ZERO), opr),
        Beq => return branch(reg, reg.flag(ZERO), opr),
        Bpl => return branch(reg, !reg.flag(NEGATIVE), opr),
        Bmi => return branch(reg, reg.flag(NEGATIVE), opr),
        Bvc => return branch(reg, !reg.flag(OVERFLOW), opr),
        Bvs => return branch(reg, reg.flag(OVERFLOW), opr),

        // ----- Compares -----
        Cmp => {
            let v = mem.read(opr.addr);
            compare(reg, reg.a, v);
        }
        Cpx => {
            let v = mem.read(opr.addr);
            compare(reg, reg.x, v);
        }
        Cpy => {
            let v = mem.read(opr.addr);
            compare(reg, reg.y, v);
        }

        // ----- Increments / decrements -----
        Inc => rmw(reg, mem, opr.addr, inc),
        Dec => rmw(reg, mem, opr.addr, dec),
        Inx => {
            reg.x = reg.x.wrapping_add(1);
            reg.update_zn(reg.x);
        }
        Iny => {
            reg.y = reg.y.wrapping_add(1);
            reg.update_zn(reg.y);
        }
        Dex => {
            reg.x = reg.x.wrapping_sub(1);
            reg.update_zn(reg.x);
        }
        Dey => {
            reg.y = reg.y.wrapping_sub(1);
            reg.update_zn(reg.y);
        }

        // ----- Loads / stores -----
        Lda => {
            reg.a = mem.read(opr.addr);
            reg.update_zn(reg.a);
        }
        Ldx => {
            reg.x = mem.read(opr.addr);
            reg.update_zn(reg.x);
        }
        Ldy => {
            reg.y = mem.read(opr.addr);
            reg.update_zn(reg.y);
        }
        Sta => mem.write(opr.addr, reg.a),
        Stx => mem.write(opr.addr, reg.x),
        Sty => mem.write(opr.addr, reg.y),

        // ----- Stack -----
        Pha => {
            let a = reg.a;
            reg.push(mem, a);
        }
        Php => {
            let p = reg.status_for_push(true);
            reg.push(mem, p);
        }
        Pla => {
            reg.a = reg.pull(mem);
            reg.update_zn(reg.a);
        }
        Plp => {
            let p = reg.pull(mem);
            reg.p = (p | UNUSED) & !BREAK;
        }

        // ----- Transfers -----
        Tax => {
            reg.x = reg.a;
            reg.update_zn(reg.x);
        }
        Tay => {
            reg.y = reg.a;
            reg.update_zn(reg.y);
        }
        Tsx => {
            reg.x = reg.s;
            reg.update_zn(reg.x);
        }
        Txa => {
            reg.a = reg.x;
            reg.update_zn(reg.a);
        }
        Txs => reg.s = reg.x, // no flags
        Tya => {
            reg.a = reg.y;
            reg.update_zn(reg.a);
        }

        // ----- Jumps / subroutines -----
        Jmp => reg.pc = opr.addr,
        Jsr => {
            let ret = reg.pc.wrapping_sub(1);
            reg.push16(mem, ret);
            reg.pc = opr.addr;
        }
        Rts => {
            reg.pc = reg.pull16(mem).wrapping_add(1);
        }
        Rti => {
            let p = reg.pull(mem);
            reg.p = (p | UNUSED) & !BREAK;
            reg.pc = reg.pull16(mem);
        }

        // ----- System -----
        Brk => {
            // BRK pushes the address of the byte after its padding byte
            // and P with the break bit set, then enters through the
            // IRQ/BRK vector. 7 cycles, all in the base cost.
            let ret = reg.pc.wrapping_add(1);
            reg.push16(mem, ret);
            let p = reg.status_for_push(true);
            reg.push(mem, p);
            reg.set_flag(IRQ_DISABLE, true);
            reg.pc = mem.read16(IRQ_VECTOR);
        }
        Nop => {}

        // ----- Flag set / clear -----
        Clc => reg.set_flag(CARRY, false),
        Cld => reg.set_flag(DECIMAL, false),
        Cli => reg.set_flag(IRQ_DISABLE, false),
        Clv => reg.set_flag(OVERFLOW, false),
        Sec => reg.set_flag(CARRY, true),
        Sed => reg.set_flag(DECIMAL, true),
        Sei => reg.set_flag(IRQ_DISABLE, true),

        // The stepper halts on Invalid before dispatching here.
        Invalid => debug_assert!(false, "invalid opcode reached execute"),
    }

    0
}

// ---------------------------------------------------------------------------
// ALU helpers
// ---------------------------------------------------------------------------

/// Add with carry. SBC routes through here with the operand complemented.
fn adc(reg: &mut Registers, v: u8) {
    let a = reg.a;
    let carry_in = reg.flag(CARRY) as u16;
    let sum = a as u16 + v as u16 + carry_in;
    let result = sum as u8;

    reg.set_flag(CARRY, sum > 0xFF);
    // Signed overflow: inputs agree in sign, result disagrees.
    reg.set_flag(OVERFLOW, (!(a ^ v) & (a ^ result) & 0x80) != 0);
    reg.a = result;
    reg.update_zn(result);
}

fn compare(reg: &mut Registers, lhs: u8, v: u8) {
    reg.set_flag(CARRY, lhs >= v);
    reg.update_zn(lhs.wrapping_sub(v));
}

/// Taken branches cost one extra cycle, two if the target is on a
/// different page than the instruction following the branch.
fn branch(reg: &mut Registers, cond: bool, opr: Operand) -> u32 {
    if !cond {
        return 0;
    }
    reg.pc = opr.addr;
    if opr.crossed { 2 } else { 1 }
}

// ---------------------------------------------------------------------------
// Shift / rotate / inc / dec primitives, shared between the accumulator
// and memory forms.
// ---------------------------------------------------------------------------

fn asl(reg: &mut Registers, v: u8) -> u8 {
    reg.set_flag(CARRY, (v & 0x80) != 0);
    let r = v << 1;
    reg.update_zn(r);
    r
}

fn lsr(reg: &mut Registers, v: u8) -> u8 {
    reg.set_flag(CARRY, (v & 0x01) != 0);
    let r = v >> 1;
    reg.update_zn(r);
    r
}

fn rol(reg: &mut Registers, v: u8) -> u8 {
    let carry_in = reg.flag(CARRY) as u8;
    reg.set_flag(CARRY, (v & 0x80) != 0);
    let r = (v << 1) | carry_in;
    reg.update_zn(r);
    r
}

fn ror(reg: &mut Registers, v: u8) -> u8 {
    let carry_in = (reg.flag(CARRY) as u8) << 7;
    reg.set_flag(CARRY, (v & 0x01) != 0);
    let r = (v >> 1) | carry_in;
    reg.update_zn(r);
    r
}

fn inc(reg: &mut Registers, v: u8) -> u8 {
    let r = v.wrapping_add(1);
    reg.update_zn(r);
    r
}

fn dec(reg: &mut Registers, v: u8) -> u8 {
    let r = v.wrapping_sub(1);
    reg.update_zn(r);
    r
}

/// Dispatch a shift/rotate to the accumulator or to memory (as RMW).
fn shift(
    reg: &mut Registers,
    mem: &mut dyn Memory,
    mode: AddrMode,
    opr: Operand,
    f: fn(&mut Registers, u8) -> u8,
) {
    if mode == AddrMode::Accumulator {
        reg.a = f(reg, reg.a);
    } else {
        rmw(reg, mem, opr.addr, f);
    }
}

/// Read-modify-write choreography: read, dummy write of the old value,
/// then write the result. Both writes hit the bus.
fn rmw(reg: &mut Registers, mem: &mut dyn Memory, addr: u16, f: fn(&mut Registers, u8) -> u8) {
    let old = mem.read(addr);
    mem.write(addr, old);
    let new = f(reg, old);
    mem.write(addr, new);
}
