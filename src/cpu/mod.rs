/*!
The 6502 execution core.

Overview
- [`Cpu`] owns the architectural register file and a monotonic cycle
  counter, nothing else. Memory arrives as `&mut dyn Memory` per step and
  interrupt lines as `&mut InterruptLines`, so one CPU can be driven
  against any bus wiring (the real [`crate::bus::CpuBus`], flat test RAM,
  or anything in between).
- `step` runs exactly one unit of work: either one interrupt service or
  one instruction, never both. It returns the cycles that unit consumed.
- Undefined opcode bytes halt the CPU permanently. Real programs do not
  execute them; treating them as fatal catches runaway execution at the
  first bad fetch instead of megabytes later.

Cycle accounting
- Instruction cost = table base cycles, +1 for a page cross when the
  descriptor says so, +1/+2 for taken branches.
- Every interrupt service costs 7 cycles, including the RESET sequence,
  which decrements S by 3 without performing the stack writes.
*/

pub mod opcode;
pub mod regs;
pub mod snapshot;
pub mod trace;

mod addressing;
mod execute;

use crate::cpu::opcode::Instruction;
use crate::cpu::regs::{IRQ_DISABLE, Registers};
use crate::interrupt::{Interrupt, InterruptLines};
use crate::memory::Memory;

/// Little-endian vector locations at the top of the address space.
pub const NMI_VECTOR: u16 = 0xFFFA;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_VECTOR: u16 = 0xFFFE;

/// Cycles consumed by every interrupt service sequence.
pub const INTERRUPT_CYCLES: u32 = 7;

/// Diagnostic record of why the CPU halted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HaltInfo {
    /// The undefined opcode byte that was fetched.
    pub opcode: u8,
    /// Address the byte was fetched from.
    pub pc: u16,
    /// Cycle count at the halt.
    pub cycles: u64,
}

/// The CPU proper: register file, cycle counter, run state.
#[derive(Debug, Clone)]
pub struct Cpu {
    reg: Registers,
    cycles: u64,
    running: bool,
    trace: bool,
    halt: Option<HaltInfo>,
}

impl Cpu {
    /// A CPU in the documented power-up state. It has not executed the
    /// RESET sequence yet; call [`Cpu::power_cycle`] to arrange that.
    /// With `trace` on, every instruction logs one execution-log line at
    /// trace level before it runs.
    pub fn new(trace: bool) -> Self {
        Self {
            reg: Registers::power_up(),
            cycles: 0,
            running: true,
            trace,
            halt: None,
        }
    }

    // ---------------------------------------------------------------------
    // Lifecycle
    // ---------------------------------------------------------------------

    /// Full power cycle: registers to their power-up values, cycle count
    /// to zero, lines cleared, and a RESET request left pending so the
    /// first `step` performs the 7-cycle vector load.
    pub fn power_cycle(&mut self, lines: &mut InterruptLines) {
        self.reg = Registers::power_up();
        self.cycles = 0;
        self.running = true;
        self.halt = None;
        lines.clear();
        lines.request(Interrupt::Reset);
    }

    /// Warm reset: just pulls the RESET line. Registers and the cycle
    /// counter keep their values until the request is serviced.
    pub fn reset(&mut self, lines: &mut InterruptLines) {
        lines.request(Interrupt::Reset);
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    pub fn registers(&self) -> &Registers {
        &self.reg
    }

    pub fn registers_mut(&mut self) -> &mut Registers {
        &mut self.reg
    }

    /// Total cycles executed since the last power cycle.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Set when the CPU halted on an undefined opcode.
    pub fn halt_info(&self) -> Option<HaltInfo> {
        self.halt
    }

    pub fn set_trace(&mut self, trace: bool) {
        self.trace = trace;
    }

    // ---------------------------------------------------------------------
    // Execution
    // ---------------------------------------------------------------------

    /// Run one unit of work and return the cycles it consumed.
    ///
    /// Order per step: pending interrupts first (RESET > NMI > IRQ, with
    /// IRQ masked while the I flag is set), then one instruction. A step
    /// that services an interrupt does not also fetch an instruction.
    /// Returns 0 once halted.
    pub fn step(&mut self, mem: &mut dyn Memory, lines: &mut InterruptLines) -> u32 {
        if !self.running {
            return 0;
        }

        if let Some(kind) = lines.get() {
            let masked = kind == Interrupt::Irq && self.reg.flag(IRQ_DISABLE);
            if !masked {
                self.service(kind, mem, lines);
                self.cycles += INTERRUPT_CYCLES as u64;
                return INTERRUPT_CYCLES;
            }
        }

        if self.trace {
            log::trace!(target: "cpu", "{}", trace::line(&self.reg, &*mem, self.cycles));
        }

        let pc = self.reg.pc;
        let raw = self.reg.fetch(mem);
        let desc = opcode::decode(raw);

        if desc.instr == Instruction::Invalid {
            self.running = false;
            self.halt = Some(HaltInfo { opcode: raw, pc, cycles: self.cycles });
            log::error!(
                target: "cpu",
                "undefined opcode {raw:#04X} fetched at {pc:#06X}; halting"
            );
            return 0;
        }

        let opr = addressing::resolve(desc.mode, &mut self.reg, mem);

        let mut cost = desc.cycles as u32;
        if desc.page_cross && opr.crossed {
            cost += 1;
        }
        cost += execute::execute(&mut self.reg, mem, desc, opr);

        self.cycles += cost as u64;
        cost
    }

    /// The 7-cycle interrupt entry sequence. RESET skips the stack writes
    /// but still decrements S by 3.
    fn service(&mut self, kind: Interrupt, mem: &mut dyn Memory, lines: &mut InterruptLines) {
        match kind {
            Interrupt::Reset => {
                self.reg.s = self.reg.s.wrapping_sub(3);
            }
            Interrupt::Nmi | Interrupt::Irq => {
                let pc = self.reg.pc;
                self.reg.push16(mem, pc);
                let p = self.reg.status_for_push(false);
                self.reg.push(mem, p);
            }
        }

        self.reg.set_flag(IRQ_DISABLE, true);

        let vector = match kind {
            Interrupt::Reset => RESET_VECTOR,
            Interrupt::Nmi => NMI_VECTOR,
            Interrupt::Irq => IRQ_VECTOR,
        };
        self.reg.pc = mem.read16(vector);
        log::trace!(
            target: "cpu",
            "serviced {kind:?}, entering {:#06X} via {vector:#06X}",
            self.reg.pc
        );

        lines.service(kind);
    }
}
