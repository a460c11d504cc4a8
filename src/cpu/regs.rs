/*!
Architectural register file for the 6502 core: the seven status flags, the
general registers, and the small fetch/stack helpers everything else is
built from.

Status register bit layout:

```text
Bit: 7 6 5 4 3 2 1 0
     N V 1 B D I Z C
```

- Bit 5 has no storage in hardware and always reads as 1.
- B only exists on the copy of P pushed to the stack (set for BRK/PHP,
  clear for IRQ/NMI pushes).
- D is tracked faithfully but has no arithmetic effect: this CPU variant
  ships with decimal mode disabled in silicon.

All arithmetic on registers wraps modulo 2^8 / 2^16; there is no
saturating math anywhere in the core.
*/

use crate::memory::Memory;

/// Processor status flag bit masks.
pub const CARRY: u8 = 0b0000_0001;
pub const ZERO: u8 = 0b0000_0010;
pub const IRQ_DISABLE: u8 = 0b0000_0100;
pub const DECIMAL: u8 = 0b0000_1000;
pub const BREAK: u8 = 0b0001_0000;
pub const UNUSED: u8 = 0b0010_0000; // always reads as 1
pub const OVERFLOW: u8 = 0b0100_0000;
pub const NEGATIVE: u8 = 0b1000_0000;

/// Base of the fixed 256-byte stack page.
pub const STACK_PAGE: u16 = 0x0100;

/// The 6502 register file. Owned exclusively by [`crate::cpu::Cpu`] and
/// mutated only while stepping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Registers {
    pub pc: u16,
    /// Stack pointer, an offset into the stack page at $0100.
    pub s: u8,
    pub a: u8,
    pub x: u8,
    pub y: u8,
    /// Status word. Use the flag helpers rather than poking bits directly.
    pub p: u8,
}

impl Registers {
    /// Documented 2A03 power-up state: A=X=Y=0, S=$FD, P=$34.
    pub fn power_up() -> Self {
        Self {
            pc: 0x0000,
            s: 0xFD,
            a: 0x00,
            x: 0x00,
            y: 0x00,
            p: IRQ_DISABLE | BREAK | UNUSED, // 0x34
        }
    }

    // ---------------------------------------------------------------------
    // Flags
    // ---------------------------------------------------------------------

    #[inline]
    pub fn flag(&self, mask: u8) -> bool {
        (self.p & mask) != 0
    }

    #[inline]
    pub fn set_flag(&mut self, mask: u8, on: bool) {
        if on {
            self.p |= mask;
        } else {
            self.p &= !mask;
        }
    }

    /// Update Z and N from a result byte, the way nearly every instruction
    /// that produces a value does.
    #[inline]
    pub fn update_zn(&mut self, val: u8) {
        self.set_flag(ZERO, val == 0);
        self.set_flag(NEGATIVE, (val & 0x80) != 0);
    }

    /// Copy of P as it appears on the stack: bit 5 forced to 1, B set for
    /// BRK/PHP pushes and clear for hardware interrupt pushes.
    #[inline]
    pub fn status_for_push(&self, set_break: bool) -> u8 {
        let base = self.p | UNUSED;
        if set_break { base | BREAK } else { base & !BREAK }
    }

    // ---------------------------------------------------------------------
    // Instruction stream
    // ---------------------------------------------------------------------

    /// Read the byte at PC and advance PC by one.
    #[inline]
    pub fn fetch(&mut self, mem: &mut dyn Memory) -> u8 {
        let b = mem.read(self.pc);
        self.pc = self.pc.wrapping_add(1);
        b
    }

    /// Read a little-endian word at PC and advance PC by two.
    #[inline]
    pub fn fetch16(&mut self, mem: &mut dyn Memory) -> u16 {
        let lo = self.fetch(mem) as u16;
        let hi = self.fetch(mem) as u16;
        (hi << 8) | lo
    }

    // ---------------------------------------------------------------------
    // Stack
    // ---------------------------------------------------------------------
    //
    // Push writes at $0100+S then decrements S; pull increments S first.

    #[inline]
    pub fn push(&mut self, mem: &mut dyn Memory, val: u8) {
        mem.write(STACK_PAGE | self.s as u16, val);
        self.s = self.s.wrapping_sub(1);
    }

    #[inline]
    pub fn pull(&mut self, mem: &mut dyn Memory) -> u8 {
        self.s = self.s.wrapping_add(1);
        mem.read(STACK_PAGE | self.s as u16)
    }

    /// Push a 16-bit value, high byte first (JSR / interrupt entry order).
    #[inline]
    pub fn push16(&mut self, mem: &mut dyn Memory, val: u16) {
        self.push(mem, (val >> 8) as u8);
        self.push(mem, (val & 0xFF) as u8);
    }

    #[inline]
    pub fn pull16(&mut self, mem: &mut dyn Memory) -> u16 {
        let lo = self.pull(mem) as u16;
        let hi = self.pull(mem) as u16;
        (hi << 8) | lo
    }
}
