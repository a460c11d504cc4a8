/*!
Memory: the 16-bit addressable byte store contract shared by every
component on the CPU side of the machine.

Every device the CPU can talk to (internal RAM, the PPU register window,
APU registers, controller ports, cartridge space, and the CPU bus itself)
implements this trait, so the CPU core can be driven against a production
bus, a flat test double, or a tracing wrapper without special-casing.

The contract distinguishes two kinds of reads:
- `read` is the bus cycle the hardware performs; it may have side effects
  (register latches, controller shift strobes, PPU buffer updates).
- `peek` must be side-effect free and return the same value the
  corresponding `read` would. Diagnostics and the instruction tracer use
  `peek` exclusively, so inspecting the machine never perturbs it.
*/

/// 16-bit addressable memory, the interface between the CPU and everything
/// wired onto its bus.
pub trait Memory {
    /// Side-effect-free read, for diagnostics and tracing.
    fn peek(&self, addr: u16) -> u8;

    /// Bus read. May have side effects (latches, strobes).
    fn read(&mut self, addr: u16) -> u8;

    /// Bus write. Side effects expected.
    fn write(&mut self, addr: u16, val: u8);

    /// Little-endian 16-bit read (low byte first).
    fn read16(&mut self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi = self.read(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    /// Side-effect-free variant of [`Memory::read16`].
    fn peek16(&self, addr: u16) -> u16 {
        let lo = self.peek(addr) as u16;
        let hi = self.peek(addr.wrapping_add(1)) as u16;
        (hi << 8) | lo
    }

    /// Little-endian 16-bit read where the high byte never carries into the
    /// next page: reading at $xxFF fetches the high byte from $xx00.
    ///
    /// This is how the 6502 fetches pointers from the zero page for the
    /// `(zp,X)` / `(zp),Y` modes, and it is also the root cause of the
    /// indirect-JMP page-wrap bug.
    fn read16_pagewrap(&mut self, addr: u16) -> u16 {
        let lo = self.read(addr) as u16;
        let hi_addr = (addr & 0xFF00) | (addr.wrapping_add(1) & 0x00FF);
        let hi = self.read(hi_addr) as u16;
        (hi << 8) | lo
    }

    /// Side-effect-free variant of [`Memory::read16_pagewrap`].
    fn peek16_pagewrap(&self, addr: u16) -> u16 {
        let lo = self.peek(addr) as u16;
        let hi_addr = (addr & 0xFF00) | (addr.wrapping_add(1) & 0x00FF);
        let hi = self.peek(hi_addr) as u16;
        (hi << 8) | lo
    }
}
