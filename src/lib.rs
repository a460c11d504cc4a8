#![doc = r#"
famicore library crate.

A cycle-accurate 6502 (2A03 variant) execution core for NES-class
emulation, plus the CPU-side bus wiring around it.

Modules:
- bus: CpuBus routing the fixed memory map (RAM mirrors, PPU/APU/DMA/
  controller windows, cartridge slot) to attached devices
- cpu: the CPU core (stepper, register file, decode table, addressing
  resolver, instruction semantics, trace formatter, snapshots)
- interrupt: shared RESET/NMI/IRQ line state with fixed priority
- memory: the Memory trait every bus participant implements

The CPU borrows its bus per step rather than owning it, so the same core
drives the real CpuBus, flat test RAM, or any other Memory impl.

In tests, shared memory doubles are available under `crate::test_utils`.
"#]

// Core modules
pub mod bus;
pub mod cpu;
pub mod interrupt;
pub mod memory;

// Re-export commonly used types at the crate root for convenience.
pub use bus::CpuBus;
pub use cpu::snapshot::CpuSnapshot;
pub use cpu::{Cpu, HaltInfo};
pub use interrupt::{Interrupt, InterruptLines};
pub use memory::Memory;

// Shared test utilities (only compiled for tests)
#[cfg(test)]
pub mod test_utils;
