/*!
Shared test fixtures.

Two [`Memory`] doubles cover almost every test in the crate:
- [`FlatMemory`]: a flat 64 KiB array with no mirroring or mapping, for
  tests that only care about values.
- [`RecordingMemory`]: the same array plus an ordered log of every bus
  access, for tests that assert on dummy reads and RMW double writes.
*/

use crate::memory::Memory;

/// Flat 64 KiB RAM spanning the whole address space.
pub struct FlatMemory {
    bytes: Vec<u8>,
}

impl FlatMemory {
    pub fn new() -> Self {
        Self { bytes: vec![0; 0x1_0000] }
    }

    /// Copy `data` into memory starting at `addr`.
    pub fn load(&mut self, addr: u16, data: &[u8]) {
        for (i, b) in data.iter().enumerate() {
            self.bytes[addr as usize + i] = *b;
        }
    }
}

impl Memory for FlatMemory {
    fn peek(&self, addr: u16) -> u8 {
        self.bytes[addr as usize]
    }

    fn read(&mut self, addr: u16) -> u8 {
        self.bytes[addr as usize]
    }

    fn write(&mut self, addr: u16, val: u8) {
        self.bytes[addr as usize] = val;
    }
}

/// One logged bus access. Peeks are deliberately not logged; they model
/// side-effect-free inspection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BusOp {
    Read(u16),
    Write(u16, u8),
}

/// Flat memory that records the order of reads and writes.
pub struct RecordingMemory {
    bytes: Vec<u8>,
    log: Vec<BusOp>,
}

impl RecordingMemory {
    pub fn new() -> Self {
        Self { bytes: vec![0; 0x1_0000], log: Vec::new() }
    }

    /// Seed a byte without logging anything.
    pub fn set(&mut self, addr: u16, val: u8) {
        self.bytes[addr as usize] = val;
    }

    /// Every read and write so far, in order.
    pub fn ops(&self) -> &[BusOp] {
        &self.log
    }

    pub fn clear_ops(&mut self) {
        self.log.clear();
    }
}

impl Memory for RecordingMemory {
    fn peek(&self, addr: u16) -> u8 {
        self.bytes[addr as usize]
    }

    fn read(&mut self, addr: u16) -> u8 {
        self.log.push(BusOp::Read(addr));
        self.bytes[addr as usize]
    }

    fn write(&mut self, addr: u16, val: u8) {
        self.log.push(BusOp::Write(addr, val));
        self.bytes[addr as usize] = val;
    }
}
