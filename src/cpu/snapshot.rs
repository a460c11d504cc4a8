/*!
CPU state snapshots with a tagged, order-independent wire encoding.

Each field is serialized as `tag, length, payload` (payload little-endian).
Decoders skip tags they do not recognize, so a snapshot written by a newer
build with extra fields still loads here, and fields may appear in any
order. Absent fields keep their defaults.

A snapshot captures the architectural state only: registers, cycle count,
and run flag. Bus contents are whatever the surrounding system snapshots
separately.
*/

use crate::cpu::Cpu;
use crate::cpu::regs::Registers;

const TAG_A: u8 = 0x01;
const TAG_X: u8 = 0x02;
const TAG_Y: u8 = 0x03;
const TAG_S: u8 = 0x04;
const TAG_P: u8 = 0x05;
const TAG_PC: u8 = 0x06;
const TAG_CYCLES: u8 = 0x07;
const TAG_RUNNING: u8 = 0x08;

/// A point-in-time copy of the CPU's architectural state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuSnapshot {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub s: u8,
    pub p: u8,
    pub pc: u16,
    pub cycles: u64,
    pub running: bool,
}

impl Default for CpuSnapshot {
    fn default() -> Self {
        Self {
            a: 0,
            x: 0,
            y: 0,
            s: 0,
            p: 0,
            pc: 0,
            cycles: 0,
            running: true,
        }
    }
}

impl CpuSnapshot {
    /// Serialize to the tagged wire format.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(40);
        push_field(&mut out, TAG_A, &[self.a]);
        push_field(&mut out, TAG_X, &[self.x]);
        push_field(&mut out, TAG_Y, &[self.y]);
        push_field(&mut out, TAG_S, &[self.s]);
        push_field(&mut out, TAG_P, &[self.p]);
        push_field(&mut out, TAG_PC, &self.pc.to_le_bytes());
        push_field(&mut out, TAG_CYCLES, &self.cycles.to_le_bytes());
        push_field(&mut out, TAG_RUNNING, &[self.running as u8]);
        out
    }

    /// Parse the tagged wire format. Unknown tags are skipped; truncated
    /// or malformed fields are errors.
    pub fn decode(bytes: &[u8]) -> Result<CpuSnapshot, String> {
        let mut snap = CpuSnapshot::default();
        let mut i = 0;

        while i < bytes.len() {
            if i + 2 > bytes.len() {
                return Err("snapshot truncated in field header".to_string());
            }
            let tag = bytes[i];
            let len = bytes[i + 1] as usize;
            let start = i + 2;
            let end = start + len;
            if end > bytes.len() {
                return Err(format!("snapshot field {tag:#04X} truncated"));
            }
            let payload = &bytes[start..end];

            match tag {
                TAG_A => snap.a = field_u8(tag, payload)?,
                TAG_X => snap.x = field_u8(tag, payload)?,
                TAG_Y => snap.y = field_u8(tag, payload)?,
                TAG_S => snap.s = field_u8(tag, payload)?,
                TAG_P => snap.p = field_u8(tag, payload)?,
                TAG_PC => snap.pc = field_u16(tag, payload)?,
                TAG_CYCLES => snap.cycles = field_u64(tag, payload)?,
                TAG_RUNNING => snap.running = field_u8(tag, payload)? != 0,
                _ => {} // unknown field from another build; skip
            }
            i = end;
        }

        Ok(snap)
    }
}

fn push_field(out: &mut Vec<u8>, tag: u8, payload: &[u8]) {
    out.push(tag);
    out.push(payload.len() as u8);
    out.extend_from_slice(payload);
}

fn field_u8(tag: u8, payload: &[u8]) -> Result<u8, String> {
    match payload {
        [b] => Ok(*b),
        _ => Err(format!("snapshot field {tag:#04X} has bad length")),
    }
}

fn field_u16(tag: u8, payload: &[u8]) -> Result<u16, String> {
    match payload {
        [lo, hi] => Ok(u16::from_le_bytes([*lo, *hi])),
        _ => Err(format!("snapshot field {tag:#04X} has bad length")),
    }
}

fn field_u64(tag: u8, payload: &[u8]) -> Result<u64, String> {
    let arr: [u8; 8] = payload
        .try_into()
        .map_err(|_| format!("snapshot field {tag:#04X} has bad length"))?;
    Ok(u64::from_le_bytes(arr))
}

impl Cpu {
    /// Capture the current architectural state.
    pub fn snapshot(&self) -> CpuSnapshot {
        let reg = self.registers();
        CpuSnapshot {
            a: reg.a,
            x: reg.x,
            y: reg.y,
            s: reg.s,
            p: reg.p,
            pc: reg.pc,
            cycles: self.cycles(),
            running: self.is_running(),
        }
    }

    /// Overwrite the CPU with a snapshot. Halt diagnostics do not survive
    /// a restore; a restored non-running CPU reports no halt info.
    pub fn restore(&mut self, snap: &CpuSnapshot) {
        self.reg = Registers {
            pc: snap.pc,
            s: snap.s,
            a: snap.a,
            x: snap.x,
            y: snap.y,
            p: snap.p,
        };
        self.cycles = snap.cycles;
        self.running = snap.running;
        self.halt = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interrupt::InterruptLines;
    use crate::test_utils::FlatMemory;

    fn sample() -> CpuSnapshot {
        CpuSnapshot {
            a: 0x12,
            x: 0x34,
            y: 0x56,
            s: 0xF0,
            p: 0xA5,
            pc: 0xC123,
            cycles: 0x0102_0304_0506,
            running: true,
        }
    }

    #[test]
    fn encode_decode_round_trip() {
        let snap = sample();
        assert_eq!(CpuSnapshot::decode(&snap.encode()), Ok(snap));
    }

    #[test]
    fn fields_decode_in_any_order() {
        let mut bytes = Vec::new();
        push_field(&mut bytes, TAG_PC, &0xBEEFu16.to_le_bytes());
        push_field(&mut bytes, TAG_A, &[0x99]);
        let snap = CpuSnapshot::decode(&bytes).unwrap();
        assert_eq!(snap.pc, 0xBEEF);
        assert_eq!(snap.a, 0x99);
        // Absent fields keep defaults.
        assert_eq!(snap.x, 0);
        assert!(snap.running);
    }

    #[test]
    fn unknown_tags_are_skipped() {
        let mut bytes = sample().encode();
        push_field(&mut bytes, 0x7F, &[1, 2, 3, 4]);
        assert_eq!(CpuSnapshot::decode(&bytes), Ok(sample()));
    }

    #[test]
    fn truncated_input_is_an_error() {
        let bytes = sample().encode();
        assert!(CpuSnapshot::decode(&bytes[..bytes.len() - 1]).is_err());
        // Lone tag byte with no length.
        assert!(CpuSnapshot::decode(&[TAG_A]).is_err());
    }

    #[test]
    fn bad_field_length_is_an_error() {
        let mut bytes = Vec::new();
        push_field(&mut bytes, TAG_PC, &[0x01]); // PC needs two bytes
        assert!(CpuSnapshot::decode(&bytes).is_err());
    }

    #[test]
    fn cpu_restore_resumes_execution() {
        let mut mem = FlatMemory::new();
        mem.load(0xFFFC, &[0x00, 0x80]);
        mem.load(0x8000, &[0xA9, 0x07, 0xA9, 0x08]); // LDA #$07; LDA #$08

        let mut cpu = Cpu::new(false);
        let mut lines = InterruptLines::new();
        cpu.power_cycle(&mut lines);
        cpu.step(&mut mem, &mut lines); // reset
        cpu.step(&mut mem, &mut lines); // LDA #$07

        let snap = cpu.snapshot();
        cpu.step(&mut mem, &mut lines); // LDA #$08
        assert_eq!(cpu.registers().a, 0x08);

        let mut restored = Cpu::new(false);
        restored.restore(&CpuSnapshot::decode(&snap.encode()).unwrap());
        assert_eq!(restored.registers().a, 0x07);
        assert_eq!(restored.cycles(), cpu.cycles() - 2);

        restored.step(&mut mem, &mut lines);
        assert_eq!(restored.registers().a, 0x08);
        assert_eq!(restored.registers().pc, cpu.registers().pc);
    }
}
