/*!
Opcode descriptor table: the immutable map from every possible instruction
byte to its (instruction, addressing mode, base cycles, page-cross
penalty) tuple.

The table is built once as a `static` and shared by every CPU instance.
Undefined opcode bytes carry [`Instruction::Invalid`]; hitting one at
execution time halts the CPU (the only fatal condition in the core).

Cycle counts here are the minimum for the instruction. Conditional costs
are layered on by the stepper: +1 for a page cross when `page_cross` is
set, and +1 / +2 for taken branches (see the dispatch logic in
`cpu::execute`). BRK carries its full 7-cycle interrupt-entry cost.
*/

/// The 56 documented 6502 operations, plus a marker for undefined bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    Invalid,
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi,
    Bne, Bpl, Brk, Bvc, Bvs, Clc, Cld, Cli,
    Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor,
    Inc, Inx, Iny, Jmp, Jsr, Lda, Ldx, Ldy,
    Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol,
    Ror, Rti, Rts, Sbc, Sec, Sed, Sei, Sta,
    Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
}

impl Instruction {
    /// Three-letter assembler mnemonic ("KIL" for undefined bytes, the
    /// conventional name for the freeze opcodes).
    pub fn mnemonic(self) -> &'static str {
        use Instruction::*;
        match self {
            Invalid => "KIL",
            Adc => "ADC", And => "AND", Asl => "ASL", Bcc => "BCC",
            Bcs => "BCS", Beq => "BEQ", Bit => "BIT", Bmi => "BMI",
            Bne => "BNE", Bpl => "BPL", Brk => "BRK", Bvc => "BVC",
            Bvs => "BVS", Clc => "CLC", Cld => "CLD", Cli => "CLI",
            Clv => "CLV", Cmp => "CMP", Cpx => "CPX", Cpy => "CPY",
            Dec => "DEC", Dex => "DEX", Dey => "DEY", Eor => "EOR",
            Inc => "INC", Inx => "INX", Iny => "INY", Jmp => "JMP",
            Jsr => "JSR", Lda => "LDA", Ldx => "LDX", Ldy => "LDY",
            Lsr => "LSR", Nop => "NOP", Ora => "ORA", Pha => "PHA",
            Php => "PHP", Pla => "PLA", Plp => "PLP", Rol => "ROL",
            Ror => "ROR", Rti => "RTI", Rts => "RTS", Sbc => "SBC",
            Sec => "SEC", Sed => "SED", Sei => "SEI", Sta => "STA",
            Stx => "STX", Sty => "STY", Tax => "TAX", Tay => "TAY",
            Tsx => "TSX", Txa => "TXA", Txs => "TXS", Tya => "TYA",
        }
    }
}

/// The 13 operand-location schemes of the 6502.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddrMode {
    Absolute,
    AbsoluteX,
    AbsoluteY,
    Accumulator,
    Immediate,
    Implied,
    Indirect,
    IndirectY,
    XIndirect,
    Relative,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
}

impl AddrMode {
    /// Number of operand bytes the mode consumes from the instruction
    /// stream (0, 1, or 2).
    pub fn operand_len(self) -> u16 {
        use AddrMode::*;
        match self {
            Implied | Accumulator => 0,
            Immediate | Relative | ZeroPage | ZeroPageX | ZeroPageY | IndirectY | XIndirect => 1,
            Absolute | AbsoluteX | AbsoluteY | Indirect => 2,
        }
    }
}

/// One entry of the 256-entry decode table.
#[derive(Debug, Clone, Copy)]
pub struct Opcode {
    /// The raw instruction byte this entry decodes.
    pub raw: u8,
    pub instr: Instruction,
    pub mode: AddrMode,
    /// Minimum clock cycles to execute.
    pub cycles: u8,
    /// Whether crossing a 256-byte page while computing the operand
    /// address costs one extra cycle.
    pub page_cross: bool,
}

/// Look up the descriptor for a raw opcode byte.
#[inline]
pub fn decode(raw: u8) -> &'static Opcode {
    &table::OPCODES[raw as usize]
}

mod table {
    use super::AddrMode::*;
    use super::Instruction::*;
    use super::{AddrMode, Instruction, Opcode};

    const fn op(raw: u8, instr: Instruction, mode: AddrMode, cycles: u8) -> Opcode {
        Opcode { raw, instr, mode, cycles, page_cross: false }
    }

    // Variant for opcodes that pay +1 cycle when the operand address
    // computation crosses a page.
    const fn op_pg(raw: u8, instr: Instruction, mode: AddrMode, cycles: u8) -> Opcode {
        Opcode { raw, instr, mode, cycles, page_cross: true }
    }

    const fn nil(raw: u8) -> Opcode {
        Opcode { raw, instr: Invalid, mode: Implied, cycles: 0, page_cross: false }
    }

    #[rustfmt::skip]
    pub(super) static OPCODES: [Opcode; 256] = [
        op(0x00, Brk, Implied, 7),
        op(0x01, Ora, XIndirect, 6),
        nil(0x02),
        nil(0x03),
        nil(0x04),
        op(0x05, Ora, ZeroPage, 3),
        op(0x06, Asl, ZeroPage, 5),
        nil(0x07),
        op(0x08, Php, Implied, 3),
        op(0x09, Ora, Immediate, 2),
        op(0x0A, Asl, Accumulator, 2),
        nil(0x0B),
        nil(0x0C),
        op(0x0D, Ora, Absolute, 4),
        op(0x0E, Asl, Absolute, 6),
        nil(0x0F),
        op(0x10, Bpl, Relative, 2),
        op_pg(0x11, Ora, IndirectY, 5),
        nil(0x12),
        nil(0x13),
        nil(0x14),
        op(0x15, Ora, ZeroPageX, 4),
        op(0x16, Asl, ZeroPageX, 6),
        nil(0x17),
        op(0x18, Clc, Implied, 2),
        op_pg(0x19, Ora, AbsoluteY, 4),
        nil(0x1A),
        nil(0x1B),
        nil(0x1C),
        op_pg(0x1D, Ora, AbsoluteX, 4),
        op(0x1E, Asl, AbsoluteX, 7),
        nil(0x1F),
        op(0x20, Jsr, Absolute, 6),
        op(0x21, And, XIndirect, 6),
        nil(0x22),
        nil(0x23),
        op(0x24, Bit, ZeroPage, 3),
        op(0x25, And, ZeroPage, 3),
        op(0x26, Rol, ZeroPage, 5),
        nil(0x27),
        op(0x28, Plp, Implied, 4),
        op(0x29, And, Immediate, 2),
        op(0x2A, Rol, Accumulator, 2),
        nil(0x2B),
        op(0x2C, Bit, Absolute, 4),
        op(0x2D, And, Absolute, 4),
        op(0x2E, Rol, Absolute, 6),
        nil(0x2F),
        op(0x30, Bmi, Relative, 2),
        op_pg(0x31, And, IndirectY, 5),
        nil(0x32),
        nil(0x33),
        nil(0x34),
        op(0x35, And, ZeroPageX, 4),
        op(0x36, Rol, ZeroPageX, 6),
        nil(0x37),
        op(0x38, Sec, Implied, 2),
        op_pg(0x39, And, AbsoluteY, 4),
        nil(0x3A),
        nil(0x3B),
        nil(0x3C),
        op_pg(0x3D, And, AbsoluteX, 4),
        op(0x3E, Rol, AbsoluteX, 7),
        nil(0x3F),
        op(0x40, Rti, Implied, 6),
        op(0x41, Eor, XIndirect, 6),
        nil(0x42),
        nil(0x43),
        nil(0x44),
        op(0x45, Eor, ZeroPage, 3),
        op(0x46, Lsr, ZeroPage, 5),
        nil(0x47),
        op(0x48, Pha, Implied, 3),
        op(0x49, Eor, Immediate, 2),
        op(0x4A, Lsr, Accumulator, 2),
        nil(0x4B),
        op(0x4C, Jmp, Absolute, 3),
        op(0x4D, Eor, Absolute, 4),
        op(0x4E, Lsr, Absolute, 6),
        nil(0x4F),
        op(0x50, Bvc, Relative, 2),
        op_pg(0x51, Eor, IndirectY, 5),
        nil(0x52),
        nil(0x53),
        nil(0x54),
        op(0x55, Eor, ZeroPageX, 4),
        op(0x56, Lsr, ZeroPageX, 6),
        nil(0x57),
        op(0x58, Cli, Implied, 2),
        op_pg(0x59, Eor, AbsoluteY, 4),
        nil(0x5A),
        nil(0x5B),
        nil(0x5C),
        op_pg(0x5D, Eor, AbsoluteX, 4),
        op(0x5E, Lsr, AbsoluteX, 7),
        nil(0x5F),
        op(0x60, Rts, Implied, 6),
        op(0x61, Adc, XIndirect, 6),
        nil(0x62),
        nil(0x63),
        nil(0x64),
        op(0x65, Adc, ZeroPage, 3),
        op(0x66, Ror, ZeroPage, 5),
        nil(0x67),
        op(0x68, Pla, Implied, 4),
        op(0x69, Adc, Immediate, 2),
        op(0x6A, Ror, Accumulator, 2),
        nil(0x6B),
        op(0x6C, Jmp, Indirect, 5),
        op(0x6D, Adc, Absolute, 4),
        op(0x6E, Ror, Absolute, 6),
        nil(0x6F),
        op(0x70, Bvs, Relative, 2),
        op_pg(0x71, Adc, IndirectY, 5),
        nil(0x72),
        nil(0x73),
        nil(0x74),
        op(0x75, Adc, ZeroPageX, 4),
        op(0x76, Ror, ZeroPageX, 6),
        nil(0x77),
        op(0x78, Sei, Implied, 2),
        op_pg(0x79, Adc, AbsoluteY, 4),
        nil(0x7A),
        nil(0x7B),
        nil(0x7C),
        op_pg(0x7D, Adc, AbsoluteX, 4),
        op(0x7E, Ror, AbsoluteX, 7),
        nil(0x7F),
        nil(0x80),
        op(0x81, Sta, XIndirect, 6),
        nil(0x82),
        nil(0x83),
        op(0x84, Sty, ZeroPage, 3),
        op(0x85, Sta, ZeroPage, 3),
        op(0x86, Stx, ZeroPage, 3),
        nil(0x87),
        op(0x88, Dey, Implied, 2),
        nil(0x89),
        op(0x8A, Txa, Implied, 2),
        nil(0x8B),
        op(0x8C, Sty, Absolute, 4),
        op(0x8D, Sta, Absolute, 4),
        op(0x8E, Stx, Absolute, 4),
        nil(0x8F),
        op(0x90, Bcc, Relative, 2),
        op(0x91, Sta, IndirectY, 6),
        nil(0x92),
        nil(0x93),
        op(0x94, Sty, ZeroPageX, 4),
        op(0x95, Sta, ZeroPageX, 4),
        op(0x96, Stx, ZeroPageY, 4),
        nil(0x97),
        op(0x98, Tya, Implied, 2),
        op(0x99, Sta, AbsoluteY, 5),
        op(0x9A, Txs, Implied, 2),
        nil(0x9B),
        nil(0x9C),
        op(0x9D, Sta, AbsoluteX, 5),
        nil(0x9E),
        nil(0x9F),
        op(0xA0, Ldy, Immediate, 2),
        op(0xA1, Lda, XIndirect, 6),
        op(0xA2, Ldx, Immediate, 2),
        nil(0xA3),
        op(0xA4, Ldy, ZeroPage, 3),
        op(0xA5, Lda, ZeroPage, 3),
        op(0xA6, Ldx, ZeroPage, 3),
        nil(0xA7),
        op(0xA8, Tay, Implied, 2),
        op(0xA9, Lda, Immediate, 2),
        op(0xAA, Tax, Implied, 2),
        nil(0xAB),
        op(0xAC, Ldy, Absolute, 4),
        op(0xAD, Lda, Absolute, 4),
        op(0xAE, Ldx, Absolute, 4),
        nil(0xAF),
        op(0xB0, Bcs, Relative, 2),
        op_pg(0xB1, Lda, IndirectY, 5),
        nil(0xB2),
        nil(0xB3),
        op(0xB4, Ldy, ZeroPageX, 4),
        op(0xB5, Lda, ZeroPageX, 4),
        op(0xB6, Ldx, ZeroPageY, 4),
        nil(0xB7),
        op(0xB8, Clv, Implied, 2),
        op_pg(0xB9, Lda, AbsoluteY, 4),
        op(0xBA, Tsx, Implied, 2),
        nil(0xBB),
        op_pg(0xBC, Ldy, AbsoluteX, 4),
        op_pg(0xBD, Lda, AbsoluteX, 4),
        op_pg(0xBE, Ldx, AbsoluteY, 4),
        nil(0xBF),
        op(0xC0, Cpy, Immediate, 2),
        op(0xC1, Cmp, XIndirect, 6),
        nil(0xC2),
        nil(0xC3),
        op(0xC4, Cpy, ZeroPage, 3),
        op(0xC5, Cmp, ZeroPage, 3),
        op(0xC6, Dec, ZeroPage, 5),
        nil(0xC7),
        op(0xC8, Iny, Implied, 2),
        op(0xC9, Cmp, Immediate, 2),
        op(0xCA, Dex, Implied, 2),
        nil(0xCB),
        op(0xCC, Cpy, Absolute, 4),
        op(0xCD, Cmp, Absolute, 4),
        op(0xCE, Dec, Absolute, 6),
        nil(0xCF),
        op(0xD0, Bne, Relative, 2),
        op_pg(0xD1, Cmp, IndirectY, 5),
        nil(0xD2),
        nil(0xD3),
        nil(0xD4),
        op(0xD5, Cmp, ZeroPageX, 4),
        op(0xD6, Dec, ZeroPageX, 6),
        nil(0xD7),
        op(0xD8, Cld, Implied, 2),
        op_pg(0xD9, Cmp, AbsoluteY, 4),
        nil(0xDA),
        nil(0xDB),
        nil(0xDC),
        op_pg(0xDD, Cmp, AbsoluteX, 4),
        op(0xDE, Dec, AbsoluteX, 7),
        nil(0xDF),
        op(0xE0, Cpx, Immediate, 2),
        op(0xE1, Sbc, XIndirect, 6),
        nil(0xE2),
        nil(0xE3),
        op(0xE4, Cpx, ZeroPage, 3),
        op(0xE5, Sbc, ZeroPage, 3),
        op(0xE6, Inc, ZeroPage, 5),
        nil(0xE7),
        op(0xE8, Inx, Implied, 2),
        op(0xE9, Sbc, Immediate, 2),
        op(0xEA, Nop, Implied, 2),
        nil(0xEB),
        op(0xEC, Cpx, Absolute, 4),
        op(0xED, Sbc, Absolute, 4),
        op(0xEE, Inc, Absolute, 6),
        nil(0xEF),
        op(0xF0, Beq, Relative, 2),
        op_pg(0xF1, Sbc, IndirectY, 5),
        nil(0xF2),
        nil(0xF3),
        nil(0xF4),
        op(0xF5, Sbc, ZeroPageX, 4),
        op(0xF6, Inc, ZeroPageX, 6),
        nil(0xF7),
        op(0xF8, Sed, Implied, 2),
        op_pg(0xF9, Sbc, AbsoluteY, 4),
        nil(0xFA),
        nil(0xFB),
        nil(0xFC),
        op_pg(0xFD, Sbc, AbsoluteX, 4),
        op(0xFE, Inc, AbsoluteX, 7),
        nil(0xFF),
    ];
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_field_matches_table_index() {
        for (i, op) in (0u16..256).map(|i| (i, decode(i as u8))) {
            assert_eq!(op.raw as u16, i);
        }
    }

    #[test]
    fn known_entries_decode_correctly() {
        let lda_imm = decode(0xA9);
        assert_eq!(lda_imm.instr, Instruction::Lda);
        assert_eq!(lda_imm.mode, AddrMode::Immediate);
        assert_eq!(lda_imm.cycles, 2);
        assert!(!lda_imm.page_cross);

        let lda_abs_x = decode(0xBD);
        assert_eq!(lda_abs_x.mode, AddrMode::AbsoluteX);
        assert!(lda_abs_x.page_cross);

        // STA never pays a conditional penalty; its indexed forms are fixed.
        let sta_abs_x = decode(0x9D);
        assert_eq!(sta_abs_x.cycles, 5);
        assert!(!sta_abs_x.page_cross);

        let jmp_ind = decode(0x6C);
        assert_eq!(jmp_ind.instr, Instruction::Jmp);
        assert_eq!(jmp_ind.mode, AddrMode::Indirect);
        assert_eq!(jmp_ind.cycles, 5);
    }

    #[test]
    fn undefined_bytes_are_invalid() {
        for raw in [0x02u8, 0x3F, 0x80, 0xEB, 0xFF] {
            assert_eq!(decode(raw).instr, Instruction::Invalid);
        }
    }

    #[test]
    fn operand_lengths_per_mode() {
        assert_eq!(AddrMode::Implied.operand_len(), 0);
        assert_eq!(AddrMode::Accumulator.operand_len(), 0);
        assert_eq!(AddrMode::Immediate.operand_len(), 1);
        assert_eq!(AddrMode::ZeroPageY.operand_len(), 1);
        assert_eq!(AddrMode::Absolute.operand_len(), 2);
        assert_eq!(AddrMode::Indirect.operand_len(), 2);
    }

    #[test]
    fn every_rmw_memory_form_has_fixed_cost() {
        // Read-modify-write opcodes never take the page-cross penalty.
        for raw in [0x06u8, 0x16, 0x0E, 0x1E, 0x46, 0x56, 0x4E, 0x5E,
                    0x26, 0x36, 0x2E, 0x3E, 0x66, 0x76, 0x6E, 0x7E,
                    0xE6, 0xF6, 0xEE, 0xFE, 0xC6, 0xD6, 0xCE, 0xDE] {
            assert!(!decode(raw).page_cross, "opcode {raw:#04X}");
        }
    }
}
