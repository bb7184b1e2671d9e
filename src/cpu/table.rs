/*!
table.rs - 256-entry opcode metadata table.

Purpose
=======
One row per byte pattern: mnemonic, addressing mode, base cycle count and
the minimum CPU variant that defines the row. The table is a `static` built
in a const block and never mutated.

Dispatch Notes
==============
- Dispatch consults the table once per instruction. When a row's
  `min_variant` exceeds the active variant the dispatcher substitutes a NOP
  sized by the row's `gated_mode`, so PC still advances over the operand
  bytes. This is also how undocumented NMOS patterns execute: their bytes
  are NOP rows gated at `C02` whose addressing mode reproduces the operand
  length of the NMOS illegal form occupying that slot.
- `gated_mode` equals `mode` everywhere except 0xCB/0xDB: on the WDC part
  those bytes are the 1-byte WAI/STP, while the NMOS illegal forms they
  shadow (AXS #imm, DCP abs,Y) carry operand bytes that a gated NOP must
  still skip.
- Base cycles exclude conditional penalties (+1 for taken branches, page
  crossings on read-type indexed modes, +1 for decimal-mode ADC/SBC on
  CMOS parts); those are applied by the family handlers.
- Rockwell bit instructions encode the bit number in the opcode's high
  nibble; the table carries it in the mnemonic payload.
*/

use crate::cpu::addressing::Mode;
use crate::cpu::state::Variant;
use std::fmt;

/// Instruction mnemonic. The Rockwell bit ops carry their bit index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Bra, Brk, Bvc, Bvs,
    Clc, Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny,
    Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Phx, Phy, Pla, Plp,
    Plx, Ply, Rol, Ror, Rti, Rts, Sbc, Sec, Sed, Sei, Sta, Stp, Stx, Sty,
    Stz, Tax, Tay, Trb, Tsb, Tsx, Txa, Txs, Tya, Wai,
    Rmb(u8), Smb(u8), Bbr(u8), Bbs(u8),
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Mnemonic::*;
        match *self {
            Rmb(n) => write!(f, "RMB{n}"),
            Smb(n) => write!(f, "SMB{n}"),
            Bbr(n) => write!(f, "BBR{n}"),
            Bbs(n) => write!(f, "BBS{n}"),
            other => {
                let s = match other {
                    Adc => "ADC", And => "AND", Asl => "ASL", Bcc => "BCC",
                    Bcs => "BCS", Beq => "BEQ", Bit => "BIT", Bmi => "BMI",
                    Bne => "BNE", Bpl => "BPL", Bra => "BRA", Brk => "BRK",
                    Bvc => "BVC", Bvs => "BVS", Clc => "CLC", Cld => "CLD",
                    Cli => "CLI", Clv => "CLV", Cmp => "CMP", Cpx => "CPX",
                    Cpy => "CPY", Dec => "DEC", Dex => "DEX", Dey => "DEY",
                    Eor => "EOR", Inc => "INC", Inx => "INX", Iny => "INY",
                    Jmp => "JMP", Jsr => "JSR", Lda => "LDA", Ldx => "LDX",
                    Ldy => "LDY", Lsr => "LSR", Nop => "NOP", Ora => "ORA",
                    Pha => "PHA", Php => "PHP", Phx => "PHX", Phy => "PHY",
                    Pla => "PLA", Plp => "PLP", Plx => "PLX", Ply => "PLY",
                    Rol => "ROL", Ror => "ROR", Rti => "RTI", Rts => "RTS",
                    Sbc => "SBC", Sec => "SEC", Sed => "SED", Sei => "SEI",
                    Sta => "STA", Stp => "STP", Stx => "STX", Sty => "STY",
                    Stz => "STZ", Tax => "TAX", Tay => "TAY", Trb => "TRB",
                    Tsb => "TSB", Tsx => "TSX", Txa => "TXA", Txs => "TXS",
                    Tya => "TYA", Wai => "WAI",
                    Rmb(_) | Smb(_) | Bbr(_) | Bbs(_) => unreachable!(),
                };
                f.write_str(s)
            }
        }
    }
}

/// One opcode-table row.
#[derive(Debug, Clone, Copy)]
pub struct OpInfo {
    pub mnemonic: Mnemonic,
    pub mode: Mode,
    pub base_cycles: u8,
    pub min_variant: Variant,
    /// Addressing mode that sizes the NOP substitution when this row is
    /// gated above the active variant. Equals `mode` except where a WDC
    /// instruction reuses a byte pattern whose NMOS illegal form carried
    /// operand bytes.
    pub gated_mode: Mode,
}

impl OpInfo {
    const fn new(mnemonic: Mnemonic, mode: Mode, base_cycles: u8, min_variant: Variant) -> Self {
        Self {
            mnemonic,
            mode,
            base_cycles,
            min_variant,
            gated_mode: mode,
        }
    }

    /// Override the mode used for the variant-gated NOP substitution.
    const fn gated_as(self, gated_mode: Mode) -> Self {
        Self { gated_mode, ..self }
    }
}

/// Opcode metadata for all 256 byte patterns.
pub static OPCODE_TABLE: [OpInfo; 256] = {
    use Mnemonic::*;
    use Mode::*;
    use Variant::*;

    // Seed value only: every one of the 256 slots is assigned explicitly
    // below, including the undefined bytes (as sized NOP rows).
    let mut t = [OpInfo::new(Nop, Non, 1, C02); 256];

    // ---- Arithmetic -----------------------------------------------------
    t[0x69] = OpInfo::new(Adc, Imm, 2, Base);
    t[0x65] = OpInfo::new(Adc, Zpg, 3, Base);
    t[0x75] = OpInfo::new(Adc, Zpx, 4, Base);
    t[0x6D] = OpInfo::new(Adc, Abs, 4, Base);
    t[0x7D] = OpInfo::new(Adc, Abx, 4, Base);
    t[0x79] = OpInfo::new(Adc, Aby, 4, Base);
    t[0x61] = OpInfo::new(Adc, Idx, 6, Base);
    t[0x71] = OpInfo::new(Adc, Idy, 5, Base);
    t[0x72] = OpInfo::new(Adc, Idz, 5, C02);

    t[0xE9] = OpInfo::new(Sbc, Imm, 2, Base);
    t[0xE5] = OpInfo::new(Sbc, Zpg, 3, Base);
    t[0xF5] = OpInfo::new(Sbc, Zpx, 4, Base);
    t[0xED] = OpInfo::new(Sbc, Abs, 4, Base);
    t[0xFD] = OpInfo::new(Sbc, Abx, 4, Base);
    t[0xF9] = OpInfo::new(Sbc, Aby, 4, Base);
    t[0xE1] = OpInfo::new(Sbc, Idx, 6, Base);
    t[0xF1] = OpInfo::new(Sbc, Idy, 5, Base);
    t[0xF2] = OpInfo::new(Sbc, Idz, 5, C02);

    // ---- Logic ----------------------------------------------------------
    t[0x29] = OpInfo::new(And, Imm, 2, Base);
    t[0x25] = OpInfo::new(And, Zpg, 3, Base);
    t[0x35] = OpInfo::new(And, Zpx, 4, Base);
    t[0x2D] = OpInfo::new(And, Abs, 4, Base);
    t[0x3D] = OpInfo::new(And, Abx, 4, Base);
    t[0x39] = OpInfo::new(And, Aby, 4, Base);
    t[0x21] = OpInfo::new(And, Idx, 6, Base);
    t[0x31] = OpInfo::new(And, Idy, 5, Base);
    t[0x32] = OpInfo::new(And, Idz, 5, C02);

    t[0x09] = OpInfo::new(Ora, Imm, 2, Base);
    t[0x05] = OpInfo::new(Ora, Zpg, 3, Base);
    t[0x15] = OpInfo::new(Ora, Zpx, 4, Base);
    t[0x0D] = OpInfo::new(Ora, Abs, 4, Base);
    t[0x1D] = OpInfo::new(Ora, Abx, 4, Base);
    t[0x19] = OpInfo::new(Ora, Aby, 4, Base);
    t[0x01] = OpInfo::new(Ora, Idx, 6, Base);
    t[0x11] = OpInfo::new(Ora, Idy, 5, Base);
    t[0x12] = OpInfo::new(Ora, Idz, 5, C02);

    t[0x49] = OpInfo::new(Eor, Imm, 2, Base);
    t[0x45] = OpInfo::new(Eor, Zpg, 3, Base);
    t[0x55] = OpInfo::new(Eor, Zpx, 4, Base);
    t[0x4D] = OpInfo::new(Eor, Abs, 4, Base);
    t[0x5D] = OpInfo::new(Eor, Abx, 4, Base);
    t[0x59] = OpInfo::new(Eor, Aby, 4, Base);
    t[0x41] = OpInfo::new(Eor, Idx, 6, Base);
    t[0x51] = OpInfo::new(Eor, Idy, 5, Base);
    t[0x52] = OpInfo::new(Eor, Idz, 5, C02);

    t[0x24] = OpInfo::new(Bit, Zpg, 3, Base);
    t[0x2C] = OpInfo::new(Bit, Abs, 4, Base);
    t[0x34] = OpInfo::new(Bit, Zpx, 4, C02);
    t[0x3C] = OpInfo::new(Bit, Abx, 4, C02);
    t[0x89] = OpInfo::new(Bit, Imm, 2, C02);

    t[0x04] = OpInfo::new(Tsb, Zpg, 5, C02);
    t[0x0C] = OpInfo::new(Tsb, Abs, 6, C02);
    t[0x14] = OpInfo::new(Trb, Zpg, 5, C02);
    t[0x1C] = OpInfo::new(Trb, Abs, 6, C02);

    // ---- Shifts / rotates / increments ----------------------------------
    t[0x0A] = OpInfo::new(Asl, Acc, 2, Base);
    t[0x06] = OpInfo::new(Asl, Zpg, 5, Base);
    t[0x16] = OpInfo::new(Asl, Zpx, 6, Base);
    t[0x0E] = OpInfo::new(Asl, Abs, 6, Base);
    t[0x1E] = OpInfo::new(Asl, Abx, 7, Base);

    t[0x4A] = OpInfo::new(Lsr, Acc, 2, Base);
    t[0x46] = OpInfo::new(Lsr, Zpg, 5, Base);
    t[0x56] = OpInfo::new(Lsr, Zpx, 6, Base);
    t[0x4E] = OpInfo::new(Lsr, Abs, 6, Base);
    t[0x5E] = OpInfo::new(Lsr, Abx, 7, Base);

    t[0x2A] = OpInfo::new(Rol, Acc, 2, Base);
    t[0x26] = OpInfo::new(Rol, Zpg, 5, Base);
    t[0x36] = OpInfo::new(Rol, Zpx, 6, Base);
    t[0x2E] = OpInfo::new(Rol, Abs, 6, Base);
    t[0x3E] = OpInfo::new(Rol, Abx, 7, Base);

    t[0x6A] = OpInfo::new(Ror, Acc, 2, Base);
    t[0x66] = OpInfo::new(Ror, Zpg, 5, Base);
    t[0x76] = OpInfo::new(Ror, Zpx, 6, Base);
    t[0x6E] = OpInfo::new(Ror, Abs, 6, Base);
    t[0x7E] = OpInfo::new(Ror, Abx, 7, Base);

    t[0xE6] = OpInfo::new(Inc, Zpg, 5, Base);
    t[0xF6] = OpInfo::new(Inc, Zpx, 6, Base);
    t[0xEE] = OpInfo::new(Inc, Abs, 6, Base);
    t[0xFE] = OpInfo::new(Inc, Abx, 7, Base);
    t[0x1A] = OpInfo::new(Inc, Acc, 2, C02);

    t[0xC6] = OpInfo::new(Dec, Zpg, 5, Base);
    t[0xD6] = OpInfo::new(Dec, Zpx, 6, Base);
    t[0xCE] = OpInfo::new(Dec, Abs, 6, Base);
    t[0xDE] = OpInfo::new(Dec, Abx, 7, Base);
    t[0x3A] = OpInfo::new(Dec, Acc, 2, C02);

    t[0xE8] = OpInfo::new(Inx, Non, 2, Base);
    t[0xC8] = OpInfo::new(Iny, Non, 2, Base);
    t[0xCA] = OpInfo::new(Dex, Non, 2, Base);
    t[0x88] = OpInfo::new(Dey, Non, 2, Base);

    // ---- Compares -------------------------------------------------------
    t[0xC9] = OpInfo::new(Cmp, Imm, 2, Base);
    t[0xC5] = OpInfo::new(Cmp, Zpg, 3, Base);
    t[0xD5] = OpInfo::new(Cmp, Zpx, 4, Base);
    t[0xCD] = OpInfo::new(Cmp, Abs, 4, Base);
    t[0xDD] = OpInfo::new(Cmp, Abx, 4, Base);
    t[0xD9] = OpInfo::new(Cmp, Aby, 4, Base);
    t[0xC1] = OpInfo::new(Cmp, Idx, 6, Base);
    t[0xD1] = OpInfo::new(Cmp, Idy, 5, Base);
    t[0xD2] = OpInfo::new(Cmp, Idz, 5, C02);

    t[0xE0] = OpInfo::new(Cpx, Imm, 2, Base);
    t[0xE4] = OpInfo::new(Cpx, Zpg, 3, Base);
    t[0xEC] = OpInfo::new(Cpx, Abs, 4, Base);
    t[0xC0] = OpInfo::new(Cpy, Imm, 2, Base);
    t[0xC4] = OpInfo::new(Cpy, Zpg, 3, Base);
    t[0xCC] = OpInfo::new(Cpy, Abs, 4, Base);

    // ---- Loads / stores -------------------------------------------------
    t[0xA9] = OpInfo::new(Lda, Imm, 2, Base);
    t[0xA5] = OpInfo::new(Lda, Zpg, 3, Base);
    t[0xB5] = OpInfo::new(Lda, Zpx, 4, Base);
    t[0xAD] = OpInfo::new(Lda, Abs, 4, Base);
    t[0xBD] = OpInfo::new(Lda, Abx, 4, Base);
    t[0xB9] = OpInfo::new(Lda, Aby, 4, Base);
    t[0xA1] = OpInfo::new(Lda, Idx, 6, Base);
    t[0xB1] = OpInfo::new(Lda, Idy, 5, Base);
    t[0xB2] = OpInfo::new(Lda, Idz, 5, C02);

    t[0xA2] = OpInfo::new(Ldx, Imm, 2, Base);
    t[0xA6] = OpInfo::new(Ldx, Zpg, 3, Base);
    t[0xB6] = OpInfo::new(Ldx, Zpy, 4, Base);
    t[0xAE] = OpInfo::new(Ldx, Abs, 4, Base);
    t[0xBE] = OpInfo::new(Ldx, Aby, 4, Base);

    t[0xA0] = OpInfo::new(Ldy, Imm, 2, Base);
    t[0xA4] = OpInfo::new(Ldy, Zpg, 3, Base);
    t[0xB4] = OpInfo::new(Ldy, Zpx, 4, Base);
    t[0xAC] = OpInfo::new(Ldy, Abs, 4, Base);
    t[0xBC] = OpInfo::new(Ldy, Abx, 4, Base);

    t[0x85] = OpInfo::new(Sta, Zpg, 3, Base);
    t[0x95] = OpInfo::new(Sta, Zpx, 4, Base);
    t[0x8D] = OpInfo::new(Sta, Abs, 4, Base);
    t[0x9D] = OpInfo::new(Sta, Abx, 5, Base);
    t[0x99] = OpInfo::new(Sta, Aby, 5, Base);
    t[0x81] = OpInfo::new(Sta, Idx, 6, Base);
    t[0x91] = OpInfo::new(Sta, Idy, 6, Base);
    t[0x92] = OpInfo::new(Sta, Idz, 5, C02);

    t[0x86] = OpInfo::new(Stx, Zpg, 3, Base);
    t[0x96] = OpInfo::new(Stx, Zpy, 4, Base);
    t[0x8E] = OpInfo::new(Stx, Abs, 4, Base);
    t[0x84] = OpInfo::new(Sty, Zpg, 3, Base);
    t[0x94] = OpInfo::new(Sty, Zpx, 4, Base);
    t[0x8C] = OpInfo::new(Sty, Abs, 4, Base);

    t[0x64] = OpInfo::new(Stz, Zpg, 3, C02);
    t[0x74] = OpInfo::new(Stz, Zpx, 4, C02);
    t[0x9C] = OpInfo::new(Stz, Abs, 4, C02);
    t[0x9E] = OpInfo::new(Stz, Abx, 5, C02);

    // ---- Transfers ------------------------------------------------------
    t[0xAA] = OpInfo::new(Tax, Non, 2, Base);
    t[0xA8] = OpInfo::new(Tay, Non, 2, Base);
    t[0x8A] = OpInfo::new(Txa, Non, 2, Base);
    t[0x98] = OpInfo::new(Tya, Non, 2, Base);
    t[0xBA] = OpInfo::new(Tsx, Non, 2, Base);
    t[0x9A] = OpInfo::new(Txs, Non, 2, Base);

    // ---- Stack ----------------------------------------------------------
    t[0x48] = OpInfo::new(Pha, Non, 3, Base);
    t[0x08] = OpInfo::new(Php, Non, 3, Base);
    t[0x68] = OpInfo::new(Pla, Non, 4, Base);
    t[0x28] = OpInfo::new(Plp, Non, 4, Base);
    t[0xDA] = OpInfo::new(Phx, Non, 3, C02);
    t[0x5A] = OpInfo::new(Phy, Non, 3, C02);
    t[0xFA] = OpInfo::new(Plx, Non, 4, C02);
    t[0x7A] = OpInfo::new(Ply, Non, 4, C02);

    // ---- Flag direct ----------------------------------------------------
    t[0x18] = OpInfo::new(Clc, Non, 2, Base);
    t[0x38] = OpInfo::new(Sec, Non, 2, Base);
    t[0x58] = OpInfo::new(Cli, Non, 2, Base);
    t[0x78] = OpInfo::new(Sei, Non, 2, Base);
    t[0xB8] = OpInfo::new(Clv, Non, 2, Base);
    t[0xD8] = OpInfo::new(Cld, Non, 2, Base);
    t[0xF8] = OpInfo::new(Sed, Non, 2, Base);

    // ---- Control flow ---------------------------------------------------
    t[0x4C] = OpInfo::new(Jmp, Abs, 3, Base);
    t[0x6C] = OpInfo::new(Jmp, Ind, 5, Base);
    t[0x7C] = OpInfo::new(Jmp, Iax, 6, C02);
    t[0x20] = OpInfo::new(Jsr, Abs, 6, Base);
    t[0x60] = OpInfo::new(Rts, Non, 6, Base);
    t[0x40] = OpInfo::new(Rti, Non, 6, Base);
    t[0x00] = OpInfo::new(Brk, Non, 7, Base);

    // ---- Branches -------------------------------------------------------
    t[0x10] = OpInfo::new(Bpl, Rel, 2, Base);
    t[0x30] = OpInfo::new(Bmi, Rel, 2, Base);
    t[0x50] = OpInfo::new(Bvc, Rel, 2, Base);
    t[0x70] = OpInfo::new(Bvs, Rel, 2, Base);
    t[0x90] = OpInfo::new(Bcc, Rel, 2, Base);
    t[0xB0] = OpInfo::new(Bcs, Rel, 2, Base);
    t[0xD0] = OpInfo::new(Bne, Rel, 2, Base);
    t[0xF0] = OpInfo::new(Beq, Rel, 2, Base);
    t[0x80] = OpInfo::new(Bra, Rel, 2, C02);

    // ---- NOP ------------------------------------------------------------
    t[0xEA] = OpInfo::new(Nop, Non, 2, Base);

    // Undefined bytes execute as NOP rows gated at C02. Each carries the
    // addressing mode (and so the operand length) of the NMOS illegal
    // opcode occupying the slot, per the sized-no-op model.
    t[0x02] = OpInfo::new(Nop, Imm, 2, C02);
    t[0x22] = OpInfo::new(Nop, Imm, 2, C02);
    t[0x42] = OpInfo::new(Nop, Imm, 2, C02);
    t[0x62] = OpInfo::new(Nop, Imm, 2, C02);
    t[0x82] = OpInfo::new(Nop, Imm, 2, C02);
    t[0xC2] = OpInfo::new(Nop, Imm, 2, C02);
    t[0xE2] = OpInfo::new(Nop, Imm, 2, C02);
    t[0x44] = OpInfo::new(Nop, Zpg, 3, C02);
    t[0x54] = OpInfo::new(Nop, Zpx, 4, C02);
    t[0xD4] = OpInfo::new(Nop, Zpx, 4, C02);
    t[0xF4] = OpInfo::new(Nop, Zpx, 4, C02);
    t[0x5C] = OpInfo::new(Nop, Abs, 8, C02);
    t[0xDC] = OpInfo::new(Nop, Abs, 4, C02);
    t[0xFC] = OpInfo::new(Nop, Abs, 4, C02);

    // $x3 column: the NMOS RMW-combo illegals (SLO/RLA/SRE/RRA/DCP/ISC in
    // (zp,X) and (zp),Y forms) plus SAX/AHX/LAX.
    t[0x03] = OpInfo::new(Nop, Idx, 8, C02);
    t[0x13] = OpInfo::new(Nop, Idy, 8, C02);
    t[0x23] = OpInfo::new(Nop, Idx, 8, C02);
    t[0x33] = OpInfo::new(Nop, Idy, 8, C02);
    t[0x43] = OpInfo::new(Nop, Idx, 8, C02);
    t[0x53] = OpInfo::new(Nop, Idy, 8, C02);
    t[0x63] = OpInfo::new(Nop, Idx, 8, C02);
    t[0x73] = OpInfo::new(Nop, Idy, 8, C02);
    t[0x83] = OpInfo::new(Nop, Idx, 6, C02);
    t[0x93] = OpInfo::new(Nop, Idy, 6, C02);
    t[0xA3] = OpInfo::new(Nop, Idx, 6, C02);
    t[0xB3] = OpInfo::new(Nop, Idy, 5, C02);
    t[0xC3] = OpInfo::new(Nop, Idx, 8, C02);
    t[0xD3] = OpInfo::new(Nop, Idy, 8, C02);
    t[0xE3] = OpInfo::new(Nop, Idx, 8, C02);
    t[0xF3] = OpInfo::new(Nop, Idy, 8, C02);

    // $xB column: immediate-mode illegals (ANC/ALR/ARR/XAA/LAX/AXS/SBC)
    // interleaved with abs,Y RMW combos (SLO/RLA/SRE/RRA/TAS/LAS/DCP/ISC).
    // 0xCB and 0xDB are assigned below as WAI/STP with a gated override.
    t[0x0B] = OpInfo::new(Nop, Imm, 2, C02);
    t[0x1B] = OpInfo::new(Nop, Aby, 7, C02);
    t[0x2B] = OpInfo::new(Nop, Imm, 2, C02);
    t[0x3B] = OpInfo::new(Nop, Aby, 7, C02);
    t[0x4B] = OpInfo::new(Nop, Imm, 2, C02);
    t[0x5B] = OpInfo::new(Nop, Aby, 7, C02);
    t[0x6B] = OpInfo::new(Nop, Imm, 2, C02);
    t[0x7B] = OpInfo::new(Nop, Aby, 7, C02);
    t[0x8B] = OpInfo::new(Nop, Imm, 2, C02);
    t[0x9B] = OpInfo::new(Nop, Aby, 5, C02);
    t[0xAB] = OpInfo::new(Nop, Imm, 2, C02);
    t[0xBB] = OpInfo::new(Nop, Aby, 4, C02);
    t[0xEB] = OpInfo::new(Nop, Imm, 2, C02);
    t[0xFB] = OpInfo::new(Nop, Aby, 7, C02);

    // ---- Rockwell bit ops (zero page) -----------------------------------
    t[0x07] = OpInfo::new(Rmb(0), Zpg, 5, Rockwell);
    t[0x17] = OpInfo::new(Rmb(1), Zpg, 5, Rockwell);
    t[0x27] = OpInfo::new(Rmb(2), Zpg, 5, Rockwell);
    t[0x37] = OpInfo::new(Rmb(3), Zpg, 5, Rockwell);
    t[0x47] = OpInfo::new(Rmb(4), Zpg, 5, Rockwell);
    t[0x57] = OpInfo::new(Rmb(5), Zpg, 5, Rockwell);
    t[0x67] = OpInfo::new(Rmb(6), Zpg, 5, Rockwell);
    t[0x77] = OpInfo::new(Rmb(7), Zpg, 5, Rockwell);
    t[0x87] = OpInfo::new(Smb(0), Zpg, 5, Rockwell);
    t[0x97] = OpInfo::new(Smb(1), Zpg, 5, Rockwell);
    t[0xA7] = OpInfo::new(Smb(2), Zpg, 5, Rockwell);
    t[0xB7] = OpInfo::new(Smb(3), Zpg, 5, Rockwell);
    t[0xC7] = OpInfo::new(Smb(4), Zpg, 5, Rockwell);
    t[0xD7] = OpInfo::new(Smb(5), Zpg, 5, Rockwell);
    t[0xE7] = OpInfo::new(Smb(6), Zpg, 5, Rockwell);
    t[0xF7] = OpInfo::new(Smb(7), Zpg, 5, Rockwell);

    t[0x0F] = OpInfo::new(Bbr(0), Zpr, 5, Rockwell);
    t[0x1F] = OpInfo::new(Bbr(1), Zpr, 5, Rockwell);
    t[0x2F] = OpInfo::new(Bbr(2), Zpr, 5, Rockwell);
    t[0x3F] = OpInfo::new(Bbr(3), Zpr, 5, Rockwell);
    t[0x4F] = OpInfo::new(Bbr(4), Zpr, 5, Rockwell);
    t[0x5F] = OpInfo::new(Bbr(5), Zpr, 5, Rockwell);
    t[0x6F] = OpInfo::new(Bbr(6), Zpr, 5, Rockwell);
    t[0x7F] = OpInfo::new(Bbr(7), Zpr, 5, Rockwell);
    t[0x8F] = OpInfo::new(Bbs(0), Zpr, 5, Rockwell);
    t[0x9F] = OpInfo::new(Bbs(1), Zpr, 5, Rockwell);
    t[0xAF] = OpInfo::new(Bbs(2), Zpr, 5, Rockwell);
    t[0xBF] = OpInfo::new(Bbs(3), Zpr, 5, Rockwell);
    t[0xCF] = OpInfo::new(Bbs(4), Zpr, 5, Rockwell);
    t[0xDF] = OpInfo::new(Bbs(5), Zpr, 5, Rockwell);
    t[0xEF] = OpInfo::new(Bbs(6), Zpr, 5, Rockwell);
    t[0xFF] = OpInfo::new(Bbs(7), Zpr, 5, Rockwell);

    // ---- WDC quiescent states -------------------------------------------
    // Below Wdc these byte patterns gate to NOPs sized like the NMOS
    // illegals they shadow: AXS #imm (1 operand byte), DCP abs,Y (2).
    t[0xCB] = OpInfo::new(Wai, Non, 3, Wdc).gated_as(Imm);
    t[0xDB] = OpInfo::new(Stp, Non, 3, Wdc).gated_as(Aby);

    t
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documented_rows_spot_check() {
        let adc = &OPCODE_TABLE[0x69];
        assert_eq!(adc.mnemonic, Mnemonic::Adc);
        assert_eq!(adc.mode, Mode::Imm);
        assert_eq!(adc.base_cycles, 2);
        assert_eq!(adc.min_variant, Variant::Base);

        let jmp_ind = &OPCODE_TABLE[0x6C];
        assert_eq!(jmp_ind.mode, Mode::Ind);
        assert_eq!(jmp_ind.base_cycles, 5);

        let sta_abx = &OPCODE_TABLE[0x9D];
        assert_eq!(sta_abx.base_cycles, 5);
    }

    #[test]
    fn cmos_rows_are_gated() {
        assert_eq!(OPCODE_TABLE[0x80].mnemonic, Mnemonic::Bra);
        assert_eq!(OPCODE_TABLE[0x80].min_variant, Variant::C02);
        assert_eq!(OPCODE_TABLE[0xCB].min_variant, Variant::Wdc);
        assert_eq!(OPCODE_TABLE[0x07].min_variant, Variant::Rockwell);
    }

    #[test]
    fn rockwell_bit_index_comes_from_high_nibble() {
        for n in 0..8u8 {
            assert_eq!(
                OPCODE_TABLE[(0x07 + (n << 4)) as usize].mnemonic,
                Mnemonic::Rmb(n)
            );
            assert_eq!(
                OPCODE_TABLE[(0x87 + (n << 4)) as usize].mnemonic,
                Mnemonic::Smb(n)
            );
            assert_eq!(
                OPCODE_TABLE[(0x0F + (n << 4)) as usize].mnemonic,
                Mnemonic::Bbr(n)
            );
            assert_eq!(
                OPCODE_TABLE[(0x8F + (n << 4)) as usize].mnemonic,
                Mnemonic::Bbs(n)
            );
        }
    }

    #[test]
    fn undefined_bytes_are_sized_nop_rows() {
        // The $x3 column mirrors the (zp,X) / (zp),Y NMOS illegal forms.
        for &op in &[0x03u8, 0x23, 0x43, 0x63, 0x83, 0xA3, 0xC3, 0xE3] {
            let e = &OPCODE_TABLE[op as usize];
            assert_eq!(e.mnemonic, Mnemonic::Nop, "{op:#04x}");
            assert_eq!(e.mode, Mode::Idx, "{op:#04x}");
            assert_eq!(e.min_variant, Variant::C02, "{op:#04x}");
        }
        for &op in &[0x13u8, 0x33, 0x53, 0x73, 0x93, 0xB3, 0xD3, 0xF3] {
            assert_eq!(OPCODE_TABLE[op as usize].mode, Mode::Idy, "{op:#04x}");
        }

        // $xB alternates immediate and abs,Y illegal forms.
        for &op in &[0x0Bu8, 0x2B, 0x4B, 0x6B, 0x8B, 0xAB, 0xEB] {
            assert_eq!(OPCODE_TABLE[op as usize].mode, Mode::Imm, "{op:#04x}");
        }
        for &op in &[0x1Bu8, 0x3B, 0x5B, 0x7B, 0x9B, 0xBB, 0xFB] {
            assert_eq!(OPCODE_TABLE[op as usize].mode, Mode::Aby, "{op:#04x}");
        }

        let e = &OPCODE_TABLE[0x44];
        assert_eq!(e.mode, Mode::Zpg);
        assert_eq!(e.base_cycles, 3);
    }

    #[test]
    fn gated_mode_follows_mode_except_wai_stp() {
        for (op, e) in OPCODE_TABLE.iter().enumerate() {
            match op {
                0xCB | 0xDB => continue,
                _ => assert_eq!(e.gated_mode, e.mode, "{op:#04x}"),
            }
        }
        // WAI/STP shadow AXS #imm and DCP abs,Y on the earlier parts.
        assert_eq!(OPCODE_TABLE[0xCB].mode, Mode::Non);
        assert_eq!(OPCODE_TABLE[0xCB].gated_mode, Mode::Imm);
        assert_eq!(OPCODE_TABLE[0xDB].mode, Mode::Non);
        assert_eq!(OPCODE_TABLE[0xDB].gated_mode, Mode::Aby);
    }

    #[test]
    fn every_slot_sizes_its_nmos_operand_bytes() {
        // Spot-check the operand lengths the sized-NOP substitution relies
        // on, against the NMOS illegal opcode map.
        let len = |op: usize| OPCODE_TABLE[op].gated_mode.operand_len();
        assert_eq!(len(0x03), 1); // SLO (zp,X)
        assert_eq!(len(0x1B), 2); // SLO abs,Y
        assert_eq!(len(0x8B), 1); // XAA #imm
        assert_eq!(len(0xBB), 2); // LAS abs,Y
        assert_eq!(len(0xCB), 1); // AXS #imm
        assert_eq!(len(0xDB), 2); // DCP abs,Y
        assert_eq!(len(0xEB), 1); // SBC #imm
    }

    #[test]
    fn mnemonic_display() {
        assert_eq!(Mnemonic::Lda.to_string(), "LDA");
        assert_eq!(Mnemonic::Smb(3).to_string(), "SMB3");
        assert_eq!(Mnemonic::Bbr(7).to_string(), "BBR7");
    }
}
