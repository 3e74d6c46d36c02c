//! RISC-4 instruction decoder
//!
//! The public API of this module is `decode_instruction` and the sign
//! extension helpers.

use crate::inst::{
    opcode::{BranchCond, ExtFunct, Opcode, ShiftDir},
    DecodeError, Instruction,
};

/// Bit masks for field extraction
const MASK1: u16 = 0b1; // 1-bit mask
const MASK4: u16 = 0b1111; // 4-bit mask
const MASK8: u16 = 0b1111_1111; // 8-bit mask
const MASK12: u16 = 0b1111_1111_1111; // 12-bit mask

/// Sign-extend a value of the specified bit width to i32
pub fn sign_extend(value: u16, width: u8) -> i32 {
    let sign_bit = 1u32 << (width - 1);
    let max_value = 1u32 << width;

    if (sign_bit & value as u32) != 0 {
        value as i32 - max_value as i32
    } else {
        value as i32
    }
}

/// Sign-extend a 4-bit immediate or offset to i32
pub fn sign_extend_4bit(value: u16) -> i32 {
    sign_extend(value & MASK4, 4)
}

/// Sign-extend an 8-bit branch offset to i32
pub fn sign_extend_8bit(value: u16) -> i32 {
    sign_extend(value & MASK8, 8)
}

/// Parsed fields from a 16-bit RISC-4 instruction
///
/// This can be seen as a union of all five formats; the decoder picks the
/// relevant fields based on the opcode.
///
/// Note: This does mean that redundant work is being done, for example the
/// 12-bit target is extracted for every word when it is only relevant for
/// jumps. Bitwise operations are cheap, so this keeps the decoding
/// procedure simple.
#[derive(Debug, Clone, PartialEq)]
struct EncodedInstruction {
    /// Original 16-bit instruction word
    raw: u16,

    /// Opcode field (bits [15:12]) as raw value
    opcode_raw: u8,

    /// Opcode as enum (if recognized)
    opcode: Option<Opcode>,

    /// Destination register, or source register for stores (bits [11:8])
    rd: u8,

    /// Source register / base register (bits [7:4])
    rs: u8,

    /// Second source register / funct / imm4 / offset4 (bits [3:0])
    rt: u8,

    /// I/M-type immediate (bits [3:0], sign-extended)
    imm4: i32,

    /// Branch condition field (bits [11:8])
    cond: u8,

    /// Branch offset (bits [7:0], sign-extended, in instruction units)
    offset8: i32,

    /// Jump target (bits [11:0], instruction index)
    target12: u16,
}

impl EncodedInstruction {
    /// Parse all possible fields from a 16-bit instruction word
    fn new(raw: u16) -> Self {
        /*
        Below are the five instruction formats that all RISC-4 words fit
        into. The same field is always in the same bit position, i.e. rd
        is always bits 11 to 8 if it is present.

        R-type | opcode |  rd   |  rs   |  rt     |
               | 15-12  | 11-8  | 7-4   | 3-0     |
        -------------------------------------------

        I-type | opcode |  rd   |  rs   |  imm4   |
               | 15-12  | 11-8  | 7-4   | 3-0     |
        -------------------------------------------

        M-type | opcode | rd/rs | base  | offset4 |
               | 15-12  | 11-8  | 7-4   | 3-0     |
        -------------------------------------------

        Branch | 0xE    | cond  |    offset8      |
               | 15-12  | 11-8  |    7-0          |
        -------------------------------------------

        J-type | 0xF    |       target12          |
               | 15-12  |       11-0              |
        -------------------------------------------
        */

        let opcode_raw = ((raw >> 12) & MASK4) as u8;
        let rd = ((raw >> 8) & MASK4) as u8;
        let rs = ((raw >> 4) & MASK4) as u8;
        let rt = (raw & MASK4) as u8;

        let opcode = Opcode::from_bits(opcode_raw);

        let imm4 = sign_extend_4bit(raw);
        let cond = rd;
        let offset8 = sign_extend_8bit(raw);
        let target12 = raw & MASK12;

        Self { raw, opcode_raw, opcode, rd, rs, rt, imm4, cond, offset8, target12 }
    }
}

/// Decode a 16-bit RISC-4 instruction
pub fn decode_instruction(bits: u16) -> Result<Instruction, DecodeError> {
    // Parse all instruction fields
    let e = EncodedInstruction::new(bits);

    // Decode based on opcode enum
    match e.opcode {
        Some(Opcode::Add) => Ok(Instruction::Add { rd: e.rd, rs: e.rs, rt: e.rt }),
        Some(Opcode::Sub) => Ok(Instruction::Sub { rd: e.rd, rs: e.rs, rt: e.rt }),
        Some(Opcode::And) => Ok(Instruction::And { rd: e.rd, rs: e.rs, rt: e.rt }),
        Some(Opcode::Or) => Ok(Instruction::Or { rd: e.rd, rs: e.rs, rt: e.rt }),
        Some(Opcode::Xor) => Ok(Instruction::Xor { rd: e.rd, rs: e.rs, rt: e.rt }),
        Some(Opcode::Slt) => Ok(Instruction::Slt { rd: e.rd, rs: e.rs, rt: e.rt }),
        Some(Opcode::Shf) => Ok(decode_shift(&e)),
        Some(Opcode::Ext) => decode_ext(&e),
        Some(Opcode::Addi) => Ok(Instruction::Addi { rd: e.rd, rs: e.rs, imm: e.imm4 }),
        Some(Opcode::Andi) => Ok(Instruction::Andi { rd: e.rd, rs: e.rs, imm4: e.rt }),
        Some(Opcode::Ori) => Ok(Instruction::Ori { rd: e.rd, rs: e.rs, imm4: e.rt }),
        Some(Opcode::Slti) => Ok(Instruction::Slti { rd: e.rd, rs: e.rs, imm: e.imm4 }),
        Some(Opcode::Lw) => Ok(Instruction::Lw { rd: e.rd, base: e.rs, offset: e.imm4 }),
        Some(Opcode::Sw) => Ok(Instruction::Sw { rs: e.rd, base: e.rs, offset: e.imm4 }),
        Some(Opcode::Branch) => {
            Ok(Instruction::Branch { cond: BranchCond::from_bits(e.cond), offset: e.offset8 })
        }
        Some(Opcode::Jump) => Ok(decode_jump(&e)),

        None => Err(DecodeError::InvalidOpcode(e.opcode_raw)),
    }
}

/// Decode SHF: direction is bit 3 of the imm4 field, magnitude bits [2:0]
fn decode_shift(e: &EncodedInstruction) -> Instruction {
    let dir = if (e.rt >> 3) & MASK1 as u8 == 0 { ShiftDir::Left } else { ShiftDir::Right };
    let amount = e.rt & 0x7;
    Instruction::Shf { rd: e.rd, rs: e.rs, dir, amount }
}

/// Decode the EXT group: adc, sbb, neg, jr selected by the funct field
fn decode_ext(e: &EncodedInstruction) -> Result<Instruction, DecodeError> {
    match ExtFunct::from_bits(e.rt) {
        Some(ExtFunct::Adc) => Ok(Instruction::Adc { rd: e.rd, rs: e.rs }),
        Some(ExtFunct::Sbb) => Ok(Instruction::Sbb { rd: e.rd, rs: e.rs }),
        Some(ExtFunct::Neg) => Ok(Instruction::Neg { rd: e.rd, rs: e.rs }),
        Some(ExtFunct::Jr) => Ok(Instruction::Jr),
        None => Err(DecodeError::InvalidFunction(e.rt)),
    }
}

/// Decode opcode 0xF: bit 11 of the target field selects jal vs j
fn decode_jump(e: &EncodedInstruction) -> Instruction {
    let is_jal = (e.raw >> 11) & MASK1 != 0;
    if is_jal {
        Instruction::Jal { target: e.target12 }
    } else {
        Instruction::Jump { target: e.target12 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sign_extend() {
        // Positive boundary
        assert_eq!(sign_extend_4bit(0x7), 7);
        assert_eq!(sign_extend_8bit(0x7F), 127);

        // Negative boundary (sign bit set)
        assert_eq!(sign_extend_4bit(0x8), -8);
        assert_eq!(sign_extend_4bit(0xF), -1);
        assert_eq!(sign_extend_8bit(0x80), -128);
        assert_eq!(sign_extend_8bit(0xFF), -1);
    }

    #[test]
    fn test_decode_r_type() {
        // add r6, r2, r3
        let inst = decode_instruction(0x0623).unwrap();
        assert_eq!(inst, Instruction::Add { rd: 6, rs: 2, rt: 3 });

        // sub r7, r10, r11
        let inst = decode_instruction(0x17AB).unwrap();
        assert_eq!(inst, Instruction::Sub { rd: 7, rs: 10, rt: 11 });
    }

    #[test]
    fn test_decode_i_type_signed_vs_literal() {
        // addi r14, r14, -1 (imm4 = 0xF)
        let inst = decode_instruction(0x8EEF).unwrap();
        assert_eq!(inst, Instruction::Addi { rd: 14, rs: 14, imm: -1 });

        // ori r14, r0, 0xF keeps the literal value
        let inst = decode_instruction(0xAE0F).unwrap();
        assert_eq!(inst, Instruction::Ori { rd: 14, rs: 0, imm4: 0xF });
    }

    #[test]
    fn test_decode_shift() {
        // shf r1, r2, left by 3 (imm4 = 0b0011)
        let inst = decode_instruction(0x6123).unwrap();
        assert_eq!(inst, Instruction::Shf { rd: 1, rs: 2, dir: ShiftDir::Left, amount: 3 });

        // shf r1, r2, right by 3 (imm4 = 0b1011)
        let inst = decode_instruction(0x612B).unwrap();
        assert_eq!(inst, Instruction::Shf { rd: 1, rs: 2, dir: ShiftDir::Right, amount: 3 });
    }

    #[test]
    fn test_decode_ext_group() {
        assert_eq!(decode_instruction(0x7640).unwrap(), Instruction::Adc { rd: 6, rs: 4 });
        assert_eq!(decode_instruction(0x7641).unwrap(), Instruction::Sbb { rd: 6, rs: 4 });
        assert_eq!(decode_instruction(0x7642).unwrap(), Instruction::Neg { rd: 6, rs: 4 });
        assert_eq!(decode_instruction(0x7003).unwrap(), Instruction::Jr);
    }

    #[test]
    fn test_decode_ext_invalid_funct() {
        for funct in 4..=0xF_u16 {
            let res = decode_instruction(0x7000 | funct);
            assert_eq!(res, Err(DecodeError::InvalidFunction(funct as u8)));
        }
    }

    #[test]
    fn test_decode_branch() {
        // beq +1
        let inst = decode_instruction(0xE001).unwrap();
        assert_eq!(inst, Instruction::Branch { cond: Some(BranchCond::Beq), offset: 1 });

        // bne -2 (offset8 = 0xFE)
        let inst = decode_instruction(0xE1FE).unwrap();
        assert_eq!(inst, Instruction::Branch { cond: Some(BranchCond::Bne), offset: -2 });

        // reserved condition decodes but is never taken
        let inst = decode_instruction(0xE701).unwrap();
        assert_eq!(inst, Instruction::Branch { cond: None, offset: 1 });
    }

    #[test]
    fn test_decode_jump_vs_jal() {
        // bit 11 clear: plain jump, full 12-bit target
        let inst = decode_instruction(0xF006).unwrap();
        assert_eq!(inst, Instruction::Jump { target: 6 });

        // bit 11 set: jal, target carries the selector bit
        let inst = decode_instruction(0xF808).unwrap();
        assert_eq!(inst, Instruction::Jal { target: 0x808 });
    }
}
