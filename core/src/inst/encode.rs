//! RISC-4 instruction encoder
//!
//! The mirror image of the decoder: packs a decoded [`Instruction`] back
//! into its 16-bit word. Used by the program loader, the demo programs and
//! the tests; hand-assembled payloads are built as `Instruction` values and
//! assembled into words.

use crate::inst::{opcode::Opcode, ExtFunct, Instruction, ShiftDir};

/// Pack opcode and three nibble operands (R/I/M layouts share this shape)
fn pack(opcode: Opcode, a: u8, b: u8, c: u8) -> u16 {
    ((opcode as u16) << 12)
        | ((a as u16 & 0xF) << 8)
        | ((b as u16 & 0xF) << 4)
        | (c as u16 & 0xF)
}

/// Encode a single instruction into its 16-bit word
pub fn encode_instruction(inst: &Instruction) -> u16 {
    match *inst {
        Instruction::Add { rd, rs, rt } => pack(Opcode::Add, rd, rs, rt),
        Instruction::Sub { rd, rs, rt } => pack(Opcode::Sub, rd, rs, rt),
        Instruction::And { rd, rs, rt } => pack(Opcode::And, rd, rs, rt),
        Instruction::Or { rd, rs, rt } => pack(Opcode::Or, rd, rs, rt),
        Instruction::Xor { rd, rs, rt } => pack(Opcode::Xor, rd, rs, rt),
        Instruction::Slt { rd, rs, rt } => pack(Opcode::Slt, rd, rs, rt),
        Instruction::Shf { rd, rs, dir, amount } => {
            let dir_bit = match dir {
                ShiftDir::Left => 0,
                ShiftDir::Right => 0x8,
            };
            pack(Opcode::Shf, rd, rs, dir_bit | (amount & 0x7))
        }
        Instruction::Adc { rd, rs } => pack(Opcode::Ext, rd, rs, ExtFunct::Adc as u8),
        Instruction::Sbb { rd, rs } => pack(Opcode::Ext, rd, rs, ExtFunct::Sbb as u8),
        Instruction::Neg { rd, rs } => pack(Opcode::Ext, rd, rs, ExtFunct::Neg as u8),
        Instruction::Jr => pack(Opcode::Ext, 0, 0, ExtFunct::Jr as u8),
        Instruction::Addi { rd, rs, imm } => pack(Opcode::Addi, rd, rs, imm as u8),
        Instruction::Andi { rd, rs, imm4 } => pack(Opcode::Andi, rd, rs, imm4),
        Instruction::Ori { rd, rs, imm4 } => pack(Opcode::Ori, rd, rs, imm4),
        Instruction::Slti { rd, rs, imm } => pack(Opcode::Slti, rd, rs, imm as u8),
        Instruction::Lw { rd, base, offset } => pack(Opcode::Lw, rd, base, offset as u8),
        Instruction::Sw { rs, base, offset } => pack(Opcode::Sw, rs, base, offset as u8),
        Instruction::Branch { cond, offset } => {
            // A reserved (never-taken) condition encodes as 0xF.
            let cond_bits = cond.map_or(0xF, |c| c as u16);
            (Opcode::Branch as u16) << 12 | cond_bits << 8 | (offset as u16 & 0xFF)
        }
        Instruction::Jump { target } => (Opcode::Jump as u16) << 12 | (target & 0x7FF),
        Instruction::Jal { target } => (Opcode::Jump as u16) << 12 | 0x800 | (target & 0x7FF),
    }
}

/// Assemble a program into its instruction words
pub fn assemble(program: &[Instruction]) -> Vec<u16> {
    program.iter().map(encode_instruction).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inst::{decode_instruction, BranchCond};

    #[test]
    fn test_encode_matches_hand_assembly() {
        // ori r14, r0, 0xF → 0xAE0F
        assert_eq!(encode_instruction(&Instruction::Ori { rd: 14, rs: 0, imm4: 0xF }), 0xAE0F);

        // jal 0x08 → 0xF808 (selector bit set)
        assert_eq!(encode_instruction(&Instruction::Jal { target: 0x08 }), 0xF808);

        // jr → 0x7003
        assert_eq!(encode_instruction(&Instruction::Jr), 0x7003);

        // addi r14, r14, -1 → imm4 field 0xF
        assert_eq!(encode_instruction(&Instruction::Addi { rd: 14, rs: 14, imm: -1 }), 0x8EEF);
    }

    #[test]
    fn test_encode_decode_representative() {
        let program = [
            Instruction::Sub { rd: 7, rs: 10, rt: 11 },
            Instruction::Shf { rd: 1, rs: 2, dir: ShiftDir::Right, amount: 3 },
            Instruction::Adc { rd: 6, rs: 4 },
            Instruction::Slti { rd: 7, rs: 15, imm: 5 },
            Instruction::Sw { rs: 3, base: 8, offset: -2 },
            Instruction::Branch { cond: Some(BranchCond::Bcc), offset: -7 },
            Instruction::Jump { target: 21 },
        ];

        for inst in &program {
            assert_eq!(decode_instruction(encode_instruction(inst)).unwrap(), *inst);
        }
    }
}
