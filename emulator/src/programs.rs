//! Hand-assembled demo payloads
//!
//! These exercise the whole ISA from the outside: the calling convention,
//! the software stack, multi-nibble arithmetic through the carry flag and
//! the dual address units. Branch offsets are written against the already
//! advanced pc, so an offset of 1 skips exactly one instruction.

use risc4_core::{BranchCond, Instruction, NibbleAddr, ShiftDir};

/// Byte address of the bubble-sort input array
///
/// The program image is 46 words (92 bytes), so 0x80 keeps the data clear
/// of the code while staying inside the 8-bit data space.
pub const BUBBLE_SORT_DATA_BASE: usize = 0x80;

/// Instruction index of the bubble-sort done loop (`j` to itself)
pub const BUBBLE_SORT_HALT_INDEX: u16 = 6;

/// Nibble address the bubble-sort run stops at
pub fn bubble_sort_halt_pc() -> NibbleAddr {
    NibbleAddr::from_inst_index(BUBBLE_SORT_HALT_INDEX)
}

/// Recursive bubble sort over five nibbles at [`BUBBLE_SORT_DATA_BASE`]
///
/// Register usage:
///   - r4:r5   data base pointer (high:low)
///   - r6      remaining length, the recursion parameter
///   - r8:r9   element address (high:low)
///   - r10     pass index, r11 pass limit
///   - r14:r15 software stack pointer, growing down from 0xFF
///
/// Each activation pushes r1-r3 (the return-address triple) and r10-r11
/// onto the stack, runs one compare-and-swap pass, then recurses with the
/// length reduced by one. The recursive call returns straight into the
/// epilogue. Stack adjustment rides on the ADDI borrow/carry flag so push
/// and pop stay symmetric across the low-nibble boundary.
pub fn bubble_sort() -> Vec<Instruction> {
    vec![
        // main: set up stack pointer, data pointer and length, then call
        Instruction::Ori { rd: 14, rs: 0, imm4: 0xF }, // [0]
        Instruction::Ori { rd: 15, rs: 0, imm4: 0xF }, // [1]
        Instruction::Ori { rd: 4, rs: 0, imm4: 0x8 },  // [2]
        Instruction::Ori { rd: 5, rs: 0, imm4: 0x0 },  // [3]
        Instruction::Ori { rd: 6, rs: 0, imm4: 0x5 },  // [4]
        Instruction::Jal { target: 8 },                // [5] call sort
        Instruction::Jump { target: 6 },               // [6] done loop
        Instruction::nop(),                            // [7]
        // sort: push frame (borrow from the subtract feeds the high nibble)
        Instruction::Addi { rd: 15, rs: 15, imm: -5 }, // [8]
        Instruction::Branch { cond: Some(BranchCond::Bcc), offset: 1 }, // [9]
        Instruction::Addi { rd: 14, rs: 14, imm: -1 }, // [10]
        Instruction::Sw { rs: 1, base: 14, offset: 0 }, // [11]
        Instruction::Sw { rs: 2, base: 14, offset: 1 }, // [12]
        Instruction::Sw { rs: 3, base: 14, offset: 2 }, // [13]
        Instruction::Sw { rs: 10, base: 14, offset: 3 }, // [14]
        Instruction::Sw { rs: 11, base: 14, offset: 4 }, // [15]
        // base case: length < 2 goes straight to the epilogue
        Instruction::Slti { rd: 7, rs: 6, imm: 2 },    // [16]
        Instruction::Branch { cond: Some(BranchCond::Bne), offset: 19 }, // [17]
        Instruction::Ori { rd: 10, rs: 0, imm4: 0 },   // [18] i = 0
        Instruction::Addi { rd: 11, rs: 6, imm: -1 },  // [19] limit = n-1
        // pass loop: while i < limit, compare a[i] with a[i+1]
        Instruction::Sub { rd: 7, rs: 10, rt: 11 },    // [20]
        Instruction::Branch { cond: Some(BranchCond::Bcc), offset: 13 }, // [21]
        Instruction::Add { rd: 8, rs: 4, rt: 0 },      // [22] addr hi
        Instruction::Add { rd: 9, rs: 5, rt: 10 },     // [23] addr lo + i
        Instruction::Branch { cond: Some(BranchCond::Bcc), offset: 1 }, // [24]
        Instruction::Addi { rd: 8, rs: 8, imm: 1 },    // [25] carry into hi
        Instruction::Lw { rd: 2, base: 8, offset: 0 }, // [26]
        Instruction::Lw { rd: 3, base: 8, offset: 1 }, // [27]
        Instruction::Sub { rd: 7, rs: 2, rt: 3 },      // [28]
        Instruction::Branch { cond: Some(BranchCond::Bcs), offset: 3 }, // [29]
        Instruction::Branch { cond: Some(BranchCond::Beq), offset: 2 }, // [30]
        Instruction::Sw { rs: 3, base: 8, offset: 0 }, // [31] swap
        Instruction::Sw { rs: 2, base: 8, offset: 1 }, // [32]
        Instruction::Addi { rd: 10, rs: 10, imm: 1 },  // [33]
        Instruction::Jump { target: 20 },              // [34]
        // pass done: recurse with one fewer element
        Instruction::Addi { rd: 6, rs: 6, imm: -1 },   // [35]
        Instruction::Jal { target: 8 },                // [36] returns to [37]
        // epilogue: pop frame and return
        Instruction::Lw { rd: 1, base: 14, offset: 0 }, // [37]
        Instruction::Lw { rd: 2, base: 14, offset: 1 }, // [38]
        Instruction::Lw { rd: 3, base: 14, offset: 2 }, // [39]
        Instruction::Lw { rd: 10, base: 14, offset: 3 }, // [40]
        Instruction::Lw { rd: 11, base: 14, offset: 4 }, // [41]
        Instruction::Addi { rd: 15, rs: 15, imm: 5 },  // [42]
        Instruction::Branch { cond: Some(BranchCond::Bcc), offset: 1 }, // [43]
        Instruction::Addi { rd: 14, rs: 14, imm: 1 },  // [44]
        Instruction::Jr,                               // [45]
    ]
}

/// 8-bit addition from 4-bit pieces: 0x9F + 0x23 via ADD then ADC
///
/// Leaves the high nibble of the sum in r6 and the low nibble in r1
/// (0xC2 for these inputs).
pub fn multi_nibble_add() -> Vec<Instruction> {
    vec![
        Instruction::Ori { rd: 2, rs: 0, imm4: 0x9 }, // a high
        Instruction::Ori { rd: 3, rs: 0, imm4: 0xF }, // a low
        Instruction::Ori { rd: 4, rs: 0, imm4: 0x2 }, // b high
        Instruction::Ori { rd: 5, rs: 0, imm4: 0x3 }, // b low
        Instruction::Add { rd: 6, rs: 2, rt: 0 },     // sum high = a high
        Instruction::Add { rd: 1, rs: 3, rt: 5 },     // sum low, sets C
        Instruction::Adc { rd: 6, rs: 4 },            // fold b high + C
    ]
}

/// Shift workout: walks a bit across a nibble and back
///
/// Ends with r3 holding the original value of r1 and C clear.
pub fn shift_demo() -> Vec<Instruction> {
    vec![
        Instruction::Ori { rd: 1, rs: 0, imm4: 0x1 },
        Instruction::Shf { rd: 2, rs: 1, dir: ShiftDir::Left, amount: 3 },
        Instruction::Shf { rd: 3, rs: 2, dir: ShiftDir::Right, amount: 3 },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use risc4_core::assemble;

    #[test]
    fn test_bubble_sort_image() {
        let words = assemble(&bubble_sort());
        assert_eq!(words.len(), 46);
        // The image must end below the data base.
        assert!(words.len() * 2 <= BUBBLE_SORT_DATA_BASE);
        // Spot-check the frame push and the return.
        assert_eq!(words[8], 0x8FFB);
        assert_eq!(words[36], 0xF808);
        assert_eq!(words[45], 0x7003);
    }

    #[test]
    fn test_halt_pc() {
        assert_eq!(bubble_sort_halt_pc().nibbles(), 0x18);
    }
}
