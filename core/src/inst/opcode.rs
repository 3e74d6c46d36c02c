/// RISC-4 instruction format types
///
/// There are five fixed layouts that every 16-bit instruction word follows.
/// The same field is always in the same bit position: the opcode is always
/// the top nibble, and rd (where present) is always bits [11:8].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum InstructionFormat {
    /// R-type: register-register operations (add, sub, slt, ext group)
    ///
    /// Instructions of this type are encoded as follows:
    /*
    ------------------------------------------
    R-type | opcode |  rd   |  rs   |  rt     |
           | 15-12  | 11-8  | 7-4   | 3-0     |
    ------------------------------------------
           | opcode |  rd   |  rs   |  funct  | (EXT opcode 0x7)
    */

    /// Observe that the EXT group reuses the rt field as a funct selector.
    R,
    /// I-type: immediate operations (addi, andi, ori, slti, shf)
    ///
    /// Instructions of this type are encoded as follows:
    /*
    ------------------------------------------
    I-type | opcode |  rd   |  rs   |  imm4   |
           | 15-12  | 11-8  | 7-4   | 3-0     |
    ------------------------------------------
    */

    /// Observe that shf sits in the register-operation opcode range
    /// (0x0-0x7) but is grouped here: its low nibble is an immediate
    /// shift spec (direction bit + amount), not a third register. The
    /// two layouts are bit-identical, so nothing downstream depends on
    /// the grouping.
    I,
    /// M-type: memory operations (lw, sw)
    ///
    /// Instructions of this type are encoded as follows:
    /*
    ------------------------------------------
    M-type | opcode | rd/rs | base  | offset4 |
           | 15-12  | 11-8  | 7-4   | 3-0     |
    ------------------------------------------
    */
    M,
    /// Branch: condition-gated pc-relative transfers (beq, bne, bcs, bcc)
    ///
    /// Instructions of this type are encoded as follows:
    /*
    ------------------------------------------
    Branch | 0xE    | cond  |    offset8      |
           | 15-12  | 11-8  |    7-0          |
    ------------------------------------------
    */
    B,
    /// J-type: absolute jumps (j, jal)
    ///
    /// Instructions of this type are encoded as follows:
    /*
    ------------------------------------------
    J-type | 0xF    |       target12          |
           | 15-12  |       11-0              |
    ------------------------------------------
    */

    /// Observe that bit 11 of the target field selects jal (1) vs j (0),
    /// which is why the callable range of jal is only 11 bits.
    J,
}

/// RISC-4 opcodes (bits [15:12] of every instruction word)
///
/// All 16 values of the 4-bit opcode space are assigned. An opcode maps to
/// exactly one operation, except EXT (0x7) which selects among four
/// sub-operations via its funct field, and 0xF which splits into J/JAL on
/// bit 11 of the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Opcode {
    /// Register add
    Add = 0x0,

    /// Register subtract
    Sub = 0x1,

    /// Bitwise and
    And = 0x2,

    /// Bitwise or
    Or = 0x3,

    /// Bitwise xor
    Xor = 0x4,

    /// Set if signed less-than
    Slt = 0x5,

    /// Shift left/right by 0-7
    Shf = 0x6,

    /// Extended group (adc, sbb, neg, jr) selected by funct
    Ext = 0x7,

    /// Add immediate (signed imm4)
    Addi = 0x8,

    /// And immediate (literal imm4)
    Andi = 0x9,

    /// Or immediate (literal imm4)
    Ori = 0xA,

    /// Set if signed less-than immediate (signed imm4)
    Slti = 0xB,

    /// Load nibble from memory
    Lw = 0xC,

    /// Store nibble to memory
    Sw = 0xD,

    /// Conditional pc-relative branch
    Branch = 0xE,

    /// Absolute jump / jump-and-link
    Jump = 0xF,
}

impl Opcode {
    /// Convert from u8 to Opcode enum
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0x0 => Some(Opcode::Add),
            0x1 => Some(Opcode::Sub),
            0x2 => Some(Opcode::And),
            0x3 => Some(Opcode::Or),
            0x4 => Some(Opcode::Xor),
            0x5 => Some(Opcode::Slt),
            0x6 => Some(Opcode::Shf),
            0x7 => Some(Opcode::Ext),
            0x8 => Some(Opcode::Addi),
            0x9 => Some(Opcode::Andi),
            0xA => Some(Opcode::Ori),
            0xB => Some(Opcode::Slti),
            0xC => Some(Opcode::Lw),
            0xD => Some(Opcode::Sw),
            0xE => Some(Opcode::Branch),
            0xF => Some(Opcode::Jump),
            _ => None,
        }
    }
}

/// Branch condition codes (bits [11:8] of a branch word)
///
/// Only the low four values are defined. A condition value of 4 or above is
/// reserved and never satisfied; the decoder surfaces it as `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum BranchCond {
    /// Branch if equal (Z set)
    Beq = 0x0,

    /// Branch if not equal (Z clear)
    Bne = 0x1,

    /// Branch if carry set (C set)
    Bcs = 0x2,

    /// Branch if carry clear (C clear)
    Bcc = 0x3,
}

impl BranchCond {
    /// Convert from u8 to BranchCond enum
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0x0 => Some(BranchCond::Beq),
            0x1 => Some(BranchCond::Bne),
            0x2 => Some(BranchCond::Bcs),
            0x3 => Some(BranchCond::Bcc),
            _ => None,
        }
    }
}

/// EXT group function codes (bits [3:0] of an EXT word)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExtFunct {
    /// Add with carry-in
    Adc = 0x0,

    /// Subtract with borrow-in
    Sbb = 0x1,

    /// Two's-complement negate
    Neg = 0x2,

    /// Jump through the return-address register triple
    Jr = 0x3,
}

impl ExtFunct {
    /// Convert from u8 to ExtFunct enum
    pub fn from_bits(bits: u8) -> Option<Self> {
        match bits {
            0x0 => Some(ExtFunct::Adc),
            0x1 => Some(ExtFunct::Sbb),
            0x2 => Some(ExtFunct::Neg),
            0x3 => Some(ExtFunct::Jr),
            _ => None,
        }
    }
}

/// Shift direction for SHF (bit 3 of its imm4 field)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShiftDir {
    Left,
    Right,
}
