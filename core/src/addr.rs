//! RISC-4 address units
//!
//! The program counter counts in nibbles while memory is byte addressable,
//! and branch/jump arithmetic is defined in instruction units. Keeping the
//! nibble-counted quantity as its own type, with every conversion in this
//! module, is what prevents the unit-confusion bugs this ISA invites.

/// Nibbles per instruction: each instruction is 4 nibbles (2 bytes) wide
pub const NIBBLES_PER_INST: u16 = 4;

/// The pc is confined to a 12-bit nibble space, matching the 12-bit jump
/// target field.
const PC_MASK: u16 = 0xFFF;

/// A program-counter value in nibble units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct NibbleAddr(u16);

impl NibbleAddr {
    /// Address zero, the reset vector
    pub const ZERO: NibbleAddr = NibbleAddr(0);

    /// Wrap a raw nibble count
    pub fn new(nibbles: u16) -> Self {
        NibbleAddr(nibbles)
    }

    /// Convert an instruction index (jump target) to its nibble address
    pub fn from_inst_index(index: u16) -> Self {
        NibbleAddr(index.wrapping_mul(NIBBLES_PER_INST))
    }

    /// Raw nibble count
    pub fn nibbles(self) -> u16 {
        self.0
    }

    /// Byte address used for instruction fetch (2 nibbles per byte)
    pub fn byte_addr(self) -> usize {
        (self.0 / 2) as usize
    }

    /// Instruction index (4 nibbles per instruction)
    pub fn inst_index(self) -> u16 {
        self.0 / NIBBLES_PER_INST
    }

    /// Address of the next sequential instruction
    pub fn next_inst(self) -> Self {
        NibbleAddr(self.0.wrapping_add(NIBBLES_PER_INST))
    }

    /// Branch target: pc-relative by `offset` instruction units, confined
    /// to the 12-bit pc space
    pub fn branch(self, offset: i32) -> Self {
        let target = self.0 as i32 + offset * NIBBLES_PER_INST as i32;
        NibbleAddr((target & PC_MASK as i32) as u16)
    }
}

impl std::fmt::Display for NibbleAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#05x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unit_conversions() {
        let pc = NibbleAddr::from_inst_index(6);
        assert_eq!(pc.nibbles(), 0x18);
        assert_eq!(pc.byte_addr(), 12);
        assert_eq!(pc.inst_index(), 6);
    }

    #[test]
    fn test_fetch_advance() {
        let pc = NibbleAddr::ZERO;
        assert_eq!(pc.next_inst().nibbles(), 4);
        assert_eq!(pc.next_inst().next_inst().byte_addr(), 4);
    }

    #[test]
    fn test_branch_arithmetic() {
        // Offsets are relative to the already-advanced pc.
        let pc = NibbleAddr::from_inst_index(10);
        assert_eq!(pc.branch(2).inst_index(), 12);
        assert_eq!(pc.branch(-3).inst_index(), 7);

        // Confined to the 12-bit pc space.
        let pc = NibbleAddr::new(0x4);
        assert_eq!(pc.branch(-2).nibbles(), 0xFFC);
    }
}
