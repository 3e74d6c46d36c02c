//! RISC-4 register file and condition flags
//!
//! # Register convention
//!
//! The machine has 16 registers of 4 bits each. The ISA hardwires r0 and
//! the calling convention reserves the return-address triple; everything
//! else is convention used by the hand-assembled payloads.
//!
//! | Name       | Register | Usage                                        |
//! |------------|----------|----------------------------------------------|
//! | REG_ZERO   | r0       | Reads always as zero, writes are ignored     |
//! | REG_RA_HI  | r1       | Return address, high nibble                  |
//! | REG_RA_MID | r2       | Return address, middle nibble                |
//! | REG_RA_LO  | r3       | Return address, low nibble                   |
//! | -          | r4-r13   | General purpose                              |
//! | REG_SP_HI  | r14      | Stack pointer pair, high nibble (convention) |
//! | REG_SP_LO  | r15      | Stack pointer pair, low nibble (convention)  |
//!
//! The return-address triple is the machine's entire calling convention:
//! there is no hardware call stack, so recursive callers save and restore
//! r1:r2:r3 to their own frame via lw/sw before a nested jal.

/// Number of architectural registers
pub const REG_COUNT: usize = 16;

/// Mask for a 4-bit register value
pub const NIBBLE_MASK: u8 = 0xF;

// Register index definitions
pub const REG_ZERO: u8 = 0;
pub const REG_RA_HI: u8 = 1;
pub const REG_RA_MID: u8 = 2;
pub const REG_RA_LO: u8 = 3;
pub const REG_SP_HI: u8 = 14;
pub const REG_SP_LO: u8 = 15;

/// The carry and zero condition flags
///
/// Each flag is overwritten by the flag-update rule of the most recently
/// executed flag-affecting instruction; nothing clears them between
/// instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags {
    /// Carry / borrow-out flag
    pub c: bool,
    /// Zero-result flag
    pub z: bool,
}

/// The 16 x 4-bit register file
///
/// Register 0 always reads as zero. Reads are not special-cased: the only
/// mutation path refuses to write index 0, and the slot is zero at reset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [u8; REG_COUNT],
}

impl RegisterFile {
    /// All registers zero, as at machine reset
    pub fn new() -> Self {
        Self { regs: [0; REG_COUNT] }
    }

    /// Read a register (indices 0-15 are always legal)
    pub fn read(&self, index: u8) -> u8 {
        self.regs[(index & NIBBLE_MASK) as usize]
    }

    /// Write a register, masking the value to 4 bits
    ///
    /// Writes to register 0 are silently ignored.
    pub fn write(&mut self, index: u8, value: u8) {
        let index = index & NIBBLE_MASK;
        if index != REG_ZERO {
            self.regs[index as usize] = value & NIBBLE_MASK;
        }
    }

    /// Compose an 8-bit value from the register pair (base, base+1)
    ///
    /// `base` holds the high nibble and `base+1` the low nibble. The pair
    /// index wraps within the register file, so base 15 pairs with r0.
    pub fn read_pair(&self, base: u8) -> u8 {
        let high = self.read(base);
        let low = self.read(base.wrapping_add(1) & NIBBLE_MASK);
        (high << 4) | low
    }
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_zero_write_ignored() {
        let mut regs = RegisterFile::new();
        regs.write(REG_ZERO, 0xF);
        assert_eq!(regs.read(REG_ZERO), 0);
    }

    #[test]
    fn test_values_masked_to_nibble() {
        let mut regs = RegisterFile::new();
        regs.write(5, 0x1A);
        assert_eq!(regs.read(5), 0xA);
    }

    #[test]
    fn test_read_pair_composition() {
        let mut regs = RegisterFile::new();
        regs.write(REG_SP_HI, 0x8);
        regs.write(REG_SP_LO, 0x3);
        assert_eq!(regs.read_pair(REG_SP_HI), 0x83);
    }

    #[test]
    fn test_read_pair_wraps_to_r0() {
        let mut regs = RegisterFile::new();
        regs.write(15, 0x9);
        // r15 pairs with r0, which is always zero.
        assert_eq!(regs.read_pair(15), 0x90);
    }
}
