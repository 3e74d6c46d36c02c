//! RISC-4 memory
//!
//! A flat byte-addressable array shared by code and data under two
//! conventions:
//!   - Code: big-endian 2-byte instruction words starting at byte 0, one
//!     word per consecutive 2-byte slot.
//!   - Data: 4-bit values stored in the low nibble of a byte. The effective
//!     address mask confines data accesses to the low 256 bytes; code may
//!     occupy the full array.

/// Default backing store size in bytes
pub const DEFAULT_MEM_SIZE: usize = 4096;

/// Smallest usable backing store: one 2-byte instruction slot
pub const MIN_MEM_SIZE: usize = 2;

/// Effective data addresses are 8 bits regardless of the backing size
pub const DATA_ADDR_MASK: u8 = 0xFF;

/// The machine's byte-addressable memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mem {
    data: Vec<u8>,
}

impl Mem {
    /// Allocate a zeroed memory of `size` bytes
    ///
    /// Sizes below [`MIN_MEM_SIZE`] are clamped up to it, so address
    /// wrapping is always defined.
    pub fn new(size: usize) -> Self {
        Self { data: vec![0; size.max(MIN_MEM_SIZE)] }
    }

    /// Backing store size in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Read one byte; the address wraps within the backing store
    pub fn read_byte(&self, addr: usize) -> u8 {
        self.data[addr % self.data.len()]
    }

    /// Write one byte; the address wraps within the backing store
    pub fn write_byte(&mut self, addr: usize, value: u8) {
        let len = self.data.len();
        self.data[addr % len] = value;
    }

    /// Read a big-endian 16-bit instruction word at a byte address
    pub fn read_word_be(&self, addr: usize) -> u16 {
        let high = self.read_byte(addr);
        let low = self.read_byte(addr + 1);
        ((high as u16) << 8) | low as u16
    }

    /// Program loader: write instruction words as big-endian byte pairs
    /// starting at byte 0, one word per consecutive 2-byte slot
    pub fn load_program(&mut self, words: &[u16]) {
        for (i, word) in words.iter().enumerate() {
            let byte_addr = i * 2;
            self.write_byte(byte_addr, (word >> 8) as u8);
            self.write_byte(byte_addr + 1, (word & 0xFF) as u8);
        }
    }

    /// Data loader: write nibble values into consecutive bytes (low nibble
    /// only) at a caller-chosen base address
    pub fn load_nibbles(&mut self, base: usize, nibbles: &[u8]) {
        for (i, nibble) in nibbles.iter().enumerate() {
            self.write_byte(base + i, nibble & 0xF);
        }
    }
}

impl Default for Mem {
    fn default() -> Self {
        Self::new(DEFAULT_MEM_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_program_loader_big_endian() {
        let mut mem = Mem::default();
        mem.load_program(&[0xA403, 0xF810]);

        assert_eq!(mem.read_byte(0), 0xA4);
        assert_eq!(mem.read_byte(1), 0x03);
        assert_eq!(mem.read_word_be(0), 0xA403);
        assert_eq!(mem.read_word_be(2), 0xF810);
    }

    #[test]
    fn test_zero_size_clamped() {
        let mut mem = Mem::new(0);
        assert_eq!(mem.len(), MIN_MEM_SIZE);

        // Accesses stay defined on the clamped store.
        mem.write_byte(5, 0xAB);
        assert_eq!(mem.read_byte(5 % MIN_MEM_SIZE), 0xAB);
    }

    #[test]
    fn test_data_loader_low_nibble() {
        let mut mem = Mem::default();
        mem.load_nibbles(0x40, &[0x7, 0x2, 0x19]);

        assert_eq!(mem.read_byte(0x40), 0x7);
        assert_eq!(mem.read_byte(0x41), 0x2);
        // Values above a nibble are masked by the loader.
        assert_eq!(mem.read_byte(0x42), 0x9);
    }
}
