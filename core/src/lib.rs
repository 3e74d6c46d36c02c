//! RISC-4 instruction set simulator core
//!
//! Some terminology to make the rest of the crate easier to parse.
//!
//! RISC-4 is a register machine whose native word is a *nibble*: registers
//! and data memory cells hold 4-bit values. Instructions are nevertheless a
//! fixed 16 bits wide, stored in memory as big-endian byte pairs.
//!
//! Two different address units coexist:
//!     - The program counter counts in nibbles. One instruction is 4 nibbles
//!       wide, so the pc advances by 4 per fetch.
//!     - Memory is byte addressable. The byte address of an instruction is
//!       its nibble address divided by 2.
//! Mixing these two units up is the classic RISC-4 bug, which is why the
//! conversions live in one place ([`addr`]).
//!
//! **Example**
//!
//! [0000 | 0110 | 0010 | 0011]
//! [op   | rd   | rs   | rt  ]
//!
//! - The opcode is `0000`, an R-type ADD.
//! - rd is r6, rs is r2, rt is r3: `add r6, r2, r3`.
//!
//! The decoder in [`inst`] does this automatically and the machine in
//! [`machine`] executes the result.

pub mod addr;
pub mod inst;
pub mod machine;
pub mod mem;
pub mod regs;

// Re-export the main types and functions
pub use addr::*;
pub use inst::*;
pub use machine::*;
pub use mem::*;
pub use regs::*;
