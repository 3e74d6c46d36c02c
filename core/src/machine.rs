//! The RISC-4 machine: dispatch loop and execution units
//!
//! The machine state is the tuple (registers, flags, memory, pc). A step
//! fetches the 16-bit word at byte address pc/2, advances the pc by one
//! instruction unconditionally, decodes, and routes to the matching unit.
//! Control-flow operations overwrite the pc again after the unconditional
//! advance, so branch and call arithmetic is relative to the *next*
//! instruction.
//!
//! Each step is atomic: every handler computes its result before writing,
//! so a decode fault leaves no partial effect. The loop never self-halts;
//! an external driver decides how many steps to run.

use crate::{
    addr::NibbleAddr,
    inst::{decode_instruction, sign_extend, BranchCond, DecodeError, Instruction, ShiftDir},
    mem::{Mem, DATA_ADDR_MASK, DEFAULT_MEM_SIZE},
    regs::{Flags, RegisterFile, NIBBLE_MASK, REG_RA_HI, REG_RA_LO, REG_RA_MID},
};

/// Machine construction parameters
///
/// Kept explicit rather than module-level state; every machine instance is
/// fully described by its config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MachineConfig {
    /// Backing memory size in bytes (clamped to at least one
    /// instruction slot, see [`crate::mem::MIN_MEM_SIZE`])
    pub mem_size: usize,
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self { mem_size: DEFAULT_MEM_SIZE }
    }
}

/// A RISC-4 machine instance
///
/// Memory and registers are exclusively owned by the instance; independent
/// machines share no state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    regs: RegisterFile,
    flags: Flags,
    mem: Mem,
    pc: NibbleAddr,
}

impl Machine {
    /// Create a machine at reset: zeroed registers, flags, memory, pc
    pub fn new(config: MachineConfig) -> Self {
        Self {
            regs: RegisterFile::new(),
            flags: Flags::default(),
            mem: Mem::new(config.mem_size),
            pc: NibbleAddr::ZERO,
        }
    }

    /// Fetch the word at the current pc and advance by one instruction
    pub fn fetch(&mut self) -> u16 {
        let word = self.mem.read_word_be(self.pc.byte_addr());
        self.pc = self.pc.next_inst();
        word
    }

    /// Decode a fetched word and execute its architectural side effects
    pub fn decode_and_execute(&mut self, word: u16) -> Result<(), DecodeError> {
        let inst = decode_instruction(word)?;
        self.execute(&inst);
        Ok(())
    }

    /// One full fetch + decode + execute step
    pub fn step(&mut self) -> Result<(), DecodeError> {
        let word = self.fetch();
        self.decode_and_execute(word)
    }

    /// Execute a decoded instruction
    pub fn execute(&mut self, inst: &Instruction) {
        match *inst {
            Instruction::Add { rd, rs, rt } => {
                let wide = self.regs.read(rs) as i32 + self.regs.read(rt) as i32;
                self.write_alu(rd, wide, wide > 0xF);
            }
            Instruction::Sub { rd, rs, rt } => {
                let wide = self.regs.read(rs) as i32 - self.regs.read(rt) as i32;
                self.write_alu(rd, wide, wide < 0);
            }
            Instruction::And { rd, rs, rt } => {
                let wide = (self.regs.read(rs) & self.regs.read(rt)) as i32;
                self.write_alu(rd, wide, false);
            }
            Instruction::Or { rd, rs, rt } => {
                let wide = (self.regs.read(rs) | self.regs.read(rt)) as i32;
                self.write_alu(rd, wide, false);
            }
            Instruction::Xor { rd, rs, rt } => {
                let wide = (self.regs.read(rs) ^ self.regs.read(rt)) as i32;
                self.write_alu(rd, wide, false);
            }
            Instruction::Slt { rd, rs, rt } => {
                let result = signed_nibble(self.regs.read(rs)) < signed_nibble(self.regs.read(rt));
                self.write_alu(rd, result as i32, false);
            }
            Instruction::Shf { rd, rs, dir, amount } => self.exec_shift(rd, rs, dir, amount),
            Instruction::Adc { rd, rs } => {
                let wide =
                    self.regs.read(rd) as i32 + self.regs.read(rs) as i32 + self.flags.c as i32;
                self.write_alu(rd, wide, wide > 0xF);
            }
            Instruction::Sbb { rd, rs } => {
                let wide =
                    self.regs.read(rd) as i32 - self.regs.read(rs) as i32 - self.flags.c as i32;
                self.write_alu(rd, wide, wide < 0);
            }
            Instruction::Neg { rd, rs } => {
                let val = self.regs.read(rs);
                // A borrow occurs unless negating zero.
                self.write_alu(rd, -(val as i32), val != 0);
            }
            Instruction::Jr => self.exec_return(),
            Instruction::Addi { rd, rs, imm } => {
                let wide = self.regs.read(rs) as i32 + imm;
                // The immediate is signed, so carry covers both overflow
                // and borrow.
                self.write_alu(rd, wide, wide > 0xF || wide < 0);
            }
            Instruction::Andi { rd, rs, imm4 } => {
                let wide = (self.regs.read(rs) & imm4) as i32;
                self.write_alu(rd, wide, false);
            }
            Instruction::Ori { rd, rs, imm4 } => {
                let wide = (self.regs.read(rs) | imm4) as i32;
                self.write_alu(rd, wide, false);
            }
            Instruction::Slti { rd, rs, imm } => {
                let result = signed_nibble(self.regs.read(rs)) < imm;
                self.write_alu(rd, result as i32, false);
            }
            Instruction::Lw { rd, base, offset } => {
                let addr = self.effective_addr(base, offset);
                let value = self.mem.read_byte(addr) & NIBBLE_MASK;
                self.regs.write(rd, value);
            }
            Instruction::Sw { rs, base, offset } => {
                let addr = self.effective_addr(base, offset);
                // The whole byte is assigned, so the high nibble of the
                // target is zeroed.
                self.mem.write_byte(addr, self.regs.read(rs) & NIBBLE_MASK);
            }
            Instruction::Branch { cond, offset } => self.exec_branch(cond, offset),
            Instruction::Jump { target } => {
                self.pc = NibbleAddr::from_inst_index(target);
            }
            Instruction::Jal { target } => self.exec_call(target),
        }
    }

    /// Set C, truncate the result to a nibble, set Z, write rd
    fn write_alu(&mut self, rd: u8, wide: i32, carry: bool) {
        self.flags.c = carry;
        let result = (wide & NIBBLE_MASK as i32) as u8;
        self.flags.z = result == 0;
        self.regs.write(rd, result);
    }

    /// SHF: shift rs by `amount` in `dir`; C is the last bit shifted out,
    /// cleared when the amount is zero
    fn exec_shift(&mut self, rd: u8, rs: u8, dir: ShiftDir, amount: u8) {
        let val = self.regs.read(rs);
        let (result, carry) = match dir {
            ShiftDir::Left if amount == 0 => (val, false),
            ShiftDir::Left => {
                let wide = (val as u16) << amount;
                (((wide & NIBBLE_MASK as u16) as u8), (wide >> 4) & 1 != 0)
            }
            ShiftDir::Right if amount == 0 => (val, false),
            ShiftDir::Right => (val >> amount, (val >> (amount - 1)) & 1 != 0),
        };
        self.write_alu(rd, result as i32, carry);
    }

    /// Branch: evaluate the condition against the flags; if satisfied the
    /// pc (already advanced past the branch) moves by `offset` instructions
    fn exec_branch(&mut self, cond: Option<BranchCond>, offset: i32) {
        let taken = match cond {
            Some(BranchCond::Beq) => self.flags.z,
            Some(BranchCond::Bne) => !self.flags.z,
            Some(BranchCond::Bcs) => self.flags.c,
            Some(BranchCond::Bcc) => !self.flags.c,
            // Reserved condition codes are never satisfied.
            None => false,
        };
        if taken {
            self.pc = self.pc.branch(offset);
        }
    }

    /// JAL: capture the next instruction's index into the return-address
    /// triple, then jump to the 11-bit callable target
    fn exec_call(&mut self, target: u16) {
        let ret = self.pc.inst_index();
        self.regs.write(REG_RA_HI, ((ret >> 8) & 0xF) as u8);
        self.regs.write(REG_RA_MID, ((ret >> 4) & 0xF) as u8);
        self.regs.write(REG_RA_LO, (ret & 0xF) as u8);
        self.pc = NibbleAddr::from_inst_index(target & 0x7FF);
    }

    /// JR: reassemble the 12-bit return index from the triple and resume
    fn exec_return(&mut self) {
        let target = ((self.regs.read(REG_RA_HI) as u16) << 8)
            | ((self.regs.read(REG_RA_MID) as u16) << 4)
            | self.regs.read(REG_RA_LO) as u16;
        self.pc = NibbleAddr::from_inst_index(target & 0xFFF);
    }

    /// Effective data address from a register pair plus a signed offset,
    /// masked to the 8-bit data space
    fn effective_addr(&self, base: u8, offset: i32) -> usize {
        ((self.regs.read_pair(base) as i32 + offset) & DATA_ADDR_MASK as i32) as usize
    }

    /// Read a single register
    pub fn reg(&self, index: u8) -> u8 {
        self.regs.read(index)
    }

    /// The register file
    pub fn regs(&self) -> &RegisterFile {
        &self.regs
    }

    /// The condition flags
    pub fn flags(&self) -> Flags {
        self.flags
    }

    /// The program counter, in nibble units
    pub fn pc(&self) -> NibbleAddr {
        self.pc
    }

    /// The backing memory
    pub fn mem(&self) -> &Mem {
        &self.mem
    }

    pub fn mem_mut(&mut self) -> &mut Mem {
        &mut self.mem
    }

    /// Load instruction words at byte 0 (see [`Mem::load_program`])
    pub fn load_program(&mut self, words: &[u16]) {
        self.mem.load_program(words);
    }

    /// Load nibble data at `base` (see [`Mem::load_nibbles`])
    pub fn load_nibbles(&mut self, base: usize, nibbles: &[u8]) {
        self.mem.load_nibbles(base, nibbles);
    }

    /// Creates a human-readable string describing the machine state, for
    /// debugging purposes
    pub fn to_text(&self) -> String {
        let regs: String = (0..16).map(|i| format!("{:X}", self.regs.read(i))).collect();
        format!(
            "pc={} c={} z={} regs={}",
            self.pc, self.flags.c as u8, self.flags.z as u8, regs
        )
    }
}

impl Default for Machine {
    fn default() -> Self {
        Self::new(MachineConfig::default())
    }
}

/// Interpret a 4-bit value as signed: 8-15 denote -8..-1
fn signed_nibble(value: u8) -> i32 {
    sign_extend(value as u16, 4)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inst::assemble;

    #[test]
    fn test_fetch_advances_one_instruction() {
        let mut machine = Machine::default();
        machine.load_program(&assemble(&[
            Instruction::Ori { rd: 1, rs: 0, imm4: 0x5 },
            Instruction::Ori { rd: 2, rs: 0, imm4: 0x9 },
        ]));

        assert_eq!(machine.fetch(), 0xA105);
        assert_eq!(machine.pc().nibbles(), 4);
        assert_eq!(machine.fetch(), 0xA209);
        assert_eq!(machine.pc().nibbles(), 8);
    }

    #[test]
    fn test_step_reports_decode_fault() {
        let mut machine = Machine::default();
        // EXT with funct 9 is undefined.
        machine.load_program(&[0x7009]);

        assert_eq!(machine.step(), Err(DecodeError::InvalidFunction(9)));
        // The pc has still advanced past the faulting word.
        assert_eq!(machine.pc().nibbles(), 4);
    }

    #[test]
    fn test_signed_nibble() {
        assert_eq!(signed_nibble(0x7), 7);
        assert_eq!(signed_nibble(0x8), -8);
        assert_eq!(signed_nibble(0xF), -1);
    }
}
