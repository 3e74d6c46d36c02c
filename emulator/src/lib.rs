//! RISC-4 emulator
//!
//! Drives a [`Machine`] through a bounded run: the core never self-halts,
//! so this crate owns the stop policy. A run ends when the pc lands on a
//! caller-chosen stop address or when the step budget is exhausted; a
//! decode fault ends it early with the faulting step and pc attached.
//!
//! The run loop is deterministic: the same program, data and options
//! always produce the same final state and step count.

pub mod programs;

use risc4_core::{DecodeError, Machine, MachineConfig, NibbleAddr};

/// Default step budget when the caller does not set one
pub const DEFAULT_MAX_STEPS: u64 = 5000;

/// Emulator options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmuOptions {
    /// Maximum number of steps to execute before giving up
    pub max_steps: u64,
    /// Stop when the pc reaches this address (checked before each fetch,
    /// but never before the first step, so a program may start at its own
    /// stop address)
    pub stop_pc: Option<NibbleAddr>,
    /// Log the machine state after every step at trace level
    pub trace: bool,
}

impl Default for EmuOptions {
    fn default() -> Self {
        Self { max_steps: DEFAULT_MAX_STEPS, stop_pc: None, trace: false }
    }
}

/// Why a run stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The pc reached the configured stop address
    PcReached,
    /// The step budget ran out before any stop condition held
    StepLimit,
}

/// Outcome of a completed run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmuResult {
    /// Steps actually executed
    pub steps: u64,
    pub reason: StopReason,
}

/// A run that could not complete
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum EmuError {
    #[error("fault at step {step}, pc {pc}: {source}")]
    Fault {
        step: u64,
        pc: NibbleAddr,
        source: DecodeError,
    },
}

/// An emulator instance: a machine plus the run policy
#[derive(Debug, Clone)]
pub struct Emu {
    machine: Machine,
    options: EmuOptions,
}

impl Emu {
    pub fn new(config: MachineConfig, options: EmuOptions) -> Self {
        Self { machine: Machine::new(config), options }
    }

    /// An emulator over a default machine with the given options
    pub fn with_options(options: EmuOptions) -> Self {
        Self::new(MachineConfig::default(), options)
    }

    /// Load instruction words at byte 0
    pub fn load_program(&mut self, words: &[u16]) {
        self.machine.load_program(words);
    }

    /// Load nibble data at a byte base address
    pub fn load_data(&mut self, base: usize, nibbles: &[u8]) {
        self.machine.load_nibbles(base, nibbles);
    }

    /// The underlying machine
    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn machine_mut(&mut self) -> &mut Machine {
        &mut self.machine
    }

    /// Run until a stop condition holds
    ///
    /// The stop address is checked before each fetch, except before the
    /// very first one, so the check only fires once the program has
    /// actually run.
    pub fn run(&mut self) -> Result<EmuResult, EmuError> {
        let mut steps: u64 = 0;
        while steps < self.options.max_steps {
            if steps > 0 {
                if let Some(stop_pc) = self.options.stop_pc {
                    if self.machine.pc() == stop_pc {
                        tracing::debug!(steps, pc = %stop_pc, "stop address reached");
                        return Ok(EmuResult { steps, reason: StopReason::PcReached });
                    }
                }
            }

            let pc = self.machine.pc();
            self.machine.step().map_err(|source| EmuError::Fault { step: steps, pc, source })?;
            steps += 1;

            if self.options.trace {
                tracing::trace!(step = steps, state = %self.machine.to_text());
            }
        }

        // One last stop check so a run whose final step lands exactly on
        // the stop address is reported as such.
        if let Some(stop_pc) = self.options.stop_pc {
            if self.machine.pc() == stop_pc {
                tracing::debug!(steps, pc = %stop_pc, "stop address reached");
                return Ok(EmuResult { steps, reason: StopReason::PcReached });
            }
        }

        tracing::debug!(steps, "step budget exhausted");
        Ok(EmuResult { steps, reason: StopReason::StepLimit })
    }
}

impl Default for Emu {
    fn default() -> Self {
        Self::with_options(EmuOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use risc4_core::{assemble, Instruction};

    #[test]
    fn test_stop_pc_ends_run() {
        let mut emu = Emu::with_options(EmuOptions {
            stop_pc: Some(NibbleAddr::from_inst_index(2)),
            ..EmuOptions::default()
        });
        emu.load_program(&assemble(&[
            Instruction::Ori { rd: 1, rs: 0, imm4: 0x3 },
            Instruction::Ori { rd: 2, rs: 0, imm4: 0x4 },
        ]));

        let result = emu.run().unwrap();
        assert_eq!(result.reason, StopReason::PcReached);
        assert_eq!(result.steps, 2);
        assert_eq!(emu.machine().reg(1), 3);
        assert_eq!(emu.machine().reg(2), 4);
    }

    #[test]
    fn test_stop_pc_not_checked_before_first_step() {
        // The program starts at its own stop address; it must still run.
        let mut emu = Emu::with_options(EmuOptions {
            max_steps: 1,
            stop_pc: Some(NibbleAddr::ZERO),
            ..EmuOptions::default()
        });
        emu.load_program(&assemble(&[Instruction::Ori { rd: 1, rs: 0, imm4: 0x7 }]));

        let result = emu.run().unwrap();
        assert_eq!(result.steps, 1);
        assert_eq!(emu.machine().reg(1), 7);
    }

    #[test]
    fn test_step_limit() {
        // A self-loop never reaches a stop address.
        let mut emu = Emu::with_options(EmuOptions {
            max_steps: 100,
            stop_pc: Some(NibbleAddr::from_inst_index(99)),
            ..EmuOptions::default()
        });
        emu.load_program(&assemble(&[Instruction::Jump { target: 0 }]));

        let result = emu.run().unwrap();
        assert_eq!(result.reason, StopReason::StepLimit);
        assert_eq!(result.steps, 100);
    }

    #[test]
    fn test_fault_carries_step_and_pc() {
        let mut emu = Emu::default();
        // One valid instruction, then EXT with undefined funct 0xC.
        emu.load_program(&[0xA101, 0x700C]);

        let err = emu.run().unwrap_err();
        assert_eq!(
            err,
            EmuError::Fault {
                step: 1,
                pc: NibbleAddr::from_inst_index(1),
                source: DecodeError::InvalidFunction(0xC),
            }
        );
    }
}
