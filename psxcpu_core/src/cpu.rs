// SPDX-License-Identifier: GPL-3.0
// cpu.rs - Copyright Phillip Potter, 2025, under GPLv3 only.

use log::error;
use thiserror::Error;

/// This module contains the default R3051 implmentation. There
/// may be others in future.
pub mod r3051;

pub use r3051::registers::RegisterId;

/// This trait provides an implementation-opaque way of driving a CPU from
/// the host. Every call that can touch memory or signal the outside world
/// is handed a bridge object, so the CPU never owns its collaborators and
/// any number of independent CPUs can share one host.
pub trait Cpu {

    /// Puts the CPU into its power-on state and points it at the reset vector.
    fn reset(&mut self);

    /// Runs instructions until the cycle budget is used up, returning the
    /// number of cycles actually consumed. At least one instruction is
    /// always executed.
    fn run(&mut self, bridge: &mut dyn CpuBridge, cycles: i32) -> i32;

    /// Executes exactly one instruction.
    fn step(&mut self, bridge: &mut dyn CpuBridge);

    /// Reads a register by identifier.
    fn get_reg(&self, reg: RegisterId) -> i32;

    /// Writes a register by identifier.
    fn set_reg(&mut self, reg: RegisterId, value: i32);

    /// Asserts or clears one of the six interrupt request lines.
    fn set_irq_line(
        &mut self,
        bridge: &mut dyn CpuBridge,
        line: i32,
        asserted: bool
    ) -> Result<(), CpuError>;

    /// Captures the complete CPU state as a fixed-size blob.
    fn get_state(&self) -> Vec<u8>;

    /// Restores a blob previously produced by `get_state`.
    fn set_state(&mut self, state: &[u8]) -> Result<(), CpuError>;

    /// Renders one register for diagnostics.
    fn format_reg(&self, reg: RegisterId) -> String;
}

/// This trait provides an implementation-opaque way of the CPU
/// calling methods from elsewhere in the system via a 'bridge'.
pub trait CpuBridge {

    /// The CPU must call this to read a byte from the system bus.
    fn read_byte(&mut self, address: i32) -> i8;

    /// The CPU must call this to read a halfword from the system bus.
    fn read_half(&mut self, address: i32) -> i16;

    /// The CPU must call this to read a word from the system bus.
    fn read_word(&mut self, address: i32) -> i32;

    /// The CPU must call this to write a byte to the system bus.
    fn write_byte(&mut self, address: i32, value: i8);

    /// The CPU must call this to write a halfword to the system bus.
    fn write_half(&mut self, address: i32, value: i16);

    /// The CPU must call this to write a word to the system bus.
    fn write_word(&mut self, address: i32, value: i32);

    /// Called whenever the program counter is set rather than stepped.
    /// Advisory only.
    fn change_pc(&mut self, _address: i32) {}

    /// Called once for every assertion of an interrupt line.
    fn acknowledge_interrupt(&mut self, _line: i32) {}

    /// Called when the CPU meets something it does not implement. The CPU
    /// carries on as if the instruction were a no-op afterwards.
    fn unimplemented(&mut self, pc: i32, instruction: i32, what: &str) {
        error!("{:08x}: {} not supported (instruction {:08x})", pc, what, instruction);
    }

    /// Called straight after `unimplemented` so a debugger can halt.
    fn debugger_stop(&mut self) {}
}

/// Errors caused by the host misusing the CPU. Emulated exceptions never
/// appear here.
#[derive(Debug, Error, PartialEq)]
pub enum CpuError {

    #[error("snapshot is {actual} bytes, expected {expected}")]
    SnapshotLength { expected: usize, actual: usize },

    #[error("snapshot magic {0:08x} not recognised")]
    SnapshotMagic(u32),

    #[error("snapshot version {0} not supported")]
    SnapshotVersion(u32),

    #[error("snapshot delay register {0} out of range")]
    SnapshotDelaySlot(u32),

    #[error("no register with identifier {0}")]
    UnknownRegister(i32),

    #[error("interrupt line {0} out of range")]
    InvalidIrqLine(i32),
}
