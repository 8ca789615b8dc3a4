// SPDX-License-Identifier: GPL-3.0
// r3051.rs - Copyright Phillip Potter, 2025, under GPLv3 only.

use log::trace;
use super::{Cpu, CpuBridge, CpuError};
use mips_exception::{MIPSException, MIPSExceptionReason};
use cp0::CP0;
use cp2::CP2;
use delay_slot::DelaySlot;
use registers::RegisterId;

/// This module contains an implementation of the MIPS exceptions
/// modelled from inside the R3051 processor.
pub mod mips_exception;

/// This module contains an implementation of the CP0 co-processor, also
/// referred to as the System Control Co-processor.
mod cp0;

/// This module contains an implementation of the CP2 co-processor, also
/// referred to as the Geometry Transformation Engine.
mod cp2;

/// This module contains the load and branch delay engine.
mod delay_slot;

/// This module contains instruction decoding and the ALU, branch and
/// co-processor instructions.
mod instructions;

/// This module contains the load and store instructions.
mod load_store;

/// This module contains the host-facing register identifiers.
pub mod registers;

/// This module contains the save state codec.
mod snapshot;

/// The number of general CPU registers.
const REGISTER_COUNT: usize = 32;

/// This structure represents the internal state of the R3051 processor.
/// It contains registers, and internal subcomponents.
pub struct R3051 {

    // Register definitions.
    general_registers: [i32; REGISTER_COUNT],
    program_counter: i32,
    hi_reg: i32,
    lo_reg: i32,

    // The instruction word most recently fetched.
    current_instruction: i32,

    // The single outstanding deferred write, if any.
    delay_slot: DelaySlot,

    // Co-processors.
    sccp: CP0,
    gte: CP2,

    // This stores the most recent exception.
    exception: MIPSException,

    // Set whenever the program counter jumps rather than steps.
    pc_changed: bool,

    // This counts the cycles of the current instruction.
    cycles: i32,
    total_cycles: i64,
}

/// Implementation functions for the R3051 component itself.
impl R3051 {

    /// Creates a new R3051 object with the correct initial state.
    pub fn new() -> Self {

        let mut r3051 = R3051 {

            // Setup registers (remember, r0 should always be 0).
            general_registers: [0; REGISTER_COUNT],
            program_counter: 0,
            hi_reg: 0,
            lo_reg: 0,

            current_instruction: 0,
            delay_slot: DelaySlot::NoPendingWrite,

            // Setup co-processors.
            sccp: CP0::new(),
            gte: CP2::new(),

            // Create exception object.
            exception: MIPSException::new(),

            pc_changed: true,

            // Setup instruction cycle count.
            cycles: 0,
            total_cycles: 0,
        };

        r3051.reset_state();

        r3051
    }

    /// Set the R3051 object to its correct initial state.
    fn reset_state(&mut self) {

        self.sccp.reset();
        self.exception.reset();
        let vector = self.sccp.get_reset_exception_vector();
        self.set_pc(vector);
    }

    /// The total number of cycles executed since creation.
    pub fn total_cycles(&self) -> i64 {
        self.total_cycles
    }

    /// The most recent exception taken, if any since reset.
    pub fn last_exception(&self) -> Option<MIPSException> {
        match self.exception.exception_reason {
            MIPSExceptionReason::NULL => None,
            _ => Some(self.exception),
        }
    }

    /// Passes a jump of the program counter on to the bridge.
    fn notify_pc_change(&mut self, bridge: &mut dyn CpuBridge) {

        if self.pc_changed {
            self.pc_changed = false;
            bridge.change_pc(self.program_counter);
        }
    }

    /// Executes one instruction, returning the cycles it took.
    fn execute_single(&mut self, bridge: &mut dyn CpuBridge) -> i32 {

        self.cycles = 0;
        self.notify_pc_change(bridge);

        // Take anything that became pending between instructions, such as
        // an interrupt raised while the CPU was not running.
        self.check_status_and_cause();
        self.notify_pc_change(bridge);

        let instruction = bridge.read_word(self.program_counter);
        self.current_instruction = instruction;
        trace!("{:08x}: {:08x}", self.program_counter, instruction);

        self.execute_instruction(bridge, instruction);

        self.cycles += 1;
        self.total_cycles += self.cycles as i64;
        self.cycles
    }
}

/// Implementation functions to be called from anything that understands what
/// a Cpu object is.
impl Cpu for R3051 {

    fn reset(&mut self) {
        self.reset_state();
    }

    fn run(&mut self, bridge: &mut dyn CpuBridge, cycles: i32) -> i32 {

        let mut consumed = 0;
        loop {
            consumed += self.execute_single(bridge);
            if consumed >= cycles {
                break;
            }
        }

        // Leave the bridge up to date for whoever runs next.
        self.notify_pc_change(bridge);
        consumed
    }

    fn step(&mut self, bridge: &mut dyn CpuBridge) {
        self.execute_single(bridge);
    }

    fn get_reg(&self, reg: RegisterId) -> i32 {
        self.read_register(reg)
    }

    fn set_reg(&mut self, reg: RegisterId, value: i32) {
        self.write_register(reg, value);
    }

    fn set_irq_line(
        &mut self,
        bridge: &mut dyn CpuBridge,
        line: i32,
        asserted: bool
    ) -> Result<(), CpuError> {

        if !(0..=5).contains(&line) {
            return Err(CpuError::InvalidIrqLine(line));
        }

        self.sccp.set_interrupt_line(line, asserted);
        if asserted {
            bridge.acknowledge_interrupt(line);
        }
        self.check_status_and_cause();

        Ok(())
    }

    fn get_state(&self) -> Vec<u8> {
        self.save_state()
    }

    fn set_state(&mut self, state: &[u8]) -> Result<(), CpuError> {
        self.load_state(state)
    }

    fn format_reg(&self, reg: RegisterId) -> String {
        self.format_register(reg)
    }
}
