// SPDX-License-Identifier: GPL-3.0
// mips_exception.rs - Copyright Phillip Potter, 2025, under GPLv3 only.

use log::debug;
use std::fmt;
use super::R3051;
use super::cp0::{CAUSE_BD, CAUSE_CE, CAUSE_EXC, SR_IEC};
use super::delay_slot::DelaySlot;

/// This structure records the most recent exception taken by the R3051 CPU.
/// Entry itself happens immediately; the record is only for diagnostics.
#[derive(Copy, Clone, Debug)]
pub struct MIPSException {
    pub exception_reason: MIPSExceptionReason,
    pub program_counter_origin: i32,
    pub is_in_branch_delay_slot: bool
}

/// This enum represents all possible reasons for an exception.
/// Integer codes are listed explicitly for clarity, and match the
/// ExcCode field of the Cause register.
#[derive(Copy, Clone, Debug, PartialEq)]
#[repr(i32)]
pub enum MIPSExceptionReason {
    INT = 0,
    ADEL = 4,
    ADES = 5,
    SYS = 8,
    BP = 9,
    RI = 10,
    CPU = 11,
    OVF = 12,
    NULL = 14,
}

impl MIPSException {

    /// Creates a new MIPSException object with the correct initial state.
    pub fn new() -> Self {
        MIPSException {
            exception_reason: MIPSExceptionReason::NULL,
            program_counter_origin: 0,
            is_in_branch_delay_slot: false,
        }
    }

    /// Resets a MIPSException object to its initial empty state.
    pub fn reset(&mut self) {
        *self = MIPSException::new();
    }
}

impl fmt::Display for MIPSException {

    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} at {:08x} (delay slot: {})",
            self.exception_reason, self.program_counter_origin, self.is_in_branch_delay_slot
        )
    }
}

/// Exception entry and the Status/Cause side-effect check.
impl R3051 {

    /// Takes an exception that has no extra state to record.
    pub(super) fn raise_exception(&mut self, reason: MIPSExceptionReason) {
        self.enter_exception(reason, None, None);
    }

    /// Takes an address error, latching the faulting address in BadVAddr.
    pub(super) fn raise_address_exception(&mut self, reason: MIPSExceptionReason, address: i32) {
        self.enter_exception(reason, Some(address), None);
    }

    /// Takes a coprocessor unusable exception for the given coprocessor.
    pub(super) fn raise_coprocessor_unusable(&mut self, coprocessor: i32) {
        self.enter_exception(MIPSExceptionReason::CPU, None, Some(coprocessor));
    }

    /// The hardware exception sequence. All CP0 writes here bypass the
    /// software write masks.
    fn enter_exception(
        &mut self,
        reason: MIPSExceptionReason,
        bad_address: Option<i32>,
        coprocessor: Option<i32>
    ) {

        // Push the KU/IE pairs one level down the mode stack.
        self.sccp.push_mode_stack();

        let code = (reason as i32) << 2;
        let mut cause = self.sccp.read_reg(13);
        let in_delay_slot = matches!(self.delay_slot, DelaySlot::PendingBranch(_));

        let epc = if in_delay_slot {
            cause = (cause & !CAUSE_EXC) | CAUSE_BD | code;
            self.program_counter.wrapping_sub(4)
        } else {
            self.commit_delayed_load();
            cause = (cause & !(CAUSE_EXC | CAUSE_BD)) | code;
            self.program_counter
        };

        if let Some(coprocessor) = coprocessor {
            cause = (cause & !CAUSE_CE) | ((coprocessor & 3) << 28);
        }

        self.sccp.write_reg(14, epc, true);
        self.sccp.write_reg(13, cause, true);
        if let Some(address) = bad_address {
            self.sccp.write_reg(8, address, true);
        }

        self.exception = MIPSException {
            exception_reason: reason,
            program_counter_origin: epc,
            is_in_branch_delay_slot: in_delay_slot,
        };
        debug!("exception {}", self.exception);

        let vector = self.sccp.get_general_exception_vector();
        self.set_pc(vector);
    }

    /// Re-evaluates Status and Cause after either of them changed: a pending
    /// enabled interrupt is taken at once, otherwise a program counter that
    /// became illegal for the current mode raises an address error.
    pub(super) fn check_status_and_cause(&mut self) {

        let status = self.sccp.read_reg(12);

        if status & SR_IEC != 0 && self.sccp.interrupt_pending() {
            self.raise_exception(MIPSExceptionReason::INT);
        } else if !matches!(self.delay_slot, DelaySlot::PendingBranch(_))
            && self.program_counter & self.sccp.address_error_mask(3) != 0 {
            self.raise_address_exception(MIPSExceptionReason::ADEL, self.program_counter);
        }
    }
}
