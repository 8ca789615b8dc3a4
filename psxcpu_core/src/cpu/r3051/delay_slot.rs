// SPDX-License-Identifier: GPL-3.0
// delay_slot.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use super::R3051;
use super::mips_exception::MIPSExceptionReason;

/// Register number used for a pending branch in the numeric encoding.
pub const PC_SLOT: i32 = 32;

/// The single deferred write the R3051 can have outstanding. A load result
/// and a branch target compete for the same slot.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum DelaySlot {
    NoPendingWrite,
    PendingRegister(usize, i32),
    PendingBranch(i32),
}

impl DelaySlot {

    /// Numeric register encoding: 0 for none, 1 to 31 for a load, 32 for a branch.
    pub fn register_number(&self) -> i32 {
        match *self {
            DelaySlot::NoPendingWrite => 0,
            DelaySlot::PendingRegister(reg, _) => reg as i32,
            DelaySlot::PendingBranch(_) => PC_SLOT,
        }
    }

    /// The value waiting to be written, or 0 when nothing is pending.
    pub fn value(&self) -> i32 {
        match *self {
            DelaySlot::NoPendingWrite => 0,
            DelaySlot::PendingRegister(_, value) => value,
            DelaySlot::PendingBranch(target) => target,
        }
    }

    /// Rebuilds a slot from its numeric encoding. Register 0 means nothing is
    /// pending, whatever the value. Returns `None` above the PC slot.
    pub fn from_parts(register: i32, value: i32) -> Option<Self> {
        match register {
            0 => Some(DelaySlot::NoPendingWrite),
            1..=31 => Some(DelaySlot::PendingRegister(register as usize, value)),
            PC_SLOT => Some(DelaySlot::PendingBranch(value)),
            _ => None,
        }
    }
}

/// The load/branch delay engine. Every instruction finishes through exactly
/// one of these.
impl R3051 {

    /// Sets the program counter directly, dropping anything pending.
    pub(super) fn set_pc(&mut self, address: i32) {

        self.program_counter = address;
        self.delay_slot = DelaySlot::NoPendingWrite;
        self.pc_changed = true;
    }

    /// Writes out a pending load, if there is one. Register 0 is discarded here.
    pub(super) fn commit_delayed_load(&mut self) {

        if let DelaySlot::PendingRegister(reg, value) = self.delay_slot {
            if reg != 0 {
                self.general_registers[reg] = value;
            }
            self.delay_slot = DelaySlot::NoPendingWrite;
        }
    }

    /// Moves on to the next instruction: a pending branch is taken, otherwise
    /// a pending load lands and the program counter steps by one word.
    pub(super) fn advance_pc(&mut self) {

        match self.delay_slot {
            DelaySlot::PendingBranch(target) => self.set_pc(target),
            _ => {
                self.commit_delayed_load();
                self.program_counter = self.program_counter.wrapping_add(4);
            }
        }
    }

    /// Finishes an instruction whose result is visible straight away.
    pub(super) fn load(&mut self, reg: usize, value: i32) {

        self.advance_pc();
        if reg != 0 {
            self.general_registers[reg] = value;
        }
    }

    /// Finishes a memory or coprocessor load. The result only lands once the
    /// next instruction has run. A pending branch is taken first and the load
    /// then occupies the freed slot, so a load in a delay slot lands after the
    /// branch target's first instruction instead.
    pub(super) fn delayed_load(&mut self, reg: usize, value: i32) {

        match self.delay_slot {
            DelaySlot::PendingBranch(target) => self.set_pc(target),
            _ => {
                self.commit_delayed_load();
                self.program_counter = self.program_counter.wrapping_add(4);
            }
        }

        if reg != 0 {
            self.delay_slot = DelaySlot::PendingRegister(reg, value);
        }
    }

    /// Finishes a branch or jump whose condition held. The delay slot runs
    /// next and the target is taken after it.
    pub(super) fn delayed_branch(&mut self, target: i32) {

        if target & self.sccp.address_error_mask(3) != 0 {
            self.raise_address_exception(MIPSExceptionReason::ADEL, target);
            return;
        }

        match self.delay_slot {

            // A branch in a delay slot: the first target still gets one
            // instruction before the second branch is taken.
            DelaySlot::PendingBranch(first_target) => self.set_pc(first_target),
            _ => {
                self.commit_delayed_load();
                self.program_counter = self.program_counter.wrapping_add(4);
            }
        }

        self.delay_slot = DelaySlot::PendingBranch(target);
    }

    /// Finishes a conditional branch, taken or not. A branch that is not
    /// taken still runs its delay slot, so it behaves as a branch to the
    /// instruction after the slot.
    pub(super) fn conditional_branch(&mut self, condition: bool, offset: i32) {

        let base = self.program_counter.wrapping_add(4);
        if condition {
            self.delayed_branch(base.wrapping_add(offset << 2));
        } else {
            self.delayed_branch(base.wrapping_add(4));
        }
    }

    /// The value a partial-word load merges into: a pending load to the same
    /// register is forwarded.
    pub(super) fn merge_source(&self, reg: usize) -> i32 {

        match self.delay_slot {
            DelaySlot::PendingRegister(pending, value) if pending == reg => value,
            _ => self.general_registers[reg],
        }
    }
}
