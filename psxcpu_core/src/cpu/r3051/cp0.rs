// SPDX-License-Identifier: GPL-3.0
// cp0.rs - Copyright Phillip Potter, 2025, under GPLv3 only.

use psxcpu_utility::CustomInteger;

/// Status register: current interrupt enable.
pub const SR_IEC: i32 = 1 << 0;

/// Status register: current kernel/user mode (set means user).
pub const SR_KUC: i32 = 1 << 1;

/// Status register: isolate cache.
pub const SR_ISC: i32 = 1 << 16;

/// Status register: swap caches.
pub const SR_SWC: i32 = 1 << 17;

/// Status register: TLB shutdown.
pub const SR_TS: i32 = 1 << 21;

/// Status register: bootstrap exception vectors.
pub const SR_BEV: i32 = 1 << 22;

/// Status register: reverse endianness in user mode.
pub const SR_RE: i32 = 1 << 25;

/// Status register: first coprocessor usability bit, CU1 to CU3 follow it.
pub const SR_CU0: i32 = 1 << 28;

/// Cause register: exception code field.
pub const CAUSE_EXC: i32 = 31 << 2;

/// Cause register: interrupt pending field.
pub const CAUSE_IP: i32 = 255 << 8;

/// Cause register: coprocessor number field.
pub const CAUSE_CE: i32 = 3 << 28;

/// Cause register: branch delay flag.
pub const CAUSE_BD: i32 = 0x80000000_u32 as i32;

/// Bits a software write (MTC0) may change, per register.
const WRITE_MASKS: [u32; 32] = [
    0xFFFFFFFF, // Index
    0x00000000, // Random
    0xFFFFFF00, // EntryLo
    0x00000000,
    0xFFE00000, // Context
    0x00000000,
    0x00000000,
    0x00000000,
    0x00000000, // BadVAddr
    0x00000000,
    0xFFFFFFC0, // EntryHi
    0x00000000,
    0xF27FFF3F, // SR
    0x00000300, // Cause
    0x00000000, // EPC
    0x00000000, // PRId
    0x00000000, 0x00000000, 0x00000000, 0x00000000,
    0x00000000, 0x00000000, 0x00000000, 0x00000000,
    0x00000000, 0x00000000, 0x00000000, 0x00000000,
    0x00000000, 0x00000000, 0x00000000, 0x00000000,
];

/// The CP0 structure models the System Control Co-Processor (CP0), which
/// is responsible for privilege state and exceptions. The PlayStation has
/// no TLB, so only Status, Cause, EPC, BadVAddr and PRId carry meaning; the
/// rest are plain storage.
pub struct CP0 {

    // Register definitions.
    cop_registers: [i32; 32],
}

impl CP0 {

    /// Creates a new CP0 object with the correct initial state.
    pub fn new() -> Self {

        let mut cp0 = CP0 {

            // Zero out all registers.
            cop_registers: [0; 32],
        };

        // Reset the CP0 object.
        cp0.reset();

        // Now return it.
        cp0
    }

    /// This function resets the state of the co-processor as per the reset exception.
    pub fn reset(&mut self) {

        // Clear TS, SWc, KUc and IEc, and select the bootstrap vectors.
        let status = self.cop_registers[12];
        self.cop_registers[12] = (status & !(SR_TS | SR_SWC | SR_KUC | SR_IEC)) | SR_BEV;

        // Random starts at the top of its range.
        self.cop_registers[1] = 63;

        // PSX specific processor revision.
        self.cop_registers[15] = 0x00000200;
    }

    /// This function executes the RFE CP0 instruction.
    pub fn rfe(&mut self) {

        // Shift KUo/IEo/KUp/IEp bits into place of KUp/IEp/KUc/IEc bits and write back.
        let temp_reg = self.cop_registers[12];
        let new_bits = temp_reg.logical_rshift(2) & 0xF;

        self.write_reg(12, (temp_reg & (0xFFFFFFF0_u32 as i32)) | new_bits, true);
    }

    /// This function pushes the KU/IE pairs one level down on exception entry,
    /// dropping the oldest pair and entering kernel mode with interrupts off.
    pub fn push_mode_stack(&mut self) {

        let temp_reg = self.cop_registers[12];
        let new_bits = (temp_reg << 2) & 0x3F;

        self.write_reg(12, (temp_reg & !0x3F) | new_bits, true);
    }

    /// This function returns the reset exception vector's virtual address.
    pub fn get_reset_exception_vector(&self) -> i32 {
        0xBFC00000_u32 as i32
    }

    /// This function returns the general exception vector's virtual address.
    pub fn get_general_exception_vector(&self) -> i32 {

        // Isolate BEV bit and return accordingly.
        if self.cop_registers[12] & SR_BEV != 0 {
            0xBFC00180_u32 as i32
        } else {
            0x80000080_u32 as i32
        }
    }

    /// This function reads from a given register. Reads are never masked.
    pub fn read_reg(&self, reg: i32) -> i32 {
        self.cop_registers[(reg & 31) as usize]
    }

    /// This function writes to a given register. Software writes only change
    /// the bits in the register's write mask; hardware writes pass
    /// `write_override` and store the value as-is.
    pub fn write_reg(&mut self, reg: i32, value: i32, write_override: bool) {

        let array_index = (reg & 31) as usize;
        match write_override {

            // Override was specified, just write register directly.
            true => {
                self.cop_registers[array_index] = value;
            },

            false => {
                let mask = WRITE_MASKS[array_index] as i32;
                let kept = self.cop_registers[array_index] & !mask;
                self.cop_registers[array_index] = kept | (value & mask);
            }
        }
    }

    /// Whether the CPU is currently in user mode.
    pub fn is_user_mode(&self) -> bool {
        self.cop_registers[12] & SR_KUC != 0
    }

    /// Whether the data cache is isolated from memory.
    pub fn is_cache_isolated(&self) -> bool {
        self.cop_registers[12] & SR_ISC != 0
    }

    /// Whether byte lanes are reversed, which needs RE and user mode together.
    pub fn is_reverse_endian(&self) -> bool {
        self.cop_registers[12] & (SR_RE | SR_KUC) == (SR_RE | SR_KUC)
    }

    /// Whether the given coprocessor's usability bit is set.
    pub fn is_coprocessor_enabled(&self, coprocessor: i32) -> bool {
        self.cop_registers[12] & (SR_CU0 << coprocessor) != 0
    }

    /// Whether any interrupt is both pending in Cause and unmasked in Status.
    pub fn interrupt_pending(&self) -> bool {
        self.cop_registers[12] & self.cop_registers[13] & CAUSE_IP != 0
    }

    /// Sets or clears the Cause pending bit for hardware interrupt line 0 to 5.
    pub fn set_interrupt_line(&mut self, line: i32, asserted: bool) {

        let bit = 1 << (10 + line);
        if asserted {
            self.cop_registers[13] |= bit;
        } else {
            self.cop_registers[13] &= !bit;
        }
    }

    /// Returns the mask an address is tested against: the kernel half of the
    /// address space while in user mode, plus the given alignment bits.
    pub fn address_error_mask(&self, alignment: i32) -> i32 {
        ((self.cop_registers[12] & SR_KUC) << 30) | alignment
    }
}

#[cfg(test)]
mod tests;
