// SPDX-License-Identifier: GPL-3.0
// load_store.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use psxcpu_utility::CustomInteger;
use super::R3051;
use super::instructions::{immediate, rs, rt};
use super::mips_exception::MIPSExceptionReason;
use crate::cpu::CpuBridge;

/// Access widths, as the alignment bits an address must leave clear. Byte
/// accesses only ever fail the user mode kernel-space test.
const BYTE: i32 = 0;
const HALF: i32 = 1;
const WORD: i32 = 3;

/// Memory access instructions. Loads finish through the delayed load path,
/// stores through a plain pc advance.
impl R3051 {

    /// Base register plus sign-extended displacement.
    fn effective_address(&self, instruction: i32) -> i32 {
        self.general_registers[rs(instruction)].wrapping_add(immediate(instruction))
    }

    /// Byte lanes are mirrored when running reverse-endian.
    fn byte_address(&self, address: i32) -> i32 {
        if self.sccp.is_reverse_endian() {
            address ^ 3
        } else {
            address
        }
    }

    fn half_address(&self, address: i32) -> i32 {
        if self.sccp.is_reverse_endian() {
            address ^ 2
        } else {
            address
        }
    }

    /// Validates a load address, returning it if the access may go ahead.
    /// Otherwise the instruction has already been finished, either by an
    /// address error or as an unimplemented isolated-cache load.
    fn load_address(
        &mut self,
        bridge: &mut dyn CpuBridge,
        instruction: i32,
        width: i32
    ) -> Option<i32> {

        if self.sccp.is_cache_isolated() {
            self.unimplemented_instruction(bridge, instruction, "load with isolated cache");
            return None;
        }
        let address = self.effective_address(instruction);
        if address & self.sccp.address_error_mask(width) != 0 {
            self.raise_address_exception(MIPSExceptionReason::ADEL, address);
            return None;
        }

        Some(address)
    }

    /// Validates a store address. Stores with the cache isolated are
    /// swallowed, which is what the BIOS relies on while flushing caches.
    fn store_address(&mut self, instruction: i32, width: i32) -> Option<i32> {

        if self.sccp.is_cache_isolated() {
            self.advance_pc();
            return None;
        }
        let address = self.effective_address(instruction);
        if address & self.sccp.address_error_mask(width) != 0 {
            self.raise_address_exception(MIPSExceptionReason::ADES, address);
            return None;
        }

        Some(address)
    }

    pub(super) fn lb_instruction(&mut self, bridge: &mut dyn CpuBridge, instruction: i32) {

        if let Some(address) = self.load_address(bridge, instruction, BYTE) {
            let value = bridge.read_byte(self.byte_address(address)) as i32;
            self.delayed_load(rt(instruction), value);
        }
    }

    pub(super) fn lbu_instruction(&mut self, bridge: &mut dyn CpuBridge, instruction: i32) {

        if let Some(address) = self.load_address(bridge, instruction, BYTE) {
            let value = bridge.read_byte(self.byte_address(address)) as u8 as i32;
            self.delayed_load(rt(instruction), value);
        }
    }

    pub(super) fn lh_instruction(&mut self, bridge: &mut dyn CpuBridge, instruction: i32) {

        if let Some(address) = self.load_address(bridge, instruction, HALF) {
            let value = bridge.read_half(self.half_address(address)) as i32;
            self.delayed_load(rt(instruction), value);
        }
    }

    pub(super) fn lhu_instruction(&mut self, bridge: &mut dyn CpuBridge, instruction: i32) {

        if let Some(address) = self.load_address(bridge, instruction, HALF) {
            let value = bridge.read_half(self.half_address(address)) as u16 as i32;
            self.delayed_load(rt(instruction), value);
        }
    }

    pub(super) fn lw_instruction(&mut self, bridge: &mut dyn CpuBridge, instruction: i32) {

        if let Some(address) = self.load_address(bridge, instruction, WORD) {
            let value = bridge.read_word(address);
            self.delayed_load(rt(instruction), value);
        }
    }

    /// Loads the most significant end of an unaligned word.
    pub(super) fn lwl_instruction(&mut self, bridge: &mut dyn CpuBridge, instruction: i32) {

        if let Some(address) = self.load_address(bridge, instruction, BYTE) {
            let word = bridge.read_word(address & !3);
            let shift = (address & 3) * 8;
            let current = self.merge_source(rt(instruction));
            let keep = 0x00FFFFFF_i32.logical_rshift(shift);

            let value = if self.sccp.is_reverse_endian() {
                (current & keep) | (word & !keep)
            } else {
                (current & keep) | (word << (24 - shift))
            };
            self.delayed_load(rt(instruction), value);
        }
    }

    /// Loads the least significant end of an unaligned word.
    pub(super) fn lwr_instruction(&mut self, bridge: &mut dyn CpuBridge, instruction: i32) {

        if let Some(address) = self.load_address(bridge, instruction, BYTE) {
            let word = bridge.read_word(address & !3);
            let shift = (address & 3) * 8;
            let current = self.merge_source(rt(instruction));
            let keep = !(0xFFFFFFFF_u32 as i32).logical_rshift(shift);

            let value = if self.sccp.is_reverse_endian() {
                (current & keep) | (word & !keep)
            } else {
                (current & keep) | word.logical_rshift(shift)
            };
            self.delayed_load(rt(instruction), value);
        }
    }

    pub(super) fn sb_instruction(&mut self, bridge: &mut dyn CpuBridge, instruction: i32) {

        if let Some(address) = self.store_address(instruction, BYTE) {
            let value = self.general_registers[rt(instruction)];
            bridge.write_byte(self.byte_address(address), value as i8);
            self.advance_pc();
        }
    }

    pub(super) fn sh_instruction(&mut self, bridge: &mut dyn CpuBridge, instruction: i32) {

        if let Some(address) = self.store_address(instruction, HALF) {
            let value = self.general_registers[rt(instruction)];
            bridge.write_half(self.half_address(address), value as i16);
            self.advance_pc();
        }
    }

    pub(super) fn sw_instruction(&mut self, bridge: &mut dyn CpuBridge, instruction: i32) {

        if let Some(address) = self.store_address(instruction, WORD) {
            let value = self.general_registers[rt(instruction)];
            bridge.write_word(address, value);
            self.advance_pc();
        }
    }

    /// Stores the most significant end of a register into an unaligned word.
    pub(super) fn swl_instruction(&mut self, bridge: &mut dyn CpuBridge, instruction: i32) {

        if let Some(address) = self.store_address(instruction, BYTE) {
            let aligned = address & !3;
            let shift = (address & 3) * 8;
            let word = bridge.read_word(aligned);
            let value = self.general_registers[rt(instruction)];

            let merged = if self.sccp.is_reverse_endian() {
                let keep = 0x00FFFFFF_i32.logical_rshift(shift);
                (word & keep) | (value & !keep)
            } else {
                (word & ((0xFFFFFF00_u32 << shift) as i32)) | value.logical_rshift(24 - shift)
            };
            bridge.write_word(aligned, merged);
            self.advance_pc();
        }
    }

    /// Stores the least significant end of a register into an unaligned word.
    pub(super) fn swr_instruction(&mut self, bridge: &mut dyn CpuBridge, instruction: i32) {

        if let Some(address) = self.store_address(instruction, BYTE) {
            let aligned = address & !3;
            let shift = (address & 3) * 8;
            let word = bridge.read_word(aligned);
            let value = self.general_registers[rt(instruction)];

            let merged = if self.sccp.is_reverse_endian() {
                let keep = !(0xFFFFFFFF_u32 as i32).logical_rshift(shift);
                (word & keep) | (value & !keep)
            } else {
                (word & 0x00FFFFFF_i32.logical_rshift(24 - shift)) | (value << shift)
            };
            bridge.write_word(aligned, merged);
            self.advance_pc();
        }
    }

    pub(super) fn lwc1_instruction(&mut self, bridge: &mut dyn CpuBridge, instruction: i32) {

        if !self.sccp.is_coprocessor_enabled(1) {
            self.raise_coprocessor_unusable(1);
            return;
        }

        self.unimplemented_instruction(bridge, instruction, "LWC1");
    }

    pub(super) fn swc1_instruction(&mut self, bridge: &mut dyn CpuBridge, instruction: i32) {

        if !self.sccp.is_coprocessor_enabled(1) {
            self.raise_coprocessor_unusable(1);
            return;
        }

        self.unimplemented_instruction(bridge, instruction, "SWC1");
    }

    pub(super) fn lwc2_instruction(&mut self, bridge: &mut dyn CpuBridge, instruction: i32) {

        if !self.sccp.is_coprocessor_enabled(2) {
            self.raise_coprocessor_unusable(2);
            return;
        }

        if let Some(address) = self.load_address(bridge, instruction, WORD) {
            let value = bridge.read_word(address);
            self.gte.write_data_reg(rt(instruction) as i32, value);
            self.advance_pc();
        }
    }

    pub(super) fn swc2_instruction(&mut self, bridge: &mut dyn CpuBridge, instruction: i32) {

        if !self.sccp.is_coprocessor_enabled(2) {
            self.raise_coprocessor_unusable(2);
            return;
        }

        if let Some(address) = self.store_address(instruction, WORD) {
            let value = self.gte.read_data_reg(rt(instruction) as i32);
            bridge.write_word(address, value);
            self.advance_pc();
        }
    }
}
