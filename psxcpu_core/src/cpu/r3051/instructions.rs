// SPDX-License-Identifier: GPL-3.0
// instructions.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use psxcpu_utility::CustomInteger;
use super::R3051;
use super::mips_exception::MIPSExceptionReason;
use crate::cpu::CpuBridge;

// Instruction field helpers.

#[inline(always)]
pub(super) fn rs(instruction: i32) -> usize {
    ((instruction >> 21) & 0x1F) as usize
}

#[inline(always)]
pub(super) fn rt(instruction: i32) -> usize {
    ((instruction >> 16) & 0x1F) as usize
}

#[inline(always)]
pub(super) fn rd(instruction: i32) -> usize {
    ((instruction >> 11) & 0x1F) as usize
}

#[inline(always)]
fn shamt(instruction: i32) -> i32 {
    (instruction >> 6) & 0x1F
}

#[inline(always)]
fn funct(instruction: i32) -> i32 {
    instruction & 0x3F
}

/// The 16-bit immediate, sign-extended.
#[inline(always)]
pub(super) fn immediate(instruction: i32) -> i32 {
    instruction.sign_extend(15)
}

/// The 16-bit immediate, zero-extended.
#[inline(always)]
fn unsigned_immediate(instruction: i32) -> i32 {
    instruction & 0xFFFF
}

/// Decoding and the non-memory instructions.
impl R3051 {

    /// Executes one instruction word. Every path finishes the instruction
    /// through the delay slot engine or by taking an exception.
    pub(super) fn execute_instruction(&mut self, bridge: &mut dyn CpuBridge, instruction: i32) {

        match instruction.logical_rshift(26) {
            0x00 => self.special_instruction(instruction),
            0x01 => self.regimm_instruction(instruction),
            0x02 => self.j_instruction(instruction),
            0x03 => self.jal_instruction(instruction),
            0x04 => self.beq_instruction(instruction),
            0x05 => self.bne_instruction(instruction),
            0x06 => self.blez_instruction(instruction),
            0x07 => self.bgtz_instruction(instruction),
            0x08 => self.addi_instruction(instruction),
            0x09 => self.addiu_instruction(instruction),
            0x0A => self.slti_instruction(instruction),
            0x0B => self.sltiu_instruction(instruction),
            0x0C => self.andi_instruction(instruction),
            0x0D => self.ori_instruction(instruction),
            0x0E => self.xori_instruction(instruction),
            0x0F => self.lui_instruction(instruction),
            0x10 => self.cop0_instruction(bridge, instruction),
            0x11 => self.cop1_instruction(bridge, instruction),
            0x12 => self.cop2_instruction(bridge, instruction),
            0x20 => self.lb_instruction(bridge, instruction),
            0x21 => self.lh_instruction(bridge, instruction),
            0x22 => self.lwl_instruction(bridge, instruction),
            0x23 => self.lw_instruction(bridge, instruction),
            0x24 => self.lbu_instruction(bridge, instruction),
            0x25 => self.lhu_instruction(bridge, instruction),
            0x26 => self.lwr_instruction(bridge, instruction),
            0x28 => self.sb_instruction(bridge, instruction),
            0x29 => self.sh_instruction(bridge, instruction),
            0x2A => self.swl_instruction(bridge, instruction),
            0x2B => self.sw_instruction(bridge, instruction),
            0x2E => self.swr_instruction(bridge, instruction),
            0x31 => self.lwc1_instruction(bridge, instruction),
            0x32 => self.lwc2_instruction(bridge, instruction),
            0x39 => self.swc1_instruction(bridge, instruction),
            0x3A => self.swc2_instruction(bridge, instruction),

            // COP3, LWC3, SWC3 and everything unassigned.
            _ => self.raise_exception(MIPSExceptionReason::RI),
        }
    }

    fn special_instruction(&mut self, instruction: i32) {

        match funct(instruction) {
            0x00 => self.sll_instruction(instruction),
            0x02 => self.srl_instruction(instruction),
            0x03 => self.sra_instruction(instruction),
            0x04 => self.sllv_instruction(instruction),
            0x06 => self.srlv_instruction(instruction),
            0x07 => self.srav_instruction(instruction),
            0x08 => self.jr_instruction(instruction),
            0x09 => self.jalr_instruction(instruction),
            0x0C => self.syscall_instruction(),
            0x0D => self.break_instruction(),
            0x10 => self.mfhi_instruction(instruction),
            0x11 => self.mthi_instruction(instruction),
            0x12 => self.mflo_instruction(instruction),
            0x13 => self.mtlo_instruction(instruction),
            0x18 => self.mult_instruction(instruction),
            0x19 => self.multu_instruction(instruction),
            0x1A => self.div_instruction(instruction),
            0x1B => self.divu_instruction(instruction),
            0x20 => self.add_instruction(instruction),
            0x21 => self.addu_instruction(instruction),
            0x22 => self.sub_instruction(instruction),
            0x23 => self.subu_instruction(instruction),
            0x24 => self.and_instruction(instruction),
            0x25 => self.or_instruction(instruction),
            0x26 => self.xor_instruction(instruction),
            0x27 => self.nor_instruction(instruction),
            0x2A => self.slt_instruction(instruction),
            0x2B => self.sltu_instruction(instruction),
            _ => self.raise_exception(MIPSExceptionReason::RI),
        }
    }

    fn regimm_instruction(&mut self, instruction: i32) {

        match rt(instruction) {
            0x00 => self.bltz_instruction(instruction),
            0x01 => self.bgez_instruction(instruction),
            0x10 => self.bltzal_instruction(instruction),
            0x11 => self.bgezal_instruction(instruction),
            _ => self.raise_exception(MIPSExceptionReason::RI),
        }
    }

    /// Reports an instruction this core does not implement, then carries on
    /// as though it were a no-op.
    pub(super) fn unimplemented_instruction(
        &mut self,
        bridge: &mut dyn CpuBridge,
        instruction: i32,
        what: &str
    ) {

        bridge.unimplemented(self.program_counter, instruction, what);
        bridge.debugger_stop();
        self.advance_pc();
    }

    // Shifts.

    pub(super) fn sll_instruction(&mut self, instruction: i32) {

        let value = self.general_registers[rt(instruction)] << shamt(instruction);
        self.load(rd(instruction), value);
    }

    pub(super) fn srl_instruction(&mut self, instruction: i32) {

        let value = self.general_registers[rt(instruction)].logical_rshift(shamt(instruction));
        self.load(rd(instruction), value);
    }

    pub(super) fn sra_instruction(&mut self, instruction: i32) {

        let value = self.general_registers[rt(instruction)] >> shamt(instruction);
        self.load(rd(instruction), value);
    }

    pub(super) fn sllv_instruction(&mut self, instruction: i32) {

        let shift = self.general_registers[rs(instruction)] & 0x1F;
        let value = self.general_registers[rt(instruction)] << shift;
        self.load(rd(instruction), value);
    }

    pub(super) fn srlv_instruction(&mut self, instruction: i32) {

        let shift = self.general_registers[rs(instruction)] & 0x1F;
        let value = self.general_registers[rt(instruction)].logical_rshift(shift);
        self.load(rd(instruction), value);
    }

    pub(super) fn srav_instruction(&mut self, instruction: i32) {

        let shift = self.general_registers[rs(instruction)] & 0x1F;
        let value = self.general_registers[rt(instruction)] >> shift;
        self.load(rd(instruction), value);
    }

    // Jumps and branches.

    pub(super) fn jr_instruction(&mut self, instruction: i32) {

        if rd(instruction) != 0 {
            self.raise_exception(MIPSExceptionReason::RI);
            return;
        }

        let target = self.general_registers[rs(instruction)];
        self.delayed_branch(target);
    }

    pub(super) fn jalr_instruction(&mut self, instruction: i32) {

        let target = self.general_registers[rs(instruction)];
        let link = self.program_counter.wrapping_add(8);

        self.delayed_branch(target);
        if rd(instruction) != 0 {
            self.general_registers[rd(instruction)] = link;
        }
    }

    pub(super) fn j_instruction(&mut self, instruction: i32) {

        let target = self.jump_target(instruction);
        self.delayed_branch(target);
    }

    pub(super) fn jal_instruction(&mut self, instruction: i32) {

        let target = self.jump_target(instruction);
        let link = self.program_counter.wrapping_add(8);

        self.delayed_branch(target);
        self.general_registers[31] = link;
    }

    /// The 26-bit word index merged into the 256MB region of pc + 4.
    fn jump_target(&self, instruction: i32) -> i32 {
        (self.program_counter.wrapping_add(4) & (0xF0000000_u32 as i32)) | ((instruction & 0x3FFFFFF) << 2)
    }

    pub(super) fn beq_instruction(&mut self, instruction: i32) {

        let condition = self.general_registers[rs(instruction)] == self.general_registers[rt(instruction)];
        self.conditional_branch(condition, immediate(instruction));
    }

    pub(super) fn bne_instruction(&mut self, instruction: i32) {

        let condition = self.general_registers[rs(instruction)] != self.general_registers[rt(instruction)];
        self.conditional_branch(condition, immediate(instruction));
    }

    pub(super) fn blez_instruction(&mut self, instruction: i32) {

        if rt(instruction) != 0 {
            self.raise_exception(MIPSExceptionReason::RI);
            return;
        }

        let condition = self.general_registers[rs(instruction)] <= 0;
        self.conditional_branch(condition, immediate(instruction));
    }

    pub(super) fn bgtz_instruction(&mut self, instruction: i32) {

        if rt(instruction) != 0 {
            self.raise_exception(MIPSExceptionReason::RI);
            return;
        }

        let condition = self.general_registers[rs(instruction)] > 0;
        self.conditional_branch(condition, immediate(instruction));
    }

    pub(super) fn bltz_instruction(&mut self, instruction: i32) {

        let condition = self.general_registers[rs(instruction)] < 0;
        self.conditional_branch(condition, immediate(instruction));
    }

    pub(super) fn bgez_instruction(&mut self, instruction: i32) {

        let condition = self.general_registers[rs(instruction)] >= 0;
        self.conditional_branch(condition, immediate(instruction));
    }

    /// The link register is written whether or not the branch is taken, and
    /// even when the target raises an address error.
    pub(super) fn bltzal_instruction(&mut self, instruction: i32) {

        let condition = self.general_registers[rs(instruction)] < 0;
        let link = self.program_counter.wrapping_add(8);

        self.conditional_branch(condition, immediate(instruction));
        self.general_registers[31] = link;
    }

    pub(super) fn bgezal_instruction(&mut self, instruction: i32) {

        let condition = self.general_registers[rs(instruction)] >= 0;
        let link = self.program_counter.wrapping_add(8);

        self.conditional_branch(condition, immediate(instruction));
        self.general_registers[31] = link;
    }

    // Traps.

    pub(super) fn syscall_instruction(&mut self) {
        self.raise_exception(MIPSExceptionReason::SYS);
    }

    pub(super) fn break_instruction(&mut self) {
        self.raise_exception(MIPSExceptionReason::BP);
    }

    // HI/LO.

    pub(super) fn mfhi_instruction(&mut self, instruction: i32) {

        let value = self.hi_reg;
        self.load(rd(instruction), value);
    }

    pub(super) fn mflo_instruction(&mut self, instruction: i32) {

        let value = self.lo_reg;
        self.load(rd(instruction), value);
    }

    pub(super) fn mthi_instruction(&mut self, instruction: i32) {

        if rd(instruction) != 0 {
            self.raise_exception(MIPSExceptionReason::RI);
            return;
        }

        let value = self.general_registers[rs(instruction)];
        self.advance_pc();
        self.hi_reg = value;
    }

    pub(super) fn mtlo_instruction(&mut self, instruction: i32) {

        if rd(instruction) != 0 {
            self.raise_exception(MIPSExceptionReason::RI);
            return;
        }

        let value = self.general_registers[rs(instruction)];
        self.advance_pc();
        self.lo_reg = value;
    }

    pub(super) fn mult_instruction(&mut self, instruction: i32) {

        if rd(instruction) != 0 {
            self.raise_exception(MIPSExceptionReason::RI);
            return;
        }

        let product = self.general_registers[rs(instruction)] as i64
            * self.general_registers[rt(instruction)] as i64;
        self.advance_pc();
        self.lo_reg = product as i32;
        self.hi_reg = (product >> 32) as i32;
    }

    pub(super) fn multu_instruction(&mut self, instruction: i32) {

        if rd(instruction) != 0 {
            self.raise_exception(MIPSExceptionReason::RI);
            return;
        }

        let product = self.general_registers[rs(instruction)] as u32 as u64
            * self.general_registers[rt(instruction)] as u32 as u64;
        self.advance_pc();
        self.lo_reg = product as i32;
        self.hi_reg = (product >> 32) as i32;
    }

    /// Division by zero leaves HI and LO as they were.
    pub(super) fn div_instruction(&mut self, instruction: i32) {

        if rd(instruction) != 0 {
            self.raise_exception(MIPSExceptionReason::RI);
            return;
        }

        let dividend = self.general_registers[rs(instruction)];
        let divisor = self.general_registers[rt(instruction)];
        self.advance_pc();

        if divisor != 0 {
            self.lo_reg = dividend.wrapping_div(divisor);
            self.hi_reg = dividend.wrapping_rem(divisor);
        }
    }

    pub(super) fn divu_instruction(&mut self, instruction: i32) {

        if rd(instruction) != 0 {
            self.raise_exception(MIPSExceptionReason::RI);
            return;
        }

        let dividend = self.general_registers[rs(instruction)] as u32;
        let divisor = self.general_registers[rt(instruction)] as u32;
        self.advance_pc();

        if divisor != 0 {
            self.lo_reg = (dividend / divisor) as i32;
            self.hi_reg = (dividend % divisor) as i32;
        }
    }

    // Arithmetic and logic, register forms.

    pub(super) fn add_instruction(&mut self, instruction: i32) {

        let a = self.general_registers[rs(instruction)];
        let b = self.general_registers[rt(instruction)];
        match a.checked_add(b) {
            Some(result) => self.load(rd(instruction), result),
            None => self.raise_exception(MIPSExceptionReason::OVF),
        }
    }

    pub(super) fn addu_instruction(&mut self, instruction: i32) {

        let value = self.general_registers[rs(instruction)]
            .wrapping_add(self.general_registers[rt(instruction)]);
        self.load(rd(instruction), value);
    }

    pub(super) fn sub_instruction(&mut self, instruction: i32) {

        let a = self.general_registers[rs(instruction)];
        let b = self.general_registers[rt(instruction)];
        match a.checked_sub(b) {
            Some(result) => self.load(rd(instruction), result),
            None => self.raise_exception(MIPSExceptionReason::OVF),
        }
    }

    pub(super) fn subu_instruction(&mut self, instruction: i32) {

        let value = self.general_registers[rs(instruction)]
            .wrapping_sub(self.general_registers[rt(instruction)]);
        self.load(rd(instruction), value);
    }

    pub(super) fn and_instruction(&mut self, instruction: i32) {

        let value = self.general_registers[rs(instruction)] & self.general_registers[rt(instruction)];
        self.load(rd(instruction), value);
    }

    pub(super) fn or_instruction(&mut self, instruction: i32) {

        let value = self.general_registers[rs(instruction)] | self.general_registers[rt(instruction)];
        self.load(rd(instruction), value);
    }

    pub(super) fn xor_instruction(&mut self, instruction: i32) {

        let value = self.general_registers[rs(instruction)] ^ self.general_registers[rt(instruction)];
        self.load(rd(instruction), value);
    }

    pub(super) fn nor_instruction(&mut self, instruction: i32) {

        let value = !(self.general_registers[rs(instruction)] | self.general_registers[rt(instruction)]);
        self.load(rd(instruction), value);
    }

    pub(super) fn slt_instruction(&mut self, instruction: i32) {

        let value = self.general_registers[rs(instruction)] < self.general_registers[rt(instruction)];
        self.load(rd(instruction), value as i32);
    }

    pub(super) fn sltu_instruction(&mut self, instruction: i32) {

        let value = (self.general_registers[rs(instruction)] as u32)
            < (self.general_registers[rt(instruction)] as u32);
        self.load(rd(instruction), value as i32);
    }

    // Arithmetic and logic, immediate forms.

    pub(super) fn addi_instruction(&mut self, instruction: i32) {

        let a = self.general_registers[rs(instruction)];
        match a.checked_add(immediate(instruction)) {
            Some(result) => self.load(rt(instruction), result),
            None => self.raise_exception(MIPSExceptionReason::OVF),
        }
    }

    pub(super) fn addiu_instruction(&mut self, instruction: i32) {

        let value = self.general_registers[rs(instruction)].wrapping_add(immediate(instruction));
        self.load(rt(instruction), value);
    }

    pub(super) fn slti_instruction(&mut self, instruction: i32) {

        let value = self.general_registers[rs(instruction)] < immediate(instruction);
        self.load(rt(instruction), value as i32);
    }

    /// The immediate is sign-extended, then compared unsigned.
    pub(super) fn sltiu_instruction(&mut self, instruction: i32) {

        let value = (self.general_registers[rs(instruction)] as u32) < (immediate(instruction) as u32);
        self.load(rt(instruction), value as i32);
    }

    pub(super) fn andi_instruction(&mut self, instruction: i32) {

        let value = self.general_registers[rs(instruction)] & unsigned_immediate(instruction);
        self.load(rt(instruction), value);
    }

    pub(super) fn ori_instruction(&mut self, instruction: i32) {

        let value = self.general_registers[rs(instruction)] | unsigned_immediate(instruction);
        self.load(rt(instruction), value);
    }

    pub(super) fn xori_instruction(&mut self, instruction: i32) {

        let value = self.general_registers[rs(instruction)] ^ unsigned_immediate(instruction);
        self.load(rt(instruction), value);
    }

    pub(super) fn lui_instruction(&mut self, instruction: i32) {
        self.load(rt(instruction), instruction << 16);
    }

    // Co-processors.

    pub(super) fn cop0_instruction(&mut self, bridge: &mut dyn CpuBridge, instruction: i32) {

        // CP0 is always usable in kernel mode.
        if self.sccp.is_user_mode() && !self.sccp.is_coprocessor_enabled(0) {
            self.raise_coprocessor_unusable(0);
            return;
        }

        match rs(instruction) {

            // MFC0.
            0x00 => {
                let value = self.sccp.read_reg(rd(instruction) as i32);
                self.delayed_load(rt(instruction), value);
            },

            // MTC0.
            0x04 => {
                let value = self.general_registers[rt(instruction)];
                self.advance_pc();
                self.sccp.write_reg(rd(instruction) as i32, value, false);
                self.check_status_and_cause();
            },

            // RFE.
            0x10..=0x1F if funct(instruction) == 0x10 => {
                self.advance_pc();
                self.sccp.rfe();
                self.check_status_and_cause();
            },

            0x02 => self.unimplemented_instruction(bridge, instruction, "CFC0"),
            0x06 => self.unimplemented_instruction(bridge, instruction, "CTC0"),
            0x08 => self.unimplemented_instruction(bridge, instruction, "BC0"),
            _ => self.unimplemented_instruction(bridge, instruction, "COP0 operation"),
        }
    }

    pub(super) fn cop1_instruction(&mut self, bridge: &mut dyn CpuBridge, instruction: i32) {

        if !self.sccp.is_coprocessor_enabled(1) {
            self.raise_coprocessor_unusable(1);
            return;
        }

        self.unimplemented_instruction(bridge, instruction, "COP1");
    }

    pub(super) fn cop2_instruction(&mut self, bridge: &mut dyn CpuBridge, instruction: i32) {

        if !self.sccp.is_coprocessor_enabled(2) {
            self.raise_coprocessor_unusable(2);
            return;
        }

        match rs(instruction) {

            // MFC2.
            0x00 => {
                let value = self.gte.read_data_reg(rd(instruction) as i32);
                self.delayed_load(rt(instruction), value);
            },

            // CFC2.
            0x02 => {
                let value = self.gte.read_control_reg(rd(instruction) as i32);
                self.delayed_load(rt(instruction), value);
            },

            // MTC2.
            0x04 => {
                let value = self.general_registers[rt(instruction)];
                self.gte.write_data_reg(rd(instruction) as i32, value);
                self.advance_pc();
            },

            // CTC2.
            0x06 => {
                let value = self.general_registers[rt(instruction)];
                self.gte.write_control_reg(rd(instruction) as i32, value);
                self.advance_pc();
            },

            // GTE command.
            0x10..=0x1F => {
                if self.gte.execute(instruction) {
                    self.advance_pc();
                } else {
                    self.unimplemented_instruction(bridge, instruction, "GTE command");
                }
            },

            0x08 => self.unimplemented_instruction(bridge, instruction, "BC2"),
            _ => self.unimplemented_instruction(bridge, instruction, "COP2 operation"),
        }
    }
}
