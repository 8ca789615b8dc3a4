// SPDX-License-Identifier: GPL-3.0
// tests.rs - Copyright Phillip Potter, 2025, under GPLv3 only.

use super::{CP0, SR_BEV, SR_KUC, SR_IEC, SR_RE};

// Tests for the System Control Co-Processor.

#[test]
fn reset_should_select_bootstrap_vectors_and_kernel_mode() {

    let mut cp0 = CP0::new();
    cp0.cop_registers[12] = 0xFFFFFFFF_u32 as i32;
    cp0.reset();

    // TS, SWc, KUc and IEc cleared, BEV set, everything else untouched.
    assert_eq!(cp0.read_reg(12), 0xFFDDFFFC_u32 as i32);
    assert_eq!(cp0.read_reg(1), 63);
    assert_eq!(cp0.read_reg(15), 0x00000200);
}

#[test]
fn reads_should_return_the_raw_register() {

    let mut cp0 = CP0::new();
    cp0.cop_registers[3] = 0x12345678;
    cp0.cop_registers[13] = 0xFFFFFFFF_u32 as i32;

    assert_eq!(cp0.read_reg(3), 0x12345678);
    assert_eq!(cp0.read_reg(13), 0xFFFFFFFF_u32 as i32);
}

#[test]
fn status_and_cause_registers_write_with_override() {

    let mut cp0 = CP0::new();
    cp0.cop_registers[12] = 0xFFFFFFFF_u32 as i32;
    cp0.cop_registers[13] = 0xFFFFFFFF_u32 as i32;
    cp0.write_reg(12, 0, true);
    cp0.write_reg(13, 0, true);

    assert_eq!(cp0.cop_registers[12], 0);
    assert_eq!(cp0.cop_registers[13], 0);
}

#[test]
fn status_and_cause_registers_write_only_writable_bits() {

    let mut cp0 = CP0::new();
    cp0.cop_registers[12] = 0;
    cp0.cop_registers[13] = 0;
    cp0.write_reg(12, 0xFFFFFFFF_u32 as i32, false);
    cp0.write_reg(13, 0xFFFFFFFF_u32 as i32, false);

    assert_eq!(cp0.cop_registers[12], 0xF27FFF3F_u32 as i32);
    assert_eq!(cp0.cop_registers[13], 0x00000300);
}

#[test]
fn masked_write_should_keep_read_only_bits() {

    let mut cp0 = CP0::new();
    cp0.cop_registers[13] = 0xFFFFFFFF_u32 as i32;
    cp0.write_reg(13, 0, false);

    assert_eq!(cp0.cop_registers[13], 0xFFFFFCFF_u32 as i32);
}

#[test]
fn tlb_placeholder_masks_should_apply() {

    let mut cp0 = CP0::new();
    cp0.write_reg(0, 0x12345678, false);
    cp0.write_reg(2, 0xFFFFFFFF_u32 as i32, false);
    cp0.write_reg(4, 0xFFFFFFFF_u32 as i32, false);
    cp0.write_reg(10, 0xFFFFFFFF_u32 as i32, false);
    cp0.write_reg(1, 0, false);
    cp0.write_reg(15, 0, false);
    cp0.write_reg(14, 0x1234, false);

    assert_eq!(cp0.cop_registers[0], 0x12345678);
    assert_eq!(cp0.cop_registers[2], 0xFFFFFF00_u32 as i32);
    assert_eq!(cp0.cop_registers[4], 0xFFE00000_u32 as i32);
    assert_eq!(cp0.cop_registers[10], 0xFFFFFFC0_u32 as i32);
    assert_eq!(cp0.cop_registers[1], 63);
    assert_eq!(cp0.cop_registers[15], 0x00000200);
    assert_eq!(cp0.cop_registers[14], 0);
}

#[test]
fn push_and_rfe_should_walk_the_mode_stack() {

    let mut cp0 = CP0::new();

    // Given user mode with interrupts on, and an older pair of 0b10.
    cp0.cop_registers[12] = 0x00000023;
    cp0.push_mode_stack();

    // Then the current pair is now kernel/disabled, the others moved up.
    assert_eq!(cp0.cop_registers[12] & 0x3F, 0x0C);

    cp0.rfe();
    assert_eq!(cp0.cop_registers[12] & 0x3F, 0x03);
}

#[test]
fn rfe_should_keep_the_old_pair() {

    let mut cp0 = CP0::new();
    cp0.cop_registers[12] = 0x00000030;
    cp0.rfe();

    assert_eq!(cp0.cop_registers[12] & 0x3F, 0x3C);
}

#[test]
fn exception_vector_should_follow_bev() {

    let mut cp0 = CP0::new();
    assert_eq!(cp0.get_general_exception_vector(), 0xBFC00180_u32 as i32);

    cp0.cop_registers[12] &= !SR_BEV;
    assert_eq!(cp0.get_general_exception_vector(), 0x80000080_u32 as i32);
    assert_eq!(cp0.get_reset_exception_vector(), 0xBFC00000_u32 as i32);
}

#[test]
fn interrupt_lines_should_map_to_cause_bits_10_to_15() {

    let mut cp0 = CP0::new();
    cp0.set_interrupt_line(0, true);
    cp0.set_interrupt_line(5, true);
    assert_eq!(cp0.cop_registers[13], 0x8400);

    cp0.set_interrupt_line(0, false);
    assert_eq!(cp0.cop_registers[13], 0x8000);

    // Not pending until Status unmasks it.
    assert!(!cp0.interrupt_pending());
    cp0.cop_registers[12] |= 0x8000 | SR_IEC;
    assert!(cp0.interrupt_pending());
}

#[test]
fn mode_helpers_should_read_status_bits() {

    let mut cp0 = CP0::new();
    assert!(!cp0.is_user_mode());
    assert_eq!(cp0.address_error_mask(3), 3);

    cp0.cop_registers[12] = SR_KUC | SR_RE | (1 << 30);
    assert!(cp0.is_user_mode());
    assert!(cp0.is_reverse_endian());
    assert!(cp0.is_coprocessor_enabled(2));
    assert!(!cp0.is_coprocessor_enabled(0));
    assert_eq!(cp0.address_error_mask(1), 0x80000001_u32 as i32);

    cp0.cop_registers[12] = SR_RE;
    assert!(!cp0.is_reverse_endian());
}
