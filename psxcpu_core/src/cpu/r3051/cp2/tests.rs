// SPDX-License-Identifier: GPL-3.0
// tests.rs - Copyright Phillip Potter, 2025, under GPLv3 only.

use super::CP2;

// Tests for the CP2 / Geometry Transformation Engine.

/// Identity rotation matrix in 4.12 fixed point, packed as control 0 to 4.
fn load_identity_rotation(cp2: &mut CP2) {
    cp2.control_registers[0..5].copy_from_slice(&[0x1000, 0, 0x1000, 0, 0x1000]);
}

#[test]
fn read_control_reg_should_be_raw() {

    let mut cp2 = CP2::new();
    for i in 0..32 {
        cp2.control_registers[i] = 0x8000;
        assert_eq!(cp2.read_control_reg(i as i32), 0x8000);
    }
}

#[test]
fn write_control_reg_should_be_raw() {

    let mut cp2 = CP2::new();
    for i in 0..32 {
        cp2.write_control_reg(i, 0xFFFF8000_u32 as i32);
        assert_eq!(cp2.control_registers[i as usize], 0xFFFF8000_u32 as i32);
    }
}

#[test]
fn read_data_reg_should_extend_half_word_fields() {

    let mut cp2 = CP2::new();
    for i in [1, 3, 5, 8, 9, 10, 11] {
        cp2.data_registers[i] = 0x12348000;
        assert_eq!(cp2.read_data_reg(i as i32), 0xFFFF8000_u32 as i32);

        // The extended value is kept.
        assert_eq!(cp2.data_registers[i], 0xFFFF8000_u32 as i32);

        cp2.data_registers[i] = 0x7000;
        assert_eq!(cp2.read_data_reg(i as i32), 0x7000);
    }

    for i in [7, 16, 17, 18, 19] {
        cp2.data_registers[i] = 0xFFFF8000_u32 as i32;
        assert_eq!(cp2.read_data_reg(i as i32), 0x8000);
        assert_eq!(cp2.data_registers[i], 0x8000);
    }

    // Packed pairs come back as stored.
    cp2.data_registers[2] = 0x80008000_u32 as i32;
    assert_eq!(cp2.read_data_reg(2), 0x80008000_u32 as i32);
}

#[test]
fn sxyp_should_push_the_screen_fifo() {

    let mut cp2 = CP2::new();
    cp2.write_data_reg(12, 0x11);
    cp2.write_data_reg(13, 0x22);
    cp2.write_data_reg(14, 0x33);

    cp2.write_data_reg(15, 0x44);

    assert_eq!(cp2.data_registers[12], 0x22);
    assert_eq!(cp2.data_registers[13], 0x33);
    assert_eq!(cp2.data_registers[14], 0x44);
    assert_eq!(cp2.read_data_reg(15), 0x44);
}

#[test]
fn irgb_write_should_expand_into_ir_registers() {

    let mut cp2 = CP2::new();
    cp2.write_data_reg(28, 0x7FFF);

    assert_eq!(cp2.data_registers[9], 0xF80);
    assert_eq!(cp2.data_registers[10], 0xF80);
    assert_eq!(cp2.data_registers[11], 0xF80);
    assert_eq!(cp2.read_data_reg(29), 0x7FFF);
}

#[test]
fn orgb_read_should_saturate_each_channel() {

    let mut cp2 = CP2::new();
    cp2.data_registers[9] = 0xF80;
    cp2.data_registers[10] = 0x1000;
    cp2.data_registers[11] = 0xFFFFFFFF_u32 as i32;

    // 0x1f, then 0x20 saturated to 0x1f, then -1 saturated to 0.
    assert_eq!(cp2.read_data_reg(29), 0x3FF);
}

#[test]
fn lzcs_write_should_count_leading_sign_bits() {

    let mut cp2 = CP2::new();

    cp2.write_data_reg(30, 0xFFFE7FFF_u32 as i32);
    assert_eq!(cp2.read_data_reg(31), 15);

    cp2.write_data_reg(30, 0x7FFF);
    assert_eq!(cp2.read_data_reg(31), 17);

    cp2.write_data_reg(30, 0);
    assert_eq!(cp2.read_data_reg(31), 32);
}

#[test]
fn orgb_and_lzcr_should_ignore_writes() {

    let mut cp2 = CP2::new();
    cp2.write_data_reg(29, 0x1234);
    cp2.write_data_reg(31, 0x1234);

    assert_eq!(cp2.data_registers[29], 0);
    assert_eq!(cp2.data_registers[31], 0);
}

#[test]
fn unknown_command_should_change_nothing() {

    let mut cp2 = CP2::new();
    cp2.control_registers[31] = 0x1234;

    assert!(!cp2.execute(0x00));
    assert!(!cp2.execute(0x3C));
    assert_eq!(cp2.control_registers[31], 0x1234);
}

#[test]
fn rtps_with_zero_rotation_should_raise_no_flags() {

    let mut cp2 = CP2::new();
    cp2.control_registers[31] = 0x7FFFFFFF;
    cp2.data_registers[0] = 0x100;

    // Given V0 = (256, 0, 0) and a zero rotation matrix.
    assert!(cp2.execute(0x01));

    // Then every stage stays in range and FLAG is cleared.
    assert_eq!(&cp2.data_registers[25..28], &[0, 0, 0]);

    assert_eq!(cp2.control_registers[31], 0);
    assert_eq!(cp2.data_registers[14], 0);
    assert_eq!(cp2.data_registers[19], 0);
    assert_eq!(cp2.data_registers[24], 0);
}

#[test]
fn rtps_should_rotate_translate_and_project() {

    let mut cp2 = CP2::new();
    load_identity_rotation(&mut cp2);
    cp2.control_registers[7] = 0x100;
    cp2.control_registers[26] = 0x100;
    cp2.data_registers[0] = 0x00200010;

    // Given V0 = (0x10, 0x20, 0), TRZ = 0x100 and H = 0x100.
    assert!(cp2.execute(0x01));

    // Then MAC and IR carry the translated vertex.
    assert_eq!(&cp2.data_registers[25..28], &[0x10, 0x20, 0x100]);
    assert_eq!(&cp2.data_registers[9..12], &[0x10, 0x20, 0x100]);

    // And the projection divides by one.
    assert_eq!(cp2.data_registers[19] & 0xFFFF, 0x100);
    assert_eq!(cp2.data_registers[14], 0x00200010);
    assert_eq!(cp2.control_registers[31], 0);
}

#[test]
fn rtps_close_to_the_screen_should_flag_divide_overflow() {

    let mut cp2 = CP2::new();
    load_identity_rotation(&mut cp2);
    cp2.control_registers[7] = 0x100;
    cp2.control_registers[26] = 0x400;
    cp2.data_registers[0] = 0x00200010;

    assert!(cp2.execute(0x01));

    // SZ3 is raised to H/2, so the quotient is 2.
    assert_eq!(cp2.data_registers[14], 0x00400020);
    assert_eq!(cp2.control_registers[31], 0x80020000_u32 as i32);
}

#[test]
fn rtps_should_saturate_screen_x_at_full_width() {

    let mut cp2 = CP2::new();
    cp2.control_registers[5] = 0x7FFF;
    cp2.control_registers[26] = 2;

    // Given IR1 = 0x7FFF and a quotient of 0x20000, the screen sum needs
    // more than 32 bits.
    assert!(cp2.execute(0x01));

    // Then it saturates high rather than wrapping negative.
    assert_eq!(cp2.data_registers[14], 0x000003FF);
    assert_eq!(cp2.control_registers[31], 0x80034000_u32 as i32);
}

#[test]
fn rtps_should_saturate_screen_y_low() {

    let mut cp2 = CP2::new();
    cp2.control_registers[6] = -0x8000;
    cp2.control_registers[26] = 2;

    assert!(cp2.execute(0x01));

    // SY2 = -0x400, with MAC0 negative overflow and SY2 saturation.
    assert_eq!(cp2.data_registers[14], 0xFC000000_u32 as i32);
    assert_eq!(cp2.control_registers[31], 0x8002A000_u32 as i32);
}

#[test]
fn rtps_should_saturate_ir0_without_the_error_bit() {

    let mut cp2 = CP2::new();
    load_identity_rotation(&mut cp2);
    cp2.control_registers[7] = 0x100;
    cp2.control_registers[26] = 0x100;
    cp2.control_registers[28] = 0x2000000;

    assert!(cp2.execute(0x01));

    assert_eq!(cp2.data_registers[24], 0x2000000);
    assert_eq!(cp2.data_registers[8], 0xFFF);
    assert_eq!(cp2.control_registers[31], 0x1000);
}

#[test]
fn rtpt_should_push_three_depths() {

    let mut cp2 = CP2::new();
    load_identity_rotation(&mut cp2);
    cp2.control_registers[7] = 0x100;

    assert!(cp2.execute(0x30));

    assert_eq!(cp2.data_registers[16] & 0xFFFF, 0);
    assert_eq!(cp2.data_registers[17] & 0xFFFF, 0x100);
    assert_eq!(cp2.data_registers[18] & 0xFFFF, 0x100);
    assert_eq!(cp2.data_registers[19] & 0xFFFF, 0x100);
}

#[test]
fn nclip_should_compute_winding() {

    let mut cp2 = CP2::new();
    cp2.data_registers[12] = 0x00000000;
    cp2.data_registers[13] = 0x0000000A;
    cp2.data_registers[14] = 0x000A0000;

    assert!(cp2.execute(0x06));

    assert_eq!(cp2.data_registers[24], 100);
}

#[test]
fn nclip_should_flag_mac0_negative_overflow() {

    let mut cp2 = CP2::new();
    cp2.data_registers[12] = 0x00008000;
    cp2.data_registers[13] = 0x7FFF0000;
    cp2.data_registers[14] = 0x80007FFF_u32 as i32;

    assert!(cp2.execute(0x06));

    // -0xBFFE8001 wraps when stored.
    assert_eq!(cp2.data_registers[24], 0x40017FFF);
    assert_eq!(cp2.control_registers[31], 0x80008000_u32 as i32);
}

#[test]
fn op_should_use_the_rotation_diagonal() {

    let mut cp2 = CP2::new();
    cp2.control_registers[0] = 2;
    cp2.control_registers[2] = 3;
    cp2.control_registers[4] = 4;
    cp2.data_registers[9..12].copy_from_slice(&[1, 1, 1]);

    assert!(cp2.execute(0x0C));

    assert_eq!(&cp2.data_registers[25..28], &[-1, 2, -1]);
    assert_eq!(&cp2.data_registers[9..12], &[-1, 2, -1]);
}

#[test]
fn sqr_should_square_ir_and_saturate() {

    let mut cp2 = CP2::new();
    cp2.data_registers[9..12].copy_from_slice(&[0x7FFF, 3, -4]);

    assert!(cp2.execute(0x28));

    assert_eq!(&cp2.data_registers[25..28], &[0x3FFF0001, 9, 16]);
    assert_eq!(&cp2.data_registers[9..12], &[0x7FFF, 9, 16]);
    assert_eq!(cp2.control_registers[31], 0x81000000_u32 as i32);
}

#[test]
fn mvmva_with_zero_matrix_should_produce_translation() {

    let mut cp2 = CP2::new();
    cp2.control_registers[5..8].copy_from_slice(&[1, 2, 3]);

    // sf = 1, mx = 3, v = 0, cv = 0.
    assert!(cp2.execute(0x12 | (1 << 19) | (3 << 17)));

    assert_eq!(&cp2.data_registers[25..28], &[1, 2, 3]);
}

#[test]
fn mvmva_without_shift_should_keep_fraction_bits() {

    let mut cp2 = CP2::new();
    load_identity_rotation(&mut cp2);
    cp2.data_registers[0] = 0x00020001;
    cp2.data_registers[1] = 3;

    // sf = 0, mx = 0, v = 0, cv = 3.
    assert!(cp2.execute(0x12 | (3 << 13)));

    assert_eq!(&cp2.data_registers[25..28], &[0x1000, 0x2000, 0x3000]);
    assert_eq!(&cp2.data_registers[9..12], &[0x1000, 0x2000, 0x3000]);
    assert_eq!(cp2.control_registers[31], 0);
}

#[test]
fn mvmva_should_translate_by_background_colour() {

    let mut cp2 = CP2::new();
    cp2.control_registers[13..16].copy_from_slice(&[0x10, 0x20, 0x30]);

    // sf = 1, mx = 3, v = 0, cv = 1.
    assert!(cp2.execute(0x12 | (1 << 19) | (3 << 17) | (1 << 13)));

    assert_eq!(&cp2.data_registers[25..28], &[0x10, 0x20, 0x30]);
}

#[test]
fn mvmva_should_translate_by_far_colour() {

    let mut cp2 = CP2::new();
    cp2.control_registers[8..13].copy_from_slice(&[0x1000, 0, 0x1000, 0, 0x1000]);
    cp2.control_registers[21..24].copy_from_slice(&[0x100, 0x200, 0x300]);
    cp2.data_registers[9..12].copy_from_slice(&[1, 1, 1]);

    // sf = 1, mx = 1, v = 3, cv = 2.
    assert!(cp2.execute(0x12 | (1 << 19) | (1 << 17) | (3 << 15) | (2 << 13)));

    assert_eq!(&cp2.data_registers[25..28], &[0x101, 0x201, 0x301]);
    assert_eq!(&cp2.data_registers[9..12], &[0x101, 0x201, 0x301]);
}

#[test]
fn mvmva_should_honour_lm() {

    let mut cp2 = CP2::new();
    cp2.control_registers[5..8].copy_from_slice(&[-1, -1, -1]);

    // sf = 1, mx = 3, cv = 0, lm = 1.
    assert!(cp2.execute(0x12 | (1 << 19) | (3 << 17) | (1 << 10)));

    assert_eq!(&cp2.data_registers[9..12], &[0, 0, 0]);
    assert_eq!(cp2.control_registers[31], 0x81C00000_u32 as i32);
}

#[test]
fn avsz3_should_average_three_depths() {

    let mut cp2 = CP2::new();
    cp2.data_registers[17..20].copy_from_slice(&[0x100, 0x100, 0x100]);
    cp2.control_registers[29] = 0x155;

    assert!(cp2.execute(0x2D));

    assert_eq!(cp2.data_registers[24], 0x3FF00);
    assert_eq!(cp2.data_registers[7], 0x3F);
}

#[test]
fn avsz4_should_average_four_depths() {

    let mut cp2 = CP2::new();
    cp2.data_registers[16..20].copy_from_slice(&[0x100, 0x100, 0x100, 0x100]);
    cp2.control_registers[30] = 0x100;

    assert!(cp2.execute(0x2E));

    assert_eq!(cp2.data_registers[24], 0x40000);
    assert_eq!(cp2.data_registers[7], 0x40);
}

#[test]
fn avsz4_should_flag_mac0_positive_overflow() {

    let mut cp2 = CP2::new();
    cp2.data_registers[16..20].copy_from_slice(&[0xFFFF, 0xFFFF, 0xFFFF, 0xFFFF]);
    cp2.control_registers[30] = 0x7FFF;

    assert!(cp2.execute(0x2E));

    // 0x1FFFA0004 wraps negative, so OTZ saturates at zero.
    assert_eq!(cp2.data_registers[24], 0xFFFA0004_u32 as i32);
    assert_eq!(cp2.data_registers[7], 0);
    assert_eq!(cp2.control_registers[31], 0x80050000_u32 as i32);
}

#[test]
fn gpf_should_push_colour_and_keep_code() {

    let mut cp2 = CP2::new();
    cp2.data_registers[6] = 0x2C000000;
    cp2.data_registers[8] = 0x1000;
    cp2.data_registers[9..12].copy_from_slice(&[0x100, 0x200, 0x300]);
    cp2.data_registers[21] = 0x11;
    cp2.data_registers[22] = 0x22;

    assert!(cp2.execute(0x3D | (1 << 19)));

    assert_eq!(&cp2.data_registers[25..28], &[0x100, 0x200, 0x300]);
    assert_eq!(cp2.data_registers[20], 0x11);
    assert_eq!(cp2.data_registers[21], 0x22);
    assert_eq!(cp2.data_registers[22], 0x2C302010);
}

#[test]
fn gpl_overflow_should_set_mac_ir_and_colour_flags() {

    let mut cp2 = CP2::new();
    cp2.data_registers[8] = 1;
    cp2.data_registers[9..12].copy_from_slice(&[1, 1, 1]);
    cp2.data_registers[25] = 0x7FFFFFFF;

    assert!(cp2.execute(0x3E));

    assert_eq!(cp2.data_registers[25], i32::MIN);
    assert_eq!(cp2.data_registers[9], -0x8000);
    assert_eq!(cp2.data_registers[22] & 0xFF, 0);
    assert_eq!(cp2.control_registers[31], 0xC1200000_u32 as i32);
}

#[test]
fn cc_should_multiply_colour_by_light() {

    let mut cp2 = CP2::new();
    cp2.control_registers[16..21].copy_from_slice(&[0x1000, 0, 0x1000, 0, 0x1000]);
    cp2.data_registers[6] = 0x00204080;
    cp2.data_registers[9..12].copy_from_slice(&[0x1000, 0x800, 0]);

    assert!(cp2.execute(0x1C));

    assert_eq!(&cp2.data_registers[25..28], &[0x800, 0x200, 0]);
    assert_eq!(cp2.data_registers[22], 0x00002080);
    assert_eq!(cp2.control_registers[31], 0);
}

#[test]
fn dpcs_with_zero_ir0_should_pass_colour_through() {

    let mut cp2 = CP2::new();
    cp2.data_registers[6] = 0x40302010;

    assert!(cp2.execute(0x10));

    assert_eq!(&cp2.data_registers[9..12], &[0x100, 0x200, 0x300]);
    assert_eq!(cp2.data_registers[22], 0x40302010);
    assert_eq!(cp2.control_registers[31], 0);
}

#[test]
fn dpct_should_push_three_colours() {

    let mut cp2 = CP2::new();
    cp2.data_registers[20..23].copy_from_slice(&[0x00000001, 0x00000002, 0x00000003]);

    assert!(cp2.execute(0x2A));

    assert_eq!(&cp2.data_registers[20..23], &[0x00000001, 0x00000002, 0x00000003]);
}

#[test]
fn intpl_should_interpolate_towards_far_colour() {

    let mut cp2 = CP2::new();
    cp2.data_registers[8] = 0x1000;
    cp2.control_registers[21] = 0x100;

    assert!(cp2.execute(0x11));

    assert_eq!(cp2.data_registers[25], 0x100);
    assert_eq!(cp2.data_registers[22] & 0xFF, 0x10);
}

#[test]
fn ncs_with_no_light_should_give_background_colour() {

    let mut cp2 = CP2::new();
    cp2.control_registers[13..16].copy_from_slice(&[0x10, 0x20, 0x30]);

    assert!(cp2.execute(0x1E));

    assert_eq!(&cp2.data_registers[25..28], &[0x10, 0x20, 0x30]);
    assert_eq!(cp2.data_registers[22], 0x00030201);
}

/// Identity light matrix and light colour matrix.
fn load_identity_lighting(cp2: &mut CP2) {
    cp2.control_registers[8..13].copy_from_slice(&[0x1000, 0, 0x1000, 0, 0x1000]);
    cp2.control_registers[16..21].copy_from_slice(&[0x1000, 0, 0x1000, 0, 0x1000]);
}

/// Unit normals scaled to 0x800 along X, Y and Z as V0 to V2.
fn load_axis_normals(cp2: &mut CP2) {
    cp2.data_registers[0..6].copy_from_slice(&[0x800, 0, 0x08000000, 0, 0, 0x800]);
}

#[test]
fn nct_should_light_three_normals() {

    let mut cp2 = CP2::new();
    load_identity_lighting(&mut cp2);
    load_axis_normals(&mut cp2);
    cp2.data_registers[6] = 0x2C000000;

    assert!(cp2.execute(0x20));

    assert_eq!(&cp2.data_registers[20..23], &[0x2C000080, 0x2C008000, 0x2C800000]);
    assert_eq!(cp2.control_registers[31], 0);
}

#[test]
fn ncds_should_depth_cue_the_lit_colour() {

    let mut cp2 = CP2::new();
    load_identity_lighting(&mut cp2);
    cp2.control_registers[21..24].copy_from_slice(&[0x1000, 0x1000, 0x1000]);
    cp2.data_registers[0] = 0x04000800;
    cp2.data_registers[1] = 0x200;
    cp2.data_registers[6] = 0x2C808080;
    cp2.data_registers[8] = 0x800;

    // Given a lit colour of (0x400, 0x200, 0x100) halfway to the far colour.
    assert!(cp2.execute(0x13));

    assert_eq!(&cp2.data_registers[25..28], &[0xA00, 0x900, 0x880]);
    assert_eq!(cp2.data_registers[22], 0x2C8890A0);
    assert_eq!(cp2.control_registers[31], 0);
}

#[test]
fn ncdt_should_push_three_lit_colours() {

    let mut cp2 = CP2::new();
    load_identity_lighting(&mut cp2);
    load_axis_normals(&mut cp2);
    cp2.data_registers[6] = 0x00808080;

    assert!(cp2.execute(0x16));

    assert_eq!(&cp2.data_registers[20..23], &[0x00000040, 0x00004000, 0x00400000]);
    assert_eq!(cp2.control_registers[31], 0);
}

#[test]
fn nccs_should_multiply_light_by_colour() {

    let mut cp2 = CP2::new();
    load_identity_lighting(&mut cp2);
    cp2.data_registers[0] = 0x04000800;
    cp2.data_registers[1] = 0x200;
    cp2.data_registers[6] = 0x00808080;

    assert!(cp2.execute(0x1B));

    assert_eq!(&cp2.data_registers[25..28], &[0x400, 0x200, 0x100]);
    assert_eq!(cp2.data_registers[22], 0x00102040);
    assert_eq!(cp2.control_registers[31], 0);
}

#[test]
fn ncct_should_push_three_multiplied_colours() {

    let mut cp2 = CP2::new();
    load_identity_lighting(&mut cp2);
    load_axis_normals(&mut cp2);
    cp2.data_registers[6] = 0x00204080;

    assert!(cp2.execute(0x3F));

    assert_eq!(&cp2.data_registers[20..23], &[0x00000040, 0x00002000, 0x00100000]);
    assert_eq!(cp2.control_registers[31], 0);
}

#[test]
fn cdp_should_add_background_before_depth_cueing() {

    let mut cp2 = CP2::new();
    load_identity_lighting(&mut cp2);
    cp2.control_registers[13] = 0x100;
    cp2.data_registers[6] = 0x00808080;
    cp2.data_registers[9..12].copy_from_slice(&[0x800, 0x400, 0x200]);

    assert!(cp2.execute(0x14));

    assert_eq!(&cp2.data_registers[25..28], &[0x480, 0x200, 0x100]);
    assert_eq!(cp2.data_registers[22], 0x00102048);
}

#[test]
fn dcpl_with_full_ir0_should_give_far_colour() {

    let mut cp2 = CP2::new();
    cp2.control_registers[21..24].copy_from_slice(&[0x100, 0x200, 0x300]);
    cp2.data_registers[6] = 0x00204080;
    cp2.data_registers[8] = 0x1000;
    cp2.data_registers[9..12].copy_from_slice(&[0x1000, 0x1000, 0x1000]);

    assert!(cp2.execute(0x29));

    assert_eq!(&cp2.data_registers[25..28], &[0x100, 0x200, 0x300]);
    assert_eq!(cp2.data_registers[22], 0x00302010);
    assert_eq!(cp2.control_registers[31], 0);
}
