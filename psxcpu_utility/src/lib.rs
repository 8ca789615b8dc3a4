// SPDX-License-Identifier: GPL-3.0
// lib.rs - Copyright Phillip Potter, 2025, under GPLv3 only.

// This crate contains small integer helpers shared by the CPU core: shifts and
// sign extension on register-width values, plus typed access to
// the 16-bit and 8-bit lanes packed inside a 32-bit register.

/// Exists to allow us to define custom trait operations on `i32`.
type CustomInt32 = i32;

/// Shift and extension helpers over signed register-width integers.
pub trait CustomInteger {

    type Output;

    /// Returns the value shifted right by the specified amount with zeroes
    /// shifted in at the top, keeping the original width.
    fn logical_rshift(self, shift_by: i32) -> Self::Output;

    /// Returns the value sign-extended from the given bit, where bit 0 is the
    /// least significant. Works for any field width inside the type.
    fn sign_extend(self, from_bit: i32) -> Self::Output;

    /// Returns how many of the most significant bits are equal to the sign bit.
    /// All zeroes or all ones gives the full width.
    fn leading_sign_bits(self) -> i32;
}

impl CustomInteger for CustomInt32 {

    type Output = i32;

    #[inline(always)]
    fn logical_rshift(self, shift_by: i32) -> Self::Output {
        ((self as u32) >> shift_by) as Self::Output
    }

    #[inline(always)]
    fn sign_extend(self, from_bit: i32) -> Self::Output {

        let unused_bits = 31 - from_bit;
        (self << unused_bits) >> unused_bits
    }

    #[inline(always)]
    fn leading_sign_bits(self) -> i32 {

        if self < 0 {
            self.leading_ones() as i32
        } else {
            self.leading_zeros() as i32
        }
    }
}

/// Typed views over a 32-bit register that packs two 16-bit halves or four
/// bytes. Lane 0 is always the least significant.
pub trait RegisterLanes: Sized {

    /// Low 16 bits, signed.
    fn low_half(self) -> i16;

    /// High 16 bits, signed.
    fn high_half(self) -> i16;

    /// Returns a copy with the low 16 bits replaced.
    fn with_low_half(self, value: i16) -> Self;

    /// Returns a copy with the high 16 bits replaced.
    fn with_high_half(self, value: i16) -> Self;

    /// Byte lane 0 to 3.
    fn byte_lane(self, lane: u32) -> u8;

    /// Returns a copy with the given byte lane replaced.
    fn with_byte_lane(self, lane: u32, value: u8) -> Self;

    /// Packs four byte lanes into a register value.
    fn from_byte_lanes(lanes: [u8; 4]) -> Self;

    /// Packs two halves into a register value.
    fn from_halves(low: i16, high: i16) -> Self;
}

impl RegisterLanes for CustomInt32 {

    #[inline(always)]
    fn low_half(self) -> i16 {
        self as i16
    }

    #[inline(always)]
    fn high_half(self) -> i16 {
        (self >> 16) as i16
    }

    #[inline(always)]
    fn with_low_half(self, value: i16) -> Self {
        (self & (0xFFFF0000_u32 as i32)) | (value as u16 as i32)
    }

    #[inline(always)]
    fn with_high_half(self, value: i16) -> Self {
        (self & 0x0000FFFF) | ((value as i32) << 16)
    }

    #[inline(always)]
    fn byte_lane(self, lane: u32) -> u8 {
        (self.logical_rshift((lane * 8) as i32) & 0xFF) as u8
    }

    #[inline(always)]
    fn with_byte_lane(self, lane: u32, value: u8) -> Self {

        let shift = lane * 8;
        let mask = !((0xFF_u32 << shift) as i32);
        (self & mask) | (((value as u32) << shift) as i32)
    }

    #[inline(always)]
    fn from_byte_lanes(lanes: [u8; 4]) -> Self {
        i32::from_le_bytes(lanes)
    }

    #[inline(always)]
    fn from_halves(low: i16, high: i16) -> Self {
        (low as u16 as i32) | ((high as i32) << 16)
    }
}
