// SPDX-License-Identifier: GPL-3.0
// cp2.rs - Copyright Phillip Potter, 2025, under GPLv3 only.

use log::debug;
use psxcpu_utility::{CustomInteger, RegisterLanes};
use math::{CP2Matrix, CP2Vector};

/// This module contains matrix and vector types used by the GTE commands.
mod math;

/// This module contains the GTE command implementations.
mod commands;

/// The CP2 structure models the Geometry Transformation Engine, which is a
/// co-processor in the PlayStation responsible for matrix calculations amongst
/// other things.
///
/// Many registers pack several logical fields into one word. The accessors
/// below name each field so the packing is defined in one place:
///
/// | data | field            | control | field              |
/// |------|------------------|---------|--------------------|
/// | 0-5  | VXn/VYn, VZn     | 0-4     | rotation matrix    |
/// | 6    | R, G, B, CODE    | 5-7     | TRX, TRY, TRZ      |
/// | 7    | OTZ              | 8-12    | light matrix       |
/// | 8-11 | IR0-IR3          | 13-15   | RBK, GBK, BBK      |
/// | 12-15| SXY0-2, SXYP     | 16-20   | light colour matrix|
/// | 16-19| SZ0-SZ3          | 21-23   | RFC, GFC, BFC      |
/// | 20-22| RGB0-RGB2        | 24-25   | OFX, OFY           |
/// | 23   | RES1             | 26      | H                  |
/// | 24-27| MAC0-MAC3        | 27-28   | DQA, DQB           |
/// | 28-29| IRGB, ORGB       | 29-30   | ZSF3, ZSF4         |
/// | 30-31| LZCS, LZCR       | 31      | FLAG               |
pub struct CP2 {

    // Control registers.
    control_registers: [i32; 32],

    // Data registers.
    data_registers: [i32; 32],
}

impl CP2 {

    /// Creates a new CP2 object with the correct initial state.
    pub fn new() -> Self {
        CP2 {

            // Zero-out both register arrays.
            control_registers: [0; 32],
            data_registers: [0; 32],
        }
    }

    /// This function reads a data register as MFC2 and SWC2 see it.
    pub fn read_data_reg(&mut self, reg: i32) -> i32 {

        let index = (reg & 31) as usize;
        let value = match index {

            // Signed 16-bit fields are sign-extended, and stay that way.
            1 | 3 | 5 | 8 | 9 | 10 | 11 => {
                let value = self.data_registers[index].sign_extend(15);
                self.data_registers[index] = value;
                value
            },

            // Unsigned 16-bit fields are zero-extended, and stay that way.
            7 | 16 | 17 | 18 | 19 => {
                let value = self.data_registers[index] & 0xFFFF;
                self.data_registers[index] = value;
                value
            },

            // SXYP mirrors the newest screen coordinate.
            15 => self.data_registers[14],

            // ORGB packs IR1 to IR3 down to five bits each.
            29 => {
                let value = self.orgb();
                self.data_registers[29] = value;
                value
            },

            _ => self.data_registers[index],
        };

        debug!("get CP2DR{}={:08x}", index, value);
        value
    }

    /// This function writes a data register as MTC2 and LWC2 do.
    pub fn write_data_reg(&mut self, reg: i32, value: i32) {

        let index = (reg & 31) as usize;
        debug!("set CP2DR{}={:08x}", index, value);

        match index {

            // Writing SXYP pushes the screen coordinate FIFO.
            15 => {
                self.data_registers[15] = value;
                self.push_screen_xy(value);
            },

            // Writing IRGB expands the 5-bit colour fields into IR1 to IR3.
            28 => {
                self.data_registers[28] = value;
                self.data_registers[9] = (value & 0x1F) << 7;
                self.data_registers[10] = ((value >> 5) & 0x1F) << 7;
                self.data_registers[11] = ((value >> 10) & 0x1F) << 7;
            },

            // Read-only.
            29 | 31 => {},

            // Writing LZCS produces the leading sign bit count in LZCR.
            30 => {
                self.data_registers[30] = value;
                self.data_registers[31] = value.leading_sign_bits();
            },

            _ => {
                self.data_registers[index] = value;
            },
        }
    }

    /// This function reads a control register. Control reads are raw.
    pub fn read_control_reg(&self, reg: i32) -> i32 {

        let index = (reg & 31) as usize;
        debug!("get CP2CR{}={:08x}", index, self.control_registers[index]);
        self.control_registers[index]
    }

    /// This function writes a control register. Control writes are raw.
    pub fn write_control_reg(&mut self, reg: i32, value: i32) {

        let index = (reg & 31) as usize;
        debug!("set CP2CR{}={:08x}", index, value);
        self.control_registers[index] = value;
    }

    /// Raw data register access, bypassing every side effect.
    pub fn data_register(&self, reg: usize) -> i32 {
        self.data_registers[reg & 31]
    }

    /// Raw data register store, bypassing every side effect.
    pub fn set_data_register(&mut self, reg: usize, value: i32) {
        self.data_registers[reg & 31] = value;
    }

    /// Raw control register access.
    pub fn control_register(&self, reg: usize) -> i32 {
        self.control_registers[reg & 31]
    }

    /// Raw control register store.
    pub fn set_control_register(&mut self, reg: usize, value: i32) {
        self.control_registers[reg & 31] = value;
    }

    fn orgb(&self) -> i32 {

        let channel = |reg: usize| (self.data_registers[reg].low_half() as i32 >> 7).clamp(0, 0x1F);
        channel(9) | (channel(10) << 5) | (channel(11) << 10)
    }

    // Data register fields.

    /// Input vector 0 to 2.
    fn vertex(&self, n: usize) -> CP2Vector {
        CP2Vector::new(
            self.data_registers[n * 2].low_half() as i64,
            self.data_registers[n * 2].high_half() as i64,
            self.data_registers[n * 2 + 1].low_half() as i64
        )
    }

    /// The colour register as R, G, B, CODE.
    fn rgbc(&self) -> [u8; 4] {
        self.data_registers[6].to_le_bytes()
    }

    fn set_otz(&mut self, value: u16) {
        self.data_registers[7] = self.data_registers[7].with_low_half(value as i16);
    }

    /// IR0.
    fn ir0(&self) -> i64 {
        self.data_registers[8].low_half() as i64
    }

    fn set_ir0(&mut self, value: i32) {
        self.data_registers[8] = value;
    }

    /// IR1 to IR3 as a vector.
    fn ir(&self) -> CP2Vector {
        CP2Vector::new(
            self.data_registers[9].low_half() as i64,
            self.data_registers[10].low_half() as i64,
            self.data_registers[11].low_half() as i64
        )
    }

    fn set_ir(&mut self, values: [i32; 3]) {
        self.data_registers[9..12].copy_from_slice(&values);
    }

    /// Screen X of FIFO entry 0 to 2.
    fn sx(&self, n: usize) -> i64 {
        self.data_registers[12 + n].low_half() as i64
    }

    /// Screen Y of FIFO entry 0 to 2.
    fn sy(&self, n: usize) -> i64 {
        self.data_registers[12 + n].high_half() as i64
    }

    fn push_screen_xy(&mut self, value: i32) {
        self.data_registers[12] = self.data_registers[13];
        self.data_registers[13] = self.data_registers[14];
        self.data_registers[14] = value;
    }

    /// Screen Z of FIFO entry 0 to 3.
    fn sz(&self, n: usize) -> i64 {
        (self.data_registers[16 + n] & 0xFFFF) as i64
    }

    fn push_screen_z(&mut self, value: u16) {
        for n in 16..19 {
            let next = self.data_registers[n + 1].low_half();
            self.data_registers[n] = self.data_registers[n].with_low_half(next);
        }
        self.data_registers[19] = self.data_registers[19].with_low_half(value as i16);
    }

    /// Colour FIFO entry 0 to 2 as R, G, B, CODE.
    fn rgb_fifo(&self, n: usize) -> [u8; 4] {
        self.data_registers[20 + n].to_le_bytes()
    }

    fn push_rgb(&mut self, colour: [u8; 4]) {
        self.data_registers[20] = self.data_registers[21];
        self.data_registers[21] = self.data_registers[22];
        self.data_registers[22] = i32::from_byte_lanes(colour);
    }

    fn set_mac0(&mut self, value: i32) {
        self.data_registers[24] = value;
    }

    /// MAC1 to MAC3 as a vector.
    fn mac(&self) -> CP2Vector {
        CP2Vector::new(
            self.data_registers[25] as i64,
            self.data_registers[26] as i64,
            self.data_registers[27] as i64
        )
    }

    fn set_mac(&mut self, values: [i32; 3]) {
        self.data_registers[25..28].copy_from_slice(&values);
    }

    // Control register fields.

    fn packed_matrix(&self, base: usize) -> CP2Matrix {

        let mut words = [0; 5];
        words.copy_from_slice(&self.control_registers[base..base + 5]);
        CP2Matrix::from_packed(&words)
    }

    fn control_vector(&self, base: usize) -> CP2Vector {
        CP2Vector::new(
            self.control_registers[base] as i64,
            self.control_registers[base + 1] as i64,
            self.control_registers[base + 2] as i64
        )
    }

    fn rotation_matrix(&self) -> CP2Matrix {
        self.packed_matrix(0)
    }

    fn translation(&self) -> CP2Vector {
        self.control_vector(5)
    }

    fn light_matrix(&self) -> CP2Matrix {
        self.packed_matrix(8)
    }

    fn background_colour(&self) -> CP2Vector {
        self.control_vector(13)
    }

    fn light_colour_matrix(&self) -> CP2Matrix {
        self.packed_matrix(16)
    }

    fn far_colour(&self) -> CP2Vector {
        self.control_vector(21)
    }

    fn offset_x(&self) -> i64 {
        self.control_registers[24] as i64
    }

    fn offset_y(&self) -> i64 {
        self.control_registers[25] as i64
    }

    /// Projection plane distance, unsigned.
    fn h(&self) -> u32 {
        (self.control_registers[26] & 0xFFFF) as u32
    }

    fn dqa(&self) -> i64 {
        self.control_registers[27].low_half() as i64
    }

    fn dqb(&self) -> i64 {
        self.control_registers[28] as i64
    }

    fn zsf3(&self) -> i64 {
        self.control_registers[29].low_half() as i64
    }

    fn zsf4(&self) -> i64 {
        self.control_registers[30].low_half() as i64
    }

    fn flag(&self) -> i32 {
        self.control_registers[31]
    }

    fn set_flag(&mut self, value: i32) {
        self.control_registers[31] = value;
    }
}

#[cfg(test)]
mod tests;
