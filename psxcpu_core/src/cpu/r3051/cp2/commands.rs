// SPDX-License-Identifier: GPL-3.0
// commands.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use log::debug;
use psxcpu_utility::RegisterLanes;
use super::CP2;
use super::math::{CP2Matrix, CP2Vector};

// FLAG register bits, per channel where a command works on three.
const MAC_POSITIVE: [i32; 3] = [1 << 30, 1 << 29, 1 << 28];
const MAC_NEGATIVE: [i32; 3] = [1 << 27, 1 << 26, 1 << 25];
const IR_SATURATED: [i32; 3] = [1 << 24, 1 << 23, 1 << 22];
const COLOUR_SATURATED: [i32; 3] = [1 << 21, 1 << 20, 1 << 19];
const SZ_SATURATED: i32 = 1 << 18;
const DIVIDE_OVERFLOW: i32 = 1 << 17;
const MAC0_POSITIVE: i32 = 1 << 16;
const MAC0_NEGATIVE: i32 = 1 << 15;
const SX2_SATURATED: i32 = 1 << 14;
const SY2_SATURATED: i32 = 1 << 13;
const IR0_SATURATED: i32 = 1 << 12;
const FLAG_ERROR: i32 = 1 << 31;

/// Bits that are summarised into the error bit.
const FLAG_ERROR_SOURCES: i32 = 0x7F87E000;

/// The option fields of a GTE command word.
#[derive(Copy, Clone, Debug)]
struct CommandFields {
    number: i32,
    shift: u32,
    matrix: i32,
    vector: i32,
    translation: i32,
    lm: bool,
}

impl CommandFields {

    fn decode(command: i32) -> Self {
        CommandFields {
            number: command & 0x3F,
            shift: (((command >> 19) & 1) * 12) as u32,
            matrix: (command >> 17) & 3,
            vector: (command >> 15) & 3,
            translation: (command >> 13) & 3,
            lm: (command >> 10) & 1 == 1,
        }
    }
}

type Command = fn(&mut CP2, CommandFields);

impl CP2 {

    /// Executes a GTE command word. Returns false, leaving every register
    /// untouched, when the command number is not one the GTE implements.
    pub fn execute(&mut self, command: i32) -> bool {

        let fields = CommandFields::decode(command & 0x1FFFFFF);
        let operation: Command = match fields.number {
            0x01 => CP2::rtps,
            0x06 => CP2::nclip,
            0x0C => CP2::op,
            0x10 => CP2::dpcs,
            0x11 => CP2::intpl,
            0x12 => CP2::mvmva,
            0x13 => CP2::ncds,
            0x14 => CP2::cdp,
            0x16 => CP2::ncdt,
            0x1B => CP2::nccs,
            0x1C => CP2::cc,
            0x1E => CP2::ncs,
            0x20 => CP2::nct,
            0x28 => CP2::sqr,
            0x29 => CP2::dcpl,
            0x2A => CP2::dpct,
            0x2D => CP2::avsz3,
            0x2E => CP2::avsz4,
            0x30 => CP2::rtpt,
            0x3D => CP2::gpf,
            0x3E => CP2::gpl,
            0x3F => CP2::ncct,
            _ => {
                debug!("unknown GTE command {:07x}", command & 0x1FFFFFF);
                return false;
            }
        };

        self.set_flag(0);
        operation(self, fields);

        if self.flag() & FLAG_ERROR_SOURCES != 0 {
            self.raise_flag(FLAG_ERROR);
        }

        true
    }

    fn rtps(&mut self, _fields: CommandFields) {
        self.perspective_transform(0);
    }

    fn rtpt(&mut self, _fields: CommandFields) {
        for vertex in 0..3 {
            self.perspective_transform(vertex);
        }
    }

    fn nclip(&mut self, _fields: CommandFields) {

        let (sx0, sx1, sx2) = (self.sx(0), self.sx(1), self.sx(2));
        let (sy0, sy1, sy2) = (self.sy(0), self.sy(1), self.sy(2));
        let value = sx0 * sy1 + sx1 * sy2 + sx2 * sy0 - sx0 * sy2 - sx1 * sy0 - sx2 * sy1;

        let mac0 = self.limit_mac0(value);
        self.set_mac0(mac0);
    }

    fn op(&mut self, fields: CommandFields) {

        let d = self.rotation_matrix().diagonal();
        let ir = self.ir();
        let product = CP2Vector::new(
            d.middle() * ir.bottom() - d.bottom() * ir.middle(),
            d.bottom() * ir.top() - d.top() * ir.bottom(),
            d.top() * ir.middle() - d.middle() * ir.top()
        );

        let mac = self.store_mac(product >> fields.shift);
        self.store_ir(mac, false);
    }

    fn dpcs(&mut self, _fields: CommandFields) {

        let colour = self.rgbc();
        self.depth_cue_colour(colour);
    }

    fn dpct(&mut self, _fields: CommandFields) {

        // Each pass consumes the oldest FIFO entry as the next one is pushed.
        for _ in 0..3 {
            let colour = self.rgb_fifo(0);
            self.depth_cue_colour(colour);
        }
    }

    fn intpl(&mut self, _fields: CommandFields) {

        let ir0 = self.ir0();
        let ir = self.ir().to_array();
        let far = self.far_colour().to_array();

        let mut values = [0; 3];
        for channel in 0..3 {
            let difference = self.limit_ir(channel, far[channel] - ir[channel], false) as i64;
            values[channel] = ((ir[channel] << 12) + ir0 * difference) >> 12;
        }

        let mac = self.store_mac(CP2Vector::new(values[0], values[1], values[2]));
        self.store_ir(mac, false);
        self.push_colour();
    }

    fn mvmva(&mut self, fields: CommandFields) {

        let matrix = match fields.matrix {
            0 => self.rotation_matrix(),
            1 => self.light_matrix(),
            2 => self.light_colour_matrix(),
            _ => CP2Matrix::zero(),
        };
        let vector = match fields.vector {
            3 => self.ir(),
            n => self.vertex(n as usize),
        };
        let translation = match fields.translation {
            0 => self.translation(),
            1 => self.background_colour(),
            2 => self.far_colour(),
            _ => CP2Vector::new(0, 0, 0),
        };

        let mac = self.store_mac(((translation << 12) + matrix * vector) >> fields.shift);
        self.store_ir(mac, fields.lm);
    }

    fn ncs(&mut self, _fields: CommandFields) {
        self.ncs_vertex(0);
    }

    fn nct(&mut self, _fields: CommandFields) {
        for vertex in 0..3 {
            self.ncs_vertex(vertex);
        }
    }

    fn ncds(&mut self, _fields: CommandFields) {
        self.ncds_vertex(0);
    }

    fn ncdt(&mut self, _fields: CommandFields) {
        for vertex in 0..3 {
            self.ncds_vertex(vertex);
        }
    }

    fn cdp(&mut self, _fields: CommandFields) {

        self.light_colour();
        self.depth_cue_lit_colour();
        self.push_colour();
    }

    fn dcpl(&mut self, _fields: CommandFields) {

        self.depth_cue_lit_colour();
        self.push_colour();
    }

    fn nccs(&mut self, _fields: CommandFields) {
        self.nccs_vertex(0);
    }

    fn ncct(&mut self, _fields: CommandFields) {
        for vertex in 0..3 {
            self.nccs_vertex(vertex);
        }
    }

    fn cc(&mut self, _fields: CommandFields) {

        self.light_colour();
        self.colour_multiply();
        self.push_colour();
    }

    fn sqr(&mut self, fields: CommandFields) {

        let ir = self.ir().to_array();
        let squares = CP2Vector::new(ir[0] * ir[0], ir[1] * ir[1], ir[2] * ir[2]);

        let mac = self.store_mac(squares >> fields.shift);
        self.store_ir(mac, true);
    }

    fn avsz3(&mut self, _fields: CommandFields) {

        let sum = self.sz(1) + self.sz(2) + self.sz(3);
        let value = self.zsf3() * sum;
        self.average_z(value);
    }

    fn avsz4(&mut self, _fields: CommandFields) {

        let sum = self.sz(0) + self.sz(1) + self.sz(2) + self.sz(3);
        let value = self.zsf4() * sum;
        self.average_z(value);
    }

    fn gpf(&mut self, fields: CommandFields) {

        let ir0 = self.ir0();
        let ir = self.ir();
        let weighted = CP2Vector::new(ir0 * ir.top(), ir0 * ir.middle(), ir0 * ir.bottom());

        let mac = self.store_mac(weighted >> fields.shift);
        self.store_ir(mac, false);
        self.push_colour();
    }

    fn gpl(&mut self, fields: CommandFields) {

        let ir0 = self.ir0();
        let ir = self.ir();
        let weighted = CP2Vector::new(ir0 * ir.top(), ir0 * ir.middle(), ir0 * ir.bottom());

        let mac = self.store_mac(((self.mac() << fields.shift) + weighted) >> fields.shift);
        self.store_ir(mac, false);
        self.push_colour();
    }

    // Shared stages.

    /// Rotates, translates and projects one vertex, pushing the SZ and SXY
    /// FIFOs and producing the depth cueing factor in MAC0 and IR0.
    fn perspective_transform(&mut self, vertex: usize) {

        let product = (self.translation() << 12) + self.rotation_matrix() * self.vertex(vertex);
        let mac = self.store_mac(product >> 12);
        self.store_ir(mac, false);

        let z = self.limit_sz(mac[2] as i64);
        self.push_screen_z(z);

        let quotient = self.divide() as i64;
        let ir = self.ir();

        // The screen sums are flagged like MAC0 but shifted at full width.
        let x = self.check_mac0(self.offset_x() + ir.top() * quotient) >> 16;
        let y = self.check_mac0(self.offset_y() + ir.middle() * quotient) >> 16;
        let sx = self.limit_sxy(SX2_SATURATED, x);
        let sy = self.limit_sxy(SY2_SATURATED, y);
        self.push_screen_xy(i32::from_halves(sx as i16, sy as i16));

        let mac0 = self.limit_mac0(self.dqb() + self.dqa() * quotient);
        self.set_mac0(mac0);
        let ir0 = self.limit_ir0(mac0 >> 12);
        self.set_ir0(ir0);
    }

    /// The unsigned perspective divide of H by SZ3.
    fn divide(&mut self) -> u32 {

        let h = self.h();
        let mut z = self.sz(3) as u32;

        if z < h / 2 {
            z = h / 2;
            self.raise_flag(DIVIDE_OVERFLOW);
        }
        if z == 0 {
            z = 1;
        }

        (h << 16) / z
    }

    fn depth_cue_colour(&mut self, colour: [u8; 4]) {

        let ir0 = self.ir0();
        let far = self.far_colour().to_array();

        let mut values = [0; 3];
        for channel in 0..3 {
            let c = colour[channel] as i64;
            let difference = self.limit_ir(channel, far[channel] - (c << 4), false) as i64;
            values[channel] = ((c << 16) + ir0 * difference) >> 12;
        }

        let mac = self.store_mac(CP2Vector::new(values[0], values[1], values[2]));
        self.store_ir(mac, false);
        self.push_colour();
    }

    fn ncs_vertex(&mut self, vertex: usize) {

        self.light_source(vertex);
        self.light_colour();
        self.push_colour();
    }

    fn ncds_vertex(&mut self, vertex: usize) {

        self.light_source(vertex);
        self.light_colour();
        self.depth_cue_lit_colour();
        self.push_colour();
    }

    fn nccs_vertex(&mut self, vertex: usize) {

        self.light_source(vertex);
        self.light_colour();
        self.colour_multiply();
        self.push_colour();
    }

    /// Light matrix times the vertex normal.
    fn light_source(&mut self, vertex: usize) {

        let mac = self.store_mac((self.light_matrix() * self.vertex(vertex)) >> 12);
        self.store_ir(mac, true);
    }

    /// Background colour plus light colour matrix times IR.
    fn light_colour(&mut self) {

        let product = (self.background_colour() << 12) + self.light_colour_matrix() * self.ir();
        let mac = self.store_mac(product >> 12);
        self.store_ir(mac, true);
    }

    /// Colour times IR, interpolated towards the far colour by IR0.
    fn depth_cue_lit_colour(&mut self) {

        let colour = self.rgbc();
        let ir0 = self.ir0();
        let ir = self.ir().to_array();
        let far = self.far_colour().to_array();

        let mut values = [0; 3];
        for channel in 0..3 {
            let c = colour[channel] as i64;
            let lit = (c * ir[channel]) >> 8;
            let difference = self.limit_ir(channel, far[channel] - lit, false) as i64;
            values[channel] = ((c << 4) * ir[channel] + ir0 * difference) >> 12;
        }

        let mac = self.store_mac(CP2Vector::new(values[0], values[1], values[2]));
        self.store_ir(mac, true);
    }

    /// Colour times IR.
    fn colour_multiply(&mut self) {

        let colour = self.rgbc();
        let ir = self.ir().to_array();

        let mut values = [0; 3];
        for channel in 0..3 {
            values[channel] = ((colour[channel] as i64) * ir[channel]) >> 8;
        }

        let mac = self.store_mac(CP2Vector::new(values[0], values[1], values[2]));
        self.store_ir(mac, true);
    }

    fn average_z(&mut self, value: i64) {

        let mac0 = self.limit_mac0(value);
        self.set_mac0(mac0);
        let otz = self.limit_sz((mac0 >> 12) as i64);
        self.set_otz(otz);
    }

    /// Pushes MAC1 to MAC3 onto the colour FIFO, keeping CODE from RGB.
    fn push_colour(&mut self) {

        let mac = self.mac().to_array();
        let code = self.rgbc()[3];
        let colour = [
            self.limit_colour(0, mac[0] >> 4),
            self.limit_colour(1, mac[1] >> 4),
            self.limit_colour(2, mac[2] >> 4),
            code,
        ];
        self.push_rgb(colour);
    }

    // Saturation and overflow checks. Each one records its FLAG bit.

    fn raise_flag(&mut self, bit: i32) {

        let flag = self.flag();
        self.set_flag(flag | bit);
    }

    /// Checks MAC1 to MAC3 for 32-bit overflow and stores the truncated values.
    fn store_mac(&mut self, values: CP2Vector) -> [i32; 3] {

        let mut mac = [0; 3];
        for (channel, value) in values.to_array().into_iter().enumerate() {
            if value > i32::MAX as i64 {
                self.raise_flag(MAC_POSITIVE[channel]);
            } else if value < i32::MIN as i64 {
                self.raise_flag(MAC_NEGATIVE[channel]);
            }
            mac[channel] = value as i32;
        }

        self.set_mac(mac);
        mac
    }

    fn store_ir(&mut self, mac: [i32; 3], lm: bool) {

        let ir = [
            self.limit_ir(0, mac[0] as i64, lm),
            self.limit_ir(1, mac[1] as i64, lm),
            self.limit_ir(2, mac[2] as i64, lm),
        ];
        self.set_ir(ir);
    }

    fn limit_ir(&mut self, channel: usize, value: i64, lm: bool) -> i32 {

        let min = if lm { 0 } else { -0x8000 };
        self.saturate(value, min, 0x7FFF, IR_SATURATED[channel]) as i32
    }

    fn limit_colour(&mut self, channel: usize, value: i64) -> u8 {
        self.saturate(value, 0, 0xFF, COLOUR_SATURATED[channel]) as u8
    }

    fn limit_sz(&mut self, value: i64) -> u16 {
        self.saturate(value, 0, 0xFFFF, SZ_SATURATED) as u16
    }

    /// Records MAC0 overflow without touching the value.
    fn check_mac0(&mut self, value: i64) -> i64 {

        if value > i32::MAX as i64 {
            self.raise_flag(MAC0_POSITIVE);
        } else if value < i32::MIN as i64 {
            self.raise_flag(MAC0_NEGATIVE);
        }
        value
    }

    fn limit_mac0(&mut self, value: i64) -> i32 {
        self.check_mac0(value) as i32
    }

    fn limit_sxy(&mut self, bit: i32, value: i64) -> i32 {
        self.saturate(value, -0x400, 0x3FF, bit) as i32
    }

    fn limit_ir0(&mut self, value: i32) -> i32 {
        self.saturate(value as i64, 0, 0xFFF, IR0_SATURATED) as i32
    }

    fn saturate(&mut self, value: i64, min: i64, max: i64, bit: i32) -> i64 {

        if value < min || value > max {
            self.raise_flag(bit);
        }
        value.clamp(min, max)
    }
}
