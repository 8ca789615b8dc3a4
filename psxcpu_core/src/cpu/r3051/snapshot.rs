// SPDX-License-Identifier: GPL-3.0
// snapshot.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

// Save state codec for the R3051. The blob is fixed-size, little-endian and
// made of u32 words only:
//
//   magic "R3KS", version, op, pc, delay register, delay value, hi, lo,
//   r[32], cp0[32], cp2 control[32], cp2 data[32]

use log::warn;
use super::R3051;
use super::delay_slot::DelaySlot;
use crate::cpu::CpuError;

const MAGIC: u32 = u32::from_le_bytes(*b"R3KS");
const VERSION: u32 = 1;

/// Total blob size in bytes.
pub const SNAPSHOT_SIZE: usize = (8 + 128) * 4;

struct StateWriter {
    buf: Vec<u8>,
}

impl StateWriter {

    fn new() -> Self {
        StateWriter {
            buf: Vec::with_capacity(SNAPSHOT_SIZE),
        }
    }

    fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    fn write_i32(&mut self, value: i32) {
        self.write_u32(value as u32);
    }

    fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

struct StateReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> StateReader<'a> {

    fn new(data: &'a [u8]) -> Self {
        StateReader { data, pos: 0 }
    }

    fn read_u32(&mut self) -> Result<u32, CpuError> {

        let bytes = self.data
            .get(self.pos..self.pos + 4)
            .and_then(|slice| <[u8; 4]>::try_from(slice).ok())
            .ok_or(CpuError::SnapshotLength {
                expected: SNAPSHOT_SIZE,
                actual: self.data.len(),
            })?;
        self.pos += 4;
        Ok(u32::from_le_bytes(bytes))
    }

    fn read_i32(&mut self) -> Result<i32, CpuError> {
        Ok(self.read_u32()? as i32)
    }

    fn read_bank(&mut self) -> Result<[i32; 32], CpuError> {

        let mut bank = [0; 32];
        for value in bank.iter_mut() {
            *value = self.read_i32()?;
        }
        Ok(bank)
    }
}

impl R3051 {

    pub(super) fn save_state(&self) -> Vec<u8> {

        let mut w = StateWriter::new();

        w.write_u32(MAGIC);
        w.write_u32(VERSION);
        w.write_i32(self.current_instruction);
        w.write_i32(self.program_counter);
        w.write_i32(self.delay_slot.register_number());
        w.write_i32(self.delay_slot.value());
        w.write_i32(self.hi_reg);
        w.write_i32(self.lo_reg);

        for value in self.general_registers {
            w.write_i32(value);
        }
        for reg in 0..32 {
            w.write_i32(self.sccp.read_reg(reg));
        }
        for reg in 0..32 {
            w.write_i32(self.gte.control_register(reg));
        }
        for reg in 0..32 {
            w.write_i32(self.gte.data_register(reg));
        }

        w.into_bytes()
    }

    /// Restores a saved blob. Nothing is changed unless the whole blob is
    /// valid.
    pub(super) fn load_state(&mut self, state: &[u8]) -> Result<(), CpuError> {

        if state.len() != SNAPSHOT_SIZE {
            warn!("rejecting snapshot of {} bytes", state.len());
            return Err(CpuError::SnapshotLength {
                expected: SNAPSHOT_SIZE,
                actual: state.len(),
            });
        }

        let mut r = StateReader::new(state);

        let magic = r.read_u32()?;
        if magic != MAGIC {
            warn!("rejecting snapshot with magic {:08x}", magic);
            return Err(CpuError::SnapshotMagic(magic));
        }
        let version = r.read_u32()?;
        if version != VERSION {
            warn!("rejecting snapshot version {}", version);
            return Err(CpuError::SnapshotVersion(version));
        }

        let op = r.read_i32()?;
        let pc = r.read_i32()?;
        let delay_register = r.read_u32()?;
        let delay_value = r.read_i32()?;
        let slot = DelaySlot::from_parts(delay_register as i32, delay_value)
            .ok_or(CpuError::SnapshotDelaySlot(delay_register))?;
        let hi = r.read_i32()?;
        let lo = r.read_i32()?;
        let general_registers = r.read_bank()?;
        let cp0_registers = r.read_bank()?;
        let control_registers = r.read_bank()?;
        let data_registers = r.read_bank()?;

        // Everything is validated, so commit.
        self.current_instruction = op;
        self.set_pc(pc);
        self.delay_slot = slot;
        self.hi_reg = hi;
        self.lo_reg = lo;
        self.general_registers = general_registers;
        self.general_registers[0] = 0;
        for (reg, value) in cp0_registers.into_iter().enumerate() {
            self.sccp.write_reg(reg as i32, value, true);
        }
        for (reg, value) in control_registers.into_iter().enumerate() {
            self.gte.set_control_register(reg, value);
        }
        for (reg, value) in data_registers.into_iter().enumerate() {
            self.gte.set_data_register(reg, value);
        }

        Ok(())
    }
}
