// SPDX-License-Identifier: GPL-3.0
// psx_motherboard.rs - Copyright Phillip Potter, 2025, under GPLv3 only.

use std::path::Path;
use log::{error, warn};
use super::BoardError;
use crate::cpu::CpuBridge;

/// Size of the RAM area in bytes.
const RAM_SIZE: usize = 2097152;

/// Size of the scratchpad area in bytes.
const SCRATCHPAD_SIZE: usize = 1024;

/// Size of the BIOS area in bytes.
pub const BIOS_SIZE: usize = 524288;

/// Physical base addresses.
const RAM_MIRROR_END: u32 = 0x007FFFFF;
const SCRATCHPAD_BASE: u32 = 0x1F800000;
const BIOS_BASE: u32 = 0x1FC00000;

/// Which memory area a physical address falls in, with the offset into it.
#[derive(Copy, Clone, Debug, PartialEq)]
enum Region {
    Ram(usize),
    Scratchpad(usize),
    Bios(usize),
    Unmapped,
}

/// Folds KUSEG, KSEG0 and KSEG1 onto physical memory and picks the area.
fn decode(address: i32) -> Region {

    let physical = (address as u32) & 0x1FFFFFFF;
    match physical {
        0..=RAM_MIRROR_END => Region::Ram(physical as usize & (RAM_SIZE - 1)),
        SCRATCHPAD_BASE..=0x1F8003FF => Region::Scratchpad((physical - SCRATCHPAD_BASE) as usize),
        BIOS_BASE..=0x1FC7FFFF => Region::Bios((physical - BIOS_BASE) as usize),
        _ => Region::Unmapped,
    }
}

/// This struct models the memory side of the PlayStation 'motherboard': RAM,
/// the scratchpad and the BIOS. It is the bridge the CPU runs against, and
/// keeps a record of the CPU's notifications for inspection.
pub struct PsxMotherboard {

    // 2MiB of RAM (heap allocated).
    ram: Vec<i8>,

    // 1 KiB of scratchpad area (heap allocated). Strictly speaking
    // this is inside the CPU in the real hardware, but makes more
    // sense to put it here.
    scratchpad: Vec<i8>,

    // 512 KiB of BIOS (heap allocated). This stores the BIOS once
    // it is copied into memory.
    bios: Vec<i8>,

    // Every interrupt line the CPU acknowledged, in order.
    acknowledged_interrupts: Vec<i32>,

    // Every address the program counter jumped to, in order.
    pc_changes: Vec<i32>,

    // Every unimplemented instruction reported, as (pc, instruction).
    unimplemented: Vec<(i32, i32)>,

    // How many times the CPU asked a debugger to stop.
    debugger_stops: usize,
}

/// Implementation functions for the motherboard itself.
impl PsxMotherboard {

    /// Creates a new motherboard object with the given BIOS image.
    pub fn new(bios_data: &[i8]) -> Result<Self, BoardError> {

        if bios_data.len() != BIOS_SIZE {
            return Err(BoardError::BiosSize {
                expected: BIOS_SIZE,
                actual: bios_data.len(),
            });
        }

        let mut motherboard = PsxMotherboard::with_blank_bios();

        // Populate BIOS with passed in data.
        motherboard.load_bios_data_to_memory(bios_data);

        Ok(motherboard)
    }

    /// Creates a new motherboard object with an all-zero BIOS.
    pub fn with_blank_bios() -> Self {
        PsxMotherboard {

            // Setup memory areas.
            ram: vec![0; RAM_SIZE],
            scratchpad: vec![0; SCRATCHPAD_SIZE],
            bios: vec![0; BIOS_SIZE],

            acknowledged_interrupts: Vec::new(),
            pc_changes: Vec::new(),
            unimplemented: Vec::new(),
            debugger_stops: 0,
        }
    }

    /// Creates a new motherboard object from a BIOS image on disk.
    pub fn from_bios_file(path: &Path) -> Result<Self, BoardError> {

        let bytes = std::fs::read(path)?;
        let bios_data: Vec<i8> = bytes.into_iter().map(|byte| byte as i8).collect();
        PsxMotherboard::new(&bios_data)
    }

    /// Copies the bytes from the passed in slice to our BIOS memory area.
    fn load_bios_data_to_memory(&mut self, bios_data: &[i8]) {
        self.bios.copy_from_slice(bios_data);
    }

    /// Stores words starting at the given address, bypassing the BIOS write
    /// protection. Used to place programs in memory.
    pub fn load_words(&mut self, address: i32, words: &[i32]) {

        for (index, word) in words.iter().enumerate() {
            let target = address.wrapping_add((index * 4) as i32);
            for (lane, byte) in word.to_le_bytes().into_iter().enumerate() {
                if let Some(cell) = self.cell(target.wrapping_add(lane as i32), true) {
                    *cell = byte as i8;
                }
            }
        }
    }

    /// Interrupt lines acknowledged so far.
    pub fn acknowledged_interrupts(&self) -> &[i32] {
        &self.acknowledged_interrupts
    }

    /// Program counter jumps reported so far.
    pub fn pc_changes(&self) -> &[i32] {
        &self.pc_changes
    }

    /// Unimplemented instructions reported so far, as (pc, instruction).
    pub fn unimplemented_reports(&self) -> &[(i32, i32)] {
        &self.unimplemented
    }

    /// Debugger stop requests so far.
    pub fn debugger_stops(&self) -> usize {
        self.debugger_stops
    }

    /// Returns the byte backing an address, if there is one. The BIOS is
    /// only handed out when `allow_bios` is set.
    fn cell(&mut self, address: i32, allow_bios: bool) -> Option<&mut i8> {
        match decode(address) {
            Region::Ram(offset) => self.ram.get_mut(offset),
            Region::Scratchpad(offset) => self.scratchpad.get_mut(offset),
            Region::Bios(offset) if allow_bios => self.bios.get_mut(offset),
            Region::Bios(_) | Region::Unmapped => None,
        }
    }

    fn read_bytes<const N: usize>(&mut self, address: i32) -> [u8; N] {

        let mut bytes = [0; N];
        let region = decode(address);
        if region == Region::Unmapped {
            warn!("read of {} bytes from unmapped address {:08x}", N, address);
            return bytes;
        }

        for (lane, byte) in bytes.iter_mut().enumerate() {
            if let Some(cell) = self.cell(address.wrapping_add(lane as i32), true) {
                *byte = *cell as u8;
            }
        }
        bytes
    }

    fn write_bytes(&mut self, address: i32, bytes: &[u8]) {

        match decode(address) {
            Region::Unmapped => {
                warn!("write of {} bytes to unmapped address {:08x}", bytes.len(), address);
            },
            Region::Bios(_) => {
                warn!("write of {} bytes to BIOS address {:08x} dropped", bytes.len(), address);
            },
            _ => {
                for (lane, byte) in bytes.iter().enumerate() {
                    if let Some(cell) = self.cell(address.wrapping_add(lane as i32), false) {
                        *cell = *byte as i8;
                    }
                }
            },
        }
    }
}

/// The CPU's view of the board.
impl CpuBridge for PsxMotherboard {

    fn read_byte(&mut self, address: i32) -> i8 {
        self.read_bytes::<1>(address)[0] as i8
    }

    fn read_half(&mut self, address: i32) -> i16 {
        i16::from_le_bytes(self.read_bytes::<2>(address))
    }

    fn read_word(&mut self, address: i32) -> i32 {
        i32::from_le_bytes(self.read_bytes::<4>(address))
    }

    fn write_byte(&mut self, address: i32, value: i8) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    fn write_half(&mut self, address: i32, value: i16) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    fn write_word(&mut self, address: i32, value: i32) {
        self.write_bytes(address, &value.to_le_bytes());
    }

    fn change_pc(&mut self, address: i32) {
        self.pc_changes.push(address);
    }

    fn acknowledge_interrupt(&mut self, line: i32) {
        self.acknowledged_interrupts.push(line);
    }

    fn unimplemented(&mut self, pc: i32, instruction: i32, what: &str) {

        error!("{:08x}: {} not supported (instruction {:08x})", pc, what, instruction);
        self.unimplemented.push((pc, instruction));
    }

    fn debugger_stop(&mut self) {
        self.debugger_stops += 1;
    }
}
