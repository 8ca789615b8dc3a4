// SPDX-License-Identifier: GPL-3.0
// registers.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use super::R3051;
use super::delay_slot::{DelaySlot, PC_SLOT};
use crate::cpu::CpuError;

/// ABI names of the general registers.
const GENERAL_NAMES: [&str; 32] = [
    "zero", "at", "v0", "v1", "a0", "a1", "a2", "a3",
    "t0", "t1", "t2", "t3", "t4", "t5", "t6", "t7",
    "s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7",
    "t8", "t9", "k0", "k1", "gp", "sp", "fp", "ra",
];

/// Names of the CP0 registers the PlayStation gives meaning to.
const CP0_NAMES: [Option<&str>; 16] = [
    Some("Index"), Some("Random"), Some("EntryLo"), None,
    Some("Context"), None, None, None,
    Some("BadVAddr"), None, Some("EntryHi"), None,
    Some("SR"), Some("Cause"), Some("EPC"), Some("PRId"),
];

const GTE_DATA_NAMES: [&str; 32] = [
    "vxy0", "vz0", "vxy1", "vz1", "vxy2", "vz2", "rgb", "otz",
    "ir0", "ir1", "ir2", "ir3", "sxy0", "sxy1", "sxy2", "sxyp",
    "sz0", "sz1", "sz2", "sz3", "rgb0", "rgb1", "rgb2", "res1",
    "mac0", "mac1", "mac2", "mac3", "irgb", "orgb", "lzcs", "lzcr",
];

const GTE_CONTROL_NAMES: [&str; 32] = [
    "r11r12", "r13r21", "r22r23", "r31r32", "r33", "trx", "try", "trz",
    "l11l12", "l13l21", "l22l23", "l31l32", "l33", "rbk", "gbk", "bbk",
    "lr1lr2", "lr31g1", "lg2lg3", "lb1lb2", "lb3", "rfc", "gfc", "bfc",
    "ofx", "ofy", "h", "dqa", "dqb", "zsf3", "zsf4", "flag",
];

/// Stable identifiers for every register the host can read or write.
/// The numeric form is what debuggers and save tools exchange:
///
/// | id       | register                  |
/// |----------|---------------------------|
/// | 0        | PC                        |
/// | 1        | delay slot value          |
/// | 2        | delay slot register       |
/// | 3, 4     | HI, LO                    |
/// | 5-36     | general registers 0 to 31 |
/// | 37-68    | CP0 registers 0 to 31     |
/// | 69-100   | GTE data registers        |
/// | 101-132  | GTE control registers     |
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RegisterId {
    Pc,
    DelayValue,
    DelayRegister,
    Hi,
    Lo,
    General(usize),
    Cp0(usize),
    GteData(usize),
    GteControl(usize),
}

impl RegisterId {

    /// Number of numeric identifiers in use.
    pub const COUNT: i32 = 133;

    /// The numeric identifier.
    pub fn id(self) -> i32 {
        match self {
            RegisterId::Pc => 0,
            RegisterId::DelayValue => 1,
            RegisterId::DelayRegister => 2,
            RegisterId::Hi => 3,
            RegisterId::Lo => 4,
            RegisterId::General(n) => 5 + (n & 31) as i32,
            RegisterId::Cp0(n) => 37 + (n & 31) as i32,
            RegisterId::GteData(n) => 69 + (n & 31) as i32,
            RegisterId::GteControl(n) => 101 + (n & 31) as i32,
        }
    }

    /// Every register, in identifier order.
    pub fn all() -> impl Iterator<Item = RegisterId> {
        (0..RegisterId::COUNT).filter_map(|id| RegisterId::try_from(id).ok())
    }

    /// The display name, as used by the formatter.
    pub fn name(self) -> String {
        match self {
            RegisterId::Pc => "pc".to_string(),
            RegisterId::DelayValue => "delayv".to_string(),
            RegisterId::DelayRegister => "delayr".to_string(),
            RegisterId::Hi => "hi".to_string(),
            RegisterId::Lo => "lo".to_string(),
            RegisterId::General(n) => GENERAL_NAMES[n & 31].to_string(),
            RegisterId::Cp0(n) => match CP0_NAMES.get(n & 31).copied().flatten() {
                Some(name) => name.to_string(),
                None => format!("cp0r{}", n & 31),
            },
            RegisterId::GteData(n) => GTE_DATA_NAMES[n & 31].to_string(),
            RegisterId::GteControl(n) => GTE_CONTROL_NAMES[n & 31].to_string(),
        }
    }
}

impl TryFrom<i32> for RegisterId {

    type Error = CpuError;

    fn try_from(id: i32) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(RegisterId::Pc),
            1 => Ok(RegisterId::DelayValue),
            2 => Ok(RegisterId::DelayRegister),
            3 => Ok(RegisterId::Hi),
            4 => Ok(RegisterId::Lo),
            5..=36 => Ok(RegisterId::General((id - 5) as usize)),
            37..=68 => Ok(RegisterId::Cp0((id - 37) as usize)),
            69..=100 => Ok(RegisterId::GteData((id - 69) as usize)),
            101..=132 => Ok(RegisterId::GteControl((id - 101) as usize)),
            _ => Err(CpuError::UnknownRegister(id)),
        }
    }
}

/// Indexed register access for the host.
impl R3051 {

    pub(super) fn read_register(&self, reg: RegisterId) -> i32 {
        match reg {
            RegisterId::Pc => self.program_counter,
            RegisterId::DelayValue => self.delay_slot.value(),
            RegisterId::DelayRegister => self.delay_slot.register_number(),
            RegisterId::Hi => self.hi_reg,
            RegisterId::Lo => self.lo_reg,
            RegisterId::General(n) => self.general_registers[n & 31],
            RegisterId::Cp0(n) => self.sccp.read_reg(n as i32),
            RegisterId::GteData(n) => self.gte.data_register(n),
            RegisterId::GteControl(n) => self.gte.control_register(n),
        }
    }

    pub(super) fn write_register(&mut self, reg: RegisterId, value: i32) {

        match reg {
            RegisterId::Pc => self.set_pc(value),

            // The two delay slot halves are written separately, so each one
            // rebuilds the slot from the other's current value.
            RegisterId::DelayValue => {
                let register = self.delay_slot.register_number();
                if let Some(slot) = DelaySlot::from_parts(register, value) {
                    self.delay_slot = slot;
                }
            },
            RegisterId::DelayRegister => {
                if (0..=PC_SLOT).contains(&value) {
                    let pending = self.delay_slot.value();
                    if let Some(slot) = DelaySlot::from_parts(value, pending) {
                        self.delay_slot = slot;
                    }
                }
            },

            RegisterId::Hi => self.hi_reg = value,
            RegisterId::Lo => self.lo_reg = value,
            RegisterId::General(n) => {
                if n & 31 != 0 {
                    self.general_registers[n & 31] = value;
                }
            },
            RegisterId::Cp0(n) => {
                self.sccp.write_reg(n as i32, value, true);
                self.check_status_and_cause();
            },
            RegisterId::GteData(n) => self.gte.set_data_register(n, value),
            RegisterId::GteControl(n) => self.gte.set_control_register(n, value),
        }
    }

    /// Renders a register as `name:value`, the name padded to eight columns.
    pub(super) fn format_register(&self, reg: RegisterId) -> String {

        let value = self.read_register(reg);
        match reg {
            RegisterId::DelayRegister => format!("delay {}:{:02x}", delay_register_name(value), value),
            _ => format!("{:<8}:{:08x}", reg.name(), value),
        }
    }
}

fn delay_register_name(register: i32) -> &'static str {
    match register {
        0 => "none",
        PC_SLOT => "pc",
        n => GENERAL_NAMES[(n & 31) as usize],
    }
}
