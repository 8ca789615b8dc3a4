// SPDX-License-Identifier: GPL-3.0
// main.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

use std::path::PathBuf;
use std::process::ExitCode;

// This file is the core of the basic client - it exists merely as a CLI-based
// program to load in a BIOS file and run the CPU against it for a while,
// optionally dumping registers once it is done.

use clap::Parser;
use log::{error, info};
use psxcpu_core::{
    cpu::{Cpu, RegisterId},
    cpu::r3051::R3051,
    motherboard::psx_motherboard::PsxMotherboard,
};

#[derive(Parser)]
#[command(
    version,
    about = "A basic barebones runner for the PSX CPU core",
    long_about = None
)]
struct PsxCpuArgs {
    #[arg(
        long = "bios",
        help = "A compatible PS1 BIOS file",
        id = "BIOS file"
    )]
    bios: PathBuf,

    #[arg(
        long = "cycles",
        help = "How many cycles to run in total",
        default_value_t = 100000
    )]
    cycles: i32,

    #[arg(
        long = "slice",
        help = "How many cycles to run per call into the core",
        default_value_t = 1000
    )]
    slice: i32,

    #[arg(
        long = "dump-registers",
        help = "Log every register once the run is over"
    )]
    dump_registers: bool,

    #[arg(
        long = "dump-gte",
        help = "Include GTE registers in register dumps"
    )]
    dump_gte: bool,
}

fn dump_registers(cpu: &R3051, include_gte: bool) {
    for reg in RegisterId::all() {
        if matches!(reg, RegisterId::GteData(_) | RegisterId::GteControl(_)) && !include_gte {
            continue;
        }
        info!("{}", cpu.format_reg(reg));
    }
}

fn main() -> ExitCode {
    colog::init();
    let args = PsxCpuArgs::parse();

    let mut motherboard = match PsxMotherboard::from_bios_file(&args.bios) {
        Ok(motherboard) => motherboard,
        Err(err) => {
            error!("unable to load BIOS {}: {}", args.bios.display(), err);
            return ExitCode::FAILURE;
        }
    };
    let mut cpu = R3051::new();

    let slice = args.slice.max(1);
    let mut consumed = 0;
    while consumed < args.cycles {
        consumed += cpu.run(&mut motherboard, slice.min(args.cycles - consumed));
    }

    if args.dump_registers {
        dump_registers(&cpu, args.dump_gte);
    }

    info!(
        "ran {} cycles, pc now {:08x}, {} unimplemented instructions reported",
        cpu.total_cycles(),
        cpu.get_reg(RegisterId::Pc),
        motherboard.unimplemented_reports().len()
    );
    if let Some(exception) = cpu.last_exception() {
        info!("last exception: {}", exception);
    }

    ExitCode::SUCCESS
}
