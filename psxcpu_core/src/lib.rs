// SPDX-License-Identifier: GPL-3.0
// lib.rs - Copyright Phillip Potter, 2026, under GPLv3 only.

// Crate-wide lines to disable specific lints:

// Constructors set up hardware reset state explicitly, so there will be no
// derived Default implementations unless needed.
#![allow(clippy::new_without_default)]

// We use upper-case acronyms for some enums, to match the hardware manuals'
// names for exception codes and coprocessors.
#![allow(clippy::upper_case_acronyms)]

/// This module contains PlayStation CPU-related functionality.
pub mod cpu;

/// This module contains PlayStation motherboard related functionality.
pub mod motherboard;
