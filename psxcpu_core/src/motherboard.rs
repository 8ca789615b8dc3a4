// SPDX-License-Identifier: GPL-3.0
// motherboard.rs - Copyright Phillip Potter, 2025, under GPLv3 only.

use thiserror::Error;

/// This module contains the default motherboard implementation. There
/// may be others in future.
pub mod psx_motherboard;

/// Errors raised while putting a board together.
#[derive(Debug, Error)]
pub enum BoardError {

    #[error("BIOS image is {actual} bytes, expected {expected}")]
    BiosSize { expected: usize, actual: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
