// SPDX-License-Identifier: GPL-3.0
// math.rs - Copyright Phillip Potter, 2025, under GPLv3 only.

use psxcpu_utility::RegisterLanes;
use std::ops;

// Fixed-point building blocks for the Geometry Transformation Engine. All
// elements are widened to 64 bits so products and sums can be checked for
// overflow before they are narrowed back into registers.

/// A three by three matrix for representing any of:
/// - The rotation matrix.
/// - The light matrix.
/// - The light colour matrix.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CP2Matrix {

    top_row: [i64; 3],
    middle_row: [i64; 3],
    bottom_row: [i64; 3],
}

/// A one column vector of three, for usage alongside matrices.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CP2Vector {

    top: i64,
    middle: i64,
    bottom: i64,
}

impl CP2Matrix {

    /// Creates a new CP2Matrix object from its rows.
    pub fn new(
        top_row: [i64; 3],
        middle_row: [i64; 3],
        bottom_row: [i64; 3]
    ) -> Self {
        CP2Matrix {
            top_row,
            middle_row,
            bottom_row,
        }
    }

    /// Unpacks a matrix stored as nine signed halves across five control
    /// registers, row by row, low half first. The high half of the fifth
    /// register is unused.
    pub fn from_packed(words: &[i32; 5]) -> Self {

        let mut elements = [0_i64; 9];
        for (index, element) in elements.iter_mut().enumerate() {
            let word = words[index / 2];
            *element = if index % 2 == 0 {
                word.low_half() as i64
            } else {
                word.high_half() as i64
            };
        }

        CP2Matrix::new(
            [elements[0], elements[1], elements[2]],
            [elements[3], elements[4], elements[5]],
            [elements[6], elements[7], elements[8]]
        )
    }

    /// The all-zero matrix, selected by the reserved MVMVA matrix field.
    pub fn zero() -> Self {
        CP2Matrix::new([0; 3], [0; 3], [0; 3])
    }

    /// The leading diagonal as a vector.
    pub fn diagonal(&self) -> CP2Vector {
        CP2Vector::new(self.top_row[0], self.middle_row[1], self.bottom_row[2])
    }
}

impl CP2Vector {

    /// Creates a new CP2Vector object with the correct initial state.
    pub fn new(
        top: i64,
        middle: i64,
        bottom: i64,
    ) -> Self {
        CP2Vector {
            top,
            middle,
            bottom,
        }
    }

    /// Access the top element.
    pub fn top(&self) -> i64 {
        self.top
    }

    /// Access the middle element.
    pub fn middle(&self) -> i64 {
        self.middle
    }

    /// Access the bottom element.
    pub fn bottom(&self) -> i64 {
        self.bottom
    }

    /// The elements in order, for per-channel loops.
    pub fn to_array(self) -> [i64; 3] {
        [self.top, self.middle, self.bottom]
    }
}

/// Implements multiplication between CP2Matrix and CP2Vector.
impl ops::Mul<CP2Vector> for CP2Matrix {

    type Output = CP2Vector;

    fn mul(self, rhs: CP2Vector) -> Self::Output {
        CP2Vector::new(
            self.top_row[0] * rhs.top + self.top_row[1] * rhs.middle + self.top_row[2] * rhs.bottom,
            self.middle_row[0] * rhs.top + self.middle_row[1] * rhs.middle + self.middle_row[2] * rhs.bottom,
            self.bottom_row[0] * rhs.top + self.bottom_row[1] * rhs.middle + self.bottom_row[2] * rhs.bottom
        )
    }
}

/// Implements addition between two CP2Vector values.
impl ops::Add<CP2Vector> for CP2Vector {

    type Output = CP2Vector;

    fn add(self, rhs: CP2Vector) -> Self::Output {
        CP2Vector::new(
            self.top + rhs.top,
            self.middle + rhs.middle,
            self.bottom + rhs.bottom
        )
    }
}

/// Arithmetic shift left of every element, for promoting to fixed point.
impl ops::Shl<u32> for CP2Vector {

    type Output = CP2Vector;

    fn shl(self, rhs: u32) -> Self::Output {
        CP2Vector::new(self.top << rhs, self.middle << rhs, self.bottom << rhs)
    }
}

/// Arithmetic shift right of every element, for dropping fraction bits.
impl ops::Shr<u32> for CP2Vector {

    type Output = CP2Vector;

    fn shr(self, rhs: u32) -> Self::Output {
        CP2Vector::new(self.top >> rhs, self.middle >> rhs, self.bottom >> rhs)
    }
}
