// This module holds the digit to cathode code table and the tube numbering of the shield

use core::fmt;

pub const BLANK_VALUE: u8 = 10;
pub const CODE_MASK: u16 = 0x3FF; // Ten cathodes per tube

// Each digit, except blank, has a single active low bit in a field of 10 bits
// Indexed directly by digit value, the last entry is blank
pub const DIGIT_CODES: [u16; 11] = [
    0x3FE, // 0
    0x3FD, // 1
    0x3FB, // 2
    0x3F7, // 3
    0x3EF, // 4
    0x3DF, // 5
    0x3BF, // 6
    0x37F, // 7
    0x2FF, // 8
    0x1FF, // 9
    0x3FF, // Blank
];

/// A digit value outside of 0..=10 was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidDigit(pub u8);

impl fmt::Display for InvalidDigit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "digit value {} is outside 0..={}", self.0, BLANK_VALUE)
    }
}

// Bounds checked lookup into DIGIT_CODES
pub fn code_for(value: u8) -> Result<u16, InvalidDigit> {
    DIGIT_CODES
        .get(value as usize)
        .copied()
        .ok_or(InvalidDigit(value))
}

/// A value that one tube can show, 0-9 or blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Digit(u8);

impl Digit {
    pub const BLANK: Digit = Digit(BLANK_VALUE);

    pub fn new(value: u8) -> Result<Self, InvalidDigit> {
        if value > BLANK_VALUE {
            return Err(InvalidDigit(value));
        }
        Ok(Digit(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    pub fn is_blank(self) -> bool {
        self.0 == BLANK_VALUE
    }

    // Always in range because of the check in `new`
    pub fn code(self) -> u16 {
        DIGIT_CODES[self.0 as usize]
    }

    /// Reverse lookup of a 10 bit code, `None` when the code is not in the table
    /// (for example two cathodes cleared at once).
    pub fn decode(code: u16) -> Option<Self> {
        DIGIT_CODES
            .iter()
            .position(|&c| c == code & CODE_MASK)
            .map(|i| Digit(i as u8))
    }
}

impl TryFrom<u8> for Digit {
    type Error = InvalidDigit;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Digit::new(value)
    }
}

/// Physical tube positions, NX1 is the most significant (leftmost) tube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tube {
    Nx1,
    Nx2,
    Nx3,
    Nx4,
    Nx5,
    Nx6,
}

impl Tube {
    pub const ALL: [Tube; 6] = [Tube::Nx1, Tube::Nx2, Tube::Nx3, Tube::Nx4, Tube::Nx5, Tube::Nx6];

    // 0 for NX1 through 5 for NX6
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Tube::ALL.get(index).copied()
    }
}

/// Which tube feeds each packing slot.
///
/// Slot 0 is merged into the accumulator first, so its ten bits are the first data bits
/// clocked out after the padding. They travel furthest down the register chain, which on
/// this shield ends at NX6. Reordering this table shows digits on the wrong tubes.
pub const PACK_ORDER: [Tube; 6] = [Tube::Nx6, Tube::Nx5, Tube::Nx4, Tube::Nx3, Tube::Nx2, Tube::Nx1];
