//! Driver for a six tube nixie shield fed by a chain of shift registers.
//!
//! Each tube takes a 10 bit active low cathode code. The six codes are packed into an
//! 8 byte frame, shifted out over SPI and made visible with a single latch pulse, so a
//! half written frame never shows on the tubes.
//!
//! ```ignore
//! let mut nixies = NixieShield::new(spi, hv_pin, latch_pin, dots_pin)?;
//! nixies.set_digits(&time_digits(12, 34, 56))?;
//! nixies.set_high_voltage(true)?;
//! nixies.commit()?;
//! ```

#![cfg_attr(not(test), no_std)]

pub mod anti_poison;
pub mod digits;
pub mod helpers;
pub mod nixies;
pub mod packing;

#[cfg(test)]
mod mock;

pub use anti_poison::AntiPoison;
pub use digits::{Digit, InvalidDigit, Tube, DIGIT_CODES, PACK_ORDER};
pub use helpers::time_digits;
pub use nixies::{Error, NixieShield};
pub use packing::{pack, unpack};
