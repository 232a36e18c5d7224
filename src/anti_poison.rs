// This module runs every cathode of every tube for a while so unused cathodes don't get poisoned

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::digits::BLANK_VALUE;
use crate::nixies::{Error, NixieShield};

pub const REPETITIONS: u8 = 4;
pub const HOLD_MS: u32 = 500;

/// Sweeps all tubes through 0-9 and blank, `repetitions` times.
///
/// Blocks for `repetitions * 11 * hold_ms`, 22 seconds with the defaults, so callers that
/// have to stay responsive should schedule it when nothing else is due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AntiPoison {
    pub repetitions: u8,
    pub hold_ms: u32, // How long each value stays lit
}

impl Default for AntiPoison {
    fn default() -> Self {
        AntiPoison {
            repetitions: REPETITIONS,
            hold_ms: HOLD_MS,
        }
    }
}

impl AntiPoison {
    // Commits one full run performs
    pub fn commits(&self) -> u32 {
        self.repetitions as u32 * (BLANK_VALUE as u32 + 1)
    }

    // Turns the dots off, sweeps, and leaves every tube blank. Returns the number of commits made
    pub fn run<SPI, HV, LE, DOTS, PinE, D>(
        &self,
        nixies: &mut NixieShield<SPI, HV, LE, DOTS>,
        delay: &mut D,
    ) -> Result<u32, Error<SPI::Error, PinE>>
    where
        SPI: SpiBus<u8>,
        HV: OutputPin<Error = PinE>,
        LE: OutputPin<Error = PinE>,
        DOTS: OutputPin<Error = PinE>,
        D: DelayNs,
    {
        nixies.set_indicator_lamp(false)?;

        let mut commits = 0;
        for _ in 0..self.repetitions {
            for value in 0..=BLANK_VALUE {
                nixies.set_all(value)?;
                nixies.commit()?;
                commits += 1;

                delay.delay_ms(self.hold_ms);
            }
        }

        Ok(commits)
    }
}
