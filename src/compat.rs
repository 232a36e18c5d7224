// stm32f1xx-hal 0.10 implements the embedded-hal 0.2 traits, the shield driver wants 1.0
// These wrappers forward the few calls the driver makes

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, SpiBus};
use embedded_hal_02::blocking::delay::{DelayMs, DelayUs};
use embedded_hal_02::blocking::spi::{Transfer, Write};
use embedded_hal_02::digital::v2::OutputPin as OutputPin02;

// Spi bus wrapper
pub struct Bus<S>(pub S);

impl<S> spi::ErrorType for Bus<S> {
    type Error = spi::ErrorKind;
}

impl<S> SpiBus<u8> for Bus<S>
where
    S: Write<u8> + Transfer<u8>,
{
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        words.fill(0);
        self.transfer_in_place(words)
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        Write::write(&mut self.0, words).map_err(|_| spi::ErrorKind::Other)
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        // Words past the shorter buffer are clocked out as zeros or dropped
        for (i, slot) in read.iter_mut().enumerate() {
            *slot = write.get(i).copied().unwrap_or(0);
        }
        self.transfer_in_place(read)?;
        if write.len() > read.len() {
            self.write(&write[read.len()..])?;
        }
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        Transfer::transfer(&mut self.0, words)
            .map(|_| ())
            .map_err(|_| spi::ErrorKind::Other)
    }

    // The 0.2 blocking traits have no flush, writes count as done when they return
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

// Output pin wrapper
pub struct Line<P>(pub P);

impl<P> digital::ErrorType for Line<P> {
    type Error = digital::ErrorKind;
}

impl<P: OutputPin02> OutputPin for Line<P> {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.set_low().map_err(|_| digital::ErrorKind::Other)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.set_high().map_err(|_| digital::ErrorKind::Other)
    }
}

// Delay wrapper, rounds up to whole microseconds
pub struct Delay<'a, D>(pub &'a mut D);

impl<D: DelayUs<u32> + DelayMs<u32>> DelayNs for Delay<'_, D> {
    fn delay_ns(&mut self, ns: u32) {
        self.0.delay_us(ns.div_ceil(1000));
    }

    fn delay_us(&mut self, us: u32) {
        self.0.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.0.delay_ms(ms);
    }
}
