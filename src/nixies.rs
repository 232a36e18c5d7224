// This module is for the transmission of digit data to the nixie tube shift registers

use core::fmt;

use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::spi::SpiBus;

use crate::digits::{code_for, Digit, InvalidDigit, Tube, PACK_ORDER};
use crate::packing::{pack, FRAME_LEN, SLOTS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error<SpiE, PinE> {
    Spi(SpiE),        // Writing the frame failed
    Pin(PinE),        // One of the control lines could not be driven
    InvalidDigit(u8), // Digit value above 10
}

impl<SpiE, PinE> From<InvalidDigit> for Error<SpiE, PinE> {
    fn from(err: InvalidDigit) -> Self {
        Error::InvalidDigit(err.0)
    }
}

impl<SpiE: fmt::Debug, PinE: fmt::Debug> fmt::Display for Error<SpiE, PinE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Spi(e) => write!(f, "spi error: {:?}", e),
            Error::Pin(e) => write!(f, "pin error: {:?}", e),
            Error::InvalidDigit(v) => write!(f, "{}", InvalidDigit(*v)),
        }
    }
}

/// Six tube shield driven by a chain of shift registers.
///
/// Digits are only buffered by the setters, nothing reaches the tubes until [`commit`]
/// shifts the whole frame out and pulses the latch. The register outputs follow the latch
/// only, so the tubes never show a partially shifted frame.
///
/// [`commit`]: NixieShield::commit
pub struct NixieShield<SPI, HV, LE, DOTS> {
    spi_bus: SPI,   // Spi bus which the shift registers are attached to
    hv_pin: HV,     // High voltage supply enable
    latch_pin: LE,  // Register latch enable, outputs update on the rising edge
    dots_pin: DOTS, // Neon indicator lamps

    codes: [u16; SLOTS], // Stored per tube, NX1 first
    high_voltage: bool,
    dots: bool,
}

impl<SPI, HV, LE, DOTS, PinE> NixieShield<SPI, HV, LE, DOTS>
where
    SPI: SpiBus<u8>,
    HV: OutputPin<Error = PinE>,
    LE: OutputPin<Error = PinE>,
    DOTS: OutputPin<Error = PinE>,
{
    // Drives every control line low and starts with all tubes blank, nothing is transmitted
    pub fn new(
        spi_bus: SPI,
        hv_pin: HV,
        latch_pin: LE,
        dots_pin: DOTS,
    ) -> Result<Self, Error<SPI::Error, PinE>> {
        let mut shield = NixieShield {
            spi_bus,
            hv_pin,
            latch_pin,
            dots_pin,
            codes: [Digit::BLANK.code(); SLOTS],
            high_voltage: false,
            dots: false,
        };

        shield.hv_pin.set_low().map_err(Error::Pin)?;
        shield.latch_pin.set_low().map_err(Error::Pin)?;
        shield.dots_pin.set_low().map_err(Error::Pin)?;

        Ok(shield)
    }

    // Buffers one tube's digit, 10 blanks the tube
    pub fn set_digit(&mut self, tube: Tube, value: u8) -> Result<(), Error<SPI::Error, PinE>> {
        self.codes[tube.index()] = code_for(value)?;
        Ok(())
    }

    /// Buffers all six tubes, `values[0]` goes to NX1.
    ///
    /// Every value is checked before anything is stored, so on error the buffered
    /// digits are unchanged.
    pub fn set_digits(&mut self, values: &[u8; SLOTS]) -> Result<(), Error<SPI::Error, PinE>> {
        let mut codes = [0u16; SLOTS];
        for (code, &value) in codes.iter_mut().zip(values) {
            *code = code_for(value)?;
        }
        self.codes = codes;
        Ok(())
    }

    // Same value on every tube
    pub fn set_all(&mut self, value: u8) -> Result<(), Error<SPI::Error, PinE>> {
        self.codes = [code_for(value)?; SLOTS];
        Ok(())
    }

    pub fn blank(&mut self) {
        self.codes = [Digit::BLANK.code(); SLOTS];
    }

    pub fn digit(&self, tube: Tube) -> Digit {
        // Only table codes are ever stored
        Digit::decode(self.codes[tube.index()]).unwrap_or(Digit::BLANK)
    }

    pub fn codes(&self) -> [u16; SLOTS] {
        self.codes
    }

    // The bytes the next commit will send
    pub fn frame(&self) -> [u8; FRAME_LEN] {
        pack(&PACK_ORDER.map(|tube| self.codes[tube.index()]))
    }

    /// Shifts the buffered digits into the registers and latches them onto the tubes.
    ///
    /// The latch is held low while the frame is written and the bus is flushed before the
    /// latch pulse, so the pulse always follows the last bit.
    pub fn commit(&mut self) -> Result<(), Error<SPI::Error, PinE>> {
        let frame = self.frame();

        self.latch_pin.set_low().map_err(Error::Pin)?;
        self.spi_bus.write(&frame).map_err(Error::Spi)?;
        self.spi_bus.flush().map_err(Error::Spi)?;

        // Latch data
        self.latch_pin.set_high().map_err(Error::Pin)?;
        self.latch_pin.set_low().map_err(Error::Pin)?;

        Ok(())
    }

    pub fn set_high_voltage(&mut self, enabled: bool) -> Result<(), Error<SPI::Error, PinE>> {
        self.hv_pin.set_state(PinState::from(enabled)).map_err(Error::Pin)?;
        self.high_voltage = enabled;
        Ok(())
    }

    pub fn set_indicator_lamp(&mut self, enabled: bool) -> Result<(), Error<SPI::Error, PinE>> {
        self.dots_pin.set_state(PinState::from(enabled)).map_err(Error::Pin)?;
        self.dots = enabled;
        Ok(())
    }

    pub fn high_voltage(&self) -> bool {
        self.high_voltage
    }

    pub fn indicator_lamp(&self) -> bool {
        self.dots
    }

    // Hands the peripherals back, the control lines keep their last state
    pub fn release(self) -> (SPI, HV, LE, DOTS) {
        (self.spi_bus, self.hv_pin, self.latch_pin, self.dots_pin)
    }
}
