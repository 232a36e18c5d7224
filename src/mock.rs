// Recording stand-ins for the shield peripherals, shared by the unit tests

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType as PinErrorType, OutputPin};
use embedded_hal::spi::{ErrorKind, ErrorType as SpiErrorType, SpiBus};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line {
    HighVoltage,
    Latch,
    Dots,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Pin(Line, bool),
    Write(Vec<u8>),
    Flush,
    DelayMs(u32),
}

#[derive(Default)]
struct Inner {
    events: Vec<Event>,
    fail_spi: bool,
}

// Every mock built from the same log appends to it in call order
#[derive(Clone, Default)]
pub struct Log(Rc<RefCell<Inner>>);

impl Log {
    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().events.clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().events.clear();
    }

    // All bytes handed to the bus so far
    pub fn written(&self) -> Vec<u8> {
        self.0
            .borrow()
            .events
            .iter()
            .filter_map(|e| match e {
                Event::Write(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn fail_spi(&self) {
        self.0.borrow_mut().fail_spi = true;
    }

    fn push(&self, event: Event) {
        self.0.borrow_mut().events.push(event);
    }
}

pub struct MockPin {
    line: Line,
    log: Log,
}

impl MockPin {
    pub fn new(line: Line, log: &Log) -> Self {
        MockPin { line, log: log.clone() }
    }
}

impl PinErrorType for MockPin {
    type Error = Infallible;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.log.push(Event::Pin(self.line, false));
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.log.push(Event::Pin(self.line, true));
        Ok(())
    }
}

pub struct MockSpi {
    log: Log,
}

impl MockSpi {
    pub fn new(log: &Log) -> Self {
        MockSpi { log: log.clone() }
    }

    fn check(&self) -> Result<(), ErrorKind> {
        if self.log.0.borrow().fail_spi {
            return Err(ErrorKind::Other);
        }
        Ok(())
    }
}

impl SpiErrorType for MockSpi {
    type Error = ErrorKind;
}

// The shift registers have no data out, reads clock in ones like a floating MISO
impl SpiBus<u8> for MockSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.check()?;
        words.fill(0xFF);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        self.check()?;
        self.log.push(Event::Write(words.to_vec()));
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        self.write(write)?;
        read.fill(0xFF);
        Ok(())
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.write(words)?;
        words.fill(0xFF);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.check()?;
        self.log.push(Event::Flush);
        Ok(())
    }
}

pub struct MockDelay {
    log: Log,
}

impl MockDelay {
    pub fn new(log: &Log) -> Self {
        MockDelay { log: log.clone() }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.push(Event::DelayMs(ns / 1_000_000));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.push(Event::DelayMs(ms));
    }
}
