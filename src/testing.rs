//! Test doubles for the `embedded-hal` traits the driver consumes.
extern crate std;

use core::cell::RefCell;
use core::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi;
use embedded_hal::spi::SpiBus;
use heapless::Vec;

pub const CAPACITY: usize = 4096;

/// An SPI bus that records every byte written.
#[derive(Default)]
pub struct RecordingSpi {
    pub bytes: Vec<u8, CAPACITY>,
    pub flushes: usize,
}

impl spi::ErrorType for RecordingSpi {
    type Error = Infallible;
}

impl SpiBus for RecordingSpi {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        words.fill(0);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        self.bytes.extend_from_slice(words).expect("recording full");
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        read.fill(0);
        self.write(write)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        self.write(words)?;
        words.fill(0);
        Ok(())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flushes += 1;
        Ok(())
    }
}

/// An SPI bus whose every operation fails with the given kind.
pub struct FailingSpi(pub spi::ErrorKind);

impl spi::ErrorType for FailingSpi {
    type Error = spi::ErrorKind;
}

impl SpiBus for FailingSpi {
    fn read(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
        Err(self.0)
    }

    fn write(&mut self, _words: &[u8]) -> Result<(), Self::Error> {
        Err(self.0)
    }

    fn transfer(&mut self, _read: &mut [u8], _write: &[u8]) -> Result<(), Self::Error> {
        Err(self.0)
    }

    fn transfer_in_place(&mut self, _words: &mut [u8]) -> Result<(), Self::Error> {
        Err(self.0)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Err(self.0)
    }
}

/// Shared state of a bit-banged data/clock pair.
///
/// Samples the data line on every rising clock edge and assembles bytes MSB
/// first, the way the strip does.
#[derive(Default)]
pub struct Wire {
    pub data: bool,
    pub clock: bool,
    pub rising_edges: usize,
    pub bytes: Vec<u8, CAPACITY>,
    shift: u8,
    bits: u8,
}

impl Wire {
    fn set_clock(&mut self, level: bool) {
        if level && !self.clock {
            self.rising_edges += 1;
            self.shift = self.shift << 1 | self.data as u8;
            self.bits += 1;
            if self.bits == 8 {
                self.bytes.push(self.shift).expect("recording full");
                self.shift = 0;
                self.bits = 0;
            }
        }
        self.clock = level;
    }
}

pub type SharedWire = Rc<RefCell<Wire>>;

pub struct DataPin(SharedWire);

pub struct ClockPin(SharedWire);

impl digital::ErrorType for DataPin {
    type Error = Infallible;
}

impl OutputPin for DataPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().data = false;
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().data = true;
        Ok(())
    }
}

impl digital::ErrorType for ClockPin {
    type Error = Infallible;
}

impl OutputPin for ClockPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().set_clock(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.0.borrow_mut().set_clock(true);
        Ok(())
    }
}

pub fn bit_bang_wire() -> (DataPin, ClockPin, SharedWire) {
    let wire = SharedWire::default();
    (DataPin(wire.clone()), ClockPin(wire.clone()), wire)
}

/// A pin that can never be driven.
pub struct FailingPin;

impl digital::ErrorType for FailingPin {
    type Error = digital::ErrorKind;
}

impl OutputPin for FailingPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        Err(digital::ErrorKind::Other)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        Err(digital::ErrorKind::Other)
    }
}
