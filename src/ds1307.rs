//! DS1307 real-time clock over I²C.
//!
//! The chip keeps seconds through year in BCD registers 0x00–0x06 followed by a control
//! register at 0x07. Reads and writes always start at register 0x00.

use embedded_hal_async::i2c::{Error as _, I2c};

use crate::time_source::TimeSource;
use crate::time_value::{TimeValue, from_bcd, to_bcd};
use crate::{Error, Result};

/// 7-bit bus address of the DS1307.
pub const ADDRESS: u8 = 0x68;

const FIRST_REGISTER: u8 = 0x00;
/// Time registers 0x00–0x06.
pub const TIME_REGISTERS: usize = 7;
/// Square-wave output off.
const CONTROL: u8 = 0x00;

/// Clock-halt flag in the seconds register.
const CLOCK_HALT: u8 = 0x80;
/// 12-hour mode flag and AM/PM bit in the hours register. The clock is always written in 24-hour mode.
const HOUR_MODE_BITS: u8 = 0xC0;

/// Register image to write: start address, the seven time registers, then the control register.
///
/// The seconds register is written with the clock-halt flag clear, so writing also starts the oscillator.
#[must_use]
pub const fn encode_registers(time: &TimeValue) -> [u8; TIME_REGISTERS + 2] {
    [
        FIRST_REGISTER,
        to_bcd(time.seconds),
        to_bcd(time.minutes),
        to_bcd(time.hours),
        time.day_of_week,
        to_bcd(time.day),
        to_bcd(time.month),
        to_bcd(time.year),
        CONTROL,
    ]
}

/// Decode the seven time registers.
///
/// # Errors
///
/// Returns [`Error::InvalidRtcTime`] naming the first field outside its calendar range,
/// which is what an unpowered or never-set chip reports.
pub fn decode_registers(registers: &[u8; TIME_REGISTERS]) -> Result<TimeValue> {
    let [seconds, minutes, hours, day_of_week, day, month, year] = *registers;
    let time = TimeValue {
        seconds: from_bcd(seconds & !CLOCK_HALT),
        minutes: from_bcd(minutes),
        hours: from_bcd(hours & !HOUR_MODE_BITS),
        day: from_bcd(day),
        month: from_bcd(month),
        year: from_bcd(year),
        day_of_week,
    };
    for (field, value, valid) in [
        ("seconds", time.seconds, time.seconds < 60),
        ("minutes", time.minutes, time.minutes < 60),
        ("hours", time.hours, time.hours < 24),
        ("day", time.day, (1..=31).contains(&time.day)),
        ("month", time.month, (1..=12).contains(&time.month)),
        ("year", time.year, time.year < 100),
    ] {
        if !valid {
            return Err(Error::InvalidRtcTime { field, value });
        }
    }
    Ok(time)
}

/// A DS1307 on an async I²C bus.
pub struct Ds1307<I> {
    i2c: I,
}

impl<I: I2c> Ds1307<I> {
    #[must_use]
    pub const fn new(i2c: I) -> Self {
        Self { i2c }
    }

    /// Give the bus back.
    pub fn release(self) -> I {
        self.i2c
    }
}

impl<I: I2c> TimeSource for Ds1307<I> {
    async fn read_time(&mut self) -> Result<TimeValue> {
        let mut registers = [0; TIME_REGISTERS];
        self.i2c
            .write_read(ADDRESS, &[FIRST_REGISTER], &mut registers)
            .await
            .map_err(|err| Error::I2c(err.kind()))?;
        decode_registers(&registers)
    }

    async fn write_time(&mut self, time: &TimeValue) -> Result<()> {
        self.i2c
            .write(ADDRESS, &encode_registers(time))
            .await
            .map_err(|err| Error::I2c(err.kind()))
    }
}
