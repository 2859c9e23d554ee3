//! Row-multiplexed refresh of the LED matrix through a TLC5940-style grayscale driver.
//!
//! The driver chip sinks the 11 columns; the rows are switched on one at a time. Each
//! [`RefreshDriver::cycle`] shows the row whose data was shifted in during the previous cycle
//! and shifts in the data for the row after it, so the shift overlaps the visible period.

use embedded_hal::digital::{OutputPin, PinState};
use embedded_hal::spi::{Error as _, SpiBus};

use crate::channel_buffer::ChannelBuffer;
use crate::output_array::OutputArray;
use crate::shared_constants::ROWS;
use crate::{Error, Result};

/// Switches the row anodes.
pub trait RowSelect {
    /// Turn off the row shown during the previous cycle.
    ///
    /// # Errors
    ///
    /// Returns an error if a row line cannot be driven.
    fn deselect(&mut self, row: usize) -> Result<()>;

    /// Turn on the row whose data was just latched.
    ///
    /// # Errors
    ///
    /// Returns an error if a row line cannot be driven.
    fn select(&mut self, row: usize) -> Result<()>;
}

/// One enable line per row.
pub type RowLines<P> = OutputArray<P, ROWS>;

impl<P: OutputPin> RowSelect for RowLines<P> {
    fn deselect(&mut self, row: usize) -> Result<()> {
        self.set_state_at(row, PinState::Low)
    }

    fn select(&mut self, row: usize) -> Result<()> {
        self.set_state_at(row, PinState::High)
    }
}

/// Rows driven by a decade counter: a reset pulse selects row 0, each clock pulse the next row.
pub struct RowCounter<P> {
    clock: P,
    reset: P,
}

impl<P: OutputPin> RowCounter<P> {
    #[must_use]
    pub const fn new(clock: P, reset: P) -> Self {
        Self { clock, reset }
    }
}

impl<P: OutputPin> RowSelect for RowCounter<P> {
    // Advancing the counter also releases the previous row.
    fn deselect(&mut self, _row: usize) -> Result<()> {
        Ok(())
    }

    fn select(&mut self, row: usize) -> Result<()> {
        if row == 0 {
            pulse(&mut self.reset)
        } else {
            pulse(&mut self.clock)
        }
    }
}

fn pulse(pin: &mut impl OutputPin) -> Result<()> {
    pin.set_high().map_err(|_| Error::CannotSetOutputState)?;
    pin.set_low().map_err(|_| Error::CannotSetOutputState)
}

/// Control lines and serial data input of the grayscale driver.
///
/// The grayscale clock itself runs free from a PWM output and is not part of this port.
pub struct GrayscalePort<P, S> {
    blank: P,
    latch: P,
    spi: S,
}

impl<P: OutputPin, S: SpiBus> GrayscalePort<P, S> {
    #[must_use]
    pub const fn new(blank: P, latch: P, spi: S) -> Self {
        Self { blank, latch, spi }
    }

    fn set_blank(&mut self, blank: bool) -> Result<()> {
        self.blank
            .set_state(PinState::from(blank))
            .map_err(|_| Error::CannotSetOutputState)
    }

    fn latch(&mut self) -> Result<()> {
        pulse(&mut self.latch)
    }

    fn shift(&mut self, bytes: &[u8]) -> Result<()> {
        self.spi.write(bytes).map_err(|err| Error::Spi(err.kind()))?;
        self.spi.flush().map_err(|err| Error::Spi(err.kind()))
    }
}

/// Steps the matrix through its rows in strict round-robin order.
pub struct RefreshDriver<'a, P, S, R> {
    port: GrayscalePort<P, S>,
    rows: R,
    buffer: &'a ChannelBuffer,
    /// Row whose data sits in the driver's shift register.
    current: usize,
    /// Row lit during the last cycle.
    previous: usize,
}

impl<'a, P: OutputPin, S: SpiBus, R: RowSelect> RefreshDriver<'a, P, S, R> {
    /// Start with outputs blanked. Row 0 is first lit on the second cycle.
    ///
    /// # Errors
    ///
    /// Returns an error if the blank line cannot be driven.
    pub fn new(mut port: GrayscalePort<P, S>, rows: R, buffer: &'a ChannelBuffer) -> Result<Self> {
        port.set_blank(true)?;
        Ok(Self {
            port,
            rows,
            buffer,
            current: ROWS - 1,
            previous: ROWS - 2,
        })
    }

    /// Run one refresh cycle.
    ///
    /// Blank, release the previous row, latch, light the current row, unblank, then shift in
    /// the next row's data.
    ///
    /// # Errors
    ///
    /// Returns an error if a pin or the SPI bus fails.
    pub fn cycle(&mut self) -> Result<()> {
        self.port.set_blank(true)?;
        self.rows.deselect(self.previous)?;
        self.port.latch()?;
        self.rows.select(self.current)?;

        self.previous = self.current;
        self.current = next_row(self.current);

        self.port.set_blank(false)?;
        self.port.shift(&self.buffer.row_bytes(self.current))?;
        self.buffer.record_refresh();
        Ok(())
    }

    /// Row lit by the last cycle.
    #[must_use]
    pub const fn lit_row(&self) -> usize {
        self.previous
    }
}

#[expect(
    clippy::arithmetic_side_effects,
    clippy::integer_division_remainder_used,
    reason = "row < ROWS"
)]
const fn next_row(row: usize) -> usize {
    (row + 1) % ROWS
}
