//! A device abstraction that keeps the word-clock matrix refreshed.
//!
//! The grayscale clock runs free from a PWM slice. A task wakes once per grayscale period and
//! runs one [`RefreshDriver::cycle`], reading whatever the easing tick last wrote into the
//! shared [`ChannelBuffer`].

#![allow(clippy::future_not_send, reason = "single-threaded")]

use core::convert::Infallible;

use defmt::info;
use embassy_executor::Spawner;
use embassy_rp::gpio::Output;
use embassy_rp::peripherals::SPI0;
use embassy_rp::pwm::{self, Pwm};
use embassy_rp::spi::{Blocking, Spi};
use embassy_time::{Duration, Ticker};

use crate::Result;
use crate::channel_buffer::{ChannelBuffer, ChannelSink};
use crate::matrix::{GrayscalePort, RefreshDriver, RowCounter, RowLines, RowSelect};
use crate::shared_constants::{GRAYSCALE_CLOCK_HZ, REFRESH_PERIOD_US};

/// SPI bus wired to the driver chip's serial input.
pub type GrayscaleSpi = Spi<'static, SPI0, Blocking>;

/// How the row anodes are switched on a given board.
pub enum RowWiring {
    /// One GPIO per row (Wi-Fi board).
    Lines(RowLines<Output<'static>>),
    /// Decade counter with clock and reset inputs (radio board).
    Counter(RowCounter<Output<'static>>),
}

impl RowSelect for RowWiring {
    fn deselect(&mut self, row: usize) -> Result<()> {
        match self {
            Self::Lines(lines) => lines.deselect(row),
            Self::Counter(counter) => counter.deselect(row),
        }
    }

    fn select(&mut self, row: usize) -> Result<()> {
        match self {
            Self::Lines(lines) => lines.select(row),
            Self::Counter(counter) => counter.select(row),
        }
    }
}

/// Resources needed by [`Display`].
pub struct DisplayStatic {
    buffer: ChannelBuffer,
}

/// Handle to the running matrix refresh.
///
/// Implements [`ChannelSink`], so the easing tick writes into it directly.
#[derive(Clone, Copy)]
pub struct Display {
    buffer: &'static ChannelBuffer,
}

impl Display {
    /// Create [`Display`] resources.
    #[must_use]
    pub const fn new_static() -> DisplayStatic {
        DisplayStatic {
            buffer: ChannelBuffer::new(),
        }
    }

    /// Start the grayscale clock and spawn the refresh task.
    ///
    /// `gsclk` is a PWM slice with its output on the driver's GSCLK input.
    ///
    /// # Errors
    ///
    /// Returns an error if a control line cannot be driven or the task cannot be spawned.
    pub fn new(
        display_static: &'static DisplayStatic,
        port: GrayscalePort<Output<'static>, GrayscaleSpi>,
        rows: RowWiring,
        mut gsclk: Pwm<'static>,
        spawner: Spawner,
    ) -> Result<Self> {
        gsclk.set_config(&grayscale_clock_config());
        let driver = RefreshDriver::new(port, rows, &display_static.buffer)?;
        spawner.spawn(display_device_loop(driver, gsclk)?);
        Ok(Self {
            buffer: &display_static.buffer,
        })
    }

    /// Number of refresh cycles since power-up.
    #[must_use]
    pub fn refresh_count(&self) -> u64 {
        self.buffer.refresh_count()
    }
}

impl ChannelSink for Display {
    fn set_channel(&self, row: usize, channel: usize, value: u16) {
        self.buffer.set_channel(row, channel, value);
    }
}

/// Square wave at [`GRAYSCALE_CLOCK_HZ`] on channel A.
#[expect(
    clippy::arithmetic_side_effects,
    clippy::integer_division_remainder_used,
    reason = "System clock is well above the grayscale clock"
)]
fn grayscale_clock_config() -> pwm::Config {
    let clk_sys = embassy_rp::clocks::clk_sys_freq();
    let period = u16::try_from(clk_sys / GRAYSCALE_CLOCK_HZ).unwrap_or(u16::MAX).max(2);
    let mut config = pwm::Config::default();
    config.top = period - 1;
    config.compare_a = period / 2;
    config.enable = true;
    config
}

type Driver = RefreshDriver<'static, Output<'static>, GrayscaleSpi, RowWiring>;

#[embassy_executor::task]
async fn display_device_loop(driver: Driver, gsclk: Pwm<'static>) -> ! {
    let Err(err) = inner_display_device_loop(driver, gsclk).await;
    core::panic!("{err}");
}

async fn inner_display_device_loop(mut driver: Driver, _gsclk: Pwm<'static>) -> Result<Infallible> {
    info!(
        "Display started (grayscale clock {} Hz, refresh every {} us)",
        GRAYSCALE_CLOCK_HZ, REFRESH_PERIOD_US
    );
    let mut ticker = Ticker::every(Duration::from_micros(REFRESH_PERIOD_US));
    loop {
        ticker.next().await;
        driver.cycle()?;
    }
}
