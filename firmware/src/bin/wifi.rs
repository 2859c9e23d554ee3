//! Wi-Fi word clock: NTP time on a Pico W, one GPIO per matrix row.

#![no_std]
#![no_main]
#![allow(clippy::future_not_send, reason = "single-threaded")]

use core::convert::Infallible;

use defmt::{info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_futures::select::{Either3, select3};
use embassy_rp::gpio::{Level, Output};
use embassy_rp::pwm::{self, Pwm};
use embassy_rp::spi::{self, Spi};
use embassy_time::{Duration, Instant, Ticker};
use panic_probe as _;
use word_clock::display::{Display, DisplayStatic, RowWiring};
use word_clock::matrix::{GrayscalePort, RowLines};
use word_clock::shared_constants::{DISPLAY_TICK_MS, TIME_POLL_MS, UTC_OFFSET_MINUTES, VERSION};
use word_clock::time_sync::{TimeSync, TimeSyncEvent, TimeSyncStatic};
use word_clock::wifi::{Wifi, WifiPins, WifiStatic};
use word_clock::{ClockState, PixelGrid, Result, SystemClock, TimeSource};

const SPI_FREQUENCY_HZ: u32 = 4_000_000;

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let Err(err) = inner_main(spawner).await;
    core::panic!("{err}");
}

async fn inner_main(spawner: Spawner) -> Result<Infallible> {
    info!("Word clock {} (Wi-Fi board)", VERSION);
    let p = embassy_rp::init(Default::default());

    let mut spi_config = spi::Config::default();
    spi_config.frequency = SPI_FREQUENCY_HZ;
    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);
    let port = GrayscalePort::new(
        Output::new(p.PIN_20, Level::High), // BLANK
        Output::new(p.PIN_21, Level::Low),  // XLAT
        spi,
    );
    let rows = RowWiring::Lines(RowLines::new([
        Output::new(p.PIN_2, Level::Low),
        Output::new(p.PIN_3, Level::Low),
        Output::new(p.PIN_4, Level::Low),
        Output::new(p.PIN_5, Level::Low),
        Output::new(p.PIN_6, Level::Low),
        Output::new(p.PIN_7, Level::Low),
        Output::new(p.PIN_8, Level::Low),
        Output::new(p.PIN_9, Level::Low),
        Output::new(p.PIN_10, Level::Low),
    ]));
    let gsclk = Pwm::new_output_a(p.PWM_SLICE0, p.PIN_16, pwm::Config::default());
    static DISPLAY_STATIC: DisplayStatic = Display::new_static();
    let display = Display::new(&DISPLAY_STATIC, port, rows, gsclk, spawner)?;

    static WIFI_STATIC: WifiStatic = Wifi::new_static();
    let wifi = Wifi::new(
        &WIFI_STATIC,
        WifiPins {
            power: p.PIN_23,
            chip_select: p.PIN_25,
            pio: p.PIO0,
            data: p.PIN_24,
            clock: p.PIN_29,
            dma: p.DMA_CH0,
        },
        spawner,
    )?;

    static TIME_SYNC_STATIC: TimeSyncStatic = TimeSync::new_static();
    let time_sync = TimeSync::new(&TIME_SYNC_STATIC, wifi, spawner)?;

    let mut clock = SystemClock::new(UTC_OFFSET_MINUTES);
    let mut state = ClockState::new();
    let mut grid = PixelGrid::new();

    let mut display_ticker = Ticker::every(Duration::from_millis(DISPLAY_TICK_MS));
    let mut poll_ticker = Ticker::every(Duration::from_millis(TIME_POLL_MS));
    loop {
        match select3(display_ticker.next(), poll_ticker.next(), time_sync.wait()).await {
            Either3::First(()) => state.tick(&mut grid, &display),
            Either3::Second(()) => state.accept_clock_time(clock.read_time().await?),
            Either3::Third(TimeSyncEvent::Success { unix_seconds }) => {
                clock.set_unix(unix_seconds, Instant::now().as_millis());
                state.accept_clock_time(clock.read_time().await?);
                let time = state.time();
                info!(
                    "Clock set to {:02}:{:02}:{:02}",
                    time.hours, time.minutes, time.seconds
                );
            }
            Either3::Third(TimeSyncEvent::Failed(message)) => {
                warn!("Time sync failed: {}", message);
            }
        }
    }
}
