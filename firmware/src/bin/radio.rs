//! Radio word clock: DCF77 receiver, DS1307 backup clock, serial console.
//!
//! The main loop owns the clock state. It fades the matrix every display tick, polls the
//! real-time clock once a second, takes radio fixes as they arrive, and answers console lines.

#![no_std]
#![no_main]
#![allow(clippy::future_not_send, reason = "single-threaded")]

use core::convert::Infallible;

use defmt::{Display2Format, info, warn};
use defmt_rtt as _;
use embassy_executor::Spawner;
use embassy_futures::select::{Either4, select4};
use embassy_rp::bind_interrupts;
use embassy_rp::gpio::{Level, Output};
use embassy_rp::i2c::{self, I2c};
use embassy_rp::peripherals::{I2C0, UART0};
use embassy_rp::pwm::{self, Pwm};
use embassy_rp::spi::{self, Spi};
use embassy_rp::uart::{self, BufferedUart};
use embassy_time::{Duration, Ticker};
use panic_probe as _;
use static_cell::StaticCell;
use word_clock::command::execute;
use word_clock::display::{Display, DisplayStatic, RowWiring};
use word_clock::ds1307::Ds1307;
use word_clock::matrix::{GrayscalePort, RowCounter};
use word_clock::radio::{Radio, RadioStatic};
use word_clock::serial::{Console, ConsoleStatic};
use word_clock::shared_constants::{DISPLAY_TICK_MS, TIME_POLL_MS, VERSION};
use word_clock::{ClockState, PixelGrid, Result, TimeSource, TimeValue};

bind_interrupts!(struct Irqs {
    I2C0_IRQ => i2c::InterruptHandler<I2C0>;
    UART0_IRQ => uart::BufferedInterruptHandler<UART0>;
});

const SPI_FREQUENCY_HZ: u32 = 4_000_000;
const UART_BAUD: u32 = 9600;

#[embassy_executor::main]
async fn main(spawner: Spawner) -> ! {
    let Err(err) = inner_main(spawner).await;
    core::panic!("{err}");
}

async fn inner_main(spawner: Spawner) -> Result<Infallible> {
    info!("Word clock {} (radio board)", VERSION);
    let p = embassy_rp::init(Default::default());

    let mut spi_config = spi::Config::default();
    spi_config.frequency = SPI_FREQUENCY_HZ;
    let spi = Spi::new_blocking_txonly(p.SPI0, p.PIN_18, p.PIN_19, spi_config);
    let port = GrayscalePort::new(
        Output::new(p.PIN_20, Level::High), // BLANK
        Output::new(p.PIN_21, Level::Low),  // XLAT
        spi,
    );
    let rows = RowWiring::Counter(RowCounter::new(
        Output::new(p.PIN_14, Level::Low), // counter clock
        Output::new(p.PIN_15, Level::Low), // counter reset
    ));
    let gsclk = Pwm::new_output_a(p.PWM_SLICE0, p.PIN_16, pwm::Config::default());
    static DISPLAY_STATIC: DisplayStatic = Display::new_static();
    let display = Display::new(&DISPLAY_STATIC, port, rows, gsclk, spawner)?;

    static RADIO_STATIC: RadioStatic = Radio::new_static();
    let radio = Radio::new(&RADIO_STATIC, p.PIN_2, p.PIN_3, spawner)?;

    static TX_BUFFER: StaticCell<[u8; 64]> = StaticCell::new();
    static RX_BUFFER: StaticCell<[u8; 64]> = StaticCell::new();
    let mut uart_config = uart::Config::default();
    uart_config.baudrate = UART_BAUD;
    let uart = BufferedUart::new(
        p.UART0,
        p.PIN_0,
        p.PIN_1,
        Irqs,
        TX_BUFFER.init([0; 64]),
        RX_BUFFER.init([0; 64]),
        uart_config,
    );
    static CONSOLE_STATIC: ConsoleStatic = Console::new_static();
    let console = Console::new(&CONSOLE_STATIC, uart, spawner)?;

    let i2c = I2c::new_async(p.I2C0, p.PIN_5, p.PIN_4, Irqs, i2c::Config::default());
    let mut rtc = Ds1307::new(i2c);

    let mut state = ClockState::new();
    let mut grid = PixelGrid::new();
    match rtc.read_time().await {
        Ok(time) => state.accept_clock_time(time),
        Err(err) => {
            warn!("RTC unreadable, starting from power-on time: {}", Display2Format(&err));
            rtc.write_time(&TimeValue::POWER_ON).await?;
        }
    }

    let mut display_ticker = Ticker::every(Duration::from_millis(DISPLAY_TICK_MS));
    let mut poll_ticker = Ticker::every(Duration::from_millis(TIME_POLL_MS));
    loop {
        match select4(
            display_ticker.next(),
            poll_ticker.next(),
            radio.wait(),
            console.request(),
        )
        .await
        {
            Either4::First(()) => state.tick(&mut grid, &display),
            Either4::Second(()) => match rtc.read_time().await {
                Ok(time) => {
                    let was_enabled = state.radio_enabled();
                    state.accept_clock_time(time);
                    if state.radio_enabled() != was_enabled {
                        info!("Resync hour, listening for the radio signal");
                        radio.set_enabled(true);
                    }
                }
                Err(err) => warn!("RTC read failed: {}", Display2Format(&err)),
            },
            Either4::Third(time) => {
                let time = state.accept_radio_time(time);
                radio.set_enabled(state.radio_enabled());
                if let Err(err) = rtc.write_time(&time).await {
                    warn!("RTC write failed: {}", Display2Format(&err));
                }
            }
            Either4::Fourth(line) => {
                let reply = execute(&line, &mut state);
                if let Some(time) = reply.persist
                    && let Err(err) = rtc.write_time(&time).await
                {
                    warn!("RTC write failed: {}", Display2Format(&err));
                }
                console.reply(reply.text);
            }
        }
    }
}
