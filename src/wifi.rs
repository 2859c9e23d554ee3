//! Wi-Fi client for the Pico W's CYW43 radio.
//!
//! [`Wifi::new`] spawns a task that brings up the chip, joins the network named at build time
//! (`WIFI_SSID`/`WIFI_PASS`), waits for DHCP, and then hands out the network stack through
//! [`Wifi::stack`].

#![allow(clippy::future_not_send, reason = "single-threaded")]
#![allow(unsafe_code, reason = "bind_interrupts! defines the PIO interrupt handler")]

use core::convert::Infallible;

use cyw43::JoinOptions;
use cyw43_pio::{DEFAULT_CLOCK_DIVIDER, PioSpi};
use defmt::info;
use embassy_executor::Spawner;
use embassy_net::{Config, Stack, StackResources};
use embassy_rp::gpio::{Level, Output};
use embassy_rp::peripherals::{DMA_CH0, PIN_23, PIN_24, PIN_25, PIN_29, PIO0};
use embassy_rp::pio::{InterruptHandler, Pio};
use embassy_rp::{Peri, bind_interrupts};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::Timer;
use static_cell::StaticCell;

use crate::Result;

const WIFI_SSID: &str = env!("WIFI_SSID");
const WIFI_PASS: &str = env!("WIFI_PASS");

type StackReady = Signal<CriticalSectionRawMutex, &'static Stack<'static>>;

bind_interrupts!(struct Irqs {
    PIO0_IRQ_0 => InterruptHandler<PIO0>;
});

/// The CYW43 pins and peripherals of a Pico W.
pub struct WifiPins {
    pub power: Peri<'static, PIN_23>,
    pub chip_select: Peri<'static, PIN_25>,
    pub pio: Peri<'static, PIO0>,
    pub data: Peri<'static, PIN_24>,
    pub clock: Peri<'static, PIN_29>,
    pub dma: Peri<'static, DMA_CH0>,
}

/// Resources needed by [`Wifi`].
pub struct WifiStatic {
    ready: StackReady,
}

/// Handle to the Wi-Fi bring-up task.
#[derive(Clone, Copy)]
pub struct Wifi {
    ready: &'static StackReady,
}

impl Wifi {
    /// Create [`Wifi`] resources.
    #[must_use]
    pub const fn new_static() -> WifiStatic {
        WifiStatic {
            ready: Signal::new(),
        }
    }

    /// Spawn the task that brings the network up.
    ///
    /// # Errors
    ///
    /// Returns an error if the task cannot be spawned.
    pub fn new(wifi_static: &'static WifiStatic, pins: WifiPins, spawner: Spawner) -> Result<Self> {
        spawner.spawn(wifi_device_loop(pins, &wifi_static.ready, spawner)?);
        Ok(Self {
            ready: &wifi_static.ready,
        })
    }

    /// Wait until the network is joined and configured. Only the first caller gets the stack.
    pub async fn stack(&self) -> &'static Stack<'static> {
        self.ready.wait().await
    }
}

#[embassy_executor::task]
async fn wifi_device_loop(pins: WifiPins, ready: &'static StackReady, spawner: Spawner) -> ! {
    let Err(err) = inner_wifi_device_loop(pins, ready, spawner).await;
    core::panic!("{err}");
}

async fn inner_wifi_device_loop(
    pins: WifiPins,
    ready: &'static StackReady,
    spawner: Spawner,
) -> Result<Infallible> {
    let WifiPins {
        power,
        chip_select,
        pio,
        data,
        clock,
        dma,
    } = pins;
    info!("WiFi device initializing in client mode");

    let fw = cyw43_firmware::CYW43_43439A0;
    let clm = cyw43_firmware::CYW43_43439A0_CLM;

    let pwr = Output::new(power, Level::Low);
    let cs = Output::new(chip_select, Level::High);
    let mut pio = Pio::new(pio, Irqs);
    let spi = PioSpi::new(
        &mut pio.common,
        pio.sm0,
        DEFAULT_CLOCK_DIVIDER,
        pio.irq0,
        cs,
        data,
        clock,
        dma,
    );

    static STATE: StaticCell<cyw43::State> = StaticCell::new();
    let state = STATE.init(cyw43::State::new());
    let (net_device, mut control, runner) = cyw43::new(state, pwr, spi, fw).await;
    spawner.spawn(cyw43_task(runner)?);

    control.init(clm).await;
    control
        .set_power_management(cyw43::PowerManagementMode::PowerSave)
        .await;

    let config = Config::dhcpv4(Default::default());
    let seed = 0x3f1c_a9d2_5e07_b864;

    static RESOURCES: StaticCell<StackResources<3>> = StaticCell::new();
    static STACK: StaticCell<Stack<'static>> = StaticCell::new();
    let (stack, net_runner) = embassy_net::new(
        net_device,
        config,
        RESOURCES.init(StackResources::<3>::new()),
        seed,
    );
    let stack = STACK.init(stack);
    spawner.spawn(net_task(net_runner)?);

    info!("Connecting to WiFi: {}", WIFI_SSID);
    while let Err(err) = control
        .join(WIFI_SSID, JoinOptions::new(WIFI_PASS.as_bytes()))
        .await
    {
        info!("Join failed: {}", err.status);
        Timer::after_secs(1).await;
    }

    info!("WiFi connected! Waiting for DHCP...");
    stack.wait_config_up().await;
    if let Some(config) = stack.config_v4() {
        info!("IP Address: {}", config.address);
    }
    ready.signal(stack);

    loop {
        Timer::after_secs(3600).await;
    }
}

#[embassy_executor::task]
async fn cyw43_task(
    runner: cyw43::Runner<'static, Output<'static>, PioSpi<'static, PIO0, 0, DMA_CH0>>,
) -> ! {
    runner.run().await
}

#[embassy_executor::task]
async fn net_task(mut runner: embassy_net::Runner<'static, cyw43::NetDriver<'static>>) -> ! {
    runner.run().await
}
