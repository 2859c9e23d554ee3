//! A device abstraction for a DCF77 receiver module.
//!
//! A task samples the receiver's data output every [`RADIO_TICK_MS`] and feeds the samples to a
//! [`Dcf77Decoder`]. Decoded times are published through [`Radio::wait`]. While disabled, the
//! receiver's power-on line is released and no samples are taken.

#![allow(clippy::future_not_send, reason = "single-threaded")]

use core::convert::Infallible;
use core::num::NonZeroU16;

use defmt::info;
use embassy_executor::Spawner;
use embassy_futures::select::{Either, select};
use embassy_rp::Peri;
use embassy_rp::gpio::{AnyPin, Input, Level, Output, Pin, Pull};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Ticker};

use crate::Result;
use crate::dcf77::{Dcf77Decoder, PulseThresholds};
use crate::shared_constants::RADIO_TICK_MS;
use crate::time_value::TimeValue;

const THRESHOLDS: PulseThresholds = match NonZeroU16::new(RADIO_TICK_MS) {
    Some(tick_ms) => PulseThresholds::for_tick_ms(tick_ms),
    None => PulseThresholds::DEFAULT,
};

type RadioTimes = Signal<CriticalSectionRawMutex, TimeValue>;
type RadioPower = Signal<CriticalSectionRawMutex, bool>;

/// Resources needed by [`Radio`].
pub struct RadioStatic {
    times: RadioTimes,
    power: RadioPower,
}

/// Handle to the running receiver task.
#[derive(Clone, Copy)]
pub struct Radio {
    times: &'static RadioTimes,
    power: &'static RadioPower,
}

impl Radio {
    /// Create [`Radio`] resources.
    #[must_use]
    pub const fn new_static() -> RadioStatic {
        RadioStatic {
            times: Signal::new(),
            power: Signal::new(),
        }
    }

    /// Power the receiver and start decoding.
    ///
    /// `data` is the receiver's output, high during a second pulse. `power_on` is the
    /// receiver's active-low PON input.
    ///
    /// # Errors
    ///
    /// Returns an error if the task cannot be spawned.
    pub fn new(
        radio_static: &'static RadioStatic,
        data: Peri<'static, impl Pin>,
        power_on: Peri<'static, impl Pin>,
        spawner: Spawner,
    ) -> Result<Self> {
        let data: Peri<'static, AnyPin> = data.into();
        let power_on: Peri<'static, AnyPin> = power_on.into();
        let data = Input::new(data, Pull::None);
        let power_on = Output::new(power_on, Level::Low);
        spawner.spawn(radio_device_loop(data, power_on, radio_static)?);
        Ok(Self {
            times: &radio_static.times,
            power: &radio_static.power,
        })
    }

    /// Wait for the next decoded minute frame.
    pub async fn wait(&self) -> TimeValue {
        self.times.wait().await
    }

    /// Switch the receiver on or off.
    pub fn set_enabled(&self, enabled: bool) {
        self.power.signal(enabled);
    }
}

#[embassy_executor::task]
async fn radio_device_loop(
    data: Input<'static>,
    power_on: Output<'static>,
    resources: &'static RadioStatic,
) -> ! {
    let Err(err) = inner_radio_device_loop(data, power_on, resources).await;
    core::panic!("{err}");
}

async fn inner_radio_device_loop(
    data: Input<'static>,
    mut power_on: Output<'static>,
    resources: &'static RadioStatic,
) -> Result<Infallible> {
    info!(
        "Radio started (tick {} ms, sync gap > {} ticks)",
        RADIO_TICK_MS, THRESHOLDS.sync_gap_ticks
    );
    let mut decoder = Dcf77Decoder::new(THRESHOLDS);
    let mut ticker = Ticker::every(Duration::from_millis(u64::from(RADIO_TICK_MS)));
    loop {
        match select(ticker.next(), resources.power.wait()).await {
            Either::First(()) => {
                if let Some(time) = decoder.track(data.is_high()) {
                    info!(
                        "Radio time {:02}:{:02} 20{:02}-{:02}-{:02}",
                        time.hours, time.minutes, time.year, time.month, time.day
                    );
                    resources.times.signal(time);
                }
            }
            Either::Second(true) => {}
            Either::Second(false) => {
                info!("Radio receiver off");
                power_on.set_high();
                while !resources.power.wait().await {}
                info!("Radio receiver on");
                power_on.set_low();
                decoder = Dcf77Decoder::new(THRESHOLDS);
                ticker.reset();
            }
        }
    }
}
