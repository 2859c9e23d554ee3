//! State owned by the main control loop.

use crate::channel_buffer::ChannelSink;
use crate::easing::PixelGrid;
use crate::phrases::pattern;
use crate::shared_constants::{MAXIMUM_BRIGHTNESS, RADIO_RESYNC_HOUR};
use crate::time_value::{DisplayTime, TimeValue};

/// The authoritative time, the brightness ceiling, and whether the radio receiver should run.
///
/// Every field has a single writer: the loop that owns this value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClockState {
    time: TimeValue,
    ceiling: u8,
    radio_enabled: bool,
}

impl Default for ClockState {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockState {
    /// Power-on state: [`TimeValue::POWER_ON`], full brightness, radio listening.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            time: TimeValue::POWER_ON,
            ceiling: MAXIMUM_BRIGHTNESS,
            radio_enabled: true,
        }
    }

    #[must_use]
    pub const fn time(&self) -> &TimeValue {
        &self.time
    }

    #[must_use]
    pub const fn ceiling(&self) -> u8 {
        self.ceiling
    }

    #[must_use]
    pub const fn radio_enabled(&self) -> bool {
        self.radio_enabled
    }

    pub const fn set_ceiling(&mut self, ceiling: u8) {
        self.ceiling = ceiling;
    }

    /// Replace the time wholesale.
    pub const fn set_time(&mut self, time: TimeValue) {
        self.time = time;
    }

    /// Take a time read back from the real-time clock or the system clock.
    ///
    /// Entering [`RADIO_RESYNC_HOUR`] switches the receiver back on for a fresh fix.
    pub const fn accept_clock_time(&mut self, time: TimeValue) {
        if time.hours == RADIO_RESYNC_HOUR && self.time.hours != RADIO_RESYNC_HOUR {
            self.radio_enabled = true;
        }
        self.time = time;
    }

    /// Take a freshly decoded radio time.
    ///
    /// A good radio fix restores full brightness and switches the receiver off. Returns the
    /// time so the caller can write it through to the real-time clock.
    pub const fn accept_radio_time(&mut self, time: TimeValue) -> TimeValue {
        self.time = time;
        self.ceiling = MAXIMUM_BRIGHTNESS;
        self.radio_enabled = false;
        time
    }

    #[must_use]
    pub const fn display_time(&self) -> DisplayTime {
        self.time.display_time()
    }

    /// One display tick: map the rounded time to its phrase and fade every pixel one step toward it.
    pub fn tick(&self, grid: &mut PixelGrid, sink: &impl ChannelSink) {
        grid.step(&pattern(self.display_time()), self.ceiling, sink);
    }
}
