//! An LED word clock: radio or network time in, a faded German phrase out.
//!
//! The clock algorithms (signal decoding, phrase mapping, easing, channel packing, the
//! refresh sequence, the serial protocol) are plain `no_std` code that also builds on the
//! host. The device modules that run them on a Raspberry Pi Pico only build for the target.
#![cfg_attr(not(test), no_std)]

pub mod channel_buffer;
pub mod clock_state;
pub mod command;
pub mod dcf77;
pub mod ds1307;
pub mod easing;
mod error;
pub mod gamma;
pub mod matrix;
pub mod output_array;
pub mod phrases;
pub mod shared_constants;
pub mod time_source;
pub mod time_value;
pub mod unix_seconds;

#[cfg(target_os = "none")]
pub mod display;
#[cfg(target_os = "none")]
pub mod radio;
#[cfg(target_os = "none")]
pub mod serial;
#[cfg(all(target_os = "none", feature = "wifi"))]
pub mod time_sync;
#[cfg(all(target_os = "none", feature = "wifi"))]
pub mod wifi;

// Re-export commonly used items
pub use channel_buffer::{ChannelBuffer, ChannelSink};
pub use clock_state::ClockState;
pub use dcf77::{Dcf77Decoder, PulseThresholds, SignalFrame};
pub use easing::PixelGrid;
pub use error::{Error, Result};
pub use phrases::{Pattern, pattern};
pub use time_source::{SystemClock, TimeSource};
pub use time_value::{DisplayTime, TimeValue};
pub use unix_seconds::UnixSeconds;
