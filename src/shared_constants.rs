//! Geometry, timing, and build-time configuration shared by the clock and its devices.

/// Number of multiplexed LED rows on the clock face.
pub const ROWS: usize = 9;
/// Number of lit columns per row. Column `c` is wired to driver channel `c`.
pub const COLUMNS: usize = 11;

/// Rows 0..MINUTE_ROWS spell the minute phrase, the rest spell the hour phrase.
pub const MINUTE_ROWS: usize = 4;
/// Rows used by the hour phrase.
pub const HOUR_ROWS: usize = ROWS - MINUTE_ROWS;

/// Constant-current channels per driver chip.
pub const CHANNELS: usize = 16;
/// Bytes shifted into the driver chip per row: 16 channels × 12 bits.
pub const GRAYSCALE_BYTES: usize = CHANNELS * 12 / 8;

/// Brightness ceiling used at power-up and after every successful radio decode.
pub const MAXIMUM_BRIGHTNESS: u8 = 0xFF;
/// Level of an unlit pixel.
pub const MINIMUM_BRIGHTNESS: u8 = 0x00;

/// Sampling period of the radio time-signal input, in milliseconds.
pub const RADIO_TICK_MS: u16 = 10;
/// Period of the mapper + easing tick, in milliseconds.
pub const DISPLAY_TICK_MS: u64 = 5;
/// How often the authoritative time is re-read from the time source, in milliseconds.
pub const TIME_POLL_MS: u64 = 1_000;

/// Hour at which the radio receiver is switched back on to correct the day's drift.
pub const RADIO_RESYNC_HOUR: u8 = 3;

/// Grayscale clock fed to the driver chips, in hertz.
pub const GRAYSCALE_CLOCK_HZ: u32 = 5_000_000;
/// One full 4096-step grayscale period at [`GRAYSCALE_CLOCK_HZ`], rounded up, in microseconds.
pub const REFRESH_PERIOD_US: u64 = 820;

/// Offset from UTC applied to network time, in minutes (`UTC_OFFSET_MINUTES` at build time).
pub const UTC_OFFSET_MINUTES: i32 = parse_i32(env!("UTC_OFFSET_MINUTES"));

/// Version string reported by the serial `v` command.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[expect(
    clippy::arithmetic_side_effects,
    clippy::indexing_slicing,
    reason = "Build script validates the value; overflow panics at compile time"
)]
const fn parse_i32(text: &str) -> i32 {
    let bytes = text.as_bytes();
    let (negative, mut index) = match bytes.first() {
        Some(b'-') => (true, 1),
        Some(b'+') => (false, 1),
        _ => (false, 0),
    };
    let mut value: i32 = 0;
    while index < bytes.len() {
        let digit = bytes[index];
        assert!(digit.is_ascii_digit(), "UTC_OFFSET_MINUTES must be an integer");
        value = value * 10 + (digit - b'0') as i32;
        index += 1;
    }
    if negative { -value } else { value }
}
