//! Host-level tests for the state owned by the main loop.

use word_clock::shared_constants::{GRAYSCALE_BYTES, MAXIMUM_BRIGHTNESS, RADIO_RESYNC_HOUR};
use word_clock::{ChannelBuffer, ClockState, PixelGrid, TimeValue};

const RADIO_FIX: TimeValue = TimeValue {
    seconds: 0,
    minutes: 41,
    hours: 18,
    day: 2,
    month: 9,
    year: 25,
    day_of_week: 2,
};

#[test]
fn power_on_state() {
    let state = ClockState::new();

    assert_eq!(*state.time(), TimeValue::POWER_ON);
    assert_eq!(state.ceiling(), MAXIMUM_BRIGHTNESS);
    assert!(state.radio_enabled());
    assert_eq!(state, ClockState::default());
}

#[test]
fn radio_fix_restores_brightness_and_stops_the_receiver() {
    let mut state = ClockState::new();
    state.set_ceiling(0x10);

    let persisted = state.accept_radio_time(RADIO_FIX);

    assert_eq!(persisted, RADIO_FIX);
    assert_eq!(*state.time(), RADIO_FIX);
    assert_eq!(state.ceiling(), MAXIMUM_BRIGHTNESS);
    assert!(!state.radio_enabled());
}

#[test]
fn clock_readings_do_not_touch_brightness_or_radio() {
    let mut state = ClockState::new();
    state.set_ceiling(0x40);
    state.accept_clock_time(RADIO_FIX);

    assert_eq!(*state.time(), RADIO_FIX);
    assert_eq!(state.ceiling(), 0x40);
    assert!(state.radio_enabled());
}

#[test]
fn receiver_comes_back_on_at_the_resync_hour() {
    let mut state = ClockState::new();
    state.accept_radio_time(RADIO_FIX);

    let before = TimeValue {
        hours: RADIO_RESYNC_HOUR - 1,
        minutes: 59,
        seconds: 59,
        ..RADIO_FIX
    };
    state.accept_clock_time(before);
    assert!(!state.radio_enabled());

    let resync = TimeValue {
        hours: RADIO_RESYNC_HOUR,
        minutes: 0,
        seconds: 0,
        ..RADIO_FIX
    };
    state.accept_clock_time(resync);
    assert!(state.radio_enabled());

    // A fix during the resync hour keeps the receiver off for the rest of that hour.
    state.accept_radio_time(resync);
    state.accept_clock_time(TimeValue {
        seconds: 1,
        ..resync
    });
    assert!(!state.radio_enabled());
}

#[test]
fn tick_fades_the_rounded_phrase_into_the_buffer() {
    let state = ClockState::new();
    let mut grid = PixelGrid::new();
    let buffer = ChannelBuffer::new();

    // 10:00 shows "ES IST ZEHN UHR".
    let shown = state.display_time();
    assert_eq!((shown.hours, shown.minutes), (10, 2));

    for _ in 0..255 {
        state.tick(&mut grid, &buffer);
    }
    assert_eq!(grid.level(0, 0), Some(255));
    assert_eq!(grid.level(8, 0), Some(255));
    assert_eq!(grid.level(8, 10), Some(255));
    assert_eq!(grid.level(8, 5), Some(0));
    assert_eq!(grid.level(4, 0), Some(0));

    // Column 0 of row 8 is driver channel 0, the last 12 bits shifted out.
    let row = buffer.row_bytes(8);
    assert_eq!(row[GRAYSCALE_BYTES - 2] & 0x0F, 0x0F);
    assert_eq!(row[GRAYSCALE_BYTES - 1], 0xFF);
    assert_eq!(buffer.row_bytes(1), [0; GRAYSCALE_BYTES]);
}
