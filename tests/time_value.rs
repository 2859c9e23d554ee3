//! Host-level tests for clock time, display rounding, and BCD.

use word_clock::TimeValue;
use word_clock::time_value::{from_bcd, to_bcd};

const fn time(hours: u8, minutes: u8, seconds: u8) -> TimeValue {
    TimeValue {
        seconds,
        minutes,
        hours,
        day: 1,
        month: 1,
        year: 13,
        day_of_week: 2,
    }
}

#[test]
fn face_leads_by_two_then_three_minutes() {
    let early = time(10, 0, 0).display_time();
    let late = time(10, 0, 30).display_time();

    assert_eq!((early.hours, early.minutes), (10, 2));
    assert_eq!((late.hours, late.minutes), (10, 3));
}

#[test]
fn hour_carries_exactly_at_rollover() {
    let before = time(10, 57, 29).display_time();
    let carried = time(10, 57, 30).display_time();
    let wrapped = time(10, 58, 0).display_time();

    assert_eq!((before.hours, before.minutes), (10, 59));
    assert_eq!((carried.hours, carried.minutes), (11, 0));
    assert_eq!((wrapped.hours, wrapped.minutes), (11, 0));
}

#[test]
fn hours_fold_to_the_face() {
    let afternoon = time(13, 10, 0).display_time();
    let midnight = time(23, 59, 10).display_time();
    let noon = time(11, 57, 30).display_time();

    assert_eq!((afternoon.hours, afternoon.minutes), (1, 12));
    assert_eq!((midnight.hours, midnight.minutes), (0, 1));
    assert_eq!((noon.hours, noon.minutes), (0, 0));
}

#[test]
fn display_time_stays_in_range() {
    for hours in 0..24 {
        for minutes in 0..60 {
            for seconds in [0, 29, 30, 59] {
                let shown = time(hours, minutes, seconds).display_time();
                assert!(shown.hours < 12);
                assert!(shown.minutes < 60);
            }
        }
    }
}

#[test]
fn validity_checks_every_field() {
    assert!(TimeValue::POWER_ON.is_valid());
    assert!(!time(24, 0, 0).is_valid());
    assert!(!time(0, 60, 0).is_valid());
    assert!(!time(0, 0, 60).is_valid());
    assert!(!TimeValue { day: 0, ..TimeValue::POWER_ON }.is_valid());
    assert!(!TimeValue { month: 13, ..TimeValue::POWER_ON }.is_valid());
    assert!(!TimeValue { year: 100, ..TimeValue::POWER_ON }.is_valid());
    assert!(!TimeValue { day_of_week: 8, ..TimeValue::POWER_ON }.is_valid());
}

#[test]
fn bcd_packs_decimal_digits() {
    assert_eq!(to_bcd(59), 0x59);
    assert_eq!(to_bcd(7), 0x07);
    assert_eq!(from_bcd(0x23), 23);
    assert_eq!(from_bcd(0x00), 0);
}
