//! Host-level tests for the time-to-phrase mapping.

use word_clock::{DisplayTime, Pattern, pattern};

const ES_IST: u16 = 0b110_1110_0000;
const UHR: u16 = 0b000_0000_0111;

const fn at(hours: u8, minutes: u8) -> DisplayTime {
    DisplayTime { minutes, hours }
}

#[test]
fn full_hour_adds_uhr() {
    assert_eq!(
        pattern(at(3, 0)),
        Pattern::from_rows([ES_IST, 0, 0, 0, 0b000_0001_1110, 0, 0, 0, UHR])
    );
}

#[test]
fn one_oclock_says_ein_not_eins() {
    let full_hour = pattern(at(1, 2));
    let ten_past = pattern(at(1, 10));

    assert_eq!(full_hour.rows()[4], 0b001_1100_0000);
    assert_eq!(ten_past.rows()[4], 0b001_1110_0000);
}

#[test]
fn half_past_names_the_coming_hour() {
    // "ES IST HALB DREI"
    assert_eq!(
        pattern(at(2, 30)),
        Pattern::from_rows([ES_IST, 0, 0, 0b000_0000_1111, 0b000_0001_1110, 0, 0, 0, 0])
    );
}

#[test]
fn quarter_to_twelve_wraps_to_hour_zero() {
    // "ES IST VIERTEL VOR ZWÖLF"
    assert_eq!(
        pattern(at(11, 45)),
        Pattern::from_rows([
            ES_IST,
            0b111_1111_0000,
            0b000_0000_0111,
            0,
            0,
            0,
            0b000_1111_1000,
            0,
            0,
        ])
    );
}

#[test]
fn hour_rows_follow_the_minute_bands() {
    let full = pattern(at(5, 4));
    let plain = pattern(at(5, 5));
    let late_plain = pattern(at(5, 24));
    let next = pattern(at(5, 25));

    let hour_rows = |p: &Pattern| p.rows()[4..].to_vec();
    assert_eq!(hour_rows(&full), [0, 0, 0b000_0000_1111, 0, UHR]);
    assert_eq!(hour_rows(&plain), [0, 0, 0b000_0000_1111, 0, 0]);
    assert_eq!(hour_rows(&late_plain), hour_rows(&plain));
    assert_eq!(hour_rows(&next), [0, 0, 0, 0b011_1110_0000, 0]);
}

#[test]
fn minute_rows_change_every_five_minutes() {
    for band in 0..12_u8 {
        let first = pattern(at(7, band * 5));
        for minute in band * 5..band * 5 + 5 {
            assert_eq!(
                first.rows()[..4],
                pattern(at(7, minute)).rows()[..4],
                "minute {minute}"
            );
        }
        assert_eq!(first.rows()[0] & ES_IST, ES_IST, "band {band}");
    }
    assert_ne!(pattern(at(7, 4)).rows()[..4], pattern(at(7, 5)).rows()[..4]);
}

#[test]
fn is_lit_reads_leftmost_column_from_the_high_bit() {
    let face = pattern(at(3, 0));

    assert!(face.is_lit(0, 0));
    assert!(face.is_lit(0, 1));
    assert!(!face.is_lit(0, 2));
    assert!(face.is_lit(8, 10));
    assert!(!face.is_lit(8, 11));
    assert!(!face.is_lit(9, 0));
}
