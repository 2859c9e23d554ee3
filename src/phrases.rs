//! Time-to-pattern mapping for the German word-clock face.
//!
//! The face is 9 rows of 11 letters. Rows 0–3 hold the minute phrase ("ES IST FÜNF NACH",
//! "VIERTEL VOR", "HALB", ...), rows 4–8 hold the hour name. On the full hour the face adds
//! "UHR" and says "EIN" instead of "EINS".
//!
//! Each table row is a bitmask over the 11 columns, leftmost column in the highest bit.

use crate::shared_constants::{COLUMNS, HOUR_ROWS, MINUTE_ROWS, ROWS};
use crate::time_value::DisplayTime;

const PHRASES: usize = 12;
const MINUTES_PER_PHRASE: u8 = 5;
/// From this display minute on, the face names the coming hour ("HALB DREI" at 2:30).
const NEXT_HOUR_FROM: u8 = 25;

type MinutePhrase = [u16; MINUTE_ROWS];
type HourPhrase = [u16; HOUR_ROWS];

/// Indexed by `minutes / 5`.
#[rustfmt::skip]
const MINUTE_PHRASES: [MinutePhrase; PHRASES] = [
    [0b110_1110_0000, 0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0000],
    [0b110_1110_1111, 0b000_0000_0000, 0b000_0000_0000, 0b111_1000_0000],
    [0b110_1110_0000, 0b000_0000_1111, 0b000_0000_0000, 0b111_1000_0000],
    [0b110_1110_0000, 0b111_1111_0000, 0b000_0000_0000, 0b111_1000_0000],
    [0b110_1110_0000, 0b000_0000_0000, 0b111_1111_0000, 0b111_1000_0000],
    [0b110_1110_1111, 0b000_0000_0000, 0b000_0000_0111, 0b000_0000_1111],
    [0b110_1110_0000, 0b000_0000_0000, 0b000_0000_0000, 0b000_0000_1111],
    [0b110_1110_1111, 0b000_0000_0000, 0b000_0000_0000, 0b111_1000_1111],
    [0b110_1110_0000, 0b000_0000_0000, 0b111_1111_0111, 0b000_0000_0000],
    [0b110_1110_0000, 0b111_1111_0000, 0b000_0000_0111, 0b000_0000_0000],
    [0b110_1110_0000, 0b000_0000_1111, 0b000_0000_0111, 0b000_0000_0000],
    [0b110_1110_1111, 0b000_0000_0000, 0b000_0000_0111, 0b000_0000_0000],
];

/// Indexed by hour 0..12, hour 0 being twelve.
#[rustfmt::skip]
const HOUR_PHRASES: [HourPhrase; PHRASES] = [
    [0b000_0000_0000, 0b000_0000_0000, 0b000_1111_1000, 0b000_0000_0000, 0b000_0000_0000],
    [0b001_1110_0000, 0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0000],
    [0b111_1000_0000, 0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0000],
    [0b000_0001_1110, 0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0000],
    [0b000_0000_0000, 0b111_1000_0000, 0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0000],
    [0b000_0000_0000, 0b000_0000_0000, 0b000_0000_1111, 0b000_0000_0000, 0b000_0000_0000],
    [0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0000, 0b011_1110_0000, 0b000_0000_0000],
    [0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0000, 0b000_0011_1111, 0b000_0000_0000],
    [0b000_0000_0000, 0b000_0000_1111, 0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0000],
    [0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0000, 0b000_1111_0000],
    [0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0000, 0b111_1000_0000],
    [0b000_0000_0000, 0b000_0000_0000, 0b111_0000_0000, 0b000_0000_0000, 0b000_0000_0000],
];

/// Hour names used in the first five minutes of the hour, with "UHR" on the last row.
#[rustfmt::skip]
const FULL_HOUR_PHRASES: [HourPhrase; PHRASES] = [
    [0b000_0000_0000, 0b000_0000_0000, 0b000_1111_1000, 0b000_0000_0000, 0b000_0000_0111],
    [0b001_1100_0000, 0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0111],
    [0b111_1000_0000, 0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0111],
    [0b000_0001_1110, 0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0111],
    [0b000_0000_0000, 0b111_1000_0000, 0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0111],
    [0b000_0000_0000, 0b000_0000_0000, 0b000_0000_1111, 0b000_0000_0000, 0b000_0000_0111],
    [0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0000, 0b011_1110_0000, 0b000_0000_0111],
    [0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0000, 0b000_0011_1111, 0b000_0000_0111],
    [0b000_0000_0000, 0b000_0000_1111, 0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0111],
    [0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0000, 0b000_1111_0111],
    [0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0000, 0b000_0000_0000, 0b111_1000_0111],
    [0b000_0000_0000, 0b000_0000_0000, 0b111_0000_0000, 0b000_0000_0000, 0b000_0000_0111],
];

/// Which letters are lit, one column bitmask per row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pattern([u16; ROWS]);

impl Pattern {
    #[must_use]
    pub const fn from_rows(rows: [u16; ROWS]) -> Self {
        Self(rows)
    }

    #[must_use]
    pub const fn rows(&self) -> &[u16; ROWS] {
        &self.0
    }

    /// Whether the letter at (`row`, `column`) is part of the phrase. Out-of-range positions are unlit.
    #[must_use]
    pub fn is_lit(&self, row: usize, column: usize) -> bool {
        let Some(shift) = COLUMNS.checked_sub(1).and_then(|last| last.checked_sub(column)) else {
            return false;
        };
        self.0
            .get(row)
            .is_some_and(|mask| (mask >> shift) & 1 == 1)
    }
}

/// Map a display time to the lit letters.
///
/// Minutes select one of twelve five-minute phrases. The hour rows show the full-hour
/// phrase below minute 5, the plain hour name below minute 25, and the name of the next
/// hour from minute 25 on.
#[must_use]
#[expect(
    clippy::arithmetic_side_effects,
    clippy::integer_division_remainder_used,
    clippy::indexing_slicing,
    reason = "Indices are reduced modulo the table length"
)]
pub fn pattern(time: DisplayTime) -> Pattern {
    let phrase = usize::from(time.minutes / MINUTES_PER_PHRASE) % PHRASES;
    let hour = usize::from(time.hours) % PHRASES;
    let hour_phrase = if time.minutes < MINUTES_PER_PHRASE {
        &FULL_HOUR_PHRASES[hour]
    } else if time.minutes < NEXT_HOUR_FROM {
        &HOUR_PHRASES[hour]
    } else {
        &HOUR_PHRASES[(hour + 1) % PHRASES]
    };

    let mut rows = [0; ROWS];
    let (minute_rows, hour_rows) = rows.split_at_mut(MINUTE_ROWS);
    minute_rows.copy_from_slice(&MINUTE_PHRASES[phrase]);
    hour_rows.copy_from_slice(hour_phrase);
    Pattern(rows)
}
