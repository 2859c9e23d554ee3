//! Calendar time as the clock keeps it, and the rounded time the face shows.

/// Minutes in one hour.
const MINUTES_PER_HOUR: u8 = 60;
/// Hours on the clock face.
const HOURS_ON_FACE: u8 = 12;

/// The authoritative time of day, in plain decimal components.
///
/// Replaced as a whole whenever a new reading arrives from the radio decoder, the
/// real-time clock, or the network; never edited field by field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TimeValue {
    pub seconds: u8,
    pub minutes: u8,
    pub hours: u8,
    pub day: u8,
    pub month: u8,
    /// Two-digit year, 0–99 meaning 2000–2099.
    pub year: u8,
    /// 1 = Monday … 7 = Sunday.
    pub day_of_week: u8,
}

impl TimeValue {
    /// The time shown right after power-up, before any source has reported: 2013-01-01 10:00:00.
    pub const POWER_ON: Self = Self {
        seconds: 0,
        minutes: 0,
        hours: 10,
        day: 1,
        month: 1,
        year: 13,
        day_of_week: 0,
    };

    /// Derive the time the face should spell out.
    ///
    /// The face leads the real time by two minutes (three once the current minute is half
    /// over), so "five past" lights up from 4:03 onward. The hour carries when the
    /// minutes wrap, and hours fold to `0..12`.
    #[must_use]
    #[expect(
        clippy::arithmetic_side_effects,
        clippy::integer_division_remainder_used,
        reason = "Inputs are bounded (minutes < 60, hours < 24), so no overflow"
    )]
    pub const fn display_time(&self) -> DisplayTime {
        let lead = if self.seconds >= 30 { 3 } else { 2 };
        let mut minutes = self.minutes % MINUTES_PER_HOUR + lead;
        let mut hours = self.hours % HOURS_ON_FACE;
        if minutes >= MINUTES_PER_HOUR {
            minutes -= MINUTES_PER_HOUR;
            hours = (hours + 1) % HOURS_ON_FACE;
        }
        DisplayTime { minutes, hours }
    }

    /// Whether each component lies in its calendar range.
    #[must_use]
    pub const fn is_valid(&self) -> bool {
        self.seconds < 60
            && self.minutes < 60
            && self.hours < 24
            && self.day >= 1
            && self.day <= 31
            && self.month >= 1
            && self.month <= 12
            && self.year < 100
            && self.day_of_week <= 7
    }
}

/// Rounded hour and minute spelled out on the face. Recomputed every tick, never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DisplayTime {
    /// 0..60
    pub minutes: u8,
    /// 0..12
    pub hours: u8,
}

/// Pack a decimal value 0..=99 into binary-coded decimal.
#[must_use]
#[expect(
    clippy::arithmetic_side_effects,
    clippy::integer_division_remainder_used,
    reason = "Callers pass values below 100"
)]
pub const fn to_bcd(value: u8) -> u8 {
    ((value / 10) << 4) | (value % 10)
}

/// Unpack a binary-coded decimal byte.
#[must_use]
#[expect(
    clippy::arithmetic_side_effects,
    reason = "High nibble is at most 15, so the result fits in u8"
)]
pub const fn from_bcd(value: u8) -> u8 {
    (value >> 4) * 10 + (value & 0x0F)
}
