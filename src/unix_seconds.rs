//! Unix timestamp type for network time

use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

use crate::time_value::TimeValue;

/// Units-safe wrapper for Unix timestamps (seconds since 1970-01-01 00:00:00 UTC)
#[repr(transparent)]
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug)]
pub struct UnixSeconds(pub i64);

impl UnixSeconds {
    /// Get the underlying i64 value
    #[must_use]
    pub const fn as_i64(self) -> i64 {
        self.0
    }

    /// Convert NTP seconds (since 1900-01-01) to Unix seconds (since 1970-01-01)
    #[must_use]
    pub const fn from_ntp_seconds(ntp: u32) -> Option<Self> {
        // 1900→1970 offset: 70 years * 365.25 days/year * 86400 seconds/day
        const NTP_TO_UNIX_SECONDS: i64 = 2_208_988_800;
        #[expect(clippy::arithmetic_side_effects, reason = "u32 minus constant fits in i64")]
        let seconds = (ntp as i64) - NTP_TO_UNIX_SECONDS;
        // Reject negative (pre-1970)
        if seconds >= 0 { Some(Self(seconds)) } else { None }
    }

    /// Convert to OffsetDateTime with the given timezone offset
    #[must_use]
    pub fn to_offset_datetime(self, offset: UtcOffset) -> Option<OffsetDateTime> {
        OffsetDateTime::from_unix_timestamp(self.as_i64())
            .ok()
            .map(|date_time| date_time.to_offset(offset))
    }

    /// Local wall-clock time at a fixed offset from UTC, in the clock's own representation.
    ///
    /// Returns `None` outside the years 2000–2099, which the two-digit year cannot hold.
    #[must_use]
    pub fn to_time_value(self, offset_minutes: i32) -> Option<TimeValue> {
        let offset = UtcOffset::from_whole_seconds(offset_minutes.checked_mul(60)?).ok()?;
        let date_time = self.to_offset_datetime(offset)?;
        let year = u8::try_from(date_time.year().checked_sub(2000)?).ok()?;
        if year >= 100 {
            return None;
        }
        Some(TimeValue {
            seconds: date_time.second(),
            minutes: date_time.minute(),
            hours: date_time.hour(),
            day: date_time.day(),
            month: u8::from(date_time.month()),
            year,
            day_of_week: date_time.weekday().number_from_monday(),
        })
    }

    /// The instant a local wall-clock reading at a fixed offset from UTC denotes.
    ///
    /// Returns `None` for components that do not form a real calendar date and time.
    #[must_use]
    pub fn from_time_value(time: &TimeValue, offset_minutes: i32) -> Option<Self> {
        let offset = UtcOffset::from_whole_seconds(offset_minutes.checked_mul(60)?).ok()?;
        let year = i32::from(time.year).checked_add(2000)?;
        let date = Date::from_calendar_date(year, Month::try_from(time.month).ok()?, time.day).ok()?;
        let clock = Time::from_hms(time.hours, time.minutes, time.seconds).ok()?;
        let unix = PrimitiveDateTime::new(date, clock)
            .assume_offset(offset)
            .unix_timestamp();
        Some(Self(unix))
    }

    /// Seconds later (or earlier, for negative `seconds`), saturating at the representable range.
    #[must_use]
    pub const fn saturating_add_seconds(self, seconds: i64) -> Self {
        Self(self.0.saturating_add(seconds))
    }
}
