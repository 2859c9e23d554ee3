//! Where the authoritative time comes from.

use crate::Result;
use crate::time_value::TimeValue;
use crate::unix_seconds::UnixSeconds;

/// A clock the main loop can read and set.
#[expect(async_fn_in_trait, reason = "Used on a single-threaded executor only")]
pub trait TimeSource {
    /// Fetch the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the clock cannot be reached or reports nonsense.
    async fn read_time(&mut self) -> Result<TimeValue>;

    /// Persist `time` as the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the clock cannot be reached.
    async fn write_time(&mut self, time: &TimeValue) -> Result<()>;
}

const MILLIS_PER_SECOND: u64 = 1_000;

/// Wall-clock time kept by the processor's uptime counter and disciplined by network time.
///
/// The clock is a single anchor: the Unix time at some uptime. Every reading adds the uptime
/// elapsed since then. Until the first sync the anchor is the power-on time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SystemClock {
    offset_minutes: i32,
    anchor: UnixSeconds,
    anchor_uptime_ms: u64,
    synced: bool,
}

impl SystemClock {
    /// A clock showing [`TimeValue::POWER_ON`] at uptime zero, at `offset_minutes` from UTC.
    #[must_use]
    pub fn new(offset_minutes: i32) -> Self {
        let anchor = UnixSeconds::from_time_value(&TimeValue::POWER_ON, offset_minutes)
            .unwrap_or(UnixSeconds(0));
        Self {
            offset_minutes,
            anchor,
            anchor_uptime_ms: 0,
            synced: false,
        }
    }

    /// Re-anchor to a network time taken at `uptime_ms`.
    pub const fn set_unix(&mut self, now: UnixSeconds, uptime_ms: u64) {
        self.anchor = now;
        self.anchor_uptime_ms = uptime_ms;
        self.synced = true;
    }

    /// Re-anchor to a local wall-clock time taken at `uptime_ms`. Impossible dates are ignored.
    pub fn set_time(&mut self, time: &TimeValue, uptime_ms: u64) {
        if let Some(now) = UnixSeconds::from_time_value(time, self.offset_minutes) {
            self.anchor = now;
            self.anchor_uptime_ms = uptime_ms;
        }
    }

    /// Whether network time has been received since power-up.
    #[must_use]
    pub const fn is_synced(&self) -> bool {
        self.synced
    }

    /// Unix time at `uptime_ms`. Uptimes before the anchor read as the anchor itself.
    #[must_use]
    #[expect(
        clippy::integer_division_remainder_used,
        reason = "Divisor is a non-zero constant"
    )]
    pub fn unix_at(&self, uptime_ms: u64) -> UnixSeconds {
        let elapsed = uptime_ms.saturating_sub(self.anchor_uptime_ms) / MILLIS_PER_SECOND;
        self.anchor
            .saturating_add_seconds(i64::try_from(elapsed).unwrap_or(i64::MAX))
    }

    /// Local wall-clock time at `uptime_ms`.
    ///
    /// Falls back to [`TimeValue::POWER_ON`] if the time leaves the years 2000–2099.
    #[must_use]
    pub fn time_at(&self, uptime_ms: u64) -> TimeValue {
        self.unix_at(uptime_ms)
            .to_time_value(self.offset_minutes)
            .unwrap_or(TimeValue::POWER_ON)
    }
}

#[cfg(target_os = "none")]
impl TimeSource for SystemClock {
    async fn read_time(&mut self) -> Result<TimeValue> {
        Ok(self.time_at(embassy_time::Instant::now().as_millis()))
    }

    async fn write_time(&mut self, time: &TimeValue) -> Result<()> {
        self.set_time(time, embassy_time::Instant::now().as_millis());
        Ok(())
    }
}
