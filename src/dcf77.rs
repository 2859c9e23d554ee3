//! DCF77 radio time-code decoder.
//!
//! The receiver output is sampled once per tick. Every second begins with a pulse the
//! receiver reports as a high level: about 100 ms for a 0 bit and about 200 ms for a 1 bit.
//! Second 59 carries no pulse, so the long low run before the next pulse marks the start
//! of a new minute frame.
//!
//! The decoder is a plain state machine advanced by [`Dcf77Decoder::track`]; it never
//! touches hardware and can be fed synthetic samples.

use core::num::NonZeroU16;

use crate::time_value::TimeValue;

/// Index of the last bit in a minute frame (bits 0..=58).
pub const LAST_BIT: u8 = 58;

const FRAME_MASK: u64 = (1 << (LAST_BIT + 1)) - 1;

// Fixed markers and parity bits
const START_OF_MINUTE: u8 = 0;
const START_OF_TIME: u8 = 20;
const MINUTE_PARITY: u8 = 28;
const HOUR_PARITY: u8 = 35;
const DATE_PARITY: u8 = LAST_BIT;

// Field layout: (first bit, width)
const MINUTE_UNITS: (u8, u8) = (21, 4);
const MINUTE_TENS: (u8, u8) = (25, 3);
const HOUR_UNITS: (u8, u8) = (29, 4);
const HOUR_TENS: (u8, u8) = (33, 2);
const DAY_UNITS: (u8, u8) = (36, 4);
const DAY_TENS: (u8, u8) = (40, 2);
const DAY_OF_WEEK: (u8, u8) = (42, 3);
const MONTH_UNITS: (u8, u8) = (45, 4);
const MONTH_TENS: (u8, u8) = (49, 1);
const YEAR_UNITS: (u8, u8) = (50, 4);
const YEAR_TENS: (u8, u8) = (54, 4);

/// Pulse-width thresholds, in ticks of the sampling period.
///
/// The defaults are calibrated for a 10 ms tick. Use [`PulseThresholds::for_tick_ms`] when
/// sampling at a different rate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PulseThresholds {
    /// A low run longer than this many ticks is the minute gap.
    pub sync_gap_ticks: u16,
    /// A high run within this inclusive window is a 1 bit. Anything else is a 0 bit.
    pub one_bit_ticks: (u16, u16),
}

impl PulseThresholds {
    /// Thresholds for a 10 ms tick.
    pub const DEFAULT: Self = Self {
        sync_gap_ticks: 160,
        one_bit_ticks: (13, 35),
    };

    const SYNC_GAP_MS: u16 = 1_600;
    const ONE_BIT_MS: (u16, u16) = (130, 350);

    /// Scale the 10 ms thresholds to another sampling period.
    #[must_use]
    #[expect(
        clippy::arithmetic_side_effects,
        clippy::integer_division_remainder_used,
        reason = "Divisor is non-zero"
    )]
    pub const fn for_tick_ms(tick_ms: NonZeroU16) -> Self {
        let tick = tick_ms.get();
        Self {
            sync_gap_ticks: Self::SYNC_GAP_MS / tick,
            one_bit_ticks: (Self::ONE_BIT_MS.0.div_ceil(tick), Self::ONE_BIT_MS.1 / tick),
        }
    }
}

impl Default for PulseThresholds {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// One minute's worth of received bits plus the position of the next bit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SignalFrame {
    bits: u64,
    cursor: u8,
}

impl SignalFrame {
    pub const EMPTY: Self = Self { bits: 0, cursor: 0 };

    /// A completely received frame holding `bits` (bit `i` of the frame is bit `i` of the word).
    #[must_use]
    pub const fn from_bits(bits: u64) -> Self {
        Self {
            bits: bits & FRAME_MASK,
            cursor: LAST_BIT,
        }
    }

    /// Encode a time the way a transmitter would, markers and parity included.
    ///
    /// Seconds are not transmitted.
    #[must_use]
    #[expect(
        clippy::arithmetic_side_effects,
        clippy::integer_division_remainder_used,
        reason = "Calendar fields are below 100"
    )]
    pub fn from_time(time: &TimeValue) -> Self {
        let mut bits: u64 = 1 << START_OF_TIME;
        for (field, value) in [
            (MINUTE_UNITS, time.minutes % 10),
            (MINUTE_TENS, time.minutes / 10),
            (HOUR_UNITS, time.hours % 10),
            (HOUR_TENS, time.hours / 10),
            (DAY_UNITS, time.day % 10),
            (DAY_TENS, time.day / 10),
            (DAY_OF_WEEK, time.day_of_week),
            (MONTH_UNITS, time.month % 10),
            (MONTH_TENS, time.month / 10),
            (YEAR_UNITS, time.year % 10),
            (YEAR_TENS, time.year / 10),
        ] {
            bits |= (u64::from(value) & width_mask(field.1)) << field.0;
        }
        for (from, parity) in [
            (MINUTE_UNITS.0, MINUTE_PARITY),
            (HOUR_UNITS.0, HOUR_PARITY),
            (DAY_UNITS.0, DATE_PARITY),
        ] {
            if (bits & range_mask(from, parity)).count_ones() % 2 == 1 {
                bits |= 1 << parity;
            }
        }
        Self::from_bits(bits)
    }

    #[must_use]
    pub const fn bits(&self) -> u64 {
        self.bits
    }

    /// Index of the bit the next pulse fills.
    #[must_use]
    pub const fn cursor(&self) -> u8 {
        self.cursor
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.bits == 0 && self.cursor == 0
    }

    #[must_use]
    pub const fn bit(&self, index: u8) -> bool {
        index <= LAST_BIT && (self.bits >> index) & 1 == 1
    }

    /// Check the markers and the three even-parity groups, then decode.
    ///
    /// Returns `None` for a frame that fails any check or that carries an impossible date.
    #[must_use]
    #[expect(
        clippy::arithmetic_side_effects,
        reason = "BCD digits are at most 15, tens at most 15, so the sums fit in u8"
    )]
    pub fn decode(&self) -> Option<TimeValue> {
        let framed = !self.bit(START_OF_MINUTE) && self.bit(START_OF_TIME);
        let parity_ok = self.parity_ok(MINUTE_UNITS.0, MINUTE_PARITY)
            && self.parity_ok(HOUR_UNITS.0, HOUR_PARITY)
            && self.parity_ok(DAY_UNITS.0, DATE_PARITY);
        if !(framed && parity_ok) {
            return None;
        }
        let bcd = |units: (u8, u8), tens: (u8, u8)| self.field(tens) * 10 + self.field(units);
        let time = TimeValue {
            seconds: 0,
            minutes: bcd(MINUTE_UNITS, MINUTE_TENS),
            hours: bcd(HOUR_UNITS, HOUR_TENS),
            day: bcd(DAY_UNITS, DAY_TENS),
            month: bcd(MONTH_UNITS, MONTH_TENS),
            year: bcd(YEAR_UNITS, YEAR_TENS),
            day_of_week: self.field(DAY_OF_WEEK),
        };
        time.is_valid().then_some(time)
    }

    /// Even parity over `from..parity`, checked against the bit at `parity`.
    fn parity_ok(&self, from: u8, parity: u8) -> bool {
        let ones = (self.bits & range_mask(from, parity)).count_ones();
        (ones & 1 == 1) == self.bit(parity)
    }

    #[expect(clippy::cast_possible_truncation, reason = "Fields are at most 4 bits wide")]
    const fn field(&self, (from, width): (u8, u8)) -> u8 {
        ((self.bits >> from) & width_mask(width)) as u8
    }

    fn set_current(&mut self) {
        self.bits |= 1 << self.cursor;
    }

    #[expect(clippy::arithmetic_side_effects, reason = "Cursor stays below LAST_BIT here")]
    fn advance(&mut self) {
        self.cursor += 1;
    }

    fn clear(&mut self) {
        *self = Self::EMPTY;
    }
}

#[expect(clippy::arithmetic_side_effects, reason = "Widths are at most 58")]
const fn width_mask(width: u8) -> u64 {
    (1 << width) - 1
}

#[expect(clippy::arithmetic_side_effects, reason = "from < to <= LAST_BIT")]
const fn range_mask(from: u8, to: u8) -> u64 {
    width_mask(to - from) << from
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum DecoderState {
    /// Input low for `ticks` samples after the first low one.
    Low { ticks: u16 },
    /// Input high for `ticks` samples after the first high one.
    High { ticks: u16 },
}

#[inline]
const fn inr(x: u16, r: (u16, u16)) -> bool {
    x >= r.0 && x <= r.1
}

/// Turns a stream of input samples into decoded minute frames.
#[derive(Clone, Debug)]
pub struct Dcf77Decoder {
    thresholds: PulseThresholds,
    state: DecoderState,
    frame: SignalFrame,
}

impl Default for Dcf77Decoder {
    fn default() -> Self {
        Self::new(PulseThresholds::DEFAULT)
    }
}

impl Dcf77Decoder {
    #[must_use]
    pub const fn new(thresholds: PulseThresholds) -> Self {
        Self {
            thresholds,
            state: DecoderState::Low { ticks: 0 },
            frame: SignalFrame::EMPTY,
        }
    }

    /// The frame collected so far.
    #[must_use]
    pub const fn frame(&self) -> &SignalFrame {
        &self.frame
    }

    /// Feed one sample of the receiver output.
    ///
    /// Returns the decoded time on the falling edge that completes a valid frame. Invalid
    /// frames are dropped silently; either way the next frame starts from bit 0.
    pub fn track(&mut self, level_high: bool) -> Option<TimeValue> {
        match (self.state, level_high) {
            (DecoderState::High { ticks }, true) => {
                self.state = DecoderState::High {
                    ticks: ticks.saturating_add(1),
                };
                None
            }
            (DecoderState::Low { ticks }, false) => {
                self.state = DecoderState::Low {
                    ticks: ticks.saturating_add(1),
                };
                None
            }
            (DecoderState::Low { ticks }, true) => {
                if ticks > self.thresholds.sync_gap_ticks {
                    self.frame.clear();
                }
                self.state = DecoderState::High { ticks: 0 };
                None
            }
            (DecoderState::High { ticks }, false) => {
                self.state = DecoderState::Low { ticks: 0 };
                self.end_of_pulse(ticks)
            }
        }
    }

    fn end_of_pulse(&mut self, high_ticks: u16) -> Option<TimeValue> {
        if inr(high_ticks, self.thresholds.one_bit_ticks) {
            self.frame.set_current();
        }
        if self.frame.cursor() < LAST_BIT {
            self.frame.advance();
            return None;
        }
        let decoded = self.frame.decode();
        self.frame.clear();
        decoded
    }
}
