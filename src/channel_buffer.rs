//! Packed 12-bit grayscale data for every row, shared between the easing tick and the refresh driver.
//!
//! The driver chip takes its 16 channels as one 192-bit word, channel 15 first, two 12-bit
//! values per 3 bytes. Each 3-byte pair lives in its own atomic word, so the refresh side can
//! read a row at any time without ever seeing half of a pair update.

use portable_atomic::{AtomicU32, AtomicU64, Ordering};

use crate::gamma::MAX_DRIVE;
use crate::shared_constants::{CHANNELS, GRAYSCALE_BYTES, ROWS};

/// Channel pairs per row.
const PAIRS: usize = CHANNELS / 2;
const DRIVE_BITS: u32 = 12;

/// Destination for gamma-corrected channel values.
pub trait ChannelSink {
    /// Store a 12-bit drive value for one channel of one row. Out-of-range rows and channels are ignored.
    fn set_channel(&self, row: usize, channel: usize, value: u16);
}

/// Grayscale data for all rows plus a count of completed refresh cycles.
pub struct ChannelBuffer {
    pairs: [[AtomicU32; PAIRS]; ROWS],
    refreshes: AtomicU64,
}

impl Default for ChannelBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChannelBuffer {
    /// All channels dark.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            pairs: [const { [const { AtomicU32::new(0) }; PAIRS] }; ROWS],
            refreshes: AtomicU64::new(0),
        }
    }

    /// The 24 bytes to shift out for `row`, or all zeros for a row that does not exist.
    #[must_use]
    pub fn row_bytes(&self, row: usize) -> [u8; GRAYSCALE_BYTES] {
        let mut bytes = [0; GRAYSCALE_BYTES];
        if let Some(pairs) = self.pairs.get(row) {
            for (chunk, pair) in bytes.chunks_exact_mut(3).zip(pairs) {
                let [_, high, middle, low] = pair.load(Ordering::Acquire).to_be_bytes();
                chunk.copy_from_slice(&[high, middle, low]);
            }
        }
        bytes
    }

    /// Number of refresh cycles completed since power-up.
    #[must_use]
    pub fn refresh_count(&self) -> u64 {
        self.refreshes.load(Ordering::Relaxed)
    }

    pub(crate) fn record_refresh(&self) {
        self.refreshes.fetch_add(1, Ordering::Relaxed);
    }
}

impl ChannelSink for ChannelBuffer {
    #[expect(
        clippy::arithmetic_side_effects,
        clippy::integer_division_remainder_used,
        reason = "channel < CHANNELS is checked first"
    )]
    fn set_channel(&self, row: usize, channel: usize, value: u16) {
        if channel >= CHANNELS {
            return;
        }
        // Channel 15 is shifted out first.
        let position = CHANNELS - 1 - channel;
        let Some(pair) = self.pairs.get(row).and_then(|pairs| pairs.get(position / 2)) else {
            return;
        };
        let value = u32::from(value.min(MAX_DRIVE));
        let (shift, keep) = if position % 2 == 0 {
            (DRIVE_BITS, 0x0000_0FFF)
        } else {
            (0, 0x00FF_F000)
        };
        // Single writer: the easing tick.
        let _ = pair.fetch_update(Ordering::Release, Ordering::Relaxed, |word| {
            Some((word & keep) | (value << shift))
        });
    }
}
