//! Per-pixel brightness fading.

use crate::channel_buffer::ChannelSink;
use crate::gamma::gamma;
use crate::phrases::Pattern;
use crate::shared_constants::{COLUMNS, MINIMUM_BRIGHTNESS, ROWS};

/// Current linear level (0–255) of every letter on the face.
///
/// Each [`step`](Self::step) moves every pixel one level toward its target, so a phrase change
/// fades over at most 255 ticks instead of snapping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid([[u8; COLUMNS]; ROWS]);

impl Default for PixelGrid {
    fn default() -> Self {
        Self::new()
    }
}

impl PixelGrid {
    /// All pixels dark.
    #[must_use]
    pub const fn new() -> Self {
        Self([[MINIMUM_BRIGHTNESS; COLUMNS]; ROWS])
    }

    #[must_use]
    pub fn level(&self, row: usize, column: usize) -> Option<u8> {
        self.0.get(row)?.get(column).copied()
    }

    /// Advance every pixel one level toward `ceiling` (lit) or dark (unlit) and write the
    /// gamma-corrected value of each pixel that changed to `sink`.
    pub fn step(&mut self, pattern: &Pattern, ceiling: u8, sink: &impl ChannelSink) {
        for (row, levels) in self.0.iter_mut().enumerate() {
            for (column, current) in levels.iter_mut().enumerate() {
                let target = target_level(pattern, row, column, ceiling);
                let next = match (*current).cmp(&target) {
                    core::cmp::Ordering::Less => current.saturating_add(1),
                    core::cmp::Ordering::Greater => current.saturating_sub(1),
                    core::cmp::Ordering::Equal => continue,
                };
                *current = next;
                sink.set_channel(row, column, gamma(next));
            }
        }
    }

    /// Whether every pixel has reached its target for `pattern` at `ceiling`.
    #[must_use]
    pub fn is_settled(&self, pattern: &Pattern, ceiling: u8) -> bool {
        self.0.iter().enumerate().all(|(row, levels)| {
            levels
                .iter()
                .enumerate()
                .all(|(column, &level)| level == target_level(pattern, row, column, ceiling))
        })
    }
}

fn target_level(pattern: &Pattern, row: usize, column: usize, ceiling: u8) -> u8 {
    if pattern.is_lit(row, column) {
        ceiling
    } else {
        MINIMUM_BRIGHTNESS
    }
}
