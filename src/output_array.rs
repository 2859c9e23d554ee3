use embedded_hal::digital::{OutputPin, PinState};

use crate::{Error, Result};

/// A fixed set of output pins addressed by index.
pub struct OutputArray<P, const N: usize>([P; N]);

impl<P: OutputPin, const N: usize> OutputArray<P, N> {
    #[must_use]
    pub const fn new(outputs: [P; N]) -> Self {
        Self(outputs)
    }

    /// Drive the pin at `index`. Indexes past the end are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::CannotSetOutputState`] if the pin refuses the new level.
    #[inline]
    pub fn set_state_at(&mut self, index: usize, state: PinState) -> Result<()> {
        match self.0.get_mut(index) {
            Some(output) => output
                .set_state(state)
                .map_err(|_| Error::CannotSetOutputState),
            None => Ok(()),
        }
    }
}
