use derive_more::derive::{Display, Error};

/// A specialized `Result` where the error is this crate's `Error` type.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Define a unified error type for this crate.
#[derive(Debug, Display, Error)]
pub enum Error {
    // `#[error(not(source))]` below tells `derive_more` that `embassy_executor::SpawnError` does
    // not implement Rust's `core::error::Error` trait.
    #[cfg(target_os = "none")]
    #[display("{_0:?}")]
    TaskSpawn(#[error(not(source))] embassy_executor::SpawnError),

    #[display("I2C bus error: {_0:?}")]
    I2c(#[error(not(source))] embedded_hal_async::i2c::ErrorKind),

    #[display("SPI bus error: {_0:?}")]
    Spi(#[error(not(source))] embedded_hal::spi::ErrorKind),

    #[display("UART error: {_0:?}")]
    Uart(#[error(not(source))] embedded_io_async::ErrorKind),

    #[display("Error setting output state")]
    CannotSetOutputState,

    #[display("Real-time clock returned an invalid time ({field} = {value})")]
    InvalidRtcTime { field: &'static str, value: u8 },

    #[display("Network Time Protocol (NTP) sync failed: {_0}")]
    Ntp(#[error(not(source))] &'static str),
}

#[cfg(target_os = "none")]
impl From<embassy_executor::SpawnError> for Error {
    fn from(err: embassy_executor::SpawnError) -> Self {
        Self::TaskSpawn(err)
    }
}
