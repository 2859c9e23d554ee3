//! A device abstraction for the serial command console.
//!
//! The task assembles request lines from the UART, hands each one to the owner of the clock
//! state, and writes back whatever reply it gets. Requests are handled strictly one at a time.

#![allow(clippy::future_not_send, reason = "single-threaded")]

use core::convert::Infallible;

use defmt::{info, warn};
use embassy_executor::Spawner;
use embassy_rp::uart::BufferedUart;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::signal::Signal;
use embedded_io_async::{Error as _, Read, Write};
use heapless::String;

use crate::command::{ARGUMENT_CAPACITY, CommandLine, CommandParser, REPLY_CAPACITY};
use crate::{Error, Result};

type ConsoleRequests = Channel<CriticalSectionRawMutex, CommandLine, 1>;
type ConsoleReplies = Signal<CriticalSectionRawMutex, String<REPLY_CAPACITY>>;

/// Resources needed by [`Console`].
pub struct ConsoleStatic {
    requests: ConsoleRequests,
    replies: ConsoleReplies,
}

/// Handle to the running console task.
#[derive(Clone, Copy)]
pub struct Console {
    requests: &'static ConsoleRequests,
    replies: &'static ConsoleReplies,
}

impl Console {
    /// Create [`Console`] resources.
    #[must_use]
    pub const fn new_static() -> ConsoleStatic {
        ConsoleStatic {
            requests: Channel::new(),
            replies: Signal::new(),
        }
    }

    /// Spawn the console task on `uart`.
    ///
    /// # Errors
    ///
    /// Returns an error if the task cannot be spawned.
    pub fn new(
        console_static: &'static ConsoleStatic,
        uart: BufferedUart,
        spawner: Spawner,
    ) -> Result<Self> {
        spawner.spawn(serial_device_loop(uart, console_static)?);
        Ok(Self {
            requests: &console_static.requests,
            replies: &console_static.replies,
        })
    }

    /// Wait for the next request line.
    pub async fn request(&self) -> CommandLine {
        self.requests.receive().await
    }

    /// Answer the request last returned by [`request`](Self::request).
    pub fn reply(&self, text: String<REPLY_CAPACITY>) {
        self.replies.signal(text);
    }
}

#[embassy_executor::task]
async fn serial_device_loop(mut uart: BufferedUart, resources: &'static ConsoleStatic) -> ! {
    let Err(err) = inner_serial_device_loop(&mut uart, resources).await;
    core::panic!("{err}");
}

async fn inner_serial_device_loop(
    uart: &mut (impl Read + Write),
    resources: &'static ConsoleStatic,
) -> Result<Infallible> {
    info!("Console started");
    let mut parser = CommandParser::new();
    let mut received = [0_u8; 16];
    loop {
        let count = uart
            .read(&mut received)
            .await
            .map_err(|err| Error::Uart(err.kind()))?;
        for &byte in received.iter().take(count) {
            let Some(line) = parser.feed(byte) else {
                continue;
            };
            if line.overflowed {
                warn!(
                    "Console argument for command {} cut to its first {} bytes",
                    char::from(line.command),
                    ARGUMENT_CAPACITY
                );
            }
            resources.requests.send(line).await;
            let reply = resources.replies.wait().await;
            uart.write_all(reply.as_bytes())
                .await
                .map_err(|err| Error::Uart(err.kind()))?;
        }
    }
}
