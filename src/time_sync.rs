//! A device abstraction for Network Time Protocol (NTP) time synchronization over Wi-Fi.
//!
//! The task fetches time as soon as the network is up, retrying with backoff until the first
//! success, then re-syncs every hour.

#![allow(clippy::future_not_send, reason = "single-threaded")]

use core::convert::Infallible;

use defmt::{Display2Format, info, warn};
use embassy_executor::Spawner;
use embassy_net::{Stack, dns, udp};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embassy_time::{Duration, Timer};

use crate::unix_seconds::UnixSeconds;
use crate::wifi::Wifi;
use crate::{Error, Result};

const NTP_SERVER: &str = "pool.ntp.org";
const NTP_PORT: u16 = 123;
const NTP_PACKET_LEN: usize = 48;
/// Offset of the transmit timestamp's seconds field in a reply.
const TRANSMIT_SECONDS: usize = 40;

const RESYNC_SECS: u64 = 3600;
const RETRY_SECS: u64 = 300;

/// Outcome of one sync attempt.
#[derive(Clone, Copy)]
pub enum TimeSyncEvent {
    Success { unix_seconds: UnixSeconds },
    Failed(&'static str),
}

type TimeSyncEvents = Signal<CriticalSectionRawMutex, TimeSyncEvent>;

/// Resources needed by [`TimeSync`].
pub struct TimeSyncStatic {
    events: TimeSyncEvents,
}

/// Handle to the running NTP sync task.
#[derive(Clone, Copy)]
pub struct TimeSync {
    events: &'static TimeSyncEvents,
}

impl TimeSync {
    /// Create [`TimeSync`] resources.
    #[must_use]
    pub const fn new_static() -> TimeSyncStatic {
        TimeSyncStatic {
            events: Signal::new(),
        }
    }

    /// Spawn the sync task. It starts once `wifi` has a network stack.
    ///
    /// # Errors
    ///
    /// Returns an error if the task cannot be spawned.
    pub fn new(
        time_sync_static: &'static TimeSyncStatic,
        wifi: Wifi,
        spawner: Spawner,
    ) -> Result<Self> {
        spawner.spawn(time_sync_device_loop(wifi, &time_sync_static.events)?);
        Ok(Self {
            events: &time_sync_static.events,
        })
    }

    /// Wait for the next [`TimeSyncEvent`].
    pub async fn wait(&self) -> TimeSyncEvent {
        self.events.wait().await
    }
}

#[embassy_executor::task]
async fn time_sync_device_loop(wifi: Wifi, sync_events: &'static TimeSyncEvents) -> ! {
    let Err(err) = inner_time_sync_device_loop(wifi, sync_events).await;
    core::panic!("{err}");
}

async fn inner_time_sync_device_loop(
    wifi: Wifi,
    sync_events: &'static TimeSyncEvents,
) -> Result<Infallible> {
    let stack = wifi.stack().await;
    info!("TimeSync device started");

    let mut attempt: u32 = 0;
    let mut synced = false;
    loop {
        attempt = attempt.saturating_add(1);
        let wait_secs = match fetch_ntp_time(stack).await {
            Ok(unix_seconds) => {
                info!("Sync successful: unix_seconds={}", unix_seconds.as_i64());
                sync_events.signal(TimeSyncEvent::Success { unix_seconds });
                synced = true;
                attempt = 0;
                RESYNC_SECS
            }
            Err(err) => {
                warn!("Sync attempt {} failed: {}", attempt, Display2Format(&err));
                if let Error::Ntp(message) = err {
                    sync_events.signal(TimeSyncEvent::Failed(message));
                }
                retry_delay_secs(synced, attempt)
            }
        };
        Timer::after_secs(wait_secs).await;
    }
}

/// 10 s, 30 s, 60 s, then every 5 minutes until the first success; every 5 minutes afterwards.
const fn retry_delay_secs(synced: bool, attempt: u32) -> u64 {
    match (synced, attempt) {
        (false, 1) => 10,
        (false, 2) => 30,
        (false, 3) => 60,
        _ => RETRY_SECS,
    }
}

async fn fetch_ntp_time(stack: &Stack<'static>) -> Result<UnixSeconds> {
    info!("Resolving NTP host {}...", NTP_SERVER);
    let addresses = stack
        .dns_query(NTP_SERVER, dns::DnsQueryType::A)
        .await
        .map_err(|err| {
            warn!("DNS lookup failed: {:?}", err);
            Error::Ntp("DNS lookup failed")
        })?;
    let server = *addresses.first().ok_or(Error::Ntp("No DNS results"))?;

    let mut rx_meta = [udp::PacketMetadata::EMPTY; 1];
    let mut rx_buffer = [0; 128];
    let mut tx_meta = [udp::PacketMetadata::EMPTY; 1];
    let mut tx_buffer = [0; 128];
    let mut socket = udp::UdpSocket::new(
        *stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );
    socket
        .bind(0)
        .map_err(|_| Error::Ntp("Socket bind failed"))?;

    // LI=0, VN=3, Mode=3 (client)
    let mut request = [0_u8; NTP_PACKET_LEN];
    if let Some(first) = request.first_mut() {
        *first = 0x1B;
    }
    socket
        .send_to(&request, (server, NTP_PORT))
        .await
        .map_err(|_| Error::Ntp("NTP send failed"))?;

    let mut response = [0_u8; NTP_PACKET_LEN];
    let (len, _from) =
        embassy_time::with_timeout(Duration::from_secs(5), socket.recv_from(&mut response))
            .await
            .map_err(|_| Error::Ntp("NTP receive timeout"))?
            .map_err(|_| Error::Ntp("NTP receive failed"))?;
    if len < NTP_PACKET_LEN {
        return Err(Error::Ntp("NTP response too short"));
    }

    let seconds = response
        .get(TRANSMIT_SECONDS..TRANSMIT_SECONDS + 4)
        .and_then(|bytes| <[u8; 4]>::try_from(bytes).ok())
        .ok_or(Error::Ntp("NTP response too short"))?;
    UnixSeconds::from_ntp_seconds(u32::from_be_bytes(seconds))
        .ok_or(Error::Ntp("Invalid NTP timestamp"))
}
