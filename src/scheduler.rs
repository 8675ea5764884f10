//! Periodic network/time refresh.
//!
//! One fire-cycle:
//! 1. make sure Wi-Fi is up, trying every configured network a bounded
//!    number of times;
//! 2. refresh the time from the timezone service; when that fails or is
//!    skipped, carry the last synced time forward by the uptime since;
//! 3. hand the result to the status bar and redraw it.
//!
//! Connection and time failures are logged and absorbed here; they never
//! leave the cycle.

use embedded_hal_async::delay::DelayNs;

use crate::error::Error;
use crate::panel::PanelDriver;
use crate::statusbar::StatusBar;
use crate::surface::DisplaySurface;
use crate::time::DateTime;

/// Join polls per network before moving on to the next one.
pub const NETWORK_RETRIES: u8 = 5;

/// Pause before each join poll.
pub const RETRY_BACKOFF_MS: u32 = 2_000;

/// Stored Wi-Fi network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Credential<'a> {
    pub ssid: &'a str,
    pub password: &'a str,
}

/// Bounds on a reconnect pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub attempts_per_network: u8,
    pub backoff_ms: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts_per_network: NETWORK_RETRIES,
            backoff_ms: RETRY_BACKOFF_MS,
        }
    }
}

/// Wi-Fi station interface.
#[allow(async_fn_in_trait)]
pub trait WifiLink {
    /// Start joining `ssid`. Failures are reported through [`is_connected`](Self::is_connected).
    async fn join(&mut self, ssid: &str, password: &str);

    /// Whether the station is associated and has an address.
    async fn is_connected(&mut self) -> bool;
}

/// Network time source.
#[allow(async_fn_in_trait)]
pub trait TimeSource {
    /// Current local time in `timezone`. Must return within a bounded time.
    async fn fetch_current_time(&mut self, timezone: &str) -> Result<DateTime, Error>;
}

/// Monotonic millisecond counter that keeps running while offline.
pub trait Uptime {
    fn now_ms(&self) -> u64;
}

/// What the last fire-cycle learned.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SystemState {
    pub network_connected: bool,
    /// Last synced time advanced to the end of the cycle; `None` until the
    /// first successful sync.
    pub last_synced_time: Option<DateTime>,
}

/// A synced time and the uptime at which it was received.
#[derive(Debug, Clone, Copy)]
struct SyncPoint {
    time: DateTime,
    at_ms: u64,
}

/// Try each credential in order until the link comes up.
///
/// Every network gets `policy.attempts_per_network` polls, each preceded by
/// a `policy.backoff_ms` pause, so an unreachable set of networks gives up
/// after exactly `networks * attempts_per_network` polls.
pub async fn connect<L, D>(
    link: &mut L,
    credentials: &[Credential<'_>],
    delay: &mut D,
    policy: RetryPolicy,
) -> Result<(), Error>
where
    L: WifiLink,
    D: DelayNs,
{
    for credential in credentials {
        info!("joining WiFi network: {}", credential.ssid);
        link.join(credential.ssid, credential.password).await;

        for attempt in 1..=policy.attempts_per_network {
            delay.delay_ms(policy.backoff_ms).await;
            if link.is_connected().await {
                info!("connected to {}", credential.ssid);
                return Ok(());
            }
            debug!(
                "{} not up yet (attempt {}/{})",
                credential.ssid, attempt, policy.attempts_per_network
            );
        }
        warn!("giving up on {}", credential.ssid);
    }
    Err(Error::ConnectionFailure)
}

/// Owns the network and time collaborators and the resulting [`SystemState`].
pub struct UpdateScheduler<'a, L, T, D, U> {
    link: L,
    time_source: T,
    delay: D,
    uptime: U,
    credentials: &'a [Credential<'a>],
    timezone: &'a str,
    policy: RetryPolicy,
    last_sync: Option<SyncPoint>,
    state: SystemState,
}

impl<'a, L, T, D, U> UpdateScheduler<'a, L, T, D, U>
where
    L: WifiLink,
    T: TimeSource,
    D: DelayNs,
    U: Uptime,
{
    pub fn new(
        link: L,
        time_source: T,
        delay: D,
        uptime: U,
        credentials: &'a [Credential<'a>],
        timezone: &'a str,
    ) -> Self {
        Self {
            link,
            time_source,
            delay,
            uptime,
            credentials,
            timezone,
            policy: RetryPolicy::default(),
            last_sync: None,
            state: SystemState::default(),
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn state(&self) -> SystemState {
        self.state
    }

    pub fn link(&self) -> &L {
        &self.link
    }

    pub fn time_source(&self) -> &T {
        &self.time_source
    }

    /// Steps 1 and 2 of the fire-cycle. Never fails.
    pub async fn refresh(&mut self) -> SystemState {
        self.state.network_connected = self.ensure_connected().await;

        if self.state.network_connected {
            match self.time_source.fetch_current_time(self.timezone).await {
                Ok(time) => {
                    debug!("time synced: {}:{}", time.hour(), time.minute());
                    self.last_sync = Some(SyncPoint {
                        time,
                        at_ms: self.uptime.now_ms(),
                    });
                }
                Err(e) => warn!("time refresh failed, running on from last sync: {}", e),
            }
        } else {
            debug!("offline, skipping time refresh");
        }

        let now_ms = self.uptime.now_ms();
        self.state.last_synced_time = self
            .last_sync
            .map(|sync| sync.time.advanced_by_ms(now_ms.saturating_sub(sync.at_ms)));
        self.state
    }

    /// Full fire-cycle: refresh, then update and redraw the status bar.
    pub async fn fire<P, B>(
        &mut self,
        status_bar: &mut StatusBar,
        surface: &mut DisplaySurface<P, B>,
    ) -> SystemState
    where
        P: PanelDriver,
        B: AsRef<[u8]> + AsMut<[u8]>,
    {
        let state = self.refresh().await;
        publish(&state, status_bar, surface).await;
        state
    }

    async fn ensure_connected(&mut self) -> bool {
        if self.link.is_connected().await {
            return true;
        }
        info!("WiFi down, reconnecting");
        match connect(&mut self.link, self.credentials, &mut self.delay, self.policy).await {
            Ok(()) => true,
            Err(e) => {
                warn!("{}", e);
                false
            }
        }
    }
}

/// Step 3 of the fire-cycle: push the time into the status bar and redraw it.
pub async fn publish<P, B>(
    state: &SystemState,
    status_bar: &mut StatusBar,
    surface: &mut DisplaySurface<P, B>,
) where
    P: PanelDriver,
    B: AsRef<[u8]> + AsMut<[u8]>,
{
    status_bar.set_time(state.last_synced_time);
    status_bar.redraw(surface).await;
}
