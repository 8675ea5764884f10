//! Host-side stand-ins for the panel, Wi-Fi link, time service, delay and
//! uptime counter.

#![allow(dead_code)]

use std::cell::Cell;
use std::rc::Rc;

use embedded_hal_async::delay::DelayNs;
use epaper_launcher::{
    Colour, DateTime, DisplaySurface, Error, PanelDriver, TimeFetchError, TimeSource, Uptime,
    WifiLink,
};

pub const WIDTH: u16 = 128;
pub const HEIGHT: u16 = 296;

#[path = "../../src/surface/mock.rs"]
pub mod mock;

pub use mock::{Call, RecordingPanel};

pub fn surface() -> DisplaySurface<RecordingPanel, Vec<u8>> {
    mock::surface(WIDTH, HEIGHT)
}

/// Link that never associates, or associates on the first poll after
/// joining `ssid`.
pub struct ScriptedLink {
    pub reachable: Option<&'static str>,
    pub joins: Vec<String>,
    pub polls: usize,
    pub up: bool,
}

impl ScriptedLink {
    pub fn unreachable() -> Self {
        Self {
            reachable: None,
            joins: Vec::new(),
            polls: 0,
            up: false,
        }
    }

    pub fn reachable(ssid: &'static str) -> Self {
        Self {
            reachable: Some(ssid),
            ..Self::unreachable()
        }
    }
}

impl WifiLink for ScriptedLink {
    async fn join(&mut self, ssid: &str, _password: &str) {
        self.joins.push(ssid.to_string());
    }

    async fn is_connected(&mut self) -> bool {
        if let Some(last) = self.joins.last() {
            self.polls += 1;
            if self.reachable == Some(last.as_str()) {
                self.up = true;
            }
        }
        self.up
    }
}

/// Time service answering from a queue; an empty queue times out.
#[derive(Default)]
pub struct ScriptedClock {
    pub replies: Vec<Result<i64, Error>>,
    pub requests: usize,
}

impl ScriptedClock {
    pub fn answering(replies: Vec<Result<i64, Error>>) -> Self {
        Self { replies, requests: 0 }
    }
}

impl TimeSource for ScriptedClock {
    async fn fetch_current_time(&mut self, _timezone: &str) -> Result<DateTime, Error> {
        self.requests += 1;
        if self.replies.is_empty() {
            return Err(TimeFetchError::Timeout.into());
        }
        self.replies.remove(0).and_then(DateTime::from_unix_timestamp)
    }
}

/// Delay that returns immediately and counts what it was asked for.
#[derive(Default)]
pub struct CountingDelay {
    pub waits: usize,
    pub total_ms: u64,
}

impl DelayNs for CountingDelay {
    async fn delay_ns(&mut self, ns: u32) {
        self.waits += 1;
        self.total_ms += u64::from(ns / 1_000_000);
    }

    async fn delay_ms(&mut self, ms: u32) {
        self.waits += 1;
        self.total_ms += u64::from(ms);
    }
}

/// Uptime moved forward by the test.
#[derive(Clone, Default)]
pub struct ManualUptime(Rc<Cell<u64>>);

impl ManualUptime {
    pub fn advance_minutes(&self, minutes: u64) {
        self.0.set(self.0.get() + minutes * 60_000);
    }
}

impl Uptime for ManualUptime {
    fn now_ms(&self) -> u64 {
        self.0.get()
    }
}
