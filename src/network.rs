//! Wi-Fi link and timezone service client for the Pico W
//! Using reqwless for proper HTTP handling (chunked encoding, etc.)

use cyw43::JoinOptions;
use defmt::*;
use embassy_net::Stack;
use embassy_net::dns::DnsSocket;
use embassy_net::tcp::client::{TcpClient, TcpClientState};
use embassy_time::{Duration, with_timeout};
use epaper_launcher::timezone::{list_time_zone_path, parse_list_time_zone};
use epaper_launcher::{DateTime, Error, TimeFetchError, TimeSource, WifiLink};
use heapless::String;
use reqwless::client::HttpClient;
use reqwless::request::Method;

use crate::config::{HTTP_TIMEOUT_SECS, JOIN_TIMEOUT_SECS};

/// Response buffer: headers plus the small JSON body
pub const RX_BUFFER_SIZE: usize = 2048;

/// Longest request URL (base URL + path + query)
const MAX_URL_LEN: usize = 256;

/// CYW43 station wrapped as a [`WifiLink`]
pub struct CywLink {
    control: cyw43::Control<'static>,
    stack: Stack<'static>,
}

impl CywLink {
    pub fn new(control: cyw43::Control<'static>, stack: Stack<'static>) -> Self {
        Self { control, stack }
    }
}

impl WifiLink for CywLink {
    async fn join(&mut self, ssid: &str, password: &str) {
        self.control
            .set_power_management(cyw43::PowerManagementMode::Performance)
            .await;

        let options = JoinOptions::new(password.as_bytes());
        match with_timeout(
            Duration::from_secs(JOIN_TIMEOUT_SECS),
            self.control.join(ssid, options),
        )
        .await
        {
            Ok(Ok(())) => info!("WiFi joined {}, waiting for DHCP...", ssid),
            Ok(Err(err)) => warn!("WiFi join failed: {:?}", err.status),
            Err(_) => warn!("WiFi join timed out after {} s", JOIN_TIMEOUT_SECS),
        }

        self.control
            .set_power_management(cyw43::PowerManagementMode::PowerSave)
            .await;
    }

    async fn is_connected(&mut self) -> bool {
        let up = self.stack.is_link_up() && self.stack.is_config_up();
        if up {
            if let Some(config) = self.stack.config_v4() {
                debug!("IP address: {}", config.address);
            }
        }
        up
    }
}

/// TimeZoneDB client over the embassy-net stack
pub struct HttpTimeSource {
    stack: Stack<'static>,
    base_url: &'static str,
    api_key: &'static str,
    rx_buffer: [u8; RX_BUFFER_SIZE],
}

impl HttpTimeSource {
    pub fn new(stack: Stack<'static>, base_url: &'static str, api_key: &'static str) -> Self {
        Self {
            stack,
            base_url,
            api_key,
            rx_buffer: [0; RX_BUFFER_SIZE],
        }
    }

    /// GET `url` and return the local epoch seconds from the body
    async fn get_timestamp(&mut self, url: &str) -> Result<i64, Error> {
        let client_state = TcpClientState::<1, 1024, 1024>::new();
        let tcp_client = TcpClient::new(self.stack, &client_state);
        let dns_client = DnsSocket::new(self.stack);
        let mut http_client = HttpClient::new(&tcp_client, &dns_client);

        let mut request = http_client
            .request(Method::GET, url)
            .await
            .map_err(|_| TimeFetchError::Http)?;

        let response = request
            .send(&mut self.rx_buffer)
            .await
            .map_err(|_| TimeFetchError::Http)?;

        info!("Response status: {}", response.status.0);
        if response.status.0 != 200 {
            error!("HTTP error: status {}", response.status.0);
            return Err(TimeFetchError::Http.into());
        }

        let body = response
            .body()
            .read_to_end()
            .await
            .map_err(|_| TimeFetchError::Http)?;
        debug!("Received {} body bytes", body.len());

        parse_list_time_zone(body)
    }
}

impl TimeSource for HttpTimeSource {
    async fn fetch_current_time(&mut self, timezone: &str) -> Result<DateTime, Error> {
        let path = list_time_zone_path(self.api_key, timezone)?;
        let mut url: String<MAX_URL_LEN> = String::new();
        url.push_str(self.base_url)
            .and_then(|_| url.push_str(&path))
            .map_err(|_| Error::BufferOverflow)?;

        info!("Requesting time for {}", timezone);
        match with_timeout(
            Duration::from_secs(HTTP_TIMEOUT_SECS),
            self.get_timestamp(&url),
        )
        .await
        {
            Ok(result) => result.and_then(DateTime::from_unix_timestamp),
            Err(_) => Err(TimeFetchError::Timeout.into()),
        }
    }
}
