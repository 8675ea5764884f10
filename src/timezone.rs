//! TimeZoneDB lookup: request path construction and response parsing.
//!
//! The HTTP transfer itself lives in the firmware; this module only deals
//! with the text on either side of it.

use core::fmt::Write;

use heapless::{String, Vec};
use serde::Deserialize;

use crate::error::{Error, TimeFetchError};

/// Endpoint path of the zone listing call.
pub const LIST_TIME_ZONE_PATH: &str = "/v2.1/list-time-zone";

/// Capacity of a request path including its query string.
pub const MAX_PATH_LEN: usize = 192;

/// Append `?key=value&key=value...` to `path`, in the order given.
///
/// Keys and values are copied verbatim; nothing is percent-encoded.
pub fn build_query<const N: usize>(path: &str, params: &[(&str, &str)]) -> Result<String<N>, Error> {
    let mut out = String::new();
    out.push_str(path).map_err(|_| Error::BufferOverflow)?;
    out.push('?').map_err(|_| Error::BufferOverflow)?;
    for (i, (key, value)) in params.iter().enumerate() {
        if i > 0 {
            out.push('&').map_err(|_| Error::BufferOverflow)?;
        }
        write!(out, "{}={}", key, value).map_err(|_| Error::BufferOverflow)?;
    }
    Ok(out)
}

/// Request path for the current local time in `timezone`
/// (a zone name such as `Pacific/Auckland`).
pub fn list_time_zone_path(api_key: &str, timezone: &str) -> Result<String<MAX_PATH_LEN>, Error> {
    build_query(
        LIST_TIME_ZONE_PATH,
        &[
            ("key", api_key),
            ("format", "json"),
            ("fields", "timestamp"),
            ("zone", timezone),
        ],
    )
}

#[derive(Deserialize)]
struct Zone {
    timestamp: i64,
}

#[derive(Deserialize)]
struct ListTimeZone<'a> {
    status: &'a str,
    #[serde(default)]
    zones: Vec<Zone, 4>,
}

/// Extract `zones[0].timestamp` (local epoch seconds) from a response body.
pub fn parse_list_time_zone(body: &[u8]) -> Result<i64, Error> {
    let (response, _) = serde_json_core::from_slice::<ListTimeZone<'_>>(body)
        .map_err(|_| TimeFetchError::Malformed)?;
    if response.status != "OK" {
        return Err(TimeFetchError::Status.into());
    }
    response
        .zones
        .first()
        .map(|z| z.timestamp)
        .ok_or(TimeFetchError::Malformed.into())
}
