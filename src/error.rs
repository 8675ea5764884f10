//! Error taxonomy shared by the library and the firmware.
//!
//! All variants carry fixed-size data only, so the type stays `Copy` and
//! can be logged with defmt on target.

use core::fmt;

/// Top-level error type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Every configured network was tried and none came up.
    ConnectionFailure,

    /// The network was reachable but the time lookup did not produce a time.
    TimeFetchFailure(TimeFetchError),

    /// The app registry is missing or could not be parsed.
    AppRegistryFailure,

    /// A framebuffer backing store is smaller than `ceil(width*height/8)`.
    BufferTooSmall { required: usize, actual: usize },

    /// A fixed-capacity string or list ran out of room.
    BufferOverflow,
}

/// Why a time lookup failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimeFetchError {
    /// Request could not be built, sent or read.
    Http,
    /// The request did not finish within its bound.
    Timeout,
    /// The service answered with a status other than `OK`.
    Status,
    /// The response body was not the expected JSON shape.
    Malformed,
}

impl From<TimeFetchError> for Error {
    fn from(e: TimeFetchError) -> Self {
        Error::TimeFetchFailure(e)
    }
}

impl fmt::Display for TimeFetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeFetchError::Http => "http request failed",
            TimeFetchError::Timeout => "timed out",
            TimeFetchError::Status => "service returned non-OK status",
            TimeFetchError::Malformed => "malformed response",
        };
        f.write_str(s)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::ConnectionFailure => f.write_str("unable to connect to any available network"),
            Error::TimeFetchFailure(e) => write!(f, "current time request failed: {}", e),
            Error::AppRegistryFailure => f.write_str("app registry missing or unparsable"),
            Error::BufferTooSmall { required, actual } => {
                write!(f, "buffer too small: need {} bytes, got {}", required, actual)
            }
            Error::BufferOverflow => f.write_str("buffer overflow"),
        }
    }
}
