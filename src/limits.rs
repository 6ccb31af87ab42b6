//! Parser limits and connection timeouts
//!
//! # Security-First Defaults
//!
//! Default limits are intentionally conservative to prevent:
//! - Memory exhaustion through endless lines or bodies
//! - Header flooding
//! - Slowloris-style stalled connections
//!
//! # Examples
//!
//! ```
//! use reqline::{limits::ReqLimits, RequestParser};
//!
//! let parser = RequestParser::new(ReqLimits {
//!     header_count: 18,      // More headers for complex APIs
//!     body_size: 16 * 1024,  // 16KB for larger payloads
//!     ..ReqLimits::default()
//! });
//! # let _ = parser;
//! ```

use std::time::Duration;

/// Request parsing limits
///
/// Every limit is checked while reading, before the offending data is
/// buffered in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReqLimits {
    /// Maximum length of a single line, terminator included (default: `8 KiB`)
    ///
    /// Applies to the request line and to every header line. Exceeding it
    /// yields [`ErrorKind::LineTooLong`](crate::ErrorKind::LineTooLong).
    pub line_size: usize,

    /// Maximum number of header lines (default: `64`)
    ///
    /// Duplicate header names still count once per line. Exceeding it yields
    /// [`ErrorKind::TooManyHeaders`](crate::ErrorKind::TooManyHeaders).
    pub header_count: usize,

    /// Maximum declared `Content-Length` (default: `1 MiB`)
    ///
    /// Checked before any body byte is read. Exceeding it yields
    /// [`ErrorKind::BodyTooLarge`](crate::ErrorKind::BodyTooLarge).
    pub body_size: usize,

    #[doc(hidden)]
    #[allow(dead_code)]
    pub _priv: (),
}

impl Default for ReqLimits {
    #[inline(always)]
    fn default() -> Self {
        Self {
            line_size: 8 * 1024,
            header_count: 64,
            body_size: 1024 * 1024,

            _priv: (),
        }
    }
}

/// Connection-level limits and timeouts
///
/// Used by [`Connection`](crate::Connection). Default values balance resource usage
/// and responsiveness.
#[derive(Debug, Clone)]
pub struct ConnLimits {
    /// Maximum duration of a single request parse (default: `2 seconds`)
    ///
    /// Covers reading the request line, headers and body. When it elapses
    /// the connection is closed without a response.
    pub socket_read_timeout: Duration,

    /// Maximum duration to write a fault response (default: `3 seconds`)
    pub socket_write_timeout: Duration,

    /// Maximum number of requests served per connection (default: `100`)
    pub max_requests_per_connection: usize,

    /// Format for fault responses (default: `true`)
    ///
    /// See [`ErrorKind::as_http`](crate::ErrorKind::as_http).
    pub json_errors: bool,

    #[doc(hidden)]
    #[allow(dead_code)]
    pub _priv: (),
}

impl Default for ConnLimits {
    #[inline(always)]
    fn default() -> Self {
        Self {
            socket_read_timeout: Duration::from_secs(2),
            socket_write_timeout: Duration::from_secs(3),
            max_requests_per_connection: 100,
            json_errors: true,

            _priv: (),
        }
    }
}
