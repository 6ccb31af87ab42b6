use std::{error, fmt, io};

/// Faults raised while parsing a request.
///
/// A closed or idle connection is not a fault: it is reported as
/// [`Incoming::NoRequest`](crate::Incoming::NoRequest). Every variant here
/// means no [`Request`](crate::Request) was produced.
#[derive(Debug, PartialEq)]
pub enum ErrorKind {
    /// The request target is not a valid relative URI.
    InvalidTarget,
    /// The request line or a header line is not valid UTF-8.
    InvalidEncoding,
    /// A line exceeded [`ReqLimits::line_size`](crate::limits::ReqLimits::line_size).
    LineTooLong,

    /// A header line lacks the `": "` separator.
    MalformedHeaderLine,
    /// More header lines than [`ReqLimits::header_count`](crate::limits::ReqLimits::header_count).
    TooManyHeaders,

    /// The declared `Content-Length` exceeds
    /// [`ReqLimits::body_size`](crate::limits::ReqLimits::body_size).
    BodyTooLarge,
    /// The stream ended before the declared body was read.
    TruncatedBody { expected: usize, available: usize },

    /// The underlying stream failed.
    Io(IoError),
}

macro_rules! http_errors {
    ($($name:ident: $status_code:expr, $len:literal => $json:literal; )*) => {
        /// Canned `HTTP/1.1` response for this fault, always with `connection: close`.
        ///
        /// With `json` set the body is a small JSON document naming the fault,
        /// otherwise the body is empty.
        pub const fn as_http(&self, json: bool) -> &'static [u8] {
            match (json, self) { $(
                (true, Self::$name { .. }) => concat!(
                    "HTTP/1.1 ", $status_code, "\r\n",
                    "connection: close\r\n",
                    "content-length: ", $len, "\r\n",
                    "content-type: application/json\r\n",
                    "\r\n",
                    $json
                ),
                (false, Self::$name { .. }) => concat!(
                    "HTTP/1.1 ", $status_code, "\r\n",
                    "connection: close\r\n",
                    "content-length: 0\r\n\r\n",
                ),
            )* }.as_bytes()
        }
    };
}

impl ErrorKind {
    http_errors! {
        InvalidTarget: "400 Bad Request", "58"
            => r#"{"error":"Invalid request target","code":"INVALID_TARGET"}"#;
        InvalidEncoding: "400 Bad Request", "54"
            => r#"{"error":"Invalid encoding","code":"INVALID_ENCODING"}"#;
        LineTooLong: "431 Request Header Fields Too Large", "48"
            => r#"{"error":"Line too long","code":"LINE_TOO_LONG"}"#;

        MalformedHeaderLine: "400 Bad Request", "59"
            => r#"{"error":"Malformed header line","code":"MALFORMED_HEADER"}"#;
        TooManyHeaders: "431 Request Header Fields Too Large", "54"
            => r#"{"error":"Too many headers","code":"TOO_MANY_HEADERS"}"#;

        BodyTooLarge: "413 Payload Too Large", "58"
            => r#"{"error":"Request body too large","code":"BODY_TOO_LARGE"}"#;
        TruncatedBody: "400 Bad Request", "58"
            => r#"{"error":"Truncated request body","code":"TRUNCATED_BODY"}"#;

        Io: "503 Service Unavailable", "48"
            => r#"{"error":"I/O error occurred","code":"IO_ERROR"}"#;
    }
}

impl error::Error for ErrorKind {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            ErrorKind::Io(err) => Some(&err.0),
            _ => None,
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::InvalidTarget => f.write_str("request target is not a valid relative URI"),
            ErrorKind::InvalidEncoding => f.write_str("request head is not valid UTF-8"),
            ErrorKind::LineTooLong => f.write_str("request line or header line too long"),
            ErrorKind::MalformedHeaderLine => f.write_str("header line lacks \": \" separator"),
            ErrorKind::TooManyHeaders => f.write_str("too many header lines"),
            ErrorKind::BodyTooLarge => f.write_str("declared body exceeds the body size limit"),
            ErrorKind::TruncatedBody {
                expected,
                available,
            } => write!(
                f,
                "stream ended after {} of {} body bytes",
                available, expected
            ),
            ErrorKind::Io(err) => write!(f, "I/O error: {}", err.0),
        }
    }
}

impl From<io::Error> for ErrorKind {
    fn from(err: io::Error) -> Self {
        ErrorKind::Io(IoError(err))
    }
}

/// [`io::Error`] compared by its [`io::ErrorKind`].
#[derive(Debug)]
pub struct IoError(pub io::Error);

impl PartialEq for IoError {
    fn eq(&self, other: &Self) -> bool {
        self.0.kind() == other.0.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::str_op;

    #[test]
    fn json_lengths_match() {
        #[rustfmt::skip]
        let cases = [
            ErrorKind::InvalidTarget,
            ErrorKind::InvalidEncoding,
            ErrorKind::LineTooLong,
            ErrorKind::MalformedHeaderLine,
            ErrorKind::TooManyHeaders,
            ErrorKind::BodyTooLarge,
            ErrorKind::TruncatedBody { expected: 5, available: 3 },
            ErrorKind::Io(IoError(io::ErrorKind::BrokenPipe.into())),
        ];

        for err in cases {
            let response = str_op(err.as_http(true));
            let (head, body) = response.split_once("\r\n\r\n").unwrap();

            let declared = head
                .lines()
                .find_map(|line| line.strip_prefix("content-length: "))
                .unwrap();
            assert_eq!(declared.parse::<usize>().unwrap(), body.len(), "{err:?}");
        }
    }

    #[test]
    fn plain_responses_have_no_body() {
        let response = str_op(ErrorKind::MalformedHeaderLine.as_http(false));

        assert!(response.starts_with("HTTP/1.1 400 Bad Request\r\n"));
        assert!(response.ends_with("content-length: 0\r\n\r\n"));
    }

    #[test]
    fn io_errors_compare_by_kind() {
        let a = ErrorKind::from(io::Error::new(io::ErrorKind::TimedOut, "a"));
        let b = ErrorKind::from(io::Error::new(io::ErrorKind::TimedOut, "b"));
        let c = ErrorKind::from(io::Error::new(io::ErrorKind::BrokenPipe, "a"));

        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
