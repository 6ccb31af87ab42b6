use crate::{
    errors::ErrorKind,
    http::{body::Body, headers::Headers, query::QueryString, types::Method},
    limits::ReqLimits,
    server::source::LineSource,
};
use log::{debug, trace};
use memchr::{memchr, memmem, memrchr};
use std::fmt;

/// An immutable, fully parsed HTTP/1.x request.
///
/// Built by [`RequestParser::parse`]; nothing in it changes afterwards.
///
/// # Input data requirements
///
/// #### General designations
/// - `SP`: ASCII space (0x20)
/// - `EOL`: `"\r\n"` or `"\n"`
///
/// ## First line
///
/// Template string:
/// ```text
/// [METHOD] SP [TARGET] SP [VERSION] EOL
/// ```
///
/// Only the **first** and the **last** space delimit the three fields, so
/// the target may itself contain spaces:
/// ```text
/// GET /files/my report.pdf HTTP/1.1   // target: `/files/my report.pdf`
/// ```
///
/// A line with fewer than two spaces, or with an empty method or version,
/// is not a request: [`Incoming::NoRequest`] is returned.
///
/// - `[METHOD]`: resolved by [`Method::resolve`], unknown tokens become
///   [`Method::Unknown`]
/// - `[TARGET]`: relative URI, optionally followed by `?` and a query
///   (see [`QueryString`]). Absolute URIs, empty targets and control
///   characters fail with [`ErrorKind::InvalidTarget`]
/// - `[VERSION]`: kept verbatim, e.g. `HTTP/1.1`
///
/// ## Header
///
/// Template string:
/// ```text
/// [NAME] ": " [VALUE] EOL
/// ```
/// The line is split at the first `": "`. A line without it fails with
/// [`ErrorKind::MalformedHeaderLine`]. Folded (continuation) lines are not
/// supported.
///
/// The parser extracts semantics from two headers:
///
/// | Header           | Purpose         | Values                                                 |
/// |------------------|-----------------|--------------------------------------------------------|
/// | `Content-Length` | Body size       | Integer; absent, invalid or `<= 0` means no body       |
/// | `_method`        | Method override | Any method token, replaces the request-line method     |
///
/// ## End of headers
///
/// An empty line, or the end of the stream.
///
/// ## Body
///
/// Exactly `Content-Length` bytes, read after the empty line. The stream is
/// left positioned right after them. `Transfer-Encoding: chunked` is not
/// supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    method: Method,
    target: String,
    uri: String,
    path_segments: Vec<String>,
    query: QueryString,
    protocol: String,

    headers: Headers,
    body: Body,
}

// Public API
impl Request {
    /// Effective method, after the `_method` override.
    #[inline(always)]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Raw request target, query included.
    ///
    /// For target `/api/users/123?sort=name&debug`:
    /// ```text
    /// /api/users/123?sort=name&debug
    /// ```
    #[inline(always)]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Relative URI: the target without its query.
    ///
    /// For target `/api/users/123?sort=name&debug`:
    /// ```text
    /// /api/users/123
    /// ```
    #[inline(always)]
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Path segments of [`Request::uri`], split on `/` with empty
    /// segments removed.
    ///
    /// For target `/api//users/123/?sort=name`:
    /// ```text
    /// ["api", "users", "123"]
    /// ```
    #[inline(always)]
    pub fn path_segments(&self) -> &[String] {
        &self.path_segments
    }

    #[inline(always)]
    pub fn path_segment(&self, index: usize) -> Option<&str> {
        self.path_segments.get(index).map(String::as_str)
    }

    /// Checks if the path segments equal `pattern`.
    ///
    /// For target `/api/users/123`:
    /// - pattern `&["api", "users", "123"]`: `true`
    /// - pattern `&["api", "users"]`: `false`
    #[inline]
    pub fn matches(&self, pattern: &[&str]) -> bool {
        self.path_segments.len() == pattern.len() && self.starts_with(pattern)
    }

    /// Checks if the path segments start with `pattern`.
    ///
    /// Useful for route prefix matching.
    #[inline]
    pub fn starts_with(&self, pattern: &[&str]) -> bool {
        self.path_segments.len() >= pattern.len()
            && self
                .path_segments
                .iter()
                .zip(pattern)
                .all(|(segment, expected)| segment == expected)
    }

    #[inline(always)]
    pub fn query(&self) -> &QueryString {
        &self.query
    }

    /// Protocol version token from the request line, e.g. `HTTP/1.1`.
    #[inline(always)]
    pub fn protocol(&self) -> &str {
        &self.protocol
    }

    #[inline(always)]
    pub fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Shorthand for `self.headers().get(name)`.
    #[inline(always)]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    #[inline(always)]
    pub fn body(&self) -> &Body {
        &self.body
    }
}

/// Writes the request line and headers, ending with the empty line.
///
/// The body is not written. Parsing the output (followed by the body bytes)
/// yields an equal request.
impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}\r\n", self.method, self.target, self.protocol)?;
        for (name, value) in self.headers.iter() {
            write!(f, "{}: {}\r\n", name, value)?;
        }
        f.write_str("\r\n")
    }
}

/// Outcome of one [`RequestParser::parse`] call that is not a fault.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Incoming {
    Request(Request),
    /// The stream ended, or the first line was not a request line.
    /// The connection is idle or closed; nothing went wrong.
    NoRequest,
}

impl Incoming {
    #[inline]
    pub fn into_request(self) -> Option<Request> {
        match self {
            Incoming::Request(request) => Some(request),
            Incoming::NoRequest => None,
        }
    }

    #[inline]
    pub const fn is_no_request(&self) -> bool {
        matches!(self, Incoming::NoRequest)
    }
}

/// Reads one request per call from a [`LineSource`].
///
/// Holds only its [`ReqLimits`]; it keeps no state between calls and can
/// be called repeatedly on the same stream, one request at a time.
///
/// # Examples
/// ```
/// use reqline::{Incoming, Method, RequestParser};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let mut stream: &[u8] = b"POST /api/users?dry=1 HTTP/1.1\r\n\
///     Content-Length: 5\r\n\
///     _method: PUT\r\n\
///     \r\n\
///     hello";
///
/// let parser = RequestParser::default();
/// let request = parser.parse(&mut stream).await.unwrap().into_request().unwrap();
///
/// assert_eq!(request.method(), Method::Put);
/// assert_eq!(request.path_segments(), ["api", "users"]);
/// assert_eq!(request.query().get("dry"), Some("1"));
/// assert_eq!(request.body().as_str(), Some("hello"));
///
/// assert_eq!(parser.parse(&mut stream).await, Ok(Incoming::NoRequest));
/// # }
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestParser {
    limits: ReqLimits,
}

impl RequestParser {
    #[inline]
    pub fn new(limits: ReqLimits) -> Self {
        Self { limits }
    }

    #[inline]
    pub fn limits(&self) -> &ReqLimits {
        &self.limits
    }

    /// Parses exactly one request from `source`.
    ///
    /// On a fault nothing is returned but the error; the stream position is
    /// then unspecified and the connection should not be reused.
    pub async fn parse<S: LineSource>(&self, source: &mut S) -> Result<Incoming, ErrorKind> {
        let Some(line) = source.next_line(self.limits.line_size).await? else {
            debug!("stream ended before a request line");
            return Ok(Incoming::NoRequest);
        };

        let Some((method_token, target, protocol)) = split_request_line(&line) else {
            debug!("not a request line: {:?}", line);
            return Ok(Incoming::NoRequest);
        };
        trace!("request line: {} {} {}", method_token, target, protocol);

        let (uri, query) = match target.split_once('?') {
            Some((uri, fragment)) => (uri, QueryString::parse(fragment)),
            None => (target, QueryString::empty()),
        };
        check_relative_uri(uri)?;

        let headers = self.parse_headers(source).await?;
        let body = self.parse_body(source, &headers).await?;

        let method = Method::resolve(headers.get("_method").unwrap_or(method_token));

        let request = Request {
            method,
            target: target.to_owned(),
            uri: uri.to_owned(),
            path_segments: uri
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(str::to_owned)
                .collect(),
            query,
            protocol: protocol.to_owned(),

            headers,
            body,
        };
        debug!(
            "parsed {} {} ({} headers, {} body bytes)",
            request.method,
            request.target,
            request.headers.len(),
            request.body.len()
        );

        Ok(Incoming::Request(request))
    }
}

// Parse headers
impl RequestParser {
    async fn parse_headers<S: LineSource>(&self, source: &mut S) -> Result<Headers, ErrorKind> {
        let mut raw = Vec::new();

        while let Some(line) = source.next_line(self.limits.line_size).await? {
            if line.is_empty() {
                break;
            }

            if raw.len() >= self.limits.header_count {
                return Err(ErrorKind::TooManyHeaders);
            }

            raw.push(split_header(line)?);
        }

        Ok(raw.into_iter().collect())
    }
}

// Parse body
impl RequestParser {
    async fn parse_body<S: LineSource>(
        &self,
        source: &mut S,
        headers: &Headers,
    ) -> Result<Body, ErrorKind> {
        let length = match headers.get_int("content-length") {
            Some(length) if length > 0 => length,
            _ => return Ok(Body::Empty),
        };

        let length = usize::try_from(length)
            .ok()
            .filter(|&length| length <= self.limits.body_size)
            .ok_or(ErrorKind::BodyTooLarge)?;

        Body::read(source, length).await
    }
}

/// Splits at the first and the last space.
#[inline]
fn split_request_line(line: &str) -> Option<(&str, &str, &str)> {
    let first = memchr(b' ', line.as_bytes())?;
    let last = memrchr(b' ', line.as_bytes())?;

    if first == last {
        return None;
    }

    let method = &line[..first];
    let target = &line[first + 1..last];
    let protocol = &line[last + 1..];

    match method.is_empty() || protocol.is_empty() {
        true => None,
        false => Some((method, target, protocol)),
    }
}

#[inline]
fn split_header(mut line: String) -> Result<(String, String), ErrorKind> {
    let colon = memmem::find(line.as_bytes(), b": ").ok_or(ErrorKind::MalformedHeaderLine)?;

    let value = line.split_off(colon + 2);
    line.truncate(colon);

    Ok((line, value))
}

#[inline]
fn check_relative_uri(uri: &str) -> Result<(), ErrorKind> {
    if uri.is_empty() || uri.bytes().any(|byte| byte.is_ascii_control()) {
        return Err(ErrorKind::InvalidTarget);
    }

    // Anything that parses without a base carries a scheme
    match url::Url::parse(uri) {
        Ok(_) => Err(ErrorKind::InvalidTarget),
        Err(_) => Ok(()),
    }
}
