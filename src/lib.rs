//! reqline - line-oriented HTTP/1.x request parser
//!
//! Turns the text of one request (request line, headers, optional body),
//! read from any [`tokio::io::AsyncBufRead`], into an immutable [`Request`]
//! for a server's dispatch layer.
//!
//! # Features
//!
//! - **Lenient request line** - only the first and last space delimit
//!   method, target and version, so targets may contain spaces
//! - **Case-insensitive headers** - [`Headers`] lookups ignore ASCII case,
//!   duplicates follow a documented last-write-wins rule
//! - **Method override** - a `_method` header replaces the request-line verb
//! - **Exact bodies** - exactly `Content-Length` bytes are consumed, never
//!   more, so the next request can be parsed from the same stream
//! - **Explicit outcomes** - an idle or closed connection is
//!   [`Incoming::NoRequest`], distinct from every [`ErrorKind`] fault
//!
//! # Examples
//!
//! Parsing:
//! ```
//! use reqline::{Incoming, Method, RequestParser};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let mut stream: &[u8] = b"GET /api/users/42?fields=name HTTP/1.1\r\n\
//!     Host: example.com\r\n\
//!     \r\n";
//!
//! let parser = RequestParser::default();
//! match parser.parse(&mut stream).await {
//!     Ok(Incoming::Request(request)) => {
//!         assert_eq!(request.method(), Method::Get);
//!         assert_eq!(request.path_segments(), ["api", "users", "42"]);
//!         assert_eq!(request.query().get("fields"), Some("name"));
//!         assert_eq!(request.header("HOST"), Some("example.com"));
//!     }
//!     Ok(Incoming::NoRequest) => unreachable!(),
//!     Err(err) => panic!("{err}"),
//! }
//! # }
//! ```
//! Serving a connection:
//! ```no_run
//! use reqline::{limits::ConnLimits, Connection, Handler, Request, RequestParser};
//! use std::sync::Arc;
//! use tokio::{
//!     io::{AsyncWrite, AsyncWriteExt},
//!     net::TcpListener,
//! };
//!
//! struct Hello;
//!
//! impl Handler for Hello {
//!     async fn handle<W>(&self, request: &Request, writer: &mut W) -> std::io::Result<()>
//!     where
//!         W: AsyncWrite + Unpin + Send,
//!     {
//!         let body = format!("Hello, {}!", request.path_segment(0).unwrap_or("world"));
//!         let head = format!("HTTP/1.1 200 OK\r\ncontent-length: {}\r\n\r\n", body.len());
//!         writer.write_all(head.as_bytes()).await?;
//!         writer.write_all(body.as_bytes()).await
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     let handler = Arc::new(Hello);
//!
//!     loop {
//!         let (stream, _) = listener.accept().await?;
//!         let mut connection =
//!             Connection::new(handler.clone(), RequestParser::default(), ConnLimits::default());
//!
//!         tokio::spawn(async move {
//!             let _ = connection.run(stream).await;
//!         });
//!     }
//! }
//! ```

pub(crate) mod http {
    pub(crate) mod body;
    pub(crate) mod headers;
    pub(crate) mod query;
    pub(crate) mod request;
    pub(crate) mod types;
}
pub(crate) mod server {
    pub(crate) mod connection;
    pub(crate) mod source;
}
pub(crate) mod errors;
pub mod limits;

pub use crate::{
    errors::{ErrorKind, IoError},
    http::{
        body::Body,
        headers::Headers,
        query::QueryString,
        request::{Incoming, Request, RequestParser},
        types::Method,
    },
    server::{
        connection::{Connection, Handler},
        source::LineSource,
    },
};

#[cfg(test)]
pub mod tools {
    use std::str::from_utf8;

    #[inline]
    pub fn str_op(value: &[u8]) -> &str {
        from_utf8(value).unwrap()
    }
}
