use crate::{
    errors::ErrorKind,
    http::request::{Incoming, Request, RequestParser},
    limits::ConnLimits,
    server::source::LineSource,
};
use log::{debug, warn};
use std::{future::Future, io, sync::Arc};
use tokio::{
    io::{split, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader},
    time::timeout,
};

/// The request-handling collaborator.
///
/// Receives every parsed [`Request`] of a connection together with the
/// connection's write half. What gets written back is entirely up to the
/// implementor.
///
/// # Examples
///
/// ```
/// use reqline::{Handler, Request};
/// use tokio::io::{AsyncWrite, AsyncWriteExt};
///
/// struct Echo;
///
/// impl Handler for Echo {
///     async fn handle<W>(&self, request: &Request, writer: &mut W) -> std::io::Result<()>
///     where
///         W: AsyncWrite + Unpin + Send,
///     {
///         writer.write_all(request.body().as_bytes()).await
///     }
/// }
/// ```
pub trait Handler
where
    Self: Sync + Send + 'static,
{
    /// Handles one request.
    ///
    /// An `Err` closes the connection and is returned from
    /// [`Connection::run`].
    fn handle<W>(
        &self,
        request: &Request,
        writer: &mut W,
    ) -> impl Future<Output = io::Result<()>> + Send
    where
        W: AsyncWrite + Unpin + Send;
}

/// Drives a [`RequestParser`] over one connection.
///
/// Requests are parsed one after another and handed to the [`Handler`]
/// until the peer goes quiet ([`Incoming::NoRequest`]), a read takes longer
/// than [`ConnLimits::socket_read_timeout`], or
/// [`ConnLimits::max_requests_per_connection`] is reached. A parse fault is
/// answered with [`ErrorKind::as_http`] and closes the connection.
pub struct Connection<H: Handler> {
    handler: Arc<H>,
    parser: RequestParser,
    limits: ConnLimits,

    request_count: usize,
}

impl<H: Handler> Connection<H> {
    #[inline]
    pub fn new(handler: Arc<H>, parser: RequestParser, limits: ConnLimits) -> Self {
        Self {
            handler,
            parser,
            limits,

            request_count: 0,
        }
    }

    /// Number of requests handled by the last [`Connection::run`].
    #[inline]
    pub fn request_count(&self) -> usize {
        self.request_count
    }

    /// Serves `stream` until it is exhausted.
    ///
    /// Only I/O failures (including a failing handler) are returned; parse
    /// faults are reported to the peer.
    pub async fn run<T>(&mut self, stream: T) -> io::Result<()>
    where
        T: AsyncRead + AsyncWrite + Send,
    {
        let (read_half, mut write_half) = split(stream);
        let mut reader = BufReader::new(read_half);
        self.request_count = 0;

        let result = match self.impl_run(&mut reader, &mut write_half).await {
            Ok(()) => Ok(()),
            Err(ErrorKind::Io(e)) => Err(e.0),
            Err(err) => {
                warn!("closing connection after fault: {}", err);
                writer::send_error(&mut write_half, &err, &self.limits).await
            }
        };

        result?;
        write_half.shutdown().await
    }

    #[inline(always)]
    async fn impl_run<R, W>(&mut self, reader: &mut R, writer: &mut W) -> Result<(), ErrorKind>
    where
        R: LineSource,
        W: AsyncWrite + Unpin + Send,
    {
        while self.request_count < self.limits.max_requests_per_connection {
            let parsed = timeout(self.limits.socket_read_timeout, self.parser.parse(reader)).await;

            let request = match parsed {
                Err(_) => {
                    debug!("read timeout, closing connection");
                    break;
                }
                Ok(parsed) => match parsed? {
                    Incoming::Request(request) => request,
                    Incoming::NoRequest => break,
                },
            };

            self.handler.handle(&request, writer).await?;
            self.request_count += 1;
        }

        Ok(())
    }
}

pub(crate) mod writer {
    use crate::{errors::ErrorKind, limits::ConnLimits};
    use std::io;
    use tokio::{
        io::{AsyncWrite, AsyncWriteExt},
        time::timeout,
    };

    #[inline(always)]
    pub(crate) async fn send_error<W: AsyncWrite + Unpin>(
        stream: &mut W,
        error: &ErrorKind,
        limits: &ConnLimits,
    ) -> Result<(), io::Error> {
        let response = error.as_http(limits.json_errors);
        timeout(limits.socket_write_timeout, stream.write_all(response)).await?
    }
}
