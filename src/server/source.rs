use crate::errors::ErrorKind;
use memchr::memchr;
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

/// A sequential, line-delimited reader over one connection's bytes.
///
/// Implemented for every [`AsyncBufRead`], so a
/// `tokio::io::BufReader<TcpStream>` or a plain `&[u8]` can be handed to
/// [`RequestParser::parse`](crate::RequestParser::parse) directly.
/// Deadlines are the implementor's business; the parser never times out.
pub trait LineSource {
    /// Reads one logical line, without its `\n` or `\r\n` terminator.
    ///
    /// Returns `Ok(None)` at end of stream. A final line without terminator
    /// is returned as is. A line longer than `limit` bytes (terminator
    /// included) fails with [`ErrorKind::LineTooLong`], a line that is not
    /// UTF-8 with [`ErrorKind::InvalidEncoding`].
    fn next_line(
        &mut self,
        limit: usize,
    ) -> impl Future<Output = Result<Option<String>, ErrorKind>> + Send;

    /// Reads exactly `len` bytes.
    ///
    /// Fails with [`ErrorKind::TruncatedBody`] when the stream ends first.
    /// Nothing past `len` is consumed.
    fn read_body(&mut self, len: usize) -> impl Future<Output = Result<Vec<u8>, ErrorKind>> + Send;
}

impl<R> LineSource for R
where
    R: AsyncBufRead + Unpin + Send,
{
    async fn next_line(&mut self, limit: usize) -> Result<Option<String>, ErrorKind> {
        let mut line = Vec::new();

        loop {
            let available = self.fill_buf().await?;

            if available.is_empty() {
                if line.is_empty() {
                    return Ok(None);
                }
                break;
            }

            match memchr(b'\n', available) {
                Some(pos) => {
                    if line.len() + pos + 1 > limit {
                        return Err(ErrorKind::LineTooLong);
                    }

                    line.extend_from_slice(&available[..pos]);
                    self.consume(pos + 1);
                    break;
                }
                None => {
                    let len = available.len();
                    // No room left for the terminator
                    if line.len() + len >= limit {
                        return Err(ErrorKind::LineTooLong);
                    }

                    line.extend_from_slice(available);
                    self.consume(len);
                }
            }
        }

        if line.last() == Some(&b'\r') {
            line.pop();
        }

        simdutf8::basic::from_utf8(&line).map_err(|_| ErrorKind::InvalidEncoding)?;
        // SAFETY: validated by `simdutf8` right above.
        Ok(Some(unsafe { String::from_utf8_unchecked(line) }))
    }

    async fn read_body(&mut self, len: usize) -> Result<Vec<u8>, ErrorKind> {
        let mut body = Vec::with_capacity(len);

        while body.len() < len {
            let available = self.fill_buf().await?;

            if available.is_empty() {
                return Err(ErrorKind::TruncatedBody {
                    expected: len,
                    available: body.len(),
                });
            }

            let take = available.len().min(len - body.len());
            body.extend_from_slice(&available[..take]);
            self.consume(take);
        }

        Ok(body)
    }
}
