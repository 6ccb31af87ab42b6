use crate::{errors::ErrorKind, server::source::LineSource};

/// Request body.
///
/// Either [`Body::Empty`] when no positive `Content-Length` was declared, or
/// exactly the declared number of bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Body {
    #[default]
    Empty,
    Fixed(Box<[u8]>),
}

impl Body {
    /// Consumes exactly `length` bytes from `source`.
    ///
    /// A zero `length` reads nothing and yields [`Body::Empty`]. If the
    /// stream ends early the result is [`ErrorKind::TruncatedBody`].
    pub async fn read<S: LineSource>(source: &mut S, length: usize) -> Result<Self, ErrorKind> {
        if length == 0 {
            return Ok(Body::Empty);
        }

        let bytes = source.read_body(length).await?;
        Ok(Body::Fixed(bytes.into_boxed_slice()))
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Body::Empty => &[],
            Body::Fixed(bytes) => &bytes[..],
        }
    }

    /// The body as `&str`, if it is valid UTF-8.
    #[inline]
    pub fn as_str(&self) -> Option<&str> {
        simdutf8::basic::from_utf8(self.as_bytes()).ok()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.as_bytes().len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.as_bytes().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn zero_length_reads_nothing() {
        let mut src: &[u8] = b"rest";

        assert_eq!(Body::read(&mut src, 0).await, Ok(Body::Empty));
        assert_eq!(src, b"rest");
    }

    #[tokio::test]
    async fn exact_length() {
        let mut src: &[u8] = b"{\"a\":1}GET / HTTP/1.1";
        let body = Body::read(&mut src, 7).await.unwrap();

        assert_eq!(body.as_str(), Some("{\"a\":1}"));
        assert_eq!(body.len(), 7);
        assert!(!body.is_empty());
        assert_eq!(src, b"GET / HTTP/1.1");
    }

    #[tokio::test]
    async fn truncated() {
        let mut src: &[u8] = b"abc";

        assert_eq!(
            Body::read(&mut src, 5).await,
            Err(ErrorKind::TruncatedBody {
                expected: 5,
                available: 3
            })
        );
    }

    #[test]
    fn accessors() {
        assert_eq!(Body::Empty.as_bytes(), b"");
        assert_eq!(Body::Empty.as_str(), Some(""));
        assert!(Body::default().is_empty());

        let binary = Body::Fixed(vec![0xFF, 0x00].into_boxed_slice());
        assert_eq!(binary.as_str(), None);
        assert_eq!(binary.len(), 2);
    }
}
