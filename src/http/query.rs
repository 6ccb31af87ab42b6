//! URL query string collection.

use crate::http::headers::Headers;
use std::ops::Deref;
use url::form_urlencoded;

/// Query parameters of a request target, looked up like [`Headers`].
///
/// Built from a `key1=val1&key2=val2` fragment. Keys and values are
/// `application/x-www-form-urlencoded` decoded (`+` becomes a space,
/// `%XX` escapes are resolved). A key without `=` maps to an empty value,
/// empty segments (`&&`) are skipped, and repeated keys follow the
/// last-write-wins rule of [`Headers`]. Lookup ignores ASCII case.
///
/// # Examples
/// ```rust
/// use reqline::QueryString;
///
/// let query = QueryString::parse("?name=John%20Doe&debug&page=2");
///
/// assert_eq!(query.get("name"), Some("John Doe"));
/// assert_eq!(query.get("debug"), Some(""));
/// assert_eq!(query.get_int("page"), Some(2));
/// assert_eq!(query.get("missing"), None);
///
/// assert!(QueryString::parse("").is_shared_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString(Headers);

impl QueryString {
    /// Parses a query fragment, with or without its leading `?`.
    ///
    /// An empty fragment (or a lone `?`) yields the shared empty collection.
    pub fn parse(fragment: &str) -> Self {
        let fragment = fragment.strip_prefix('?').unwrap_or(fragment);

        match fragment.is_empty() {
            true => QueryString::empty(),
            false => QueryString(
                form_urlencoded::parse(fragment.as_bytes())
                    .into_owned()
                    .collect(),
            ),
        }
    }

    /// The shared empty collection.
    #[inline]
    pub fn empty() -> Self {
        QueryString(Headers::empty())
    }
}

impl Deref for QueryString {
    type Target = Headers;

    #[inline(always)]
    fn deref(&self) -> &Headers {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic() {
        let cases = ["a=1&b=2", "?a=1&b=2"];

        for line in cases {
            let query = QueryString::parse(line);

            assert_eq!(query.len(), 2);
            assert_eq!(query.iter().collect::<Vec<_>>(), vec![("a", "1"), ("b", "2")]);
        }
    }

    #[test]
    fn full() {
        let query = QueryString::parse("flag&empty=&=val&&key=value&very=long=value");

        assert_eq!(query.get("flag"), Some(""));
        assert_eq!(query.get("empty"), Some(""));
        assert_eq!(query.get(""), Some("val"));
        assert_eq!(query.get("key"), Some("value"));
        assert_eq!(query.get("very"), Some("long=value"));
        assert_eq!(query.len(), 5);
    }

    #[test]
    fn decoding() {
        let query = QueryString::parse("email=user%40example.com&q=a+b&k%20ey=%E2%9C%93");

        assert_eq!(query.get("email"), Some("user@example.com"));
        assert_eq!(query.get("q"), Some("a b"));
        assert_eq!(query.get("k ey"), Some("\u{2713}"));
    }

    #[test]
    fn repeated_keys() {
        let query = QueryString::parse("a=1&A=2&a=3");

        assert_eq!(query.len(), 1);
        assert_eq!(query.get("a"), Some("3"));
    }

    #[test]
    fn empty() {
        for fragment in ["", "?"] {
            assert!(QueryString::parse(fragment).is_shared_empty());
        }
        assert!(QueryString::empty().is_shared_empty());
        assert!(QueryString::default().is_shared_empty());
    }
}
