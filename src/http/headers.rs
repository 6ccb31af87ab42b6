//! Case-insensitive, insertion-ordered header collection.

use indexmap::IndexMap;
use std::{
    fmt,
    str::FromStr,
    sync::{Arc, OnceLock},
};

/// An immutable, case-insensitive mapping from header name to value.
///
/// # Lookup
///
/// Names are compared ASCII case-insensitively, independent of locale:
/// `Content-Length`, `content-length` and `CONTENT-LENGTH` are the same key.
/// A missing name is `None`, never a fault.
///
/// # Duplicates
///
/// Built from an ordered sequence of `(name, value)` pairs with
/// **last write wins**: a later pair replaces both the value and the stored
/// spelling of an earlier pair with an equal name. The entry keeps the
/// position of the first occurrence.
///
/// ```
/// use reqline::Headers;
///
/// let headers: Headers = [("Accept", "text/html"), ("ACCEPT", "*/*")]
///     .into_iter()
///     .collect();
///
/// assert_eq!(headers.len(), 1);
/// assert_eq!(headers.get("accept"), Some("*/*"));
/// assert_eq!(headers.iter().next(), Some(("ACCEPT", "*/*")));
/// ```
///
/// # Sharing
///
/// The storage is reference counted and never mutated after construction,
/// so clones are cheap. Every empty collection is the shared
/// [`Headers::empty`] value.
#[derive(Clone)]
pub struct Headers {
    // Keyed by the ASCII-lowercased name
    entries: Arc<IndexMap<String, Header>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Header {
    name: String,
    value: String,
}

static EMPTY: OnceLock<Headers> = OnceLock::new();

impl Headers {
    /// The shared empty collection.
    pub fn empty() -> Self {
        EMPTY
            .get_or_init(|| Headers {
                entries: Arc::new(IndexMap::new()),
            })
            .clone()
    }

    /// Returns `true` when `self` is the shared empty collection.
    pub fn is_shared_empty(&self) -> bool {
        EMPTY
            .get()
            .is_some_and(|empty| Arc::ptr_eq(&empty.entries, &self.entries))
    }

    /// Returns the value stored under `name`.
    #[inline]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .get(&name.to_ascii_lowercase())
            .map(|h| h.value.as_str())
    }

    /// Returns the value stored under `name` as an integer.
    ///
    /// `None` when the name is absent or the value (surrounding whitespace
    /// ignored) is not a valid `i64`.
    #[inline]
    pub fn get_int(&self, name: &str) -> Option<i64> {
        self.get_parsed(name)
    }

    /// Returns the value stored under `name` parsed as `T`.
    pub fn get_parsed<T: FromStr>(&self, name: &str) -> Option<T> {
        self.get(name)?.trim().parse().ok()
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_ascii_lowercase())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates `(name, value)` pairs in first-insertion order, with the
    /// spelling of the last write.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries
            .values()
            .map(|h| (h.name.as_str(), h.value.as_str()))
    }
}

impl Default for Headers {
    fn default() -> Self {
        Headers::empty()
    }
}

impl<N, V> FromIterator<(N, V)> for Headers
where
    N: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (N, V)>>(iter: I) -> Self {
        let mut entries = IndexMap::new();

        for (name, value) in iter {
            let name: String = name.into();
            let header = Header {
                value: value.into(),
                name,
            };
            entries.insert(header.name.to_ascii_lowercase(), header);
        }

        match entries.is_empty() {
            true => Headers::empty(),
            false => Headers {
                entries: Arc::new(entries),
            },
        }
    }
}

/// Equal when both hold the same names (case-insensitively) with the same
/// values, regardless of order.
impl PartialEq for Headers {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .all(|(key, h)| other.entries.get(key).is_some_and(|o| o.value == h.value))
    }
}

impl Eq for Headers {}

impl fmt::Debug for Headers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(pairs: &[(&str, &str)]) -> Headers {
        pairs.iter().copied().collect()
    }

    #[test]
    fn case_insensitive_lookup() {
        let headers = build(&[("Content-Length", "5"), ("Host", "example.com")]);

        for name in ["Content-Length", "content-length", "CONTENT-LENGTH", "cOnTeNt-LeNgTh"] {
            assert_eq!(headers.get(name), Some("5"));
            assert_eq!(headers.get_int(name), Some(5));
            assert!(headers.contains(name));
        }
        assert_eq!(headers.get("HOST"), Some("example.com"));
        assert_eq!(headers.get("missing"), None);
        assert_eq!(headers.get_int("missing"), None);
    }

    #[test]
    fn last_write_wins() {
        let headers = build(&[("X-A", "1"), ("x-b", "2"), ("x-a", "3")]);

        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("X-A"), Some("3"));
        assert_eq!(
            headers.iter().collect::<Vec<_>>(),
            vec![("x-a", "3"), ("x-b", "2")]
        );
    }

    #[test]
    fn integer_values() {
        #[rustfmt::skip]
        let cases = [
            ("42",    Some(42)),
            (" 42 ",  Some(42)),
            ("-7",    Some(-7)),
            ("+7",    Some(7)),
            ("0",     Some(0)),
            ("",      None),
            ("4 2",   None),
            ("abc",   None),
            ("1.5",   None),
            ("99999999999999999999", None),
        ];

        for (value, expected) in cases {
            let headers = build(&[("n", value)]);
            assert_eq!(headers.get_int("N"), expected, "{value:?}");
        }
    }

    #[test]
    fn parsed_values() {
        let headers = build(&[("Max-Forwards", "10"), ("Flag", "true")]);

        assert_eq!(headers.get_parsed::<u8>("max-forwards"), Some(10));
        assert_eq!(headers.get_parsed::<bool>("flag"), Some(true));
        assert_eq!(headers.get_parsed::<u8>("flag"), None);
    }

    #[test]
    fn empty_is_shared() {
        let a = Headers::empty();
        let b = build(&[]);
        let c = Headers::default();

        assert!(a.is_shared_empty());
        assert!(b.is_shared_empty());
        assert!(c.is_shared_empty());
        assert!(!build(&[("a", "b")]).is_shared_empty());
        assert!(a.is_empty());
        assert_eq!(a, b);
    }

    #[test]
    fn equality_ignores_order_and_case() {
        let a = build(&[("Host", "x"), ("Accept", "*/*")]);
        let b = build(&[("accept", "*/*"), ("HOST", "x")]);
        let c = build(&[("accept", "*/*"), ("HOST", "y")]);

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_ne!(a, build(&[("Host", "x")]));
    }

    #[test]
    fn debug_lists_pairs() {
        let headers = build(&[("Host", "x")]);
        assert_eq!(format!("{headers:?}"), r#"{"Host": "x"}"#);
    }
}
