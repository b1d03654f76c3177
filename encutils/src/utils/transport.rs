//! # Transport metadata
//!
//! Out-of-band information about a document, typically the `Content-Type`
//! header of an HTTP response.
//!
//! [`TransportInfo`] is the seam the encoding resolver reads from. It is
//! implemented for:
//! - [`MediaType`], when the caller already parsed the header
//! - [`Headers`], an ordered header list with case-insensitive lookups
//!
//! ## Example
//!
//! ```rust,no_run
//! use encutils::utils::{Headers, TransportInfo};
//!
//! let headers = Headers::parse("Server: x\r\ncontent-TYPE: text/HTML; charset=UTF-8\r\n");
//! assert_eq!(headers.media_type(), Some("text/html"));
//! assert_eq!(headers.charset(), Some("UTF-8"));
//! ```
use super::media_type::{MediaType, parse_header};

/// Read access to the media type and charset declared by a transport.
///
/// Values are returned as declared; the resolver lowercases the charset.
pub trait TransportInfo {
    /// The `type/subtype` part of the content type, if any.
    fn media_type(&self) -> Option<&str>;

    /// The `charset` parameter of the content type, if any.
    fn charset(&self) -> Option<&str>;
}

impl TransportInfo for MediaType {
    fn media_type(&self) -> Option<&str> {
        Some(&self.essence)
    }

    fn charset(&self) -> Option<&str> {
        self.param("charset").filter(|c| !c.is_empty())
    }
}

/// An ordered list of header fields.
///
/// Field names keep their original spelling but are matched
/// case-insensitively. When a field is repeated, lookups return the last
/// value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    fields: Vec<(String, String)>,
    content_type: Option<ContentType>,
}

/// `Content-Type` split once on insertion so lookups can borrow.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ContentType {
    media_type: Option<String>,
    charset: Option<String>,
}

impl ContentType {
    fn from_value(value: &str) -> Self {
        let (main, params) = parse_header(value);
        let media_type = Some(main.to_ascii_lowercase()).filter(|m| !m.is_empty());
        let charset = params
            .into_iter()
            .rev()
            .find(|(name, _)| name == "charset")
            .map(|(_, v)| v)
            .filter(|v| !v.is_empty());

        Self {
            media_type,
            charset,
        }
    }
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a raw header block (`Name: value` per line).
    ///
    /// Lines without a colon are ignored, and so is everything after the
    /// first empty line.
    pub fn parse(raw: &str) -> Self {
        raw.lines()
            .take_while(|line| !line.trim().is_empty())
            .filter_map(|line| line.split_once(':'))
            .map(|(name, value)| (name.trim(), value.trim()))
            .collect()
    }

    /// Appends a field.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();

        if name.eq_ignore_ascii_case("content-type") {
            self.content_type = Some(ContentType::from_value(&value));
        }
        self.fields.push((name, value));
    }

    /// Returns the last value of the field `name` (case-insensitive).
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .rev()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl TransportInfo for Headers {
    fn media_type(&self) -> Option<&str> {
        self.content_type.as_ref()?.media_type.as_deref()
    }

    fn charset(&self) -> Option<&str> {
        self.content_type.as_ref()?.charset.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_headers_case_insensitive() {
        let headers: Headers = [("CONTENT-type", "Application/RSS+XML; CHARSET=Windows-1252")]
            .into_iter()
            .collect();
        assert_eq!(headers.get("content-type"), headers.get("Content-Type"));
        assert_eq!(headers.media_type(), Some("application/rss+xml"));
        assert_eq!(headers.charset(), Some("Windows-1252"));
    }

    #[test]
    fn test_transport_headers_last_content_type_wins() {
        let mut headers = Headers::new();
        headers.insert("Content-Type", "text/plain; charset=ascii");
        headers.insert("content-type", "text/html");
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.media_type(), Some("text/html"));
        assert_eq!(headers.charset(), None);
    }

    #[test]
    fn test_transport_headers_without_content_type() {
        let headers = Headers::parse("Server: nginx\nX-Foo: bar\n");
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.media_type(), None);
        assert_eq!(headers.charset(), None);
    }

    #[test]
    fn test_transport_headers_parse_stops_at_body() {
        let headers = Headers::parse("Content-Type: text/xml\r\n\r\nContent-Type: text/html\r\n");
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.media_type(), Some("text/xml"));
    }

    #[test]
    fn test_transport_media_type_as_transport() {
        let mt = MediaType::new("text/html; charset=\"\"").unwrap();
        assert_eq!(TransportInfo::media_type(&mt), Some("text/html"));
        assert_eq!(TransportInfo::charset(&mt), None);
    }

    #[test]
    fn test_transport_empty_headers() {
        assert!(Headers::new().is_empty());
    }
}
