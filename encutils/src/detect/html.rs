//! Encoding declared by an X/HTML `<meta http-equiv="Content-Type">` element.
//!
//! Normally:
//!
//! ```text
//! <meta http-equiv="Content-Type" content="text/html; charset=iso-8859-1"/>
//! ```
//!
//! Attributes may come in any order and use either quote style. Only the
//! first matching element counts.
use std::sync::LazyLock;

use regex::bytes::Regex;

use crate::utils::parse_header;

static CONTENT_TYPE_META: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?is-u)<meta("[^"]*"|'[^']*'|[^'">])*http-equiv\s*=\s*['"]\s*Content-Type\s*['"]\s*.*?/?>"#,
    )
    .unwrap()
});

static CONTENT_ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is-u)content\s*=\s*['"]\s*(?P<value>.*?)\s*['"]"#).unwrap()
});

/// Returns `(media_type, encoding)` from the first Content-Type `<meta>`
/// element of `content`.
///
/// Both are `None` when no such element exists or it has no `content`
/// attribute. The encoding is lowercased; the media type is kept as written.
pub fn find_in_html(content: &[u8]) -> (Option<String>, Option<String>) {
    let Some(tag) = CONTENT_TYPE_META.find(content) else {
        return (None, None);
    };

    let Some(value) = CONTENT_ATTRIBUTE
        .captures(tag.as_bytes())
        .and_then(|caps| caps.name("value"))
    else {
        return (None, None);
    };

    let value = String::from_utf8_lossy(value.as_bytes());
    let (media_type, params) = parse_header(&value);

    let media_type = Some(media_type).filter(|m| !m.is_empty());
    let encoding = params
        .into_iter()
        .rev()
        .find(|(name, _)| name == "charset")
        .map(|(_, v)| v.to_lowercase())
        .filter(|v| !v.is_empty());

    tracing::debug!(meta = %value, "HTML <meta>");
    tracing::debug!(media_type = ?media_type, encoding = ?encoding, "HTML <meta> content type");

    (media_type, encoding)
}
