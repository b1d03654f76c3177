//! Encoding declared by an XML document itself: a byte-order mark, or the
//! `encoding` pseudo-attribute of the XML declaration.
use std::sync::LazyLock;

use regex::bytes::Regex;

/// Known byte-order marks, longest first.
const BOMS: [(&[u8], &str); 5] = [
    (&[0x00, 0x00, 0xFE, 0xFF], "utf-32be"),
    (&[0xFF, 0xFE, 0x00, 0x00], "utf-32le"),
    (&[0xEF, 0xBB, 0xBF], "utf-8"),
    (&[0xFE, 0xFF], "utf-16be"),
    (&[0xFF, 0xFE], "utf-16le"),
];

// Without a BOM the declaration must start at the first byte. `.` stops at
// line breaks, so the declaration has to fit on one line.
static XML_DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?-u)^<\?xml.+?encoding=["'](?P<encoding>[^"']+)["'].*?\?>"#).unwrap()
});

/// Returns the encoding named by a leading byte-order mark.
///
/// Four-byte marks are tested before three- and two-byte ones, so
/// `FF FE 00 00` is UTF-32LE rather than UTF-16LE.
pub fn sniff_bom(content: &[u8]) -> Option<&'static str> {
    BOMS.iter()
        .find(|(bom, _)| content.starts_with(bom))
        .map(|(_, name)| *name)
}

/// Returns the lowercased `encoding` of an XML declaration found in the
/// first `lookahead` bytes of `content`.
pub fn find_xml_declaration(content: &[u8], lookahead: usize) -> Option<String> {
    let head = &content[..content.len().min(lookahead)];

    XML_DECLARATION
        .captures(head)
        .and_then(|caps| caps.name("encoding"))
        .map(|m| String::from_utf8_lossy(m.as_bytes()).to_lowercase())
}

/// Finds the encoding an XML document declares for itself.
///
/// - A byte-order mark wins immediately.
/// - Otherwise the XML declaration within `lookahead` bytes is used.
/// - Otherwise `fallback` is returned, if the caller allows one.
pub fn find_in_xml(content: &[u8], lookahead: usize, fallback: Option<&str>) -> Option<String> {
    if let Some(bom) = sniff_bom(content) {
        tracing::debug!(encoding = bom, "XML BOM encoding");
        return Some(bom.to_string());
    }

    if let Some(declared) = find_xml_declaration(content, lookahead) {
        tracing::debug!(encoding = %declared, "XML declaration encoding");
        return Some(declared);
    }

    if let Some(fallback) = fallback {
        tracing::debug!(encoding = fallback, "XML encoding default");
    }
    fallback.map(str::to_string)
}
