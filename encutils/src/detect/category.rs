//! Content categories and how media types map onto them (RFC 3023 and the
//! HTML 4 charset rules).
use std::{fmt::Display, sync::LazyLock};

use regex::Regex;

/// Coarse classification of a document, driving which encoding rules apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ContentCategory {
    /// Anything not covered below, or no media type at all.
    #[default]
    Unknown,
    /// `application/xml`, `application/xml-dtd`,
    /// `application/xml-external-parsed-entity` or `application/*+xml`.
    XmlApplication,
    /// `text/xml`, `text/xml-external-parsed-entity` or `text/*+xml`.
    XmlText,
    /// `text/html`.
    HtmlText,
    /// Any other `text/*`.
    PlainText,
}

impl Display for ContentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::XmlApplication => write!(f, "xml-application"),
            Self::XmlText => write!(f, "xml-text"),
            Self::HtmlText => write!(f, "html-text"),
            Self::PlainText => write!(f, "plain-text"),
        }
    }
}

const XML_APPLICATION_TYPES: [&str; 3] = [
    "application/xml",
    "application/xml-dtd",
    "application/xml-external-parsed-entity",
];

const XML_TEXT_TYPES: [&str; 2] = ["text/xml", "text/xml-external-parsed-entity"];

// Prefix matches: anything after the `+xml` (parameters included) is ignored.
static XML_APPLICATION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^application/.*?\+xml").unwrap());
static XML_TEXT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)^text/.*?\+xml").unwrap());

const PROLOG_MARKER: &[u8] = b"<?xml version=";

impl ContentCategory {
    /// Classifies a media type such as `application/atom+xml`.
    ///
    /// The value is trimmed and lowercased first. `None` is `Unknown`.
    pub fn from_media_type(media_type: Option<&str>) -> ContentCategory {
        let Some(media_type) = media_type else {
            return ContentCategory::Unknown;
        };
        let media_type = media_type.trim().to_lowercase();

        if media_type.is_empty() {
            ContentCategory::Unknown
        } else if XML_APPLICATION_TYPES.contains(&media_type.as_str())
            || XML_APPLICATION_PATTERN.is_match(&media_type)
        {
            ContentCategory::XmlApplication
        } else if XML_TEXT_TYPES.contains(&media_type.as_str())
            || XML_TEXT_PATTERN.is_match(&media_type)
        {
            ContentCategory::XmlText
        } else if media_type == "text/html" {
            ContentCategory::HtmlText
        } else if media_type.starts_with("text/") {
            ContentCategory::PlainText
        } else {
            ContentCategory::Unknown
        }
    }

    /// Naive body sniff used when no transport metadata is available.
    ///
    /// Returns `XmlApplication` when `<?xml version=` occurs within the
    /// first `window` bytes, `Unknown` otherwise.
    pub fn from_content(content: &[u8], window: usize) -> ContentCategory {
        let head = &content[..content.len().min(window)];

        if head
            .windows(PROLOG_MARKER.len())
            .any(|w| w == PROLOG_MARKER)
        {
            ContentCategory::XmlApplication
        } else {
            ContentCategory::Unknown
        }
    }

    pub fn is_xml(&self) -> bool {
        matches!(self, Self::XmlApplication | Self::XmlText)
    }

    /// The encoding implied by the category when nothing is declared.
    ///
    /// `XmlText` maps to `iso-8859-1` rather than the `ascii` of RFC 3023;
    /// see [`find_in_xml`](crate::detect::find_in_xml) for the `ascii`
    /// fallback that applies to the XML declaration itself.
    pub fn default_encoding(&self) -> Option<&'static str> {
        match self {
            Self::XmlApplication => Some("utf-8"),
            Self::XmlText => Some("iso-8859-1"),
            Self::PlainText => Some("iso-8859-1"),
            Self::HtmlText | Self::Unknown => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_xml_application() {
        for mt in [
            "application/xml",
            "application/xml-dtd",
            "application/xml-external-parsed-entity",
            "application/atom+xml",
            "  Application/RSS+XML ",
            "application/xhtml+xml; charset=utf-8",
        ] {
            assert_eq!(
                ContentCategory::from_media_type(Some(mt)),
                ContentCategory::XmlApplication,
                "{mt}"
            );
        }
    }

    #[test]
    fn test_category_xml_text() {
        for mt in ["text/xml", "text/xml-external-parsed-entity", "text/rss+xml"] {
            assert_eq!(
                ContentCategory::from_media_type(Some(mt)),
                ContentCategory::XmlText,
                "{mt}"
            );
        }
    }

    #[test]
    fn test_category_html_plain_unknown() {
        assert_eq!(
            ContentCategory::from_media_type(Some("TEXT/HTML")),
            ContentCategory::HtmlText
        );
        assert_eq!(
            ContentCategory::from_media_type(Some("text/plain")),
            ContentCategory::PlainText
        );
        assert_eq!(
            ContentCategory::from_media_type(Some("text/css")),
            ContentCategory::PlainText
        );
        assert_eq!(
            ContentCategory::from_media_type(Some("image/png")),
            ContentCategory::Unknown
        );
        assert_eq!(
            ContentCategory::from_media_type(Some("   ")),
            ContentCategory::Unknown
        );
        assert_eq!(
            ContentCategory::from_media_type(None),
            ContentCategory::Unknown
        );
    }

    #[test]
    fn test_category_html_with_params_is_plain_text() {
        // Only an exact `text/html` counts as HTML.
        assert_eq!(
            ContentCategory::from_media_type(Some("text/html; charset=utf-8")),
            ContentCategory::PlainText
        );
    }

    #[test]
    fn test_category_from_content() {
        let xml = b"<?xml version=\"1.0\"?><root/>";
        assert_eq!(
            ContentCategory::from_content(xml, 30),
            ContentCategory::XmlApplication
        );

        let bom_xml = b"\xEF\xBB\xBF<?xml version=\"1.0\"?>";
        assert_eq!(
            ContentCategory::from_content(bom_xml, 30),
            ContentCategory::XmlApplication
        );

        let late = format!("{}<?xml version=\"1.0\"?>", " ".repeat(40));
        assert_eq!(
            ContentCategory::from_content(late.as_bytes(), 30),
            ContentCategory::Unknown
        );

        assert_eq!(
            ContentCategory::from_content(b"<html></html>", 30),
            ContentCategory::Unknown
        );
        assert_eq!(
            ContentCategory::from_content(b"", 30),
            ContentCategory::Unknown
        );
    }

    #[test]
    fn test_category_is_xml() {
        assert!(ContentCategory::XmlApplication.is_xml());
        assert!(ContentCategory::XmlText.is_xml());
        assert!(!ContentCategory::HtmlText.is_xml());
        assert!(!ContentCategory::Unknown.is_xml());
    }

    #[test]
    fn test_category_default_encoding() {
        assert_eq!(
            ContentCategory::XmlApplication.default_encoding(),
            Some("utf-8")
        );
        assert_eq!(
            ContentCategory::XmlText.default_encoding(),
            Some("iso-8859-1")
        );
        assert_eq!(
            ContentCategory::PlainText.default_encoding(),
            Some("iso-8859-1")
        );
        assert_eq!(ContentCategory::HtmlText.default_encoding(), None);
        assert_eq!(ContentCategory::Unknown.default_encoding(), None);
    }
}
