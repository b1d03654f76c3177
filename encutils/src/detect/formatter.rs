use std::fmt::{Debug, Write};

use super::*;

/// Trait for rendering detection results.
///
/// A `ReportFormatter` defines how an [`EncodingResult`] is turned into
/// something a caller can print, store or ship elsewhere.
pub trait ReportFormatter: Send + Sync + 'static {
    type Output: Send + Sync + 'static + Clone + Debug;

    fn format(&self, result: &EncodingResult) -> Self::Output;
}

/// Formats results as a human readable, multi-line summary.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextFormatter;
/// Formats results as flat [`EncodingReport`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct StructuredFormatter;

/// Flat, display-ready view of an [`EncodingResult`].
///
/// Produced by [`StructuredFormatter`] and serialized by `JsonFormatter`.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncodingReport {
    pub encoding: Option<String>,
    pub category: String,
    pub transport_media_type: Option<String>,
    pub transport_encoding: Option<String>,
    pub xml_encoding: Option<String>,
    pub meta_media_type: Option<String>,
    pub meta_encoding: Option<String>,
    pub mismatch: bool,
    pub mismatches: Vec<String>,
}

impl From<&EncodingResult> for EncodingReport {
    fn from(result: &EncodingResult) -> Self {
        Self {
            encoding: result.encoding().map(str::to_string),
            category: result.category().to_string(),
            transport_media_type: result.transport_media_type().map(str::to_string),
            transport_encoding: result.transport_encoding().map(str::to_string),
            xml_encoding: result.xml_encoding().map(str::to_string),
            meta_media_type: result.meta_media_type().map(str::to_string),
            meta_encoding: result.meta_encoding().map(str::to_string),
            mismatch: result.has_mismatch(),
            mismatches: result.mismatches().iter().map(|m| m.to_string()).collect(),
        }
    }
}

fn or_dash(value: Option<&str>) -> &str {
    value.unwrap_or("-")
}

impl ReportFormatter for TextFormatter {
    type Output = String;

    fn format(&self, result: &EncodingResult) -> Self::Output {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = writeln!(out, "Encoding: {}", or_dash(result.encoding()));
        let _ = writeln!(out, "Category: {}", result.category());
        let _ = writeln!(
            out,
            "HTTP: {} ({})",
            or_dash(result.transport_media_type()),
            or_dash(result.transport_encoding())
        );
        let _ = writeln!(out, "XML: {}", or_dash(result.xml_encoding()));
        let _ = writeln!(
            out,
            "Meta: {} ({})",
            or_dash(result.meta_media_type()),
            or_dash(result.meta_encoding())
        );
        let _ = write!(out, "Mismatch: {}", result.has_mismatch());
        for mismatch in result.mismatches() {
            let _ = write!(out, "\n  {}", mismatch);
        }
        out
    }
}

impl ReportFormatter for StructuredFormatter {
    type Output = EncodingReport;

    fn format(&self, result: &EncodingResult) -> Self::Output {
        EncodingReport::from(result)
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "serde")] {
        /// Formats results as JSON strings.
        #[derive(Debug, Clone, Copy, Default)]
        pub struct JsonFormatter;

        impl ReportFormatter for JsonFormatter {
            type Output = String;

            fn format(&self, result: &EncodingResult) -> Self::Output {
                serde_json::to_string(&EncodingReport::from(result)).unwrap_or_default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::MediaType;

    fn html_conflict() -> EncodingResult {
        let transport = MediaType::new("text/html; charset=UTF-8").unwrap();
        let body = r#"<meta http-equiv="Content-Type" content="text/html; charset=iso-8859-1">"#;
        Resolver::new().detect(body, Some(&transport))
    }

    #[test]
    fn test_formatter_text() {
        let text = TextFormatter.format(&html_conflict());
        assert_eq!(
            text,
            "Encoding: utf-8\n\
             Category: html-text\n\
             HTTP: text/html (utf-8)\n\
             XML: -\n\
             Meta: text/html (iso-8859-1)\n\
             Mismatch: true\n  \
             \"utf-8\" (HTTP) <> \"iso-8859-1\" (HTML <meta>) encoding mismatch"
        );
    }

    #[test]
    fn test_formatter_text_empty_result() {
        let text = TextFormatter.format(&Resolver::new().detect(b"", None));
        assert!(text.starts_with("Encoding: -\nCategory: unknown\n"));
        assert!(text.ends_with("Mismatch: false"));
    }

    #[test]
    fn test_formatter_structured() {
        let report = StructuredFormatter.format(&html_conflict());
        assert_eq!(report.encoding.as_deref(), Some("utf-8"));
        assert_eq!(report.category, "html-text");
        assert!(report.mismatch);
        assert_eq!(report.mismatches.len(), 1);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_formatter_json() {
        let json = JsonFormatter.format(&html_conflict());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["encoding"], "utf-8");
        assert_eq!(value["meta_encoding"], "iso-8859-1");
        assert_eq!(value["mismatch"], true);
    }
}
