//! # Encoding Detection
//!
//! Finds the most likely character encoding of a document from up to three
//! independent sources:
//!
//! - the transport (`Content-Type` charset of an HTTP response)
//! - the document's XML declaration or byte-order mark
//! - the document's `<meta http-equiv="Content-Type">` element
//!
//! and reports every contradiction between them.
//!
//! ---
//!
//! ## Precedence
//!
//! The transport charset always wins when present. Otherwise it depends on
//! the [`ContentCategory`] of the document:
//!
//! ```text
//! XmlApplication   transport > BOM / XML declaration > utf-8        (RFC 3023)
//! XmlText          transport > category default (iso-8859-1)
//! HtmlText         transport > <meta> > category default > guesser  (HTML 4.01 5.2.2)
//! PlainText        transport > category default (iso-8859-1)
//! Unknown          transport only
//! ```
//!
//! Without transport metadata the category is sniffed from the body: an XML
//! prolog near the start means `XmlApplication`, anything else `Unknown`.
//!
//! ## Mismatches
//!
//! Every pair of declared encodings (transport/XML, transport/meta,
//! XML/meta) that disagrees yields its own [`Mismatch`]. Mismatches are
//! findings, not errors: a `text/html` page that is really XHTML may report
//! a harmless XML/meta disagreement.
//!
//! ## Example
//!
//! ```rust,no_run
//! use encutils::detect::{Resolver, detect};
//! use encutils::utils::Headers;
//!
//! let headers: Headers = [("Content-Type", "text/html; charset=UTF-8")].into_iter().collect();
//! let body = r#"<meta http-equiv="Content-Type" content="text/html; charset=iso-8859-1">"#;
//!
//! let info = detect(body, Some(&headers));
//! assert_eq!(info.encoding(), Some("utf-8"));
//! assert!(info.has_mismatch());
//!
//! // Same thing with a custom guesser for undeclared HTML
//! let resolver = Resolver::new().with_guesser(|_: &[u8]| Some("windows-1252".to_string()));
//! let info = resolver.detect("<p>no hints</p>", Some(&headers));
//! ```
//!
//! Nothing here decodes the content; the caller picks a codec from
//! [`EncodingResult::encoding`].
use std::{
    fmt::{Debug, Display},
    sync::{Arc, LazyLock},
};

use crate::utils::TransportInfo;

pub mod category;
pub use category::ContentCategory;
pub mod formatter;
pub use formatter::{EncodingReport, ReportFormatter, StructuredFormatter, TextFormatter};
#[cfg(feature = "serde")]
pub use formatter::JsonFormatter;
pub mod guess;
#[cfg(feature = "chardetng")]
pub use guess::ChardetngGuesser;
pub use guess::{Guesser, TrialGuesser};
mod html;
pub use html::find_in_html;
mod xml;
pub use xml::{find_in_xml, find_xml_declaration, sniff_bom};

/// Which two sources disagree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MismatchKind {
    TransportVsXml,
    TransportVsMeta,
    XmlVsMeta,
}

impl Display for MismatchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TransportVsXml => write!(f, "transport-vs-xml"),
            Self::TransportVsMeta => write!(f, "transport-vs-meta"),
            Self::XmlVsMeta => write!(f, "xml-vs-meta"),
        }
    }
}

/// A contradiction between two declared encodings.
///
/// `first` belongs to the left-hand source of [`kind`](Self::kind),
/// `second` to the right-hand one.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Mismatch {
    pub kind: MismatchKind,
    pub first: String,
    pub second: String,
}

impl Display for Mismatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (left, right) = match self.kind {
            MismatchKind::TransportVsXml => ("HTTP", "XML"),
            MismatchKind::TransportVsMeta => ("HTTP", "HTML <meta>"),
            MismatchKind::XmlVsMeta => ("XML", "HTML <meta>"),
        };
        write!(
            f,
            "\"{}\" ({}) <> \"{}\" ({}) encoding mismatch",
            self.first, left, self.second, right
        )
    }
}

/// Everything [`detect`] found out about a document's encoding.
///
/// Created once per call and read-only afterwards. Displays as the resolved
/// encoding, or as an empty string when none was found.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncodingResult {
    encoding: Option<String>,
    category: ContentCategory,
    transport_media_type: Option<String>,
    transport_encoding: Option<String>,
    xml_encoding: Option<String>,
    meta_media_type: Option<String>,
    meta_encoding: Option<String>,
    mismatches: Vec<Mismatch>,
}

impl EncodingResult {
    /// The resolved encoding, always lowercase.
    pub fn encoding(&self) -> Option<&str> {
        self.encoding.as_deref()
    }

    /// The resolved encoding or `""`.
    pub fn name(&self) -> &str {
        self.encoding().unwrap_or_default()
    }

    /// The category the resolution rules were chosen by.
    pub fn category(&self) -> ContentCategory {
        self.category
    }

    pub fn transport_media_type(&self) -> Option<&str> {
        self.transport_media_type.as_deref()
    }

    pub fn transport_encoding(&self) -> Option<&str> {
        self.transport_encoding.as_deref()
    }

    /// Encoding from the byte-order mark or XML declaration, including the
    /// category fallback where one applies.
    pub fn xml_encoding(&self) -> Option<&str> {
        self.xml_encoding.as_deref()
    }

    pub fn meta_media_type(&self) -> Option<&str> {
        self.meta_media_type.as_deref()
    }

    pub fn meta_encoding(&self) -> Option<&str> {
        self.meta_encoding.as_deref()
    }

    pub fn has_mismatch(&self) -> bool {
        !self.mismatches.is_empty()
    }

    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }
}

impl Display for EncodingResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Runtime configuration for a [`Resolver`].
///
/// # Defaults
/// ```rust,ignore
/// ResolverOptions {
///     xml_lookahead: 2048,
///     prolog_sniff_window: 30,
///     xml_text_ascii_fallback: false,
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Number of leading bytes searched for an XML declaration.
    pub xml_lookahead: usize,
    /// Number of leading bytes searched for `<?xml version=` when there is
    /// no transport metadata.
    pub prolog_sniff_window: usize,
    /// Report `ascii` as the XML encoding of `text/xml` documents that
    /// declare nothing. When `false` the XML encoding stays absent.
    pub xml_text_ascii_fallback: bool,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            xml_lookahead: 2048,
            prolog_sniff_window: 30,
            xml_text_ascii_fallback: false,
        }
    }
}

/// Encoding resolver.
///
/// Holds the options and the [`Guesser`] used for undeclared HTML. A
/// resolver has no other state: share one freely between threads.
#[derive(Clone)]
pub struct Resolver {
    /// Configuration options controlling the resolution.
    pub options: ResolverOptions,
    guesser: Arc<dyn Guesser>,
}

impl Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self {
            options: ResolverOptions::default(),
            guesser: Arc::new(TrialGuesser),
        }
    }
}

static DEFAULT_RESOLVER: LazyLock<Resolver> = LazyLock::new(Resolver::default);

impl Resolver {
    /// Creates a new [`Resolver`] with default options and the
    /// [`TrialGuesser`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets custom configuration of the [`Resolver`].
    pub fn with_options(mut self, options: ResolverOptions) -> Self {
        self.options = options;
        self
    }

    /// Replaces the guesser consulted for HTML without declared encoding.
    pub fn with_guesser<G>(mut self, guesser: G) -> Self
    where
        G: Guesser + 'static,
    {
        self.guesser = Arc::new(guesser);
        self
    }

    /// Finds all encoding information of `content`, using `transport` when
    /// given. Never fails; missing information stays `None`.
    pub fn detect<C>(&self, content: C, transport: Option<&dyn TransportInfo>) -> EncodingResult
    where
        C: AsRef<[u8]>,
    {
        let content = content.as_ref();

        let (transport_media_type, transport_encoding, category) = match transport {
            Some(transport) => {
                let (media_type, encoding) = find_in_transport(transport);
                let category = ContentCategory::from_media_type(media_type.as_deref());
                (media_type, encoding, category)
            }
            None => (
                None,
                None,
                ContentCategory::from_content(content, self.options.prolog_sniff_window),
            ),
        };
        tracing::debug!(%category, "content category");

        let lookahead = self.options.xml_lookahead;
        let xml_encoding = match category {
            ContentCategory::XmlApplication => find_in_xml(content, lookahead, Some("utf-8")),
            ContentCategory::XmlText => find_in_xml(
                content,
                lookahead,
                self.options.xml_text_ascii_fallback.then_some("ascii"),
            ),
            // XHTML served as text/html; HTML itself has no XML default.
            ContentCategory::HtmlText => find_in_xml(content, lookahead, None),
            ContentCategory::PlainText | ContentCategory::Unknown => None,
        };

        let (meta_media_type, meta_encoding) = match category {
            ContentCategory::HtmlText | ContentCategory::PlainText => find_in_html(content),
            _ => (None, None),
        };

        let category_default = || {
            default_for_media_type(transport_media_type.as_deref()).map(str::to_string)
        };

        let encoding = match category {
            ContentCategory::XmlApplication => {
                transport_encoding.clone().or_else(|| xml_encoding.clone())
            }
            ContentCategory::HtmlText => transport_encoding
                .clone()
                .or_else(|| meta_encoding.clone())
                .or_else(category_default)
                .or_else(|| self.guess(content)),
            ContentCategory::XmlText | ContentCategory::PlainText => {
                transport_encoding.clone().or_else(category_default)
            }
            ContentCategory::Unknown => transport_encoding.clone(),
        };

        let mismatches = find_mismatches(
            transport_encoding.as_deref(),
            xml_encoding.as_deref(),
            meta_encoding.as_deref(),
        );

        tracing::info!(
            encoding = ?encoding,
            mismatch = !mismatches.is_empty(),
            "Encoding (probably)"
        );

        EncodingResult {
            encoding,
            category,
            transport_media_type,
            transport_encoding,
            xml_encoding,
            meta_media_type,
            meta_encoding,
            mismatches,
        }
    }

    fn guess(&self, content: &[u8]) -> Option<String> {
        let guessed = self
            .guesser
            .guess(content)
            .map(|g| g.trim().to_lowercase())
            .filter(|g| !g.is_empty());
        tracing::debug!(encoding = ?guessed, "guessed encoding");
        guessed
    }
}

/// Finds all encoding information of `content` with a default [`Resolver`].
pub fn detect<C>(content: C, transport: Option<&dyn TransportInfo>) -> EncodingResult
where
    C: AsRef<[u8]>,
{
    DEFAULT_RESOLVER.detect(content, transport)
}

/// Classifies a media type, e.g. `text/rss+xml` is [`ContentCategory::XmlText`].
pub fn classify(media_type: &str) -> ContentCategory {
    ContentCategory::from_media_type(Some(media_type))
}

/// Naive check whether `content` is XML, used when there is no transport
/// metadata.
pub fn guess_content(content: &[u8]) -> ContentCategory {
    ContentCategory::from_content(content, ResolverOptions::default().prolog_sniff_window)
}

/// Returns `(media_type, charset)` declared by the transport. The charset
/// is lowercased.
pub fn find_in_transport(transport: &dyn TransportInfo) -> (Option<String>, Option<String>) {
    let media_type = transport
        .media_type()
        .map(|m| m.trim().to_string())
        .filter(|m| !m.is_empty());
    let encoding = transport
        .charset()
        .map(|c| c.trim().to_lowercase())
        .filter(|c| !c.is_empty());

    tracing::debug!(media_type = ?media_type, "HTTP media type");
    tracing::debug!(encoding = ?encoding, "HTTP encoding");

    (media_type, encoding)
}

/// Default encoding for a media type, e.g. `utf-8` for `application/xml`.
///
/// `None` when the category has no default (HTML, unknown types).
pub fn default_for_media_type(media_type: Option<&str>) -> Option<&'static str> {
    let encoding = default_for_category(ContentCategory::from_media_type(media_type));

    match encoding {
        Some(encoding) => {
            tracing::debug!(media_type = ?media_type, encoding, "default encoding for media type")
        }
        None => tracing::debug!(media_type = ?media_type, "media type has no default encoding"),
    }
    encoding
}

/// Default encoding for a [`ContentCategory`].
pub fn default_for_category(category: ContentCategory) -> Option<&'static str> {
    category.default_encoding()
}

fn find_mismatches(
    transport: Option<&str>,
    xml: Option<&str>,
    meta: Option<&str>,
) -> Vec<Mismatch> {
    [
        (MismatchKind::TransportVsXml, transport, xml),
        (MismatchKind::TransportVsMeta, transport, meta),
        (MismatchKind::XmlVsMeta, xml, meta),
    ]
    .into_iter()
    .filter_map(|(kind, first, second)| match (first, second) {
        (Some(first), Some(second)) if first != second => Some(Mismatch {
            kind,
            first: first.to_string(),
            second: second.to_string(),
        }),
        _ => None,
    })
    .inspect(|mismatch| tracing::warn!(kind = %mismatch.kind, "{}", mismatch))
    .collect()
}
