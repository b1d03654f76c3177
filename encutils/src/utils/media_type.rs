//! # MediaType
//!
//! A small parser for `Content-Type` style header values
//! (`type/subtype; name=value; ...`).
//!
//! **Features:**
//! - Strict parsing into [`MediaType`] with a precise error enum
//! - Lenient splitting via [`parse_header`] that never fails
//! - Case-insensitive parameter lookup, quoted values are unescaped
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::convert::TryFrom;
//! use encutils::utils::MediaType;
//!
//! // Via `new` constructor (returns Result)
//! let mt = MediaType::new("text/html; charset=UTF-8").unwrap();
//! assert_eq!(mt.essence, "text/html");
//! assert_eq!(mt.charset().as_deref(), Some("utf-8"));
//!
//! // Via `parse` using FromStr (returns Result)
//! let mt2: MediaType = "application/atom+xml".parse().unwrap();
//!
//! // Via TryFrom (returns Result)
//! let mt3 = MediaType::try_from("text/plain").unwrap();
//! ```
use std::fmt::Display;

use thiserror::Error;

/// Represents a parsed media type.
///
/// Contains:
/// - the top-level type (`text`, `application`, ...), lowercased
/// - the subtype (`html`, `atom+xml`, ...), lowercased
/// - `essence`, the lowercased `type/subtype` pair
/// - the parameters in the order they appeared, names lowercased
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    pub top_level: String,
    pub subtype: String,
    pub essence: String,
    pub params: Vec<(String, String)>,
}

/// Represents possible errors when parsing a media type.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MediaTypeError {
    #[error("The media type is empty")]
    Empty,
    #[error("Invalid media type => expected type/subtype")]
    MissingSubtype,
    #[error("Invalid token => {0}")]
    InvalidToken(String),
}

impl Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.essence)?;
        for (name, value) in &self.params {
            if !value.is_empty() && value.chars().all(is_token_char) {
                write!(f, "; {}={}", name, value)?;
            } else {
                let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
                write!(f, "; {}=\"{}\"", name, escaped)?;
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for MediaType {
    type Err = MediaTypeError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MediaType::new(s)
    }
}

impl TryFrom<&str> for MediaType {
    type Error = MediaTypeError;
    fn try_from(value: &str) -> Result<Self, Self::Error> {
        MediaType::new(value)
    }
}

impl MediaType {
    /// Creates a new [`MediaType`] from a raw header value.
    ///
    /// # Errors
    /// Returns [`MediaTypeError`] if:
    /// - The value is empty
    /// - There is no `/` separating type and subtype
    /// - The type, subtype or a parameter name is not a valid token
    pub fn new(input: &str) -> Result<MediaType, MediaTypeError> {
        let (main, params) = parse_header(input);

        if main.is_empty() {
            return Err(MediaTypeError::Empty);
        }

        let (top_level, subtype) = main
            .split_once('/')
            .ok_or(MediaTypeError::MissingSubtype)?;
        let top_level = top_level.trim();
        let subtype = subtype.trim();

        if top_level.is_empty() || subtype.is_empty() {
            return Err(MediaTypeError::MissingSubtype);
        }

        for token in [top_level, subtype]
            .into_iter()
            .chain(params.iter().map(|(name, _)| name.as_str()))
        {
            if token.is_empty() || !token.chars().all(is_token_char) {
                return Err(MediaTypeError::InvalidToken(token.to_string()));
            }
        }

        let top_level = top_level.to_ascii_lowercase();
        let subtype = subtype.to_ascii_lowercase();

        Ok(MediaType {
            essence: format!("{}/{}", top_level, subtype),
            top_level,
            subtype,
            params,
        })
    }

    /// Returns the value of the parameter `name` (case-insensitive).
    ///
    /// When a parameter is repeated the last occurrence wins.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .iter()
            .rev()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns the `charset` parameter, lowercased.
    pub fn charset(&self) -> Option<String> {
        self.param("charset")
            .filter(|c| !c.is_empty())
            .map(str::to_lowercase)
    }
}

/// RFC 7230 `tchar`.
fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || "!#$%&'*+-.^_`|~".contains(c)
}

/// Splits a header value into its main value and its parameters.
///
/// Never fails: unparseable segments are skipped. The main value is only
/// trimmed, parameter names are trimmed and lowercased, and double-quoted
/// values lose their quotes (with `\\` and `\"` unescaped).
///
/// Semicolons inside quoted values do not split parameters.
///
/// # Example
/// ```rust,no_run
/// use encutils::utils::parse_header;
///
/// let (main, params) = parse_header(r#"text/html; Charset="ISO-8859-1""#);
/// assert_eq!(main, "text/html");
/// assert_eq!(params, vec![("charset".to_string(), "ISO-8859-1".to_string())]);
/// ```
pub fn parse_header(line: &str) -> (String, Vec<(String, String)>) {
    let mut segments = split_segments(line).into_iter();
    let main = segments.next().unwrap_or_default();

    let params = segments
        .filter_map(|segment| {
            let (name, value) = segment.split_once('=')?;
            let name = name.trim().to_ascii_lowercase();
            let mut value = value.trim().to_string();

            if value.len() >= 2 && value.starts_with('"') && value.ends_with('"') {
                value = value[1..value.len() - 1]
                    .replace("\\\\", "\\")
                    .replace("\\\"", "\"");
            }
            Some((name, value))
        })
        .collect();

    (main, params)
}

fn split_segments(line: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escaped = false;

    for c in line.chars() {
        match c {
            _ if escaped => escaped = false,
            '\\' if in_quotes => escaped = true,
            '"' => in_quotes = !in_quotes,
            ';' if !in_quotes => {
                segments.push(current.trim().to_string());
                current.clear();
                continue;
            }
            _ => {}
        }
        current.push(c);
    }
    segments.push(current.trim().to_string());

    segments
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_type_valid_with_charset() {
        let mt = MediaType::new("Text/HTML; Charset=UTF-8").unwrap();
        assert_eq!(mt.top_level, "text");
        assert_eq!(mt.subtype, "html");
        assert_eq!(mt.essence, "text/html");
        assert_eq!(mt.param("CHARSET"), Some("UTF-8"));
        assert_eq!(mt.charset().as_deref(), Some("utf-8"));
    }

    #[test]
    fn test_media_type_valid_structured_suffix() {
        let mt: MediaType = "application/atom+xml".parse().unwrap();
        assert_eq!(mt.essence, "application/atom+xml");
        assert!(mt.params.is_empty());
        assert_eq!(mt.charset(), None);
    }

    #[test]
    fn test_media_type_quoted_charset() {
        let mt = MediaType::try_from(r#"text/xml; charset="iso-8859-1"; q=1"#).unwrap();
        assert_eq!(mt.charset().as_deref(), Some("iso-8859-1"));
        assert_eq!(mt.param("q"), Some("1"));
    }

    #[test]
    fn test_media_type_repeated_param_last_wins() {
        let mt = MediaType::new("text/plain; charset=ascii; charset=utf-8").unwrap();
        assert_eq!(mt.charset().as_deref(), Some("utf-8"));
    }

    #[test]
    fn test_media_type_display() {
        let mt = MediaType::new(r#"text/plain;charset=utf-8;title="a b""#).unwrap();
        assert_eq!(mt.to_string(), r#"text/plain; charset=utf-8; title="a b""#);
    }

    #[test]
    fn test_media_type_invalid_empty() {
        assert_eq!(MediaType::new(""), Err(MediaTypeError::Empty));
        assert_eq!(MediaType::new("  ; charset=utf-8"), Err(MediaTypeError::Empty));
    }

    #[test]
    fn test_media_type_invalid_missing_subtype() {
        assert_eq!(MediaType::new("text"), Err(MediaTypeError::MissingSubtype));
        assert_eq!(MediaType::new("text/"), Err(MediaTypeError::MissingSubtype));
    }

    #[test]
    fn test_media_type_invalid_token() {
        let res = MediaType::new("text/ht ml");
        assert!(matches!(res, Err(MediaTypeError::InvalidToken(t)) if t == "ht ml"));
        assert_eq!(
            MediaTypeError::InvalidToken("x".into()).to_string(),
            "Invalid token => x"
        );
    }

    #[test]
    fn test_media_type_parse_header_lenient() {
        let (main, params) = parse_header(r#"Text/HTML ; CHARSET = "a;b\"c" ; novalue"#);
        assert_eq!(main, "Text/HTML");
        assert_eq!(params, vec![("charset".to_string(), "a;b\"c".to_string())]);
    }

    #[test]
    fn test_media_type_parse_header_empty() {
        let (main, params) = parse_header("");
        assert_eq!(main, "");
        assert!(params.is_empty());
    }
}
