//! # Guessers
//!
//! Last resort for HTML without any declared encoding.
//!
//! A [`Guesser`] looks at the raw content and names an encoding, or gives up.
//! The resolver uses [`TrialGuesser`] unless another one is injected with
//! [`Resolver::with_guesser`](crate::detect::Resolver::with_guesser). Any
//! `Fn(&[u8]) -> Option<String>` closure is a guesser too.
//!
//! With the `chardetng` feature, [`ChardetngGuesser`] wraps a real
//! statistical detector.
//!
//! ## Example
//!
//! ```rust,no_run
//! use encutils::detect::{Guesser, TrialGuesser};
//!
//! assert_eq!(TrialGuesser.guess("plain".as_bytes()).as_deref(), Some("ascii"));
//! assert_eq!(TrialGuesser.guess("café".as_bytes()).as_deref(), Some("iso-8859-1"));
//! assert_eq!(TrialGuesser.guess(b"caf\xE9"), None);
//! ```

/// Names the most likely encoding of `content`, or `None`.
pub trait Guesser: Send + Sync {
    fn guess(&self, content: &[u8]) -> Option<String>;
}

impl<F> Guesser for F
where
    F: Fn(&[u8]) -> Option<String> + Send + Sync,
{
    fn guess(&self, content: &[u8]) -> Option<String> {
        self(content)
    }
}

/// Candidates tried by [`TrialGuesser`], in order.
pub const TRIAL_ENCODINGS: [&str; 4] = ["ascii", "iso-8859-1", "windows-1252", "utf-8"];

/// Code points Windows-1252 places in 0x80..=0x9F. 0x81, 0x8D, 0x8F, 0x90
/// and 0x9D are unassigned.
const WINDOWS_1252_HIGH: [char; 27] = [
    '\u{20AC}', '\u{201A}', '\u{0192}', '\u{201E}', '\u{2026}', '\u{2020}', '\u{2021}',
    '\u{02C6}', '\u{2030}', '\u{0160}', '\u{2039}', '\u{0152}', '\u{017D}', '\u{2018}',
    '\u{2019}', '\u{201C}', '\u{201D}', '\u{2022}', '\u{2013}', '\u{2014}', '\u{02DC}',
    '\u{2122}', '\u{0161}', '\u{203A}', '\u{0153}', '\u{017E}', '\u{0178}',
];

/// Trial-encoding guesser.
///
/// The content is read as UTF-8 text; if it is not valid UTF-8 it is
/// unreadable and no guess is made. Otherwise the first of
/// [`TRIAL_ENCODINGS`] able to represent every character wins.
///
/// Text often fits several candidates at once (ASCII fits all four), so the
/// answer is the narrowest one, not necessarily the one the author used.
#[derive(Debug, Clone, Copy, Default)]
pub struct TrialGuesser;

impl TrialGuesser {
    /// Returns `true` if every character of `text` has a representation in
    /// `encoding`. Unknown encodings represent nothing.
    pub fn can_encode(text: &str, encoding: &str) -> bool {
        match encoding {
            "ascii" => text.is_ascii(),
            "iso-8859-1" => text.chars().all(|c| (c as u32) <= 0xFF),
            "windows-1252" => text.chars().all(|c| {
                c.is_ascii() || ('\u{A0}'..='\u{FF}').contains(&c) || WINDOWS_1252_HIGH.contains(&c)
            }),
            "utf-8" => true,
            _ => false,
        }
    }
}

impl Guesser for TrialGuesser {
    fn guess(&self, content: &[u8]) -> Option<String> {
        let Ok(text) = std::str::from_utf8(content) else {
            tracing::debug!("content is not readable text, no encoding guessed");
            return None;
        };

        TRIAL_ENCODINGS
            .into_iter()
            .find(|encoding| Self::can_encode(text, encoding))
            .map(str::to_string)
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "chardetng")] {
        /// Statistical guesser backed by `chardetng`.
        ///
        /// Always produces an answer; `tld` (e.g. `b"jp"`) biases the
        /// detector towards that region's legacy encodings.
        #[derive(Debug, Clone)]
        pub struct ChardetngGuesser {
            pub tld: Option<Vec<u8>>,
            pub allow_utf8: bool,
        }

        impl Default for ChardetngGuesser {
            fn default() -> Self {
                Self {
                    tld: None,
                    allow_utf8: true,
                }
            }
        }

        impl Guesser for ChardetngGuesser {
            fn guess(&self, content: &[u8]) -> Option<String> {
                let mut detector = chardetng::EncodingDetector::new();
                detector.feed(content, true);
                let encoding = detector.guess(self.tld.as_deref(), self.allow_utf8);
                Some(encoding.name().to_lowercase())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guess_trial_order() {
        let guesser = TrialGuesser;
        assert_eq!(guesser.guess(b"hello").as_deref(), Some("ascii"));
        assert_eq!(guesser.guess(b"").as_deref(), Some("ascii"));
        assert_eq!(
            guesser.guess("na\u{EF}ve".as_bytes()).as_deref(),
            Some("iso-8859-1")
        );
        assert_eq!(
            guesser.guess("5 \u{20AC}".as_bytes()).as_deref(),
            Some("windows-1252")
        );
        assert_eq!(
            guesser.guess("\u{65E5}\u{672C}".as_bytes()).as_deref(),
            Some("utf-8")
        );
    }

    #[test]
    fn test_guess_trial_unreadable_content() {
        assert_eq!(TrialGuesser.guess(b"\xFF\xFE\xFD"), None);
    }

    #[test]
    fn test_guess_can_encode_windows_1252_gaps() {
        assert!(TrialGuesser::can_encode("\u{0178}", "windows-1252"));
        assert!(!TrialGuesser::can_encode("\u{0081}", "windows-1252"));
        assert!(TrialGuesser::can_encode("\u{0081}", "iso-8859-1"));
        assert!(!TrialGuesser::can_encode("x", "koi8-r"));
    }

    #[test]
    fn test_guess_closure_is_guesser() {
        let fixed = |_: &[u8]| Some("shift_jis".to_string());
        assert_eq!(fixed.guess(b"anything").as_deref(), Some("shift_jis"));
    }

    #[cfg(feature = "chardetng")]
    #[test]
    fn test_guess_chardetng_utf8() {
        let text = "\u{3053}\u{3093}\u{306B}\u{3061}\u{306F}\u{4E16}\u{754C}";
        let guess = ChardetngGuesser::default().guess(text.as_bytes());
        assert_eq!(guess.as_deref(), Some("utf-8"));
    }

    #[cfg(feature = "chardetng")]
    #[test]
    fn test_guess_chardetng_lowercase() {
        let guess = ChardetngGuesser::default().guess(b"caf\xE9 cr\xE8me br\xFBl\xE9e").unwrap();
        assert_eq!(guess, guess.to_lowercase());
    }
}
