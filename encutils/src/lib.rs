//! # encutils
//!
//! A Rust library that works out which character encoding a document uses.
//! It reads HTTP headers, XML byte-order marks and declarations, and HTML
//! `<meta>` elements, then reports where those sources disagree.
//!
//! ## Features
//!
//! ### Currently Available
//!
//! (All feature versions)
//! - **Encoding Detection** - RFC 3023 rules for XML media types, HTML 4.01 rules for `text/html`
//! - **Mismatch Reporting** - Every disagreement between HTTP, XML and `<meta>` is itemised
//! - **Media Type Parsing** - Strict `MediaType` parser and a lenient header splitter
//! - **Transport Metadata** - `Headers` with case-insensitive lookups
//! - **Report Formatters** - Text and structured summaries of a result
//!
//! ("serde" feature)
//! - **Serializable results** - `EncodingResult`, `Mismatch` and `EncodingReport`
//! - **JSON formatter**
//!
//! ("chardetng" feature)
//! - **Statistical guesser** - For HTML pages that declare nothing
//!
//! ## Quick Start
//!
//! Add this to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! encutils = "0.1"
//! encutils = { version = "0.1", features = ["serde", "chardetng"] }
//! ```
//!
//! ## Usage Examples
//!
//! ### XML without transport
//!
//! ```rust,no_run
//! use encutils::detect;
//!
//! let info = detect(r#"<?xml version="1.0" encoding="ISO-8859-1"?><root/>"#, None);
//! assert_eq!(info.encoding(), Some("iso-8859-1"));
//! assert!(!info.has_mismatch());
//! ```
//!
//! ### HTML served over HTTP
//!
//! ```rust,no_run
//! use encutils::detect;
//! use encutils::utils::MediaType;
//!
//! let content_type = MediaType::new("text/html; charset=utf-8").unwrap();
//! let body = r#"<meta http-equiv="Content-Type" content="text/html; charset=iso-8859-1">"#;
//!
//! let info = detect(body, Some(&content_type));
//! assert_eq!(info.encoding(), Some("utf-8"));
//! for mismatch in info.mismatches() {
//!     println!("{}", mismatch); // "utf-8" (HTTP) <> "iso-8859-1" (HTML <meta>) encoding mismatch
//! }
//! ```
//!
//! ### Custom resolver
//!
//! ```rust,no_run
//! use encutils::detect::{Resolver, ResolverOptions, ReportFormatter, TextFormatter};
//! use encutils::utils::Headers;
//!
//! let resolver = Resolver::new().with_options(ResolverOptions {
//!     xml_lookahead: 512,
//!     ..ResolverOptions::default()
//! });
//!
//! let headers = Headers::parse("Content-Type: application/atom+xml\r\n");
//! let info = resolver.detect("<feed/>", Some(&headers));
//! println!("{}", TextFormatter.format(&info));
//! ```
//!
//! ## Architecture
//!
//! - **`detect`** - Categories, the XML and HTML sniffers, guessers, the resolver and formatters
//! - **`utils`** - Media type parsing and transport metadata
//!
//! ## Error Handling
//!
//! Detection never fails: missing information is `None`. Only the strict
//! media type parser returns `Result`:
//!
//! ```rust,no_run
//! use encutils::utils::{MediaType, MediaTypeError};
//!
//! match MediaType::new("text") {
//!     Ok(mt) => println!("Media type: {}", mt),
//!     Err(MediaTypeError::MissingSubtype) => eprintln!("Expected type/subtype"),
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```
//!
//! ## Logging
//!
//! Every step emits [`tracing`](https://docs.rs/tracing) events; install a
//! subscriber to see them.
//!
//! ## License
//!
//! This project is licensed under the MIT License.

pub mod detect;

pub mod utils;

pub use detect::{EncodingResult, Resolver, detect};
