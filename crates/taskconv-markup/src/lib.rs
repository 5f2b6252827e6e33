//! Task Converter Markup Layer
//!
//! Rewrites HTML-flagged text fields of a task descriptor into the native
//! lightweight markup, using a `.. raw:: html` passthrough block.
//!
//! # Core Operations
//!
//! - **Tidy**: reformat an HTML fragment into clean, indented HTML ([`HtmlTidy`])
//! - **Wrap**: embed tidied HTML as a raw-html directive ([`embed_as_raw_markup`])
//! - **Normalize**: consume every `<X>IsHTML` flag of a descriptor ([`MarkupNormalizer`])
//!
//! # Architecture
//!
//! ```text
//! Descriptor ─→ MarkupNormalizer ─→ convert_field (×4 locations) ─→ Descriptor'
//!                                        │
//!                                        └─→ HtmlTidy ─→ raw-html wrapper
//! ```
//!
//! # Example
//!
//! ```rust
//! use taskconv_markup::{FragmentTidy, MarkupNormalizer};
//! use serde_json::json;
//!
//! let normalizer = MarkupNormalizer::new(FragmentTidy::new());
//! let mut data = json!({"contextIsHTML": true, "context": "<b>hi</b>"})
//!     .as_object()
//!     .cloned()
//!     .unwrap();
//!
//! normalizer.normalize(&mut data).unwrap();
//! assert_eq!(data["context"], ".. raw:: html\n\n    <b>hi</b>\n\n");
//! assert!(!data.contains_key("contextIsHTML"));
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod error;
pub mod normalizer;
pub mod raw;
pub mod tidy;
pub mod value;

// Re-exports for convenience
pub use error::{NormalizeError, ShapeError, TidyError};
pub use normalizer::{FieldOutcome, MarkupNormalizer, NormalizeReport, HTML_FIELDS};
pub use raw::{embed_as_raw_markup, RAW_HTML_DIRECTIVE, RAW_INDENT};
pub use tidy::{FragmentTidy, HtmlTidy, TidyOutput};
pub use value::Descriptor;

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
