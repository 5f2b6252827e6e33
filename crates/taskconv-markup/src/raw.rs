//! Raw-html passthrough wrapper
//!
//! Output layout is an external format contract and is reproduced byte for byte:
//!
//! ```text
//! .. raw:: html
//!
//!     <tidied line 1>
//!     <tidied line 2>
//!
//! ```

use crate::error::TidyError;
use crate::tidy::HtmlTidy;

/// Directive header introducing a raw-html block
pub const RAW_HTML_DIRECTIVE: &str = ".. raw:: html";

/// Indentation applied to every line of directive content
pub const RAW_INDENT: &str = "    ";

/// Tidy `html` and embed the result as a raw-html directive
///
/// Every line of tidied output (split on `\n`) is indented by four spaces,
/// so an empty fragment yields a single indented empty line.
///
/// # Errors
/// `TidyError` if the tidy step cannot run
pub fn embed_as_raw_markup<T: HtmlTidy + ?Sized>(tidy: &T, html: &str) -> Result<String, TidyError> {
    let tidied = tidy.tidy_fragment(html)?;
    if !tidied.diagnostics.is_empty() {
        tracing::warn!(count = tidied.diagnostics.len(), "malformed html coerced by tidy");
        for diagnostic in &tidied.diagnostics {
            tracing::debug!("tidy: {}", diagnostic);
        }
    }
    Ok(wrap_lines(&tidied.html))
}

fn wrap_lines(tidied: &str) -> String {
    let mut out = String::with_capacity(RAW_HTML_DIRECTIVE.len() + tidied.len() + 16);
    out.push_str(RAW_HTML_DIRECTIVE);
    out.push_str("\n\n");
    for line in tidied.split('\n') {
        out.push_str(RAW_INDENT);
        out.push_str(line);
        out.push('\n');
    }
    out.push('\n');
    out
}
