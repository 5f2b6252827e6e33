//! HTML tidy collaborator
//!
//! [`FragmentTidy`] parses a fragment with the html5ever tree builder (via
//! `scraper`), which coerces any input into a well-formed tree, then
//! pretty-prints it: block elements on their own lines indented two spaces
//! per level, inline content kept on one line.

use crate::error::TidyError;
use scraper::{ElementRef, Html, Node};

/// Tidied HTML plus whatever the parser complained about
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TidyOutput {
    /// Clean, indented HTML without trailing newline
    pub html: String,
    /// Parser diagnostics (informational only)
    pub diagnostics: Vec<String>,
}

/// Reformats an HTML fragment into clean, indented HTML
///
/// Implementations must be error tolerant: malformed input is coerced, never
/// rejected. An `Err` means the tidy step itself could not run.
pub trait HtmlTidy: Send + Sync {
    /// Tidy an HTML fragment
    fn tidy_fragment(&self, html: &str) -> Result<TidyOutput, TidyError>;
}

impl<T: HtmlTidy + ?Sized> HtmlTidy for &T {
    fn tidy_fragment(&self, html: &str) -> Result<TidyOutput, TidyError> {
        (**self).tidy_fragment(html)
    }
}

impl<T: HtmlTidy + ?Sized> HtmlTidy for Box<T> {
    fn tidy_fragment(&self, html: &str) -> Result<TidyOutput, TidyError> {
        (**self).tidy_fragment(html)
    }
}

/// In-process tidy built on the html5ever tree builder
#[derive(Debug, Clone, Copy)]
pub struct FragmentTidy {
    indent_width: usize,
}

impl FragmentTidy {
    /// Create tidy with two-space indentation
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self { indent_width: 2 }
    }

    /// Create tidy with a custom indentation width
    #[inline]
    #[must_use]
    pub fn with_indent(indent_width: usize) -> Self {
        Self { indent_width }
    }
}

impl Default for FragmentTidy {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlTidy for FragmentTidy {
    fn tidy_fragment(&self, html: &str) -> Result<TidyOutput, TidyError> {
        let document = Html::parse_fragment(html);
        let diagnostics = document.errors.iter().map(ToString::to_string).collect();

        let mut printer = Printer::new(self.indent_width);
        printer.children(document.root_element());

        Ok(TidyOutput {
            html: printer.finish(),
            diagnostics,
        })
    }
}

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "caption", "center", "col", "colgroup",
    "dd", "details", "dialog", "dir", "div", "dl", "dt", "fieldset", "figcaption", "figure",
    "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "head", "header", "hgroup", "hr",
    "html", "legend", "li", "main", "menu", "nav", "noscript", "ol", "optgroup", "option", "p",
    "pre", "script", "section", "select", "style", "summary", "table", "tbody", "td",
    "textarea", "tfoot", "th", "thead", "title", "tr", "ul",
];

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Content printed verbatim, no reflow
const VERBATIM_ELEMENTS: &[&str] = &["pre", "script", "style", "textarea"];

/// Content not entity-escaped
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

fn is_block(name: &str) -> bool {
    BLOCK_ELEMENTS.contains(&name)
}

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

/// True when a subtree can be printed on a single line
fn is_inline_only(element: ElementRef<'_>) -> bool {
    element.children().all(|child| match child.value() {
        Node::Element(el) => {
            !is_block(el.name()) && ElementRef::wrap(child).map_or(true, is_inline_only)
        }
        _ => true,
    })
}

struct Printer {
    lines: Vec<String>,
    current: String,
    depth: usize,
    indent_width: usize,
}

impl Printer {
    fn new(indent_width: usize) -> Self {
        Self {
            lines: Vec::new(),
            current: String::new(),
            depth: 0,
            indent_width,
        }
    }

    fn indent(&self) -> String {
        " ".repeat(self.depth * self.indent_width)
    }

    fn append(&mut self, text: &str) {
        if self.current.is_empty() {
            let trimmed = text.trim_start();
            if trimmed.is_empty() {
                return;
            }
            self.current = self.indent();
            self.current.push_str(trimmed);
        } else {
            self.current.push_str(text);
        }
    }

    fn flush(&mut self) {
        let line = std::mem::take(&mut self.current);
        let line = line.trim_end();
        if !line.trim_start().is_empty() {
            self.lines.push(line.to_string());
        }
    }

    fn line(&mut self, text: &str) {
        self.flush();
        let line = format!("{}{}", self.indent(), text);
        self.lines.push(line);
    }

    fn children(&mut self, element: ElementRef<'_>) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => {
                    let collapsed = collapse_whitespace(text);
                    self.append(&escape_text(&collapsed));
                }
                Node::Comment(comment) => {
                    let rendered = format!("<!--{}-->", &**comment);
                    self.append(&rendered);
                }
                Node::Element(_) => {
                    if let Some(child) = ElementRef::wrap(child) {
                        self.element(child);
                    }
                }
                _ => {}
            }
        }
    }

    fn element(&mut self, element: ElementRef<'_>) {
        let name = element.value().name();
        if VERBATIM_ELEMENTS.contains(&name) {
            self.verbatim(element);
        } else if is_void(name) {
            let tag = open_tag(element);
            if is_block(name) {
                self.line(&tag);
            } else {
                self.append(&tag);
            }
        } else if !is_block(name) {
            self.append(&open_tag(element));
            self.children(element);
            self.append(&format!("</{name}>"));
        } else if is_inline_only(element) {
            self.flush();
            self.append(&open_tag(element));
            self.children(element);
            let trimmed_len = self.current.trim_end().len();
            self.current.truncate(trimmed_len);
            self.current.push_str(&format!("</{name}>"));
            self.flush();
        } else {
            self.line(&open_tag(element));
            self.depth += 1;
            self.children(element);
            self.flush();
            self.depth -= 1;
            self.line(&format!("</{name}>"));
        }
    }

    fn verbatim(&mut self, element: ElementRef<'_>) {
        let mut raw = String::new();
        write_compact(element, &mut raw, false);
        self.flush();

        let mut lines = raw.split('\n');
        if let Some(first) = lines.next() {
            let first = format!("{}{}", self.indent(), first);
            self.lines.push(first);
        }
        self.lines.extend(lines.map(str::to_string));
    }

    fn finish(mut self) -> String {
        self.flush();
        self.lines.join("\n")
    }
}

/// Serialize a subtree exactly as parsed, without reformatting
fn write_compact(element: ElementRef<'_>, out: &mut String, raw_text: bool) {
    let name = element.value().name();
    out.push_str(&open_tag(element));
    if is_void(name) {
        return;
    }
    let raw_text = raw_text || RAW_TEXT_ELEMENTS.contains(&name);
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                if raw_text {
                    out.push_str(text);
                } else {
                    out.push_str(&escape_text(text));
                }
            }
            Node::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
            Node::Element(_) => {
                if let Some(child) = ElementRef::wrap(child) {
                    write_compact(child, out, raw_text);
                }
            }
            _ => {}
        }
    }
    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

fn open_tag(element: ElementRef<'_>) -> String {
    let el = element.value();
    let mut tag = format!("<{}", el.name());
    for (name, value) in el.attrs() {
        tag.push(' ');
        tag.push_str(name);
        tag.push_str("=\"");
        tag.push_str(&escape_attr(value));
        tag.push('"');
    }
    tag.push('>');
    tag
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_ascii_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
    out
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
