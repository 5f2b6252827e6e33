//! Restructured-text flavored descriptor codec
//!
//! Document layout:
//!
//! ```text
//! Task title                      ← `name`
//! ==========
//!
//! :author: "Jane"                 ← other top-level keys, one JSON value per field
//! :limits: {"time":30}
//!
//! Context paragraphs...           ← `context`
//!
//! .. problem:: q1                 ← one directive per `problems` entry
//!     :type: "code"
//!
//!     Header paragraphs...        ← `header`
//! ```
//!
//! Text fields fall back to a JSON field whenever prose would not read back
//! identically. Trailing blank lines of prose are not kept. A blank document
//! is the empty descriptor.

use super::DescriptorCodec;
use crate::error::CodecError;
use serde_json::Value;
use taskconv_markup::Descriptor;

const CODEC: &str = "rst";
const PROBLEM_DIRECTIVE: &str = ".. problem::";
const INDENT: &str = "    ";

/// RST codec
#[derive(Debug, Clone, Copy, Default)]
pub struct RstCodec;

impl RstCodec {
    /// Create new RST codec
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl DescriptorCodec for RstCodec {
    fn name(&self) -> &'static str {
        CODEC
    }

    fn extensions(&self) -> &[&'static str] {
        &["rst"]
    }

    fn parse(&self, content: &str) -> Result<Descriptor, CodecError> {
        let lines: Vec<&str> = content.lines().collect();
        let mut descriptor = Descriptor::new();
        let mut idx = skip_blank(&lines, 0);

        if idx + 1 < lines.len() && is_title(lines[idx], lines[idx + 1]) {
            insert_unique(&mut descriptor, "name", Value::String(lines[idx].to_string()), idx)?;
            idx = skip_blank(&lines, idx + 2);
        }

        idx = parse_fields(&lines, idx, &mut descriptor, 0)?;
        idx = skip_blank(&lines, idx);

        let body_end = lines[idx..]
            .iter()
            .position(|l| l.starts_with(PROBLEM_DIRECTIVE))
            .map_or(lines.len(), |p| idx + p);
        if let Some(context) = prose(&lines[idx..body_end]) {
            insert_unique(&mut descriptor, "context", Value::String(context), idx)?;
        }
        idx = body_end;

        let mut problems = Descriptor::new();
        while idx < lines.len() {
            let line = lines[idx];
            if line.trim().is_empty() {
                idx += 1;
                continue;
            }
            let Some(problem_id) = line.strip_prefix(PROBLEM_DIRECTIVE).map(str::trim) else {
                return Err(syntax_at(idx, format!("unexpected content '{line}'")));
            };
            if problem_id.is_empty() {
                return Err(syntax_at(idx, "problem directive without id"));
            }
            let directive_line = idx;

            idx += 1;
            let start = idx;
            while idx < lines.len() && (lines[idx].trim().is_empty() || lines[idx].starts_with(INDENT)) {
                idx += 1;
            }
            let block: Vec<&str> = lines[start..idx]
                .iter()
                .map(|l| l.strip_prefix(INDENT).unwrap_or(""))
                .collect();

            let problem = parse_problem(&block, start)?;
            if problems.contains_key(problem_id) {
                return Err(syntax_at(directive_line, format!("duplicate problem '{problem_id}'")));
            }
            problems.insert(problem_id.to_string(), Value::Object(problem));
        }

        if !problems.is_empty() {
            insert_unique(&mut descriptor, "problems", Value::Object(problems), idx)?;
        }

        Ok(descriptor)
    }

    fn serialize(&self, descriptor: &Descriptor) -> Result<String, CodecError> {
        let mut out = String::new();

        let title = descriptor
            .get("name")
            .and_then(Value::as_str)
            .filter(|t| title_safe(t));
        let context = descriptor
            .get("context")
            .and_then(Value::as_str)
            .filter(|c| prose_safe(c));
        let problems = descriptor
            .get("problems")
            .and_then(Value::as_object)
            .filter(|p| problems_safe(p));

        if let Some(title) = title {
            out.push_str(title);
            out.push('\n');
            out.push_str(&"=".repeat(title.chars().count()));
            out.push_str("\n\n");
        }

        let mut wrote_fields = false;
        for (key, value) in descriptor {
            let as_prose = match key.as_str() {
                "name" => title.is_some(),
                "context" => context.is_some(),
                "problems" => problems.is_some(),
                _ => false,
            };
            if !as_prose {
                write_field(&mut out, "", key, value)?;
                wrote_fields = true;
            }
        }
        if wrote_fields {
            out.push('\n');
        }

        if let Some(context) = context {
            out.push_str(context.trim_end());
            out.push_str("\n\n");
        }

        for (problem_id, problem) in problems.into_iter().flatten() {
            let Value::Object(problem) = problem else {
                continue;
            };
            out.push_str(PROBLEM_DIRECTIVE);
            out.push(' ');
            out.push_str(problem_id);
            out.push('\n');

            let header = problem
                .get("header")
                .and_then(Value::as_str)
                .filter(|h| prose_safe(h));
            for (key, value) in problem {
                if key == "header" && header.is_some() {
                    continue;
                }
                write_field(&mut out, INDENT, key, value)?;
            }
            out.push('\n');

            if let Some(header) = header {
                for line in header.trim_end().split('\n') {
                    if !line.is_empty() {
                        out.push_str(INDENT);
                        out.push_str(line);
                    }
                    out.push('\n');
                }
                out.push('\n');
            }
        }

        Ok(out)
    }
}

fn syntax_at(line: usize, message: impl std::fmt::Display) -> CodecError {
    CodecError::syntax(CODEC, format!("line {}: {message}", line + 1))
}

fn insert_unique(
    descriptor: &mut Descriptor,
    key: &str,
    value: Value,
    line: usize,
) -> Result<(), CodecError> {
    if descriptor.contains_key(key) {
        return Err(syntax_at(line, format!("duplicate key '{key}'")));
    }
    descriptor.insert(key.to_string(), value);
    Ok(())
}

fn skip_blank(lines: &[&str], mut idx: usize) -> usize {
    while idx < lines.len() && lines[idx].trim().is_empty() {
        idx += 1;
    }
    idx
}

/// A line followed by an `=` underline at least as long
fn is_title(line: &str, underline: &str) -> bool {
    !line.trim().is_empty()
        && !line.starts_with(char::is_whitespace)
        && !line.starts_with(':')
        && !line.starts_with(".. ")
        && !line.chars().all(|c| c == '=')
        && underline.chars().count() >= line.chars().count()
        && underline.chars().all(|c| c == '=')
}

fn title_safe(title: &str) -> bool {
    !title.contains(['\n', '\r'])
        && title.trim() == title
        && is_title(title, &"=".repeat(title.chars().count()))
}

/// Text that reads back identically as a prose block (modulo trailing newlines)
fn prose_safe(text: &str) -> bool {
    let body = text.trim_end_matches('\n');
    if body.is_empty() || body.trim_end() != body || text.contains('\r') {
        return false;
    }
    if body.starts_with(char::is_whitespace) || body.starts_with(':') {
        return false;
    }
    let mut lines = body.split('\n');
    if let (Some(first), Some(second)) = (lines.next(), lines.next()) {
        if is_title(first, second) {
            return false;
        }
    }
    !body.split('\n').any(|l| l.starts_with(PROBLEM_DIRECTIVE))
}

fn problems_safe(problems: &Descriptor) -> bool {
    !problems.is_empty()
        && problems.iter().all(|(id, problem)| {
            problem.is_object()
                && !id.is_empty()
                && id.trim() == id
                && !id.contains(['\n', '\r'])
        })
}

fn write_field(out: &mut String, indent: &str, key: &str, value: &Value) -> Result<(), CodecError> {
    if key.is_empty() || key.trim() != key || key.contains([':', '\n', '\r']) {
        return Err(CodecError::serialize(
            CODEC,
            format!("key {key:?} cannot be written as a field"),
        ));
    }
    let encoded = serde_json::to_string(value).map_err(|e| CodecError::serialize(CODEC, e.to_string()))?;
    out.push_str(indent);
    out.push(':');
    out.push_str(key);
    out.push_str(": ");
    out.push_str(&encoded);
    out.push('\n');
    Ok(())
}

/// Parse `:key: value` lines starting at `idx`; returns the first non-field line
///
/// Values are JSON; anything that is not valid JSON is kept as a plain string.
fn parse_fields(
    lines: &[&str],
    mut idx: usize,
    scope: &mut Descriptor,
    line_offset: usize,
) -> Result<usize, CodecError> {
    while idx < lines.len() {
        let Some(rest) = lines[idx].strip_prefix(':') else {
            break;
        };
        let Some((key, raw)) = rest.split_once(':') else {
            return Err(syntax_at(line_offset + idx, "unterminated field name"));
        };
        if key.trim().is_empty() {
            return Err(syntax_at(line_offset + idx, "empty field name"));
        }
        let raw = raw.trim();
        let value = serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()));
        insert_unique(scope, key.trim(), value, line_offset + idx)?;
        idx += 1;
    }
    Ok(idx)
}

fn parse_problem(block: &[&str], line_offset: usize) -> Result<Descriptor, CodecError> {
    let mut problem = Descriptor::new();
    let idx = skip_blank(block, 0);
    let idx = parse_fields(block, idx, &mut problem, line_offset)?;
    let idx = skip_blank(block, idx);
    if let Some(header) = prose(&block[idx..]) {
        insert_unique(&mut problem, "header", Value::String(header), line_offset + idx)?;
    }
    Ok(problem)
}

/// Join prose lines, dropping surrounding blank lines
fn prose(lines: &[&str]) -> Option<String> {
    let start = lines.iter().position(|l| !l.trim().is_empty())?;
    let end = lines.iter().rposition(|l| !l.trim().is_empty())?;
    Some(lines[start..=end].join("\n"))
}
