//! Markup normalizer
//!
//! Consumes `<X>IsHTML` flags at four fixed descriptor locations:
//!
//! | location                     | flag            | field     |
//! |------------------------------|-----------------|-----------|
//! | top level                    | `contextIsHTML` | `context` |
//! | `problems.<id>`              | `headerIsHTML`  | `header`  |
//! | `problems.<id>.choices[<n>]` | `textIsHTML`    | `text`    |
//! | `problems.<id>.boxes.<id>`   | `contentIsHTML` | `content` |
//!
//! A flag is always removed once seen. Only a truthy flag converts its field.

use crate::error::{NormalizeError, ShapeError};
use crate::raw::embed_as_raw_markup;
use crate::tidy::HtmlTidy;
use crate::value::{as_mapping_mut, is_truthy, join_path, mapping_mut, sequence_mut, Descriptor};
use serde_json::Value;

/// The (flag, field) pairs handled by [`MarkupNormalizer::normalize`], outermost first
pub const HTML_FIELDS: [(&str, &str); 4] = [
    ("contextIsHTML", "context"),
    ("headerIsHTML", "header"),
    ("textIsHTML", "text"),
    ("contentIsHTML", "content"),
];

/// What [`MarkupNormalizer::convert_field`] did to a scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOutcome {
    /// No flag in scope; nothing touched
    FlagAbsent,
    /// Falsy flag removed; field not inspected
    FlagCleared,
    /// Truthy flag removed; field rewritten as raw-html markup
    Converted,
}

/// Counters for one normalized descriptor
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeReport {
    /// Flags removed (truthy and falsy)
    pub flags_removed: usize,
    /// Fields rewritten as raw-html markup
    pub fields_converted: usize,
}

impl NormalizeReport {
    fn record(&mut self, outcome: FieldOutcome) {
        match outcome {
            FieldOutcome::FlagAbsent => {}
            FieldOutcome::FlagCleared => self.flags_removed += 1,
            FieldOutcome::Converted => {
                self.flags_removed += 1;
                self.fields_converted += 1;
            }
        }
    }

    /// True if the descriptor was modified
    #[inline]
    #[must_use]
    pub fn changed(&self) -> bool {
        self.flags_removed > 0
    }
}

/// Rewrites HTML-flagged fields of a descriptor in place
#[derive(Debug, Clone, Default)]
pub struct MarkupNormalizer<T> {
    tidy: T,
}

impl<T: HtmlTidy> MarkupNormalizer<T> {
    /// Create normalizer around a tidy collaborator
    #[inline]
    #[must_use]
    pub fn new(tidy: T) -> Self {
        Self { tidy }
    }

    /// Consume `flag` from `scope`, converting `field` when the flag was truthy
    ///
    /// The flag is removed whatever its value. With a falsy flag `field` is left
    /// alone and never inspected. With a truthy flag an absent or falsy `field`
    /// is converted as the empty string. `path` locates `scope` in error messages.
    ///
    /// # Errors
    /// - `NormalizeError::Shape` if the flagged field holds a truthy non-string
    /// - `NormalizeError::Tidy` if the tidy step cannot run
    pub fn convert_field(
        &self,
        flag: &str,
        field: &str,
        scope: &mut Descriptor,
        path: &str,
    ) -> Result<FieldOutcome, NormalizeError> {
        let Some(flag_value) = scope.shift_remove(flag) else {
            return Ok(FieldOutcome::FlagAbsent);
        };

        if !is_truthy(&flag_value) {
            return Ok(FieldOutcome::FlagCleared);
        }

        let html = match scope.get(field) {
            None => "",
            Some(value) if !is_truthy(value) => "",
            Some(Value::String(text)) => text.as_str(),
            Some(other) => {
                return Err(ShapeError::new(join_path(path, field), "string", other).into());
            }
        };

        let converted = embed_as_raw_markup(&self.tidy, html)?;
        tracing::debug!("converted {}", join_path(path, field));
        scope.insert(field.to_string(), Value::String(converted));
        Ok(FieldOutcome::Converted)
    }

    /// Consume every HTML flag of a descriptor
    ///
    /// Absent containers (`problems`, `choices`, `boxes`) are skipped. Each
    /// entry is handled independently of its siblings.
    ///
    /// # Errors
    /// - `NormalizeError::Shape` if a container or entry has the wrong shape
    /// - `NormalizeError::Tidy` if the tidy step cannot run
    pub fn normalize(&self, data: &mut Descriptor) -> Result<NormalizeReport, NormalizeError> {
        let mut report = NormalizeReport::default();
        let [context, header, text, content] = HTML_FIELDS;

        report.record(self.convert_field(context.0, context.1, data, "")?);

        let Some(problems) = mapping_mut(data, "problems", "")? else {
            return Ok(report);
        };

        for (problem_id, problem) in problems.iter_mut() {
            let problem_path = join_path("problems", problem_id);
            let problem = as_mapping_mut(problem, &problem_path)?;

            report.record(self.convert_field(header.0, header.1, problem, &problem_path)?);

            if let Some(choices) = sequence_mut(problem, "choices", &problem_path)? {
                for (index, choice) in choices.iter_mut().enumerate() {
                    let choice_path = format!("{problem_path}.choices.{index}");
                    let choice = as_mapping_mut(choice, &choice_path)?;
                    report.record(self.convert_field(text.0, text.1, choice, &choice_path)?);
                }
            }

            if let Some(boxes) = mapping_mut(problem, "boxes", &problem_path)? {
                for (box_id, entry) in boxes.iter_mut() {
                    let box_path = format!("{problem_path}.boxes.{box_id}");
                    let entry = as_mapping_mut(entry, &box_path)?;
                    report.record(self.convert_field(content.0, content.1, entry, &box_path)?);
                }
            }
        }

        Ok(report)
    }
}
