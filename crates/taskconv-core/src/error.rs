//! Error types for the migration driver
//!
//! Every failure aborts the run. Task-level failures carry the task they
//! happened on; nothing saved before the failure is rolled back.

use taskconv_markup::NormalizeError;
use taskconv_store::{CatalogError, StoreError};

/// Exit status for a usage error
pub const EXIT_USAGE: i32 = 1;

/// Exit status for any other failure
pub const EXIT_FAILURE: i32 = 2;

/// Main migration error type
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// No operation selected
    #[error("no operation selected: enable html deletion or format conversion")]
    Usage,

    /// Courses or tasks could not be enumerated
    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// Processing one task failed
    #[error("task {course_id}/{task_id}: {source}")]
    Task {
        /// Course identifier
        course_id: String,
        /// Task identifier
        task_id: String,
        /// What went wrong
        #[source]
        source: TaskError,
    },
}

impl MigrationError {
    /// Wrap a task failure with its identity
    pub fn task(course_id: &str, task_id: &str, source: impl Into<TaskError>) -> Self {
        Self::Task {
            course_id: course_id.to_string(),
            task_id: task_id.to_string(),
            source: source.into(),
        }
    }

    /// Process exit status for this error
    #[inline]
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Usage => EXIT_USAGE,
            _ => EXIT_FAILURE,
        }
    }
}

/// Failure while processing one task
#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    /// Descriptor load or save failed
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Markup normalization failed
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
}
