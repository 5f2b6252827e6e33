//! Error types for descriptor storage
//!
//! Provides error handling for:
//! - Codec operations (bytes ↔ descriptor)
//! - Store operations (load/save of one task's descriptor)
//! - Catalog enumeration (courses and tasks on disk)

use std::path::PathBuf;

/// Errors raised by a [`DescriptorCodec`](crate::codecs::DescriptorCodec)
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Content is not valid for this format
    #[error("{codec} syntax error: {message}")]
    Syntax {
        /// Codec name
        codec: &'static str,
        /// Parser message
        message: String,
    },

    /// Content parsed but is not a descriptor mapping
    #[error("{codec} shape error: {message}")]
    Shape {
        /// Codec name
        codec: &'static str,
        /// What was wrong
        message: String,
    },

    /// Descriptor cannot be written in this format
    #[error("{codec} serialization failed: {message}")]
    Serialize {
        /// Codec name
        codec: &'static str,
        /// What was wrong
        message: String,
    },
}

impl CodecError {
    /// Create syntax error for codec
    pub fn syntax(codec: &'static str, message: impl Into<String>) -> Self {
        Self::Syntax {
            codec,
            message: message.into(),
        }
    }

    /// Create shape error for codec
    pub fn shape(codec: &'static str, message: impl Into<String>) -> Self {
        Self::Shape {
            codec,
            message: message.into(),
        }
    }

    /// Create serialization error for codec
    pub fn serialize(codec: &'static str, message: impl Into<String>) -> Self {
        Self::Serialize {
            codec,
            message: message.into(),
        }
    }
}

/// Errors during descriptor load/save
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// No descriptor file exists for the task
    #[error("no descriptor for task {course_id}/{task_id} in {dir}")]
    NotFound {
        /// Course identifier
        course_id: String,
        /// Task identifier
        task_id: String,
        /// Directory searched
        dir: PathBuf,
    },

    /// Descriptor file could not be decoded
    #[error("cannot parse {path}: {source}")]
    Parse {
        /// Descriptor file
        path: PathBuf,
        /// Codec failure
        #[source]
        source: CodecError,
    },

    /// Forced format names no registered codec
    #[error("unsupported descriptor format: '{0}'")]
    UnsupportedFormat(String),

    /// Descriptor could not be encoded in the target format
    #[error("cannot serialize descriptor for {path}: {source}")]
    Serialize {
        /// Descriptor file being saved
        path: PathBuf,
        /// Codec failure
        #[source]
        source: CodecError,
    },

    /// IO error during descriptor read
    #[error("io error reading {path}: {source}")]
    Read {
        /// Descriptor file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// IO error during descriptor write or removal
    #[error("io error writing {path}: {source}")]
    Write {
        /// Descriptor file
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Create read error for path
    pub fn read_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Create write error for path
    pub fn write_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }
}

/// Errors while enumerating courses and tasks
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Tasks root directory does not exist
    #[error("tasks directory not found: {0}")]
    RootNotFound(PathBuf),

    /// IO error while listing a directory
    #[error("io error listing {path}: {source}")]
    Io {
        /// Directory being listed
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl CatalogError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
