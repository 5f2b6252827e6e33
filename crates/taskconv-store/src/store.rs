//! Descriptor Store - load and save one task's descriptor
//!
//! The store is the only component that reads or writes descriptor files.
//! It resolves the file for a task by trying every registered codec
//! extension in registry order, and picks the codec from the extension.

use crate::codecs::{default_codecs, CodecRegistry, DescriptorCodec};
use crate::error::{CodecError, StoreError};
use std::path::{Path, PathBuf};
use taskconv_markup::Descriptor;

/// File stem of every task descriptor (`task.yaml`, `task.json`, ...)
pub const TASK_DESCRIPTOR_STEM: &str = "task";

/// File stem of every course descriptor
pub const COURSE_DESCRIPTOR_STEM: &str = "course";

/// Loads and saves task descriptors under a tasks root
///
/// One instance is built per run and handed to the driver; the codec
/// registry is fixed once the first task is processed.
#[derive(Debug)]
pub struct DescriptorStore {
    /// Root directory holding one subdirectory per course
    root: PathBuf,
    /// Codecs tried in order for reading and writing
    codecs: CodecRegistry,
}

impl DescriptorStore {
    /// Create store with the built-in codecs
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_codecs(root, default_codecs())
    }

    /// Create store with a specific codec registry
    #[must_use]
    pub fn with_codecs(root: impl Into<PathBuf>, codecs: CodecRegistry) -> Self {
        Self {
            root: root.into(),
            codecs,
        }
    }

    /// Add a codec after the registered ones
    pub fn register_codec<C: DescriptorCodec>(&mut self, codec: C) {
        self.codecs.register(codec);
    }

    /// Registered codecs
    #[inline]
    #[must_use]
    pub fn codecs(&self) -> &CodecRegistry {
        &self.codecs
    }

    /// Tasks root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of one task
    #[must_use]
    pub fn task_dir(&self, course_id: &str, task_id: &str) -> PathBuf {
        self.root.join(course_id).join(task_id)
    }

    /// Find the descriptor file of a task
    ///
    /// The first existing `task.<ext>`, in registry order, wins.
    ///
    /// # Errors
    /// `StoreError::NotFound` if no registered extension matches a file
    pub fn locate(
        &self,
        course_id: &str,
        task_id: &str,
    ) -> Result<(PathBuf, &dyn DescriptorCodec), StoreError> {
        let dir = self.task_dir(course_id, task_id);
        for codec in self.codecs.iter() {
            for ext in codec.extensions() {
                let candidate = dir.join(format!("{TASK_DESCRIPTOR_STEM}.{ext}"));
                if candidate.is_file() {
                    return Ok((candidate, codec));
                }
            }
        }
        Err(StoreError::NotFound {
            course_id: course_id.to_string(),
            task_id: task_id.to_string(),
            dir,
        })
    }

    /// Load a task's descriptor
    ///
    /// # Errors
    /// - `StoreError::NotFound` if the task has no descriptor file
    /// - `StoreError::Read` if the file cannot be read
    /// - `StoreError::Parse` if the codec rejects the content
    pub fn load(&self, course_id: &str, task_id: &str) -> Result<Descriptor, StoreError> {
        let (path, codec) = self.locate(course_id, task_id)?;
        read_descriptor(&path, codec)
    }

    /// Save a task's descriptor, returning the written file
    ///
    /// # Arguments
    /// * `force_format` - codec name or extension to rewrite the file with;
    ///   `None` keeps the current codec and file
    ///
    /// The descriptor is serialized before any file is touched. With a forced
    /// format the result is always `task.<canonical ext>`; a file with any
    /// other name is removed before the new one is written.
    ///
    /// # Errors
    /// - `StoreError::NotFound` if the task has no descriptor file
    /// - `StoreError::UnsupportedFormat` if `force_format` names no codec
    /// - `StoreError::Serialize` if the codec cannot encode the descriptor
    /// - `StoreError::Write` on removal or write failure
    pub fn save(
        &self,
        course_id: &str,
        task_id: &str,
        descriptor: &Descriptor,
        force_format: Option<&str>,
    ) -> Result<PathBuf, StoreError> {
        let (current, current_codec) = self.locate(course_id, task_id)?;

        let target_codec = match force_format {
            Some(format) => self
                .codecs
                .find_by_name(format)
                .ok_or_else(|| StoreError::UnsupportedFormat(format.to_string()))?,
            None => current_codec,
        };

        let content = target_codec
            .serialize(descriptor)
            .map_err(|source| StoreError::Serialize {
                path: current.clone(),
                source,
            })?;

        let target = match force_format {
            Some(_) => current.with_extension(target_codec.canonical_extension()),
            None => current.clone(),
        };
        if target != current {
            std::fs::remove_file(&current).map_err(|e| StoreError::write_error(&current, e))?;
            tracing::info!(
                from = %current.display(),
                to = %target.display(),
                codec = target_codec.name(),
                "replacing descriptor file"
            );
        }

        std::fs::write(&target, content).map_err(|e| StoreError::write_error(&target, e))?;
        tracing::debug!(path = %target.display(), "descriptor saved");
        Ok(target)
    }
}

/// Read and decode a located descriptor file
fn read_descriptor(path: &Path, codec: &dyn DescriptorCodec) -> Result<Descriptor, StoreError> {
    let bytes = std::fs::read(path).map_err(|e| StoreError::read_error(path, e))?;
    let content = String::from_utf8(bytes).map_err(|e| StoreError::Parse {
        path: path.to_path_buf(),
        source: CodecError::syntax(codec.name(), format!("invalid UTF-8: {e}")),
    })?;
    codec.parse(&content).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })
}
