//! Task Catalog - enumerate courses and their tasks
//!
//! Filesystem layout:
//!
//! ```text
//! <root>/<course_id>/course.<ext>
//! <root>/<course_id>/<task_id>/task.<ext>
//! ```
//!
//! Maps are `BTreeMap`s so every enumeration is in lexicographic id order.

use crate::codecs::CodecRegistry;
use crate::error::CatalogError;
use crate::store::{COURSE_DESCRIPTOR_STEM, TASK_DESCRIPTOR_STEM};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// One task as found by a catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    /// Owning course
    pub course_id: String,
    /// Task identifier, unique within the course
    pub task_id: String,
    /// Task directory
    pub path: PathBuf,
}

/// A course that can list its tasks
pub trait CourseEntry {
    /// Course identifier
    fn id(&self) -> &str;

    /// All tasks of the course, keyed by task id
    ///
    /// # Errors
    /// `CatalogError` if the course cannot be listed
    fn get_tasks(&self) -> Result<BTreeMap<String, Task>, CatalogError>;
}

/// Enumerates every course under a tasks root
pub trait TaskCatalog {
    /// Course type produced by this catalog
    type Course: CourseEntry;

    /// All courses, keyed by course id
    ///
    /// # Errors
    /// `CatalogError` if the root is missing or cannot be listed
    fn get_all_courses(&self) -> Result<BTreeMap<String, Self::Course>, CatalogError>;
}

/// Directory-backed catalog
#[derive(Debug, Clone)]
pub struct FsCatalog {
    root: PathBuf,
    extensions: Vec<String>,
}

impl FsCatalog {
    /// Create catalog recognizing descriptor files with the given extensions
    pub fn new<I, S>(root: impl Into<PathBuf>, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            root: root.into(),
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    /// Create catalog recognizing every extension of a codec registry
    #[must_use]
    pub fn for_registry(root: impl Into<PathBuf>, codecs: &CodecRegistry) -> Self {
        Self::new(root, codecs.all_extensions())
    }

    /// Tasks root directory
    #[inline]
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl TaskCatalog for FsCatalog {
    type Course = FsCourse;

    fn get_all_courses(&self) -> Result<BTreeMap<String, FsCourse>, CatalogError> {
        if !self.root.is_dir() {
            return Err(CatalogError::RootNotFound(self.root.clone()));
        }

        let mut courses = BTreeMap::new();
        for (id, path) in child_dirs(&self.root)? {
            if !has_descriptor(&path, COURSE_DESCRIPTOR_STEM, &self.extensions) {
                tracing::debug!(dir = %path.display(), "no course descriptor, skipping");
                continue;
            }
            let course = FsCourse {
                id: id.clone(),
                path,
                extensions: self.extensions.clone(),
            };
            courses.insert(id, course);
        }

        tracing::debug!(root = %self.root.display(), count = courses.len(), "courses found");
        Ok(courses)
    }
}

/// Course directory found by [`FsCatalog`]
#[derive(Debug, Clone)]
pub struct FsCourse {
    id: String,
    path: PathBuf,
    extensions: Vec<String>,
}

impl FsCourse {
    /// Course directory
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CourseEntry for FsCourse {
    fn id(&self) -> &str {
        &self.id
    }

    fn get_tasks(&self) -> Result<BTreeMap<String, Task>, CatalogError> {
        let mut tasks = BTreeMap::new();
        for (task_id, path) in child_dirs(&self.path)? {
            if has_descriptor(&path, TASK_DESCRIPTOR_STEM, &self.extensions) {
                let task = Task {
                    course_id: self.id.clone(),
                    task_id: task_id.clone(),
                    path,
                };
                tasks.insert(task_id, task);
            }
        }
        Ok(tasks)
    }
}

/// Visible subdirectories of `dir` with UTF-8 names
fn child_dirs(dir: &Path) -> Result<Vec<(String, PathBuf)>, CatalogError> {
    let entries = std::fs::read_dir(dir).map_err(|e| CatalogError::io_error(dir, e))?;

    let mut dirs = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| CatalogError::io_error(dir, e))?;
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let Ok(name) = entry.file_name().into_string() else {
            tracing::warn!(dir = %path.display(), "skipping directory with non UTF-8 name");
            continue;
        };
        if name.starts_with('.') {
            continue;
        }
        dirs.push((name, path));
    }
    Ok(dirs)
}

fn has_descriptor(dir: &Path, stem: &str, extensions: &[String]) -> bool {
    extensions
        .iter()
        .any(|ext| dir.join(format!("{stem}.{ext}")).is_file())
}
