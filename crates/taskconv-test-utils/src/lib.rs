//! Testing utilities for the task converter workspace
//!
//! Shared fixtures: temporary task trees and tidy doubles.

#![allow(missing_docs)]

use serde_json::Value;
use std::path::{Path, PathBuf};
use taskconv_markup::{HtmlTidy, TidyError, TidyOutput};
use tempfile::TempDir;

/// Temporary `<root>/<course>/<task>/task.<ext>` tree
pub struct TaskTree {
    dir: TempDir,
}

impl TaskTree {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Create a course directory with a `course.yaml`
    pub fn course(&self, course_id: &str) -> &Self {
        let dir = self.root().join(course_id);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("course.yaml"), format!("name: {course_id}\n")).unwrap();
        self
    }

    /// Write a raw task descriptor file, creating the course if needed
    pub fn task_file(&self, course_id: &str, task_id: &str, file: &str, content: &str) -> PathBuf {
        if !self.root().join(course_id).join("course.yaml").exists() {
            self.course(course_id);
        }
        let dir = self.task_dir(course_id, task_id);
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(file);
        std::fs::write(&path, content).unwrap();
        path
    }

    /// Write a descriptor as pretty JSON in `task.json`
    pub fn json_task(&self, course_id: &str, task_id: &str, descriptor: &Value) -> PathBuf {
        let content = serde_json::to_string_pretty(descriptor).unwrap();
        self.task_file(course_id, task_id, "task.json", &content)
    }

    pub fn task_dir(&self, course_id: &str, task_id: &str) -> PathBuf {
        self.root().join(course_id).join(task_id)
    }

    /// File names inside a task directory, sorted
    pub fn files(&self, course_id: &str, task_id: &str) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(self.task_dir(course_id, task_id))
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    pub fn read(&self, course_id: &str, task_id: &str, file: &str) -> String {
        std::fs::read_to_string(self.task_dir(course_id, task_id).join(file)).unwrap()
    }
}

impl Default for TaskTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Tidy double returning its input unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughTidy;

impl HtmlTidy for PassthroughTidy {
    fn tidy_fragment(&self, html: &str) -> Result<TidyOutput, TidyError> {
        Ok(TidyOutput {
            html: html.to_string(),
            diagnostics: Vec::new(),
        })
    }
}

/// Tidy double that can never run
#[derive(Debug, Clone, Copy, Default)]
pub struct FailingTidy;

impl HtmlTidy for FailingTidy {
    fn tidy_fragment(&self, _html: &str) -> Result<TidyOutput, TidyError> {
        Err(TidyError::Unavailable("tidy disabled in tests".to_string()))
    }
}
