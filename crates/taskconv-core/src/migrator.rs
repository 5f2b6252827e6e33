//! Migration driver
//!
//! Walks every task of every course, strictly in sequence:
//!
//! ```text
//! TaskCatalog ─→ (course, task) ─→ store.load ─→ normalize? ─→ store.save?
//! ```
//!
//! The first failure aborts the run. Tasks saved before it stay saved.

use crate::config::MigrationConfig;
use crate::error::MigrationError;
use std::path::PathBuf;
use taskconv_markup::{FragmentTidy, HtmlTidy, MarkupNormalizer, NormalizeReport};
use taskconv_store::{CourseEntry, DescriptorStore, FsCatalog, TaskCatalog};

/// Counters for a completed run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationSummary {
    /// Courses visited
    pub courses: usize,
    /// Tasks visited
    pub tasks: usize,
    /// `<X>IsHTML` flags removed
    pub flags_removed: usize,
    /// Fields rewritten as raw-html markup
    pub converted_fields: usize,
    /// Descriptors written back
    pub saved: usize,
}

impl MigrationSummary {
    fn record(&mut self, outcome: &TaskOutcome) {
        self.tasks += 1;
        self.flags_removed += outcome.report.flags_removed;
        self.converted_fields += outcome.report.fields_converted;
        if outcome.saved_to.is_some() {
            self.saved += 1;
        }
    }
}

impl std::fmt::Display for MigrationSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} tasks in {} courses: {} fields converted, {} flags removed, {} descriptors saved",
            self.tasks, self.courses, self.converted_fields, self.flags_removed, self.saved
        )
    }
}

/// Result of migrating one task
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskOutcome {
    /// Normalization counters (all zero without html deletion)
    pub report: NormalizeReport,
    /// File written, `None` on a dry run
    pub saved_to: Option<PathBuf>,
}

/// Sequential migration over a catalog
#[derive(Debug)]
pub struct Migrator<C, T> {
    config: MigrationConfig,
    store: DescriptorStore,
    catalog: C,
    normalizer: MarkupNormalizer<T>,
}

impl<C: TaskCatalog, T: HtmlTidy> Migrator<C, T> {
    /// Create migrator from its parts
    ///
    /// # Errors
    /// `MigrationError::Usage` if the configuration selects no operation
    pub fn new(
        config: MigrationConfig,
        store: DescriptorStore,
        catalog: C,
        tidy: T,
    ) -> Result<Self, MigrationError> {
        config.validate()?;
        Ok(Self {
            config,
            store,
            catalog,
            normalizer: MarkupNormalizer::new(tidy),
        })
    }

    /// Descriptor store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &DescriptorStore {
        &self.store
    }

    /// Migrate every task of every course
    ///
    /// # Errors
    /// - `MigrationError::Catalog` if courses or tasks cannot be listed
    /// - `MigrationError::Task` for the first task that fails
    pub fn run(&self) -> Result<MigrationSummary, MigrationError> {
        let mut summary = MigrationSummary::default();

        for course in self.catalog.get_all_courses()?.into_values() {
            tracing::info!(course = %course.id(), "processing course");
            summary.courses += 1;

            for task_id in course.get_tasks()?.keys() {
                let outcome = self.migrate_task(course.id(), task_id)?;
                summary.record(&outcome);
            }
        }

        tracing::info!(
            courses = summary.courses,
            tasks = summary.tasks,
            saved = summary.saved,
            "migration complete"
        );
        Ok(summary)
    }

    /// Migrate one task: load, normalize if enabled, save unless dry run
    ///
    /// # Errors
    /// `MigrationError::Task` wrapping the store or normalizer failure
    pub fn migrate_task(
        &self,
        course_id: &str,
        task_id: &str,
    ) -> Result<TaskOutcome, MigrationError> {
        tracing::info!(course = %course_id, task = %task_id, "processing task");

        let mut descriptor = self
            .store
            .load(course_id, task_id)
            .map_err(|e| MigrationError::task(course_id, task_id, e))?;

        let report = if self.config.delete_html {
            self.normalizer
                .normalize(&mut descriptor)
                .map_err(|e| MigrationError::task(course_id, task_id, e))?
        } else {
            NormalizeReport::default()
        };
        tracing::debug!(
            task = %task_id,
            flags_removed = report.flags_removed,
            fields_converted = report.fields_converted,
            "descriptor normalized"
        );

        if self.config.dry_run {
            tracing::info!(course = %course_id, task = %task_id, "dry run, not saving");
            return Ok(TaskOutcome {
                report,
                saved_to: None,
            });
        }

        let path = self
            .store
            .save(course_id, task_id, &descriptor, self.config.convert_to.as_deref())
            .map_err(|e| MigrationError::task(course_id, task_id, e))?;

        Ok(TaskOutcome {
            report,
            saved_to: Some(path),
        })
    }
}

impl Migrator<FsCatalog, FragmentTidy> {
    /// Create migrator over the filesystem layout under `config.tasks_root`
    ///
    /// # Errors
    /// `MigrationError::Usage` if the configuration selects no operation
    pub fn from_config(config: MigrationConfig) -> Result<Self, MigrationError> {
        let store = DescriptorStore::new(&config.tasks_root);
        let catalog = FsCatalog::for_registry(&config.tasks_root, store.codecs());
        Self::new(config, store, catalog, FragmentTidy::new())
    }
}

/// Run a full migration with the built-in codecs and tidy
///
/// # Errors
/// See [`Migrator::run`]; `MigrationError::Usage` before any I/O
pub fn migrate(config: MigrationConfig) -> Result<MigrationSummary, MigrationError> {
    Migrator::from_config(config)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use taskconv_markup::{TidyError, TidyOutput};
    use taskconv_store::{CatalogError, Task};
    use tempfile::TempDir;

    struct Passthrough;

    impl HtmlTidy for Passthrough {
        fn tidy_fragment(&self, html: &str) -> Result<TidyOutput, TidyError> {
            Ok(TidyOutput {
                html: html.to_string(),
                diagnostics: Vec::new(),
            })
        }
    }

    /// In-memory catalog listing fixed task ids
    struct ListCatalog(Vec<(&'static str, Vec<&'static str>)>);

    struct ListCourse {
        id: String,
        tasks: Vec<&'static str>,
    }

    impl CourseEntry for ListCourse {
        fn id(&self) -> &str {
            &self.id
        }

        fn get_tasks(&self) -> Result<BTreeMap<String, Task>, CatalogError> {
            Ok(self
                .tasks
                .iter()
                .map(|t| {
                    let task = Task {
                        course_id: self.id.clone(),
                        task_id: (*t).to_string(),
                        path: PathBuf::new(),
                    };
                    ((*t).to_string(), task)
                })
                .collect())
        }
    }

    impl TaskCatalog for ListCatalog {
        type Course = ListCourse;

        fn get_all_courses(&self) -> Result<BTreeMap<String, ListCourse>, CatalogError> {
            Ok(self
                .0
                .iter()
                .map(|(id, tasks)| {
                    let course = ListCourse {
                        id: (*id).to_string(),
                        tasks: tasks.clone(),
                    };
                    ((*id).to_string(), course)
                })
                .collect())
        }
    }

    fn write_task(root: &std::path::Path, course: &str, task: &str, file: &str, content: &str) {
        let dir = root.join(course).join(task);
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join(file), content).unwrap();
    }

    #[test]
    fn usage_error_without_operation() {
        let dir = TempDir::new().unwrap();
        let result = Migrator::new(
            MigrationConfig::new(dir.path()),
            DescriptorStore::new(dir.path()),
            ListCatalog(vec![]),
            Passthrough,
        );
        assert!(matches!(result, Err(MigrationError::Usage)));
    }

    #[test]
    fn migrate_task_converts_and_saves_in_place() {
        let dir = TempDir::new().unwrap();
        write_task(
            dir.path(),
            "c1",
            "t1",
            "task.json",
            r#"{"contextIsHTML": true, "context": "<b>hi</b>"}"#,
        );

        let migrator = Migrator::new(
            MigrationConfig::new(dir.path()).with_delete_html(true),
            DescriptorStore::new(dir.path()),
            ListCatalog(vec![("c1", vec!["t1"])]),
            Passthrough,
        )
        .unwrap();

        let outcome = migrator.migrate_task("c1", "t1").unwrap();
        assert_eq!(outcome.report.fields_converted, 1);
        assert_eq!(outcome.saved_to, Some(dir.path().join("c1/t1/task.json")));

        let saved = migrator.store().load("c1", "t1").unwrap();
        assert_eq!(
            serde_json::Value::Object(saved),
            serde_json::json!({"context": ".. raw:: html\n\n    <b>hi</b>\n\n"})
        );
    }

    #[test]
    fn run_counts_courses_and_tasks() {
        let dir = TempDir::new().unwrap();
        write_task(dir.path(), "a", "t1", "task.yaml", "name: one\n");
        write_task(dir.path(), "a", "t2", "task.yaml", "name: two\ncontextIsHTML: false\n");
        write_task(dir.path(), "b", "t1", "task.json", r#"{"name": "three"}"#);

        let migrator = Migrator::new(
            MigrationConfig::new(dir.path()).with_delete_html(true),
            DescriptorStore::new(dir.path()),
            ListCatalog(vec![("a", vec!["t1", "t2"]), ("b", vec!["t1"])]),
            Passthrough,
        )
        .unwrap();

        let summary = migrator.run().unwrap();
        assert_eq!(
            summary,
            MigrationSummary {
                courses: 2,
                tasks: 3,
                flags_removed: 1,
                converted_fields: 0,
                saved: 3,
            }
        );
    }

    #[test]
    fn missing_task_aborts_with_context() {
        let dir = TempDir::new().unwrap();
        write_task(dir.path(), "c1", "t1", "task.yaml", "name: one\n");

        let migrator = Migrator::new(
            MigrationConfig::new(dir.path()).with_convert_yaml(true),
            DescriptorStore::new(dir.path()),
            ListCatalog(vec![("c1", vec!["t1", "t2"])]),
            Passthrough,
        )
        .unwrap();

        let err = migrator.run().unwrap_err();
        match err {
            MigrationError::Task { course_id, task_id, .. } => {
                assert_eq!((course_id.as_str(), task_id.as_str()), ("c1", "t2"));
            }
            other => panic!("expected task error, got {other:?}"),
        }
    }

    #[test]
    fn dry_run_saves_nothing() {
        let dir = TempDir::new().unwrap();
        let original = r#"{"contextIsHTML": true, "context": "<p>x</p>"}"#;
        write_task(dir.path(), "c1", "t1", "task.json", original);

        let migrator = Migrator::new(
            MigrationConfig::new(dir.path())
                .with_delete_html(true)
                .with_convert_yaml(true)
                .with_dry_run(true),
            DescriptorStore::new(dir.path()),
            ListCatalog(vec![("c1", vec!["t1"])]),
            Passthrough,
        )
        .unwrap();

        let summary = migrator.run().unwrap();
        assert_eq!(summary.converted_fields, 1);
        assert_eq!(summary.saved, 0);

        let path = dir.path().join("c1/t1/task.json");
        assert_eq!(std::fs::read_to_string(path).unwrap(), original);
        assert!(!dir.path().join("c1/t1/task.yaml").exists());
    }

    #[test]
    fn summary_display() {
        let summary = MigrationSummary {
            courses: 1,
            tasks: 2,
            flags_removed: 3,
            converted_fields: 2,
            saved: 2,
        };
        assert_eq!(
            summary.to_string(),
            "2 tasks in 1 courses: 2 fields converted, 3 flags removed, 2 descriptors saved"
        );
    }
}
