//! Migration configuration

use crate::error::MigrationError;
use std::path::PathBuf;
use taskconv_store::YAML_FORMAT;

/// What one run does, built from the command line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationConfig {
    /// Root directory holding one subdirectory per course
    pub tasks_root: PathBuf,
    /// Consume `<X>IsHTML` flags and convert flagged fields
    pub delete_html: bool,
    /// Codec every saved descriptor is rewritten with
    pub convert_to: Option<String>,
    /// Load and normalize, but never save
    pub dry_run: bool,
}

impl MigrationConfig {
    /// Create configuration for a tasks root with no operation selected
    #[inline]
    #[must_use]
    pub fn new(tasks_root: impl Into<PathBuf>) -> Self {
        Self {
            tasks_root: tasks_root.into(),
            ..Self::default()
        }
    }

    /// With flag removal and HTML conversion
    #[inline]
    #[must_use]
    pub fn with_delete_html(mut self, enabled: bool) -> Self {
        self.delete_html = enabled;
        self
    }

    /// With forced conversion to YAML
    #[inline]
    #[must_use]
    pub fn with_convert_yaml(mut self, enabled: bool) -> Self {
        self.convert_to = enabled.then(|| YAML_FORMAT.to_string());
        self
    }

    /// With forced conversion to any registered codec
    #[inline]
    #[must_use]
    pub fn with_convert_to(mut self, format: impl Into<String>) -> Self {
        self.convert_to = Some(format.into());
        self
    }

    /// With dry run
    #[inline]
    #[must_use]
    pub fn with_dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// True if at least one operation is selected
    #[inline]
    #[must_use]
    pub fn has_operation(&self) -> bool {
        self.delete_html || self.convert_to.is_some()
    }

    /// Check the configuration before any file is touched
    ///
    /// # Errors
    /// `MigrationError::Usage` if neither operation is selected
    pub fn validate(&self) -> Result<(), MigrationError> {
        if self.has_operation() {
            Ok(())
        } else {
            Err(MigrationError::Usage)
        }
    }
}

impl Default for MigrationConfig {
    fn default() -> Self {
        Self {
            tasks_root: PathBuf::from("."),
            delete_html: false,
            convert_to: None,
            dry_run: false,
        }
    }
}
