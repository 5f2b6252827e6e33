//! Task Converter
//!
//! One-shot migration of a tasks directory: every task descriptor is loaded,
//! its `<X>IsHTML` flags are consumed, and it is saved back, optionally
//! rewritten as YAML.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────┐    ┌─────────────────┐    ┌──────────────────┐
//! │  FsCatalog    │ ─→ │ DescriptorStore │ ─→ │ MarkupNormalizer │
//! │ (enumerate)   │    │  load / save    │    │  (--delete-html) │
//! └───────────────┘    └─────────────────┘    └──────────────────┘
//!                            ↑     │
//!                            └─────┘ save, forcing yaml on --convert-yaml
//! ```
//!
//! Processing is sequential and stops at the first failure. Descriptors
//! saved before the failure keep their new content.
//!
//! # Example
//!
//! ```rust,no_run
//! use taskconv_core::{migrate, MigrationConfig};
//!
//! let config = MigrationConfig::new("/srv/tasks")
//!     .with_delete_html(true)
//!     .with_convert_yaml(true);
//!
//! let summary = migrate(config)?;
//! println!("{summary}");
//! # Ok::<(), taskconv_core::MigrationError>(())
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod cli;
pub mod config;
pub mod error;
pub mod migrator;

// Re-exports for convenience
pub use config::MigrationConfig;
pub use error::{MigrationError, TaskError, EXIT_FAILURE, EXIT_USAGE};
pub use migrator::{migrate, MigrationSummary, Migrator, TaskOutcome};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
