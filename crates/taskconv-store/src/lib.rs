//! Task Converter Storage Layer
//!
//! The boundary between descriptor files on disk and in-memory descriptors.
//!
//! # Core Operations
//!
//! - **Enumerate**: list courses and their tasks ([`TaskCatalog`])
//! - **Load**: find `task.<ext>` and decode it with the matching codec ([`DescriptorStore::load`])
//! - **Save**: encode and write back, optionally forcing another format ([`DescriptorStore::save`])
//!
//! # Architecture
//!
//! ```text
//! FsCatalog ─→ (course_id, task_id) ─→ DescriptorStore ─→ CodecRegistry ─→ Descriptor
//!                                            │               (yaml, json, rst)
//!                                            └─→ task.<ext> on disk
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use taskconv_store::{DescriptorStore, FsCatalog, TaskCatalog, CourseEntry, YAML_FORMAT};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store = DescriptorStore::new("/srv/tasks");
//! let catalog = FsCatalog::for_registry("/srv/tasks", store.codecs());
//!
//! for (course_id, course) in catalog.get_all_courses()? {
//!     for task_id in course.get_tasks()?.keys() {
//!         let descriptor = store.load(&course_id, task_id)?;
//!         store.save(&course_id, task_id, &descriptor, Some(YAML_FORMAT))?;
//!     }
//! }
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(unreachable_pub)]

pub mod catalog;
pub mod codecs;
pub mod error;
pub mod store;

// Re-exports for convenience
pub use catalog::{CourseEntry, FsCatalog, FsCourse, Task, TaskCatalog};
pub use codecs::{
    default_codecs, CodecRegistry, DescriptorCodec, JsonCodec, RstCodec, YamlCodec, YAML_FORMAT,
};
pub use error::{CatalogError, CodecError, StoreError};
pub use store::{DescriptorStore, COURSE_DESCRIPTOR_STEM, TASK_DESCRIPTOR_STEM};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use serde_json::json;
    use taskconv_markup::Descriptor;
    use tempfile::TempDir;

    #[test]
    fn catalog_and_store_agree_on_layout() {
        let dir = TempDir::new().unwrap();
        let task_dir = dir.path().join("c1").join("t1");
        std::fs::create_dir_all(&task_dir).unwrap();
        std::fs::write(dir.path().join("c1").join("course.yaml"), "name: C1\n").unwrap();
        std::fs::write(task_dir.join("task.rst"), "Task one\n========\n").unwrap();

        let store = DescriptorStore::new(dir.path());
        let catalog = FsCatalog::for_registry(dir.path(), store.codecs());

        let courses = catalog.get_all_courses().unwrap();
        let tasks = courses["c1"].get_tasks().unwrap();
        assert_eq!(tasks["t1"].path, store.task_dir("c1", "t1"));

        let descriptor = store.load("c1", "t1").unwrap();
        assert_eq!(serde_json::Value::Object(descriptor), json!({"name": "Task one"}));
    }

    #[test]
    fn every_codec_reads_its_own_output() {
        let descriptor = json!({
            "name": "Fork",
            "context": ".. raw:: html\n\n    <b>hi</b>",
            "problems": {"q1": {"type": "code", "header": "Write it"}}
        });
        let descriptor = descriptor.as_object().cloned().unwrap();

        let empty = Descriptor::new();

        for codec in default_codecs().iter() {
            let encoded = codec.serialize(&descriptor).unwrap();
            assert_eq!(codec.parse(&encoded).unwrap(), descriptor, "codec {}", codec.name());

            let encoded = codec.serialize(&empty).unwrap();
            assert_eq!(codec.parse(&encoded).unwrap(), empty, "codec {} (empty)", codec.name());
        }
    }
}
