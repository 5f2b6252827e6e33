use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use taskconv_core::{migrate, MigrationConfig, MigrationError, Migrator, TaskError};
use taskconv_markup::NormalizeError;
use taskconv_store::{DescriptorStore, FsCatalog, StoreError};
use taskconv_test_utils::{FailingTidy, PassthroughTidy, TaskTree};

fn passthrough_migrator(tree: &TaskTree, config: MigrationConfig) -> Migrator<FsCatalog, PassthroughTidy> {
    let store = DescriptorStore::new(tree.root());
    let catalog = FsCatalog::for_registry(tree.root(), store.codecs());
    Migrator::new(config, store, catalog, PassthroughTidy).unwrap()
}

fn load(tree: &TaskTree, course_id: &str, task_id: &str) -> Value {
    let descriptor = DescriptorStore::new(tree.root()).load(course_id, task_id).unwrap();
    Value::Object(descriptor)
}

#[test]
fn test_convert_yaml_replaces_json_descriptor() {
    let tree = TaskTree::new();
    let original = json!({
        "name": "Fork bomb",
        "contextIsHTML": true,
        "context": "<b>hi</b>",
        "limits": {"time": 30, "memory": 100}
    });
    tree.json_task("LSINF1252", "fork", &original);

    let summary = migrate(MigrationConfig::new(tree.root()).with_convert_yaml(true)).unwrap();

    assert_eq!(summary.courses, 1);
    assert_eq!(summary.tasks, 1);
    assert_eq!(summary.saved, 1);
    assert_eq!(tree.files("LSINF1252", "fork"), vec!["task.yaml"]);
    assert_eq!(load(&tree, "LSINF1252", "fork"), original);
}

#[test]
fn test_delete_html_converts_all_four_locations() {
    let tree = TaskTree::new();
    tree.json_task(
        "c1",
        "t1",
        &json!({
            "contextIsHTML": true,
            "context": "<b>hi</b>",
            "problems": {
                "p1": {
                    "headerIsHTML": false,
                    "header": "plain",
                    "choices": [
                        {"textIsHTML": true, "text": "<i>a</i>"},
                        {"text": "b"}
                    ],
                    "boxes": {"box1": {"contentIsHTML": true}}
                }
            }
        }),
    );

    let migrator = passthrough_migrator(&tree, MigrationConfig::new(tree.root()).with_delete_html(true));
    let summary = migrator.run().unwrap();

    assert_eq!(summary.flags_removed, 4);
    assert_eq!(summary.converted_fields, 3);
    assert_eq!(tree.files("c1", "t1"), vec!["task.json"]);
    assert_eq!(
        load(&tree, "c1", "t1"),
        json!({
            "context": ".. raw:: html\n\n    <b>hi</b>\n\n",
            "problems": {
                "p1": {
                    "header": "plain",
                    "choices": [
                        {"text": ".. raw:: html\n\n    <i>a</i>\n\n"},
                        {"text": "b"}
                    ],
                    "boxes": {"box1": {"content": ".. raw:: html\n\n    \n\n"}}
                }
            }
        })
    );
}

#[test]
fn test_delete_html_with_builtin_tidy() {
    let tree = TaskTree::new();
    tree.json_task(
        "c1",
        "t1",
        &json!({"contextIsHTML": true, "context": "<ul><li>a<li>b</ul>"}),
    );

    migrate(
        MigrationConfig::new(tree.root())
            .with_delete_html(true)
            .with_convert_yaml(true),
    )
    .unwrap();

    assert_eq!(
        load(&tree, "c1", "t1"),
        json!({"context": ".. raw:: html\n\n    <ul>\n      <li>a</li>\n      <li>b</li>\n    </ul>\n\n"})
    );
}

#[test]
fn test_second_delete_html_pass_is_noop() {
    let tree = TaskTree::new();
    tree.json_task("c1", "t1", &json!({"contextIsHTML": true, "context": "<b>hi</b>"}));
    let config = MigrationConfig::new(tree.root()).with_delete_html(true);

    passthrough_migrator(&tree, config.clone()).run().unwrap();
    let first = tree.read("c1", "t1", "task.json");

    let summary = passthrough_migrator(&tree, config).run().unwrap();
    assert_eq!(summary.flags_removed, 0);
    assert_eq!(tree.read("c1", "t1", "task.json"), first);
}

#[test]
fn test_usage_error_touches_nothing() {
    let tree = TaskTree::new();
    let path = tree.task_file("c1", "t1", "task.json", r#"{"contextIsHTML": true}"#);

    let err = migrate(MigrationConfig::new(tree.root())).unwrap_err();
    assert!(matches!(err, MigrationError::Usage));
    assert_eq!(err.exit_code(), 1);
    assert_eq!(std::fs::read_to_string(path).unwrap(), r#"{"contextIsHTML": true}"#);

    // Validation happens before the root is even looked at
    let err = migrate(MigrationConfig::new(tree.root().join("missing"))).unwrap_err();
    assert!(matches!(err, MigrationError::Usage));
}

#[test]
fn test_first_failure_aborts_without_rollback() {
    let tree = TaskTree::new();
    tree.json_task("a", "t1", &json!({"name": "first"}));
    tree.task_file("b", "t1", "task.json", "{broken");
    tree.json_task("c", "t1", &json!({"name": "never reached"}));

    let err = migrate(MigrationConfig::new(tree.root()).with_convert_yaml(true)).unwrap_err();

    match &err {
        MigrationError::Task {
            course_id,
            task_id,
            source: TaskError::Store(StoreError::Parse { .. }),
        } => {
            assert_eq!(course_id, "b");
            assert_eq!(task_id, "t1");
        }
        other => panic!("expected parse failure on b/t1, got {other:?}"),
    }
    assert_eq!(err.exit_code(), 2);

    assert_eq!(tree.files("a", "t1"), vec!["task.yaml"]);
    assert_eq!(tree.files("b", "t1"), vec!["task.json"]);
    assert_eq!(tree.files("c", "t1"), vec!["task.json"]);
}

#[test]
fn test_tidy_failure_is_fatal() {
    let tree = TaskTree::new();
    let original = r#"{"contextIsHTML": true, "context": "<b>x</b>"}"#;
    tree.task_file("c1", "t1", "task.json", original);

    let store = DescriptorStore::new(tree.root());
    let catalog = FsCatalog::for_registry(tree.root(), store.codecs());
    let migrator = Migrator::new(
        MigrationConfig::new(tree.root()).with_delete_html(true),
        store,
        catalog,
        FailingTidy,
    )
    .unwrap();

    let err = migrator.run().unwrap_err();
    assert!(matches!(
        err,
        MigrationError::Task {
            source: TaskError::Normalize(NormalizeError::Tidy(_)),
            ..
        }
    ));
    assert_eq!(tree.read("c1", "t1", "task.json"), original);
}

#[test]
fn test_non_string_flagged_field_is_shape_error() {
    let tree = TaskTree::new();
    tree.json_task(
        "c1",
        "t1",
        &json!({"problems": {"p1": {"headerIsHTML": true, "header": 42}}}),
    );

    let migrator = passthrough_migrator(&tree, MigrationConfig::new(tree.root()).with_delete_html(true));
    let err = migrator.run().unwrap_err();

    assert!(matches!(
        err,
        MigrationError::Task {
            source: TaskError::Normalize(NormalizeError::Shape(_)),
            ..
        }
    ));
    assert!(err.to_string().contains("problems.p1.header"));
}

#[test]
fn test_dry_run_writes_nothing() {
    let tree = TaskTree::new();
    tree.json_task("c1", "t1", &json!({"contextIsHTML": true, "context": "<b>hi</b>"}));
    let before = tree.read("c1", "t1", "task.json");

    let summary = migrate(
        MigrationConfig::new(tree.root())
            .with_delete_html(true)
            .with_convert_yaml(true)
            .with_dry_run(true),
    )
    .unwrap();

    assert_eq!(summary.tasks, 1);
    assert_eq!(summary.converted_fields, 1);
    assert_eq!(summary.saved, 0);
    assert_eq!(tree.files("c1", "t1"), vec!["task.json"]);
    assert_eq!(tree.read("c1", "t1", "task.json"), before);
}

#[test]
fn test_rst_descriptor_converted_to_yaml() {
    let tree = TaskTree::new();
    tree.task_file(
        "c1",
        "t1",
        "task.rst",
        "Fork bomb\n=========\n\n:author: \"Jane\"\n\nWrite a fork bomb.\n\n.. problem:: q1\n    :type: \"code\"\n\n    Paste it.\n",
    );

    migrate(MigrationConfig::new(tree.root()).with_convert_yaml(true)).unwrap();

    assert_eq!(tree.files("c1", "t1"), vec!["task.yaml"]);
    assert_eq!(
        load(&tree, "c1", "t1"),
        json!({
            "name": "Fork bomb",
            "author": "Jane",
            "context": "Write a fork bomb.",
            "problems": {"q1": {"type": "code", "header": "Paste it."}}
        })
    );
}

#[test]
fn test_rst_task_emptied_by_delete_html_survives_rerun() {
    let tree = TaskTree::new();
    tree.task_file("c1", "t1", "task.rst", ":contextIsHTML: false\n");
    let config = MigrationConfig::new(tree.root()).with_delete_html(true);

    let summary = migrate(config.clone()).unwrap();
    assert_eq!(summary.flags_removed, 1);
    assert_eq!(tree.read("c1", "t1", "task.rst"), "");

    migrate(config).unwrap();
    assert_eq!(load(&tree, "c1", "t1"), json!({}));
}

#[test]
fn test_directories_without_descriptors_are_ignored() {
    let tree = TaskTree::new();
    tree.json_task("c1", "t1", &json!({"name": "task"}));
    std::fs::create_dir_all(tree.root().join("c1").join("$common")).unwrap();
    std::fs::create_dir_all(tree.root().join("no-course").join("t1")).unwrap();
    std::fs::write(tree.root().join("no-course").join("t1").join("task.json"), "{}").unwrap();

    let summary = migrate(MigrationConfig::new(tree.root()).with_convert_yaml(true)).unwrap();
    assert_eq!(summary.courses, 1);
    assert_eq!(summary.tasks, 1);
    assert_eq!(tree.files("no-course", "t1"), vec!["task.json"]);
}

#[test]
fn test_missing_root_is_catalog_error() {
    let tree = TaskTree::new();
    let err = migrate(MigrationConfig::new(tree.root().join("nope")).with_delete_html(true)).unwrap_err();
    assert!(matches!(err, MigrationError::Catalog(_)));
    assert_eq!(err.exit_code(), 2);
}
