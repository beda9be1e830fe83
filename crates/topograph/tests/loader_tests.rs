//! Integration tests for loading projects from disk.

use rstest::{fixture, rstest};
use std::path::Path;
use tempfile::TempDir;
use topograph::{Error, ProjectLoader};
use topograph_core::{detect_cycles, validate};

mod common;
use common::{shop_project, write_file};

// ============================================================================
// Test Fixtures
// ============================================================================

#[fixture]
fn shop() -> TempDir {
    shop_project()
}

#[fixture]
fn temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

fn load(root: &Path, sub_view: Option<&str>) -> topograph::Result<topograph_core::Project> {
    ProjectLoader::default().load_project_from_config_file(&root.join("topograph.yml"), sub_view)
}

fn names(project: &topograph_core::Project) -> Vec<&str> {
    project.applications.iter().map(|a| a.name.as_str()).collect()
}

// ============================================================================
// Loading
// ============================================================================

#[rstest]
fn test_loads_in_sorted_walk_order(shop: TempDir) {
    let project = load(shop.path(), None).unwrap();

    assert_eq!(project.name, "Shop");
    assert_eq!(
        names(&project),
        vec!["checkout", "payment", "stock", "db", "ledger", "storefront"]
    );
    let ids: Vec<usize> = project.applications.iter().map(|a| a.id).collect();
    assert_eq!(ids, vec![1, 2, 3, 4, 5, 6]);
}

#[rstest]
fn test_loaded_project_is_valid_and_acyclic(shop: TempDir) {
    let project = load(shop.path(), None).unwrap();
    assert!(validate(&project).is_empty());
    assert!(detect_cycles(&project).is_empty());
}

#[rstest]
fn test_overrides_are_applied(shop: TempDir) {
    let project = load(shop.path(), None).unwrap();
    let payment = project.find_application("payment").unwrap();

    assert_eq!(payment.group, "core/payments");
    assert_eq!(payment.dependencies.len(), 1);
    assert_eq!(payment.dependencies[0].reference, "ledger");
    // only the named application changes
    assert_eq!(project.find_application("checkout").unwrap().group, "core/sales");
}

#[rstest]
fn test_sub_view_keeps_loading_order_and_renumbers(shop: TempDir) {
    let project = load(shop.path(), Some("checkout")).unwrap();

    assert_eq!(names(&project), vec!["checkout", "payment"]);
    assert_eq!(project.applications[1].id, 2);
    // the sub-view cuts edges to stock and ledger
    assert_eq!(validate(&project).len(), 2);
}

#[rstest]
fn test_empty_sub_view_name_means_everything(shop: TempDir) {
    assert_eq!(load(shop.path(), Some("")).unwrap().len(), 6);
}

#[rstest]
fn test_unknown_sub_view(shop: TempDir) {
    let err = load(shop.path(), Some("admin")).unwrap_err();
    assert!(matches!(err, Error::UnknownSubView(ref name) if name == "admin"));
}

#[rstest]
fn test_single_file_definition_path(temp_dir: TempDir) {
    let root = temp_dir.path();
    write_file(
        root,
        "topograph.yml",
        "projectName: One\nappDefinitionsPaths: [apps/only.yaml, more]\n",
    );
    write_file(root, "apps/only.yaml", "name: only\n");
    write_file(root, "more/next.yml", "name: next\ndependencies:\n  - reference: only\n");

    let project = load(root, None).unwrap();
    assert_eq!(names(&project), vec!["only", "next"]);
}

// ============================================================================
// Failures
// ============================================================================

#[rstest]
fn test_duplicate_across_files(temp_dir: TempDir) {
    let root = temp_dir.path();
    write_file(root, "topograph.yml", "appDefinitionsPaths: [apps]\n");
    write_file(root, "apps/a.yml", "name: shop\n");
    write_file(root, "apps/b.yml", "applications:\n  - name: shop\n");

    let err = load(root, None).unwrap_err();
    match err {
        Error::DuplicateApplication {
            name,
            first,
            second,
        } => {
            assert_eq!(name, "shop");
            assert!(first.ends_with("a.yml"));
            assert!(second.ends_with("b.yml"));
        }
        other => panic!("expected a duplicate error, got {other:?}"),
    }
}

#[rstest]
fn test_empty_directory(temp_dir: TempDir) {
    let root = temp_dir.path();
    write_file(root, "topograph.yml", "appDefinitionsPaths: [apps]\n");
    std::fs::create_dir_all(root.join("apps")).unwrap();
    write_file(root, "apps/.keep", "");

    assert!(matches!(
        load(root, None).unwrap_err(),
        Error::NoDefinitionFiles(_)
    ));
}

#[rstest]
fn test_missing_definition_path(temp_dir: TempDir) {
    let root = temp_dir.path();
    write_file(root, "topograph.yml", "appDefinitionsPaths: [nowhere]\n");

    assert!(matches!(load(root, None).unwrap_err(), Error::Io { .. }));
}

#[rstest]
fn test_explicit_non_yaml_file(temp_dir: TempDir) {
    let root = temp_dir.path();
    write_file(root, "topograph.yml", "appDefinitionsPaths: [apps.json]\n");
    write_file(root, "apps.json", "{}");

    assert!(matches!(
        load(root, None).unwrap_err(),
        Error::UnsupportedFileType(_)
    ));
}

#[rstest]
fn test_config_must_be_yaml(temp_dir: TempDir) {
    let path = temp_dir.path().join("topograph.json");
    std::fs::write(&path, "{}").unwrap();

    let err = ProjectLoader::default()
        .load_project_from_config_file(&path, None)
        .unwrap_err();
    assert!(matches!(err, Error::UnsupportedFileType(_)));
}

#[rstest]
fn test_malformed_definition_names_file(temp_dir: TempDir) {
    let root = temp_dir.path();
    write_file(root, "topograph.yml", "appDefinitionsPaths: [apps]\n");
    write_file(root, "apps/broken.yml", "name: [unclosed\n");

    let err = load(root, None).unwrap_err();
    assert!(matches!(err, Error::Yaml { .. }));
    assert!(err.to_string().contains("broken.yml"));
}

// ============================================================================
// Strict Mode
// ============================================================================

#[rstest]
#[case::strict(true, false)]
#[case::lenient(false, true)]
fn test_unknown_definition_key(temp_dir: TempDir, #[case] strict: bool, #[case] loads: bool) {
    let root = temp_dir.path();
    write_file(root, "topograph.yml", "appDefinitionsPaths: [apps]\n");
    write_file(root, "apps/a.yml", "name: a\nowner: platform-team\n");

    let result = ProjectLoader::new(strict)
        .load_project_from_config_file(&root.join("topograph.yml"), None);
    assert_eq!(result.is_ok(), loads);
    if let Err(err) = result {
        assert!(matches!(err, Error::Definition { .. }));
    }
}

#[rstest]
#[case::strict(true, false)]
#[case::lenient(false, true)]
fn test_invalid_sub_view_name(temp_dir: TempDir, #[case] strict: bool, #[case] loads: bool) {
    let root = temp_dir.path();
    write_file(
        root,
        "topograph.yml",
        "appDefinitionsPaths: [apps]\nsubViews:\n  - name: bad.name\n",
    );
    write_file(root, "apps/a.yml", "name: a\n");

    let result = ProjectLoader::new(strict)
        .load_project_from_config_file(&root.join("topograph.yml"), None);
    assert_eq!(result.is_ok(), loads);
}
