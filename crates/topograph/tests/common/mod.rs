//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

/// Write `content` to `relative` below `dir`, creating parent directories.
pub fn write_file(dir: &Path, relative: &str, content: &str) {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create directory");
    }
    fs::write(&path, content).expect("Failed to write file");
}

/// Run the topograph binary in `dir` with colors disabled.
pub fn run_topograph_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_topograph"))
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute topograph binary")
}

pub const SHOP_CONFIG: &str = "\
projectName: Shop
appDefinitionsPaths:
  - definitions
subViews:
  - name: checkout
    included-applications: [payment, checkout]
appOverrides:
  - name: payment
    group: core/payments
    add-dependencies:
      - reference: ledger
  - name: unknown
    title: Nobody
";

/// A project tree exercising every loader path:
///
/// - nested directories, walked in sorted order
/// - `.yml` and `.yaml` files, the deprecated list format
/// - ignored non-YAML files, hidden entries and `*.git` directories
///
/// Loading order is checkout, payment, stock, db, ledger, storefront.
pub fn shop_project() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let root = temp.path();

    write_file(root, "topograph.yml", SHOP_CONFIG);
    write_file(
        root,
        "definitions/storefront.yml",
        "name: storefront\ngroup: edge\ndependencies:\n  - reference: checkout.orders\n",
    );
    write_file(
        root,
        "definitions/core/checkout.yml",
        "\
name: checkout
title: Checkout
group: core/sales
provided-services:
  - name: orders
    dependencies:
      - reference: payment.api
dependencies:
  - reference: stock
",
    );
    write_file(
        root,
        "definitions/core/payment.yaml",
        "name: payment\nprovided-services:\n  - name: api\n    isOpenHost: true\n",
    );
    write_file(
        root,
        "definitions/core/stock.yml",
        "name: stock\ngroup: core/sales\ndependencies:\n  - reference: db\n",
    );
    write_file(
        root,
        "definitions/legacy.yml",
        "applications:\n  - name: db\n  - name: ledger\n    dependencies:\n      - reference: db\n",
    );
    write_file(root, "definitions/README.md", "# Definitions\n");
    write_file(root, "definitions/.git/HEAD", "ref: refs/heads/main\n");
    write_file(root, "definitions/archive.git/ghost.yml", "name: ghost\n");

    temp
}

/// A three-application cycle: a -> b -> c -> a.
pub fn cyclic_project() -> TempDir {
    let temp = TempDir::new().expect("Failed to create temp directory");
    let root = temp.path();

    write_file(root, "topograph.yml", "projectName: Loop\nappDefinitionsPaths: [apps]\n");
    write_file(root, "apps/a.yml", "name: a\ndependencies:\n  - reference: b\n");
    write_file(root, "apps/b.yml", "name: b\ndependencies:\n  - reference: c\n");
    write_file(root, "apps/c.yml", "name: c\ndependencies:\n  - reference: a\n");

    temp
}
