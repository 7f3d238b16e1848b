#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::Command;

use tempfile::TempDir;

pub const CLASSES: &str = "force-app/main/default/classes";

macro_rules! sfdx_delta {
    () => {
        assert_cmd::cargo::cargo_bin_cmd!("sfdx-delta")
    };
}
pub(crate) use sfdx_delta;

fn git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

pub fn write(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent dirs");
    }
    fs::write(path, content).expect("write file");
}

pub fn write_class(dir: &Path, name: &str) {
    write(
        dir,
        &format!("{CLASSES}/{name}.cls"),
        &format!("public with sharing class {name} {{\n}}\n"),
    );
    write(
        dir,
        &format!("{CLASSES}/{name}.cls-meta.xml"),
        &format!("<ApexClass><!-- {name} --><apiVersion>58.0</apiVersion></ApexClass>\n"),
    );
}

pub fn commit_all(dir: &Path, message: &str) {
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "-m", message]);
}

/// A repository with a baseline commit and a `.gitignore` for the staging
/// output.
pub fn create_repo() -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    git(dir.path(), &["init", "--initial-branch=main"]);
    git(dir.path(), &["config", "user.email", "test@example.com"]);
    git(dir.path(), &["config", "user.name", "Test"]);
    git(dir.path(), &["config", "commit.gpgsign", "false"]);

    write(
        dir.path(),
        "sfdx-project.json",
        r#"{"packageDirectories":[{"path":"force-app"}]}"#,
    );
    write(dir.path(), ".gitignore", "staging/\nmdapi/\n");
    commit_all(dir.path(), "Initial commit");
    dir
}

/// A repository whose last commit adds `names` with their descriptors.
pub fn create_repo_with_classes(names: &[&str]) -> TempDir {
    let dir = create_repo();
    for name in names {
        write_class(dir.path(), name);
    }
    commit_all(dir.path(), "Add classes");
    dir
}
