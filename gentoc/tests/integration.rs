use gentoc::{Toc, TocItem};
use predicates::prelude::*;
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_gentoc")))
}

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// `gentoc` over the fixture docs, writing `<dir>/toc.yml`.
fn gentoc(dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cmd();
    cmd.arg("-r")
        .arg(fixture_path("resources"))
        .arg("-m")
        .arg(fixture_path("mapping.json"))
        .arg("--terms-override")
        .arg(fixture_path("terms.json"))
        .arg("-t")
        .arg(dir.path().join("toc.yml"));
    cmd
}

fn names(items: &[TocItem]) -> Vec<&str> {
    items.iter().map(|i| i.name.as_deref().unwrap_or_default()).collect()
}

fn section(dir: &TempDir, slug: &str) -> Toc {
    Toc::load(&dir.path().join("toc").join(slug).join("toc.yml")).unwrap()
}

// -- generation --

#[test]
fn root_toc_links_to_section_tocs() {
    let dir = TempDir::new().unwrap();
    gentoc(&dir)
        .assert()
        .success()
        .stderr(predicate::str::contains("Found 5 resource documents."))
        .stderr(predicate::str::contains("TOC generation complete."));

    let root = Toc::load(&dir.path().join("toc.yml")).unwrap();
    assert_eq!(names(&root.items), vec!["Users", "Groups and settings"]);
    assert_eq!(root.items[0].href.as_deref(), Some("toc/users/toc.yml"));
    assert_eq!(root.items[0].items, None);
    assert_eq!(
        root.items[1].href.as_deref(),
        Some("toc/groups-and-settings/toc.yml")
    );
    assert_eq!(root.items[1].display_name.as_deref(), Some("groups"));
}

#[test]
fn users_section_lists_methods_by_heading() {
    let dir = TempDir::new().unwrap();
    gentoc(&dir).assert().success();

    let users = section(&dir, "users");
    assert_eq!(
        names(&users.items),
        vec!["Overview", "Best practices", "User", "Password profile"]
    );
    assert_eq!(users.items[0].href.as_deref(), Some("../../concepts/users.md"));
    assert_eq!(users.items[1].href.as_deref(), Some("/graph/best-practices"));

    let user = &users.items[2];
    assert_eq!(user.display_name, None);
    assert_eq!(names(user.children()), vec!["User", "User management", "Photos"]);
    assert_eq!(user.children()[0].href.as_deref(), Some("../../resources/user.md"));
    assert_eq!(names(user.children()[1].children()), vec!["List users", "Get user"]);
    assert_eq!(
        user.children()[2].children()[0].href.as_deref(),
        Some("../../api/profilephoto-get.md")
    );

    let profile = &users.items[3];
    assert_eq!(profile.href.as_deref(), Some("../../resources/passwordprofile.md"));
    assert_eq!(profile.items, None);
    assert_eq!(profile.display_name.as_deref(), Some("password, credentials"));
}

#[test]
fn sorted_section_with_included_node_and_complex_types() {
    let dir = TempDir::new().unwrap();
    gentoc(&dir).assert().success();

    let groups = section(&dir, "groups-and-settings");
    assert_eq!(
        names(&groups.items),
        vec!["CORS configuration v2", "Devices", "Group", "Complex types"]
    );

    let devices = &groups.items[1];
    assert_eq!(names(devices.children()), vec!["Managed devices"]);
    assert_eq!(
        names(devices.children()[0].children()),
        vec!["Managed devices", "Get managedDevice"]
    );

    let group = &groups.items[2];
    assert_eq!(
        names(group.children()),
        vec!["Overview", "Group", "Get group", "Delete group"]
    );
    assert_eq!(
        group.children()[0].href.as_deref(),
        Some("../concepts/groups-overview.md")
    );

    assert_eq!(names(groups.items[3].children()), vec!["Password profile"]);
}

#[test]
fn unresolved_resource_is_logged_and_skipped() {
    let dir = TempDir::new().unwrap();
    gentoc(&dir)
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "Could not find resource document for microsoft.graph.ghost",
        ));
}

#[test]
fn static_toc_receives_generated_sections() {
    let dir = TempDir::new().unwrap();
    gentoc(&dir)
        .arg("-s")
        .arg(fixture_path("static-toc.yml"))
        .assert()
        .success();

    let root = Toc::load(&dir.path().join("toc.yml")).unwrap();
    assert_eq!(names(&root.items), vec!["Overview", "API v1.0 reference"]);
    assert_eq!(
        names(root.items[1].children()),
        vec!["Overview", "Users", "Groups and settings"]
    );
}

#[test]
fn validate_links_warns_about_missing_targets() {
    let dir = TempDir::new().unwrap();
    gentoc(&dir)
        .arg("--validate-links")
        .assert()
        .success()
        .stderr(predicate::str::contains("Invalid method link"))
        .stderr(predicate::str::contains("../api/user-list.md"))
        .stderr(predicate::str::contains("../api/user-get.md").not());
}

#[test]
fn log_file_receives_output() {
    let dir = TempDir::new().unwrap();
    let log = dir.path().join("gentoc.log");
    gentoc(&dir).arg("-l").arg(&log).assert().success();

    let content = fs::read_to_string(&log).unwrap();
    assert!(content.contains("TOC generation complete."));
    assert!(!content.contains('\u{1b}'));
}

// -- failures --

#[test]
fn missing_mapping_fails_without_output() {
    let dir = TempDir::new().unwrap();
    cmd()
        .arg("-r")
        .arg(fixture_path("resources"))
        .arg("-m")
        .arg(dir.path().join("missing.json"))
        .arg("-t")
        .arg(dir.path().join("toc.yml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid mapping file"));

    assert!(!dir.path().join("toc.yml").exists());
    assert!(!dir.path().join("toc").exists());
}

#[test]
fn malformed_terms_override_fails() {
    let dir = TempDir::new().unwrap();
    let terms = dir.path().join("terms.json");
    fs::write(&terms, "[{ \"term\": ").unwrap();

    cmd()
        .arg("-r")
        .arg(fixture_path("resources"))
        .arg("-m")
        .arg(fixture_path("mapping.json"))
        .arg("--terms-override")
        .arg(&terms)
        .arg("-t")
        .arg(dir.path().join("toc.yml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid terms override file"));

    assert!(!dir.path().join("toc.yml").exists());
}

#[test]
fn missing_resource_folder_fails() {
    let dir = TempDir::new().unwrap();
    cmd()
        .arg("-r")
        .arg(dir.path().join("nope"))
        .arg("-m")
        .arg(fixture_path("mapping.json"))
        .arg("-t")
        .arg(dir.path().join("toc.yml"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read resource docs folder"));
}

#[test]
fn required_args() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("--resource-docs"));
}
