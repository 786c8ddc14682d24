use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn cmd() -> assert_cmd::Command {
    assert_cmd::Command::from(Command::new(env!("CARGO_BIN_EXE_toc-scan")))
}

fn docs() -> TempDir {
    let dir = TempDir::new().unwrap();
    let api = dir.path().join("api");
    let resources = dir.path().join("resources");
    let toc = dir.path().join("toc").join("users");
    fs::create_dir_all(&api).unwrap();
    fs::create_dir_all(&resources).unwrap();
    fs::create_dir_all(&toc).unwrap();

    for file in ["user-get.md", "user-list.md", "group-get.md"] {
        fs::write(api.join(file), "").unwrap();
    }
    for file in ["user.md", "group.md"] {
        fs::write(resources.join(file), "").unwrap();
    }
    fs::write(
        toc.join("toc.yml"),
        "items:\n- name: User\n  items:\n  - name: User\n    href: ../../resources/user.md\n  - name: Get user\n    href: ../../api/user-get.md\n",
    )
    .unwrap();
    fs::write(
        dir.path().join("toc.yml"),
        "items:\n- name: Users\n  href: toc/users/toc.yml\n- name: List users\n  href: api/user-list.md\n",
    )
    .unwrap();
    dir
}

#[test]
fn reports_unreferenced_docs() {
    let dir = docs();
    let output = dir.path().join("files.txt");

    cmd()
        .arg("-a")
        .arg(dir.path().join("api"))
        .arg("-r")
        .arg(dir.path().join("resources"))
        .arg("-t")
        .arg(dir.path())
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "1 of 2 resource documents not found in any TOC.",
        ))
        .stdout(predicate::str::contains(
            "1 of 3 api documents not found in any TOC.",
        ));

    assert_eq!(fs::read_to_string(&output).unwrap(), "group.md\ngroup-get.md\n");
}

#[test]
fn default_output_is_in_working_directory() {
    let dir = docs();
    cmd()
        .current_dir(dir.path())
        .args(["-a", "api", "-r", "resources", "-t", "."])
        .assert()
        .success();

    assert!(dir.path().join("files.txt").is_file());
}

#[test]
fn missing_folder_fails() {
    let dir = docs();
    cmd()
        .arg("-a")
        .arg(dir.path().join("nope"))
        .arg("-r")
        .arg(dir.path().join("resources"))
        .arg("-t")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read directory"));
}
