//! End-to-end runs of the `uac` binary against a temporary database.

use std::path::Path;
use std::process::{Command, Output};

use tempfile::{TempDir, tempdir};

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: tempdir().unwrap(),
        }
    }

    fn db(&self) -> std::path::PathBuf {
        self.dir.path().join("users.json")
    }

    fn run(&self, args: &[&str]) -> Output {
        let config = self.dir.path().join("settings.toml");
        Command::new(env!("CARGO_BIN_EXE_uac"))
            .arg("--color")
            .arg("never")
            .arg("--config")
            .arg(&config)
            .arg("--db")
            .arg(self.db())
            .args(args)
            .env_remove("RUST_LOG")
            .output()
            .unwrap()
    }

    fn create(&self, name: &str, email: &str) -> Output {
        self.run(&["create", "--full-name", name, "--email", email])
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn user_count(db: &Path) -> usize {
    let text = std::fs::read_to_string(db).unwrap();
    text.matches("\"fullName\"").count()
}

#[test]
fn create_persists_and_list_shows_user() {
    let ws = Workspace::new();
    let created = ws.create("Ann Lee", "ann@example.com");
    assert!(created.status.success(), "{}", stderr(&created));
    assert_eq!(user_count(&ws.db()), 1);

    let listed = ws.run(&["list"]);
    assert!(listed.status.success(), "{}", stderr(&listed));
    let out = stdout(&listed);
    assert!(out.contains("Ann Lee"));
    assert!(out.contains("query: (defaults)"));
}

#[test]
fn invalid_form_reports_every_field_and_exits_1() {
    let ws = Workspace::new();
    let output = ws.create("   ", "not-an-email");

    assert_eq!(output.status.code(), Some(1));
    let err = stderr(&output);
    assert!(err.contains("Full name: This field is required"), "{err}");
    assert!(err.contains("Email: Invalid email address"), "{err}");
    assert!(!ws.db().exists());
}

#[test]
fn misspelled_status_is_rejected_before_writing() {
    let ws = Workspace::new();
    let output = ws.run(&[
        "create",
        "--full-name",
        "Ann Lee",
        "--email",
        "ann@example.com",
        "--status",
        "blokced",
    ]);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("blokced"));
    assert!(!ws.db().exists());
}

#[test]
fn search_replay_settles_into_query() {
    let ws = Workspace::new();
    ws.create("Ann Lee", "ann@example.com");
    ws.create("Bob Stone", "bob@example.com");

    let output = ws.run(&["search", "a", "an", "ann", "--query", "page=3"]);
    assert!(output.status.success(), "{}", stderr(&output));
    let out = stdout(&output);
    assert!(out.contains("query: search=ann"), "{out}");
    assert!(out.contains("Ann Lee"));
    assert!(!out.contains("Bob Stone"));
}

#[test]
fn update_keeps_unspecified_fields() {
    let ws = Workspace::new();
    ws.create("Ann Lee", "ann@example.com");

    let output = ws.run(&["update", "1", "--status", "blocked"]);
    assert!(output.status.success(), "{}", stderr(&output));

    let shown = stdout(&ws.run(&["show", "1"]));
    assert!(shown.contains("ann@example.com"));
    assert!(shown.contains("blocked"));
}

#[test]
fn unknown_user_is_an_error() {
    let ws = Workspace::new();
    let output = ws.run(&["show", "7"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("User 7 not found"));
}
