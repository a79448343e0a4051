// Integration tests for the `raci` binary.
// Run with: cargo test -p raci-cli --test cli_tests -- --nocapture

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// A scratch directory with its own settings file, so tests never touch the
/// user's config directory.
struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self::with_settings("{}")
    }

    fn with_settings(settings: &str) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("settings.json"), settings).expect("write settings");
        Workspace { dir }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    fn raci(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_raci"));
        cmd.current_dir(self.dir.path())
            .arg("--config")
            .arg(self.path("settings.json"))
            .env_remove("RACI_THEME")
            .env_remove("RUST_LOG");
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.raci().args(args).output().expect("run raci")
    }

    fn show_json(&self, file: &str) -> serde_json::Value {
        let output = self.run(&["show", file, "--json"]);
        assert!(output.status.success(), "show failed: {}", stderr(&output));
        serde_json::from_slice(&output.stdout).expect("valid JSON")
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn code(output: &Output) -> i32 {
    output.status.code().unwrap_or(-1)
}

fn exists(path: &Path) -> bool {
    path.is_file()
}

// ---------------------------------------------------------------------------
// new
// ---------------------------------------------------------------------------

#[test]
fn new_writes_document_and_siblings() {
    let ws = Workspace::new();
    let output = ws.run(&["new", "plan.html", "--title", "Launch"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("created"));

    assert!(exists(&ws.path("plan.html")));
    assert!(exists(&ws.path("plan.xlsx")));
    assert!(exists(&ws.path("plan.svg")));

    let json = ws.show_json("plan.html");
    assert_eq!(json["title"], "Launch");
    assert_eq!(json["rows"], 1);
    assert_eq!(json["cols"], 1);
}

#[test]
fn new_refuses_to_overwrite_without_force() {
    let ws = Workspace::new();
    assert!(ws.run(&["new", "plan.html"]).status.success());
    ws.run(&["add-row", "plan.html"]);

    let output = ws.run(&["new", "plan.html"]);
    assert_eq!(code(&output), 2);
    assert!(stderr(&output).contains("--force"));
    assert_eq!(ws.show_json("plan.html")["rows"], 2);

    let output = ws.run(&["new", "plan.html", "--force"]);
    assert!(output.status.success());
    assert_eq!(ws.show_json("plan.html")["rows"], 1);
}

#[test]
fn no_exports_flag_skips_siblings() {
    let ws = Workspace::new();
    assert!(ws.run(&["--no-exports", "new", "plan.html"]).status.success());
    assert!(exists(&ws.path("plan.html")));
    assert!(!exists(&ws.path("plan.xlsx")));
    assert!(!exists(&ws.path("plan.svg")));
}

#[test]
fn settings_control_sibling_exports() {
    let ws = Workspace::with_settings(
        r#"{
    // only the spreadsheet
    "export.svgOnSave": false
}"#,
    );
    assert!(ws.run(&["new", "plan.html"]).status.success());
    assert!(exists(&ws.path("plan.xlsx")));
    assert!(!exists(&ws.path("plan.svg")));
}

// ---------------------------------------------------------------------------
// Editing session
// ---------------------------------------------------------------------------

#[test]
fn edit_session_builds_matrix() {
    let ws = Workspace::new();
    let steps: &[&[&str]] = &[
        &["--no-exports", "new", "plan.html", "--title", "Launch"],
        &["--no-exports", "add-col", "plan.html", "--label", "Alice"],
        &["--no-exports", "add-col", "plan.html", "--label", "Bob"],
        &["--no-exports", "add-row", "plan.html", "--label", "Design"],
        &["--no-exports", "cycle", "plan.html", "1", "1"],
        &["--no-exports", "cycle", "plan.html", "1", "2", "--times", "4"],
    ];
    for step in steps {
        let output = ws.run(step);
        assert!(output.status.success(), "{:?}: {}", step, stderr(&output));
    }

    let json = ws.show_json("plan.html");
    assert_eq!(json["values"][0], serde_json::json!(["Launch", "Alice", "Bob"]));
    assert_eq!(json["values"][1], serde_json::json!(["Design", "Responsible", "Informed"]));
    assert_eq!(json["styles"][1], serde_json::json!([null, "danger", "success"]));

    let html = fs::read_to_string(ws.path("plan.html")).unwrap();
    assert!(html.contains("<td class=\"danger\">Responsible</td>"));
}

#[test]
fn cycle_reports_new_role() {
    let ws = Workspace::new();
    ws.run(&["--no-exports", "new", "plan.html"]);
    ws.run(&["--no-exports", "add-row", "plan.html"]);
    ws.run(&["--no-exports", "add-col", "plan.html"]);
    ws.run(&["--no-exports", "set", "plan.html", "1", "1", "tbd"]);

    // Unrecognised text advances as if blank
    let output = ws.run(&["--no-exports", "cycle", "plan.html", "1", "1"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output).trim(), "(1,1) = \"Responsible\"");
}

#[test]
fn move_and_delete() {
    let ws = Workspace::new();
    ws.run(&["--no-exports", "new", "plan.html"]);
    for _ in 0..3 {
        ws.run(&["--no-exports", "add-row", "plan.html"]);
    }
    ws.run(&["--no-exports", "add-col", "plan.html"]);
    ws.run(&["--no-exports", "add-col", "plan.html"]);

    assert!(ws.run(&["--no-exports", "move-row", "plan.html", "3", "up"]).status.success());
    assert!(ws.run(&["--no-exports", "move-col", "plan.html", "1", "right"]).status.success());
    assert!(ws.run(&["--no-exports", "delete-row", "plan.html", "1"]).status.success());

    let json = ws.show_json("plan.html");
    let labels: Vec<&str> = json["values"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row[0].as_str().unwrap())
        .collect();
    assert_eq!(labels, vec!["TITLE", "ROW 3", "ROW 2"]);
    assert_eq!(json["values"][0][1], "COL 2");
    assert_eq!(json["values"][0][2], "COL 1");
}

#[test]
fn rejected_edit_is_a_notice_not_an_error() {
    let ws = Workspace::new();
    ws.run(&["--no-exports", "new", "plan.html"]);
    ws.run(&["--no-exports", "add-row", "plan.html"]);
    let before = fs::read(ws.path("plan.html")).unwrap();

    for args in [
        vec!["delete-row", "plan.html", "0"],
        vec!["delete-col", "plan.html", "0"],
        vec!["move-row", "plan.html", "1", "up"],
        vec!["cycle", "plan.html", "0", "0"],
        vec!["set", "plan.html", "7", "7", "x"],
    ] {
        let output = ws.run(&args);
        assert_eq!(code(&output), 0, "{:?}", args);
        assert!(stderr(&output).contains("nothing changed"), "{:?}", args);
    }
    assert_eq!(fs::read(ws.path("plan.html")).unwrap(), before);
}

// ---------------------------------------------------------------------------
// show
// ---------------------------------------------------------------------------

#[test]
fn show_expanded_lists_controls() {
    let ws = Workspace::new();
    ws.run(&["--no-exports", "new", "plan.html"]);
    ws.run(&["--no-exports", "add-row", "plan.html"]);
    ws.run(&["--no-exports", "add-row", "plan.html"]);

    let output = ws.run(&["show", "plan.html", "--expanded"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("ROW 1 | .vx"), "{}", text);
    assert!(text.contains("ROW 2 | ^.x"), "{}", text);

    let output = ws.run(&["show", "plan.html", "--expanded", "--json"]);
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["view"], "expanded");
    assert_eq!(json["controls"]["rows"][0]["up"], false);
}

#[test]
fn show_reads_hand_written_document() {
    let ws = Workspace::new();
    fs::write(
        ws.path("team.html"),
        r#"<html><head><title>Ops &amp; Support</title></head><body>
<table id="RACI"><tr><th></th><th>Ana</th></tr>
<tr><td>On-call</td><td>Accountable</td></tr></table></body></html>"#,
    )
    .unwrap();

    let json = ws.show_json("team.html");
    assert_eq!(json["title"], "Ops & Support");
    assert_eq!(json["values"][1][1], "Accountable");
    assert_eq!(json["styles"][1][1], "warning");
}

#[test]
fn show_without_table_exits_data_not_found() {
    let ws = Workspace::new();
    fs::write(ws.path("notes.html"), "<html><body><p>hello</p></body></html>").unwrap();
    let output = ws.run(&["show", "notes.html"]);
    assert_eq!(code(&output), 3);
    assert!(stderr(&output).contains("no RACI table"));
}

#[test]
fn ragged_table_exits_data_not_found() {
    let ws = Workspace::new();
    fs::write(
        ws.path("ragged.html"),
        "<table id=\"RACI\"><tr><th></th><th>A</th><th>B</th></tr><tr><td>x</td><td>Informed</td></tr></table>",
    )
    .unwrap();
    assert_eq!(code(&ws.run(&["show", "ragged.html"])), 3);
}

#[test]
fn missing_file_exits_io() {
    let ws = Workspace::new();
    let output = ws.run(&["show", "absent.html"]);
    assert_eq!(code(&output), 4);
}

// ---------------------------------------------------------------------------
// save-as / export
// ---------------------------------------------------------------------------

#[test]
fn save_as_copies_document() {
    let ws = Workspace::new();
    ws.run(&["--no-exports", "new", "plan.html", "--title", "Plan"]);
    let output = ws.run(&["--no-exports", "save-as", "plan.html", "copy.html"]);
    assert!(output.status.success());
    assert_eq!(ws.show_json("copy.html")["title"], "Plan");
}

#[test]
fn export_to_explicit_paths() {
    let ws = Workspace::new();
    ws.run(&["--no-exports", "new", "plan.html"]);
    ws.run(&["--no-exports", "add-col", "plan.html"]);

    let output = ws.run(&["export", "plan.html", "--svg", "out/matrix.svg"]);
    // Parent directory doesn't exist
    assert_eq!(code(&output), 4);

    fs::create_dir(ws.path("out")).unwrap();
    let output = ws.run(&["export", "plan.html", "--svg", "out/matrix.svg"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(exists(&ws.path("out/matrix.svg")));
    assert!(!exists(&ws.path("plan.xlsx")));

    let output = ws.run(&["export", "plan.html"]);
    assert!(output.status.success());
    assert!(exists(&ws.path("plan.xlsx")));
    assert!(exists(&ws.path("plan.svg")));
}

#[test]
fn document_named_like_an_export_survives_saves() {
    let ws = Workspace::new();
    let output = ws.run(&["new", "plan.svg", "--title", "Launch"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(exists(&ws.path("plan.xlsx")));

    assert!(ws.run(&["add-row", "plan.svg"]).status.success());
    let json = ws.show_json("plan.svg");
    assert_eq!(json["title"], "Launch");
    assert_eq!(json["rows"], 2);

    let output = ws.run(&["export", "plan.svg"]);
    assert!(output.status.success());
    assert_eq!(ws.show_json("plan.svg")["rows"], 2);
}

#[test]
fn export_over_document_is_refused() {
    let ws = Workspace::new();
    ws.run(&["--no-exports", "new", "plan.html"]);
    let output = ws.run(&["export", "plan.html", "--svg", "plan.html"]);
    assert_eq!(code(&output), 2);
    assert_eq!(ws.show_json("plan.html")["rows"], 1);
}

// ---------------------------------------------------------------------------
// Config and themes
// ---------------------------------------------------------------------------

#[test]
fn dark_theme_changes_palette() {
    let ws = Workspace::new();
    ws.run(&["--no-exports", "--theme", "dark", "new", "plan.html"]);
    let html = fs::read_to_string(ws.path("plan.html")).unwrap();
    assert!(html.contains("background: #e74c3c;"));
}

#[test]
fn themes_marks_current() {
    let ws = Workspace::with_settings(r#"{"theme.source": {"type": "Dark"}}"#);
    let output = ws.run(&["themes"]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("  Light"));
    assert!(text.contains("* Dark"));
}

#[test]
fn themes_use_persists_choice() {
    let ws = Workspace::new();
    let output = ws.run(&["themes", "--use", "dark"]);
    assert!(output.status.success(), "{}", stderr(&output));
    assert!(stdout(&output).contains("theme set to Dark"));
    assert!(stdout(&ws.run(&["themes"])).contains("* Dark"));

    ws.run(&["--no-exports", "new", "plan.html"]);
    let html = fs::read_to_string(ws.path("plan.html")).unwrap();
    assert!(html.contains("background: #e74c3c;"));
}

#[test]
fn themes_use_rejects_unreadable_file() {
    let ws = Workspace::new();
    let output = ws.run(&["themes", "--use", "missing-theme.json"]);
    assert_eq!(code(&output), 2);
    assert_eq!(fs::read_to_string(ws.path("settings.json")).unwrap(), "{}");
}

#[test]
fn broken_settings_file_is_an_error() {
    let ws = Workspace::with_settings("{ not json");
    let output = ws.run(&["themes"]);
    assert_eq!(code(&output), 1);
    assert!(stderr(&output).contains("invalid config"));
}
