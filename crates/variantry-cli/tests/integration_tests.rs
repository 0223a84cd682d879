//! Integration tests for the variantry binary.
//!
//! Every test runs against its own temporary store and config directory.

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo;
use predicates::prelude::*;
use serde_json::Value;
use tempfile::TempDir;

struct Workspace {
    dir: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn store(&self) -> PathBuf {
        self.path().join("store.json")
    }

    /// A command acting as the admin `root`.
    fn admin(&self) -> Command {
        self.as_user("root", "admin")
    }

    fn as_user(&self, user: &str, role: &str) -> Command {
        let mut cmd = self.bare();
        cmd.env("VARIANTRY__IDENTITY__USER", user)
            .env("VARIANTRY__IDENTITY__ROLE", role);
        cmd
    }

    fn bare(&self) -> Command {
        let mut cmd = cargo::cargo_bin_cmd!("variantry");
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join("config"))
            .env("XDG_DATA_HOME", self.path().join("data"))
            .env("VARIANTRY__STORE__PATH", self.store())
            .env("VARIANTRY__PREVIEW__OUTPUT_DIR", self.path().join("previews"))
            .env_remove("VARIANTRY__IDENTITY__USER")
            .env_remove("VARIANTRY__IDENTITY__ROLE")
            .env_remove("RUST_LOG")
            .env("NO_COLOR", "1");
        cmd
    }

    /// Run an admin command with JSON output and parse stdout.
    fn json(&self, args: &[&str]) -> Value {
        let output = self
            .admin()
            .args(["--output-format", "json"])
            .args(args)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "{args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).unwrap()
    }

    fn add_component(&self, id: &str, pricing: &str) {
        self.admin()
            .args(["component", "add", id, "--name", id, "--pricing", pricing])
            .assert()
            .success();
    }

    /// Create a version and return `(outcome, id, version_number)`.
    fn create(&self, component: &str, framework: &str, css: &str, preview: &str) -> (String, String, String) {
        let value = self.json(&[
            "version",
            "create",
            "--component",
            component,
            "--framework",
            framework,
            "--css",
            css,
            "--preview",
            preview,
        ]);
        (
            value["outcome"].as_str().unwrap().to_string(),
            value["version"]["id"].as_str().unwrap().to_string(),
            value["version"]["version_number"].as_str().unwrap().to_string(),
        )
    }
}

#[test]
fn test_help_flag() {
    Workspace::new()
        .bare()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage"))
        .stdout(predicate::str::contains("version"))
        .stdout(predicate::str::contains("variants"));
}

#[test]
fn test_version_flag() {
    Workspace::new()
        .bare()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_component_add_persists_store() {
    let ws = Workspace::new();
    ws.add_component("C1", "free");
    assert!(ws.store().exists());

    ws.bare()
        .args(["component", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("C1"))
        .stdout(predicate::str::contains("free"));
}

#[test]
fn test_version_numbers_follow_lineage() {
    let ws = Workspace::new();
    ws.add_component("C1", "free");

    let (_, _, first) = ws.create("C1", "react", "tailwind_v4", "<B1/>");
    let (_, _, second) = ws.create("C1", "react", "tailwind_v4", "<B2/>");
    let (outcome, _, third) = ws.create("C1", "react", "tailwind_v4", "<B3/>");
    assert_eq!(first, "1.0.0");
    assert_eq!(second, "1.0.1");
    assert_eq!((outcome.as_str(), third.as_str()), ("created", "1.0.2"));

    let (_, _, vue) = ws.create("C1", "vue", "tailwind_v4", "<B/>");
    assert_eq!(vue, "1.0.0");

    ws.bare()
        .args(["version", "next", "C1", "--framework", "react"])
        .assert()
        .success()
        .stdout(predicate::str::diff("1.0.3\n"));
}

#[test]
fn test_identical_create_is_unchanged() {
    let ws = Workspace::new();
    ws.add_component("C1", "free");

    let (_, id, _) = ws.create("C1", "svelte", "vanilla", "<Btn/>");
    let (outcome, same_id, number) = ws.create("C1", "svelte", "vanilla", "<Btn/>");
    assert_eq!(outcome, "unchanged");
    assert_eq!(same_id, id);
    assert_eq!(number, "1.0.0");
}

#[test]
fn test_create_from_file() {
    let ws = Workspace::new();
    ws.add_component("C1", "free");
    let draft = ws.path().join("draft.json");
    std::fs::write(
        &draft,
        r#"{
            "component_id": "C1",
            "framework": "angular",
            "css_framework": "tailwind_v3",
            "code_preview": "<app-btn></app-btn>",
            "dependencies": { "@angular/core": "^18" }
        }"#,
    )
    .unwrap();

    let value = ws.json(&["version", "create", "--file", draft.to_str().unwrap(), "--default"]);
    assert_eq!(value["outcome"], "created");
    assert_eq!(value["version"]["is_default"], true);
    assert_eq!(value["version"]["dependencies"]["@angular/core"], "^18");
}

#[test]
fn test_set_default_and_default_lookup() {
    let ws = Workspace::new();
    ws.add_component("C1", "free");
    let (_, react, _) = ws.create("C1", "react", "vanilla", "<A/>");
    let (_, _, _) = ws.create("C1", "vue", "vanilla", "<B/>");

    ws.admin()
        .args(["version", "set-default", &react])
        .assert()
        .success();

    let default = ws.json(&["version", "default", "C1"]);
    assert_eq!(default["id"], react.as_str());

    let stats = ws.json(&["version", "stats", "C1"]);
    assert_eq!(stats["total"], 2);
    assert_eq!(stats["default_version_id"], react.as_str());
}

#[test]
fn test_update_keeps_number() {
    let ws = Workspace::new();
    ws.add_component("C1", "free");
    let (_, id, _) = ws.create("C1", "html", "vanilla", "<button>a</button>");

    let updated = ws.json(&["version", "update", &id, "--preview", "<button>b</button>"]);
    assert_eq!(updated["id"], id.as_str());
    assert_eq!(updated["version_number"], "1.0.0");
    assert_eq!(updated["code_preview"], "<button>b</button>");
}

#[test]
fn test_variants_matrix_and_resolution() {
    let ws = Workspace::new();
    ws.add_component("C1", "free");
    ws.create("C1", "react", "tailwind_v4", "<A/>");
    let (_, html, _) = ws.create("C1", "html", "vanilla", "<b/>");

    let cells = ws.json(&["variants", "C1"]);
    let cells = cells.as_array().unwrap();
    assert_eq!(cells.len(), 15);
    assert_eq!(cells.iter().filter(|c| c["is_available"] == true).count(), 2);

    let resolved = ws.json(&["variants", "C1", "--framework", "html", "--css", "vanilla"]);
    assert_eq!(resolved["id"], html.as_str());
}

#[test]
fn test_access_on_paid_component() {
    let ws = Workspace::new();
    ws.add_component("P1", "paid");
    let value = ws.json(&[
        "version", "create", "--component", "P1", "--framework", "react", "--css",
        "tailwind_v4", "--preview", "<Preview/>", "--full", "<Full/>",
    ]);
    let id = value["version"]["id"].as_str().unwrap().to_string();

    let anonymous = ws.json(&["access", &id, "--anonymous"]);
    assert_eq!(anonymous["has_access"], false);
    assert_eq!(anonymous["code_to_show"], "<Preview/>");
    assert_eq!(anonymous["reason"], "anonymous");

    let unlicensed = ws.json(&["access", &id, "--user", "ann"]);
    assert_eq!(unlicensed["reason"], "insufficient_tier");

    ws.admin()
        .args(["license", "grant", "ann", "--tier", "pro"])
        .assert()
        .success();
    let licensed = ws.json(&["access", &id, "--user", "ann"]);
    assert_eq!(licensed["has_access"], true);
    assert_eq!(licensed["can_download"], true);
    assert_eq!(licensed["code_to_show"], "<Full/>");

    ws.admin()
        .args(["license", "revoke", "ann"])
        .assert()
        .success();
    let revoked = ws.json(&["access", &id, "--user", "ann"]);
    assert_eq!(revoked["has_access"], false);
}

#[test]
fn test_preview_publish_and_stdout() {
    let ws = Workspace::new();
    ws.add_component("C1", "free");
    let (_, id, _) = ws.create("C1", "vue", "tailwind_v3", "<my-btn/>");

    ws.admin().args(["preview", &id]).assert().success();
    let page = ws
        .path()
        .join("previews/previews/C1/vue-tailwind_v3-1.0.0.html");
    let html = std::fs::read_to_string(page).unwrap();
    assert!(html.contains("<my-btn/>"));

    ws.admin()
        .args(["preview", &id, "--stdout"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vue.global.js"));
}

#[test]
fn test_batch_report_counts() {
    let ws = Workspace::new();
    ws.add_component("C1", "free");
    let (_, keep, _) = ws.create("C1", "react", "vanilla", "<A/>");
    let (_, drop, _) = ws.create("C1", "vue", "vanilla", "<B/>");
    ws.admin()
        .args(["version", "set-default", &keep])
        .assert()
        .success();

    let output = ws
        .admin()
        .args(["--output-format", "json", "batch", "delete", &drop, &keep, "--yes"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["processed"], 2);
    assert_eq!(report["successful"], 1);
    assert_eq!(report["failed"], 1);
    assert_eq!(report["results"][0], drop.as_str());
    assert_eq!(report["errors"][0]["category"], "conflict");

    // The successful delete was saved.
    ws.admin()
        .args(["version", "show", &drop])
        .assert()
        .code(3);
}

#[test]
fn test_batch_reports_malformed_ids_per_item() {
    let ws = Workspace::new();
    ws.add_component("C1", "free");
    let (_, id, _) = ws.create("C1", "react", "vanilla", "<A/>");

    let output = ws
        .admin()
        .args(["--output-format", "json", "batch", "set-default", &id, "not-a-uuid"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));

    let report: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["processed"], 2);
    assert_eq!(report["successful"], 1);
    assert_eq!(report["results"][0], id.as_str());
    assert_eq!(report["errors"][0]["id"], "not-a-uuid");
    assert_eq!(report["errors"][0]["category"], "validation");

    let default = ws.json(&["version", "default", "C1"]);
    assert_eq!(default["id"], id.as_str());
}

#[test]
fn test_dark_mode_can_be_turned_off() {
    let ws = Workspace::new();
    ws.add_component("C1", "free");
    let created = ws.json(&[
        "version", "create", "--component", "C1", "--framework", "react", "--css", "vanilla",
        "--preview", "<A/>", "--dark-mode", "<A dark/>",
    ]);
    let id = created["version"]["id"].as_str().unwrap().to_string();
    assert_eq!(created["version"]["supports_dark_mode"], true);

    let updated = ws.json(&["version", "update", &id, "--no-dark-mode"]);
    assert_eq!(updated["supports_dark_mode"], false);
    assert!(updated["dark_mode_code"].is_null());
}

#[test]
fn test_init_and_config_get() {
    let ws = Workspace::new();
    let config = ws.path().join("conf/variantry.toml");

    ws.bare()
        .args(["-c", config.to_str().unwrap(), "init"])
        .assert()
        .success();
    assert!(config.exists());

    ws.bare()
        .args(["-c", config.to_str().unwrap(), "config", "get", "catalog.default_page_size"])
        .assert()
        .success()
        .stdout(predicate::str::diff("20\n"));

    // Environment beats the file.
    ws.bare()
        .env("VARIANTRY__CATALOG__DEFAULT_PAGE_SIZE", "7")
        .args(["-c", config.to_str().unwrap(), "config", "get", "catalog.default_page_size"])
        .assert()
        .success()
        .stdout(predicate::str::diff("7\n"));
}

#[test]
fn test_config_list_shows_every_key() {
    let ws = Workspace::new();
    let assert = ws
        .bare()
        .env("VARIANTRY__CATALOG__DEFAULT_PAGE_SIZE", "9")
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Current Configuration:"));

    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    for key in [
        "store.path",
        "identity.user",
        "identity.role",
        "output.no_color",
        "output.format",
        "preview.output_dir",
        "catalog.default_page_size",
    ] {
        assert!(stdout.contains(&format!("{key}:")), "missing {key} in:\n{stdout}");
    }
    assert!(stdout.contains("catalog.default_page_size: 9"));
}

#[test]
fn test_completions_bash() {
    Workspace::new()
        .bare()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("variantry"));
}
