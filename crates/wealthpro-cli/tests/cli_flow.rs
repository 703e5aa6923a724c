use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

fn bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_wealthpro"))
}

/// Isolated HOME/XDG directories for one test.
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir_all(dir.path().join("config")).expect("create config dir");
        std::fs::create_dir_all(dir.path().join("data")).expect("create data dir");
        Self { dir }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(bin());
        cmd.current_dir(self.path())
            .env("HOME", self.path())
            .env("XDG_CONFIG_HOME", self.path().join("config"))
            .env("XDG_DATA_HOME", self.path().join("data"))
            .env("NO_COLOR", "1")
            .env_remove("WEALTHPRO_CONFIG")
            .env_remove("WEALTHPRO_BACKEND")
            .env_remove("WEALTHPRO_ROOT_FOLDER_ID")
            .env_remove("WEALTHPRO_LOCAL_PATH")
            .env_remove("WEALTHPRO_ACCESS_TOKEN")
            .env_remove("WEALTHPRO_LOG")
            .env_remove("LOG_FORMAT");
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command().args(args).output().expect("run wealthpro")
    }

    /// Run and require success, returning stdout.
    fn ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "{:?} failed: stdout={}, stderr={}",
            args,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    fn json(&self, args: &[&str]) -> serde_json::Value {
        let stdout = self.ok(args);
        serde_json::from_str(&stdout).expect("parse json output")
    }
}

/// Value of a `key=value` line from plain output.
fn field(stdout: &str, key: &str) -> String {
    let prefix = format!("{}=", key);
    stdout
        .lines()
        .find_map(|line| line.strip_prefix(&prefix))
        .unwrap_or_else(|| panic!("no {} in output: {}", key, stdout))
        .to_string()
}

#[test]
fn test_cli_init_writes_config_and_drive() {
    let sandbox = Sandbox::new();
    let stdout = sandbox.ok(&["init"]);
    assert!(stdout.starts_with("status=ok"));
    assert_eq!(field(&stdout, "backend"), "local");

    let config_path = sandbox.path().join("config").join("wealthpro").join("config.toml");
    let contents = std::fs::read_to_string(&config_path).expect("read config");
    assert!(contents.contains("backend = \"local\""));
    assert!(sandbox.path().join("data").join("wealthpro").join("drive.sqlite").exists());

    let again = sandbox.run(&["init"]);
    assert_eq!(again.status.code(), Some(5));
    assert!(String::from_utf8_lossy(&again.stderr).contains("hint=Pass --force"));

    sandbox.ok(&["init", "--force"]);
}

#[test]
fn test_cli_client_lifecycle() {
    let sandbox = Sandbox::new();
    sandbox.ok(&["init"]);

    let added = sandbox.ok(&["clients", "add", "--first", "Jane", "--last", "Doe", "--email", "jane@example.com"]);
    let client_id = field(&added, "id");
    assert_eq!(field(&added, "name"), "Doe, Jane");

    // Same name again resolves to the same folder.
    let again = sandbox.ok(&["clients", "add", "Doe, Jane"]);
    assert_eq!(field(&again, "id"), client_id);

    sandbox.ok(&["clients", "add", "Smith, John"]);
    let listed = sandbox.ok(&["clients", "list"]);
    let lines: Vec<&str> = listed.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], format!("{} active Doe, Jane", client_id));

    let shown = sandbox.json(&["clients", "show", &client_id, "--json"]);
    assert_eq!(shown["display_name"], "Doe, Jane");
    assert_eq!(shown["first_name"], "Jane");
    assert!(shown["subfolders"]["Portfolio"].is_string());

    let archived = sandbox.ok(&["clients", "archive", "Doe, Jane"]);
    assert!(archived.starts_with("status=ok"));
    let unchanged = sandbox.ok(&["clients", "archive", "Doe, Jane"]);
    assert_eq!(unchanged.trim(), "status=unchanged");

    let only_archived = sandbox.json(&["clients", "list", "--archived", "--json"]);
    let names: Vec<&str> = only_archived
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["display_name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Doe, Jane"]);

    sandbox.ok(&["clients", "restore", &client_id]);

    let refused = sandbox.run(&["clients", "delete", "Smith, John"]);
    assert_eq!(refused.status.code(), Some(4));
    sandbox.ok(&["clients", "delete", "Smith, John", "--yes"]);
    let remaining = sandbox.json(&["clients", "list", "--json"]);
    assert_eq!(remaining.as_array().unwrap().len(), 1);
}

#[test]
fn test_cli_task_flow() {
    let sandbox = Sandbox::new();
    sandbox.ok(&["init"]);
    sandbox.ok(&["clients", "add", "Doe, Jane"]);

    let added = sandbox.ok(&[
        "tasks", "add", "Doe, Jane", "--title", "Annual review", "--due", "01/05/2030", "--id",
        "T100", "--type", "Pension Review", "--priority", "High",
    ]);
    assert_eq!(field(&added, "id"), "T100");
    assert_eq!(field(&added, "due"), "2030-05-01");
    assert!(added.lines().any(|line| line == "status=Pending"));

    let listed = sandbox.json(&["tasks", "list", "--client", "Doe, Jane", "--json"]);
    let tasks = listed.as_array().unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0]["client_name"], "Doe, Jane");
    assert_eq!(tasks[0]["task_type"], "Pension Review");

    let upcoming = sandbox.json(&["tasks", "upcoming", "--days", "36500", "--json"]);
    assert_eq!(upcoming.as_array().unwrap().len(), 1);
    let far_ahead = sandbox.json(&["tasks", "upcoming", "--days", "100000000", "--json"]);
    assert_eq!(far_ahead.as_array().unwrap().len(), 1);
    let none_soon = sandbox.ok(&["tasks", "upcoming", "--days", "0"]);
    assert_eq!(none_soon.trim(), "count=0");

    let completed = sandbox.ok(&["tasks", "complete", "T100"]);
    assert!(completed.starts_with("status=ok"));
    let shown = sandbox.json(&["tasks", "show", "T100", "--json"]);
    assert_eq!(shown["status"], "Completed");
    assert!(!shown["completed_date"].as_str().unwrap().is_empty());

    let missing = sandbox.run(&["tasks", "complete", "NOPE"]);
    assert_eq!(missing.status.code(), Some(3));

    let types = sandbox.ok(&["options", "list", "task_types"]);
    assert!(types.lines().any(|line| line == "task_types Pension Review"));

    let bad_date = sandbox.run(&["tasks", "add", "Doe, Jane", "--title", "x", "--due", "soon"]);
    assert_eq!(bad_date.status.code(), Some(4));
}

#[test]
fn test_cli_portfolio_review_and_comms() {
    let sandbox = Sandbox::new();
    sandbox.ok(&["init"]);
    sandbox.ok(&["clients", "add", "Doe, Jane"]);

    let isa = sandbox.ok(&[
        "portfolio", "add", "Doe, Jane", "investment", "--name", "ISA", "--provider", "Acme",
        "--reference", "A-1", "--value", "1000",
    ]);
    let isa_id = field(&isa, "id");
    sandbox.ok(&["portfolio", "add", "Doe, Jane", "pension", "--name", "SIPP", "--value", "2500.5"]);

    let profile = sandbox.json(&["portfolio", "show", "Doe, Jane", "--json"]);
    assert_eq!(profile["computed_total"].as_f64(), Some(3500.5));
    assert_eq!(profile["investments"][0]["account_number"], "A-1");

    sandbox.ok(&["portfolio", "edit", "Doe, Jane", "investment", &isa_id, "--value", "1500"]);
    sandbox.ok(&["portfolio", "notes", "Doe, Jane", "Cautious investor"]);
    let profile = sandbox.json(&["portfolio", "show", "Doe, Jane", "--json"]);
    assert_eq!(profile["computed_total"].as_f64(), Some(4000.5));
    assert_eq!(profile["notes"], "Cautious investor");

    let missing = sandbox.run(&["portfolio", "remove", "Doe, Jane", "pension", "no-such-id"]);
    assert_eq!(missing.status.code(), Some(3));
    let bad_category = sandbox.run(&["portfolio", "remove", "Doe, Jane", "crypto", &isa_id]);
    assert_eq!(bad_category.status.code(), Some(4));

    let providers = sandbox.ok(&["options", "list", "providers"]);
    assert_eq!(providers.trim(), "providers Acme");

    let pack = sandbox.json(&["review", "create", "Doe, Jane", "--json"]);
    assert!(!pack["agenda_file_id"].as_str().unwrap().is_empty());
    assert!(pack["subfolders"]["Agenda & Valuation"].is_string());

    let logged = sandbox.ok(&[
        "comms", "add", "Doe, Jane", "--kind", "email", "--subject", "Welcome", "--body", "Hello Jane",
        "--date", "2025-01-02",
    ]);
    let file_id = field(&logged, "id");
    assert_eq!(field(&logged, "file"), "2025-01-02 - Email - Welcome.txt");

    let listed = sandbox.ok(&["comms", "list", "Doe, Jane"]);
    assert_eq!(listed.trim(), format!("{} 2025-01-02 email Welcome", file_id));
    let body = sandbox.ok(&["comms", "show", &file_id]);
    assert_eq!(body.trim(), "Hello Jane");
}

#[test]
fn test_cli_unknown_client_is_not_found() {
    let sandbox = Sandbox::new();
    sandbox.ok(&["init"]);

    let output = sandbox.run(&["clients", "show", "Nobody, Here"]);
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error=Client 'Nobody, Here' not found"));
    assert!(stderr.contains("hint=Run `wealthpro clients list`"));
}

#[test]
fn test_cli_missing_local_drive_suggests_init() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["clients", "list"]);
    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("No local drive found"));
    assert!(stderr.contains("wealthpro init"));
}

#[test]
fn test_cli_google_backend_requires_token() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["--backend", "google", "--root", "abc123", "clients", "list"]);
    assert_eq!(output.status.code(), Some(5));
    assert!(String::from_utf8_lossy(&output.stderr).contains("WEALTHPRO_ACCESS_TOKEN is not set"));

    let no_root = sandbox.run(&["--backend", "google", "clients", "list"]);
    assert_eq!(no_root.status.code(), Some(5));
}

#[test]
fn test_cli_without_command_prints_quickstart() {
    let sandbox = Sandbox::new();
    let stdout = sandbox.ok(&[]);
    assert!(stdout.lines().any(|line| line == "wealthpro init"));
}
