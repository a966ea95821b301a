//! CLI Integration Tests
//!
//! Tests the command-line interface end-to-end. Every test runs offline
//! against its own project directory and state directory.

use assert_cmd::Command;
use assert_fs::prelude::*;
use assert_fs::TempDir;
use predicates::prelude::*;

/// A temp project plus an isolated state/config home.
struct Sandbox {
    project: TempDir,
    home: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let project = TempDir::new().unwrap();
        project
            .child("package.json")
            .write_str(r#"{"name": "shop", "dependencies": {"react": "^18.0.0"}}"#)
            .unwrap();
        project.child("src/App.tsx").write_str("export default function App() {}\n").unwrap();
        project.child("src/utils/legacyAuth.ts").write_str("export {};\n").unwrap();
        project.child(".env.example").write_str("API_URL=\n").unwrap();

        Self { project, home: TempDir::new().unwrap() }
    }

    /// Get the binary to test.
    fn planwright(&self) -> Command {
        let mut cmd = Command::cargo_bin("planwright").unwrap();
        cmd.current_dir(self.project.path())
            .env("PLANWRIGHT_STATE_DIR", self.home.child("state").path())
            .env("XDG_CONFIG_HOME", self.home.child("config").path())
            .env_remove("ANTHROPIC_API_KEY")
            .arg("--offline");
        cmd
    }

    fn start_auth(&self) {
        self.planwright().args(["start", "Add user authentication with Auth0"]).assert().success();
    }

    fn answer_all(&self) {
        for answer in ["Auth0", "Email and Google", "Everything under /account"] {
            self.planwright().args(["answer", answer]).assert().success();
        }
    }
}

// ============================================================================
// Help & Version Tests
// ============================================================================

#[test]
fn test_help_flag() {
    Sandbox::new()
        .planwright()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Conversational feature planning"));
}

#[test]
fn test_version_flag() {
    Sandbox::new()
        .planwright()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_subcommand_required() {
    Command::cargo_bin("planwright").unwrap().assert().failure();
}

// ============================================================================
// Workflow Tests
// ============================================================================

#[test]
fn test_start_prints_auth_questions() {
    let sandbox = Sandbox::new();
    sandbox
        .planwright()
        .args(["start", "Add", "user", "authentication", "with", "Auth0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Planning: Add user authentication with Auth0"))
        .stdout(predicate::str::contains("  1. "))
        .stdout(predicate::str::contains("  3. "))
        .stdout(predicate::str::contains("  4. ").not());
}

#[test]
fn test_short_request_is_rejected() {
    Sandbox::new()
        .planwright()
        .args(["start", "login"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("request"));
}

#[test]
fn test_answer_before_start_fails() {
    Sandbox::new()
        .planwright()
        .args(["answer", "Auth0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("idle"));
}

#[test]
fn test_answers_report_progress() {
    let sandbox = Sandbox::new();
    sandbox.start_auth();

    sandbox
        .planwright()
        .args(["answer", "Auth0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded answer 1/3."))
        .stdout(predicate::str::contains("Next: "));

    sandbox.planwright().args(["answer", "Email"]).assert().success();
    sandbox
        .planwright()
        .args(["answer", "Account pages"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Recorded answer 3/3."))
        .stdout(predicate::str::contains("planwright submit"));
}

#[test]
fn test_submit_requires_answers() {
    let sandbox = Sandbox::new();
    sandbox.start_auth();

    sandbox
        .planwright()
        .arg("submit")
        .assert()
        .failure()
        .stderr(predicate::str::contains("0/3"));
}

#[test]
fn test_full_session_applies_plan() {
    let sandbox = Sandbox::new();
    sandbox.start_auth();
    sandbox.answer_all();

    sandbox
        .planwright()
        .arg("submit")
        .assert()
        .success()
        .stdout(predicate::str::contains("src/auth/config.ts"))
        .stdout(predicate::str::contains("6 items: 3 new, 2 modify, 1 remove"));

    sandbox
        .planwright()
        .arg("plan")
        .assert()
        .success()
        .stdout(predicate::str::contains("# Change Plan"))
        .stdout(predicate::str::contains("`src/utils/legacyAuth.ts`"));

    sandbox
        .planwright()
        .args(["execute", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Applied 6/6 changes."));

    sandbox.project.child("src/auth/middleware.ts").assert(predicate::path::is_file());
    sandbox.project.child("src/utils/legacyAuth.ts").assert(predicate::path::missing());

    sandbox
        .planwright()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Phase:    idle"));
}

#[test]
fn test_dry_run_leaves_files_untouched() {
    let sandbox = Sandbox::new();
    sandbox.start_auth();
    sandbox.answer_all();
    sandbox.planwright().arg("submit").assert().success();

    sandbox
        .planwright()
        .args(["execute", "--yes", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("[DRY RUN]"))
        .stdout(predicate::str::contains("Applied 6/6 changes."));

    sandbox.project.child("src/auth/config.ts").assert(predicate::path::missing());
    sandbox.project.child("src/utils/legacyAuth.ts").assert(predicate::path::is_file());
}

#[test]
fn test_failed_items_are_reported() {
    let sandbox = Sandbox::new();
    sandbox.start_auth();
    sandbox.answer_all();
    sandbox.planwright().arg("submit").assert().success();

    std::fs::remove_file(sandbox.project.child("src/utils/legacyAuth.ts").path()).unwrap();

    sandbox
        .planwright()
        .args(["execute", "-y"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Applied 5/6 changes."))
        .stdout(predicate::str::contains("✗"));

    sandbox
        .planwright()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Phase:    idle"));
}

#[test]
fn test_plan_before_submit_fails() {
    let sandbox = Sandbox::new();
    sandbox.start_auth();

    sandbox
        .planwright()
        .arg("plan")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No plan yet (workflow is clarification)"));
}

#[test]
fn test_plan_json() {
    let sandbox = Sandbox::new();
    sandbox.start_auth();
    sandbox.answer_all();
    sandbox.planwright().arg("submit").assert().success();

    let output = sandbox.planwright().args(["plan", "--json"]).output().unwrap();
    assert!(output.status.success());

    let plan: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let items = plan.as_array().unwrap();
    assert_eq!(items.len(), 6);
    assert_eq!(items[5]["action"], "remove");
}

#[test]
fn test_restart_clears_session() {
    let sandbox = Sandbox::new();
    sandbox.start_auth();

    sandbox
        .planwright()
        .args(["restart", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Session cleared"));

    sandbox
        .planwright()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Phase:    idle"));
}

#[test]
fn test_restart_declined_on_stdin() {
    let sandbox = Sandbox::new();
    sandbox.start_auth();

    sandbox
        .planwright()
        .arg("restart")
        .write_stdin("n\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Cancelled"));

    sandbox
        .planwright()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Phase:    clarification"));
}

// ============================================================================
// Status, Context & Config Tests
// ============================================================================

#[test]
fn test_status_reports_fallback_backend() {
    Sandbox::new()
        .planwright()
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Phase:    idle"))
        .stdout(predicate::str::contains("Backend:  built-in suggestions"));
}

#[test]
fn test_context_command() {
    Sandbox::new()
        .planwright()
        .arg("context")
        .assert()
        .success()
        .stdout(predicate::str::contains("React application"))
        .stdout(predicate::str::contains("package.json"));
}

#[test]
fn test_context_json() {
    let sandbox = Sandbox::new();
    let output = sandbox.planwright().args(["context", "--json"]).output().unwrap();
    assert!(output.status.success());

    let ctx: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(ctx["project_type"], "React application");
    assert_eq!(ctx["has_manifest"], true);
}

#[test]
fn test_context_missing_directory() {
    Sandbox::new()
        .planwright()
        .args(["context", "does/not/exist"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No workspace"));
}

#[test]
fn test_local_config_is_honored() {
    let sandbox = Sandbox::new();
    sandbox
        .project
        .child(".planwright.toml")
        .write_str("[general]\nmin_request_len = 50\n")
        .unwrap();

    sandbox
        .planwright()
        .args(["start", "Add user authentication with Auth0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("50"));
}

#[test]
fn test_root_flag_reads_that_projects_config() {
    let sandbox = Sandbox::new();
    sandbox
        .project
        .child(".planwright.toml")
        .write_str("[general]\nmin_request_len = 50\n")
        .unwrap();

    sandbox
        .planwright()
        .current_dir(sandbox.home.path())
        .arg("--root")
        .arg(sandbox.project.path())
        .args(["start", "Add user authentication with Auth0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 50 required"));
}

#[test]
fn test_config_redacts_api_key() {
    let sandbox = Sandbox::new();
    sandbox
        .project
        .child(".planwright.toml")
        .write_str("[ai]\napi_key = \"sk-ant-secret\"\n")
        .unwrap();

    sandbox
        .planwright()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("[REDACTED]"))
        .stdout(predicate::str::contains("sk-ant-secret").not());
}

#[test]
fn test_completions_bash() {
    Sandbox::new()
        .planwright()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("planwright"));
}
