//! CLI integration tests for Parley.
//!
//! These tests verify the full CLI workflow from project creation through
//! building and deploying.

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get the parley binary command.
fn parley() -> Command {
    let mut cmd = Command::cargo_bin("parley").unwrap();
    // Keep the ambient environment from leaking a stage into tests.
    cmd.env_remove("PARLEY_STAGE").env_remove("PARLEY_ENV");
    cmd
}

/// Create a temporary directory for test projects.
fn temp_dir() -> TempDir {
    TempDir::new().unwrap()
}

// ============================================================================
// parley new
// ============================================================================

#[test]
fn test_new_creates_project() {
    let tmp = temp_dir();
    let project_dir = tmp.path().join("myapp");

    parley()
        .args(["new", "myapp"])
        .current_dir(tmp.path())
        .assert()
        .success();

    // Check project structure
    assert!(project_dir.join("parley.json").exists());
    assert!(project_dir.join("models/en.json").exists());

    // Check scaffolded content
    let config = fs::read_to_string(project_dir.join("parley.json")).unwrap();
    assert!(config.contains("\"generic\""));
    let model = fs::read_to_string(project_dir.join("models/en.json")).unwrap();
    assert!(model.contains("\"invocation\": \"myapp\""));
}

#[test]
fn test_new_fails_if_directory_exists() {
    let tmp = temp_dir();
    fs::create_dir(tmp.path().join("existing")).unwrap();

    parley()
        .args(["new", "existing"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

// ============================================================================
// parley init
// ============================================================================

#[test]
fn test_init_in_empty_directory() {
    let tmp = temp_dir();

    parley()
        .args(["init", "--name", "initapp"])
        .current_dir(tmp.path())
        .assert()
        .success();

    assert!(tmp.path().join("parley.json").exists());
    assert!(tmp.path().join("models").exists());
}

#[test]
fn test_init_fails_if_config_exists() {
    let tmp = temp_dir();
    fs::write(tmp.path().join("parley.json"), "{}").unwrap();

    parley()
        .args(["init", "--name", "again"])
        .current_dir(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

// ============================================================================
// parley build
// ============================================================================

#[test]
fn test_build_scaffolded_project() {
    let tmp = temp_dir();

    parley()
        .args(["new", "buildtest"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let project_dir = tmp.path().join("buildtest");

    parley()
        .args(["build"])
        .current_dir(&project_dir)
        .assert()
        .success()
        .stderr(predicate::str::contains("artifact(s) written"));

    let artifact = project_dir.join("build/generic/models/en.json");
    assert!(artifact.exists());
    let content = fs::read_to_string(&artifact).unwrap();
    assert!(content.contains("\"invocationName\": \"buildtest\""));
}

#[test]
fn test_build_outside_project_exits_2() {
    let tmp = temp_dir();

    parley()
        .args(["build"])
        .current_dir(tmp.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("parley.json"));
}

#[test]
fn test_build_missing_locale_fails() {
    let tmp = temp_dir();

    parley()
        .args(["new", "localetest"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let project_dir = tmp.path().join("localetest");

    parley()
        .args(["build", "--locale", "xx"])
        .current_dir(&project_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed"));
}

#[test]
fn test_build_with_stage_overlay() {
    let tmp = temp_dir();

    parley()
        .args(["new", "stagetest"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let project_dir = tmp.path().join("stagetest");

    // A prod stage that overrides the invocation through the plugin config.
    fs::write(
        project_dir.join("parley.json"),
        r#"{
  "models": { "directory": "models" },
  "defaultStage": "dev",
  "stages": {
    "dev": {},
    "prod": {
      "plugins": [
        {
          "id": "generic",
          "config": { "modelOverrides": { "en": { "invocation": "prod app" } } }
        }
      ]
    }
  },
  "plugins": [
    { "id": "generic" }
  ]
}
"#,
    )
    .unwrap();

    parley()
        .args(["build", "--stage", "prod"])
        .current_dir(&project_dir)
        .assert()
        .success();

    let content =
        fs::read_to_string(project_dir.join("build/generic/models/en.json")).unwrap();
    assert!(content.contains("prod app"));
}

#[test]
fn test_overlapping_locale_map_rejected() {
    let tmp = temp_dir();

    parley()
        .args(["new", "overlaptest"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let project_dir = tmp.path().join("overlaptest");

    // en-US is claimed by both `en` and the `en-*` glob of `base`.
    fs::write(
        project_dir.join("parley.json"),
        r#"{
  "models": {
    "directory": "models",
    "locales": {
      "en": ["en-US"],
      "base": ["en-*"]
    }
  },
  "plugins": [
    { "id": "generic" }
  ]
}
"#,
    )
    .unwrap();

    parley()
        .args(["build"])
        .current_dir(&project_dir)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("overlaps"));
}

#[test]
fn test_error_detail_is_gated_on_verbose() {
    let tmp = temp_dir();

    parley()
        .args(["new", "verbosetest"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let project_dir = tmp.path().join("verbosetest");
    fs::write(
        project_dir.join("parley.json"),
        r#"{
  "models": {
    "directory": "models",
    "locales": {
      "en": ["en-US"],
      "base": ["en-*"]
    }
  },
  "plugins": [
    { "id": "generic" }
  ]
}
"#,
    )
    .unwrap();

    // Default: a one-line message plus the hint, no diagnostic code.
    parley()
        .args(["build"])
        .current_dir(&project_dir)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("help:"))
        .stderr(predicate::str::contains("parley::config::load").not());

    // Verbose: the full diagnostic rendering, code included.
    parley()
        .args(["--verbose", "build"])
        .current_dir(&project_dir)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("parley::config::load"));
}

// ============================================================================
// parley get
// ============================================================================

#[test]
fn test_get_restores_deleted_model() {
    let tmp = temp_dir();

    parley()
        .args(["new", "gettest"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let project_dir = tmp.path().join("gettest");

    parley()
        .args(["build"])
        .current_dir(&project_dir)
        .assert()
        .success();

    fs::remove_file(project_dir.join("models/en.json")).unwrap();

    parley()
        .args(["get"])
        .current_dir(&project_dir)
        .assert()
        .success()
        .stderr(predicate::str::contains("imported into model"));

    let model = fs::read_to_string(project_dir.join("models/en.json")).unwrap();
    assert!(model.contains("HelloIntent"));
}

#[test]
fn test_get_clean_overwrites_without_prompt() {
    let tmp = temp_dir();

    parley()
        .args(["new", "getclean"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let project_dir = tmp.path().join("getclean");

    parley()
        .args(["build"])
        .current_dir(&project_dir)
        .assert()
        .success();

    parley()
        .args(["get", "--clean"])
        .current_dir(&project_dir)
        .assert()
        .success();
}

#[test]
fn test_get_cancel_exits_0() {
    let tmp = temp_dir();

    parley()
        .args(["new", "getcancel"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let project_dir = tmp.path().join("getcancel");

    parley()
        .args(["build"])
        .current_dir(&project_dir)
        .assert()
        .success();

    // The model exists, so `get` prompts; answering `c` is a clean abort.
    parley()
        .args(["get"])
        .current_dir(&project_dir)
        .write_stdin("c\n")
        .assert()
        .code(0)
        .stderr(predicate::str::contains("cancelled"));
}

#[test]
fn test_get_without_build_output_fails() {
    let tmp = temp_dir();

    parley()
        .args(["new", "getempty"])
        .current_dir(tmp.path())
        .assert()
        .success();

    parley()
        .args(["get"])
        .current_dir(tmp.path().join("getempty"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("native"));
}

// ============================================================================
// parley deploy
// ============================================================================

#[test]
fn test_deploy_uploads_build_output() {
    let tmp = temp_dir();

    parley()
        .args(["new", "deploytest"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let project_dir = tmp.path().join("deploytest");

    parley()
        .args(["build"])
        .current_dir(&project_dir)
        .assert()
        .success();

    parley()
        .args(["deploy"])
        .current_dir(&project_dir)
        .assert()
        .success()
        .stderr(predicate::str::contains("Deployed generic"));

    assert!(project_dir.join(".deploy/generic/models/en.json").exists());
}

#[test]
fn test_deploy_without_build_output_fails() {
    let tmp = temp_dir();

    parley()
        .args(["new", "deployempty"])
        .current_dir(tmp.path())
        .assert()
        .success();

    parley()
        .args(["deploy"])
        .current_dir(tmp.path().join("deployempty"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("artifacts"));
}

// ============================================================================
// Full workflow test
// ============================================================================

#[test]
fn test_full_workflow_build_get_deploy() {
    let tmp = temp_dir();

    // 1. Scaffold a project with a locale map.
    parley()
        .args(["new", "workflow"])
        .current_dir(tmp.path())
        .assert()
        .success();

    let project_dir = tmp.path().join("workflow");
    fs::write(
        project_dir.join("parley.json"),
        r#"{
  "models": {
    "directory": "models",
    "locales": { "en": ["en-US", "en-GB"] }
  },
  "plugins": [
    { "id": "generic" }
  ]
}
"#,
    )
    .unwrap();

    // 2. Build: one canonical model fans out to both mapped locales.
    parley()
        .args(["build"])
        .current_dir(&project_dir)
        .assert()
        .success();
    assert!(project_dir.join("build/generic/models/en-US.json").exists());
    assert!(project_dir.join("build/generic/models/en-GB.json").exists());

    // 3. Reverse build one native locale back into the canonical model.
    fs::remove_file(project_dir.join("models/en.json")).unwrap();
    parley()
        .args(["get", "--locale", "en-US"])
        .current_dir(&project_dir)
        .assert()
        .success();
    assert!(project_dir.join("models/en.json").exists());

    // 4. Deploy the build output.
    parley()
        .args(["deploy"])
        .current_dir(&project_dir)
        .assert()
        .success();
    assert!(project_dir.join(".deploy/generic/.revision").exists());

    // 5. Deploying again advances the revision.
    parley()
        .args(["deploy"])
        .current_dir(&project_dir)
        .assert()
        .success();
    let revision =
        fs::read_to_string(project_dir.join(".deploy/generic/.revision")).unwrap();
    assert_eq!(revision.trim(), "2");
}
