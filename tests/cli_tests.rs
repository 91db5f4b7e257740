use assert_cmd::Command;
use predicates::prelude::*;

/// Binary under test with no inherited CLIPPER_* overrides
fn clipper() -> Command {
    let mut cmd = Command::cargo_bin("clipper").unwrap();
    for var in [
        "CLIPPER_BASE_URL",
        "CLIPPER_INFO_PATH",
        "CLIPPER_CLIP_PATH",
        "CLIPPER_LOG_LEVEL",
        "CLIPPER_DISCARD_STALE",
        "CLIPPER_TIMEOUT_SECS",
        "CLIPPER_OUTPUT_FORMAT",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd
}

#[test]
fn test_help_lists_commands() {
    clipper()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("info"))
        .stdout(predicate::str::contains("clip"))
        .stdout(predicate::str::contains("session"));
}

#[test]
fn test_info_with_empty_url_fails_without_network() {
    clipper()
        .args(["--base-url", "http://127.0.0.1:1", "info", "--url", ""])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Veuillez entrer une URL d'abord."));
}

#[test]
fn test_clip_with_empty_url_fails() {
    clipper()
        .args(["clip", "--start", "0", "--end", "10"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Veuillez entrer une URL d'abord."));
}

#[test]
fn test_unreachable_service_shows_fallback() {
    clipper()
        .args(["--base-url", "http://127.0.0.1:1", "info", "--url", "https://x/video"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Erreur lors de la récupération des infos."));

    clipper()
        .args([
            "--base-url",
            "http://127.0.0.1:1",
            "clip",
            "--url",
            "https://x/video",
            "--start",
            "0",
            "--end",
            "10",
        ])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Une erreur est survenue."));
}

#[test]
fn test_json_output_reports_error_state() {
    let output = clipper()
        .args(["--format", "json", "info", "--url", ""])
        .output()
        .unwrap();
    assert!(!output.status.success());

    let panel: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(panel["status"]["state"], "error");
    assert_eq!(panel["status"]["message"], "Veuillez entrer une URL d'abord.");
    assert_eq!(panel["control"]["enabled"], true);
}

#[test]
fn test_invalid_format_is_rejected() {
    clipper()
        .args(["--format", "xml", "info", "--url", "https://x/video"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn test_environment_supplies_base_url() {
    clipper()
        .env("CLIPPER_BASE_URL", "not a url")
        .args(["info", "--url", "https://x/video"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("base_url"));
}

#[test]
fn test_session_help_and_quit() {
    clipper()
        .arg("session")
        .write_stdin("help\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Commandes :"));
}
