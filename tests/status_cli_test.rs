use std::fs;
use std::process::Command;
use tempfile::tempdir;

#[test]
fn test_status_never_fails() {
    let temp_dir = tempdir().unwrap();
    let bin_path = env!("CARGO_BIN_EXE_ems-dev");

    let output = Command::new(bin_path)
        .arg("--skip-checks")
        .arg("status")
        .arg("--root")
        .arg(temp_dir.path())
        .env_remove("EMS_ROOT")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    println!("stdout: {}", stdout);
    println!("stderr: {}", stderr);

    assert!(output.status.success());
    assert!(stdout.contains("=== EMS Component Status ==="));
    assert!(stderr.contains("Frontend directory not found"));
    assert!(stdout.contains("Configuration file not found"));
}

#[test]
fn test_status_honours_layout_file() {
    let temp_dir = tempdir().unwrap();
    fs::write(
        temp_dir.path().join("ems.toml"),
        "[layout]\nclient_dir = \"web\"\n",
    )
    .unwrap();
    fs::create_dir_all(temp_dir.path().join("web/node_modules")).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_ems-dev"))
        .args(["--skip-checks", "status"])
        .env("EMS_ROOT", temp_dir.path())
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    println!("stdout: {}", stdout);

    assert!(output.status.success());
    assert!(stdout.contains("Frontend directory found"));
    assert!(stdout.contains("Frontend dependencies installed"));
}

#[test]
fn test_preflight_blocks_commands_without_config() {
    let temp_dir = tempdir().unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_ems-dev"))
        .arg("--root")
        .arg(temp_dir.path())
        .arg("status")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    println!("stdout: {}", stdout);
    println!("stderr: {}", stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout.contains("Missing configuration file"));
    assert!(stderr.contains("--skip-checks"));
}

#[test]
fn test_status_accepts_free_form_config_values() {
    let temp_dir = tempdir().unwrap();
    fs::write(
        temp_dir.path().join("config.env"),
        "DATABASE_URL=postgresql://u@h/db\nJWT_SECRET=my super secret\nstray line\n",
    )
    .unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_ems-dev"))
        .args(["--skip-checks", "status"])
        .arg("--root")
        .arg(temp_dir.path())
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    println!("stdout: {}", stdout);
    println!("stderr: {}", stderr);

    assert!(output.status.success());
    assert!(stdout.contains("Configuration file found"));
}
