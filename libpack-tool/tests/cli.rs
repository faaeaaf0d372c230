use std::fs;
use std::process::Command;

fn libpack_cmd() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_libpack"));
    cmd.env_remove("RUST_LOG");
    cmd
}

fn fixture(root: &std::path::Path) {
    fs::create_dir_all(root.join("include/a")).unwrap();
    fs::write(root.join("include/a/x.h"), b"x").unwrap();
    fs::create_dir_all(root.join("d")).unwrap();
    fs::create_dir_all(root.join("r")).unwrap();
    fs::write(root.join("d/app.lib"), b"d").unwrap();
    fs::write(root.join("r/app.lib"), b"r").unwrap();
}

#[test]
fn positional_arguments_package_with_default_layout() {
    let tmp = tempfile::tempdir().unwrap();
    fixture(tmp.path());

    let output = libpack_cmd()
        .current_dir(tmp.path())
        .args(["app.lib", "d/app.lib", "r/app.lib"])
        .output()
        .unwrap();
    assert!(output.status.success(), "libpack failed: {:?}", output);
    assert!(tmp.path().join("package/app.zip").is_file());
}

#[test]
fn missing_arguments_exit_with_code_2() {
    let tmp = tempfile::tempdir().unwrap();

    let output = libpack_cmd()
        .current_dir(tmp.path())
        .args(["app.lib"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("debug_library_path"), "stderr: {stderr}");
    assert!(!tmp.path().join("package").exists());
}

#[test]
fn dry_run_lists_entries_and_writes_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    fixture(tmp.path());

    let output = libpack_cmd()
        .current_dir(tmp.path())
        .args(["--dry", "--split", "app.lib", "d/app.lib", "r/app.lib"])
        .output()
        .unwrap();
    assert!(output.status.success(), "libpack failed: {:?}", output);

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("app_debug.zip"));
    assert!(stdout.contains("app_release.zip"));
    assert!(stdout.contains("include/a/x.h"));
    assert!(!tmp.path().join("package").exists());
}

#[test]
fn config_file_and_env_supply_inputs() {
    let tmp = tempfile::tempdir().unwrap();
    fixture(tmp.path());
    fs::write(
        tmp.path().join("libpack.yaml"),
        "library_file_name: app.lib\ndebug_library_path: d/app.lib\noutput_directory: dist\n",
    )
    .unwrap();

    let output = libpack_cmd()
        .current_dir(tmp.path())
        .env("LIBPACK_RELEASE_LIBRARY_PATH", "r/app.lib")
        .env("LIBPACK_ARCHIVE_NAME", "sdk-%stem%.zip")
        .args(["--config", "libpack.yaml"])
        .output()
        .unwrap();
    assert!(output.status.success(), "libpack failed: {:?}", output);
    assert!(tmp.path().join("dist/sdk-app.zip").is_file());
}

#[test]
fn missing_library_file_fails_nonzero() {
    let tmp = tempfile::tempdir().unwrap();
    fixture(tmp.path());

    let output = libpack_cmd()
        .current_dir(tmp.path())
        .args(["app.lib", "d/missing.lib", "r/app.lib"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(!tmp.path().join("package/app.zip").exists());
}

#[test]
fn invalid_layout_env_fails() {
    let tmp = tempfile::tempdir().unwrap();
    fixture(tmp.path());

    let output = libpack_cmd()
        .current_dir(tmp.path())
        .env("LIBPACK_LAYOUT", "spilt")
        .args(["app.lib", "d/app.lib", "r/app.lib"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("LIBPACK_LAYOUT"), "stderr: {stderr}");
    assert!(!tmp.path().join("package").exists());
}

#[test]
fn library_name_with_parent_segment_exits_with_code_2() {
    let tmp = tempfile::tempdir().unwrap();
    fixture(tmp.path());

    let output = libpack_cmd()
        .current_dir(tmp.path())
        .args(["../app.lib", "d/app.lib", "r/app.lib"])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(!tmp.path().join("package").exists());
}
