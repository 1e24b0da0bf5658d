use std::{fs, process::Command};

use tempfile::TempDir;

#[test]
fn scripted_session_prints_transcript() {
    let dir = TempDir::new().expect("temp dir");
    let script = dir.path().join("session.txt");
    fs::write(
        &script,
        "# opening moves\n\
         place sunflower 0 0\n\
         undo\n\
         redo\n\
         custom 101 0 0\n\
         quit\n\
         end\n",
    )
    .expect("write script");

    let output = Command::new(env!("CARGO_BIN_EXE_lane-defence"))
        .args(["--seed", "5", "--script"])
        .arg(&script)
        .env("RUST_LOG", "off")
        .output()
        .expect("run lane-defence");

    assert!(output.status.success(), "lane-defence exited with {}", output.status);
    let transcript = String::from_utf8(output.stdout).expect("utf-8 transcript");
    assert!(transcript.contains("placed sunflower at (0, 0), balance 0"));
    assert!(transcript.contains("undid Placement"));
    assert!(transcript.contains("redid Placement"));
    assert!(transcript.contains("at most 100 attackers"));
    assert!(!transcript.contains("entered at"), "requests after quit must not run");
}

#[test]
fn missing_script_fails_with_context() {
    let dir = TempDir::new().expect("temp dir");
    let output = Command::new(env!("CARGO_BIN_EXE_lane-defence"))
        .arg("--script")
        .arg(dir.path().join("absent.txt"))
        .env("RUST_LOG", "off")
        .output()
        .expect("run lane-defence");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to open"), "stderr was: {stderr}");
}
