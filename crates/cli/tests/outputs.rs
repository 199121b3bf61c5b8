// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_dir(prefix: &str) -> PathBuf {
    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir()
        .join("gpustate-tests")
        .join(format!("{}-{}", prefix, nonce));
    std::fs::create_dir_all(&dir).expect("Failed to create temp dir");
    dir
}

fn gpustate(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_gpustate"))
        .args(args)
        .output()
        .expect("Failed to execute command")
}

#[test]
fn test_report_and_summary_files() {
    let dir = temp_dir("outputs");
    let report_path = dir.join("report.yaml");
    let summary_path = dir.join("summary.json");

    let output = gpustate(&[
        "--model",
        "a630",
        "--output",
        report_path.to_str().unwrap(),
        "--summary",
        summary_path.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    // The report is not echoed when written to a file.
    assert!(output.stdout.is_empty());

    let report = std::fs::read(&report_path).unwrap();
    let text = String::from_utf8(report.clone()).unwrap();
    assert!(text.starts_with("gpu-initialized: 1\n"));
    assert!(text.contains("gpu-model: a630\n"));
    assert!(text.contains("debugbus-block: A6XX_DBGBUS_VBIF"));

    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&summary_path).unwrap()).unwrap();
    assert_eq!(summary["device"], "sim-a630");
    assert_eq!(summary["model"], "a630");
    assert_eq!(summary["gpu_initialized"], true);
    assert_eq!(summary["report_bytes"], report.len());
    assert_eq!(
        summary["report_sha256"].as_str().unwrap(),
        format!("{:x}", Sha256::digest(&report))
    );
    assert!(summary["categories"]["shaders"]["captured"].as_u64().unwrap() > 0);
    assert_eq!(summary["metrics"]["dumper_failures"], 0);
    assert!(summary["metrics"]["dumper_runs"].as_u64().unwrap() > 0);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_report_to_stdout() {
    let output = gpustate(&["--model", "a740", "--no-debugbus"]);
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.contains("gpu-model: a740\n"));
    assert!(text.contains("\ndebugbus:\n"));
    assert!(!text.contains("debugbus-block:"));
}

#[test]
fn test_device_manifest() {
    let dir = temp_dir("manifest");
    let device = dir.join("device.yaml");
    std::fs::write(
        &device,
        r#"
name: "stalled-a650"
model: "a650"
gmu:
  log_size: "1kB"
state:
  smmu_stalled: true
"#,
    )
    .unwrap();
    let summary_path = dir.join("summary.json");

    let output = gpustate(&[
        "--device",
        device.to_str().unwrap(),
        "--summary",
        summary_path.to_str().unwrap(),
    ]);
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.contains("gmu-log:\n    iova: 0x"));

    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&summary_path).unwrap()).unwrap();
    assert_eq!(summary["device"], "stalled-a650");
    assert_eq!(summary["metrics"]["dumper_runs"], 0);
    assert_eq!(summary["categories"]["shaders"]["captured"], 0);
    assert_eq!(summary["gmu_buffers"]["log"], 1000);

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_capture_config_disables_debugbus() {
    let dir = temp_dir("config");
    let config = dir.join("capture.yaml");
    std::fs::write(&config, "debugbus: false\n").unwrap();

    let output = gpustate(&["--model", "a660", "--config", config.to_str().unwrap()]);
    assert!(output.status.success());
    let text = String::from_utf8(output.stdout).unwrap();
    assert!(!text.contains("debugbus-block:"));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_config_errors_exit_with_code_2() {
    let output = gpustate(&["--model", "a999"]);
    assert_eq!(output.status.code(), Some(2));

    let dir = temp_dir("bad-manifest");
    let device = dir.join("device.yaml");
    std::fs::write(
        &device,
        r#"
name: "broken"
model: "a640"
state:
  hang_on_runs: [0]
"#,
    )
    .unwrap();
    let output = gpustate(&["--device", device.to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));

    let output = gpustate(&["--device", dir.join("missing.yaml").to_str().unwrap()]);
    assert_eq!(output.status.code(), Some(2));

    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn test_device_and_model_conflict() {
    let output = gpustate(&["--device", "device.yaml", "--model", "a640"]);
    assert!(!output.status.success());
}
