// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::Context;
use clap::Parser;
use gpustate_config::{CaptureConfig, DeviceManifest};
use gpustate_core::metrics::CaptureMetrics;
use gpustate_core::sim::SimGpu;
use gpustate_core::snapshot::SnapshotSummary;
use gpustate_core::Collector;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{error, info};

const EXIT_CAPTURE_ERROR: u8 = 1;
const EXIT_CONFIG_ERROR: u8 = 2;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the simulated device manifest (YAML)
    #[arg(short, long, conflicts_with = "model")]
    device: Option<PathBuf>,

    /// GPU model to simulate with default settings
    #[arg(short, long, default_value = "a640")]
    model: String,

    /// Path to the capture options (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Write the crash report here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write a JSON summary of the capture
    #[arg(long)]
    summary: Option<PathBuf>,

    /// Skip the debug buses
    #[arg(long)]
    no_debugbus: bool,

    /// Enable register-level tracing
    #[arg(short, long)]
    trace: bool,
}

#[derive(Debug, Serialize)]
struct MetricsSummary {
    objects: u64,
    missing: u64,
    words: u64,
    dumper_runs: u64,
    dumper_failures: u64,
    duration_us: Option<u128>,
}

#[derive(Debug, Serialize)]
struct RunSummary {
    device: String,
    report_sha256: String,
    report_bytes: usize,
    #[serde(flatten)]
    snapshot: SnapshotSummary,
    metrics: MetricsSummary,
}

fn load(args: &Args) -> anyhow::Result<(DeviceManifest, CaptureConfig)> {
    let manifest = match &args.device {
        Some(path) => {
            info!("Loading device manifest: {:?}", path);
            DeviceManifest::from_file(path)?
        }
        None => {
            let manifest = DeviceManifest::for_model(&args.model);
            manifest.validate()?;
            manifest
        }
    };

    let mut config = match &args.config {
        Some(path) => {
            info!("Loading capture config: {:?}", path);
            CaptureConfig::from_file(path)?
        }
        None => CaptureConfig::default(),
    };
    if args.no_debugbus {
        config.debugbus = false;
    }

    Ok((manifest, config))
}

fn capture(args: &Args, manifest: &DeviceManifest, config: &CaptureConfig) -> anyhow::Result<()> {
    let mut device = SimGpu::from_manifest(manifest)?;

    let metrics = Arc::new(CaptureMetrics::new());
    let mut collector = Collector::from_config(config);
    collector.add_observer(metrics.clone());

    let state = collector.collect(&mut device)?;

    let mut report = Vec::new();
    gpustate_core::render(&state, &mut report).context("Failed to render report")?;

    match &args.output {
        Some(path) => {
            std::fs::write(path, &report)
                .with_context(|| format!("Failed to write report to {:?}", path))?;
            info!("Report written to {:?} ({} bytes)", path, report.len());
        }
        None => std::io::stdout()
            .write_all(&report)
            .context("Failed to write report to stdout")?,
    }

    if let Some(path) = &args.summary {
        let summary = RunSummary {
            device: manifest.name.clone(),
            report_sha256: format!("{:x}", Sha256::digest(&report)),
            report_bytes: report.len(),
            snapshot: SnapshotSummary::from_state(&state),
            metrics: MetricsSummary {
                objects: metrics.get_objects(),
                missing: metrics.get_missing(),
                words: metrics.get_words(),
                dumper_runs: metrics.get_dumper_runs(),
                dumper_failures: metrics.get_dumper_failures(),
                duration_us: metrics.last_duration().map(|d| d.as_micros()),
            },
        };
        let json = serde_json::to_string_pretty(&summary)?;
        std::fs::write(path, json).with_context(|| format!("Failed to write summary to {:?}", path))?;
        info!("Summary written to {:?}", path);
    }

    info!(
        "Captured {} objects ({} missing), {} crash dumper runs",
        metrics.get_objects(),
        metrics.get_missing(),
        metrics.get_dumper_runs()
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Logs go to stderr so the report can be piped.
    let level = if args.trace {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting GpuState capture");

    let (manifest, config) = match load(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return ExitCode::from(EXIT_CONFIG_ERROR);
        }
    };

    match capture(&args, &manifest, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Capture failed: {:#}", e);
            ExitCode::from(EXIT_CAPTURE_ERROR)
        }
    }
}
