// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Model names a manifest may use.
pub const SUPPORTED_MODELS: &[&str] = &[
    "a630", "a640", "a650", "a660", "a621", "a730", "a740", "a750",
];

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("Device name cannot be empty")]
    EmptyName,
    #[error("Unknown GPU model '{0}'")]
    UnknownModel(String),
    #[error("Invalid size '{value}' for {field}")]
    InvalidSize { field: &'static str, value: String },
    #[error("Absent range {start:#x}..{end:#x} is inverted")]
    InvertedRange { start: u32, end: u32 },
    #[error("Crash dumper run numbers are 1-based, got 0")]
    ZeroRunNumber,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct RegisterPreset {
    pub offset: u32,
    pub value: u32,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct GmuConfig {
    /// Parts without a real GMU expose only a thin wrapper.
    #[serde(default)]
    pub wrapper: bool,
    #[serde(default = "default_true")]
    pub gx_on: bool,
    #[serde(default = "default_true")]
    pub sptprac_on: bool,
    #[serde(default)]
    pub log_size: Option<String>, // e.g. "16kB"
    #[serde(default)]
    pub hfi_size: Option<String>,
    #[serde(default)]
    pub debug_size: Option<String>,
}

impl Default for GmuConfig {
    fn default() -> Self {
        Self {
            wrapper: false,
            gx_on: true,
            sptprac_on: true,
            log_size: None,
            hfi_size: None,
            debug_size: None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct DeviceState {
    #[serde(default)]
    pub smmu_stalled: bool,
    #[serde(default)]
    pub needs_hw_init: bool,
    #[serde(default = "default_true")]
    pub cx_dbgc: bool,
    #[serde(default)]
    pub scratch_alloc_fails: bool,
    #[serde(default)]
    pub crashdumper_hang: bool,
    /// 1-based crash dumper runs that never complete.
    #[serde(default)]
    pub hang_on_runs: Vec<u32>,
}

impl Default for DeviceState {
    fn default() -> Self {
        Self {
            smmu_stalled: false,
            needs_hw_init: false,
            cx_dbgc: true,
            scratch_alloc_fails: false,
            crashdumper_hang: false,
            hang_on_runs: Vec::new(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct DeviceManifest {
    pub name: String,
    pub model: String,
    #[serde(default)]
    pub chip_id: Option<u32>,
    #[serde(default)]
    pub gmu: GmuConfig,
    #[serde(default)]
    pub state: DeviceState,
    #[serde(default)]
    pub registers: Vec<RegisterPreset>,
    /// Inclusive register ranges that read back as the invalid fill value.
    #[serde(default)]
    pub absent: Vec<[u32; 2]>,
}

impl DeviceManifest {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = std::fs::File::open(&path)
            .with_context(|| format!("Failed to open device manifest at {:?}", path.as_ref()))?;
        let manifest: Self =
            serde_yaml::from_reader(f).context("Failed to parse Device Manifest")?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Default manifest for a model, used when no file is given.
    pub fn for_model(model: &str) -> Self {
        Self {
            name: format!("sim-{}", model),
            model: model.to_string(),
            chip_id: None,
            gmu: GmuConfig::default(),
            state: DeviceState::default(),
            registers: Vec::new(),
            absent: Vec::new(),
        }
    }

    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyName);
        }

        if !SUPPORTED_MODELS.contains(&self.model.as_str()) {
            return Err(ConfigError::UnknownModel(self.model.clone()));
        }

        for (field, value) in [
            ("gmu.log_size", &self.gmu.log_size),
            ("gmu.hfi_size", &self.gmu.hfi_size),
            ("gmu.debug_size", &self.gmu.debug_size),
        ] {
            if let Some(v) = value {
                if parse_size(v).is_err() {
                    return Err(ConfigError::InvalidSize {
                        field,
                        value: v.clone(),
                    });
                }
            }
        }

        if let Some(&[start, end]) = self.absent.iter().find(|r| r[0] > r[1]) {
            return Err(ConfigError::InvertedRange { start, end });
        }

        if self.state.hang_on_runs.contains(&0) {
            return Err(ConfigError::ZeroRunNumber);
        }

        Ok(())
    }

    /// Byte sizes of the GMU log, HFI and debug buffers (0 when absent).
    pub fn gmu_buffer_sizes(&self) -> Result<[usize; 3]> {
        let size = |v: &Option<String>| -> Result<usize> {
            match v {
                Some(s) => Ok(parse_size(s)? as usize),
                None => Ok(0),
            }
        };
        Ok([
            size(&self.gmu.log_size)?,
            size(&self.gmu.hfi_size)?,
            size(&self.gmu.debug_size)?,
        ])
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(deny_unknown_fields)]
pub struct CaptureConfig {
    /// Sample the GX/CX/VBIF debug buses at the end of a capture.
    #[serde(default = "default_true")]
    pub debugbus: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self { debugbus: true }
    }
}

impl CaptureConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let f = std::fs::File::open(&path)
            .with_context(|| format!("Failed to open capture config at {:?}", path.as_ref()))?;
        serde_yaml::from_reader(f).context("Failed to parse Capture Config")
    }
}

pub fn parse_size(size_str: &str) -> Result<u64> {
    use human_size::{Byte, Size, SpecificSize};
    if size_str.trim() == "0" {
        return Ok(0);
    }
    let s: Size = size_str
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid size format: {}", e))?;
    let bytes: SpecificSize<Byte> = s.into();
    Ok(bytes.value() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_manifest() {
        let yaml = r#"
name: "bench-a660"
model: "a660"
chip_id: 0x06060001
gmu:
  log_size: "16kB"
  hfi_size: "64kB"
state:
  smmu_stalled: false
  hang_on_runs: [2]
registers:
  - { offset: 0x8c1, value: 0x200000 }
absent:
  - [0x9000, 0x90ff]
"#;
        let manifest: DeviceManifest = serde_yaml::from_str(yaml).unwrap();
        assert!(manifest.validate().is_ok());
        assert_eq!(manifest.model, "a660");
        assert_eq!(manifest.chip_id, Some(0x06060001));
        assert_eq!(manifest.registers.len(), 1);
        assert_eq!(manifest.registers[0].offset, 0x8c1);
        assert_eq!(manifest.absent, vec![[0x9000, 0x90ff]]);
        assert!(manifest.gmu.gx_on);
        assert!(manifest.state.cx_dbgc);

        let sizes = manifest.gmu_buffer_sizes().unwrap();
        assert_eq!(sizes[0], 16_000);
        assert_eq!(sizes[1], 64_000);
        assert_eq!(sizes[2], 0);
    }

    #[test]
    fn test_unknown_model() {
        let yaml = r#"
name: "x"
model: "a999"
"#;
        let manifest: DeviceManifest = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            manifest.validate().unwrap_err(),
            ConfigError::UnknownModel("a999".to_string())
        );
    }

    #[test]
    fn test_inverted_absent_range() {
        let yaml = r#"
name: "x"
model: "a630"
absent:
  - [0x20, 0x10]
"#;
        let manifest: DeviceManifest = serde_yaml::from_str(yaml).unwrap();
        let err = manifest.validate().unwrap_err();
        assert!(err.to_string().contains("inverted"));
    }

    #[test]
    fn test_bad_size() {
        let yaml = r#"
name: "x"
model: "a630"
gmu:
  log_size: "lots"
"#;
        let manifest: DeviceManifest = serde_yaml::from_str(yaml).unwrap();
        let err = manifest.validate().unwrap_err();
        assert!(err.to_string().contains("gmu.log_size"));
    }

    #[test]
    fn test_zero_run_number() {
        let yaml = r#"
name: "x"
model: "a740"
state:
  hang_on_runs: [0]
"#;
        let manifest: DeviceManifest = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(manifest.validate().unwrap_err(), ConfigError::ZeroRunNumber);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = r#"
name: "x"
model: "a630"
frobnicate: true
"#;
        assert!(serde_yaml::from_str::<DeviceManifest>(yaml).is_err());
    }

    #[test]
    fn test_capture_config_defaults() {
        let cfg: CaptureConfig = serde_yaml::from_str("{}").unwrap();
        assert!(cfg.debugbus);
        let cfg: CaptureConfig = serde_yaml::from_str("debugbus: false").unwrap();
        assert!(!cfg.debugbus);
    }

    #[test]
    fn test_for_model() {
        let manifest = DeviceManifest::for_model("a750");
        assert!(manifest.validate().is_ok());
        assert_eq!(manifest.name, "sim-a750");
    }
}
