// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! GPU identity: model, chip id, and the feature bits that steer capture.

use bitflags::bitflags;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Features: u32 {
        /// GBIF replaces the VBIF bus interface.
        const GBIF = 1 << 0;
        const A650_FAMILY = 1 << 1;
        const A660_FAMILY = 1 << 2;
        /// a621/a623 use a different GPU clock controller register list.
        const ALT_GPUCC = 1 << 3;
        /// No real GMU, only a wrapper around the power rails.
        const GMU_WRAPPER = 1 << 4;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GpuModel {
    A630,
    A640,
    A650,
    A660,
    A621,
    A730,
    A740,
    A750,
}

/// Hardware family branch, with the newer branch split into its three
/// sub-generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Generation {
    A6xx,
    A7xxGen1,
    A7xxGen2,
    A7xxGen3,
}

impl Generation {
    pub fn is_a7xx(self) -> bool {
        !matches!(self, Generation::A6xx)
    }
}

impl GpuModel {
    pub fn generation(self) -> Generation {
        match self {
            GpuModel::A630 | GpuModel::A640 | GpuModel::A650 | GpuModel::A660 | GpuModel::A621 => {
                Generation::A6xx
            }
            GpuModel::A730 => Generation::A7xxGen1,
            GpuModel::A740 => Generation::A7xxGen2,
            GpuModel::A750 => Generation::A7xxGen3,
        }
    }

    pub fn features(self) -> Features {
        match self {
            GpuModel::A630 => Features::empty(),
            GpuModel::A640 => Features::GBIF,
            GpuModel::A650 => Features::GBIF | Features::A650_FAMILY,
            GpuModel::A660 => Features::GBIF | Features::A650_FAMILY | Features::A660_FAMILY,
            GpuModel::A621 => Features::GBIF | Features::ALT_GPUCC,
            GpuModel::A730 | GpuModel::A740 | GpuModel::A750 => {
                Features::GBIF | Features::A650_FAMILY | Features::A660_FAMILY
            }
        }
    }

    pub fn default_chip_id(self) -> u32 {
        match self {
            GpuModel::A630 => 0x0603_0001,
            GpuModel::A640 => 0x0604_0001,
            GpuModel::A650 => 0x0605_0002,
            GpuModel::A660 => 0x0606_0001,
            GpuModel::A621 => 0x0602_0100,
            GpuModel::A730 => 0x0703_0001,
            GpuModel::A740 => 0x4305_0a01,
            GpuModel::A750 => 0x4305_1401,
        }
    }
}

impl fmt::Display for GpuModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            GpuModel::A630 => "a630",
            GpuModel::A640 => "a640",
            GpuModel::A650 => "a650",
            GpuModel::A660 => "a660",
            GpuModel::A621 => "a621",
            GpuModel::A730 => "a730",
            GpuModel::A740 => "a740",
            GpuModel::A750 => "a750",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown GPU model '{0}'")]
pub struct UnknownModel(pub String);

impl FromStr for GpuModel {
    type Err = UnknownModel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a630" => Ok(GpuModel::A630),
            "a640" => Ok(GpuModel::A640),
            "a650" => Ok(GpuModel::A650),
            "a660" => Ok(GpuModel::A660),
            "a621" => Ok(GpuModel::A621),
            "a730" => Ok(GpuModel::A730),
            "a740" => Ok(GpuModel::A740),
            "a750" => Ok(GpuModel::A750),
            _ => Err(UnknownModel(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GpuInfo {
    pub model: GpuModel,
    pub chip_id: u32,
    pub features: Features,
}

impl GpuInfo {
    pub fn new(model: GpuModel) -> Self {
        Self {
            model,
            chip_id: model.default_chip_id(),
            features: model.features(),
        }
    }

    pub fn generation(&self) -> Generation {
        self.model.generation()
    }

    pub fn has(&self, feature: Features) -> bool {
        self.features.contains(feature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_round_trip_names() {
        for name in ["a630", "a640", "a650", "a660", "a621", "a730", "a740", "a750"] {
            let model: GpuModel = name.parse().unwrap();
            assert_eq!(model.to_string(), name);
        }
        assert!("a999".parse::<GpuModel>().is_err());
    }

    #[test]
    fn test_generation_dispatch() {
        assert_eq!(GpuModel::A660.generation(), Generation::A6xx);
        assert_eq!(GpuModel::A730.generation(), Generation::A7xxGen1);
        assert_eq!(GpuModel::A740.generation(), Generation::A7xxGen2);
        assert_eq!(GpuModel::A750.generation(), Generation::A7xxGen3);
        assert!(!Generation::A6xx.is_a7xx());
    }

    #[test]
    fn test_features() {
        let a630 = GpuInfo::new(GpuModel::A630);
        assert!(!a630.has(Features::GBIF));
        let a660 = GpuInfo::new(GpuModel::A660);
        assert!(a660.has(Features::GBIF | Features::A650_FAMILY | Features::A660_FAMILY));
        assert!(GpuInfo::new(GpuModel::A621).has(Features::ALT_GPUCC));
    }
}
