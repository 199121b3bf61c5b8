// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::hw::GpuInfo;
use crate::tables::{
    Cluster, DbgAhbCluster, DebugbusBlock, Gen7Cluster, Gen7ShaderBlock, Gen7SptpCluster,
    HlsqRegList, IndexedRegs, RegList, ShaderBlock,
};
use crate::{HFI_HISTORY_SZ, HFI_QUEUES};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// A descriptor paired with the words captured for it.
///
/// The handle borrows the static table entry; the data buffer is owned by
/// the snapshot. `data` is `None` when the capture failed, never a
/// partially filled buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedObject<H> {
    pub handle: H,
    pub data: Option<Vec<u32>>,
    /// Word count, for objects whose size is only known at capture time.
    pub count: u32,
}

impl<H> CapturedObject<H> {
    pub fn new(handle: H, data: Option<Vec<u32>>) -> Self {
        let count = data.as_ref().map_or(0, |d| d.len() as u32);
        Self {
            handle,
            data,
            count,
        }
    }

    pub fn missing(handle: H) -> Self {
        Self::new(handle, None)
    }

    pub fn is_captured(&self) -> bool {
        self.data.is_some()
    }

    pub fn words(&self) -> usize {
        self.data.as_ref().map_or(0, Vec::len)
    }
}

/// Where a register section came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterSource {
    List(&'static RegList),
    Hlsq(&'static HlsqRegList),
    /// A bare gen7 range list.
    Ranges(&'static [u32]),
}

impl RegisterSource {
    pub fn regs(&self) -> &'static [u32] {
        match self {
            RegisterSource::List(list) => list.regs,
            RegisterSource::Hlsq(list) => list.regs,
            RegisterSource::Ranges(regs) => regs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShaderHandle {
    A6xx(&'static ShaderBlock),
    Gen7(&'static Gen7ShaderBlock),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClusterHandle {
    A6xx(&'static Cluster),
    Gen7(&'static Gen7Cluster),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DbgAhbHandle {
    A6xx(&'static DbgAhbCluster),
    Gen7(&'static Gen7SptpCluster),
}

/// Copy of a GMU firmware buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GmuBlock {
    pub iova: u64,
    pub size: usize,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Registers,
    GmuRegisters,
    Indexed,
    Shaders,
    Clusters,
    DbgAhbClusters,
    Debugbus,
    VbifDebugbus,
    CxDebugbus,
}

/// Everything captured in one pass. Dropping it frees every buffer.
#[derive(Debug, Clone)]
pub struct GpuState {
    pub info: GpuInfo,
    pub gpu_initialized: bool,
    pub registers: Vec<CapturedObject<RegisterSource>>,
    pub gmu_registers: Vec<CapturedObject<RegisterSource>>,
    pub indexed: Vec<CapturedObject<&'static IndexedRegs>>,
    pub shaders: Vec<CapturedObject<ShaderHandle>>,
    pub clusters: Vec<CapturedObject<ClusterHandle>>,
    pub dbgahb_clusters: Vec<CapturedObject<DbgAhbHandle>>,
    pub debugbus: Vec<CapturedObject<&'static DebugbusBlock>>,
    /// VBIF test bus words, on parts without GBIF.
    pub vbif_debugbus: Option<Vec<u32>>,
    pub cx_debugbus: Vec<CapturedObject<&'static DebugbusBlock>>,
    pub gmu_log: Option<GmuBlock>,
    pub gmu_hfi: Option<GmuBlock>,
    pub gmu_debug: Option<GmuBlock>,
    /// Recent HFI message ids per queue, oldest first.
    pub hfi_queue_history: [[i32; HFI_HISTORY_SZ]; HFI_QUEUES],
}

impl GpuState {
    pub fn new(info: GpuInfo) -> Self {
        Self {
            info,
            gpu_initialized: false,
            registers: Vec::new(),
            gmu_registers: Vec::new(),
            indexed: Vec::new(),
            shaders: Vec::new(),
            clusters: Vec::new(),
            dbgahb_clusters: Vec::new(),
            debugbus: Vec::new(),
            vbif_debugbus: None,
            cx_debugbus: Vec::new(),
            gmu_log: None,
            gmu_hfi: None,
            gmu_debug: None,
            hfi_queue_history: [[0; HFI_HISTORY_SZ]; HFI_QUEUES],
        }
    }

    /// `(captured, words)` for every object of a category.
    pub fn objects(&self, category: Category) -> Vec<(bool, usize)> {
        fn list<H>(objs: &[CapturedObject<H>]) -> Vec<(bool, usize)> {
            objs.iter().map(|o| (o.is_captured(), o.words())).collect()
        }

        match category {
            Category::Registers => list(&self.registers),
            Category::GmuRegisters => list(&self.gmu_registers),
            Category::Indexed => list(&self.indexed),
            Category::Shaders => list(&self.shaders),
            Category::Clusters => list(&self.clusters),
            Category::DbgAhbClusters => list(&self.dbgahb_clusters),
            Category::Debugbus => list(&self.debugbus),
            Category::VbifDebugbus => self
                .vbif_debugbus
                .iter()
                .map(|d| (true, d.len()))
                .collect(),
            Category::CxDebugbus => list(&self.cx_debugbus),
        }
    }
}

pub type SnapshotRef = Arc<GpuState>;

/// Drop one reference to a snapshot. Returns true when that was the last
/// reference, or when there was no snapshot at all.
pub fn release(state: Option<SnapshotRef>) -> bool {
    match state {
        None => true,
        Some(state) => Arc::into_inner(state).is_some(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub captured: usize,
    pub missing: usize,
    pub words: usize,
}

/// Machine-readable overview of a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotSummary {
    pub model: String,
    pub chip_id: u32,
    pub gpu_initialized: bool,
    pub categories: BTreeMap<Category, CategorySummary>,
    /// Byte size of each GMU firmware buffer that was copied.
    pub gmu_buffers: BTreeMap<String, usize>,
}

const ALL_CATEGORIES: [Category; 9] = [
    Category::Registers,
    Category::GmuRegisters,
    Category::Indexed,
    Category::Shaders,
    Category::Clusters,
    Category::DbgAhbClusters,
    Category::Debugbus,
    Category::VbifDebugbus,
    Category::CxDebugbus,
];

impl SnapshotSummary {
    pub fn from_state(state: &GpuState) -> Self {
        let categories = ALL_CATEGORIES
            .iter()
            .map(|&category| {
                let mut summary = CategorySummary::default();
                for (captured, words) in state.objects(category) {
                    if captured {
                        summary.captured += 1;
                        summary.words += words;
                    } else {
                        summary.missing += 1;
                    }
                }
                (category, summary)
            })
            .collect();

        let gmu_buffers = [
            ("log", &state.gmu_log),
            ("hfi", &state.gmu_hfi),
            ("debug", &state.gmu_debug),
        ]
        .into_iter()
        .filter_map(|(name, block)| block.as_ref().map(|b| (name.to_string(), b.size)))
        .collect();

        Self {
            model: state.info.model.to_string(),
            chip_id: state.info.chip_id,
            gpu_initialized: state.gpu_initialized,
            categories,
            gmu_buffers,
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::GpuModel;
    use crate::tables::a6xx;

    #[test]
    fn test_release_counts_references() {
        assert!(release(None));

        let state: SnapshotRef = Arc::new(GpuState::new(GpuInfo::new(GpuModel::A630)));
        let other = Arc::clone(&state);
        assert!(!release(Some(state)));
        assert!(release(Some(other)));
    }

    #[test]
    fn test_summary_counts() {
        let mut state = GpuState::new(GpuInfo::new(GpuModel::A640));
        state.registers.push(CapturedObject::new(
            RegisterSource::List(&a6xx::AHB_REGLIST),
            Some(vec![1, 2, 3]),
        ));
        state
            .registers
            .push(CapturedObject::missing(RegisterSource::Ranges(&[])));
        state.gmu_log = Some(GmuBlock {
            iova: 0x6000_0000,
            size: 16,
            data: vec![0; 16],
        });

        let summary = SnapshotSummary::from_state(&state);
        let regs = &summary.categories[&Category::Registers];
        assert_eq!((regs.captured, regs.missing, regs.words), (1, 1, 3));
        assert_eq!(summary.categories[&Category::Shaders], CategorySummary::default());
        assert_eq!(summary.gmu_buffers.get("log"), Some(&16));
        assert_eq!(summary.model, "a640");

        let json = summary.to_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["categories"]["registers"]["words"], 3);
        assert_eq!(parsed["gpu_initialized"], false);
    }
}
