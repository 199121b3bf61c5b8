// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Static descriptor tables: what to capture, per hardware generation.
//!
//! Register ranges are flat arrays of inclusive `(start, end)` pairs in
//! register units, terminated by [`RANGE_END`]. Every table here is
//! immutable; selecting one is a pure lookup keyed by [`Generation`].

pub mod a6xx;
pub mod gen7_0_0;
pub mod gen7_2_0;
pub mod gen7_9_0;

use crate::hw::{Features, Generation};
use crate::GpuDevice;
use lazy_static::lazy_static;
use std::collections::HashMap;

/// Terminates a flat range list.
pub const RANGE_END: u32 = u32::MAX;

/// Iterate the `(start, end)` pairs of a range list in table order.
pub fn ranges(regs: &[u32]) -> impl Iterator<Item = (u32, u32)> + '_ {
    regs.chunks_exact(2)
        .take_while(|pair| pair[0] != RANGE_END)
        .map(|pair| (pair[0], pair[1]))
}

/// Number of registers covered by a range list.
pub fn range_count(regs: &[u32]) -> usize {
    ranges(regs).map(|(start, end)| (end - start + 1) as usize).sum()
}

/// A plain register list, read either directly or through the crash dumper.
#[derive(Debug, PartialEq, Eq)]
pub struct RegList {
    pub name: &'static str,
    pub regs: &'static [u32],
    /// Selector register and value programmed before the list is readable.
    pub sel: Option<(u32, u32)>,
    /// Only captured when the GPU has all of these features.
    pub requires: Features,
}

/// Registers behind the HLSQ debug aperture (a6xx).
#[derive(Debug, PartialEq, Eq)]
pub struct HlsqRegList {
    pub name: &'static str,
    pub regs: &'static [u32],
    /// Byte address of the block the aperture windows onto.
    pub base: u32,
    pub sel_val: u32,
}

/// A per-context register cluster behind the CP aperture (a6xx).
#[derive(Debug, PartialEq, Eq)]
pub struct Cluster {
    pub id: u32,
    pub name: &'static str,
    pub regs: &'static [u32],
    pub sel: Option<(u32, u32)>,
    pub requires: Features,
}

/// A per-context cluster behind the HLSQ debug aperture (a6xx).
#[derive(Debug, PartialEq, Eq)]
pub struct DbgAhbCluster {
    pub name: &'static str,
    pub statetype: u32,
    pub base: u32,
    pub regs: &'static [u32],
}

/// Shader memory block, read once per bank (a6xx).
#[derive(Debug, PartialEq, Eq)]
pub struct ShaderBlock {
    pub ty: u32,
    pub name: &'static str,
    pub size: u32,
}

/// An address/data register pair whose data port auto-increments.
#[derive(Debug)]
pub struct IndexedRegs {
    pub name: &'static str,
    pub addr: u32,
    pub data: u32,
    pub count: u32,
    /// Computes the count from live hardware state instead of `count`.
    pub count_fn: Option<fn(&mut dyn GpuDevice) -> u32>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct DebugbusBlock {
    pub name: &'static str,
    pub id: u32,
    /// Number of 64-bit samples.
    pub count: u32,
}

/// Selector programmed before a gen7 list is readable. The crash dumper
/// and the host see the selector at different offsets.
#[derive(Debug, PartialEq, Eq)]
pub struct Selector {
    pub cd_reg: u32,
    pub host_reg: u32,
    pub val: u32,
}

#[derive(Debug)]
pub struct Gen7RegList {
    pub regs: &'static [u32],
    pub sel: Option<&'static Selector>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Gen7Cluster {
    pub pipe: u32,
    pub cluster: u32,
    pub context: u32,
    pub regs: &'static [u32],
    pub sel: Option<&'static Selector>,
}

#[derive(Debug, PartialEq, Eq)]
pub struct Gen7SptpCluster {
    pub pipe: u32,
    pub cluster: u32,
    pub context: u32,
    pub location: u32,
    pub statetype: u32,
    pub regbase: u32,
    pub regs: &'static [u32],
}

#[derive(Debug, PartialEq, Eq)]
pub struct Gen7ShaderBlock {
    pub statetype: u32,
    pub size: u32,
    pub num_sps: u32,
    pub num_usptps: u32,
    pub pipe: u32,
    pub location: u32,
}

/// Everything a gen7 sub-generation captures.
#[derive(Debug)]
pub struct Gen7Tables {
    pub reglist: &'static [Gen7RegList],
    pub pre_crashdumper: &'static [u32],
    pub post_crashdumper: &'static [u32],
    pub shader_blocks: &'static [Gen7ShaderBlock],
    pub clusters: &'static [Gen7Cluster],
    pub sptp_clusters: &'static [Gen7SptpCluster],
    /// Block ids, resolved through [`gen7_debugbus_block`].
    pub debugbus: &'static [u32],
    pub gbif_debugbus: &'static [u32],
    pub indexed: &'static [IndexedRegs],
}

/// Select the gen7 table set for a generation; `None` for a6xx, whose
/// tables are fixed in [`a6xx`].
pub fn gen7_tables(generation: Generation) -> Option<&'static Gen7Tables> {
    match generation {
        Generation::A6xx => None,
        Generation::A7xxGen1 => Some(&gen7_0_0::TABLES),
        Generation::A7xxGen2 => Some(&gen7_2_0::TABLES),
        Generation::A7xxGen3 => Some(&gen7_9_0::TABLES),
    }
}

lazy_static! {
    static ref GEN7_DEBUGBUS_INDEX: HashMap<u32, &'static DebugbusBlock> = gen7_0_0::DEBUGBUS_BLOCKS
        .iter()
        .map(|block| (block.id, block))
        .collect();
}

/// Look up a gen7 debug bus block by id.
pub fn gen7_debugbus_block(id: u32) -> Option<&'static DebugbusBlock> {
    GEN7_DEBUGBUS_INDEX.get(&id).copied()
}

// gen7 pipes
pub const PIPE_NONE: u32 = 0;
pub const PIPE_BR: u32 = 1;
pub const PIPE_BV: u32 = 2;
pub const PIPE_LPAC: u32 = 3;

// gen7 clusters
pub const CLUSTER_NONE: u32 = 0;
pub const CLUSTER_FE: u32 = 1;
pub const CLUSTER_SP_VS: u32 = 2;
pub const CLUSTER_PC_VS: u32 = 3;
pub const CLUSTER_GRAS: u32 = 4;
pub const CLUSTER_SP_PS: u32 = 5;
pub const CLUSTER_VPC_PS: u32 = 6;
pub const CLUSTER_PS: u32 = 7;

// gen7 context selection
pub const STATE_NON_CONTEXT: u32 = 0;
pub const STATE_TOGGLE_CTXT: u32 = 1;
pub const STATE_FORCE_CTXT_0: u32 = 2;
pub const STATE_FORCE_CTXT_1: u32 = 3;

// gen7 SP read locations
pub const HLSQ_STATE: u32 = 0;
pub const HLSQ_DP: u32 = 1;
pub const SP_TOP: u32 = 2;
pub const USPTP: u32 = 3;

pub fn pipe_name(pipe: u32) -> &'static str {
    match pipe {
        PIPE_NONE => "PIPE_NONE",
        PIPE_BR => "PIPE_BR",
        PIPE_BV => "PIPE_BV",
        PIPE_LPAC => "PIPE_LPAC",
        _ => "PIPE_UNKNOWN",
    }
}

pub fn cluster_name(cluster: u32) -> &'static str {
    match cluster {
        CLUSTER_NONE => "CLUSTER_NONE",
        CLUSTER_FE => "CLUSTER_FE",
        CLUSTER_SP_VS => "CLUSTER_SP_VS",
        CLUSTER_PC_VS => "CLUSTER_PC_VS",
        CLUSTER_GRAS => "CLUSTER_GRAS",
        CLUSTER_SP_PS => "CLUSTER_SP_PS",
        CLUSTER_VPC_PS => "CLUSTER_VPC_PS",
        CLUSTER_PS => "CLUSTER_PS",
        _ => "CLUSTER_UNKNOWN",
    }
}

/// gen7 state type names, keyed by state type.
const STATETYPE_NAMES: &[(u32, &str)] = &[
    (0x00, "TP0_NCTX_REG"),
    (0x01, "TP0_CTX0_3D_CVS_REG"),
    (0x02, "TP0_CTX0_3D_CPS_REG"),
    (0x03, "TP0_CTX1_3D_CVS_REG"),
    (0x04, "TP0_CTX1_3D_CPS_REG"),
    (0x05, "TP0_CTX2_3D_CPS_REG"),
    (0x06, "TP0_CTX3_3D_CPS_REG"),
    (0x09, "TP0_TMO_DATA"),
    (0x0a, "TP0_SMO_DATA"),
    (0x0b, "TP0_MIPMAP_BASE_DATA"),
    (0x20, "SP_NCTX_REG"),
    (0x21, "SP_CTX0_3D_CVS_REG"),
    (0x22, "SP_CTX0_3D_CPS_REG"),
    (0x23, "SP_CTX1_3D_CVS_REG"),
    (0x24, "SP_CTX1_3D_CPS_REG"),
    (0x25, "SP_CTX2_3D_CPS_REG"),
    (0x26, "SP_CTX3_3D_CPS_REG"),
    (0x27, "SP_INST_DATA"),
    (0x28, "SP_INST_DATA_1"),
    (0x29, "SP_LB_0_DATA"),
    (0x2a, "SP_LB_1_DATA"),
    (0x2b, "SP_LB_2_DATA"),
    (0x2c, "SP_LB_3_DATA"),
    (0x2d, "SP_LB_4_DATA"),
    (0x2e, "SP_LB_5_DATA"),
    (0x2f, "SP_LB_6_DATA"),
    (0x30, "SP_LB_7_DATA"),
    (0x31, "SP_CB_RAM"),
    (0x32, "SP_LB_13_DATA"),
    (0x33, "SP_LB_14_DATA"),
    (0x34, "SP_INST_TAG"),
    (0x35, "SP_INST_DATA_2"),
    (0x36, "SP_TMO_TAG"),
    (0x37, "SP_SMO_TAG"),
    (0x38, "SP_STATE_DATA"),
    (0x39, "SP_HWAVE_RAM"),
    (0x3a, "SP_L0_INST_BUF"),
    (0x3b, "SP_LB_8_DATA"),
    (0x3c, "SP_LB_9_DATA"),
    (0x3d, "SP_LB_10_DATA"),
    (0x3e, "SP_LB_11_DATA"),
    (0x3f, "SP_LB_12_DATA"),
    (0x40, "HLSQ_DATAPATH_DSTR_META"),
    (0x43, "HLSQ_L2STC_TAG_RAM"),
    (0x44, "HLSQ_L2STC_INFO_CMD"),
    (0x50, "HLSQ_CVS_BE_CTXT_BUF_RAM_TAG"),
    (0x51, "HLSQ_CPS_BE_CTXT_BUF_RAM_TAG"),
    (0x52, "HLSQ_GFX_CVS_BE_CTXT_BUF_RAM"),
    (0x53, "HLSQ_GFX_CPS_BE_CTXT_BUF_RAM"),
    (0x54, "HLSQ_CHUNK_CVS_RAM"),
    (0x55, "HLSQ_CHUNK_CPS_RAM"),
    (0x56, "HLSQ_CHUNK_CVS_RAM_TAG"),
    (0x57, "HLSQ_CHUNK_CPS_RAM_TAG"),
    (0x58, "HLSQ_ICB_CVS_CB_BASE_TAG"),
    (0x59, "HLSQ_ICB_CPS_CB_BASE_TAG"),
    (0x5a, "HLSQ_CVS_MISC_RAM"),
    (0x5b, "HLSQ_CPS_MISC_RAM"),
    (0x5c, "HLSQ_CPS_MISC_RAM_1"),
    (0x5d, "HLSQ_INST_RAM"),
    (0x5e, "HLSQ_GFX_CVS_CONST_RAM"),
    (0x5f, "HLSQ_GFX_CPS_CONST_RAM"),
    (0x60, "HLSQ_CVS_MISC_RAM_TAG"),
    (0x61, "HLSQ_CPS_MISC_RAM_TAG"),
    (0x62, "HLSQ_INST_RAM_TAG"),
    (0x63, "HLSQ_GFX_CVS_CONST_RAM_TAG"),
    (0x64, "HLSQ_GFX_CPS_CONST_RAM_TAG"),
    (0x65, "HLSQ_GFX_LOCAL_MISC_RAM"),
    (0x66, "HLSQ_GFX_LOCAL_MISC_RAM_TAG"),
    (0x67, "HLSQ_INST_RAM_1"),
    (0x68, "HLSQ_STPROC_META"),
    (0x69, "HLSQ_BV_BE_META"),
    (0x6a, "HLSQ_INST_RAM_2"),
    (0x6b, "HLSQ_DATAPATH_META"),
    (0x6c, "HLSQ_FRONTEND_META"),
    (0x6d, "HLSQ_INDIRECT_META"),
    (0x6e, "HLSQ_BACKEND_META"),
];

pub fn statetype_name(statetype: u32) -> &'static str {
    STATETYPE_NAMES
        .iter()
        .find(|(ty, _)| *ty == statetype)
        .map(|(_, name)| *name)
        .unwrap_or("STATETYPE_UNKNOWN")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_ranges(name: &str, regs: &[u32]) {
        assert_eq!(
            regs.last(),
            Some(&RANGE_END),
            "{} is not terminated",
            name
        );
        assert_eq!(regs.len() % 2, 1, "{} has an odd number of bounds", name);
        for (start, end) in ranges(regs) {
            assert!(start <= end, "{}: {:#x} > {:#x}", name, start, end);
        }
    }

    #[test]
    fn test_ranges_stop_at_sentinel() {
        let regs = [0x10, 0x12, 0x20, 0x20, RANGE_END, 0x30, 0x31];
        let pairs: Vec<_> = ranges(&regs).collect();
        assert_eq!(pairs, vec![(0x10, 0x12), (0x20, 0x20)]);
        assert_eq!(range_count(&regs), 4);
    }

    #[test]
    fn test_a6xx_tables_well_formed() {
        for list in a6xx::REGLIST {
            check_ranges(list.name, list.regs);
        }
        for list in a6xx::HLSQ_REGLIST {
            check_ranges(list.name, list.regs);
        }
        for list in a6xx::GMU_REGLIST {
            check_ranges(list.name, list.regs);
        }
        for cluster in a6xx::CLUSTERS {
            check_ranges(cluster.name, cluster.regs);
        }
        for cluster in a6xx::DBGAHB_CLUSTERS {
            check_ranges(cluster.name, cluster.regs);
        }
        check_ranges("ahb", a6xx::AHB_REGLIST.regs);
        check_ranges("vbif", a6xx::VBIF_REGLIST.regs);
        check_ranges("gbif", a6xx::GBIF_REGLIST.regs);
        check_ranges("gpucc", a6xx::GPUCC_REG.regs);
        check_ranges("a621 gpucc", a6xx::A621_GPUCC_REG.regs);
    }

    #[test]
    fn test_gen7_tables_well_formed() {
        for generation in [Generation::A7xxGen1, Generation::A7xxGen2, Generation::A7xxGen3] {
            let tables = gen7_tables(generation).unwrap();
            for list in tables.reglist {
                check_ranges("reglist", list.regs);
            }
            check_ranges("pre", tables.pre_crashdumper);
            check_ranges("post", tables.post_crashdumper);
            for cluster in tables.clusters {
                check_ranges(cluster_name(cluster.cluster), cluster.regs);
            }
            for cluster in tables.sptp_clusters {
                check_ranges(statetype_name(cluster.statetype), cluster.regs);
            }
            for id in tables.debugbus.iter().chain(tables.gbif_debugbus) {
                assert!(gen7_debugbus_block(*id).is_some(), "unknown block {:#x}", id);
            }
        }
        assert!(gen7_tables(Generation::A6xx).is_none());
    }

    #[test]
    fn test_names() {
        assert_eq!(pipe_name(PIPE_BV), "PIPE_BV");
        assert_eq!(cluster_name(CLUSTER_VPC_PS), "CLUSTER_VPC_PS");
        assert_eq!(statetype_name(0x29), "SP_LB_0_DATA");
        assert_eq!(statetype_name(0xff), "STATETYPE_UNKNOWN");
    }
}
