// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! gen7_9_0 (a750) capture tables.

use super::gen7_0_0 as base;
use super::*;
use crate::regs;

const PRE_CRASHDUMPER_GPU_REGISTERS: &[u32] = &[
    0x00210, 0x00213, 0x00536, 0x00536, 0x03c00, 0x03c0b, 0x03c40, 0x03c42,
    0x03c45, 0x03c47, 0x03c49, 0x03c4a, 0x03cc0, 0x03cd1, 0x03d00, 0x03d07,
    0x03d40, 0x03d45,
    RANGE_END,
];

const GPU_REGISTERS: &[u32] = &[
    0x00000, 0x00000, 0x00002, 0x00002, 0x00011, 0x00012, 0x00016, 0x0001b,
    0x0001f, 0x00032, 0x00038, 0x0003c, 0x00042, 0x00042, 0x00044, 0x00044,
    0x00047, 0x00047, 0x00049, 0x0004a, 0x0004c, 0x0004c, 0x00050, 0x00050,
    0x00056, 0x00056, 0x00073, 0x0007d, 0x000ad, 0x000ae, 0x000b0, 0x000b0,
    0x00100, 0x00100, 0x00104, 0x0010b, 0x0010f, 0x0011d, 0x0012f, 0x0012f,
    0x00200, 0x0020d, 0x00215, 0x00243, 0x00260, 0x00268, 0x00272, 0x00274,
    0x00286, 0x00286, 0x0028a, 0x0028a, 0x0028c, 0x0028c, 0x00300, 0x00401,
    0x00410, 0x00451, 0x00460, 0x004a3, 0x004c0, 0x004d1, 0x00500, 0x00500,
    0x00507, 0x0050b, 0x0050f, 0x0050f, 0x00511, 0x00511, 0x00533, 0x00534,
    0x00540, 0x00555, 0x00564, 0x00567, 0x00574, 0x00577, 0x00800, 0x00808,
    0x00810, 0x00813, 0x00820, 0x00821, 0x00823, 0x00827, 0x00830, 0x00834,
    0x00850, 0x00854, 0x0087f, 0x0088c, 0x008a0, 0x008a7, 0x008b0, 0x008b2,
    0x008d0, 0x008d2, 0x00900, 0x00903, 0x00a20, 0x00a2f, 0x00a50, 0x00a51,
    0x00c00, 0x00c04, 0x00c06, 0x00c06, 0x00c10, 0x00cd9, 0x00ce0, 0x00d0c,
    0x00df0, 0x00df4, 0x00e01, 0x00e02, 0x00e07, 0x00e0e, 0x00e10, 0x00e13,
    0x00e17, 0x00e19, 0x00e1b, 0x00e2b, 0x00e30, 0x00e32, 0x00e38, 0x00e3c,
    0x00e40, 0x00e4b, 0x00e50, 0x00e5b,
    RANGE_END,
];

const REG_LIST: &[Gen7RegList] = &[
    Gen7RegList {
        regs: GPU_REGISTERS,
        sel: None,
    },
    Gen7RegList {
        regs: base::DBGC_REGISTERS,
        sel: None,
    },
    Gen7RegList {
        regs: base::RB_RAC_REGISTERS,
        sel: Some(&base::RB_RAC_SEL),
    },
    Gen7RegList {
        regs: base::RB_RBP_REGISTERS,
        sel: Some(&base::RB_RBP_SEL),
    },
];

const fn shader(statetype: u32, size: u32, num_sps: u32, num_usptps: u32, pipe: u32, location: u32) -> Gen7ShaderBlock {
    Gen7ShaderBlock {
        statetype,
        size,
        num_sps,
        num_usptps,
        pipe,
        location,
    }
}

const SHADER_BLOCKS: &[Gen7ShaderBlock] = &[
    shader(0x09, 0x0200, 4, 2, PIPE_BR, USPTP),
    shader(0x0a, 0x0080, 4, 2, PIPE_BR, USPTP),
    shader(0x0b, 0x03c0, 4, 2, PIPE_BR, USPTP),
    shader(0x27, 0x0800, 4, 2, PIPE_BR, USPTP),
    shader(0x28, 0x0800, 4, 2, PIPE_BR, USPTP),
    shader(0x29, 0x0800, 4, 2, PIPE_BR, USPTP),
    shader(0x2a, 0x0800, 4, 2, PIPE_BR, USPTP),
    shader(0x2b, 0x0800, 4, 2, PIPE_BR, USPTP),
    shader(0x2c, 0x0800, 4, 2, PIPE_BR, USPTP),
    shader(0x2d, 0x0800, 4, 2, PIPE_BR, USPTP),
    shader(0x2e, 0x0800, 4, 2, PIPE_BR, USPTP),
    shader(0x2f, 0x0800, 4, 2, PIPE_BR, USPTP),
    shader(0x30, 0x0800, 4, 2, PIPE_BR, USPTP),
    shader(0x31, 0x0390, 4, 2, PIPE_BR, USPTP),
    shader(0x32, 0x0800, 4, 2, PIPE_BR, USPTP),
    shader(0x33, 0x0800, 4, 2, PIPE_BR, USPTP),
    shader(0x34, 0x00a0, 4, 2, PIPE_BR, USPTP),
    shader(0x35, 0x0800, 4, 2, PIPE_BR, USPTP),
    shader(0x38, 0x0040, 4, 2, PIPE_BR, USPTP),
    shader(0x39, 0x0100, 4, 2, PIPE_BR, USPTP),
    shader(0x3a, 0x0050, 4, 2, PIPE_BR, USPTP),
    shader(0x3b, 0x0800, 4, 2, PIPE_BR, USPTP),
    shader(0x3c, 0x0800, 4, 2, PIPE_BR, USPTP),
    shader(0x3d, 0x0800, 4, 2, PIPE_BR, USPTP),
    shader(0x3e, 0x0800, 4, 2, PIPE_BR, USPTP),
    shader(0x3f, 0x0800, 4, 2, PIPE_BR, USPTP),
    shader(0x40, 0x0040, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x43, 0x0080, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x44, 0x0010, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x50, 0x0010, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x50, 0x0010, 1, 1, PIPE_BV, HLSQ_STATE),
    shader(0x52, 0x0300, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x52, 0x0300, 1, 1, PIPE_BV, HLSQ_STATE),
    shader(0x54, 0x01c0, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x54, 0x01c0, 1, 1, PIPE_BV, HLSQ_STATE),
    shader(0x55, 0x0600, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x55, 0x0600, 1, 1, PIPE_LPAC, HLSQ_STATE),
    shader(0x5d, 0x0800, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x5d, 0x0800, 1, 1, PIPE_BV, HLSQ_STATE),
    shader(0x5d, 0x0800, 1, 1, PIPE_LPAC, HLSQ_STATE),
    shader(0x67, 0x0800, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x6a, 0x0800, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x6b, 0x0020, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x6c, 0x0080, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x6e, 0x0040, 1, 1, PIPE_BR, HLSQ_STATE),
];

const DEBUGBUS_IDS: &[u32] = &[
    1, 2, 3, 7, 9, 10, 13, 14, 17, 18, 21, 22, 25, 26, 29, 30, 33, 34, 37, 39, 43, 44, 47, 48, 55,
    59, 62, 63, 66, 68, 70, 71, 72, 73, 102, 106, 107, 108, 109, 138, 139, 140, 141, 202, 203,
    234, 235, 236, 237, 242, 243, 244, 245, 250, 251, 252, 253,
];

/// GBIF_CX moved behind the CX controller on this part.
const GBIF_DEBUGBUS_IDS: &[u32] = &[5];

const fn indexed(name: &'static str, addr: u32, data: u32, count: u32) -> IndexedRegs {
    IndexedRegs {
        name,
        addr,
        data,
        count,
        count_fn: None,
    }
}

const INDEXED_REGLIST: &[IndexedRegs] = &[
    indexed("CP_SQE_STAT", regs::CP_SQE_STAT_ADDR, regs::CP_SQE_STAT_DATA, 0x40),
    indexed("CP_DRAW_STATE", regs::CP_DRAW_STATE_ADDR, regs::CP_DRAW_STATE_DATA, 0x100),
    indexed("CP_SQE_UCODE_DBG", regs::CP_SQE_UCODE_DBG_ADDR, regs::CP_SQE_UCODE_DBG_DATA, 0x8000),
    indexed("CP_BV_SQE_STAT", regs::CP_BV_SQE_STAT_ADDR, regs::CP_BV_SQE_STAT_DATA, 0x40),
    indexed("CP_BV_DRAW_STATE", regs::CP_BV_DRAW_STATE_ADDR, regs::CP_BV_DRAW_STATE_DATA, 0x100),
    indexed(
        "CP_BV_SQE_UCODE_DBG",
        regs::CP_BV_SQE_UCODE_DBG_ADDR,
        regs::CP_BV_SQE_UCODE_DBG_DATA,
        0x8000,
    ),
    indexed("CP_SQE_AC_STAT", regs::CP_SQE_AC_STAT_ADDR, regs::CP_SQE_AC_STAT_DATA, 0x40),
    indexed("CP_LPAC_DRAW_STATE", regs::CP_LPAC_DRAW_STATE_ADDR, regs::CP_LPAC_DRAW_STATE_DATA, 0x100),
    indexed(
        "CP_SQE_AC_UCODE_DBG",
        regs::CP_SQE_AC_UCODE_DBG_ADDR,
        regs::CP_SQE_AC_UCODE_DBG_DATA,
        0x8000,
    ),
    indexed("CP_LPAC_FIFO_DBG", regs::CP_LPAC_FIFO_DBG_ADDR, regs::CP_LPAC_FIFO_DBG_DATA, 0x40),
    indexed("CP_LPAC_ROQ", regs::CP_LPAC_ROQ_DBG_ADDR, regs::CP_LPAC_ROQ_DBG_DATA, 0x200),
    indexed("CP_AQE_ROQ_0", regs::CP_AQE_ROQ_DBG_ADDR_0, regs::CP_AQE_ROQ_DBG_DATA_0, 0x100),
    IndexedRegs {
        name: "CP_ROQ",
        addr: regs::CP_ROQ_DBG_ADDR,
        data: regs::CP_ROQ_DBG_DATA,
        count: 0,
        count_fn: Some(base::cp_roq_size),
    },
];

pub static TABLES: Gen7Tables = Gen7Tables {
    reglist: REG_LIST,
    pre_crashdumper: PRE_CRASHDUMPER_GPU_REGISTERS,
    post_crashdumper: base::POST_CRASHDUMPER_REGISTERS,
    shader_blocks: SHADER_BLOCKS,
    clusters: base::CLUSTERS,
    sptp_clusters: base::SPTP_CLUSTERS,
    debugbus: DEBUGBUS_IDS,
    gbif_debugbus: GBIF_DEBUGBUS_IDS,
    indexed: INDEXED_REGLIST,
};
