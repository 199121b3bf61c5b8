// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! gen7_2_0 (a740) capture tables. The register layout matches gen7_0_0
//! apart from the wider SP array and the extra RB/CCU instances.

use super::gen7_0_0 as base;
use super::*;

const GPU_REGISTERS: &[u32] = &[
    0x00000, 0x00000, 0x00002, 0x00002, 0x00011, 0x00012, 0x00016, 0x0001b,
    0x0001f, 0x00032, 0x00038, 0x0003c, 0x00042, 0x00042, 0x00044, 0x00044,
    0x00047, 0x00047, 0x00049, 0x0004a, 0x0004c, 0x0004c, 0x00050, 0x00050,
    0x00056, 0x00056, 0x00073, 0x0007d, 0x000ad, 0x000ae, 0x000b0, 0x000b0,
    0x000b4, 0x000b4, 0x000b8, 0x000b8, 0x000bc, 0x000bc, 0x000c0, 0x000c0,
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
    0x00e40, 0x00e4b,
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
    shader(0x09, 0x0200, 6, 2, PIPE_BR, USPTP),
    shader(0x0a, 0x0080, 6, 2, PIPE_BR, USPTP),
    shader(0x0b, 0x03c0, 6, 2, PIPE_BR, USPTP),
    shader(0x27, 0x0800, 6, 2, PIPE_BR, USPTP),
    shader(0x28, 0x0800, 6, 2, PIPE_BR, USPTP),
    shader(0x29, 0x0800, 6, 2, PIPE_BR, USPTP),
    shader(0x2a, 0x0800, 6, 2, PIPE_BR, USPTP),
    shader(0x2b, 0x0800, 6, 2, PIPE_BR, USPTP),
    shader(0x2c, 0x0800, 6, 2, PIPE_BR, USPTP),
    shader(0x2d, 0x0800, 6, 2, PIPE_BR, USPTP),
    shader(0x2e, 0x0800, 6, 2, PIPE_BR, USPTP),
    shader(0x2f, 0x0800, 6, 2, PIPE_BR, USPTP),
    shader(0x30, 0x0800, 6, 2, PIPE_BR, USPTP),
    shader(0x31, 0x0390, 6, 2, PIPE_BR, USPTP),
    shader(0x34, 0x00a0, 6, 2, PIPE_BR, USPTP),
    shader(0x35, 0x0800, 6, 2, PIPE_BR, USPTP),
    shader(0x36, 0x0080, 6, 2, PIPE_BR, USPTP),
    shader(0x37, 0x0080, 6, 2, PIPE_BR, USPTP),
    shader(0x38, 0x0040, 6, 2, PIPE_BR, USPTP),
    shader(0x39, 0x0100, 6, 2, PIPE_BR, USPTP),
    shader(0x3a, 0x0050, 6, 2, PIPE_BR, USPTP),
    shader(0x3b, 0x0800, 6, 2, PIPE_BR, USPTP),
    shader(0x3c, 0x0800, 6, 2, PIPE_BR, USPTP),
    shader(0x3d, 0x0800, 6, 2, PIPE_BR, USPTP),
    shader(0x3e, 0x0800, 6, 2, PIPE_BR, USPTP),
    shader(0x3f, 0x0800, 6, 2, PIPE_BR, USPTP),
    shader(0x50, 0x0010, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x50, 0x0010, 1, 1, PIPE_BV, HLSQ_STATE),
    shader(0x51, 0x0010, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x52, 0x0300, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x52, 0x0300, 1, 1, PIPE_BV, HLSQ_STATE),
    shader(0x53, 0x0300, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x54, 0x01c0, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x54, 0x01c0, 1, 1, PIPE_BV, HLSQ_STATE),
    shader(0x55, 0x0300, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x55, 0x0300, 1, 1, PIPE_LPAC, HLSQ_STATE),
    shader(0x5a, 0x0280, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x5b, 0x0800, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x5c, 0x0200, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x5d, 0x0800, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x5d, 0x0800, 1, 1, PIPE_BV, HLSQ_STATE),
    shader(0x5d, 0x0800, 1, 1, PIPE_LPAC, HLSQ_STATE),
    shader(0x5e, 0x0800, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x5f, 0x0800, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x62, 0x0080, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x67, 0x0800, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x68, 0x0010, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x69, 0x0010, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x6b, 0x0020, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x6c, 0x0080, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x6d, 0x0010, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x6e, 0x0040, 1, 1, PIPE_BR, HLSQ_STATE),
];

const DEBUGBUS_IDS: &[u32] = &[
    1, 2, 3, 7, 9, 10, 13, 14, 17, 18, 21, 22, 25, 26, 29, 30, 33, 34, 37, 39, 43, 44, 47, 48, 55,
    59, 62, 63, 66, 68, 70, 71, 72, 73, 74, 75, 102, 106, 107, 108, 109, 110, 111, 138, 139, 140,
    141, 142, 143, 202, 203, 234, 235, 236, 237, 238, 239, 242, 243, 244, 245, 246, 247, 250, 251,
    252, 253, 254, 255,
];

pub static TABLES: Gen7Tables = Gen7Tables {
    reglist: REG_LIST,
    pre_crashdumper: base::PRE_CRASHDUMPER_GPU_REGISTERS,
    post_crashdumper: base::POST_CRASHDUMPER_REGISTERS,
    shader_blocks: SHADER_BLOCKS,
    clusters: base::CLUSTERS,
    sptp_clusters: base::SPTP_CLUSTERS,
    debugbus: DEBUGBUS_IDS,
    gbif_debugbus: base::GBIF_DEBUGBUS_IDS,
    indexed: base::INDEXED_REGLIST,
};
