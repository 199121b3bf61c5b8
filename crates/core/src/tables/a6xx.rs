// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! a6xx capture tables.

use super::{Cluster, DbgAhbCluster, DebugbusBlock, HlsqRegList, IndexedRegs, RegList, ShaderBlock, RANGE_END};
use crate::hw::Features;
use crate::regs;
use crate::GpuDevice;

pub const NUM_CONTEXTS: u32 = 2;
pub const NUM_SHADER_BANKS: u32 = 3;

pub const CLUSTER_FE: u32 = 0x0;
pub const CLUSTER_SP_VS: u32 = 0x1;
pub const CLUSTER_PC_VS: u32 = 0x2;
pub const CLUSTER_GRAS: u32 = 0x3;
pub const CLUSTER_SP_PS: u32 = 0x4;
pub const CLUSTER_PS: u32 = 0x5;
pub const CLUSTER_VPC_PS: u32 = 0x6;

const fn reglist(name: &'static str, regs: &'static [u32]) -> RegList {
    RegList {
        name,
        regs,
        sel: None,
        requires: Features::empty(),
    }
}

// Registers read directly over AHB, with or without the crash dumper.
const AHB_REGISTERS: &[u32] = &[
    0x0000, 0x0002, 0x0010, 0x0010, 0x0012, 0x0012, 0x0018, 0x001b,
    0x001e, 0x0032, 0x0038, 0x003c, 0x0042, 0x0042, 0x0044, 0x0044,
    0x0047, 0x0047, 0x0056, 0x0056, 0x00ad, 0x00ae, 0x00b0, 0x00fb,
    0x0100, 0x011d, 0x0200, 0x020d, 0x0210, 0x0213, 0x0218, 0x023d,
    0x0400, 0x04f9, 0x0500, 0x0500, 0x0505, 0x050b, 0x050e, 0x0511,
    0x0533, 0x0533, 0x0540, 0x0555,
    RANGE_END,
];

pub const AHB_REGLIST: RegList = reglist("ahb", AHB_REGISTERS);

const VBIF_REGISTERS: &[u32] = &[
    0x3000, 0x3007, 0x300c, 0x3014, 0x3018, 0x302c, 0x3030, 0x3030,
    0x3034, 0x3036, 0x303c, 0x303d, 0x3040, 0x3040, 0x3042, 0x3042,
    0x3049, 0x3049, 0x3058, 0x3058, 0x305a, 0x3061, 0x3064, 0x3068,
    0x306c, 0x306d, 0x3090, 0x3094, 0x3098, 0x3098, 0x30c0, 0x30c8,
    0x30d0, 0x30d0, 0x30d8, 0x30d8, 0x30e0, 0x30e0, 0x3100, 0x3100,
    0x3108, 0x3108, 0x3110, 0x3110, 0x3118, 0x3118, 0x3120, 0x3120,
    0x3124, 0x3125, 0x3129, 0x3129, 0x3131, 0x3131, 0x3154, 0x3154,
    0x3156, 0x3156, 0x3158, 0x3158, 0x315a, 0x315a, 0x315c, 0x315c,
    0x315e, 0x315e, 0x3160, 0x3160, 0x3162, 0x3162, 0x340c, 0x340c,
    0x3410, 0x3410, 0x3800, 0x3801,
    RANGE_END,
];

pub const VBIF_REGLIST: RegList = reglist("vbif", VBIF_REGISTERS);

const GBIF_REGISTERS: &[u32] = &[
    0x3c00, 0x3c0b, 0x3c40, 0x3c47, 0x3cc0, 0x3cd1, 0xe3a, 0xe3a,
    RANGE_END,
];

pub const GBIF_REGLIST: RegList = reglist("gbif", GBIF_REGISTERS);

const CP_REGISTERS: &[u32] = &[
    0x0800, 0x0808, 0x0810, 0x0813, 0x0820, 0x0821, 0x0823, 0x0824,
    0x0826, 0x0827, 0x0830, 0x0833, 0x084f, 0x086f, 0x0880, 0x088a,
    0x08a0, 0x08ab, 0x08c0, 0x08c4, 0x08d0, 0x08dd, 0x08f0, 0x08f3,
    0x0900, 0x0903, 0x0928, 0x093e, 0x0942, 0x094d, 0x0980, 0x0984,
    0x098d, 0x0996, 0x0998, 0x099e, 0x09a0, 0x09a6, 0x09a8, 0x09ae,
    0x09b0, 0x09b1, 0x09c2, 0x09c8,
    RANGE_END,
];

const VSC_UCHE_REGISTERS: &[u32] = &[
    0x0c00, 0x0c04, 0x0c06, 0x0c06, 0x0c10, 0x0cd9, 0x0e00, 0x0e0e,
    0x0e10, 0x0e13, 0x0e17, 0x0e19, 0x0e1c, 0x0e2b, 0x0e30, 0x0e32,
    0x0e38, 0x0e39,
    RANGE_END,
];

const GRAS_VPC_PC_VFD_REGISTERS: &[u32] = &[
    0x8600, 0x8601, 0x8610, 0x861b, 0x8620, 0x8620, 0x8628, 0x862b,
    0x8630, 0x8637, 0x9600, 0x9604, 0x9624, 0x9637, 0x9e00, 0x9e01,
    0x9e03, 0x9e0e, 0x9e11, 0x9e16, 0x9e19, 0x9e19, 0x9e1c, 0x9e1c,
    0x9e20, 0x9e23, 0x9e30, 0x9e31, 0x9e34, 0x9e34, 0x9e70, 0x9e72,
    0x9e78, 0x9e79, 0x9e80, 0x9fff, 0xa600, 0xa601, 0xa603, 0xa603,
    0xa60a, 0xa60a, 0xa610, 0xa617, 0xa630, 0xa630,
    RANGE_END,
];

const RB_RAC_REGISTERS: &[u32] = &[
    0x8e01, 0x8e01, 0x8e04, 0x8e05, 0x8e07, 0x8e08, 0x8e0c, 0x8e0c,
    0x8e10, 0x8e1c, 0x8e20, 0x8e25, 0x8e28, 0x8e28, 0x8e2c, 0x8e2f,
    0x8e50, 0x8e52,
    RANGE_END,
];

const RB_RBP_REGISTERS: &[u32] = &[
    0x8e01, 0x8e01, 0x8e0c, 0x8e0c, 0x8e3c, 0x8e3c, 0x8e40, 0x8e43,
    0x8e50, 0x8e52,
    RANGE_END,
];

const A660_REGISTERS: &[u32] = &[0x0a40, 0x0a43, 0x0a52, 0x0a5d, 0x0ab0, 0x0ab7, RANGE_END];

/// Lists read through the crash dumper when it is available, over AHB
/// otherwise.
pub static REGLIST: &[RegList] = &[
    reglist("cp", CP_REGISTERS),
    reglist("vsc_uche", VSC_UCHE_REGISTERS),
    reglist("gras_vpc_pc_vfd", GRAS_VPC_PC_VFD_REGISTERS),
    RegList {
        name: "rb_rac",
        regs: RB_RAC_REGISTERS,
        sel: Some((regs::RB_RB_SUB_BLOCK_SEL_CNTL_CD, 0x0)),
        requires: Features::empty(),
    },
    RegList {
        name: "rb_rbp",
        regs: RB_RBP_REGISTERS,
        sel: Some((regs::RB_RB_SUB_BLOCK_SEL_CNTL_CD, 0x9)),
        requires: Features::empty(),
    },
    RegList {
        name: "a660",
        regs: A660_REGISTERS,
        sel: None,
        requires: Features::A660_FAMILY,
    },
];

const HLSQ_NONCONTEXT_REGISTERS: &[u32] = &[
    0xbe00, 0xbe01, 0xbe04, 0xbe05, 0xbe08, 0xbe09, 0xbe10, 0xbe15,
    0xbe20, 0xbe23,
    RANGE_END,
];

const SP_NONCONTEXT_REGISTERS: &[u32] = &[
    0xae00, 0xae04, 0xae0c, 0xae0c, 0xae0f, 0xae2b, 0xae30, 0xae32,
    0xae35, 0xae35, 0xae3a, 0xae3f, 0xae50, 0xae52,
    RANGE_END,
];

const TP_NONCONTEXT_REGISTERS: &[u32] = &[
    0xb600, 0xb601, 0xb604, 0xb605, 0xb610, 0xb61b, 0xb620, 0xb623,
    RANGE_END,
];

/// Non-context state behind the HLSQ debug aperture.
pub static HLSQ_REGLIST: &[HlsqRegList] = &[
    HlsqRegList {
        name: "hlsq_noncontext",
        regs: HLSQ_NONCONTEXT_REGISTERS,
        base: 0x0002_f800,
        sel_val: 0x7000,
    },
    HlsqRegList {
        name: "sp_noncontext",
        regs: SP_NONCONTEXT_REGISTERS,
        base: 0x0002_b800,
        sel_val: 0x7400,
    },
    HlsqRegList {
        name: "tp_noncontext",
        regs: TP_NONCONTEXT_REGISTERS,
        base: 0x0002_d800,
        sel_val: 0x7600,
    },
];

const GMU_CX_REGISTERS: &[u32] = &[
    0x0000, 0x0000, 0x0002, 0x0002, 0x0004, 0x0004, 0x0006, 0x0006,
    0x0008, 0x0008, 0x0010, 0x0010, 0x0040, 0x0043, 0x0080, 0x0081,
    0x0087, 0x0087, 0x00c0, 0x00c0, 0x00c4, 0x00c6, 0x0100, 0x0101,
    0x0140, 0x0140, 0x0150, 0x0152, 0x01c0, 0x01c0, 0x01c3, 0x01c5,
    0x01f0, 0x01f2, 0x0200, 0x0201, 0x0240, 0x0244,
    RANGE_END,
];

const GMU_RSCC_REGISTERS: &[u32] = &[
    0x008c, 0x008c, 0x0100, 0x0102, 0x0340, 0x0342, 0x0344, 0x0347,
    0x034c, 0x0387, 0x03ec, 0x03ef, 0x03f4, 0x03f6, 0x03fe, 0x0413,
    RANGE_END,
];

const GMU_GX_REGISTERS: &[u32] = &[
    0x0000, 0x0000, 0x0002, 0x0002, 0x0004, 0x0004, 0x0006, 0x0006,
    0x0010, 0x001b,
    RANGE_END,
];

/// GMU lists: CX, RSCC, then GX (only readable with GX powered).
pub static GMU_REGLIST: &[RegList] = &[
    reglist("gmu_cx", GMU_CX_REGISTERS),
    reglist("gmu_rscc", GMU_RSCC_REGISTERS),
    reglist("gmu_gx", GMU_GX_REGISTERS),
];

const GPUCC_REGISTERS: &[u32] = &[
    0x9800, 0x9808, 0x9810, 0x9813, 0x9815, 0x9816, 0x9818, 0x981b,
    0x9820, 0x9820, 0x9822, 0x9825, 0x9828, 0x982b, 0x982d, 0x9833,
    0x9842, 0x9844, 0x9858, 0x9859, 0x985a, 0x985b, 0x9866, 0x9866,
    RANGE_END,
];

const A621_GPUCC_REGISTERS: &[u32] = &[
    0x9800, 0x980e, 0x9812, 0x9812, 0x9816, 0x981d, 0x9820, 0x9821,
    0x9823, 0x9824, 0x9826, 0x9827, 0x982a, 0x982d, 0x9830, 0x9832,
    0x9835, 0x9836, 0x9840, 0x9840, 0x9842, 0x9844,
    RANGE_END,
];

pub const GPUCC_REG: RegList = reglist("gpucc", GPUCC_REGISTERS);
pub const A621_GPUCC_REG: RegList = reglist("a621_gpucc", A621_GPUCC_REGISTERS);

const FE_CLUSTER: &[u32] = &[
    0x9300, 0x9306, 0x9800, 0x9806, 0x9b00, 0x9b07, 0xa000, 0xa009,
    0xa00e, 0xa0ef, 0xa0f8, 0xa0f8,
    RANGE_END,
];

const A660_FE_CLUSTER: &[u32] = &[0x9807, 0x9807, RANGE_END];

const PC_VS_CLUSTER: &[u32] = &[0x9b00, 0x9b07, 0xa000, 0xa009, 0xa00e, 0xa0ef, RANGE_END];

const GRAS_CLUSTER: &[u32] = &[
    0x8000, 0x8006, 0x8010, 0x8092, 0x8094, 0x809d, 0x80a0, 0x80a6,
    0x80af, 0x80f1, 0x8100, 0x8107, 0x8109, 0x8109, 0x8110, 0x8110,
    0x8400, 0x840b,
    RANGE_END,
];

const PS_CLUSTER_RAC: &[u32] = &[
    0x8800, 0x8806, 0x8809, 0x8811, 0x8818, 0x881e, 0x8820, 0x8865,
    0x8870, 0x8879, 0x8880, 0x8889, 0x8890, 0x8891, 0x8898, 0x8898,
    0x88c0, 0x88c1, 0x88d0, 0x88e3, 0x8900, 0x890c, 0x890f, 0x891a,
    0x8c00, 0x8c01, 0x8c08, 0x8c10, 0x8c17, 0x8c1f, 0x8c26, 0x8c33,
    RANGE_END,
];

const PS_CLUSTER_RBP: &[u32] = &[
    0x88f0, 0x88f3, 0x890d, 0x890e, 0x8927, 0x8928, 0x8bf0, 0x8bf1,
    0x8c02, 0x8c07, 0x8c11, 0x8c16, 0x8c20, 0x8c25,
    RANGE_END,
];

const PS_CLUSTER: &[u32] = &[0x9200, 0x9216, 0x9218, 0x9236, 0x9300, 0x9306, RANGE_END];

const FE_CLUSTER_VFD: &[u32] = &[0xa000, 0xa009, 0xa00e, 0xa0ef, RANGE_END];

const SP_VS_CLUSTER: &[u32] = &[0xa800, 0xa81b, 0xa830, 0xa833, RANGE_END];

pub static CLUSTERS: &[Cluster] = &[
    Cluster {
        id: CLUSTER_GRAS,
        name: "CLUSTER_GRAS",
        regs: GRAS_CLUSTER,
        sel: None,
        requires: Features::empty(),
    },
    Cluster {
        id: CLUSTER_PS,
        name: "CLUSTER_PS",
        regs: PS_CLUSTER_RAC,
        sel: Some((regs::RB_RB_SUB_BLOCK_SEL_CNTL_CD, 0x0)),
        requires: Features::empty(),
    },
    Cluster {
        id: CLUSTER_PS,
        name: "CLUSTER_PS",
        regs: PS_CLUSTER_RBP,
        sel: Some((regs::RB_RB_SUB_BLOCK_SEL_CNTL_CD, 0x9)),
        requires: Features::empty(),
    },
    Cluster {
        id: CLUSTER_PS,
        name: "CLUSTER_PS",
        regs: PS_CLUSTER,
        sel: None,
        requires: Features::empty(),
    },
    Cluster {
        id: CLUSTER_FE,
        name: "CLUSTER_FE",
        regs: FE_CLUSTER,
        sel: None,
        requires: Features::empty(),
    },
    Cluster {
        id: CLUSTER_PC_VS,
        name: "CLUSTER_PC_VS",
        regs: PC_VS_CLUSTER,
        sel: None,
        requires: Features::empty(),
    },
    Cluster {
        id: CLUSTER_FE,
        name: "CLUSTER_FE",
        regs: A660_FE_CLUSTER,
        sel: None,
        requires: Features::A660_FAMILY,
    },
    Cluster {
        id: CLUSTER_FE,
        name: "CLUSTER_FE",
        regs: FE_CLUSTER_VFD,
        sel: None,
        requires: Features::empty(),
    },
    Cluster {
        id: CLUSTER_SP_VS,
        name: "CLUSTER_SP_VS",
        regs: SP_VS_CLUSTER,
        sel: None,
        requires: Features::empty(),
    },
];

/// True for the PS cluster entry that the a650 family moved under VPC_PS:
/// the one not behind the RB sub-block selector.
pub fn remaps_to_vpc_ps(cluster: &Cluster) -> bool {
    cluster.id == CLUSTER_PS && cluster.sel.is_none()
}

const SP_VS_DUPLICATE: &[u32] = &[
    0xa800, 0xa81b, 0xa830, 0xa833, 0xa840, 0xa840, 0xa842, 0xa842,
    RANGE_END,
];

const SP_PS_DUPLICATE: &[u32] = &[
    0xa980, 0xa9a8, 0xa9b0, 0xa9bc, 0xa9d0, 0xa9d3, 0xa9e0, 0xa9f3,
    0xaa00, 0xaa00, 0xaa30, 0xaa31, 0xaaf2, 0xaaf2,
    RANGE_END,
];

const SP_3D_DUPLICATE: &[u32] = &[0xab00, 0xab0a, 0xab10, 0xab12, RANGE_END];

const HLSQ_VS_DUPLICATE: &[u32] = &[0xb800, 0xb803, 0xb820, 0xb822, RANGE_END];

const HLSQ_PS_DUPLICATE: &[u32] = &[0xb980, 0xb983, 0xb987, 0xb992, 0xb9a0, 0xb9a2, RANGE_END];

const TP_DUPLICATE: &[u32] = &[0xb300, 0xb307, 0xb309, 0xb309, 0xb380, 0xb382, RANGE_END];

pub static DBGAHB_CLUSTERS: &[DbgAhbCluster] = &[
    DbgAhbCluster {
        name: "A6XX_DBGAHB_CTX_SP_VS",
        statetype: 0x21,
        base: 0x0002_a000,
        regs: SP_VS_DUPLICATE,
    },
    DbgAhbCluster {
        name: "A6XX_DBGAHB_CTX_SP_PS",
        statetype: 0x22,
        base: 0x0002_a000,
        regs: SP_PS_DUPLICATE,
    },
    DbgAhbCluster {
        name: "A6XX_DBGAHB_CTX_SP_3D",
        statetype: 0x22,
        base: 0x0002_a000,
        regs: SP_3D_DUPLICATE,
    },
    DbgAhbCluster {
        name: "A6XX_DBGAHB_CTX_HLSQ_VS",
        statetype: 0x31,
        base: 0x0002_e000,
        regs: HLSQ_VS_DUPLICATE,
    },
    DbgAhbCluster {
        name: "A6XX_DBGAHB_CTX_HLSQ_PS",
        statetype: 0x32,
        base: 0x0002_e000,
        regs: HLSQ_PS_DUPLICATE,
    },
    DbgAhbCluster {
        name: "A6XX_DBGAHB_CTX_TP",
        statetype: 0x39,
        base: 0x0002_c000,
        regs: TP_DUPLICATE,
    },
];

pub static SHADER_BLOCKS: &[ShaderBlock] = &[
    ShaderBlock { ty: 0x09, name: "A6XX_TP0_TMO_DATA", size: 0x200 },
    ShaderBlock { ty: 0x0a, name: "A6XX_TP0_SMO_DATA", size: 0x44 },
    ShaderBlock { ty: 0x0b, name: "A6XX_TP0_MIPMAP_BASE_DATA", size: 0x3c0 },
    ShaderBlock { ty: 0x19, name: "A6XX_TP1_TMO_DATA", size: 0x200 },
    ShaderBlock { ty: 0x1a, name: "A6XX_TP1_SMO_DATA", size: 0x44 },
    ShaderBlock { ty: 0x1b, name: "A6XX_TP1_MIPMAP_BASE_DATA", size: 0x3c0 },
    ShaderBlock { ty: 0x29, name: "A6XX_SP_INST_DATA", size: 0x800 },
    ShaderBlock { ty: 0x2a, name: "A6XX_SP_LB_0_DATA", size: 0x800 },
    ShaderBlock { ty: 0x2b, name: "A6XX_SP_LB_1_DATA", size: 0x800 },
    ShaderBlock { ty: 0x2c, name: "A6XX_SP_LB_2_DATA", size: 0x800 },
    ShaderBlock { ty: 0x2d, name: "A6XX_SP_LB_3_DATA", size: 0x800 },
    ShaderBlock { ty: 0x2e, name: "A6XX_SP_LB_4_DATA", size: 0x800 },
    ShaderBlock { ty: 0x2f, name: "A6XX_SP_LB_5_DATA", size: 0x200 },
    ShaderBlock { ty: 0x30, name: "A6XX_SP_CB_BINDLESS_DATA", size: 0x800 },
    ShaderBlock { ty: 0x31, name: "A6XX_SP_CB_LEGACY_DATA", size: 0x280 },
    ShaderBlock { ty: 0x32, name: "A6XX_SP_UAV_DATA", size: 0x80 },
    ShaderBlock { ty: 0x33, name: "A6XX_SP_INST_TAG", size: 0x80 },
    ShaderBlock { ty: 0x34, name: "A6XX_SP_CB_BINDLESS_TAG", size: 0x80 },
    ShaderBlock { ty: 0x35, name: "A6XX_SP_TMO_UMO_TAG", size: 0x80 },
    ShaderBlock { ty: 0x36, name: "A6XX_SP_SMO_TAG", size: 0x80 },
    ShaderBlock { ty: 0x37, name: "A6XX_SP_STATE_DATA", size: 0x3f },
    ShaderBlock { ty: 0x49, name: "A6XX_HLSQ_CHUNK_CVS_RAM", size: 0x1c0 },
    ShaderBlock { ty: 0x4a, name: "A6XX_HLSQ_CHUNK_CPS_RAM", size: 0x280 },
    ShaderBlock { ty: 0x4b, name: "A6XX_HLSQ_CHUNK_CVS_RAM_TAG", size: 0x40 },
    ShaderBlock { ty: 0x4c, name: "A6XX_HLSQ_CHUNK_CPS_RAM_TAG", size: 0x40 },
    ShaderBlock { ty: 0x4d, name: "A6XX_HLSQ_ICB_CVS_CB_BASE_TAG", size: 0x4 },
    ShaderBlock { ty: 0x4e, name: "A6XX_HLSQ_ICB_CPS_CB_BASE_TAG", size: 0x4 },
    ShaderBlock { ty: 0x4f, name: "A6XX_HLSQ_CVS_MISC_RAM", size: 0x1c0 },
    ShaderBlock { ty: 0x50, name: "A6XX_HLSQ_CPS_MISC_RAM", size: 0x580 },
    ShaderBlock { ty: 0x51, name: "A6XX_HLSQ_INST_RAM", size: 0x800 },
    ShaderBlock { ty: 0x52, name: "A6XX_HLSQ_GFX_CVS_CONST_RAM", size: 0x800 },
    ShaderBlock { ty: 0x53, name: "A6XX_HLSQ_GFX_CPS_CONST_RAM", size: 0x800 },
    ShaderBlock { ty: 0x54, name: "A6XX_HLSQ_CVS_MISC_RAM_TAG", size: 0x8 },
    ShaderBlock { ty: 0x55, name: "A6XX_HLSQ_CPS_MISC_RAM_TAG", size: 0x4 },
    ShaderBlock { ty: 0x56, name: "A6XX_HLSQ_INST_RAM_TAG", size: 0x80 },
    ShaderBlock { ty: 0x57, name: "A6XX_HLSQ_GFX_CVS_CONST_RAM_TAG", size: 0xc },
    ShaderBlock { ty: 0x58, name: "A6XX_HLSQ_GFX_CPS_CONST_RAM_TAG", size: 0x10 },
    ShaderBlock { ty: 0x5a, name: "A6XX_HLSQ_PWR_REST_RAM", size: 0x28 },
    ShaderBlock { ty: 0x5b, name: "A6XX_HLSQ_PWR_REST_TAG", size: 0x14 },
    ShaderBlock { ty: 0x5c, name: "A6XX_HLSQ_DATAPATH_META", size: 0x40 },
    ShaderBlock { ty: 0x5d, name: "A6XX_HLSQ_FRONTEND_META", size: 0x40 },
    ShaderBlock { ty: 0x5e, name: "A6XX_HLSQ_INDIRECT_META", size: 0x40 },
];

fn cp_roq_size(dev: &mut dyn GpuDevice) -> u32 {
    // [31:16] is in 4-dword units.
    dev.read(regs::CP_ROQ_THRESHOLDS_2) >> 14
}

pub static INDEXED_REGLIST: &[IndexedRegs] = &[
    IndexedRegs {
        name: "CP_SQE_STAT",
        addr: regs::CP_SQE_STAT_ADDR,
        data: regs::CP_SQE_STAT_DATA,
        count: 0x33,
        count_fn: None,
    },
    IndexedRegs {
        name: "CP_DRAW_STATE",
        addr: regs::CP_DRAW_STATE_ADDR,
        data: regs::CP_DRAW_STATE_DATA,
        count: 0x100,
        count_fn: None,
    },
    IndexedRegs {
        name: "CP_UCODE_DBG_DATA",
        addr: regs::CP_SQE_UCODE_DBG_ADDR,
        data: regs::CP_SQE_UCODE_DBG_DATA,
        count: 0x8000,
        count_fn: None,
    },
    IndexedRegs {
        name: "CP_ROQ",
        addr: regs::CP_ROQ_DBG_ADDR,
        data: regs::CP_ROQ_DBG_DATA,
        count: 0,
        count_fn: Some(cp_roq_size),
    },
];

pub static CP_MEMPOOL_INDEXED: IndexedRegs = IndexedRegs {
    name: "CP_MEMPOOL",
    addr: regs::CP_MEM_POOL_DBG_ADDR,
    data: regs::CP_MEM_POOL_DBG_DATA,
    count: 0x2060,
    count_fn: None,
};

/// Word of the mempool dump that holds the pool size.
pub const MEMPOOL_SIZE_WORD: usize = 0x2000;

const fn dbgbus(name: &'static str, id: u32, count: u32) -> DebugbusBlock {
    DebugbusBlock { name, id, count }
}

pub static DEBUGBUS_BLOCKS: &[DebugbusBlock] = &[
    dbgbus("A6XX_DBGBUS_CP", 0x01, 0x100),
    dbgbus("A6XX_DBGBUS_RBBM", 0x02, 0x100),
    dbgbus("A6XX_DBGBUS_HLSQ", 0x04, 0x100),
    dbgbus("A6XX_DBGBUS_UCHE", 0x05, 0x100),
    dbgbus("A6XX_DBGBUS_DPM", 0x06, 0x100),
    dbgbus("A6XX_DBGBUS_TESS", 0x07, 0x100),
    dbgbus("A6XX_DBGBUS_PC", 0x08, 0x100),
    dbgbus("A6XX_DBGBUS_VFDP", 0x09, 0x100),
    dbgbus("A6XX_DBGBUS_VPC", 0x0a, 0x100),
    dbgbus("A6XX_DBGBUS_TSE", 0x0b, 0x100),
    dbgbus("A6XX_DBGBUS_RAS", 0x0c, 0x100),
    dbgbus("A6XX_DBGBUS_VSC", 0x0d, 0x100),
    dbgbus("A6XX_DBGBUS_COM", 0x0e, 0x100),
    dbgbus("A6XX_DBGBUS_LRZ", 0x10, 0x100),
    dbgbus("A6XX_DBGBUS_A2D", 0x11, 0x100),
    dbgbus("A6XX_DBGBUS_CCUFCHE", 0x12, 0x100),
    dbgbus("A6XX_DBGBUS_RBP", 0x14, 0x100),
    dbgbus("A6XX_DBGBUS_DCS", 0x15, 0x100),
    dbgbus("A6XX_DBGBUS_DBGC", 0x16, 0x100),
    dbgbus("A6XX_DBGBUS_GMU_GX", 0x18, 0x100),
    dbgbus("A6XX_DBGBUS_TPFCHE", 0x19, 0x100),
    dbgbus("A6XX_DBGBUS_GPC", 0x1d, 0x100),
    dbgbus("A6XX_DBGBUS_LARC", 0x1e, 0x100),
    dbgbus("A6XX_DBGBUS_HLSQ_SPTP", 0x1f, 0x100),
    dbgbus("A6XX_DBGBUS_RB_0", 0x20, 0x100),
    dbgbus("A6XX_DBGBUS_RB_1", 0x21, 0x100),
    dbgbus("A6XX_DBGBUS_UCHE_WRAPPER", 0x24, 0x100),
    dbgbus("A6XX_DBGBUS_CCU_0", 0x28, 0x100),
    dbgbus("A6XX_DBGBUS_CCU_1", 0x29, 0x100),
    dbgbus("A6XX_DBGBUS_VFD_0", 0x38, 0x100),
    dbgbus("A6XX_DBGBUS_VFD_1", 0x39, 0x100),
    dbgbus("A6XX_DBGBUS_VFD_2", 0x3a, 0x100),
    dbgbus("A6XX_DBGBUS_VFD_3", 0x3b, 0x100),
    dbgbus("A6XX_DBGBUS_SP_0", 0x40, 0x100),
    dbgbus("A6XX_DBGBUS_SP_1", 0x41, 0x100),
    dbgbus("A6XX_DBGBUS_TPL1_0", 0x48, 0x100),
    dbgbus("A6XX_DBGBUS_TPL1_1", 0x49, 0x100),
    dbgbus("A6XX_DBGBUS_TPL1_2", 0x4a, 0x100),
    dbgbus("A6XX_DBGBUS_TPL1_3", 0x4b, 0x100),
];

/// On GBIF parts the bus interface sits on the regular debug bus.
pub static GBIF_DEBUGBUS_BLOCK: DebugbusBlock = dbgbus("A6XX_DBGBUS_VBIF", 0x03, 0x100);

pub static A650_DEBUGBUS_BLOCKS: &[DebugbusBlock] = &[
    dbgbus("A6XX_DBGBUS_RB_2", 0x22, 0x100),
    dbgbus("A6XX_DBGBUS_CCU_2", 0x2a, 0x100),
    dbgbus("A6XX_DBGBUS_VFD_4", 0x3c, 0x100),
    dbgbus("A6XX_DBGBUS_VFD_5", 0x3d, 0x100),
    dbgbus("A6XX_DBGBUS_SP_2", 0x42, 0x100),
    dbgbus("A6XX_DBGBUS_TPL1_4", 0x4c, 0x100),
    dbgbus("A6XX_DBGBUS_TPL1_5", 0x4d, 0x100),
    dbgbus("A6XX_DBGBUS_SPTP_0", 0x58, 0x100),
    dbgbus("A6XX_DBGBUS_SPTP_1", 0x59, 0x100),
    dbgbus("A6XX_DBGBUS_SPTP_2", 0x5a, 0x100),
    dbgbus("A6XX_DBGBUS_SPTP_3", 0x5b, 0x100),
    dbgbus("A6XX_DBGBUS_SPTP_4", 0x5c, 0x100),
    dbgbus("A6XX_DBGBUS_SPTP_5", 0x5d, 0x100),
];

pub static CX_DEBUGBUS_BLOCKS: &[DebugbusBlock] = &[
    dbgbus("A6XX_DBGBUS_GMU_CX", 0x13, 0x100),
    dbgbus("A6XX_DBGBUS_CX", 0x17, 0x100),
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crashdump::{CD_DATA_SIZE, CD_MAX_OPS};
    use crate::tables::{range_count, ranges};

    #[test]
    fn test_every_cluster_fits_one_run() {
        for cluster in CLUSTERS {
            let words = range_count(cluster.regs) * NUM_CONTEXTS as usize;
            let ops = 2 + NUM_CONTEXTS as usize * (1 + ranges(cluster.regs).count());
            assert!(words * 4 <= CD_DATA_SIZE, "{}", cluster.name);
            assert!(ops <= CD_MAX_OPS, "{}", cluster.name);
        }
        for block in SHADER_BLOCKS {
            assert!((block.size * NUM_SHADER_BANKS * 4) as usize <= CD_DATA_SIZE);
            // Shader reads stay inside the aperture window.
            assert!(regs::HLSQ_DBG_AHB_READ_APERTURE + block.size <= regs::HLSQ_DBG_READ_SEL);
        }
    }

    #[test]
    fn test_dbgahb_offsets_stay_in_aperture() {
        for cluster in DBGAHB_CLUSTERS {
            for (start, end) in ranges(cluster.regs) {
                assert!(start >= cluster.base >> 2, "{}", cluster.name);
                assert!(end - (cluster.base >> 2) < 0x800, "{}", cluster.name);
            }
        }
        for list in HLSQ_REGLIST {
            for (start, end) in ranges(list.regs) {
                assert!(start >= list.base >> 2, "{}", list.name);
                assert!(end - (list.base >> 2) < 0x800, "{}", list.name);
            }
        }
    }

    #[test]
    fn test_ps_remap_marker() {
        let remapped: Vec<_> = CLUSTERS.iter().filter(|c| remaps_to_vpc_ps(c)).collect();
        assert_eq!(remapped.len(), 1);
        assert_eq!(remapped[0].regs[0], 0x9200);
    }

    #[test]
    fn test_mempool_covers_size_word() {
        assert!(CP_MEMPOOL_INDEXED.count as usize > MEMPOOL_SIZE_WORD);
    }
}
