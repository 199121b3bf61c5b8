// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! gen7_0_0 (a730) capture tables, plus the debug bus block index and
//! indexed lists shared by every gen7 part.

use super::*;
use crate::regs;

pub const RB_RAC_SEL: Selector = Selector {
    cd_reg: regs::RB_RB_SUB_BLOCK_SEL_CNTL_CD,
    host_reg: regs::RB_RB_SUB_BLOCK_SEL_CNTL_HOST,
    val: 0x0,
};

pub const RB_RBP_SEL: Selector = Selector {
    cd_reg: regs::RB_RB_SUB_BLOCK_SEL_CNTL_CD,
    host_reg: regs::RB_RB_SUB_BLOCK_SEL_CNTL_HOST,
    val: 0x9,
};

pub const PRE_CRASHDUMPER_GPU_REGISTERS: &[u32] = &[
    0x00210, 0x00213, 0x00536, 0x00536, 0x03c00, 0x03c0b, 0x03c40, 0x03c42,
    0x03c45, 0x03c47, 0x03c49, 0x03c4a, 0x03cc0, 0x03cd1,
    RANGE_END,
];

pub const POST_CRASHDUMPER_REGISTERS: &[u32] = &[0x00535, 0x00535, RANGE_END];

pub const GPU_REGISTERS: &[u32] = &[
    0x00000, 0x00000, 0x00002, 0x00002, 0x00011, 0x00012, 0x00016, 0x0001b,
    0x0001f, 0x00032, 0x00038, 0x0003c, 0x00042, 0x00042, 0x00044, 0x00044,
    0x00047, 0x00047, 0x00049, 0x0004a, 0x0004c, 0x0004c, 0x00050, 0x00050,
    0x00056, 0x00056, 0x00073, 0x00075, 0x000ad, 0x000ae, 0x000b0, 0x000b0,
    0x000b4, 0x000b4, 0x000b8, 0x000b8, 0x000bc, 0x000bc, 0x000c0, 0x000c0,
    0x00100, 0x00100, 0x00104, 0x0010b, 0x0010f, 0x0011d, 0x0012f, 0x0012f,
    0x00200, 0x0020d, 0x00215, 0x00243, 0x00260, 0x00268, 0x00272, 0x00274,
    0x00281, 0x0028d, 0x00300, 0x00401, 0x00410, 0x00451, 0x00460, 0x004a3,
    0x004c0, 0x004d1, 0x00500, 0x00500, 0x00507, 0x0050b, 0x0050f, 0x0050f,
    0x00511, 0x00511, 0x00533, 0x00534, 0x00540, 0x00555, 0x00564, 0x00567,
    0x00574, 0x00577, 0x00800, 0x00808, 0x00810, 0x00813, 0x00820, 0x00821,
    0x00823, 0x00827, 0x00830, 0x00834, 0x00850, 0x00854, 0x0087f, 0x0088c,
    0x008a0, 0x008a7, 0x008b0, 0x008b2, 0x008d0, 0x008d2, 0x00900, 0x00903,
    0x00a20, 0x00a2f, 0x00a50, 0x00a51, 0x00c00, 0x00c04, 0x00c06, 0x00c06,
    0x00c10, 0x00cd9, 0x00ce0, 0x00d0c, 0x00df0, 0x00df4, 0x00e01, 0x00e02,
    0x00e07, 0x00e0e, 0x00e10, 0x00e13, 0x00e17, 0x00e19, 0x00e1b, 0x00e2b,
    0x00e30, 0x00e32, 0x00e38, 0x00e3c,
    RANGE_END,
];

pub const DBGC_REGISTERS: &[u32] = &[
    0x18400, 0x1841c, 0x1842f, 0x18432, 0x18450, 0x18452, 0x18460, 0x18462,
    0x18470, 0x1847b,
    RANGE_END,
];

pub const RB_RAC_REGISTERS: &[u32] = &[
    0x08e10, 0x08e1c, 0x08e20, 0x08e25, 0x08e51, 0x08e5a,
    RANGE_END,
];

pub const RB_RBP_REGISTERS: &[u32] = &[
    0x08e01, 0x08e01, 0x08e04, 0x08e04, 0x08e06, 0x08e09, 0x08e0c, 0x08e0c,
    0x08e28, 0x08e28, 0x08e2c, 0x08e35, 0x08e50, 0x08e50,
    RANGE_END,
];

pub const REG_LIST: &[Gen7RegList] = &[
    Gen7RegList {
        regs: GPU_REGISTERS,
        sel: None,
    },
    Gen7RegList {
        regs: DBGC_REGISTERS,
        sel: None,
    },
    Gen7RegList {
        regs: RB_RAC_REGISTERS,
        sel: Some(&RB_RAC_SEL),
    },
    Gen7RegList {
        regs: RB_RBP_REGISTERS,
        sel: Some(&RB_RBP_SEL),
    },
];

pub const NONCONTEXT_PIPE_BR_REGISTERS: &[u32] = &[
    0x00887, 0x0088c, 0x08600, 0x08600, 0x08602, 0x08602, 0x08610, 0x0861b,
    0x08620, 0x08620, 0x08630, 0x08630, 0x08637, 0x08639, 0x08640, 0x08640,
    0x09600, 0x09600, 0x09602, 0x09603, 0x0960a, 0x09616, 0x09624, 0x0963a,
    0x09640, 0x09640, 0x09e00, 0x09e00, 0x09e02, 0x09e07, 0x09e0a, 0x09e16,
    0x09e19, 0x09e19, 0x09e1c, 0x09e1c, 0x09e20, 0x09e25, 0x09e30, 0x09e31,
    0x09e40, 0x09e51, 0x09e64, 0x09e64, 0x09e70, 0x09e72, 0x09e78, 0x09e79,
    0x09e80, 0x09fff, 0x0a600, 0x0a600, 0x0a603, 0x0a603, 0x0a610, 0x0a61f,
    0x0a630, 0x0a631, 0x0a638, 0x0a638,
    RANGE_END,
];

pub const NONCONTEXT_PIPE_BV_REGISTERS: &[u32] = &[
    0x00887, 0x0088c, 0x08600, 0x08600, 0x08602, 0x08602, 0x08610, 0x0861b,
    0x08620, 0x08620, 0x08630, 0x08630, 0x08637, 0x08639, 0x08640, 0x08640,
    0x09600, 0x09600, 0x09602, 0x09603, 0x0960a, 0x09616, 0x09624, 0x0963a,
    0x09640, 0x09640, 0x09e00, 0x09e00, 0x09e02, 0x09e07, 0x09e0a, 0x09e16,
    0x09e19, 0x09e19, 0x09e1c, 0x09e1c, 0x09e20, 0x09e25, 0x09e30, 0x09e31,
    0x09e40, 0x09e51, 0x09e64, 0x09e64, 0x09e70, 0x09e72, 0x09e78, 0x09e79,
    0x09e80, 0x09fff, 0x0a600, 0x0a600, 0x0a603, 0x0a603, 0x0a610, 0x0a61f,
    0x0a630, 0x0a631, 0x0a638, 0x0a638,
    RANGE_END,
];

pub const NONCONTEXT_PIPE_LPAC_REGISTERS: &[u32] = &[0x00887, 0x0088c, 0x00f80, 0x00f80, RANGE_END];

pub const NONCONTEXT_RB_RAC_PIPE_BR_REGISTERS: &[u32] = &[
    0x08e10, 0x08e1c, 0x08e20, 0x08e25, 0x08e51, 0x08e5a,
    RANGE_END,
];

pub const NONCONTEXT_RB_RBP_PIPE_BR_REGISTERS: &[u32] = &[
    0x08e01, 0x08e01, 0x08e04, 0x08e04, 0x08e06, 0x08e09, 0x08e0c, 0x08e0c,
    0x08e28, 0x08e28, 0x08e2c, 0x08e35, 0x08e50, 0x08e50,
    RANGE_END,
];

pub const GRAS_CLUSTER_GRAS_REGISTERS: &[u32] = &[
    0x08000, 0x08008, 0x08010, 0x08092, 0x08094, 0x08099, 0x0809b, 0x0809d,
    0x080a0, 0x080a7, 0x080af, 0x080f1, 0x080f4, 0x080f6, 0x080f8, 0x080fa,
    0x08100, 0x08107, 0x08109, 0x0810b, 0x08110, 0x08113, 0x08120, 0x0813f,
    0x08400, 0x08406, 0x0840a, 0x0840b,
    RANGE_END,
];

pub const PC_CLUSTER_FE_REGISTERS: &[u32] = &[
    0x09800, 0x09802, 0x09806, 0x0980a, 0x09810, 0x09811, 0x09884, 0x09886,
    0x09b00, 0x09b08,
    RANGE_END,
];

pub const RB_RAC_CLUSTER_PS_REGISTERS: &[u32] = &[
    0x08802, 0x08802, 0x08804, 0x08806, 0x08809, 0x0880a, 0x0880e, 0x08811,
    0x08818, 0x0881e, 0x08821, 0x08821, 0x08823, 0x08826, 0x08829, 0x08829,
    0x0882b, 0x0882e, 0x08831, 0x08831, 0x08833, 0x08836, 0x08839, 0x08839,
    0x0883b, 0x0883e, 0x08841, 0x08841, 0x08843, 0x08846, 0x08849, 0x08849,
    0x0884b, 0x0884e, 0x08851, 0x08851, 0x08853, 0x08856, 0x08859, 0x08859,
    0x0885b, 0x0885e, 0x08870, 0x08879, 0x08880, 0x08885, 0x08890, 0x08891,
    0x08898, 0x08899, 0x088c0, 0x088c1, 0x088d0, 0x088e3, 0x088f0, 0x088f3,
    0x08900, 0x0891a, 0x08927, 0x08928, 0x08c00, 0x08c00, 0x08c02, 0x08c39,
    RANGE_END,
];

pub const RB_RBP_CLUSTER_PS_REGISTERS: &[u32] = &[
    0x08800, 0x08801, 0x08803, 0x08803, 0x0880b, 0x0880d, 0x08812, 0x08812,
    0x08820, 0x08820, 0x08822, 0x08822, 0x08827, 0x08828, 0x0882a, 0x0882a,
    0x08890, 0x08891, 0x08898, 0x08899, 0x088c0, 0x088c1, 0x088e5, 0x088e5,
    0x088f4, 0x088f5, 0x08a00, 0x08a05, 0x08a10, 0x08a15, 0x08a20, 0x08a25,
    0x08a30, 0x08a35, 0x08c00, 0x08c01, 0x08c18, 0x08c1f, 0x08c26, 0x08c34,
    RANGE_END,
];

pub const VPC_CLUSTER_VPC_PS_REGISTERS: &[u32] = &[
    0x09200, 0x0920f, 0x09212, 0x09216, 0x09218, 0x09236, 0x09300, 0x09307,
    RANGE_END,
];

pub const VFD_CLUSTER_FE_REGISTERS: &[u32] = &[0x0a000, 0x0a009, 0x0a00e, 0x0a0ef, RANGE_END];

const fn cluster(pipe: u32, cluster: u32, context: u32, regs: &'static [u32]) -> Gen7Cluster {
    Gen7Cluster {
        pipe,
        cluster,
        context,
        regs,
        sel: None,
    }
}

pub const CLUSTERS: &[Gen7Cluster] = &[
    cluster(PIPE_BR, CLUSTER_NONE, STATE_NON_CONTEXT, NONCONTEXT_PIPE_BR_REGISTERS),
    cluster(PIPE_BV, CLUSTER_NONE, STATE_NON_CONTEXT, NONCONTEXT_PIPE_BV_REGISTERS),
    cluster(PIPE_LPAC, CLUSTER_NONE, STATE_NON_CONTEXT, NONCONTEXT_PIPE_LPAC_REGISTERS),
    Gen7Cluster {
        pipe: PIPE_BR,
        cluster: CLUSTER_NONE,
        context: STATE_NON_CONTEXT,
        regs: NONCONTEXT_RB_RAC_PIPE_BR_REGISTERS,
        sel: Some(&RB_RAC_SEL),
    },
    Gen7Cluster {
        pipe: PIPE_BR,
        cluster: CLUSTER_NONE,
        context: STATE_NON_CONTEXT,
        regs: NONCONTEXT_RB_RBP_PIPE_BR_REGISTERS,
        sel: Some(&RB_RBP_SEL),
    },
    cluster(PIPE_BR, CLUSTER_GRAS, STATE_FORCE_CTXT_0, GRAS_CLUSTER_GRAS_REGISTERS),
    cluster(PIPE_BV, CLUSTER_GRAS, STATE_FORCE_CTXT_0, GRAS_CLUSTER_GRAS_REGISTERS),
    cluster(PIPE_BR, CLUSTER_GRAS, STATE_FORCE_CTXT_1, GRAS_CLUSTER_GRAS_REGISTERS),
    cluster(PIPE_BV, CLUSTER_GRAS, STATE_FORCE_CTXT_1, GRAS_CLUSTER_GRAS_REGISTERS),
    cluster(PIPE_BR, CLUSTER_FE, STATE_FORCE_CTXT_0, PC_CLUSTER_FE_REGISTERS),
    cluster(PIPE_BV, CLUSTER_FE, STATE_FORCE_CTXT_0, PC_CLUSTER_FE_REGISTERS),
    cluster(PIPE_BR, CLUSTER_FE, STATE_FORCE_CTXT_1, PC_CLUSTER_FE_REGISTERS),
    cluster(PIPE_BV, CLUSTER_FE, STATE_FORCE_CTXT_1, PC_CLUSTER_FE_REGISTERS),
    Gen7Cluster {
        pipe: PIPE_BR,
        cluster: CLUSTER_PS,
        context: STATE_FORCE_CTXT_0,
        regs: RB_RAC_CLUSTER_PS_REGISTERS,
        sel: Some(&RB_RAC_SEL),
    },
    Gen7Cluster {
        pipe: PIPE_BR,
        cluster: CLUSTER_PS,
        context: STATE_FORCE_CTXT_1,
        regs: RB_RAC_CLUSTER_PS_REGISTERS,
        sel: Some(&RB_RAC_SEL),
    },
    Gen7Cluster {
        pipe: PIPE_BR,
        cluster: CLUSTER_PS,
        context: STATE_FORCE_CTXT_0,
        regs: RB_RBP_CLUSTER_PS_REGISTERS,
        sel: Some(&RB_RBP_SEL),
    },
    Gen7Cluster {
        pipe: PIPE_BR,
        cluster: CLUSTER_PS,
        context: STATE_FORCE_CTXT_1,
        regs: RB_RBP_CLUSTER_PS_REGISTERS,
        sel: Some(&RB_RBP_SEL),
    },
    cluster(PIPE_BR, CLUSTER_VPC_PS, STATE_FORCE_CTXT_0, VPC_CLUSTER_VPC_PS_REGISTERS),
    cluster(PIPE_BR, CLUSTER_VPC_PS, STATE_FORCE_CTXT_1, VPC_CLUSTER_VPC_PS_REGISTERS),
    cluster(PIPE_BR, CLUSTER_FE, STATE_FORCE_CTXT_0, VFD_CLUSTER_FE_REGISTERS),
    cluster(PIPE_BV, CLUSTER_FE, STATE_FORCE_CTXT_0, VFD_CLUSTER_FE_REGISTERS),
    cluster(PIPE_BR, CLUSTER_FE, STATE_FORCE_CTXT_1, VFD_CLUSTER_FE_REGISTERS),
    cluster(PIPE_BV, CLUSTER_FE, STATE_FORCE_CTXT_1, VFD_CLUSTER_FE_REGISTERS),
];

pub const SP_NONCONTEXT_HLSQ_STATE_REGISTERS: &[u32] = &[
    0x0ae52, 0x0ae52, 0x0ae60, 0x0ae61, 0x0ae73, 0x0ae73,
    RANGE_END,
];

pub const SP_NONCONTEXT_SP_TOP_REGISTERS: &[u32] = &[
    0x0ae00, 0x0ae00, 0x0ae02, 0x0ae04, 0x0ae06, 0x0ae09, 0x0ae0c, 0x0ae0c,
    0x0ae0f, 0x0ae0f, 0x0ae28, 0x0ae2b, 0x0ae35, 0x0ae35, 0x0ae3a, 0x0ae3f,
    0x0ae50, 0x0ae52, 0x0ae80, 0x0aea3,
    RANGE_END,
];

pub const SP_NONCONTEXT_USPTP_REGISTERS: &[u32] = &[
    0x0ae00, 0x0ae00, 0x0ae02, 0x0ae04, 0x0ae06, 0x0ae09, 0x0ae0c, 0x0ae0c,
    0x0ae0f, 0x0ae0f, 0x0ae30, 0x0ae32, 0x0ae35, 0x0ae35, 0x0ae3a, 0x0ae3b,
    0x0ae3e, 0x0ae3f, 0x0ae50, 0x0ae52,
    RANGE_END,
];

pub const SP_NONCONTEXT_LPAC_REGISTERS: &[u32] = &[0x0af88, 0x0af8a, RANGE_END];

pub const TPL1_NONCONTEXT_REGISTERS: &[u32] = &[
    0x0b600, 0x0b600, 0x0b602, 0x0b602, 0x0b604, 0x0b604, 0x0b608, 0x0b60c,
    0x0b60f, 0x0b621, 0x0b630, 0x0b633,
    RANGE_END,
];

pub const SP_CLUSTER_SP_VS_REGISTERS: &[u32] = &[
    0x0a800, 0x0a800, 0x0a81b, 0x0a81d, 0x0a822, 0x0a822, 0x0a824, 0x0a824,
    0x0a827, 0x0a82a, 0x0a830, 0x0a830, 0x0a833, 0x0a835, 0x0a83a, 0x0a83a,
    0x0a83c, 0x0a83c, 0x0a83f, 0x0a841, 0x0a85b, 0x0a85d, 0x0a862, 0x0a862,
    0x0a864, 0x0a864, 0x0a867, 0x0a867, 0x0a870, 0x0a870, 0x0a872, 0x0a872,
    0x0a88c, 0x0a88e, 0x0a893, 0x0a893, 0x0a895, 0x0a895, 0x0a898, 0x0a898,
    0x0a89a, 0x0a89d, 0x0a8a0, 0x0a8af, 0x0a8c0, 0x0a8c3,
    RANGE_END,
];

pub const SP_CLUSTER_SP_PS_REGISTERS: &[u32] = &[
    0x0a980, 0x0a980, 0x0a982, 0x0a984, 0x0a99e, 0x0a99e, 0x0a9a7, 0x0a9a7,
    0x0a9aa, 0x0a9aa, 0x0a9ae, 0x0a9b0, 0x0a9b3, 0x0a9b5, 0x0a9ba, 0x0a9ba,
    0x0a9bc, 0x0a9bc, 0x0a9c4, 0x0a9c4, 0x0a9cd, 0x0a9cd, 0x0a9e0, 0x0a9fc,
    0x0aa00, 0x0aa00, 0x0aa30, 0x0aa31, 0x0aaf2, 0x0aaf2,
    RANGE_END,
];

pub const SP_CLUSTER_SP_PS_LPAC_REGISTERS: &[u32] = &[
    0x0a9b0, 0x0a9b0, 0x0a9b3, 0x0a9b5, 0x0a9ba, 0x0a9bc, 0x0a9e0, 0x0a9f8,
    0x0aa00, 0x0aa00, 0x0aa31, 0x0aa31, 0x0aaf2, 0x0aaf2,
    RANGE_END,
];

pub const TPL1_CLUSTER_REGISTERS: &[u32] = &[
    0x0b180, 0x0b183, 0x0b190, 0x0b195, 0x0b2c0, 0x0b2d5, 0x0b300, 0x0b307,
    0x0b309, 0x0b309, 0x0b310, 0x0b310,
    RANGE_END,
];

const fn sptp(
    cluster: u32,
    statetype: u32,
    pipe: u32,
    context: u32,
    location: u32,
    regs: &'static [u32],
    regbase: u32,
) -> Gen7SptpCluster {
    Gen7SptpCluster {
        pipe,
        cluster,
        context,
        location,
        statetype,
        regbase,
        regs,
    }
}

// State type ids, see STATETYPE_NAMES.
pub const TP0_NCTX_REG: u32 = 0x00;
pub const TP0_CTX0_3D_CVS_REG: u32 = 0x01;
pub const TP0_CTX0_3D_CPS_REG: u32 = 0x02;
pub const TP0_CTX1_3D_CVS_REG: u32 = 0x03;
pub const TP0_CTX1_3D_CPS_REG: u32 = 0x04;
pub const SP_NCTX_REG: u32 = 0x20;
pub const SP_CTX0_3D_CVS_REG: u32 = 0x21;
pub const SP_CTX0_3D_CPS_REG: u32 = 0x22;
pub const SP_CTX1_3D_CVS_REG: u32 = 0x23;
pub const SP_CTX1_3D_CPS_REG: u32 = 0x24;

pub const SPTP_CLUSTERS: &[Gen7SptpCluster] = &[
    sptp(CLUSTER_NONE, SP_NCTX_REG, PIPE_BR, 0, HLSQ_STATE, SP_NONCONTEXT_HLSQ_STATE_REGISTERS, 0xae00),
    sptp(CLUSTER_NONE, SP_NCTX_REG, PIPE_BR, 0, SP_TOP, SP_NONCONTEXT_SP_TOP_REGISTERS, 0xae00),
    sptp(CLUSTER_NONE, SP_NCTX_REG, PIPE_BR, 0, USPTP, SP_NONCONTEXT_USPTP_REGISTERS, 0xae00),
    sptp(CLUSTER_NONE, SP_NCTX_REG, PIPE_LPAC, 0, HLSQ_STATE, SP_NONCONTEXT_LPAC_REGISTERS, 0xae00),
    sptp(CLUSTER_NONE, TP0_NCTX_REG, PIPE_BR, 0, USPTP, TPL1_NONCONTEXT_REGISTERS, 0xb600),
    sptp(CLUSTER_SP_VS, SP_CTX0_3D_CVS_REG, PIPE_BR, 0, HLSQ_STATE, SP_CLUSTER_SP_VS_REGISTERS, 0xa800),
    sptp(CLUSTER_SP_VS, SP_CTX0_3D_CVS_REG, PIPE_BV, 0, HLSQ_STATE, SP_CLUSTER_SP_VS_REGISTERS, 0xa800),
    sptp(CLUSTER_SP_VS, SP_CTX0_3D_CVS_REG, PIPE_BR, 0, SP_TOP, SP_CLUSTER_SP_VS_REGISTERS, 0xa800),
    sptp(CLUSTER_SP_VS, SP_CTX0_3D_CVS_REG, PIPE_BR, 0, USPTP, SP_CLUSTER_SP_VS_REGISTERS, 0xa800),
    sptp(CLUSTER_SP_VS, SP_CTX1_3D_CVS_REG, PIPE_BR, 1, HLSQ_STATE, SP_CLUSTER_SP_VS_REGISTERS, 0xa800),
    sptp(CLUSTER_SP_VS, SP_CTX1_3D_CVS_REG, PIPE_BV, 1, HLSQ_STATE, SP_CLUSTER_SP_VS_REGISTERS, 0xa800),
    sptp(CLUSTER_SP_PS, SP_CTX0_3D_CPS_REG, PIPE_BR, 0, HLSQ_STATE, SP_CLUSTER_SP_PS_REGISTERS, 0xa800),
    sptp(CLUSTER_SP_PS, SP_CTX0_3D_CPS_REG, PIPE_BR, 0, SP_TOP, SP_CLUSTER_SP_PS_REGISTERS, 0xa800),
    sptp(CLUSTER_SP_PS, SP_CTX0_3D_CPS_REG, PIPE_BR, 0, USPTP, SP_CLUSTER_SP_PS_REGISTERS, 0xa800),
    sptp(CLUSTER_SP_PS, SP_CTX1_3D_CPS_REG, PIPE_BR, 1, HLSQ_STATE, SP_CLUSTER_SP_PS_REGISTERS, 0xa800),
    sptp(CLUSTER_SP_PS, SP_CTX0_3D_CPS_REG, PIPE_LPAC, 0, HLSQ_STATE, SP_CLUSTER_SP_PS_LPAC_REGISTERS, 0xa800),
    sptp(CLUSTER_SP_VS, TP0_CTX0_3D_CVS_REG, PIPE_BR, 0, USPTP, TPL1_CLUSTER_REGISTERS, 0xb000),
    sptp(CLUSTER_SP_VS, TP0_CTX1_3D_CVS_REG, PIPE_BR, 1, USPTP, TPL1_CLUSTER_REGISTERS, 0xb000),
    sptp(CLUSTER_SP_PS, TP0_CTX0_3D_CPS_REG, PIPE_BR, 0, USPTP, TPL1_CLUSTER_REGISTERS, 0xb000),
    sptp(CLUSTER_SP_PS, TP0_CTX1_3D_CPS_REG, PIPE_BR, 1, USPTP, TPL1_CLUSTER_REGISTERS, 0xb000),
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

pub const SHADER_BLOCKS: &[Gen7ShaderBlock] = &[
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
    shader(0x34, 0x0090, 4, 2, PIPE_BR, USPTP),
    shader(0x35, 0x0200, 4, 2, PIPE_BR, USPTP),
    shader(0x36, 0x0080, 4, 2, PIPE_BR, USPTP),
    shader(0x37, 0x0080, 4, 2, PIPE_BR, USPTP),
    shader(0x38, 0x0040, 4, 2, PIPE_BR, USPTP),
    shader(0x39, 0x0100, 4, 2, PIPE_BR, USPTP),
    shader(0x3a, 0x0050, 4, 2, PIPE_BR, USPTP),
    shader(0x3b, 0x0800, 4, 2, PIPE_BR, USPTP),
    shader(0x3c, 0x0800, 4, 2, PIPE_BR, USPTP),
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
    shader(0x56, 0x0040, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x57, 0x0040, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x58, 0x0010, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x59, 0x0010, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x5a, 0x0280, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x5b, 0x0800, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x5c, 0x0200, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x5d, 0x0800, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x5d, 0x0800, 1, 1, PIPE_BV, HLSQ_STATE),
    shader(0x5d, 0x0800, 1, 1, PIPE_LPAC, HLSQ_STATE),
    shader(0x5e, 0x0800, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x5f, 0x0800, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x60, 0x0010, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x61, 0x0010, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x62, 0x0080, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x63, 0x0064, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x64, 0x0064, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x65, 0x0040, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x66, 0x0010, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x67, 0x0800, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x68, 0x0010, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x69, 0x0010, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x6b, 0x0020, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x6c, 0x0040, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x6d, 0x0010, 1, 1, PIPE_BR, HLSQ_STATE),
    shader(0x6e, 0x0040, 1, 1, PIPE_BR, HLSQ_STATE),
];

const fn dbgbus(name: &'static str, id: u32) -> DebugbusBlock {
    DebugbusBlock {
        name,
        id,
        count: 0x100,
    }
}

/// Every gen7 debug bus block, keyed by id through `gen7_debugbus_block`.
pub const DEBUGBUS_BLOCKS: &[DebugbusBlock] = &[
    dbgbus("A7XX_DBGBUS_CP_0_0", 1),
    dbgbus("A7XX_DBGBUS_CP_0_1", 2),
    dbgbus("A7XX_DBGBUS_RBBM", 3),
    dbgbus("A7XX_DBGBUS_GBIF_GX", 5),
    dbgbus("A7XX_DBGBUS_GBIF_CX", 6),
    dbgbus("A7XX_DBGBUS_HLSQ", 7),
    dbgbus("A7XX_DBGBUS_UCHE_0", 9),
    dbgbus("A7XX_DBGBUS_UCHE_1", 10),
    dbgbus("A7XX_DBGBUS_TESS_BR", 13),
    dbgbus("A7XX_DBGBUS_TESS_BV", 14),
    dbgbus("A7XX_DBGBUS_PC_BR", 17),
    dbgbus("A7XX_DBGBUS_PC_BV", 18),
    dbgbus("A7XX_DBGBUS_VFDP_BR", 21),
    dbgbus("A7XX_DBGBUS_VFDP_BV", 22),
    dbgbus("A7XX_DBGBUS_VPC_BR", 25),
    dbgbus("A7XX_DBGBUS_VPC_BV", 26),
    dbgbus("A7XX_DBGBUS_TSE_BR", 29),
    dbgbus("A7XX_DBGBUS_TSE_BV", 30),
    dbgbus("A7XX_DBGBUS_RAS_BR", 33),
    dbgbus("A7XX_DBGBUS_RAS_BV", 34),
    dbgbus("A7XX_DBGBUS_VSC", 37),
    dbgbus("A7XX_DBGBUS_COM_0", 39),
    dbgbus("A7XX_DBGBUS_LRZ_BR", 43),
    dbgbus("A7XX_DBGBUS_LRZ_BV", 44),
    dbgbus("A7XX_DBGBUS_UFC_0", 47),
    dbgbus("A7XX_DBGBUS_UFC_1", 48),
    dbgbus("A7XX_DBGBUS_GMU_GX", 55),
    dbgbus("A7XX_DBGBUS_DBGC", 59),
    dbgbus("A7XX_DBGBUS_CX", 60),
    dbgbus("A7XX_DBGBUS_GMU_CX", 61),
    dbgbus("A7XX_DBGBUS_GPC_BR", 62),
    dbgbus("A7XX_DBGBUS_GPC_BV", 63),
    dbgbus("A7XX_DBGBUS_LARC", 66),
    dbgbus("A7XX_DBGBUS_HLSQ_SPTP", 68),
    dbgbus("A7XX_DBGBUS_RB_0", 70),
    dbgbus("A7XX_DBGBUS_RB_1", 71),
    dbgbus("A7XX_DBGBUS_RB_2", 72),
    dbgbus("A7XX_DBGBUS_RB_3", 73),
    dbgbus("A7XX_DBGBUS_RB_4", 74),
    dbgbus("A7XX_DBGBUS_RB_5", 75),
    dbgbus("A7XX_DBGBUS_UCHE_WRAPPER", 102),
    dbgbus("A7XX_DBGBUS_CCU_0", 106),
    dbgbus("A7XX_DBGBUS_CCU_1", 107),
    dbgbus("A7XX_DBGBUS_CCU_2", 108),
    dbgbus("A7XX_DBGBUS_CCU_3", 109),
    dbgbus("A7XX_DBGBUS_CCU_4", 110),
    dbgbus("A7XX_DBGBUS_CCU_5", 111),
    dbgbus("A7XX_DBGBUS_VFD_BR_0", 138),
    dbgbus("A7XX_DBGBUS_VFD_BR_1", 139),
    dbgbus("A7XX_DBGBUS_VFD_BR_2", 140),
    dbgbus("A7XX_DBGBUS_VFD_BR_3", 141),
    dbgbus("A7XX_DBGBUS_VFD_BR_4", 142),
    dbgbus("A7XX_DBGBUS_VFD_BR_5", 143),
    dbgbus("A7XX_DBGBUS_VFD_BV_0", 202),
    dbgbus("A7XX_DBGBUS_VFD_BV_1", 203),
    dbgbus("A7XX_DBGBUS_USP_0", 234),
    dbgbus("A7XX_DBGBUS_USP_1", 235),
    dbgbus("A7XX_DBGBUS_USP_2", 236),
    dbgbus("A7XX_DBGBUS_USP_3", 237),
    dbgbus("A7XX_DBGBUS_USP_4", 238),
    dbgbus("A7XX_DBGBUS_USP_5", 239),
    dbgbus("A7XX_DBGBUS_TP_0", 242),
    dbgbus("A7XX_DBGBUS_TP_1", 243),
    dbgbus("A7XX_DBGBUS_TP_2", 244),
    dbgbus("A7XX_DBGBUS_TP_3", 245),
    dbgbus("A7XX_DBGBUS_TP_4", 246),
    dbgbus("A7XX_DBGBUS_TP_5", 247),
    dbgbus("A7XX_DBGBUS_USPTP_0", 250),
    dbgbus("A7XX_DBGBUS_USPTP_1", 251),
    dbgbus("A7XX_DBGBUS_USPTP_2", 252),
    dbgbus("A7XX_DBGBUS_USPTP_3", 253),
    dbgbus("A7XX_DBGBUS_USPTP_4", 254),
    dbgbus("A7XX_DBGBUS_USPTP_5", 255),
];

pub const DEBUGBUS_IDS: &[u32] = &[
    1, 2, 3, 7, 9, 10, 13, 14, 17, 18, 21, 22, 25, 26, 29, 30, 33, 34, 37, 39, 43, 44, 47, 48, 55,
    59, 62, 63, 66, 68, 70, 71, 72, 73, 102, 106, 107, 108, 109, 138, 139, 140, 141, 202, 203,
    234, 235, 236, 237, 242, 243, 244, 245, 250, 251, 252, 253,
];

/// Bus interface blocks, appended after the regular blocks.
pub const GBIF_DEBUGBUS_IDS: &[u32] = &[6, 5];

/// CX debug bus blocks, shared by every gen7 part.
pub const CX_DEBUGBUS_BLOCKS: &[DebugbusBlock] = &[
    dbgbus("A7XX_DBGBUS_GMU_CX", 61),
    dbgbus("A7XX_DBGBUS_CX", 60),
    dbgbus("A7XX_DBGBUS_GBIF_CX", 6),
];

/// ROQ size from the copy of CP_ROQ_THRESHOLDS_2 in microcode memory;
/// the register itself is not host visible on gen7.
pub fn cp_roq_size(dev: &mut dyn GpuDevice) -> u32 {
    dev.write(regs::CP_SQE_UCODE_DBG_ADDR, regs::CP_SQE_UCODE_ROQ_THRESHOLDS);
    4 * (dev.read(regs::CP_SQE_UCODE_DBG_DATA) >> 20)
}

const fn indexed(name: &'static str, addr: u32, data: u32, count: u32) -> IndexedRegs {
    IndexedRegs {
        name,
        addr,
        data,
        count,
        count_fn: None,
    }
}

pub const INDEXED_REGLIST: &[IndexedRegs] = &[
    indexed("CP_SQE_STAT", regs::CP_SQE_STAT_ADDR, regs::CP_SQE_STAT_DATA, 0x33),
    indexed("CP_DRAW_STATE", regs::CP_DRAW_STATE_ADDR, regs::CP_DRAW_STATE_DATA, 0x100),
    indexed("CP_UCODE_DBG_DATA", regs::CP_SQE_UCODE_DBG_ADDR, regs::CP_SQE_UCODE_DBG_DATA, 0x8000),
    indexed("CP_BV_SQE_STAT", regs::CP_BV_SQE_STAT_ADDR, regs::CP_BV_SQE_STAT_DATA, 0x33),
    indexed("CP_BV_DRAW_STATE", regs::CP_BV_DRAW_STATE_ADDR, regs::CP_BV_DRAW_STATE_DATA, 0x100),
    indexed(
        "CP_BV_SQE_UCODE_DBG",
        regs::CP_BV_SQE_UCODE_DBG_ADDR,
        regs::CP_BV_SQE_UCODE_DBG_DATA,
        0x8000,
    ),
    indexed("CP_SQE_AC_STAT", regs::CP_SQE_AC_STAT_ADDR, regs::CP_SQE_AC_STAT_DATA, 0x33),
    indexed("CP_LPAC_DRAW_STATE", regs::CP_LPAC_DRAW_STATE_ADDR, regs::CP_LPAC_DRAW_STATE_DATA, 0x100),
    indexed(
        "CP_SQE_AC_UCODE_DBG",
        regs::CP_SQE_AC_UCODE_DBG_ADDR,
        regs::CP_SQE_AC_UCODE_DBG_DATA,
        0x8000,
    ),
    indexed("CP_LPAC_FIFO_DBG", regs::CP_LPAC_FIFO_DBG_ADDR, regs::CP_LPAC_FIFO_DBG_DATA, 0x40),
    IndexedRegs {
        name: "CP_ROQ",
        addr: regs::CP_ROQ_DBG_ADDR,
        data: regs::CP_ROQ_DBG_DATA,
        count: 0,
        count_fn: Some(cp_roq_size),
    },
];

/// Mempools, read with the CP and CP_BV chicken bits set.
pub const CP_BV_MEMPOOL_INDEXED: &[IndexedRegs] = &[
    indexed("CP_MEMPOOL", regs::CP_MEM_POOL_DBG_ADDR, regs::CP_MEM_POOL_DBG_DATA, 0x2100),
    indexed("CP_BV_MEMPOOL", regs::CP_BV_MEM_POOL_DBG_ADDR, regs::CP_BV_MEM_POOL_DBG_DATA, 0x2100),
];

pub static TABLES: Gen7Tables = Gen7Tables {
    reglist: REG_LIST,
    pre_crashdumper: PRE_CRASHDUMPER_GPU_REGISTERS,
    post_crashdumper: POST_CRASHDUMPER_REGISTERS,
    shader_blocks: SHADER_BLOCKS,
    clusters: CLUSTERS,
    sptp_clusters: SPTP_CLUSTERS,
    debugbus: DEBUGBUS_IDS,
    gbif_debugbus: GBIF_DEBUGBUS_IDS,
    indexed: INDEXED_REGLIST,
};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crashdump::{CD_DATA_SIZE, CD_MAX_OPS};
    use std::collections::HashSet;

    #[test]
    fn test_debugbus_ids_unique_and_byte_sized() {
        let mut seen = HashSet::new();
        for block in DEBUGBUS_BLOCKS {
            assert!(seen.insert(block.id), "duplicate id {}", block.id);
            assert!(block.id < 0x100, "{}", block.name);
        }
    }

    #[test]
    fn test_sptp_offsets_stay_in_aperture() {
        for cluster in SPTP_CLUSTERS {
            for (start, end) in ranges(cluster.regs) {
                assert!(start >= cluster.regbase);
                assert!(end - cluster.regbase < 0x800);
            }
        }
    }

    #[test]
    fn test_shader_blocks_fit_one_run() {
        for block in SHADER_BLOCKS {
            let words = (block.size * block.num_sps * block.num_usptps) as usize;
            let ops = 1 + 2 * (block.num_sps * block.num_usptps) as usize;
            assert!(words * 4 <= CD_DATA_SIZE);
            assert!(ops <= CD_MAX_OPS);
            assert!(block.size <= 0x800);
        }
    }
}
