// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Register offsets (in 32-bit register units) and field encoders.

pub const fn bit(index: u32) -> u32 {
    1 << index
}

pub const fn genmask(high: u32, low: u32) -> u32 {
    (((1u64 << (high - low + 1)) - 1) as u32) << low
}

/// Fill value the hardware returns for registers that are not implemented.
pub const INVALID_REG_VALUE: u32 = 0xdeaf_bead;

// RBBM
pub const RBBM_STATUS3: u32 = 0x0213;
pub const RBBM_STATUS3_SMMU_STALLED_ON_FAULT: u32 = bit(24);

// Crash dumper
pub const CP_CRASH_SCRIPT_BASE: u32 = 0x0842;
pub const CP_CRASH_DUMP_CNTL: u32 = 0x0844;
pub const CP_CRASH_DUMP_STATUS: u32 = 0x0845;
pub const CP_CRASH_DUMP_CNTL_START: u32 = bit(0);
pub const CP_CRASH_DUMP_STATUS_DONE: u32 = bit(1);

// CP
pub const CP_CHICKEN_DBG: u32 = 0x0841;
pub const CP_CHICKEN_DBG_STABILIZE: u32 = bit(2);
pub const CP_ROQ_THRESHOLDS_2: u32 = 0x08c1;
pub const CP_MEM_POOL_SIZE: u32 = 0x08c3;
pub const CP_SQE_STAT_ADDR: u32 = 0x0908;
pub const CP_SQE_STAT_DATA: u32 = 0x0909;
pub const CP_DRAW_STATE_ADDR: u32 = 0x090a;
pub const CP_DRAW_STATE_DATA: u32 = 0x090b;
pub const CP_ROQ_DBG_ADDR: u32 = 0x090c;
pub const CP_ROQ_DBG_DATA: u32 = 0x090d;
pub const CP_MEM_POOL_DBG_ADDR: u32 = 0x090e;
pub const CP_MEM_POOL_DBG_DATA: u32 = 0x090f;
pub const CP_SQE_UCODE_DBG_ADDR: u32 = 0x0910;
pub const CP_SQE_UCODE_DBG_DATA: u32 = 0x0911;
pub const CP_APERTURE_CNTL_HOST: u32 = 0x0a00;
pub const CP_APERTURE_CNTL_CD: u32 = 0x0a03;

// CP (gen7 additions)
pub const CP_BV_CHICKEN_DBG: u32 = 0x0ada;
pub const CP_BV_SQE_STAT_ADDR: u32 = 0x0b30;
pub const CP_BV_SQE_STAT_DATA: u32 = 0x0b31;
pub const CP_BV_DRAW_STATE_ADDR: u32 = 0x0b32;
pub const CP_BV_DRAW_STATE_DATA: u32 = 0x0b33;
pub const CP_BV_SQE_UCODE_DBG_ADDR: u32 = 0x0b34;
pub const CP_BV_SQE_UCODE_DBG_DATA: u32 = 0x0b35;
pub const CP_BV_MEM_POOL_DBG_ADDR: u32 = 0x0b3a;
pub const CP_BV_MEM_POOL_DBG_DATA: u32 = 0x0b3b;
pub const CP_SQE_AC_STAT_ADDR: u32 = 0x0b50;
pub const CP_SQE_AC_STAT_DATA: u32 = 0x0b51;
pub const CP_LPAC_DRAW_STATE_ADDR: u32 = 0x0b0a;
pub const CP_LPAC_DRAW_STATE_DATA: u32 = 0x0b0b;
pub const CP_LPAC_ROQ_DBG_ADDR: u32 = 0x0b0c;
pub const CP_LPAC_ROQ_DBG_DATA: u32 = 0x0b0d;
pub const CP_SQE_AC_UCODE_DBG_ADDR: u32 = 0x0b27;
pub const CP_SQE_AC_UCODE_DBG_DATA: u32 = 0x0b28;
pub const CP_LPAC_FIFO_DBG_ADDR: u32 = 0x0b40;
pub const CP_LPAC_FIFO_DBG_DATA: u32 = 0x0b41;
pub const CP_AQE_ROQ_DBG_ADDR_0: u32 = 0x0b60;
pub const CP_AQE_ROQ_DBG_DATA_0: u32 = 0x0b61;

/// Microcode word holding the ROQ thresholds on gen7.
pub const CP_SQE_UCODE_ROQ_THRESHOLDS: u32 = 0x70d3;

// HLSQ aperture (a6xx)
pub const HLSQ_DBG_AHB_READ_APERTURE: u32 = 0xc800;
pub const HLSQ_DBG_READ_SEL: u32 = 0xd000;

// RB sub-block selector
pub const RB_RB_SUB_BLOCK_SEL_CNTL_HOST: u32 = 0x8e3b;
pub const RB_RB_SUB_BLOCK_SEL_CNTL_CD: u32 = 0x8e3d;

// SP aperture (gen7)
pub const SP_READ_SEL: u32 = 0xae6d;
pub const SP_DBG_CNTL: u32 = 0xae71;
pub const SP_AHB_READ_APERTURE: u32 = 0xc000;

// GMU fence, written through the GPU aperture
pub const GMU_AO_AHB_FENCE_CTRL: u32 = 0x9803;

// VBIF test bus
pub const VBIF_CLKON: u32 = 0x3002;
pub const VBIF_CLKON_FORCE_ON_TESTBUS: u32 = bit(1);
pub const VBIF_TEST_BUS_OUT_CTRL: u32 = 0x3084;
pub const VBIF_TEST_BUS1_CTRL0: u32 = 0x3085;
pub const VBIF_TEST_BUS1_CTRL1: u32 = 0x3086;
pub const VBIF_TEST_BUS2_CTRL0: u32 = 0x3087;
pub const VBIF_TEST_BUS2_CTRL1: u32 = 0x3088;
pub const VBIF_TEST_BUS_OUT: u32 = 0x308c;

/// Register layout of a debug bus controller.
///
/// The GX controller sits in the GPU register space; the CX controller
/// lives in a separate `cx_dbgc` region with the same layout at its own
/// base.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebugBusLayout {
    pub base: u32,
}

pub const GX_DBGC: DebugBusLayout = DebugBusLayout { base: 0x0600 };
pub const CX_DBGC: DebugBusLayout = DebugBusLayout { base: 0x0000 };

impl DebugBusLayout {
    pub const fn sel(self, n: u32) -> u32 {
        self.base + n
    }
    pub const fn cntlt(self) -> u32 {
        self.base + 0x04
    }
    pub const fn cntlm(self) -> u32 {
        self.base + 0x05
    }
    pub const fn ivtl(self, n: u32) -> u32 {
        self.base + 0x08 + n
    }
    pub const fn maskl(self, n: u32) -> u32 {
        self.base + 0x0c + n
    }
    pub const fn bytel(self, n: u32) -> u32 {
        self.base + 0x10 + n
    }
    pub const fn trace_buf1(self) -> u32 {
        self.base + 0x2f
    }
    pub const fn trace_buf2(self) -> u32 {
        self.base + 0x30
    }
    /// Size of the register window in registers.
    pub const fn span(self) -> u32 {
        0x31
    }
}

pub const fn dbgbus_sel_ping_index(offset: u32) -> u32 {
    offset & 0xff
}

pub const fn dbgbus_sel_ping_blk_sel(block: u32) -> u32 {
    (block & 0xff) << 8
}

pub const fn dbgbus_cntlt_segt(v: u32) -> u32 {
    (v & 0xf) << 28
}

pub const fn dbgbus_cntlm_enable(v: u32) -> u32 {
    (v & 0xf) << 24
}

/// a6xx CP aperture selector for cluster `id`, context `ctx`.
pub const fn a6xx_aperture_cntl_cd(id: u32, ctx: u32) -> u32 {
    (id << 8) | (ctx << 4) | ctx
}

pub const fn a7xx_aperture_cntl_cd(pipe: u32, cluster: u32, context: u32) -> u32 {
    ((pipe & 0x3) << 12) | ((cluster & 0x7) << 8) | ((context & 0x3) << 4)
}

pub const fn a7xx_sp_read_sel(location: u32, pipe: u32, statetype: u32, usptp: u32, sptp: u32) -> u32 {
    ((location & 0x3) << 18)
        | ((pipe & 0x3) << 16)
        | ((statetype & 0xff) << 8)
        | ((usptp & 0xf) << 4)
        | (sptp & 0xf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_genmask() {
        assert_eq!(genmask(1, 0), 0x3);
        assert_eq!(genmask(31, 0), 0xffff_ffff);
        assert_eq!(genmask(15, 8), 0xff00);
    }

    #[test]
    fn test_debugbus_selector() {
        let reg = dbgbus_sel_ping_index(0x12) | dbgbus_sel_ping_blk_sel(0x1d);
        assert_eq!(reg, 0x1d12);
        assert_eq!(GX_DBGC.sel(3), 0x603);
        assert_eq!(GX_DBGC.trace_buf2(), 0x630);
    }

    #[test]
    fn test_aperture_fields() {
        assert_eq!(a6xx_aperture_cntl_cd(5, 1), 0x511);
        assert_eq!(a7xx_aperture_cntl_cd(2, 4, 3), 0x2430);
        assert_eq!(a7xx_sp_read_sel(2, 1, 0x29, 3, 1), 0x0009_2931);
    }
}
