// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! A simulated GPU for exercising capture without hardware.
//!
//! Register reads are served by a `SystemBus` of peripherals, device
//! memory by `GpuMemory`, and a small crash-dump engine executes scripts
//! when the start bit is written. Time is virtual: `udelay` only advances
//! a counter.

use crate::bus::{MappedRegion, SystemBus};
use crate::crashdump::{Op, CD_MAX_OPS};
use crate::hw::{Features, GpuInfo, GpuModel};
use crate::memory::{BufferObject, GpuMemory};
use crate::peripherals::{DebugBus, IndexedBank, RegisterFile, VbifTestBus};
use crate::regs::{self, INVALID_REG_VALUE};
use crate::{
    Bus, CaptureError, CaptureResult, Gmu, GmuBuffer, GmuBufferKind, GpuDevice, HfiQueue, RegisterIo,
    HFI_HISTORY_SZ, HFI_QUEUES,
};
use anyhow::{Context, Result};
use gpustate_config::DeviceManifest;
use tracing::{debug, warn};

const GMU_LOG_IOVA: u64 = 0x6000_0000;
const GMU_HFI_IOVA: u64 = 0x6010_0000;
const GMU_DEBUG_IOVA: u64 = 0x6020_0000;

/// Fault injection and power state knobs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SimFaults {
    pub smmu_stalled: bool,
    pub needs_hw_init: bool,
    /// Whether the CX debug bus region can be mapped.
    pub cx_dbgc: bool,
    pub scratch_alloc_fails: bool,
    /// Every crash dumper run hangs.
    pub crashdumper_hang: bool,
    /// 1-based crash dumper runs that hang.
    pub hang_on_runs: Vec<u32>,
}

fn fill_bytes(len: usize, seed: u8) -> Vec<u8> {
    (0..len)
        .map(|i| (i as u8).wrapping_mul(31).wrapping_add(seed))
        .collect()
}

/// Simulated GMU.
#[derive(Debug)]
pub struct SimGmu {
    pub gx_on: bool,
    pub sptprac_on: bool,
    regs: RegisterFile,
    rscc: RegisterFile,
    log: Vec<u8>,
    hfi: Vec<u8>,
    debug: Vec<u8>,
    queues: [HfiQueue; HFI_QUEUES],
}

impl SimGmu {
    pub fn new(buffer_sizes: [usize; 3]) -> Self {
        let empty = HfiQueue {
            history: [-1; HFI_HISTORY_SZ],
            history_idx: 0,
        };
        let mut gmu = Self {
            gx_on: true,
            sptprac_on: true,
            regs: RegisterFile::new(0x6a00),
            rscc: RegisterFile::new(0x5c00),
            log: fill_bytes(buffer_sizes[0], 1),
            hfi: fill_bytes(buffer_sizes[1], 2),
            debug: fill_bytes(buffer_sizes[2], 3),
            queues: [empty.clone(), empty],
        };
        // Boot handshake traffic on the command queue.
        for id in [0x10, 0x11, 0x12] {
            gmu.record_hfi(0, id);
        }
        gmu
    }

    /// Log a processed message id on an HFI queue.
    pub fn record_hfi(&mut self, queue: usize, id: i32) {
        if let Some(q) = self.queues.get_mut(queue) {
            q.history[q.history_idx] = id;
            q.history_idx = (q.history_idx + 1) % HFI_HISTORY_SZ;
        }
    }

    pub fn registers(&mut self) -> &mut RegisterFile {
        &mut self.regs
    }
}

impl Gmu for SimGmu {
    fn read(&mut self, offset: u32) -> u32 {
        self.regs.get(offset)
    }

    fn read_rscc(&mut self, offset: u32) -> u32 {
        self.rscc.get(offset)
    }

    fn gx_is_on(&self) -> bool {
        self.gx_on
    }

    fn sptprac_is_on(&self) -> bool {
        self.sptprac_on
    }

    fn buffer(&self, kind: GmuBufferKind) -> Option<GmuBuffer<'_>> {
        let (iova, data) = match kind {
            GmuBufferKind::Log => (GMU_LOG_IOVA, &self.log),
            GmuBufferKind::Hfi => (GMU_HFI_IOVA, &self.hfi),
            GmuBufferKind::Debug => (GMU_DEBUG_IOVA, &self.debug),
        };
        if data.is_empty() {
            return None;
        }
        Some(GmuBuffer { iova, data })
    }

    fn hfi_queue(&self, index: usize) -> Option<&HfiQueue> {
        self.queues.get(index)
    }
}

/// Selector state of one crash dumper run.
#[derive(Debug, Default)]
struct EngineSelect {
    aperture: u32,
    read_sel: u32,
    sub_block: u32,
}

impl EngineSelect {
    /// Returns true when `reg` is a selector the engine latches itself.
    fn latch(&mut self, reg: u32, val: u32) -> bool {
        match reg {
            regs::CP_APERTURE_CNTL_CD => self.aperture = val,
            regs::HLSQ_DBG_READ_SEL | regs::SP_READ_SEL => self.read_sel = val,
            regs::RB_RB_SUB_BLOCK_SEL_CNTL_CD => self.sub_block = val,
            _ => return false,
        }
        true
    }

    fn salt(&self) -> u32 {
        self.aperture.rotate_left(16) ^ self.sub_block.rotate_left(24)
    }
}

/// Debug read apertures, served from the current read selection.
fn in_read_aperture(reg: u32) -> bool {
    (regs::SP_AHB_READ_APERTURE..regs::HLSQ_DBG_READ_SEL).contains(&reg)
}

#[derive(Debug)]
pub struct SimGpu {
    info: GpuInfo,
    pub bus: SystemBus,
    memory: GpuMemory,
    gmu: Option<SimGmu>,
    pub faults: SimFaults,
    dumper_runs: u32,
    dump_status: u32,
    clock_us: u64,
}

impl SimGpu {
    /// A healthy device of `model` with empty GMU buffers.
    pub fn new(model: GpuModel) -> Self {
        Self::with_info(GpuInfo::new(model), Some(SimGmu::new([0; 3])))
    }

    fn with_info(info: GpuInfo, gmu: Option<SimGmu>) -> Self {
        let mut registers = RegisterFile::new(info.chip_id);
        // ROQ of 128 dwords.
        registers.set(regs::CP_ROQ_THRESHOLDS_2, 0x0020_0000);

        let mut bus = SystemBus::new(registers);
        bus.attach("gx_dbgc", regs::GX_DBGC.base, regs::GX_DBGC.span(), Box::new(DebugBus::new(0x600)));
        bus.attach(
            "vbif_testbus",
            regs::VBIF_TEST_BUS_OUT_CTRL,
            VbifTestBus::SPAN,
            Box::new(VbifTestBus::new()),
        );

        let banks = [
            ("cp_sqe_stat", regs::CP_SQE_STAT_ADDR),
            ("cp_draw_state", regs::CP_DRAW_STATE_ADDR),
            ("cp_roq", regs::CP_ROQ_DBG_ADDR),
            ("cp_mempool", regs::CP_MEM_POOL_DBG_ADDR),
            ("cp_bv_sqe_stat", regs::CP_BV_SQE_STAT_ADDR),
            ("cp_bv_draw_state", regs::CP_BV_DRAW_STATE_ADDR),
            ("cp_bv_sqe_ucode", regs::CP_BV_SQE_UCODE_DBG_ADDR),
            ("cp_bv_mempool", regs::CP_BV_MEM_POOL_DBG_ADDR),
            ("cp_sqe_ac_stat", regs::CP_SQE_AC_STAT_ADDR),
            ("cp_lpac_draw_state", regs::CP_LPAC_DRAW_STATE_ADDR),
            ("cp_lpac_roq", regs::CP_LPAC_ROQ_DBG_ADDR),
            ("cp_sqe_ac_ucode", regs::CP_SQE_AC_UCODE_DBG_ADDR),
            ("cp_lpac_fifo", regs::CP_LPAC_FIFO_DBG_ADDR),
            ("cp_aqe_roq_0", regs::CP_AQE_ROQ_DBG_ADDR_0),
        ];
        // The SQE microcode bank carries a copy of CP_ROQ_THRESHOLDS_2.
        let ucode = IndexedBank::new(1).with_word(regs::CP_SQE_UCODE_ROQ_THRESHOLDS, 0x0200_0000);
        bus.attach("cp_sqe_ucode", regs::CP_SQE_UCODE_DBG_ADDR, 2, Box::new(ucode));
        for (id, (name, addr)) in banks.into_iter().enumerate() {
            bus.attach(name, addr, 2, Box::new(IndexedBank::new(id as u32 + 2)));
        }

        Self {
            info,
            bus,
            memory: GpuMemory::new(),
            gmu,
            faults: SimFaults {
                cx_dbgc: true,
                ..SimFaults::default()
            },
            dumper_runs: 0,
            dump_status: 0,
            clock_us: 0,
        }
    }

    /// Build a device from a validated manifest.
    pub fn from_manifest(manifest: &DeviceManifest) -> Result<Self> {
        manifest.validate()?;
        let model: GpuModel = manifest.model.parse()?;

        let mut info = GpuInfo::new(model);
        if let Some(chip_id) = manifest.chip_id {
            info.chip_id = chip_id;
        }

        let gmu = if manifest.gmu.wrapper {
            info.features |= Features::GMU_WRAPPER;
            None
        } else {
            let sizes = manifest
                .gmu_buffer_sizes()
                .context("Invalid GMU buffer size")?;
            let mut gmu = SimGmu::new(sizes);
            gmu.gx_on = manifest.gmu.gx_on;
            gmu.sptprac_on = manifest.gmu.sptprac_on;
            Some(gmu)
        };

        let mut sim = Self::with_info(info, gmu);
        for &[start, end] in &manifest.absent {
            sim.bus.registers.add_absent(start, end);
        }
        for preset in &manifest.registers {
            sim.bus.registers.set(preset.offset, preset.value);
        }

        let state = &manifest.state;
        sim.faults = SimFaults {
            smmu_stalled: state.smmu_stalled,
            needs_hw_init: state.needs_hw_init,
            cx_dbgc: state.cx_dbgc,
            scratch_alloc_fails: state.scratch_alloc_fails,
            crashdumper_hang: state.crashdumper_hang,
            hang_on_runs: state.hang_on_runs.clone(),
        };

        debug!("simulated {} '{}' ready", model, manifest.name);
        Ok(sim)
    }

    pub fn sim_gmu(&mut self) -> Option<&mut SimGmu> {
        self.gmu.as_mut()
    }

    /// Crash dumper runs started so far.
    pub fn dumper_runs(&self) -> u32 {
        self.dumper_runs
    }

    pub fn clock_us(&self) -> u64 {
        self.clock_us
    }

    /// Kernel buffers currently mapped.
    pub fn mapped_buffers(&self) -> Vec<BufferObject> {
        self.memory.buffers().cloned().collect()
    }

    fn start_dumper(&mut self) {
        self.dumper_runs += 1;
        let run = self.dumper_runs;

        if self.faults.crashdumper_hang || self.faults.hang_on_runs.contains(&run) {
            debug!("crash dumper run {} hangs", run);
            return;
        }

        let base = u64::from(self.bus.registers.get(regs::CP_CRASH_SCRIPT_BASE))
            | (u64::from(self.bus.registers.get(regs::CP_CRASH_SCRIPT_BASE + 1)) << 32);

        match self.execute_script(base) {
            Ok(ops) => {
                debug!("crash dumper run {} executed {} ops", run, ops);
                self.dump_status = regs::CP_CRASH_DUMP_STATUS_DONE;
            }
            Err(e) => warn!("crash dumper run {} faulted: {}", run, e),
        }
    }

    fn execute_script(&mut self, base: u64) -> CaptureResult<usize> {
        let mut sel = EngineSelect::default();

        for i in 0..CD_MAX_OPS {
            let addr = base + (i as u64) * 16;
            let words = [self.memory.read_u64(addr)?, self.memory.read_u64(addr + 8)?];

            match Op::decode(words) {
                Op::Finish => return Ok(i),
                Op::Write { reg, val } => {
                    if !sel.latch(reg, val) {
                        self.bus.write(reg, val);
                    }
                }
                Op::Read { reg, count, dest } => {
                    let mut bytes = Vec::with_capacity(count as usize * 4);
                    for n in 0..count {
                        bytes.extend_from_slice(&self.engine_read(&sel, reg + n).to_le_bytes());
                    }
                    self.memory.write_bytes(dest, &bytes)?;
                }
            }
        }

        Err(CaptureError::ScriptFull { ops: CD_MAX_OPS })
    }

    fn engine_read(&mut self, sel: &EngineSelect, reg: u32) -> u32 {
        if in_read_aperture(reg) {
            return crate::peripherals::pattern(sel.read_sel ^ 0x5000_0000, reg);
        }
        let value = self.bus.read(reg);
        if value == INVALID_REG_VALUE {
            value
        } else {
            value ^ sel.salt()
        }
    }
}

impl RegisterIo for SimGpu {
    fn read(&mut self, offset: u32) -> u32 {
        match offset {
            regs::RBBM_STATUS3 => {
                let status = self.bus.read(offset) & !regs::RBBM_STATUS3_SMMU_STALLED_ON_FAULT;
                if self.faults.smmu_stalled {
                    status | regs::RBBM_STATUS3_SMMU_STALLED_ON_FAULT
                } else {
                    status
                }
            }
            regs::CP_CRASH_DUMP_STATUS => self.dump_status,
            _ => self.bus.read(offset),
        }
    }

    fn write(&mut self, offset: u32, value: u32) {
        self.bus.write(offset, value);
        if offset == regs::CP_CRASH_DUMP_CNTL {
            if value & regs::CP_CRASH_DUMP_CNTL_START != 0 {
                self.start_dumper();
            } else {
                self.dump_status = 0;
            }
        }
    }

    fn udelay(&mut self, us: u32) {
        self.clock_us += u64::from(us);
    }
}

impl GpuDevice for SimGpu {
    fn info(&self) -> &GpuInfo {
        &self.info
    }

    fn gmu(&mut self) -> Option<&mut dyn Gmu> {
        match self.gmu.as_mut() {
            Some(gmu) => Some(gmu),
            None => None,
        }
    }

    fn needs_hw_init(&self) -> bool {
        self.faults.needs_hw_init
    }

    fn alloc_kernel_bo(&mut self, size: usize, name: &str) -> CaptureResult<BufferObject> {
        if self.faults.scratch_alloc_fails {
            return Err(CaptureError::Allocation {
                what: "kernel buffer",
                size,
            });
        }
        self.memory.map(size, name)
    }

    fn free_kernel_bo(&mut self, bo: BufferObject) {
        if !self.memory.unmap(&bo) {
            warn!("freeing unknown buffer {} at {:#x}", bo.name, bo.iova);
        }
    }

    fn memory(&mut self) -> &mut dyn Bus {
        &mut self.memory
    }

    fn ioremap(&mut self, name: &str) -> Option<Box<dyn RegisterIo>> {
        match name {
            "cx_dbgc" if self.faults.cx_dbgc => Some(Box::new(MappedRegion::new(DebugBus::new(0xc0)))),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crashdump::{CrashDumper, DumperState};

    #[test]
    fn test_engine_runs_script() {
        let mut sim = SimGpu::new(GpuModel::A640);
        sim.bus.registers.set(0x20, 0xaaaa);

        let mut dumper = CrashDumper::init(&mut sim).unwrap();
        let mut script = dumper.script();
        script.read(0x20, 2).unwrap();
        script.finish().unwrap();
        dumper.run(&mut sim, &script).unwrap();

        let data = dumper.data(&mut sim, script.data_words()).unwrap();
        assert_eq!(data[0], 0xaaaa);
        assert_eq!(data[1], sim.bus.registers.get(0x21));
        assert_eq!(sim.dumper_runs(), 1);
        dumper.release(&mut sim);
        assert!(sim.mapped_buffers().is_empty());
    }

    #[test]
    fn test_selectors_stay_inside_a_run() {
        let mut sim = SimGpu::new(GpuModel::A640);
        let mut dumper = CrashDumper::init(&mut sim).unwrap();

        let mut script = dumper.script();
        script.write(regs::HLSQ_DBG_READ_SEL, 0x4200).unwrap();
        script.read(regs::HLSQ_DBG_AHB_READ_APERTURE, 4).unwrap();
        script.finish().unwrap();
        dumper.run(&mut sim, &script).unwrap();
        let first = dumper.data(&mut sim, 4).unwrap();

        dumper.run(&mut sim, &script).unwrap();
        assert_eq!(dumper.data(&mut sim, 4).unwrap(), first);
        assert_ne!(sim.bus.registers.get(regs::HLSQ_DBG_READ_SEL), 0x4200);
    }

    #[test]
    fn test_hang_on_selected_run() {
        let mut sim = SimGpu::new(GpuModel::A730);
        sim.faults.hang_on_runs = vec![2];
        let mut dumper = CrashDumper::init(&mut sim).unwrap();
        let mut script = dumper.script();
        script.read(0x10, 1).unwrap();
        script.finish().unwrap();

        assert!(dumper.run(&mut sim, &script).is_ok());
        let before = sim.clock_us();
        assert!(matches!(
            dumper.run(&mut sim, &script),
            Err(CaptureError::Timeout { .. })
        ));
        assert_eq!(dumper.state(), DumperState::TimedOut);
        assert!(sim.clock_us() - before >= 10_000);
        assert!(dumper.run(&mut sim, &script).is_ok());
    }

    #[test]
    fn test_gmu_buffers_and_history() {
        let mut gmu = SimGmu::new([16, 0, 8]);
        assert_eq!(gmu.buffer(GmuBufferKind::Log).map(|b| b.data.len()), Some(16));
        assert!(gmu.buffer(GmuBufferKind::Hfi).is_none());

        for id in 0..HFI_HISTORY_SZ as i32 {
            gmu.record_hfi(1, id);
        }
        let queue = gmu.hfi_queue(1).unwrap();
        assert_eq!(queue.history_idx, 0);
        assert_eq!(queue.history[7], 7);
        assert_eq!(gmu.hfi_queue(0).unwrap().history_idx, 3);
    }

    #[test]
    fn test_from_manifest() {
        let yaml = r#"
name: bench
model: a621
chip_id: 0x06020101
gmu:
  log_size: "4kB"
state:
  smmu_stalled: true
  cx_dbgc: false
registers:
  - { offset: 0x10, value: 0x77 }
absent:
  - [0x20, 0x21]
"#;
        let manifest: DeviceManifest = serde_yaml::from_str(yaml).unwrap();
        let mut sim = SimGpu::from_manifest(&manifest).unwrap();

        assert_eq!(sim.info().chip_id, 0x0602_0101);
        assert!(sim.info().has(Features::ALT_GPUCC));
        assert_eq!(sim.read(0x10), 0x77);
        assert_eq!(sim.read(0x21), INVALID_REG_VALUE);
        assert_ne!(sim.read(regs::RBBM_STATUS3) & regs::RBBM_STATUS3_SMMU_STALLED_ON_FAULT, 0);
        assert!(sim.ioremap("cx_dbgc").is_none());
        let log = sim.gmu().and_then(|g| g.buffer(GmuBufferKind::Log).map(|b| b.data.len()));
        assert_eq!(log, Some(4000));
    }

    #[test]
    fn test_gmu_wrapper_has_no_gmu() {
        let mut manifest = DeviceManifest::for_model("a630");
        manifest.gmu.wrapper = true;
        let mut sim = SimGpu::from_manifest(&manifest).unwrap();
        assert!(sim.gmu().is_none());
        assert!(sim.info().has(Features::GMU_WRAPPER));
    }
}
