// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Snapshot collection.
//!
//! One pass over the device in a fixed order: GMU state first, then the
//! indexed banks, then everything that needs the crash dumper, and the
//! debug buses last since programming them disturbs trace selection.

pub mod a6xx;
pub mod a7xx;

use crate::access::{read_debugbus_block, read_indexed_block, read_ranges, read_vbif_debugbus, setup_debugbus};
use crate::crashdump::{CrashDumper, Script};
use crate::hw::{Features, Generation, GpuInfo};
use crate::regs;
use crate::snapshot::{CapturedObject, Category, GmuBlock, GpuState, RegisterSource, SnapshotRef};
use crate::tables::{self, gen7_0_0, gen7_2_0, gen7_9_0, DebugbusBlock, IndexedRegs};
use crate::{CaptureError, CaptureObserver, CaptureResult, Gmu, GmuBufferKind, GpuDevice, RegisterIo};
use crate::{HFI_HISTORY_SZ, HFI_QUEUES};
use gpustate_config::CaptureConfig;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub use self::a6xx::A6xxCapture;
pub use self::a7xx::A7xxCapture;

/// Per-family capture steps. The collector drives them in a fixed order;
/// each step records its objects into the snapshot and never fails the
/// capture as a whole.
pub trait FamilyCapture: Send + Sync {
    fn name(&self) -> &'static str;
    fn indexed(&self, session: &mut Session<'_>, state: &mut GpuState);
    fn registers(&self, session: &mut Session<'_>, state: &mut GpuState);
    fn shaders(&self, session: &mut Session<'_>, state: &mut GpuState);
    fn clusters(&self, session: &mut Session<'_>, state: &mut GpuState);
    fn dbgahb_clusters(&self, session: &mut Session<'_>, state: &mut GpuState);
    /// Registers read over AHB after the crash dumper has been released.
    fn post_dumper_registers(&self, _session: &mut Session<'_>, _state: &mut GpuState) {}
    fn debugbus_blocks(&self, info: &GpuInfo) -> Vec<&'static DebugbusBlock>;
    fn cx_debugbus_blocks(&self) -> &'static [DebugbusBlock];
}

static A6XX: A6xxCapture = A6xxCapture;
static GEN7_0_0: A7xxCapture = A7xxCapture {
    tables: &gen7_0_0::TABLES,
    toggle_sp_dbg: true,
};
static GEN7_2_0: A7xxCapture = A7xxCapture {
    tables: &gen7_2_0::TABLES,
    toggle_sp_dbg: false,
};
static GEN7_9_0: A7xxCapture = A7xxCapture {
    tables: &gen7_9_0::TABLES,
    toggle_sp_dbg: false,
};

/// The capture strategy for a hardware generation.
pub fn strategy(generation: Generation) -> &'static dyn FamilyCapture {
    match generation {
        Generation::A6xx => &A6XX,
        Generation::A7xxGen1 => &GEN7_0_0,
        Generation::A7xxGen2 => &GEN7_2_0,
        Generation::A7xxGen3 => &GEN7_9_0,
    }
}

/// State shared by the capture steps of one collection.
pub struct Session<'a> {
    pub dev: &'a mut dyn GpuDevice,
    pub info: GpuInfo,
    /// Present only while crash-dumper captures are possible.
    pub dumper: Option<CrashDumper>,
    observers: &'a [Arc<dyn CaptureObserver>],
}

impl<'a> Session<'a> {
    pub fn new(dev: &'a mut dyn GpuDevice, observers: &'a [Arc<dyn CaptureObserver>]) -> Self {
        let info = dev.info().clone();
        Self {
            dev,
            info,
            dumper: None,
            observers,
        }
    }

    /// Record `obj` under `category` and tell the observers about it.
    pub fn keep<H>(&self, category: Category, objs: &mut Vec<CapturedObject<H>>, obj: CapturedObject<H>) {
        for observer in self.observers {
            observer.on_object(category, obj.is_captured(), obj.words());
        }
        objs.push(obj);
    }

    /// Read a range list directly over AHB.
    pub fn ahb(&mut self, regs: &[u32]) -> Vec<u32> {
        read_ranges(&mut *self.dev, regs)
    }

    /// Read an indexed bank, sizing it from live hardware state when the
    /// descriptor asks for it.
    pub fn indexed(&mut self, regs: &'static IndexedRegs) -> CapturedObject<&'static IndexedRegs> {
        let count = match regs.count_fn {
            Some(count_fn) => count_fn(&mut *self.dev),
            None => regs.count,
        };
        debug!("indexed {}: {} dwords", regs.name, count);
        let data = read_indexed_block(&mut *self.dev, regs.addr, regs.data, count);
        let mut obj = CapturedObject::new(regs, data);
        obj.count = count;
        obj
    }

    /// Build a crash dumper script with `build`, run it, and copy the
    /// results out. Any failure is logged and yields `None`.
    pub fn dump<F>(&mut self, what: &str, build: F) -> Option<Vec<u32>>
    where
        F: FnOnce(&mut Script) -> CaptureResult<()>,
    {
        let dumper = self.dumper.as_mut()?;
        let mut script = dumper.script();

        let result = build(&mut script)
            .and_then(|_| script.finish())
            .and_then(|_| {
                let ran = dumper.run(&mut *self.dev, &script);
                for observer in self.observers {
                    observer.on_dumper_run(ran.is_ok());
                }
                ran
            })
            .and_then(|_| dumper.data(&mut *self.dev, script.data_words()));

        match result {
            Ok(data) => {
                debug!("{}: {} words via crash dumper", what, data.len());
                Some(data)
            }
            Err(e) => {
                warn!("{}: {}", what, e);
                None
            }
        }
    }

    pub fn release_dumper(&mut self) {
        if let Some(dumper) = self.dumper.take() {
            dumper.release(&mut *self.dev);
        }
    }
}

/// Queue one read per range of `regs`, each rebased by `rebase`.
pub(crate) fn queue_ranges(script: &mut Script, regs: &[u32], rebase: impl Fn(u32) -> u32) -> CaptureResult<()> {
    for (start, end) in tables::ranges(regs) {
        script.read(rebase(start), end - start + 1)?;
    }
    Ok(())
}

fn read_gmu_ranges(gmu: &mut dyn Gmu, regs: &[u32], rscc: bool) -> Vec<u32> {
    let mut data = Vec::with_capacity(tables::range_count(regs));
    for (start, end) in tables::ranges(regs) {
        for offset in start..=end {
            data.push(if rscc {
                gmu.read_rscc(offset)
            } else {
                gmu.read(offset)
            });
        }
    }
    data
}

fn snapshot_gmu_buffer(gmu: &dyn Gmu, kind: GmuBufferKind) -> Option<GmuBlock> {
    let buffer = gmu.buffer(kind)?;
    if buffer.data.is_empty() {
        return None;
    }
    Some(GmuBlock {
        iova: buffer.iova,
        size: buffer.data.len(),
        data: buffer.data.to_vec(),
    })
}

/// Capture GMU registers, firmware buffers and HFI history. Returns
/// whether the GX domain is powered.
fn capture_gmu(session: &mut Session<'_>, state: &mut GpuState) -> bool {
    let gpucc = if session.info.has(Features::ALT_GPUCC) {
        &tables::a6xx::A621_GPUCC_REG
    } else {
        &tables::a6xx::GPUCC_REG
    };
    let cx = &tables::a6xx::GMU_REGLIST[0];
    let rscc = &tables::a6xx::GMU_REGLIST[1];
    let gx = &tables::a6xx::GMU_REGLIST[2];

    let Some(gmu) = session.dev.gmu() else {
        warn!("no GMU attached, skipping GMU state");
        return true;
    };

    let mut objs = vec![
        CapturedObject::new(RegisterSource::List(cx), Some(read_gmu_ranges(gmu, cx.regs, false))),
        CapturedObject::new(RegisterSource::List(rscc), Some(read_gmu_ranges(gmu, rscc.regs, true))),
        CapturedObject::new(RegisterSource::List(gpucc), Some(read_gmu_ranges(gmu, gpucc.regs, false))),
    ];
    let gx_on = gmu.gx_is_on();

    state.gmu_log = snapshot_gmu_buffer(gmu, GmuBufferKind::Log);
    state.gmu_hfi = snapshot_gmu_buffer(gmu, GmuBufferKind::Hfi);
    state.gmu_debug = snapshot_gmu_buffer(gmu, GmuBufferKind::Debug);

    for (i, history) in state.hfi_queue_history.iter_mut().enumerate().take(HFI_QUEUES) {
        if let Some(queue) = gmu.hfi_queue(i) {
            for (j, slot) in history.iter_mut().enumerate() {
                *slot = queue.history[(j + queue.history_idx) % HFI_HISTORY_SZ];
            }
        }
    }

    if gx_on {
        // Open the fence so GX registers answer over AHB.
        session.dev.write(regs::GMU_AO_AHB_FENCE_CTRL, 0);
        if let Some(gmu) = session.dev.gmu() {
            objs.push(CapturedObject::new(
                RegisterSource::List(gx),
                Some(read_gmu_ranges(gmu, gx.regs, false)),
            ));
        }
    } else {
        objs.push(CapturedObject::missing(RegisterSource::List(gx)));
    }

    for obj in objs {
        session.keep(Category::GmuRegisters, &mut state.gmu_registers, obj);
    }
    gx_on
}

fn capture_debugbus(family: &dyn FamilyCapture, session: &mut Session<'_>, state: &mut GpuState) {
    setup_debugbus(&mut *session.dev, regs::GX_DBGC);

    // The CX controller lives outside the GPU block.
    let mut cx = session.dev.ioremap("cx_dbgc");
    if let Some(io) = cx.as_mut() {
        setup_debugbus(&mut **io, regs::CX_DBGC);
    }

    for block in family.debugbus_blocks(&session.info) {
        let data = read_debugbus_block(&mut *session.dev, regs::GX_DBGC, block.id, block.count);
        session.keep(Category::Debugbus, &mut state.debugbus, CapturedObject::new(block, data));
    }

    if !session.info.has(Features::GBIF) {
        state.vbif_debugbus = read_vbif_debugbus(&mut *session.dev);
        let words = state.vbif_debugbus.as_ref().map_or(0, Vec::len);
        for observer in session.observers {
            observer.on_object(Category::VbifDebugbus, state.vbif_debugbus.is_some(), words);
        }
    }

    match cx {
        Some(mut io) => {
            for block in family.cx_debugbus_blocks() {
                let data = read_debugbus_block(&mut *io, regs::CX_DBGC, block.id, block.count);
                session.keep(Category::CxDebugbus, &mut state.cx_debugbus, CapturedObject::new(block, data));
            }
        }
        None => debug!("cx_dbgc is not mapped, skipping the CX debug bus"),
    }
}

/// Captures GPU state snapshots.
#[derive(Debug, Clone)]
pub struct Collector {
    observers: Vec<Arc<dyn CaptureObserver>>,
    debugbus: bool,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector {
    pub fn new() -> Self {
        Self {
            observers: Vec::new(),
            debugbus: true,
        }
    }

    pub fn from_config(config: &CaptureConfig) -> Self {
        Self::new().with_debugbus(config.debugbus)
    }

    pub fn with_debugbus(mut self, enabled: bool) -> Self {
        self.debugbus = enabled;
        self
    }

    pub fn add_observer(&mut self, observer: Arc<dyn CaptureObserver>) {
        self.observers.push(observer);
    }

    /// Take one snapshot of `dev`.
    ///
    /// Individual objects that cannot be captured are left empty; the only
    /// error is failing to allocate the snapshot itself.
    pub fn collect(&self, dev: &mut dyn GpuDevice) -> CaptureResult<SnapshotRef> {
        for observer in &self.observers {
            observer.on_capture_start();
        }

        let info = dev.info().clone();
        let family = strategy(info.generation());
        info!("Capturing {} state ({} tables)", info.model, family.name());

        let mut state = GpuState::new(info.clone());
        state
            .registers
            .try_reserve(8)
            .map_err(|_| CaptureError::Allocation {
                what: "snapshot",
                size: std::mem::size_of::<GpuState>(),
            })?;

        let stalled = dev.read(regs::RBBM_STATUS3) & regs::RBBM_STATUS3_SMMU_STALLED_ON_FAULT != 0;
        let needs_hw_init = dev.needs_hw_init();
        let mut session = Session::new(dev, &self.observers);

        if !info.has(Features::GMU_WRAPPER) && !capture_gmu(&mut session, &mut state) {
            info!("GX is off, only GMU state was captured");
            return Ok(self.finish(state));
        }

        family.indexed(&mut session, &mut state);

        if stalled {
            warn!("SMMU is stalled on a fault, reading registers over AHB");
        } else if needs_hw_init {
            debug!("GPU needs hardware init, not using the crash dumper");
        } else {
            match CrashDumper::init(&mut *session.dev) {
                Ok(dumper) => session.dumper = Some(dumper),
                Err(e) => warn!("Crash dumper unavailable: {}", e),
            }
        }

        family.registers(&mut session, &mut state);

        if session.dumper.is_some() {
            family.shaders(&mut session, &mut state);
            family.clusters(&mut session, &mut state);
            family.dbgahb_clusters(&mut session, &mut state);
            session.release_dumper();
        }

        family.post_dumper_registers(&mut session, &mut state);

        if self.debugbus {
            capture_debugbus(family, &mut session, &mut state);
        }

        state.gpu_initialized = !needs_hw_init;
        Ok(self.finish(state))
    }

    fn finish(&self, state: GpuState) -> SnapshotRef {
        for observer in &self.observers {
            observer.on_capture_stop();
        }
        Arc::new(state)
    }
}

/// Take one snapshot of `dev` with the default options.
pub fn collect(dev: &mut dyn GpuDevice) -> CaptureResult<SnapshotRef> {
    Collector::new().collect(dev)
}

/// Read `regs` over AHB and record it as a register section.
pub(crate) fn keep_ahb(session: &mut Session<'_>, state: &mut GpuState, source: RegisterSource) {
    let data = session.ahb(source.regs());
    session.keep(Category::Registers, &mut state.registers, CapturedObject::new(source, Some(data)));
}
