// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

#[cfg(test)]
mod tests {
    use crate::collect::Session;
    use crate::crashdump::{CrashDumper, CD_DATA_SIZE};
    use crate::hw::{GpuModel, Generation};
    use crate::metrics::CaptureMetrics;
    use crate::render::render_to_string;
    use crate::sim::SimGpu;
    use crate::snapshot::{Category, SnapshotSummary};
    use crate::tables::a6xx;
    use crate::{collect, release, CaptureObserver, Collector};
    use gpustate_config::{DeviceManifest, RegisterPreset};
    use std::sync::Arc;

    fn summary(sim: &mut SimGpu) -> SnapshotSummary {
        let state = collect(sim).unwrap();
        SnapshotSummary::from_state(&state)
    }

    fn total_missing(summary: &SnapshotSummary) -> usize {
        summary.categories.values().map(|c| c.missing).sum()
    }

    #[test]
    fn test_a640_full_capture() {
        let mut sim = SimGpu::new(GpuModel::A640);
        let state = collect(&mut sim).unwrap();

        assert!(state.gpu_initialized);
        assert!(sim.dumper_runs() > 0);
        assert!(sim.mapped_buffers().is_empty());

        assert!(state.registers.iter().all(|o| o.is_captured()));
        assert_eq!(state.shaders.len(), a6xx::SHADER_BLOCKS.len());
        assert!(state.shaders.iter().all(|o| o.is_captured()));
        assert!(!state.clusters.is_empty());
        assert_eq!(state.dbgahb_clusters.len(), a6xx::DBGAHB_CLUSTERS.len());

        // GBIF part: no VBIF test bus, GBIF block on the regular bus.
        assert!(state.vbif_debugbus.is_none());
        assert_eq!(state.debugbus.len(), a6xx::DEBUGBUS_BLOCKS.len() + 1);
        assert_eq!(state.cx_debugbus.len(), a6xx::CX_DEBUGBUS_BLOCKS.len());

        let report = render_to_string(&state);
        assert!(report.starts_with("gpu-initialized: 1\n"));
        assert!(report.contains("gpu-model: a640"));
        assert!(report.contains("  - regs-name: CP_ROQ\n    dwords: 128\n"));
    }

    #[test]
    fn test_a630_vbif_test_bus() {
        let mut sim = SimGpu::new(GpuModel::A630);
        let state = collect(&mut sim).unwrap();

        let vbif = state.vbif_debugbus.as_ref().unwrap();
        assert_eq!(vbif.len(), crate::access::VBIF_DEBUGBUS_BLOCK_SIZE);
        let report = render_to_string(&state);
        assert!(report.contains(&format!(
            "  - debugbus-block: A6XX_DBGBUS_VBIF\n    count: {}\n",
            vbif.len()
        )));
    }

    #[test]
    fn test_absent_registers_are_skipped() {
        let mut manifest = DeviceManifest::for_model("a640");
        manifest.absent.push([0x500, 0x500]);
        let mut sim = SimGpu::from_manifest(&manifest).unwrap();

        let report = render_to_string(&collect(&mut sim).unwrap());
        assert!(!report.contains("offset: 0x001400,"));
        assert!(report.contains("offset: 0x001414,"));
    }

    #[test]
    fn test_empty_roq_is_recorded() {
        let mut manifest = DeviceManifest::for_model("a630");
        manifest.registers.push(RegisterPreset {
            offset: crate::regs::CP_ROQ_THRESHOLDS_2,
            value: 0,
        });
        let mut sim = SimGpu::from_manifest(&manifest).unwrap();
        let state = collect(&mut sim).unwrap();

        let roq = state.indexed.iter().find(|o| o.handle.name == "CP_ROQ").unwrap();
        assert_eq!(roq.count, 0);
        assert_eq!(roq.words(), 0);
    }

    #[test]
    fn test_hung_dumper_run_loses_one_object() {
        let mut sim = SimGpu::new(GpuModel::A640);
        sim.faults.hang_on_runs = vec![2];
        let state = collect(&mut sim).unwrap();

        let missing: Vec<_> = state.registers.iter().filter(|o| !o.is_captured()).collect();
        assert_eq!(missing.len(), 1);
        // Later steps still use the dumper.
        assert!(state.shaders.iter().all(|o| o.is_captured()));
        assert!(state.clusters.iter().all(|o| o.is_captured()));
        assert!(sim.clock_us() >= 10_000);
        assert!(sim.mapped_buffers().is_empty());
    }

    #[test]
    fn test_dumper_always_hangs() {
        let mut sim = SimGpu::new(GpuModel::A650);
        sim.faults.crashdumper_hang = true;
        let state = collect(&mut sim).unwrap();

        assert!(!state.shaders.is_empty());
        assert!(state.shaders.iter().all(|o| !o.is_captured()));
        // Indexed banks and debug buses never go through the dumper.
        assert!(state.indexed.iter().all(|o| o.is_captured()));
        assert!(state.debugbus.iter().all(|o| o.is_captured()));
    }

    #[test]
    fn test_dumper_data_capacity() {
        let mut sim = SimGpu::new(GpuModel::A640);
        let observers: Vec<Arc<dyn CaptureObserver>> = Vec::new();
        let words = (CD_DATA_SIZE / 4) as u32;
        {
            let mut session = Session::new(&mut sim, &observers);
            let dumper = CrashDumper::init(&mut *session.dev).unwrap();
            session.dumper = Some(dumper);

            let full = session.dump("full", |script| script.read(0x10, words).map(|_| ()));
            assert_eq!(full.map(|d| d.len()), Some(words as usize));

            let over = session.dump("over", |script| {
                script.read(0x10, words)?;
                script.read(0x10, 1).map(|_| ())
            });
            assert!(over.is_none());

            let single = session.dump("single", |script| script.read(0x10, words + 1).map(|_| ()));
            assert!(single.is_none());

            session.release_dumper();
        }
        assert_eq!(sim.dumper_runs(), 1);
        assert!(sim.mapped_buffers().is_empty());
    }

    #[test]
    fn test_repeated_capture() {
        let mut sim = SimGpu::new(GpuModel::A660);
        let first = summary(&mut sim);
        let runs = sim.dumper_runs();
        let second = summary(&mut sim);

        assert_eq!(first, second);
        assert_eq!(sim.dumper_runs(), runs * 2);
        assert!(sim.mapped_buffers().is_empty());
    }

    #[test]
    fn test_register_sections_are_stable() {
        for model in [GpuModel::A630, GpuModel::A640] {
            let mut sim = SimGpu::new(model);
            let first = collect(&mut sim).unwrap();
            let second = collect(&mut sim).unwrap();

            let data = |s: &crate::GpuState| -> Vec<Option<Vec<u32>>> {
                s.registers.iter().map(|o| o.data.clone()).collect()
            };
            assert_eq!(data(&first), data(&second), "{}", model);
        }
    }

    #[test]
    fn test_identical_devices_render_identically() {
        let a = render_to_string(&collect(&mut SimGpu::new(GpuModel::A740)).unwrap());
        let b = render_to_string(&collect(&mut SimGpu::new(GpuModel::A740)).unwrap());
        assert_eq!(a, b);
    }

    #[test]
    fn test_gx_off_captures_gmu_only() {
        let mut manifest = DeviceManifest::for_model("a650");
        manifest.gmu.gx_on = false;
        manifest.gmu.log_size = Some("2kB".to_string());
        let mut sim = SimGpu::from_manifest(&manifest).unwrap();
        let state = collect(&mut sim).unwrap();

        assert!(!state.gpu_initialized);
        assert_eq!(sim.dumper_runs(), 0);
        assert!(state.registers.is_empty());
        assert!(state.indexed.is_empty());
        assert!(state.debugbus.is_empty());

        let gx = state.gmu_registers.last().unwrap();
        assert!(!gx.is_captured());
        assert_eq!(state.gmu_registers.len(), 4);
        assert_eq!(state.gmu_log.as_ref().map(|b| b.size), Some(2000));

        let report = render_to_string(&state);
        assert!(report.contains("gmu-log:\n    iova: 0x0000000060000000\n    size: 2000\n"));
    }

    #[test]
    fn test_stalled_smmu_reads_over_ahb() {
        let mut sim = SimGpu::new(GpuModel::A640);
        sim.faults.smmu_stalled = true;
        let state = collect(&mut sim).unwrap();

        assert_eq!(sim.dumper_runs(), 0);
        assert!(state.gpu_initialized);
        assert!(state.shaders.is_empty());
        assert!(state.clusters.is_empty());
        assert!(!state.registers.is_empty());
        assert!(state.registers.iter().all(|o| o.is_captured()));
    }

    #[test]
    fn test_uninitialized_gpu() {
        let mut sim = SimGpu::new(GpuModel::A630);
        sim.faults.needs_hw_init = true;
        let state = collect(&mut sim).unwrap();

        assert!(!state.gpu_initialized);
        assert_eq!(sim.dumper_runs(), 0);
        assert!(render_to_string(&state).starts_with("gpu-initialized: 0\n"));
    }

    #[test]
    fn test_scratch_allocation_failure() {
        let mut sim = SimGpu::new(GpuModel::A730);
        sim.faults.scratch_alloc_fails = true;
        let state = collect(&mut sim).unwrap();

        assert_eq!(sim.dumper_runs(), 0);
        assert!(sim.mapped_buffers().is_empty());
        assert!(state.shaders.is_empty());
        // Pre-dumper list plus the main list over AHB, then post-dumper.
        assert_eq!(state.registers.len(), 3);
        assert!(state.registers.iter().all(|o| o.is_captured()));
    }

    #[test]
    fn test_release() {
        let snapshot = collect(&mut SimGpu::new(GpuModel::A621)).unwrap();
        let other = Arc::clone(&snapshot);

        assert!(!release(Some(snapshot)));
        assert!(release(Some(other)));
        assert!(release(None));
    }

    #[test]
    fn test_every_gen7_generation() {
        for model in [GpuModel::A730, GpuModel::A740, GpuModel::A750] {
            let mut sim = SimGpu::new(model);
            let state = collect(&mut sim).unwrap();
            let summary = SnapshotSummary::from_state(&state);

            assert_ne!(model.generation(), Generation::A6xx);
            assert_eq!(total_missing(&summary), 0, "{} lost objects", model);
            assert!(summary.categories[&Category::Shaders].captured > 0);
            assert!(summary.categories[&Category::DbgAhbClusters].captured > 0);
            assert_eq!(summary.categories[&Category::VbifDebugbus].captured, 0);
            assert!(sim.mapped_buffers().is_empty());
        }
    }

    #[test]
    fn test_gmu_wrapper_capture() {
        let mut manifest = DeviceManifest::for_model("a621");
        manifest.gmu.wrapper = true;
        let mut sim = SimGpu::from_manifest(&manifest).unwrap();
        let state = collect(&mut sim).unwrap();

        assert!(state.gmu_registers.is_empty());
        assert!(state.gmu_log.is_none());
        assert!(sim.dumper_runs() > 0);
        assert!(state.shaders.iter().all(|o| o.is_captured()));
    }

    #[test]
    fn test_observer_sees_every_object() {
        let metrics = Arc::new(CaptureMetrics::new());
        let mut collector = Collector::new();
        collector.add_observer(metrics.clone());

        let mut sim = SimGpu::new(GpuModel::A630);
        sim.faults.hang_on_runs = vec![1];
        let state = collector.collect(&mut sim).unwrap();
        let summary = SnapshotSummary::from_state(&state);

        let captured: usize = summary.categories.values().map(|c| c.captured).sum();
        let words: usize = summary.categories.values().map(|c| c.words).sum();
        assert_eq!(metrics.get_captures(), 1);
        assert_eq!(metrics.get_objects(), captured as u64);
        assert_eq!(metrics.get_missing(), total_missing(&summary) as u64);
        assert_eq!(metrics.get_words(), words as u64);
        assert_eq!(metrics.get_dumper_runs(), u64::from(sim.dumper_runs()));
        assert_eq!(metrics.get_dumper_failures(), 1);
        assert!(metrics.last_duration().is_some());
    }

    #[test]
    fn test_debugbus_disabled() {
        let mut sim = SimGpu::new(GpuModel::A630);
        let state = Collector::new().with_debugbus(false).collect(&mut sim).unwrap();

        assert!(state.debugbus.is_empty());
        assert!(state.cx_debugbus.is_empty());
        assert!(state.vbif_debugbus.is_none());
        assert!(!state.registers.is_empty());
    }

    #[test]
    fn test_missing_cx_controller() {
        let mut sim = SimGpu::new(GpuModel::A660);
        sim.faults.cx_dbgc = false;
        let state = collect(&mut sim).unwrap();

        assert!(state.cx_debugbus.is_empty());
        assert!(!state.debugbus.is_empty());
    }
}
