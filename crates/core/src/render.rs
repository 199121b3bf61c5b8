// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! YAML-style crash report rendering.
//!
//! The layout is consumed by existing crash-report decoders, so field
//! names, indentation and number formats are fixed.

use crate::ascii85;
use crate::regs::INVALID_REG_VALUE;
use crate::snapshot::{
    CapturedObject, ClusterHandle, DbgAhbHandle, GmuBlock, GpuState, RegisterSource, ShaderHandle,
};
use crate::HFI_HISTORY_SZ;
use crate::tables::{self, a6xx::NUM_CONTEXTS, a6xx::NUM_SHADER_BANKS, DebugbusBlock, STATE_FORCE_CTXT_1};
use std::io::{self, Write};

type Out<'a> = &'a mut dyn Write;

/// Words of payload at `words`, or nothing if they are all zero.
fn write_ascii85(w: Out<'_>, words: &[u32]) -> io::Result<()> {
    if let Some(encoded) = ascii85::encode(words) {
        writeln!(w, "    data: !!ascii85 |")?;
        writeln!(w, "      {}", encoded)?;
    }
    Ok(())
}

/// One line per register in `regs`, skipping unreadable ones.
/// Returns the number of data words consumed.
fn write_registers(w: Out<'_>, regs: &[u32], data: &[u32], indent: usize) -> io::Result<usize> {
    let pad = "  ".repeat(indent);
    let mut index = 0;
    for (start, end) in tables::ranges(regs) {
        for offset in start..=end {
            let Some(&value) = data.get(index) else {
                return Ok(index);
            };
            index += 1;
            if value == INVALID_REG_VALUE {
                continue;
            }
            writeln!(w, "{}- {{ offset: 0x{:06x}, value: 0x{:08x} }}", pad, offset << 2, value)?;
        }
    }
    Ok(index)
}

fn write_gmu_block(w: Out<'_>, name: &str, block: Option<&GmuBlock>, history: &[[i32; HFI_HISTORY_SZ]]) -> io::Result<()> {
    writeln!(w, "{}:", name)?;
    let Some(block) = block else {
        return Ok(());
    };

    writeln!(w, "    iova: 0x{:016x}", block.iova)?;
    writeln!(w, "    size: {}", block.size)?;
    for (i, queue) in history.iter().enumerate() {
        write!(w, "    queue-history[{}]:", i)?;
        for id in queue {
            write!(w, " {}", id)?;
        }
        writeln!(w)?;
    }

    if let Some(encoded) = ascii85::encode_bytes(&block.data) {
        writeln!(w, "    data: !!ascii85 |")?;
        writeln!(w, "      {}", encoded)?;
    }
    Ok(())
}

fn write_indexed(w: Out<'_>, obj: &CapturedObject<&'static tables::IndexedRegs>) -> io::Result<()> {
    let Some(data) = &obj.data else {
        return Ok(());
    };
    writeln!(w, "  - regs-name: {}", obj.handle.name)?;
    writeln!(w, "    dwords: {}", obj.count)?;
    write_ascii85(w, data)
}

fn write_shader(w: Out<'_>, obj: &CapturedObject<ShaderHandle>) -> io::Result<()> {
    let Some(data) = &obj.data else {
        return Ok(());
    };

    match obj.handle {
        ShaderHandle::A6xx(block) => {
            writeln!(w, "  - type: {}", block.name)?;
            let size = block.size as usize;
            for bank in 0..NUM_SHADER_BANKS as usize {
                writeln!(w, "    - bank: {}", bank)?;
                writeln!(w, "      size: {}", block.size)?;
                if let Some(words) = data.get(bank * size..(bank + 1) * size) {
                    write_ascii85(w, words)?;
                }
            }
        }
        ShaderHandle::Gen7(block) => {
            writeln!(w, "  - type: {}", tables::statetype_name(block.statetype))?;
            writeln!(w, "    - pipe: {}", tables::pipe_name(block.pipe))?;
            let size = block.size as usize;
            let mut chunks = data.chunks(size.max(1));
            for sp in 0..block.num_sps {
                writeln!(w, "      - sp: {}", sp)?;
                for usptp in 0..block.num_usptps {
                    writeln!(w, "        - usptp: {}", usptp)?;
                    writeln!(w, "          size: {}", block.size)?;
                    if let Some(words) = chunks.next() {
                        write_ascii85(w, words)?;
                    }
                }
            }
        }
    }
    Ok(())
}

/// a6xx cluster data: the same ranges once per context.
fn write_context_data(w: Out<'_>, regs: &[u32], data: &[u32]) -> io::Result<()> {
    let mut consumed = 0;
    for ctx in 0..NUM_CONTEXTS {
        writeln!(w, "    - context: {}", ctx)?;
        consumed += write_registers(w, regs, data.get(consumed..).unwrap_or_default(), 3)?;
    }
    Ok(())
}

fn write_gen7_cluster_header(w: Out<'_>, pipe: u32, cluster: u32, context: u32) -> io::Result<()> {
    writeln!(w, "  - pipe: {}", tables::pipe_name(pipe))?;
    writeln!(w, "    - cluster-name: {}", tables::cluster_name(cluster))?;
    writeln!(w, "      - context: {}", context)
}

fn write_cluster(w: Out<'_>, obj: &CapturedObject<ClusterHandle>) -> io::Result<()> {
    let Some(data) = &obj.data else {
        return Ok(());
    };

    match obj.handle {
        ClusterHandle::A6xx(cluster) => {
            writeln!(w, "  - cluster-name: {}", cluster.name)?;
            write_context_data(w, cluster.regs, data)
        }
        ClusterHandle::Gen7(cluster) => {
            let context = u32::from(cluster.context == STATE_FORCE_CTXT_1);
            write_gen7_cluster_header(w, cluster.pipe, cluster.cluster, context)?;
            write_registers(w, cluster.regs, data, 4).map(|_| ())
        }
    }
}

fn write_dbgahb_cluster(w: Out<'_>, obj: &CapturedObject<DbgAhbHandle>) -> io::Result<()> {
    let Some(data) = &obj.data else {
        return Ok(());
    };

    match obj.handle {
        DbgAhbHandle::A6xx(cluster) => {
            writeln!(w, "  - cluster-name: {}", cluster.name)?;
            write_context_data(w, cluster.regs, data)
        }
        DbgAhbHandle::Gen7(cluster) => {
            write_gen7_cluster_header(w, cluster.pipe, cluster.cluster, cluster.context)?;
            write_registers(w, cluster.regs, data, 4).map(|_| ())
        }
    }
}

fn write_debugbus_block(w: Out<'_>, obj: &CapturedObject<&'static DebugbusBlock>) -> io::Result<()> {
    let Some(data) = &obj.data else {
        return Ok(());
    };
    writeln!(w, "  - debugbus-block: {}", obj.handle.name)?;
    // Block counts are in quadwords; report dwords.
    writeln!(w, "    count: {}", obj.handle.count << 1)?;
    write_ascii85(w, data)
}

/// Write the crash report for `state`.
pub fn render(state: &GpuState, w: &mut impl Write) -> io::Result<()> {
    let w: Out<'_> = w;

    writeln!(w, "gpu-initialized: {}", u8::from(state.gpu_initialized))?;
    writeln!(w, "gpu-model: {}", state.info.model)?;
    writeln!(w, "chip-id: 0x{:08x}", state.info.chip_id)?;

    write_gmu_block(w, "gmu-log", state.gmu_log.as_ref(), &[])?;
    write_gmu_block(w, "gmu-hfi", state.gmu_hfi.as_ref(), &state.hfi_queue_history)?;
    write_gmu_block(w, "gmu-debug", state.gmu_debug.as_ref(), &[])?;

    writeln!(w, "registers:")?;
    for obj in &state.registers {
        if let Some(data) = &obj.data {
            write_registers(w, obj.handle.regs(), data, 1)?;
        }
    }

    writeln!(w, "registers-gmu:")?;
    for obj in &state.gmu_registers {
        if let Some(data) = &obj.data {
            write_registers(w, obj.handle.regs(), data, 1)?;
        }
    }

    writeln!(w, "indexed-registers:")?;
    for obj in &state.indexed {
        write_indexed(w, obj)?;
    }

    writeln!(w, "shader-blocks:")?;
    for obj in &state.shaders {
        write_shader(w, obj)?;
    }

    writeln!(w, "clusters:")?;
    for obj in &state.clusters {
        write_cluster(w, obj)?;
    }
    for obj in &state.dbgahb_clusters {
        write_dbgahb_cluster(w, obj)?;
    }

    writeln!(w, "debugbus:")?;
    for obj in &state.debugbus {
        write_debugbus_block(w, obj)?;
    }
    if let Some(data) = &state.vbif_debugbus {
        writeln!(w, "  - debugbus-block: A6XX_DBGBUS_VBIF")?;
        writeln!(w, "    count: {}", data.len())?;
        write_ascii85(w, data)?;
    }
    for obj in &state.cx_debugbus {
        write_debugbus_block(w, obj)?;
    }

    Ok(())
}

/// Render `state` into a string.
pub fn render_to_string(state: &GpuState) -> String {
    let mut out = Vec::new();
    // Writing into a Vec cannot fail.
    let _ = render(state, &mut out);
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::{GpuInfo, GpuModel};
    use crate::tables::{a6xx, gen7_0_0, RANGE_END};

    static TWO_RANGES: &[u32] = &[0x10, 0x12, 0x20, 0x20, RANGE_END];

    fn a640() -> GpuState {
        GpuState::new(GpuInfo::new(GpuModel::A640))
    }

    #[test]
    fn test_empty_report_has_every_section() {
        let text = render_to_string(&a640());
        let chip = format!("chip-id: 0x{:08x}", GpuModel::A640.default_chip_id());
        let sections: Vec<_> = text.lines().filter(|l| !l.starts_with(' ')).collect();
        assert_eq!(
            sections,
            vec![
                "gpu-initialized: 0",
                "gpu-model: a640",
                chip.as_str(),
                "gmu-log:",
                "gmu-hfi:",
                "gmu-debug:",
                "registers:",
                "registers-gmu:",
                "indexed-registers:",
                "shader-blocks:",
                "clusters:",
                "debugbus:",
            ]
        );
    }

    #[test]
    fn test_register_lines_skip_invalid() {
        let mut state = a640();
        state.registers.push(CapturedObject::new(
            RegisterSource::Ranges(TWO_RANGES),
            Some(vec![1, INVALID_REG_VALUE, 3, 4]),
        ));
        let text = render_to_string(&state);
        assert!(text.contains("registers:\n  - { offset: 0x000040, value: 0x00000001 }\n"));
        assert!(!text.contains("offset: 0x000044"));
        assert!(text.contains("  - { offset: 0x000048, value: 0x00000003 }\n"));
        assert!(text.contains("  - { offset: 0x000080, value: 0x00000004 }\nregisters-gmu:"));
    }

    #[test]
    fn test_missing_objects_are_omitted() {
        let mut state = a640();
        state
            .clusters
            .push(CapturedObject::missing(ClusterHandle::A6xx(&a6xx::CLUSTERS[0])));
        state
            .debugbus
            .push(CapturedObject::missing(&a6xx::DEBUGBUS_BLOCKS[0]));
        let text = render_to_string(&state);
        assert!(!text.contains("cluster-name"));
        assert!(!text.contains("debugbus-block"));
    }

    #[test]
    fn test_indexed_zero_count() {
        let mut state = a640();
        state
            .indexed
            .push(CapturedObject::new(&a6xx::INDEXED_REGLIST[0], Some(Vec::new())));
        let text = render_to_string(&state);
        let name = a6xx::INDEXED_REGLIST[0].name;
        assert!(text.contains(&format!(
            "  - regs-name: {}\n    dwords: 0\nshader-blocks:",
            name
        )));
    }

    #[test]
    fn test_all_zero_payload_prints_no_data() {
        let mut state = a640();
        state
            .indexed
            .push(CapturedObject::new(&a6xx::INDEXED_REGLIST[0], Some(vec![0; 4])));
        let text = render_to_string(&state);
        assert!(text.contains("    dwords: 4\n"));
        assert!(!text.contains("!!ascii85"));
    }

    #[test]
    fn test_debugbus_counts_in_dwords() {
        let mut state = a640();
        let block = &a6xx::DEBUGBUS_BLOCKS[0];
        let mut words = vec![0; block.count as usize * 2];
        words[0] = 1;
        state.debugbus.push(CapturedObject::new(block, Some(words)));
        state.vbif_debugbus = Some(vec![0; crate::access::VBIF_DEBUGBUS_BLOCK_SIZE]);

        let text = render_to_string(&state);
        assert!(text.contains(&format!(
            "  - debugbus-block: {}\n    count: {}\n    data: !!ascii85 |\n      !!!!\"\n",
            block.name,
            block.count << 1
        )));
        assert!(text.contains("  - debugbus-block: A6XX_DBGBUS_VBIF\n    count: 170\n"));
    }

    #[test]
    fn test_a6xx_cluster_contexts() {
        let mut state = a640();
        let cluster = &a6xx::CLUSTERS[0];
        let words = tables::range_count(cluster.regs);
        state.clusters.push(CapturedObject::new(
            ClusterHandle::A6xx(cluster),
            Some(vec![7; words * NUM_CONTEXTS as usize]),
        ));
        let text = render_to_string(&state);
        assert!(text.contains(&format!("  - cluster-name: {}\n    - context: 0\n      - {{", cluster.name)));
        assert!(text.contains("    - context: 1\n      - {"));
        let lines = text.lines().filter(|l| l.starts_with("      - { offset")).count();
        assert_eq!(lines, words * NUM_CONTEXTS as usize);
    }

    #[test]
    fn test_gen7_cluster_context_flag() {
        let mut state = GpuState::new(GpuInfo::new(GpuModel::A730));
        let cluster = gen7_0_0::CLUSTERS
            .iter()
            .find(|c| c.context == STATE_FORCE_CTXT_1)
            .unwrap();
        let words = tables::range_count(cluster.regs);
        state
            .clusters
            .push(CapturedObject::new(ClusterHandle::Gen7(cluster), Some(vec![5; words])));
        let text = render_to_string(&state);
        assert!(text.contains(&format!(
            "  - pipe: {}\n    - cluster-name: {}\n      - context: 1\n        - {{ offset",
            tables::pipe_name(cluster.pipe),
            tables::cluster_name(cluster.cluster)
        )));
    }

    #[test]
    fn test_gen7_shader_layout() {
        let mut state = GpuState::new(GpuInfo::new(GpuModel::A730));
        let block = &gen7_0_0::SHADER_BLOCKS[0];
        let per = block.size as usize;
        let mut data = vec![0; per * (block.num_sps * block.num_usptps) as usize];
        data[per] = 1;
        state
            .shaders
            .push(CapturedObject::new(ShaderHandle::Gen7(block), Some(data)));
        let text = render_to_string(&state);
        assert!(text.contains("      - sp: 0\n        - usptp: 0\n"));
        assert!(text.contains(&format!(
            "        - usptp: 1\n          size: {}\n    data: !!ascii85 |\n",
            block.size
        )));
        assert_eq!(text.matches("!!ascii85").count(), 1);
    }

    #[test]
    fn test_gmu_hfi_history() {
        let mut state = a640();
        state.gmu_hfi = Some(GmuBlock {
            iova: 0x6000_0000,
            size: 8,
            data: vec![0, 0, 0, 0, 1, 0, 0, 0],
        });
        state.hfi_queue_history[0] = [1, 2, 3, 4, 5, 6, 7, 8];
        let text = render_to_string(&state);
        assert!(text.contains(
            "gmu-hfi:\n    iova: 0x0000000060000000\n    size: 8\n    queue-history[0]: 1 2 3 4 5 6 7 8\n    queue-history[1]: 0 0 0 0 0 0 0 0\n    data: !!ascii85 |\n      z!!!!\"\n"
        ));
    }
}
