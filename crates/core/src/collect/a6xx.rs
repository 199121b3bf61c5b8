// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use super::{keep_ahb, queue_ranges, FamilyCapture, Session};
use crate::hw::{Features, GpuInfo};
use crate::regs;
use crate::snapshot::{CapturedObject, Category, ClusterHandle, DbgAhbHandle, GpuState, RegisterSource, ShaderHandle};
use crate::tables::a6xx::{self, NUM_CONTEXTS, NUM_SHADER_BANKS};
use crate::tables::{DebugbusBlock, RegList};
use tracing::debug;

/// Capture steps for the a6xx family.
#[derive(Debug)]
pub struct A6xxCapture;

fn supported(info: &GpuInfo, requires: Features) -> bool {
    info.features.contains(requires)
}

fn dump_reglist(session: &mut Session<'_>, state: &mut GpuState, list: &'static RegList) {
    let data = session.dump(list.name, |script| {
        if let Some((reg, val)) = list.sel {
            script.write(reg, val)?;
        }
        queue_ranges(script, list.regs, |reg| reg)
    });
    session.keep(
        Category::Registers,
        &mut state.registers,
        CapturedObject::new(RegisterSource::List(list), data),
    );
}

impl FamilyCapture for A6xxCapture {
    fn name(&self) -> &'static str {
        "a6xx"
    }

    fn indexed(&self, session: &mut Session<'_>, state: &mut GpuState) {
        for bank in a6xx::INDEXED_REGLIST {
            let obj = session.indexed(bank);
            session.keep(Category::Indexed, &mut state.indexed, obj);
        }

        if session.info.has(Features::A650_FAMILY) {
            let val = session.dev.read(regs::CP_CHICKEN_DBG);
            session
                .dev
                .write(regs::CP_CHICKEN_DBG, val | regs::CP_CHICKEN_DBG_STABILIZE);
            let obj = session.indexed(&a6xx::CP_MEMPOOL_INDEXED);
            session.dev.write(regs::CP_CHICKEN_DBG, val);
            session.keep(Category::Indexed, &mut state.indexed, obj);
            return;
        }

        // Hold the mempool still while it is dumped.
        let mempool_size = session.dev.read(regs::CP_MEM_POOL_SIZE);
        session.dev.write(regs::CP_MEM_POOL_SIZE, 0);

        let mut obj = session.indexed(&a6xx::CP_MEMPOOL_INDEXED);
        if let Some(word) = obj
            .data
            .as_mut()
            .and_then(|data| data.get_mut(a6xx::MEMPOOL_SIZE_WORD))
        {
            *word = mempool_size;
        }

        session.dev.write(regs::CP_MEM_POOL_SIZE, mempool_size);
        session.keep(Category::Indexed, &mut state.indexed, obj);
    }

    fn registers(&self, session: &mut Session<'_>, state: &mut GpuState) {
        keep_ahb(session, state, RegisterSource::List(&a6xx::AHB_REGLIST));

        if session.info.has(Features::GBIF) {
            keep_ahb(session, state, RegisterSource::List(&a6xx::GBIF_REGLIST));
        } else {
            keep_ahb(session, state, RegisterSource::List(&a6xx::VBIF_REGLIST));
        }

        if session.dumper.is_none() {
            // No GPU memory access; fall back to the CPU.
            for list in a6xx::REGLIST {
                if supported(&session.info, list.requires) {
                    keep_ahb(session, state, RegisterSource::List(list));
                }
            }
            return;
        }

        for list in a6xx::REGLIST {
            if supported(&session.info, list.requires) {
                dump_reglist(session, state, list);
            } else {
                debug!("skipping {} on {}", list.name, session.info.model);
            }
        }

        for list in a6xx::HLSQ_REGLIST {
            let data = session.dump(list.name, |script| {
                script.write(regs::HLSQ_DBG_READ_SEL, list.sel_val)?;
                queue_ranges(script, list.regs, |reg| {
                    regs::HLSQ_DBG_AHB_READ_APERTURE + reg - (list.base >> 2)
                })
            });
            session.keep(
                Category::Registers,
                &mut state.registers,
                CapturedObject::new(RegisterSource::Hlsq(list), data),
            );
        }
    }

    fn shaders(&self, session: &mut Session<'_>, state: &mut GpuState) {
        for block in a6xx::SHADER_BLOCKS {
            let data = session.dump(block.name, |script| {
                for bank in 0..NUM_SHADER_BANKS {
                    script.write(regs::HLSQ_DBG_READ_SEL, (block.ty << 8) | bank)?;
                    script.read(regs::HLSQ_DBG_AHB_READ_APERTURE, block.size)?;
                }
                Ok(())
            });
            session.keep(
                Category::Shaders,
                &mut state.shaders,
                CapturedObject::new(ShaderHandle::A6xx(block), data),
            );
        }
    }

    fn clusters(&self, session: &mut Session<'_>, state: &mut GpuState) {
        for cluster in a6xx::CLUSTERS {
            if !supported(&session.info, cluster.requires) {
                debug!("skipping cluster {} on {}", cluster.name, session.info.model);
                continue;
            }

            let id = if session.info.has(Features::A650_FAMILY) && a6xx::remaps_to_vpc_ps(cluster) {
                a6xx::CLUSTER_VPC_PS
            } else {
                cluster.id
            };

            let data = session.dump(cluster.name, |script| {
                if let Some((reg, val)) = cluster.sel {
                    script.write(reg, val)?;
                }
                for ctx in 0..NUM_CONTEXTS {
                    script.write(regs::CP_APERTURE_CNTL_CD, regs::a6xx_aperture_cntl_cd(id, ctx))?;
                    queue_ranges(script, cluster.regs, |reg| reg)?;
                }
                Ok(())
            });
            session.keep(
                Category::Clusters,
                &mut state.clusters,
                CapturedObject::new(ClusterHandle::A6xx(cluster), data),
            );
        }
    }

    fn dbgahb_clusters(&self, session: &mut Session<'_>, state: &mut GpuState) {
        for cluster in a6xx::DBGAHB_CLUSTERS {
            let data = session.dump(cluster.name, |script| {
                for ctx in 0..NUM_CONTEXTS {
                    script.write(regs::HLSQ_DBG_READ_SEL, (cluster.statetype + ctx * 2) << 8)?;
                    queue_ranges(script, cluster.regs, |reg| {
                        regs::HLSQ_DBG_AHB_READ_APERTURE + reg - (cluster.base >> 2)
                    })?;
                }
                Ok(())
            });
            session.keep(
                Category::DbgAhbClusters,
                &mut state.dbgahb_clusters,
                CapturedObject::new(DbgAhbHandle::A6xx(cluster), data),
            );
        }
    }

    fn debugbus_blocks(&self, info: &GpuInfo) -> Vec<&'static DebugbusBlock> {
        let mut blocks: Vec<&'static DebugbusBlock> = a6xx::DEBUGBUS_BLOCKS.iter().collect();

        // GBIF reuses the VBIF block id on the regular bus.
        if info.has(Features::GBIF) {
            blocks.push(&a6xx::GBIF_DEBUGBUS_BLOCK);
        }
        if info.has(Features::A650_FAMILY) {
            blocks.extend(a6xx::A650_DEBUGBUS_BLOCKS.iter());
        }
        blocks
    }

    fn cx_debugbus_blocks(&self) -> &'static [DebugbusBlock] {
        a6xx::CX_DEBUGBUS_BLOCKS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::GpuModel;

    #[test]
    fn test_debugbus_block_selection() {
        let a630 = A6xxCapture.debugbus_blocks(&GpuInfo::new(GpuModel::A630));
        assert_eq!(a630.len(), a6xx::DEBUGBUS_BLOCKS.len());

        let a640 = A6xxCapture.debugbus_blocks(&GpuInfo::new(GpuModel::A640));
        assert_eq!(a640.last().map(|b| b.name), Some("A6XX_DBGBUS_VBIF"));

        let a650 = A6xxCapture.debugbus_blocks(&GpuInfo::new(GpuModel::A650));
        assert_eq!(
            a650.len(),
            a6xx::DEBUGBUS_BLOCKS.len() + 1 + a6xx::A650_DEBUGBUS_BLOCKS.len()
        );
        // Every block appears once.
        let mut ids: Vec<_> = a650.iter().map(|b| b.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), a650.len());
    }
}
