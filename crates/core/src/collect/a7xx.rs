// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use super::{keep_ahb, queue_ranges, FamilyCapture, Session};
use crate::hw::GpuInfo;
use crate::regs;
use crate::snapshot::{CapturedObject, Category, ClusterHandle, DbgAhbHandle, GpuState, RegisterSource, ShaderHandle};
use crate::tables::{self, gen7_0_0, DebugbusBlock, Gen7Tables};
use tracing::warn;

/// Capture steps for one gen7 table set.
#[derive(Debug)]
pub struct A7xxCapture {
    pub tables: &'static Gen7Tables,
    /// Force the SP debug clocks on around shader reads.
    pub toggle_sp_dbg: bool,
}

impl FamilyCapture for A7xxCapture {
    fn name(&self) -> &'static str {
        "gen7"
    }

    fn indexed(&self, session: &mut Session<'_>, state: &mut GpuState) {
        for bank in self.tables.indexed {
            let obj = session.indexed(bank);
            session.keep(Category::Indexed, &mut state.indexed, obj);
        }

        let stabilize = regs::CP_CHICKEN_DBG_STABILIZE;
        session.dev.rmw(regs::CP_CHICKEN_DBG, stabilize, stabilize);
        session.dev.rmw(regs::CP_BV_CHICKEN_DBG, stabilize, stabilize);

        for bank in gen7_0_0::CP_BV_MEMPOOL_INDEXED {
            let obj = session.indexed(bank);
            session.keep(Category::Indexed, &mut state.indexed, obj);
        }

        session.dev.rmw(regs::CP_CHICKEN_DBG, stabilize, 0);
        session.dev.rmw(regs::CP_BV_CHICKEN_DBG, stabilize, 0);
    }

    fn registers(&self, session: &mut Session<'_>, state: &mut GpuState) {
        keep_ahb(session, state, RegisterSource::Ranges(self.tables.pre_crashdumper));

        if session.dumper.is_none() {
            // Only the main list is safe to read from the host.
            let Some(list) = self.tables.reglist.first() else {
                return;
            };
            if let Some(sel) = list.sel {
                session.dev.write(sel.host_reg, sel.val);
            }
            keep_ahb(session, state, RegisterSource::Ranges(list.regs));
            return;
        }

        for list in self.tables.reglist {
            let data = session.dump("gen7 registers", |script| {
                if let Some(sel) = list.sel {
                    script.write(sel.cd_reg, sel.val)?;
                }
                queue_ranges(script, list.regs, |reg| reg)
            });
            session.keep(
                Category::Registers,
                &mut state.registers,
                CapturedObject::new(RegisterSource::Ranges(list.regs), data),
            );
        }
    }

    fn post_dumper_registers(&self, session: &mut Session<'_>, state: &mut GpuState) {
        keep_ahb(session, state, RegisterSource::Ranges(self.tables.post_crashdumper));
    }

    fn shaders(&self, session: &mut Session<'_>, state: &mut GpuState) {
        let mask = regs::genmask(1, 0);
        if self.toggle_sp_dbg {
            session.dev.rmw(regs::SP_DBG_CNTL, mask, 3);
        }

        for block in self.tables.shader_blocks {
            let data = session.dump(tables::statetype_name(block.statetype), |script| {
                for sp in 0..block.num_sps {
                    for usptp in 0..block.num_usptps {
                        script.write(
                            regs::SP_READ_SEL,
                            regs::a7xx_sp_read_sel(block.location, block.pipe, block.statetype, usptp, sp),
                        )?;
                        script.read(regs::SP_AHB_READ_APERTURE, block.size)?;
                    }
                }
                Ok(())
            });
            session.keep(
                Category::Shaders,
                &mut state.shaders,
                CapturedObject::new(ShaderHandle::Gen7(block), data),
            );
        }

        if self.toggle_sp_dbg {
            session.dev.rmw(regs::SP_DBG_CNTL, mask, 0);
        }
    }

    fn clusters(&self, session: &mut Session<'_>, state: &mut GpuState) {
        for cluster in self.tables.clusters {
            let data = session.dump(tables::cluster_name(cluster.cluster), |script| {
                if let Some(sel) = cluster.sel {
                    script.write(sel.cd_reg, sel.val)?;
                }
                script.write(
                    regs::CP_APERTURE_CNTL_CD,
                    regs::a7xx_aperture_cntl_cd(cluster.pipe, cluster.cluster, cluster.context),
                )?;
                queue_ranges(script, cluster.regs, |reg| reg)
            });
            session.keep(
                Category::Clusters,
                &mut state.clusters,
                CapturedObject::new(ClusterHandle::Gen7(cluster), data),
            );
        }
    }

    fn dbgahb_clusters(&self, session: &mut Session<'_>, state: &mut GpuState) {
        for cluster in self.tables.sptp_clusters {
            let data = session.dump(tables::statetype_name(cluster.statetype), |script| {
                script.write(
                    regs::SP_READ_SEL,
                    regs::a7xx_sp_read_sel(cluster.location, cluster.pipe, cluster.statetype, 0, 0),
                )?;
                queue_ranges(script, cluster.regs, |reg| {
                    regs::SP_AHB_READ_APERTURE + reg - cluster.regbase
                })
            });
            session.keep(
                Category::DbgAhbClusters,
                &mut state.dbgahb_clusters,
                CapturedObject::new(DbgAhbHandle::Gen7(cluster), data),
            );
        }
    }

    fn debugbus_blocks(&self, _info: &GpuInfo) -> Vec<&'static DebugbusBlock> {
        self.tables
            .debugbus
            .iter()
            .chain(self.tables.gbif_debugbus)
            .filter_map(|&id| {
                let block = tables::gen7_debugbus_block(id);
                if block.is_none() {
                    warn!("unknown debug bus block {}", id);
                }
                block
            })
            .collect()
    }

    fn cx_debugbus_blocks(&self) -> &'static [DebugbusBlock] {
        gen7_0_0::CX_DEBUGBUS_BLOCKS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hw::GpuModel;
    use crate::tables::{gen7_2_0, gen7_9_0};

    #[test]
    fn test_debugbus_resolves_every_id() {
        for tables in [&gen7_0_0::TABLES, &gen7_2_0::TABLES, &gen7_9_0::TABLES] {
            let capture = A7xxCapture {
                tables,
                toggle_sp_dbg: false,
            };
            let blocks = capture.debugbus_blocks(&GpuInfo::new(GpuModel::A740));
            assert_eq!(blocks.len(), tables.debugbus.len() + tables.gbif_debugbus.len());
        }
    }

    #[test]
    fn test_gbif_blocks_come_last() {
        let capture = A7xxCapture {
            tables: &gen7_0_0::TABLES,
            toggle_sp_dbg: true,
        };
        let blocks = capture.debugbus_blocks(&GpuInfo::new(GpuModel::A730));
        let tail: Vec<_> = blocks.iter().rev().take(2).map(|b| b.id).collect();
        assert_eq!(tail, vec![5, 6]);
    }
}
