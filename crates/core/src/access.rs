// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Host-side register access: range walks, indexed banks, debug buses.

use crate::regs::{self, DebugBusLayout};
use crate::tables::ranges;
use crate::{CaptureError, CaptureResult, RegisterIo};
use tracing::warn;

/// Allocate a zeroed word buffer, reporting failure instead of aborting.
pub fn alloc_words(what: &'static str, count: usize) -> CaptureResult<Vec<u32>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(count)
        .map_err(|_| CaptureError::Allocation {
            what,
            size: count * 4,
        })?;
    buf.resize(count, 0);
    Ok(buf)
}

/// Read every register of a range list over MMIO, in table order.
pub fn read_ranges<R: RegisterIo + ?Sized>(io: &mut R, regs: &[u32]) -> Vec<u32> {
    let mut data = Vec::with_capacity(crate::tables::range_count(regs));
    for (start, end) in ranges(regs) {
        for offset in start..=end {
            data.push(io.read(offset));
        }
    }
    data
}

/// Read `count` words from an indexed bank. The bank cursor is reset to 0
/// and advances by one on every data read.
pub fn read_indexed_block<R: RegisterIo + ?Sized>(
    io: &mut R,
    addr: u32,
    data: u32,
    count: u32,
) -> Option<Vec<u32>> {
    let mut buf = match alloc_words("indexed registers", count as usize) {
        Ok(buf) => buf,
        Err(e) => {
            warn!("{}", e);
            return None;
        }
    };

    io.write(addr, 0);
    for word in buf.iter_mut() {
        *word = io.read(data);
    }
    Some(buf)
}

/// Program the trace, segment, byte-lane and mask registers of a debug bus.
pub fn setup_debugbus<R: RegisterIo + ?Sized>(io: &mut R, layout: DebugBusLayout) {
    io.write(layout.cntlt(), regs::dbgbus_cntlt_segt(0xf));
    io.write(layout.cntlm(), regs::dbgbus_cntlm_enable(0xf));

    for n in 0..4 {
        io.write(layout.ivtl(n), 0);
    }

    io.write(layout.bytel(0), 0x7654_3210);
    io.write(layout.bytel(1), 0xfedc_ba98);

    for n in 0..4 {
        io.write(layout.maskl(n), 0);
    }
}

/// Sample one 64-bit debug bus word.
pub fn debugbus_read<R: RegisterIo + ?Sized>(
    io: &mut R,
    layout: DebugBusLayout,
    block: u32,
    offset: u32,
) -> [u32; 2] {
    let reg = regs::dbgbus_sel_ping_index(offset) | regs::dbgbus_sel_ping_blk_sel(block);

    for n in 0..4 {
        io.write(layout.sel(n), reg);
    }

    // Let the selected signals reach the trace buffers.
    io.udelay(1);

    [io.read(layout.trace_buf2()), io.read(layout.trace_buf1())]
}

/// Sample `count` words from a debug bus block.
pub fn read_debugbus_block<R: RegisterIo + ?Sized>(
    io: &mut R,
    layout: DebugBusLayout,
    block: u32,
    count: u32,
) -> Option<Vec<u32>> {
    let mut buf = match alloc_words("debugbus block", count as usize * 2) {
        Ok(buf) => buf,
        Err(e) => {
            warn!("{}", e);
            return None;
        }
    };
    for (offset, sample) in buf.chunks_exact_mut(2).enumerate() {
        sample.copy_from_slice(&debugbus_read(io, layout, block, offset as u32));
    }
    Some(buf)
}

pub const VBIF_AXI_ARB_BLOCKS: u32 = 2;
pub const VBIF_XIN_AXI_BLOCKS: u32 = 5;
pub const VBIF_XIN_CORE_BLOCKS: u32 = 4;

/// Words in one VBIF test bus dump.
pub const VBIF_DEBUGBUS_BLOCK_SIZE: usize =
    (16 * VBIF_AXI_ARB_BLOCKS + 18 * VBIF_XIN_AXI_BLOCKS + 12 * VBIF_XIN_CORE_BLOCKS) as usize;

fn vbif_bus_read<R: RegisterIo + ?Sized>(
    io: &mut R,
    ctrl0: u32,
    ctrl1: u32,
    sel: u32,
    count: u32,
    out: &mut Vec<u32>,
) {
    io.write(ctrl0, sel);
    for i in 0..count {
        io.write(ctrl1, i);
        out.push(io.read(regs::VBIF_TEST_BUS_OUT));
    }
}

/// Dump the VBIF test bus. Only one of the two test buses can drive the
/// output at a time, so BUS2 is drained before BUS1 is enabled.
pub fn read_vbif_debugbus<R: RegisterIo + ?Sized>(io: &mut R) -> Option<Vec<u32>> {
    let mut out = match alloc_words("vbif debugbus", VBIF_DEBUGBUS_BLOCK_SIZE) {
        Ok(mut buf) => {
            buf.clear();
            buf
        }
        Err(e) => {
            warn!("{}", e);
            return None;
        }
    };

    let clk = io.read(regs::VBIF_CLKON);
    io.write(regs::VBIF_CLKON, clk | regs::VBIF_CLKON_FORCE_ON_TESTBUS);

    io.write(regs::VBIF_TEST_BUS1_CTRL0, 0);
    io.write(regs::VBIF_TEST_BUS_OUT_CTRL, 1);

    for i in 0..VBIF_AXI_ARB_BLOCKS {
        vbif_bus_read(
            io,
            regs::VBIF_TEST_BUS2_CTRL0,
            regs::VBIF_TEST_BUS2_CTRL1,
            1 << (i + 16),
            16,
            &mut out,
        );
    }

    for i in 0..VBIF_XIN_AXI_BLOCKS {
        vbif_bus_read(
            io,
            regs::VBIF_TEST_BUS2_CTRL0,
            regs::VBIF_TEST_BUS2_CTRL1,
            1 << i,
            18,
            &mut out,
        );
    }

    io.write(regs::VBIF_TEST_BUS2_CTRL0, 0);

    for i in 0..VBIF_XIN_CORE_BLOCKS {
        vbif_bus_read(
            io,
            regs::VBIF_TEST_BUS1_CTRL0,
            regs::VBIF_TEST_BUS1_CTRL1,
            1 << i,
            12,
            &mut out,
        );
    }

    io.write(regs::VBIF_CLKON, clk);
    Some(out)
}

/// Poll `reg` until any bit of `mask` is set, sleeping `interval_us`
/// between reads. The register is always sampled once more after the
/// deadline so a late completion is not reported as a timeout.
pub fn poll_timeout<R: RegisterIo + ?Sized>(
    io: &mut R,
    reg: u32,
    mask: u32,
    interval_us: u32,
    timeout_us: u32,
) -> CaptureResult<u32> {
    let mut waited = 0;
    loop {
        let val = io.read(reg);
        if val & mask != 0 {
            return Ok(val);
        }
        if waited >= timeout_us {
            return Err(CaptureError::Timeout {
                reg,
                waited_us: waited,
            });
        }
        io.udelay(interval_us);
        waited += interval_us;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::RANGE_END;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Recorder {
        values: HashMap<u32, u32>,
        writes: Vec<(u32, u32)>,
        reads: Vec<u32>,
        delays: u32,
        cursor: u32,
    }

    impl RegisterIo for Recorder {
        fn read(&mut self, offset: u32) -> u32 {
            self.reads.push(offset);
            if offset == 0x11 {
                self.cursor += 1;
                return self.cursor;
            }
            self.values.get(&offset).copied().unwrap_or(0)
        }

        fn write(&mut self, offset: u32, value: u32) {
            self.writes.push((offset, value));
            if offset == 0x10 {
                self.cursor = value;
            }
            self.values.insert(offset, value);
        }

        fn udelay(&mut self, us: u32) {
            self.delays += us;
        }
    }

    #[test]
    fn test_read_ranges_in_table_order() {
        let mut io = Recorder::default();
        io.values.insert(0x12, 3);
        io.values.insert(0x20, 4);
        let regs = [0x20, 0x20, 0x12, 0x12, RANGE_END];
        assert_eq!(read_ranges(&mut io, &regs), vec![4, 3]);
        assert_eq!(io.reads, vec![0x20, 0x12]);
    }

    #[test]
    fn test_indexed_block_resets_cursor() {
        let mut io = Recorder::default();
        io.cursor = 77;
        let data = read_indexed_block(&mut io, 0x10, 0x11, 3).unwrap();
        assert_eq!(data, vec![1, 2, 3]);
        assert_eq!(io.writes, vec![(0x10, 0)]);

        let empty = read_indexed_block(&mut io, 0x10, 0x11, 0).unwrap();
        assert!(empty.is_empty());
    }

    #[test]
    fn test_debugbus_read_sequence() {
        let mut io = Recorder::default();
        io.values.insert(regs::GX_DBGC.trace_buf1(), 0x1111);
        io.values.insert(regs::GX_DBGC.trace_buf2(), 0x2222);

        let sample = debugbus_read(&mut io, regs::GX_DBGC, 0x1d, 5);
        assert_eq!(sample, [0x2222, 0x1111]);
        assert_eq!(io.delays, 1);
        let sel: Vec<_> = io.writes.iter().map(|&(_, v)| v).collect();
        assert_eq!(sel, vec![0x1d05; 4]);
        assert_eq!(
            io.reads,
            vec![regs::GX_DBGC.trace_buf2(), regs::GX_DBGC.trace_buf1()]
        );
    }

    #[test]
    fn test_setup_debugbus() {
        let mut io = Recorder::default();
        setup_debugbus(&mut io, regs::CX_DBGC);
        assert_eq!(io.writes.len(), 12);
        assert_eq!(io.values[&regs::CX_DBGC.cntlt()], 0xf000_0000);
        assert_eq!(io.values[&regs::CX_DBGC.cntlm()], 0x0f00_0000);
        assert_eq!(io.values[&regs::CX_DBGC.bytel(1)], 0xfedc_ba98);
    }

    #[test]
    fn test_vbif_debugbus_restores_clock() {
        let mut io = Recorder::default();
        io.values.insert(regs::VBIF_CLKON, 0x4);
        let data = read_vbif_debugbus(&mut io).unwrap();
        assert_eq!(data.len(), VBIF_DEBUGBUS_BLOCK_SIZE);
        assert_eq!(VBIF_DEBUGBUS_BLOCK_SIZE, 170);
        assert_eq!(io.writes.first(), Some(&(regs::VBIF_CLKON, 0x6)));
        assert_eq!(io.writes.last(), Some(&(regs::VBIF_CLKON, 0x4)));
        assert!(io.writes.contains(&(regs::VBIF_TEST_BUS2_CTRL0, 1 << 17)));
        assert!(io.writes.contains(&(regs::VBIF_TEST_BUS1_CTRL0, 1 << 3)));
    }

    #[test]
    fn test_poll_timeout() {
        let mut io = Recorder::default();
        let err = poll_timeout(&mut io, 0x845, 0x2, 100, 10_000).unwrap_err();
        assert_eq!(
            err,
            CaptureError::Timeout {
                reg: 0x845,
                waited_us: 10_000
            }
        );
        assert_eq!(io.reads.len(), 101);

        io.values.insert(0x845, 0x2);
        assert_eq!(poll_timeout(&mut io, 0x845, 0x2, 100, 10_000), Ok(0x2));
    }
}
