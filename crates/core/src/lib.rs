// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

pub mod access;
pub mod ascii85;
pub mod bus;
pub mod collect;
pub mod crashdump;
pub mod hw;
pub mod memory;
pub mod metrics;
pub mod peripherals;
pub mod regs;
pub mod render;
pub mod sim;
pub mod snapshot;
pub mod tables;

mod tests;

use std::time::{Duration, Instant};

pub use collect::{collect, Collector};
pub use render::render;
pub use snapshot::{release, GpuState, SnapshotRef};

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum CaptureError {
    #[error("Failed to allocate {size} bytes for {what}")]
    Allocation { what: &'static str, size: usize },
    #[error("Timed out after {waited_us}us waiting on register {reg:#x}")]
    Timeout { reg: u32, waited_us: u32 },
    #[error("Power domain {0} is off")]
    PowerDomainOff(&'static str),
    #[error("Capture of {requested} bytes exceeds the {capacity} byte data region")]
    CapacityExceeded { requested: usize, capacity: usize },
    #[error("Crash dumper script is full ({ops} ops)")]
    ScriptFull { ops: usize },
    #[error("{0} is not supported on this GPU")]
    Unsupported(&'static str),
    #[error("Device memory access violation at {0:#x}")]
    MemoryFault(u64),
    #[error("Crash dumper cannot {op} while {state:?}")]
    InvalidState {
        op: &'static str,
        state: crashdump::DumperState,
    },
}

pub type CaptureResult<T> = Result<T, CaptureError>;

/// Trait for observing capture progress in a modular way.
pub trait CaptureObserver: std::fmt::Debug + Send + Sync {
    fn on_capture_start(&self) {}
    fn on_capture_stop(&self) {}
    fn on_object(&self, _category: snapshot::Category, _captured: bool, _words: usize) {}
    fn on_dumper_run(&self, _ok: bool) {}
}

/// MMIO register access in register-index units.
///
/// Reads take `&mut self`: some registers (indexed data ports, trace
/// buffers) have side effects on read.
pub trait RegisterIo {
    fn read(&mut self, offset: u32) -> u32;
    fn write(&mut self, offset: u32, value: u32);

    fn write64(&mut self, offset: u32, value: u64) {
        self.write(offset, value as u32);
        self.write(offset + 1, (value >> 32) as u32);
    }

    fn rmw(&mut self, offset: u32, mask: u32, or: u32) {
        let val = self.read(offset);
        self.write(offset, (val & !mask) | or);
    }

    /// Busy-wait for `us` microseconds.
    fn udelay(&mut self, us: u32) {
        let end = Instant::now() + Duration::from_micros(us as u64);
        while Instant::now() < end {
            std::hint::spin_loop();
        }
    }
}

/// Device-visible memory, addressed by IOVA.
pub trait Bus {
    fn read_u8(&self, addr: u64) -> CaptureResult<u8>;
    fn write_u8(&mut self, addr: u64, value: u8) -> CaptureResult<()>;

    fn read_u32(&self, addr: u64) -> CaptureResult<u32> {
        let b0 = self.read_u8(addr)? as u32;
        let b1 = self.read_u8(addr + 1)? as u32;
        let b2 = self.read_u8(addr + 2)? as u32;
        let b3 = self.read_u8(addr + 3)? as u32;
        // Little Endian
        Ok(b0 | (b1 << 8) | (b2 << 16) | (b3 << 24))
    }

    fn write_u32(&mut self, addr: u64, value: u32) -> CaptureResult<()> {
        self.write_bytes(addr, &value.to_le_bytes())
    }

    fn read_u64(&self, addr: u64) -> CaptureResult<u64> {
        let lo = self.read_u32(addr)? as u64;
        let hi = self.read_u32(addr + 4)? as u64;
        Ok(lo | (hi << 32))
    }

    fn write_u64(&mut self, addr: u64, value: u64) -> CaptureResult<()> {
        self.write_bytes(addr, &value.to_le_bytes())
    }

    fn read_bytes(&self, addr: u64, buf: &mut [u8]) -> CaptureResult<()> {
        for (i, b) in buf.iter_mut().enumerate() {
            *b = self.read_u8(addr + i as u64)?;
        }
        Ok(())
    }

    fn write_bytes(&mut self, addr: u64, data: &[u8]) -> CaptureResult<()> {
        for (i, b) in data.iter().enumerate() {
            self.write_u8(addr + i as u64, *b)?;
        }
        Ok(())
    }
}

pub const HFI_HISTORY_SZ: usize = 8;
pub const HFI_QUEUES: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GmuBufferKind {
    Log,
    Hfi,
    Debug,
}

/// A firmware buffer shared between the host and the GMU.
#[derive(Debug, Clone, Copy)]
pub struct GmuBuffer<'a> {
    pub iova: u64,
    pub data: &'a [u8],
}

/// Ring of recently processed HFI message ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HfiQueue {
    pub history: [i32; HFI_HISTORY_SZ],
    /// Next slot to be overwritten, i.e. the oldest entry.
    pub history_idx: usize,
}

/// The GMU co-processor as seen by the host.
pub trait Gmu {
    fn read(&mut self, offset: u32) -> u32;
    fn read_rscc(&mut self, offset: u32) -> u32;
    fn gx_is_on(&self) -> bool;
    fn sptprac_is_on(&self) -> bool;
    fn buffer(&self, kind: GmuBufferKind) -> Option<GmuBuffer<'_>>;
    fn hfi_queue(&self, index: usize) -> Option<&HfiQueue>;
}

/// The host device a capture runs against.
///
/// Capture expects exclusive ownership: nothing else may drive the GPU
/// while a collector holds it.
pub trait GpuDevice: RegisterIo {
    fn info(&self) -> &hw::GpuInfo;
    /// `None` on parts that only carry a GMU wrapper.
    fn gmu(&mut self) -> Option<&mut dyn Gmu>;
    fn needs_hw_init(&self) -> bool;
    /// Allocate a write-combined buffer mapped for both host and GPU.
    fn alloc_kernel_bo(&mut self, size: usize, name: &str) -> CaptureResult<memory::BufferObject>;
    fn free_kernel_bo(&mut self, bo: memory::BufferObject);
    fn memory(&mut self) -> &mut dyn Bus;
    /// Temporarily map a named register region that lives outside the GPU block.
    fn ioremap(&mut self, name: &str) -> Option<Box<dyn RegisterIo>>;
}
