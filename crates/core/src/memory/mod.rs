// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::{Bus, CaptureError, CaptureResult};

/// A kernel buffer object shared between the host and the GPU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BufferObject {
    pub iova: u64,
    pub size: usize,
    pub name: String,
}

/// A simple flat memory storage
#[derive(Debug)]
pub struct LinearMemory {
    pub data: Vec<u8>,
    pub base_addr: u64,
}

impl LinearMemory {
    pub fn new(size: usize, base_addr: u64) -> Self {
        Self {
            data: vec![0; size],
            base_addr,
        }
    }

    pub fn contains(&self, addr: u64) -> bool {
        addr >= self.base_addr && addr < self.base_addr + self.data.len() as u64
    }

    pub fn read_u8(&self, addr: u64) -> Option<u8> {
        if self.contains(addr) {
            Some(self.data[(addr - self.base_addr) as usize])
        } else {
            None
        }
    }

    pub fn write_u8(&mut self, addr: u64, value: u8) -> bool {
        if self.contains(addr) {
            self.data[(addr - self.base_addr) as usize] = value;
            true
        } else {
            false
        }
    }

    /// Borrow `len` bytes starting at `addr`, if they lie entirely inside.
    pub fn slice(&self, addr: u64, len: usize) -> Option<&[u8]> {
        let end = addr.checked_add(len as u64)?;
        if addr >= self.base_addr && end <= self.base_addr + self.data.len() as u64 {
            let offset = (addr - self.base_addr) as usize;
            Some(&self.data[offset..offset + len])
        } else {
            None
        }
    }

    pub fn slice_mut(&mut self, addr: u64, len: usize) -> Option<&mut [u8]> {
        let end = addr.checked_add(len as u64)?;
        if addr >= self.base_addr && end <= self.base_addr + self.data.len() as u64 {
            let offset = (addr - self.base_addr) as usize;
            Some(&mut self.data[offset..offset + len])
        } else {
            None
        }
    }
}

/// First IOVA handed out to kernel buffers.
pub const IOVA_BASE: u64 = 0x1_0000_0000;
const IOVA_ALIGN: u64 = 0x1000;

/// GPU address space made of the kernel buffers currently mapped.
#[derive(Debug, Default)]
pub struct GpuMemory {
    regions: Vec<(BufferObject, LinearMemory)>,
}

impl GpuMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map a zeroed buffer at the lowest free IOVA.
    pub fn map(&mut self, size: usize, name: &str) -> CaptureResult<BufferObject> {
        let mut data = Vec::new();
        data.try_reserve_exact(size).map_err(|_| CaptureError::Allocation {
            what: "kernel buffer",
            size,
        })?;
        data.resize(size, 0);

        let span = (size as u64).div_ceil(IOVA_ALIGN).max(1) * IOVA_ALIGN;
        let mut iova = IOVA_BASE;
        let mut taken: Vec<_> = self
            .regions
            .iter()
            .map(|(bo, _)| (bo.iova, (bo.size as u64).div_ceil(IOVA_ALIGN).max(1) * IOVA_ALIGN))
            .collect();
        taken.sort_unstable();
        for (start, len) in taken {
            if iova + span <= start {
                break;
            }
            iova = iova.max(start + len);
        }

        let bo = BufferObject {
            iova,
            size,
            name: name.to_string(),
        };
        self.regions.push((
            bo.clone(),
            LinearMemory {
                data,
                base_addr: iova,
            },
        ));
        Ok(bo)
    }

    pub fn unmap(&mut self, bo: &BufferObject) -> bool {
        let before = self.regions.len();
        self.regions.retain(|(mapped, _)| mapped.iova != bo.iova);
        before != self.regions.len()
    }

    pub fn buffers(&self) -> impl Iterator<Item = &BufferObject> {
        self.regions.iter().map(|(bo, _)| bo)
    }

    fn region(&self, addr: u64) -> Option<&LinearMemory> {
        self.regions
            .iter()
            .map(|(_, mem)| mem)
            .find(|mem| mem.contains(addr))
    }

    fn region_mut(&mut self, addr: u64) -> Option<&mut LinearMemory> {
        self.regions
            .iter_mut()
            .map(|(_, mem)| mem)
            .find(|mem| mem.contains(addr))
    }
}

impl Bus for GpuMemory {
    fn read_u8(&self, addr: u64) -> CaptureResult<u8> {
        self.region(addr)
            .and_then(|mem| mem.read_u8(addr))
            .ok_or(CaptureError::MemoryFault(addr))
    }

    fn write_u8(&mut self, addr: u64, value: u8) -> CaptureResult<()> {
        match self.region_mut(addr) {
            Some(mem) => {
                if mem.write_u8(addr, value) {
                    Ok(())
                } else {
                    Err(CaptureError::MemoryFault(addr))
                }
            }
            None => Err(CaptureError::MemoryFault(addr)),
        }
    }

    fn read_bytes(&self, addr: u64, buf: &mut [u8]) -> CaptureResult<()> {
        let src = self
            .region(addr)
            .and_then(|mem| mem.slice(addr, buf.len()))
            .ok_or(CaptureError::MemoryFault(addr))?;
        buf.copy_from_slice(src);
        Ok(())
    }

    fn write_bytes(&mut self, addr: u64, data: &[u8]) -> CaptureResult<()> {
        let dst = self
            .region_mut(addr)
            .and_then(|mem| mem.slice_mut(addr, data.len()))
            .ok_or(CaptureError::MemoryFault(addr))?;
        dst.copy_from_slice(data);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_memory_bounds() {
        let mut mem = LinearMemory::new(16, 0x1000);
        assert!(mem.write_u8(0x100f, 0xaa));
        assert_eq!(mem.read_u8(0x100f), Some(0xaa));
        assert!(!mem.write_u8(0x1010, 0));
        assert!(mem.slice(0x1008, 8).is_some());
        assert!(mem.slice(0x1008, 9).is_none());
    }

    #[test]
    fn test_map_reuses_lowest_iova() {
        let mut mem = GpuMemory::new();
        let a = mem.map(0x1000, "a").unwrap();
        let b = mem.map(0x2000, "b").unwrap();
        assert_eq!(a.iova, IOVA_BASE);
        assert_eq!(b.iova, IOVA_BASE + 0x1000);

        assert!(mem.unmap(&a));
        let c = mem.map(0x800, "c").unwrap();
        assert_eq!(c.iova, IOVA_BASE);
        assert_eq!(mem.buffers().count(), 2);
    }

    #[test]
    fn test_bus_access() {
        let mut mem = GpuMemory::new();
        let bo = mem.map(64, "scratch").unwrap();
        mem.write_u64(bo.iova + 8, 0x1122_3344_5566_7788).unwrap();
        assert_eq!(mem.read_u32(bo.iova + 8).unwrap(), 0x5566_7788);
        assert_eq!(mem.read_u64(bo.iova + 8).unwrap(), 0x1122_3344_5566_7788);
        assert_eq!(
            mem.read_u32(bo.iova + 64),
            Err(CaptureError::MemoryFault(bo.iova + 64))
        );
        assert!(mem.write_bytes(bo.iova + 60, &[0; 8]).is_err());
    }
}
