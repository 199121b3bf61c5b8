// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use crate::peripherals::{Peripheral, RegisterFile};
use crate::RegisterIo;

#[derive(Debug)]
pub struct PeripheralEntry {
    pub name: String,
    pub base: u32,
    pub size: u32,
    pub dev: Box<dyn Peripheral>,
}

impl PeripheralEntry {
    fn contains(&self, offset: u32) -> bool {
        offset >= self.base && offset - self.base < self.size
    }
}

/// The simulated register space: mapped peripherals first, then a plain
/// register file for everything else.
#[derive(Debug)]
pub struct SystemBus {
    pub registers: RegisterFile,
    pub peripherals: Vec<PeripheralEntry>,
}

impl SystemBus {
    pub fn new(registers: RegisterFile) -> Self {
        Self {
            registers,
            peripherals: Vec::new(),
        }
    }

    /// Map `dev` at `base..base + size`. Earlier mappings win on overlap.
    pub fn attach(&mut self, name: &str, base: u32, size: u32, dev: Box<dyn Peripheral>) {
        self.peripherals.push(PeripheralEntry {
            name: name.to_string(),
            base,
            size,
            dev,
        });
    }

    pub fn find_peripheral(&self, name: &str) -> Option<&dyn Peripheral> {
        self.peripherals
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.dev.as_ref())
    }

    fn route(&mut self, offset: u32) -> Option<&mut PeripheralEntry> {
        self.peripherals.iter_mut().find(|p| p.contains(offset))
    }
}

impl RegisterIo for SystemBus {
    fn read(&mut self, offset: u32) -> u32 {
        match self.route(offset) {
            Some(p) => {
                let rel = offset - p.base;
                p.dev.read(rel)
            }
            None => self.registers.get(offset),
        }
    }

    fn write(&mut self, offset: u32, value: u32) {
        match self.route(offset) {
            Some(p) => {
                let rel = offset - p.base;
                p.dev.write(rel, value)
            }
            None => self.registers.set(offset, value),
        }
    }

    fn udelay(&mut self, _us: u32) {}
}

/// A peripheral mapped on its own, outside the GPU register space.
#[derive(Debug)]
pub struct MappedRegion<P: Peripheral> {
    dev: P,
}

impl<P: Peripheral> MappedRegion<P> {
    pub fn new(dev: P) -> Self {
        Self { dev }
    }
}

impl<P: Peripheral> RegisterIo for MappedRegion<P> {
    fn read(&mut self, offset: u32) -> u32 {
        self.dev.read(offset)
    }

    fn write(&mut self, offset: u32, value: u32) {
        self.dev.write(offset, value)
    }

    fn udelay(&mut self, _us: u32) {}
}
