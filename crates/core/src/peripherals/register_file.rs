// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use super::{pattern, Peripheral};
use crate::regs::INVALID_REG_VALUE;
use std::collections::HashMap;

/// Plain read/write registers.
///
/// Registers that were never written read back a fixed pattern of their
/// offset; registers inside an absent range always read the invalid fill
/// value and ignore writes.
#[derive(Debug, Default, Clone)]
pub struct RegisterFile {
    values: HashMap<u32, u32>,
    absent: Vec<(u32, u32)>,
    seed: u32,
}

impl RegisterFile {
    pub fn new(seed: u32) -> Self {
        Self {
            values: HashMap::new(),
            absent: Vec::new(),
            seed,
        }
    }

    /// Mark the inclusive range `start..=end` as not implemented.
    pub fn add_absent(&mut self, start: u32, end: u32) {
        self.absent.push((start, end));
    }

    pub fn is_absent(&self, offset: u32) -> bool {
        self.absent
            .iter()
            .any(|&(start, end)| (start..=end).contains(&offset))
    }

    pub fn get(&self, offset: u32) -> u32 {
        if self.is_absent(offset) {
            return INVALID_REG_VALUE;
        }
        match self.values.get(&offset) {
            Some(&value) => value,
            None => pattern(self.seed, offset),
        }
    }

    pub fn set(&mut self, offset: u32, value: u32) {
        if !self.is_absent(offset) {
            self.values.insert(offset, value);
        }
    }
}

impl Peripheral for RegisterFile {
    fn read(&mut self, offset: u32) -> u32 {
        self.get(offset)
    }

    fn write(&mut self, offset: u32, value: u32) {
        self.set(offset, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unwritten_registers_are_stable() {
        let mut regs = RegisterFile::new(1);
        let first = regs.read(0x10);
        assert_eq!(regs.read(0x10), first);
        assert_ne!(regs.read(0x11), first);
        assert_ne!(first, INVALID_REG_VALUE);

        regs.write(0x10, 0x1234);
        assert_eq!(regs.read(0x10), 0x1234);
    }

    #[test]
    fn test_absent_range() {
        let mut regs = RegisterFile::new(0);
        regs.add_absent(0x20, 0x2f);
        regs.write(0x25, 7);
        assert_eq!(regs.read(0x25), INVALID_REG_VALUE);
        assert_eq!(regs.read(0x2f), INVALID_REG_VALUE);
        assert_ne!(regs.read(0x30), INVALID_REG_VALUE);
    }
}
