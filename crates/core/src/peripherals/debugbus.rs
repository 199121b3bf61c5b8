// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use super::{pattern, Peripheral};
use std::collections::HashMap;

const SEL_A: u32 = 0x00;
const TRACE_BUF1: u32 = 0x2f;
const TRACE_BUF2: u32 = 0x30;

/// A debug bus controller. The four select registers pick a block and an
/// index; the trace buffers then return that sample's two halves.
#[derive(Debug)]
pub struct DebugBus {
    seed: u32,
    regs: HashMap<u32, u32>,
}

impl DebugBus {
    pub fn new(seed: u32) -> Self {
        Self {
            seed,
            regs: HashMap::new(),
        }
    }

    fn selected(&self) -> u32 {
        self.regs.get(&SEL_A).copied().unwrap_or(0) & 0xffff
    }

    /// Whether the trace controls have been programmed.
    pub fn is_enabled(&self) -> bool {
        self.regs.get(&0x05).is_some_and(|&cntlm| cntlm != 0)
    }
}

impl Peripheral for DebugBus {
    fn read(&mut self, offset: u32) -> u32 {
        match offset {
            TRACE_BUF1 => pattern(self.seed ^ self.selected(), 1),
            TRACE_BUF2 => pattern(self.seed ^ self.selected(), 2),
            _ => self.regs.get(&offset).copied().unwrap_or(0),
        }
    }

    fn write(&mut self, offset: u32, value: u32) {
        self.regs.insert(offset, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_samples_follow_selection() {
        let mut bus = DebugBus::new(0x600);
        bus.write(SEL_A, 0x0105);
        let a = [bus.read(TRACE_BUF2), bus.read(TRACE_BUF1)];
        bus.write(SEL_A, 0x0106);
        let b = [bus.read(TRACE_BUF2), bus.read(TRACE_BUF1)];
        assert_ne!(a, b);

        bus.write(SEL_A, 0x0105);
        assert_eq!(bus.read(TRACE_BUF2), a[0]);
        assert!(!bus.is_enabled());
    }
}
