// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use super::{pattern, Peripheral};
use crate::regs;

/// The VBIF test bus window, mapped at `VBIF_TEST_BUS_OUT_CTRL`.
#[derive(Debug, Default)]
pub struct VbifTestBus {
    out_ctrl: u32,
    bus1: [u32; 2],
    bus2: [u32; 2],
}

const BASE: u32 = regs::VBIF_TEST_BUS_OUT_CTRL;

impl VbifTestBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register span starting at `VBIF_TEST_BUS_OUT_CTRL`.
    pub const SPAN: u32 = regs::VBIF_TEST_BUS_OUT - BASE + 1;

    fn output(&self) -> u32 {
        if self.out_ctrl == 0 {
            return 0;
        }
        // BUS2 wins while it has a selection.
        if self.bus2[0] != 0 {
            pattern(0x2000_0000 | self.bus2[0], self.bus2[1])
        } else {
            pattern(0x1000_0000 | self.bus1[0], self.bus1[1])
        }
    }
}

impl Peripheral for VbifTestBus {
    fn read(&mut self, offset: u32) -> u32 {
        match offset + BASE {
            regs::VBIF_TEST_BUS_OUT_CTRL => self.out_ctrl,
            regs::VBIF_TEST_BUS1_CTRL0 => self.bus1[0],
            regs::VBIF_TEST_BUS1_CTRL1 => self.bus1[1],
            regs::VBIF_TEST_BUS2_CTRL0 => self.bus2[0],
            regs::VBIF_TEST_BUS2_CTRL1 => self.bus2[1],
            regs::VBIF_TEST_BUS_OUT => self.output(),
            _ => 0,
        }
    }

    fn write(&mut self, offset: u32, value: u32) {
        match offset + BASE {
            regs::VBIF_TEST_BUS_OUT_CTRL => self.out_ctrl = value,
            regs::VBIF_TEST_BUS1_CTRL0 => self.bus1[0] = value,
            regs::VBIF_TEST_BUS1_CTRL1 => self.bus1[1] = value,
            regs::VBIF_TEST_BUS2_CTRL0 => self.bus2[0] = value,
            regs::VBIF_TEST_BUS2_CTRL1 => self.bus2[1] = value,
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_needs_enable() {
        let mut vbif = VbifTestBus::new();
        let out = regs::VBIF_TEST_BUS_OUT - BASE;
        vbif.write(regs::VBIF_TEST_BUS2_CTRL0 - BASE, 1 << 16);
        assert_eq!(vbif.read(out), 0);

        vbif.write(regs::VBIF_TEST_BUS_OUT_CTRL - BASE, 1);
        let first = vbif.read(out);
        vbif.write(regs::VBIF_TEST_BUS2_CTRL1 - BASE, 1);
        assert_ne!(vbif.read(out), first);
        assert_eq!(VbifTestBus::SPAN, 9);
    }
}
