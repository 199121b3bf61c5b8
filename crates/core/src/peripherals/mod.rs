// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Register blocks of the simulated GPU.

pub mod debugbus;
pub mod indexed;
pub mod register_file;
pub mod vbif;

pub use debugbus::DebugBus;
pub use indexed::IndexedBank;
pub use register_file::RegisterFile;
pub use vbif::VbifTestBus;

/// A block of registers mapped into the simulated register space.
///
/// Offsets are relative to the block base, in register units.
pub trait Peripheral: std::fmt::Debug + Send {
    fn read(&mut self, offset: u32) -> u32;
    fn write(&mut self, offset: u32, value: u32);
}

/// Deterministic, never-invalid filler derived from two keys.
pub fn pattern(key: u32, index: u32) -> u32 {
    let v = key.wrapping_mul(0x9e37_79b1).rotate_left(7) ^ index.wrapping_mul(0x85eb_ca6b);
    if v == crate::regs::INVALID_REG_VALUE || v == 0 {
        v ^ 0x0100_0001
    } else {
        v
    }
}
