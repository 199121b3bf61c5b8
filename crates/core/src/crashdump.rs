// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! The crash dumper: a tiny program the GPU executes to copy registers
//! that are only reachable through an aperture into shared memory.
//!
//! One 1 MiB scratch buffer holds the script in its first 8 KiB and the
//! read-back data in the rest. Each op is two little-endian u64 words:
//!
//! | op     | word 0       | word 1                          |
//! |--------|--------------|---------------------------------|
//! | write  | value        | `reg << 44 \| 1 << 21 \| 1`     |
//! | read   | dest iova    | `reg << 44 \| count`            |
//! | finish | 0            | 0                               |

use crate::access::{alloc_words, poll_timeout};
use crate::hw::Features;
use crate::memory::BufferObject;
use crate::regs;
use crate::{CaptureError, CaptureResult, GpuDevice};
use std::sync::atomic::{fence, Ordering};
use tracing::debug;

pub const CD_BUFFER_SIZE: usize = 1 << 20;
pub const CD_SCRIPT_SIZE: usize = 8192;
pub const CD_DATA_OFFSET: u64 = CD_SCRIPT_SIZE as u64;
/// Bytes available for read-back data in one run.
pub const CD_DATA_SIZE: usize = CD_BUFFER_SIZE - CD_SCRIPT_SIZE;
/// Script capacity, finish sentinel included.
pub const CD_MAX_OPS: usize = CD_SCRIPT_SIZE / 16;

pub const CD_POLL_INTERVAL_US: u32 = 100;
pub const CD_TIMEOUT_US: u32 = 10_000;

const OP_WRITE_FLAG: u64 = 1 << 21;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumperState {
    Uninitialized,
    Initialized,
    Programmed,
    Running,
    Complete,
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Write { reg: u32, val: u32 },
    Read { reg: u32, count: u32, dest: u64 },
    Finish,
}

impl Op {
    pub fn encode(self) -> [u64; 2] {
        match self {
            Op::Write { reg, val } => [val as u64, ((reg as u64) << 44) | OP_WRITE_FLAG | 1],
            Op::Read { reg, count, dest } => [dest, ((reg as u64) << 44) | count as u64],
            Op::Finish => [0, 0],
        }
    }

    pub fn decode(words: [u64; 2]) -> Self {
        let reg = (words[1] >> 44) as u32;
        if words == [0, 0] {
            Op::Finish
        } else if words[1] & OP_WRITE_FLAG != 0 {
            Op::Write {
                reg,
                val: words[0] as u32,
            }
        } else {
            Op::Read {
                reg,
                count: (words[1] & (OP_WRITE_FLAG - 1)) as u32,
                dest: words[0],
            }
        }
    }
}

/// Bounded script writer. Reads are assigned consecutive slots in the
/// data region; anything that would overflow the script or the data
/// region is rejected before it is appended.
#[derive(Debug, Clone)]
pub struct Script {
    data_base: u64,
    ops: Vec<Op>,
    data_words: usize,
    finished: bool,
}

impl Script {
    /// Start an empty script whose reads land at `data_base`.
    pub fn new(data_base: u64) -> Self {
        Self {
            data_base,
            ops: Vec::new(),
            data_words: 0,
            finished: false,
        }
    }

    fn push(&mut self, op: Op) -> CaptureResult<()> {
        if self.finished {
            return Err(CaptureError::InvalidState {
                op: "append to a finished script",
                state: DumperState::Programmed,
            });
        }
        // The last slot is reserved for the finish sentinel.
        let limit = if op == Op::Finish {
            CD_MAX_OPS
        } else {
            CD_MAX_OPS - 1
        };
        if self.ops.len() >= limit {
            return Err(CaptureError::ScriptFull { ops: CD_MAX_OPS });
        }
        self.ops.push(op);
        Ok(())
    }

    pub fn write(&mut self, reg: u32, val: u32) -> CaptureResult<()> {
        self.push(Op::Write { reg, val })
    }

    /// Queue a read of `count` registers starting at `reg`; returns the
    /// device address the words will be written to.
    pub fn read(&mut self, reg: u32, count: u32) -> CaptureResult<u64> {
        let requested = (self.data_words + count as usize) * 4;
        if requested > CD_DATA_SIZE {
            return Err(CaptureError::CapacityExceeded {
                requested,
                capacity: CD_DATA_SIZE,
            });
        }
        let dest = self.data_base + (self.data_words as u64) * 4;
        self.push(Op::Read { reg, count, dest })?;
        self.data_words += count as usize;
        Ok(dest)
    }

    pub fn finish(&mut self) -> CaptureResult<()> {
        self.push(Op::Finish)?;
        self.finished = true;
        Ok(())
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Words the script will deposit in the data region.
    pub fn data_words(&self) -> usize {
        self.data_words
    }

    /// The encoded script, two u64 words per op.
    pub fn encode(&self) -> Vec<u64> {
        self.ops.iter().flat_map(|op| op.encode()).collect()
    }

    fn to_bytes(&self) -> Vec<u8> {
        self.encode()
            .into_iter()
            .flat_map(|word| word.to_le_bytes())
            .collect()
    }
}

fn sptprac_is_on(dev: &mut dyn GpuDevice) -> bool {
    if dev.info().has(Features::GMU_WRAPPER) {
        return true;
    }
    dev.gmu().map_or(true, |gmu| gmu.sptprac_is_on())
}

#[derive(Debug)]
pub struct CrashDumper {
    bo: BufferObject,
    state: DumperState,
}

impl CrashDumper {
    /// Allocate and name the scratch buffer.
    pub fn init(dev: &mut dyn GpuDevice) -> CaptureResult<Self> {
        if !sptprac_is_on(dev) {
            return Err(CaptureError::PowerDomainOff("SPTPRAC"));
        }
        let bo = dev.alloc_kernel_bo(CD_BUFFER_SIZE, "crashdump")?;
        debug!("crash dumper buffer at {:#x}", bo.iova);
        Ok(Self {
            bo,
            state: DumperState::Initialized,
        })
    }

    pub fn state(&self) -> DumperState {
        self.state
    }

    pub fn iova(&self) -> u64 {
        self.bo.iova
    }

    /// A new empty script targeting this dumper's data region.
    pub fn script(&self) -> Script {
        Script::new(self.bo.iova + CD_DATA_OFFSET)
    }

    /// Upload `script` and have the GPU execute it.
    pub fn run(&mut self, dev: &mut dyn GpuDevice, script: &Script) -> CaptureResult<()> {
        if !script.is_finished() {
            return Err(CaptureError::InvalidState {
                op: "run an unfinished script",
                state: self.state,
            });
        }
        if !sptprac_is_on(dev) {
            return Err(CaptureError::PowerDomainOff("SPTPRAC"));
        }

        dev.memory().write_bytes(self.bo.iova, &script.to_bytes())?;
        self.state = DumperState::Programmed;

        // The script must be visible to the GPU before it is started.
        fence(Ordering::SeqCst);

        dev.write64(regs::CP_CRASH_SCRIPT_BASE, self.bo.iova);
        dev.write(regs::CP_CRASH_DUMP_CNTL, regs::CP_CRASH_DUMP_CNTL_START);
        self.state = DumperState::Running;

        let ret = poll_timeout(
            &mut *dev,
            regs::CP_CRASH_DUMP_STATUS,
            regs::CP_CRASH_DUMP_STATUS_DONE,
            CD_POLL_INTERVAL_US,
            CD_TIMEOUT_US,
        );

        dev.write(regs::CP_CRASH_DUMP_CNTL, 0);

        match ret {
            Ok(_) => {
                self.state = DumperState::Complete;
                Ok(())
            }
            Err(e) => {
                self.state = DumperState::TimedOut;
                Err(e)
            }
        }
    }

    /// Copy the first `words` words of the data region out of the buffer.
    pub fn data(&self, dev: &mut dyn GpuDevice, words: usize) -> CaptureResult<Vec<u32>> {
        if self.state != DumperState::Complete {
            return Err(CaptureError::InvalidState {
                op: "read back data",
                state: self.state,
            });
        }
        if words * 4 > CD_DATA_SIZE {
            return Err(CaptureError::CapacityExceeded {
                requested: words * 4,
                capacity: CD_DATA_SIZE,
            });
        }

        let mut bytes = vec![0u8; words * 4];
        dev.memory()
            .read_bytes(self.bo.iova + CD_DATA_OFFSET, &mut bytes)?;

        let mut out = alloc_words("crash dumper data", words)?;
        for (word, chunk) in out.iter_mut().zip(bytes.chunks_exact(4)) {
            *word = u32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
        }
        Ok(out)
    }

    pub fn release(self, dev: &mut dyn GpuDevice) {
        dev.free_kernel_bo(self.bo);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_op_encoding() {
        assert_eq!(
            Op::Write { reg: 0xa03, val: 0x511 }.encode(),
            [0x511, (0xa03u64 << 44) | (1 << 21) | 1]
        );
        assert_eq!(
            Op::Read {
                reg: 0x8e3b,
                count: 4,
                dest: 0x1_0000_2000
            }
            .encode(),
            [0x1_0000_2000, (0x8e3bu64 << 44) | 4]
        );
        assert_eq!(Op::Finish.encode(), [0, 0]);

        for op in [
            Op::Write { reg: 0xd000, val: 7 },
            Op::Read { reg: 0xc800, count: 0x800, dest: 0x4000 },
            Op::Finish,
        ] {
            assert_eq!(Op::decode(op.encode()), op);
        }
    }

    #[test]
    fn test_script_words_are_two_per_op() {
        let mut script = Script::new(0x2000);
        script.write(0x10, 1).unwrap();
        assert_eq!(script.read(0x20, 3).unwrap(), 0x2000);
        assert_eq!(script.read(0x30, 1).unwrap(), 0x200c);
        script.finish().unwrap();
        assert_eq!(script.encode().len(), 2 * 4);
        assert_eq!(script.data_words(), 4);
    }

    #[test]
    fn test_script_full() {
        let mut script = Script::new(0);
        for i in 0..CD_MAX_OPS - 1 {
            script.write(0x10, i as u32).unwrap();
        }
        assert_eq!(
            script.write(0x10, 0),
            Err(CaptureError::ScriptFull { ops: CD_MAX_OPS })
        );
        script.finish().unwrap();
        assert_eq!(script.ops().len(), CD_MAX_OPS);
        assert_eq!(script.encode().len() * 8, CD_SCRIPT_SIZE);
        assert!(script.write(0x10, 0).is_err());
    }

    #[test]
    fn test_data_region_boundary() {
        let words = (CD_DATA_SIZE / 4) as u32;
        assert_eq!(words, 260_096);

        let mut script = Script::new(0);
        script.read(0x10, words - 1).unwrap();
        script.read(0x10, 1).unwrap();
        assert_eq!(
            script.read(0x10, 1),
            Err(CaptureError::CapacityExceeded {
                requested: CD_DATA_SIZE + 4,
                capacity: CD_DATA_SIZE
            })
        );
        // A rejected read leaves the script untouched.
        assert_eq!(script.ops().len(), 2);
        assert_eq!(script.data_words() * 4, CD_DATA_SIZE);
    }
}
