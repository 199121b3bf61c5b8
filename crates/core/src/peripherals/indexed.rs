// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

use super::Peripheral;
use std::collections::HashMap;

const ADDR: u32 = 0;
const DATA: u32 = 1;

/// An address/data port pair in front of an internal array.
///
/// Writing the address register moves the cursor; every read of the data
/// register returns the word under the cursor and advances it.
#[derive(Debug)]
pub struct IndexedBank {
    id: u32,
    cursor: u32,
    words: HashMap<u32, u32>,
}

impl IndexedBank {
    /// `id` tags the generated contents so banks are distinguishable.
    pub fn new(id: u32) -> Self {
        Self {
            id,
            cursor: 0,
            words: HashMap::new(),
        }
    }

    pub fn with_word(mut self, index: u32, value: u32) -> Self {
        self.words.insert(index, value);
        self
    }

    pub fn cursor(&self) -> u32 {
        self.cursor
    }

    fn word(&self, index: u32) -> u32 {
        self.words
            .get(&index)
            .copied()
            .unwrap_or((self.id << 24) | (index & 0x00ff_ffff))
    }
}

impl Peripheral for IndexedBank {
    fn read(&mut self, offset: u32) -> u32 {
        match offset {
            ADDR => self.cursor,
            DATA => {
                let value = self.word(self.cursor);
                self.cursor = self.cursor.wrapping_add(1);
                value
            }
            _ => 0,
        }
    }

    fn write(&mut self, offset: u32, value: u32) {
        match offset {
            ADDR => self.cursor = value,
            DATA => {
                self.words.insert(self.cursor, value);
                self.cursor = self.cursor.wrapping_add(1);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_advances_on_data_read() {
        let mut bank = IndexedBank::new(3).with_word(1, 0xabcd);
        bank.write(ADDR, 0);
        assert_eq!(bank.read(DATA), 0x0300_0000);
        assert_eq!(bank.read(DATA), 0xabcd);
        assert_eq!(bank.cursor(), 2);

        bank.write(ADDR, 1);
        assert_eq!(bank.read(DATA), 0xabcd);
    }
}
