// GpuState - GPU Crash-State Capture
// Copyright (C) 2026 Andrii Shylenko
//
// This software is released under the MIT License.
// See the LICENSE file in the project root for full license information.

//! Word-oriented ascii85 as used by GPU crash reports.
//!
//! Each 32-bit word is encoded independently: a zero word becomes `z`,
//! anything else becomes five characters `'!' + digit`, most significant
//! base-85 digit first. The value is the native word, not a big-endian
//! byte group, so the output differs from Adobe ascii85 on little-endian
//! data.

/// Encode a single word.
pub fn encode_word(word: u32) -> String {
    if word == 0 {
        return "z".to_string();
    }

    let mut out = [0u8; 5];
    let mut v = word;
    for slot in out.iter_mut().rev() {
        *slot = b'!' + (v % 85) as u8;
        v /= 85;
    }
    out.iter().map(|&b| b as char).collect()
}

/// Number of leading words worth emitting: everything up to the last
/// non-zero word.
pub fn encoded_len(words: &[u32]) -> usize {
    words.iter().rposition(|&w| w != 0).map_or(0, |i| i + 1)
}

/// Encode `words`, dropping trailing zero words. Returns `None` when
/// every word is zero.
pub fn encode(words: &[u32]) -> Option<String> {
    let len = encoded_len(words);
    if len == 0 {
        return None;
    }
    Some(words[..len].iter().map(|&w| encode_word(w)).collect())
}

/// Encode a byte buffer as little-endian words; a partial tail word is
/// zero padded.
pub fn encode_bytes(bytes: &[u8]) -> Option<String> {
    let words: Vec<u32> = bytes
        .chunks(4)
        .map(|chunk| {
            let mut word = [0u8; 4];
            word[..chunk.len()].copy_from_slice(chunk);
            u32::from_le_bytes(word)
        })
        .collect();
    encode(&words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_word() {
        assert_eq!(encode_word(0), "z");
        assert_eq!(encode_word(1), "!!!!\"");
        assert_eq!(encode_word(85), "!!!\"!");
        assert_eq!(encode_word(u32::MAX), "s8W-!");
    }

    #[test]
    fn test_trailing_zero_truncation() {
        assert_eq!(encode(&[0, 1, 0, 0]).unwrap(), "z!!!!\"");
        assert_eq!(encode(&[0, 0, 0]), None);
        assert_eq!(encode(&[]), None);
    }

    #[test]
    fn test_encode_bytes_pads_tail() {
        assert_eq!(encode_bytes(&[1]).unwrap(), encode_word(1));
        assert_eq!(encode_bytes(&[0, 0, 0, 0, 0]), None);
    }
}
